/*
Copyright 2025 The tasm Authors

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use crate::assembler::encoder::constants::*;
use crate::assembler::encoder::utility_functions::*;
use crate::assembler::fixup::{Fixup, SourceCtx};
use crate::ast::{InstKind, Instruction, Operand};
use crate::errors::ErrorKind;

fn is_inverse(kind: InstKind) -> bool {
    use InstKind::*;
    matches!(kind, Jnz | Jnc | Jno | Jns | Jnp)
}

/// call/jmp and the predicated jumps. One operand; the opcode is shared by
/// each predicate pair and the inverse variant sets bit 1 of the MOD byte.
pub fn encode_jump_like(
    inst: &Instruction,
    text: &mut Vec<u8>,
    fixups: &mut Vec<Fixup>,
    ctx: &SourceCtx,
) -> Result<(), ErrorKind> {
    if inst.operands.len() != 1 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(opcode(inst.kind));
    let inverse = if is_inverse(inst.kind) { INVERSE_FLAG } else { 0 };

    match &inst.operands[0] {
        target @ (Operand::Rel32 { .. } | Operand::Label(_)) => {
            text.push(inverse | (ADDR_MODE_RELATIVE << SHIFT_ADDR_MODE));
            push_rel_target(text, fixups, target, inst.kind, ctx)
        }
        Operand::Addr(addr) => {
            text.push(inverse | (ADDR_MODE_ABSOLUTE << SHIFT_ADDR_MODE));
            push_imm(text, *addr as u64, 32)
        }
        Operand::Reg32(reg) => {
            text.push(1 | inverse);
            text.push(reg.code());
            Ok(())
        }
        _ => Err(arg_format(inst.kind)),
    }
}

/// uret takes the user IP and user SP restore addresses.
pub fn encode_uret(inst: &Instruction, text: &mut Vec<u8>) -> Result<(), ErrorKind> {
    if inst.operands.len() != 2 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(URET_OPCODE);

    let (Operand::Addr(first), Operand::Addr(second)) = (&inst.operands[0], &inst.operands[1])
    else {
        return Err(arg_format(inst.kind));
    };
    push_imm(text, *first as u64, 32)?;
    push_imm(text, *second as u64, 32)
}

/// setsyscall binds an 8-bit syscall number to a handler given relative to
/// IP (or as a label).
pub fn encode_setsyscall(
    inst: &Instruction,
    text: &mut Vec<u8>,
    fixups: &mut Vec<Fixup>,
    ctx: &SourceCtx,
) -> Result<(), ErrorKind> {
    if inst.operands.len() != 2 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(SETSYSCALL_OPCODE);

    match (&inst.operands[0], &inst.operands[1]) {
        (Operand::Imm(number), target @ (Operand::Rel32 { .. } | Operand::Label(_))) => {
            push_imm(text, *number, 8)?;
            push_rel_target(text, fixups, target, inst.kind, ctx)
        }
        _ => Err(arg_format(inst.kind)),
    }
}
