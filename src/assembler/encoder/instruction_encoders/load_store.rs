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
use crate::ast::{Instruction, Operand};
use crate::errors::ErrorKind;

/// mov selects its MOD value purely by operand shape: 0-2 register/immediate
/// by width, 3-5 register/register by width, 6 register from memory.
pub fn encode_mov(
    inst: &Instruction,
    text: &mut Vec<u8>,
    fixups: &mut Vec<Fixup>,
    ctx: &SourceCtx,
) -> Result<(), ErrorKind> {
    if inst.operands.len() != 2 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(MOV_OPCODE);

    match (&inst.operands[0], &inst.operands[1]) {
        (Operand::Reg8(reg), Operand::Imm(value)) => {
            text.extend_from_slice(&[0, reg.code()]);
            push_imm(text, *value, 8)
        }
        (Operand::Reg8(reg), Operand::SImm(value)) => {
            text.extend_from_slice(&[0, reg.code()]);
            push_simm(text, *value, 8)
        }
        (Operand::Reg16(reg), Operand::Imm(value)) => {
            text.extend_from_slice(&[1, reg.code()]);
            push_imm(text, *value, 16)
        }
        (Operand::Reg16(reg), Operand::SImm(value)) => {
            text.extend_from_slice(&[1, reg.code()]);
            push_simm(text, *value, 16)
        }
        (Operand::Reg32(reg), Operand::Imm(value)) => {
            text.extend_from_slice(&[2, reg.code()]);
            push_imm(text, *value, 32)
        }
        (Operand::Reg32(reg), Operand::SImm(value)) => {
            text.extend_from_slice(&[2, reg.code()]);
            push_simm(text, *value, 32)
        }
        (Operand::Reg8(dst), Operand::Reg8(src)) => {
            text.extend_from_slice(&[3, dst.code(), src.code()]);
            Ok(())
        }
        (Operand::Reg16(dst), Operand::Reg16(src)) => {
            text.extend_from_slice(&[4, dst.code(), src.code()]);
            Ok(())
        }
        (Operand::Reg32(dst), Operand::Reg32(src)) => {
            text.extend_from_slice(&[5, dst.code(), src.code()]);
            Ok(())
        }
        (Operand::Reg32(dst), target @ (Operand::Rel32 { .. } | Operand::Label(_))) => {
            text.extend_from_slice(&[6, dst.code()]);
            push_rel_target(text, fixups, target, inst.kind, ctx)
        }
        _ => Err(arg_format(inst.kind)),
    }
}

/// lb/lw/ldw and sb/sw/sdw. The mnemonic suffix fixes the register width;
/// the second operand picks relative, absolute or register addressing.
pub fn encode_load_store(
    inst: &Instruction,
    text: &mut Vec<u8>,
    fixups: &mut Vec<Fixup>,
    ctx: &SourceCtx,
) -> Result<(), ErrorKind> {
    if inst.operands.len() != 2 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(opcode(inst.kind));

    let width = suffix_width(inst.kind);
    let (reg, mod_base) = match &inst.operands[0] {
        Operand::Reg8(reg) if width == 8 => (reg, 0u8),
        Operand::Reg16(reg) if width == 16 => (reg, 2),
        Operand::Reg32(reg) if width == 32 => (reg, 4),
        _ => return Err(arg_format(inst.kind)),
    };

    match &inst.operands[1] {
        target @ (Operand::Rel32 { .. } | Operand::Label(_)) => {
            text.push(mod_base | (ADDR_MODE_RELATIVE << SHIFT_ADDR_MODE));
            text.push(reg.code());
            push_rel_target(text, fixups, target, inst.kind, ctx)
        }
        Operand::Addr(addr) => {
            text.push(mod_base | (ADDR_MODE_ABSOLUTE << SHIFT_ADDR_MODE));
            text.push(reg.code());
            push_imm(text, *addr as u64, 32)
        }
        Operand::Reg32(pointer) => {
            text.push(mod_base + 1);
            text.push(reg.code());
            text.push(pointer.code());
            Ok(())
        }
        _ => Err(arg_format(inst.kind)),
    }
}
