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

pub mod constants;
mod instruction_encoders;
pub mod utility_functions;

use crate::assembler::fixup::{Fixup, SourceCtx};
use crate::ast::{InstKind, Instruction};
use crate::errors::ErrorKind;
use instruction_encoders::*;

/// Appends one instruction's bytes to the active text buffer, recording a
/// fix-up for any label operand. Errors carry no position; the caller owns
/// the current file/line.
pub fn encode_instruction(
    inst: &Instruction,
    text: &mut Vec<u8>,
    fixups: &mut Vec<Fixup>,
    ctx: &SourceCtx,
) -> Result<(), ErrorKind> {
    use InstKind::*;
    match inst.kind {
        Nop | Syscall | Sysret | Ret | Dbg | Hlt => misc::encode_control(inst, text),
        Call | Jmp | Jz | Jnz | Jc | Jnc | Jo | Jno | Js | Jns | Jp | Jnp => {
            control_flow::encode_jump_like(inst, text, fixups, ctx)
        }
        Uret => control_flow::encode_uret(inst, text),
        SetSyscall => control_flow::encode_setsyscall(inst, text, fixups, ctx),
        Mov => load_store::encode_mov(inst, text, fixups, ctx),
        Lb | Lw | Ldw | Sb | Sw | Sdw => load_store::encode_load_store(inst, text, fixups, ctx),
        Push | Pushw | Pushdw => stack::encode_push(inst, text),
        Pop | Popw | Popdw => stack::encode_pop(inst, text),
        Cmp | Scmp | And | Or | Xor | Add | Sadd | Sub | Ssub => {
            arithmetic::encode_binary(inst, text)
        }
        Mul | Smul => arithmetic::encode_unary(inst, text),
        Not => arithmetic::encode_not(inst, text),
    }
}
