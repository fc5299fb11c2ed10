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

use crate::assembler::encoder::constants::{POP_OPCODE, PUSH_OPCODE};
use crate::assembler::encoder::utility_functions::*;
use crate::ast::{Instruction, Operand};
use crate::errors::ErrorKind;

/// push/pushw/pushdw. Registers use MOD 0/2/4, immediates MOD 1/3/5; an
/// immediate's intrinsic width (smallest fit) must equal the instruction
/// width, so `pushdw 1` is rejected rather than widened.
pub fn encode_push(inst: &Instruction, text: &mut Vec<u8>) -> Result<(), ErrorKind> {
    if inst.operands.len() != 1 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(PUSH_OPCODE);
    let width = suffix_width(inst.kind);

    match &inst.operands[0] {
        Operand::Reg8(reg) if width == 8 => {
            text.extend_from_slice(&[0, reg.code()]);
            Ok(())
        }
        Operand::Reg16(reg) if width == 16 => {
            text.extend_from_slice(&[2, reg.code()]);
            Ok(())
        }
        Operand::Reg32(reg) if width == 32 => {
            text.extend_from_slice(&[4, reg.code()]);
            Ok(())
        }
        Operand::Imm(value) => {
            let imm_width = if unsigned_fits(*value, 8) {
                8
            } else if unsigned_fits(*value, 16) {
                16
            } else {
                32
            };
            if imm_width != width {
                return Err(arg_format(inst.kind));
            }
            text.push(imm_mod(imm_width));
            push_imm(text, *value, imm_width)
        }
        Operand::SImm(value) => {
            let imm_width = if signed_fits(*value, 8) {
                8
            } else if signed_fits(*value, 16) {
                16
            } else {
                32
            };
            if imm_width != width {
                return Err(arg_format(inst.kind));
            }
            text.push(imm_mod(imm_width));
            push_simm(text, *value, imm_width)
        }
        _ => Err(arg_format(inst.kind)),
    }
}

/// pop/popw/popdw. With no operand the popped value is discarded (MOD
/// 1/3/5, no register byte); with one it must be a register of the
/// instruction's width.
pub fn encode_pop(inst: &Instruction, text: &mut Vec<u8>) -> Result<(), ErrorKind> {
    if inst.operands.len() > 1 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(POP_OPCODE);
    let width = suffix_width(inst.kind);

    let Some(operand) = inst.operands.first() else {
        text.push(imm_mod(width));
        return Ok(());
    };

    match operand {
        Operand::Reg8(reg) if width == 8 => {
            text.extend_from_slice(&[0, reg.code()]);
            Ok(())
        }
        Operand::Reg16(reg) if width == 16 => {
            text.extend_from_slice(&[2, reg.code()]);
            Ok(())
        }
        Operand::Reg32(reg) if width == 32 => {
            text.extend_from_slice(&[4, reg.code()]);
            Ok(())
        }
        _ => Err(arg_format(inst.kind)),
    }
}

// MOD for the non-register encodings: 1, 3 or 5 by width.
fn imm_mod(width: u32) -> u8 {
    match width {
        8 => 1,
        16 => 3,
        _ => 5,
    }
}
