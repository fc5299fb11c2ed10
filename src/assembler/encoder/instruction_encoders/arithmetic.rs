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
use crate::ast::{InstKind, Instruction, Operand};
use crate::errors::ErrorKind;

fn is_signed(kind: InstKind) -> bool {
    use InstKind::*;
    matches!(kind, Scmp | Sadd | Ssub | Smul)
}

// Signed mnemonics re-interpret an unsigned-looking immediate as signed;
// unsigned mnemonics reject explicitly signed ones.
fn immediate_value(operand: &Operand, kind: InstKind, bits: u32) -> Result<Option<i64>, ErrorKind> {
    match operand {
        Operand::Imm(value) if is_signed(kind) => {
            let value = i64::try_from(*value).map_err(|_| ErrorKind::SignedOutOfRange {
                bits,
                value: *value as i128,
            })?;
            Ok(Some(value))
        }
        Operand::Imm(_) => Ok(None),
        Operand::SImm(_) if !is_signed(kind) => Err(arg_format(kind)),
        Operand::SImm(value) => Ok(Some(*value)),
        _ => Err(arg_format(kind)),
    }
}

/// cmp/scmp, and, or, xor, add/sadd, sub/ssub. MOD 0-2 register/immediate by
/// width (sign bit 3 set for signed immediates), MOD 3-5 register/register
/// of equal width.
pub fn encode_binary(inst: &Instruction, text: &mut Vec<u8>) -> Result<(), ErrorKind> {
    if inst.operands.len() != 2 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(opcode(inst.kind));

    match (&inst.operands[0], &inst.operands[1]) {
        (Operand::Reg8(a), Operand::Reg8(b)) => {
            text.extend_from_slice(&[3, a.code(), b.code()]);
            Ok(())
        }
        (Operand::Reg16(a), Operand::Reg16(b)) => {
            text.extend_from_slice(&[4, a.code(), b.code()]);
            Ok(())
        }
        (Operand::Reg32(a), Operand::Reg32(b)) => {
            text.extend_from_slice(&[5, a.code(), b.code()]);
            Ok(())
        }
        (register, immediate @ (Operand::Imm(_) | Operand::SImm(_))) => {
            let (mod_value, bits) = match register {
                Operand::Reg8(_) => (0u8, 8),
                Operand::Reg16(_) => (1, 16),
                Operand::Reg32(_) => (2, 32),
                _ => return Err(arg_format(inst.kind)),
            };
            let code = match register {
                Operand::Reg8(reg) | Operand::Reg16(reg) | Operand::Reg32(reg) => reg.code(),
                _ => return Err(arg_format(inst.kind)),
            };

            match immediate_value(immediate, inst.kind, bits)? {
                Some(signed) => {
                    text.extend_from_slice(&[mod_value | (1 << SHIFT_SIGN), code]);
                    push_simm(text, signed, bits)
                }
                None => {
                    let Operand::Imm(value) = immediate else {
                        return Err(arg_format(inst.kind));
                    };
                    text.extend_from_slice(&[mod_value, code]);
                    push_imm(text, *value, bits)
                }
            }
        }
        _ => Err(arg_format(inst.kind)),
    }
}

/// mul/smul. Immediates use MOD 0-2 at the smallest width that fits with
/// the mnemonic's fit predicate; registers use MOD 3-5. The sign bit is set
/// for the signed mnemonic in every form.
pub fn encode_unary(inst: &Instruction, text: &mut Vec<u8>) -> Result<(), ErrorKind> {
    if inst.operands.len() != 1 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(MUL_OPCODE);
    let sign_bit = if is_signed(inst.kind) { 1 << SHIFT_SIGN } else { 0 };

    match &inst.operands[0] {
        Operand::Reg8(reg) => {
            text.extend_from_slice(&[3 | sign_bit, reg.code()]);
            Ok(())
        }
        Operand::Reg16(reg) => {
            text.extend_from_slice(&[4 | sign_bit, reg.code()]);
            Ok(())
        }
        Operand::Reg32(reg) => {
            text.extend_from_slice(&[5 | sign_bit, reg.code()]);
            Ok(())
        }
        immediate @ (Operand::Imm(_) | Operand::SImm(_)) => {
            match immediate_value(immediate, inst.kind, 32)? {
                Some(signed) => {
                    let bits = if signed_fits(signed, 8) {
                        8
                    } else if signed_fits(signed, 16) {
                        16
                    } else {
                        32
                    };
                    text.push(width_mod(bits) | sign_bit);
                    push_simm(text, signed, bits)
                }
                None => {
                    let Operand::Imm(value) = immediate else {
                        return Err(arg_format(inst.kind));
                    };
                    let bits = if unsigned_fits(*value, 8) {
                        8
                    } else if unsigned_fits(*value, 16) {
                        16
                    } else {
                        32
                    };
                    text.push(width_mod(bits));
                    push_imm(text, *value, bits)
                }
            }
        }
        _ => Err(arg_format(inst.kind)),
    }
}

/// not only takes a register; MOD is the width index.
pub fn encode_not(inst: &Instruction, text: &mut Vec<u8>) -> Result<(), ErrorKind> {
    if inst.operands.len() != 1 {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }

    text.push(NOT_OPCODE);

    match &inst.operands[0] {
        Operand::Reg8(reg) => text.extend_from_slice(&[0, reg.code()]),
        Operand::Reg16(reg) => text.extend_from_slice(&[1, reg.code()]),
        Operand::Reg32(reg) => text.extend_from_slice(&[2, reg.code()]),
        _ => return Err(arg_format(inst.kind)),
    }
    Ok(())
}

fn width_mod(bits: u32) -> u8 {
    match bits {
        8 => 0,
        16 => 1,
        _ => 2,
    }
}
