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

use crate::ast::{InstKind, Operand, Register};
use crate::assembler::fixup::{Fixup, SourceCtx};
use crate::errors::ErrorKind;

/// True if the UNSIGNED value fits into the number of bits provided.
pub fn unsigned_fits(value: u64, bits: u32) -> bool {
    value <= (1u64 << bits) - 1
}

/// True if the SIGNED value fits into the number of bits provided.
pub fn signed_fits(value: i64, bits: u32) -> bool {
    let max = (1i64 << (bits - 1)) - 1;
    let min = -(1i64 << (bits - 1));
    min <= value && value <= max
}

/// Appends an unsigned immediate, little endian at the given width.
pub fn push_imm(text: &mut Vec<u8>, value: u64, bits: u32) -> Result<(), ErrorKind> {
    if !unsigned_fits(value, bits) {
        return Err(ErrorKind::UnsignedOutOfRange { bits, value });
    }
    for shift in (0..bits).step_by(8) {
        text.push((value >> shift) as u8);
    }
    Ok(())
}

/// Appends a signed immediate in two's complement, little endian.
pub fn push_simm(text: &mut Vec<u8>, value: i64, bits: u32) -> Result<(), ErrorKind> {
    if !signed_fits(value, bits) {
        return Err(ErrorKind::SignedOutOfRange {
            bits,
            value: value as i128,
        });
    }
    let raw = value as u64;
    for shift in (0..bits).step_by(8) {
        text.push((raw >> shift) as u8);
    }
    Ok(())
}

/// Appends the `IP` base-register byte and four placeholder bytes, recording
/// a fix-up whose base IP is the buffer length after the placeholder.
pub fn reserve_displacement(
    text: &mut Vec<u8>,
    fixups: &mut Vec<Fixup>,
    target: &str,
    ctx: &SourceCtx,
) {
    text.push(Register::Ip.code());
    let at = text.len();
    text.extend_from_slice(&[0, 0, 0, 0]);
    fixups.push(Fixup {
        target: target.to_string(),
        at,
        base_ip: text.len(),
        file: ctx.file.to_path_buf(),
        line: ctx.line,
    });
}

/// Appends the base-register byte and 32-bit signed displacement of a
/// `Rel32` operand, or `IP` plus a placeholder and fix-up for a `Label`.
/// Callers must have matched the operand to one of those two shapes.
pub fn push_rel_target(
    text: &mut Vec<u8>,
    fixups: &mut Vec<Fixup>,
    operand: &Operand,
    kind: InstKind,
    ctx: &SourceCtx,
) -> Result<(), ErrorKind> {
    match operand {
        Operand::Label(name) => {
            reserve_displacement(text, fixups, name, ctx);
            Ok(())
        }
        Operand::Rel32 { base, offset } => {
            text.push(base.code());
            push_simm(text, *offset as i64, 32)
        }
        _ => Err(arg_format(kind)),
    }
}

pub fn arg_format(kind: InstKind) -> ErrorKind {
    ErrorKind::ArgFormat(kind.mnemonic().to_uppercase())
}

pub fn arg_count(kind: InstKind, count: usize) -> ErrorKind {
    ErrorKind::ArgCount {
        mnemonic: kind.mnemonic().to_uppercase(),
        count,
    }
}

/// Instruction width from the mnemonic suffix: `…dw` is 32, `…w` is 16,
/// anything else 8.
pub fn suffix_width(kind: InstKind) -> u32 {
    let mnemonic = kind.mnemonic();
    if mnemonic.ends_with("dw") {
        32
    } else if mnemonic.ends_with('w') {
        16
    } else {
        8
    }
}
