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

use pest::iterators::Pair;

use crate::ast::{Operand, Register};
use crate::errors::ErrorKind;
use crate::parser::Rule;

// Helper to build an Operand from a pest Pair
pub fn build_operand(pair: Pair<Rule>) -> Result<Operand, ErrorKind> {
    let inner = pair.into_inner().next().ok_or(ErrorKind::Syntax)?;
    match inner.as_rule() {
        Rule::rel32 => build_rel32(inner),
        Rule::address => build_address(inner),
        Rule::register => build_register(inner),
        Rule::signed_number => Ok(Operand::SImm(parse_signed(inner.as_str())?)),
        Rule::number => Ok(Operand::Imm(parse_number(inner.as_str())?)),
        Rule::label_ref => Ok(Operand::Label(inner.as_str().to_string())),
        _ => unreachable!("Unknown operand rule: {:?}", inner.as_rule()),
    }
}

fn build_register(pair: Pair<Rule>) -> Result<Operand, ErrorKind> {
    let reg_pair = pair.into_inner().next().ok_or(ErrorKind::Syntax)?;
    let reg = Register::from_name(reg_pair.as_str())
        .ok_or_else(|| ErrorKind::InvalidOperand(reg_pair.as_str().to_string()))?;
    match reg_pair.as_rule() {
        Rule::reg8 => Ok(Operand::Reg8(reg)),
        Rule::reg16 => Ok(Operand::Reg16(reg)),
        Rule::reg32 => Ok(Operand::Reg32(reg)),
        _ => unreachable!("Unknown register rule: {:?}", reg_pair.as_rule()),
    }
}

fn build_address(pair: Pair<Rule>) -> Result<Operand, ErrorKind> {
    let text = pair.as_str();
    // strip the "@0x" prefix
    let value = u64::from_str_radix(&text[3..], 16)
        .map_err(|_| ErrorKind::InvalidOperand(text.to_string()))?;
    let addr = u32::try_from(value)
        .map_err(|_| ErrorKind::UnsignedOutOfRange { bits: 32, value })?;
    Ok(Operand::Addr(addr))
}

fn build_rel32(pair: Pair<Rule>) -> Result<Operand, ErrorKind> {
    let mut inner = pair.into_inner();
    let base_pair = inner.next().ok_or(ErrorKind::Syntax)?;
    let sign_pair = inner.next().ok_or(ErrorKind::Syntax)?;
    let number_pair = inner.next().ok_or(ErrorKind::Syntax)?;

    let base = Register::from_name(base_pair.as_str())
        .ok_or_else(|| ErrorKind::InvalidOperand(base_pair.as_str().to_string()))?;

    let magnitude = parse_number(number_pair.as_str())?;
    let value = if sign_pair.as_str() == "-" {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    let offset =
        i32::try_from(value).map_err(|_| ErrorKind::SignedOutOfRange { bits: 32, value })?;

    Ok(Operand::Rel32 { base, offset })
}

/// Parses an unsigned `0x…` or decimal literal.
pub fn parse_number(text: &str) -> Result<u64, ErrorKind> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    };
    parsed.map_err(|_| ErrorKind::InvalidOperand(text.to_string()))
}

/// Parses a `+`/`-` prefixed literal; the sign is required by the grammar.
pub fn parse_signed(text: &str) -> Result<i64, ErrorKind> {
    let magnitude = parse_number(&text[1..])?;
    let value = if text.starts_with('-') {
        -(magnitude as i128)
    } else {
        magnitude as i128
    };
    i64::try_from(value).map_err(|_| ErrorKind::InvalidOperand(text.to_string()))
}
