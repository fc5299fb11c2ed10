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

pub mod operand_builders;

use std::path::PathBuf;

use pest::iterators::Pair;

use crate::ast::{DataDirective, DataValue, InstKind, Instruction, Section, Statement};
use crate::errors::ErrorKind;
use crate::parser::Rule;
use operand_builders::{build_operand, parse_number, parse_signed};

/// Builds the label and statement of one `line_content` pair.
pub fn build_line(
    pair: Pair<Rule>,
) -> Result<(Option<String>, Option<Statement>), ErrorKind> {
    let inner = pair.into_inner().next().ok_or(ErrorKind::Syntax)?;

    match inner.as_rule() {
        Rule::include_directive => {
            let path = find_rule(inner, Rule::include_path)?;
            Ok((None, Some(Statement::Include(PathBuf::from(path.as_str())))))
        }
        Rule::section_directive => {
            let name = find_rule(inner, Rule::section_name)?;
            let section = Section::from_name(name.as_str())
                .ok_or_else(|| ErrorKind::InvalidSection(name.as_str().to_string()))?;
            Ok((None, Some(Statement::Section(section))))
        }
        Rule::labeled_statement => {
            let mut parts = inner.into_inner();
            let label_def = parts.next().ok_or(ErrorKind::Syntax)?;
            let label = find_rule(label_def, Rule::ident)?.as_str().to_string();

            let statement = match parts.next() {
                Some(p) if p.as_rule() == Rule::data_directive => {
                    Some(Statement::Data(build_data_directive(p)?))
                }
                Some(p) => Some(Statement::Instruction(build_instruction(p)?)),
                None => None,
            };
            Ok((Some(label), statement))
        }
        Rule::data_directive => Ok((None, Some(Statement::Data(build_data_directive(inner)?)))),
        Rule::instruction => Ok((None, Some(Statement::Instruction(build_instruction(inner)?)))),
        _ => unreachable!("Unknown line rule: {:?}", inner.as_rule()),
    }
}

fn build_instruction(pair: Pair<Rule>) -> Result<Instruction, ErrorKind> {
    let mut inner = pair.into_inner();
    let mnemonic = inner.next().ok_or(ErrorKind::Syntax)?;
    let kind = InstKind::from_mnemonic(mnemonic.as_str())
        .ok_or_else(|| ErrorKind::InvalidInstruction(mnemonic.as_str().to_string()))?;

    let mut operands = Vec::new();
    if let Some(list) = inner.next() {
        for operand in list.into_inner() {
            operands.push(build_operand(operand)?);
        }
    }

    Ok(Instruction { kind, operands })
}

fn build_data_directive(pair: Pair<Rule>) -> Result<DataDirective, ErrorKind> {
    let mut inner = pair.into_inner();
    let datatype = inner.next().ok_or(ErrorKind::Syntax)?.as_str().to_string();

    let mut name = None;
    let mut next = inner.next().ok_or(ErrorKind::Syntax)?;
    if next.as_rule() == Rule::ident {
        name = Some(next.as_str().to_string());
        next = inner.next().ok_or(ErrorKind::Syntax)?;
    }

    let literal = next.into_inner().next().ok_or(ErrorKind::Syntax)?;
    let literal_text = literal.as_str().to_string();
    let bad_literal = || ErrorKind::InvalidDataLiteral {
        datatype: datatype.clone(),
        literal: literal_text.clone(),
    };

    let unsigned = |text: &str| parse_number(text).map_err(|_| bad_literal());
    let signed = |text: &str| parse_signed(text).map_err(|_| bad_literal());

    let value = match (datatype.as_str(), literal.as_rule()) {
        ("u8", Rule::number) => DataValue::U8(unsigned(literal.as_str())?),
        ("u16", Rule::number) => DataValue::U16(unsigned(literal.as_str())?),
        ("u32", Rule::number) => DataValue::U32(unsigned(literal.as_str())?),
        ("s8", Rule::signed_number) => DataValue::S8(signed(literal.as_str())?),
        ("s16", Rule::signed_number) => DataValue::S16(signed(literal.as_str())?),
        ("s32", Rule::signed_number) => DataValue::S32(signed(literal.as_str())?),
        ("space", Rule::number) => DataValue::Space(unsigned(literal.as_str())?),
        ("str", Rule::string) => DataValue::Str(decode_string(literal, &bad_literal)?),
        ("strz", Rule::string) => DataValue::StrZ(decode_string(literal, &bad_literal)?),
        _ => return Err(bad_literal()),
    };

    Ok(DataDirective { name, value })
}

// Decodes the escapes of a string literal into raw bytes. The accepted
// escapes are \\ \" \' \t \n \r \0; anything else is an error.
fn decode_string(
    literal: Pair<Rule>,
    bad_literal: impl Fn() -> ErrorKind,
) -> Result<Vec<u8>, ErrorKind> {
    let inner = literal.into_inner().next().ok_or(ErrorKind::Syntax)?;

    let mut bytes = Vec::new();
    let mut chars = inner.as_str().chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let escape = chars.next().ok_or_else(&bad_literal)?;
            bytes.push(match escape {
                '\\' => b'\\',
                '"' => b'"',
                '\'' => b'\'',
                't' => b'\t',
                'n' => b'\n',
                'r' => b'\r',
                '0' => 0,
                _ => return Err(bad_literal()),
            });
        } else {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
    Ok(bytes)
}

// Skips over keyword tokens to the first child with the wanted rule.
fn find_rule(pair: Pair<Rule>, rule: Rule) -> Result<Pair<Rule>, ErrorKind> {
    pair.into_inner()
        .find(|p| p.as_rule() == rule)
        .ok_or(ErrorKind::Syntax)
}
