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

use std::path::Path;

use thiserror::Error;

/// One variant per diagnostic class. The file/line context is attached by
/// [`TasmError`]; builder and encoder code only ever produces an `ErrorKind`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Syntax error")]
    Syntax,

    #[error("Invalid argument: {0}")]
    InvalidOperand(String),

    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),

    #[error("Invalid section: {0}")]
    InvalidSection(String),

    #[error("No section selected")]
    NoSection,

    #[error("Instructions are not allowed in a {0} section")]
    InstructionOutsideText(&'static str),

    #[error("Data directives are not allowed in a {0} section")]
    DataOutsideData(&'static str),

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("Invalid number of arguments for {mnemonic}: {count}")]
    ArgCount { mnemonic: String, count: usize },

    #[error("Invalid argument format to {0}")]
    ArgFormat(String),

    #[error("Unsigned immediate doesn't fit into {bits} bits: {value}")]
    UnsignedOutOfRange { bits: u32, value: u64 },

    #[error("Signed immediate doesn't fit into {bits} bits: {value}")]
    SignedOutOfRange { bits: u32, value: i128 },

    #[error("Cannot parse {datatype}: {literal}")]
    InvalidDataLiteral { datatype: String, literal: String },

    #[error("Unable to locate {segment} segment label: {name}")]
    UnresolvedLabel { segment: &'static str, name: String },

    #[error("Cyclical include: {0}")]
    CyclicalInclude(String),

    #[error("Empty program: no instructions in the text section")]
    EmptyProgram,

    #[error("{0}")]
    Io(String),
}

/// A fatal assembly error, carrying the source position it was raised at.
/// For label-resolution failures the position is the referencing line,
/// captured when the fix-up was recorded.
#[derive(Error, Debug)]
#[error("TASMError: {file}:{line}\n    {kind}")]
pub struct TasmError {
    pub file: String,
    pub line: usize,
    pub kind: ErrorKind,
}

impl TasmError {
    pub fn new(file: &Path, line: usize, kind: ErrorKind) -> Self {
        TasmError {
            file: file.display().to_string(),
            line,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_format() {
        let err = TasmError::new(
            Path::new("prog.tsm"),
            12,
            ErrorKind::InvalidInstruction("frob".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "TASMError: prog.tsm:12\n    Invalid instruction: frob"
        );
    }

    #[test]
    fn test_range_error_messages() {
        let err = ErrorKind::UnsignedOutOfRange {
            bits: 8,
            value: 256,
        };
        assert_eq!(
            err.to_string(),
            "Unsigned immediate doesn't fit into 8 bits: 256"
        );

        let err = ErrorKind::SignedOutOfRange {
            bits: 16,
            value: -40000,
        };
        assert_eq!(
            err.to_string(),
            "Signed immediate doesn't fit into 16 bits: -40000"
        );
    }
}
