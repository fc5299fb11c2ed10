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

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod parser;

use std::path::{Path, PathBuf};

use errors::TasmError;
use file_reader::FileReader;

extern crate pest;
extern crate pest_derive;

/// Assembles the program rooted at `source_path` into a TPU image:
/// an 8-byte header of the kernel and user half lengths, the kernel half,
/// then the user half (each half being its text segment followed by its
/// data segment).
pub fn assemble<F: FileReader>(source_path: &Path, reader: &F) -> Result<Vec<u8>, TasmError> {
    let mut include_stack: Vec<PathBuf> = Vec::new();
    let lines = parser::parse_source_recursive(source_path, &mut include_stack, reader)?;

    let mut assembler = assembler::Assembler::new(source_path);
    for line in &lines {
        assembler.process_line(line)?;
    }

    assembler.finish()
}
