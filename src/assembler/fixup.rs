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

use std::path::{Path, PathBuf};

use crate::errors::{ErrorKind, TasmError};

/// A deferred 32-bit displacement write: once every label position is known,
/// the four placeholder bytes at `at` are rewritten with
/// `target_offset - base_ip` in two's complement. The source position is the
/// referencing instruction's, captured here so resolution failures point at
/// the reference instead of end-of-input.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixup {
    pub target: String,
    pub at: usize,
    pub base_ip: usize,
    pub file: PathBuf,
    pub line: usize,
}

/// The source position of the line currently being assembled; threaded into
/// the encoder so fix-ups can capture it.
pub struct SourceCtx<'a> {
    pub file: &'a Path,
    pub line: usize,
}

impl SourceCtx<'_> {
    pub fn error(&self, kind: ErrorKind) -> TasmError {
        TasmError::new(self.file, self.line, kind)
    }
}
