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

use std::collections::HashMap;

use crate::assembler::encoder::constants::JMP_OPCODE;
use crate::assembler::encoder::utility_functions::{reserve_displacement, signed_fits};
use crate::assembler::fixup::{Fixup, SourceCtx};
use crate::errors::{ErrorKind, TasmError};

/// Size of the `JMP [IP + disp]` pre-seeded at the start of each text buffer.
pub const BOOTSTRAP_LEN: usize = 7;

/// One half of the output image: a text buffer, a data buffer, a label table
/// for each, and the text buffer's pending fix-ups. Data never hosts
/// instructions, so it never hosts fix-ups either.
pub struct ImageHalf {
    segment: &'static str,
    pub text: Vec<u8>,
    pub data: Vec<u8>,
    text_labels: HashMap<String, usize>,
    data_labels: HashMap<String, usize>,
    pub fixups: Vec<Fixup>,
}

impl ImageHalf {
    pub fn new(segment: &'static str) -> Self {
        ImageHalf {
            segment,
            text: Vec::new(),
            data: Vec::new(),
            text_labels: HashMap::new(),
            data_labels: HashMap::new(),
            fixups: Vec::new(),
        }
    }

    /// Seeds the text buffer with `JMP [IP + 0]` and a fix-up targeting the
    /// half's entry label, so execution starts at that label regardless of
    /// where it is defined.
    pub fn seed_bootstrap(&mut self, entry_label: &str, ctx: &SourceCtx) {
        self.text.push(JMP_OPCODE);
        self.text.push(0);
        reserve_displacement(&mut self.text, &mut self.fixups, entry_label, ctx);
    }

    pub fn define_text_label(&mut self, name: &str) -> Result<(), ErrorKind> {
        self.check_duplicate(name)?;
        self.text_labels.insert(name.to_string(), self.text.len());
        Ok(())
    }

    pub fn define_data_label(&mut self, name: &str) -> Result<(), ErrorKind> {
        self.check_duplicate(name)?;
        self.data_labels.insert(name.to_string(), self.data.len());
        Ok(())
    }

    // A name must be unique across the half's text and data tables combined.
    fn check_duplicate(&self, name: &str) -> Result<(), ErrorKind> {
        if self.text_labels.contains_key(name) || self.data_labels.contains_key(name) {
            return Err(ErrorKind::DuplicateLabel(name.to_string()));
        }
        Ok(())
    }

    /// Rewrites every placeholder displacement. Text labels resolve to their
    /// text offset; data labels are biased by the text length because the
    /// data segment is laid out directly after the text segment.
    pub fn resolve_fixups(&mut self) -> Result<(), TasmError> {
        for fixup in std::mem::take(&mut self.fixups) {
            let target_offset = if let Some(pos) = self.text_labels.get(&fixup.target) {
                *pos as i64
            } else if let Some(pos) = self.data_labels.get(&fixup.target) {
                (self.text.len() + pos) as i64
            } else {
                return Err(TasmError::new(
                    &fixup.file,
                    fixup.line,
                    ErrorKind::UnresolvedLabel {
                        segment: self.segment,
                        name: fixup.target,
                    },
                ));
            };

            let offset = target_offset - fixup.base_ip as i64;
            if !signed_fits(offset, 32) {
                return Err(TasmError::new(
                    &fixup.file,
                    fixup.line,
                    ErrorKind::SignedOutOfRange {
                        bits: 32,
                        value: offset as i128,
                    },
                ));
            }

            // Two's complement, little endian.
            self.text[fixup.at..fixup.at + 4].copy_from_slice(&(offset as i32).to_le_bytes());
        }
        Ok(())
    }

    pub fn total_len(&self) -> usize {
        self.text.len() + self.data.len()
    }
}
