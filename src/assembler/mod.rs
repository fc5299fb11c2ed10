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

pub mod encoder;
pub mod fixup;
pub mod image;

use std::path::{Path, PathBuf};

use crate::ast::{DataDirective, DataValue, Instruction, Section, SourceLine, Statement};
use crate::errors::{ErrorKind, TasmError};
use encoder::utility_functions::{push_imm, push_simm};
use fixup::SourceCtx;
use image::{BOOTSTRAP_LEN, ImageHalf};

/// The whole assembler state: one image half per privilege level, plus the
/// active section. Lines are fed in source order; `finish` resolves every
/// fix-up and lays out the final image.
pub struct Assembler {
    user: ImageHalf,
    kernel: ImageHalf,
    section: Option<Section>,
    root: PathBuf,
}

impl Assembler {
    pub fn new(root: &Path) -> Self {
        let boot_ctx = SourceCtx { file: root, line: 0 };

        // Both halves start with a bootstrap jump before any source is
        // read, so every program must define _start and _kernel_start.
        let mut user = ImageHalf::new("text");
        user.seed_bootstrap("_start", &boot_ctx);
        let mut kernel = ImageHalf::new("kernel");
        kernel.seed_bootstrap("_kernel_start", &boot_ctx);

        Assembler {
            user,
            kernel,
            section: None,
            root: root.to_path_buf(),
        }
    }

    pub fn process_line(&mut self, line: &SourceLine) -> Result<(), TasmError> {
        let ctx = SourceCtx {
            file: &line.file,
            line: line.line,
        };

        if let Some(label) = &line.label {
            self.define_label(label, &ctx)?;
        }

        match &line.statement {
            None => Ok(()),
            Some(Statement::Section(section)) => {
                self.section = Some(*section);
                Ok(())
            }
            Some(Statement::Data(directive)) => self.emit_data(directive, &ctx),
            Some(Statement::Instruction(inst)) => self.emit_instruction(inst, &ctx),
            Some(Statement::Include(_)) => unreachable!("includes are expanded during parsing"),
        }
    }

    /// Resolves all pending fix-ups and lays out the image:
    /// `[u32 kernel_len][u32 user_len][k_text][k_data][t_text][t_data]`.
    pub fn finish(mut self) -> Result<Vec<u8>, TasmError> {
        let root_ctx = SourceCtx {
            file: &self.root,
            line: 0,
        };

        // Diagnose a program with no instructions before the unresolved
        // `_start` of its bootstrap jump can mask it.
        if self.user.text.len() == BOOTSTRAP_LEN {
            return Err(root_ctx.error(ErrorKind::EmptyProgram));
        }

        self.user.resolve_fixups()?;
        self.kernel.resolve_fixups()?;

        let mut out = Vec::new();
        push_imm(&mut out, self.kernel.total_len() as u64, 32)
            .map_err(|kind| root_ctx.error(kind))?;
        push_imm(&mut out, self.user.total_len() as u64, 32)
            .map_err(|kind| root_ctx.error(kind))?;
        out.extend_from_slice(&self.kernel.text);
        out.extend_from_slice(&self.kernel.data);
        out.extend_from_slice(&self.user.text);
        out.extend_from_slice(&self.user.data);
        Ok(out)
    }

    // The half owning the active section.
    fn active_half(&mut self, section: Section) -> &mut ImageHalf {
        if section.is_kernel() {
            &mut self.kernel
        } else {
            &mut self.user
        }
    }

    fn current_section(&self, ctx: &SourceCtx) -> Result<Section, TasmError> {
        self.section.ok_or_else(|| ctx.error(ErrorKind::NoSection))
    }

    fn define_label(&mut self, name: &str, ctx: &SourceCtx) -> Result<(), TasmError> {
        let section = self.current_section(ctx)?;
        let half = self.active_half(section);
        let result = if section.is_text() {
            half.define_text_label(name)
        } else {
            half.define_data_label(name)
        };
        result.map_err(|kind| ctx.error(kind))
    }

    fn emit_instruction(&mut self, inst: &Instruction, ctx: &SourceCtx) -> Result<(), TasmError> {
        let section = self.current_section(ctx)?;
        if !section.is_text() {
            return Err(ctx.error(ErrorKind::InstructionOutsideText(section.name())));
        }

        let half = self.active_half(section);
        encoder::encode_instruction(inst, &mut half.text, &mut half.fixups, ctx)
            .map_err(|kind| ctx.error(kind))
    }

    fn emit_data(&mut self, directive: &DataDirective, ctx: &SourceCtx) -> Result<(), TasmError> {
        let section = self.current_section(ctx)?;
        if !section.is_data() {
            return Err(ctx.error(ErrorKind::DataOutsideData(section.name())));
        }

        let half = self.active_half(section);
        if let Some(name) = &directive.name {
            half.define_data_label(name).map_err(|kind| ctx.error(kind))?;
        }

        let data = &mut half.data;
        let result = match &directive.value {
            DataValue::U8(value) => push_imm(data, *value, 8),
            DataValue::U16(value) => push_imm(data, *value, 16),
            DataValue::U32(value) => push_imm(data, *value, 32),
            DataValue::S8(value) => push_simm(data, *value, 8),
            DataValue::S16(value) => push_simm(data, *value, 16),
            DataValue::S32(value) => push_simm(data, *value, 32),
            DataValue::Str(bytes) => {
                data.extend_from_slice(bytes);
                Ok(())
            }
            DataValue::StrZ(bytes) => {
                data.extend_from_slice(bytes);
                data.push(0);
                Ok(())
            }
            DataValue::Space(count) => {
                data.resize(data.len() + *count as usize, 0);
                Ok(())
            }
        };
        result.map_err(|kind| ctx.error(kind))
    }
}
