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

mod ast_builder;

use std::path::{Path, PathBuf};

use pest::Parser;
use pest::error::LineColLocation;
use pest_derive::Parser;

use crate::ast::{SourceLine, Statement};
use crate::errors::{ErrorKind, TasmError};
use crate::file_reader::FileReader;

// Derive the parser from our grammar file.
#[derive(Parser)]
#[grammar = "./grammar.pest"]
pub struct TasmParser;

/// Parses one source file into lines, without touching includes.
pub fn parse_source(source: &str, file: &Path) -> Result<Vec<SourceLine>, TasmError> {
    let pairs = TasmParser::parse(Rule::program, source).map_err(|e| {
        let line = match e.line_col {
            LineColLocation::Pos((line, _)) => line,
            LineColLocation::Span((line, _), _) => line,
        };
        TasmError::new(file, line, ErrorKind::Syntax)
    })?;

    let mut lines = Vec::new();

    for pair in pairs
        .flatten()
        .filter(|p| p.as_rule() == Rule::line_content)
    {
        let line_number = pair.as_span().start_pos().line_col().0;
        let (label, statement) = ast_builder::build_line(pair)
            .map_err(|kind| TasmError::new(file, line_number, kind))?;

        // Only keep non-empty lines
        if label.is_some() || statement.is_some() {
            lines.push(SourceLine {
                file: file.to_path_buf(),
                line: line_number,
                label,
                statement,
            });
        }
    }

    Ok(lines)
}

/// Parses a file and splices in every `include`, depth first. Include paths
/// resolve relative to the including file; the stack of canonical paths
/// currently being processed rejects cycles.
pub fn parse_source_recursive<F: FileReader>(
    path: &Path,
    include_stack: &mut Vec<PathBuf>,
    reader: &F,
) -> Result<Vec<SourceLine>, TasmError> {
    let canonical = reader
        .canonicalize(path)
        .map_err(|e| TasmError::new(path, 0, ErrorKind::Io(e.to_string())))?;
    include_stack.push(canonical);

    let source = reader
        .read_to_string(path)
        .map_err(|e| TasmError::new(path, 0, ErrorKind::Io(e.to_string())))?;

    let mut lines = Vec::new();

    for line in parse_source(&source, path)? {
        let Some(Statement::Include(include_path)) = &line.statement else {
            lines.push(line);
            continue;
        };

        let target = path
            .parent()
            .unwrap_or(Path::new(""))
            .join(include_path);

        let target_canonical = reader
            .canonicalize(&target)
            .map_err(|e| TasmError::new(&line.file, line.line, ErrorKind::Io(e.to_string())))?;
        if include_stack.contains(&target_canonical) {
            return Err(TasmError::new(
                &line.file,
                line.line,
                ErrorKind::CyclicalInclude(target.display().to_string()),
            ));
        }

        lines.extend(parse_source_recursive(&target, include_stack, reader)?);
    }

    include_stack.pop();
    Ok(lines)
}

// ------------- unit tests -------------
