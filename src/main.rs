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

use anyhow::{Context, Result, bail};
use clap::Parser as clap_parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tasm::assemble;
use tasm::file_reader::AsmFileReader;

#[derive(clap_parser)]
#[clap(version = "0.1.0", about = "Assembler for the TPU instruction set")]
struct Opts {
    /// Assembly source file (.tsm)
    input: PathBuf,
    /// Program image to write (.tpu)
    output: PathBuf,
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

fn run() -> Result<()> {
    let opts: Opts = Opts::parse();

    if !has_extension(&opts.input, "tsm") {
        bail!("Invalid input file, must have .tsm extension");
    }
    if !has_extension(&opts.output, "tpu") {
        bail!("Invalid output file, must have .tpu extension");
    }

    let reader = AsmFileReader;
    let image = assemble(&opts.input, &reader)?;

    // The image is only written once assembly fully succeeded, so a failed
    // run never leaves a partial output file behind.
    fs::write(&opts.output, image)
        .with_context(|| format!("Failed to write output file: {}", opts.output.display()))?;
    println!("Successfully built TPU image at: {}", opts.output.display());

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
