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

use crate::assembler::encoder::constants::opcode;
use crate::assembler::encoder::utility_functions::arg_count;
use crate::ast::Instruction;
use crate::errors::ErrorKind;

/// Zero-operand controls: a single opcode byte, no MOD byte.
pub fn encode_control(inst: &Instruction, text: &mut Vec<u8>) -> Result<(), ErrorKind> {
    if !inst.operands.is_empty() {
        return Err(arg_count(inst.kind, inst.operands.len()));
    }
    text.push(opcode(inst.kind));
    Ok(())
}
