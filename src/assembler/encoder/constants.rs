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

use crate::ast::InstKind;

// control instructions
pub const NOP_OPCODE: u8 = 0x00;
pub const SYSCALL_OPCODE: u8 = 0x01;
pub const SYSRET_OPCODE: u8 = 0x02;
pub const CALL_OPCODE: u8 = 0x03;
pub const RET_OPCODE: u8 = 0x04;
pub const JMP_OPCODE: u8 = 0x05;
pub const JZ_OPCODE: u8 = 0x06;
pub const JC_OPCODE: u8 = 0x07;
pub const JO_OPCODE: u8 = 0x08;
pub const JS_OPCODE: u8 = 0x09;
pub const JP_OPCODE: u8 = 0x0A;
pub const DBG_OPCODE: u8 = 0x0B;

// kernel protected instructions
pub const HLT_OPCODE: u8 = 0x15;
pub const URET_OPCODE: u8 = 0x16;
pub const SETSYSCALL_OPCODE: u8 = 0x17;

// register & memory instructions
pub const MOV_OPCODE: u8 = 0x30;
pub const LB_OPCODE: u8 = 0x31;
pub const SB_OPCODE: u8 = 0x32;
pub const PUSH_OPCODE: u8 = 0x33;
pub const POP_OPCODE: u8 = 0x34;

// bitwise & arithmetic instructions
pub const CMP_OPCODE: u8 = 0x61;
pub const AND_OPCODE: u8 = 0x62;
pub const OR_OPCODE: u8 = 0x63;
pub const XOR_OPCODE: u8 = 0x64;
pub const NOT_OPCODE: u8 = 0x65;
pub const ADD_OPCODE: u8 = 0x6A;
pub const SUB_OPCODE: u8 = 0x6B;
pub const MUL_OPCODE: u8 = 0x6C;

// MOD/control byte bit positions
pub const SHIFT_SIGN: u8 = 3;
pub const SHIFT_ADDR_MODE: u8 = 4;
/// Distinguishes e.g. jz from jnz under the shared opcode.
pub const INVERSE_FLAG: u8 = 2;

pub const ADDR_MODE_RELATIVE: u8 = 0;
pub const ADDR_MODE_ABSOLUTE: u8 = 1;

/// Opcode for a mnemonic. Predicate pairs (jz/jnz, …) and signed/unsigned
/// pairs (add/sadd, …) share one opcode; the MOD byte tells them apart.
pub fn opcode(kind: InstKind) -> u8 {
    use InstKind::*;
    match kind {
        Nop => NOP_OPCODE,
        Syscall => SYSCALL_OPCODE,
        Sysret => SYSRET_OPCODE,
        Call => CALL_OPCODE,
        Ret => RET_OPCODE,
        Jmp => JMP_OPCODE,
        Jz | Jnz => JZ_OPCODE,
        Jc | Jnc => JC_OPCODE,
        Jo | Jno => JO_OPCODE,
        Js | Jns => JS_OPCODE,
        Jp | Jnp => JP_OPCODE,
        Dbg => DBG_OPCODE,
        Hlt => HLT_OPCODE,
        Uret => URET_OPCODE,
        SetSyscall => SETSYSCALL_OPCODE,
        Mov => MOV_OPCODE,
        Lb | Lw | Ldw => LB_OPCODE,
        Sb | Sw | Sdw => SB_OPCODE,
        Push | Pushw | Pushdw => PUSH_OPCODE,
        Pop | Popw | Popdw => POP_OPCODE,
        Cmp | Scmp => CMP_OPCODE,
        And => AND_OPCODE,
        Or => OR_OPCODE,
        Xor => XOR_OPCODE,
        Not => NOT_OPCODE,
        Add | Sadd => ADD_OPCODE,
        Sub | Ssub => SUB_OPCODE,
        Mul | Smul => MUL_OPCODE,
    }
}
