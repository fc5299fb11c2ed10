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

use std::path::PathBuf;

// The discriminant is the register's wire encoding; the order of this list
// is fixed by the ISA and must not change.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Register {
    Eax = 0,
    Ax = 1,
    Ah = 2,
    Al = 3,
    Ebx = 4,
    Bx = 5,
    Bh = 6,
    Bl = 7,
    Ecx = 8,
    Cx = 9,
    Ch = 10,
    Cl = 11,
    Edx = 12,
    Dx = 13,
    Dh = 14,
    Dl = 15,
    Ip = 16,
    Esp = 17,
    Sp = 18,
    Ebp = 19,
    Bp = 20,
    Esi = 21,
    Si = 22,
    Edi = 23,
    Di = 24,
    Rp = 25,
}

impl Register {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_name(name: &str) -> Option<Register> {
        use Register::*;
        match name {
            "EAX" => Some(Eax),
            "AX" => Some(Ax),
            "AH" => Some(Ah),
            "AL" => Some(Al),
            "EBX" => Some(Ebx),
            "BX" => Some(Bx),
            "BH" => Some(Bh),
            "BL" => Some(Bl),
            "ECX" => Some(Ecx),
            "CX" => Some(Cx),
            "CH" => Some(Ch),
            "CL" => Some(Cl),
            "EDX" => Some(Edx),
            "DX" => Some(Dx),
            "DH" => Some(Dh),
            "DL" => Some(Dl),
            "IP" => Some(Ip),
            "ESP" => Some(Esp),
            "SP" => Some(Sp),
            "EBP" => Some(Ebp),
            "BP" => Some(Bp),
            "ESI" => Some(Esi),
            "SI" => Some(Si),
            "EDI" => Some(Edi),
            "DI" => Some(Di),
            "RP" => Some(Rp),
            _ => None,
        }
    }
}

// Represents all possible forms an operand to an instruction can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Imm(u64),
    SImm(i64),
    Reg8(Register),
    Reg16(Register),
    Reg32(Register),
    Addr(u32),                                // e.g., @0x2020
    Rel32 { base: Register, offset: i32 },    // e.g., [EBX + 0x10] or [IP - 2]
    Label(String),                            // e.g., my_label
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Section {
    Text,
    Data,
    Kernel,
    KernelData,
}

impl Section {
    pub fn from_name(name: &str) -> Option<Section> {
        match name {
            "text" => Some(Section::Text),
            "data" => Some(Section::Data),
            "kernel" => Some(Section::Kernel),
            "kernel-data" => Some(Section::KernelData),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Section::Text => "text",
            Section::Data => "data",
            Section::Kernel => "kernel",
            Section::KernelData => "kernel-data",
        }
    }

    /// Sections that host instructions.
    pub fn is_text(self) -> bool {
        matches!(self, Section::Text | Section::Kernel)
    }

    /// Sections that host data directives.
    pub fn is_data(self) -> bool {
        matches!(self, Section::Data | Section::KernelData)
    }

    /// Whether this section belongs to the kernel half of the image.
    pub fn is_kernel(self) -> bool {
        matches!(self, Section::Kernel | Section::KernelData)
    }
}

/// The payload of a data directive. Range checks happen at emission time so
/// that out-of-range values report through the same immediate-width errors
/// the encoder uses.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    U8(u64),
    U16(u64),
    U32(u64),
    S8(i64),
    S16(i64),
    S32(i64),
    Str(Vec<u8>),
    StrZ(Vec<u8>),
    Space(u64),
}

// A data directive line: `[label:] <datatype> [name] <literal>`. Both the
// line label and the directive name define a data label at the directive's
// offset.
#[derive(Debug, Clone, PartialEq)]
pub struct DataDirective {
    pub name: Option<String>,
    pub value: DataValue,
}

// Every mnemonic of the ISA. Operand shapes are validated by the encoder,
// which owns the MOD-byte composition rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InstKind {
    Nop,
    Syscall,
    Sysret,
    Call,
    Ret,
    Jmp,
    Jz,
    Jnz,
    Jc,
    Jnc,
    Jo,
    Jno,
    Js,
    Jns,
    Jp,
    Jnp,
    Dbg,
    Hlt,
    Uret,
    SetSyscall,
    Mov,
    Lb,
    Lw,
    Ldw,
    Sb,
    Sw,
    Sdw,
    Push,
    Pushw,
    Pushdw,
    Pop,
    Popw,
    Popdw,
    Cmp,
    Scmp,
    And,
    Or,
    Xor,
    Add,
    Sadd,
    Sub,
    Ssub,
    Mul,
    Smul,
    Not,
}

impl InstKind {
    pub fn from_mnemonic(mnemonic: &str) -> Option<InstKind> {
        use InstKind::*;
        match mnemonic {
            "nop" => Some(Nop),
            "syscall" => Some(Syscall),
            "sysret" => Some(Sysret),
            "call" => Some(Call),
            "ret" => Some(Ret),
            "jmp" => Some(Jmp),
            "jz" => Some(Jz),
            "jnz" => Some(Jnz),
            "jc" => Some(Jc),
            "jnc" => Some(Jnc),
            "jo" => Some(Jo),
            "jno" => Some(Jno),
            "js" => Some(Js),
            "jns" => Some(Jns),
            "jp" => Some(Jp),
            "jnp" => Some(Jnp),
            "dbg" => Some(Dbg),
            "hlt" => Some(Hlt),
            "uret" => Some(Uret),
            "setsyscall" => Some(SetSyscall),
            "mov" => Some(Mov),
            "lb" => Some(Lb),
            "lw" => Some(Lw),
            "ldw" => Some(Ldw),
            "sb" => Some(Sb),
            "sw" => Some(Sw),
            "sdw" => Some(Sdw),
            "push" => Some(Push),
            "pushw" => Some(Pushw),
            "pushdw" => Some(Pushdw),
            "pop" => Some(Pop),
            "popw" => Some(Popw),
            "popdw" => Some(Popdw),
            "cmp" => Some(Cmp),
            "scmp" => Some(Scmp),
            "and" => Some(And),
            "or" => Some(Or),
            "xor" => Some(Xor),
            "add" => Some(Add),
            "sadd" => Some(Sadd),
            "sub" => Some(Sub),
            "ssub" => Some(Ssub),
            "mul" => Some(Mul),
            "smul" => Some(Smul),
            "not" => Some(Not),
            _ => None,
        }
    }

    /// The mnemonic as written in source; error messages upper-case it.
    pub fn mnemonic(self) -> &'static str {
        use InstKind::*;
        match self {
            Nop => "nop",
            Syscall => "syscall",
            Sysret => "sysret",
            Call => "call",
            Ret => "ret",
            Jmp => "jmp",
            Jz => "jz",
            Jnz => "jnz",
            Jc => "jc",
            Jnc => "jnc",
            Jo => "jo",
            Jno => "jno",
            Js => "js",
            Jns => "jns",
            Jp => "jp",
            Jnp => "jnp",
            Dbg => "dbg",
            Hlt => "hlt",
            Uret => "uret",
            SetSyscall => "setsyscall",
            Mov => "mov",
            Lb => "lb",
            Lw => "lw",
            Ldw => "ldw",
            Sb => "sb",
            Sw => "sw",
            Sdw => "sdw",
            Push => "push",
            Pushw => "pushw",
            Pushdw => "pushdw",
            Pop => "pop",
            Popw => "popw",
            Popdw => "popdw",
            Cmp => "cmp",
            Scmp => "scmp",
            And => "and",
            Or => "or",
            Xor => "xor",
            Add => "add",
            Sadd => "sadd",
            Sub => "sub",
            Ssub => "ssub",
            Mul => "mul",
            Smul => "smul",
            Not => "not",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub kind: InstKind,
    pub operands: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Expanded away during parsing; the assembler never sees one.
    Include(PathBuf),
    Section(Section),
    Data(DataDirective),
    Instruction(Instruction),
}

// A single line of source, which can have a label, a statement, or both.
#[derive(Debug, Clone)]
pub struct SourceLine {
    pub file: PathBuf,
    pub line: usize,
    pub label: Option<String>,
    pub statement: Option<Statement>,
}
