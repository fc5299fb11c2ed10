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

use tasm::assemble;
use tasm::errors::ErrorKind;
use tasm::file_reader::{AsmFileReader, MockFileReader};

const HEADER_LEN: usize = 8;
const BOOTSTRAP_LEN: usize = 7;

// Every program must define _kernel_start; tests that don't exercise the
// kernel half append this stub.
const KERNEL_STUB: &str = "section kernel\n_kernel_start:\n";

fn assemble_str(source: &str) -> Result<Vec<u8>, tasm::errors::TasmError> {
    let mut reader = MockFileReader::default();
    reader.add_file("test.tsm", source);
    assemble(Path::new("test.tsm"), &reader)
}

fn assemble_with_stub(source: &str) -> Result<Vec<u8>, tasm::errors::TasmError> {
    assemble_str(&format!("{source}{KERNEL_STUB}"))
}

fn header(image: &[u8]) -> (u32, u32) {
    let kernel = u32::from_le_bytes([image[0], image[1], image[2], image[3]]);
    let user = u32::from_le_bytes([image[4], image[5], image[6], image[7]]);
    (kernel, user)
}

// The user half, which follows the header and the kernel half.
fn user_half(image: &[u8]) -> &[u8] {
    let (kernel_len, _) = header(image);
    &image[HEADER_LEN + kernel_len as usize..]
}

#[test]
fn test_hlt_program() {
    let image = assemble_with_stub("section text\n_start:\nhlt\n").unwrap();

    let (kernel_len, user_len) = header(&image);
    // The kernel half is just its bootstrap jump.
    assert_eq!(kernel_len as usize, BOOTSTRAP_LEN);
    assert_eq!(user_len, 8);
    assert_eq!(image.len(), HEADER_LEN + BOOTSTRAP_LEN + 8);

    // Both bootstrap jumps target the entry label right behind themselves:
    // displacement 0.
    assert_eq!(
        &image[HEADER_LEN..HEADER_LEN + BOOTSTRAP_LEN],
        &[0x05, 0x00, 16, 0x00, 0x00, 0x00, 0x00]
    );
    let user = user_half(&image);
    assert_eq!(
        &user[..BOOTSTRAP_LEN],
        &[0x05, 0x00, 16, 0x00, 0x00, 0x00, 0x00]
    );
    assert_eq!(user[7], 0x15); // hlt
}

#[test]
fn test_mov_immediate_program() {
    let image = assemble_with_stub("section text\n_start:\nmov CL, 0x22\nhlt\n").unwrap();

    let text = &user_half(&image)[BOOTSTRAP_LEN..];
    assert_eq!(text[0], 0x30); // MOV
    assert_eq!(text[1], 0x00); // MOD: reg8 from immediate
    assert_eq!(text[2], 0x0B); // CL
    assert_eq!(text[3], 0x22);
    assert_eq!(text[4], 0x15); // hlt
}

#[test]
fn test_tight_loop_displacement() {
    let image = assemble_with_stub("section text\n_start:\nloop: jmp loop\n").unwrap();

    let jmp = &user_half(&image)[BOOTSTRAP_LEN..];
    assert_eq!(jmp.len(), 7);
    // The displacement base is the IP after the instruction, so a
    // self-jump is exactly -7.
    assert_eq!(jmp, &[0x05, 0x00, 16, 0xF9, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn test_data_segment_layout() {
    let image =
        assemble_with_stub("section data\nu16 v 0x1234\nsection text\n_start:\nmov AX, 0\n")
            .unwrap();

    let (kernel_len, user_len) = header(&image);
    assert_eq!(kernel_len as usize, BOOTSTRAP_LEN);
    // 7 bootstrap + 5 mov + 2 data bytes.
    assert_eq!(user_len, 14);
    assert_eq!(&image[image.len() - 2..], &[0x34, 0x12]);
}

#[test]
fn test_data_label_resolves_behind_text() {
    let image = assemble_with_stub(
        "section text\n_start:\nmov EAX, msg\nsection data\nmsg: strz \"hi\"\n",
    )
    .unwrap();

    let text = user_half(&image);
    // mov EAX, msg => MOD 6, EAX, IP base, then the displacement:
    // len(t_text)=15 plus offset 0, minus base IP 15 => 0.
    assert_eq!(&text[7..15], &[0x30, 0x06, 0x00, 16, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(&text[15..18], b"hi\0");
}

#[test]
fn test_kernel_image_precedes_user_image() {
    let source = "section kernel\n_kernel_start:\nsysret\nsection text\n_start:\nhlt\n";
    let image = assemble_str(source).unwrap();

    let (kernel_len, user_len) = header(&image);
    assert_eq!(kernel_len, 8);
    assert_eq!(user_len, 8);
    assert_eq!(image[HEADER_LEN + 7], 0x02); // kernel sysret
    assert_eq!(image[HEADER_LEN + 15], 0x15); // user hlt
    assert_eq!(image.len(), HEADER_LEN + 16);
}

#[test]
fn test_setsyscall_and_uret() {
    let source = "section kernel\n\
                  _kernel_start:\n\
                  setsyscall 1, handler\n\
                  uret @0x100, @0x200\n\
                  handler:\n\
                  sysret\n\
                  section text\n\
                  _start:\n\
                  hlt\n";
    let image = assemble_str(source).unwrap();

    let kernel = &image[HEADER_LEN..];
    // setsyscall at 7..14: opcode, number, IP, disp to handler at 23
    // (23 - 14 = 9).
    assert_eq!(&kernel[7..14], &[0x17, 1, 16, 9, 0, 0, 0]);
    assert_eq!(&kernel[14..18], &[0x16, 0x00, 0x01, 0x00]);
}

#[test]
fn test_forward_reference_is_patched() {
    let source = "section text\n_start:\njz done\nnop\ndone: hlt\n";
    let image = assemble_with_stub(source).unwrap();

    let text = user_half(&image);
    // jz at 7..14, nop at 14, done at 15: displacement 15 - 14 = 1.
    assert_eq!(&text[7..14], &[0x06, 0x00, 16, 1, 0, 0, 0]);
}

#[test]
fn test_signed_range_boundaries() {
    assert!(assemble_with_stub("section text\n_start:\nsadd AL, 127\nhlt\n").is_ok());
    assert!(assemble_with_stub("section text\n_start:\nsadd AL, -128\nhlt\n").is_ok());

    let err = assemble_with_stub("section text\n_start:\nsadd AL, 128\nhlt\n").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::SignedOutOfRange { bits: 8, value: 128 }
    );
    assert_eq!(err.line, 3);

    let err = assemble_with_stub("section text\n_start:\nsadd AL, -129\nhlt\n").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::SignedOutOfRange {
            bits: 8,
            value: -129
        }
    );
}

#[test]
fn test_unsigned_range_boundaries() {
    assert!(assemble_with_stub("section text\n_start:\nmov AL, 255\nhlt\n").is_ok());
    assert!(assemble_with_stub("section text\n_start:\nmov AL, 0\nhlt\n").is_ok());
    assert!(assemble_with_stub("section text\n_start:\nmov AL, 256\nhlt\n").is_err());
}

#[test]
fn test_wrong_operand_count_is_rejected() {
    let err = assemble_str("section text\n_start:\nmov EAX, EBX, ECX\n").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::ArgCount {
            mnemonic: "MOV".to_string(),
            count: 3
        }
    );
}

#[test]
fn test_mismatched_register_widths_are_rejected() {
    let err = assemble_str("section text\n_start:\nmov AX, EAX\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::ArgFormat("MOV".to_string()));
}

#[test]
fn test_duplicate_label_within_half_is_rejected() {
    let err = assemble_str("section text\n_start:\nx: nop\nx: nop\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateLabel("x".to_string()));
    assert_eq!(err.line, 4);
}

#[test]
fn test_same_label_in_user_and_kernel() {
    let source = "section text\n_start:\nx: nop\nsection kernel\n_kernel_start:\nx: sysret\n";
    assert!(assemble_str(source).is_ok());
}

#[test]
fn test_unresolved_label_reports_reference_line() {
    let source = "section text\n_start:\njmp nowhere\nnop\nnop\n";
    let err = assemble_with_stub(source).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnresolvedLabel {
            segment: "text",
            name: "nowhere".to_string()
        }
    );
    assert_eq!(err.file, "test.tsm");
    assert_eq!(err.line, 3);
}

#[test]
fn test_missing_kernel_start_is_rejected() {
    // The kernel bootstrap jump is seeded before any source is read, so a
    // program without a kernel section still needs _kernel_start.
    let err = assemble_str("section text\n_start:\nhlt\n").unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnresolvedLabel {
            segment: "kernel",
            name: "_kernel_start".to_string()
        }
    );
    // The reference is the pre-seeded bootstrap, not end of input.
    assert_eq!(err.line, 0);
}

#[test]
fn test_kernel_section_without_kernel_start_is_rejected() {
    let source = "section text\n_start:\nhlt\nsection kernel\nkmain: sysret\n";
    let err = assemble_str(source).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::UnresolvedLabel {
            segment: "kernel",
            name: "_kernel_start".to_string()
        }
    );
}

#[test]
fn test_empty_program_is_rejected() {
    let err = assemble_with_stub("section text\n_start:\n").unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyProgram);
}

#[test]
fn test_error_display_matches_cli_format() {
    let err = assemble_str("section text\n_start:\nfrob\n").unwrap_err();
    assert_eq!(
        err.to_string(),
        "TASMError: test.tsm:3\n    Invalid instruction: frob"
    );
}

#[test]
fn test_include_splices_lines() {
    let mut reader = MockFileReader::default();
    reader.add_file(
        "main.tsm",
        "section text\n_start:\ncall init\nhlt\ninclude lib/init.tsm\n\
         section kernel\n_kernel_start:\n",
    );
    reader.add_file("lib/init.tsm", "init:\nret\n");

    let image = assemble(Path::new("main.tsm"), &reader).unwrap();

    let text = user_half(&image);
    // call at 7..14 targets init at 15: displacement 1; ret follows.
    assert_eq!(&text[7..14], &[0x03, 0x00, 16, 1, 0, 0, 0]);
    assert_eq!(text[14], 0x15); // hlt
    assert_eq!(text[15], 0x04); // ret
}

#[test]
fn test_include_cycle_is_rejected() {
    let mut reader = MockFileReader::default();
    reader.add_file("a.tsm", "section text\n_start:\ninclude b.tsm\n");
    reader.add_file("b.tsm", "include c.tsm\n");
    reader.add_file("c.tsm", "include a.tsm\n");

    let err = assemble(Path::new("a.tsm"), &reader).unwrap_err();
    assert_eq!(err.file, "c.tsm");
    assert_eq!(err.line, 1);
    assert!(matches!(err.kind, ErrorKind::CyclicalInclude(_)));
}

#[test]
fn test_error_position_inside_included_file() {
    let mut reader = MockFileReader::default();
    reader.add_file("main.tsm", "section text\n_start:\nhlt\ninclude sub.tsm\n");
    reader.add_file("sub.tsm", "nop\nfrob\n");

    let err = assemble(Path::new("main.tsm"), &reader).unwrap_err();
    assert_eq!(err.file, "sub.tsm");
    assert_eq!(err.line, 2);
}

#[test]
fn test_include_with_real_files() {
    let dir = tempfile::tempdir().unwrap();
    let main = dir.path().join("main.tsm");
    let lib_dir = dir.path().join("lib");
    std::fs::create_dir(&lib_dir).unwrap();
    std::fs::write(
        &main,
        "section text\n_start:\nhlt\ninclude lib/io.tsm\nsection kernel\n_kernel_start:\n",
    )
    .unwrap();
    std::fs::write(lib_dir.join("io.tsm"), "io_wait:\nret\n").unwrap();

    let image = assemble(&main, &AsmFileReader).unwrap();
    let (kernel_len, user_len) = header(&image);
    assert_eq!(kernel_len as usize, BOOTSTRAP_LEN);
    assert_eq!(user_len, 9); // bootstrap + hlt + ret
}

#[test]
fn test_comments_and_strings() {
    let source = "section data\n\
                  msg: strz \"semi ; colon\" ; trailing comment\n\
                  section text ; switch back\n\
                  _start:\n\
                  hlt\n";
    let image = assemble_with_stub(source).unwrap();

    let data = &image[image.len() - 13..];
    assert_eq!(data, b"semi ; colon\0");
}

#[test]
fn test_push_pop_round_trip_bytes() {
    let source = "section text\n_start:\npushw AX\npopw BX\npop\nhlt\n";
    let image = assemble_with_stub(source).unwrap();

    let text = &user_half(&image)[BOOTSTRAP_LEN..];
    assert_eq!(&text[0..3], &[0x33, 0x02, 1]); // pushw AX
    assert_eq!(&text[3..6], &[0x34, 0x02, 5]); // popw BX
    assert_eq!(&text[6..8], &[0x34, 0x01]); // pop (discard byte)
    assert_eq!(text[8], 0x15);
}

#[test]
fn test_all_jump_predicates_share_opcode_with_inverse_bit() {
    let source = "section text\n_start:\ntarget:\n\
                  jz target\njnz target\njc target\njnc target\n\
                  jo target\njno target\njs target\njns target\n\
                  jp target\njnp target\n";
    let image = assemble_with_stub(source).unwrap();

    let text = &user_half(&image)[BOOTSTRAP_LEN..];
    let expected: [(u8, u8); 10] = [
        (0x06, 0x00),
        (0x06, 0x02),
        (0x07, 0x00),
        (0x07, 0x02),
        (0x08, 0x00),
        (0x08, 0x02),
        (0x09, 0x00),
        (0x09, 0x02),
        (0x0A, 0x00),
        (0x0A, 0x02),
    ];
    for (i, (op, mod_byte)) in expected.iter().enumerate() {
        let inst = &text[i * 7..i * 7 + 7];
        assert_eq!(inst[0], *op, "opcode of predicate {i}");
        assert_eq!(inst[1], *mod_byte, "MOD of predicate {i}");
    }
}
