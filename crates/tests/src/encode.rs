//! Assembler encoding properties, checked field by field.

use mipsim_assembler::{Assembler, TEXT_BASE};
use mipsim_isa::op::{funct, opcode};
use mipsim_isa::{get_field, register_index, Field, TextSegment};

use crate::programs;

fn first_word(lines: &[&str]) -> u32 {
    programs::assemble(lines).binary_at(TEXT_BASE)
}

#[test]
fn r_type_words_carry_the_table_funct() {
    for (line, f) in [
        ("add $t0, $t1, $t2", funct::ADD),
        ("sub $t0, $t1, $t2", funct::SUB),
        ("and $t0, $t1, $t2", funct::AND),
        ("or $t0, $t1, $t2", funct::OR),
        ("mul $t0, $t1, $t2", funct::MUL),
    ] {
        let word = first_word(&[line]);
        assert_eq!(get_field(word, Field::Opcode), opcode::R_COMMON, "{line}");
        assert_eq!(get_field(word, Field::Funct), f, "{line}");
        assert_eq!(get_field(word, Field::Rd), register_index("t0").unwrap());
        assert_eq!(get_field(word, Field::Rs), register_index("t1").unwrap());
        assert_eq!(get_field(word, Field::Rt), register_index("t2").unwrap());
    }
}

#[test]
fn i_type_words_carry_the_table_opcode() {
    for (line, op) in [
        ("addi $t0, $t1, 1f", opcode::ADDI),
        ("andi $t0, $t1, 1f", opcode::ANDI),
        ("ori $t0, $t1, 1f", opcode::ORI),
        ("slti $t0, $t1, 1f", opcode::SLTI),
        ("sltiu $t0, $t1, 1f", opcode::SLTIU),
    ] {
        let word = first_word(&[line]);
        assert_eq!(get_field(word, Field::Opcode), op, "{line}");
        assert_eq!(get_field(word, Field::Rt), register_index("t0").unwrap());
        assert_eq!(get_field(word, Field::Rs), register_index("t1").unwrap());
        assert_eq!(get_field(word, Field::Imm), 0x1F, "{line}");
    }
}

#[test]
fn immediates_keep_the_low_sixteen_bits() {
    let word = first_word(&["addi $t0, $zero, ffff"]);
    assert_eq!(get_field(word, Field::Imm), 0xFFFF);
}

#[test]
fn shift_amounts_keep_the_low_five_bits() {
    let word = first_word(&["srl $t0, $t1, 1f"]);
    assert_eq!(get_field(word, Field::Funct), funct::SRL);
    assert_eq!(get_field(word, Field::Shamt), 0x1F);
}

#[test]
fn branch_operand_order_is_rs_then_rt() {
    let word = first_word(&["beq $a0, $a1, 8"]);
    assert_eq!(get_field(word, Field::Opcode), opcode::BEQ);
    assert_eq!(get_field(word, Field::Rs), register_index("a0").unwrap());
    assert_eq!(get_field(word, Field::Rt), register_index("a1").unwrap());
    assert_eq!(get_field(word, Field::Imm), 0x8);
}

#[test]
fn memory_operand_order_is_rt_imm_rs() {
    for (line, op) in [("lw $t0, 4($gp)", opcode::LW), ("sw $t0, 4($gp)", opcode::SW)] {
        let word = first_word(&[line]);
        assert_eq!(get_field(word, Field::Opcode), op, "{line}");
        assert_eq!(get_field(word, Field::Rt), register_index("t0").unwrap());
        assert_eq!(get_field(word, Field::Rs), register_index("gp").unwrap());
        assert_eq!(get_field(word, Field::Imm), 0x4);
    }
}

#[test]
fn lui_word_matches_reference_encoding() {
    assert_eq!(first_word(&["lui $t0, 0x1234"]), 0x3C08_1234);
}

#[test]
fn accepted_lines_pack_from_the_base_address() {
    let text: TextSegment = programs::assemble(&[
        "addi $t0, $zero, 1",
        "addi $t1, $zero, 2",
        "addi $t2, $zero, 3",
    ]);
    for (i, (address, _)) in text.iter().enumerate() {
        assert_eq!(address, TEXT_BASE + 4 * i as u32);
    }
}

#[test]
fn skipped_lines_consume_no_addresses() {
    let mut assembler = Assembler::new();
    assembler
        .assemble(
            [
                "// header comment",
                "",
                "label:",
                "addi $t0, $zero, 1",
                "jr $ra",
                "addi $t1, $zero, 2",
            ]
            .into_iter(),
        )
        .unwrap();

    let text = assembler.text_segment();
    assert_eq!(text.len(), 2);
    assert_eq!(text.last_address(), Some(TEXT_BASE + 4));
}
