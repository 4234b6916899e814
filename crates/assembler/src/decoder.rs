//! Per-mnemonic instruction decoders.
//!
//! Each supported mnemonic maps to exactly one decoder: the instruction
//! type, its opcode (plus funct for R-type), a regex template for the
//! statement shape, and the ISA field each capture group fills. Operand
//! separators are one or more of whitespace and comma; `lw`/`sw` also
//! accept `(` and `)` around the base register.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use mipsim_isa::op::{funct, opcode};
use mipsim_isa::{Field, InstrType};

/// op $rd, $rs, $rt
const THREE_REG: &str = r"^(\w+)\s+\$(\w+)[\s,]+\$(\w+)[\s,]+\$(\w+)$";
/// op $rs, $rt
const TWO_REG: &str = r"^(\w+)\s+\$(\w+)[\s,]+\$(\w+)$";
/// op $rd, $rt, shamt / op $rt, $rs, imm / op $rs, $rt, imm
const TWO_REG_IMM: &str = r"^(\w+)\s+\$(\w+)[\s,]+\$(\w+)[\s,]+(\w+)$";
/// op $rt, imm
const ONE_REG_IMM: &str = r"^(\w+)\s+\$(\w+)[\s,]+(\w+)$";
/// op $rt, imm($rs)
const BASE_OFFSET: &str = r"^(\w+)\s+\$(\w+)[\s,]+(\w+)[\s(]+\$(\w+)[\s)]*$";

pub(crate) struct Decoder {
    pub ty: InstrType,
    pub opcode: u32,
    pub funct: u32,
    pub pattern: Regex,
    /// Field filled by capture group `i + 2` (group 1 is the mnemonic).
    pub operands: &'static [Field],
}

fn r_type(funct: u32, template: &str, operands: &'static [Field]) -> Decoder {
    Decoder {
        ty: InstrType::R,
        opcode: opcode::R_COMMON,
        funct,
        pattern: Regex::new(template).expect("decoder template"),
        operands,
    }
}

fn i_type(opcode: u32, template: &str, operands: &'static [Field]) -> Decoder {
    Decoder {
        ty: InstrType::I,
        opcode,
        funct: 0,
        pattern: Regex::new(template).expect("decoder template"),
        operands,
    }
}

pub(crate) static DECODERS: Lazy<HashMap<&'static str, Decoder>> = Lazy::new(|| {
    use Field::{Imm, Rd, Rs, Rt, Shamt};

    let mut table = HashMap::new();

    for (mnemonic, f) in [
        ("add", funct::ADD),
        ("sub", funct::SUB),
        ("and", funct::AND),
        ("or", funct::OR),
        ("mul", funct::MUL),
    ] {
        table.insert(mnemonic, r_type(f, THREE_REG, &[Rd, Rs, Rt]));
    }
    table.insert("mult", r_type(funct::MULT, TWO_REG, &[Rs, Rt]));
    table.insert("sll", r_type(funct::SLL, TWO_REG_IMM, &[Rd, Rt, Shamt]));
    table.insert("srl", r_type(funct::SRL, TWO_REG_IMM, &[Rd, Rt, Shamt]));

    for (mnemonic, op) in [
        ("addi", opcode::ADDI),
        ("andi", opcode::ANDI),
        ("ori", opcode::ORI),
        ("slti", opcode::SLTI),
        ("sltiu", opcode::SLTIU),
    ] {
        table.insert(mnemonic, i_type(op, TWO_REG_IMM, &[Rt, Rs, Imm]));
    }
    table.insert("beq", i_type(opcode::BEQ, TWO_REG_IMM, &[Rs, Rt, Imm]));
    table.insert("lui", i_type(opcode::LUI, ONE_REG_IMM, &[Rt, Imm]));
    table.insert("lw", i_type(opcode::LW, BASE_OFFSET, &[Rt, Imm, Rs]));
    table.insert("sw", i_type(opcode::SW, BASE_OFFSET, &[Rt, Imm, Rs]));

    table
});
