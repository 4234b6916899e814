//! Test programs for the pipeline simulator.

use mipsim_assembler::Assembler;
use mipsim_isa::TextSegment;

/// Assemble source lines at the default base address.
pub fn assemble(lines: &[&str]) -> TextSegment {
    let mut assembler = Assembler::new();
    assembler
        .assemble(lines.iter().copied())
        .expect("test program assembles");
    assembler.into_text_segment()
}

/// A single immediate add: `$t0 = 5`.
pub fn single_addi() -> TextSegment {
    assemble(&["addi $t0, $zero, 0x5"])
}

/// Build a 32-bit constant in `$t0` the classic way.
///
/// ```asm
/// lui $t0, 0x1234         # t0 = 0x12340000
/// ori $t0, $t0, 0x5678    # t0 = 0x12345678 (stalls on t0)
/// ```
pub fn load_upper_then_or() -> TextSegment {
    assemble(&["lui $t0, 0x1234", "ori $t0, $t0, 0x5678"])
}

/// A taken branch over the sequential slot.
///
/// ```asm
/// beq $zero, $zero, 0x1   # taken, target = NPC + 4
/// addi $s0, $zero, 0x7    # sequential slot, never fetched
/// addi $s1, $zero, 0x2    # branch target
/// addi $t1, $zero, 0x1
/// ```
pub fn branch_over_sequential_slot() -> TextSegment {
    assemble(&[
        "beq $zero, $zero, 0x1",
        "addi $s0, $zero, 0x7",
        "addi $s1, $zero, 0x2",
        "addi $t1, $zero, 0x1",
    ])
}
