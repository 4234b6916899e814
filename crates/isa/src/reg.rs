//! The canonical MIPS register-name table.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Number of architectural registers.
pub const NUM_REGISTERS: usize = 32;

/// Canonical register names, indexed by register number.
///
/// Register 0 (`zero`) is hard-wired: writes to it must be discarded.
pub const REGISTER_NAMES: [&str; NUM_REGISTERS] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", //
    "t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", //
    "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", //
    "t8", "t9", "k0", "k1", "gp", "sp", "fp", "ra",
];

static NAME_TO_INDEX: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    REGISTER_NAMES
        .iter()
        .enumerate()
        .map(|(index, &name)| (name, index as u32))
        .collect()
});

/// Look up a register number by its canonical name.
pub fn register_index(name: &str) -> Option<u32> {
    NAME_TO_INDEX.get(name).copied()
}

/// The canonical name of a register number.
///
/// # Panics
/// Panics if `index` is out of range.
pub fn register_name(index: u32) -> &'static str {
    REGISTER_NAMES[index as usize]
}
