//! mipsim-isa: ISA model for the pipelined MIPS simulator.
//!
//! This crate provides:
//! - Bit-field packing/unpacking over the 32-bit instruction word
//! - Opcode and funct constants for the supported instruction subset
//! - The canonical register-name table
//! - Typed containers for the text (instruction) and data segments

pub mod field;
pub mod op;
pub mod reg;
pub mod segment;

pub use field::{get_field, set_field, Field};
pub use op::InstrType;
pub use reg::{register_index, register_name, NUM_REGISTERS, REGISTER_NAMES};
pub use segment::{DataSegment, Instruction, TextSegment};

/// Unsigned 32-bit machine word.
pub type Word = u32;
/// Byte address in either segment.
pub type Address = u32;
/// Encoded instruction word.
pub type MachineCode = u32;
