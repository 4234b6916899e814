//! Integration tests for the mipsim pipelined MIPS simulator.
//!
//! This crate exercises the complete flow:
//! 1. Assemble a MIPS source program
//! 2. Execute it cycle by cycle on the five-stage pipeline
//! 3. Inspect registers, memory, the trace stream and the final report

pub mod programs;

#[cfg(test)]
mod encode;
