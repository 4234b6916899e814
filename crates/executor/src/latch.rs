//! Inter-stage pipeline latches.
//!
//! Each latch is a two-state value: `nop` (payload all zero, no
//! architectural effect downstream) or valid, with the payload defined by
//! the producing stage. A freshly reset latch is a bubble.

use mipsim_isa::{Address, MachineCode};

/// IF/ID latch: the fetched word and where it came from.
#[derive(Clone, Copy, Debug)]
pub struct IfId {
    pub nop: bool,
    /// Fetched instruction word.
    pub ir: MachineCode,
    /// Address the word was fetched from.
    pub ipc: Address,
    /// PC immediately after the fetch.
    pub npc: Address,
}

impl IfId {
    /// Turn the latch back into a bubble.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for IfId {
    fn default() -> Self {
        Self {
            nop: true,
            ir: 0,
            ipc: 0,
            npc: 0,
        }
    }
}

/// ID/EX latch: operands read in decode.
#[derive(Clone, Copy, Debug)]
pub struct IdEx {
    pub nop: bool,
    pub ir: MachineCode,
    pub ipc: Address,
    pub npc: Address,
    /// reg[rs]
    pub a: i32,
    /// reg[rt]
    pub b: i32,
    /// Sign-extended 16-bit immediate; zero for R-type.
    pub imm: i32,
    /// rd for R-type, rt otherwise.
    pub write_reg_addr: u32,
}

impl IdEx {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for IdEx {
    fn default() -> Self {
        Self {
            nop: true,
            ir: 0,
            ipc: 0,
            npc: 0,
            a: 0,
            b: 0,
            imm: 0,
            write_reg_addr: 0,
        }
    }
}

/// EX/MEM latch: ALU result, store operand and branch condition.
#[derive(Clone, Copy, Debug)]
pub struct ExMem {
    pub nop: bool,
    pub ir: MachineCode,
    pub ipc: Address,
    /// 64 bits wide so a full multiply result survives until write-back.
    pub alu_output: i64,
    pub b: i32,
    /// Branch condition, resolved when the latch reaches MEM.
    pub cond: bool,
    pub write_reg_addr: u32,
}

impl ExMem {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for ExMem {
    fn default() -> Self {
        Self {
            nop: true,
            ir: 0,
            ipc: 0,
            alu_output: 0,
            b: 0,
            cond: false,
            write_reg_addr: 0,
        }
    }
}

/// MEM/WB latch: value headed for the register file.
#[derive(Clone, Copy, Debug)]
pub struct MemWb {
    pub nop: bool,
    pub ir: MachineCode,
    pub ipc: Address,
    pub alu_output: i64,
    /// Load-memory data.
    pub lmd: i32,
    pub write_reg_addr: u32,
}

impl MemWb {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Default for MemWb {
    fn default() -> Self {
        Self {
            nop: true,
            ir: 0,
            ipc: 0,
            alu_output: 0,
            lmd: 0,
            write_reg_addr: 0,
        }
    }
}
