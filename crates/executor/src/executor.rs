//! The five-stage pipeline executor.
//!
//! One call to [`Executor::step`] advances the pipeline a single cycle.
//! Stages run in reverse order (WB, MEM, EX, ID, IF) so every stage reads
//! the latch its upstream neighbor produced last cycle and overwrites its
//! own output latch in place; no shadow copies are needed. Reordering the
//! stage calls without snapshotting all four latches first would change
//! observable behavior.

use std::io::{self, Write};

use tracing::debug;

use mipsim_isa::op::{funct, opcode};
use mipsim_isa::{get_field, Address, DataSegment, Field, TextSegment, NUM_REGISTERS};

use crate::latch::{ExMem, IdEx, IfId, MemWb};
use crate::monitor::{Monitor, Stage};
use crate::report::ExecutionReport;

/// Termination policy for [`Executor::run`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunLimit {
    /// Stop once this many instructions have been fetched.
    Instructions(u32),
    /// Stop once this many cycles have completed.
    Cycles(u32),
}

/// Hazard flags. `data` is raised in ID on a RAW dependency and cleared in
/// WB by the next register write; `control` is raised in ID when a `beq`
/// is decoded and cleared in IF once that `beq` reaches EX/MEM.
#[derive(Clone, Copy, Debug, Default)]
struct Hazard {
    data: bool,
    control: bool,
}

/// Pipelined MIPS processor.
///
/// Borrows the segments it executes against; ownership stays with the
/// caller so the data segment can be inspected after the run.
pub struct Executor<'a> {
    reg: [i32; NUM_REGISTERS],
    hi: i32,
    lo: i32,
    /// Next fetch address.
    pc: Address,
    /// IPC of the most recently retired instruction; the run loop stops
    /// when it reaches the last text-segment address.
    dpc: Address,

    if_id: IfId,
    id_ex: IdEx,
    ex_mem: ExMem,
    mem_wb: MemWb,

    hazard: Hazard,
    monitor: Monitor,

    text: &'a TextSegment,
    data: &'a mut DataSegment,
}

impl<'a> Executor<'a> {
    pub fn new(text: &'a TextSegment, data: &'a mut DataSegment) -> Self {
        Self {
            reg: [0; NUM_REGISTERS],
            hi: 0,
            lo: 0,
            pc: 0,
            dpc: 0,
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            hazard: Hazard::default(),
            monitor: Monitor::default(),
            text,
            data,
        }
    }

    /// Run until the last instruction retires or `limit` is reached,
    /// writing the per-cycle pipeline trace to `trace`.
    pub fn run<W: Write>(&mut self, limit: RunLimit, trace: &mut W) -> io::Result<()> {
        self.init();

        let Some(first) = self.text.first_address() else {
            return Ok(());
        };
        let last = self.text.last_address().unwrap_or(first);
        self.pc = first;

        while self.dpc != last {
            if self.is_terminated(limit) {
                return Ok(());
            }

            self.dump_pipeline_state(trace)?;
            self.step();
        }

        Ok(())
    }

    /// Advance the pipeline one cycle, stages in reverse order.
    pub fn step(&mut self) {
        self.write_back();
        self.memory_access();
        self.execute();
        self.decode();
        self.fetch();

        self.monitor.total_clock_cycles += 1;
    }

    /// Value of register `index`.
    pub fn register(&self, index: u32) -> i32 {
        self.reg[index as usize]
    }

    /// Preset a register before a run. Writes to register 0 are dropped.
    pub fn set_register(&mut self, index: u32, value: i32) {
        if index != 0 {
            self.reg[index as usize] = value;
        }
    }

    /// High half of the most recent `mult` product.
    pub fn hi(&self) -> i32 {
        self.hi
    }

    /// Low half of the most recent `mult` product.
    pub fn lo(&self) -> i32 {
        self.lo
    }

    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Build the final execution report.
    pub fn report(&self) -> ExecutionReport {
        ExecutionReport::new(&self.reg, &self.monitor)
    }

    fn init(&mut self) {
        self.if_id.reset();
        self.id_ex.reset();
        self.ex_mem.reset();
        self.mem_wb.reset();
        self.hazard = Hazard::default();
        self.monitor.reset();
        self.pc = 0;
        self.dpc = 0;
    }

    fn is_terminated(&self, limit: RunLimit) -> bool {
        match limit {
            RunLimit::Instructions(n) => self.monitor.total_instructions >= n,
            RunLimit::Cycles(n) => self.monitor.total_clock_cycles >= n,
        }
    }

    /// Write the five-stage occupancy snapshot for the cycle about to run.
    fn dump_pipeline_state<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "[Clock Cycle]: {}", self.monitor.total_clock_cycles)?;
        writeln!(out, "\tIF: {}", self.text.text_at(self.pc))?;
        writeln!(out, "\tID: {}", self.text.text_at(self.if_id.ipc))?;
        writeln!(out, "\tEX: {}", self.text.text_at(self.id_ex.ipc))?;
        writeln!(out, "\tMEM: {}", self.text.text_at(self.ex_mem.ipc))?;
        writeln!(out, "\tWB: {}", self.text.text_at(self.mem_wb.ipc))?;
        writeln!(out)
    }

    /// IF: fetch the word at `pc` unless a hazard or the end of the text
    /// segment holds the stage back.
    fn fetch(&mut self) {
        if self.hazard.control {
            if get_field(self.ex_mem.ir, Field::Opcode) == opcode::BEQ {
                // The branch reached EX/MEM; its direction is known now.
                if self.ex_mem.cond {
                    self.pc = self.ex_mem.alu_output as Address;
                }
                self.hazard.control = false;
            } else {
                self.if_id.reset();
                self.monitor.count_nop(Stage::If);
                return;
            }
        }

        if self.hazard.data {
            // Keep IF/ID intact: the stalled word must stay visible to ID.
            self.monitor.count_nop(Stage::If);
            return;
        }

        match self.text.last_address() {
            Some(last) if self.pc <= last => {}
            _ => {
                self.if_id.reset();
                self.monitor.count_nop(Stage::If);
                return;
            }
        }

        self.if_id.nop = false;
        self.if_id.ipc = self.pc;
        self.if_id.ir = self.text.binary_at(self.pc);
        self.pc += 4;
        self.if_id.npc = self.pc;
        self.monitor.total_instructions += 1;
    }

    /// ID: read operands, raise hazards, fill ID/EX.
    fn decode(&mut self) {
        if self.if_id.nop {
            self.id_ex.reset();
            self.monitor.count_nop(Stage::Id);
            return;
        }

        let op = get_field(self.if_id.ir, Field::Opcode);
        if op == opcode::BEQ {
            self.hazard.control = true;
        }

        let a_reg = get_field(self.if_id.ir, Field::Rs);
        let b_reg = get_field(self.if_id.ir, Field::Rt);

        // Stall-only RAW detection: both source registers are compared
        // against the destinations still in flight, for every opcode, so
        // single-source instructions over-stall.
        let ex_dst = self.ex_mem.write_reg_addr;
        let wb_dst = self.mem_wb.write_reg_addr;
        if (ex_dst != 0 && (ex_dst == a_reg || ex_dst == b_reg))
            || (wb_dst != 0 && (wb_dst == a_reg || wb_dst == b_reg))
        {
            self.hazard.data = true;
        }

        if self.hazard.data {
            debug!(ipc = self.if_id.ipc, "RAW dependency, stalling decode");
            self.id_ex.reset();
            self.monitor.count_nop(Stage::Id);
            return;
        }

        self.id_ex.nop = false;
        self.id_ex.ir = self.if_id.ir;
        self.id_ex.ipc = self.if_id.ipc;
        self.id_ex.npc = self.if_id.npc;
        self.id_ex.a = self.reg[a_reg as usize];
        self.id_ex.b = self.reg[b_reg as usize];

        if op == opcode::R_COMMON {
            self.id_ex.imm = 0;
            self.id_ex.write_reg_addr = get_field(self.if_id.ir, Field::Rd);
        } else {
            // Sign-extend the 16-bit immediate; sltiu re-masks at execute.
            self.id_ex.imm = i32::from(get_field(self.if_id.ir, Field::Imm) as u16 as i16);
            self.id_ex.write_reg_addr = b_reg;
        }
    }

    /// EX: compute the ALU result for the decoded instruction.
    fn execute(&mut self) {
        if self.id_ex.nop {
            self.ex_mem.reset();
            self.monitor.count_nop(Stage::Ex);
            return;
        }

        self.ex_mem.nop = false;
        self.ex_mem.ir = self.id_ex.ir;
        self.ex_mem.ipc = self.id_ex.ipc;
        self.ex_mem.b = self.id_ex.b;
        self.ex_mem.write_reg_addr = self.id_ex.write_reg_addr;

        match get_field(self.id_ex.ir, Field::Opcode) {
            opcode::R_COMMON => self.execute_r_type(),
            opcode::ADDI
            | opcode::LW
            | opcode::SW
            | opcode::ANDI
            | opcode::ORI
            | opcode::LUI
            | opcode::SLTI
            | opcode::SLTIU
            | opcode::BEQ => self.execute_i_type(),
            _ => {}
        }
    }

    fn execute_r_type(&mut self) {
        let a = self.id_ex.a;
        let b = self.id_ex.b;

        match get_field(self.id_ex.ir, Field::Funct) {
            funct::ADD => self.ex_mem.alu_output = i64::from(a.wrapping_add(b)),
            funct::SUB => self.ex_mem.alu_output = i64::from(a.wrapping_sub(b)),
            funct::AND => self.ex_mem.alu_output = i64::from(a & b),
            funct::OR => self.ex_mem.alu_output = i64::from(a | b),
            // Full-precision product; WB splits it across HI/LO or a
            // register pair.
            funct::MUL | funct::MULT => {
                self.ex_mem.alu_output = i64::from(a) * i64::from(b);
            }
            funct::SLL | funct::SRL => self.execute_shift(),
            _ => {}
        }
    }

    fn execute_shift(&mut self) {
        let shamt = get_field(self.id_ex.ir, Field::Shamt);
        let b = self.id_ex.b as u32;
        let shifted = if get_field(self.id_ex.ir, Field::Funct) == funct::SLL {
            b << shamt
        } else {
            // Logical right shift.
            b >> shamt
        };
        self.ex_mem.alu_output = i64::from(shifted as i32);
    }

    fn execute_set(&mut self, op: u32) {
        // Both set-on-less-than variants compare signed; sltiu only masks
        // its operand down to the raw 16 immediate bits first.
        let mut operand = self.id_ex.imm;
        if op == opcode::SLTIU {
            operand &= 0xFFFF;
        }
        self.ex_mem.alu_output = i64::from(self.id_ex.a < operand);
    }

    fn execute_i_type(&mut self) {
        let a = self.id_ex.a;
        let imm = self.id_ex.imm;

        let op = get_field(self.id_ex.ir, Field::Opcode);
        match op {
            opcode::ADDI | opcode::LW | opcode::SW => {
                self.ex_mem.alu_output = i64::from(a.wrapping_add(imm));
            }
            opcode::ANDI => self.ex_mem.alu_output = i64::from(a & imm),
            opcode::ORI => self.ex_mem.alu_output = i64::from(a | imm),
            opcode::LUI => self.ex_mem.alu_output = i64::from(imm.wrapping_shl(16)),
            opcode::SLTI | opcode::SLTIU => self.execute_set(op),
            opcode::BEQ => {
                // Branch target; the direction is consumed by IF once this
                // latch reaches MEM.
                let target = self.id_ex.npc.wrapping_add((imm as u32) << 2);
                self.ex_mem.alu_output = i64::from(target);
                self.ex_mem.cond = self.id_ex.a == self.id_ex.b;
            }
            _ => {}
        }
    }

    /// MEM: the only stage that touches the data segment.
    fn memory_access(&mut self) {
        if self.ex_mem.nop {
            self.mem_wb.reset();
            self.monitor.count_nop(Stage::Mem);
            return;
        }

        self.mem_wb.nop = false;
        self.mem_wb.ir = self.ex_mem.ir;
        self.mem_wb.ipc = self.ex_mem.ipc;

        match get_field(self.mem_wb.ir, Field::Opcode) {
            opcode::R_COMMON
            | opcode::ADDI
            | opcode::ANDI
            | opcode::ORI
            | opcode::SLTI
            | opcode::SLTIU
            | opcode::LUI => {
                // ALU results pass straight through; the stage is idle.
                self.mem_wb.alu_output = self.ex_mem.alu_output;
                self.mem_wb.lmd = 0;
                self.mem_wb.write_reg_addr = self.ex_mem.write_reg_addr;
                self.monitor.count_nop(Stage::Mem);
            }
            opcode::SW => {
                self.data
                    .store(self.ex_mem.alu_output as Address, self.ex_mem.b as u32);
                self.mem_wb.alu_output = 0;
                self.mem_wb.lmd = 0;
                self.mem_wb.write_reg_addr = 0;
            }
            opcode::LW => {
                self.mem_wb.alu_output = 0;
                self.mem_wb.lmd = self.data.load(self.ex_mem.alu_output as Address) as i32;
                self.mem_wb.write_reg_addr = self.ex_mem.write_reg_addr;
            }
            _ => {
                self.mem_wb.alu_output = 0;
                self.mem_wb.lmd = 0;
                self.mem_wb.write_reg_addr = 0;
                self.monitor.count_nop(Stage::Mem);
            }
        }
    }

    fn reg_write(&mut self, reg_addr: u32, value: i32) {
        if reg_addr == 0 {
            // Register 0 is hard-wired; the write is discarded.
            return;
        }
        if let Some(slot) = self.reg.get_mut(reg_addr as usize) {
            *slot = value;
        }
        // A register write resolves an outstanding RAW stall, whether or
        // not it comes from the instruction that caused it.
        if self.hazard.data {
            self.hazard.data = false;
        }
    }

    /// WB: retire the instruction in MEM/WB.
    fn write_back(&mut self) {
        if self.mem_wb.nop {
            self.monitor.count_nop(Stage::Wb);
            return;
        }

        match get_field(self.mem_wb.ir, Field::Opcode) {
            opcode::R_COMMON => match get_field(self.mem_wb.ir, Field::Funct) {
                funct::ADD | funct::SUB | funct::AND | funct::OR | funct::SLL | funct::SRL => {
                    self.reg_write(self.mem_wb.write_reg_addr, self.mem_wb.alu_output as i32);
                }
                funct::MUL => {
                    // The product retires across the register pair rd, rd+1.
                    self.reg_write(self.mem_wb.write_reg_addr, self.mem_wb.alu_output as i32);
                    self.reg_write(
                        self.mem_wb.write_reg_addr + 1,
                        (self.mem_wb.alu_output >> 32) as i32,
                    );
                }
                funct::MULT => {
                    self.lo = self.mem_wb.alu_output as i32;
                    self.hi = (self.mem_wb.alu_output >> 32) as i32;
                    // mult retires through HI/LO, which the monitor does
                    // not treat as a register write.
                    self.monitor.count_nop(Stage::Wb);
                }
                _ => {}
            },
            opcode::ADDI
            | opcode::ANDI
            | opcode::ORI
            | opcode::SLTI
            | opcode::SLTIU
            | opcode::LUI => {
                self.reg_write(self.mem_wb.write_reg_addr, self.mem_wb.alu_output as i32);
            }
            opcode::LW => {
                self.reg_write(self.mem_wb.write_reg_addr, self.mem_wb.lmd);
            }
            _ => {
                self.monitor.count_nop(Stage::Wb);
            }
        }

        self.dpc = self.mem_wb.ipc;
    }
}
