//! mipsim-executor: cycle-accurate five-stage pipeline model.
//!
//! This crate provides:
//! - The architectural state (register file, HI/LO, PC) and the four
//!   inter-stage latches
//! - Stall-only data-hazard detection and MEM-resolved control hazards
//! - Per-cycle pipeline tracing and the final execution report

pub mod executor;
pub mod latch;
pub mod monitor;
pub mod report;

pub use executor::{Executor, RunLimit};
pub use monitor::{Monitor, Stage};
pub use report::ExecutionReport;
