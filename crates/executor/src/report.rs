//! The execution report value handed to the boundary for serialization.
//!
//! Field names carry spaces via serde renames so the serialized document
//! matches the report format consumers already parse.

use std::collections::BTreeMap;

use serde::Serialize;

use mipsim_isa::reg::{NUM_REGISTERS, REGISTER_NAMES};

use crate::monitor::{Monitor, Stage};

/// Bubble count and share for one stage.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct NopStats {
    pub count: u32,
    pub percentage: f64,
}

/// Per-stage bubble analysis.
#[derive(Clone, Debug, Serialize)]
pub struct NopAnalysis {
    #[serde(rename = "IF")]
    pub fetch: NopStats,
    #[serde(rename = "ID")]
    pub decode: NopStats,
    #[serde(rename = "EX")]
    pub execute: NopStats,
    #[serde(rename = "MEM")]
    pub memory: NopStats,
    #[serde(rename = "WB")]
    pub write_back: NopStats,
}

/// Aggregate counters for the run.
#[derive(Clone, Debug, Serialize)]
pub struct ResourceUtilization {
    #[serde(rename = "total clock cycles")]
    pub total_clock_cycles: u32,
    #[serde(rename = "total instructions")]
    pub total_instructions: u32,
    #[serde(rename = "nop analysis")]
    pub nop_analysis: NopAnalysis,
}

/// Final state summary: register contents plus resource utilization.
///
/// Registers are keyed by canonical name and ordered alphabetically;
/// values are formatted as zero-padded lowercase hex words.
#[derive(Clone, Debug, Serialize)]
pub struct ExecutionReport {
    #[serde(rename = "register contents")]
    pub register_contents: BTreeMap<&'static str, String>,
    #[serde(rename = "resource utilization")]
    pub resource_utilization: ResourceUtilization,
}

impl ExecutionReport {
    pub(crate) fn new(reg: &[i32; NUM_REGISTERS], monitor: &Monitor) -> Self {
        let register_contents = REGISTER_NAMES
            .iter()
            .enumerate()
            .map(|(index, &name)| (name, format!("0x{:08x}", reg[index] as u32)))
            .collect();

        let stat = |stage: Stage| {
            let count = monitor.nop_count(stage);
            let percentage = if monitor.total_clock_cycles == 0 {
                0.0
            } else {
                100.0 * f64::from(count) / f64::from(monitor.total_clock_cycles)
            };
            NopStats { count, percentage }
        };

        Self {
            register_contents,
            resource_utilization: ResourceUtilization {
                total_clock_cycles: monitor.total_clock_cycles,
                total_instructions: monitor.total_instructions,
                nop_analysis: NopAnalysis {
                    fetch: stat(Stage::If),
                    decode: stat(Stage::Id),
                    execute: stat(Stage::Ex),
                    memory: stat(Stage::Mem),
                    write_back: stat(Stage::Wb),
                },
            },
        }
    }
}
