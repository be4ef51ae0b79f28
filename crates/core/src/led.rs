//! LED state readout.
//!
//! ratbagctl describes each LED on one line:
//!
//! ```text
//! LED: 0, depth: rgb, mode: breathing, color: ff0000, duration: 1000, brightness: 255
//! LED: 1, depth: rgb, mode: off
//! ```
//!
//! Fields after `mode` depend on the mode, so all three are optional.

use crate::error::Result;
use crate::parse;
use crate::request::ToolRequest;
use crate::scan::scan_resource;
use crate::transport::RatbagTool;
use serde::{Deserialize, Serialize};
use std::fmt;

/// LED effect mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedMode {
    On,
    Off,
    Cycle,
    Breathing,
}

impl LedMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "on" => Some(Self::On),
            "off" => Some(Self::Off),
            "cycle" => Some(Self::Cycle),
            "breathing" => Some(Self::Breathing),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Cycle => "cycle",
            Self::Breathing => "breathing",
        }
    }
}

impl fmt::Display for LedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One LED as reported by the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Led {
    /// LED slot index.
    pub index: u32,
    pub mode: LedMode,
    /// Lower-case `rrggbb`.
    pub color: Option<String>,
    /// Effect period in milliseconds.
    pub duration: Option<u32>,
    pub brightness: Option<u32>,
}

/// Read every LED, probing indices until the tool stops describing one.
pub fn read_leds(tool: &dyn RatbagTool, alias: &str) -> Result<Vec<Led>> {
    scan_resource(
        tool,
        |index| ToolRequest::LedGet { alias, index },
        parse::parse_led,
    )
}
