//! Report (polling) rate readout.
//!
//! `ratbagctl <alias> rate get` prints the rate in Hz as a bare integer.

use crate::error::Result;
use crate::parse;
use crate::request::ToolRequest;
use crate::transport::{tool_request, RatbagTool};

/// Read the current report rate in Hz.
pub fn read_report_rate(tool: &dyn RatbagTool, alias: &str) -> Result<u32> {
    let out = tool_request(tool, &ToolRequest::RateGet { alias })?;
    parse::parse_count("report rate", &out)
}
