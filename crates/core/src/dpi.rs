//! Resolution (DPI) readout.
//!
//! ratbagctl reports one resolution slot per query:
//!   `0: 800dpi @ 1000Hz (active) (default)`
//! Disabled slots print without a DPI figure and end the list, as does an
//! index past the last slot.

use crate::error::Result;
use crate::parse;
use crate::request::ToolRequest;
use crate::scan::scan_resource;
use crate::transport::RatbagTool;

/// Read the DPI of every resolution slot, in slot order.
pub fn read_resolutions(tool: &dyn RatbagTool, alias: &str) -> Result<Vec<u32>> {
    scan_resource(
        tool,
        |index| ToolRequest::ResolutionGet { alias, index },
        parse::parse_resolution,
    )
}
