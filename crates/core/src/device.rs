//! Device identity: which mouse is connected and how many buttons it has.

use crate::error::Result;
use crate::parse;
use crate::request::ToolRequest;
use crate::transport::{tool_request, RatbagTool};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The connected mouse, resolved once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// ratbagctl short name, e.g. `sleeping-puppy`. Used in every query.
    pub alias: String,
    /// Lower-cased product code, e.g. `g403`. Names the profile directory.
    pub model: String,
    /// Number of physical buttons.
    pub button_count: u32,
}

/// Find the first supported mouse in the device listing.
///
/// Returns `(alias, model)`; fails with `DeviceNotFound` if no line matches.
pub fn find_mouse(tool: &dyn RatbagTool) -> Result<(String, String)> {
    let listing = tool_request(tool, &ToolRequest::List)?;
    parse::parse_device_line(&listing)
}

/// Read the button count for a device.
pub fn read_button_count(tool: &dyn RatbagTool, alias: &str) -> Result<u32> {
    let out = tool_request(tool, &ToolRequest::ButtonCount { alias })?;
    parse::parse_count("button count", &out)
}

/// Identify the connected mouse: listing first, then its button count.
pub fn identify(tool: &dyn RatbagTool) -> Result<DeviceIdentity> {
    let (alias, model) = find_mouse(tool)?;
    let button_count = read_button_count(tool, &alias)?;
    info!(
        alias = %alias,
        model = %model,
        button_count,
        "Found mouse"
    );
    Ok(DeviceIdentity {
        alias,
        model,
        button_count,
    })
}
