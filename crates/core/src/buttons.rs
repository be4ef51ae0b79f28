//! Button binding readout.
//!
//! Unlike resolutions and LEDs, the number of buttons is known up front
//! (`button count`), so exactly that many slots are queried and a slot that
//! does not parse is an error rather than the end of the list.
//!
//! A binding is the quoted part of the response:
//!   `Button: 0 is mapped to 'button 1'`
//!   `Button: 5 is mapped to macro '↓LEFTCTRL ↕C ↑LEFTCTRL'`
//! Macro key arrows are rewritten to `KEY_` / `+KEY_` / `-KEY_` prefixes.

use crate::error::{Error, Result};
use crate::parse;
use crate::request::ToolRequest;
use crate::transport::{tool_request, RatbagTool};

/// Read the binding of a single button.
pub fn read_button(tool: &dyn RatbagTool, alias: &str, index: usize) -> Result<String> {
    let out = tool_request(tool, &ToolRequest::ButtonGet { alias, index })?;
    parse::parse_button(&out).ok_or_else(|| Error::parse(format!("button {index} binding"), &out))
}

/// Read the bindings of buttons `0..count`.
pub fn read_buttons(tool: &dyn RatbagTool, alias: &str, count: u32) -> Result<Vec<String>> {
    (0..count as usize)
        .map(|index| read_button(tool, alias, index))
        .collect()
}
