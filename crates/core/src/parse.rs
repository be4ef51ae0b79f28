//! Text parsers for ratbagctl output.
//!
//! ratbagctl has no structured query mode, so everything here depends on the
//! exact wording of its human-readable output. A format change upstream shows
//! up as `Error::Parse` for single fields, or as a silently shorter list for
//! the indexed resources (a non-matching response ends the list).

use crate::error::{Error, Result};
use crate::led::{Led, LedMode};
use regex::Regex;
use std::sync::OnceLock;

/// Marker ratbagctl prints before a key that is pressed and released.
pub const KEY_TAP_MARKER: char = '↕';
/// Marker for a key pressed and held as part of a chord.
pub const KEY_DOWN_MARKER: char = '↓';
/// Marker for a key released.
pub const KEY_UP_MARKER: char = '↑';

fn device_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([a-z-]+):.*(G\d{3}|G Pro)").expect("device regex is valid")
    })
}

fn resolution_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d+:\s*(\d{1,5})(?:x\d{1,5})?dpi").expect("resolution regex is valid")
    })
}

fn button_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'(.*)'").expect("button regex is valid"))
}

fn led_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^LED: (\d+), depth: \w+, mode: (on|off|cycle|breathing)",
            r"(?:, color: ([0-9a-fA-F]{6}))?",
            r"(?:, duration: (\d{1,5}))?",
            r"(?:, brightness: (\d{1,3}))?",
        ))
        .expect("led regex is valid")
    })
}

/// Find the first device line and return `(alias, model)`, both lower-cased.
///
/// `sleeping-puppy: Wireless Gaming Mouse G403` → `("sleeping-puppy", "g403")`.
pub fn parse_device_line(output: &str) -> Result<(String, String)> {
    output
        .lines()
        .find_map(|line| device_re().captures(line))
        .map(|caps| (caps[1].to_lowercase(), caps[2].to_lowercase()))
        .ok_or(Error::DeviceNotFound)
}

/// Parse a bare unsigned integer, ignoring surrounding whitespace.
pub fn parse_count(field: &str, output: &str) -> Result<u32> {
    output
        .trim()
        .parse()
        .map_err(|_| Error::parse(field, output))
}

/// Extract the DPI of a resolution slot, or `None` if the response does not
/// describe an enabled resolution.
pub fn parse_resolution(output: &str) -> Option<u32> {
    resolution_re()
        .captures(output.trim_start())
        .and_then(|caps| caps[1].parse().ok())
}

/// Extract and normalize the quoted binding from a button response.
pub fn parse_button(output: &str) -> Option<String> {
    button_re()
        .captures(output.trim())
        .map(|caps| normalize_binding(&caps[1]))
}

/// Parse one LED descriptor line.
pub fn parse_led(output: &str) -> Option<Led> {
    let caps = led_re().captures(output.trim_start())?;
    let index = caps[1].parse().ok()?;
    let mode = LedMode::from_name(&caps[2])?;
    Some(Led {
        index,
        mode,
        color: caps.get(3).map(|m| m.as_str().to_lowercase()),
        duration: caps.get(4).and_then(|m| m.as_str().parse().ok()),
        brightness: caps.get(5).and_then(|m| m.as_str().parse().ok()),
    })
}

/// Replace ratbagctl's key-event arrows with textual prefixes.
///
/// - `↕A` → `KEY_A`
/// - `↓B` → `+KEY_B`
/// - `↑C` → `-KEY_C`
pub fn normalize_binding(binding: &str) -> String {
    let mut out = String::with_capacity(binding.len() + 8);
    for ch in binding.chars() {
        match ch {
            KEY_TAP_MARKER => out.push_str("KEY_"),
            KEY_DOWN_MARKER => out.push_str("+KEY_"),
            KEY_UP_MARKER => out.push_str("-KEY_"),
            other => out.push(other),
        }
    }
    out
}
