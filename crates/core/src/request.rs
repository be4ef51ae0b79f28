//! ratbagctl request shapes.
//!
//! Every query this crate issues is one of the variants below. The tool
//! addresses per-device sub-resources (resolutions, buttons, LEDs) by a bare
//! integer index appended after the resource name:
//!
//! ```text
//! ratbagctl list
//! ratbagctl <alias> button count
//! ratbagctl <alias> rate get
//! ratbagctl <alias> resolution <i> get
//! ratbagctl <alias> button <i> get
//! ratbagctl <alias> led <i> get
//! ```

use std::fmt;

/// A single ratbagctl query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest<'a> {
    /// List connected devices.
    List,
    /// Number of physical buttons on the device.
    ButtonCount { alias: &'a str },
    /// Current report (polling) rate in Hz.
    RateGet { alias: &'a str },
    /// Resolution slot `index` of the active profile.
    ResolutionGet { alias: &'a str, index: usize },
    /// Binding of button `index`.
    ButtonGet { alias: &'a str, index: usize },
    /// State of LED `index`.
    LedGet { alias: &'a str, index: usize },
}

impl ToolRequest<'_> {
    /// Render the argument list passed to the tool.
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::List => vec!["list".into()],
            Self::ButtonCount { alias } => vec![alias.to_string(), "button".into(), "count".into()],
            Self::RateGet { alias } => vec![alias.to_string(), "rate".into(), "get".into()],
            Self::ResolutionGet { alias, index } => indexed(alias, "resolution", *index),
            Self::ButtonGet { alias, index } => indexed(alias, "button", *index),
            Self::LedGet { alias, index } => indexed(alias, "led", *index),
        }
    }
}

fn indexed(alias: &str, resource: &str, index: usize) -> Vec<String> {
    vec![
        alias.to_string(),
        resource.to_string(),
        index.to_string(),
        "get".to_string(),
    ]
}

impl fmt::Display for ToolRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args().join(" "))
    }
}
