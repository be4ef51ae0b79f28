//! ratcycle-core: ratbagctl adapter, output parsing, and profile cycling.
//!
//! This crate drives a Logitech G mouse through the `ratbagctl` command-line
//! client. It reads current settings by scraping the client's text output and
//! cycles through per-model profile scripts, remembering the last one applied.

pub mod buttons;
pub mod device;
pub mod dpi;
pub mod error;
pub mod led;
pub mod parse;
pub mod profile;
pub mod report_rate;
pub mod request;
pub mod scan;
pub mod script;
pub mod session;
pub mod transport;

pub use error::{Error, ErrorClass, Result};
pub use session::{MouseSession, SessionConfig, Settings};
