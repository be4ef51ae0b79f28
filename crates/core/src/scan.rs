//! Probe-until-failure iteration over indexed resources.
//!
//! ratbagctl exposes resolutions and LEDs by index with no count query. The
//! list is read by probing index 0, 1, 2, ... until a probe reports "nothing
//! here". `IndexedScan` wraps that loop as an iterator so the termination rule
//! can be exercised without a tool.

use crate::error::Error;
use crate::request::ToolRequest;
use crate::transport::{tool_request, RatbagTool};
use tracing::debug;

/// Lazily probes increasing indices, yielding entries until the probe returns
/// `Ok(None)` or an error. The iterator is fused after either.
pub struct IndexedScan<F> {
    probe: F,
    next: usize,
    done: bool,
}

impl<T, E, F> IndexedScan<F>
where
    F: FnMut(usize) -> Result<Option<T>, E>,
{
    pub fn new(probe: F) -> Self {
        Self {
            probe,
            next: 0,
            done: false,
        }
    }
}

impl<T, E, F> Iterator for IndexedScan<F>
where
    F: FnMut(usize) -> Result<Option<T>, E>,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match (self.probe)(self.next) {
            Ok(Some(item)) => {
                self.next += 1;
                Some(Ok(item))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<T, E, F> std::iter::FusedIterator for IndexedScan<F> where
    F: FnMut(usize) -> Result<Option<T>, E>
{
}

/// Read an indexed resource list through the tool.
///
/// A response that `parse` rejects ends the list, as does the tool exiting
/// non-zero (ratbagctl rejects out-of-range indices that way). Spawn failures
/// and timeouts are still errors.
pub fn scan_resource<'a, T>(
    tool: &dyn RatbagTool,
    request: impl Fn(usize) -> ToolRequest<'a>,
    parse: impl Fn(&str) -> Option<T>,
) -> crate::error::Result<Vec<T>> {
    IndexedScan::new(|index| {
        let req = request(index);
        match tool_request(tool, &req) {
            Ok(out) => {
                let parsed = parse(&out);
                if parsed.is_none() {
                    debug!(command = %req, "no match, end of list");
                }
                Ok(parsed)
            }
            Err(Error::ToolFailed { status, .. }) => {
                debug!(command = %req, %status, "tool rejected index, end of list");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    })
    .collect()
}
