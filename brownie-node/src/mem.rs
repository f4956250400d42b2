//! Picks the response body limit. On Linux the limit is half of the memory
//! reported available in `/proc/meminfo` so an oversized response fails to
//! parse instead of taking the process down. Elsewhere there is no limit.

use std::cmp::min;
use std::fs::File;
use std::io::{BufRead, BufReader};

const DEFAULT_BUFFER: usize = usize::MAX;

/// Available memory in kilobytes.
fn available_memory_kb() -> Option<usize> {
    let file = File::open("/proc/meminfo").ok()?;
    for line in BufReader::new(file).lines() {
        let line = line.ok()?;
        if let Some(rest) = line.strip_prefix("MemAvailable:") {
            return rest.split_whitespace().next()?.parse().ok();
        }
    }
    None
}

pub fn get_buffer_size() -> usize {
    match available_memory_kb().and_then(|kb| kb.checked_mul(1000)) {
        Some(bytes) if bytes > 0 => {
            trace!("Successfully got memory info");
            min(DEFAULT_BUFFER, bytes / 2)
        }
        _ => DEFAULT_BUFFER,
    }
}

#[test]
fn buffer_size_is_never_zero() {
    assert!(get_buffer_size() > 0);
}
