//! Thin process-memory probe.
//!
//! Reads coarse figures from `/proc/self/status` on Linux; elsewhere the
//! probe degrades to `None` and the report falls back to the
//! population's own retained-bytes estimate. This is deliberately a
//! thin I/O wrapper — the measurement story lives in the snapshot, not
//! here.

/// Coarse process memory figures at one point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryFigures {
    /// Resident set size in bytes, if the platform exposes it.
    pub rss_bytes: Option<u64>,
    /// Data segment size in bytes (heap growth proxy), if exposed.
    pub data_bytes: Option<u64>,
}

impl MemoryFigures {
    /// Probe the current process.
    pub fn probe() -> Self {
        read_proc_status().unwrap_or_default()
    }

    /// RSS delta against an earlier probe, when both sides are known.
    pub fn rss_delta(&self, earlier: &MemoryFigures) -> Option<i64> {
        match (self.rss_bytes, earlier.rss_bytes) {
            (Some(now), Some(then)) => Some(now as i64 - then as i64),
            _ => None,
        }
    }
}

#[cfg(target_os = "linux")]
fn read_proc_status() -> Option<MemoryFigures> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    let mut figures = MemoryFigures::default();
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            figures.rss_bytes = parse_kb(rest);
        } else if let Some(rest) = line.strip_prefix("VmData:") {
            figures.data_bytes = parse_kb(rest);
        }
    }
    Some(figures)
}

#[cfg(not(target_os = "linux"))]
fn read_proc_status() -> Option<MemoryFigures> {
    None
}

/// Parse the `"  1234 kB"` remainder of a status line into bytes.
fn parse_kb(rest: &str) -> Option<u64> {
    let kb: u64 = rest.trim().strip_suffix("kB")?.trim().parse().ok()?;
    Some(kb * 1024)
}

/// Format a byte count as megabytes with two decimals.
pub fn mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

/// Format an optionally-known byte count.
pub fn mb_or_unknown(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) => mb(b),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kb_handles_status_formatting() {
        assert_eq!(parse_kb("    1234 kB"), Some(1234 * 1024));
        assert_eq!(parse_kb("1 kB"), Some(1024));
        assert_eq!(parse_kb("garbage"), None);
    }

    #[test]
    fn mb_formats_two_decimals() {
        assert_eq!(mb(1024 * 1024), "1.00 MB");
        assert_eq!(mb(1536 * 1024), "1.50 MB");
        assert_eq!(mb_or_unknown(None), "n/a");
    }

    #[test]
    fn rss_delta_needs_both_sides() {
        let a = MemoryFigures {
            rss_bytes: Some(10 * 1024 * 1024),
            data_bytes: None,
        };
        let b = MemoryFigures {
            rss_bytes: Some(14 * 1024 * 1024),
            data_bytes: None,
        };
        assert_eq!(b.rss_delta(&a), Some(4 * 1024 * 1024));
        assert_eq!(b.rss_delta(&MemoryFigures::default()), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn probe_reads_something_on_linux() {
        let figures = MemoryFigures::probe();
        assert!(figures.rss_bytes.is_some());
    }
}
