//! Read counters shared by the worker threads

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters updated by every worker after each virtual-file read
#[derive(Default)]
pub struct ReadMetrics {
    reads: AtomicU64,
    short_reads: AtomicU64,
    bytes: AtomicU64,
    latency_sum_ns: AtomicU64,
    latency_max_ns: AtomicU64,
    errors: AtomicU64,
}

impl ReadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successful read; `returned < requested` means it hit end of file
    pub fn record_read(&self, requested: usize, returned: usize, latency: Duration) {
        let latency_ns = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.reads.fetch_add(1, Ordering::Relaxed);
        if returned < requested {
            self.short_reads.fetch_add(1, Ordering::Relaxed);
        }
        self.bytes.fetch_add(returned as u64, Ordering::Relaxed);
        self.latency_sum_ns.fetch_add(latency_ns, Ordering::Relaxed);
        self.latency_max_ns.fetch_max(latency_ns, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Freeze the counters into rates over `elapsed`
    pub fn report(&self, elapsed: Duration) -> ReadReport {
        let reads = self.reads.load(Ordering::Relaxed);
        let secs = elapsed.as_secs_f64().max(f64::EPSILON);
        let bytes = self.bytes.load(Ordering::Relaxed);
        let avg_latency_us = match reads {
            0 => 0.0,
            n => self.latency_sum_ns.load(Ordering::Relaxed) as f64 / n as f64 / 1000.0,
        };

        ReadReport {
            reads,
            short_reads: self.short_reads.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            reads_per_sec: reads as f64 / secs,
            mib_per_sec: bytes as f64 / secs / (1024.0 * 1024.0),
            avg_latency_us,
            max_latency_us: self.latency_max_ns.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}

/// Snapshot of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct ReadReport {
    pub reads: u64,
    pub short_reads: u64,
    pub errors: u64,
    pub reads_per_sec: f64,
    pub mib_per_sec: f64,
    pub avg_latency_us: f64,
    pub max_latency_us: f64,
}

impl fmt::Display for ReadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Read statistics:")?;
        writeln!(
            f,
            "    reads performed:   {:>12} ({:.1} ops/s)",
            self.reads, self.reads_per_sec
        )?;
        writeln!(f, "    short reads:       {:>12}", self.short_reads)?;
        writeln!(f, "    throughput:        {:>12.1} MiB/s", self.mib_per_sec)?;
        writeln!(
            f,
            "    read latency:      {:6.2} us (avg), {:6.2} us (max)",
            self.avg_latency_us, self.max_latency_us
        )?;
        write!(f, "    errors:            {:>12}", self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_short_reads_and_latency() {
        let metrics = ReadMetrics::new();
        metrics.record_read(4096, 4096, Duration::from_micros(10));
        metrics.record_read(4096, 100, Duration::from_micros(30));
        metrics.record_error();

        let report = metrics.report(Duration::from_secs(2));
        assert_eq!(report.reads, 2);
        assert_eq!(report.short_reads, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.reads_per_sec, 1.0);
        assert_eq!(report.avg_latency_us, 20.0);
        assert_eq!(report.max_latency_us, 30.0);
    }

    #[test]
    fn test_report_without_reads() {
        let report = ReadMetrics::new().report(Duration::ZERO);
        assert_eq!(report.reads, 0);
        assert_eq!(report.avg_latency_us, 0.0);
        assert!(report.to_string().contains("errors:"));
    }
}
