//! Per-pass performance statistics.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use std::time::Duration;

/// Counters and timings for one detection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceStats {
    /// Leaf applications checked.
    pub total_items: usize,

    /// Items settled by Layer 2 alone.
    pub l2_resolved: usize,

    /// Items forwarded to Layer 3.
    pub l3_checked: usize,

    /// Tentative Layer 2 verdicts replaced by a Layer 3 verdict.
    pub l3_overrides: usize,

    pub l2_time: Duration,
    pub l3_time: Duration,
    pub total_time: Duration,
}

impl PerformanceStats {
    /// Percentage of items settled by Layer 2, `0.0` for an empty pass.
    pub fn l2_hit_rate(&self) -> f64 {
        if self.total_items == 0 {
            0.0
        } else {
            self.l2_resolved as f64 * 100.0 / self.total_items as f64
        }
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

impl Serialize for PerformanceStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PerformanceStats", 8)?;
        s.serialize_field("total_items", &self.total_items)?;
        s.serialize_field("l2_resolved", &self.l2_resolved)?;
        s.serialize_field("l3_checked", &self.l3_checked)?;
        s.serialize_field("l3_overrides", &self.l3_overrides)?;
        s.serialize_field("l2_hit_rate", &self.l2_hit_rate())?;
        s.serialize_field("l2_time_ms", &millis(self.l2_time))?;
        s.serialize_field("l3_time_ms", &millis(self.l3_time))?;
        s.serialize_field("total_time_ms", &millis(self.total_time))?;
        s.end()
    }
}

impl fmt::Display for PerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items: {} resolved by quick checks ({:.1}%), {} verified via package manager",
            self.total_items,
            self.l2_resolved,
            self.l2_hit_rate(),
            self.l3_checked
        )?;
        if self.l3_overrides > 0 {
            write!(f, " ({} corrected)", self.l3_overrides)?;
        }
        write!(f, " in {:.0?}", self.total_time)
    }
}
