//! Op-code occurrence statistics
//!
//! While decoding, every record contributes its op-code and first payload
//! byte to an aggregate histogram. The aggregate is owned by the decoding
//! session and handed to the caller; it is a reporting aid only and has no
//! effect on decoding correctness.

use serde::Serialize;
use std::collections::BTreeMap;

/// How many first-byte entries a summary lists per op-code
pub const SUMMARY_TOP_ENTRIES: usize = 15;

/// Histogram of first-payload-byte values for one op-code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpHistogram {
    counts: BTreeMap<u8, u64>,
    total: u64,
}

impl OpHistogram {
    /// Total records observed with this op-code
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count per distinct first payload byte, ascending by byte value
    pub fn counts(&self) -> &BTreeMap<u8, u64> {
        &self.counts
    }
}

/// Aggregate op-code statistics for one decoding pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpCodeStats {
    ops: BTreeMap<u16, OpHistogram>,
}

/// One op-code's entry in the ordered summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpSummary {
    pub op: u16,
    pub total: u64,
    /// Up to [`SUMMARY_TOP_ENTRIES`] (first byte, count) pairs, most frequent
    /// first, ties broken by byte value ascending
    pub top: Vec<(u8, u64)>,
    /// Distinct first-byte values beyond the listed ones
    pub elided: usize,
}

impl OpCodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation
    pub fn observe(&mut self, op: u16, first_byte: u8) {
        let histogram = self.ops.entry(op).or_default();
        *histogram.counts.entry(first_byte).or_insert(0) += 1;
        histogram.total += 1;
    }

    /// True if nothing was observed
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of distinct op-codes observed
    pub fn num_ops(&self) -> usize {
        self.ops.len()
    }

    /// Histogram for a single op-code, if observed
    pub fn histogram(&self, op: u16) -> Option<&OpHistogram> {
        self.ops.get(&op)
    }

    /// Build the report summary
    ///
    /// Op-codes are ordered by total occurrence count descending; ties break
    /// ascending by op-code so repeated runs produce identical output.
    pub fn summary(&self) -> Vec<OpSummary> {
        let mut entries: Vec<OpSummary> = self
            .ops
            .iter()
            .map(|(&op, histogram)| {
                let mut pairs: Vec<(u8, u64)> =
                    histogram.counts.iter().map(|(&b, &n)| (b, n)).collect();
                pairs.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
                let elided = pairs.len().saturating_sub(SUMMARY_TOP_ENTRIES);
                pairs.truncate(SUMMARY_TOP_ENTRIES);
                OpSummary {
                    op,
                    total: histogram.total,
                    top: pairs,
                    elided,
                }
            })
            .collect();
        entries.sort_by(|a, b| b.total.cmp(&a.total).then(a.op.cmp(&b.op)));
        entries
    }
}
