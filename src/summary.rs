//! Daily summary derivation
//!
//! Derives the up-to-three insight lines from a daily profile in a single
//! left-to-right pass over the 48 slots. Only strict improvements replace a
//! running extreme, so ties resolve to the earliest slot of the day.
//!
//! Emission rules:
//! - best period only when the maximum ratio is strictly positive; an
//!   all-zero day claims no best moment
//! - a zero ratio never becomes the running worst, and the hardest-period
//!   line only appears when the final minimum is strictly negative
//! - the average covers only the strictly positive slots and is emitted only
//!   when at least one exists

use crate::types::{DailyProfile, DailySummary, Insight, InsightKind, TimeSlot};

/// Derive the daily summary from a computed profile.
///
/// Output order is fixed: best period, hardest period, daily average, each
/// present only when its emission rule holds.
pub fn daily_summary(profile: &DailyProfile) -> DailySummary {
    let mut best: Option<(TimeSlot, f64)> = None;
    let mut worst: Option<(TimeSlot, f64)> = None;
    let mut positive_total = 0.0;
    let mut positive_slots = 0u32;

    for entry in &profile.entries {
        let ratio = entry.stats.balance_ratio;

        if best.map_or(true, |(_, running)| ratio > running) {
            best = Some((entry.slot, ratio));
        }
        // Zero is "no evidence", never a hardest-period candidate
        if ratio != 0.0 && worst.map_or(true, |(_, running)| ratio < running) {
            worst = Some((entry.slot, ratio));
        }
        if ratio > 0.0 {
            positive_total += ratio;
            positive_slots += 1;
        }
    }

    let mut insights = Vec::new();

    if let Some((slot, ratio)) = best {
        if ratio > 0.0 {
            insights.push(Insight {
                kind: InsightKind::BestPeriod,
                slot: Some(slot),
                value: ratio,
            });
        }
    }
    if let Some((slot, ratio)) = worst {
        if ratio < 0.0 {
            insights.push(Insight {
                kind: InsightKind::HardestPeriod,
                slot: Some(slot),
                value: ratio,
            });
        }
    }
    if positive_slots > 0 {
        insights.push(Insight {
            kind: InsightKind::DailyAverage,
            slot: None,
            value: positive_total / f64::from(positive_slots),
        });
    }

    DailySummary { insights }
}
