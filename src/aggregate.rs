//! Slot aggregation
//!
//! This module converts the raw, unordered event log into the fixed-resolution
//! daily profile: windowed filtering, half-hour bucket assignment, per-slot
//! counting, and balance-ratio computation.
//!
//! The aggregator is a pure function of its inputs. The event snapshot and the
//! evaluation instant are supplied by the caller and held constant through one
//! 48-slot pass, so profiles stay internally consistent even while the
//! underlying log is being appended to. Every slot can be evaluated
//! independently without shared mutable state.

use crate::types::{
    DailyProfile, ProfileEntry, SlotStatistics, SymptomEvent, SymptomState, TimeSlot, Window,
    DEFAULT_WINDOW_DAYS,
};
use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};

/// Slot aggregation engine
///
/// Carries the two pieces of configuration every pass shares: the trailing
/// window length and the wall-clock offset used to read an event's time of
/// day. Stateless otherwise; safe to share across calling contexts.
#[derive(Debug, Clone, Copy)]
pub struct SlotAggregator {
    window_days: i64,
    offset: FixedOffset,
}

impl Default for SlotAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotAggregator {
    /// Aggregator with the default 28-day window, bucketing in UTC
    pub fn new() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            offset: Utc.fix(),
        }
    }

    /// Override the trailing window length
    pub fn with_window_days(mut self, days: i64) -> Self {
        self.window_days = days;
        self
    }

    /// Bucket by wall-clock time in the given fixed offset instead of UTC
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Trailing window ending at `now` with this aggregator's length
    pub fn window_at(&self, now: DateTime<Utc>) -> Window {
        Window::trailing(now, self.window_days)
    }

    /// Compute statistics for one slot over one window.
    ///
    /// An event belongs to the slot when its timestamp falls inside the
    /// window, its wall-clock hour matches, and its minute falls in the
    /// matching half (minute 30 exactly opens the second half).
    pub fn slot_statistics(
        &self,
        events: &[SymptomEvent],
        slot: TimeSlot,
        window: &Window,
    ) -> SlotStatistics {
        let mut stats = SlotStatistics::default();

        for event in events {
            if !window.contains(event.timestamp) {
                continue;
            }
            let wall_clock = event.timestamp.with_timezone(&self.offset);
            if !slot.contains_wall_clock(wall_clock.hour(), wall_clock.minute()) {
                continue;
            }
            match event.state {
                SymptomState::On => stats.on_count += 1,
                SymptomState::Off => stats.off_count += 1,
                SymptomState::Dyskinesia => stats.dyskinesia_count += 1,
                SymptomState::Tremor => stats.tremor_count += 1,
            }
        }

        stats.balance_ratio = balance_ratio(stats.on_count, stats.off_count);
        stats
    }

    /// Compute statistics for a slot given as a "HH:MM" label.
    ///
    /// An unparseable label contributes zero statistics instead of aborting
    /// the profile pass.
    pub fn statistics_for_label(
        &self,
        events: &[SymptomEvent],
        label: &str,
        window: &Window,
    ) -> SlotStatistics {
        match TimeSlot::parse(label) {
            Some(slot) => self.slot_statistics(events, slot, window),
            None => SlotStatistics::default(),
        }
    }

    /// Compute the full 48-slot profile for the window ending at `now`.
    ///
    /// The window is formed once from `now` and shared by every slot.
    pub fn daily_profile_at(&self, events: &[SymptomEvent], now: DateTime<Utc>) -> DailyProfile {
        self.daily_profile(events, self.window_at(now))
    }

    /// Compute the full 48-slot profile over an explicit window.
    ///
    /// Always returns exactly 48 entries in chronological order, empty slots
    /// included.
    pub fn daily_profile(&self, events: &[SymptomEvent], window: Window) -> DailyProfile {
        let entries = TimeSlot::all()
            .map(|slot| ProfileEntry {
                slot,
                stats: self.slot_statistics(events, slot, &window),
            })
            .collect();

        DailyProfile { window, entries }
    }
}

/// (on - off) / (on + off) x 100, or 0.0 exactly when the denominator is zero
fn balance_ratio(on_count: u32, off_count: u32) -> f64 {
    let total = on_count + off_count;
    if total == 0 {
        return 0.0;
    }
    ((f64::from(on_count) - f64::from(off_count)) / f64::from(total)) * 100.0
}
