//! Immutable flight-pairing duty blocks.
//!
//! A pairing is built incrementally from one or more flight legs sharing
//! the same `pairId`, then frozen into an immutable [`Pairing`] once every
//! leg has been folded in.

use chrono::NaiveDateTime;

use crate::error::IngestError;

/// A duty block assembled from one or more chronologically overlapping
/// flight legs, identified by a stable integer id.
///
/// `duration_minutes` is the **sum** of its legs' durations, not the
/// length of the `[start, end]` envelope (a pairing may contain a ground
/// layover between legs that does not count toward flight time).
#[derive(Debug, Clone, PartialEq)]
pub struct Pairing {
    id: u32,
    start: NaiveDateTime,
    end: NaiveDateTime,
    duration_minutes: f64,
    start_day: i64,
    end_day: i64,
    leg_count: u32,
}

impl Pairing {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    pub fn start_day(&self) -> i64 {
        self.start_day
    }

    pub fn end_day(&self) -> i64 {
        self.end_day
    }

    pub fn leg_count(&self) -> u32 {
        self.leg_count
    }
}

/// Accumulates legs for one pairing id before it is frozen.
#[derive(Debug, Clone)]
pub struct PairingBuilder {
    id: u32,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    duration_minutes: f64,
    leg_count: u32,
}

impl PairingBuilder {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            start: None,
            end: None,
            duration_minutes: 0.0,
            leg_count: 0,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Folds one more leg into this pairing.
    ///
    /// Rejects `id`s that do not match the pairing being built; otherwise
    /// extends the envelope to the min/max of legs seen so far and adds
    /// the leg's duration to the running total.
    pub fn add_leg(
        &mut self,
        id: u32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<(), IngestError> {
        if id != self.id {
            return Err(IngestError::PairIdMismatch {
                expected: self.id,
                found: id,
            });
        }
        self.start = Some(self.start.map_or(start, |s| s.min(start)));
        self.end = Some(self.end.map_or(end, |e| e.max(end)));
        self.duration_minutes += (end - start).num_seconds() as f64 / 60.0;
        self.leg_count += 1;
        Ok(())
    }

    /// Freezes the accumulated legs into an immutable [`Pairing`], anchoring
    /// its day-indices to `schedule_start`. Returns `None` if no leg was
    /// ever added.
    pub fn build(self, schedule_start: NaiveDateTime) -> Option<Pairing> {
        let start = self.start?;
        let end = self.end?;
        let start_day = (start - schedule_start).num_days();
        let end_day = (end - schedule_start).num_days();
        Some(Pairing {
            id: self.id,
            start,
            end,
            duration_minutes: self.duration_minutes,
            start_day,
            end_day,
            leg_count: self.leg_count,
        })
    }
}
