//! Reads the semicolon-separated pairing stream and filters/sorts it to
//! the schedule window.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::IngestError;
use crate::pairing::{Pairing, PairingBuilder};

/// One raw leg record as it appears on the wire:
/// `pairId;legId;origin;destination;startDate;startTime;endDate;endTime`.
struct LegRecord {
    pair_id: u32,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

fn parse_record(line: usize, fields: &[&str]) -> Result<LegRecord, IngestError> {
    let pair_id: u32 = fields[0]
        .parse()
        .map_err(|_| IngestError::MalformedDate { line, field: "pairId" })?;

    let start_date = NaiveDate::parse_from_str(fields[4], "%Y-%m-%d")
        .map_err(|_| IngestError::MalformedDate { line, field: "startDate" })?;
    let start_time = NaiveTime::parse_from_str(fields[5], "%H:%M")
        .map_err(|_| IngestError::MalformedDate { line, field: "startTime" })?;
    let end_date = NaiveDate::parse_from_str(fields[6], "%Y-%m-%d")
        .map_err(|_| IngestError::MalformedDate { line, field: "endDate" })?;
    let end_time = NaiveTime::parse_from_str(fields[7], "%H:%M")
        .map_err(|_| IngestError::MalformedDate { line, field: "endTime" })?;

    Ok(LegRecord {
        pair_id,
        start: start_date.and_time(start_time),
        end: end_date.and_time(end_time),
    })
}

/// Reads every leg record from `path`, coalesces same-`pairId` legs via
/// [`PairingBuilder::add_leg`], and freezes each pairing once its
/// `pairId` changes. The stream must be non-decreasing in `pairId`.
pub fn read_pairings(
    path: &std::path::Path,
    schedule_start: NaiveDateTime,
) -> Result<Vec<Pairing>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(IngestError::Csv)?;

    let mut pairings = Vec::new();
    let mut current: Option<PairingBuilder> = None;
    let mut previous_pair_id: Option<u32> = None;

    for (idx, record) in reader.records().enumerate() {
        let line = idx + 1;
        let record = record.map_err(IngestError::Csv)?;
        let fields: Vec<&str> = record.iter().collect();
        let leg = parse_record(line, &fields)?;

        if let Some(prev) = previous_pair_id {
            if leg.pair_id < prev {
                return Err(IngestError::NonMonotonicPairId {
                    line,
                    pair_id: leg.pair_id,
                    previous: prev,
                });
            }
            if leg.pair_id != prev {
                if let Some(builder) = current.take() {
                    if let Some(p) = builder.build(schedule_start) {
                        pairings.push(p);
                    }
                }
            }
        }

        let builder = match &mut current {
            Some(b) if b.id() == leg.pair_id => b,
            _ => {
                current = Some(PairingBuilder::new(leg.pair_id));
                current.as_mut().unwrap()
            }
        };
        builder.add_leg(leg.pair_id, leg.start, leg.end)?;
        previous_pair_id = Some(leg.pair_id);
    }

    if let Some(builder) = current {
        if let Some(p) = builder.build(schedule_start) {
            pairings.push(p);
        }
    }

    Ok(pairings)
}

/// Keeps only pairings strictly inside `(window_start, window_end)` and
/// sorts the survivors by start time.
pub fn filter_and_sort(mut pairings: Vec<Pairing>, window_start: NaiveDateTime, window_end: NaiveDateTime) -> Vec<Pairing> {
    pairings.retain(|p| p.start() > window_start && p.end() < window_end);
    pairings.sort_by_key(Pairing::start);
    pairings
}
