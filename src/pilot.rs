//! Per-pilot duty roster: ordered assigned pairings, a per-day duty
//! counter, and a cached total flight time.

use crate::pairing::Pairing;

/// An ordered duty list for one pilot.
///
/// The assigned sequence is strictly chronological by start time. There is
/// no sentinel entry standing in for "nothing assigned yet" — callers use
/// `last()` returning `None` instead, which is the explicit `Option`
/// preferred over a sentinel root pairing.
#[derive(Debug, Clone)]
pub struct Pilot {
    id: u32,
    assigned: Vec<Pairing>,
    workdays: Vec<u32>,
    flight_time: f64,
}

impl Pilot {
    /// Creates an empty roster with a workday counter sized to the
    /// schedule's duration in days.
    pub fn new(id: u32, schedule_days: usize) -> Self {
        Self {
            id,
            assigned: Vec::new(),
            workdays: vec![0; schedule_days],
            flight_time: 0.0,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn assigned(&self) -> &[Pairing] {
        &self.assigned
    }

    pub fn workdays(&self) -> &[u32] {
        &self.workdays
    }

    pub fn flight_time(&self) -> f64 {
        self.flight_time
    }

    /// The most recently assigned pairing, or `None` if the roster is
    /// empty — the non-sentinel analogue of reading index 0 of a
    /// root-prefixed list.
    pub fn last(&self) -> Option<&Pairing> {
        self.assigned.last()
    }

    /// Inserts `pairing` at `index` (`0 <= index <= len()`), updating the
    /// workday counters and cached flight time.
    pub fn add(&mut self, pairing: Pairing, index: usize) {
        self.mark_days(pairing.start_day(), pairing.end_day(), 1);
        self.flight_time += pairing.duration_minutes();
        self.assigned.insert(index, pairing);
    }

    /// Removes the pairing with the given id by identity match, reverting
    /// the workday counters and flight time. Returns the removed pairing,
    /// or `None` if no pairing with that id is assigned.
    pub fn remove(&mut self, pairing_id: u32) -> Option<Pairing> {
        let pos = self.assigned.iter().position(|p| p.id() == pairing_id)?;
        let pairing = self.assigned.remove(pos);
        self.mark_days(pairing.start_day(), pairing.end_day(), -1);
        self.flight_time -= pairing.duration_minutes();
        Some(pairing)
    }

    /// Number of days in the schedule with zero assigned duty.
    pub fn days_off(&self) -> usize {
        self.workdays.iter().filter(|&&d| d == 0).count()
    }

    /// Tentatively marks `[start_day, end_day]` as worked, without
    /// touching the assigned sequence or flight time. Used by the
    /// days-off rule to probe a hypothetical insertion; always paired
    /// with a matching [`unmark_tentative`](Self::unmark_tentative).
    pub fn mark_tentative(&mut self, start_day: i64, end_day: i64) {
        self.mark_days(start_day, end_day, 1);
    }

    /// Reverts a prior [`mark_tentative`](Self::mark_tentative) call.
    pub fn unmark_tentative(&mut self, start_day: i64, end_day: i64) {
        self.mark_days(start_day, end_day, -1);
    }

    fn mark_days(&mut self, start_day: i64, end_day: i64, delta: i32) {
        for day in start_day..=end_day {
            if let Some(d) = usize::try_from(day).ok().and_then(|d| self.workdays.get_mut(d)) {
                *d = (*d as i32 + delta).max(0) as u32;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairing::PairingBuilder;
    use chrono::NaiveDate;

    fn dt(day: i64, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + chrono::Duration::days(day)
            + chrono::Duration::hours(hour as i64)
    }

    fn pairing(id: u32, start_day: i64, end_day: i64) -> Pairing {
        let mut b = PairingBuilder::new(id);
        b.add_leg(id, dt(start_day, 8), dt(end_day, 10)).unwrap();
        b.build(dt(0, 0)).unwrap()
    }

    #[test]
    fn add_updates_workdays_and_flight_time() {
        let mut pilot = Pilot::new(1, 10);
        let p = pairing(1, 2, 3);
        let duration = p.duration_minutes();
        pilot.add(p, 0);
        assert_eq!(pilot.workdays()[2], 1);
        assert_eq!(pilot.workdays()[3], 1);
        assert_eq!(pilot.workdays()[0], 0);
        assert_eq!(pilot.flight_time(), duration);
        assert_eq!(pilot.days_off(), 8);
    }

    #[test]
    fn add_remove_round_trip_restores_prior_state() {
        let mut pilot = Pilot::new(1, 10);
        pilot.add(pairing(5, 0, 0), 0);
        let before = pilot.clone();
        pilot.add(pairing(6, 4, 4), 1);
        pilot.remove(6);
        assert_eq!(pilot.assigned().len(), before.assigned().len());
        assert_eq!(pilot.workdays(), before.workdays());
        assert_eq!(pilot.flight_time(), before.flight_time());
    }

    #[test]
    fn last_is_none_for_empty_roster() {
        let pilot = Pilot::new(1, 10);
        assert!(pilot.last().is_none());
    }

    #[test]
    fn last_reflects_most_recent_insertion() {
        let mut pilot = Pilot::new(1, 10);
        pilot.add(pairing(1, 0, 0), 0);
        pilot.add(pairing(2, 1, 1), 1);
        assert_eq!(pilot.last().unwrap().id(), 2);
    }

    #[test]
    fn workday_total_matches_assigned_day_spans() {
        let mut pilot = Pilot::new(1, 10);
        pilot.add(pairing(1, 0, 1), 0);
        pilot.add(pairing(2, 5, 5), 1);
        let total_workdays: u32 = pilot.workdays().iter().sum();
        let expected: i64 = pilot
            .assigned()
            .iter()
            .map(|p| p.end_day() - p.start_day() + 1)
            .sum();
        assert_eq!(total_workdays as i64, expected);
    }

    fn one_day_pairing(id: u32, day: i64, start_hour: u32, duration_hours: u32) -> Pairing {
        let mut b = PairingBuilder::new(id);
        b.add_leg(
            id,
            dt(day, start_hour),
            dt(day, start_hour + duration_hours),
        )
        .unwrap();
        b.build(dt(0, 0)).unwrap()
    }

    fn pairing_strategy() -> impl proptest::strategy::Strategy<Value = Vec<(i64, u32, u32)>> {
        proptest::collection::vec((0i64..20, 0u32..20, 1u32..4), 0..12)
    }

    proptest::proptest! {
        // Workday totals match the sum of each assigned pairing's
        // day-span, and flight time matches the sum of durations.
        #[test]
        fn workday_and_flight_time_consistency(days in pairing_strategy()) {
            let mut pilot = Pilot::new(1, 40);
            let mut expected_days = 0usize;
            let mut expected_minutes = 0.0;
            for (idx, (day, hour, dur)) in days.into_iter().enumerate() {
                let hour = hour % 20;
                let p = one_day_pairing(idx as u32, day, hour, dur);
                let span = (p.end_day() - p.start_day() + 1) as usize;
                let minutes = p.duration_minutes();
                let insert_at = pilot.assigned().len();
                pilot.add(p, insert_at);
                expected_days += span;
                expected_minutes += minutes;
            }
            let total_workdays: u32 = pilot.workdays().iter().sum();
            proptest::prop_assert_eq!(total_workdays as usize, expected_days);
            proptest::prop_assert!((pilot.flight_time() - expected_minutes).abs() < 1e-6);
        }

        // Add then Remove of the same pairing restores the pilot to its
        // prior state bit-for-bit.
        #[test]
        fn add_remove_round_trip(days in pairing_strategy()) {
            let mut pilot = Pilot::new(2, 40);
            for (idx, (day, hour, dur)) in days.into_iter().enumerate() {
                let hour = hour % 20;
                let p = one_day_pairing(idx as u32, day, hour, dur);
                let before_workdays = pilot.workdays().to_vec();
                let before_flight_time = pilot.flight_time();
                let before_len = pilot.assigned().len();

                let insert_at = pilot.assigned().len();
                let id = p.id();
                pilot.add(p, insert_at);
                pilot.remove(id);

                proptest::prop_assert_eq!(pilot.workdays().to_vec(), before_workdays);
                proptest::prop_assert!((pilot.flight_time() - before_flight_time).abs() < 1e-6);
                proptest::prop_assert_eq!(pilot.assigned().len(), before_len);
            }
        }
    }
}
