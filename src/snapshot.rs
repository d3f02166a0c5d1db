//! Point-in-time views over the signups read from one photo.
//!
//! A new photo replaces the previous snapshot entirely; nothing is merged.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::layout::CourtSignup;

/// The signups reconstructed from one photo of the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupSnapshot {
    pub taken_at: DateTime<Local>,
    pub file_name: String,
    pub court_signups: Vec<CourtSignup>,
}

impl SignupSnapshot {
    pub fn new(
        taken_at: DateTime<Local>,
        file_name: impl Into<String>,
        court_signups: Vec<CourtSignup>,
    ) -> Self {
        Self {
            taken_at,
            file_name: file_name.into(),
            court_signups,
        }
    }

    /// Signups still relevant at `at`, grouped by court in queue order.
    ///
    /// Signups that ended before `at` are dropped; reserved signups never end.
    pub fn signups_by_court(&self, at: DateTime<Local>) -> BTreeMap<u32, Vec<&CourtSignup>> {
        let mut by_court: BTreeMap<u32, Vec<&CourtSignup>> = BTreeMap::new();

        for signup in &self.court_signups {
            if signup.ends_at.is_some_and(|ends_at| ends_at < at) {
                continue;
            }
            by_court.entry(signup.court).or_default().push(signup);
        }

        for signups in by_court.values_mut() {
            signups.sort_by_key(|s| s.queue_position);
        }

        by_court
    }

    /// The signup occupying `court` at `at`: the one whose
    /// `[starts_at, ends_at)` window covers `at`, else a reserved signup.
    pub fn on_court(&self, court: u32, at: DateTime<Local>) -> Option<&CourtSignup> {
        let for_court = || self.court_signups.iter().filter(move |s| s.court == court);

        for_court()
            .find(|s| match (s.starts_at, s.ends_at) {
                (Some(starts_at), Some(ends_at)) => starts_at <= at && at < ends_at,
                _ => false,
            })
            .or_else(|| for_court().find(|s| s.is_reserved()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::classify::{Countdown, SignupCandidate};
    use crate::layout::synthesize;
    use chrono::{Duration, TimeZone};

    fn taken_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap()
    }

    fn signup(court: u32, position: u32, name: &str, countdown: Countdown) -> CourtSignup {
        synthesize(
            court,
            SignupCandidate {
                queue_position: position,
                names: vec![name.to_string()],
                countdown,
            },
            taken_at(),
        )
        .unwrap()
    }

    fn snapshot() -> SignupSnapshot {
        SignupSnapshot::new(
            taken_at(),
            "2023-06-01T10_00_00.jpeg",
            vec![
                signup(2, 1, "bo", Countdown::Minutes(10)),
                signup(2, 0, "ann", Countdown::Minutes(10)),
                signup(5, 0, "cy", Countdown::Reserved),
            ],
        )
    }

    #[test]
    fn test_signups_by_court() {
        let snapshot = snapshot();
        let by_court = snapshot.signups_by_court(taken_at());

        assert_eq!(by_court.keys().copied().collect::<Vec<_>>(), vec![2, 5]);
        let court_2: Vec<&str> = by_court[&2].iter().map(|s| s.players[0].as_str()).collect();
        assert_eq!(court_2, vec!["ann", "bo"]);
    }

    #[test]
    fn test_signups_by_court_drops_finished() {
        let snapshot = snapshot();
        let later = taken_at() + Duration::minutes(20);
        let by_court = snapshot.signups_by_court(later);

        assert_eq!(by_court[&2].len(), 1);
        assert_eq!(by_court[&2][0].players, vec!["bo"]);
        // Reserved courts never expire
        assert_eq!(by_court[&5].len(), 1);
    }

    #[test]
    fn test_on_court() {
        let snapshot = snapshot();

        let now = snapshot.on_court(2, taken_at()).unwrap();
        assert_eq!(now.players, vec!["ann"]);

        // ann's session ends at 10:10, bo starts then
        let next = snapshot.on_court(2, taken_at() + Duration::minutes(10)).unwrap();
        assert_eq!(next.players, vec!["bo"]);

        assert!(snapshot.on_court(2, taken_at() + Duration::minutes(40)).is_none());
        assert_eq!(snapshot.on_court(5, taken_at()).unwrap().players, vec!["cy"]);
        assert!(snapshot.on_court(7, taken_at()).is_none());
    }
}
