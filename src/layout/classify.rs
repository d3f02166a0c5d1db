//! Per-court section scan.
//!
//! Walks a section's lines once, top to bottom, tracking the countdown and
//! where the scan is relative to the queue block. The board prints a court
//! section as:
//!
//! ```text
//! Court 3
//! 12 Min Left            (or "Reserved from 6:00pm")
//! Current Players: ann bo
//! Queue
//! 1. cy dee
//! 2.
//! 3.
//! ```
//!
//! The current players' line sits above the "Queue" label and the slots sit
//! below it, so queue positions only start counting once "Queue" is seen.

use super::names::NameNormalizer;

/// Time remaining on the court, as printed in the section header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown {
    /// Minutes left for the players currently on court.
    Minutes(i64),
    /// Court is held for a booking; no countdown is shown.
    Reserved,
}

impl Default for Countdown {
    fn default() -> Self {
        Countdown::Minutes(0)
    }
}

/// Where the scan is within a section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScanState {
    /// Before the players' header, or after the current players were read.
    #[default]
    Idle,
    /// Saw the players' header without any names on it; the names may have
    /// been split onto the next line.
    AwaitingCurrentPlayers,
    /// Past the "Queue" label; the next players line is this slot.
    InQueue(u32),
}

/// A group of names found at one queue position, with the countdown in effect
/// when the line was read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignupCandidate {
    pub queue_position: u32,
    pub names: Vec<String>,
    pub countdown: Countdown,
}

/// Scans one section's lines and returns a candidate for every players line
/// and queue slot, empty ones included. Deciding which become signups is left
/// to [`super::signup::synthesize`].
pub fn classify_section(lines: &[Vec<String>], normalizer: &NameNormalizer) -> Vec<SignupCandidate> {
    let mut countdown = Countdown::default();
    let mut state = ScanState::Idle;
    let mut candidates = Vec::new();

    let mut emit = |queue_position: u32, names: Vec<String>, countdown: Countdown| {
        candidates.push(SignupCandidate {
            queue_position,
            names,
            countdown,
        });
    };

    for line in lines {
        let full_line = line
            .iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");

        if full_line.contains("Left") {
            if let Some(minutes) = line.iter().find_map(|token| token.trim().parse::<i64>().ok()) {
                countdown = Countdown::Minutes(minutes);
            }
            continue;
        }

        if full_line.contains("Reserved from") {
            countdown = Countdown::Reserved;
            continue;
        }

        let is_header = full_line.contains("Players") || full_line.contains("Current");

        state = match state {
            ScanState::InQueue(position) => {
                emit(position, normalizer.names_from_line(line), countdown);
                ScanState::InQueue(position + 1)
            }
            _ if is_header => {
                let names = normalizer.names_from_line(line);
                if names.is_empty() {
                    ScanState::AwaitingCurrentPlayers
                } else {
                    emit(0, names, countdown);
                    ScanState::Idle
                }
            }
            ScanState::AwaitingCurrentPlayers if full_line.contains("Queue") => {
                emit(0, Vec::new(), countdown);
                ScanState::InQueue(1)
            }
            ScanState::AwaitingCurrentPlayers => {
                emit(0, normalizer.names_from_line(line), countdown);
                ScanState::Idle
            }
            ScanState::Idle if full_line.contains("Queue") => ScanState::InQueue(1),
            ScanState::Idle => ScanState::Idle,
        };
    }

    // Header was the last thing read; a reserved court may still be empty
    if state == ScanState::AwaitingCurrentPlayers {
        emit(0, Vec::new(), countdown);
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|line| line.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    fn scan(raw: &[&str]) -> Vec<SignupCandidate> {
        classify_section(&lines(raw), &NameNormalizer::default())
    }

    fn candidate(position: u32, names: &[&str], countdown: Countdown) -> SignupCandidate {
        SignupCandidate {
            queue_position: position,
            names: names.iter().map(|s| s.to_string()).collect(),
            countdown,
        }
    }

    #[test]
    fn test_current_players_and_queue() {
        let result = scan(&[
            "Court 3",
            "12 Min Left",
            "Current Players: ann bo",
            "Queue",
            "1. cy dee",
            "2. ed",
            "3.",
        ]);
        assert_eq!(
            result,
            vec![
                candidate(0, &["ann", "bo"], Countdown::Minutes(12)),
                candidate(1, &["cy", "dee"], Countdown::Minutes(12)),
                candidate(2, &["ed"], Countdown::Minutes(12)),
                candidate(3, &[], Countdown::Minutes(12)),
            ]
        );
    }

    #[test]
    fn test_header_split_from_names() {
        let result = scan(&["Court 3", "5 Left", "Current Players", "ann bo", "Queue", "cy dee"]);
        assert_eq!(
            result,
            vec![
                candidate(0, &["ann", "bo"], Countdown::Minutes(5)),
                candidate(1, &["cy", "dee"], Countdown::Minutes(5)),
            ]
        );
    }

    #[test]
    fn test_empty_queue_slots_still_advance() {
        let result = scan(&["Current Players: ann", "Queue", "1.", "2. bo", "3. cy"]);
        let positions: Vec<u32> = result.iter().map(|c| c.queue_position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert_eq!(result[1], candidate(1, &[], Countdown::Minutes(0)));
        assert_eq!(result[2], candidate(2, &["bo"], Countdown::Minutes(0)));
    }

    #[test]
    fn test_reserved_court_with_no_players() {
        let result = scan(&["Court 9", "Reserved from 6:00pm", "Current Players", "Queue", "1.", "2.", "3."]);
        assert_eq!(
            result,
            vec![
                candidate(0, &[], Countdown::Reserved),
                candidate(1, &[], Countdown::Reserved),
                candidate(2, &[], Countdown::Reserved),
                candidate(3, &[], Countdown::Reserved),
            ]
        );
    }

    #[test]
    fn test_reserved_header_at_end_of_section() {
        let result = scan(&["Reserved from 6:00pm", "Current Players:"]);
        assert_eq!(result, vec![candidate(0, &[], Countdown::Reserved)]);
    }

    #[test]
    fn test_idle_court_has_no_names() {
        let result = scan(&["Court 4", "0 Min Left", "Current Players", "Queue", "1.", "2.", "3."]);
        assert_eq!(result.len(), 4);
        assert!(result.iter().all(|c| c.names.is_empty()));

        assert!(scan(&[]).is_empty());
        assert!(scan(&["Court", "gibberish here"]).is_empty());
    }

    #[test]
    fn test_names_before_header_are_ignored() {
        let result = scan(&["stray name", "Current Players: ann"]);
        assert_eq!(result, vec![candidate(0, &["ann"], Countdown::Minutes(0))]);
    }

    #[test]
    fn test_countdown_uses_first_integer_token() {
        let result = scan(&["Min 7 Left 3", "Current Players: ann"]);
        assert_eq!(result[0].countdown, Countdown::Minutes(7));

        // A "Left" line without a number keeps the previous value
        let result = scan(&["4 Left", "Left", "Current Players: ann"]);
        assert_eq!(result[0].countdown, Countdown::Minutes(4));
    }

    #[test]
    fn test_countdown_applies_from_where_it_is_read() {
        let result = scan(&["Current Players: ann", "9 Left", "Queue", "bo"]);
        assert_eq!(
            result,
            vec![
                candidate(0, &["ann"], Countdown::Minutes(0)),
                candidate(1, &["bo"], Countdown::Minutes(9)),
            ]
        );
    }

    #[test]
    fn test_scan_state_starts_idle() {
        assert_eq!(ScanState::default(), ScanState::Idle);
    }
}
