//! Court signups with absolute time windows.

use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use super::classify::{Countdown, SignupCandidate};

/// Length of one session on court.
pub const COURT_SESSION_MINUTES: i64 = 30;

/// One group of players on court (`queue_position == 0`) or waiting in line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtSignup {
    pub court: u32,
    /// `None` when the court is reserved
    pub starts_at: Option<DateTime<Local>>,
    /// `None` when the court is reserved
    pub ends_at: Option<DateTime<Local>>,
    pub queue_position: u32,
    pub players: Vec<String>,
}

impl CourtSignup {
    pub fn is_reserved(&self) -> bool {
        self.starts_at.is_none() && self.ends_at.is_none()
    }
}

/// Whether a name group should produce a signup. Empty groups are dropped,
/// except that a reserved court with nobody on it is still recorded.
pub fn is_recordable(names: &[String], countdown: Countdown, queue_position: u32) -> bool {
    !names.is_empty() || (countdown == Countdown::Reserved && queue_position == 0)
}

/// Converts a name group into a signup relative to when the photo was taken.
///
/// The group at position `p` plays after the current session's remaining
/// minutes plus `p` full sessions, and started one session before that.
pub fn synthesize(
    court: u32,
    candidate: SignupCandidate,
    taken_at: DateTime<Local>,
) -> Option<CourtSignup> {
    let SignupCandidate {
        queue_position,
        names,
        countdown,
    } = candidate;

    if !is_recordable(&names, countdown, queue_position) {
        return None;
    }

    let (starts_at, ends_at) = match countdown {
        Countdown::Reserved => (None, None),
        Countdown::Minutes(minutes) => match session_window(taken_at, minutes, queue_position) {
            Some((starts_at, ends_at)) => (Some(starts_at), Some(ends_at)),
            None => {
                log::warn!(
                    "Court {}: dropping queue position {}, countdown of {} minutes is out of range",
                    court,
                    queue_position,
                    minutes
                );
                return None;
            }
        },
    };

    Some(CourtSignup {
        court,
        starts_at,
        ends_at,
        queue_position,
        players: names,
    })
}

/// `[starts_at, ends_at)` for the group at `queue_position`, or `None` when the
/// countdown puts it outside the representable time range.
fn session_window(
    taken_at: DateTime<Local>,
    minutes: i64,
    queue_position: u32,
) -> Option<(DateTime<Local>, DateTime<Local>)> {
    let remaining = Duration::try_minutes(minutes)?;
    let queued = Duration::try_minutes(i64::from(queue_position) * COURT_SESSION_MINUTES)?;
    let ends_at = taken_at
        .checked_add_signed(remaining)?
        .checked_add_signed(queued)?;
    let starts_at = ends_at.checked_sub_signed(Duration::minutes(COURT_SESSION_MINUTES))?;
    Some((starts_at, ends_at))
}

/// Plain-text report: a "Court N" header per court, then one line per signup
/// in queue order with its players and time window.
pub fn format_signups(signups: &[CourtSignup]) -> String {
    let mut sorted: Vec<&CourtSignup> = signups.iter().collect();
    sorted.sort_by_key(|s| (s.court, s.queue_position));

    let mut output: Vec<String> = Vec::new();
    let mut current_court = None;

    for signup in sorted {
        if current_court != Some(signup.court) {
            current_court = Some(signup.court);
            output.push(format!("Court {}", signup.court));
        }

        let window = match (signup.starts_at, signup.ends_at) {
            (Some(starts_at), Some(ends_at)) => {
                format!("{} - {}", format_time(&starts_at), format_time(&ends_at))
            }
            (Some(starts_at), None) => format_time(&starts_at),
            _ => "reserved".to_string(),
        };
        output.push(format!("{} {}", signup.players.join(" "), window));
    }

    output.join("\n")
}

fn format_time(time: &DateTime<Local>) -> String {
    time.format("%-I:%M %p").to_string()
}
