// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sync status badge presentation
//!
//! A total mapping from a sync status string (as reported by the HMI data
//! sources) plus an optional last-synced timestamp to a rendered label.
//! Unrecognized statuses fall back to the neutral "Sync Pending"
//! presentation; there is no error case.

use chrono::DateTime;
use chrono::Utc;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BadgeIcon {
    Check,
    Warning,
    Cross,
    Refresh,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BadgeTone {
    Green,
    Amber,
    Red,
    Neutral,
}

/// What the badge renders for one status value
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BadgePresentation {
    pub label: &'static str,
    pub icon: BadgeIcon,
    pub tone: BadgeTone,
    /// Relative rendering of the last sync time, when known.
    pub last_synced: Option<String>,
}

/// Map a status value to its presentation.  Matching is case-insensitive.
pub fn badge(
    status: &str,
    last_synced_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> BadgePresentation {
    let (label, icon, tone) = match status.to_ascii_lowercase().as_str() {
        "synced" => ("Synced", BadgeIcon::Check, BadgeTone::Green),
        "warning" => ("Sync Warning", BadgeIcon::Warning, BadgeTone::Amber),
        "error" => ("Sync Error", BadgeIcon::Cross, BadgeTone::Red),
        _ => ("Sync Pending", BadgeIcon::Refresh, BadgeTone::Neutral),
    };
    BadgePresentation {
        label,
        icon,
        tone,
        last_synced: last_synced_at.map(|then| relative_time(then, now)),
    }
}

/// Human-readable distance between two timestamps, e.g. "5 minutes ago".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then);
    if delta.num_seconds() < 0 {
        return String::from("just now");
    }
    let minutes = delta.num_minutes();
    let hours = delta.num_hours();
    let days = delta.num_days();
    if minutes < 1 {
        String::from("just now")
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else {
        plural(days, "day")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_synced_presentation() {
        let rendered = badge("synced", None, Utc::now());
        assert_eq!(rendered.label, "Synced");
        assert_eq!(rendered.icon, BadgeIcon::Check);
        assert_eq!(rendered.tone, BadgeTone::Green);
        assert_eq!(rendered.last_synced, None);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let rendered = badge("SYNCED", None, Utc::now());
        assert_eq!(rendered.label, "Synced");
    }

    #[test]
    fn test_unrecognized_status_falls_back_to_pending() {
        let rendered = badge("bogus", None, Utc::now());
        assert_eq!(rendered.label, "Sync Pending");
        assert_eq!(rendered.icon, BadgeIcon::Refresh);
        assert_eq!(rendered.tone, BadgeTone::Neutral);
    }

    #[test]
    fn test_warning_and_error() {
        assert_eq!(badge("warning", None, Utc::now()).tone, BadgeTone::Amber);
        assert_eq!(badge("error", None, Utc::now()).tone, BadgeTone::Red);
    }

    #[test]
    fn test_relative_time() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let cases = [
            (now, "just now"),
            (now - chrono::TimeDelta::seconds(30), "just now"),
            (now - chrono::TimeDelta::minutes(1), "1 minute ago"),
            (now - chrono::TimeDelta::minutes(5), "5 minutes ago"),
            (now - chrono::TimeDelta::hours(3), "3 hours ago"),
            (now - chrono::TimeDelta::days(2), "2 days ago"),
        ];
        for (then, expected) in cases {
            assert_eq!(relative_time(then, now), expected);
        }
    }

    #[test]
    fn test_last_synced_rendering() {
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap();
        let then = now - chrono::TimeDelta::minutes(10);
        let rendered = badge("synced", Some(then), now);
        assert_eq!(rendered.last_synced.as_deref(), Some("10 minutes ago"));
    }
}
