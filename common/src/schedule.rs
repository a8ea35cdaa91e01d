//! Business-hours slot generation for appointment booking.
//!
//! A pharmacy stores its opening hours as free text (`farmacias.horario`),
//! for example `"08:00-14:00, 16:00-20:00"` or `"9 a 13"`. This module turns
//! that text into half-hour slot labels (`"HH:MM"`) and removes the ones that
//! are already booked for the selected day.
//!
//! Parsing is lenient: a range that cannot be understood is skipped with a
//! warning and the remaining ranges are still used. No timezone handling is
//! done; labels are wall-clock times of the pharmacy.

use log::warn;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

/// Length of a bookable slot in minutes.
pub const SLOT_MINUTES: u32 = 30;

const END_OF_DAY: u32 = 24 * 60;

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(?:-|–|[aA])\s*(\d{1,2})(?::(\d{2}))?$")
        .expect("schedule range pattern is valid")
});

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2})$").expect("slot label pattern is valid")
});

/// An opening range in minutes since midnight, `open` inclusive and `close`
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub open: u32,
    pub close: u32,
}

impl TimeRange {
    /// Slot start times inside the range.
    pub fn slots(&self) -> impl Iterator<Item = u32> {
        (self.open..self.close).step_by(SLOT_MINUTES as usize)
    }
}

/// Result of [`parse_schedule`]: the usable ranges in input order and the raw
/// text of every range that was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSchedule {
    pub ranges: Vec<TimeRange>,
    pub skipped: Vec<String>,
}

/// Splits a schedule into ranges and parses each one.
///
/// Ranges are separated by `,`, `;`, `/`, `|` or newlines. Within a range the
/// open and close times are `H`, `HH`, `H:MM` or `HH:MM` joined by `-`, `–`
/// or `a`. A close of `24:00` means midnight. Ranges that close at or before
/// they open are skipped.
pub fn parse_schedule(text: &str) -> ParsedSchedule {
    let mut parsed = ParsedSchedule::default();

    for raw in text.split([',', ';', '/', '|', '\n']) {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        match parse_range(raw) {
            Some(range) => parsed.ranges.push(range),
            None => {
                warn!("Skipping malformed schedule range '{}'", raw);
                parsed.skipped.push(raw.to_string());
            }
        }
    }

    parsed
}

fn parse_range(raw: &str) -> Option<TimeRange> {
    let caps = RANGE_RE.captures(raw)?;
    let open = to_minutes(&caps[1], caps.get(2).map(|m| m.as_str()))?;
    let close = to_minutes(&caps[3], caps.get(4).map(|m| m.as_str()))?;
    if open >= END_OF_DAY || close <= open {
        return None;
    }
    Some(TimeRange { open, close })
}

fn to_minutes(hours: &str, minutes: Option<&str>) -> Option<u32> {
    let h: u32 = hours.parse().ok()?;
    let m: u32 = match minutes {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    match (h, m) {
        (0..=23, 0..=59) => Some(h * 60 + m),
        (24, 0) => Some(END_OF_DAY),
        _ => None,
    }
}

/// Formats minutes since midnight as `HH:MM`.
pub fn format_label(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parses a slot label (`H:MM` or `HH:MM`) back into minutes since midnight.
pub fn parse_label(label: &str) -> Option<u32> {
    let caps = LABEL_RE.captures(label.trim())?;
    let minutes = to_minutes(&caps[1], Some(&caps[2]))?;
    (minutes < END_OF_DAY).then_some(minutes)
}

/// Normalizes a slot label to `HH:MM`, e.g. `"9:00"` becomes `"09:00"`.
pub fn normalize_label(label: &str) -> Option<String> {
    parse_label(label).map(format_label)
}

/// Every half-hour slot of every usable range, strictly increasing and
/// without duplicates from overlapping ranges.
pub fn generate_slots(text: &str) -> Vec<String> {
    let parsed = parse_schedule(text);
    let minutes: BTreeSet<u32> = parsed.ranges.iter().flat_map(TimeRange::slots).collect();
    minutes.into_iter().map(format_label).collect()
}

/// The slots of `text` that are not present in `booked`.
///
/// Booked labels that are not valid times are ignored.
pub fn available_slots<S: AsRef<str>>(text: &str, booked: &[S]) -> Vec<String> {
    let taken: HashSet<u32> = booked
        .iter()
        .filter_map(|label| parse_label(label.as_ref()))
        .collect();

    let parsed = parse_schedule(text);
    let minutes: BTreeSet<u32> = parsed.ranges.iter().flat_map(TimeRange::slots).collect();
    minutes
        .into_iter()
        .filter(|m| !taken.contains(m))
        .map(format_label)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_range_yields_half_hours_up_to_close() {
        assert_eq!(
            generate_slots("08:00-10:00"),
            vec!["08:00", "08:30", "09:00", "09:30"]
        );
    }

    #[test]
    fn well_formed_ranges_are_strictly_increasing_and_inside_bounds() {
        for open in 0..23u32 {
            for close in (open + 1)..=24u32 {
                let text = format!("{}:00-{}:00", open, close);
                let slots = generate_slots(&text);
                let minutes: Vec<u32> = slots.iter().filter_map(|s| parse_label(s)).collect();

                assert_eq!(minutes.len(), slots.len(), "{text}");
                assert_eq!(minutes.first().copied(), Some(open * 60), "{text}");
                for pair in minutes.windows(2) {
                    assert_eq!(pair[1] - pair[0], SLOT_MINUTES, "{text}");
                }
                assert!(minutes.iter().all(|m| *m >= open * 60 && *m < close * 60));
                assert_eq!(minutes.len() as u32, (close - open) * 2, "{text}");
            }
        }
    }

    #[test]
    fn accepts_loose_formats() {
        assert_eq!(generate_slots("9 a 10"), vec!["09:00", "09:30"]);
        assert_eq!(generate_slots(" 9:00 – 10:00 "), vec!["09:00", "09:30"]);
        assert_eq!(generate_slots("23:00-24:00"), vec!["23:00", "23:30"]);
    }

    #[test]
    fn multiple_ranges_are_merged_in_order() {
        let slots = generate_slots("16:00-17:00; 08:00-09:00, 08:30-09:30");
        assert_eq!(
            slots,
            vec!["08:00", "08:30", "09:00", "16:00", "16:30"]
        );
    }

    #[test]
    fn off_boundary_open_steps_from_open() {
        assert_eq!(generate_slots("08:15-09:15"), vec!["08:15", "08:45"]);
    }

    #[test]
    fn malformed_ranges_are_skipped() {
        let parsed = parse_schedule("cerrado, 10:00-09:00, 08:00-09:00, 25:00-26:00, 8:75-9");
        assert_eq!(parsed.ranges, vec![TimeRange { open: 480, close: 540 }]);
        assert_eq!(
            parsed.skipped,
            vec!["cerrado", "10:00-09:00", "25:00-26:00", "8:75-9"]
        );
        assert_eq!(
            generate_slots("cerrado, 10:00-09:00, 08:00-09:00"),
            vec!["08:00", "08:30"]
        );
    }

    #[test]
    fn garbage_never_panics() {
        for text in ["", "-", "::", "a", "99-", "-5", "1-2-3", "１０-１１", "😀-😀", "12:3-13"] {
            let _ = generate_slots(text);
        }
        assert!(generate_slots("").is_empty());
        assert!(generate_slots("lunes a viernes").is_empty());
    }

    #[test]
    fn booked_slots_are_excluded() {
        let booked = vec!["09:00".to_string(), "9:30".to_string(), "basura".to_string()];
        assert_eq!(
            available_slots("08:00-10:30", &booked),
            vec!["08:00", "08:30", "10:00"]
        );
    }

    #[test]
    fn labels_normalize() {
        assert_eq!(normalize_label("9:00").as_deref(), Some("09:00"));
        assert_eq!(normalize_label("24:00"), None);
        assert_eq!(normalize_label("nueve"), None);
    }
}
