use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar::MonthDay;

/// Stable key of a statically declared display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKey {
    /// Scrolling notice board.
    Notices,
    /// Upcoming events list.
    Events,
    /// Today's birthdays.
    Birthdays,
    /// Four-slot camera grid.
    Cctv,
}

impl ScreenKey {
    /// Canonical rotation order.
    pub const ALL: [ScreenKey; 4] = [
        ScreenKey::Notices,
        ScreenKey::Events,
        ScreenKey::Birthdays,
        ScreenKey::Cctv,
    ];

    /// Wire and log name of the screen.
    pub fn as_str(self) -> &'static str {
        match self {
            ScreenKey::Notices => "notices",
            ScreenKey::Events => "events",
            ScreenKey::Birthdays => "birthdays",
            ScreenKey::Cctv => "cctv",
        }
    }
}

impl fmt::Display for ScreenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of everything the data service holds.
///
/// Replaced wholesale on every successful fetch; never mutated locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Notice cards, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub notices: Vec<Notice>,
    /// Events, in display order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
    /// Every known birthday; only today's are shown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub birthdays: Vec<Birthday>,
    /// Camera feed definitions, in list order.
    #[serde(
        rename = "cctv",
        alias = "cameraFeeds",
        default,
        deserialize_with = "null_as_default"
    )]
    pub camera_feeds: Vec<CameraFeed>,
    /// Per-screen visibility toggles written by the editor.
    #[serde(
        rename = "config",
        alias = "visibilityConfig",
        default,
        deserialize_with = "null_as_default"
    )]
    pub visibility: VisibilityConfig,
}

/// A notice card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notice {
    /// Editor-assigned id, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Card heading.
    pub title: String,
    /// Card body.
    pub content: String,
    /// Free-form date text; empty or absent means "no date footer".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Highlights the card.
    pub urgent: bool,
}

/// An upcoming event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    /// Editor-assigned id, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Event name.
    pub title: String,
    /// Free-form details.
    pub description: String,
    /// Free-form date text, shown as written.
    pub date: String,
}

/// A staff birthday, keyed by `"MM-DD"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Birthday {
    /// Editor-assigned id, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Person's display name.
    pub name: String,
    /// Department shown under the name.
    pub department: String,
    /// Zero-padded `"MM-DD"`.
    pub date: String,
}

impl Birthday {
    /// True when the birthday falls on `today`.
    pub fn is_active_on(&self, today: MonthDay) -> bool {
        today.matches(&self.date)
    }
}

/// A camera feed definition targeting one of the grid slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraFeed {
    /// Caption for the slot; blank keeps the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Stream URL; blank leaves the slot on its placeholder.
    #[serde(alias = "streamUrl", skip_serializing_if = "Option::is_none")]
    pub stream: Option<String>,
    /// 1-based slot number. The editor writes it as a string.
    #[serde(
        rename = "grid",
        alias = "gridSlot",
        deserialize_with = "lenient_slot",
        skip_serializing_if = "Option::is_none"
    )]
    pub grid_slot: Option<i64>,
}

/// Visibility toggles. Absent or `null` flags mean "visible".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisibilityConfig {
    /// `showNotices`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_notices: Option<bool>,
    /// `showEvents`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_events: Option<bool>,
    /// `showBirthdays`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_birthdays: Option<bool>,
    /// `showCctv`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_cctv: Option<bool>,
}

impl VisibilityConfig {
    /// Everything hidden; handy for exercising the fallback.
    pub fn all_hidden() -> Self {
        Self {
            show_notices: Some(false),
            show_events: Some(false),
            show_birthdays: Some(false),
            show_cctv: Some(false),
        }
    }

    /// Fail-open: only an explicit `false` hides a screen.
    pub fn shows(&self, screen: ScreenKey) -> bool {
        let flag = match screen {
            ScreenKey::Notices => self.show_notices,
            ScreenKey::Events => self.show_events,
            ScreenKey::Birthdays => self.show_birthdays,
            ScreenKey::Cctv => self.show_cctv,
        };
        flag != Some(false)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Accepts `2`, `2.0`, `"2"` and `" 2 "`; anything else is "no slot".
fn lenient_slot<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Some(serde_json::Value::String(s)) => parse_leading_int(&s),
        _ => None,
    })
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_accepts_numbers_and_numeric_strings() {
        let feeds: Vec<CameraFeed> =
            serde_json::from_str(r#"[{"grid":2},{"grid":"3"},{"grid":"4th"},{"grid":"x"},{}]"#)
                .unwrap();
        let slots: Vec<_> = feeds.iter().map(|f| f.grid_slot).collect();
        assert_eq!(slots, vec![Some(2), Some(3), Some(4), None, None]);
    }

    #[test]
    fn missing_and_null_sections_default() {
        let ds: Dataset = serde_json::from_str(r#"{"notices":null,"config":null}"#).unwrap();
        assert!(ds.notices.is_empty());
        assert!(ds.camera_feeds.is_empty());
        assert_eq!(ds.visibility, VisibilityConfig::default());
    }

    #[test]
    fn visibility_is_fail_open() {
        let cfg: VisibilityConfig =
            serde_json::from_str(r#"{"showEvents":false,"showCctv":null}"#).unwrap();
        assert!(cfg.shows(ScreenKey::Notices));
        assert!(!cfg.shows(ScreenKey::Events));
        assert!(cfg.shows(ScreenKey::Cctv));
    }
}
