//! Projection of camera feed definitions onto the fixed 4-slot grid.

use std::borrow::Cow;

use serde::Serialize;

use crate::model::CameraFeed;

/// Physical slots in the camera grid.
pub const SLOT_COUNT: usize = 4;

const EMBED_HOSTS: [&str; 3] = ["youtube.com", "youtu.be", "vimeo.com"];
const VIDEO_EXTENSIONS: [&str; 3] = [".mp4", ".webm", ".ogg"];
const EMBED_PARAMS: &str = "autoplay=1&mute=1&controls=0";

/// How a slot's content is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// Static noise with a label; nothing is streamed.
    Placeholder,
    /// Still image or MJPEG endpoint.
    Image,
    /// Video file, played muted and looping.
    Video,
    /// Hosted player embedded in a frame.
    Embed,
}

/// Render directive for one grid slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotDirective {
    /// 1-based slot number.
    pub slot: u8,
    /// Caption shown over the slot.
    pub label: String,
    /// How the slot is mounted.
    pub mode: FeedMode,
    /// Sanitized stream URL; `None` for placeholders.
    pub url: Option<String>,
}

impl SlotDirective {
    fn placeholder(slot: u8) -> Self {
        Self {
            slot,
            label: default_label(slot),
            mode: FeedMode::Placeholder,
            url: None,
        }
    }

    /// URL the presenter should load. Embeds get autoplay/mute/no-controls
    /// parameters appended.
    pub fn source_url(&self) -> Option<Cow<'_, str>> {
        let url = self.url.as_deref()?;
        Some(match self.mode {
            FeedMode::Embed => {
                let joiner = if url.contains('?') { '&' } else { '?' };
                Cow::Owned(format!("{url}{joiner}{EMBED_PARAMS}"))
            }
            _ => Cow::Borrowed(url),
        })
    }
}

/// Directives for all slots, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraGrid {
    slots: [SlotDirective; SLOT_COUNT],
}

impl CameraGrid {
    /// Every slot showing its placeholder.
    pub fn idle() -> Self {
        Self {
            slots: [1, 2, 3, 4].map(SlotDirective::placeholder),
        }
    }

    /// Directive for a 1-based slot number.
    pub fn slot(&self, slot: u8) -> Option<&SlotDirective> {
        usize::from(slot)
            .checked_sub(1)
            .and_then(|i| self.slots.get(i))
    }

    /// All four slots, slot 1 first.
    pub fn slots(&self) -> &[SlotDirective] {
        &self.slots
    }
}

impl Default for CameraGrid {
    fn default() -> Self {
        Self::idle()
    }
}

/// Label shown on a slot nobody has configured.
pub fn default_label(slot: u8) -> String {
    format!("CAM 0{slot} // CURRENT SCREEN")
}

/// Projects feeds onto the grid. Later feeds for the same slot override
/// earlier ones; feeds outside `1..=4` are ignored.
pub fn project(feeds: &[CameraFeed]) -> CameraGrid {
    let mut grid = CameraGrid::idle();

    for feed in feeds {
        let Some(slot) = feed
            .grid_slot
            .and_then(|n| u8::try_from(n).ok())
            .filter(|n| (1..=SLOT_COUNT as u8).contains(n))
        else {
            continue;
        };
        let target = &mut grid.slots[usize::from(slot) - 1];
        let label = non_blank(feed.label.as_deref());

        match non_blank(feed.stream.as_deref()) {
            Some(stream) => {
                let url = sanitize_stream_url(stream);
                *target = SlotDirective {
                    slot,
                    label: label.map_or_else(|| default_label(slot), str::to_owned),
                    mode: classify(url),
                    url: Some(url.to_owned()),
                };
            }
            None => {
                if let Some(label) = label {
                    target.label = label.to_owned();
                }
            }
        }
    }

    grid
}

/// Cuts a URL at a second `http` prefix found at byte offset 4 or later,
/// which is what an accidentally pasted-twice URL looks like.
pub fn sanitize_stream_url(raw: &str) -> &str {
    match raw.match_indices("http").find(|(i, _)| *i >= 4) {
        Some((i, _)) => &raw[..i],
        None => raw,
    }
}

/// Picks the mount mode for a sanitized URL.
pub fn classify(url: &str) -> FeedMode {
    let lower = url.to_ascii_lowercase();
    if EMBED_HOSTS.iter().any(|host| lower.contains(host)) {
        return FeedMode::Embed;
    }
    let is_video = VIDEO_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(ext) || lower.contains(&format!("{ext}?")));
    if is_video {
        FeedMode::Video
    } else {
        FeedMode::Image
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
