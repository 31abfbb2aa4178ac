//! Vertical marquee sizing for the notices column.
//!
//! When the rendered notices are taller than their viewport the column
//! scrolls one row at a time, pausing on each row, then fades out, snaps back
//! to the top and fades in again. The length of one such loop becomes the
//! dwell time of the notices screen.

use std::time::Duration;

use tracing::debug;

use crate::error::UnmeasurableLayout;

/// Pause at the top and after every scroll step.
pub const ROW_PAUSE: Duration = Duration::from_secs(6);
/// Duration of one row-to-row scroll (ease-in-out).
pub const SCROLL_DURATION: Duration = Duration::from_millis(800);
/// Fade-out before snapping back to the top.
pub const FADE_OUT: Duration = Duration::from_millis(300);
/// Fade-in after snapping back to the top.
pub const FADE_IN: Duration = Duration::from_millis(500);
/// Vertical gap between notice cards, in px.
pub const ROW_GAP_PX: f64 = 16.0;
/// Row height used when no card can be measured, in px.
pub const FALLBACK_ROW_HEIGHT_PX: f64 = 296.0;
/// Smallest row height accepted as a real measurement, in px.
pub const MIN_ROW_HEIGHT_PX: f64 = 1.0;

/// Measurements of the notices column as rendered by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NoticesLayout {
    /// Full height of the rendered notices, in px.
    pub content_height: Option<f64>,
    /// Height of the visible window onto them, in px.
    pub viewport_height: Option<f64>,
    /// Height of one card including the inter-card gap, in px.
    pub row_height: Option<f64>,
}

impl NoticesLayout {
    /// Layout with every measurement known.
    pub fn new(content_height: f64, viewport_height: f64, row_height: f64) -> Self {
        Self {
            content_height: Some(content_height),
            viewport_height: Some(viewport_height),
            row_height: Some(row_height),
        }
    }

    /// Builds a layout from the height of the first rendered card, adding the
    /// inter-card gap.
    pub fn from_first_card(
        content_height: f64,
        viewport_height: f64,
        first_card_height: Option<f64>,
    ) -> Self {
        Self {
            content_height: Some(content_height),
            viewport_height: Some(viewport_height),
            row_height: first_card_height.map(|h| h + ROW_GAP_PX),
        }
    }

    /// `content - viewport`; positive means the column overflows.
    pub fn overflow(&self) -> Result<f64, UnmeasurableLayout> {
        let viewport = measured(self.viewport_height).ok_or(UnmeasurableLayout::Viewport)?;
        let content = measured(self.content_height).ok_or(UnmeasurableLayout::Content)?;
        Ok(content - viewport)
    }

    /// Row pitch used for each scroll step. Anything under
    /// [`MIN_ROW_HEIGHT_PX`] counts as unmeasured.
    pub fn row_height(&self) -> Result<f64, UnmeasurableLayout> {
        measured(self.row_height)
            .filter(|h| *h >= MIN_ROW_HEIGHT_PX)
            .ok_or(UnmeasurableLayout::Row)
    }
}

fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// One step of a marquee loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarqueeStep {
    /// Hold still.
    Pause(Duration),
    /// Scroll the column so that its top sits at `offset_px` (negative).
    ScrollTo {
        /// Target offset of the column top, in px.
        offset_px: f64,
        /// Length of the scroll.
        duration: Duration,
    },
    /// Fade the column to transparent.
    FadeOut(Duration),
    /// Jump back to offset zero with no visible motion.
    SnapToTop,
    /// Fade the column back in.
    FadeIn(Duration),
}

impl MarqueeStep {
    /// Wall time the step takes.
    pub fn duration(&self) -> Duration {
        match *self {
            MarqueeStep::Pause(d) | MarqueeStep::FadeOut(d) | MarqueeStep::FadeIn(d) => d,
            MarqueeStep::ScrollTo { duration, .. } => duration,
            MarqueeStep::SnapToTop => Duration::ZERO,
        }
    }
}

/// A complete, seamlessly looping scroll schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct MarqueeSchedule {
    steps: Vec<MarqueeStep>,
    scrolls: u32,
}

impl MarqueeSchedule {
    /// Builds the schedule for a positive `overflow` and `row_height`.
    /// `row_height` is clamped to at least [`MIN_ROW_HEIGHT_PX`].
    pub fn build(overflow: f64, row_height: f64) -> Self {
        let row_height = row_height.max(MIN_ROW_HEIGHT_PX);
        let scrolls = (overflow / row_height).ceil().max(1.0) as u32;

        let mut steps = Vec::with_capacity(2 * scrolls as usize + 4);
        steps.push(MarqueeStep::Pause(ROW_PAUSE));
        for i in 1..=scrolls {
            let offset = (f64::from(i) * row_height).min(overflow);
            steps.push(MarqueeStep::ScrollTo {
                offset_px: -offset,
                duration: SCROLL_DURATION,
            });
            steps.push(MarqueeStep::Pause(ROW_PAUSE));
        }
        steps.push(MarqueeStep::FadeOut(FADE_OUT));
        steps.push(MarqueeStep::SnapToTop);
        steps.push(MarqueeStep::FadeIn(FADE_IN));

        Self { steps, scrolls }
    }

    /// Steps of one loop, in order.
    pub fn steps(&self) -> &[MarqueeStep] {
        &self.steps
    }

    /// Number of row-to-row scrolls in one loop.
    pub fn scroll_count(&self) -> u32 {
        self.scrolls
    }

    /// Length of one full loop.
    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(MarqueeStep::duration).sum()
    }
}

/// Decides whether the notices column needs to scroll and, if so, how.
///
/// Returns `None` when the content fits or the viewport cannot be measured.
/// An unmeasurable row falls back to [`FALLBACK_ROW_HEIGHT_PX`].
pub fn size_marquee(layout: &NoticesLayout) -> Option<MarqueeSchedule> {
    let overflow = match layout.overflow() {
        Ok(overflow) => overflow,
        Err(e) => {
            debug!(error = %e, "notices layout unmeasurable; no marquee");
            return None;
        }
    };
    if overflow <= 0.0 {
        return None;
    }

    let row_height = layout.row_height().unwrap_or_else(|e| {
        debug!(error = %e, fallback_px = FALLBACK_ROW_HEIGHT_PX, "using fallback row height");
        FALLBACK_ROW_HEIGHT_PX
    });

    Some(MarqueeSchedule::build(overflow, row_height))
}
