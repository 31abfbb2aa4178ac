use signage_core::marquee::{MarqueeSchedule, NoticesLayout};
use signage_core::render::ContentFrame;
use signage_core::rotation::Timings;
use signage_core::ScreenKey;
use tracing::{debug, info};

/// The rendering side of the wall: named screens the engine shows, hides and
/// animates, a scrollable notices column and four camera slots.
pub trait Presenter: Send + 'static {
    /// Replace the content of every screen.
    fn render(&mut self, frame: &ContentFrame);

    /// Measure the notices column as last rendered.
    fn measure_notices(&self) -> NoticesLayout;

    /// Run `schedule` on the notices column in a loop, or stop scrolling.
    fn set_marquee(&mut self, schedule: Option<&MarqueeSchedule>);

    /// Hide every screen except `screen`, shown at full visibility.
    fn reveal(&mut self, screen: ScreenKey);

    fn transition(&mut self, from: ScreenKey, to: ScreenKey, timings: &Timings);
}

/// Card geometry used by [`LogPresenter`] to estimate layout.
#[derive(Debug, Clone, Copy)]
pub struct CardLayout {
    /// `None` when the viewport size is unknown.
    pub viewport_height: Option<f64>,
    pub card_height: f64,
    pub card_gap: f64,
}

impl CardLayout {
    fn measure(&self, cards: usize) -> NoticesLayout {
        let n = cards as f64;
        let content = if cards == 0 {
            0.0
        } else {
            n * self.card_height + (n - 1.0) * self.card_gap
        };
        NoticesLayout {
            content_height: Some(content),
            viewport_height: self.viewport_height,
            row_height: (cards > 0).then_some(self.card_height + self.card_gap),
        }
    }
}

/// Headless presenter: logs every directive and estimates the notices
/// layout from fixed card geometry.
pub struct LogPresenter {
    layout: CardLayout,
    notice_count: usize,
}

impl LogPresenter {
    pub fn new(layout: CardLayout) -> Self {
        Self {
            layout,
            notice_count: 0,
        }
    }
}

impl Presenter for LogPresenter {
    fn render(&mut self, frame: &ContentFrame) {
        self.notice_count = frame.notices.len();
        info!(
            notices = frame.notices.len(),
            urgent = frame.notices.iter().filter(|n| n.urgent).count(),
            events = frame.events.len(),
            birthdays = frame.birthdays.len(),
            "content rendered"
        );
        for slot in frame.cameras.slots() {
            debug!(
                slot = slot.slot,
                label = %slot.label,
                mode = ?slot.mode,
                src = slot.source_url().as_deref().unwrap_or("-"),
                "camera slot"
            );
        }
    }

    fn measure_notices(&self) -> NoticesLayout {
        self.layout.measure(self.notice_count)
    }

    fn set_marquee(&mut self, schedule: Option<&MarqueeSchedule>) {
        match schedule {
            Some(s) => info!(
                scrolls = s.scroll_count(),
                loop_ms = s.total_duration().as_millis() as u64,
                "notices marquee running"
            ),
            None => debug!("notices fit; marquee off"),
        }
    }

    fn reveal(&mut self, screen: ScreenKey) {
        info!(%screen, "screen revealed");
    }

    fn transition(&mut self, from: ScreenKey, to: ScreenKey, timings: &Timings) {
        info!(
            %from,
            %to,
            exit_ms = timings.exit.as_millis() as u64,
            entrance_ms = timings.entrance.as_millis() as u64,
            "screen transition"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_layout_estimates_content() {
        let layout = CardLayout {
            viewport_height: Some(900.0),
            card_height: 280.0,
            card_gap: 16.0,
        };
        let measured = layout.measure(4);
        assert_eq!(measured.content_height, Some(4.0 * 280.0 + 3.0 * 16.0));
        assert_eq!(measured.row_height, Some(296.0));

        let empty = layout.measure(0);
        assert_eq!(empty.content_height, Some(0.0));
        assert_eq!(empty.row_height, None);
    }
}
