//! Render directives for screen content.
//!
//! The presenter receives a [`ContentFrame`] after every successful fetch and
//! draws it however it likes; nothing here assumes a rendering technology.

use serde::Serialize;

use crate::calendar::MonthDay;
use crate::cctv::{self, CameraGrid};
use crate::model::Dataset;

/// One card on the notices screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeCard {
    /// Heading.
    pub title: String,
    /// Body text.
    pub content: String,
    /// `"Date: ..."`, present only when the notice carries a date.
    pub footer: Option<String>,
    /// Highlighted, with the blinking urgent marker.
    pub urgent: bool,
}

/// One row on the events screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCard {
    /// Date text as entered.
    pub date: String,
    /// Event name.
    pub title: String,
    /// Details.
    pub description: String,
}

/// One greeting on the birthdays screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdayCard {
    /// `"Happy Birthday {name}!"`
    pub headline: String,
    /// `"Department: {department}"`
    pub subtitle: String,
}

/// Everything the presenter needs to draw all four screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ContentFrame {
    /// Notices, in dataset order.
    pub notices: Vec<NoticeCard>,
    /// Events, in dataset order.
    pub events: Vec<EventCard>,
    /// Only birthdays falling on the frame's day.
    pub birthdays: Vec<BirthdayCard>,
    /// Projected camera slots.
    pub cameras: CameraGrid,
}

impl ContentFrame {
    /// Renders `dataset` as seen on `today`.
    pub fn build(dataset: &Dataset, today: MonthDay) -> Self {
        let notices = dataset
            .notices
            .iter()
            .map(|n| NoticeCard {
                title: n.title.clone(),
                content: n.content.clone(),
                footer: n
                    .date
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .map(|d| format!("Date: {d}")),
                urgent: n.urgent,
            })
            .collect();

        let events = dataset
            .events
            .iter()
            .map(|e| EventCard {
                date: e.date.clone(),
                title: e.title.clone(),
                description: e.description.clone(),
            })
            .collect();

        let birthdays = dataset
            .birthdays
            .iter()
            .filter(|b| b.is_active_on(today))
            .map(|b| BirthdayCard {
                headline: format!("Happy Birthday {}!", b.name),
                subtitle: format!("Department: {}", b.department),
            })
            .collect();

        Self {
            notices,
            events,
            birthdays,
            cameras: cctv::project(&dataset.camera_feeds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Birthday, Notice};

    #[test]
    fn notice_footer_only_with_date() {
        let ds = Dataset {
            notices: vec![
                Notice {
                    title: "A".into(),
                    date: Some("Mon".into()),
                    urgent: true,
                    ..Default::default()
                },
                Notice {
                    title: "B".into(),
                    date: Some(String::new()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let frame = ContentFrame::build(&ds, MonthDay::new(1, 1).unwrap());
        assert_eq!(frame.notices[0].footer.as_deref(), Some("Date: Mon"));
        assert!(frame.notices[0].urgent);
        assert_eq!(frame.notices[1].footer, None);
    }

    #[test]
    fn only_todays_birthdays_are_carded() {
        let ds = Dataset {
            birthdays: vec![
                Birthday {
                    name: "Ada".into(),
                    department: "R&D".into(),
                    date: "12-10".into(),
                    ..Default::default()
                },
                Birthday {
                    name: "Bob".into(),
                    department: "Ops".into(),
                    date: "01-02".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let frame = ContentFrame::build(&ds, MonthDay::new(12, 10).unwrap());
        assert_eq!(
            frame.birthdays,
            vec![BirthdayCard {
                headline: "Happy Birthday Ada!".into(),
                subtitle: "Department: R&D".into(),
            }]
        );
    }
}
