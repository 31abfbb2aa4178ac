use tracing::debug;

use crate::calendar::MonthDay;
use crate::error::EmptyActiveSet;
use crate::model::{Dataset, ScreenKey};

/// Ordered, non-empty set of screens eligible for rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveSet(Vec<ScreenKey>);

impl ActiveSet {
    /// Wraps `screens`, rejecting an empty list.
    pub fn new(screens: Vec<ScreenKey>) -> Result<Self, EmptyActiveSet> {
        if screens.is_empty() {
            return Err(EmptyActiveSet);
        }
        Ok(Self(screens))
    }

    /// The set used when nothing else qualifies.
    pub fn fallback() -> Self {
        Self(vec![ScreenKey::Notices])
    }

    /// First screen in canonical order; always present.
    pub fn first(&self) -> ScreenKey {
        self.0[0]
    }

    /// Screen at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<ScreenKey> {
        self.0.get(index).copied()
    }

    /// Number of active screens, at least one.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `screen` is in the rotation.
    pub fn contains(&self, screen: ScreenKey) -> bool {
        self.0.contains(&screen)
    }

    /// Screens in rotation order.
    pub fn as_slice(&self) -> &[ScreenKey] {
        &self.0
    }
}

/// Whether a single screen qualifies for rotation on `today`.
pub fn is_eligible(screen: ScreenKey, dataset: &Dataset, today: MonthDay) -> bool {
    if !dataset.visibility.shows(screen) {
        return false;
    }
    match screen {
        ScreenKey::Birthdays => dataset.birthdays.iter().any(|b| b.is_active_on(today)),
        ScreenKey::Notices | ScreenKey::Events | ScreenKey::Cctv => true,
    }
}

/// Computes the screens eligible to display on `today`, in canonical order.
///
/// Never empty: if every screen is filtered out the notices screen is forced
/// back in so the wall is never blank.
pub fn active_screens(dataset: &Dataset, today: MonthDay) -> ActiveSet {
    let eligible: Vec<ScreenKey> = ScreenKey::ALL
        .into_iter()
        .filter(|screen| is_eligible(*screen, dataset, today))
        .collect();

    ActiveSet::new(eligible).unwrap_or_else(|_| {
        debug!("no screen eligible; forcing notices");
        ActiveSet::fallback()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Birthday, VisibilityConfig};

    fn march_15() -> MonthDay {
        MonthDay::new(3, 15).unwrap()
    }

    #[test]
    fn empty_dataset_shows_everything_but_birthdays() {
        let set = active_screens(&Dataset::default(), march_15());
        assert_eq!(
            set.as_slice(),
            &[ScreenKey::Notices, ScreenKey::Events, ScreenKey::Cctv]
        );
    }

    #[test]
    fn all_hidden_falls_back_to_notices() {
        let ds = Dataset {
            visibility: VisibilityConfig::all_hidden(),
            ..Default::default()
        };
        assert_eq!(active_screens(&ds, march_15()).as_slice(), &[ScreenKey::Notices]);
    }

    #[test]
    fn empty_active_set_is_rejected() {
        assert_eq!(ActiveSet::new(vec![]), Err(EmptyActiveSet));
    }

    #[test]
    fn birthdays_toggle_off_wins_over_matching_date() {
        let ds = Dataset {
            birthdays: vec![Birthday {
                date: "03-15".into(),
                ..Default::default()
            }],
            visibility: VisibilityConfig {
                show_birthdays: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!active_screens(&ds, march_15()).contains(ScreenKey::Birthdays));
    }
}
