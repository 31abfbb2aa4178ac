use thiserror::Error;

/// An active set was requested with no screens in it.
///
/// The screen filter never lets this escape: it substitutes the notices
/// screen instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("active screen set must contain at least one screen")]
pub struct EmptyActiveSet;

/// A layout measurement the marquee sizer needs is missing or nonsensical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnmeasurableLayout {
    /// The visible window could not be measured.
    #[error("viewport height unavailable")]
    Viewport,
    /// The rendered notices could not be measured.
    #[error("content height unavailable")]
    Content,
    /// No usable card height was reported.
    #[error("row height unavailable")]
    Row,
}
