#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Display orchestration core for the signage wall.
//!
//! Everything in this crate is a pure function over explicit inputs, except
//! [`rotation::RotationScheduler`], which owns the rotation state and is driven
//! by events from an imperative shell.

pub mod api;
pub mod calendar;
pub mod cctv;
pub mod error;
pub mod filter;
pub mod marquee;
pub mod model;
pub mod refresh;
pub mod render;
pub mod rotation;

pub use calendar::MonthDay;
pub use error::{EmptyActiveSet, UnmeasurableLayout};
pub use filter::{active_screens, ActiveSet};
pub use model::{Birthday, CameraFeed, Dataset, Event, Notice, ScreenKey, VisibilityConfig};
