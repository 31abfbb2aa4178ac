#![forbid(unsafe_code)]

//! Signage display engine: fetches the shared dataset and drives a presenter
//! through the screen rotation.

pub mod client;
pub mod engine;
pub mod presenter;

pub use client::{DatasetSource, FetchError, HttpDatasetSource};
pub use engine::{Engine, EngineConfig};
pub use presenter::{CardLayout, LogPresenter, Presenter};
