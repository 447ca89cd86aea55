//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides the clinician-facing interface for:
//! - Sign-in and sign-up with a local demo account
//! - Patient registration and disease search
//! - Code preview and FHIR bundle output

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{App, Screen};
pub use styles::ClinicTheme;
pub use worker::{RequestProgress, RequestWorker, RequestWorkerHandle};
