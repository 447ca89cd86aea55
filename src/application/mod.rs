//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the auth flow, the dashboard flow and toast notifications.

mod auth;
mod dashboard;
mod notify;

pub use auth::{AuthError, AuthOutcome, AuthService, Navigation, Route, AUTH_REDIRECT_DELAY, LOGOUT_REDIRECT_DELAY};
pub use dashboard::{
    run_job, BackendStatus, DashboardError, DashboardState, Job, JobKind, JobOutcome, ReportStep,
};
pub use notify::{Notifications, Toast, ToastPhase, TOAST_FADE, TOAST_VISIBLE};
