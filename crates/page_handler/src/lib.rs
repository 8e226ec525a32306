//! Page runtime for the Mediconecta site.
//!
//! An [`HtmlPage`] owns a [`Window`] (document, viewport, virtual clock and
//! timers) and the [`Component`]s attached to it. The host feeds events in
//! through the page's helpers and advances the clock; components validate
//! forms, render feedback and banners, and drive simulated submissions.

#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod alerts;
pub mod behaviors;
pub mod component;
pub mod config;
pub mod constraints;
pub mod dashboard;
pub mod events;
pub mod feedback;
pub mod loader;
pub mod login;
pub mod pages;
pub mod state;
pub mod submission;
pub mod timers;
pub mod window;

pub use alerts::{Alert, AlertDismissal, AlertPresenter, Severity};
pub use behaviors::install_site_behaviors;
pub use component::{Component, ComponentId, Context};
pub use config::PageConfig;
pub use dashboard::PatientDashboard;
pub use events::{DispatchOutcome, Event};
pub use feedback::Field;
pub use loader::{DataLoader, LoadOptions, LoadResponse, get_cookie};
pub use login::LoginForm;
pub use pages::PageKind;
pub use state::HtmlPage;
pub use submission::{SimulatedBackend, SubmissionBackend, SubmissionFlow, SubmissionRequest, SubmissionState};
pub use window::{AutoConfirm, ConfirmDialog, NativeSubmission, Viewport, Window};
