//! Session state and messaging between the dashboard and the worker
//!
//! The dashboard owns a [`SessionState`] and talks to the background worker
//! exclusively through [`WorkerCommand`] and [`WorkerEvent`].

pub mod messages;
pub mod state;

pub use messages::{WorkerCommand, WorkerEvent};
pub use state::{Notification, RequestLifecycle, SessionState, Severity, SubmitTicket};
