//! Dashboard UI Module
//!
//! The single window of the OCR client: upload panel, request progress and
//! the tabbed result viewer.

pub mod app;
pub mod components;
pub mod state;
pub mod theme;
pub mod views;

pub use app::{run_dashboard, DashboardApp};
pub use state::DashboardState;
pub use theme::Theme;
