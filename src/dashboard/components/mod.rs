//! Reusable UI components for the dashboard

pub mod chip;
pub mod header;
pub mod notification;
pub mod status_card;

pub use chip::{chip, outlined_chip};
pub use header::render_header;
pub use notification::render_notification;
pub use status_card::StatusCard;
