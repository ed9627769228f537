//! Message types for communication between the dashboard and the worker

use uuid::Uuid;

use super::state::SubmitTicket;
use crate::api::{OcrResult, ServiceHealth, SubmitError};

/// Commands sent from the dashboard to the worker
#[derive(Debug, Clone)]
pub enum WorkerCommand {
    /// Send a request to the OCR service
    Submit(SubmitTicket),
    /// Abort the request with this id
    Cancel(Uuid),
    /// Query the health endpoint
    CheckHealth,
    /// Load the processed image of the result of request `request`
    FetchImage { request: Uuid, location: String },
    /// Stop the worker thread
    Shutdown,
}

/// Events sent from the worker back to the dashboard
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A submission finished
    Completed {
        id: Uuid,
        outcome: Result<OcrResult, SubmitError>,
    },
    /// Health check finished
    Health(Result<ServiceHealth, SubmitError>),
    /// Processed image bytes arrived (or could not be loaded)
    ImageFetched {
        request: Uuid,
        location: String,
        outcome: Result<Vec<u8>, SubmitError>,
    },
}
