use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::PaperId;

pub type Result<T> = std::result::Result<T, CamReadyError>;

#[derive(Debug, Error)]
pub enum CamReadyError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("data format error: {0}")]
    DataFormat(String),

    #[error("paper {paper_id} is missing but has no row in the accepted table")]
    Integrity { paper_id: PaperId },

    #[error("sending reminder for paper {paper_id} failed after {sent} sent: {source}")]
    Dispatch {
        paper_id: PaperId,
        sent: usize,
        #[source]
        source: Box<CamReadyError>,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub operation: String,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_id: Option<String>,
}

impl CamReadyError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection(_) => "CONNECTION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DataFormat(_) => "DATA_FORMAT",
            Self::Integrity { .. } => "INTEGRITY",
            Self::Dispatch { .. } => "DISPATCH_FAILED",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Process exit status for a run that terminated with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Connection(_) | Self::Http(_) => 1,
            Self::NotFound(_) => 2,
            Self::Integrity { .. } => 3,
            Self::DataFormat(_) | Self::Io(_) | Self::Csv(_) | Self::Json(_) => 4,
            Self::Dispatch { .. } => 5,
            Self::Validation(_) | Self::Internal(_) => 70,
        }
    }

    pub fn paper_id(&self) -> Option<&PaperId> {
        match self {
            Self::Integrity { paper_id } | Self::Dispatch { paper_id, .. } => Some(paper_id),
            _ => None,
        }
    }

    pub fn to_payload(&self, operation: impl Into<String>) -> ErrorPayload {
        ErrorPayload {
            code: self.code().to_string(),
            message: self.to_string(),
            operation: operation.into(),
            trace_id: Uuid::new_v4().to_string(),
            paper_id: self.paper_id().map(ToString::to_string),
        }
    }
}
