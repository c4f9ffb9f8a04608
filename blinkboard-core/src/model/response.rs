use serde::Serialize;

use crate::services::clock;
use crate::services::status::StatusReport;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Reply written back to the UI, one per request line.
///
/// Optional fields are left out of the serialized object when unset.
#[derive(Debug, Serialize)]
pub struct Response {
    pub status: ResponseStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StatusReport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    pub timestamp: u64,
}

impl Response {
    fn new(status: ResponseStatus) -> Self {
        Self {
            status,
            message: None,
            data: None,
            version: None,
            error: None,
            timestamp: clock::now_millis(),
        }
    }

    pub fn success() -> Self {
        Self::new(ResponseStatus::Success)
    }

    pub fn failure() -> Self {
        Self::new(ResponseStatus::Error)
    }

    /// Error reply for a line that could not be decoded as a request.
    pub fn malformed(error: impl std::fmt::Display) -> Self {
        let mut response = Self::failure();
        response.error = Some(error.to_string());
        response
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_data(mut self, data: StatusReport) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}
