//! Response types and the outcome of one call attempt.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::codes;
use crate::error::TransportError;

/// Application-level status embedded in a delivered response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum ErrorCode {
    #[default]
    Success = 0,
    /// Transient or unknown failure on the receiver side.
    UnexpectedError = 1,
    InvalidRequest = 2,
    LinkIdNotFound = 3,
}

impl ErrorCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ErrorCode {
    type Error = i32;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            1 => Ok(Self::UnexpectedError),
            2 => Ok(Self::InvalidRequest),
            3 => Ok(Self::LinkIdNotFound),
            other => Err(other),
        }
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "success" => Ok(Self::Success),
            "unexpected" | "unexpected_error" => Ok(Self::UnexpectedError),
            "invalid" | "invalid_request" => Ok(Self::InvalidRequest),
            "link_id_not_found" | "linkid_not_found" => Ok(Self::LinkIdNotFound),
            other => Err(format!("unknown error code: {other}")),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::UnexpectedError => write!(f, "UNEXPECTED_ERROR"),
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::LinkIdNotFound => write!(f, "LINK_ID_NOT_FOUND"),
        }
    }
}

/// Response to [`MuxPushRequest`](crate::request::MuxPushRequest).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MuxPushResponse {
    pub error_code: ErrorCode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error_msg: String,
}

impl MuxPushResponse {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn error(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self {
            error_code: code,
            error_msg: msg.into(),
        }
    }

    /// Reset every field to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_success(&self) -> bool {
        self.error_code == ErrorCode::Success
    }
}

/// A delivered response, tagged by the method that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "body")]
pub enum Response {
    MuxPush(MuxPushResponse),
    Raw { method: String, body: Value },
}

impl Response {
    /// Checked view as a [`MuxPushResponse`]; `None` for any other method.
    pub fn as_mux_push(&self) -> Option<&MuxPushResponse> {
        match self {
            Self::MuxPush(resp) => Some(resp),
            Self::Raw { .. } => None,
        }
    }

    pub fn as_mux_push_mut(&mut self) -> Option<&mut MuxPushResponse> {
        match self {
            Self::MuxPush(resp) => Some(resp),
            Self::Raw { .. } => None,
        }
    }

    pub fn method(&self) -> &str {
        match self {
            Self::MuxPush(_) => "MuxPush",
            Self::Raw { method, .. } => method,
        }
    }
}

impl From<MuxPushResponse> for Response {
    fn from(resp: MuxPushResponse) -> Self {
        Self::MuxPush(resp)
    }
}

/// Result of one completed call attempt, as reported by the transport.
///
/// `error_code == 0` means bytes went out and a response came back; the
/// response is present only in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    error_code: i32,
    error_text: String,
    response: Option<Response>,
}

impl CallOutcome {
    /// A delivered response.
    pub fn delivered(response: impl Into<Response>) -> Self {
        Self {
            error_code: codes::OK,
            error_text: String::new(),
            response: Some(response.into()),
        }
    }

    /// A transport-level failure. A zero `code` is a caller bug and is
    /// mapped to `EREQUEST` so the outcome still reads as failed.
    pub fn failed(code: i32, text: impl Into<String>) -> Self {
        Self {
            error_code: if code == codes::OK { codes::EREQUEST } else { code },
            error_text: text.into(),
            response: None,
        }
    }

    pub fn error_code(&self) -> i32 {
        self.error_code
    }

    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    /// `true` if the attempt failed below the application layer.
    pub fn is_transport_failure(&self) -> bool {
        self.error_code != codes::OK
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn response_mut(&mut self) -> Option<&mut Response> {
        self.response.as_mut()
    }

    /// Turn the outcome into the value a caller sees.
    pub fn into_result(self) -> Result<Response, TransportError> {
        if self.is_transport_failure() {
            return Err(TransportError::Call {
                code: self.error_code,
                text: self.error_text,
            });
        }
        self.response.ok_or(TransportError::EmptyResponse)
    }
}
