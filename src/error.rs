// Copyright 2023 gandi-livedns authors
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for Gandi API operations.
pub type Result<T> = std::result::Result<T, GandiError>;

/// An error occurred while talking to the Gandi REST API.
///
/// [`GandiError::Auth`] is the authentication/authorization subset: the token is missing,
/// expired, belongs to the wrong user or organization, or lacks permission on the domain.
/// Every other transport or HTTP failure (including DNS, TCP and timeout problems) is a
/// [`GandiError::Request`]. The underlying [`HttpError`] is always kept as the source.
#[derive(Debug, Error)]
pub enum GandiError {
    /// Authentication or authorization failure.
    #[error("{message}")]
    Auth {
        message: String,
        #[source]
        source: HttpError,
    },

    /// Any other failure communicating with the API.
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: HttpError,
    },

    /// An argument was rejected locally, before any request was sent.
    #[error("{parameter} is out of range: {message}")]
    OutOfRange {
        parameter: &'static str,
        message: String,
    },

    /// The client could not be configured.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl GandiError {
    /// Returns `true` if the credentials should be fixed before retrying.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// The HTTP status of the response that caused this error, if there was one.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Auth { source, .. } | Self::Request { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Failure reported by a [`DnsHttpClient`](crate::utils::request::DnsHttpClient).
#[derive(Debug, Error)]
pub enum HttpError {
    /// The server answered with a non-success status.
    #[error("HTTP status {status}")]
    Status { status: StatusCode, body: String },

    #[error(transparent)]
    Request(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure raised by a custom transport.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl HttpError {
    /// Wraps an arbitrary transport failure.
    pub fn other<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Other(error.into())
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status(),
            _ => None,
        }
    }

    /// The response body of a failed request, when the server sent one.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    pub(crate) fn is_auth_status(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    pub(crate) fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// A string did not name a supported [`RecordType`](crate::dns::RecordType).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported DNS record type: {0}")]
pub struct ParseRecordTypeError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_are_recognized() {
        let auth = GandiError::Auth {
            message: "Gandi auth failure".into(),
            source: HttpError::Status {
                status: StatusCode::FORBIDDEN,
                body: String::new(),
            },
        };
        assert!(auth.is_auth());
        assert_eq!(auth.status(), Some(StatusCode::FORBIDDEN));

        let other = GandiError::Request {
            message: "Failed to delete record www".into(),
            source: HttpError::other("connection reset"),
        };
        assert!(!other.is_auth());
        assert_eq!(other.status(), None);
        assert_eq!(other.to_string(), "Failed to delete record www");
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error;

        let err = GandiError::Request {
            message: "Failed to get A record www".into(),
            source: HttpError::Status {
                status: StatusCode::BAD_GATEWAY,
                body: "upstream".into(),
            },
        };
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "HTTP status 502 Bad Gateway");
    }

    #[test]
    fn status_classification() {
        let status = |code| HttpError::Status {
            status: code,
            body: String::new(),
        };
        assert!(status(StatusCode::UNAUTHORIZED).is_auth_status());
        assert!(status(StatusCode::FORBIDDEN).is_auth_status());
        assert!(!status(StatusCode::NOT_FOUND).is_auth_status());
        assert!(status(StatusCode::NOT_FOUND).is_not_found());
        assert!(!HttpError::other("timeout").is_not_found());
    }
}
