// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error handling facilities for the failure-tracking service
//!
//! For HTTP-level error handling, see Dropshot.

use dropshot::HttpError;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// An error that can be generated within the service
///
/// These may be generated while handling a client request or as part of a
/// background poll.  When generated during an HTTP request, an `Error` is
/// converted into an `HttpError` as one of the last steps in processing the
/// request, so the rest of the system stays agnostic to the transport.
#[derive(Clone, Debug, Deserialize, thiserror::Error, PartialEq, Serialize)]
pub enum Error {
    /// An object needed as part of this operation was not found.
    #[error("Object (of type {type_name:?}) not found: {lookup_type:?}")]
    ObjectNotFound { type_name: ResourceType, lookup_type: LookupType },
    /// An object already exists with the specified identifier.
    #[error("Object (of type {type_name:?}) already exists: {object_name}")]
    ObjectAlreadyExists { type_name: ResourceType, object_name: String },
    /// The request was well-formed, but the operation cannot be completed
    /// given the current state of the record.
    #[error("Invalid Request: {message}")]
    InvalidRequest { message: String },
    /// The system encountered an unhandled operational error.
    #[error("Internal Error: {internal_message}")]
    InternalError { internal_message: String },
    /// The system (or part of it) is unavailable.
    #[error("Service Unavailable: {internal_message}")]
    ServiceUnavailable { internal_message: String },
}

/// Kinds of records managed by the service, named for error messages
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub enum ResourceType {
    FailureNotification,
    Alert,
    EmailListEntry,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceType::FailureNotification => "failure notification",
            ResourceType::Alert => "alert",
            ResourceType::EmailListEntry => "email list entry",
        })
    }
}

/// Indicates how an object was looked up (for an `ObjectNotFound` error)
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum LookupType {
    /// a specific numeric id was requested
    ById(u64),
    /// a specific name was requested
    ByName(String),
}

impl LookupType {
    /// Returns an ObjectNotFound error appropriate for the case where this
    /// lookup failed
    pub fn into_not_found(self, type_name: ResourceType) -> Error {
        Error::ObjectNotFound { type_name, lookup_type: self }
    }
}

impl Error {
    /// Generates an [`Error::ObjectNotFound`] for a lookup by numeric id.
    pub fn not_found_by_id(type_name: ResourceType, id: u64) -> Error {
        LookupType::ById(id).into_not_found(type_name)
    }

    /// Generates an [`Error::InvalidRequest`] with the specific message
    ///
    /// This should be used for failures due possibly to invalid client input
    /// or an operation not permitted in the record's current state.
    pub fn invalid_request(message: &str) -> Error {
        Error::InvalidRequest { message: message.to_owned() }
    }

    /// Generates an [`Error::InternalError`] with the specific message
    ///
    /// InternalError should be used for operational conditions that should
    /// not happen but that we cannot reasonably handle at runtime.
    pub fn internal_error(internal_message: &str) -> Error {
        Error::InternalError { internal_message: internal_message.to_owned() }
    }

    /// Generates an [`Error::ServiceUnavailable`] with the specific message
    ///
    /// This should be used for transient failures where the caller might be
    /// expected to retry.
    pub fn unavail(message: &str) -> Error {
        Error::ServiceUnavailable { internal_message: message.to_owned() }
    }
}

impl From<Error> for HttpError {
    /// Converts an `Error` into an `HttpError`.  This defines how errors that
    /// are represented internally using `Error` are ultimately exposed to
    /// clients over HTTP.
    fn from(error: Error) -> HttpError {
        match error {
            Error::ObjectNotFound { type_name: t, lookup_type: lt } => {
                let (lookup_field, lookup_value) = match lt {
                    LookupType::ById(id) => ("id", id.to_string()),
                    LookupType::ByName(name) => ("name", name),
                };
                let message = format!(
                    "not found: {} with {} \"{}\"",
                    t, lookup_field, lookup_value
                );
                HttpError::for_client_error(
                    Some(String::from("ObjectNotFound")),
                    dropshot::ClientErrorStatusCode::NOT_FOUND,
                    message,
                )
            }

            Error::ObjectAlreadyExists { type_name: t, object_name: n } => {
                let message = format!("already exists: {} \"{}\"", t, n);
                HttpError::for_bad_request(
                    Some(String::from("ObjectAlreadyExists")),
                    message,
                )
            }

            Error::InvalidRequest { message } => HttpError::for_bad_request(
                Some(String::from("InvalidRequest")),
                message,
            ),

            Error::InternalError { internal_message } => {
                HttpError::for_internal_error(internal_message)
            }

            Error::ServiceUnavailable { internal_message } => {
                HttpError::for_unavail(
                    Some(String::from("ServiceNotAvailable")),
                    internal_message,
                )
            }
        }
    }
}
