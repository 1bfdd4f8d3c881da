// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The result of a remote call.
//!
//! Every RPC made through the generated clients completes with a [Status].
//! The status code taxonomy mirrors the canonical gRPC codes. On top of the
//! raw code, [Status] classifies each result as success, a transient failure,
//! or a permanent failure. Retry policies consult this classification, and
//! only transient failures are ever retried.
//!
//! # Example
//! ```
//! # use gapic_gax::status::{Code, Status};
//! let status = Status::new(Code::Unavailable, "try again later");
//! assert!(!status.is_ok());
//! assert!(status.is_transient_failure());
//! assert!(!status.is_permanent_failure());
//! ```

use serde::{Deserialize, Serialize};

/// Reports the status code and message from a remote request.
///
/// Statuses are immutable values. Two statuses are equal when both their code
/// and their message are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize, thiserror::Error)]
#[serde(default, rename_all = "camelCase")]
#[error("{code}: {message}")]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    /// Creates a new status with the given code and message.
    pub fn new<T: Into<String>>(code: Code, message: T) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates a new status from the integer code used on the wire.
    ///
    /// Transports report the status code as an integer. Integers outside the
    /// known range map to [Code::Unknown].
    pub fn from_code_i32<T: Into<String>>(code: i32, message: T) -> Self {
        Self::new(Code::from(code), message)
    }

    /// The status code.
    pub fn code(&self) -> Code {
        self.code
    }

    /// The developer-facing error message, empty for successful calls.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the status represents success.
    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }

    /// Returns true if the failure may go away by retrying the request.
    ///
    /// Only [Code::Aborted], [Code::Unavailable], and [Code::DeadlineExceeded]
    /// are transient.
    pub fn is_transient_failure(&self) -> bool {
        matches!(
            self.code,
            Code::Aborted | Code::Unavailable | Code::DeadlineExceeded
        )
    }

    /// Returns true if the failure will not go away by retrying the request.
    pub fn is_permanent_failure(&self) -> bool {
        !self.is_ok() && !self.is_transient_failure()
    }

    /// Converts the status into a [Result].
    pub fn into_result(self) -> Result<(), Status> {
        if self.is_ok() { Ok(()) } else { Err(self) }
    }
}

/// The canonical status codes.
///
/// Sometimes multiple codes may apply. Services should return the most
/// specific code that applies. For example, prefer `OutOfRange` over
/// `FailedPrecondition` if both codes apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Code {
    /// Not an error; returned on success.
    #[default]
    Ok = 0,

    /// The operation was cancelled, typically by the caller.
    Cancelled = 1,

    /// Unknown error, for example, a status from an unknown error space.
    Unknown = 2,

    /// The client specified an invalid argument, regardless of the state of
    /// the system.
    InvalidArgument = 3,

    /// The deadline expired before the operation could complete.
    ///
    /// For operations that change the state of the system, this error may be
    /// returned even if the operation completed successfully.
    DeadlineExceeded = 4,

    /// Some requested entity was not found.
    NotFound = 5,

    /// The entity that a client attempted to create already exists.
    AlreadyExists = 6,

    /// The caller does not have permission to execute the operation.
    PermissionDenied = 7,

    /// Some resource has been exhausted, such as a per-user quota.
    ResourceExhausted = 8,

    /// The system is not in a state required for the operation's execution.
    ///
    /// Clients should not retry until the system state has been explicitly
    /// fixed.
    FailedPrecondition = 9,

    /// The operation was aborted, typically due to a concurrency issue such
    /// as a transaction abort.
    Aborted = 10,

    /// The operation was attempted past the valid range.
    OutOfRange = 11,

    /// The operation is not implemented or not enabled in this service.
    Unimplemented = 12,

    /// Some invariant expected by the underlying system has been broken.
    Internal = 13,

    /// The service is currently unavailable.
    ///
    /// This is most likely a transient condition, which can be corrected by
    /// retrying with a backoff.
    Unavailable = 14,

    /// Unrecoverable data loss or corruption.
    DataLoss = 15,

    /// The request does not have valid authentication credentials.
    Unauthenticated = 16,
}

impl Code {
    /// The canonical name of the code, for example `DEADLINE_EXCEEDED`.
    pub fn name(&self) -> &'static str {
        match self {
            Code::Ok => "OK",
            Code::Cancelled => "CANCELLED",
            Code::Unknown => "UNKNOWN",
            Code::InvalidArgument => "INVALID_ARGUMENT",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::NotFound => "NOT_FOUND",
            Code::AlreadyExists => "ALREADY_EXISTS",
            Code::PermissionDenied => "PERMISSION_DENIED",
            Code::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Aborted => "ABORTED",
            Code::OutOfRange => "OUT_OF_RANGE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
            Code::Unavailable => "UNAVAILABLE",
            Code::DataLoss => "DATA_LOSS",
            Code::Unauthenticated => "UNAUTHENTICATED",
        }
    }
}

impl std::convert::From<i32> for Code {
    fn from(value: i32) -> Self {
        match value {
            0 => Code::Ok,
            1 => Code::Cancelled,
            2 => Code::Unknown,
            3 => Code::InvalidArgument,
            4 => Code::DeadlineExceeded,
            5 => Code::NotFound,
            6 => Code::AlreadyExists,
            7 => Code::PermissionDenied,
            8 => Code::ResourceExhausted,
            9 => Code::FailedPrecondition,
            10 => Code::Aborted,
            11 => Code::OutOfRange,
            12 => Code::Unimplemented,
            13 => Code::Internal,
            14 => Code::Unavailable,
            15 => Code::DataLoss,
            16 => Code::Unauthenticated,
            _ => Code::Unknown,
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::convert::TryFrom<&str> for Code {
    type Error = String;
    fn try_from(value: &str) -> std::result::Result<Code, Self::Error> {
        match value {
            "OK" => Ok(Code::Ok),
            "CANCELLED" => Ok(Code::Cancelled),
            "UNKNOWN" => Ok(Code::Unknown),
            "INVALID_ARGUMENT" => Ok(Code::InvalidArgument),
            "DEADLINE_EXCEEDED" => Ok(Code::DeadlineExceeded),
            "NOT_FOUND" => Ok(Code::NotFound),
            "ALREADY_EXISTS" => Ok(Code::AlreadyExists),
            "PERMISSION_DENIED" => Ok(Code::PermissionDenied),
            "RESOURCE_EXHAUSTED" => Ok(Code::ResourceExhausted),
            "FAILED_PRECONDITION" => Ok(Code::FailedPrecondition),
            "ABORTED" => Ok(Code::Aborted),
            "OUT_OF_RANGE" => Ok(Code::OutOfRange),
            "UNIMPLEMENTED" => Ok(Code::Unimplemented),
            "INTERNAL" => Ok(Code::Internal),
            "UNAVAILABLE" => Ok(Code::Unavailable),
            "DATA_LOSS" => Ok(Code::DataLoss),
            "UNAUTHENTICATED" => Ok(Code::Unauthenticated),
            _ => Err(format!("unknown status code value {value}")),
        }
    }
}

impl Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(*self as i32)
    }
}

impl<'de> Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i32::deserialize(deserializer).map(Code::from)
    }
}
