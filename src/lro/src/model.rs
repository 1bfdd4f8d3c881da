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

//! The messages used by the long-running operations service.

use gax::status::Status;
use serde::{Deserialize, Serialize};

/// A server-side task, possibly still running.
///
/// Services return this record from methods that start long-running
/// operations, and from the `GetOperation` RPC.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct Operation {
    /// The server-assigned name, unique within the service.
    pub name: String,

    /// Service-specific progress information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<wkt::Any>,

    /// If `false`, the operation is still in progress.
    pub done: bool,

    /// The outcome of the operation, set once `done` is true.
    #[serde(flatten)]
    pub result: Option<operation::Result>,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][Operation::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }

    /// Sets the value of [metadata][Operation::metadata].
    pub fn set_metadata<T: Into<Option<wkt::Any>>>(mut self, v: T) -> Self {
        self.metadata = v.into();
        self
    }

    /// Sets the value of [done][Operation::done].
    pub fn set_done(mut self, v: bool) -> Self {
        self.done = v;
        self
    }

    /// Sets the value of [result][Operation::result].
    pub fn set_result<T: Into<Option<operation::Result>>>(mut self, v: T) -> Self {
        self.result = v.into();
        self
    }

    /// Sets the result to an error.
    pub fn set_error(self, v: Status) -> Self {
        self.set_result(operation::Result::Error(v))
    }

    /// Sets the result to a (packed) response.
    pub fn set_response(self, v: wkt::Any) -> Self {
        self.set_result(operation::Result::Response(v))
    }

    /// The error, if the operation failed.
    pub fn error(&self) -> Option<&Status> {
        match &self.result {
            Some(operation::Result::Error(e)) => Some(e),
            _ => None,
        }
    }

    /// The packed response, if the operation succeeded.
    pub fn response(&self) -> Option<&wkt::Any> {
        match &self.result {
            Some(operation::Result::Response(r)) => Some(r),
            _ => None,
        }
    }
}

/// Defines additional types related to [Operation].
pub mod operation {
    use super::*;

    /// The outcome of a completed operation.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub enum Result {
        /// The operation failed.
        Error(Status),
        /// The operation succeeded, this is the packed result.
        Response(wkt::Any),
    }
}

/// The request message for `GetOperation`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct GetOperationRequest {
    /// The name of the operation resource.
    pub name: String,
}

impl GetOperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][GetOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

/// The request message for `DeleteOperation`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct DeleteOperationRequest {
    /// The name of the operation resource to be deleted.
    pub name: String,
}

impl DeleteOperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][DeleteOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}

/// The request message for `CancelOperation`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[non_exhaustive]
pub struct CancelOperationRequest {
    /// The name of the operation resource to be cancelled.
    pub name: String,
}

impl CancelOperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of [name][CancelOperationRequest::name].
    pub fn set_name<T: Into<String>>(mut self, v: T) -> Self {
        self.name = v.into();
        self
    }
}
