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

//! The transport interface for the long-running operations service.
//!
//! Generated code provides the implementations of [OperationsStub]. The
//! default implementation of each method fails with
//! [Unimplemented][gax::status::Code::Unimplemented].

use crate::model::{CancelOperationRequest, DeleteOperationRequest, GetOperationRequest, Operation};
use gax::call_context::{CallContext, Idempotency, MethodInfo, RpcType};
use gax::status::{Code, Status};

/// Describes the `GetOperation` RPC.
pub const GET_OPERATION_INFO: MethodInfo =
    MethodInfo::new("GetOperation", RpcType::Normal, Idempotency::Idempotent);

/// Describes the `DeleteOperation` RPC.
pub const DELETE_OPERATION_INFO: MethodInfo =
    MethodInfo::new("DeleteOperation", RpcType::Normal, Idempotency::Idempotent);

/// Describes the `CancelOperation` RPC.
pub const CANCEL_OPERATION_INFO: MethodInfo =
    MethodInfo::new("CancelOperation", RpcType::Normal, Idempotency::Idempotent);

/// Issues the RPCs of the long-running operations service.
///
/// Each method fills `response` on success and returns the status of the
/// RPC. The `context` is prepared by the caller, including its deadline.
pub trait OperationsStub: Send + Sync + std::fmt::Debug {
    /// Fetches the latest state of an operation.
    fn get_operation(
        &self,
        _context: &mut CallContext,
        _request: &GetOperationRequest,
        _response: &mut Operation,
    ) -> Status {
        Status::new(Code::Unimplemented, "GetOperation not implemented")
    }

    /// Tells the service the client is no longer interested in the result.
    fn delete_operation(
        &self,
        _context: &mut CallContext,
        _request: &DeleteOperationRequest,
        _response: &mut wkt::Empty,
    ) -> Status {
        Status::new(Code::Unimplemented, "DeleteOperation not implemented")
    }

    /// Starts a best-effort cancellation of the operation.
    fn cancel_operation(
        &self,
        _context: &mut CallContext,
        _request: &CancelOperationRequest,
        _response: &mut wkt::Empty,
    ) -> Status {
        Status::new(Code::Unimplemented, "CancelOperation not implemented")
    }
}
