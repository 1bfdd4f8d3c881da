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

use crate::model;
use crate::stub::{
    CANCEL_OPERATION_INFO, DELETE_OPERATION_INFO, GET_OPERATION_INFO, OperationsStub,
};
use gax::call_context::CallContext;
use gax::status::{Code, Status};
use gax::status_or::StatusOr;
use std::marker::PhantomData;
use std::sync::Arc;

/// A long-running operation with typed results.
///
/// Wraps the [operation record][model::Operation] returned by the service.
/// `R` is the type of the result, `M` the type of the metadata reported while
/// the operation is in progress. Both are packed in the record as
/// [wkt::Any] values, this type unpacks them.
///
/// # Example
/// ```
/// # use gapic_lro::{Operation, model, stub::OperationsStub};
/// # use std::sync::Arc;
/// #[derive(Debug)]
/// struct Stub;
/// impl OperationsStub for Stub {}
///
/// let op = Operation::<wkt::Empty, wkt::Empty>::new(
///     Arc::new(Stub),
///     model::Operation::new().set_name("operations/123"),
/// );
/// assert!(!op.done());
/// let result = op.result();
/// assert!(!result.ok());
/// assert_eq!(result.status().message(), "operation has not completed=operations/123");
/// ```
pub struct Operation<R, M> {
    stub: Arc<dyn OperationsStub>,
    op: model::Operation,
    _types: PhantomData<fn() -> (R, M)>,
}

impl<R, M> Operation<R, M>
where
    R: wkt::Message,
    M: wkt::Message + Default,
{
    pub fn new(stub: Arc<dyn OperationsStub>, op: model::Operation) -> Self {
        Self {
            stub,
            op,
            _types: PhantomData,
        }
    }

    /// The server-assigned name of the operation.
    pub fn name(&self) -> &str {
        &self.op.name
    }

    /// Returns true once the operation has completed, with or without errors.
    pub fn done(&self) -> bool {
        self.op.done
    }

    /// The operation record, as last received from the service.
    pub fn raw(&self) -> &model::Operation {
        &self.op
    }

    /// The result of the operation.
    ///
    /// Fails if the operation has not completed, if the operation completed
    /// with an error, or if the result is not of type `R`.
    pub fn result(&self) -> StatusOr<R> {
        if !self.done() {
            return StatusOr::from_status(Status::new(
                Code::Unknown,
                format!("operation has not completed={}", self.name()),
            ));
        }
        if let Some(error) = self.op.error() {
            return StatusOr::from_status(terminal_error(error));
        }
        let unpacked = self
            .op
            .response()
            .map(|any| any.to_msg::<R>());
        match unpacked {
            Some(Ok(response)) => StatusOr::from_value(response),
            other => {
                if let Some(Err(e)) = other {
                    tracing::debug!(operation = self.name(), error = %e, "cannot unpack operation result");
                }
                StatusOr::from_status(Status::new(
                    Code::Unknown,
                    format!("invalid result in operation={}", self.name()),
                ))
            }
        }
    }

    /// The progress information reported by the service.
    ///
    /// Returns the default value if there is no metadata, or if the metadata
    /// is not of type `M`.
    pub fn metadata(&self) -> M {
        self.op
            .metadata
            .as_ref()
            .and_then(|any| any.to_msg::<M>().ok())
            .unwrap_or_default()
    }

    /// Fetches the latest state of the operation from the service.
    ///
    /// Completed operations are never fetched again. For them this returns
    /// the error in the operation, or OK.
    ///
    /// The local record is only replaced if the RPC succeeds.
    pub fn update(&mut self) -> Status {
        if self.done() {
            return self.terminal_status();
        }
        let request = model::GetOperationRequest::new().set_name(self.name());
        let mut context = CallContext::new(GET_OPERATION_INFO);
        let mut fresh = model::Operation::default();
        let status = self.stub.get_operation(&mut context, &request, &mut fresh);
        if status.is_ok() {
            self.op = fresh;
        } else {
            tracing::debug!(operation = self.name(), %status, "cannot update operation");
        }
        status
    }

    /// Tells the service the client is no longer interested in the result.
    ///
    /// This does not change the local record.
    pub fn delete(&self) -> Status {
        let request = model::DeleteOperationRequest::new().set_name(self.name());
        let mut context = CallContext::new(DELETE_OPERATION_INFO);
        self.stub
            .delete_operation(&mut context, &request, &mut wkt::Empty::default())
    }

    /// Starts a best-effort cancellation of the operation.
    ///
    /// This does not change the local record, use [update][Self::update] to
    /// find out if the cancellation succeeded.
    pub fn cancel(&self) -> Status {
        let request = model::CancelOperationRequest::new().set_name(self.name());
        let mut context = CallContext::new(CANCEL_OPERATION_INFO);
        self.stub
            .cancel_operation(&mut context, &request, &mut wkt::Empty::default())
    }

    pub(crate) fn terminal_status(&self) -> Status {
        self.op.error().map(terminal_error).unwrap_or_default()
    }

    pub(crate) fn replace(&mut self, op: model::Operation) {
        self.op = op;
    }
}

// An error record with an OK code would make a failed operation look
// successful.
fn terminal_error(error: &Status) -> Status {
    if error.is_ok() {
        return Status::new(Code::Unknown, error.message());
    }
    error.clone()
}

impl<R, M> std::fmt::Debug for Operation<R, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("stub", &self.stub)
            .field("op", &self.op)
            .finish()
    }
}
