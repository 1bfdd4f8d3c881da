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
use crate::operation::Operation;
use crate::stub::{
    CANCEL_OPERATION_INFO, DELETE_OPERATION_INFO, GET_OPERATION_INFO, OperationsStub,
};
use gax::backoff_policy::BackoffPolicy;
use gax::call_context::CallContext;
use gax::retry_loop::make_retry_call;
use gax::retry_policy::RetryPolicy;
use gax::status::{Code, Status};
use gax::status_or::StatusOr;
use std::sync::Arc;
use std::time::Duration;

/// Polls, cancels, and deletes long-running operations.
///
/// Generated clients create an [OperationsClient] sharing their stub.
/// Applications use it to wait for the operations returned by the generated
/// client.
///
/// # Example
/// ```no_run
/// # use gapic_lro::{OperationsClient, Operation, model};
/// # use gax::exponential_backoff::ExponentialBackoffPolicy;
/// # use gax::retry_policy::LimitedDurationRetryPolicy;
/// # use std::time::Duration;
/// # fn sample(client: OperationsClient, record: model::Operation) {
/// let mut op: Operation<wkt::Empty, wkt::Empty> = client.operation(record);
/// let mut polling = LimitedDurationRetryPolicy::new(Duration::from_secs(600), Duration::from_secs(30));
/// let mut backoff = ExponentialBackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(30));
/// let result = client.poll_until_done(&mut op, &mut polling, &mut backoff);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct OperationsClient {
    stub: Arc<dyn OperationsStub>,
    retry_policy: Option<Box<dyn RetryPolicy>>,
    backoff_policy: Option<Box<dyn BackoffPolicy>>,
}

impl OperationsClient {
    pub fn new(stub: Arc<dyn OperationsStub>) -> Self {
        Self {
            stub,
            retry_policy: None,
            backoff_policy: None,
        }
    }

    /// Retry the `GetOperation` RPCs made by [update][Self::update].
    ///
    /// The policies are prototypes, each update uses fresh clones.
    pub fn with_retry_policies<R, B>(mut self, retry_policy: R, backoff_policy: B) -> Self
    where
        R: RetryPolicy + 'static,
        B: BackoffPolicy + 'static,
    {
        self.retry_policy = Some(Box::new(retry_policy));
        self.backoff_policy = Some(Box::new(backoff_policy));
        self
    }

    /// Wraps an operation record returned by the service.
    pub fn operation<R, M>(&self, op: model::Operation) -> Operation<R, M>
    where
        R: wkt::Message,
        M: wkt::Message + Default,
    {
        Operation::new(self.stub.clone(), op)
    }

    /// Fetches the latest state of the operation from the service.
    ///
    /// Completed operations are never fetched again. For them this returns
    /// the error in the operation, or OK. The operation is only modified if
    /// the RPC succeeds.
    pub fn update<R, M>(&self, op: &mut Operation<R, M>) -> Status
    where
        R: wkt::Message,
        M: wkt::Message + Default,
    {
        if op.done() {
            return op.terminal_status();
        }
        let request = model::GetOperationRequest::new().set_name(op.name());
        let context = CallContext::new(GET_OPERATION_INFO);
        let mut fresh = model::Operation::default();
        let stub = self.stub.clone();
        let call = move |ctx: &mut CallContext,
                         req: &model::GetOperationRequest,
                         resp: &mut model::Operation| {
            stub.get_operation(ctx, req, resp)
        };
        let status = match (&self.retry_policy, &self.backoff_policy) {
            (Some(retry), Some(backoff)) => {
                let mut retry = retry.clone_policy();
                let mut backoff = backoff.clone_policy();
                make_retry_call(
                    &context,
                    &request,
                    &mut fresh,
                    call,
                    retry.as_mut(),
                    backoff.as_mut(),
                )
            }
            _ => {
                let mut context = context;
                call(&mut context, &request, &mut fresh)
            }
        };
        if status.is_ok() {
            op.replace(fresh);
        } else {
            tracing::debug!(operation = op.name(), %status, "cannot update operation");
        }
        status
    }

    /// Tells the service the client is no longer interested in the result.
    pub fn delete<R, M>(&self, op: &Operation<R, M>) -> Status
    where
        R: wkt::Message,
        M: wkt::Message + Default,
    {
        let request = model::DeleteOperationRequest::new().set_name(op.name());
        let mut context = CallContext::new(DELETE_OPERATION_INFO);
        self.stub
            .delete_operation(&mut context, &request, &mut wkt::Empty::default())
    }

    /// Starts a best-effort cancellation of the operation.
    pub fn cancel<R, M>(&self, op: &Operation<R, M>) -> Status
    where
        R: wkt::Message,
        M: wkt::Message + Default,
    {
        let request = model::CancelOperationRequest::new().set_name(op.name());
        let mut context = CallContext::new(CANCEL_OPERATION_INFO);
        self.stub
            .cancel_operation(&mut context, &request, &mut wkt::Empty::default())
    }

    /// Updates the operation until it completes, or the polling policy stops.
    ///
    /// An operation that is still in progress counts as a transient
    /// [DeadlineExceeded][Code::DeadlineExceeded] failure for
    /// `polling_policy`. Failed updates are reported to the policy as-is, so
    /// permanent errors stop the loop immediately.
    ///
    /// Returns the result of the operation, or the status of the last failed
    /// update.
    pub fn poll_until_done<R, M>(
        &self,
        op: &mut Operation<R, M>,
        polling_policy: &mut dyn RetryPolicy,
        polling_backoff: &mut dyn BackoffPolicy,
    ) -> StatusOr<R>
    where
        R: wkt::Message,
        M: wkt::Message + Default,
    {
        self.poll_with_sleep(op, polling_policy, polling_backoff, std::thread::sleep)
    }

    pub(crate) fn poll_with_sleep<R, M, S>(
        &self,
        op: &mut Operation<R, M>,
        polling_policy: &mut dyn RetryPolicy,
        polling_backoff: &mut dyn BackoffPolicy,
        mut sleep: S,
    ) -> StatusOr<R>
    where
        R: wkt::Message,
        M: wkt::Message + Default,
        S: FnMut(Duration),
    {
        loop {
            if op.done() {
                return op.result();
            }
            let status = self.update(op);
            if status.is_ok() && op.done() {
                return op.result();
            }
            let failure = if status.is_ok() {
                Status::new(
                    Code::DeadlineExceeded,
                    format!("operation has not completed={}", op.name()),
                )
            } else {
                status.clone()
            };
            if !polling_policy.on_failure(&failure) {
                tracing::debug!(operation = op.name(), %failure, "polling stopped");
                return if status.is_ok() {
                    op.result()
                } else {
                    StatusOr::from_status(status)
                };
            }
            let delay = polling_backoff.on_completion();
            tracing::debug!(operation = op.name(), ?delay, "operation still in progress");
            sleep(delay);
        }
    }
}
