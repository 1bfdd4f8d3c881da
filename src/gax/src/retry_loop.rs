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

//! Runs an RPC until it succeeds or the retry policy gives up.
//!
//! Generated client methods wrap each transport call in [make_retry_call].
//! The loop blocks the calling thread, both while the transport call runs and
//! while it waits between attempts.

use crate::backoff_policy::BackoffPolicy;
use crate::call_context::CallContext;
use crate::retry_policy::RetryPolicy;
use crate::status::Status;
use std::time::Duration;

/// Calls `next_stub` until it succeeds, or until the retry policy stops.
///
/// Before each attempt the loop clones `context` and sets the clone's
/// deadline to the current [operation deadline]. The clone is passed to
/// `next_stub`, so changes made by one attempt are not visible to the next.
///
/// After a failed attempt, the loop asks `retry_policy` whether to continue.
/// If so, it sleeps for the delay returned by `backoff_policy` and tries
/// again. Otherwise it returns the status of the last attempt.
///
/// The loop never clones the policies. Callers are expected to pass fresh
/// clones for each operation.
///
/// [operation deadline]: RetryPolicy::operation_deadline
pub fn make_retry_call<Request, Response, F>(
    context: &CallContext,
    request: &Request,
    response: &mut Response,
    next_stub: F,
    retry_policy: &mut dyn RetryPolicy,
    backoff_policy: &mut dyn BackoffPolicy,
) -> Status
where
    F: FnMut(&mut CallContext, &Request, &mut Response) -> Status,
{
    retry_loop_with_sleep(
        context,
        request,
        response,
        next_stub,
        retry_policy,
        backoff_policy,
        std::thread::sleep,
    )
}

/// Like [make_retry_call], using the policies configured in `context`.
///
/// Falls back to the defaults in [ClientConfig] if `context` has no retry or
/// backoff policy.
///
/// [ClientConfig]: crate::options::ClientConfig
pub fn make_retry_call_with_context_policies<Request, Response, F>(
    context: &CallContext,
    request: &Request,
    response: &mut Response,
    next_stub: F,
) -> Status
where
    F: FnMut(&mut CallContext, &Request, &mut Response) -> Status,
{
    let mut retry_policy = context
        .retry_policy()
        .unwrap_or_else(crate::options::default_retry_policy);
    let mut backoff_policy = context
        .backoff_policy()
        .unwrap_or_else(crate::options::default_backoff_policy);
    make_retry_call(
        context,
        request,
        response,
        next_stub,
        retry_policy.as_mut(),
        backoff_policy.as_mut(),
    )
}

/// Runs the retry loop, using `sleep` to wait between attempts.
///
/// Tests use this function to observe the backoff delays without waiting.
pub fn retry_loop_with_sleep<Request, Response, F, S>(
    context: &CallContext,
    request: &Request,
    response: &mut Response,
    mut next_stub: F,
    retry_policy: &mut dyn RetryPolicy,
    backoff_policy: &mut dyn BackoffPolicy,
    mut sleep: S,
) -> Status
where
    F: FnMut(&mut CallContext, &Request, &mut Response) -> Status,
    S: FnMut(Duration),
{
    let rpc = context.info().rpc_name;
    let mut attempt = 0_u32;
    loop {
        attempt = attempt.saturating_add(1);
        let mut attempt_context = context.clone();
        attempt_context.set_deadline(retry_policy.operation_deadline());
        let status = next_stub(&mut attempt_context, request, response);
        if status.is_ok() {
            return status;
        }
        if !retry_policy.on_failure(&status) {
            tracing::debug!(rpc, attempt, %status, "retry loop stopped");
            return status;
        }
        let delay = backoff_policy.on_completion();
        tracing::debug!(rpc, attempt, %status, ?delay, "retrying after transient failure");
        sleep(delay);
    }
}
