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

//! The per-call configuration used by generated clients.
//!
//! Generated client methods create one [CallContext] for each logical RPC.
//! The retry loop clones it for every attempt, sets the attempt deadline on
//! the clone, and hands the clone to the transport. The transport then
//! materializes it into a single-use [ClientContext] with
//! [CallContext::prepare_grpc_context].
//!
//! # Example
//! ```
//! # use gapic_gax::call_context::*;
//! # use gapic_gax::client_context::ClientContext;
//! const INFO: MethodInfo = MethodInfo::new("GetBook", RpcType::Normal, Idempotency::Idempotent);
//! let mut context = CallContext::new(INFO);
//! context.add_metadata("x-goog-request-params", "name=shelves/1/books/2");
//! context.add_grpc_context_policy(|ctx: &mut ClientContext| {
//!     ctx.extensions_mut().insert("compressed");
//! });
//!
//! let mut client_context = ClientContext::new();
//! context.prepare_grpc_context(&mut client_context)?;
//! assert!(client_context.metadata().contains_key("x-goog-request-params"));
//! assert!(client_context.idempotent());
//! # Ok::<(), Error>(())
//! ```

use crate::backoff_policy::BackoffPolicy;
use crate::client_context::ClientContext;
use crate::retry_policy::RetryPolicy;
use crate::status::{Code, Status};
use std::sync::Arc;
use std::time::SystemTime;

/// The shape of an RPC, as defined in its service descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RpcType {
    Normal,
    ClientStreaming,
    ServerStreaming,
    BidiStreaming,
}

/// Whether an RPC is safe to retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Idempotency {
    NonIdempotent,
    Idempotent,
}

/// Describes an RPC.
///
/// Generated code defines one constant of this type for each RPC.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MethodInfo {
    pub rpc_name: &'static str,
    pub rpc_type: RpcType,
    pub idempotency: Idempotency,
}

impl MethodInfo {
    pub const fn new(rpc_name: &'static str, rpc_type: RpcType, idempotency: Idempotency) -> Self {
        Self {
            rpc_name,
            rpc_type,
            idempotency,
        }
    }
}

/// The error type for [CallContext::prepare_grpc_context].
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Transport contexts can be used for a single RPC.
    #[error("the client context was already used for an RPC")]
    ContextAlreadyUsed,
    #[error("invalid metadata key {0:?}")]
    InvalidMetadataKey(String, #[source] http::header::InvalidHeaderName),
    #[error("invalid metadata value for key {0:?}")]
    InvalidMetadataValue(String, #[source] http::header::InvalidHeaderValue),
}

impl From<Error> for Status {
    fn from(value: Error) -> Self {
        let code = match &value {
            Error::ContextAlreadyUsed => Code::FailedPrecondition,
            Error::InvalidMetadataKey(..) | Error::InvalidMetadataValue(..) => {
                Code::InvalidArgument
            }
        };
        Status::new(code, value.to_string())
    }
}

/// A callback to customize the transport context of each attempt.
pub type GrpcContextPolicy = Arc<dyn Fn(&mut ClientContext) + Send + Sync>;

/// The configuration for one logical RPC.
///
/// Cloning a [CallContext] clones the retry and backoff policies with
/// [clone_policy][RetryPolicy::clone_policy], the clone never shares
/// mutable policy state with the original. The metadata and the context
/// policies are copied.
#[derive(Clone)]
pub struct CallContext {
    deadline: Option<SystemTime>,
    metadata: Vec<(String, String)>,
    context_policies: Vec<GrpcContextPolicy>,
    retry_policy: Option<Box<dyn RetryPolicy>>,
    backoff_policy: Option<Box<dyn BackoffPolicy>>,
    info: MethodInfo,
}

impl CallContext {
    /// Creates a context for the RPC described by `info`.
    ///
    /// The context has no deadline, no metadata, and no policies.
    pub fn new(info: MethodInfo) -> Self {
        Self {
            deadline: None,
            metadata: Vec::new(),
            context_policies: Vec::new(),
            retry_policy: None,
            backoff_policy: None,
            info,
        }
    }

    /// The RPC described by this context.
    pub fn info(&self) -> &MethodInfo {
        &self.info
    }

    /// The deadline for the next attempt, `None` means no deadline.
    pub fn deadline(&self) -> Option<SystemTime> {
        self.deadline
    }

    pub fn set_deadline(&mut self, deadline: SystemTime) {
        self.deadline = Some(deadline);
    }

    /// Adds a key/value pair to the outgoing metadata.
    ///
    /// Keys may repeat, all the values are sent. Keys and values are
    /// validated in [prepare_grpc_context][Self::prepare_grpc_context].
    pub fn add_metadata<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.metadata.push((key.into(), value.into()));
    }

    /// The outgoing metadata, in the order it was added.
    pub fn metadata(&self) -> &[(String, String)] {
        &self.metadata
    }

    /// Registers a callback to customize the transport context.
    ///
    /// Callbacks run in registration order, after the deadline and metadata
    /// are set.
    pub fn add_grpc_context_policy<F>(&mut self, policy: F)
    where
        F: Fn(&mut ClientContext) + Send + Sync + 'static,
    {
        self.context_policies.push(Arc::new(policy));
    }

    /// Stores a clone of `policy`.
    pub fn set_retry_policy(&mut self, policy: &dyn RetryPolicy) {
        self.retry_policy = Some(policy.clone_policy());
    }

    /// Returns a fresh clone of the stored retry policy, if any.
    pub fn retry_policy(&self) -> Option<Box<dyn RetryPolicy>> {
        self.retry_policy.as_ref().map(|p| p.clone_policy())
    }

    /// Stores a clone of `policy`.
    pub fn set_backoff_policy(&mut self, policy: &dyn BackoffPolicy) {
        self.backoff_policy = Some(policy.clone_policy());
    }

    /// Returns a fresh clone of the stored backoff policy, if any.
    pub fn backoff_policy(&self) -> Option<Box<dyn BackoffPolicy>> {
        self.backoff_policy.as_ref().map(|p| p.clone_policy())
    }

    /// Populates a transport context for one RPC.
    ///
    /// Sets the deadline, appends the metadata, and then runs each context
    /// policy in registration order.
    ///
    /// Fails if `context` was already used for an RPC, or if any metadata
    /// key or value cannot be sent.
    pub fn prepare_grpc_context(&self, context: &mut ClientContext) -> Result<(), Error> {
        if context.is_started() {
            return Err(Error::ContextAlreadyUsed);
        }
        if let Some(deadline) = self.deadline {
            context.set_deadline(deadline);
        }
        for (key, value) in &self.metadata {
            let name = http::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::InvalidMetadataKey(key.clone(), e))?;
            let value = http::HeaderValue::from_str(value)
                .map_err(|e| Error::InvalidMetadataValue(key.clone(), e))?;
            context.metadata_mut().append(name, value);
        }
        context.set_idempotent(self.info.idempotency == Idempotency::Idempotent);
        for policy in &self.context_policies {
            policy(context);
        }
        Ok(())
    }
}

impl std::fmt::Debug for CallContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallContext")
            .field("deadline", &self.deadline)
            .field("metadata", &self.metadata)
            .field("context_policies", &self.context_policies.len())
            .field("retry_policy", &self.retry_policy)
            .field("backoff_policy", &self.backoff_policy)
            .field("info", &self.info)
            .finish()
    }
}
