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

//! The per-RPC object consumed by transports.
//!
//! A [ClientContext] carries everything the transport needs to issue one RPC:
//! the deadline, the outgoing metadata, and any transport-specific settings.
//! It is populated by [CallContext::prepare_grpc_context] and it can be used
//! for a single RPC. Transports call [ClientContext::start] when they issue
//! the RPC, after that the object cannot be prepared again.
//!
//! [CallContext::prepare_grpc_context]: crate::call_context::CallContext::prepare_grpc_context

use std::time::SystemTime;

/// The transport-facing state for a single RPC.
#[derive(Debug, Default)]
pub struct ClientContext {
    deadline: Option<SystemTime>,
    metadata: http::HeaderMap,
    extensions: http::Extensions,
    idempotent: bool,
    started: bool,
}

impl ClientContext {
    /// Creates an empty context, with no deadline and no metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// The deadline for the RPC, `None` if the RPC has no deadline.
    pub fn deadline(&self) -> Option<SystemTime> {
        self.deadline
    }

    /// Sets the deadline for the RPC.
    pub fn set_deadline(&mut self, deadline: SystemTime) {
        self.deadline = Some(deadline);
    }

    /// The metadata sent with the RPC.
    pub fn metadata(&self) -> &http::HeaderMap {
        &self.metadata
    }

    /// Modify the metadata sent with the RPC.
    pub fn metadata_mut(&mut self) -> &mut http::HeaderMap {
        &mut self.metadata
    }

    /// Transport-specific settings.
    ///
    /// Context policies use this to pass arbitrary values to the transport,
    /// for example, compression settings or credentials.
    pub fn extensions(&self) -> &http::Extensions {
        &self.extensions
    }

    /// Modify the transport-specific settings.
    pub fn extensions_mut(&mut self) -> &mut http::Extensions {
        &mut self.extensions
    }

    /// Returns true if the RPC is safe to retry.
    pub fn idempotent(&self) -> bool {
        self.idempotent
    }

    /// Marks the RPC as idempotent, or not.
    pub fn set_idempotent(&mut self, v: bool) {
        self.idempotent = v;
    }

    /// Returns true once a transport has used this context.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Called by transports when they issue the RPC.
    pub fn start(&mut self) {
        self.started = true;
    }
}
