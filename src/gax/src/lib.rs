// Copyright 2024 Google LLC
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

//! Runtime support for generated RPC clients.
//!
//! This crate contains the types and functions used by the generated client
//! libraries to issue RPCs: the [Status](status::Status) of each call, the
//! per-call [CallContext](call_context::CallContext), retry and backoff
//! policies, the retry loop, and the helpers to iterate over list RPCs.
//!
//! The runtime is synchronous. Each call blocks the calling thread, including
//! the delays between retry attempts.

/// The result of each RPC.
pub mod status;

/// A value, or the status explaining why it is missing.
pub mod status_or;

pub mod clock;

pub mod backoff_policy;
pub mod exponential_backoff;
pub mod retry_policy;

pub mod call_context;
pub mod client_context;

pub mod retry_loop;

/// Defines traits and helpers to iterate over the results of List RPCs.
pub mod pagination;

pub mod options;

#[cfg(test)]
mod mock_rng;
