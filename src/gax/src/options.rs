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

//! Client configuration.
//!
//! While the client library defaults are intended to work for most
//! applications, it is sometimes necessary to change the configuration.
//! Applications use [ClientConfig] to change the retry and backoff policies,
//! or to send additional metadata with every RPC.
//!
//! The policies stored in a [ClientConfig] are prototypes. Each call gets
//! fresh clones of them, so concurrent calls never share policy state.
//!
//! # Example
//! ```
//! # use gapic_gax::options::ClientConfig;
//! # use gapic_gax::retry_policy::LimitedErrorCountRetryPolicy;
//! # use gapic_gax::call_context::*;
//! use std::time::Duration;
//! let config = ClientConfig::new()
//!     .set_retry_policy(LimitedErrorCountRetryPolicy::new(5, Duration::from_secs(30)))
//!     .add_metadata("x-goog-user-project", "my-project");
//!
//! const INFO: MethodInfo = MethodInfo::new("ListBooks", RpcType::Normal, Idempotency::Idempotent);
//! let context = config.call_context(INFO);
//! assert!(context.retry_policy().is_some());
//! assert_eq!(context.metadata().len(), 1);
//! ```

use crate::backoff_policy::BackoffPolicy;
use crate::call_context::{CallContext, MethodInfo};
use crate::exponential_backoff::ExponentialBackoffPolicy;
use crate::retry_policy::{LimitedDurationRetryPolicy, RetryPolicy};
use std::time::Duration;

/// Configure a client.
///
/// A client (the generated type wrapping a transport) uses this type to set
/// up the [CallContext] for each RPC.
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    retry_policy: Option<Box<dyn RetryPolicy>>,
    backoff_policy: Option<Box<dyn BackoffPolicy>>,
    metadata: Vec<(String, String)>,
}

impl ClientConfig {
    /// Returns a default [ClientConfig].
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the retry policy prototype.
    pub fn set_retry_policy<V: RetryPolicy + 'static>(mut self, v: V) -> Self {
        self.retry_policy = Some(Box::new(v));
        self
    }

    /// Configure the backoff policy prototype.
    pub fn set_backoff_policy<V: BackoffPolicy + 'static>(mut self, v: V) -> Self {
        self.backoff_policy = Some(Box::new(v));
        self
    }

    /// Add metadata sent with every RPC.
    pub fn add_metadata<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    /// A fresh clone of the configured retry policy, or the default policy.
    pub fn retry_policy(&self) -> Box<dyn RetryPolicy> {
        self.retry_policy
            .as_ref()
            .map(|p| p.clone_policy())
            .unwrap_or_else(default_retry_policy)
    }

    /// A fresh clone of the configured backoff policy, or the default policy.
    pub fn backoff_policy(&self) -> Box<dyn BackoffPolicy> {
        self.backoff_policy
            .as_ref()
            .map(|p| p.clone_policy())
            .unwrap_or_else(default_backoff_policy)
    }

    /// Creates the [CallContext] for one RPC.
    ///
    /// The context holds fresh clones of the policies and the configured
    /// metadata.
    pub fn call_context(&self, info: MethodInfo) -> CallContext {
        let mut context = CallContext::new(info);
        context.set_retry_policy(self.retry_policy().as_ref());
        context.set_backoff_policy(self.backoff_policy().as_ref());
        for (k, v) in &self.metadata {
            context.add_metadata(k.as_str(), v.as_str());
        }
        context
    }
}

/// Retry for up to 10 minutes, with at most 60 seconds per attempt.
pub(crate) fn default_retry_policy() -> Box<dyn RetryPolicy> {
    Box::new(LimitedDurationRetryPolicy::new(
        Duration::from_secs(10 * 60),
        Duration::from_secs(60),
    ))
}

/// Start with 1 second delays, growing up to 60 seconds.
pub(crate) fn default_backoff_policy() -> Box<dyn BackoffPolicy> {
    Box::new(ExponentialBackoffPolicy::new(
        Duration::from_secs(1),
        Duration::from_secs(60),
    ))
}
