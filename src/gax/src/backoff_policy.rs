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

//! Defines the trait for backoff policies.
//!
//! The client libraries retry RPCs that fail with transient errors. Retry
//! strategies should avoid immediately retrying an RPC, as the service may
//! need time to recover. [Exponential backoff] is a well known algorithm to
//! find an acceptable delay between retries.
//!
//! Backoff policies carry mutable state, the delay grows with each failure.
//! Applications configure a *prototype* policy, and the client libraries use
//! [BackoffPolicy::clone_policy] to create a fresh instance for each
//! operation. Two operations never share the same instance.
//!
//! # Example
//! ```
//! # use gapic_gax::backoff_policy::BackoffPolicy;
//! # use gapic_gax::exponential_backoff::ExponentialBackoffPolicy;
//! use std::time::Duration;
//! let prototype = ExponentialBackoffPolicy::new(Duration::from_millis(100), Duration::from_secs(5));
//! let mut backoff = prototype.clone_policy();
//! let delay = backoff.on_completion();
//! assert!(delay <= Duration::from_millis(100));
//! ```
//!
//! [Exponential backoff]: https://en.wikipedia.org/wiki/Exponential_backoff

/// Defines the trait implemented by all backoff strategies.
pub trait BackoffPolicy: Send + Sync + std::fmt::Debug {
    /// Returns the delay before the next attempt.
    ///
    /// Called once after each failed attempt. Implementations may update
    /// their internal state, which is why this takes `&mut self`.
    fn on_completion(&mut self) -> std::time::Duration;

    /// Creates a new policy with the same configuration and fresh state.
    ///
    /// The new policy does not inherit any progress made by `self`.
    fn clone_policy(&self) -> Box<dyn BackoffPolicy>;
}

impl Clone for Box<dyn BackoffPolicy> {
    fn clone(&self) -> Self {
        self.clone_policy()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    mockall::mock! {
        #[derive(Debug)]
        pub Backoff {}
        impl BackoffPolicy for Backoff {
            fn on_completion(&mut self) -> Duration;
            fn clone_policy(&self) -> Box<dyn BackoffPolicy>;
        }
    }

    static_assertions::assert_obj_safe!(BackoffPolicy);
    static_assertions::assert_impl_all!(Box<dyn BackoffPolicy>: Clone, Send, Sync);

    #[test]
    fn boxed_clone_uses_clone_policy() {
        let mut mock = MockBackoff::new();
        mock.expect_clone_policy().times(1).returning(|| {
            let mut clone = MockBackoff::new();
            clone
                .expect_on_completion()
                .return_const(Duration::from_millis(7));
            Box::new(clone)
        });
        let boxed: Box<dyn BackoffPolicy> = Box::new(mock);
        let mut clone = boxed.clone();
        assert_eq!(clone.on_completion(), Duration::from_millis(7));
    }
}
