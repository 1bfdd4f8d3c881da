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

//! Defines the trait for retry policies and some common implementations.
//!
//! The client libraries automatically retry RPCs when they fail due to
//! transient errors. The retry policy decides if a failed attempt is retried,
//! and computes the deadline for the complete operation.
//!
//! Permanent failures are never retried, regardless of the remaining budget
//! in the policy.
//!
//! Like backoff policies, retry policies carry mutable state. Applications
//! configure a *prototype* and the client libraries create a fresh instance
//! for each operation with [RetryPolicy::clone_policy]. The new instance
//! computes its budget from the time it was cloned, it does not inherit the
//! progress of the prototype.
//!
//! # Example
//! ```
//! # use gapic_gax::retry_policy::*;
//! # use gapic_gax::status::{Code, Status};
//! use std::time::Duration;
//! let prototype = LimitedErrorCountRetryPolicy::new(2, Duration::from_secs(30));
//! let mut policy = prototype.clone_policy();
//! let transient = Status::new(Code::Unavailable, "try again");
//! assert!(policy.on_failure(&transient));
//! assert!(policy.on_failure(&transient));
//! assert!(!policy.on_failure(&transient));
//! ```

use crate::clock::{Clock, SystemClock};
use crate::status::Status;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Controls the retry loop behavior.
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// Query the retry policy after a failed attempt.
    ///
    /// Returns `true` if the operation should be attempted again.
    fn on_failure(&mut self, status: &Status) -> bool;

    /// The deadline for the complete operation.
    ///
    /// The retry loop queries this value before each attempt, and uses it as
    /// the deadline for the attempt.
    fn operation_deadline(&self) -> SystemTime;

    /// Creates a new policy with the same configuration and a fresh budget.
    fn clone_policy(&self) -> Box<dyn RetryPolicy>;
}

impl Clone for Box<dyn RetryPolicy> {
    fn clone(&self) -> Self {
        self.clone_policy()
    }
}

/// A retry policy that stops after a number of transient failures.
///
/// This policy also computes a fixed deadline for the operation, based on the
/// time the policy was created.
///
/// # Example
/// ```
/// # use gapic_gax::retry_policy::*;
/// # use gapic_gax::status::{Code, Status};
/// use std::time::Duration;
/// let mut policy = LimitedErrorCountRetryPolicy::new(3, Duration::from_secs(60));
/// assert!(!policy.on_failure(&Status::new(Code::PermissionDenied, "nope")));
/// ```
#[derive(Debug)]
pub struct LimitedErrorCountRetryPolicy {
    failure_count: u32,
    maximum_failures: u32,
    maximum_duration: Duration,
    deadline: SystemTime,
    clock: Arc<dyn Clock>,
}

impl LimitedErrorCountRetryPolicy {
    /// Creates a new policy.
    ///
    /// # Parameters
    /// * `maximum_failures` - the number of transient failures tolerated.
    /// * `maximum_duration` - the operation deadline, relative to now.
    pub fn new(maximum_failures: u32, maximum_duration: Duration) -> Self {
        Self::with_parts(maximum_failures, maximum_duration, Arc::new(SystemClock))
    }

    /// Replaces the clock used to compute the operation deadline.
    ///
    /// The deadline is recomputed using the new clock.
    pub fn with_clock<C: Clock + 'static>(self, clock: C) -> Self {
        Self::with_parts(self.maximum_failures, self.maximum_duration, Arc::new(clock))
    }

    /// The number of transient failures tolerated.
    pub fn maximum_failures(&self) -> u32 {
        self.maximum_failures
    }

    fn with_parts(maximum_failures: u32, maximum_duration: Duration, clock: Arc<dyn Clock>) -> Self {
        let deadline = deadline_after(clock.now(), maximum_duration);
        Self {
            failure_count: 0,
            maximum_failures,
            maximum_duration,
            deadline,
            clock,
        }
    }
}

impl Clone for LimitedErrorCountRetryPolicy {
    fn clone(&self) -> Self {
        Self::with_parts(
            self.maximum_failures,
            self.maximum_duration,
            self.clock.clone(),
        )
    }
}

impl RetryPolicy for LimitedErrorCountRetryPolicy {
    fn on_failure(&mut self, status: &Status) -> bool {
        if status.is_permanent_failure() {
            return false;
        }
        let keep_going = self.failure_count < self.maximum_failures;
        self.failure_count = self.failure_count.saturating_add(1);
        keep_going
    }

    fn operation_deadline(&self) -> SystemTime {
        self.deadline
    }

    fn clone_policy(&self) -> Box<dyn RetryPolicy> {
        Box::new(self.clone())
    }
}

/// A retry policy that stops after some time has elapsed.
///
/// The operation deadline is the earlier of two values: the time the policy
/// expires, and the current time plus the per-attempt timeout.
///
/// # Example
/// ```
/// # use gapic_gax::retry_policy::*;
/// # use gapic_gax::status::{Code, Status};
/// use std::time::Duration;
/// let mut policy = LimitedDurationRetryPolicy::new(Duration::from_secs(600), Duration::from_secs(60));
/// assert!(policy.on_failure(&Status::new(Code::Unavailable, "try again")));
/// ```
#[derive(Debug)]
pub struct LimitedDurationRetryPolicy {
    maximum_duration: Duration,
    attempt_timeout: Duration,
    deadline: SystemTime,
    clock: Arc<dyn Clock>,
}

impl LimitedDurationRetryPolicy {
    /// Creates a new policy.
    ///
    /// # Parameters
    /// * `maximum_duration` - stop retrying after this time has elapsed.
    /// * `attempt_timeout` - the maximum duration of each attempt.
    pub fn new(maximum_duration: Duration, attempt_timeout: Duration) -> Self {
        Self::with_parts(maximum_duration, attempt_timeout, Arc::new(SystemClock))
    }

    /// Replaces the clock used to compute deadlines.
    ///
    /// The policy expiration is recomputed using the new clock.
    pub fn with_clock<C: Clock + 'static>(self, clock: C) -> Self {
        Self::with_parts(self.maximum_duration, self.attempt_timeout, Arc::new(clock))
    }

    /// The configured maximum duration.
    pub fn maximum_duration(&self) -> Duration {
        self.maximum_duration
    }

    fn with_parts(maximum_duration: Duration, attempt_timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        let deadline = deadline_after(clock.now(), maximum_duration);
        Self {
            maximum_duration,
            attempt_timeout,
            deadline,
            clock,
        }
    }
}

impl Clone for LimitedDurationRetryPolicy {
    fn clone(&self) -> Self {
        Self::with_parts(
            self.maximum_duration,
            self.attempt_timeout,
            self.clock.clone(),
        )
    }
}

impl RetryPolicy for LimitedDurationRetryPolicy {
    fn on_failure(&mut self, status: &Status) -> bool {
        !status.is_permanent_failure() && self.clock.now() < self.deadline
    }

    fn operation_deadline(&self) -> SystemTime {
        let attempt = deadline_after(self.clock.now(), self.attempt_timeout);
        std::cmp::min(attempt, self.deadline)
    }

    fn clone_policy(&self) -> Box<dyn RetryPolicy> {
        Box::new(self.clone())
    }
}

// Saturates at roughly a century past `now` when the sum overflows.
fn deadline_after(now: SystemTime, duration: Duration) -> SystemTime {
    const CENTURY: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);
    now.checked_add(duration)
        .or_else(|| now.checked_add(CENTURY))
        .unwrap_or(now)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::fake::FakeClock;
    use crate::status::Code;
    use test_case::test_case;

    mockall::mock! {
        #[derive(Debug)]
        pub Retry {}
        impl RetryPolicy for Retry {
            fn on_failure(&mut self, status: &Status) -> bool;
            fn operation_deadline(&self) -> SystemTime;
            fn clone_policy(&self) -> Box<dyn RetryPolicy>;
        }
    }

    static_assertions::assert_obj_safe!(RetryPolicy);
    static_assertions::assert_impl_all!(Box<dyn RetryPolicy>: Clone, Send, Sync);
    static_assertions::assert_impl_all!(LimitedErrorCountRetryPolicy: RetryPolicy, Clone);
    static_assertions::assert_impl_all!(LimitedDurationRetryPolicy: RetryPolicy, Clone);

    fn transient() -> Status {
        Status::new(Code::Unavailable, "try again")
    }

    #[test]
    fn error_count_basic() {
        let mut policy = LimitedErrorCountRetryPolicy::new(3, Duration::from_millis(30));
        assert!(policy.on_failure(&transient()));
        assert!(policy.on_failure(&transient()));
        assert!(policy.on_failure(&transient()));
        assert!(!policy.on_failure(&transient()));
        assert!(!policy.on_failure(&transient()));
    }

    #[test_case(Code::Cancelled)]
    #[test_case(Code::InvalidArgument)]
    #[test_case(Code::NotFound)]
    #[test_case(Code::PermissionDenied)]
    #[test_case(Code::Internal)]
    fn error_count_permanent(code: Code) {
        let mut policy = LimitedErrorCountRetryPolicy::new(3, Duration::from_millis(30));
        assert!(!policy.on_failure(&Status::new(code, "uh-oh")));
        // Permanent failures do not consume the budget.
        assert!(policy.on_failure(&transient()));
        assert!(policy.on_failure(&transient()));
        assert!(policy.on_failure(&transient()));
        assert!(!policy.on_failure(&transient()));
    }

    #[test]
    fn error_count_deadline() {
        let clock = FakeClock::new();
        let start = clock.now();
        let policy = LimitedErrorCountRetryPolicy::new(3, Duration::from_millis(30))
            .with_clock(clock.clone());
        assert_eq!(policy.operation_deadline(), start + Duration::from_millis(30));
        clock.advance(Duration::from_millis(10));
        assert_eq!(policy.operation_deadline(), start + Duration::from_millis(30));
    }

    #[test]
    fn error_count_clone_resets() {
        let clock = FakeClock::new();
        let start = clock.now();
        let mut policy = LimitedErrorCountRetryPolicy::new(2, Duration::from_millis(30))
            .with_clock(clock.clone());
        assert!(policy.on_failure(&transient()));
        assert!(policy.on_failure(&transient()));
        assert!(!policy.on_failure(&transient()));

        clock.advance(Duration::from_millis(50));
        let mut clone = policy.clone_policy();
        assert_eq!(
            clone.operation_deadline(),
            start + Duration::from_millis(80)
        );
        assert!(clone.on_failure(&transient()));
        assert!(clone.on_failure(&transient()));
        assert!(!clone.on_failure(&transient()));
    }

    #[test]
    fn duration_basic() {
        let clock = FakeClock::new();
        let mut policy =
            LimitedDurationRetryPolicy::new(Duration::from_millis(5), Duration::from_millis(30))
                .with_clock(clock.clone());
        assert!(policy.on_failure(&transient()));
        clock.advance(Duration::from_millis(2));
        assert!(policy.on_failure(&transient()));
        clock.advance(Duration::from_millis(10));
        assert!(!policy.on_failure(&transient()));
    }

    #[test]
    fn duration_permanent() {
        let mut policy =
            LimitedDurationRetryPolicy::new(Duration::from_secs(60), Duration::from_secs(1));
        assert!(!policy.on_failure(&Status::new(Code::FailedPrecondition, "nope")));
        assert!(policy.on_failure(&transient()));
    }

    #[test]
    fn duration_deadline() {
        let clock = FakeClock::new();
        let start = clock.now();
        let policy =
            LimitedDurationRetryPolicy::new(Duration::from_millis(500), Duration::from_millis(30))
                .with_clock(clock.clone());
        assert_eq!(policy.operation_deadline(), start + Duration::from_millis(30));

        clock.advance(Duration::from_millis(50));
        let clone = policy.clone_policy();
        assert_eq!(policy.operation_deadline(), clone.operation_deadline());
        assert_eq!(policy.operation_deadline(), start + Duration::from_millis(80));

        // The per-attempt deadline never exceeds the policy expiration.
        clock.advance(Duration::from_millis(460));
        assert_eq!(policy.operation_deadline(), start + Duration::from_millis(500));
    }

    #[test]
    fn duration_clone_resets() {
        let clock = FakeClock::new();
        let mut policy =
            LimitedDurationRetryPolicy::new(Duration::from_millis(5), Duration::from_millis(30))
                .with_clock(clock.clone());
        clock.advance(Duration::from_millis(10));
        assert!(!policy.on_failure(&transient()));
        let mut clone = policy.clone_policy();
        assert!(clone.on_failure(&transient()));
    }

    #[test]
    fn deadline_saturates() {
        let now = SystemTime::UNIX_EPOCH;
        let got = deadline_after(now, Duration::MAX);
        assert!(got > now + Duration::from_secs(365 * 24 * 60 * 60), "{got:?}");
    }
}
