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

//! Truncated exponential backoff with jitter.
//!
//! Each call to [on_completion] returns a delay drawn uniformly from
//! `[window / 2, window]`. The window starts at the initial delay and doubles
//! after each call, until it reaches the maximum delay.
//!
//! [on_completion]: crate::backoff_policy::BackoffPolicy::on_completion

use crate::backoff_policy::BackoffPolicy;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

/// The error type for exponential backoff creation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("the initial delay ({0:?}) should be greater than zero")]
    InvalidInitialDelay(Duration),
    #[error(
        "the maximum delay ({maximum:?}) should be greater than or equal to the initial delay ({initial:?})"
    )]
    EmptyRange {
        maximum: Duration,
        initial: Duration,
    },
}

/// Configures and creates an [ExponentialBackoffPolicy].
#[derive(Clone, Debug)]
pub struct ExponentialBackoffBuilder {
    initial_delay: Duration,
    maximum_delay: Duration,
}

impl ExponentialBackoffBuilder {
    /// Creates a builder with the default parameters.
    ///
    /// # Example
    /// ```
    /// # use gapic_gax::exponential_backoff::Error;
    /// # use gapic_gax::exponential_backoff::ExponentialBackoffBuilder;
    /// use std::time::Duration;
    ///
    /// let policy = ExponentialBackoffBuilder::new()
    ///         .with_initial_delay(Duration::from_millis(100))
    ///         .with_maximum_delay(Duration::from_secs(5))
    ///         .build()?;
    /// # Ok::<(), Error>(())
    /// ```
    pub fn new() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            maximum_delay: Duration::from_secs(60),
        }
    }

    /// Change the initial delay.
    pub fn with_initial_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.initial_delay = v.into();
        self
    }

    /// Change the maximum delay.
    pub fn with_maximum_delay<V: Into<Duration>>(mut self, v: V) -> Self {
        self.maximum_delay = v.into();
        self
    }

    /// Creates a new exponential backoff policy.
    ///
    /// Fails if the initial delay is zero, or if the maximum delay is smaller
    /// than the initial delay.
    pub fn build(self) -> Result<ExponentialBackoffPolicy, Error> {
        if self.initial_delay.is_zero() {
            return Err(Error::InvalidInitialDelay(self.initial_delay));
        }
        if self.maximum_delay < self.initial_delay {
            return Err(Error::EmptyRange {
                maximum: self.maximum_delay,
                initial: self.initial_delay,
            });
        }
        Ok(ExponentialBackoffPolicy::new(
            self.initial_delay,
            self.maximum_delay,
        ))
    }

    /// Creates a new exponential backoff policy clamping the ranges towards
    /// recommended values.
    ///
    /// The maximum delay is clamped first, to be between one second and one
    /// day (both inclusive). Then the initial delay is clamped to be between
    /// one millisecond and the maximum delay.
    ///
    /// # Example
    /// ```
    /// # use gapic_gax::exponential_backoff::ExponentialBackoffBuilder;
    /// # use gapic_gax::backoff_policy::BackoffPolicy;
    /// use std::time::Duration;
    /// let mut backoff = ExponentialBackoffBuilder::new().clamp();
    /// assert!(backoff.on_completion() > Duration::ZERO);
    /// ```
    pub fn clamp(self) -> ExponentialBackoffPolicy {
        let maximum_delay = self
            .maximum_delay
            .clamp(Duration::from_secs(1), Duration::from_secs(24 * 60 * 60));
        let initial_delay = self
            .initial_delay
            .clamp(Duration::from_millis(1), maximum_delay);
        ExponentialBackoffPolicy::new(initial_delay, maximum_delay)
    }
}

impl Default for ExponentialBackoffBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Implements truncated exponential backoff with jitter.
///
/// The random number generator is created on the first call to
/// [on_completion][BackoffPolicy::on_completion]. Policies are cheap to
/// create and to clone until they are used.
pub struct ExponentialBackoffPolicy {
    initial_delay: Duration,
    maximum_delay: Duration,
    current_delay_range: Duration,
    generator: Option<StdRng>,
}

impl ExponentialBackoffPolicy {
    /// Creates a new policy.
    ///
    /// Prefer [ExponentialBackoffBuilder] to validate the parameters. This
    /// function uses them as-is.
    pub fn new(initial_delay: Duration, maximum_delay: Duration) -> Self {
        Self {
            initial_delay,
            maximum_delay,
            current_delay_range: initial_delay,
            generator: None,
        }
    }

    /// The configured initial delay.
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// The configured maximum delay.
    pub fn maximum_delay(&self) -> Duration {
        self.maximum_delay
    }

    fn delay_with_jitter(&mut self, rng: &mut impl rand::Rng) -> Duration {
        let window = self.current_delay_range;
        let delay = rng.random_range(window / 2..=window);
        self.current_delay_range = window
            .checked_mul(2)
            .map_or(self.maximum_delay, |d| d.min(self.maximum_delay));
        delay
    }
}

impl Clone for ExponentialBackoffPolicy {
    fn clone(&self) -> Self {
        Self::new(self.initial_delay, self.maximum_delay)
    }
}

impl Default for ExponentialBackoffPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(60))
    }
}

impl std::fmt::Debug for ExponentialBackoffPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExponentialBackoffPolicy")
            .field("initial_delay", &self.initial_delay)
            .field("maximum_delay", &self.maximum_delay)
            .field("current_delay_range", &self.current_delay_range)
            .field("generator", &self.generator.as_ref().map(|_| "initialized"))
            .finish()
    }
}

impl BackoffPolicy for ExponentialBackoffPolicy {
    fn on_completion(&mut self) -> Duration {
        let mut rng = self.generator.take().unwrap_or_else(StdRng::from_os_rng);
        let delay = self.delay_with_jitter(&mut rng);
        self.generator = Some(rng);
        delay
    }

    fn clone_policy(&self) -> Box<dyn BackoffPolicy> {
        Box::new(self.clone())
    }
}
