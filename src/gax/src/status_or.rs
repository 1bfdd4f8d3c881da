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

//! Holds either a value or the error status explaining its absence.
//!
//! [StatusOr] is the return type of generated methods that produce a value.
//! It behaves much like `Result<T, Status>`, and converts into one, but it
//! treats some misuse as a programming error:
//!
//! - Creating a [StatusOr] from an OK [Status] panics. An OK status must come
//!   with a value.
//! - Accessing the value of a [StatusOr] holding an error panics.
//!
//! # Example
//! ```
//! # use gapic_gax::status::{Code, Status};
//! # use gapic_gax::status_or::StatusOr;
//! let v = StatusOr::from_value(42);
//! assert!(v.ok());
//! assert_eq!(*v, 42);
//!
//! let e = StatusOr::<i32>::from_status(Status::new(Code::NotFound, "missing"));
//! assert!(!e.ok());
//! assert_eq!(e.status().code(), Code::NotFound);
//! ```

use crate::status::Status;

static OK_STATUS: std::sync::LazyLock<Status> = std::sync::LazyLock::new(Status::default);

/// Either a value of type `T` or a non-OK [Status].
#[derive(Clone, Debug, PartialEq)]
pub struct StatusOr<T> {
    inner: Inner<T>,
}

#[derive(Clone, Debug, PartialEq)]
enum Inner<T> {
    Error(Status),
    Value(T),
}

impl<T> StatusOr<T> {
    /// Creates a new instance holding `status`.
    ///
    /// # Panics
    /// If `status` is OK.
    pub fn from_status(status: Status) -> Self {
        if status.is_ok() {
            tracing::error!("StatusOr cannot be created from an OK status");
            panic!("StatusOr cannot be created from an OK status");
        }
        Self {
            inner: Inner::Error(status),
        }
    }

    /// Creates a new instance holding `value`.
    pub fn from_value(value: T) -> Self {
        Self {
            inner: Inner::Value(value),
        }
    }

    /// Returns true if this holds a value.
    pub fn ok(&self) -> bool {
        matches!(self.inner, Inner::Value(_))
    }

    /// The status, OK when this holds a value.
    pub fn status(&self) -> &Status {
        match &self.inner {
            Inner::Error(s) => s,
            Inner::Value(_) => &*OK_STATUS,
        }
    }

    /// The contained value.
    ///
    /// # Panics
    /// If this holds an error.
    pub fn value(&self) -> &T {
        match &self.inner {
            Inner::Value(v) => v,
            Inner::Error(s) => value_access_error(s),
        }
    }

    /// The contained value, mutably.
    ///
    /// # Panics
    /// If this holds an error.
    pub fn value_mut(&mut self) -> &mut T {
        match &mut self.inner {
            Inner::Value(v) => v,
            Inner::Error(s) => value_access_error(s),
        }
    }

    /// Consumes this object and returns the contained value.
    ///
    /// # Panics
    /// If this holds an error.
    pub fn into_value(self) -> T {
        match self.inner {
            Inner::Value(v) => v,
            Inner::Error(s) => value_access_error(&s),
        }
    }

    /// Converts into a [Result].
    pub fn into_result(self) -> Result<T, Status> {
        match self.inner {
            Inner::Value(v) => Ok(v),
            Inner::Error(s) => Err(s),
        }
    }
}

fn value_access_error(status: &Status) -> ! {
    tracing::error!(%status, "StatusOr value accessed while holding an error");
    panic!("StatusOr value accessed while holding an error: {status}");
}

impl<T> std::ops::Deref for StatusOr<T> {
    type Target = T;
    fn deref(&self) -> &T {
        self.value()
    }
}

impl<T> std::ops::DerefMut for StatusOr<T> {
    fn deref_mut(&mut self) -> &mut T {
        self.value_mut()
    }
}

impl<T> From<StatusOr<T>> for Result<T, Status> {
    fn from(value: StatusOr<T>) -> Self {
        value.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Code;

    #[test]
    fn from_value() {
        let mut v = StatusOr::from_value("hello".to_string());
        assert!(v.ok());
        assert!(v.status().is_ok());
        assert_eq!(v.value(), "hello");
        assert_eq!(v.len(), 5);
        v.push_str(" world");
        assert_eq!(v.into_value(), "hello world");
    }

    #[test]
    fn from_status() {
        let status = Status::new(Code::Unavailable, "try again");
        let v = StatusOr::<String>::from_status(status.clone());
        assert!(!v.ok());
        assert_eq!(v.status(), &status);
        assert_eq!(v.into_result(), Err(status));
    }

    #[test]
    #[should_panic]
    fn from_ok_status() {
        let _ = StatusOr::<i32>::from_status(Status::default());
    }

    #[test]
    #[should_panic]
    fn value_on_error() {
        let v = StatusOr::<i32>::from_status(Status::new(Code::Internal, "broken"));
        let _value: i32 = *v;
    }

    #[test]
    #[should_panic]
    fn into_value_on_error() {
        let v = StatusOr::<i32>::from_status(Status::new(Code::Internal, "broken"));
        let _ = v.into_value();
    }

    #[test]
    fn into_result() -> anyhow::Result<()> {
        let v: Result<i32, Status> = StatusOr::from_value(7).into();
        assert_eq!(v?, 7);
        Ok(())
    }

    #[test]
    fn clone_and_eq() {
        let v = StatusOr::from_value(vec![1, 2, 3]);
        assert_eq!(v.clone(), v);
        let e = StatusOr::<Vec<i32>>::from_status(Status::new(Code::Aborted, "Aborted"));
        assert_ne!(e, v);
    }
}
