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

//! Well-known-types used by generated RPC clients.
//!
//! Services return some values packed into an [Any], for example, the result
//! and metadata of long-running operations. The client libraries unpack these
//! values into the concrete types expected by the application, and the
//! [Message] trait names the type stored in the [Any].

mod any;
pub use crate::any::*;
mod empty;
pub use crate::empty::*;
pub mod message;
pub use crate::message::Message;
