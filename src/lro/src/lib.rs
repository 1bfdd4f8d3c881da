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

//! Types and functions to make long-running operations easier to use.
//!
//! Some RPCs start a server-side task and return immediately with an
//! [operation record][model::Operation]. The task eventually completes, with
//! a result or with an error. [Operation] wraps the record with typed
//! accessors, and [OperationsClient] polls the service until the task
//! completes.

pub mod model;
pub mod stub;

mod operation;
pub use operation::Operation;

mod client;
pub use client::OperationsClient;
