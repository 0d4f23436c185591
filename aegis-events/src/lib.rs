// Copyright 2025 The Aegis Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Event model and listener contract for Aegis plugins.
//!
//! The Aegis runtime dispatches authentication and administrative events
//! to registered [`EventListener`] implementations. This crate defines the
//! event types the runtime hands out and the callback trait plugins
//! implement.

pub mod admin;
pub mod event;
pub mod listener;

pub use admin::{AdminEvent, AdminOperation, AuthDetails};
pub use event::{AuthEvent, EventKind};
pub use listener::EventListener;
