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

//! The listener callback contract plugins implement.

use async_trait::async_trait;

use crate::admin::AdminEvent;
use crate::event::AuthEvent;

/// Receives events from the runtime's dispatch loop.
///
/// Callbacks are invoked once per event, on the runtime's dispatch task,
/// and run to completion before the next event is delivered on that task.
/// Implementations must not disrupt the runtime's own request processing:
/// downstream failures are handled (and logged) inside the listener, not
/// returned to the dispatcher.
#[async_trait]
pub trait EventListener: Send + Sync {
    /// Stable identifier of this listener instance.
    fn id(&self) -> &str;

    /// Listener implementation type, e.g. `"mqtt"`.
    fn type_name(&self) -> &str;

    /// Called for each authentication event.
    async fn on_event(&self, event: &AuthEvent);

    /// Called for each administrative event. `include_representation`
    /// tells the listener whether the resource representation attached to
    /// the event may be forwarded to external systems.
    async fn on_admin_event(&self, event: &AdminEvent, include_representation: bool);

    /// Called when the runtime unregisters the listener. Releases
    /// resources owned directly by the listener; collaborators handed in
    /// at construction are closed by their owner.
    async fn close(&self);
}
