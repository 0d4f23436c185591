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

//! Canonical JSON payloads for forwarded events.
//!
//! The key set per event category is fixed: consumers rely on every key
//! being present, so absent source fields serialize as `null` (the detail
//! map as `{}`) rather than being omitted. Translation never fails; a
//! payload is produced for any event the runtime hands over.

use serde_json::{json, Map, Value};

use aegis_events::{AdminEvent, AuthEvent};

/// Serialize an authentication event into its canonical JSON text.
pub fn event_to_payload(event: &AuthEvent) -> String {
    let details: Map<String, Value> = event
        .details
        .as_ref()
        .map(|details| {
            details
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect()
        })
        .unwrap_or_default();

    json!({
        "clientId": event.client_id,
        "error": event.error,
        "ipAddress": event.ip_address,
        "realmId": event.realm_id,
        "sessionId": event.session_id,
        "time": event.time,
        "type": event.kind.as_str(),
        "userId": event.user_id,
        "details": details,
    })
    .to_string()
}

/// Serialize an administrative event into its canonical JSON text.
///
/// Identity fields come from the event's nested auth details and degrade
/// to `null` when the runtime did not capture the session context.
pub fn admin_event_to_payload(event: &AdminEvent) -> String {
    let auth = event.auth_details.as_ref();

    json!({
        "clientId": auth.and_then(|a| a.client_id.as_deref()),
        "error": event.error,
        "ipAddress": auth.and_then(|a| a.ip_address.as_deref()),
        "realmId": auth.and_then(|a| a.realm_id.as_deref()),
        "representation": event.representation,
        "resourcePath": event.resource_path,
        "resourceType": event.resource_type,
        "time": event.time,
        "type": event.operation.as_str(),
        "userId": auth.and_then(|a| a.user_id.as_deref()),
    })
    .to_string()
}
