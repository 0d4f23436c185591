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

//! Administrative event types dispatched by the runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of an administrative operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminOperation {
    Create,
    Update,
    Delete,
    Action,
}

impl AdminOperation {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AdminOperation::Create => "CREATE",
            AdminOperation::Update => "UPDATE",
            AdminOperation::Delete => "DELETE",
            AdminOperation::Action => "ACTION",
        }
    }
}

impl fmt::Display for AdminOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(AdminOperation::Create),
            "UPDATE" => Ok(AdminOperation::Update),
            "DELETE" => Ok(AdminOperation::Delete),
            "ACTION" => Ok(AdminOperation::Action),
            other => Err(format!("unknown admin operation: {other}")),
        }
    }
}

/// Identity of the administrator session that performed an operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthDetails {
    pub realm_id: Option<String>,
    pub client_id: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
}

/// A single administrative event.
///
/// Same ownership rules as [`AuthEvent`](crate::event::AuthEvent): the
/// runtime owns the event for the duration of one callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminEvent {
    /// Operation category.
    pub operation: AdminOperation,
    /// Event timestamp, epoch milliseconds.
    pub time: i64,
    /// Who performed the operation. Absent when the session context was
    /// not captured.
    pub auth_details: Option<AuthDetails>,
    /// Path of the affected resource, e.g. `users/u1`.
    pub resource_path: Option<String>,
    /// Label of the affected resource type, e.g. `USER`.
    pub resource_type: Option<String>,
    /// Serialized representation of the affected resource, when the
    /// runtime was asked to include it.
    pub representation: Option<String>,
    /// Error label for failed operations.
    pub error: Option<String>,
}

impl AdminEvent {
    pub fn builder(operation: AdminOperation, time: i64) -> AdminEventBuilder {
        AdminEventBuilder::new(operation, time)
    }
}

/// Builder for [`AdminEvent`].
pub struct AdminEventBuilder {
    operation: AdminOperation,
    time: i64,
    auth_details: Option<AuthDetails>,
    resource_path: Option<String>,
    resource_type: Option<String>,
    representation: Option<String>,
    error: Option<String>,
}

impl AdminEventBuilder {
    pub fn new(operation: AdminOperation, time: i64) -> Self {
        Self {
            operation,
            time,
            auth_details: None,
            resource_path: None,
            resource_type: None,
            representation: None,
            error: None,
        }
    }

    pub fn auth_details(mut self, details: AuthDetails) -> Self {
        self.auth_details = Some(details);
        self
    }

    pub fn resource_path(mut self, path: impl Into<String>) -> Self {
        self.resource_path = Some(path.into());
        self
    }

    pub fn resource_type(mut self, label: impl Into<String>) -> Self {
        self.resource_type = Some(label.into());
        self
    }

    pub fn representation(mut self, representation: impl Into<String>) -> Self {
        self.representation = Some(representation.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn build(self) -> AdminEvent {
        AdminEvent {
            operation: self.operation,
            time: self.time,
            auth_details: self.auth_details,
            resource_path: self.resource_path,
            resource_type: self.resource_type,
            representation: self.representation,
            error: self.error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_with_auth_details() {
        let event = AdminEvent::builder(AdminOperation::Create, 2000)
            .auth_details(AuthDetails {
                realm_id: Some("master".into()),
                client_id: Some("admin-cli".into()),
                user_id: Some("admin".into()),
                ip_address: None,
            })
            .resource_path("users/u1")
            .resource_type("USER")
            .build();

        assert_eq!(event.operation, AdminOperation::Create);
        assert_eq!(event.auth_details.unwrap().realm_id.as_deref(), Some("master"));
        assert_eq!(event.resource_path.as_deref(), Some("users/u1"));
    }

    #[test]
    fn test_operation_name_round_trip() {
        for op in [
            AdminOperation::Create,
            AdminOperation::Update,
            AdminOperation::Delete,
            AdminOperation::Action,
        ] {
            assert_eq!(op.as_str().parse::<AdminOperation>().unwrap(), op);
        }
    }
}
