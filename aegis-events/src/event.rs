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

//! Authentication event types dispatched by the runtime.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of an authentication event.
///
/// The canonical name of each kind is its SCREAMING_SNAKE_CASE form
/// (`Login` is `"LOGIN"`, `CodeToToken` is `"CODE_TO_TOKEN"`), which is
/// what appears on the wire and in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Login,
    LoginError,
    Logout,
    LogoutError,
    Register,
    RegisterError,
    CodeToToken,
    CodeToTokenError,
    RefreshToken,
    RefreshTokenError,
    UpdatePassword,
    UpdateProfile,
    ResetPassword,
    SendResetPassword,
    VerifyEmail,
    IdentityProviderLogin,
}

impl EventKind {
    /// Canonical name of this kind.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventKind::Login => "LOGIN",
            EventKind::LoginError => "LOGIN_ERROR",
            EventKind::Logout => "LOGOUT",
            EventKind::LogoutError => "LOGOUT_ERROR",
            EventKind::Register => "REGISTER",
            EventKind::RegisterError => "REGISTER_ERROR",
            EventKind::CodeToToken => "CODE_TO_TOKEN",
            EventKind::CodeToTokenError => "CODE_TO_TOKEN_ERROR",
            EventKind::RefreshToken => "REFRESH_TOKEN",
            EventKind::RefreshTokenError => "REFRESH_TOKEN_ERROR",
            EventKind::UpdatePassword => "UPDATE_PASSWORD",
            EventKind::UpdateProfile => "UPDATE_PROFILE",
            EventKind::ResetPassword => "RESET_PASSWORD",
            EventKind::SendResetPassword => "SEND_RESET_PASSWORD",
            EventKind::VerifyEmail => "VERIFY_EMAIL",
            EventKind::IdentityProviderLogin => "IDENTITY_PROVIDER_LOGIN",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOGIN" => Ok(EventKind::Login),
            "LOGIN_ERROR" => Ok(EventKind::LoginError),
            "LOGOUT" => Ok(EventKind::Logout),
            "LOGOUT_ERROR" => Ok(EventKind::LogoutError),
            "REGISTER" => Ok(EventKind::Register),
            "REGISTER_ERROR" => Ok(EventKind::RegisterError),
            "CODE_TO_TOKEN" => Ok(EventKind::CodeToToken),
            "CODE_TO_TOKEN_ERROR" => Ok(EventKind::CodeToTokenError),
            "REFRESH_TOKEN" => Ok(EventKind::RefreshToken),
            "REFRESH_TOKEN_ERROR" => Ok(EventKind::RefreshTokenError),
            "UPDATE_PASSWORD" => Ok(EventKind::UpdatePassword),
            "UPDATE_PROFILE" => Ok(EventKind::UpdateProfile),
            "RESET_PASSWORD" => Ok(EventKind::ResetPassword),
            "SEND_RESET_PASSWORD" => Ok(EventKind::SendResetPassword),
            "VERIFY_EMAIL" => Ok(EventKind::VerifyEmail),
            "IDENTITY_PROVIDER_LOGIN" => Ok(EventKind::IdentityProviderLogin),
            other => Err(format!("unknown event kind: {other}")),
        }
    }
}

/// A single authentication event.
///
/// Owned by the runtime; listeners receive a shared reference for the
/// duration of one callback and must not hold on to it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// Event category.
    pub kind: EventKind,
    /// Event timestamp, epoch milliseconds.
    pub time: i64,
    /// Realm the event occurred in.
    pub realm_id: Option<String>,
    /// Client application involved.
    pub client_id: Option<String>,
    /// User the event concerns.
    pub user_id: Option<String>,
    /// Session the event belongs to.
    pub session_id: Option<String>,
    /// Source IP address of the request.
    pub ip_address: Option<String>,
    /// Error label for failure events.
    pub error: Option<String>,
    /// Free-form detail entries attached by the emitting code path.
    pub details: Option<HashMap<String, String>>,
}

impl AuthEvent {
    pub fn builder(kind: EventKind, time: i64) -> AuthEventBuilder {
        AuthEventBuilder::new(kind, time)
    }
}

/// Builder for [`AuthEvent`].
pub struct AuthEventBuilder {
    kind: EventKind,
    time: i64,
    realm_id: Option<String>,
    client_id: Option<String>,
    user_id: Option<String>,
    session_id: Option<String>,
    ip_address: Option<String>,
    error: Option<String>,
    details: Option<HashMap<String, String>>,
}

impl AuthEventBuilder {
    pub fn new(kind: EventKind, time: i64) -> Self {
        Self {
            kind,
            time,
            realm_id: None,
            client_id: None,
            user_id: None,
            session_id: None,
            ip_address: None,
            error: None,
            details: None,
        }
    }

    pub fn realm(mut self, realm_id: impl Into<String>) -> Self {
        self.realm_id = Some(realm_id.into());
        self
    }

    pub fn client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Adds a single detail entry, creating the detail map if needed.
    pub fn detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> AuthEvent {
        AuthEvent {
            kind: self.kind,
            time: self.time,
            realm_id: self.realm_id,
            client_id: self.client_id,
            user_id: self.user_id,
            session_id: self.session_id,
            ip_address: self.ip_address,
            error: self.error,
            details: self.details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_minimal_event() {
        let event = AuthEvent::builder(EventKind::Login, 1000).build();

        assert_eq!(event.kind, EventKind::Login);
        assert_eq!(event.time, 1000);
        assert!(event.realm_id.is_none());
        assert!(event.details.is_none());
    }

    #[test]
    fn test_builder_collects_details() {
        let event = AuthEvent::builder(EventKind::Login, 1000)
            .realm("master")
            .detail("auth_method", "openid-connect")
            .detail("username", "alice")
            .build();

        let details = event.details.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details["username"], "alice");
    }

    #[test]
    fn test_kind_name_round_trip() {
        for kind in [
            EventKind::Login,
            EventKind::CodeToToken,
            EventKind::IdentityProviderLogin,
        ] {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_rejects_unknown_name() {
        assert!("NOT_A_KIND".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_kind_serde_uses_canonical_name() {
        let json = serde_json::to_string(&EventKind::RefreshTokenError).unwrap();
        assert_eq!(json, "\"REFRESH_TOKEN_ERROR\"");
    }
}
