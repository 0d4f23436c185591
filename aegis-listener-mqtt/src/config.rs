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

//! Configuration types for the MQTT listener plugin.

use std::collections::HashSet;
use std::env;
use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use rumqttc::QoS;

use aegis_events::{AdminOperation, EventKind};

/// Per-message delivery options, applied to every published message.
///
/// Constructed once at startup and shared read-only across publish calls.
#[derive(Debug, Clone)]
pub struct MessageOptions {
    /// Topic all messages are published to.
    pub topic: String,
    /// Delivery-assurance level.
    pub qos: QoS,
    /// Whether the broker keeps the message as the topic's last known value.
    pub retained: bool,
}

/// Maps the wire-level QoS integer (0/1/2) to a [`QoS`] value.
pub fn qos_from_level(level: u8) -> Result<QoS> {
    match level {
        0 => Ok(QoS::AtMostOnce),
        1 => Ok(QoS::AtLeastOnce),
        2 => Ok(QoS::ExactlyOnce),
        other => bail!("invalid QoS level {other}, expected 0, 1 or 2"),
    }
}

/// Configuration for the MQTT event forwarder.
#[derive(Debug, Clone)]
pub struct MqttForwarderConfig {
    /// Unique listener identifier.
    pub id: String,
    /// MQTT broker hostname or IP.
    pub broker_host: String,
    /// MQTT broker port (default: 1883).
    pub port: u16,
    /// MQTT client ID. Defaults to `"aegis-listener-{id}"`.
    pub client_id: String,
    /// Optional MQTT username for authentication.
    pub username: Option<String>,
    /// Optional MQTT password for authentication.
    pub password: Option<String>,
    /// Event kinds the operator asked to exclude from forwarding.
    pub excluded_events: HashSet<EventKind>,
    /// Admin operations the operator asked to exclude from forwarding.
    pub excluded_admin_operations: HashSet<AdminOperation>,
    /// Delivery options applied to every message.
    pub message_options: MessageOptions,
}

impl MqttForwarderConfig {
    /// Start building a new config with the required fields.
    pub fn builder(
        id: impl Into<String>,
        broker_host: impl Into<String>,
        topic: impl Into<String>,
    ) -> MqttForwarderConfigBuilder {
        let id = id.into();
        MqttForwarderConfigBuilder {
            id: id.clone(),
            broker_host: broker_host.into(),
            topic: topic.into(),
            port: 1883,
            client_id: format!("aegis-listener-{id}"),
            username: None,
            password: None,
            qos: QoS::AtLeastOnce,
            retained: false,
            excluded_events: HashSet::new(),
            excluded_admin_operations: HashSet::new(),
        }
    }

    /// Load the config from `MQTT_*` environment variables.
    ///
    /// `MQTT_BROKER_HOST` and `MQTT_TOPIC` are required; everything else
    /// falls back to the builder defaults. Exclusion sets are read as
    /// comma-separated canonical names (e.g. `LOGOUT,REGISTER`).
    pub fn from_env(id: impl Into<String>) -> Result<Self> {
        let broker_host =
            env::var("MQTT_BROKER_HOST").map_err(|_| anyhow!("MQTT_BROKER_HOST not set"))?;
        let topic = env::var("MQTT_TOPIC").map_err(|_| anyhow!("MQTT_TOPIC not set"))?;

        let mut builder = Self::builder(id, broker_host, topic);

        if let Ok(port) = env::var("MQTT_PORT") {
            builder = builder.port(port.parse::<u16>().map_err(|_| anyhow!("invalid MQTT_PORT"))?);
        }
        builder = builder.client_id(env::var("MQTT_CLIENT_ID").unwrap_or_else(|_| {
            format!("aegis-listener-{}", uuid::Uuid::new_v4())
        }));
        if let Ok(user) = env::var("MQTT_USERNAME") {
            builder = builder.username(user);
        }
        if let Ok(pass) = env::var("MQTT_PASSWORD") {
            builder = builder.password(pass);
        }
        if let Ok(level) = env::var("MQTT_QOS") {
            let level = level.parse::<u8>().map_err(|_| anyhow!("invalid MQTT_QOS"))?;
            builder = builder.qos(qos_from_level(level)?);
        }
        if let Ok(retained) = env::var("MQTT_RETAINED") {
            builder =
                builder.retained(retained.parse::<bool>().map_err(|_| anyhow!("invalid MQTT_RETAINED"))?);
        }
        for kind in parse_names::<EventKind>(env::var("MQTT_EXCLUDED_EVENTS").ok())? {
            builder = builder.exclude_event(kind);
        }
        for op in parse_names::<AdminOperation>(env::var("MQTT_EXCLUDED_ADMIN_OPERATIONS").ok())? {
            builder = builder.exclude_admin_operation(op);
        }

        Ok(builder.build())
    }
}

fn parse_names<T>(raw: Option<String>) -> Result<Vec<T>>
where
    T: FromStr<Err = String>,
{
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<T>().map_err(|e| anyhow!(e)))
        .collect()
}

/// Builder for [`MqttForwarderConfig`].
pub struct MqttForwarderConfigBuilder {
    id: String,
    broker_host: String,
    topic: String,
    port: u16,
    client_id: String,
    username: Option<String>,
    password: Option<String>,
    qos: QoS,
    retained: bool,
    excluded_events: HashSet<EventKind>,
    excluded_admin_operations: HashSet<AdminOperation>,
}

impl MqttForwarderConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn qos(mut self, qos: QoS) -> Self {
        self.qos = qos;
        self
    }

    pub fn retained(mut self, retained: bool) -> Self {
        self.retained = retained;
        self
    }

    pub fn exclude_event(mut self, kind: EventKind) -> Self {
        self.excluded_events.insert(kind);
        self
    }

    pub fn exclude_admin_operation(mut self, operation: AdminOperation) -> Self {
        self.excluded_admin_operations.insert(operation);
        self
    }

    /// Build the config.
    pub fn build(self) -> MqttForwarderConfig {
        MqttForwarderConfig {
            id: self.id,
            broker_host: self.broker_host,
            port: self.port,
            client_id: self.client_id,
            username: self.username,
            password: self.password,
            excluded_events: self.excluded_events,
            excluded_admin_operations: self.excluded_admin_operations,
            message_options: MessageOptions {
                topic: self.topic,
                qos: self.qos,
                retained: self.retained,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MqttForwarderConfig::builder("login", "broker.local", "aegis/events").build();

        assert_eq!(config.port, 1883);
        assert_eq!(config.client_id, "aegis-listener-login");
        assert_eq!(config.message_options.topic, "aegis/events");
        assert_eq!(config.message_options.qos, QoS::AtLeastOnce);
        assert!(!config.message_options.retained);
        assert!(config.excluded_events.is_empty());
        assert!(config.excluded_admin_operations.is_empty());
    }

    #[test]
    fn test_builder_collects_exclusions() {
        let config = MqttForwarderConfig::builder("login", "broker.local", "aegis/events")
            .exclude_event(EventKind::Logout)
            .exclude_event(EventKind::Register)
            .exclude_admin_operation(AdminOperation::Delete)
            .build();

        assert_eq!(config.excluded_events.len(), 2);
        assert!(config.excluded_events.contains(&EventKind::Logout));
        assert!(config.excluded_admin_operations.contains(&AdminOperation::Delete));
    }

    #[test]
    fn test_qos_levels() {
        assert_eq!(qos_from_level(0).unwrap(), QoS::AtMostOnce);
        assert_eq!(qos_from_level(1).unwrap(), QoS::AtLeastOnce);
        assert_eq!(qos_from_level(2).unwrap(), QoS::ExactlyOnce);
        assert!(qos_from_level(3).is_err());
    }

    #[test]
    fn test_parse_names_rejects_unknown() {
        assert!(parse_names::<EventKind>(Some("LOGOUT,BOGUS".into())).is_err());
        let parsed = parse_names::<EventKind>(Some("LOGOUT, REGISTER".into())).unwrap();
        assert_eq!(parsed, vec![EventKind::Logout, EventKind::Register]);
    }
}
