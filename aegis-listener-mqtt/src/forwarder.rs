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

//! MQTT implementation of the [`EventListener`] contract.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};

use aegis_events::{AdminEvent, AdminOperation, AuthEvent, EventKind, EventListener};

use crate::config::{MessageOptions, MqttForwarderConfig};
use crate::payload;
use crate::publisher::MessagePublisher;

/// MQTT event listener plugin for the Aegis runtime.
///
/// Receives authentication events from the runtime and republishes login
/// events as canonical JSON messages on a fixed MQTT topic. Publish
/// failures are logged and swallowed; the runtime's event pipeline never
/// sees a messaging-side outage.
pub struct MqttEventForwarder {
    id: String,
    excluded_events: HashSet<EventKind>,
    excluded_admin_operations: HashSet<AdminOperation>,
    message_options: MessageOptions,
    publisher: Arc<dyn MessagePublisher>,
}

impl MqttEventForwarder {
    /// Create a forwarder from its already-initialized collaborators.
    ///
    /// The publisher's connection lifecycle stays with the caller; the
    /// forwarder only borrows its publish capability.
    pub fn new(config: &MqttForwarderConfig, publisher: Arc<dyn MessagePublisher>) -> Self {
        debug!(
            "[{}] Configured exclusions: {} event kinds, {} admin operations",
            config.id,
            config.excluded_events.len(),
            config.excluded_admin_operations.len()
        );

        Self {
            id: config.id.clone(),
            excluded_events: config.excluded_events.clone(),
            excluded_admin_operations: config.excluded_admin_operations.clone(),
            message_options: config.message_options.clone(),
            publisher,
        }
    }

    /// Event kinds the operator configured for exclusion.
    ///
    /// TODO: honor this set in `on_event` once the forwarding policy is
    /// settled; today the policy is hardwired to LOGIN only.
    pub fn excluded_events(&self) -> &HashSet<EventKind> {
        &self.excluded_events
    }

    /// Admin operations the operator configured for exclusion.
    pub fn excluded_admin_operations(&self) -> &HashSet<AdminOperation> {
        &self.excluded_admin_operations
    }

    async fn send_message(&self, payload: String) {
        debug!("[{}] Event: {payload}", self.id);

        let result = self
            .publisher
            .publish(
                &self.message_options.topic,
                payload.into_bytes(),
                self.message_options.qos,
                self.message_options.retained,
            )
            .await;

        if let Err(e) = result {
            error!("[{}] Failed to publish to MQTT: {e:#}", self.id);
        }
    }
}

#[async_trait]
impl EventListener for MqttEventForwarder {
    fn id(&self) -> &str {
        &self.id
    }

    fn type_name(&self) -> &str {
        "mqtt"
    }

    async fn on_event(&self, event: &AuthEvent) {
        // Forward login events only.
        if event.kind == EventKind::Login {
            self.send_message(payload::event_to_payload(event)).await;
        }
    }

    async fn on_admin_event(&self, _event: &AdminEvent, _include_representation: bool) {
        // Admin events are not forwarded.
    }

    async fn close(&self) {
        debug!("[{}] Forwarder closed", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use anyhow::bail;
    use rumqttc::QoS;
    use serde_json::Value;

    use aegis_events::AuthDetails;

    #[derive(Debug, Clone)]
    struct Published {
        topic: String,
        payload: Vec<u8>,
        qos: QoS,
        retained: bool,
    }

    /// Records every publish attempt; fails them all when `fail` is set.
    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<Published>>,
        fail: bool,
    }

    impl RecordingPublisher {
        fn failing() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn attempts(&self) -> Vec<Published> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessagePublisher for RecordingPublisher {
        async fn publish(
            &self,
            topic: &str,
            payload: Vec<u8>,
            qos: QoS,
            retained: bool,
        ) -> anyhow::Result<()> {
            self.published.lock().unwrap().push(Published {
                topic: topic.to_string(),
                payload,
                qos,
                retained,
            });
            if self.fail {
                bail!("connection lost");
            }
            Ok(())
        }
    }

    fn forwarder_with(
        config: MqttForwarderConfig,
        publisher: Arc<RecordingPublisher>,
    ) -> MqttEventForwarder {
        MqttEventForwarder::new(&config, publisher)
    }

    fn login_event() -> AuthEvent {
        AuthEvent::builder(EventKind::Login, 1000)
            .realm("master")
            .client("acct-console")
            .user("u1")
            .build()
    }

    #[tokio::test]
    async fn test_login_event_published_once() {
        let publisher = Arc::new(RecordingPublisher::default());
        let config = MqttForwarderConfig::builder("t", "broker.local", "aegis/events")
            .qos(QoS::ExactlyOnce)
            .retained(true)
            .build();
        let forwarder = forwarder_with(config, publisher.clone());

        forwarder.on_event(&login_event()).await;

        let attempts = publisher.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].topic, "aegis/events");
        assert_eq!(attempts[0].qos, QoS::ExactlyOnce);
        assert!(attempts[0].retained);

        let payload: Value = serde_json::from_slice(&attempts[0].payload).unwrap();
        assert_eq!(payload["type"], "LOGIN");
        assert_eq!(payload["userId"], "u1");
        assert_eq!(payload.as_object().unwrap().len(), 9);
        assert!(payload["details"].is_object());
    }

    #[tokio::test]
    async fn test_non_login_events_dropped() {
        let publisher = Arc::new(RecordingPublisher::default());
        let config = MqttForwarderConfig::builder("t", "broker.local", "aegis/events").build();
        let forwarder = forwarder_with(config, publisher.clone());

        for kind in [EventKind::Logout, EventKind::Register, EventKind::RefreshToken] {
            forwarder
                .on_event(&AuthEvent::builder(kind, 1000).user("u1").build())
                .await;
        }

        assert!(publisher.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_exclusion_set_does_not_change_forwarding() {
        // The exclusion sets are carried configuration, not policy: a
        // LOGIN event goes out even when LOGIN is excluded, and an
        // excluded LOGOUT is dropped for being non-LOGIN, not for being
        // excluded.
        let publisher = Arc::new(RecordingPublisher::default());
        let config = MqttForwarderConfig::builder("t", "broker.local", "aegis/events")
            .exclude_event(EventKind::Login)
            .exclude_event(EventKind::Logout)
            .build();
        let forwarder = forwarder_with(config, publisher.clone());

        forwarder.on_event(&login_event()).await;
        forwarder
            .on_event(&AuthEvent::builder(EventKind::Logout, 1000).build())
            .await;

        assert_eq!(publisher.attempts().len(), 1);
        assert_eq!(forwarder.excluded_events().len(), 2);
    }

    #[tokio::test]
    async fn test_admin_events_never_published() {
        let publisher = Arc::new(RecordingPublisher::default());
        let config = MqttForwarderConfig::builder("t", "broker.local", "aegis/events").build();
        let forwarder = forwarder_with(config, publisher.clone());

        let event = AdminEvent::builder(AdminOperation::Create, 2000)
            .auth_details(AuthDetails::default())
            .resource_path("users/u1")
            .build();

        forwarder.on_admin_event(&event, true).await;
        forwarder.on_admin_event(&event, false).await;

        assert!(publisher.attempts().is_empty());
        assert!(forwarder.excluded_admin_operations().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_swallowed() {
        let publisher = Arc::new(RecordingPublisher::failing());
        let config = MqttForwarderConfig::builder("t", "broker.local", "aegis/events").build();
        let forwarder = forwarder_with(config, publisher.clone());

        // Must return normally despite the publisher error.
        forwarder.on_event(&login_event()).await;

        assert_eq!(publisher.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_message_options_stable_across_calls() {
        let publisher = Arc::new(RecordingPublisher::default());
        let config = MqttForwarderConfig::builder("t", "broker.local", "aegis/events")
            .qos(QoS::AtMostOnce)
            .build();
        let forwarder = forwarder_with(config, publisher.clone());

        forwarder.on_event(&login_event()).await;
        forwarder.on_event(&login_event()).await;

        let attempts = publisher.attempts();
        assert_eq!(attempts.len(), 2);
        for attempt in attempts {
            assert_eq!(attempt.topic, "aegis/events");
            assert_eq!(attempt.qos, QoS::AtMostOnce);
            assert!(!attempt.retained);
        }
    }

    #[tokio::test]
    async fn test_canonical_login_payload() {
        let publisher = Arc::new(RecordingPublisher::default());
        let config = MqttForwarderConfig::builder("t", "broker.local", "kc/events").build();
        let forwarder = forwarder_with(config, publisher.clone());

        forwarder.on_event(&login_event()).await;

        let attempts = publisher.attempts();
        assert_eq!(attempts[0].topic, "kc/events");
        assert_eq!(attempts[0].qos, QoS::AtLeastOnce);
        assert!(!attempts[0].retained);

        let payload: Value = serde_json::from_slice(&attempts[0].payload).unwrap();
        let expected: Value = serde_json::from_str(
            r#"{
                "clientId": "acct-console",
                "error": null,
                "ipAddress": null,
                "realmId": "master",
                "sessionId": null,
                "time": 1000,
                "type": "LOGIN",
                "userId": "u1",
                "details": {}
            }"#,
        )
        .unwrap();
        assert_eq!(payload, expected);
    }
}
