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

//! The outbound publish capability and its MQTT implementation.

use anyhow::Result;
use async_trait::async_trait;
use log::{info, warn};
use rumqttc::{AsyncClient, MqttOptions, QoS};
use tokio::task::JoinHandle;

use crate::config::MqttForwarderConfig;

/// Accepts one message per call and hands it to the broker.
///
/// Connection establishment, reconnection, and delivery guarantees belong
/// to the implementation; callers make exactly one publish attempt per
/// message and treat a returned error as terminal for that message.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>, qos: QoS, retained: bool) -> Result<()>;
}

/// [`MessagePublisher`] backed by a rumqttc [`AsyncClient`].
///
/// `connect` spawns a background task that drives the client event loop;
/// rumqttc reconnects on its own when polling resumes after an error.
pub struct MqttPublisher {
    client: AsyncClient,
    driver: JoinHandle<()>,
}

impl MqttPublisher {
    /// Create the client and start the event-loop driver.
    pub fn connect(config: &MqttForwarderConfig) -> Self {
        info!(
            "[{}] Connecting to MQTT broker (broker={}:{}, client_id={})",
            config.id, config.broker_host, config.port, config.client_id
        );

        let mut mqtt_opts = MqttOptions::new(&config.client_id, &config.broker_host, config.port);
        mqtt_opts.set_keep_alive(std::time::Duration::from_secs(30));

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            mqtt_opts.set_credentials(user, pass);
        }

        let (client, mut eventloop) = AsyncClient::new(mqtt_opts, 100);

        // Drive the event loop to keep the connection alive.
        let driver_id = config.id.clone();
        let driver = tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(_) => {}
                    Err(e) => {
                        warn!("[{driver_id}] MQTT eventloop error (will reconnect): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Self { client, driver }
    }

    /// Disconnect from the broker and stop the event-loop driver.
    pub async fn disconnect(&self) {
        let _ = self.client.disconnect().await;
        self.driver.abort();
    }
}

#[async_trait]
impl MessagePublisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>, qos: QoS, retained: bool) -> Result<()> {
        self.client.publish(topic, qos, retained, payload).await?;
        Ok(())
    }
}
