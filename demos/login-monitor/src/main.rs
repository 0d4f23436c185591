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

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use log::info;

use aegis_events::{AuthEvent, EventKind, EventListener};
use aegis_listener_mqtt::{MqttEventForwarder, MqttForwarderConfig, MqttPublisher};

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as i64
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    info!("Starting login monitor demo...");

    // 1. Configure the forwarder.
    // Publishes login events to 'aegis/events' on a local broker.
    let config = MqttForwarderConfig::builder("login-monitor", "localhost", "aegis/events")
        .port(1883)
        .client_id("aegis-login-monitor")
        .build();

    // 2. Connect the publisher and wire up the forwarder.
    let publisher = Arc::new(MqttPublisher::connect(&config));
    let forwarder = MqttEventForwarder::new(&config, publisher.clone());

    info!("Forwarder configured. Emitting a synthetic login every 5s, Ctrl-C to stop.");

    // 3. Stand in for the runtime's dispatch loop with synthetic events.
    let mut interval = tokio::time::interval(Duration::from_secs(5));
    let mut sequence: u64 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
            _ = interval.tick() => {
                sequence += 1;

                let login = AuthEvent::builder(EventKind::Login, now_millis())
                    .realm("master")
                    .client("acct-console")
                    .user(format!("user-{sequence}"))
                    .ip_address("127.0.0.1")
                    .detail("auth_method", "openid-connect")
                    .build();
                forwarder.on_event(&login).await;

                // Dropped by the forwarding policy; shows the filter at work.
                let logout = AuthEvent::builder(EventKind::Logout, now_millis())
                    .realm("master")
                    .user(format!("user-{sequence}"))
                    .build();
                forwarder.on_event(&logout).await;
            }
        }
    }

    forwarder.close().await;
    publisher.disconnect().await;

    Ok(())
}
