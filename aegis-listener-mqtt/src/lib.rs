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

//! MQTT event listener plugin for the Aegis runtime.
//!
//! Republishes login events as canonical JSON messages on a fixed MQTT
//! topic. Delivery guarantees, reconnection, and queuing belong to the
//! MQTT client; the plugin makes one publish attempt per event and logs
//! (without propagating) any failure.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use aegis_listener_mqtt::{MqttEventForwarder, MqttForwarderConfig, MqttPublisher};
//!
//! let config = MqttForwarderConfig::builder("logins", "broker.local", "aegis/events")
//!     .port(1883)
//!     .build();
//!
//! let publisher = Arc::new(MqttPublisher::connect(&config));
//! let forwarder = MqttEventForwarder::new(&config, publisher);
//! // Register `forwarder` with the runtime's event dispatcher.
//! ```

pub mod config;
pub mod forwarder;
pub mod payload;
pub mod publisher;

pub use config::{qos_from_level, MessageOptions, MqttForwarderConfig, MqttForwarderConfigBuilder};
pub use forwarder::MqttEventForwarder;
pub use publisher::{MessagePublisher, MqttPublisher};
