//! Provides an interface to send command documents to printers.
//!
//! The production implementation speaks MQTT over TLS, which is how printers in LAN mode accept
//! commands. It is only available with the `mqtt` feature.

use crate::config::DeviceEntry;
use crate::core::CommandDocument;
use async_trait::async_trait;

/// Opens sessions to printers.
#[async_trait]
pub trait ManageSession<S: DeviceSession> {
    /// Connect to `entry` and, on success, return a session that is ready to publish.
    async fn open(&mut self, entry: &DeviceEntry) -> anyhow::Result<S>;
}

/// An open connection to one printer.
///
/// A session belongs to exactly one printer's run and is closed before the next printer starts.
#[async_trait]
pub trait DeviceSession {
    /// Send `document` to `topic`.
    async fn publish(&mut self, topic: &str, document: &CommandDocument) -> anyhow::Result<()>;

    /// Disconnect from the printer.
    async fn close(&mut self) -> anyhow::Result<()>;
}

#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConnector, MqttSession};

#[cfg(feature = "mqtt")]
mod mqtt {
    use super::*;
    use anyhow::Context;
    use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS, TlsConfiguration, Transport};
    use std::time::Duration;
    use tokio::task::JoinHandle;
    use tokio::time;

    /// Printers only accept this user name in LAN mode. The password is the access code.
    const USERNAME: &str = "bblp";

    const KEEP_ALIVE: Duration = Duration::from_secs(30);

    /// How long [MqttSession::close] waits for the event loop to wind down.
    const CLOSE_GRACE: Duration = Duration::from_secs(1);

    /// Capacity of the request queue between [AsyncClient] and its event loop.
    const CAPACITY: usize = 10;

    /// Production implementation of [ManageSession].
    #[derive(Clone, Debug, Default)]
    pub struct MqttConnector;

    #[async_trait]
    impl ManageSession<MqttSession> for MqttConnector {
        async fn open(&mut self, entry: &DeviceEntry) -> anyhow::Result<MqttSession> {
            let client_id = format!("bambusy-{}-{}", std::process::id(), entry.id);
            let mut options = MqttOptions::new(client_id, entry.host.as_str(), entry.port);
            options.set_credentials(USERNAME, entry.access_code.as_str());
            options.set_keep_alive(KEEP_ALIVE);

            // Printers present a self-signed certificate that names the serial, not the host.
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .context("building TLS connector")?;
            options.set_transport(Transport::tls_with_config(
                TlsConfiguration::NativeConnector(connector),
            ));

            let (client, mut eventloop) = AsyncClient::new(options, CAPACITY);

            // Drive the event loop ourselves until the printer accepts the connection, so that
            // connection failures surface here rather than on the first publish. A refused
            // CONNACK comes back from poll as an error.
            loop {
                if let Event::Incoming(Packet::ConnAck(_)) = eventloop.poll().await? {
                    break;
                }
            }
            tracing::debug!(id = entry.id, host = %entry.host, "session open");

            let id = entry.id;
            let driver = tokio::spawn(async move {
                loop {
                    if let Err(err) = eventloop.poll().await {
                        tracing::debug!(id, error = %err, "session event loop stopped");
                        break;
                    }
                }
            });

            Ok(MqttSession { client, driver })
        }
    }

    /// Production implementation of [DeviceSession].
    ///
    /// Dropping the session stops its event loop, so a session abandoned mid-run never outlives
    /// it.
    pub struct MqttSession {
        client: AsyncClient,
        driver: JoinHandle<()>,
    }

    #[async_trait]
    impl DeviceSession for MqttSession {
        async fn publish(&mut self, topic: &str, document: &CommandDocument) -> anyhow::Result<()> {
            let payload = document.to_json()?;
            tracing::debug!(topic, %payload, "publishing");
            self.client
                .publish(topic, QoS::AtMostOnce, false, payload)
                .await
                .with_context(|| format!("publishing to {topic}"))
        }

        async fn close(&mut self) -> anyhow::Result<()> {
            self.client.disconnect().await.context("disconnecting")?;

            // Let the event loop flush the DISCONNECT before the session is dropped.
            let _ = time::timeout(CLOSE_GRACE, &mut self.driver).await;
            Ok(())
        }
    }

    impl Drop for MqttSession {
        fn drop(&mut self) {
            self.driver.abort();
        }
    }
}
