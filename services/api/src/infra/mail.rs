use reqwest::Client;
use serde::Serialize;

use crate::domain::repository::{DeliveryError, Mailer};

/// Writes outgoing mail to the log instead of sending it. Used when no relay
/// is configured.
#[derive(Clone, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        tracing::info!(to = %to, subject = %subject, body = %body, "mail (log transport)");
        Ok(())
    }
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Posts each message as JSON to an HTTP mail relay.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    relay_url: String,
    from: String,
}

impl HttpMailer {
    pub fn new(relay_url: &str, from: &str) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.to_owned(),
            from: from.to_owned(),
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let message = RelayMessage {
            from: &self.from,
            to,
            subject,
            body,
        };
        let resp = self
            .client
            .post(&self.relay_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| DeliveryError::Unreachable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(DeliveryError::Rejected(format!(
                "relay returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

/// Transport chosen at startup from configuration.
#[derive(Clone)]
pub enum AppMailer {
    Log(LogMailer),
    Http(HttpMailer),
}

impl AppMailer {
    pub fn from_config(relay_url: Option<&str>, from: &str) -> Self {
        match relay_url {
            Some(url) => Self::Http(HttpMailer::new(url, from)),
            None => Self::Log(LogMailer),
        }
    }
}

impl Mailer for AppMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        match self {
            Self::Log(m) => m.send(to, subject, body).await,
            Self::Http(m) => m.send(to, subject, body).await,
        }
    }
}
