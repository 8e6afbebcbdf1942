use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::error::DeliveryError;
use crate::message::NotificationMessage;

#[async_trait]
pub trait ChatWebhook: Send + Sync {
    async fn post(&self, url: &str, message: &NotificationMessage) -> Result<(), DeliveryError>;
}

/// Posts the message as JSON to a Slack incoming webhook.
pub struct SlackWebhook {
    client: Client,
}

impl SlackWebhook {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for SlackWebhook {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatWebhook for SlackWebhook {
    async fn post(&self, url: &str, message: &NotificationMessage) -> Result<(), DeliveryError> {
        let response = self.client.post(url).json(message).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = read_body(response.text().await);
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn read_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(text) => text,
        Err(e) => format!("<unreadable body: {}>", e),
    }
}

/// Where a built message goes for this invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Suppressed,
    Webhook(String),
}

#[derive(Debug)]
pub enum DeliveryOutcome {
    Sent,
    Skipped,
    Failed(DeliveryError),
}

pub struct Notifier<'a> {
    webhook: &'a dyn ChatWebhook,
}

impl<'a> Notifier<'a> {
    pub fn new(webhook: &'a dyn ChatWebhook) -> Self {
        Self { webhook }
    }

    pub async fn notify(&self, message: &NotificationMessage, delivery: &Delivery) -> DeliveryOutcome {
        let url = match delivery {
            Delivery::Suppressed => {
                info!(slack_channel = %message.channel, "Send message is turned off");
                return DeliveryOutcome::Skipped;
            }
            Delivery::Webhook(url) => url,
        };

        match self.webhook.post(url, message).await {
            Ok(()) => {
                info!(slack_channel = %message.channel, "Successfully sent slack message");
                DeliveryOutcome::Sent
            }
            Err(e) => {
                error!(slack_channel = %message.channel, error = %e, "Failed to send slack message");
                DeliveryOutcome::Failed(e)
            }
        }
    }
}
