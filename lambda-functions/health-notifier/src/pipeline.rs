use std::fmt;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::aws::SecretStore;
use crate::config::NotifierConfig;
use crate::enricher::{EntityEnricher, HealthDetails};
use crate::error::ConfigurationError;
use crate::event::decode_event;
use crate::message::{build_message, NotificationMessage};
use crate::notifier::{ChatWebhook, Delivery, DeliveryOutcome, Notifier};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    AbortedAtDecode,
    AbortedAtEnrich,
    NotifiedSent,
    NotifiedSkipped,
    NotifiedDeliveryFailed,
}

impl Outcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::AbortedAtDecode | Self::AbortedAtEnrich)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbortedAtDecode => write!(f, "aborted-at-decode"),
            Self::AbortedAtEnrich => write!(f, "aborted-at-enrich"),
            Self::NotifiedSent => write!(f, "notified-sent"),
            Self::NotifiedSkipped => write!(f, "notified-skipped"),
            Self::NotifiedDeliveryFailed => write!(f, "notified-delivery-failed"),
        }
    }
}

impl From<&DeliveryOutcome> for Outcome {
    fn from(outcome: &DeliveryOutcome) -> Self {
        match outcome {
            DeliveryOutcome::Sent => Self::NotifiedSent,
            DeliveryOutcome::Skipped => Self::NotifiedSkipped,
            DeliveryOutcome::Failed(_) => Self::NotifiedDeliveryFailed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decoding,
    Enriching,
    Building,
    Notifying,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decoding => write!(f, "decoding"),
            Self::Enriching => write!(f, "enriching"),
            Self::Building => write!(f, "building"),
            Self::Notifying => write!(f, "notifying"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationReport {
    pub outcome: Outcome,
    pub event_arn: Option<String>,
    pub message: Option<NotificationMessage>,
}

impl InvocationReport {
    fn aborted(outcome: Outcome, event_arn: Option<String>) -> Self {
        Self {
            outcome,
            event_arn,
            message: None,
        }
    }
}

#[derive(Error, Debug)]
#[error("Health event invocation {0}")]
pub struct Aborted(pub Outcome);

/// Runs decode, enrich, build and notify once per event. Holds only the
/// immutable config and the collaborator handles, so one instance serves
/// every invocation of the process.
pub struct Pipeline {
    config: NotifierConfig,
    secrets: Box<dyn SecretStore>,
    details: Box<dyn HealthDetails>,
    webhook: Box<dyn ChatWebhook>,
}

impl Pipeline {
    pub fn new(
        config: NotifierConfig,
        secrets: Box<dyn SecretStore>,
        details: Box<dyn HealthDetails>,
        webhook: Box<dyn ChatWebhook>,
    ) -> Self {
        Self {
            config,
            secrets,
            details,
            webhook,
        }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// The webhook URL is read on every invocation so a rotated secret is
    /// picked up immediately.
    async fn resolve_delivery(&self) -> Result<Delivery, ConfigurationError> {
        if self.config.do_not_send {
            return Ok(Delivery::Suppressed);
        }

        let parameter = self
            .config
            .webhook_parameter
            .as_deref()
            .ok_or(ConfigurationError::Missing("SSM_SLACK_WEBHOOK_URL"))?;

        let url = self.secrets.decrypt_value(parameter).await?;
        Ok(Delivery::Webhook(url))
    }

    pub async fn run(&self, raw: Value) -> Result<InvocationReport, ConfigurationError> {
        debug!(stage = %Stage::Decoding, "Entering stage");
        let event = match decode_event(raw) {
            Ok(event) => event,
            Err(e) => {
                error!(stage = %Stage::Decoding, error = %e, "Unable to decode health event");
                return Ok(InvocationReport::aborted(Outcome::AbortedAtDecode, None));
            }
        };
        let event_arn = event.arn().to_string();
        info!(
            event_arn = %event_arn,
            service = %event.detail.service,
            event_type_code = %event.detail.event_type_code,
            event_type_category = event.detail.event_type_category.as_deref().unwrap_or_default(),
            "Decoded health event"
        );

        // Nothing leaves the process until the event has decoded.
        let delivery = match self.resolve_delivery().await {
            Ok(delivery) => delivery,
            Err(e) => {
                error!(event_arn = %event_arn, error = %e, "Failed to resolve slack webhook URL");
                return Err(e);
            }
        };

        debug!(stage = %Stage::Enriching, "Entering stage");
        let entity = match EntityEnricher::new(self.details.as_ref()).enrich(&event_arn).await {
            Ok(entity) => entity,
            Err(e) => {
                error!(stage = %Stage::Enriching, event_arn = %event_arn, error = %e, "Unable to describe affected entities");
                return Ok(InvocationReport::aborted(Outcome::AbortedAtEnrich, Some(event_arn)));
            }
        };

        debug!(stage = %Stage::Building, "Entering stage");
        let message = build_message(
            &event,
            &entity,
            &self.config.slack_channel,
            &self.config.slack_emoji,
        );

        debug!(stage = %Stage::Notifying, "Entering stage");
        let delivered = Notifier::new(self.webhook.as_ref())
            .notify(&message, &delivery)
            .await;
        let outcome = Outcome::from(&delivered);

        info!(stage = %Stage::Done, event_arn = %event_arn, outcome = %outcome, "Health event processed");

        Ok(InvocationReport {
            outcome,
            event_arn: Some(event_arn),
            message: Some(message),
        })
    }
}
