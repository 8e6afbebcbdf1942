use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::EnrichmentError;

pub const PLACEHOLDER: &str = "N/A";

/// One record as returned by the Health API, before placeholders are applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityRecord {
    pub aws_account_id: Option<String>,
    pub entity_value: Option<String>,
}

/// Query side of the Health API.
#[async_trait]
pub trait HealthDetails: Send + Sync {
    /// Entities whose event ARN matches `event_arn`, in service order.
    async fn describe_affected_entities(
        &self,
        event_arn: &str,
    ) -> Result<Vec<EntityRecord>, EnrichmentError>;
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AffectedEntity {
    pub account_id: String,
    pub entity_value: String,
}

impl AffectedEntity {
    pub fn placeholder() -> Self {
        Self {
            account_id: PLACEHOLDER.to_string(),
            entity_value: PLACEHOLDER.to_string(),
        }
    }

    pub fn from_record(record: &EntityRecord) -> Self {
        Self {
            account_id: or_placeholder(record.aws_account_id.as_deref()),
            entity_value: or_placeholder(record.entity_value.as_deref()),
        }
    }
}

fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

pub struct EntityEnricher<'a> {
    details: &'a dyn HealthDetails,
}

impl<'a> EntityEnricher<'a> {
    pub fn new(details: &'a dyn HealthDetails) -> Self {
        Self { details }
    }

    /// Looks up the affected entity for an event. Only the first match is
    /// used; no match at all yields the placeholder entity.
    pub async fn enrich(&self, event_arn: &str) -> Result<AffectedEntity, EnrichmentError> {
        let records = self.details.describe_affected_entities(event_arn).await?;

        let entity = match records.first() {
            Some(record) => {
                if records.len() > 1 {
                    info!(
                        "{} entities matched {}, using the first",
                        records.len(),
                        event_arn
                    );
                }
                AffectedEntity::from_record(record)
            }
            None => {
                warn!("No affected entities found for {}", event_arn);
                AffectedEntity::placeholder()
            }
        };

        info!(aws_account_id = %entity.account_id, "AWS Account ID");
        info!(entity_value = %entity.entity_value, "Entity Value");

        Ok(entity)
    }
}
