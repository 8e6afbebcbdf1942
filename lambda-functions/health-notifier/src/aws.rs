use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_health::types::EntityFilter;
use aws_sdk_health::Client as HealthClient;
use aws_sdk_ssm::Client as SsmClient;
use tracing::info;

use crate::enricher::{EntityRecord, HealthDetails};
use crate::error::{ConfigurationError, EnrichmentError};

/// Reads decrypted values from a parameter store.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn decrypt_value(&self, name: &str) -> Result<String, ConfigurationError>;
}

pub async fn load_session(region: Option<&str>, profile: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}

pub struct SsmSecretStore {
    client: SsmClient,
}

impl SsmSecretStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: SsmClient::new(config),
        }
    }
}

#[async_trait]
impl SecretStore for SsmSecretStore {
    async fn decrypt_value(&self, name: &str) -> Result<String, ConfigurationError> {
        let resp = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| ConfigurationError::SecretStore {
                name: name.to_string(),
                message: aws_sdk_ssm::error::DisplayErrorContext(&e).to_string(),
            })?;

        let parameter = resp
            .parameter
            .ok_or_else(|| ConfigurationError::ParameterNotFound(name.to_string()))?;

        match parameter.value {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigurationError::ParameterEmpty(name.to_string())),
        }
    }
}

/// `DescribeAffectedEntities` against the Health API.
pub struct HealthApi {
    client: HealthClient,
}

impl HealthApi {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: HealthClient::new(config),
        }
    }
}

#[async_trait]
impl HealthDetails for HealthApi {
    async fn describe_affected_entities(
        &self,
        event_arn: &str,
    ) -> Result<Vec<EntityRecord>, EnrichmentError> {
        let filter = EntityFilter::builder()
            .event_arns(event_arn)
            .build()
            .map_err(|e| EnrichmentError::InvalidFilter {
                arn: event_arn.to_string(),
                message: e.to_string(),
            })?;

        // First page only; at most one entity is ever used.
        let output = self
            .client
            .describe_affected_entities()
            .filter(filter)
            .send()
            .await
            .map_err(|e| EnrichmentError::Query {
                arn: event_arn.to_string(),
                message: aws_sdk_health::error::DisplayErrorContext(&e).to_string(),
            })?;

        let records: Vec<EntityRecord> = output
            .entities()
            .iter()
            .map(|entity| EntityRecord {
                aws_account_id: entity.aws_account_id().map(str::to_string),
                entity_value: entity.entity_value().map(str::to_string),
            })
            .collect();

        info!("DescribeAffectedEntities returned {} entities", records.len());

        Ok(records)
    }
}
