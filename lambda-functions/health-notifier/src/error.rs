use thiserror::Error;

/// The inbound payload could not be turned into a Health Event.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Event envelope is not a CloudWatch/EventBridge event: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("Event envelope has no detail")]
    MissingDetail,

    #[error("Event detail is not a Health Event: {0}")]
    Detail(#[source] serde_json::Error),

    #[error("Health Event has an empty eventArn")]
    MissingArn,
}

/// The Health API query itself failed (transport, auth, bad filter).
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Invalid entity filter for {arn}: {message}")]
    InvalidFilter { arn: String, message: String },

    #[error("DescribeAffectedEntities failed for {arn}: {message}")]
    Query { arn: String, message: String },
}

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Startup or secret-store problems. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Required setting {0} is missing or empty")]
    Missing(&'static str),

    #[error("Setting {name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("Parameter {0} not found")]
    ParameterNotFound(String),

    #[error("Parameter {0} has no value")]
    ParameterEmpty(String),

    #[error("Failed to read parameter {name}: {message}")]
    SecretStore { name: String, message: String },
}
