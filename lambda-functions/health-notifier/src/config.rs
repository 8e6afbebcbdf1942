use bon::Builder;

use crate::error::ConfigurationError;

pub const DEFAULT_HEALTH_REGION: &str = "us-east-1";
pub const DEFAULT_SLACK_EMOJI: &str = ":boom:";

/// Process-wide settings, read once at cold start and never mutated.
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct NotifierConfig {
    /// Region for the session that reads the secret store. `None` uses the default chain.
    #[builder(into)]
    pub region: Option<String>,

    /// The Health API is only served from a single region.
    #[builder(into, default = DEFAULT_HEALTH_REGION.to_string())]
    pub health_region: String,

    /// Run the whole pipeline but never post to the webhook.
    #[builder(default = false)]
    pub do_not_send: bool,

    #[builder(into)]
    pub profile: Option<String>,

    #[builder(into)]
    pub slack_channel: String,

    #[builder(into, default = DEFAULT_SLACK_EMOJI.to_string())]
    pub slack_emoji: String,

    /// SSM parameter holding the encrypted webhook URL.
    #[builder(into)]
    pub webhook_parameter: Option<String>,
}

impl NotifierConfig {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let slack_channel = get("SLACK_CHANNEL").ok_or(ConfigurationError::Missing("SLACK_CHANNEL"))?;

        let do_not_send = match get("DO_NOT_SEND_MESSAGE") {
            Some(value) => parse_flag("DO_NOT_SEND_MESSAGE", &value)?,
            None => false,
        };

        let webhook_parameter = get("SSM_SLACK_WEBHOOK_URL");
        if webhook_parameter.is_none() && !do_not_send {
            return Err(ConfigurationError::Missing("SSM_SLACK_WEBHOOK_URL"));
        }

        Ok(Self::builder()
            .maybe_region(get("REGION"))
            .health_region(get("AWS_HEALTH_REGION").unwrap_or_else(|| DEFAULT_HEALTH_REGION.to_string()))
            .do_not_send(do_not_send)
            .maybe_profile(get("AWS_PROFILE"))
            .slack_channel(slack_channel)
            .slack_emoji(get("SLACK_EMOJI").unwrap_or_else(|| DEFAULT_SLACK_EMOJI.to_string()))
            .maybe_webhook_parameter(webhook_parameter)
            .build())
    }
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigurationError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}
