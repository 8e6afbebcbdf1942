use aws_lambda_events::event::cloudwatch_events::CloudWatchEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DecodeError;

pub const PERSONAL_HEALTH_DASHBOARD_URL: &str = "https://phd.aws.amazon.com/phd/home";

const FALLBACK_EVENT_REGION: &str = "us-east-1";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct EventDescription {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(rename = "latestDescription", alias = "latest", default)]
    pub latest: String,
}

/// The `detail` of an `aws.health` event.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthEventDetail {
    #[serde(alias = "arn", default)]
    pub event_arn: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub event_type_code: String,
    #[serde(default)]
    pub event_type_category: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(rename = "eventDescription", alias = "description", default)]
    pub description: Vec<EventDescription>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthEvent {
    pub detail: HealthEventDetail,
    /// Region from the envelope, if the bus supplied one.
    pub region: Option<String>,
}

impl HealthEvent {
    pub fn arn(&self) -> &str {
        &self.detail.event_arn
    }

    /// Text of the most recent description entry.
    pub fn latest_description(&self) -> Option<&str> {
        self.detail.description.last().map(|entry| entry.latest.as_str())
    }

    pub fn event_region(&self) -> &str {
        self.region
            .as_deref()
            .filter(|region| !region.is_empty())
            .or_else(|| arn_region(&self.detail.event_arn))
            .unwrap_or(FALLBACK_EVENT_REGION)
    }

    pub fn event_url(&self) -> String {
        event_url(self.event_region(), &self.detail.event_arn)
    }
}

/// Dashboard link for a single event.
pub fn event_url(region: &str, arn: &str) -> String {
    format!(
        "{}?region={}#/event-log?eventID={}&eventTab=details&layout=vertical",
        PERSONAL_HEALTH_DASHBOARD_URL, region, arn
    )
}

// arn:partition:service:region:account:resource
fn arn_region(arn: &str) -> Option<&str> {
    arn.split(':').nth(3).filter(|region| !region.is_empty())
}

pub fn decode_event(raw: Value) -> Result<HealthEvent, DecodeError> {
    let envelope: CloudWatchEvent = serde_json::from_value(raw).map_err(DecodeError::Envelope)?;

    let detail = match envelope.detail {
        None | Some(Value::Null) => return Err(DecodeError::MissingDetail),
        // Some producers forward the detail as an encoded JSON string.
        Some(Value::String(encoded)) => {
            serde_json::from_str::<HealthEventDetail>(&encoded).map_err(DecodeError::Detail)?
        }
        Some(other) => serde_json::from_value::<HealthEventDetail>(other).map_err(DecodeError::Detail)?,
    };

    if detail.event_arn.trim().is_empty() {
        return Err(DecodeError::MissingArn);
    }

    Ok(HealthEvent {
        detail,
        region: envelope.region,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ARN: &str = "arn:aws:health:eu-west-1::event/EC2/AWS_EC2_INSTANCE_RETIREMENT_SCHEDULED/abc";

    fn envelope(detail: Value) -> Value {
        json!({
            "version": "0",
            "id": "7bf73129-1428-4cd3-a780-95db273d1602",
            "detail-type": "AWS Health Event",
            "source": "aws.health",
            "account": "123456789012",
            "time": "2024-01-27T09:01:22Z",
            "region": "eu-west-1",
            "resources": [],
            "detail": detail
        })
    }

    #[test]
    fn test_decode_upstream_schema() {
        let event = decode_event(envelope(json!({
            "eventArn": ARN,
            "service": "EC2",
            "eventTypeCode": "AWS_EC2_INSTANCE_RETIREMENT_SCHEDULED",
            "eventTypeCategory": "scheduledChange",
            "startTime": "Sat, 27 Jan 2024 09:00:00 GMT",
            "eventDescription": [{"language": "en_US", "latestDescription": "Instance retiring"}],
            "affectedEntities": [{"entityValue": "i-0abc"}]
        })))
        .unwrap();

        assert_eq!(event.arn(), ARN);
        assert_eq!(event.detail.service, "EC2");
        assert_eq!(event.detail.event_type_category.as_deref(), Some("scheduledChange"));
        assert_eq!(event.latest_description(), Some("Instance retiring"));
        assert_eq!(event.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_decode_short_field_names() {
        let event = decode_event(envelope(json!({
            "arn": ARN,
            "description": [{"latest": "first"}, {"latest": "second"}]
        })))
        .unwrap();

        assert_eq!(event.arn(), ARN);
        assert_eq!(event.detail.service, "");
        assert_eq!(event.latest_description(), Some("second"));
    }

    #[test]
    fn test_decode_string_detail() {
        let detail = json!({"eventArn": ARN, "service": "RDS"}).to_string();
        let event = decode_event(envelope(Value::String(detail))).unwrap();
        assert_eq!(event.detail.service, "RDS");
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            decode_event(json!("not an event")),
            Err(DecodeError::Envelope(_))
        ));
        assert!(matches!(
            decode_event(envelope(Value::Null)),
            Err(DecodeError::MissingDetail)
        ));
        assert!(matches!(
            decode_event(envelope(json!({"eventArn": 42}))),
            Err(DecodeError::Detail(_))
        ));
        assert!(matches!(
            decode_event(envelope(json!({"service": "EC2"}))),
            Err(DecodeError::MissingArn)
        ));
    }

    #[test]
    fn test_event_url_uses_envelope_region() {
        let event = decode_event(envelope(json!({"eventArn": ARN}))).unwrap();
        assert_eq!(
            event.event_url(),
            format!(
                "https://phd.aws.amazon.com/phd/home?region=eu-west-1#/event-log?eventID={}&eventTab=details&layout=vertical",
                ARN
            )
        );
    }

    #[test]
    fn test_event_region_fallbacks() {
        let mut event = HealthEvent {
            detail: HealthEventDetail {
                event_arn: "arn:aws:health:ap-south-1::event/X".to_string(),
                ..Default::default()
            },
            region: None,
        };
        assert_eq!(event.event_region(), "ap-south-1");

        event.detail.event_arn = "arn:aws:health:::event/X".to_string();
        assert_eq!(event.event_region(), "us-east-1");

        event.region = Some(String::new());
        assert_eq!(event.event_region(), "us-east-1");
    }

    #[test]
    fn test_event_url_is_deterministic() {
        assert_eq!(event_url("us-east-1", "a"), event_url("us-east-1", "a"));
        assert_ne!(event_url("us-east-1", "a"), event_url("us-west-2", "a"));
    }
}
