use serde::{Deserialize, Serialize};

use crate::enricher::AffectedEntity;
use crate::event::{HealthEvent, PERSONAL_HEALTH_DASHBOARD_URL};

pub const TITLE: &str = "AWS Health Notification";
pub const COLOR_SEVERITY: &str = "danger";
pub const NO_DESCRIPTION: &str = "no description found in health check";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl Field {
    fn wide(title: &str, value: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short: false,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Attachment {
    pub title: String,
    pub title_link: String,
    pub color: String,
    pub fields: Vec<Field>,
}

/// Body of a Slack incoming-webhook request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NotificationMessage {
    pub channel: String,
    pub icon_emoji: String,
    pub attachments: Vec<Attachment>,
}

impl NotificationMessage {
    pub fn field(&self, title: &str) -> Option<&str> {
        self.attachments
            .iter()
            .flat_map(|attachment| attachment.fields.iter())
            .find(|field| field.title == title)
            .map(|field| field.value.as_str())
    }
}

pub fn build_message(
    event: &HealthEvent,
    entity: &AffectedEntity,
    channel: &str,
    icon_emoji: &str,
) -> NotificationMessage {
    let description = event.latest_description().unwrap_or(NO_DESCRIPTION);

    let fields = vec![
        Field::wide("Service", event.detail.service.as_str()),
        Field::wide("Description", description),
        Field::wide("EventTypeCode", event.detail.event_type_code.as_str()),
        Field::wide("Link", event.event_url()),
        Field::wide("AWS Account ID", entity.account_id.as_str()),
        Field::wide("Entity Value", entity.entity_value.as_str()),
    ];

    NotificationMessage {
        channel: channel.to_string(),
        icon_emoji: icon_emoji.to_string(),
        attachments: vec![Attachment {
            title: TITLE.to_string(),
            title_link: PERSONAL_HEALTH_DASHBOARD_URL.to_string(),
            color: COLOR_SEVERITY.to_string(),
            fields,
        }],
    }
}
