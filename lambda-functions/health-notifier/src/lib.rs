pub mod aws;
pub mod config;
pub mod enricher;
pub mod error;
pub mod event;
pub mod message;
pub mod notifier;
pub mod pipeline;

use chrono::Utc;
use serde::Serialize;

pub use config::NotifierConfig;
pub use pipeline::{Aborted, InvocationReport, Outcome, Pipeline};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Response {
    pub outcome: Outcome,
    pub event_arn: Option<String>,
    pub channel: String,
    pub timestamp: String,
}

impl Response {
    pub fn from_report(report: &InvocationReport, channel: &str) -> Self {
        Self {
            outcome: report.outcome,
            event_arn: report.event_arn.clone(),
            channel: channel.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Maps one invocation to the runtime's view: aborted outcomes are errors,
/// every notified outcome (including a failed delivery) succeeds.
pub async fn handle_event(
    pipeline: &Pipeline,
    payload: serde_json::Value,
) -> Result<Response, lambda_runtime::Error> {
    let report = pipeline.run(payload).await?;

    if report.outcome.is_aborted() {
        return Err(Aborted(report.outcome).into());
    }

    Ok(Response::from_report(&report, &pipeline.config().slack_channel))
}
