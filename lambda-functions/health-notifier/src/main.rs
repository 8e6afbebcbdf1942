use anyhow::Context;
use health_notifier::aws::{load_session, HealthApi, SsmSecretStore};
use health_notifier::notifier::SlackWebhook;
use health_notifier::{handle_event, NotifierConfig, Pipeline, Response};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

async fn function_handler(pipeline: &Pipeline, event: LambdaEvent<Value>) -> Result<Response, Error> {
    handle_event(pipeline, event.payload).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .init();

    let config = NotifierConfig::from_env().context("failed to load notifier configuration")?;

    let session = load_session(config.region.as_deref(), config.profile.as_deref()).await;
    let health_session = load_session(Some(&config.health_region), config.profile.as_deref()).await;

    let pipeline = Pipeline::new(
        config,
        Box::new(SsmSecretStore::new(&session)),
        Box::new(HealthApi::new(&health_session)),
        Box::new(SlackWebhook::new()),
    );

    info!("Running Lambda handler.");
    let pipeline = &pipeline;
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(pipeline, event).await
    }))
    .await
}
