use std::sync::Arc;

use aws_config::BehaviorVersion;
use gateway_authorizer::{
    config::Config, secrets::AwsSecretsManager, AuthorizerBuilder, AuthorizerResponse, GatewayAuthorizer,
};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,gateway_authorizer=debug".into()),
        ))
        // no ansi colours, no timestamps: CloudWatch adds the ingestion time
        .with(tracing_subscriber::fmt::layer().json().with_ansi(false).without_time())
        .init();

    let config = Config::from_env()?;
    info!(secret = %config.secret_name, jwks_uri = %config.jwks_uri, "starting authorizer");

    let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let secret_store = Arc::new(AwsSecretsManager::new(aws_sdk_secretsmanager::Client::new(&aws_config)));

    // built once, the key cache and http client survive warm invocations
    let authorizer = AuthorizerBuilder::from_jwks_url(&config.jwks_uri, secret_store, &config.secret_name)
        .refresh(config.refresh())
        .http_client(reqwest::Client::builder().build()?)
        .build()?;
    let authorizer = &authorizer;

    // raw payload: an event with unexpected field types is denied, not failed
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler(authorizer, event).await
    }))
    .await
}

async fn handler(authorizer: &GatewayAuthorizer, event: LambdaEvent<Value>) -> Result<AuthorizerResponse, Error> {
    info!(request_id = %event.context.request_id, "authorization event");
    Ok(authorizer.handle_value(event.payload).await?)
}
