use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use person_ingest::utils::{logger, validation::Validate};
use person_ingest::{
    DynamoRepository, IngestionEngine, InvocationResponse, LambdaConfig, NotificationEvent,
    S3Storage,
};

type Engine = IngestionEngine<S3Storage, DynamoRepository>;

async fn function_handler(
    engine: &Engine,
    event: LambdaEvent<NotificationEvent>,
) -> Result<InvocationResponse, Error> {
    tracing::info!("Starting ingestion for request {}", event.context.request_id);

    // Errors go back to the runtime so the trigger's redelivery policy retries.
    engine.handle(&event.payload).await.map_err(|e| {
        tracing::error!(
            "Ingestion failed: {} (Category: {:?}, Retryable: {})",
            e,
            e.category(),
            e.is_retryable()
        );
        Box::new(e) as Error
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = &lambda_config.region {
        loader = loader.region(Region::new(region.clone()));
    }
    let sdk_config = loader.load().await;

    let mut s3_config =
        aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(lambda_config.force_path_style);
    if let Some(endpoint) = &lambda_config.s3_endpoint {
        s3_config = s3_config.endpoint_url(endpoint);
    }
    let s3_client = aws_sdk_s3::Client::from_conf(s3_config.build());
    let dynamo_client = aws_sdk_dynamodb::Client::new(&sdk_config);

    // Clients are built once per cold start and shared by every invocation.
    let engine = IngestionEngine::new(
        S3Storage::new(s3_client, lambda_config.bucket.clone()),
        DynamoRepository::new(dynamo_client, lambda_config.table.clone()),
    );
    let engine = &engine;

    run(service_fn(move |event: LambdaEvent<NotificationEvent>| async move {
        function_handler(engine, event).await
    }))
    .await
}
