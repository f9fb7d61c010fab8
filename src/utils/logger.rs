use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "person_ingest=info";
const VERBOSE_FILTER: &str = "person_ingest=debug,info";

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        env_filter(VERBOSE_FILTER)
    } else {
        env_filter(DEFAULT_FILTER)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_FILTER))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time() // CloudWatch stamps each line
                .json(),
        )
        .init();
}
