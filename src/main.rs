use match_recommender::config::Settings;
use match_recommender::pipeline::Pipeline;
use match_recommender::report::output_report;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout carries only the recommendations
fn init_logging(settings: &Settings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

// One request in flight at a time, so a single-threaded runtime is enough
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&settings);

    info!("Generating today's match recommendations...");

    let local_time = settings.display.local_time;
    let pipeline = Pipeline::new(settings);

    match pipeline.run().await {
        Ok(recommendations) if recommendations.is_empty() => {
            info!("The model returned no recommendations");
            ExitCode::SUCCESS
        }
        Ok(recommendations) => {
            output_report(&recommendations, local_time);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
