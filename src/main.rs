use clap::Parser;
use neighborhood_match::cli::{self, Cli};
use neighborhood_match::config::LoggingSettings;
use neighborhood_match::AppError;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => {
            let e = AppError::from(e);
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    init_logging(&settings.logging, cli.verbose);
    info!("Configuration loaded successfully");

    match cli::run(&cli, &settings) {
        Ok(assignment) => {
            info!(
                "Assigned {} homeowners (capacity {})",
                assignment.total_placed(),
                assignment.capacity
            );
        }
        Err(e) => {
            if e.is_internal_fault() {
                error!("Matcher invariant violated: {}", e);
            }
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Logs go to stderr so stdout carries only the assignment
fn init_logging(logging: &LoggingSettings, verbose: u8) {
    let level = match verbose {
        0 => logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}
