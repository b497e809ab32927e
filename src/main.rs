mod cli;

use clap::Parser;
use cli::{Cli, Commands, ScoreCommand};
use serde::Serialize;
use std::io::Read;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voto_match::config::{LoggingSettings, Settings};
use voto_match::error::AppError;
use voto_match::models::ScoringRequest;
use voto_match::services::{CatalogStore, ScoringService};

fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings.logging);

    match run(cli.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// LOG_LEVEL / LOG_FORMAT override the configured logging; logs go to stderr
fn init_tracing(logging: &LoggingSettings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn run(command: Commands, settings: &Settings) -> Result<ExitCode, AppError> {
    match command {
        Commands::Score(args) => {
            let service = scoring_service(settings)?;
            let request = read_request(&args)?;
            let response = service.handle(&request)?;

            if let Some(best) = response.result.ranked_party_codes().first() {
                info!("Best match for {} session: {}", response.version, best);
            }

            print_json(&response, args.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Standings(args) => {
            let service = scoring_service(settings)?;
            let request = read_request(&args)?;
            let standings = service
                .standings(&request)
                .ok_or(AppError::UnsupportedVersion(request.version()))?;

            print_json(&standings, args.pretty)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::CheckCatalogs(args) => {
            // Unchecked load: a broken catalog is reported, not refused
            let report = CatalogStore::from_settings_unchecked(&settings.catalog)?.check();
            print_json(&report, args.pretty)?;

            if report.is_consistent() {
                info!("Catalogs are consistent");
                Ok(ExitCode::SUCCESS)
            } else {
                error!("{} integrity errors in catalogs", report.integrity_errors.len());
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn scoring_service(settings: &Settings) -> Result<ScoringService, AppError> {
    let catalogs = CatalogStore::from_settings(&settings.catalog)?;
    Ok(ScoringService::new(&catalogs, settings.scoring.top_n))
}

fn read_request(args: &ScoreCommand) -> Result<ScoringRequest, AppError> {
    let raw = if args.request.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        raw
    } else {
        std::fs::read_to_string(&args.request).map_err(|source| AppError::RequestFile {
            path: args.request.clone(),
            source,
        })?
    };

    Ok(serde_json::from_str(&raw)?)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), AppError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(AppError::Output)?;

    println!("{}", json);
    Ok(())
}
