use clap::Parser;
use small_rental::app::commands;
use small_rental::config::cli::Command;
use small_rental::core::ConfigProvider;
use small_rental::utils::error::ErrorSeverity;
use small_rental::utils::{logger, validation::Validate};
use small_rental::{Agency, CliConfig, FileBlobStore, PersistenceService, RentalError, Settings};

fn main() {
    let config = CliConfig::parse();

    let settings = match Settings::resolve(&config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if settings.json_logs() {
        logger::init_json_logger(settings.verbose, settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(settings.verbose, settings.log_level.as_deref());
    }
    tracing::debug!("Effective settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    match run(&settings, &config.command) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            tracing::error!(
                "Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}

fn run(settings: &Settings, command: &Command) -> small_rental::Result<Vec<String>> {
    let store = FileBlobStore::new(settings.data_dir(), settings.document_name());
    let service = PersistenceService::new(store);

    let mut agency = Agency::load_from(&service)?;
    let outcome = commands::execute(&mut agency, command)?;
    if outcome.mutated {
        agency.save_to(&service)?;
    }
    Ok(outcome.lines)
}

fn exit_code(error: &RentalError) -> i32 {
    match error.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
