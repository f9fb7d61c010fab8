use clap::Parser;
use person_ingest::config::cli::{Command, LocalSettings, OutputFormat};
use person_ingest::domain::ports::PersonRepository;
use person_ingest::utils::error::ErrorSeverity;
use person_ingest::utils::{logger, validation::Validate};
use person_ingest::{
    CliConfig, IngestError, IngestionEngine, InvocationResponse, JsonFileRepository,
    LocalStorage, NotificationEvent, Person, Result,
};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    logger::init_cli_logger(settings.verbose);
    tracing::info!("Starting person-ingest CLI");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    if let Err(e) = run(config.command, &settings).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?}, Status: {})",
            e,
            e.category(),
            e.severity(),
            e.status_code()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        fail(&e);
    }

    Ok(())
}

fn fail(e: &IngestError) -> ! {
    eprintln!("❌ {}", e);
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2, // retryable
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

async fn run(command: Command, settings: &LocalSettings) -> Result<()> {
    let repository = JsonFileRepository::open(&settings.store_path).await?;

    match command {
        Command::Ingest { keys } => {
            let storage = LocalStorage::new(&settings.bucket_dir);
            let engine = IngestionEngine::new(storage, repository);
            let response = engine.handle(&NotificationEvent::for_keys(keys)).await?;

            tracing::info!("✅ Ingestion completed: {} people saved", response.body.count);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Import { path } => {
            let file = tokio::fs::File::open(&path).await?;
            let storage = LocalStorage::new(&settings.bucket_dir);
            let engine = IngestionEngine::new(storage, repository);
            let source = path.display().to_string();
            let summary = engine.ingest_reader(&source, BufReader::new(file)).await?;

            tracing::info!("✅ Import completed: {} people saved", summary.persisted);
            println!(
                "{}",
                serde_json::to_string_pretty(&InvocationResponse::completed(&summary))?
            );
        }
        Command::Get { documento } => match repository.get(&documento).await? {
            Some(person) => println!("{}", serde_json::to_string_pretty(&person)?),
            None => {
                eprintln!("❌ Person {} not found", documento);
                std::process::exit(1);
            }
        },
        Command::List { format } => {
            let people = repository.scan_all().await?;
            tracing::debug!("Listing {} people as {:?}", people.len(), format);
            write_people(&people, format)?;
        }
    }

    Ok(())
}

fn write_people(people: &[Person], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(people)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
            for person in people {
                writer.serialize(person)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
