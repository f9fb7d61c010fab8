use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_BUCKET_DIR: &str = "./bucket";
pub const DEFAULT_STORE_PATH: &str = "./people.json";

#[derive(Debug, Clone, Parser)]
#[command(name = "person-ingest")]
#[command(about = "Load comma-separated person records into a key-value store")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory used as the object bucket")]
    pub bucket_dir: Option<String>,

    #[arg(long = "store", global = true, help = "JSON file holding stored people")]
    pub store_path: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Ingest objects from the bucket directory, as the Lambda would
    Ingest {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Stream a local file straight into the store
    Import { path: PathBuf },
    /// Look up one person by documento
    Get { documento: String },
    /// List every stored person
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// Paths after merging flags, the TOML file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSettings {
    pub bucket_dir: String,
    pub store_path: String,
    pub verbose: bool,
}

impl CliConfig {
    /// Flags win over the settings file, which wins over defaults.
    pub fn settings(&self) -> Result<LocalSettings> {
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        Ok(self.merge(file))
    }

    fn merge(&self, file: TomlConfig) -> LocalSettings {
        LocalSettings {
            bucket_dir: self
                .bucket_dir
                .clone()
                .or(file.storage.bucket_dir)
                .unwrap_or_else(|| DEFAULT_BUCKET_DIR.to_string()),
            store_path: self
                .store_path
                .clone()
                .or(file.store.path)
                .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string()),
            verbose: self.verbose || file.logging.verbose.unwrap_or(false),
        }
    }
}

impl Validate for LocalSettings {
    fn validate(&self) -> Result<()> {
        validate_path("bucket_dir", &self.bucket_dir)?;
        validate_path("store_path", &self.store_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_flags() {
        let cli = CliConfig::parse_from(["person-ingest", "list"]);
        let settings = cli.settings().unwrap();
        assert_eq!(settings.bucket_dir, DEFAULT_BUCKET_DIR);
        assert_eq!(settings.store_path, DEFAULT_STORE_PATH);
        assert!(!settings.verbose);
        assert!(matches!(
            cli.command,
            Command::List {
                format: OutputFormat::Json
            }
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let cli = CliConfig::parse_from([
            "person-ingest",
            "--store",
            "flag.json",
            "ingest",
            "a.csv",
            "b.csv",
        ]);
        let file = TomlConfig::parse(
            "[storage]\nbucket_dir = \"file-bucket\"\n[store]\npath = \"file.json\"\n[logging]\nverbose = true\n",
        )
        .unwrap();

        let settings = cli.merge(file);
        assert_eq!(settings.bucket_dir, "file-bucket");
        assert_eq!(settings.store_path, "flag.json");
        assert!(settings.verbose);
        match cli.command {
            Command::Ingest { keys } => assert_eq!(keys, vec!["a.csv", "b.csv"]),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_ingest_requires_a_key() {
        assert!(CliConfig::try_parse_from(["person-ingest", "ingest"]).is_err());
    }

    #[test]
    fn test_list_accepts_csv_format() {
        let cli = CliConfig::parse_from(["person-ingest", "list", "--format", "csv"]);
        assert!(matches!(
            cli.command,
            Command::List {
                format: OutputFormat::Csv
            }
        ));
    }

    #[test]
    fn test_empty_store_path_is_invalid() {
        let settings = LocalSettings {
            bucket_dir: "b".to_string(),
            store_path: String::new(),
            verbose: false,
        };
        assert!(settings.validate().is_err());
    }
}
