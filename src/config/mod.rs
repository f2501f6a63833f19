#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::storage::DEFAULT_DOCUMENT_NAME;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, Validate,
};
use toml_config::{TomlConfig, LOG_FORMATS};

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_DATA_DIR: &str = ".";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-rental")]
#[command(about = "Vehicle rental desk: catalog, clients and contracts")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Directory holding the data file")]
    pub data_dir: Option<String>,

    #[arg(long, global = true, help = "Name of the data file")]
    pub document: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: cli::Command,
}

/// Effective settings after merging CLI flags over the TOML file over
/// built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: String,
    pub document_name: String,
    pub log_level: Option<String>,
    pub log_format: String,
    pub verbose: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            log_level: None,
            log_format: LOG_FORMATS[0].to_string(),
            verbose: false,
        }
    }
}

impl Settings {
    pub fn from_toml(file: &TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            data_dir: file.storage.data_dir.clone().unwrap_or(defaults.data_dir),
            document_name: file
                .storage
                .document_name
                .clone()
                .unwrap_or(defaults.document_name),
            log_level: file.logging.level.clone(),
            log_format: file.logging.format.clone().unwrap_or(defaults.log_format),
            verbose: false,
        }
    }

    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        file.validate()?;
        Ok(Self::from_toml(&file).with_overrides(cli))
    }

    #[cfg(feature = "cli")]
    pub fn with_overrides(mut self, cli: &CliConfig) -> Self {
        if let Some(data_dir) = &cli.data_dir {
            self.data_dir = data_dir.clone();
        }
        if let Some(document) = &cli.document {
            self.document_name = document.clone();
        }
        if cli.json_logs {
            self.log_format = "json".to_string();
        }
        self.verbose = cli.verbose;
        self
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }
}

impl ConfigProvider for Settings {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn document_name(&self) -> &str {
        &self.document_name
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", &self.data_dir)?;
        validate_non_empty_string("document_name", &self.document_name)?;
        validate_one_of("log_format", &self.log_format, &LOG_FORMATS)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::RentalError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_defaults_without_file_or_flags() {
        let settings = Settings::resolve(&parse(&["small-rental", "clients"])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.document_name, "donnees.json");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_flags_override_file() {
        let file = TomlConfig::from_toml_str(concat!(
            "[storage]\ndata_dir = \"/var/rental\"\ndocument_name = \"a.json\"\n",
            "[logging]\nlevel = \"warn\"\n",
        ))
        .unwrap();
        let cli = parse(&["small-rental", "--document", "b.json", "--json-logs", "vehicles"]);
        let settings = Settings::from_toml(&file).with_overrides(&cli);

        assert_eq!(settings.data_dir, "/var/rental");
        assert_eq!(settings.document_name, "b.json");
        assert_eq!(settings.log_level.as_deref(), Some("warn"));
        assert!(settings.json_logs());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&[
            "small-rental",
            "contracts",
            "--data-dir",
            "./elsewhere",
            "--verbose",
        ]);
        let settings = Settings::resolve(&cli).unwrap();
        assert_eq!(settings.data_dir, "./elsewhere");
        assert!(settings.verbose);
    }

    #[test]
    fn test_empty_data_dir_is_rejected() {
        let cli = parse(&["small-rental", "--data-dir", "", "clients"]);
        let settings = Settings::resolve(&cli).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_bad_format_in_file_is_reported_against_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nformat = \"xml\"").unwrap();
        let path = file.path().to_str().unwrap();

        // --json-logs would mask the file value after the merge
        let cli = parse(&["small-rental", "--config", path, "--json-logs", "clients"]);
        match Settings::resolve(&cli) {
            Err(RentalError::InvalidConfigValueError { field, value, .. }) => {
                assert_eq!(field, "logging.format");
                assert_eq!(value, "xml");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_pay_details() {
        let cli = parse(&[
            "small-rental",
            "pay",
            "--contract",
            "1",
            "--kind",
            "card",
            "--detail",
            "last4=4242",
            "--detail",
            "installments=3",
        ]);
        match cli.command {
            cli::Command::Pay { contract, kind, details } => {
                assert_eq!(contract, 1);
                assert_eq!(kind, "card");
                assert_eq!(details.len(), 2);
                assert_eq!(details[1].1, serde_json::json!(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
