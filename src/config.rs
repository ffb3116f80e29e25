use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::annotate::{Annotator, DEFAULT_KEY_SUFFIX};
use crate::method::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    #[value(alias = "yml")]
    #[serde(alias = "yml")]
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` is YAML, anything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|os| os.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml" | "yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            DocumentFormat::Yaml => write!(f, "yaml"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnnotatorConfig {
    pub method: Method,
    pub key_suffix: String,
    pub suppress_diagnostics: bool,
    /// `None` reads stdin
    pub input: Option<PathBuf>,
    /// `None` writes stdout
    pub output: Option<PathBuf>,
    pub format: DocumentFormat,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            key_suffix: DEFAULT_KEY_SUFFIX.to_string(),
            suppress_diagnostics: true,
            input: None,
            output: None,
            format: DocumentFormat::Json,
        }
    }
}

impl AnnotatorConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            method: cli_method,
            key_suffix: cli_key_suffix,
            input: cli_input,
            output: cli_output,
            format: cli_format,
            no_suppress,
        } = args;

        let file_config = if let Some(path) = config.as_ref() {
            load_config_file(path)?
        } else {
            PartialConfig::default()
        };

        let PartialConfig {
            method: file_method,
            key_suffix: file_key_suffix,
            suppress_diagnostics: file_suppress,
            input: file_input,
            output: file_output,
            format: file_format,
        } = file_config;

        let method = cli_method.or(file_method).unwrap_or_default();

        let key_suffix = cli_key_suffix
            .or(file_key_suffix)
            .unwrap_or_else(|| DEFAULT_KEY_SUFFIX.to_string());

        let suppress_diagnostics = if no_suppress {
            false
        } else {
            file_suppress.unwrap_or(true)
        };

        let input = cli_input.or(file_input);
        let output = cli_output.or(file_output);

        let format = cli_format
            .or(file_format)
            .or_else(|| input.as_deref().map(DocumentFormat::from_path))
            .unwrap_or(DocumentFormat::Json);

        let config = Self {
            method,
            key_suffix,
            suppress_diagnostics,
            input,
            output,
            format,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.key_suffix.trim().is_empty(),
            "key suffix must not be empty"
        );
        if let Some(input) = self.input.as_ref() {
            anyhow::ensure!(input.exists(), "input file {:?} does not exist", input);
            anyhow::ensure!(input.is_file(), "input {:?} is not a file", input);
        }
        Ok(())
    }

    pub fn annotator(&self) -> Annotator {
        Annotator::new()
            .with_method(self.method)
            .with_key_suffix(self.key_suffix.clone())
            .with_diagnostics_suppressed(self.suppress_diagnostics)
    }
}

#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "cct-annotate",
    about = "Annotate color fields of a JSON or YAML document with correlated color temperature",
    version
)]
pub struct CliArgs {
    #[arg(
        long,
        value_name = "FILE",
        help = "Path to a configuration file (YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        env = "CCT_ANNOTATE_METHOD",
        value_name = "NAME",
        help = "CCT estimation method (e.g. \"Ohno 2013\", \"McCamy 1992\", andres99_1)",
        value_parser = Method::parse
    )]
    pub method: Option<Method>,

    #[arg(
        long,
        env = "CCT_ANNOTATE_KEY_SUFFIX",
        value_name = "SUFFIX",
        help = "Annotate values whose key ends with this suffix"
    )]
    pub key_suffix: Option<String>,

    #[arg(
        long,
        env = "CCT_ANNOTATE_INPUT",
        value_name = "FILE",
        help = "Document to annotate (defaults to stdin)"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        long,
        env = "CCT_ANNOTATE_OUTPUT",
        value_name = "FILE",
        help = "Where to write the annotated document (defaults to stdout)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        env = "CCT_ANNOTATE_FORMAT",
        value_enum,
        value_name = "FORMAT",
        help = "Document format (inferred from the input extension when omitted)"
    )]
    pub format: Option<DocumentFormat>,

    #[arg(
        long,
        env = "CCT_ANNOTATE_NO_SUPPRESS",
        help = "Let colorimetry diagnostics through to the log"
    )]
    pub no_suppress: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    method: Option<Method>,
    key_suffix: Option<String>,
    suppress_diagnostics: Option<bool>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<DocumentFormat>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}
