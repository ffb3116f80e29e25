//! Correlated color temperature (CCT) annotation for structured documents.
//!
//! [`Annotator`] walks a JSON/YAML [`Node`] tree and replaces every scalar
//! under a `*color` key with a `{value, cct}` record. Estimation goes through
//! [`Dispatcher`], which classifies the chromaticity against the selected
//! [`Method`]'s validity range before solving.

pub mod annotate;
pub mod cache;
pub mod colorimetry;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod hex;
pub mod logging;
pub mod method;
pub mod utils;

pub use annotate::{Annotator, DEFAULT_KEY_SUFFIX};
pub use cache::{CacheStats, CctCache};
pub use colorimetry::{Colorimetry, ColorimetryError, Rgb, StandardColorimetry, Uv, Xy, Xyz};
pub use config::{AnnotatorConfig, CliArgs, DocumentFormat};
pub use document::{AnnotatedValue, Node, Scalar};
pub use domain::{DomainClassification, IsotemperatureLine, TemperatureRange, classify};
pub use error::{CctError, Result};
pub use estimate::{Dispatcher, Estimation, Estimator, FAILURE_CCT, Outcome};
pub use hex::{DecodeError, decode_hex};
pub use logging::{LoggingConfig, init_logging};
pub use method::{Method, MethodSpec};

use anyhow::Context;
use std::fs;
use std::io::{self, Read, Write};
use tracing::info;

/// Read, annotate and write one document as described by `config`.
pub fn run(config: &AnnotatorConfig) -> anyhow::Result<()> {
    let raw = match config.input.as_ref() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input {:?}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let document = parse_document(&raw, config.format)?;
    let annotator = config.annotator();
    let annotated = annotator.annotate(&document)?;
    let rendered = render_document(&annotated, config.format)?;

    match config.output.as_ref() {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("failed to write output {:?}", path))?,
        None => io::stdout()
            .write_all(rendered.as_bytes())
            .context("failed to write stdout")?,
    }

    let stats = annotator.cache_stats();
    info!(
        method = %config.method,
        format = %config.format,
        distinct_colors = stats.size,
        hit_rate = stats.hit_rate(),
        "annotation complete"
    );
    Ok(())
}

pub fn parse_document(raw: &str, format: DocumentFormat) -> anyhow::Result<Node> {
    let node = match format {
        DocumentFormat::Json => serde_json::from_str(raw).context("failed to parse JSON document")?,
        DocumentFormat::Yaml => serde_yaml::from_str(raw).context("failed to parse YAML document")?,
    };
    Ok(node)
}

pub fn render_document(node: &Node, format: DocumentFormat) -> anyhow::Result<String> {
    let mut rendered = match format {
        DocumentFormat::Json => {
            serde_json::to_string_pretty(node).context("failed to serialize JSON document")?
        }
        DocumentFormat::Yaml => {
            serde_yaml::to_string(node).context("failed to serialize YAML document")?
        }
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}
