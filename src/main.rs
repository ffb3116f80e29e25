use cct_annotate::{AnnotatorConfig, CliArgs, LoggingConfig, init_logging, run};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = CliArgs::parse();
    let config = AnnotatorConfig::from_args(cli)?;

    run(&config)
}
