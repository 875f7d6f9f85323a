//! Command-line surface: arguments, logging, and the translate pipeline.

use crate::core::error::Result;
use crate::core::types::{CyclePolicy, RenderOptions, DEFAULT_ENDPOINT_URL, DEFAULT_REGION};
use crate::core::{codegen, parser, resolver};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// The cloud formation template (YAML or JSON)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// The AWS region to simulate when creating DynamoDB Local tables
    #[arg(long, value_name = "REGION", env = "CFN2DDB_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// The DynamoDB Local endpoint url
    #[arg(long = "endpoint-url", value_name = "URL", env = "CFN2DDB_ENDPOINT_URL", default_value = DEFAULT_ENDPOINT_URL)]
    pub endpoint_url: String,

    /// Fail on circular DependsOn chains instead of breaking them
    #[arg(long)]
    pub reject_cycles: bool,

    /// Log ordering decisions to stderr
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl TranslateArgs {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }

    pub fn cycle_policy(&self) -> CyclePolicy {
        if self.reject_cycles {
            CyclePolicy::Reject
        } else {
            CyclePolicy::Truncate
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    // Ignore error if a subscriber is already set (e.g. in tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Translate a template file into create-table commands, in creation order.
///
/// Every table is rendered before anything is returned, so a failing table
/// yields no partial output.
pub fn translate_file(path: &Path, options: &RenderOptions, policy: CyclePolicy) -> Result<Vec<String>> {
    let document = parser::parse_template_file(path)?;
    let tables = resolver::order(&document, policy)?;

    let commands = tables
        .iter()
        .map(|table| codegen::render(table, &options.region, &options.endpoint_url))
        .collect::<Result<Vec<_>>>()?;

    info!(path = %path.display(), tables = commands.len(), "template translated");
    Ok(commands)
}

/// Run the translation for parsed arguments.
pub fn dispatch(args: &TranslateArgs) -> Result<Vec<String>> {
    translate_file(&args.file, &args.render_options(), args.cycle_policy())
}
