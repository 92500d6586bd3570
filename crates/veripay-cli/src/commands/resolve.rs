//! Resolve command - recover the transaction reference from a receipt
//! file without contacting the provider.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use veripay_core::{Provider, UploadedFile, VerificationRequest, Verifier};

use super::{file_kind_for, load_config};

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Provider code (telebirr, cbe, dashen, abyssinia)
    #[arg(required = true)]
    provider: String,

    /// Receipt file (PDF or image)
    #[arg(required = true)]
    file: PathBuf,
}

pub async fn run(args: ResolveArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let provider = Provider::parse(&args.provider)?;

    if !args.file.exists() {
        anyhow::bail!("Receipt file not found: {}", args.file.display());
    }

    let kind = file_kind_for(&args.file)?;
    let bytes = fs::read(&args.file)?;

    info!("Recovering reference from {}", args.file.display());

    let request = VerificationRequest::by_file(provider, bytes, kind);
    let verifier = Verifier::new(config);
    let reference = verifier.resolve_reference(&request)?;

    println!("{} {}", style("✓").green(), reference);

    Ok(())
}
