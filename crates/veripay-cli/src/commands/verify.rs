//! Verify command - check a receipt against its provider.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use veripay_core::{
    Provider, Receipt, UploadedFile, VerificationRequest, VerificationResult, Verifier,
};

use super::{file_kind_for, load_config};

/// Arguments for the verify command.
#[derive(Args)]
pub struct VerifyArgs {
    /// Provider code (telebirr, cbe, dashen, abyssinia)
    #[arg(required = true)]
    provider: String,

    /// Transaction reference
    #[arg(short, long)]
    reference: Option<String>,

    /// Receipt file (PDF or image) used to recover the reference
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Trailing digits of the receiving account, where the provider
    /// requires them
    #[arg(short = 's', long)]
    account_suffix: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: VerifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let provider = Provider::parse(&args.provider)?;

    let mut request = VerificationRequest {
        provider,
        reference: args.reference.clone(),
        account_suffix: args.account_suffix.clone(),
        file: None,
    };

    if let Some(path) = &args.file {
        if !path.exists() {
            anyhow::bail!("Receipt file not found: {}", path.display());
        }
        let kind = file_kind_for(path)?;
        let bytes = fs::read(path)?;
        request.file = Some(UploadedFile { bytes, kind });
    }

    info!("Verifying {provider} receipt");

    let verifier = Verifier::new(config);
    let result = verifier.verify(&request).await;

    let output = format_result(&result, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Result written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total verification time: {:?}", start.elapsed());

    if !result.success {
        let message = result.error.unwrap_or_else(|| "verification failed".into());
        anyhow::bail!(message);
    }

    Ok(())
}

fn format_result(
    result: &VerificationResult,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_text(result: &VerificationResult) -> String {
    let mut output = String::new();

    match &result.receipt {
        Some(receipt) => {
            output.push_str("Verified\n\n");
            push_line(&mut output, "Provider", Some(&receipt.provider.to_string()));
            push_line(&mut output, "Reference", receipt.reference.as_deref());
            push_line(
                &mut output,
                "Amount",
                receipt.amount.map(|a| a.to_string()).as_deref(),
            );
            push_line(
                &mut output,
                "Date",
                receipt.date.map(|d| d.to_string()).as_deref(),
            );
            push_line(&mut output, "Payer", receipt.payer.as_deref());
            push_line(&mut output, "Payer account", receipt.payer_account.as_deref());
            push_line(&mut output, "Receiver", receipt.receiver.as_deref());
            push_line(
                &mut output,
                "Receiver account",
                receipt.receiver_account.as_deref(),
            );
            push_line(&mut output, "Reason", receipt.reason.as_deref());
            push_charges(&mut output, receipt);
        }
        None => {
            output.push_str("Not verified\n");
            if let Some(error) = &result.error {
                output.push_str(&format!("Error: {}\n", error));
            }
        }
    }

    output
}

fn push_line(output: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        output.push_str(&format!("{:<17} {}\n", format!("{}:", label), value));
    }
}

fn push_charges(output: &mut String, receipt: &Receipt) {
    push_line(
        output,
        "Service charge",
        receipt.service_charge.map(|a| a.to_string()).as_deref(),
    );
    push_line(output, "VAT", receipt.vat.map(|a| a.to_string()).as_deref());
    push_line(
        output,
        "Total amount",
        receipt.total_amount.map(|a| a.to_string()).as_deref(),
    );
}
