//! SNS Policy Grant CLI
//!
//! Grants or revokes `sns:Publish` on an SNS topic policy for S3 buckets
//! (source-ARN addressing) or AWS accounts (source-account addressing).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sns_policy_grant_core::{
    prepare, Addressing, ApplyOptions, ApplyResult, ClientConfig, GrantRequest, Mode,
    PolicyGrantService, DEFAULT_BULK_COUNT, DEFAULT_SOURCE_ARN_PATTERN,
};
use std::process::ExitCode;
use std::time::Instant;

/// Grant or revoke sns:Publish on an SNS topic policy
#[derive(Parser, Debug)]
#[command(name = "sns-policy-grant", version, about, long_about = None)]
struct Cli {
    /// ARN of the topic whose policy is changed
    topic_arn: String,

    /// S3 bucket name (source-arn) or AWS account id (source-account)
    target: String,

    /// What to do with the target
    #[arg(value_enum, ignore_case = true)]
    action: Action,

    /// How publishers are identified in the policy
    #[arg(long, value_enum, default_value_t = AddressingArg::SourceArn)]
    addressing: AddressingArg,

    /// Number of buckets granted by BULK_GRANT (TARGET-1 through TARGET-COUNT, at most 5000)
    #[arg(long, default_value_t = DEFAULT_BULK_COUNT)]
    count: usize,

    /// Source ARN pattern written into source-account statements
    #[arg(long, default_value = DEFAULT_SOURCE_ARN_PATTERN)]
    source_arn_pattern: String,

    /// AWS region; defaults to the topic's region
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,

    /// Named AWS profile
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,

    /// Print the resulting policy without writing it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Action {
    #[value(name = "GRANT")]
    Grant,
    #[value(name = "BULK_GRANT")]
    BulkGrant,
    #[value(name = "REVOKE")]
    Revoke,
    #[value(name = "DELETE")]
    Delete,
}

impl Action {
    fn into_mode(self, count: usize) -> Mode {
        match self {
            Action::Grant => Mode::Grant,
            Action::BulkGrant => Mode::BulkGrant { count },
            Action::Revoke => Mode::Revoke,
            Action::Delete => Mode::Delete,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum AddressingArg {
    SourceArn,
    SourceAccount,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with 1 like every other failure; --help and --version exit with 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging(cli.verbose);
    let started = Instant::now();

    let code = match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    };

    log::info!("Finished in {} ms", started.elapsed().as_millis());
    code
}

async fn run(cli: Cli) -> Result<()> {
    let addressing = match cli.addressing {
        AddressingArg::SourceArn => Addressing::SourceArn,
        AddressingArg::SourceAccount => Addressing::SourceAccount {
            source_arn_pattern: cli.source_arn_pattern.clone(),
        },
    };
    let request = GrantRequest::new(cli.target.clone(), cli.action.into_mode(cli.count));

    // Validation happens before any SDK setup, so bad arguments never reach SNS.
    let prepared = prepare(&cli.topic_arn, &addressing, &request)?;

    let config = ClientConfig {
        region: cli
            .region
            .clone()
            .or_else(|| Some(prepared.topic.region.clone())),
        profile: cli.profile.clone(),
    };
    let service = PolicyGrantService::new(&config)
        .await
        .context("Failed to set up the SNS client")?;

    let result = service
        .run(
            &prepared,
            ApplyOptions {
                dry_run: cli.dry_run,
            },
        )
        .await?;

    report(&result, cli.dry_run)
}

fn report(result: &ApplyResult, dry_run: bool) -> Result<()> {
    println!("{}", result.outcome);

    if dry_run {
        if result.outcome.is_change() {
            println!("Dry run, policy not written. Resulting policy:");
        } else {
            println!("Dry run, nothing to write. Current policy:");
        }
        let json = serde_json::to_string_pretty(&result.document)
            .context("Failed to serialize policy")?;
        println!("{json}");
    } else if let Some(receipt) = &result.receipt {
        println!(
            "Topic {} updated: {} statement(s), request id {}",
            result.topic_arn,
            result.statement_count,
            receipt.request_id.as_deref().unwrap_or("unknown")
        );
    }
    Ok(())
}
