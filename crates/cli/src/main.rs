mod args;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audiorip_core::{
    load_config, load_config_or_default, validate_config, AudioFormat, Config,
    DerivedDestination, DestinationChooser, DropDecision, DropItem, FfmpegTranscoder,
    FixedDestination, Session, TranscodeError, TranscodeResult,
};

use args::Args;

/// Config file looked up in the working directory when none is given
const DEFAULT_CONFIG_FILE: &str = "audiorip.toml";

/// Environment variable naming the config file
const CONFIG_ENV: &str = "AUDIORIP_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    if args.list_formats {
        print_formats();
        return Ok(ExitCode::SUCCESS);
    }

    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output can only be used with a single --input");
    }

    let mut config = load(&args)?;
    if let Some(ffmpeg) = &args.ffmpeg {
        config.engine.path = Some(ffmpeg.clone());
    }
    if args.overwrite {
        config.engine.overwrite = true;
    }
    validate_config(&config).context("Configuration validation failed")?;
    let format = args.format.unwrap_or(config.output.default_format);

    let mut session = Session::new(FfmpegTranscoder::new(config.engine.clone()));
    let mut failures = 0usize;

    for input in &args.inputs {
        let chooser: Box<dyn DestinationChooser> = match &args.output {
            Some(output) => Box::new(FixedDestination(output.clone())),
            None => Box::new(DerivedDestination::beside(input, format)),
        };

        match session.on_file_dropped(&DropItem::from_path(input), chooser.as_ref()) {
            Ok(DropDecision::Started { .. }) => match session.wait_for_completion().await {
                Some(result) => {
                    if !result.succeeded() {
                        failures += 1;
                    }
                    report_result(&result, args.json)?;
                }
                None => {
                    failures += 1;
                    warn!("No result reported for {}", input.display());
                }
            },
            Ok(DropDecision::Ignored) => {
                failures += 1;
                warn!("Skipped {}: a transcode is already running", input.display());
            }
            Ok(DropDecision::Cancelled) => {
                info!("Skipped {}: no destination chosen", input.display());
            }
            Err(e) => {
                failures += 1;
                report_rejection(input, &e, args.json)?;
            }
        }
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load(args: &Args) -> Result<Config> {
    let explicit = args
        .config
        .clone()
        .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

    match explicit {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => load_config_or_default(Some(Path::new(DEFAULT_CONFIG_FILE)))
            .context("Failed to load configuration"),
    }
}

fn print_formats() {
    for format in AudioFormat::ALL {
        println!(
            "{:<6}{:<12}{}",
            format.extension(),
            format.encoder(),
            if format.is_lossless() { "lossless" } else { "lossy" }
        );
    }
}

fn report_result(result: &TranscodeResult, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string(result)?);
    } else if let Some(path) = result.output_path() {
        println!("Saved to: {}", path.display());
    } else {
        eprintln!(
            "Failed: {}: {}",
            result.source.display(),
            result.failure_reason().unwrap_or("unknown error")
        );
    }
    Ok(())
}

fn report_rejection(input: &Path, err: &TranscodeError, as_json: bool) -> Result<()> {
    let source = std::path::absolute(input).unwrap_or_else(|_| input.to_path_buf());
    if as_json {
        let line = json!({
            "source": source.to_string_lossy(),
            "status": "failed",
            "kind": err.kind(),
            "reason": err.detail(),
        });
        println!("{}", line);
    } else {
        eprintln!("Failed: {}: {}", source.display(), err.detail());
    }
    Ok(())
}
