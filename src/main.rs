use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use text_saver::config::Command;
use text_saver::utils::{logger, validation::Validate};
use text_saver::{CliConfig, SaveError, SaverConfig, SectionSaver, TextSaver};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Command: {:?}", cli.command);

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);

            // 1 for bad input or configuration, 2 when the target failed
            let usage = e
                .downcast_ref::<SaveError>()
                .map_or(true, SaveError::is_usage_error);
            if usage {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

async fn run(cli: &CliConfig) -> anyhow::Result<ExitCode> {
    let config = cli.resolve().context("loading configuration")?;
    config.validate()?;

    match &cli.command {
        Command::Save { name, input } => save(&config, name.as_deref(), input.as_deref()).await,
        Command::Sections { json, inputs, .. } => {
            sections(&config, json.as_deref(), inputs).await
        }
        Command::Names => {
            for section in config.section_table()?.iter() {
                println!("{}\t{}", section, section.file_name());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn save(
    config: &SaverConfig,
    name: Option<&str>,
    input: Option<&Path>,
) -> anyhow::Result<ExitCode> {
    let text = match input {
        Some(path) => read_input(path).await?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("reading stdin")?;
            buf
        }
    };

    let delivery = config.build_delivery()?;
    let target = delivery.describe();
    let saver = TextSaver::new(delivery).with_default_name(config.default_name())?;

    let file = match name {
        Some(name) => saver.save_text_as(name, &text).await?,
        None => saver.save_text(&text).await?,
    };

    println!("✅ Saved {} ({} bytes) to {}", file.name, file.len(), target);
    Ok(ExitCode::SUCCESS)
}

async fn sections(
    config: &SaverConfig,
    json: Option<&Path>,
    inputs: &[PathBuf],
) -> anyhow::Result<ExitCode> {
    let payloads: Vec<String> = match json {
        Some(path) => {
            let raw = read_input(path).await?;
            serde_json::from_str(&raw)
                .map_err(SaveError::from)
                .with_context(|| format!("{} must hold a JSON array of strings", path.display()))?
        }
        None => {
            let mut payloads = Vec::with_capacity(inputs.len());
            for path in inputs {
                payloads.push(read_input(path).await?);
            }
            payloads
        }
    };

    let saver = SectionSaver::new(config.build_delivery()?)
        .with_table(config.section_table()?)
        .with_overflow(config.overflow());

    let report = saver.save_sections(&payloads).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.is_complete() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(
            "{} of {} section(s) failed",
            report.failed.len(),
            report.attempted()
        );
        Ok(ExitCode::from(2))
    }
}

async fn read_input(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}
