use super::toml_config::{SaverConfig, UploadConfig};
use crate::core::OverflowPolicy;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "text-saver")]
#[command(about = "Save text, or a set of named text sections, as plain-text files")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory to write files into")]
    pub output_dir: Option<String>,

    #[arg(
        long,
        global = true,
        conflicts_with = "output_dir",
        help = "Upload files with PUT under this URL instead of writing them"
    )]
    pub upload_url: Option<String>,

    #[arg(
        long,
        global = true,
        env = "TEXT_SAVER_TOKEN",
        hide_env_values = true,
        help = "Bearer token for uploads"
    )]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Fail instead of replacing existing files")]
    pub no_overwrite: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Save one text as one file
    Save {
        #[arg(long, help = "File name to save under (defaults to downloaded_text.txt)")]
        name: Option<String>,

        #[arg(help = "Input file; reads stdin when omitted")]
        input: Option<PathBuf>,
    },
    /// Save one file per section, in section order
    Sections {
        #[arg(long, conflicts_with = "inputs", help = "JSON file holding an array of strings")]
        json: Option<PathBuf>,

        #[arg(long, help = "Drop payloads beyond the last section instead of failing")]
        skip_excess: bool,

        #[arg(help = "One input file per section")]
        inputs: Vec<PathBuf>,
    },
    /// Print the section names and the file each one is saved as
    Names,
}

impl CliConfig {
    /// Loads the config file, if any, then applies command line overrides.
    pub fn resolve(&self) -> Result<SaverConfig> {
        let mut config = match &self.config {
            Some(path) => SaverConfig::from_file(path)?,
            None => SaverConfig::default(),
        };

        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
            config.upload = None;
        }

        if let Some(url) = &self.upload_url {
            let upload = config.upload.get_or_insert_with(|| UploadConfig {
                url: String::new(),
                token: None,
                timeout_seconds: None,
            });
            upload.url = url.clone();
        }

        if let (Some(token), Some(upload)) = (&self.token, config.upload.as_mut()) {
            upload.token = Some(token.clone());
        }

        if self.no_overwrite {
            if config.upload.is_some() {
                tracing::warn!("--no-overwrite has no effect when uploading");
            }
            config.output.overwrite = false;
        }

        if let Command::Sections {
            skip_excess: true, ..
        } = self.command
        {
            config.sections.on_overflow = OverflowPolicy::Skip;
        }

        Ok(config)
    }
}
