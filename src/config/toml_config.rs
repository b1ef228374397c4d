use crate::adapters::{HttpUpload, LocalDirectory};
use crate::core::{Delivery, OverflowPolicy, SectionTable, DEFAULT_FILE_NAME};
use crate::utils::error::{Result, SaveError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaverConfig {
    #[serde(default)]
    pub output: OutputConfig,
    pub upload: Option<UploadConfig>,
    #[serde(default)]
    pub single: SingleConfig,
    #[serde(default)]
    pub sections: SectionsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub url: String,
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleConfig {
    #[serde(default = "default_file_name")]
    pub default_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionsConfig {
    pub names: Option<Vec<String>>,
    #[serde(default)]
    pub on_overflow: OverflowPolicy,
}

fn default_output_dir() -> String {
    DEFAULT_OUTPUT_DIR.to_string()
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            overwrite: true,
        }
    }
}

impl Default for SingleConfig {
    fn default() -> Self {
        Self {
            default_name: default_file_name(),
        }
    }
}

impl SaverConfig {
    /// Loads configuration from a TOML file. An unreadable file is a configuration error.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SaveError::ConfigError {
            message: format!("reading {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SaveError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn section_table(&self) -> Result<SectionTable> {
        match &self.sections.names {
            Some(names) => SectionTable::new(names.iter().cloned()),
            None => Ok(SectionTable::default()),
        }
    }

    pub fn overflow(&self) -> OverflowPolicy {
        self.sections.on_overflow
    }

    pub fn default_name(&self) -> &str {
        &self.single.default_name
    }

    /// Builds the delivery target: an upload when `[upload]` is present,
    /// otherwise the output directory.
    pub fn build_delivery(&self) -> Result<Box<dyn Delivery>> {
        match &self.upload {
            Some(upload) => {
                let timeout = upload.timeout_seconds.map(Duration::from_secs);
                let mut target = HttpUpload::with_timeout(&upload.url, timeout)?;
                if let Some(token) = &upload.token {
                    target = target.bearer_token(token.clone());
                }
                Ok(Box::new(target))
            }
            None => Ok(Box::new(
                LocalDirectory::new(&self.output.dir).overwrite(self.output.overwrite),
            )),
        }
    }
}

fn reject_placeholder(field: &str, value: &str) -> Result<()> {
    if value.contains("${") {
        return Err(SaveError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "references an environment variable that is not set".to_string(),
        });
    }
    Ok(())
}

impl Validate for SaverConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("output.dir", &self.output.dir)?;
        validate_file_name(&self.single.default_name)?;

        if let Some(upload) = &self.upload {
            reject_placeholder("upload.url", &upload.url)?;
            validate_url("upload.url", &upload.url)?;
            if let Some(token) = &upload.token {
                reject_placeholder("upload.token", token)?;
            }
            if let Some(timeout) = upload.timeout_seconds {
                validate_positive_number("upload.timeout_seconds", timeout, 1)?;
            }
        }

        self.section_table()?;
        Ok(())
    }
}
