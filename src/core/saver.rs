use crate::core::{Delivery, TextFile, DEFAULT_FILE_NAME, TEXT_PLAIN_UTF8};
use crate::utils::error::{Result, SaveError};
use crate::utils::validation::validate_file_name;

/// Saves one piece of text as one file.
pub struct TextSaver<D: Delivery> {
    delivery: D,
    default_name: String,
}

impl<D: Delivery> TextSaver<D> {
    pub fn new(delivery: D) -> Self {
        Self {
            delivery,
            default_name: DEFAULT_FILE_NAME.to_string(),
        }
    }

    pub fn with_default_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_file_name(&name)?;
        self.default_name = name;
        Ok(self)
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Saves `text` verbatim under the default file name.
    pub async fn save_text(&self, text: &str) -> Result<TextFile> {
        let name = self.default_name.clone();
        self.save_text_as(&name, text).await
    }

    /// Saves `text` verbatim under `file_name`.
    pub async fn save_text_as(&self, file_name: &str, text: &str) -> Result<TextFile> {
        validate_file_name(file_name)?;

        let file = TextFile::new(file_name, text, TEXT_PLAIN_UTF8);
        tracing::debug!(
            "Saving {} ({} bytes) to {}",
            file.name,
            file.len(),
            self.delivery.describe()
        );

        self.delivery.deliver(&file).await.map_err(|e| match e {
            SaveError::Delivery { .. } => e,
            other => SaveError::Delivery {
                file: file.name.clone(),
                message: other.to_string(),
            },
        })?;

        tracing::info!("Saved {}", file.name);
        Ok(file)
    }
}
