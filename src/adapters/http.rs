use crate::domain::model::TextFile;
use crate::domain::ports::Delivery;
use crate::utils::error::{Result, SaveError};
use crate::utils::validation::validate_file_name;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Uploads each file with `PUT <base_url>/<file name>`.
#[derive(Debug, Clone)]
pub struct HttpUpload {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpUpload {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SaveError::ConfigError {
                message: format!("upload URL cannot take a file path: {}", base_url),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            token: None,
        })
    }

    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url_for(&self, name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SaveError::ConfigError {
                message: format!("upload URL cannot take a file path: {}", self.base_url),
            })?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

#[async_trait]
impl Delivery for HttpUpload {
    async fn deliver(&self, file: &TextFile) -> Result<()> {
        validate_file_name(&file.name)?;
        let url = self.url_for(&file.name)?;

        tracing::debug!("Uploading {} ({} bytes) to {}", file.name, file.len(), url);
        let mut request = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, file.mime.as_str())
            .body(file.content.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Upload response status: {}", status);

        if !status.is_success() {
            return Err(SaveError::UploadRejected {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}
