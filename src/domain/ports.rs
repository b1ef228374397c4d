use crate::domain::model::TextFile;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Makes a named text file available to the user: a directory write, an
/// upload, or an in-memory record.
///
/// Implementations must release whatever they staged for the file before
/// `deliver` returns, on success and on failure.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn deliver(&self, file: &TextFile) -> Result<()>;

    /// Where files end up, for log lines.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: Delivery + ?Sized> Delivery for &T {
    async fn deliver(&self, file: &TextFile) -> Result<()> {
        (**self).deliver(file).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<T: Delivery + ?Sized> Delivery for Box<T> {
    async fn deliver(&self, file: &TextFile) -> Result<()> {
        (**self).deliver(file).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[async_trait]
impl<T: Delivery + ?Sized> Delivery for Arc<T> {
    async fn deliver(&self, file: &TextFile) -> Result<()> {
        (**self).deliver(file).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
