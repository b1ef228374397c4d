use crate::domain::model::TextFile;
use crate::domain::ports::Delivery;
use crate::utils::error::{Result, SaveError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub file: TextFile,
    pub at: DateTime<Utc>,
}

/// Keeps delivered files in memory, in delivery order. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryDelivery {
    delivered: Arc<Mutex<Vec<Delivered>>>,
    failing: Arc<HashSet<String>>,
    in_flight: Arc<AtomicUsize>,
}

/// Counts a delivery as in flight until dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn acquire(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MemoryDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every delivery of `file_name` fail.
    pub fn fail_on(mut self, file_name: impl Into<String>) -> Self {
        let mut failing = (*self.failing).clone();
        failing.insert(file_name.into());
        self.failing = Arc::new(failing);
        self
    }

    pub async fn deliveries(&self) -> Vec<Delivered> {
        self.delivered.lock().await.clone()
    }

    pub async fn files(&self) -> Vec<TextFile> {
        self.delivered
            .lock()
            .await
            .iter()
            .map(|d| d.file.clone())
            .collect()
    }

    pub async fn names(&self) -> Vec<String> {
        self.delivered
            .lock()
            .await
            .iter()
            .map(|d| d.file.name.clone())
            .collect()
    }

    pub async fn get(&self, name: &str) -> Option<TextFile> {
        self.delivered
            .lock()
            .await
            .iter()
            .rev()
            .find(|d| d.file.name == name)
            .map(|d| d.file.clone())
    }

    pub async fn len(&self) -> usize {
        self.delivered.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.delivered.lock().await.is_empty()
    }

    /// Deliveries currently between start and finish.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Delivery for MemoryDelivery {
    async fn deliver(&self, file: &TextFile) -> Result<()> {
        let _guard = InFlight::acquire(&self.in_flight);

        if self.failing.contains(&file.name) {
            return Err(SaveError::Delivery {
                file: file.name.clone(),
                message: "delivery refused by memory target".to_string(),
            });
        }

        self.delivered.lock().await.push(Delivered {
            file: file.clone(),
            at: Utc::now(),
        });
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
