use crate::core::{
    Delivery, OverflowPolicy, SaveReport, SectionFailure, SectionName, SectionTable, TextFile,
    TEXT_PLAIN,
};
use crate::utils::error::{Result, SaveError};

/// File name for a section label: lowercase, spaces to underscores, `.txt` appended.
pub fn file_name_for(section: &SectionName) -> String {
    section.file_name()
}

/// Saves a sequence of text payloads, one file per payload, named after the
/// section at the same position in its [`SectionTable`].
pub struct SectionSaver<D: Delivery> {
    delivery: D,
    table: SectionTable,
    overflow: OverflowPolicy,
}

impl<D: Delivery> SectionSaver<D> {
    pub fn new(delivery: D) -> Self {
        Self {
            delivery,
            table: SectionTable::default(),
            overflow: OverflowPolicy::default(),
        }
    }

    pub fn with_table(mut self, table: SectionTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    pub fn table(&self) -> &SectionTable {
        &self.table
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Delivers `payloads[i]` under the name of section `i`, in order.
    ///
    /// Every section is attempted even when an earlier one fails; failures
    /// are collected in the returned report. Only an overflow under
    /// [`OverflowPolicy::Reject`] fails the call, and it does so before any
    /// delivery.
    pub async fn save_sections<S: AsRef<str>>(&self, payloads: &[S]) -> Result<SaveReport> {
        tracing::info!(
            "Saving {} section(s) to {}",
            payloads.len(),
            self.delivery.describe()
        );

        let capacity = self.table.len();
        let mut report = SaveReport::default();

        let payloads = if payloads.len() > capacity {
            match self.overflow {
                OverflowPolicy::Reject => {
                    return Err(SaveError::TooManySections {
                        given: payloads.len(),
                        capacity,
                    });
                }
                OverflowPolicy::Skip => {
                    report.skipped = payloads.len() - capacity;
                    tracing::warn!(
                        "{} payload(s) beyond the {} known sections will not be saved",
                        report.skipped,
                        capacity
                    );
                    &payloads[..capacity]
                }
            }
        } else {
            payloads
        };

        for (section, text) in self.table.iter().zip(payloads) {
            tracing::info!("Processing section: {}", section);
            let text: &str = text.as_ref();
            let file = TextFile::new(file_name_for(section), text, TEXT_PLAIN);

            match self.delivery.deliver(&file).await {
                Ok(()) => {
                    tracing::debug!("Delivered {} ({} bytes)", file.name, file.len());
                    report.delivered.push(file.name);
                }
                Err(e) => {
                    tracing::error!("Failed to deliver {}: {}", file.name, e);
                    report.failed.push(SectionFailure {
                        section: section.to_string(),
                        file_name: file.name,
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Section save finished: {} delivered, {} failed, {} skipped",
            report.delivered.len(),
            report.failed.len(),
            report.skipped
        );
        Ok(report)
    }
}
