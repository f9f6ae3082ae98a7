use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use sitegauge_core_types::AuditResult;

use crate::model::ProgressRecord;
use crate::store::{JsonProgressStore, StoreError};

/// Messages from site workers to the aggregator.
#[derive(Debug)]
pub enum WriterMsg {
    Completed(AuditResult),
    /// A site finished; drives the flush cadence.
    SiteDone,
}

/// Single-writer aggregator: the spawned task owns the record and the
/// store, workers only hold the channel sender. Closing every sender
/// drains the queue, flushes once more and hands the record back.
pub struct ProgressWriter {
    handle: JoinHandle<Result<ProgressRecord, StoreError>>,
    tx: mpsc::Sender<WriterMsg>,
}

impl ProgressWriter {
    pub fn spawn(
        store: JsonProgressStore,
        mut record: ProgressRecord,
        flush_every_sites: u32,
    ) -> Self {
        let (tx, mut rx) = mpsc::channel::<WriterMsg>(256);
        let handle = tokio::spawn(async move {
            let flush_every_sites = flush_every_sites.max(1);
            let mut sites_since_flush = 0u32;
            while let Some(msg) = rx.recv().await {
                match msg {
                    WriterMsg::Completed(result) => {
                        if !record.record(result) {
                            warn!(
                                target: "progress_store",
                                "dropped duplicate result for completed pair"
                            );
                        }
                    }
                    WriterMsg::SiteDone => {
                        sites_since_flush += 1;
                        if sites_since_flush >= flush_every_sites {
                            sites_since_flush = 0;
                            record.saved_at = Utc::now();
                            if let Err(err) = store.save(&record) {
                                // keep auditing; the final flush will retry
                                error!(
                                    target: "progress_store",
                                    error = %err,
                                    "mid-run checkpoint flush failed"
                                );
                            }
                        }
                    }
                }
            }
            record.saved_at = Utc::now();
            store.save(&record)?;
            Ok(record)
        });
        Self { handle, tx }
    }

    pub fn sender(&self) -> mpsc::Sender<WriterMsg> {
        self.tx.clone()
    }

    /// Close the channel, wait for the drain and the final flush.
    pub async fn finish(self) -> Result<ProgressRecord, StoreError> {
        drop(self.tx);
        self.handle.await.unwrap_or_else(|err| {
            Err(StoreError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                err,
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use sitegauge_core_types::{CriterionId, SiteId};

    use super::*;

    #[tokio::test]
    async fn drains_and_flushes_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join("progress.json"));
        let writer = ProgressWriter::spawn(store.clone(), ProgressRecord::new(), 10);

        let tx = writer.sender();
        for criterion in 1..=4u32 {
            tx.send(WriterMsg::Completed(AuditResult::deterministic(
                SiteId(1),
                CriterionId(criterion),
                true,
                "ok",
            )))
            .await
            .unwrap();
        }
        tx.send(WriterMsg::SiteDone).await.unwrap();
        drop(tx);

        let record = writer.finish().await.unwrap();
        assert_eq!(record.completed_count(), 4);

        let persisted = store.load().unwrap().unwrap();
        assert_eq!(persisted.completed_count(), 4);
    }

    #[tokio::test]
    async fn flushes_at_site_cadence() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join("progress.json"));
        let writer = ProgressWriter::spawn(store.clone(), ProgressRecord::new(), 1);

        let tx = writer.sender();
        tx.send(WriterMsg::Completed(AuditResult::deterministic(
            SiteId(7),
            CriterionId(1),
            true,
            "ok",
        )))
        .await
        .unwrap();
        tx.send(WriterMsg::SiteDone).await.unwrap();

        // the mid-run flush lands without closing the channel
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let persisted = store.load().unwrap().unwrap();
        assert!(persisted.is_completed(SiteId(7), CriterionId(1)));

        drop(tx);
        writer.finish().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_results_do_not_double_count() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProgressStore::new(dir.path().join("progress.json"));
        let writer = ProgressWriter::spawn(store, ProgressRecord::new(), 5);

        let tx = writer.sender();
        for _ in 0..2 {
            tx.send(WriterMsg::Completed(AuditResult::deterministic(
                SiteId(1),
                CriterionId(1),
                true,
                "ok",
            )))
            .await
            .unwrap();
        }
        drop(tx);

        let record = writer.finish().await.unwrap();
        assert_eq!(record.completed_count(), 1);
        assert_eq!(record.results.len(), 1);
    }
}
