//! Background persistence worker for generated documents.
//!
//! Handlers queue a document once its file has been rendered; the worker
//! writes it to the document store so the response never waits on the
//! database.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::store::{DocumentStore, NewGeneratedDocument};

/// Starts the background persistence worker.
///
/// Runs until every sender is dropped. A failed save is logged and the
/// worker moves on to the next document.
pub async fn start_persistence_worker(
    mut receiver: mpsc::Receiver<NewGeneratedDocument>,
    documents: Arc<dyn DocumentStore + Send + Sync>,
) {
    log::info!("Document persistence worker started");

    while let Some(document) = receiver.recv().await {
        let template_id = document.template_id;
        let user_id = document.user_id.clone();

        match documents.save_generated_document(document).await {
            Ok(saved) => {
                log::info!(
                    "Generated document {} persisted (template {}, user {})",
                    saved.id,
                    template_id,
                    user_id
                );
            }
            Err(e) => {
                log::error!(
                    "Failed to persist generated document for template {} (user {}): {}",
                    template_id,
                    user_id,
                    e
                );
            }
        }
    }

    log::info!("Document persistence worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::template::FormValues;
    use uuid::Uuid;

    fn new_document(user: &str) -> NewGeneratedDocument {
        NewGeneratedDocument {
            template_id: Uuid::new_v4(),
            user_id: user.to_string(),
            values: FormValues::new(),
            content: "Bonjour".to_string(),
        }
    }

    #[tokio::test]
    async fn test_worker_persists_queued_documents() {
        let store = Arc::new(MemoryStore::new());
        let (sender, receiver) = mpsc::channel(8);

        sender.send(new_document("u1")).await.unwrap();
        sender.send(new_document("u1")).await.unwrap();
        drop(sender);

        start_persistence_worker(receiver, store.clone()).await;
        assert_eq!(store.documents().len(), 2);
    }

    #[tokio::test]
    async fn test_worker_survives_failed_saves() {
        let store = Arc::new(MemoryStore::new());
        store.fail_saves(true);
        let (sender, receiver) = mpsc::channel(8);

        sender.send(new_document("u1")).await.unwrap();
        drop(sender);

        start_persistence_worker(receiver, store.clone()).await;
        assert!(store.documents().is_empty());
    }
}
