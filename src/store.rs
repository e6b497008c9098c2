//! Document store adapter.
//!
//! Handlers only ever talk to [`Store`]; the SQLite layout and the native
//! identifier representation stay behind it.

use crate::config::Config;
use crate::db;
use crate::document_id::DocumentId;
use crate::{AppError, Result};
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

/// A stored document: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Key under which documents carry their store-assigned identifier.
pub const ID_FIELD: &str = "_id";

const ERROR_PREVIEW_CHARS: usize = 50;

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    body: String,
}

impl DocumentRow {
    fn into_document(self) -> Result<Document> {
        let mut doc: Document = serde_json::from_str(&self.body)?;
        doc.insert(ID_FIELD.to_string(), Value::String(self.id));
        Ok(doc)
    }
}

/// Handle to the document store, shared by every request.
#[derive(Debug, Clone)]
pub enum Store {
    /// No `DATABASE_URL` was configured.
    Disabled,
    /// A store was configured but could not be opened at startup.
    Uninitialized { reason: String },
    Ready(SqlitePool),
}

/// Outcome of [`Store::status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreStatus {
    /// The handle exists but its pool has been shut down.
    NotAvailable,
    Uninitialized,
    Connected { collections: Vec<String> },
    ConnectedWithError(String),
    NotConfigured,
}

impl StoreStatus {
    pub fn is_connected(&self) -> bool {
        matches!(
            self,
            StoreStatus::Connected { .. } | StoreStatus::ConnectedWithError(_)
        )
    }

    pub fn describe(&self) -> String {
        match self {
            StoreStatus::NotAvailable => "❌ Not Available".to_string(),
            StoreStatus::Uninitialized => "⚠️  Available but not initialized".to_string(),
            StoreStatus::Connected { .. } => "✅ Connected & Working".to_string(),
            StoreStatus::ConnectedWithError(e) => format!(
                "⚠️  Connected but Error: {}",
                e.chars().take(ERROR_PREVIEW_CHARS).collect::<String>()
            ),
            StoreStatus::NotConfigured => {
                "❌ Database module not found (set DATABASE_URL first)".to_string()
            }
        }
    }

    pub fn collections(&self) -> &[String] {
        match self {
            StoreStatus::Connected { collections } => collections,
            _ => &[],
        }
    }
}

impl Store {
    /// Open the store described by `config`. Never fails: a missing or broken
    /// store is recorded in the returned state.
    pub async fn from_config(config: &Config) -> Self {
        let Some(url) = config.database_url.as_deref().filter(|u| !u.is_empty()) else {
            tracing::info!("DATABASE_URL not set, document store disabled");
            return Store::Disabled;
        };

        match db::connect(url, config).await {
            Ok(pool) => {
                tracing::info!("Document store ready");
                Store::Ready(pool)
            }
            Err(e) => {
                tracing::warn!("Document store failed to initialize: {}", e);
                Store::Uninitialized {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn pool(&self) -> Result<&SqlitePool> {
        match self {
            Store::Ready(pool) => Ok(pool),
            Store::Disabled => Err(AppError::StoreUnavailable(
                "DATABASE_URL not set".to_string(),
            )),
            Store::Uninitialized { reason } => Err(AppError::StoreUnavailable(reason.clone())),
        }
    }

    /// Insert `record` into `collection` and return its newly assigned id.
    pub async fn create_document<T: Serialize>(
        &self,
        collection: &str,
        record: &T,
    ) -> Result<DocumentId> {
        let pool = self.pool()?;

        let mut doc = match serde_json::to_value(record)? {
            Value::Object(map) => map,
            other => {
                return Err(AppError::Validation(format!(
                    "document must be a JSON object, got {}",
                    other
                )))
            }
        };

        // The identifier lives in its own column and is never taken from the body.
        doc.remove(ID_FIELD);

        let id = DocumentId::generate();
        let body = serde_json::to_string(&doc)?;

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(collection)
            .bind(&body)
            .execute(pool)
            .await?;

        tracing::debug!(collection, id = %id, "Inserted document");
        Ok(id)
    }

    /// Documents of `collection` whose top-level fields equal every entry of
    /// `filter`, in insertion order, at most `limit` of them.
    pub async fn get_documents(
        &self,
        collection: &str,
        filter: &Document,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let pool = self.pool()?;

        if limit == 0 {
            return Ok(Vec::new());
        }

        if filter.is_empty() {
            let rows: Vec<DocumentRow> = sqlx::query_as(
                "SELECT id, body FROM documents WHERE collection = ? ORDER BY seq LIMIT ?",
            )
            .bind(collection)
            .bind(limit as i64)
            .fetch_all(pool)
            .await?;

            return rows.into_iter().map(DocumentRow::into_document).collect();
        }

        let mut rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, body FROM documents WHERE collection = ? ORDER BY seq",
        )
        .bind(collection)
        .fetch(pool);

        let mut docs = Vec::new();
        while let Some(row) = rows.try_next().await? {
            let doc = row.into_document()?;
            if matches_filter(&doc, filter) {
                docs.push(doc);
                if docs.len() >= limit {
                    break;
                }
            }
        }

        Ok(docs)
    }

    pub async fn find_document(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<Document>> {
        let pool = self.pool()?;

        let row: Option<DocumentRow> =
            sqlx::query_as("SELECT id, body FROM documents WHERE collection = ? AND id = ?")
                .bind(collection)
                .bind(id.to_string())
                .fetch_optional(pool)
                .await?;

        row.map(DocumentRow::into_document).transpose()
    }

    /// Names of collections holding at least one document, sorted.
    pub async fn list_collections(&self, limit: usize) -> Result<Vec<String>> {
        let pool = self.pool()?;

        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT collection FROM documents ORDER BY collection LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(pool)
        .await?;

        Ok(names)
    }

    /// Probe the store without ever failing.
    pub async fn status(&self) -> StoreStatus {
        match self {
            Store::Disabled => StoreStatus::NotConfigured,
            Store::Uninitialized { .. } => StoreStatus::Uninitialized,
            Store::Ready(pool) if pool.is_closed() => StoreStatus::NotAvailable,
            Store::Ready(_) => match self.list_collections(10).await {
                Ok(collections) => StoreStatus::Connected { collections },
                Err(e) => StoreStatus::ConnectedWithError(e.to_string()),
            },
        }
    }
}

fn matches_filter(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| doc.get(key) == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> Store {
        // A single connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        Store::Ready(pool)
    }

    fn filter(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("filter must be an object"),
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let store = memory_store().await;

        let id = store
            .create_document("video", &json!({ "title": "Intro", "tags": ["a", "b"] }))
            .await
            .unwrap();

        let doc = store.find_document("video", &id).await.unwrap().unwrap();
        assert_eq!(doc[ID_FIELD], json!(id.to_string()));
        assert_eq!(doc["title"], json!("Intro"));
        assert_eq!(doc["tags"], json!(["a", "b"]));
        // Stored fields come back untouched, plus the identifier.
        assert_eq!(doc.len(), 3);

        // Same id, other collection.
        assert!(store.find_document("other", &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_caller_supplied_id_is_ignored() {
        let store = memory_store().await;

        let id = store
            .create_document("video", &json!({ "_id": "spoofed", "title": "x" }))
            .await
            .unwrap();

        let doc = store.find_document("video", &id).await.unwrap().unwrap();
        assert_eq!(doc[ID_FIELD], json!(id.to_string()));
    }

    #[tokio::test]
    async fn test_non_object_record_is_rejected() {
        let store = memory_store().await;
        let result = store.create_document("video", &json!(["not", "an", "object"])).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_documents_respects_limit_and_order() {
        let store = memory_store().await;
        for i in 0..5 {
            store
                .create_document("video", &json!({ "n": i }))
                .await
                .unwrap();
        }
        store
            .create_document("channel", &json!({ "n": 99 }))
            .await
            .unwrap();

        let docs = store.get_documents("video", &Document::new(), 3).await.unwrap();
        let ns: Vec<_> = docs.iter().map(|d| d["n"].clone()).collect();
        assert_eq!(ns, vec![json!(0), json!(1), json!(2)]);

        let all = store.get_documents("video", &Document::new(), 50).await.unwrap();
        assert_eq!(all.len(), 5);

        assert!(store
            .get_documents("video", &Document::new(), 0)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_get_documents_with_filter() {
        let store = memory_store().await;
        for (title, channel) in [("a", "one"), ("b", "two"), ("c", "one"), ("d", "one")] {
            store
                .create_document("video", &json!({ "title": title, "channel_name": channel }))
                .await
                .unwrap();
        }

        let docs = store
            .get_documents("video", &filter(json!({ "channel_name": "one" })), 2)
            .await
            .unwrap();
        let titles: Vec<_> = docs.iter().map(|d| d["title"].clone()).collect();
        assert_eq!(titles, vec![json!("a"), json!("c")]);

        let none = store
            .get_documents("video", &filter(json!({ "channel_name": "three" })), 10)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_list_collections_and_status() {
        let store = memory_store().await;
        assert_eq!(
            store.status().await,
            StoreStatus::Connected {
                collections: vec![]
            }
        );

        store.create_document("video", &json!({})).await.unwrap();
        store.create_document("channel", &json!({})).await.unwrap();

        let status = store.status().await;
        assert!(status.is_connected());
        assert_eq!(status.collections(), ["channel", "video"]);
        assert_eq!(status.describe(), "✅ Connected & Working");
    }

    #[tokio::test]
    async fn test_closed_pool_is_not_available() {
        let store = memory_store().await;
        if let Store::Ready(pool) = &store {
            pool.close().await;
        }
        let status = store.status().await;
        assert_eq!(status, StoreStatus::NotAvailable);
        assert!(!status.is_connected());
    }

    #[tokio::test]
    async fn test_unready_store_rejects_operations() {
        let store = Store::Disabled;
        assert_eq!(store.status().await, StoreStatus::NotConfigured);
        assert!(matches!(
            store.get_documents("video", &Document::new(), 50).await,
            Err(AppError::StoreUnavailable(_))
        ));

        let store = Store::Uninitialized {
            reason: "unable to open database file".to_string(),
        };
        assert_eq!(store.status().await, StoreStatus::Uninitialized);
        assert!(matches!(
            store.create_document("video", &json!({})).await,
            Err(AppError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_error_status_is_truncated() {
        let status = StoreStatus::ConnectedWithError("x".repeat(80));
        assert_eq!(
            status.describe(),
            format!("⚠️  Connected but Error: {}", "x".repeat(50))
        );
        assert!(status.is_connected());
        assert!(status.collections().is_empty());
    }
}
