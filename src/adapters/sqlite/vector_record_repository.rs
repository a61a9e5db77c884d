//! SQLite implementation of the VectorRecordRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EmbeddingRecord, Metadata, StoredDocument, TagPage};
use crate::domain::ports::VectorRecordRepository;

/// Matches rows whose `metadata.tags` array contains the bound tag. Rows with
/// unparseable metadata never match instead of failing the whole statement.
const TAG_FILTER: &str = "CASE WHEN json_valid(metadata) THEN EXISTS (
        SELECT 1 FROM json_each(vector_records.metadata, '$.tags') WHERE json_each.value = ?
    ) ELSE 0 END";

#[derive(Clone)]
pub struct SqliteVectorRecordRepository {
    pool: SqlitePool,
}

impl SqliteVectorRecordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VectorRecordRepository for SqliteVectorRecordRepository {
    async fn insert(&self, collection: &str, record: &EmbeddingRecord) -> DomainResult<()> {
        let embedding_json = serde_json::to_string(&record.embedding)?;
        let metadata_json = serde_json::to_string(&record.metadata)?;

        sqlx::query(
            r#"INSERT INTO vector_records (id, collection, content, embedding, metadata, model, created)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&record.id)
        .bind(collection)
        .bind(&record.content)
        .bind(&embedding_json)
        .bind(&metadata_json)
        .bind(&record.model)
        .bind(record.created.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn scan_all(&self, collection: &str) -> DomainResult<Vec<EmbeddingRecord>> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            "SELECT id, content, embedding, metadata, model, created FROM vector_records
             WHERE collection = ? ORDER BY rowid",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        let total = rows.len();
        let records: Vec<EmbeddingRecord> = rows
            .into_iter()
            .filter_map(|row| match EmbeddingRecord::try_from(row) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(collection, error = %err, "skipping malformed vector record");
                    None
                }
            })
            .collect();

        tracing::debug!(collection, total, valid = records.len(), "scanned vector records");
        Ok(records)
    }

    async fn scan_documents(&self, collection: &str) -> DomainResult<Vec<StoredDocument>> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            "SELECT id, content, NULL AS embedding, metadata, model, created FROM vector_records
             WHERE collection = ? ORDER BY rowid",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }

    async fn delete(&self, collection: &str, id: &str) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM vector_records WHERE collection = ? AND id = ?")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self, collection: &str) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM vector_records WHERE collection = ?")
            .bind(collection)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_tag(&self, collection: &str, tag: &str) -> DomainResult<u64> {
        let sql = format!("DELETE FROM vector_records WHERE collection = ? AND {TAG_FILTER}");
        let result = sqlx::query(&sql)
            .bind(collection)
            .bind(tag)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn find_by_tag(
        &self,
        collection: &str,
        tag: &str,
        page: TagPage,
    ) -> DomainResult<Vec<StoredDocument>> {
        let sql = format!(
            "SELECT id, content, NULL AS embedding, metadata, model, created FROM vector_records
             WHERE collection = ? AND {TAG_FILTER} ORDER BY id LIMIT ? OFFSET ?"
        );
        let rows: Vec<RecordRow> = sqlx::query_as(&sql)
            .bind(collection)
            .bind(tag)
            .bind(i64::from(page.limit))
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }

    async fn count(&self, collection: &str) -> DomainResult<u64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vector_records WHERE collection = ?")
                .bind(collection)
                .fetch_one(&self.pool)
                .await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: String,
    content: Option<String>,
    embedding: Option<String>,
    metadata: Option<String>,
    model: Option<String>,
    created: Option<String>,
}

/// Metadata that is missing or not a JSON object reads as empty.
fn parse_metadata(raw: Option<&str>) -> Metadata {
    raw.and_then(|s| serde_json::from_str::<Metadata>(s).ok())
        .unwrap_or_default()
}

impl TryFrom<RecordRow> for EmbeddingRecord {
    type Error = DomainError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let malformed = |reason: String| DomainError::MalformedRecord {
            id: row.id.clone(),
            reason,
        };

        let embedding: Vec<f32> = match row.embedding.as_deref() {
            None => return Err(malformed("embedding missing".to_string())),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| malformed(format!("embedding is not a numeric array: {e}")))?,
        };

        let content = row
            .content
            .clone()
            .ok_or_else(|| malformed("content missing".to_string()))?;

        let created = row
            .created
            .as_deref()
            .ok_or_else(|| malformed("created timestamp missing".to_string()))
            .and_then(|s| super::parse_datetime(s).map_err(|e| malformed(e.to_string())))?;

        Ok(EmbeddingRecord {
            metadata: parse_metadata(row.metadata.as_deref()),
            model: row.model.clone().unwrap_or_default(),
            id: row.id,
            content,
            embedding,
            created,
        })
    }
}

impl From<RecordRow> for StoredDocument {
    fn from(row: RecordRow) -> Self {
        Self {
            metadata: parse_metadata(row.metadata.as_deref()),
            id: row.id,
            content: row.content,
            model: row.model,
            created: row.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use serde_json::json;

    const COLLECTION: &str = "test_embeddings";

    async fn setup() -> (SqlitePool, SqliteVectorRecordRepository) {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteVectorRecordRepository::new(pool.clone());
        (pool, repo)
    }

    fn record(content: &str, embedding: Vec<f32>, tags: &[&str]) -> EmbeddingRecord {
        let mut metadata = Metadata::new();
        metadata.insert("tags".to_string(), json!(tags));
        EmbeddingRecord::new(content, embedding, metadata, "test-model")
    }

    async fn insert_raw(pool: &SqlitePool, id: &str, content: Option<&str>, embedding: Option<&str>) {
        sqlx::query(
            "INSERT INTO vector_records (id, collection, content, embedding, metadata, model, created)
             VALUES (?, ?, ?, ?, 'not json', NULL, '2024-01-01T00:00:00Z')",
        )
        .bind(id)
        .bind(COLLECTION)
        .bind(content)
        .bind(embedding)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_scan_in_insertion_order() {
        let (_pool, repo) = setup().await;
        let first = record("first", vec![1.0, 0.0], &[]);
        let second = record("second", vec![0.0, 1.0], &["a"]);
        repo.insert(COLLECTION, &first).await.unwrap();
        repo.insert(COLLECTION, &second).await.unwrap();

        let records = repo.scan_all(COLLECTION).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, first.id);
        assert_eq!(records[0].embedding, vec![1.0, 0.0]);
        assert_eq!(records[0].model, "test-model");
        assert_eq!(records[1].content, "second");
        assert_eq!(records[1].metadata["tags"], json!(["a"]));
    }

    #[tokio::test]
    async fn test_scan_skips_malformed_rows() {
        let (pool, repo) = setup().await;
        repo.insert(COLLECTION, &record("good", vec![1.0], &[])).await.unwrap();
        insert_raw(&pool, "missing-embedding", Some("x"), None).await;
        insert_raw(&pool, "string-embedding", Some("x"), Some(r#""1,2,3""#)).await;
        insert_raw(&pool, "mixed-embedding", Some("x"), Some(r#"[1.0, "a"]"#)).await;
        insert_raw(&pool, "no-content", None, Some("[1.0]")).await;
        insert_raw(&pool, "bad-metadata", Some("kept"), Some("[0.5]")).await;

        let records = repo.scan_all(COLLECTION).await.unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[1], "bad-metadata");
        assert!(records[1].metadata.is_empty());
        assert_eq!(records[1].model, "");

        // Administrative reads still see every row
        assert_eq!(repo.scan_documents(COLLECTION).await.unwrap().len(), 6);
        assert_eq!(repo.count(COLLECTION).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let (_pool, repo) = setup().await;
        repo.insert(COLLECTION, &record("a", vec![1.0], &[])).await.unwrap();
        repo.insert("other", &record("b", vec![1.0], &[])).await.unwrap();

        assert_eq!(repo.delete_all(COLLECTION).await.unwrap(), 1);
        assert_eq!(repo.count("other").await.unwrap(), 1);
        assert!(repo.scan_all(COLLECTION).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_single_record() {
        let (_pool, repo) = setup().await;
        let rec = record("a", vec![1.0], &[]);
        repo.insert(COLLECTION, &rec).await.unwrap();

        assert!(repo.delete(COLLECTION, &rec.id).await.unwrap());
        assert!(!repo.delete(COLLECTION, &rec.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_and_delete_by_tag() {
        let (pool, repo) = setup().await;
        for i in 0..5 {
            let tags: &[&str] = if i % 2 == 0 { &["housing", "faq"] } else { &["other"] };
            repo.insert(COLLECTION, &record(&format!("doc {i}"), vec![1.0], tags))
                .await
                .unwrap();
        }
        // Malformed metadata must not break the tag filter
        insert_raw(&pool, "bad-metadata", Some("x"), Some("[1.0]")).await;

        let all = repo.find_by_tag(COLLECTION, "housing", TagPage::default()).await.unwrap();
        assert_eq!(all.len(), 3);
        let mut ids: Vec<_> = all.iter().map(|d| d.id.clone()).collect();
        let sorted = {
            let mut s = ids.clone();
            s.sort();
            s
        };
        assert_eq!(ids, sorted, "results are ordered by id");

        let page_two = repo.find_by_tag(COLLECTION, "housing", TagPage::new(2, 2)).await.unwrap();
        assert_eq!(page_two.len(), 1);
        assert_eq!(page_two[0].id, ids.pop().unwrap());

        assert_eq!(repo.delete_by_tag(COLLECTION, "housing").await.unwrap(), 3);
        assert_eq!(repo.delete_by_tag(COLLECTION, "housing").await.unwrap(), 0);
        assert_eq!(repo.count(COLLECTION).await.unwrap(), 3);
    }
}
