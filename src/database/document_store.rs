use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Named collections of JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Jobs,
    Candidates,
    Assessments,
    TimelineEvents,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::Candidates => "candidates",
            Collection::Assessments => "assessments",
            Collection::TimelineEvents => "timelineEvents",
        }
    }
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    body: String,
}

/// Embedded document store: every collection is loaded whole and queried in
/// memory, documents keep their insertion order.
#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn all<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"SELECT id, body FROM documents WHERE collection = ? ORDER BY rowid ASC"#,
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_str::<T>(&row.body) {
                Ok(doc) => docs.push(doc),
                Err(e) => tracing::warn!(
                    collection = collection.as_str(),
                    id = %row.id,
                    error = %e,
                    "skipping unreadable document"
                ),
            }
        }
        Ok(docs)
    }

    pub async fn get<T: DeserializeOwned>(&self, collection: Collection, id: &str) -> Result<Option<T>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"SELECT id, body FROM documents WHERE collection = ? AND id = ?"#,
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        match serde_json::from_str(&row.body) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                tracing::warn!(
                    collection = collection.as_str(),
                    id = %row.id,
                    error = %e,
                    "treating unreadable document as missing"
                );
                Ok(None)
            }
        }
    }

    /// Adds a new document; an existing id is a conflict.
    pub async fn insert<T: Serialize>(&self, collection: Collection, id: &str, doc: &T) -> Result<()> {
        let body = serde_json::to_string(doc)?;
        let res = sqlx::query(r#"INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)"#)
            .bind(collection.as_str())
            .bind(id)
            .bind(body)
            .execute(&self.pool)
            .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(Error::Conflict(
                format!("{} document {} already exists", collection.as_str(), id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Inserts or fully replaces a document.
    pub async fn put<T: Serialize>(&self, collection: Collection, id: &str, doc: &T) -> Result<()> {
        let body = serde_json::to_string(doc)?;
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)
            ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Puts many documents in one transaction.
    pub async fn bulk_put<T: Serialize>(&self, collection: Collection, docs: &[(String, T)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (id, doc) in docs {
            let body = serde_json::to_string(doc)?;
            sqlx::query(
                r#"
                INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)
                ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body
                "#,
            )
            .bind(collection.as_str())
            .bind(id)
            .bind(body)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn count(&self, collection: Collection) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM documents WHERE collection = ?"#)
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
