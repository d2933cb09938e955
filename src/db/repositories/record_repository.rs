use crate::db::connection::DbPool;
use crate::db::models::Record;
use crate::error::StorageError;
use sqlx::Row;
use uuid::Uuid;

/// Key-value persistence for [`Record`] types. Each record lives under
/// `(collection, id)` as a flat JSON body.
#[derive(Clone)]
pub struct RecordStore {
    pool: DbPool,
}

impl RecordStore {
    pub fn new(pool: DbPool) -> Self {
        RecordStore { pool }
    }

    /// Inserts the record, or replaces the stored body if the id is known.
    pub async fn save<R: Record>(&self, record: &R) -> Result<(), StorageError> {
        let data = serde_json::to_string(record)?;

        sqlx::query(
            r#"
            INSERT INTO records (collection, id, data) VALUES (?, ?, ?)
            ON CONFLICT(collection, id) DO UPDATE SET data = excluded.data
            "#,
        )
        .bind(R::COLLECTION)
        .bind(record.id().to_string())
        .bind(data)
        .execute(&self.pool)
        .await?;

        debug!(collection = R::COLLECTION, id = %record.id(), "record saved");
        Ok(())
    }

    pub async fn get<R: Record>(&self, id: Uuid) -> Result<Option<R>, StorageError> {
        let row = sqlx::query("SELECT data FROM records WHERE collection = ? AND id = ?")
            .bind(R::COLLECTION)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(serde_json::from_str(row.get::<&str, _>("data"))?)),
            None => Ok(None),
        }
    }

    /// Every record in the collection, oldest first.
    pub async fn all<R: Record>(&self) -> Result<Vec<R>, StorageError> {
        let rows = sqlx::query("SELECT data FROM records WHERE collection = ? ORDER BY seq")
            .bind(R::COLLECTION)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| serde_json::from_str(row.get::<&str, _>("data")).map_err(StorageError::from))
            .collect()
    }

    pub async fn remove<R: Record>(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM records WHERE collection = ? AND id = ?")
            .bind(R::COLLECTION)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[cfg(test)]
    pub async fn count<R: Record>(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM records WHERE collection = ?")
            .bind(R::COLLECTION)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("n"))
    }
}
