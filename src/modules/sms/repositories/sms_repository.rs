use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, QueryBuilder};

use crate::core::Result;
use crate::modules::sms::models::SmsRecord;

/// Repository for SMS record persistence
pub struct SmsRepository {
    pool: MySqlPool,
}

impl SmsRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert a batch of records atomically.
    ///
    /// One multi-row INSERT inside one database transaction: concurrent
    /// readers either see the whole batch or none of it.
    pub async fn bulk_insert(&self, records: &[SmsRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        let mut builder: QueryBuilder<sqlx::MySql> = QueryBuilder::new(
            "INSERT INTO sms_records \
             (id, client_id, phone_number, message, status, cost, sent_at, created_at) ",
        );

        builder.push_values(records, |mut row, record| {
            row.push_bind(&record.id)
                .push_bind(&record.client_id)
                .push_bind(&record.phone_number)
                .push_bind(&record.message)
                .push_bind(record.status)
                .push_bind(record.cost)
                .push_bind(record.sent_at)
                .push_bind(record.created_at);
        });

        builder.build().execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Fetch a client's records inside a half-open UTC window `[start, end)`
    pub async fn find_in_window(
        &self,
        client_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SmsRecord>> {
        let records = sqlx::query_as::<_, SmsRecord>(
            r#"
            SELECT id, client_id, phone_number, message, status, cost, sent_at, created_at
            FROM sms_records
            WHERE client_id = ? AND created_at >= ? AND created_at < ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(client_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Paginated listing, newest first, optionally filtered by client
    pub async fn list(
        &self,
        client_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SmsRecord>> {
        let records = match client_id {
            Some(client_id) => {
                sqlx::query_as::<_, SmsRecord>(
                    r#"
                    SELECT id, client_id, phone_number, message, status, cost, sent_at, created_at
                    FROM sms_records
                    WHERE client_id = ?
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(client_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SmsRecord>(
                    r#"
                    SELECT id, client_id, phone_number, message, status, cost, sent_at, created_at
                    FROM sms_records
                    ORDER BY created_at DESC
                    LIMIT ? OFFSET ?
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }
}
