use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool};

use super::super::models::{Transaction, TransactionStatus};
use crate::core::{AppError, Result};

/// Repository for transaction persistence
pub struct TransactionRepository {
    pool: MySqlPool,
}

impl TransactionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Create a new transaction, idempotent on `reference_id`
    pub async fn create(&self, transaction: &Transaction) -> Result<Transaction> {
        if let Some(reference_id) = &transaction.reference_id {
            if let Some(existing) = self.find_by_reference_id(reference_id).await? {
                return Ok(existing);
            }
        }

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, client_id, amount, type, purpose, status, description,
                reference_id, channel_trx_id, failure_code, failure_message
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.client_id)
        .bind(transaction.amount)
        .bind(transaction.tx_type)
        .bind(transaction.purpose)
        .bind(transaction.status)
        .bind(&transaction.description)
        .bind(&transaction.reference_id)
        .bind(&transaction.channel_trx_id)
        .bind(&transaction.failure_code)
        .bind(&transaction.failure_message)
        .execute(&self.pool)
        .await?;

        self.find_by_id(&transaction.id)
            .await?
            .ok_or_else(|| AppError::internal("Transaction was created but not found"))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, client_id, amount, type, purpose, status, description,
                   reference_id, channel_trx_id, failure_code, failure_message,
                   created_at, updated_at
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Find by the merchant reference id carried in gateway callbacks
    pub async fn find_by_reference_id(&self, reference_id: &str) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, client_id, amount, type, purpose, status, description,
                   reference_id, channel_trx_id, failure_code, failure_message,
                   created_at, updated_at
            FROM transactions
            WHERE reference_id = ?
            "#,
        )
        .bind(reference_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Find by the gateway-side channel transaction id
    pub async fn find_by_channel_trx_id(
        &self,
        channel_trx_id: &str,
    ) -> Result<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, client_id, amount, type, purpose, status, description,
                   reference_id, channel_trx_id, failure_code, failure_message,
                   created_at, updated_at
            FROM transactions
            WHERE channel_trx_id = ?
            "#,
        )
        .bind(channel_trx_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transaction)
    }

    /// Fetch a client's PAYMENT and DEBIT rows inside `[start, end)`.
    /// The billing aggregation reads exactly these two types.
    pub async fn find_billing_rows_in_window(
        &self,
        client_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, client_id, amount, type, purpose, status, description,
                   reference_id, channel_trx_id, failure_code, failure_message,
                   created_at, updated_at
            FROM transactions
            WHERE client_id = ? AND type IN ('PAYMENT', 'DEBIT')
              AND created_at >= ? AND created_at < ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(client_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Paginated transaction listing for a client, newest first
    pub async fn list_by_client(
        &self,
        client_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Transaction>> {
        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, client_id, amount, type, purpose, status, description,
                   reference_id, channel_trx_id, failure_code, failure_message,
                   created_at, updated_at
            FROM transactions
            WHERE client_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(client_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Record the gateway's channel transaction id once acknowledged
    pub async fn set_channel_trx_id(&self, id: &str, channel_trx_id: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET channel_trx_id = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(channel_trx_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Transaction with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    /// Update status plus optional gateway failure details
    pub async fn update_status(
        &self,
        id: &str,
        new_status: TransactionStatus,
        failure_code: Option<&str>,
        failure_message: Option<&str>,
    ) -> Result<()> {
        self.update_status_with_tx(id, new_status, failure_code, failure_message, &self.pool)
            .await
    }

    /// Status update usable inside an existing database transaction.
    ///
    /// The `status = 'PENDING'` guard makes replays harmless: a row that
    /// already reached a terminal status is never touched again.
    pub async fn update_status_with_tx<'a, E>(
        &self,
        id: &str,
        new_status: TransactionStatus,
        failure_code: Option<&str>,
        failure_message: Option<&str>,
        executor: E,
    ) -> Result<()>
    where
        E: sqlx::Executor<'a, Database = MySql>,
    {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = ?,
                failure_code = COALESCE(?, failure_code),
                failure_message = COALESCE(?, failure_message),
                updated_at = NOW()
            WHERE id = ? AND status = 'PENDING'
            "#,
        )
        .bind(new_status)
        .bind(failure_code)
        .bind(failure_message)
        .bind(id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::inconsistent(format!(
                "Transaction '{}' is not PENDING, status unchanged",
                id
            )));
        }

        Ok(())
    }
}
