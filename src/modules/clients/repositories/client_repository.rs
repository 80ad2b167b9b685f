use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool};

use super::super::models::ClientProfile;
use crate::core::{AppError, Currency, Result};

/// Repository for client profile persistence
pub struct ClientRepository {
    pool: MySqlPool,
}

impl ClientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Create a new client profile
    pub async fn create(&self, profile: &ClientProfile) -> Result<ClientProfile> {
        sqlx::query(
            r#"
            INSERT INTO client_profiles (
                id, client_id, company_name, contact_email, phone_number,
                balance, active, currency
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.client_id)
        .bind(&profile.company_name)
        .bind(&profile.contact_email)
        .bind(&profile.phone_number)
        .bind(profile.balance)
        .bind(profile.active)
        .bind(&profile.currency)
        .execute(&self.pool)
        .await?;

        self.find_by_client_id(&profile.client_id)
            .await?
            .ok_or_else(|| AppError::internal("Profile was created but not found"))
    }

    /// Find the profile owned by a client identity
    pub async fn find_by_client_id(&self, client_id: &str) -> Result<Option<ClientProfile>> {
        let profile = sqlx::query_as::<_, ClientProfile>(
            r#"
            SELECT id, client_id, company_name, contact_email, phone_number,
                   balance, active, currency, created_at
            FROM client_profiles
            WHERE client_id = ?
            "#,
        )
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find an active profile or fail with NotFound.
    ///
    /// Generation and payment flows require the client to exist and be
    /// active before any mutation happens.
    pub async fn require_active(&self, client_id: &str) -> Result<ClientProfile> {
        let profile = self
            .find_by_client_id(client_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Client '{}' not found", client_id)))?;

        if !profile.active {
            return Err(AppError::validation(format!(
                "Client '{}' is inactive",
                client_id
            )));
        }

        Ok(profile)
    }

    /// List all profiles, newest first
    pub async fn list(&self) -> Result<Vec<ClientProfile>> {
        let profiles = sqlx::query_as::<_, ClientProfile>(
            r#"
            SELECT id, client_id, company_name, contact_email, phone_number,
                   balance, active, currency, created_at
            FROM client_profiles
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Update the billing currency preference
    pub async fn update_currency(&self, client_id: &str, currency: Currency) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE client_profiles SET currency = ? WHERE client_id = ?
            "#,
        )
        .bind(currency.to_string())
        .bind(client_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Client '{}' not found",
                client_id
            )));
        }

        Ok(())
    }

    /// Flip the active flag, returning the new value
    pub async fn toggle_active(&self, client_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE client_profiles SET active = NOT active WHERE client_id = ?
            "#,
        )
        .bind(client_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Client '{}' not found",
                client_id
            )));
        }

        let profile = self
            .find_by_client_id(client_id)
            .await?
            .ok_or_else(|| AppError::internal("Profile vanished during toggle"))?;
        Ok(profile.active)
    }

    /// Increment the display balance inside an existing database transaction.
    ///
    /// Only the top-up completion path calls this; billing payments never
    /// touch the balance.
    pub async fn increment_balance_with_tx<'a, E>(
        &self,
        client_id: &str,
        amount: Decimal,
        executor: E,
    ) -> Result<()>
    where
        E: sqlx::Executor<'a, Database = MySql>,
    {
        let result = sqlx::query(
            r#"
            UPDATE client_profiles SET balance = balance + ? WHERE client_id = ?
            "#,
        )
        .bind(amount)
        .bind(client_id)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Client '{}' not found",
                client_id
            )));
        }

        Ok(())
    }
}

// Repository behavior is exercised through the service-level integration flow;
// pure validation lives on the model.
