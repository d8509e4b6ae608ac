use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::Username;
use crate::account::ports::AccountRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; value objects are revalidated on the way out.
#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    email: String,
    salt: String,
    password_hash: String,
    refresh_token: Option<String>,
    is_verified: bool,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountError;

    fn try_from(row: AccountRow) -> Result<Self, AccountError> {
        Ok(Account {
            id: AccountId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            salt: row.salt,
            password_hash: row.password_hash,
            refresh_token: row.refresh_token,
            is_verified: row.is_verified,
            updated_at: row.updated_at,
        })
    }
}

fn persistence_error(e: sqlx::Error) -> AccountError {
    AccountError::Persistence(e.to_string())
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn insert(&self, account: Account) -> Result<Account, AccountError> {
        // No unique constraints back this insert: unverified duplicates are
        // legal until one of them is verified
        let mut tx = self.pool.begin().await.map_err(persistence_error)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, salt, password_hash, refresh_token, is_verified, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(&account.salt)
        .bind(&account.password_hash)
        .bind(&account.refresh_token)
        .bind(account.is_verified)
        .bind(account.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(persistence_error)?;

        tx.commit().await.map_err(persistence_error)?;

        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, salt, password_hash, refresh_token, is_verified, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_error)?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, salt, password_hash, refresh_token, is_verified, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_error)?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, salt, password_hash, refresh_token, is_verified, updated_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence_error)?;

        row.map(Account::try_from).transpose()
    }

    async fn update(&self, account: &Account) -> Result<(), AccountError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET username = $2, email = $3, salt = $4, password_hash = $5, refresh_token = $6, is_verified = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(account.id.0)
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(&account.salt)
        .bind(&account.password_hash)
        .bind(&account.refresh_token)
        .bind(account.is_verified)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(persistence_error)?;

        if result.rows_affected() == 0 {
            return Err(AccountError::Persistence(format!(
                "Account {} was not updated",
                account.id
            )));
        }

        Ok(())
    }

    async fn delete_unverified_duplicates(&self, account: &Account) -> Result<u64, AccountError> {
        let result = sqlx::query(
            r#"
            DELETE FROM accounts
            WHERE is_verified = FALSE
              AND id <> $1
              AND (email = $2 OR username = $3)
            "#,
        )
        .bind(account.id.0)
        .bind(account.email.as_str())
        .bind(account.username.as_str())
        .execute(&self.pool)
        .await
        .map_err(persistence_error)?;

        Ok(result.rows_affected())
    }
}
