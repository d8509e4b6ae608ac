use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::config::AuthConfig;
use account_service::domain::account::errors::AccountError;
use account_service::domain::account::errors::MailerError;
use account_service::domain::account::models::Account;
use account_service::domain::account::models::AccountId;
use account_service::domain::account::models::EmailAddress;
use account_service::domain::account::models::Username;
use account_service::domain::account::ports::AccountRepository;
use account_service::domain::account::ports::VerificationMailer;
use account_service::domain::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const VERIFICATION_SECRET: &str = "test-verification-token-secret";
pub const TOKEN_PREFIX: &str = "Token";
pub const REFRESH_TOKEN_PREFIX: &str = "RefreshToken";

/// In-memory account store backing the integration suite.
///
/// Single-process stand-in for the PostgreSQL adapter with the same
/// field-equality lookup semantics.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn count_by_email(&self, email: &str) -> usize {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .filter(|account| account.email.as_str() == email)
            .count()
    }

    pub fn by_email(&self, email: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .values()
            .find(|account| account.email.as_str() == email)
            .cloned()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn insert(&self, account: Account) -> Result<Account, AccountError> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|account| account.email.as_str() == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .values()
            .find(|account| account.username.as_str() == username)
            .cloned())
    }

    async fn update(&self, account: &Account) -> Result<(), AccountError> {
        let mut accounts = self.accounts.lock().unwrap();
        if !accounts.contains_key(&account.id) {
            return Err(AccountError::Persistence(format!(
                "Account {} was not updated",
                account.id
            )));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn delete_unverified_duplicates(&self, account: &Account) -> Result<u64, AccountError> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|id, candidate| {
            *id == account.id
                || candidate.is_verified
                || (candidate.email != account.email && candidate.username != account.username)
        });
        Ok((before - accounts.len()) as u64)
    }
}

/// Mailer recording every dispatched verification instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentVerification>>,
}

#[derive(Debug, Clone)]
pub struct SentVerification {
    pub username: String,
    pub email: String,
    pub token: String,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentVerification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_token(&self) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|sent| sent.token.clone())
    }
}

#[async_trait]
impl VerificationMailer for RecordingMailer {
    async fn send_verification(
        &self,
        username: &Username,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), MailerError> {
        self.sent.lock().unwrap().push(SentVerification {
            username: username.as_str().to_string(),
            email: email.as_str().to_string(),
            token: token.to_string(),
        });
        Ok(())
    }
}

/// Test application that spawns a real server on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryAccountRepository>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    /// Spawn the application with sane token lifetimes.
    pub async fn spawn() -> Self {
        Self::spawn_with_access_ttl(600).await
    }

    /// Spawn with a custom access-token TTL (zero forces the refresh path
    /// on every authorized request).
    pub async fn spawn_with_access_ttl(access_ttl_seconds: i64) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::default());
        let mailer = Arc::new(RecordingMailer::default());

        let auth_config = AuthConfig {
            jwt_secret: JWT_SECRET.to_string(),
            verification_secret: VERIFICATION_SECRET.to_string(),
            access_ttl_seconds,
            refresh_ttl_seconds: 86_400,
            verification_ttl_seconds: 3600,
            token_prefix: TOKEN_PREFIX.to_string(),
            refresh_token_prefix: REFRESH_TOKEN_PREFIX.to_string(),
        };

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            Arc::clone(&mailer),
            &auth_config,
        ));

        let router = create_router(
            account_service,
            TOKEN_PREFIX.to_string(),
            REFRESH_TOKEN_PREFIX.to_string(),
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            mailer,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request carrying the dual-token credential header
    pub fn get_authorized(
        &self,
        path: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> reqwest::RequestBuilder {
        self.get(path).header(
            "Authorization",
            format!(
                "{} {};{} {}",
                TOKEN_PREFIX, access_token, REFRESH_TOKEN_PREFIX, refresh_token
            ),
        )
    }
}
