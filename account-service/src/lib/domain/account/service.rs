use std::sync::Arc;

use async_trait::async_trait;
use auth::Claims;
use auth::PasswordHasher;
use auth::RefreshClaims;
use auth::TimedTokenError;
use auth::TimedTokenSerializer;
use auth::TokenIssuer;
use chrono::Duration;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AuthenticatedAccount;
use crate::account::models::LoginCommand;
use crate::account::models::RegisterCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::ports::VerificationMailer;
use crate::config::AuthConfig;

// Fixed 401 messages. Deliberately free of timestamps and account detail.
const INVALID_CREDENTIALS: &str = "Invalid email or password";
const COULD_NOT_VALIDATE: &str = "Could not validate credentials";
const TOKEN_INVALID: &str = "Authorization token is invalid";
const REFRESH_EXPIRED: &str = "Refresh token has expired";
const VERIFICATION_FAILED: &str = "Verification token is invalid or has expired";

/// Domain service implementation for the account lifecycle and the
/// authorization resolver.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR, VM>
where
    AR: AccountRepository,
    VM: VerificationMailer,
{
    repository: Arc<AR>,
    mailer: Arc<VM>,
    token_issuer: TokenIssuer,
    verification_tokens: TimedTokenSerializer,
    verification_ttl: Duration,
}

impl<AR, VM> AccountService<AR, VM>
where
    AR: AccountRepository,
    VM: VerificationMailer,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `mailer` - Verification email delivery implementation
    /// * `auth_config` - Signing secrets, TTLs and header prefixes
    pub fn new(repository: Arc<AR>, mailer: Arc<VM>, auth_config: &AuthConfig) -> Self {
        Self {
            repository,
            mailer,
            token_issuer: TokenIssuer::new(
                auth_config.jwt_secret.as_bytes(),
                Duration::seconds(auth_config.access_ttl_seconds),
                Duration::seconds(auth_config.refresh_ttl_seconds),
            ),
            verification_tokens: TimedTokenSerializer::new(
                auth_config.verification_secret.as_bytes(),
            ),
            verification_ttl: Duration::seconds(auth_config.verification_ttl_seconds),
        }
    }

    /// Salt-and-hash a password on a blocking thread.
    ///
    /// The hash is deliberately slow; running it inline would stall
    /// unrelated requests on the async runtime.
    async fn hash_password(secret: String) -> Result<String, AccountError> {
        tokio::task::spawn_blocking(move || PasswordHasher::new().hash(&secret))
            .await
            .map_err(|e| AccountError::Unknown(e.to_string()))?
            .map_err(AccountError::from)
    }

    /// Verify a password on a blocking thread.
    ///
    /// A malformed stored hash can never authenticate: hash errors collapse
    /// to `false` rather than surfacing as a retryable failure.
    async fn verify_password(secret: String, hash: String) -> Result<bool, AccountError> {
        let outcome = tokio::task::spawn_blocking(move || PasswordHasher::new().verify(&secret, &hash))
            .await
            .map_err(|e| AccountError::Unknown(e.to_string()))?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::error!(error = %e, "Password verification failed");
                Ok(false)
            }
        }
    }

    /// Refresh path of the authorization resolver.
    ///
    /// Entered once the access token has decoded as authentic but expired.
    /// The presented refresh token must match the stored one exactly, so a
    /// validly signed but superseded token is rejected.
    async fn refresh_access(
        &self,
        claims: &Claims,
        refresh_token: &str,
    ) -> Result<AuthenticatedAccount, AccountError> {
        let account = self
            .repository
            .find_by_email(&claims.email)
            .await?
            .ok_or(AccountError::Unauthorized(COULD_NOT_VALIDATE))?;

        if account.refresh_token.as_deref() != Some(refresh_token) {
            tracing::warn!(account_id = %account.id, "Presented refresh token does not match stored token");
            return Err(AccountError::Unauthorized(TOKEN_INVALID));
        }

        let refresh_envelope = self
            .token_issuer
            .decode_refresh(refresh_token)
            .map_err(|_| AccountError::Unauthorized(TOKEN_INVALID))?;
        if refresh_envelope.is_expired(Utc::now()) {
            return Err(AccountError::Unauthorized(REFRESH_EXPIRED));
        }

        let claims = Claims::new(account.email.as_str(), account.username.as_str());
        let token = self.token_issuer.issue_access(&claims)?;
        tracing::debug!(account_id = %account.id, "Access token silently refreshed");

        // The refresh token is not rotated here; it stays valid until its
        // own TTL lapses. Rotation happens on login only.
        Ok(AuthenticatedAccount::new(
            &account,
            token,
            refresh_token.to_string(),
        ))
    }
}

#[async_trait]
impl<AR, VM> AccountServicePort for AccountService<AR, VM>
where
    AR: AccountRepository,
    VM: VerificationMailer,
{
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        // Uniqueness is enforced against verified accounts only; unverified
        // collisions coexist until one of them wins verification.
        if let Some(existing) = self
            .repository
            .find_by_username(command.username.as_str())
            .await?
        {
            if existing.is_verified {
                return Err(AccountError::UsernameTaken(command.username.to_string()));
            }
        }
        if let Some(existing) = self.repository.find_by_email(command.email.as_str()).await? {
            if existing.is_verified {
                return Err(AccountError::EmailTaken(command.email.as_str().to_string()));
            }
        }

        let salt = PasswordHasher::generate_salt().as_str().to_string();
        let password_hash = Self::hash_password(format!("{}{}", salt, command.password)).await?;

        let account = Account {
            id: AccountId::new(),
            username: command.username,
            email: command.email,
            salt,
            password_hash,
            refresh_token: None,
            is_verified: false,
            updated_at: Utc::now(),
        };

        let account = self.repository.insert(account).await?;

        let verification_token = self.verification_tokens.encode(&account.id.to_string());
        self.mailer
            .send_verification(&account.username, &account.email, &verification_token)
            .await?;

        tracing::info!(account_id = %account.id, "Account registered, verification email dispatched");

        Ok(account)
    }

    async fn verify_account(&self, token: &str) -> Result<Account, AccountError> {
        let payload = self
            .verification_tokens
            .decode(token, self.verification_ttl)
            .map_err(|e| {
                if let TimedTokenError::Expired { issued_at } = e {
                    tracing::warn!(issued_at = %issued_at, "Verification token expired");
                }
                AccountError::Unauthorized(VERIFICATION_FAILED)
            })?;

        let id = AccountId::from_string(&payload.subject)
            .map_err(|_| AccountError::Unauthorized(VERIFICATION_FAILED))?;

        let mut account = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or(AccountError::Unauthorized(VERIFICATION_FAILED))?;

        account.is_verified = true;
        account.updated_at = Utc::now();
        self.repository.update(&account).await?;

        // Last verifier wins: the verified account claims its identity by
        // pruning every other unverified record sharing email or username.
        let pruned = self.repository.delete_unverified_duplicates(&account).await?;
        if pruned > 0 {
            tracing::info!(
                account_id = %account.id,
                count = pruned,
                "Pruned unverified duplicate accounts"
            );
        }

        Ok(account)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedAccount, AccountError> {
        let mut account = self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .ok_or(AccountError::Unauthorized(INVALID_CREDENTIALS))?;

        let secret = format!("{}{}", account.salt, command.password);
        if !Self::verify_password(secret, account.password_hash.clone()).await? {
            return Err(AccountError::Unauthorized(INVALID_CREDENTIALS));
        }

        let claims = Claims::new(account.email.as_str(), account.username.as_str());
        let token = self.token_issuer.issue_access(&claims)?;
        let refresh_token = self
            .token_issuer
            .issue_refresh(&RefreshClaims::new(account.email.as_str()))?;

        // Overwriting the stored refresh token invalidates any previous session
        account.refresh_token = Some(refresh_token.clone());
        self.repository.update(&account).await?;

        tracing::info!(account_id = %account.id, "Login succeeded, refresh token rotated");

        Ok(AuthenticatedAccount::new(&account, token, refresh_token))
    }

    async fn authorize(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthenticatedAccount, AccountError> {
        let envelope = self
            .token_issuer
            .decode_access(access_token)
            .map_err(|_| AccountError::Unauthorized(COULD_NOT_VALIDATE))?;

        // An authentic, unexpired access token authenticates on its own.
        // `now >= expiry` counts as expired.
        if !envelope.is_expired(Utc::now()) {
            let claims = envelope.claims;
            return Ok(AuthenticatedAccount {
                email: claims.email,
                username: claims.username,
                token: access_token.to_string(),
                refresh_token: refresh_token.to_string(),
            });
        }

        self.refresh_access(&envelope.claims, refresh_token).await
    }
}
