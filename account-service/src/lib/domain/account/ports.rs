use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::errors::MailerError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AuthenticatedAccount;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::RegisterCommand;
use crate::account::models::Username;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new, unverified account and dispatch its verification email.
    ///
    /// Identity uniqueness is enforced against *verified* accounts only;
    /// unverified records with the same username or email may coexist until
    /// one of them is verified.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created (unverified) account entity
    ///
    /// # Errors
    /// * `UsernameTaken` - A verified account holds this username
    /// * `EmailTaken` - A verified account holds this email
    /// * `Transport` - Verification email could not be sent
    /// * `Persistence` - Storage did not acknowledge the insert
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError>;

    /// Consume a verification token and activate the referenced account.
    ///
    /// Activation prunes every other unverified account sharing the same
    /// email or username ("last verifier wins").
    ///
    /// # Arguments
    /// * `token` - Verification token from the emailed link
    ///
    /// # Returns
    /// Activated account entity
    ///
    /// # Errors
    /// * `Unauthorized` - Token invalid, expired, or referencing no account
    /// * `Persistence` - Storage did not acknowledge the update
    async fn verify_account(&self, token: &str) -> Result<Account, AccountError>;

    /// Authenticate credentials and issue a fresh token pair.
    ///
    /// The new refresh token overwrites the stored one, invalidating any
    /// previous session.
    ///
    /// # Arguments
    /// * `command` - Login command with email and plain text password
    ///
    /// # Returns
    /// Authenticated view carrying both token strings
    ///
    /// # Errors
    /// * `Unauthorized` - Unknown email or wrong password
    /// * `Persistence` - Storage did not acknowledge the refresh-token write
    async fn login(&self, command: LoginCommand) -> Result<AuthenticatedAccount, AccountError>;

    /// Resolve a presented access/refresh token pair into an authenticated caller.
    ///
    /// A valid unexpired access token authenticates directly. An expired
    /// one falls back to the refresh path: the account is looked up by the
    /// token's email claim, the presented refresh token is cross-checked
    /// against the stored one, and a new access token is issued. The
    /// refresh token itself is not rotated here.
    ///
    /// # Errors
    /// * `Unauthorized` - Invalid signature, unknown account, superseded or
    ///   expired refresh token
    async fn authorize(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthenticatedAccount, AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// Implementations must provide atomic single-record read-modify-write
/// semantics; the core holds no cross-request state of its own.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account inside a single transaction scope.
    ///
    /// # Errors
    /// * `Persistence` - Storage did not acknowledge the insert
    async fn insert(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve an account by identifier.
    ///
    /// # Errors
    /// * `Persistence` - Storage operation failed
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Retrieve an account by email address.
    ///
    /// # Errors
    /// * `Persistence` - Storage operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError>;

    /// Retrieve an account by username.
    ///
    /// # Errors
    /// * `Persistence` - Storage operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AccountError>;

    /// Write back every field of an existing account.
    ///
    /// # Errors
    /// * `Persistence` - Account missing or storage did not acknowledge
    async fn update(&self, account: &Account) -> Result<(), AccountError>;

    /// Delete every *other* unverified account sharing this account's email
    /// or username.
    ///
    /// # Returns
    /// Number of records removed
    ///
    /// # Errors
    /// * `Persistence` - Storage operation failed
    async fn delete_unverified_duplicates(&self, account: &Account) -> Result<u64, AccountError>;
}

/// Outbound delivery of account verification links.
#[async_trait]
pub trait VerificationMailer: Send + Sync + 'static {
    /// Send the verification email for a freshly registered account.
    ///
    /// # Arguments
    /// * `username` - Recipient display name
    /// * `email` - Recipient address
    /// * `token` - Verification token to embed in the activation link
    ///
    /// # Errors
    /// * `BuildFailed` - Message could not be constructed
    /// * `SendFailed` - Transport refused or failed delivery
    async fn send_verification(
        &self,
        username: &Username,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), MailerError>;
}
