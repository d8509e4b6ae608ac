use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::AsyncSmtpTransport;
use lettre::AsyncTransport;
use lettre::Message;
use lettre::Tokio1Executor;

use crate::account::errors::MailerError;
use crate::account::models::EmailAddress;
use crate::account::models::Username;
use crate::account::ports::VerificationMailer;
use crate::config::Config;

/// SMTP adapter for verification email delivery.
///
/// Failures propagate to the caller: a registration whose email cannot be
/// sent fails visibly rather than leaving an unverifiable account behind
/// silently.
pub struct SmtpVerificationMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    base_url: String,
    http_port: u16,
}

impl SmtpVerificationMailer {
    /// Create a new SMTP mailer from application configuration.
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            server = %config.smtp.server,
            port = config.smtp.port,
            "Initializing SMTP transport for verification emails"
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp.server)?
            .port(config.smtp.port)
            .credentials(Credentials::new(
                config.smtp.login.clone(),
                config.smtp.password.clone(),
            ))
            .build();

        let from: Mailbox = format!("Admin <{}>", config.smtp.from).parse()?;

        Ok(Self {
            transport,
            from,
            base_url: config.server.base_url.clone(),
            http_port: config.server.http_port,
        })
    }

    fn verification_url(&self, token: &str) -> String {
        format!("{}:{}/verify/{}", self.base_url, self.http_port, token)
    }
}

#[async_trait]
impl VerificationMailer for SmtpVerificationMailer {
    async fn send_verification(
        &self,
        username: &Username,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), MailerError> {
        let to: Mailbox = format!("{} <{}>", username, email.as_str())
            .parse()
            .map_err(|e: lettre::address::AddressError| MailerError::BuildFailed(e.to_string()))?;

        let body = format!(
            "Welcome {username}!\n\n\
             Thanks for signing up. Please follow this link to activate your account:\n\
             {url}\n\n\
             Kind Regards,\n\
             Admin\n",
            username = username,
            url = self.verification_url(token),
        );

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject("Verification")
            .body(body)
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map(|_| {
                tracing::debug!(email = %email.as_str(), "Verification email sent");
            })
            .map_err(|e| {
                tracing::error!("Failed to send verification email: {}", e);
                MailerError::SendFailed(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::config::DatabaseConfig;
    use crate::config::ServerConfig;
    use crate::config::SmtpConfig;

    fn test_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/accounts".to_string(),
            },
            server: ServerConfig {
                http_port: 8000,
                base_url: "http://localhost".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-key-for-jwt-signing-at-least-32-bytes".to_string(),
                verification_secret: "test-verification-token-secret".to_string(),
                access_ttl_seconds: 600,
                refresh_ttl_seconds: 86_400,
                verification_ttl_seconds: 3600,
                token_prefix: "Token".to_string(),
                refresh_token_prefix: "RefreshToken".to_string(),
            },
            smtp: SmtpConfig {
                server: "smtp.example.com".to_string(),
                port: 587,
                login: "admin".to_string(),
                password: "hunter2".to_string(),
                from: "admin@example.com".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_verification_url_has_base_port_and_token() {
        let mailer = SmtpVerificationMailer::new(&test_config()).unwrap();
        assert_eq!(
            mailer.verification_url("tok.en.value"),
            "http://localhost:8000/verify/tok.en.value"
        );
    }
}
