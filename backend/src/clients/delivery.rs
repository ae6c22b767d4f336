//! One-time code delivery over SMTP.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use lettre::{
    message::Mailbox,
    transport::smtp::authentication::Credentials,
    transport::smtp::client::{Tls, TlsParameters},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use crate::config::SmtpConfig;

/// Delivers an issued verification code out-of-band.
///
/// Assumed to succeed or fail atomically per call; a failure leaves the
/// session unchanged and the caller retries from scratch.
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    async fn deliver_code(&self, destination: &str, child_name: &str, code: &str) -> Result<()>;
}

/// Production delivery via a credentialed STARTTLS relay.
pub struct SmtpCodeDelivery {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    timeout: Duration,
}

impl SmtpCodeDelivery {
    pub fn new(config: &SmtpConfig, timeout_secs: u64) -> Result<Self> {
        info!(
            "initializing code delivery for SMTP relay {}:{}",
            config.server, config.port
        );

        let tls_params = TlsParameters::new(config.server.clone())
            .context("failed to create TLS parameters")?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
            .context("failed to create SMTP relay")?
            .port(config.port)
            .tls(Tls::Required(tls_params))
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from_email: config.from_email.clone(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[async_trait]
impl CodeDelivery for SmtpCodeDelivery {
    async fn deliver_code(&self, destination: &str, child_name: &str, code: &str) -> Result<()> {
        let subject = format!("Your verification code for {child_name}'s certificate");
        let body = format!(
            "Hello!\n\nYour one-time verification code to view {child_name}'s certificate is:\n\n    {code}\n\nEnter it in the portal to continue. If you did not request this code, you can safely ignore this message.\n\nWarm regards,\nThe Sparklab Team",
        );

        let email = Message::builder()
            .from(
                self.from_email
                    .parse::<Mailbox>()
                    .context("failed to parse sender email")?,
            )
            .to(destination
                .parse::<Mailbox>()
                .context("failed to parse recipient email")?)
            .subject(subject)
            .body(body)
            .context("failed to build email")?;

        // The call carries its own upper bound so an unresponsive relay
        // cannot pin a verification attempt indefinitely.
        match tokio::time::timeout(self.timeout, self.transport.send(email)).await {
            Ok(result) => {
                result.context("failed to send verification code")?;
                info!("verification code delivered");
                Ok(())
            }
            Err(_) => Err(anyhow!(
                "code delivery timed out after {}s",
                self.timeout.as_secs()
            )),
        }
    }
}
