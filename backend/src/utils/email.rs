use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;

use crate::config::{MailConfig, MailProvider};

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("invalid email address {address:?}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("failed to build email message")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP delivery failed")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("email API request failed")]
    Http(#[from] reqwest::Error),
    #[error("email API rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// A single message handed to the configured provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

enum MailTransport {
    Resend {
        client: reqwest::Client,
        api_key: String,
        endpoint: String,
    },
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Disabled,
}

pub struct EmailService {
    transport: MailTransport,
    from_address: String,
}

impl EmailService {
    pub fn from_config(config: &MailConfig) -> anyhow::Result<Self> {
        parse_mailbox(&config.from_address)?;

        let transport = match config.provider {
            MailProvider::Resend => MailTransport::Resend {
                client: reqwest::Client::builder()
                    .user_agent("attendance-backend/1.0")
                    .build()?,
                api_key: config.resend_api_key.clone(),
                endpoint: config.resend_api_url.clone(),
            },
            MailProvider::Smtp => {
                let mailer = if config.smtp_username.is_empty() {
                    AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
                        .port(config.smtp_port)
                        .build()
                } else {
                    let creds = Credentials::new(
                        config.smtp_username.clone(),
                        config.smtp_password.clone(),
                    );
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
                        .port(config.smtp_port)
                        .credentials(creds)
                        .build()
                };
                MailTransport::Smtp(mailer)
            }
            MailProvider::None => MailTransport::Disabled,
        };

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    pub fn provider(&self) -> MailProvider {
        match self.transport {
            MailTransport::Resend { .. } => MailProvider::Resend,
            MailTransport::Smtp(_) => MailProvider::Smtp,
            MailTransport::Disabled => MailProvider::None,
        }
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        match &self.transport {
            MailTransport::Resend {
                client,
                api_key,
                endpoint,
            } => {
                let body = ResendRequest {
                    from: &self.from_address,
                    to: [&email.to],
                    subject: &email.subject,
                    html: &email.html,
                    text: &email.text,
                };
                let response = client
                    .post(endpoint)
                    .bearer_auth(api_key)
                    .json(&body)
                    .send()
                    .await?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(MailError::Rejected {
                        status: status.as_u16(),
                        body,
                    });
                }
                Ok(())
            }
            MailTransport::Smtp(mailer) => {
                let message = self.build_message(email)?;
                mailer.send(message).await?;
                Ok(())
            }
            MailTransport::Disabled => {
                parse_mailbox(&email.to)?;
                tracing::info!(
                    to = %email.to,
                    subject = %email.subject,
                    "Email delivery disabled; message not sent"
                );
                Ok(())
            }
        }
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, MailError> {
        let message = Message::builder()
            .from(parse_mailbox(&self.from_address)?)
            .to(parse_mailbox(&email.to)?)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))?;
        Ok(message)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}
