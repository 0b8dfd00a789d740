//! src/mail/send_email.rs

use reqwest::Client;
use reqwest::StatusCode;
use secrecy::ExposeSecret;

use crate::config::EmailClientSettings;
use crate::domain::recipient_email::RecipientEmail;

/// How a send attempt failed, as far as the caller can observe.
///
/// The class only feeds logging and per-recipient detail; every variant
/// counts the same way in a campaign's final tally.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("the mail API rejected our credentials")]
    Auth(#[source] reqwest::Error),

    #[error("failed to reach the mail API")]
    Transport(#[source] reqwest::Error),

    #[error("the mail API rejected the message")]
    RemoteRejected(#[source] reqwest::Error),

    #[error("sending failed for an unexpected reason")]
    Unknown(#[source] reqwest::Error),
}

impl SendError {
    pub fn class(&self) -> &'static str {
        match self {
            SendError::Auth(_) => "auth",
            SendError::Transport(_) => "transport",
            SendError::RemoteRejected(_) => "remote_rejected",
            SendError::Unknown(_) => "unknown",
        }
    }

    fn classify(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() {
            return SendError::Transport(error);
        }

        match error.status() {
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN) => SendError::Auth(error),
            Some(status) if status.is_client_error() || status.is_server_error() => {
                SendError::RemoteRejected(error)
            }
            _ => SendError::Unknown(error),
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}

pub struct EmailClient {
    http_client: Client,
    sender: RecipientEmail,
    email_settings: EmailClientSettings,
}

impl EmailClient {
    pub fn new(email_settings: EmailClientSettings, sender: RecipientEmail) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(std::time::Duration::from_millis(
                    email_settings.send_timeout_ms,
                ))
                .build()
                .unwrap(),
            email_settings,
            sender,
        }
    }

    pub async fn send_email(
        &self,
        recipient: &RecipientEmail,
        subject: &str,
        body: &str,
    ) -> Result<(), SendError> {
        let url = format!("{}/email", self.email_settings.base_url);
        let request_body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: recipient.as_ref(),
            subject,
            html_body: body,
            text_body: body,
        };

        self.http_client
            .post(&url)
            .header(
                "X-Postmark-Server-Token",
                self.email_settings.authorization.expose_secret(),
            )
            .json(&request_body)
            .send()
            .await
            .map_err(SendError::classify)?
            .error_for_status()
            .map_err(SendError::classify)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use claim::{assert_err, assert_ok};
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::lorem::en::{Paragraph, Sentence};
    use fake::{Fake, Faker};
    use secrecy::Secret;
    use wiremock::matchers::{any, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    use crate::config::EmailClientSettings;
    use crate::domain::recipient_email::RecipientEmail;

    use super::EmailClient;

    struct SendEmailBodyMatcher;

    impl wiremock::Match for SendEmailBodyMatcher {
        fn matches(&self, request: &Request) -> bool {
            let result: Result<serde_json::Value, _> = serde_json::from_slice(&request.body);
            if let Ok(body) = result {
                return body.get("From").is_some()
                    && body.get("To").is_some()
                    && body.get("Subject").is_some()
                    && body.get("HtmlBody").is_some()
                    && body.get("TextBody").is_some();
            }
            false
        }
    }

    fn subject() -> String {
        Sentence(1..2).fake()
    }

    fn content() -> String {
        Paragraph(1..10).fake()
    }

    fn email() -> RecipientEmail {
        RecipientEmail::parse(SafeEmail().fake()).unwrap()
    }

    fn email_client(server_uri: String) -> EmailClient {
        let email_settings = EmailClientSettings {
            base_url: server_uri,
            send_timeout_ms: 150,
            sender_email: SafeEmail().fake(),
            authorization: Secret::new(Faker.fake()),
        };
        let sender = RecipientEmail::parse(email_settings.sender_email.clone()).unwrap();

        EmailClient::new(email_settings, sender)
    }

    #[tokio::test]
    async fn send_email_sends_the_expected_request() {
        let mock_server = MockServer::start().await;

        let email_client = email_client(mock_server.uri());

        Mock::given(header_exists("X-Postmark-Server-Token"))
            .and(header("Content-Type", "application/json"))
            .and(path("/email"))
            .and(method("POST"))
            .and(SendEmailBodyMatcher)
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        // Act
        let outcome = email_client
            .send_email(&email(), &subject(), &content())
            .await;

        // Assert
        assert_ok!(outcome);
    }

    #[tokio::test]
    async fn send_email_times_out_if_the_server_takes_too_long() {
        let mock_server = MockServer::start().await;

        let email_client = email_client(mock_server.uri());
        let response = ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(180));

        Mock::given(any())
            .respond_with(response)
            .expect(1)
            .mount(&mock_server)
            .await;

        // Act
        let outcome = email_client
            .send_email(&email(), &subject(), &content())
            .await;

        // Assert
        let error = outcome.unwrap_err();
        assert_eq!(error.class(), "transport");
    }

    #[tokio::test]
    async fn send_email_fails_if_server_returns_500() {
        let mock_server = MockServer::start().await;

        let email_client = email_client(mock_server.uri());

        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        // Act
        let outcome = email_client
            .send_email(&email(), &subject(), &content())
            .await;

        // Assert
        let error = outcome.unwrap_err();
        assert_eq!(error.class(), "remote_rejected");
    }

    #[tokio::test]
    async fn a_401_is_classified_as_an_auth_failure() {
        let mock_server = MockServer::start().await;

        let email_client = email_client(mock_server.uri());

        Mock::given(any())
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&mock_server)
            .await;

        let outcome = email_client
            .send_email(&email(), &subject(), &content())
            .await;

        assert_err!(&outcome);
        assert_eq!(outcome.unwrap_err().class(), "auth");
    }
}
