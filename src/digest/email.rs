//! Outbound email boundary and the Mailtrap HTTP implementation.

use crate::utils::truncate_for_log;
use reqwest::Client;
use serde_json::json;
use tracing::{error, info, instrument};

pub const MAILTRAP_URL: &str = "https://send.api.mailtrap.io";

/// Deliver one HTML email. Returns `false` on any failure; callers count
/// failures rather than retrying.
pub trait EmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct MailtrapConfig {
    pub api_key: Option<String>,
    pub inbox_id: Option<String>,
    pub base_url: String,
    pub from_email: String,
    pub from_name: String,
}

impl Default for MailtrapConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            inbox_id: None,
            base_url: MAILTRAP_URL.to_string(),
            from_email: "news@newshub.com".to_string(),
            from_name: "NewsHub".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailtrapSender {
    client: Client,
    config: MailtrapConfig,
}

impl MailtrapSender {
    pub fn new(client: Client, config: MailtrapConfig) -> Self {
        Self { client, config }
    }
}

impl EmailSender for MailtrapSender {
    #[instrument(level = "info", skip(self, subject, html_body))]
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> bool {
        let (Some(api_key), Some(inbox_id)) = (&self.config.api_key, &self.config.inbox_id) else {
            error!("Mailtrap configuration not complete");
            return false;
        };

        let url = format!(
            "{}/api/send/{}",
            self.config.base_url.trim_end_matches('/'),
            inbox_id
        );
        let payload = json!({
            "to": [{ "email": to }],
            "from": { "email": self.config.from_email, "name": self.config.from_name },
            "subject": subject,
            "html": html_body,
        });

        let response = match self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "Mailtrap request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!(status, body = %truncate_for_log(&body, 300), "Mailtrap send failed");
            return false;
        }

        info!("Email sent");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sender(base_url: &str) -> MailtrapSender {
        MailtrapSender::new(
            Client::new(),
            MailtrapConfig {
                api_key: Some("secret".to_string()),
                inbox_id: Some("42".to_string()),
                base_url: base_url.to_string(),
                ..MailtrapConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_send_posts_expected_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/send/42"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({
                "to": [{ "email": "ada@example.com" }],
                "subject": "Hello",
                "from": { "name": "NewsHub" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(sender(&server.uri()).send("ada@example.com", "Hello", "<p>hi</p>").await);
    }

    #[tokio::test]
    async fn test_send_reports_failure_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        assert!(!sender(&server.uri()).send("ada@example.com", "Hello", "<p>hi</p>").await);
    }

    #[tokio::test]
    async fn test_send_without_configuration_fails_fast() {
        let unconfigured = MailtrapSender::new(Client::new(), MailtrapConfig::default());
        assert!(!unconfigured.send("ada@example.com", "Hello", "<p>hi</p>").await);
    }
}
