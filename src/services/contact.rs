//! Contact form relay
//!
//! Validates a submission and hands it to a [`MailTransport`]. The HTTP
//! transport speaks the JSON email API (Resend-compatible).

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use ts_rs::TS;
use ureq::Agent;
use uuid::Uuid;

use super::http;
use crate::errors::{PortfolioError, Result};
use crate::storage::models::TS_EXPORT_PATH;
use crate::utils::{escape_html, is_blank, is_valid_email};

pub const MAX_MESSAGE_LEN: usize = 5000;

/// 所有字段缺失时按空字符串处理，交给校验统一报错
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.name) || is_blank(&self.email) || is_blank(&self.message) {
            return Err(PortfolioError::validation(
                "Name, email and message are required",
            ));
        }
        if !is_valid_email(self.email.trim()) {
            return Err(PortfolioError::validation("Please provide a valid email address"));
        }
        if self.message.chars().count() > MAX_MESSAGE_LEN {
            return Err(PortfolioError::validation(format!(
                "Message must be at most {} characters",
                MAX_MESSAGE_LEN
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// 返回上游的消息 id（若有）
    async fn send(&self, email: OutgoingEmail) -> Result<Option<String>>;
}

pub struct HttpMailer {
    agent: Agent,
    api_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(agent: Agent, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            agent,
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// 上游 403 且提示域名未验证
fn is_domain_verification_error(status: u16, body: &str) -> bool {
    let body = body.to_lowercase();
    status == 403 && body.contains("domain") && body.contains("verif")
}

#[async_trait]
impl MailTransport for HttpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<Option<String>> {
        if self.api_key.is_empty() {
            return Err(PortfolioError::not_configured(
                "email API key is not configured",
            ));
        }

        let resp = http::post_json(&self.agent, "email", &self.api_url, &self.api_key, email)
            .await?;

        if is_domain_verification_error(resp.status, &resp.body) {
            warn!("Email API rejected sender domain: {}", resp.body_excerpt());
            return Err(PortfolioError::upstream_rejected(
                "sender domain is not verified",
            ));
        }
        if !resp.is_success() {
            error!(
                "Email API returned {}: {}",
                resp.status,
                resp.body_excerpt()
            );
            return Err(PortfolioError::upstream(format!(
                "email API returned status {}",
                resp.status
            )));
        }

        let id = serde_json::from_str::<serde_json::Value>(&resp.body)
            .ok()
            .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(String::from));
        Ok(id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactReceipt {
    pub id: String,
}

pub struct ContactService {
    transport: Arc<dyn MailTransport>,
    from: String,
    to: String,
    subject_prefix: String,
}

impl ContactService {
    pub fn new(
        transport: Arc<dyn MailTransport>,
        from: impl Into<String>,
        to: impl Into<String>,
        subject_prefix: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            from: from.into(),
            to: to.into(),
            subject_prefix: subject_prefix.into(),
        }
    }

    pub fn compose(&self, req: &ContactRequest) -> OutgoingEmail {
        let name = req.name.trim();
        let email = req.email.trim();
        let message = req.message.trim();

        let html = format!(
            "<h2>New message from your portfolio</h2>\
             <p><strong>Name:</strong> {}</p>\
             <p><strong>Email:</strong> {}</p>\
             <p><strong>Message:</strong></p>\
             <p style=\"white-space: pre-wrap\">{}</p>",
            escape_html(name),
            escape_html(email),
            escape_html(message)
        );
        let text = format!("Name: {}\nEmail: {}\n\n{}", name, email, message);

        OutgoingEmail {
            from: self.from.clone(),
            to: vec![self.to.clone()],
            reply_to: email.to_string(),
            subject: format!("{} from {}", self.subject_prefix, name),
            html,
            text,
        }
    }

    /// 校验并发送；返回上游 id，缺失时用本地生成的提交 id
    pub async fn submit(&self, req: &ContactRequest) -> Result<ContactReceipt> {
        req.validate()?;
        if self.to.is_empty() {
            return Err(PortfolioError::not_configured(
                "contact recipient is not configured",
            ));
        }

        let submission_id = Uuid::new_v4().to_string();
        info!("Contact submission {} received", submission_id);

        let upstream_id = self.transport.send(self.compose(req)).await.inspect_err(|e| {
            error!("Contact submission {} failed: {}", submission_id, e);
        })?;

        let id = upstream_id.unwrap_or(submission_id);
        info!("Contact submission delivered, id={}", id);
        Ok(ContactReceipt { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingTransport {
        sent: Mutex<Vec<OutgoingEmail>>,
        reply: Result<Option<String>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(&self, email: OutgoingEmail) -> Result<Option<String>> {
            self.sent.lock().unwrap().push(email);
            self.reply.clone()
        }
    }

    fn service(reply: Result<Option<String>>) -> (ContactService, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport {
            sent: Mutex::new(Vec::new()),
            reply,
        });
        let svc = ContactService::new(
            transport.clone(),
            "Portfolio <noreply@example.com>",
            "owner@example.com",
            "New portfolio message",
        );
        (svc, transport)
    }

    fn request() -> ContactRequest {
        ContactRequest {
            name: "Grace <b>".to_string(),
            email: "grace@example.com".to_string(),
            message: "Hello & welcome".to_string(),
        }
    }

    #[test]
    fn test_validation_rules() {
        assert!(request().validate().is_ok());
        assert!(ContactRequest::default().validate().is_err());

        let mut bad = request();
        bad.email = "grace.example.com".to_string();
        assert!(bad.validate().is_err());

        let mut long = request();
        long.message = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_domain_verification_detection() {
        assert!(is_domain_verification_error(
            403,
            r#"{"message":"The example.com domain is not verified."}"#
        ));
        assert!(!is_domain_verification_error(403, "forbidden"));
        assert!(!is_domain_verification_error(422, "domain not verified"));
    }

    #[tokio::test]
    async fn test_submit_escapes_html_and_uses_upstream_id() {
        let (svc, transport) = service(Ok(Some("msg_123".to_string())));
        let receipt = svc.submit(&request()).await.unwrap();
        assert_eq!(receipt.id, "msg_123");

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "grace@example.com");
        assert!(sent[0].html.contains("Grace &lt;b&gt;"));
        assert!(sent[0].html.contains("Hello &amp; welcome"));
        assert!(sent[0].text.contains("Hello & welcome"));
    }

    #[tokio::test]
    async fn test_submit_falls_back_to_submission_id() {
        let (svc, _) = service(Ok(None));
        let receipt = svc.submit(&request()).await.unwrap();
        assert!(Uuid::parse_str(&receipt.id).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_transport() {
        let (svc, transport) = service(Ok(None));
        let err = svc.submit(&ContactRequest::default()).await.unwrap_err();
        assert!(matches!(err, PortfolioError::Validation(_)));
        assert!(transport.sent.lock().unwrap().is_empty());
    }
}
