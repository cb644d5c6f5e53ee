//! Email service for submission notifications via SMTP.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use verigate_core::models::SubmissionRecord;
use verigate_core::Config;

/// Sends plain-text notification mail. No-op at the call sites when SMTP is
/// not configured (the service is simply absent from app state).
#[derive(Clone)]
pub struct EmailService {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl EmailService {
    /// Create email service from config. Returns `None` when SMTP is not
    /// configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.email_configured() {
            tracing::debug!("SMTP not configured; submission notifications disabled");
            return None;
        }
        let host = config.smtp_host.as_deref()?;
        let from = config.smtp_from.clone()?;
        let port = config.smtp_port.unwrap_or(587);

        let credentials = match (&config.smtp_user, &config.smtp_password) {
            (Some(user), Some(password)) => {
                Some(Credentials::new(user.clone(), password.clone()))
            }
            _ => None,
        };

        let mailer = if config.smtp_tls {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host).ok()?.port(port);
            if let Some(credentials) = credentials {
                builder = builder.credentials(credentials);
            }
            tracing::info!(host, port, "Email service initialized (SMTP with STARTTLS)");
            builder.build()
        } else {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host).port(port);
            if let Some(credentials) = credentials {
                builder = builder.credentials(credentials);
            }
            tracing::info!(host, port, "Email service initialized (SMTP)");
            builder.build()
        };

        Some(Self {
            mailer: Arc::new(mailer),
            from,
        })
    }

    /// Send the submission summary to the project's recipient. Failures are
    /// returned as strings; callers log them and carry on.
    pub async fn send_submission_notification(
        &self,
        recipient: &str,
        record: &SubmissionRecord,
    ) -> Result<(), String> {
        let to: Mailbox = recipient
            .parse()
            .map_err(|e| format!("Invalid recipient address: {}", e))?;
        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| format!("Invalid SMTP_FROM: {}", e))?;

        let subject = format!(
            "Media Verification - {} - {}",
            record.project_name, record.user_name
        );
        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(render_summary(record))
            .map_err(|e| e.to_string())?;

        self.mailer.send(email).await.map_err(|e| e.to_string())?;
        tracing::info!(project = %record.project_name, "Submission notification sent");
        Ok(())
    }
}

/// Plain-text summary of an admitted submission, with the full record
/// appended for audit.
fn render_summary(record: &SubmissionRecord) -> String {
    let full = serde_json::to_string_pretty(record)
        .unwrap_or_else(|_| "<unserializable record>".to_string());
    format!(
        "Media Verification Submission\n\
         \n\
         Project: {}\n\
         Name: {}\n\
         Email: {}\n\
         User ID: {}\n\
         Submitted At: {}\n\
         Files: {}\n\
         \n\
         {}\n",
        record.project_name,
        record.user_name,
        record.user_email,
        record.user_id,
        record.submitted_at.to_rfc3339(),
        record.files.len(),
        full
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;
    use verigate_core::models::SubmissionFile;

    #[test]
    fn summary_names_project_and_counts_files() {
        let record = SubmissionRecord {
            project_id: Uuid::new_v4(),
            project_name: "Field survey".to_string(),
            user_name: "Ada".to_string(),
            user_email: "ada@example.com".to_string(),
            user_id: "12345".to_string(),
            submitted_at: Utc::now(),
            files: vec![SubmissionFile {
                filename: "shot.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                size: 1024,
                metadata: json!({ "kind": "image" }),
                validation: json!({ "hardPass": true }),
            }],
        };
        let summary = render_summary(&record);
        assert!(summary.contains("Project: Field survey"));
        assert!(summary.contains("Files: 1"));
        assert!(summary.contains("shot.jpg"));
    }
}
