//! Guardian notifications for absent students.

use async_trait::async_trait;

use crate::utils::email::{EmailService, OutgoingEmail};

pub const ABSENCE_SUBJECT: &str = "Absentee Notification";

/// Everything needed to tell a guardian that their child was absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsenceNotice {
    pub guardian_email: String,
    pub student_name: String,
    pub rrn: String,
    pub date: String,
}

impl AbsenceNotice {
    pub fn text_body(&self) -> String {
        format!(
            "Dear Guardian,\n\nYour child {} was absent on {}",
            self.student_name, self.date
        )
    }

    pub fn html_body(&self) -> String {
        format!(
            "<p>Dear Guardian,</p><p>Your child {} was absent on {}</p>",
            escape_html(&self.student_name),
            escape_html(&self.date)
        )
    }

    pub fn to_email(&self) -> OutgoingEmail {
        OutgoingEmail {
            to: self.guardian_email.clone(),
            subject: ABSENCE_SUBJECT.to_string(),
            html: self.html_body(),
            text: self.text_body(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuardianNotifier: Send + Sync {
    async fn notify_absence(&self, notice: &AbsenceNotice) -> anyhow::Result<()>;
}

#[async_trait]
impl GuardianNotifier for EmailService {
    async fn notify_absence(&self, notice: &AbsenceNotice) -> anyhow::Result<()> {
        self.send(&notice.to_email()).await?;
        Ok(())
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice() -> AbsenceNotice {
        AbsenceNotice {
            guardian_email: "parent@example.com".into(),
            student_name: "Asha <R>".into(),
            rrn: "21CS001".into(),
            date: "2024-03-01".into(),
        }
    }

    #[test]
    fn email_names_student_and_date() {
        let email = notice().to_email();
        assert_eq!(email.to, "parent@example.com");
        assert_eq!(email.subject, "Absentee Notification");
        assert!(email.text.contains("Your child Asha <R> was absent on 2024-03-01"));
        assert!(email.html.contains("Asha &lt;R&gt;"));
    }

    #[tokio::test]
    async fn disabled_email_service_accepts_notice() {
        let service =
            EmailService::from_config(&crate::config::MailConfig::disabled()).unwrap();
        assert!(service.notify_absence(&notice()).await.is_ok());
    }
}
