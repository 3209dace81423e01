use std::collections::HashMap;

use tracing::info;

use super::{is_valid_email, WorkflowError};
use crate::email::{escape_html, Mailer, OutboundEmail};

/// General contact form submission.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

/// Inquiry about a specific property.
#[derive(Debug, Clone, Default)]
pub struct InquiryForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub property_title: String,
    pub property_slug: String,
}

fn validate_sender(name: &str, email: &str, message: &str) -> Result<(), WorkflowError> {
    let mut field_errors = HashMap::new();
    if name.trim().is_empty() {
        field_errors.insert("name".to_string(), "Name is required".to_string());
    }
    if email.trim().is_empty() {
        field_errors.insert("email".to_string(), "Email is required".to_string());
    } else if !is_valid_email(email) {
        field_errors.insert(
            "email".to_string(),
            "Please provide a valid email address".to_string(),
        );
    }
    if message.trim().is_empty() {
        field_errors.insert("message".to_string(), "Message is required".to_string());
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::validation(
            "Please correct the errors in the form",
            field_errors,
        ))
    }
}

fn paragraphs(message: &str) -> String {
    escape_html(message).replace('\n', "<br>")
}

/// Validate and dispatch a contact-form message. Validation short-circuits
/// before any delivery-service request; reply-to is the submitter.
pub async fn send_contact(mailer: &dyn Mailer, form: &ContactForm) -> Result<String, WorkflowError> {
    validate_sender(&form.name, &form.email, &form.message)?;

    let email_config = &crate::config::config().email;
    let subject = match form.subject.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(subject) => format!("Contact Form: {}", subject),
        None => "New Contact Form Submission".to_string(),
    };

    let mut html = format!(
        "<h2>New Contact Form Submission</h2><hr>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>",
        escape_html(&form.name),
        escape_html(&form.email),
    );
    if let Some(subject_line) = &form.subject {
        if !subject_line.trim().is_empty() {
            html.push_str(&format!(
                "<p><strong>Subject:</strong> {}</p>",
                escape_html(subject_line)
            ));
        }
    }
    html.push_str(&format!(
        "<hr><p><strong>Message:</strong></p><p>{}</p>",
        paragraphs(&form.message)
    ));

    let delivery_id = mailer
        .send(&OutboundEmail {
            from: email_config.from_address.clone(),
            to: email_config.inquiry_recipients.clone(),
            subject,
            html,
            reply_to: Some(form.email.clone()),
        })
        .await?;

    info!(%delivery_id, "contact form dispatched");
    Ok(delivery_id)
}

/// Validate and dispatch a property inquiry.
pub async fn send_inquiry(mailer: &dyn Mailer, form: &InquiryForm) -> Result<String, WorkflowError> {
    validate_sender(&form.name, &form.email, &form.message)?;

    let email_config = &crate::config::config().email;
    let subject = format!("Inquiry: {}", form.property_title);

    let mut html = format!(
        "<h2>New Property Inquiry</h2>\
         <p><strong>Property:</strong> {} ({})</p><hr>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>",
        escape_html(&form.property_title),
        escape_html(&form.property_slug),
        escape_html(&form.name),
        escape_html(&form.email),
    );
    if let Some(phone) = form.phone.as_deref().filter(|s| !s.trim().is_empty()) {
        html.push_str(&format!(
            "<p><strong>Phone:</strong> {}</p>",
            escape_html(phone)
        ));
    }
    html.push_str(&format!(
        "<hr><p><strong>Message:</strong></p><p>{}</p>",
        paragraphs(&form.message)
    ));

    let delivery_id = mailer
        .send(&OutboundEmail {
            from: email_config.from_address.clone(),
            to: email_config.inquiry_recipients.clone(),
            subject,
            html,
            reply_to: Some(form.email.clone()),
        })
        .await?;

    info!(%delivery_id, slug = %form.property_slug, "inquiry dispatched");
    Ok(delivery_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::DeliveryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts sends; lets tests assert validation short-circuits delivery.
    #[derive(Default)]
    struct CountingMailer {
        sends: AtomicUsize,
    }

    #[async_trait]
    impl Mailer for CountingMailer {
        async fn send(&self, _email: &OutboundEmail) -> Result<String, DeliveryError> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            Ok("email_test_id".to_string())
        }
    }

    #[tokio::test]
    async fn missing_email_sends_nothing() {
        let mailer = CountingMailer::default();
        let form = ContactForm {
            name: "Visitor".to_string(),
            email: String::new(),
            subject: None,
            message: "Hello".to_string(),
        };

        let err = send_contact(&mailer, &form).await.unwrap_err();
        match err {
            WorkflowError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("email"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_contact_dispatches_once() {
        let mailer = CountingMailer::default();
        let form = ContactForm {
            name: "Visitor".to_string(),
            email: "visitor@example.com".to_string(),
            subject: Some("Viewing".to_string()),
            message: "I would like a viewing.".to_string(),
        };

        let id = send_contact(&mailer, &form).await.unwrap();
        assert_eq!(id, "email_test_id");
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn inquiry_validates_like_contact() {
        let mailer = CountingMailer::default();
        let form = InquiryForm {
            name: String::new(),
            email: "bad".to_string(),
            phone: None,
            message: String::new(),
            property_title: "Villa".to_string(),
            property_slug: "villa".to_string(),
        };

        let err = send_inquiry(&mailer, &form).await.unwrap_err();
        match err {
            WorkflowError::Validation { field_errors, .. } => {
                assert!(field_errors.contains_key("name"));
                assert!(field_errors.contains_key("email"));
                assert!(field_errors.contains_key("message"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(mailer.sends.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn message_newlines_become_breaks() {
        assert_eq!(paragraphs("a\nb"), "a<br>b");
    }
}
