use axum::{
    extract::Path,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::email::ResendMailer;
use crate::error::ApiError;
use crate::handlers::failure_with_values;
use crate::workflows::contact::{send_contact, send_inquiry, ContactForm, InquiryForm};

#[derive(Debug, Deserialize)]
pub struct ContactFormData {
    #[serde(rename = "contact-name")]
    pub name: Option<String>,
    #[serde(rename = "contact-email")]
    pub email: Option<String>,
    #[serde(rename = "contact-subject")]
    pub subject: Option<String>,
    #[serde(rename = "contact-message")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InquiryFormData {
    #[serde(rename = "inquiry-name")]
    pub name: Option<String>,
    #[serde(rename = "inquiry-email")]
    pub email: Option<String>,
    #[serde(rename = "inquiry-phone")]
    pub phone: Option<String>,
    #[serde(rename = "inquiry-message")]
    pub message: Option<String>,
    #[serde(rename = "propertyTitle")]
    pub property_title: Option<String>,
}

/// POST /contact - general contact form.
pub async fn contact(Form(form): Form<ContactFormData>) -> Response {
    let submission = ContactForm {
        name: form.name.clone().unwrap_or_default(),
        email: form.email.clone().unwrap_or_default(),
        subject: form.subject.clone(),
        message: form.message.clone().unwrap_or_default(),
    };

    let values = json!({
        "name": submission.name,
        "email": submission.email,
        "subject": submission.subject,
        "message": submission.message,
    });

    match send_contact(ResendMailer::shared(), &submission).await {
        Ok(delivery_id) => Json(json!({
            "success": true,
            "data": { "messageSent": true, "deliveryId": delivery_id }
        }))
        .into_response(),
        Err(e) => failure_with_values(ApiError::from(e), values),
    }
}

/// POST /properties/:slug/inquiry - inquiry about one property.
pub async fn inquiry(Path(slug): Path<String>, Form(form): Form<InquiryFormData>) -> Response {
    let submission = InquiryForm {
        name: form.name.clone().unwrap_or_default(),
        email: form.email.clone().unwrap_or_default(),
        phone: form.phone.clone(),
        message: form.message.clone().unwrap_or_default(),
        property_title: form.property_title.clone().unwrap_or_default(),
        property_slug: slug,
    };

    let values = json!({
        "name": submission.name,
        "email": submission.email,
        "phone": submission.phone,
        "message": submission.message,
    });

    match send_inquiry(ResendMailer::shared(), &submission).await {
        Ok(delivery_id) => Json(json!({
            "success": true,
            "data": { "inquirySent": true, "deliveryId": delivery_id }
        }))
        .into_response(),
        Err(e) => failure_with_values(ApiError::from(e), values),
    }
}
