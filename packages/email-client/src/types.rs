//! Request and response payloads of the email service.

use serde::{Deserialize, Serialize};

/// Templates the email service knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    ListingAdded,
    ListingEdited,
    ListingDeleted,
    ListingExpired,
}

impl Template {
    /// Service endpoint that delivers this template.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Template::ListingAdded => "/send-listing-added-notification",
            Template::ListingEdited => "/send-listing-edited-notification",
            Template::ListingDeleted => "/send-listing-deleted-notification",
            Template::ListingExpired => "/send-listing-expired-notification",
        }
    }
}

/// Envelope posted to every notification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailRequest {
    pub recipient_email: String,
    pub template: Template,
    pub data: TemplateData,
}

/// Template variables. Fields a template doesn't use are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateData {
    pub host_name: String,
    pub listing_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_url: Option<String>,
}

/// Listing fields needed to render a notification.
#[derive(Debug, Clone)]
pub struct ListingSummary {
    pub id: String,
    pub title: String,
}

/// Body returned by the service on success and by `/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}
