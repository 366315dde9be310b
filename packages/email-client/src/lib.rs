//! REST client for the Subly email notification service
//!
//! The service is a separate process that renders and delivers host
//! notifications. This crate only knows its HTTP contract.
//!
//! # Example
//!
//! ```rust,ignore
//! use email_client::{EmailServiceClient, ListingSummary};
//!
//! let client = EmailServiceClient::from_env();
//! client
//!     .send_listing_expired("host@example.com", "Dana", &ListingSummary {
//!         id: "42".into(),
//!         title: "Sunny room near campus".into(),
//!     })
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{EmailError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_SERVICE_URL: &str = "http://localhost:8001";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Client for the email notification service.
#[derive(Clone, Debug)]
pub struct EmailServiceClient {
    http_client: Client,
    base_url: String,
    frontend_url: String,
}

impl EmailServiceClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: trim_slash(base_url.into()),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
        }
    }

    /// Create from `EMAIL_SERVICE_URL` and `FRONTEND_URL`, falling back to local defaults.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("EMAIL_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.into());
        let frontend_url =
            std::env::var("FRONTEND_URL").unwrap_or_else(|_| DEFAULT_FRONTEND_URL.into());
        Self::new(base_url).with_frontend_url(frontend_url)
    }

    /// Base URL of the frontend, used to build links inside emails.
    pub fn with_frontend_url(mut self, url: impl Into<String>) -> Self {
        self.frontend_url = trim_slash(url.into());
        self
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn frontend_url(&self) -> &str {
        &self.frontend_url
    }

    /// Post a request to the endpoint of its template.
    pub async fn send(&self, request: &EmailRequest) -> Result<ServiceResponse> {
        let endpoint = request.template.endpoint();
        let url = format!("{}{}", self.base_url, endpoint);

        debug!(endpoint, recipient = %request.recipient_email, "Sending email notification");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                endpoint,
                status = status.as_u16(),
                body = %body,
                "Email service rejected notification"
            );
            return Err(EmailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: ServiceResponse = response
            .json()
            .await
            .map_err(|e| EmailError::Parse(e.to_string()))?;

        debug!(endpoint, message = %result.message, "Email notification sent");
        Ok(result)
    }

    pub async fn send_listing_added(
        &self,
        host_email: &str,
        host_name: &str,
        listing: &ListingSummary,
    ) -> Result<ServiceResponse> {
        let data = TemplateData {
            host_name: host_name.to_string(),
            listing_title: listing.title.clone(),
            listing_id: Some(listing.id.clone()),
            listing_url: Some(self.listing_url(&listing.id)),
            dashboard_url: None,
        };
        self.send(&self.request(host_email, Template::ListingAdded, data))
            .await
    }

    pub async fn send_listing_edited(
        &self,
        host_email: &str,
        host_name: &str,
        listing: &ListingSummary,
    ) -> Result<ServiceResponse> {
        let data = TemplateData {
            host_name: host_name.to_string(),
            listing_title: listing.title.clone(),
            listing_id: Some(listing.id.clone()),
            listing_url: Some(self.listing_url(&listing.id)),
            dashboard_url: None,
        };
        self.send(&self.request(host_email, Template::ListingEdited, data))
            .await
    }

    pub async fn send_listing_deleted(
        &self,
        host_email: &str,
        host_name: &str,
        listing: &ListingSummary,
    ) -> Result<ServiceResponse> {
        let data = TemplateData {
            host_name: host_name.to_string(),
            listing_title: listing.title.clone(),
            dashboard_url: Some(self.dashboard_url()),
            ..Default::default()
        };
        self.send(&self.request(host_email, Template::ListingDeleted, data))
            .await
    }

    /// Tell a host their listing passed its end date and was taken down.
    pub async fn send_listing_expired(
        &self,
        host_email: &str,
        host_name: &str,
        listing: &ListingSummary,
    ) -> Result<ServiceResponse> {
        let data = TemplateData {
            host_name: host_name.to_string(),
            listing_title: listing.title.clone(),
            dashboard_url: Some(self.dashboard_url()),
            ..Default::default()
        };
        self.send(&self.request(host_email, Template::ListingExpired, data))
            .await
    }

    /// Check that the service is up.
    pub async fn health(&self) -> Result<ServiceResponse> {
        let response = self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| EmailError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| EmailError::Parse(e.to_string()))
    }

    fn request(&self, recipient: &str, template: Template, data: TemplateData) -> EmailRequest {
        EmailRequest {
            recipient_email: recipient.to_string(),
            template,
            data,
        }
    }

    fn listing_url(&self, listing_id: &str) -> String {
        format!("{}/listings/{}", self.frontend_url, listing_id)
    }

    fn dashboard_url(&self) -> String {
        format!("{}/my-listings", self.frontend_url)
    }
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
