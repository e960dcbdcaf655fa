//! HTTP adapters for the submission pipeline
//!
//! Same requests the generated runtime sends from the browser, issued with
//! `reqwest` so leads can be replayed or submitted server-side.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::value_objects::ConnectionSettings;
use crate::ports::outbound::{IpLookup, LeadStore, RepositoryError, SideChannelError, WebhookNotifier};
use crate::runtime::IP_LOOKUP_URL;
use crate::submission::{LeadContext, LeadRow, SubmissionPipeline, WebhookPayload};

const SIDE_CHANNEL_TIMEOUT: Duration = Duration::from_secs(5);
const INSERT_TIMEOUT: Duration = Duration::from_secs(15);

fn transport(e: reqwest::Error) -> SideChannelError {
    SideChannelError::Transport(e.to_string())
}

/// Public IP lookup returning `{ "ip": "…" }`
pub struct HttpIpLookup {
    client: reqwest::Client,
    url: String,
}

impl HttpIpLookup {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_url(client, IP_LOOKUP_URL)
    }

    pub fn with_url(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[derive(Deserialize)]
struct IpResponse {
    ip: String,
}

#[async_trait]
impl IpLookup for HttpIpLookup {
    async fn lookup(&self) -> Result<String, SideChannelError> {
        let resp = self
            .client
            .get(&self.url)
            .timeout(SIDE_CHANNEL_TIMEOUT)
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(SideChannelError::Status(resp.status().as_u16()));
        }
        let body: IpResponse = resp
            .json()
            .await
            .map_err(|e| SideChannelError::Decode(e.to_string()))?;
        if body.ip.is_empty() {
            return Err(SideChannelError::Decode("empty ip".into()));
        }
        Ok(body.ip)
    }
}

/// PostgREST-style row insert: `POST {endpoint}/rest/v1/{table}`
pub struct RestLeadStore {
    client: reqwest::Client,
    connection: ConnectionSettings,
}

impl RestLeadStore {
    pub fn new(client: reqwest::Client, connection: ConnectionSettings) -> Self {
        Self { client, connection }
    }
}

#[async_trait]
impl LeadStore for RestLeadStore {
    async fn insert(&self, row: &LeadRow) -> Result<(), RepositoryError> {
        let key = &self.connection.access_key;
        let resp = self
            .client
            .post(self.connection.insert_url())
            .header("apikey", key)
            .header("Authorization", format!("Bearer {}", key))
            .header("Prefer", "return=minimal")
            .json(row)
            .timeout(INSERT_TIMEOUT)
            .send()
            .await
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().await.unwrap_or_default();
            Err(RepositoryError::QueryError(format!("status {}: {}", status.as_u16(), body)))
        }
    }
}

/// JSON POST without retry or signature
pub struct HttpWebhookNotifier {
    client: reqwest::Client,
}

impl HttpWebhookNotifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookNotifier for HttpWebhookNotifier {
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), SideChannelError> {
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(payload)
            .timeout(SIDE_CHANNEL_TIMEOUT)
            .send()
            .await
            .map_err(transport)?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(SideChannelError::Status(resp.status().as_u16()))
        }
    }
}

/// Pipeline wired to the same endpoints a generated document talks to
pub fn http_pipeline(
    client: reqwest::Client,
    context: LeadContext,
    connection: ConnectionSettings,
) -> SubmissionPipeline {
    SubmissionPipeline::new(
        context,
        Arc::new(HttpIpLookup::new(client.clone())),
        Arc::new(RestLeadStore::new(client.clone(), connection)),
    )
    .with_webhook(Arc::new(HttpWebhookNotifier::new(client)))
}
