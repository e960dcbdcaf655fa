//! Submission pipeline
//!
//! collect -> IP lookup -> persist -> webhook -> outcome, awaited in order.
//! Only persistence can fail the submission; the IP lookup and the webhook
//! are side channels whose failures are logged and absorbed.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::domain::FormConfig;
use crate::ports::outbound::{IpLookup, LeadStore, RepositoryError, SideChannelError, WebhookNotifier};
use crate::runtime::{RuntimeMessages, IP_SENTINEL};

/// Flat name -> value map of a submitted form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormPayload(BTreeMap<String, String>);

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for FormPayload {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Constants a generated form carries about where its leads go
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeadContext {
    pub tenant_id: String,
    pub service: String,
    pub thank_you_url: Option<String>,
    pub webhook_url: Option<String>,
    pub success_message: String,
}

impl LeadContext {
    pub fn from_config(config: &FormConfig) -> Self {
        Self {
            tenant_id: config.integration.tenant_id.clone(),
            service: config.service.clone(),
            thank_you_url: config.integration.thank_you_url().map(str::to_string),
            webhook_url: config.integration.webhook_url().map(str::to_string),
            success_message: RuntimeMessages::for_config(config).success,
        }
    }

    fn outcome(&self) -> SubmissionOutcome {
        match &self.thank_you_url {
            Some(url) => SubmissionOutcome::Redirect(url.clone()),
            None => SubmissionOutcome::InlineSuccess(self.success_message.clone()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
}

/// Row inserted into the lead store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRow {
    pub tenant_id: String,
    pub data: FormPayload,
    pub service: String,
    pub status: LeadStatus,
    #[serde(with = "millis")]
    pub created_at: DateTime<Utc>,
}

/// RFC 3339 UTC with milliseconds and `Z`, the form of `submitted_at`
pub fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

mod millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::timestamp(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Webhook body: the form data with tenant, service and timestamp on top
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WebhookPayload(BTreeMap<String, String>);

impl WebhookPayload {
    pub fn new(data: &FormPayload, context: &LeadContext, created_at: &str) -> Self {
        let mut fields = data.0.clone();
        fields.insert("tenant_id".into(), context.tenant_id.clone());
        fields.insert("service".into(), context.service.clone());
        fields.insert("created_at".into(), created_at.to_string());
        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

/// Result of a side channel that must never fail the submission
pub struct BestEffort<T> {
    channel: &'static str,
    result: Result<T, SideChannelError>,
}

impl<T> BestEffort<T> {
    pub fn new(channel: &'static str, result: Result<T, SideChannelError>) -> Self {
        Self { channel, result }
    }

    /// Logs a failure and drops it
    pub fn settle(self) -> Option<T> {
        match self.result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(channel = self.channel, error = %e, "side channel failed");
                None
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Redirect(String),
    InlineSuccess(String),
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("lead persistence failed: {0}")]
    Persistence(#[from] RepositoryError),
}

pub struct SubmissionPipeline {
    context: LeadContext,
    ip_lookup: Arc<dyn IpLookup>,
    store: Arc<dyn LeadStore>,
    webhook: Option<Arc<dyn WebhookNotifier>>,
}

impl SubmissionPipeline {
    pub fn new(context: LeadContext, ip_lookup: Arc<dyn IpLookup>, store: Arc<dyn LeadStore>) -> Self {
        Self {
            context,
            ip_lookup,
            store,
            webhook: None,
        }
    }

    pub fn with_ip_lookup(mut self, ip_lookup: Arc<dyn IpLookup>) -> Self {
        self.ip_lookup = ip_lookup;
        self
    }

    pub fn with_webhook(mut self, notifier: Arc<dyn WebhookNotifier>) -> Self {
        self.webhook = Some(notifier);
        self
    }

    pub fn context(&self) -> &LeadContext {
        &self.context
    }

    /// Runs the pipeline for one collected payload. Every call performs its
    /// own IP lookup, retries included.
    pub async fn submit(
        &self,
        mut payload: FormPayload,
        user_agent: &str,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let ip = BestEffort::new("ip_lookup", self.ip_lookup.lookup().await)
            .settle()
            .unwrap_or_else(|| IP_SENTINEL.to_string());

        let created_at = Utc::now();
        let stamp = timestamp(&created_at);
        payload.insert("ip_address", ip);
        payload.insert("user_agent", user_agent);
        payload.insert("submitted_at", stamp.as_str());

        let row = LeadRow {
            tenant_id: self.context.tenant_id.clone(),
            data: payload,
            service: self.context.service.clone(),
            status: LeadStatus::New,
            created_at,
        };

        if let Err(e) = self.store.insert(&row).await {
            error!(
                tenant_id = %self.context.tenant_id,
                service = %self.context.service,
                error = %e,
                "lead persistence failed"
            );
            return Err(e.into());
        }
        info!(
            tenant_id = %self.context.tenant_id,
            service = %self.context.service,
            "lead persisted"
        );

        match (self.context.webhook_url.as_deref(), &self.webhook) {
            (Some(url), Some(notifier)) => {
                let body = WebhookPayload::new(&row.data, &self.context, &stamp);
                BestEffort::new("webhook", notifier.notify(url, &body).await).settle();
            }
            (Some(_), None) => debug!("webhook configured without a notifier, skipping"),
            _ => {}
        }

        Ok(self.context.outcome())
    }
}
