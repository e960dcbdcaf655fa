//! CLI Commands

pub mod config;
pub mod forms;
pub mod generate;

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use leadform_core::{FormConfig, ServiceDefinition};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// API client
pub struct ApiClient {
    pub base_url: String,
    pub tenant_id: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, tenant_id: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.map(String::from),
            client: reqwest::Client::new(),
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self.client.get(self.tenant_url(path)?).send().await?;
        Self::data(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let resp = self.client.post(self.tenant_url(path)?).json(body).send().await?;
        Self::data(resp).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let resp = self.client.put(self.tenant_url(path)?).json(body).send().await?;
        Self::data(resp).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<()> {
        let resp = self.client.delete(self.tenant_url(path)?).send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::failure(resp).await)
        }
    }

    /// Raw body of a tenant endpoint, for `text/html` documents
    pub async fn get_text(&self, path: &str) -> anyhow::Result<String> {
        let resp = self.client.get(self.tenant_url(path)?).send().await?;
        if resp.status().is_success() {
            Ok(resp.text().await?)
        } else {
            Err(Self::failure(resp).await)
        }
    }

    async fn data<T: DeserializeOwned>(resp: reqwest::Response) -> anyhow::Result<T> {
        if !resp.status().is_success() {
            return Err(Self::failure(resp).await);
        }
        let json: serde_json::Value = resp.json().await?;
        match json.get("data") {
            Some(data) => Ok(serde_json::from_value(data.clone())?),
            None => bail!("No data in response"),
        }
    }

    /// Error from the `ApiResponse` envelope, or the bare status
    async fn failure(resp: reqwest::Response) -> anyhow::Error {
        let status = resp.status();
        let message = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|json| json["error"]["message"].as_str().map(String::from));
        match message {
            Some(message) => anyhow!("{} ({})", message, status),
            None => anyhow!("request failed with {}", status),
        }
    }

    fn tenant_url(&self, path: &str) -> anyhow::Result<String> {
        let tenant = self
            .tenant_id
            .as_deref()
            .ok_or_else(|| anyhow!("tenant id not set (use --tenant-id or LEADFORM_TENANT_ID)"))?;
        Ok(format!("{}/tenants/{}{}", self.base_url, tenant, path))
    }
}

/// Service and configuration of one form, as kept in definition files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFile {
    pub service: ServiceDefinition,
    pub config: FormConfig,
}

impl FormFile {
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?;
        Self::parse(path, &content).with_context(|| format!("invalid form file {}", path.display()))
    }

    /// Format picked by extension
    pub fn parse(path: &Path, content: &str) -> anyhow::Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        Ok(match ext.as_deref() {
            Some("yaml" | "yml") => serde_yaml::from_str(content)?,
            Some("json") => serde_json::from_str(content)?,
            Some("toml") => toml::from_str(content)?,
            _ => bail!("unsupported form file extension, expected .yaml, .yml, .json or .toml"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadform_core::FieldType;
    use std::path::PathBuf;

    const YAML: &str = r#"
service:
  name: consulenza
  fields:
    - name: nome
      label: Nome
      type: text
      required: true
    - name: servizio
      label: Servizio
      type: select
      options: [Base, Premium]
config:
  service: consulenza
  multi_step: true
  layout:
    servizio: { step: 2 }
  consent:
    privacy_enabled: true
    privacy_url: https://example.com/privacy
  integration:
    tenant_id: tenant-1
"#;

    #[test]
    fn test_parse_yaml() {
        let form = FormFile::parse(&PathBuf::from("form.yaml"), YAML).unwrap();
        assert_eq!(form.service.fields.len(), 2);
        assert_eq!(form.service.fields[1].field_type, FieldType::Select);
        assert!(form.config.multi_step);
        assert_eq!(form.config.assignment("servizio").effective_step(), 2);
        assert!(form.config.validate(&form.service).is_ok());
    }

    #[test]
    fn test_parse_json_and_toml() {
        let json = r#"{
            "service": { "name": "s", "fields": [{ "name": "email", "label": "Email", "type": "email" }] },
            "config": { "service": "s", "integration": { "tenant_id": "t" } }
        }"#;
        let form = FormFile::parse(&PathBuf::from("form.JSON"), json).unwrap();
        assert_eq!(form.service.fields[0].field_type, FieldType::Email);

        let toml = r#"
            [service]
            name = "s"

            [[service.fields]]
            name = "telefono"
            label = "Telefono"
            type = "tel"

            [config]
            service = "s"
        "#;
        let form = FormFile::parse(&PathBuf::from("form.toml"), toml).unwrap();
        assert_eq!(form.service.fields[0].name, "telefono");
        assert_eq!(form.config.integration.tenant_id, "");
    }

    #[test]
    fn test_unknown_extension_rejected() {
        assert!(FormFile::parse(&PathBuf::from("form.txt"), YAML).is_err());
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.yml");
        tokio::fs::write(&path, YAML).await.unwrap();
        let form = FormFile::load(&path).await.unwrap();
        assert_eq!(form.service.name, "consulenza");

        let err = FormFile::load(&dir.path().join("missing.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_tenant_url_requires_tenant() {
        let client = ApiClient::new("http://localhost:8080/api/v1/", Some("t1"));
        assert_eq!(
            client.tenant_url("/forms").unwrap(),
            "http://localhost:8080/api/v1/tenants/t1/forms"
        );
        assert!(ApiClient::new("http://localhost:8080", None).tenant_url("/forms").is_err());
    }
}
