//! Saved form commands

use chrono::{DateTime, Utc};
use colored::Colorize;
use leadform_core::{FormConfig, ServiceDefinition};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::{ApiClient, FormFile};
use crate::output::OutputFormat;
use crate::FormCommands;

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedForm {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub service: ServiceDefinition,
    pub config: FormConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Tabled)]
struct FormRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Multi-step")]
    multi_step: bool,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&SavedForm> for FormRow {
    fn from(form: &SavedForm) -> Self {
        Self {
            id: form.id.clone(),
            name: form.name.clone(),
            service: form.service.name.clone(),
            fields: form.service.fields.len(),
            multi_step: form.config.multi_step,
            updated: form.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SaveBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    service: &'a ServiceDefinition,
    config: &'a FormConfig,
}

/// A new form is named after its file when no name is given
fn default_name(file: &std::path::Path, service: &ServiceDefinition) -> String {
    file.file_stem()
        .and_then(|s| s.to_str())
        .map(String::from)
        .unwrap_or_else(|| service.name.clone())
}

pub async fn handle(action: FormCommands, client: &ApiClient, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        FormCommands::List => {
            let forms: Vec<SavedForm> = client.get("/forms").await?;
            format.print_list(&forms, |f| FormRow::from(f))?;
        }
        FormCommands::Get { id } => {
            let form: SavedForm = client.get(&format!("/forms/{}", id)).await?;
            format.print(&form)?;
        }
        FormCommands::Save { file, name, id } => {
            let form = FormFile::load(&file).await?;
            let saved: SavedForm = match id {
                Some(id) => {
                    let body = SaveBody {
                        name: name.as_deref(),
                        service: &form.service,
                        config: &form.config,
                    };
                    client.put(&format!("/forms/{}", id), &body).await?
                }
                None => {
                    let name = name.unwrap_or_else(|| default_name(&file, &form.service));
                    let body = SaveBody {
                        name: Some(&name),
                        service: &form.service,
                        config: &form.config,
                    };
                    client.post("/forms", &body).await?
                }
            };
            println!("{} Saved form {} ({})", "✓".green(), saved.name.bold(), saved.id);
        }
        FormCommands::Delete { id } => {
            client.delete(&format!("/forms/{}", id)).await?;
            println!("{} Deleted form {}", "✓".green(), id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadform_core::{FieldDefinition, FieldType};
    use std::path::Path;

    fn service() -> ServiceDefinition {
        ServiceDefinition::new(
            "consulenza",
            vec![FieldDefinition::new("nome", "Nome", FieldType::Text)],
        )
    }

    #[test]
    fn test_row_from_saved_form() {
        let json = serde_json::json!({
            "id": "f1",
            "tenant_id": "t1",
            "name": "Landing",
            "service": service(),
            "config": FormConfig::new("consulenza", "t1"),
            "created_at": "2026-03-01T10:00:00Z",
            "updated_at": "2026-03-02T11:30:00Z",
        });
        let form: SavedForm = serde_json::from_value(json).unwrap();
        let row = FormRow::from(&form);
        assert_eq!(row.service, "consulenza");
        assert_eq!(row.fields, 1);
        assert_eq!(row.updated, "2026-03-02 11:30");
    }

    #[test]
    fn test_default_name_from_file() {
        assert_eq!(default_name(Path::new("forms/landing.yaml"), &service()), "landing");
        assert_eq!(default_name(Path::new(""), &service()), "consulenza");
    }

    #[test]
    fn test_update_body_omits_missing_name() {
        let service = service();
        let config = FormConfig::new("consulenza", "t1");
        let body = SaveBody { name: None, service: &service, config: &config };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("name").is_none());
        assert_eq!(json["service"]["name"], "consulenza");
    }
}
