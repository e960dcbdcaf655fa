//! Repository implementations
//!
//! In-memory stores for tests and ephemeral servers, and a JSON-file store
//! laid out as `<root>/<hex(tenant)>/<hex(id)>.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::domain::aggregates::SavedFormConfig;
use crate::domain::value_objects::EntityId;
use crate::ports::outbound::{FormConfigRepository, LeadStore, RepositoryError};
use crate::submission::LeadRow;

type Key = (String, String);

fn key(tenant_id: &str, id: &EntityId) -> Key {
    (tenant_id.to_string(), id.as_str().to_string())
}

/// In-memory saved form repository
#[derive(Default)]
pub struct InMemoryFormConfigRepository {
    forms: RwLock<HashMap<Key, SavedFormConfig>>,
}

impl InMemoryFormConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormConfigRepository for InMemoryFormConfigRepository {
    async fn find_by_id(
        &self,
        tenant_id: &str,
        id: &EntityId,
    ) -> Result<Option<SavedFormConfig>, RepositoryError> {
        Ok(self.forms.read().get(&key(tenant_id, id)).cloned())
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<SavedFormConfig>, RepositoryError> {
        let mut forms: Vec<SavedFormConfig> = self
            .forms
            .read()
            .values()
            .filter(|f| f.tenant_id() == tenant_id)
            .cloned()
            .collect();
        forms.sort_by_key(|f| f.created_at());
        Ok(forms)
    }

    async fn save(&self, form: &SavedFormConfig) -> Result<(), RepositoryError> {
        self.forms
            .write()
            .insert(key(form.tenant_id(), form.id()), form.clone());
        Ok(())
    }

    async fn delete(&self, tenant_id: &str, id: &EntityId) -> Result<(), RepositoryError> {
        self.forms
            .write()
            .remove(&key(tenant_id, id))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// Saved forms as pretty-printed JSON files
pub struct FileFormConfigRepository {
    root: PathBuf,
}

impl FileFormConfigRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Tenant and id are hex-encoded: distinct ids never share a path and
    /// neither can leave the root directory
    fn tenant_dir(&self, tenant_id: &str) -> PathBuf {
        self.root.join(hex::encode(tenant_id))
    }

    fn form_path(&self, tenant_id: &str, id: &EntityId) -> PathBuf {
        self.tenant_dir(tenant_id)
            .join(format!("{}.json", hex::encode(id.as_str())))
    }

    async fn read_form(path: &Path) -> Result<SavedFormConfig, RepositoryError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| RepositoryError::SerializationError(e.to_string()))
    }

    /// The stored record, only when it belongs to `tenant_id`
    async fn read_owned(
        &self,
        tenant_id: &str,
        id: &EntityId,
    ) -> Result<Option<SavedFormConfig>, RepositoryError> {
        let path = self.form_path(tenant_id, id);
        let form = match tokio::fs::try_exists(&path).await {
            Ok(true) => Self::read_form(&path).await?,
            Ok(false) => return Ok(None),
            Err(e) => return Err(RepositoryError::ConnectionError(e.to_string())),
        };
        if form.tenant_id() != tenant_id || form.id() != id {
            warn!(path = %path.display(), tenant_id = %tenant_id, "stored form belongs to another owner");
            return Ok(None);
        }
        Ok(Some(form))
    }
}

fn is_not_found(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::NotFound
}

#[async_trait]
impl FormConfigRepository for FileFormConfigRepository {
    async fn find_by_id(
        &self,
        tenant_id: &str,
        id: &EntityId,
    ) -> Result<Option<SavedFormConfig>, RepositoryError> {
        self.read_owned(tenant_id, id).await
    }

    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<SavedFormConfig>, RepositoryError> {
        let dir = self.tenant_dir(tenant_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if is_not_found(&e) => return Ok(Vec::new()),
            Err(e) => return Err(RepositoryError::ConnectionError(e.to_string())),
        };

        let mut forms = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let form = Self::read_form(&path).await?;
            if form.tenant_id() == tenant_id {
                forms.push(form);
            } else {
                warn!(path = %path.display(), tenant_id = %tenant_id, "skipping form of another tenant");
            }
        }
        forms.sort_by_key(|f| f.created_at());
        Ok(forms)
    }

    async fn save(&self, form: &SavedFormConfig) -> Result<(), RepositoryError> {
        let dir = self.tenant_dir(form.tenant_id());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        let json = serde_json::to_vec_pretty(form)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        let path = self.form_path(form.tenant_id(), form.id());
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| RepositoryError::ConnectionError(e.to_string()))?;

        info!(path = %path.display(), "saved form configuration written");
        Ok(())
    }

    async fn delete(&self, tenant_id: &str, id: &EntityId) -> Result<(), RepositoryError> {
        if self.read_owned(tenant_id, id).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }
        match tokio::fs::remove_file(self.form_path(tenant_id, id)).await {
            Ok(()) => Ok(()),
            Err(e) if is_not_found(&e) => Err(RepositoryError::NotFound),
            Err(e) => Err(RepositoryError::ConnectionError(e.to_string())),
        }
    }
}

/// Lead store that keeps inserted rows in memory
#[derive(Default)]
pub struct InMemoryLeadStore {
    rows: RwLock<Vec<LeadRow>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<LeadRow> {
        self.rows.read().clone()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn insert(&self, row: &LeadRow) -> Result<(), RepositoryError> {
        self.rows.write().push(row.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FieldDefinition, FieldType};
    use crate::domain::{FormConfig, ServiceDefinition};

    fn saved(tenant: &str, name: &str) -> SavedFormConfig {
        let service = ServiceDefinition::new(
            "consulenza",
            vec![FieldDefinition::new("nome", "Nome", FieldType::Text).required()],
        );
        SavedFormConfig::create(tenant, name, service, FormConfig::new("consulenza", tenant))
    }

    async fn exercise(repo: &dyn FormConfigRepository) {
        let first = saved("tenant-a", "Landing");
        let second = saved("tenant-a", "Footer");
        let other = saved("tenant-b", "Landing");
        for form in [&first, &second, &other] {
            repo.save(form).await.unwrap();
        }

        let found = repo.find_by_id("tenant-a", first.id()).await.unwrap();
        assert_eq!(found.as_ref(), Some(&first));
        // tenants are isolated
        assert!(repo.find_by_id("tenant-b", first.id()).await.unwrap().is_none());

        let listed = repo.list_by_tenant("tenant-a").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|f| f.tenant_id() == "tenant-a"));

        repo.delete("tenant-a", first.id()).await.unwrap();
        assert!(repo.find_by_id("tenant-a", first.id()).await.unwrap().is_none());
        assert_eq!(
            repo.delete("tenant-a", first.id()).await,
            Err(RepositoryError::NotFound)
        );
        assert!(repo.list_by_tenant("tenant-z").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_repository() {
        exercise(&InMemoryFormConfigRepository::new()).await;
    }

    #[tokio::test]
    async fn test_file_repository() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileFormConfigRepository::new(dir.path());
        exercise(&repo).await;
    }

    #[tokio::test]
    async fn test_file_repository_confines_paths() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileFormConfigRepository::new(dir.path().join("forms"));
        let form = saved("../escape", "x");
        repo.save(&form).await.unwrap();

        let expected = dir
            .path()
            .join("forms")
            .join(hex::encode("../escape"))
            .join(format!("{}.json", hex::encode(form.id().as_str())));
        assert!(expected.exists());
        assert_eq!(
            repo.find_by_id("../escape", form.id()).await.unwrap(),
            Some(form)
        );
    }

    #[tokio::test]
    async fn test_file_repository_keeps_similar_tenants_apart() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileFormConfigRepository::new(dir.path());
        let dotted = saved("acme.it", "Landing");
        repo.save(&dotted).await.unwrap();

        assert!(repo.find_by_id("acme-it", dotted.id()).await.unwrap().is_none());
        assert!(repo.list_by_tenant("acme-it").await.unwrap().is_empty());
        assert_eq!(
            repo.delete("acme-it", dotted.id()).await,
            Err(RepositoryError::NotFound)
        );
        assert_eq!(
            repo.find_by_id("acme.it", dotted.id()).await.unwrap(),
            Some(dotted)
        );
    }

    #[tokio::test]
    async fn test_file_repository_ignores_foreign_records() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileFormConfigRepository::new(dir.path());
        let foreign = saved("tenant-b", "Landing");

        // a record copied into another tenant's directory is not served there
        let misplaced = repo.form_path("tenant-a", foreign.id());
        tokio::fs::create_dir_all(misplaced.parent().unwrap()).await.unwrap();
        tokio::fs::write(&misplaced, serde_json::to_vec(&foreign).unwrap())
            .await
            .unwrap();

        assert!(repo.find_by_id("tenant-a", foreign.id()).await.unwrap().is_none());
        assert!(repo.list_by_tenant("tenant-a").await.unwrap().is_empty());
        assert_eq!(
            repo.delete("tenant-a", foreign.id()).await,
            Err(RepositoryError::NotFound)
        );
        assert!(misplaced.exists());
    }
}
