//! Key-value secret storage and the per-provider data kept in it.
//!
//! API keys live under a provider's credential alias; the user's saved model
//! ids live comma-joined under its model-list alias.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::ChatError;
use crate::registry::ProviderDescriptor;

/// Most models a user can save per provider
pub const MAX_SAVED_MODELS: usize = 3;

/// Key-value store for secrets
pub trait SecretStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn save(&self, key: &str, value: &str) -> Result<(), ChatError>;

    fn remove(&self, key: &str) -> Result<(), ChatError>;
}

/// In-memory store, for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ChatError> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ChatError> {
        self.values.write().remove(key);
        Ok(())
    }
}

/// TOML file store, rewritten on every change
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileSecretStore {
    /// Open the store at `path`; a missing or empty file starts empty
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ChatError> {
        let path = path.as_ref().to_path_buf();

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                ChatError::storage_with_source("Failed to read secrets file", e)
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                toml::from_str(&content).map_err(|e| {
                    ChatError::storage_with_source("Failed to parse secrets file", e)
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), ChatError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ChatError::storage_with_source("Failed to create data directory", e)
            })?;
        }

        let content = toml::to_string_pretty(values)
            .map_err(|e| ChatError::storage_with_source("Failed to serialize secrets", e))?;

        std::fs::write(&self.path, content)
            .map_err(|e| ChatError::storage_with_source("Failed to write secrets file", e))?;

        restrict_permissions(&self.path)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), ChatError> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| ChatError::storage_with_source("Failed to restrict secrets file", e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), ChatError> {
    Ok(())
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    // The in-memory map only changes once the file write succeeded
    fn save(&self, key: &str, value: &str) -> Result<(), ChatError> {
        let mut values = self.values.write();
        let mut next = values.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ChatError> {
        let mut values = self.values.write();
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key);
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

/// Where a provider's credential was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Stored,
    Env(&'static str),
}

/// Stored API key for a provider; blank values count as absent
pub fn stored_credential(store: &dyn SecretStore, provider: &ProviderDescriptor) -> Option<String> {
    store
        .get(provider.credential_alias)
        .filter(|k| !k.trim().is_empty())
}

/// API key for a provider, falling back to its environment variable
pub fn credential(store: &dyn SecretStore, provider: &ProviderDescriptor) -> Option<String> {
    credential_with_source(store, provider).map(|(key, _)| key)
}

pub fn credential_with_source(
    store: &dyn SecretStore,
    provider: &ProviderDescriptor,
) -> Option<(String, CredentialSource)> {
    if let Some(key) = stored_credential(store, provider) {
        return Some((key, CredentialSource::Stored));
    }

    std::env::var(provider.env_key)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .map(|k| (k, CredentialSource::Env(provider.env_key)))
}

/// Save an API key; blank keys are rejected
pub fn save_credential(
    store: &dyn SecretStore,
    provider: &ProviderDescriptor,
    key: &str,
) -> Result<(), ChatError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ChatError::configuration("API key cannot be empty"));
    }
    store.save(provider.credential_alias, key)
}

pub fn delete_credential(
    store: &dyn SecretStore,
    provider: &ProviderDescriptor,
) -> Result<(), ChatError> {
    store.remove(provider.credential_alias)
}

/// Saved model ids for a provider, in insertion order
pub fn saved_models(store: &dyn SecretStore, provider: &ProviderDescriptor) -> Vec<String> {
    store
        .get(provider.model_list_alias)
        .map(|joined| {
            joined
                .split(',')
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Result of [`add_model`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddModelOutcome {
    Added,
    /// Blank, or contains the list separator
    Invalid,
    Duplicate,
    Full,
}

/// Add a model id to the provider's list, at most [`MAX_SAVED_MODELS`]
pub fn add_model(
    store: &dyn SecretStore,
    provider: &ProviderDescriptor,
    model_id: &str,
) -> Result<AddModelOutcome, ChatError> {
    let model_id = model_id.trim();
    if model_id.is_empty() || model_id.contains(',') {
        return Ok(AddModelOutcome::Invalid);
    }

    let mut models = saved_models(store, provider);
    if models.iter().any(|m| m == model_id) {
        return Ok(AddModelOutcome::Duplicate);
    }
    if models.len() >= MAX_SAVED_MODELS {
        return Ok(AddModelOutcome::Full);
    }

    models.push(model_id.to_string());
    store.save(provider.model_list_alias, &models.join(","))?;
    Ok(AddModelOutcome::Added)
}

/// Remove a model id; returns whether it was present
pub fn remove_model(
    store: &dyn SecretStore,
    provider: &ProviderDescriptor,
    model_id: &str,
) -> Result<bool, ChatError> {
    let mut models = saved_models(store, provider);
    let before = models.len();
    models.retain(|m| m != model_id.trim());

    if models.len() == before {
        return Ok(false);
    }

    store.save(provider.model_list_alias, &models.join(","))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::find;

    #[test]
    fn test_blank_credential_is_absent() {
        let store = MemorySecretStore::new();
        let gemini = find("Gemini").unwrap();

        store.save(gemini.credential_alias, "   ").unwrap();
        assert_eq!(stored_credential(&store, gemini), None);

        save_credential(&store, gemini, "  g-key ").unwrap();
        assert_eq!(stored_credential(&store, gemini).as_deref(), Some("g-key"));
        assert!(save_credential(&store, gemini, "").is_err());

        delete_credential(&store, gemini).unwrap();
        assert_eq!(stored_credential(&store, gemini), None);
    }

    #[test]
    fn test_stored_credential_wins_over_env() {
        let store = MemorySecretStore::new();
        let openai = find("OpenAI").unwrap();
        store.save(openai.credential_alias, "sk-stored").unwrap();
        assert_eq!(
            credential_with_source(&store, openai),
            Some(("sk-stored".to_string(), CredentialSource::Stored))
        );
    }

    #[test]
    fn test_model_list_is_capped_and_deduplicated() {
        let store = MemorySecretStore::new();
        let openai = find("OpenAI").unwrap();

        assert_eq!(add_model(&store, openai, "gpt-4o").unwrap(), AddModelOutcome::Added);
        assert_eq!(add_model(&store, openai, "gpt-4o").unwrap(), AddModelOutcome::Duplicate);
        assert_eq!(add_model(&store, openai, " ").unwrap(), AddModelOutcome::Invalid);
        assert_eq!(add_model(&store, openai, "a,b").unwrap(), AddModelOutcome::Invalid);
        assert_eq!(add_model(&store, openai, "gpt-4o-mini").unwrap(), AddModelOutcome::Added);
        assert_eq!(add_model(&store, openai, "o1").unwrap(), AddModelOutcome::Added);
        assert_eq!(add_model(&store, openai, "o3").unwrap(), AddModelOutcome::Full);

        assert_eq!(
            store.get(openai.model_list_alias).as_deref(),
            Some("gpt-4o,gpt-4o-mini,o1")
        );
        assert_eq!(saved_models(&store, openai), vec!["gpt-4o", "gpt-4o-mini", "o1"]);
    }

    #[test]
    fn test_remove_model() {
        let store = MemorySecretStore::new();
        let grok = find("Grok").unwrap();
        add_model(&store, grok, "llama3-70b").unwrap();
        add_model(&store, grok, "mixtral").unwrap();

        assert!(remove_model(&store, grok, "llama3-70b").unwrap());
        assert!(!remove_model(&store, grok, "llama3-70b").unwrap());
        assert_eq!(saved_models(&store, grok), vec!["mixtral"]);

        assert!(remove_model(&store, grok, "mixtral").unwrap());
        assert!(saved_models(&store, grok).is_empty());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("keys.toml");
        let anthropic = find("Anthropic").unwrap();

        {
            let store = FileSecretStore::open(&path).unwrap();
            save_credential(&store, anthropic, "sk-ant").unwrap();
            add_model(&store, anthropic, "claude-3-haiku").unwrap();
        }

        let reopened = FileSecretStore::open(&path).unwrap();
        assert_eq!(stored_credential(&reopened, anthropic).as_deref(), Some("sk-ant"));
        assert_eq!(saved_models(&reopened, anthropic), vec!["claude-3-haiku"]);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        let store = FileSecretStore::open(data.join("keys.toml")).unwrap();
        store.save("openai_api_key", "sk-old").unwrap();

        // A plain file where the data directory should be makes every write fail
        std::fs::remove_dir_all(&data).unwrap();
        std::fs::write(&data, "not a directory").unwrap();

        assert!(store.save("gemini_api_key", "g-key").is_err());
        assert_eq!(store.get("gemini_api_key"), None);

        assert!(store.remove("openai_api_key").is_err());
        assert_eq!(store.get("openai_api_key").as_deref(), Some("sk-old"));
    }
}
