use crate::config::Config;
use crate::error::{Error, Result};
use crate::zoo::ModelFamily;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Record of one artifact pulled into the local cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub family: ModelFamily,
    pub artifact_id: String,
    pub version: String,
    pub alias: Option<String>,
    pub model_path: PathBuf,
    pub size: u64,
    pub pulled_at: String,
}

/// Local index of pulled artifacts, persisted as TOML next to the cache.
/// Keyed by alias or artifact id; ordered so listings are stable.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelInfo>,
}

impl ModelRegistry {
    pub fn load(config: &Config) -> Result<Self> {
        if !config.registry_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config.registry_path)?;
        let registry: ModelRegistry = toml::from_str(&content)?;
        Ok(registry)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(&config.registry_path, content)?;
        Ok(())
    }

    pub fn add_model(&mut self, model: ModelInfo) {
        let key = model
            .alias
            .clone()
            .unwrap_or_else(|| model.artifact_id.clone());
        self.models.insert(key, model);
    }

    pub fn get_model(&self, name: &str) -> Result<&ModelInfo> {
        self.models
            .get(name)
            .ok_or_else(|| Error::ModelNotFound(name.to_string()))
    }

    pub fn find_family(&self, family: ModelFamily) -> Option<&ModelInfo> {
        self.models.values().find(|m| m.family == family)
    }

    pub fn list_models(&self) -> Vec<&ModelInfo> {
        self.models.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(family: ModelFamily, alias: Option<&str>) -> ModelInfo {
        ModelInfo {
            family,
            artifact_id: family.artifact_id().to_string(),
            version: "0.0.1".to_string(),
            alias: alias.map(str::to_string),
            model_path: PathBuf::from("/tmp/models/x"),
            size: 42,
            pulled_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn keys_by_alias_when_present() {
        let mut registry = ModelRegistry::default();
        registry.add_model(sample(ModelFamily::Ssd, None));
        registry.add_model(sample(ModelFamily::Resnet, Some("classifier")));

        assert!(registry.get_model("ssd").is_ok());
        assert!(registry.get_model("classifier").is_ok());
        assert!(matches!(
            registry.get_model("resnet"),
            Err(Error::ModelNotFound(_))
        ));
    }

    #[test]
    fn finds_installed_family() {
        let mut registry = ModelRegistry::default();
        registry.add_model(sample(ModelFamily::MaskRcnn, None));

        assert!(registry.find_family(ModelFamily::MaskRcnn).is_some());
        assert!(registry.find_family(ModelFamily::Senet).is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::at(tmp.path().to_path_buf()).unwrap();

        let mut registry = ModelRegistry::default();
        registry.add_model(sample(ModelFamily::SimplePose, None));
        registry.save(&config).unwrap();

        let reloaded = ModelRegistry::load(&config).unwrap();
        let model = reloaded.get_model("simple_pose").unwrap();
        assert_eq!(model.family, ModelFamily::SimplePose);
        assert_eq!(model.version, "0.0.1");
        assert_eq!(model.size, 42);
    }

    #[test]
    fn listing_is_ordered_by_key() {
        let mut registry = ModelRegistry::default();
        registry.add_model(sample(ModelFamily::Ssd, None));
        registry.add_model(sample(ModelFamily::ActionRecognition, None));
        registry.add_model(sample(ModelFamily::Resnet, Some("classifier")));

        let ids: Vec<&str> = registry
            .list_models()
            .iter()
            .map(|m| m.artifact_id.as_str())
            .collect();
        assert_eq!(ids, ["action_recognition", "resnet", "ssd"]);
    }

    #[test]
    fn missing_registry_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::at(tmp.path().to_path_buf()).unwrap();

        let registry = ModelRegistry::load(&config).unwrap();
        assert!(registry.list_models().is_empty());
    }
}
