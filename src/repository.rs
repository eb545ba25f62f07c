use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Index file describing the published artifacts of one model.
pub const METADATA_FILE: &str = "metadata.json";

/// A named, URL-addressed source of model artifacts.
///
/// Immutable after construction and shared read-only by every loader
/// created against it.
#[derive(Debug, Clone)]
pub struct Repository {
    name: String,
    base_url: String,
    client: reqwest::blocking::Client,
}

impl Repository {
    pub fn new(name: &str, base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        // No whole-request timeout: artifact bodies are large and the
        // default 30s limit covers reading the entire response.
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::ConfigError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            name: name.to_string(),
            base_url,
            client,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the artifact directory for `group_id`/`artifact_id`.
    pub fn artifact_base(&self, group_id: &str, artifact_id: &str) -> String {
        format!(
            "{}{}/{}/",
            self.base_url,
            group_id.replace('.', "/"),
            artifact_id
        )
    }

    /// Resolve a file URI from an artifact's metadata to an absolute URL.
    pub fn artifact_uri(&self, group_id: &str, artifact_id: &str, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            format!("{}{}", self.artifact_base(group_id, artifact_id), uri)
        }
    }

    /// Fetch and parse the metadata index for one model.
    pub fn metadata(&self, group_id: &str, artifact_id: &str) -> Result<Metadata> {
        let url = format!(
            "{}{}",
            self.artifact_base(group_id, artifact_id),
            METADATA_FILE
        );
        tracing::debug!("Fetching metadata from {}", url);

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(Error::Metadata(format!(
                "{} returned {} for {}",
                self.name,
                response.status(),
                url
            )));
        }

        let body = response.text()?;
        let metadata: Metadata = serde_json::from_str(&body)?;
        Ok(metadata)
    }

    /// Open a streaming download of one resource. The response body is
    /// consumed through its `Read` impl so large files never need to fit
    /// in memory.
    pub fn open(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(Error::DownloadFailed(format!(
                "{} returned {} for {}",
                self.name,
                response.status(),
                url
            )));
        }
        Ok(response)
    }
}

impl PartialEq for Repository {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.base_url == other.base_url
    }
}

fn normalize_base_url(url: &str) -> Result<String> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(|| Error::InvalidUrl(format!("expected an http(s) URL, got '{}'", url)))?;

    let host = rest.split('/').next().unwrap_or("");
    if host.is_empty() {
        return Err(Error::InvalidUrl(format!("missing host in '{}'", url)));
    }

    let mut url = url.to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    Ok(url)
}

/// Published artifact index for one model, as served by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub metadata_version: String,
    pub group_id: String,
    pub artifact_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl Metadata {
    /// The newest published release, preferring non-snapshot versions.
    pub fn latest(&self) -> Option<&Artifact> {
        let released = self
            .artifacts
            .iter()
            .filter(|a| !a.snapshot)
            .max_by(|a, b| compare_versions(&a.version, &b.version));
        released.or_else(|| {
            self.artifacts
                .iter()
                .max_by(|a, b| compare_versions(&a.version, &b.version))
        })
    }

    pub fn artifact(&self, version: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.version == version)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub version: String,
    #[serde(default)]
    pub snapshot: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
    // Ordered so `info` prints files the same way every run.
    #[serde(default)]
    pub files: BTreeMap<String, ArtifactFile>,
}

impl Artifact {
    pub fn total_size(&self) -> u64 {
        self.files.values().map(|f| f.size).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactFile {
    pub uri: String,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub size: u64,
}

/// Numeric-aware comparison of dotted version strings.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(xn), Ok(yn)) => xn.cmp(&yn),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}
