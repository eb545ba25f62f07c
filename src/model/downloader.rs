use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{ModelInfo, ModelRegistry};
use crate::repository::{Artifact, ArtifactFile};
use crate::zoo::ModelLoader;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub struct ModelDownloader {
    config: Config,
    registry: ModelRegistry,
}

impl ModelDownloader {
    pub fn new(config: Config) -> Result<Self> {
        let registry = ModelRegistry::load(&config)?;
        Ok(Self { config, registry })
    }

    /// Pull one artifact of the loader's family into the local cache and
    /// record it in the registry.
    ///
    /// `version` pins an exact artifact; otherwise the latest release is
    /// selected. Files already on disk with a matching checksum are kept.
    pub fn pull(
        &mut self,
        loader: &ModelLoader,
        version: Option<&str>,
        alias: Option<String>,
    ) -> Result<ModelInfo> {
        tracing::info!(
            "Pulling {}:{} from {}",
            loader.group_id(),
            loader.artifact_id(),
            loader.repository().name()
        );

        let metadata = loader.metadata()?;
        let artifact = match version {
            Some(v) => metadata.artifact(v).ok_or_else(|| {
                Error::ModelNotFound(format!("{} version {}", loader.artifact_id(), v))
            })?,
            None => metadata.latest().ok_or_else(|| {
                Error::Metadata(format!(
                    "no artifacts published for {}",
                    loader.artifact_id()
                ))
            })?,
        };

        let model_dir = self
            .config
            .models_dir
            .join(loader.artifact_id())
            .join(&artifact.version);
        fs::create_dir_all(&model_dir)?;

        let size = self.fetch_artifact(loader, artifact, &model_dir)?;

        let model_info = ModelInfo {
            family: loader.family(),
            artifact_id: loader.artifact_id().to_string(),
            version: artifact.version.clone(),
            alias,
            model_path: model_dir,
            size,
            pulled_at: chrono::Utc::now().to_rfc3339(),
        };

        self.registry.add_model(model_info.clone());
        self.registry.save(&self.config)?;

        tracing::info!(
            "Model '{}' {} successfully pulled and registered",
            model_info.artifact_id,
            model_info.version
        );

        Ok(model_info)
    }

    fn fetch_artifact(
        &self,
        loader: &ModelLoader,
        artifact: &Artifact,
        model_dir: &Path,
    ) -> Result<u64> {
        let mut total = 0u64;

        for file in artifact.files.values() {
            let dest = model_dir.join(file_name(file)?);

            if is_cached(&dest, file) {
                tracing::debug!("Already cached: {:?}", dest);
                total += fs::metadata(&dest)?.len();
                continue;
            }

            let url = loader.file_uri(file);
            tracing::info!("Downloading {}", url);
            let mut response = loader.repository().open(&url)?;
            let (written, digest) = copy_and_hash(&mut response, &dest)?;
            verify_download(&dest, file, &digest)?;
            total += written;
        }

        Ok(total)
    }
}

/// Stream `reader` into `dest`, hashing as bytes arrive so the file never
/// has to fit in memory. Returns the byte count and the SHA-256 digest.
fn copy_and_hash(reader: &mut impl Read, dest: &Path) -> Result<(u64, String)> {
    let mut out = fs::File::create(dest)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    let mut written = 0u64;
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        out.write_all(&buf[..n])?;
        written += n as u64;
    }
    out.flush()?;
    Ok((written, hex::encode(hasher.finalize())))
}

/// Compare the streamed digest against the published checksum, removing
/// the file on mismatch so a corrupt download is never left in the cache.
fn verify_download(dest: &Path, file: &ArtifactFile, actual: &str) -> Result<()> {
    if let Some(expected) = &file.sha256 {
        if !actual.eq_ignore_ascii_case(expected) {
            let _ = fs::remove_file(dest);
            return Err(Error::ChecksumMismatch {
                file: file.uri.clone(),
                expected: expected.clone(),
                actual: actual.to_string(),
            });
        }
    }
    Ok(())
}

/// Local file name for an artifact file: the last non-empty segment of its
/// URI. Segments that would escape the artifact directory are rejected.
fn file_name(file: &ArtifactFile) -> Result<PathBuf> {
    let name = file.uri.rsplit('/').find(|s| !s.is_empty()).unwrap_or("");
    if name.is_empty() || name == "." || name == ".." || name.contains('\\') {
        return Err(Error::Metadata(format!(
            "unsafe artifact file name in '{}'",
            file.uri
        )));
    }
    Ok(PathBuf::from(name))
}

/// A file counts as cached when it exists and its declared checksum still
/// matches. Files without a published checksum are always re-fetched.
fn is_cached(dest: &Path, file: &ArtifactFile) -> bool {
    let Some(expected) = &file.sha256 else {
        return false;
    };
    let Ok(bytes) = fs::read(dest) else {
        return false;
    };
    sha256_hex(&bytes).eq_ignore_ascii_case(expected)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(uri: &str, sha256: Option<&str>) -> ArtifactFile {
        ArtifactFile {
            uri: uri.to_string(),
            sha256: sha256.map(str::to_string),
            size: 0,
        }
    }

    #[test]
    fn file_name_takes_last_uri_segment() {
        assert_eq!(
            file_name(&file("0.0.1/ssd-symbol.json", None)).unwrap(),
            PathBuf::from("ssd-symbol.json")
        );
        assert_eq!(
            file_name(&file("resnet50-0000.params", None)).unwrap(),
            PathBuf::from("resnet50-0000.params")
        );
        assert_eq!(
            file_name(&file("0.0.1/params/", None)).unwrap(),
            PathBuf::from("params")
        );
    }

    #[test]
    fn file_name_rejects_escaping_uris() {
        for bad in ["", "///", "..", "0.0.1/..", "0.0.1/.", "a\\b"] {
            assert!(
                matches!(file_name(&file(bad, None)), Err(Error::Metadata(_))),
                "accepted '{}'",
                bad
            );
        }
    }

    #[test]
    fn copy_and_hash_streams_in_chunks() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("weights.params");

        // Larger than one 64 KiB read so the loop takes several passes.
        let data = vec![7u8; 200 * 1024];
        let (written, digest) = copy_and_hash(&mut &data[..], &dest).unwrap();

        assert_eq!(written, data.len() as u64);
        assert_eq!(digest, sha256_hex(&data));
        assert_eq!(fs::read(&dest).unwrap(), data);
    }

    #[test]
    fn verify_download_removes_corrupt_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("weights.params");
        fs::write(&dest, b"abc").unwrap();

        let err = verify_download(
            &dest,
            &file("weights.params", Some("deadbeef")),
            &sha256_hex(b"abc"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn verify_download_keeps_good_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("weights.params");
        fs::write(&dest, b"abc").unwrap();

        let digest = sha256_hex(b"abc");
        verify_download(&dest, &file("weights.params", Some(&digest)), &digest).unwrap();
        verify_download(&dest, &file("weights.params", None), &digest).unwrap();
        assert!(dest.exists());
    }

    #[test]
    fn cached_only_when_checksum_matches() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("weights.params");
        fs::write(&dest, b"abc").unwrap();

        let digest = sha256_hex(b"abc");
        assert!(is_cached(&dest, &file("weights.params", Some(&digest))));
        assert!(!is_cached(&dest, &file("weights.params", Some("deadbeef"))));
        assert!(!is_cached(&dest, &file("weights.params", None)));
        assert!(!is_cached(
            &tmp.path().join("missing"),
            &file("missing", Some(&digest))
        ));
    }

    #[test]
    fn sha256_hex_is_lowercase_hex() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
