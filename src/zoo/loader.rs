use crate::error::Result;
use crate::repository::{ArtifactFile, Metadata, Repository};
use crate::zoo::{ModelFamily, GROUP_ID};
use std::sync::Arc;

/// Handle for one model family, bound to the zoo's shared repository.
///
/// Loaders hold a read-only reference to the repository; none of them owns
/// it exclusively.
#[derive(Debug, Clone)]
pub struct ModelLoader {
    family: ModelFamily,
    repository: Arc<Repository>,
}

impl ModelLoader {
    pub(crate) fn new(family: ModelFamily, repository: Arc<Repository>) -> Self {
        Self { family, repository }
    }

    pub fn family(&self) -> ModelFamily {
        self.family
    }

    pub fn repository(&self) -> &Arc<Repository> {
        &self.repository
    }

    pub fn group_id(&self) -> &'static str {
        GROUP_ID
    }

    pub fn artifact_id(&self) -> &'static str {
        self.family.artifact_id()
    }

    pub fn application(&self) -> &'static str {
        self.family.application()
    }

    /// Fetch the published artifact index for this family.
    pub fn metadata(&self) -> Result<Metadata> {
        tracing::debug!(
            "Resolving {}:{} against {}",
            self.group_id(),
            self.artifact_id(),
            self.repository.name()
        );
        self.repository.metadata(GROUP_ID, self.artifact_id())
    }

    /// Absolute URL for one of this family's artifact files.
    pub fn file_uri(&self, file: &ArtifactFile) -> String {
        self.repository
            .artifact_uri(GROUP_ID, self.artifact_id(), &file.uri)
    }
}
