pub mod loader;

pub use loader::ModelLoader;

use crate::error::Result;
use crate::repository::Repository;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Remote endpoint all zoo artifacts are served from.
pub const MXNET_REPO_URL: &str = "https://joule.s3.amazonaws.com/mlrepo/";

/// Namespace qualifying the zoo's artifacts within the repository.
pub const GROUP_ID: &str = "org.apache.mxnet";

/// Repository display name.
pub const REPOSITORY_NAME: &str = "MxNet";

/// The closed set of model families published in the zoo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ModelFamily {
    Ssd,
    Resnet,
    Resnext,
    Senet,
    SeResnext,
    SimplePose,
    MaskRcnn,
    ActionRecognition,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 8] = [
        ModelFamily::Ssd,
        ModelFamily::Resnet,
        ModelFamily::Resnext,
        ModelFamily::Senet,
        ModelFamily::SeResnext,
        ModelFamily::SimplePose,
        ModelFamily::MaskRcnn,
        ModelFamily::ActionRecognition,
    ];

    /// Artifact id under which the family is published.
    pub fn artifact_id(self) -> &'static str {
        match self {
            ModelFamily::Ssd => "ssd",
            ModelFamily::Resnet => "resnet",
            ModelFamily::Resnext => "resnext",
            ModelFamily::Senet => "senet",
            ModelFamily::SeResnext => "se_resnext",
            ModelFamily::SimplePose => "simple_pose",
            ModelFamily::MaskRcnn => "mask_rcnn",
            ModelFamily::ActionRecognition => "action_recognition",
        }
    }

    /// Computer-vision application the family solves.
    pub fn application(self) -> &'static str {
        match self {
            ModelFamily::Ssd => "cv/object_detection",
            ModelFamily::Resnet
            | ModelFamily::Resnext
            | ModelFamily::Senet
            | ModelFamily::SeResnext => "cv/image_classification",
            ModelFamily::SimplePose => "cv/pose_estimation",
            ModelFamily::MaskRcnn => "cv/instance_segmentation",
            ModelFamily::ActionRecognition => "cv/action_recognition",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ModelFamily::Ssd => "ssd",
            ModelFamily::Resnet => "resnet",
            ModelFamily::Resnext => "resnext",
            ModelFamily::Senet => "senet",
            ModelFamily::SeResnext => "se-resnext",
            ModelFamily::SimplePose => "simple-pose",
            ModelFamily::MaskRcnn => "mask-rcnn",
            ModelFamily::ActionRecognition => "action-recognition",
        };
        f.write_str(tag)
    }
}

/// The model zoo registry: one loader handle per family, all bound to a
/// single shared repository.
///
/// Constructed explicitly and read-only afterwards. Construction fails only
/// if the repository endpoint cannot be validated, in which case no loaders
/// exist and the caller cannot proceed.
#[derive(Debug)]
pub struct ModelZoo {
    repository: Arc<Repository>,
    loaders: [ModelLoader; ModelFamily::ALL.len()],
}

impl ModelZoo {
    /// Build the registry against the fixed zoo endpoint.
    pub fn new() -> Result<Self> {
        let repository = Repository::new(REPOSITORY_NAME, MXNET_REPO_URL)?;
        Ok(Self::with_repository(repository))
    }

    /// Build the registry against a caller-supplied repository. Intended
    /// for mirrors and tests; the family set stays fixed.
    pub fn with_repository(repository: Repository) -> Self {
        let repository = Arc::new(repository);
        let loaders =
            ModelFamily::ALL.map(|family| ModelLoader::new(family, Arc::clone(&repository)));
        Self {
            repository,
            loaders,
        }
    }

    /// Loader handle for `family`. Total over the enumerated set.
    pub fn loader(&self, family: ModelFamily) -> &ModelLoader {
        &self.loaders[family as usize]
    }

    pub fn loaders(&self) -> &[ModelLoader] {
        &self.loaders
    }

    pub fn repository(&self) -> &Arc<Repository> {
        &self.repository
    }
}
