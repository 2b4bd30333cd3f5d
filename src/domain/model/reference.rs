//! Reference to the pretrained weights being deployed

use serde::{Deserialize, Serialize};

/// Mount point of model artifacts inside the serving container
pub const ARTIFACT_MOUNT_PATH: &str = "/opt/ml/model";

/// Where the serving container gets its weights from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ModelReference {
    /// A model hosted on the model hub, downloaded by the container at startup
    Hub {
        model_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        revision: Option<String>,
    },
    /// Pre-packaged model data in object storage, mounted into the container
    Artifact { s3_uri: String },
}

impl ModelReference {
    pub fn hub(model_id: impl Into<String>) -> Self {
        Self::Hub {
            model_id: model_id.into(),
            revision: None,
        }
    }

    pub fn hub_revision(model_id: impl Into<String>, revision: impl Into<String>) -> Self {
        Self::Hub {
            model_id: model_id.into(),
            revision: Some(revision.into()),
        }
    }

    pub fn artifact(s3_uri: impl Into<String>) -> Self {
        Self::Artifact {
            s3_uri: s3_uri.into(),
        }
    }

    /// Value of the model id the container loads
    pub fn container_model_id(&self) -> &str {
        match self {
            Self::Hub { model_id, .. } => model_id,
            Self::Artifact { .. } => ARTIFACT_MOUNT_PATH,
        }
    }

    /// Object storage location of the model data, if any
    pub fn model_data_url(&self) -> Option<&str> {
        match self {
            Self::Hub { .. } => None,
            Self::Artifact { s3_uri } => Some(s3_uri.as_str()),
        }
    }

    /// A short, name-safe slug for deriving resource names
    ///
    /// `meta-llama/Llama-2-7b-chat-hf` becomes `Llama-2-7b-chat-hf`.
    pub fn slug(&self) -> String {
        let raw = match self {
            Self::Hub { model_id, .. } => model_id.rsplit('/').next().unwrap_or(model_id),
            Self::Artifact { s3_uri } => s3_uri
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .unwrap_or(s3_uri)
                .trim_end_matches(".tar.gz"),
        };

        let cleaned: String = raw
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();

        cleaned.trim_matches('-').to_string()
    }
}
