use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{ModelSnapshot, StandardScaler, TrainedClassifier};

const CLASSIFIER_FILE: &str = "adoption_predictor.json";
const SCALER_FILE: &str = "feature_scaler.json";

/// Storage abstraction for the trained artifacts so the predictor and trainer
/// can be exercised without touching the filesystem.
///
/// A store with no artifacts yet reports `Ok(None)`; that is the normal state
/// of a fresh deployment, not a failure.
pub trait ModelStore: Send + Sync {
    fn load(&self) -> Result<Option<ModelSnapshot>, ModelStoreError>;
    fn save(&self, snapshot: &ModelSnapshot) -> Result<(), ModelStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelStoreError {
    #[error("model store io failure at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("model artifact is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// On-disk layout: two JSON artifacts under one directory, overwritten on
/// every save. The classifier file also records when training ran.
#[derive(Debug, Clone)]
pub struct FsModelStore {
    dir: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct ClassifierArtifact {
    trained_at: chrono::DateTime<chrono::Utc>,
    classifier: TrainedClassifier,
}

impl FsModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn classifier_path(&self) -> PathBuf {
        self.dir.join(CLASSIFIER_FILE)
    }

    fn scaler_path(&self) -> PathBuf {
        self.dir.join(SCALER_FILE)
    }

    fn read_json<T: serde::de::DeserializeOwned>(
        path: &Path,
    ) -> Result<Option<T>, ModelStoreError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ModelStoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ModelStoreError> {
        let bytes = serde_json::to_vec_pretty(value)?;
        fs::write(path, bytes).map_err(|source| ModelStoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ModelStore for FsModelStore {
    fn load(&self) -> Result<Option<ModelSnapshot>, ModelStoreError> {
        let classifier: Option<ClassifierArtifact> = Self::read_json(&self.classifier_path())?;
        let scaler: Option<StandardScaler> = Self::read_json(&self.scaler_path())?;

        // Both artifacts are written together; a lone file means an
        // interrupted save and is treated as absent.
        match (classifier, scaler) {
            (Some(artifact), Some(scaler)) => Ok(Some(ModelSnapshot {
                classifier: artifact.classifier,
                scaler,
                trained_at: artifact.trained_at,
            })),
            _ => Ok(None),
        }
    }

    fn save(&self, snapshot: &ModelSnapshot) -> Result<(), ModelStoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| ModelStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        Self::write_json(
            &self.classifier_path(),
            &ClassifierArtifact {
                trained_at: snapshot.trained_at,
                classifier: snapshot.classifier.clone(),
            },
        )?;
        Self::write_json(&self.scaler_path(), &snapshot.scaler)
    }
}
