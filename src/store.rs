//! Model artifact persistence
//!
//! The fitted classifier and its feature schema are one logical unit: they
//! are written with a stage-then-rename swap and loaded as a pair, so
//! inference never observes a model without its matching schema. An
//! in-memory copy behind a read-write lock keeps concurrent predict calls
//! off the filesystem and away from torn writes.

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::boosting::BoostedClassifier;
use crate::error::{Result, ServiceError};
use crate::schema::FeatureSchema;

pub const MODEL_FILE: &str = "model.json";
pub const SCHEMA_FILE: &str = "model_features.json";

/// The persisted pair: fitted classifier plus its feature schema.
#[derive(Debug)]
pub struct ModelArtifact {
    pub model: BoostedClassifier,
    pub schema: FeatureSchema,
}

/// Versionless store for the artifact pair; last write wins.
pub struct ModelStore {
    dir: PathBuf,
    cached: RwLock<Option<Arc<ModelArtifact>>>,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cached: RwLock::new(None),
        }
    }

    fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    fn schema_path(&self) -> PathBuf {
        self.dir.join(SCHEMA_FILE)
    }

    /// Persist the pair, overwriting any previous one. Both files are staged
    /// first and renamed into place, then the in-memory copy is swapped under
    /// the write lock.
    pub fn save(&self, model: BoostedClassifier, schema: FeatureSchema) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let model_json = serde_json::to_string(&model)?;
        let schema_json = serde_json::to_string(&schema)?;

        let model_tmp = self.dir.join(format!("{MODEL_FILE}.tmp"));
        let schema_tmp = self.dir.join(format!("{SCHEMA_FILE}.tmp"));
        fs::write(&model_tmp, model_json)?;
        fs::write(&schema_tmp, schema_json)?;
        fs::rename(&schema_tmp, self.schema_path())?;
        fs::rename(&model_tmp, self.model_path())?;

        let artifact = Arc::new(ModelArtifact { model, schema });
        *self.cached.write() = Some(artifact);

        info!(dir = %self.dir.display(), "Model artifact pair saved");
        Ok(())
    }

    /// Load the pair, preferring the in-memory copy. Fails with
    /// `ModelNotTrained` when either artifact is absent on disk.
    pub fn load(&self) -> Result<Arc<ModelArtifact>> {
        if let Some(artifact) = self.cached.read().clone() {
            return Ok(artifact);
        }

        let model_path = self.model_path();
        let schema_path = self.schema_path();
        if !model_path.exists() || !schema_path.exists() {
            return Err(ServiceError::ModelNotTrained);
        }

        let model: BoostedClassifier = serde_json::from_str(&fs::read_to_string(&model_path)?)?;
        let schema: FeatureSchema = serde_json::from_str(&fs::read_to_string(&schema_path)?)?;

        let artifact = Arc::new(ModelArtifact { model, schema });
        *self.cached.write() = Some(artifact.clone());
        Ok(artifact)
    }

    /// Whether a complete pair is available.
    pub fn is_trained(&self) -> bool {
        if self.cached.read().is_some() {
            return true;
        }
        Path::new(&self.model_path()).exists() && Path::new(&self.schema_path()).exists()
    }
}
