use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::error::KhmerNewsError;
use crate::KhmerNewsClassifier;

/// Lazily loaded, process-lifetime handle to the heavy models.
///
/// The first [`get`](Self::get) loads the model directory; later calls hand
/// out the same instance. A failed load is not cached, so the next call
/// retries. Dropping the handle releases the models once every outstanding
/// `Arc` is gone.
pub struct SharedModels {
    model_dir: PathBuf,
    cell: OnceCell<Arc<KhmerNewsClassifier>>,
}

impl SharedModels {
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        SharedModels {
            model_dir: model_dir.into(),
            cell: OnceCell::new(),
        }
    }

    /// Wraps an already constructed classifier.
    pub fn preloaded<P: Into<PathBuf>>(model_dir: P, classifier: KhmerNewsClassifier) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(Arc::new(classifier));
        SharedModels {
            model_dir: model_dir.into(),
            cell,
        }
    }

    pub fn model_dir(&self) -> &Path {
        &self.model_dir
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> Result<Arc<KhmerNewsClassifier>, KhmerNewsError> {
        self.cell
            .get_or_try_init(|| KhmerNewsClassifier::from_model_dir(&self.model_dir).map(Arc::new))
            .map(Arc::clone)
    }
}
