use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::embedding::EmbeddingMethod;
use crate::error::{KhmerNewsError, Result};

/// Name of the configuration file inside a model directory.
pub const CONFIG_FILE: &str = "config.json";
/// Classifier file used when `config.json` names none.
pub const DEFAULT_CLASSIFIER_FILE: &str = "svm_model.json";
/// Directory names searched by [`find_model_directory`], in order.
pub const MODEL_DIR_NAMES: [&str; 3] = ["Demo_model", "models", "model"];

/// Contents of a model directory's `config.json`.
///
/// Relative paths are resolved against the model directory by
/// [`ModelConfig::resolve`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Word-vector table: a fastText `.vec` file or a compact `.zst` table.
    pub model_path: PathBuf,
    #[serde(default)]
    pub embedding_method: EmbeddingMethod,
    #[serde(default = "default_classifier_path")]
    pub classifier_path: PathBuf,
    /// Tokenizer lexicon; the embedded seed lexicon is used when absent.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from(DEFAULT_CLASSIFIER_FILE)
}

impl ModelConfig {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Reads `config.json` from `model_dir` and resolves its paths.
    pub fn from_model_dir<P: AsRef<Path>>(model_dir: P) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config = Self::from_path(model_dir.join(CONFIG_FILE))?;
        Ok(config.resolve(model_dir))
    }

    /// Makes every relative path absolute with respect to `base`.
    pub fn resolve(mut self, base: &Path) -> Self {
        let join = |p: &Path| {
            if p.is_relative() {
                base.join(p)
            } else {
                p.to_path_buf()
            }
        };
        self.model_path = join(&self.model_path);
        self.classifier_path = join(&self.classifier_path);
        self.lexicon_path = self.lexicon_path.as_deref().map(join);
        self
    }
}

/// A directory qualifies when it holds `config.json` and the classifier it
/// names.
pub fn is_model_directory(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    match ModelConfig::from_model_dir(dir) {
        Ok(config) => config.classifier_path.is_file(),
        Err(_) => false,
    }
}

/// Returns the first `<base>/<name>` for `name` in [`MODEL_DIR_NAMES`] that
/// is a model directory, trying the bases in order.
pub fn find_model_directory<I, P>(base_dirs: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut searched = Vec::new();
    for base in base_dirs {
        for name in MODEL_DIR_NAMES {
            let candidate = base.as_ref().join(name);
            if is_model_directory(&candidate) {
                return Ok(candidate);
            }
            searched.push(candidate);
        }
    }
    Err(KhmerNewsError::ModelDirNotFound { searched })
}

/// Bases searched by default: the working directory, then the user's
/// `Documents/DEV`, `Desktop` and `Downloads` folders.
pub fn default_search_bases() -> Vec<PathBuf> {
    let mut bases = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        bases.push(cwd);
    }
    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        let home = PathBuf::from(home);
        bases.push(home.join("Documents").join("DEV"));
        bases.push(home.join("Desktop"));
        bases.push(home.join("Downloads"));
    }
    bases
}
