//! # Model Persistence
//!
//! Stores a trained [`HmmModel`] as JSON inside a small versioned envelope.
//! Floats are written with round-trip precision, so a reloaded model decodes
//! exactly like the one that was saved.

use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{HmmError, Result};
use crate::hmm::HmmModel;

/// Envelope version written by this build.
pub const FORMAT_VERSION: u32 = 1;

/// Default file name of a stored model.
pub const DEFAULT_MODEL_FILE: &str = "hmm_pos_tagger.json";

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    format_version: u32,
    model: &'a HmmModel,
}

#[derive(Deserialize)]
struct Envelope {
    format_version: u32,
    model: HmmModel,
}

/// Serializes `model` into `writer`.
pub fn write_model<W: Write>(writer: W, model: &HmmModel) -> Result<()> {
    let envelope = EnvelopeRef {
        format_version: FORMAT_VERSION,
        model,
    };
    serde_json::to_writer(writer, &envelope)?;
    Ok(())
}

/// Reads and validates a model from `reader`.
///
/// # Errors
///
/// * `HmmError::Serialization` if the bytes are not a model envelope.
/// * `HmmError::ModelError` for an unsupported version or a malformed model.
/// * `HmmError::NumericDegeneracy` if a stored row is not a distribution.
pub fn read_model<R: Read>(reader: R) -> Result<HmmModel> {
    let envelope: Envelope = serde_json::from_reader(reader)?;
    if envelope.format_version != FORMAT_VERSION {
        return Err(HmmError::ModelError(format!(
            "unsupported model format version {} (expected {FORMAT_VERSION})",
            envelope.format_version
        )));
    }
    envelope.model.validate()?;
    Ok(envelope.model)
}

/// A model file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if a file exists at the store path.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes `model` to the store path.
    ///
    /// The model is written to a sibling temporary file which is then renamed
    /// over the target, so readers never observe a half-written file. Missing
    /// parent directories are created.
    pub fn save(&self, model: &HmmModel) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.tmp_path();
        let written = fs::File::create(&tmp).map_err(HmmError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            write_model(&mut writer, model)?;
            writer.flush()?;
            Ok(())
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &self.path)?;

        info!(
            path = %self.path.display(),
            tags = model.num_tags(),
            vocab = model.vocab_size(),
            "saved model"
        );
        Ok(())
    }

    /// Loads and validates the stored model.
    pub fn load(&self) -> Result<HmmModel> {
        let file = fs::File::open(&self.path)?;
        let model = read_model(BufReader::new(file))?;
        info!(
            path = %self.path.display(),
            tags = model.num_tags(),
            vocab = model.vocab_size(),
            "loaded model"
        );
        Ok(model)
    }

    /// Loads the stored model, or `None` if there is no usable one.
    ///
    /// A missing file is expected on first run and only logged at debug
    /// level; any other failure is logged as a warning.
    pub fn load_cached(&self) -> Option<HmmModel> {
        match self.load() {
            Ok(model) => Some(model),
            Err(HmmError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored model");
                None
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unusable stored model");
                None
            }
        }
    }

    /// Deletes the stored model. Returns `false` if there was none.
    pub fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_MODEL_FILE.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
