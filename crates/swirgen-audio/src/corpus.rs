//! Corpus discovery and loading.
//!
//! A corpus is the set of spoken clips both maskers are built from. Discovery
//! (folder + file-name pattern) is shared with the normalization pass so every
//! stage selects files the same way.

use std::path::{Path, PathBuf};

use rand::Rng;
use swirgen_spec::CorpusSource;
use tracing::{debug, info, warn};

use crate::buffer::SignalBuffer;
use crate::error::{AudioError, AudioResult};
use crate::wav;

/// One loaded clip.
#[derive(Debug, Clone)]
pub struct Clip {
    /// Where the clip was read from.
    pub path: PathBuf,
    /// Mono samples.
    pub buffer: SignalBuffer,
}

/// A file that was found but not loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFile {
    /// Offending file.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: String,
}

/// Immutable set of clips sharing one sample rate.
#[derive(Debug, Clone, Default)]
pub struct ClipCorpus {
    clips: Vec<Clip>,
    skipped: Vec<SkippedFile>,
}

/// Lists the files matched by `sources`, sorted and de-duplicated.
///
/// Missing folders are logged and contribute nothing.
pub fn discover(sources: &[CorpusSource]) -> AudioResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for source in sources {
        if !source.dir.is_dir() {
            warn!(dir = %source.dir.display(), "corpus folder not found");
            continue;
        }

        let dir = glob::Pattern::escape(&source.dir.to_string_lossy());
        let pattern = Path::new(&dir).join(&source.pattern);
        let pattern = pattern.to_string_lossy();
        let paths = glob::glob(&pattern)
            .map_err(|e| AudioError::invalid_param("pattern", format!("'{}': {}", pattern, e)))?;

        let before = files.len();
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!(error = %e, "unreadable corpus entry"),
            }
        }
        debug!(
            dir = %source.dir.display(),
            pattern = %source.pattern,
            found = files.len() - before,
            "scanned corpus folder"
        );
    }

    files.sort();
    files.dedup();
    Ok(files)
}

impl ClipCorpus {
    /// Discovers and loads every clip matched by `sources`.
    pub fn load(sources: &[CorpusSource]) -> AudioResult<Self> {
        let files = discover(sources)?;
        Ok(Self::load_files(&files))
    }

    /// Loads the given files.
    ///
    /// Unreadable or empty files and files whose sample rate differs from the
    /// first loaded clip are logged and skipped; loading never fails as a whole.
    pub fn load_files(paths: &[PathBuf]) -> Self {
        let mut corpus = Self::default();

        for path in paths {
            let loaded = wav::load(path).and_then(|buffer| {
                if buffer.is_empty() {
                    return Err(AudioError::invalid_param("clip", "holds no samples"));
                }
                if let Some(first) = corpus.clips.first() {
                    first.buffer.ensure_same_rate(&buffer)?;
                }
                Ok(buffer)
            });

            match loaded {
                Ok(buffer) => corpus.clips.push(Clip {
                    path: path.clone(),
                    buffer,
                }),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping corpus file");
                    corpus.skipped.push(SkippedFile {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            clips = corpus.clips.len(),
            skipped = corpus.skipped.len(),
            "corpus loaded"
        );
        corpus
    }

    /// Builds a corpus from in-memory buffers.
    ///
    /// Empty buffers are skipped.
    ///
    /// # Errors
    /// `RateMismatch` if the buffers do not share one sample rate.
    pub fn from_buffers(buffers: Vec<SignalBuffer>) -> AudioResult<Self> {
        let mut corpus = Self::default();
        for (index, buffer) in buffers.into_iter().enumerate() {
            let path = PathBuf::from(format!("<memory:{}>", index));
            if buffer.is_empty() {
                corpus.skipped.push(SkippedFile {
                    path,
                    reason: "clip holds no samples".to_string(),
                });
                continue;
            }
            if let Some(first) = corpus.clips.first() {
                first.buffer.ensure_same_rate(&buffer)?;
            }
            corpus.clips.push(Clip { path, buffer });
        }
        Ok(corpus)
    }

    /// Number of clips.
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Whether no clip was loaded.
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Shared sample rate, or `None` for an empty corpus.
    pub fn sample_rate(&self) -> Option<u32> {
        self.clips.first().map(|c| c.buffer.sample_rate)
    }

    /// Loaded clips in path order.
    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    /// Files that were found but skipped.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    /// Total number of samples across all clips.
    pub fn total_samples(&self) -> usize {
        self.clips.iter().map(|c| c.buffer.len()).sum()
    }

    /// Picks a clip uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&SignalBuffer> {
        if self.clips.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.clips.len());
        Some(&self.clips[index].buffer)
    }
}
