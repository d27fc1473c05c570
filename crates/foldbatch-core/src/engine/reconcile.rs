use super::error::ReconcileError;
use crate::core::io::a3m::A3mFile;
use crate::core::io::error::RecordError;
use crate::core::io::traits::RecordFile;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CORRECTED_PREFIX: &str = "corrected";
const HASH_HEX_LEN: usize = 16;
const FALLBACK_SOURCE_NAME: &str = "alignment.a3m";

/// Where the alignment used for a job came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// The source alignment already matched; nothing was written.
    Original(PathBuf),
    /// A corrected alignment for this key existed on disk and was reused.
    Cached(PathBuf),
    /// A corrected alignment was written during this call.
    Corrected(PathBuf),
}

impl Reconciled {
    pub fn path(&self) -> &Path {
        match self {
            Self::Original(path) | Self::Cached(path) | Self::Corrected(path) => path,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            Self::Original(path) | Self::Cached(path) | Self::Corrected(path) => path,
        }
    }

    pub fn wrote_file(&self) -> bool {
        matches!(self, Self::Corrected(_))
    }
}

/// Write-once store of alignments whose query row was replaced by a variant sequence.
///
/// Entries are keyed by the target sequence (its length and a SHA-256 prefix) and the
/// source alignment's file name. An existing entry is never rewritten, which also makes
/// entries left by earlier runs reusable.
#[derive(Debug, Clone)]
pub struct AlignmentCache {
    dir: PathBuf,
}

impl AlignmentCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the corrected alignment for `target` derived from `source`.
    pub fn entry_path(&self, target: &str, source: &Path) -> PathBuf {
        let source_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FALLBACK_SOURCE_NAME.to_string());
        self.dir.join(format!(
            "{}_{}_{}_{}",
            CORRECTED_PREFIX,
            target.len(),
            sequence_digest(target),
            source_name
        ))
    }

    /// Ensures the query of the alignment at `source` equals `target`.
    ///
    /// Returns the source unchanged when its ungapped query already matches; otherwise
    /// returns the cache entry for `(target, source)`, writing it first if absent. The
    /// source file is never modified.
    ///
    /// # Errors
    ///
    /// `MissingAlignment` if `source` cannot be read, `EmptyAlignment` if it holds no
    /// records, `CacheWrite` if a new entry cannot be written.
    pub fn reconcile(&self, target: &str, source: &Path) -> Result<Reconciled, ReconcileError> {
        let alignment = A3mFile::read_from_path(source).map_err(|e| match e {
            RecordError::Io(source_err) => ReconcileError::MissingAlignment {
                path: source.to_path_buf(),
                source: source_err,
            },
            RecordError::MissingRecord(_) => {
                ReconcileError::EmptyAlignment {
                    path: source.to_path_buf(),
                }
            }
        })?;

        if alignment.query_matches(target) {
            debug!("Alignment {:?} query matches target; using it as is.", source);
            return Ok(Reconciled::Original(source.to_path_buf()));
        }

        let entry = self.entry_path(target, source);
        if entry.exists() {
            debug!("Reusing corrected alignment {:?}.", &entry);
            return Ok(Reconciled::Cached(entry));
        }

        let cache_write = |source_err: io::Error| ReconcileError::CacheWrite {
            path: entry.clone(),
            source: source_err,
        };

        fs::create_dir_all(&self.dir).map_err(cache_write)?;
        let partial = entry.with_extension("partial");
        A3mFile::write_to_path(&alignment.with_query(target), &partial)
            .map_err(|e| cache_write(into_io_error(e)))?;
        fs::rename(&partial, &entry).map_err(cache_write)?;

        info!(
            "Query of {:?} did not match the target sequence; wrote corrected alignment {:?}.",
            source, &entry
        );
        Ok(Reconciled::Corrected(entry))
    }
}

fn sequence_digest(sequence: &str) -> String {
    Sha256::digest(sequence.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<String>()
        .chars()
        .take(HASH_HEX_LEN)
        .collect()
}

fn into_io_error(err: RecordError) -> io::Error {
    match err {
        RecordError::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct TestSetup {
        temp_dir: TempDir,
        cache: AlignmentCache,
    }

    fn setup() -> TestSetup {
        let temp_dir = TempDir::new().unwrap();
        let cache = AlignmentCache::new(temp_dir.path().join("corrected_msa"));
        TestSetup { temp_dir, cache }
    }

    fn write_alignment(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn cache_entries(cache: &AlignmentCache) -> Vec<PathBuf> {
        match fs::read_dir(cache.dir()) {
            Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }

    #[test]
    fn matching_gapped_query_returns_original_without_writing() {
        let setup = setup();
        let source = write_alignment(setup.temp_dir.path(), "p1.a3m", ">101\nAC-DE\n>hit\nACCDE\n");

        let reconciled = setup.cache.reconcile("ACDE", &source).unwrap();

        assert_eq!(reconciled, Reconciled::Original(source));
        assert!(!reconciled.wrote_file());
        assert!(!setup.cache.dir().exists());
    }

    #[test]
    fn mismatching_query_writes_corrected_alignment_once() {
        let setup = setup();
        let original = ">101\nACDF\n>hit_1\nAC-DF\n>hit_2\nACDE\n";
        let source = write_alignment(setup.temp_dir.path(), "p1.a3m", original);

        let first = setup.cache.reconcile("ACDE", &source).unwrap();
        assert!(matches!(first, Reconciled::Corrected(_)));
        assert_eq!(
            fs::read_to_string(first.path()).unwrap(),
            ">101\nACDE\n>hit_1\nAC-DF\n>hit_2\nACDE\n"
        );
        assert_eq!(fs::read_to_string(&source).unwrap(), original);

        let second = setup.cache.reconcile("ACDE", &source).unwrap();
        assert_eq!(second, Reconciled::Cached(first.path().to_path_buf()));
        assert_eq!(cache_entries(&setup.cache), vec![first.into_path()]);
    }

    #[test]
    fn existing_cache_entry_from_previous_run_is_not_rewritten() {
        let setup = setup();
        let source = write_alignment(setup.temp_dir.path(), "p1.a3m", ">101\nACDF\n");
        let entry = setup.cache.entry_path("ACDE", &source);
        fs::create_dir_all(setup.cache.dir()).unwrap();
        fs::write(&entry, "sentinel").unwrap();

        let reconciled = setup.cache.reconcile("ACDE", &source).unwrap();

        assert_eq!(reconciled, Reconciled::Cached(entry.clone()));
        assert_eq!(fs::read_to_string(entry).unwrap(), "sentinel");
    }

    #[test]
    fn equal_length_sequences_get_distinct_entries() {
        let setup = setup();
        let source = write_alignment(setup.temp_dir.path(), "p1.a3m", ">101\nAAAA\n");

        let first = setup.cache.reconcile("ACDE", &source).unwrap();
        let second = setup.cache.reconcile("GCDE", &source).unwrap();

        assert_ne!(first.path(), second.path());
        assert!(fs::read_to_string(second.path()).unwrap().contains("GCDE"));
        assert_eq!(cache_entries(&setup.cache).len(), 2);
    }

    #[test]
    fn entry_path_combines_length_digest_and_source_name() {
        let cache = AlignmentCache::new("/cache");
        let entry = cache.entry_path("ACDE", Path::new("/msa/p1.a3m"));
        let name = entry.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("corrected_4_"));
        assert!(name.ends_with("_p1.a3m"));
        assert_eq!(name.len(), "corrected_4_".len() + HASH_HEX_LEN + "_p1.a3m".len());
        assert_eq!(entry, cache.entry_path("ACDE", Path::new("/elsewhere/p1.a3m")));
    }

    #[test]
    fn missing_source_is_reported_as_missing_alignment() {
        let setup = setup();
        let missing = setup.temp_dir.path().join("absent.a3m");
        let err = setup.cache.reconcile("ACDE", &missing).unwrap_err();
        assert!(matches!(err, ReconcileError::MissingAlignment { .. }));
    }

    #[test]
    fn source_without_records_is_reported_as_empty_alignment() {
        let setup = setup();
        let source = write_alignment(setup.temp_dir.path(), "empty.a3m", "");
        let err = setup.cache.reconcile("ACDE", &source).unwrap_err();
        assert!(matches!(err, ReconcileError::EmptyAlignment { .. }));
    }
}
