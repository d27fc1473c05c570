use crate::core::io::fasta::FastaFile;
use crate::core::io::traits::RecordFile;
use crate::core::models::ligand::Ligand;
use crate::core::models::variant::SequenceVariant;
use crate::core::utils::identifiers::job_identity;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Alignment files keyed by file stem.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl AlignmentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index keyed by each path's file stem. Later paths win on duplicate stems.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut index = Self::new();
        for path in paths {
            if let Some(stem) = path.file_stem() {
                index.insert(stem.to_string_lossy().into_owned(), path);
            }
        }
        index
    }

    pub fn insert(&mut self, stem: impl Into<String>, path: PathBuf) {
        self.entries.insert(stem.into(), path);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the alignment for a sequence file stem.
    ///
    /// An exact stem match wins. Without one, the only alignment of a single-entry index
    /// is shared by every sequence file; any other index leaves the stem unmatched.
    pub fn resolve(&self, stem: &str) -> Option<&Path> {
        if let Some(path) = self.entries.get(stem) {
            return Some(path);
        }
        if self.entries.len() == 1 {
            return self.entries.values().next().map(PathBuf::as_path);
        }
        None
    }
}

/// One sequence file paired with its alignment, with its records parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSource {
    pub file_name: String,
    pub alignment: PathBuf,
    pub variants: Vec<SequenceVariant>,
}

/// A single unit of work: one variant, optionally paired with one ligand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDescriptor<'a> {
    pub variant: &'a SequenceVariant,
    pub ligand: Option<&'a Ligand>,
    pub alignment: &'a Path,
    pub source_file: &'a str,
}

impl TaskDescriptor<'_> {
    pub fn job_identity(&self) -> String {
        job_identity(self.variant.id(), self.ligand.map(Ligand::id))
    }
}

/// The matched inputs of a batch, from which tasks are enumerated lazily.
#[derive(Debug, Clone, Default)]
pub struct TaskPlan {
    sources: Vec<SequenceSource>,
    ligands: Vec<Ligand>,
    unmatched: Vec<PathBuf>,
    unreadable: Vec<PathBuf>,
}

impl TaskPlan {
    /// Pairs each sequence file with an alignment and parses the matched ones.
    ///
    /// Sequence files without an alignment contribute no tasks. A matched file that
    /// cannot be read or parsed is skipped with a warning, so only its own tasks are lost.
    pub fn build(sequence_files: &[PathBuf], index: &AlignmentIndex, ligands: Vec<Ligand>) -> Self {
        let mut plan = Self {
            ligands,
            ..Self::default()
        };

        for path in sequence_files {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let Some(alignment) = index.resolve(&stem) else {
                debug!("No alignment matches {:?}; skipping.", path);
                plan.unmatched.push(path.clone());
                continue;
            };

            match FastaFile::read_from_path(path) {
                Ok(variants) => {
                    if variants.is_empty() {
                        warn!("Sequence file {:?} contains no records.", path);
                    }
                    plan.sources.push(SequenceSource {
                        file_name: path
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default(),
                        alignment: alignment.to_path_buf(),
                        variants,
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable sequence file {:?}: {}", path, e);
                    plan.unreadable.push(path.clone());
                }
            }
        }
        plan
    }

    pub fn from_sources(sources: Vec<SequenceSource>, ligands: Vec<Ligand>) -> Self {
        Self {
            sources,
            ligands,
            ..Self::default()
        }
    }

    pub fn sources(&self) -> &[SequenceSource] {
        &self.sources
    }

    pub fn ligands(&self) -> &[Ligand] {
        &self.ligands
    }

    pub fn unmatched(&self) -> &[PathBuf] {
        &self.unmatched
    }

    pub fn unreadable(&self) -> &[PathBuf] {
        &self.unreadable
    }

    /// Matched records × max(1, ligands).
    pub fn len(&self) -> usize {
        let variants: usize = self.sources.iter().map(|s| s.variants.len()).sum();
        variants * self.ligands.len().max(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tasks in file order, then record order, then ligand order.
    pub fn tasks(&self) -> Tasks<'_> {
        Tasks {
            sources: &self.sources,
            ligands: &self.ligands,
            source_idx: 0,
            variant_idx: 0,
            ligand_idx: 0,
            remaining: self.len(),
        }
    }
}

/// Lazy cross product over the variants and ligands of a [`TaskPlan`].
#[derive(Debug, Clone)]
pub struct Tasks<'a> {
    sources: &'a [SequenceSource],
    ligands: &'a [Ligand],
    source_idx: usize,
    variant_idx: usize,
    ligand_idx: usize,
    remaining: usize,
}

impl<'a> Iterator for Tasks<'a> {
    type Item = TaskDescriptor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let sources: &'a [SequenceSource] = self.sources;
        let ligands: &'a [Ligand] = self.ligands;
        loop {
            let source = sources.get(self.source_idx)?;
            let Some(variant) = source.variants.get(self.variant_idx) else {
                self.source_idx += 1;
                self.variant_idx = 0;
                continue;
            };

            let ligand = ligands.get(self.ligand_idx);
            self.ligand_idx += 1;
            if self.ligand_idx >= ligands.len() {
                self.ligand_idx = 0;
                self.variant_idx += 1;
            }
            self.remaining = self.remaining.saturating_sub(1);

            return Some(TaskDescriptor {
                variant,
                ligand,
                alignment: &source.alignment,
                source_file: &source.file_name,
            });
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Tasks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn source(name: &str, variants: &[(&str, &str)]) -> SequenceSource {
        SequenceSource {
            file_name: format!("{name}.fasta"),
            alignment: PathBuf::from(format!("/msa/{name}.a3m")),
            variants: variants
                .iter()
                .map(|(id, seq)| SequenceVariant::new(*id, *seq))
                .collect(),
        }
    }

    fn identities(plan: &TaskPlan) -> Vec<String> {
        plan.tasks().map(|t| t.job_identity()).collect()
    }

    #[test]
    fn resolve_prefers_exact_stem_match() {
        let mut index = AlignmentIndex::new();
        index.insert("p1", PathBuf::from("p1.a3m"));
        index.insert("p2", PathBuf::from("p2.a3m"));
        assert_eq!(index.resolve("p2"), Some(Path::new("p2.a3m")));
        assert_eq!(index.resolve("p3"), None);
    }

    #[test]
    fn resolve_falls_back_to_single_shared_alignment() {
        let index = AlignmentIndex::from_paths([PathBuf::from("/msa/shared.a3m")]);
        assert_eq!(index.resolve("anything"), Some(Path::new("/msa/shared.a3m")));
        assert_eq!(AlignmentIndex::new().resolve("anything"), None);
    }

    #[test]
    fn variants_without_ligands_yield_one_task_each() {
        let plan = TaskPlan::from_sources(
            vec![source("wt", &[("WT", "ACDE"), ("WT_A2G", "GCDE")])],
            vec![],
        );
        assert_eq!(plan.len(), 2);
        assert_eq!(identities(&plan), vec!["WT", "WT_A2G"]);
        assert!(plan.tasks().all(|t| t.ligand.is_none()));
    }

    #[test]
    fn variants_and_ligands_yield_ordered_cross_product() {
        let plan = TaskPlan::from_sources(
            vec![source("wt", &[("WT", "ACDE"), ("WT_A2G", "GCDE")])],
            vec![Ligand::new("LIG1", "CCO"), Ligand::new("LIG2", "CCN")],
        );
        assert_eq!(plan.len(), 4);
        assert_eq!(
            identities(&plan),
            vec!["WT_LIG1", "WT_LIG2", "WT_A2G_LIG1", "WT_A2G_LIG2"]
        );
    }

    #[test]
    fn tasks_follow_file_then_record_order_and_skip_empty_sources() {
        let plan = TaskPlan::from_sources(
            vec![
                source("a", &[("A1", "MK")]),
                source("empty", &[]),
                source("b", &[("B1", "MA"), ("B2", "MG")]),
            ],
            vec![Ligand::new("L", "C")],
        );
        let tasks: Vec<_> = plan.tasks().collect();
        assert_eq!(tasks.len(), plan.len());
        assert_eq!(
            tasks.iter().map(|t| t.source_file).collect::<Vec<_>>(),
            vec!["a.fasta", "b.fasta", "b.fasta"]
        );
        assert_eq!(tasks[2].alignment, Path::new("/msa/b.a3m"));
        assert_eq!(tasks[2].variant.sequence(), "MG");
    }

    #[test]
    fn tasks_reports_exact_remaining_length() {
        let plan = TaskPlan::from_sources(
            vec![source("a", &[("A1", "MK"), ("A2", "MR")])],
            vec![Ligand::new("L1", "C"), Ligand::new("L2", "N"), Ligand::new("L3", "O")],
        );
        let mut tasks = plan.tasks();
        assert_eq!(tasks.len(), 6);
        tasks.next();
        tasks.next();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks.count(), 4);
    }

    #[test]
    fn task_count_matches_records_times_ligands_for_many_shapes() {
        for (records, ligand_count) in [(0, 0), (0, 3), (1, 0), (3, 1), (5, 4)] {
            let variants: Vec<(String, String)> =
                (0..records).map(|i| (format!("V{i}"), "MK".to_string())).collect();
            let borrowed: Vec<(&str, &str)> = variants
                .iter()
                .map(|(id, seq)| (id.as_str(), seq.as_str()))
                .collect();
            let ligands = (0..ligand_count)
                .map(|i| Ligand::new(format!("L{i}"), "C"))
                .collect();
            let plan = TaskPlan::from_sources(vec![source("s", &borrowed)], ligands);
            assert_eq!(plan.tasks().count(), records * ligand_count.max(1));
            assert_eq!(plan.len(), records * ligand_count.max(1));
        }
    }

    #[test]
    fn build_pairs_files_with_alignments_and_skips_unmatched() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("p1.fasta"), ">WT\nACDE\n>WT_A2G\nGCDE\n").unwrap();
        fs::write(dir.join("p2.fa"), ">X\nMK\n").unwrap();

        let mut index = AlignmentIndex::new();
        index.insert("p1", dir.join("p1.a3m"));
        index.insert("other", dir.join("other.a3m"));

        let files = vec![dir.join("p1.fasta"), dir.join("p2.fa")];
        let plan = TaskPlan::build(&files, &index, vec![]);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.sources()[0].file_name, "p1.fasta");
        assert_eq!(plan.sources()[0].alignment, dir.join("p1.a3m"));
        assert_eq!(plan.unmatched(), &[dir.join("p2.fa")]);
    }

    #[test]
    fn build_skips_unreadable_sequence_files() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(dir.join("good.fasta"), ">G\nMK\n").unwrap();
        fs::write(dir.join("bad.fasta"), [b'>', 0xff, 0xfe, b'\n']).unwrap();
        let index = AlignmentIndex::from_paths([dir.join("shared.a3m")]);

        let files = vec![
            dir.join("bad.fasta"),
            dir.join("missing.fasta"),
            dir.join("good.fasta"),
        ];
        let plan = TaskPlan::build(&files, &index, vec![Ligand::new("L", "C")]);

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.unreadable().len(), 2);
        assert_eq!(identities(&plan), vec!["G_L"]);
    }

    #[test]
    fn build_keeps_valid_records_of_files_with_stray_lines_or_nameless_records() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        fs::write(
            dir.join("p1.fasta"),
            "generated by tool\n>WT\nACDE\n>WT_A2G\nGCDE\n",
        )
        .unwrap();
        fs::write(dir.join("p2.fasta"), ">WT2\nACDE\n>\nAAAA\n>WT3\nGCDE\n").unwrap();
        let index = AlignmentIndex::from_paths([dir.join("shared.a3m")]);

        let files = vec![dir.join("p1.fasta"), dir.join("p2.fasta")];
        let plan = TaskPlan::build(&files, &index, vec![]);

        assert!(plan.unreadable().is_empty());
        assert_eq!(plan.len(), 4);
        assert_eq!(identities(&plan), vec!["WT", "WT_A2G", "WT2", "WT3"]);
    }
}
