use super::tasks::TaskDescriptor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const FORMAT_VERSION: u32 = 1;
pub const PROTEIN_ENTITY_ID: &str = "A";
pub const LIGAND_ENTITY_ID: &str = "B";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProteinEntry {
    pub id: String,
    pub sequence: String,
    pub msa: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LigandEntry {
    pub id: String,
    pub smiles: String,
}

/// One item of the `sequences` list; exactly one field is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<ProteinEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ligand: Option<LigandEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffinityProperty {
    pub binder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyEntry {
    pub affinity: AffinityProperty,
}

/// The job input file handed to the prediction engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfiguration {
    pub version: u32,
    pub sequences: Vec<SequenceEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyEntry>,
}

impl JobConfiguration {
    /// Builds the configuration for `task` using the already reconciled alignment `msa`.
    ///
    /// The affinity directive is added only when requested and a ligand is present. A ligand
    /// with empty SMILES keeps its job identity but contributes no entry.
    pub fn for_task(task: &TaskDescriptor<'_>, msa: &Path, predict_affinity: bool) -> Self {
        let mut sequences = vec![SequenceEntry {
            protein: Some(ProteinEntry {
                id: PROTEIN_ENTITY_ID.to_string(),
                sequence: task.variant.sequence().to_string(),
                msa: msa.to_path_buf(),
            }),
            ligand: None,
        }];
        let mut properties = Vec::new();

        if let Some(ligand) = task.ligand.filter(|l| !l.smiles().is_empty()) {
            sequences.push(SequenceEntry {
                protein: None,
                ligand: Some(LigandEntry {
                    id: LIGAND_ENTITY_ID.to_string(),
                    smiles: ligand.smiles().to_string(),
                }),
            });
            if predict_affinity {
                properties.push(PropertyEntry {
                    affinity: AffinityProperty {
                        binder: LIGAND_ENTITY_ID.to_string(),
                    },
                });
            }
        }

        Self {
            version: FORMAT_VERSION,
            sequences,
            properties,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

/// A named job ready to be persisted and submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    identity: String,
    configuration: JobConfiguration,
}

impl Job {
    pub fn build(task: &TaskDescriptor<'_>, msa: &Path, predict_affinity: bool) -> Self {
        Self {
            identity: task.job_identity(),
            configuration: JobConfiguration::for_task(task, msa, predict_affinity),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn configuration(&self) -> &JobConfiguration {
        &self.configuration
    }

    pub fn config_file_name(&self) -> String {
        format!("{}.yaml", self.identity)
    }
}
