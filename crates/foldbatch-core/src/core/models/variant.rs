/// A named protein sequence, either a wild type or one of its mutants.
///
/// Variants are immutable once parsed; the engine only reads them to reconcile
/// alignments and to build job configurations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceVariant {
    id: String,
    sequence: String,
}

impl SequenceVariant {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
