/// A small molecule paired with every variant when ligands are supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ligand {
    id: String,
    smiles: String,
}

impl Ligand {
    pub fn new(id: impl Into<String>, smiles: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            smiles: smiles.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The chemical descriptor in SMILES notation.
    pub fn smiles(&self) -> &str {
        &self.smiles
    }
}
