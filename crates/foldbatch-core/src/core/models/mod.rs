pub mod ligand;
pub mod variant;
