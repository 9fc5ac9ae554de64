pub mod contamination;
pub mod maladie;
pub mod mosquito;
pub mod traitement;
