use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;

use super::structs::TheoremSpec;
use crate::errors::AreaError;
use crate::prover::Theorem;

/// Reads a JSON array of [`TheoremSpec`] from a file.
///
/// # Errors
/// [`AreaError::Io`] if the file cannot be opened and [`AreaError::Json`]
/// if it is not a list of theorems.
pub fn read_theorem_specs(file_path: &Path) -> Result<Vec<TheoremSpec>, AreaError> {
    let file = File::open(file_path)?;
    let specs: Vec<TheoremSpec> = serde_json::from_reader(BufReader::new(file))?;
    info!("Read {} theorems from {}", specs.len(), file_path.display());
    Ok(specs)
}

/// Reads and builds every theorem of a file. Fails on the first theorem
/// that does not build.
///
/// # Errors
/// See [`read_theorem_specs`] and [`TheoremSpec::to_theorem`].
pub fn read_theorems(file_path: &Path) -> Result<Vec<Theorem>, AreaError> {
    read_theorem_specs(file_path)?
        .iter()
        .map(TheoremSpec::to_theorem)
        .collect()
}
