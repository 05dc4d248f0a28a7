use crate::readers::dataset::ScientificDataset;

/// Candidate variable names for a gas: names containing the gas key as a
/// case-insensitive substring, in the handle's native enumeration order.
/// Callers use only the first candidate.
pub fn resolve_variables(dataset: &dyn ScientificDataset, gas_key: &str) -> Vec<String> {
    let needle = gas_key.to_ascii_lowercase();
    dataset
        .variable_names()
        .into_iter()
        .filter(|name| name.to_ascii_lowercase().contains(&needle))
        .collect()
}
