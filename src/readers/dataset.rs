/// Capability exposed by every opened scientific dataset, regardless of the
/// backend that managed to read it.
///
/// Implementations own the namespace question internally: when the file
/// nests its data variables under the single `product` grouping level, both
/// enumeration and lookup happen inside that group, otherwise at the root.
pub trait ScientificDataset {
    /// Variable names in the handle's native enumeration order.
    fn variable_names(&self) -> Vec<String>;

    /// Mean of a variable's valid cells, or None if the variable is absent,
    /// unreadable or has no valid cells.
    ///
    /// When `quality_var` resolves to a parallel indicator in the same
    /// namespace, cells whose indicator differs from the good sentinel (0)
    /// are excluded. The low-level fallback reader does not quality-filter.
    fn mean_of(&self, variable: &str, quality_var: Option<&str>) -> Option<f64>;
}
