use crate::models::Gas;

/// One remote dataset source for a gas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub label: String,
    pub id: String,
}

impl CollectionRef {
    pub fn new(label: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GasEntry {
    pub gas: Gas,
    /// Candidate collections in preference order; the first to yield a
    /// non-null aggregated value wins.
    pub collections: Vec<CollectionRef>,
}

/// Static gas-to-collections catalog, constructed once at the composition
/// root and passed by reference into the extraction pipeline. Iteration
/// order is the declared order.
#[derive(Debug, Clone)]
pub struct GasCollectionCatalog {
    entries: Vec<GasEntry>,
}

impl GasCollectionCatalog {
    pub fn from_entries(entries: Vec<GasEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[GasEntry] {
        &self.entries
    }

    pub fn collections_for(&self, gas: Gas) -> Option<&[CollectionRef]> {
        self.entries
            .iter()
            .find(|e| e.gas == gas)
            .map(|e| e.collections.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GasCollectionCatalog {
    /// The TEMPO L3 collections served through Harmony.
    fn default() -> Self {
        Self::from_entries(vec![
            GasEntry {
                gas: Gas::No2,
                collections: vec![CollectionRef::new("NO2_L3", "C3685896708-LARC_CLOUD")],
            },
            GasEntry {
                gas: Gas::O3,
                collections: vec![CollectionRef::new("O3_L3", "C2930764281-LARC_CLOUD")],
            },
            GasEntry {
                gas: Gas::Hcho,
                collections: vec![CollectionRef::new("HCHO_L3", "C3685897141-LARC_CLOUD")],
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let catalog = GasCollectionCatalog::default();
        let gases: Vec<Gas> = catalog.entries().iter().map(|e| e.gas).collect();

        assert_eq!(gases, vec![Gas::No2, Gas::O3, Gas::Hcho]);
    }

    #[test]
    fn test_collections_for() {
        let catalog = GasCollectionCatalog::default();

        let no2 = catalog.collections_for(Gas::No2).unwrap();
        assert_eq!(no2.len(), 1);
        assert_eq!(no2[0].id, "C3685896708-LARC_CLOUD");

        assert!(catalog.collections_for(Gas::So2).is_none());
    }

    #[test]
    fn test_candidate_preference_order_is_preserved() {
        let catalog = GasCollectionCatalog::from_entries(vec![GasEntry {
            gas: Gas::No2,
            collections: vec![
                CollectionRef::new("NO2_L3", "C-PRIMARY"),
                CollectionRef::new("NO2_L2", "C-FALLBACK"),
            ],
        }]);

        let ids: Vec<&str> = catalog
            .collections_for(Gas::No2)
            .unwrap()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["C-PRIMARY", "C-FALLBACK"]);
    }
}
