use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Column of the store master file holding the store identifier.
pub const STORE_ID_COLUMN: usize = 2;

/// Set of store identifiers accepted for processing.
///
/// Built once before the server starts and only read afterwards, so it is
/// shared behind an `Arc` without locking.
#[derive(Debug, Default, Clone)]
pub struct StoreCatalog {
    store_ids: HashSet<String>,
}

impl StoreCatalog {
    /// Load the store master CSV. The first row is a header and is skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Open {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            stores = catalog.len(),
            "Loaded store master"
        );

        Ok(catalog)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut store_ids = HashSet::new();
        for (index, record) in csv.records().enumerate() {
            let record = record?;
            let store_id = record
                .get(STORE_ID_COLUMN)
                .ok_or(CatalogError::MissingStoreId { row: index + 2 })?;
            store_ids.insert(store_id.to_string());
        }

        Ok(Self { store_ids })
    }

    pub fn contains(&self, store_id: &str) -> bool {
        self.store_ids.contains(store_id)
    }

    pub fn len(&self) -> usize {
        self.store_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store_ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StoreCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            store_ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to open store master {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Malformed store master: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store master row {row} has no store id column")]
    MissingStoreId { row: usize },
}
