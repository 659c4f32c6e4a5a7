// 🏷️ Price Catalog - product prices backed by a flat CSV file
//
// One row per product: id,name,price (no header row).
// The catalog lives in memory; load/save open the file only for the
// duration of the call.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Minimum number of fields a row needs to become an entry
pub const MIN_FIELDS: usize = 3;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("price file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to access price file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV in {}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid price {value:?} on line {line} of {}", path.display())]
    InvalidPrice {
        path: PathBuf,
        line: u64,
        value: String,
    },
}

impl CatalogError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            CatalogError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            CatalogError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    fn from_csv(path: &Path, source: csv::Error) -> Self {
        CatalogError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ============================================================================
// ENTRY
// ============================================================================

/// One product in the price list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        CatalogEntry {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// `ID: <id>, Name: <name>, Price: <price>`
    pub fn display_line(&self) -> String {
        format!(
            "ID: {}, Name: {}, Price: {}",
            self.id,
            self.name,
            format_price(self.price)
        )
    }
}

/// Render a price the way the price file stores it.
///
/// Shortest decimal that round-trips, but integral values keep one
/// decimal place: `1.5` → "1.5", `2.0` → "2.0".
pub fn format_price(price: f64) -> String {
    if price.is_finite() && price.fract() == 0.0 && price.abs() < 1e16 {
        format!("{:.1}", price)
    } else {
        format!("{}", price)
    }
}

// ============================================================================
// CATALOG
// ============================================================================

/// In-memory price list keyed by product id.
///
/// Resource names are resolved against `base_dir`, never against the
/// caller's working directory.
#[derive(Debug, Clone)]
pub struct Catalog {
    base_dir: PathBuf,
    entries: HashMap<String, CatalogEntry>,
}

impl Catalog {
    /// Empty catalog rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Catalog {
            base_dir: base_dir.into(),
            entries: HashMap::new(),
        }
    }

    /// Create a catalog and load `resource_name` into it
    pub fn open(base_dir: impl Into<PathBuf>, resource_name: &str) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new(base_dir);
        catalog.load(resource_name)?;
        Ok(catalog)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resource_path(&self, resource_name: &str) -> PathBuf {
        self.base_dir.join(resource_name)
    }

    /// Load rows from `resource_name` into the catalog.
    ///
    /// Rows shorter than three fields are skipped. A duplicate id
    /// replaces the earlier entry. A price that does not parse stops the
    /// load; rows applied before it stay in the catalog.
    ///
    /// Returns the number of rows applied.
    pub fn load(&mut self, resource_name: &str) -> Result<usize, CatalogError> {
        let path = self.resource_path(resource_name);
        let file = File::open(&path).map_err(|e| CatalogError::from_io(&path, e))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut applied = 0;
        let mut skipped = 0;

        for result in reader.records() {
            let record = result.map_err(|e| CatalogError::from_csv(&path, e))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.len() < MIN_FIELDS {
                debug!(line, fields = record.len(), "skipping short row");
                skipped += 1;
                continue;
            }

            let raw_price = &record[2];
            let price: f64 = match raw_price.trim().parse() {
                Ok(price) => price,
                Err(_) => {
                    warn!(line, value = raw_price, path = %path.display(), "invalid price");
                    return Err(CatalogError::InvalidPrice {
                        path,
                        line,
                        value: raw_price.to_string(),
                    });
                }
            };

            let entry = CatalogEntry::new(&record[0], &record[1], price);
            self.entries.insert(entry.id.clone(), entry);
            applied += 1;
        }

        info!(
            path = %path.display(),
            applied,
            skipped,
            total = self.entries.len(),
            "price list loaded"
        );

        Ok(applied)
    }

    /// Write every entry to `resource_name`, replacing its contents.
    ///
    /// Rows come out in map iteration order. Returns the number written.
    pub fn save(&self, resource_name: &str) -> Result<usize, CatalogError> {
        let path = self.resource_path(resource_name);
        let file = File::create(&path).map_err(|e| CatalogError::from_io(&path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for entry in self.entries.values() {
            writer
                .write_record([
                    entry.id.as_str(),
                    entry.name.as_str(),
                    format_price(entry.price).as_str(),
                ])
                .map_err(|e| CatalogError::from_csv(&path, e))?;
        }

        writer
            .flush()
            .map_err(|e| CatalogError::from_io(&path, e))?;

        info!(path = %path.display(), written = self.entries.len(), "price list saved");

        Ok(self.entries.len())
    }

    /// Price for `id`, or `None` when the product is unknown
    pub fn get_price(&self, id: &str) -> Option<f64> {
        self.entries.get(id).map(|entry| entry.price)
    }

    /// Update the price of an existing product.
    ///
    /// Unknown ids are ignored (nothing is inserted). Returns whether an
    /// entry was updated. Prices are not validated.
    pub fn set_price(&mut self, id: &str, price: f64) -> bool {
        match self.entries.get_mut(id) {
            Some(entry) => {
                entry.price = price;
                true
            }
            None => false,
        }
    }

    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    /// The live mapping, borrowed. Clone it for a snapshot.
    pub fn get_all(&self) -> &HashMap<String, CatalogEntry> {
        &self.entries
    }

    /// Entries ordered by id
    pub fn sorted_entries(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write one `ID: .., Name: .., Price: ..` line per entry
    pub fn write_all<W: Write>(&self, mut out: W) -> io::Result<()> {
        for entry in self.entries.values() {
            writeln!(out, "{}", entry.display_line())?;
        }
        Ok(())
    }

    /// Print every entry to stdout
    pub fn print_all(&self) {
        for entry in self.entries.values() {
            println!("{}", entry.display_line());
        }
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Catalog shared between the parts of one application
pub type SharedCatalog = Arc<Mutex<Catalog>>;

/// Holder of the application's single catalog.
///
/// The first `open` loads the file; every later `open` hands back the
/// same catalog untouched, whatever resource name it is given. Build one
/// registry per application and pass it to whoever needs the catalog.
#[derive(Debug)]
pub struct CatalogRegistry {
    base_dir: PathBuf,
    instance: Mutex<Option<SharedCatalog>>,
}

impl CatalogRegistry {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        CatalogRegistry {
            base_dir: base_dir.into(),
            instance: Mutex::new(None),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the catalog, loading `resource_name` on first use only
    pub fn open(&self, resource_name: &str) -> Result<SharedCatalog, CatalogError> {
        let mut slot = self.instance.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = slot.as_ref() {
            debug!(resource_name, "catalog already initialized, ignoring resource");
            return Ok(Arc::clone(existing));
        }

        let catalog = Catalog::open(&self.base_dir, resource_name)?;
        let shared = Arc::new(Mutex::new(catalog));
        *slot = Some(Arc::clone(&shared));

        Ok(shared)
    }

    pub fn is_initialized(&self) -> bool {
        self.instance
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Helper: temp dir holding `name` with the given contents
    fn data_dir_with(name: &str, contents: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(name), contents).unwrap();
        dir
    }

    #[test]
    fn test_load_and_get_price() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n2,Banana,0.75\n");
        let catalog = Catalog::open(dir.path(), "prices.csv").unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get_price("1"), Some(1.50));
        assert_eq!(catalog.get_price("2"), Some(0.75));
        assert_eq!(catalog.get_price("3"), None);
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n3,Bad\n\n2,Banana,0.75\n");
        let mut catalog = Catalog::new(dir.path());

        let applied = catalog.load("prices.csv").unwrap();

        assert_eq!(applied, 2);
        assert_eq!(catalog.get_price("3"), None);
        assert_eq!(catalog.get_price("2"), Some(0.75));
    }

    #[test]
    fn test_duplicate_id_overwrites() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n1,Green Apple,1.80\n");
        let catalog = Catalog::open(dir.path(), "prices.csv").unwrap();

        assert_eq!(catalog.len(), 1);
        let entry = catalog.entry("1").unwrap();
        assert_eq!(entry.name, "Green Apple");
        assert_eq!(entry.price, 1.80);
    }

    #[test]
    fn test_extra_fields_and_padded_price() {
        let dir = data_dir_with("prices.csv", "7,Milk, 2.25 ,dairy\n");
        let catalog = Catalog::open(dir.path(), "prices.csv").unwrap();

        assert_eq!(catalog.get_price("7"), Some(2.25));
    }

    #[test]
    fn test_invalid_price_fails_load() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n2,Banana,cheap\n3,Cherry,4.00\n");
        let mut catalog = Catalog::new(dir.path());

        let err = catalog.load("prices.csv").unwrap_err();

        match err {
            CatalogError::InvalidPrice { line, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(value, "cheap");
            }
            other => panic!("expected InvalidPrice, got {:?}", other),
        }

        // Rows before the bad one were applied, rows after were not
        assert_eq!(catalog.get_price("1"), Some(1.50));
        assert_eq!(catalog.get_price("3"), None);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::open(dir.path(), "missing.csv").unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { .. }));
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_set_price() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n2,Banana,0.75\n");
        let mut catalog = Catalog::open(dir.path(), "prices.csv").unwrap();
        let before = catalog.get_all().clone();

        assert!(!catalog.set_price("99", 5.0));
        assert_eq!(catalog.get_all(), &before);
        assert_eq!(catalog.get_price("99"), None);

        assert!(catalog.set_price("1", 2.00));
        assert_eq!(catalog.get_price("1"), Some(2.00));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n2,\"Banana, ripe\",0.75\n3,Cake,12\n");
        let mut catalog = Catalog::open(dir.path(), "prices.csv").unwrap();
        catalog.set_price("1", 0.1 + 0.2);

        let written = catalog.save("copy.csv").unwrap();
        assert_eq!(written, 3);

        let reloaded = Catalog::open(dir.path(), "copy.csv").unwrap();
        assert_eq!(reloaded.get_all(), catalog.get_all());
    }

    #[test]
    fn test_save_overwrites_target() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n");
        fs::write(dir.path().join("out.csv"), "9,Old,9.99\n8,Older,8.88\n").unwrap();

        let catalog = Catalog::open(dir.path(), "prices.csv").unwrap();
        catalog.save("out.csv").unwrap();

        let contents = fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(contents, "1,Apple,1.5\n");
    }

    #[test]
    fn test_write_all_format() {
        let mut catalog = Catalog::new("unused");
        catalog
            .entries
            .insert("1".to_string(), CatalogEntry::new("1", "Apple", 1.5));

        let mut out = Vec::new();
        catalog.write_all(&mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "ID: 1, Name: Apple, Price: 1.5\n");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(1.5), "1.5");
        assert_eq!(format_price(2.0), "2.0");
        assert_eq!(format_price(0.75), "0.75");
        assert_eq!(format_price(-3.0), "-3.0");
    }

    #[test]
    fn test_sorted_entries() {
        let dir = data_dir_with("prices.csv", "b,Bread,2.0\na,Apple,1.0\nc,Cheese,5.0\n");
        let catalog = Catalog::open(dir.path(), "prices.csv").unwrap();

        let ids: Vec<String> = catalog.sorted_entries().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_registry_keeps_first_catalog() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n");
        fs::write(dir.path().join("other.csv"), "1,Apple,9.99\n2,Pear,3.00\n").unwrap();

        let registry = CatalogRegistry::new(dir.path());
        assert!(!registry.is_initialized());

        let first = registry.open("prices.csv").unwrap();
        let second = registry.open("other.csv").unwrap();

        assert!(registry.is_initialized());
        assert!(Arc::ptr_eq(&first, &second));

        let catalog = second.lock().unwrap();
        assert_eq!(catalog.get_price("1"), Some(1.50));
        assert_eq!(catalog.get_price("2"), None);
    }

    #[test]
    fn test_registry_shares_mutations() {
        let dir = data_dir_with("prices.csv", "1,Apple,1.50\n");
        let registry = CatalogRegistry::new(dir.path());

        registry.open("prices.csv").unwrap().lock().unwrap().set_price("1", 3.0);

        let again = registry.open("prices.csv").unwrap();
        assert_eq!(again.lock().unwrap().get_price("1"), Some(3.0));
    }

    #[test]
    fn test_registry_failed_open_can_retry() {
        let dir = tempfile::tempdir().unwrap();
        let registry = CatalogRegistry::new(dir.path());

        assert!(registry.open("prices.csv").is_err());
        assert!(!registry.is_initialized());

        fs::write(dir.path().join("prices.csv"), "1,Apple,1.50\n").unwrap();
        let catalog = registry.open("prices.csv").unwrap();
        assert_eq!(catalog.lock().unwrap().len(), 1);
    }
}
