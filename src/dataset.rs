//! Item/element pair datasets.
//!
//! A [`Dataset`] is an immutable view over `(item, element)` rows. It
//! assigns every distinct item and element a dense index in first-occurrence
//! order and precomputes a [`CoverageMap`] from item index to the element
//! indices that item covers.
//!
//! Rows usually come from a CSV file with a `Drug` and a `Target` column,
//! but any pair iterator works via [`Dataset::from_pairs`].

use crate::error::{CoverError, Result};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Names of the two required columns in tabular input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    /// Column holding the item identifier.
    pub item: String,
    /// Column holding the universe-element identifier.
    pub element: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            item: "Drug".into(),
            element: "Target".into(),
        }
    }
}

impl Columns {
    pub fn new(item: impl Into<String>, element: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            element: element.into(),
        }
    }
}

/// Read-only mapping from item index to the element indices it covers.
///
/// Element indices for each item are unique and kept in the order they
/// first appeared for that item. An item may cover nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMap {
    covered: Vec<Vec<usize>>,
    num_elements: usize,
}

impl CoverageMap {
    /// Element indices covered by `item`.
    ///
    /// # Panics
    /// Panics if `item` is out of range.
    pub fn covered(&self, item: usize) -> &[usize] {
        &self.covered[item]
    }

    /// Number of distinct elements covered by `item`.
    pub fn count(&self, item: usize) -> usize {
        self.covered[item].len()
    }

    /// Number of items in the map.
    pub fn len(&self) -> usize {
        self.covered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covered.is_empty()
    }

    /// Size of the element universe the indices refer to.
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }
}

/// Immutable item/element dataset with precomputed coverage.
#[derive(Debug, Clone)]
pub struct Dataset {
    items: Vec<String>,
    elements: Vec<String>,
    coverage: CoverageMap,
    item_index: HashMap<String, usize>,
}

impl Dataset {
    /// Builds a dataset from `(item, element)` pairs.
    ///
    /// Duplicate pairs are collapsed. Returns [`CoverError::EmptyDataset`]
    /// if the iterator yields nothing.
    pub fn from_pairs<I, A, B>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut builder = DatasetBuilder::default();
        for (item, element) in pairs {
            builder.push(item.as_ref(), element.as_ref());
        }
        builder.finish()
    }

    /// Reads a CSV table with a header row.
    ///
    /// Both columns named in `columns` must be present in the header.
    /// Rows where either cell is blank or missing are skipped; other
    /// columns may be short or absent on any row.
    pub fn from_csv_reader<R: Read>(reader: R, columns: &Columns) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| CoverError::Schema {
                    column: name.to_string(),
                })
        };
        let item_col = find(&columns.item)?;
        let element_col = find(&columns.element)?;

        let mut builder = DatasetBuilder::default();
        let mut skipped = 0usize;
        for record in reader.records() {
            let record = record?;
            match (record.get(item_col), record.get(element_col)) {
                (Some(item), Some(element)) if !item.is_empty() && !element.is_empty() => {
                    builder.push(item, element);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(skipped, "skipped rows with a blank item or element");
        }

        builder.finish()
    }

    /// Loads a dataset from a `.csv` file.
    ///
    /// Other extensions are rejected with [`CoverError::UnsupportedFormat`]
    /// before the file is opened.
    pub fn from_path(path: impl AsRef<Path>, columns: &Columns) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if ext.as_deref() != Some("csv") {
            return Err(CoverError::UnsupportedFormat(path.display().to_string()));
        }

        debug!(path = %path.display(), "loading dataset");
        let file = std::fs::File::open(path)?;
        let dataset = Self::from_csv_reader(file, columns)?;
        info!(
            items = dataset.num_items(),
            elements = dataset.num_elements(),
            path = %path.display(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    /// Distinct items in first-occurrence order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Distinct elements in first-occurrence order.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn coverage(&self) -> &CoverageMap {
        &self.coverage
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Identifier of the item at `index`.
    pub fn item(&self, index: usize) -> &str {
        &self.items[index]
    }

    /// Identifier of the element at `index`.
    pub fn element(&self, index: usize) -> &str {
        &self.elements[index]
    }

    /// Index of the item named `name`, if present.
    pub fn item_index(&self, name: &str) -> Option<usize> {
        self.item_index.get(name).copied()
    }

    /// Element identifiers covered by the item at `index`.
    pub fn covered_elements(&self, index: usize) -> Vec<String> {
        self.coverage
            .covered(index)
            .iter()
            .map(|&e| self.elements[e].clone())
            .collect()
    }
}

/// Accumulates rows while assigning dense indices.
#[derive(Default)]
struct DatasetBuilder {
    items: Vec<String>,
    elements: Vec<String>,
    item_index: HashMap<String, usize>,
    element_index: HashMap<String, usize>,
    covered: Vec<Vec<usize>>,
    seen: HashSet<(usize, usize)>,
}

impl DatasetBuilder {
    fn push(&mut self, item: &str, element: &str) {
        let i = match self.item_index.get(item) {
            Some(&i) => i,
            None => {
                let i = self.items.len();
                self.items.push(item.to_string());
                self.item_index.insert(item.to_string(), i);
                self.covered.push(Vec::new());
                i
            }
        };
        let e = match self.element_index.get(element) {
            Some(&e) => e,
            None => {
                let e = self.elements.len();
                self.elements.push(element.to_string());
                self.element_index.insert(element.to_string(), e);
                e
            }
        };
        if self.seen.insert((i, e)) {
            self.covered[i].push(e);
        }
    }

    fn finish(self) -> Result<Dataset> {
        if self.items.is_empty() {
            return Err(CoverError::EmptyDataset);
        }
        Ok(Dataset {
            coverage: CoverageMap {
                covered: self.covered,
                num_elements: self.elements.len(),
            },
            items: self.items,
            elements: self.elements,
            item_index: self.item_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_pairs([
            ("A", "t1"),
            ("A", "t2"),
            ("B", "t2"),
            ("B", "t3"),
            ("C", "t4"),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_occurrence_order() {
        let ds = sample();
        assert_eq!(ds.items(), &["A", "B", "C"]);
        assert_eq!(ds.elements(), &["t1", "t2", "t3", "t4"]);
        assert_eq!(ds.item_index("B"), Some(1));
        assert_eq!(ds.item_index("Z"), None);
    }

    #[test]
    fn test_coverage_map() {
        let ds = sample();
        let cov = ds.coverage();
        assert_eq!(cov.len(), 3);
        assert_eq!(cov.num_elements(), 4);
        assert_eq!(cov.covered(0), &[0, 1]);
        assert_eq!(cov.covered(1), &[1, 2]);
        assert_eq!(cov.count(2), 1);
        assert_eq!(ds.covered_elements(1), vec!["t2", "t3"]);
    }

    #[test]
    fn test_duplicate_rows_collapse() {
        let ds = Dataset::from_pairs([("A", "t1"), ("A", "t1"), ("A", "t2")]).unwrap();
        assert_eq!(ds.coverage().count(0), 2);
    }

    #[test]
    fn test_empty_pairs() {
        let pairs: Vec<(&str, &str)> = vec![];
        assert!(matches!(
            Dataset::from_pairs(pairs),
            Err(CoverError::EmptyDataset)
        ));
    }

    #[test]
    fn test_csv_reader() {
        let data = "Drug,Target,Score\nA,t1,1\nA,t2,2\nB,t2,3\n";
        let ds = Dataset::from_csv_reader(data.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(ds.items(), &["A", "B"]);
        assert_eq!(ds.num_elements(), 2);
    }

    #[test]
    fn test_csv_column_order_irrelevant() {
        let data = "Target,Drug\nt1,A\nt2,B\n";
        let ds = Dataset::from_csv_reader(data.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(ds.items(), &["A", "B"]);
        assert_eq!(ds.elements(), &["t1", "t2"]);
    }

    #[test]
    fn test_csv_custom_columns() {
        let data = "gene,compound\ng1,x\ng2,x\n";
        let ds = Dataset::from_csv_reader(data.as_bytes(), &Columns::new("compound", "gene"))
            .unwrap();
        assert_eq!(ds.items(), &["x"]);
        assert_eq!(ds.coverage().count(0), 2);
    }

    #[test]
    fn test_csv_missing_column() {
        let data = "Drug,Gene\nA,t1\n";
        match Dataset::from_csv_reader(data.as_bytes(), &Columns::default()) {
            Err(CoverError::Schema { column }) => assert_eq!(column, "Target"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_header_only_is_empty() {
        let data = "Drug,Target\n";
        assert!(matches!(
            Dataset::from_csv_reader(data.as_bytes(), &Columns::default()),
            Err(CoverError::EmptyDataset)
        ));
    }

    #[test]
    fn test_csv_blank_cells_skipped() {
        let data = "Drug,Target\nA,t1\n,t2\nB,\nC,t3\n";
        let ds = Dataset::from_csv_reader(data.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(ds.items(), &["A", "C"]);
        assert_eq!(ds.elements(), &["t1", "t3"]);
    }

    #[test]
    fn test_csv_short_rows() {
        // B lacks the trailing Score cell; D lacks its Target cell entirely
        let data = "Drug,Target,Score\nA,t1,1\nB,t2\nC,t3,3,extra\nD\n";
        let ds = Dataset::from_csv_reader(data.as_bytes(), &Columns::default()).unwrap();
        assert_eq!(ds.items(), &["A", "B", "C"]);
        assert_eq!(ds.elements(), &["t1", "t2", "t3"]);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Dataset::from_path("drugs.xlsx", &Columns::default()).unwrap_err();
        assert!(matches!(err, CoverError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Dataset::from_path("/nonexistent/u-cover/input.csv", &Columns::default())
            .unwrap_err();
        assert!(matches!(err, CoverError::Io(_)));
    }
}
