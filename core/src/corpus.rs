use crate::error::LoadError;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const REQUIRED_COLUMNS: [&str; 5] = ["id", "title", "overview", "genres", "keywords"];

/// One movie row. `combined` is derived at construction and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub genres: String,
    pub keywords: String,
    pub combined: String,
}

impl Item {
    pub fn new(
        id: i64,
        title: impl Into<String>,
        overview: Option<String>,
        genres: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let overview = overview.unwrap_or_default();
        let genres = genres.unwrap_or_default();
        let keywords = keywords.unwrap_or_default();
        let combined = format!("{overview} {genres} {keywords}");
        Self { id, title: title.into(), overview, genres, keywords, combined }
    }
}

#[derive(Debug, Deserialize)]
struct MovieRecord {
    id: i64,
    title: String,
    overview: Option<String>,
    genres: Option<String>,
    keywords: Option<String>,
}

/// Movies in dataset row order. The index of an item is its `DocId`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    items: Vec<Item>,
}

impl Corpus {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Parse a CSV dataset. Columns beyond the required five are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);
        let headers = rdr.headers()?.clone();
        for col in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == col) {
                return Err(LoadError::MissingColumn(col));
            }
        }

        let mut items = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let row: MovieRecord = record
                .deserialize(Some(&headers))
                .map_err(|e| LoadError::Row { line, message: e.to_string() })?;
            items.push(Item::new(row.id, row.title, row.overview, row.genres, row.keywords));
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, doc_id: DocId) -> Option<&Item> {
        self.items.get(doc_id as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// All titles sorted ascending, duplicates kept.
    pub fn titles_sorted(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.items.iter().map(|i| i.title.as_str()).collect();
        titles.sort_unstable();
        titles
    }
}

/// Load the movie dataset from a CSV file on disk.
pub fn build_corpus<P: AsRef<Path>>(path: P) -> Result<Corpus, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let corpus = Corpus::from_reader(file)?;
    tracing::info!(items = corpus.len(), path = %path.display(), "loaded corpus");
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_become_empty() {
        let item = Item::new(1, "Blank", None, None, None);
        assert_eq!(item.combined, "  ");
    }

    #[test]
    fn combines_in_fixed_order() {
        let item = Item::new(2, "X", Some("plot".into()), Some("Drama".into()), Some("heist".into()));
        assert_eq!(item.combined, "plot Drama heist");
    }

    #[test]
    fn reads_rows_in_order_and_ignores_extra_columns() {
        let data = "budget,id,title,overview,genres,keywords\n\
                    10,5,Alpha,space pirates,Adventure,ship\n\
                    20,6,Beta,,,\n";
        let corpus = Corpus::from_reader(data.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get(0).unwrap().title, "Alpha");
        assert_eq!(corpus.get(1).unwrap().id, 6);
        assert_eq!(corpus.get(1).unwrap().combined, "  ");
    }

    #[test]
    fn rejects_missing_column() {
        let data = "id,title,overview,genres\n1,A,b,c\n";
        let err = Corpus::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("keywords")));
    }

    #[test]
    fn rejects_non_integer_id() {
        let data = "id,title,overview,genres,keywords\nabc,A,b,c,d\n";
        let err = Corpus::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Row { line: 2, .. }));
    }

    #[test]
    fn keeps_duplicate_titles() {
        let data = "id,title,overview,genres,keywords\n1,Same,a,b,c\n2,Same,d,e,f\n";
        let corpus = Corpus::from_reader(data.as_bytes()).unwrap();
        assert_eq!(corpus.titles_sorted(), vec!["Same", "Same"]);
    }
}
