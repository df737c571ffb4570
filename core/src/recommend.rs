use crate::corpus::{build_corpus, Corpus, Item};
use crate::error::LoadError;
use crate::similarity::{build_similarity_with, SimilarityMatrix};
use crate::vectorizer::VectorizerOptions;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_K: usize = 5;

const TMDB_MOVIE_URL: &str = "https://www.themoviedb.org/movie";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: i64,
    pub title: String,
    pub score: f32,
}

impl Recommendation {
    /// Link to the movie's page on TMDB, keyed by the dataset id.
    pub fn tmdb_url(&self) -> String {
        format!("{TMDB_MOVIE_URL}/{}", self.id)
    }
}

/// First corpus index whose title equals `title`, ignoring case.
fn find_anchor(corpus: &Corpus, title: &str) -> Option<DocId> {
    let needle = title.to_lowercase();
    corpus.iter().position(|item| item.title.to_lowercase() == needle).map(|i| i as DocId)
}

/// Rank every other item against `anchor`: score descending, corpus order on ties.
fn rank(corpus: &Corpus, similarity: &SimilarityMatrix, anchor: DocId, k: usize) -> Vec<Recommendation> {
    let mut scored: Vec<(DocId, f32)> = similarity
        .row(anchor)
        .iter()
        .enumerate()
        .filter(|(j, _)| *j as DocId != anchor)
        .map(|(j, s)| (j as DocId, *s))
        .collect();
    // stable, so equal scores keep ascending index order
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
        .into_iter()
        .take(k)
        .filter_map(|(j, score)| {
            corpus.get(j).map(|item: &Item| Recommendation { id: item.id, title: item.title.clone(), score })
        })
        .collect()
}

/// Up to `k` items most similar to the movie titled `title`.
///
/// The title match is exact but case-insensitive; with duplicate titles the first one in
/// corpus order is the anchor. An unknown title yields an empty list, not an error.
pub fn recommend(corpus: &Corpus, similarity: &SimilarityMatrix, title: &str, k: usize) -> Vec<Recommendation> {
    match find_anchor(corpus, title) {
        Some(anchor) => rank(corpus, similarity, anchor, k),
        None => Vec::new(),
    }
}

/// Corpus plus its similarity matrix, built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Recommender {
    corpus: Corpus,
    similarity: SimilarityMatrix,
    // lowercased title -> first index with that title
    titles: HashMap<String, DocId>,
}

impl Recommender {
    pub fn build(corpus: Corpus) -> Self {
        Self::build_with(corpus, &VectorizerOptions::default())
    }

    pub fn build_with(corpus: Corpus, opts: &VectorizerOptions) -> Self {
        let similarity = build_similarity_with(&corpus, opts);
        let mut titles = HashMap::with_capacity(corpus.len());
        for (i, item) in corpus.iter().enumerate() {
            titles.entry(item.title.to_lowercase()).or_insert(i as DocId);
        }
        Self { corpus, similarity, titles }
    }

    pub fn from_csv<P: AsRef<Path>>(path: P, opts: &VectorizerOptions) -> Result<Self, LoadError> {
        let corpus = build_corpus(path)?;
        Ok(Self::build_with(corpus, opts))
    }

    /// Corpus index used as the anchor for `title`, if any item carries it.
    pub fn lookup(&self, title: &str) -> Option<DocId> {
        self.titles.get(&title.to_lowercase()).copied()
    }

    pub fn recommend(&self, title: &str, k: usize) -> Vec<Recommendation> {
        let results = match self.lookup(title) {
            Some(anchor) => rank(&self.corpus, &self.similarity, anchor, k),
            None => Vec::new(),
        };
        tracing::debug!(title, k, hits = results.len(), "recommend");
        results
    }

    pub fn titles(&self) -> Vec<&str> {
        self.corpus.titles_sorted()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpus.is_empty()
    }
}
