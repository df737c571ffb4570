pub mod corpus;
pub mod error;
pub mod recommend;
pub mod similarity;
pub mod tokenizer;
pub mod vectorizer;

pub use corpus::{build_corpus, Corpus, Item};
pub use error::LoadError;
pub use recommend::{recommend, Recommendation, Recommender, DEFAULT_K};
pub use similarity::{build_similarity, build_similarity_with, SimilarityMatrix};
pub use vectorizer::{TermVector, VectorizerOptions, Vocabulary};

pub type TermId = u32;
/// Position of an item in corpus load order; also the similarity matrix coordinate.
pub type DocId = u32;
