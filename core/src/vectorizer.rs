//! TF-IDF weighting of the combined item text.
//!
//! Term ids are handed out in first-seen order while walking the corpus, so the
//! vocabulary and every vector built from it are identical across runs.

use crate::tokenizer::tokenize_with;
use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorizerOptions {
    /// Use smoothed IDF = ln((1 + N) / (1 + df)) + 1 instead of ln(N / df) + 1
    pub smooth_idf: bool,
    /// Use tf = 1 + ln(count) instead of the raw count
    pub sublinear_tf: bool,
    /// Reduce terms to their English stem before counting
    pub stem: bool,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self { smooth_idf: true, sublinear_tf: false, stem: false }
    }
}

impl VectorizerOptions {
    fn idf(&self, num_docs: u32, df: u32) -> f32 {
        let n = num_docs as f32;
        let df = df.max(1) as f32;
        if self.smooth_idf { ((1.0 + n) / (1.0 + df)).ln() + 1.0 } else { (n / df).ln() + 1.0 }
    }

    fn tf(&self, count: u32) -> f32 {
        if count == 0 {
            0.0
        } else if self.sublinear_tf {
            1.0 + (count as f32).ln()
        } else {
            count as f32
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    pub dictionary: HashMap<String, TermId>,
    /// Number of items containing each term, indexed by term id.
    pub df: Vec<u32>,
    pub num_docs: u32,
}

impl Vocabulary {
    pub fn len(&self) -> usize { self.df.len() }

    pub fn is_empty(&self) -> bool { self.df.is_empty() }

    pub fn term_id(&self, term: &str) -> Option<TermId> { self.dictionary.get(term).copied() }
}

/// Sparse L2-normalized term weights, sorted by term id. Empty means the zero vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermVector {
    pub weights: Vec<(TermId, f32)>,
}

impl TermVector {
    pub fn is_zero(&self) -> bool {
        self.weights.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn magnitude(&self) -> f32 {
        self.weights.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &TermVector) -> f32 {
        let (mut i, mut j, mut acc) = (0, 0, 0.0f32);
        while i < self.weights.len() && j < other.weights.len() {
            let (ta, wa) = self.weights[i];
            let (tb, wb) = other.weights[j];
            match ta.cmp(&tb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    acc += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }
}

/// Cosine of the angle between two vectors; 0 when either has zero magnitude.
pub fn cosine(a: &TermVector, b: &TermVector) -> f32 {
    let denom = a.magnitude() * b.magnitude();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Build the shared vocabulary from every text and weight each text against it.
pub fn fit_transform<S: AsRef<str>>(texts: &[S], opts: &VectorizerOptions) -> (Vocabulary, Vec<TermVector>) {
    let mut dictionary: HashMap<String, TermId> = HashMap::new();
    let mut df: Vec<u32> = Vec::new();
    let mut counts: Vec<Vec<(TermId, u32)>> = Vec::with_capacity(texts.len());

    for text in texts {
        let mut tf_counts: HashMap<TermId, u32> = HashMap::new();
        for term in tokenize_with(text.as_ref(), opts.stem) {
            let next_id = df.len() as TermId;
            let tid = *dictionary.entry(term).or_insert_with(|| {
                df.push(0);
                next_id
            });
            let c = tf_counts.entry(tid).or_insert(0);
            if *c == 0 {
                df[tid as usize] += 1;
            }
            *c += 1;
        }
        let mut doc: Vec<(TermId, u32)> = tf_counts.into_iter().collect();
        doc.sort_unstable_by_key(|(tid, _)| *tid);
        counts.push(doc);
    }

    let vocab = Vocabulary { dictionary, df, num_docs: texts.len() as u32 };
    let vectors = counts.into_iter().map(|doc| weigh(&vocab, doc, opts)).collect();
    (vocab, vectors)
}

fn weigh(vocab: &Vocabulary, doc: Vec<(TermId, u32)>, opts: &VectorizerOptions) -> TermVector {
    let mut weights: Vec<(TermId, f32)> = doc
        .into_iter()
        .map(|(tid, count)| (tid, opts.tf(count) * opts.idf(vocab.num_docs, vocab.df[tid as usize])))
        .collect();
    let norm = weights.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm == 0.0 {
        return TermVector::default();
    }
    for (_, w) in weights.iter_mut() { *w /= norm; }
    TermVector { weights }
}
