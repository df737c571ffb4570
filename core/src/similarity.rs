use crate::corpus::Corpus;
use crate::vectorizer::{fit_transform, TermVector, VectorizerOptions};
use crate::DocId;
use std::time::Instant;

/// Dense, symmetric N×N cosine similarities between corpus items, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Pairwise cosine similarity of already L2-normalized vectors.
    ///
    /// Scores are accumulated through per-term postings, so only item pairs that share
    /// at least one term are ever touched. The upper triangle is computed and mirrored,
    /// which keeps the matrix exactly symmetric.
    pub fn from_vectors(vectors: &[TermVector], num_terms: usize) -> Self {
        let n = vectors.len();
        let mut postings: Vec<Vec<(DocId, f32)>> = vec![Vec::new(); num_terms];
        for (doc_id, v) in vectors.iter().enumerate() {
            for &(tid, w) in &v.weights {
                postings[tid as usize].push((doc_id as DocId, w));
            }
        }

        let mut values = vec![0.0f32; n * n];
        let mut acc = vec![0.0f32; n];
        for (i, v) in vectors.iter().enumerate() {
            if v.is_zero() { continue; }
            values[i * n + i] = 1.0;
            for &(tid, w) in &v.weights {
                let plist = &postings[tid as usize];
                // postings are in doc order; skip everything at or before i
                let start = plist.partition_point(|(d, _)| (*d as usize) <= i);
                for &(j, wj) in &plist[start..] {
                    acc[j as usize] += w * wj;
                }
            }
            for j in (i + 1)..n {
                let s = acc[j].min(1.0);
                values[i * n + j] = s;
                values[j * n + i] = s;
                acc[j] = 0.0;
            }
        }
        Self { n, values }
    }

    pub fn len(&self) -> usize { self.n }

    pub fn is_empty(&self) -> bool { self.n == 0 }

    pub fn get(&self, i: DocId, j: DocId) -> f32 {
        self.values[i as usize * self.n + j as usize]
    }

    pub fn row(&self, i: DocId) -> &[f32] {
        let start = i as usize * self.n;
        &self.values[start..start + self.n]
    }
}

/// Vectorize every item's combined text with the default options and compute all pairwise similarities.
pub fn build_similarity(corpus: &Corpus) -> SimilarityMatrix {
    build_similarity_with(corpus, &VectorizerOptions::default())
}

pub fn build_similarity_with(corpus: &Corpus, opts: &VectorizerOptions) -> SimilarityMatrix {
    let start = Instant::now();
    let texts: Vec<&str> = corpus.iter().map(|item| item.combined.as_str()).collect();
    let (vocab, vectors) = fit_transform(&texts, opts);
    let zero_vectors = vectors.iter().filter(|v| v.is_zero()).count();
    let matrix = SimilarityMatrix::from_vectors(&vectors, vocab.len());
    tracing::info!(
        items = matrix.len(),
        terms = vocab.len(),
        zero_vectors,
        took_s = start.elapsed().as_secs_f64(),
        "similarity matrix built"
    );
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Item;
    use crate::vectorizer::cosine;

    fn corpus(texts: &[&str]) -> Corpus {
        Corpus::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| Item::new(i as i64, format!("m{i}"), Some(t.to_string()), None, None))
                .collect(),
        )
    }

    #[test]
    fn postings_accumulation_matches_direct_cosine() {
        let texts = ["alien ship crew", "alien invasion earth", "crew ship storm", "romance paris"];
        let (vocab, vecs) = fit_transform(&texts, &VectorizerOptions::default());
        let m = SimilarityMatrix::from_vectors(&vecs, vocab.len());
        for i in 0..vecs.len() {
            for j in 0..vecs.len() {
                if i == j { continue; }
                let direct = cosine(&vecs[i], &vecs[j]);
                assert!((m.get(i as u32, j as u32) - direct).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn empty_corpus_builds_empty_matrix() {
        let m = build_similarity(&Corpus::default());
        assert!(m.is_empty());
    }

    #[test]
    fn zero_vector_row_is_all_zero() {
        let m = build_similarity(&corpus(&["", "heist bank vault", "bank robbery"]));
        assert!(m.row(0).iter().all(|s| *s == 0.0));
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.get(1, 2), m.get(2, 1));
    }
}
