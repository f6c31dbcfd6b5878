//! Harmonic token projection
//!
//! Deterministic, training-free text embeddings. Each token is folded into a
//! 64-bit integer N; for every prime modulus m the residue N mod m is placed
//! on the unit circle as (sin 2πr/m, cos 2πr/m). A text embedding is the mean
//! of its token projections, L2-normalized.
//!
//! Shared tokens dominate similarity, which is what matching vision-tagger
//! labels against product text needs. There is no notion of synonyms.

use std::f64::consts::TAU;

/// Output dimension (two components per modulus).
pub const EMBEDDING_DIM: usize = 256;

const NUM_MODULI: usize = EMBEDDING_DIM / 2;

/// Only the first characters of very long tokens contribute.
const MAX_TOKEN_CHARS: usize = 64;

const FOLD_MULTIPLIER: u64 = 0x0000_0100_0000_01b3;

pub type Embedding = Vec<f32>;

#[derive(Debug, Clone)]
pub struct HarmonicEmbedder {
    moduli: Vec<u64>,
}

impl HarmonicEmbedder {
    pub fn new() -> Self {
        Self {
            moduli: first_primes(NUM_MODULI),
        }
    }

    /// Embeds `text`. Text without any token maps to the zero vector.
    pub fn embed(&self, text: &str) -> Embedding {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; EMBEDDING_DIM];
        }

        let mut sum = vec![0.0f64; EMBEDDING_DIM];
        for token in &tokens {
            let n = fold_token(token);
            for (i, &m) in self.moduli.iter().enumerate() {
                let theta = TAU * (n % m) as f64 / m as f64;
                sum[2 * i] += theta.sin();
                sum[2 * i + 1] += theta.cos();
            }
        }

        // Mean pooling does not change direction, so normalize directly.
        let norm = sum.iter().map(|x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            sum.iter().map(|x| (x / norm) as f32).collect()
        } else {
            vec![0.0; EMBEDDING_DIM]
        }
    }
}

impl Default for HarmonicEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased words, split on whitespace and punctuation.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

fn fold_token(token: &str) -> u64 {
    token
        .chars()
        .take(MAX_TOKEN_CHARS)
        .fold(0u64, |n, c| n.wrapping_mul(FOLD_MULTIPLIER) ^ c as u64)
}

fn first_primes(count: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(count);
    let mut candidate = 2u64;
    while primes.len() < count {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_primes() {
        assert_eq!(first_primes(10), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(first_primes(NUM_MODULI).len(), NUM_MODULI);
    }

    #[test]
    fn test_deterministic_and_normalized() {
        let a = HarmonicEmbedder::new().embed("robe rouge élégante");
        let b = HarmonicEmbedder::new().embed("robe rouge élégante");
        assert_eq!(a, b);
        assert_eq!(a.len(), EMBEDDING_DIM);

        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let e = HarmonicEmbedder::new();
        assert_eq!(e.embed("Robe, ROUGE!"), e.embed("robe rouge"));
    }

    #[test]
    fn test_shared_tokens_score_higher() {
        let e = HarmonicEmbedder::new();
        let query = e.embed("robe rouge");
        let dress = e.embed("Robe Rouge Élégante robe rouge occasion");
        let phone = e.embed("Smartphone Android appareil photo");

        assert!(cosine_similarity(&query, &dress) > cosine_similarity(&query, &phone));
        assert!(cosine_similarity(&query, &dress) > 0.5);
    }

    #[test]
    fn test_suffix_collisions_avoided() {
        // Tokens sharing their last characters must still differ.
        let e = HarmonicEmbedder::new();
        assert_ne!(e.embed("rouge"), e.embed("bouge"));
    }

    #[test]
    fn test_empty_text() {
        let e = HarmonicEmbedder::new();
        let zero = e.embed("  ,;  ");
        assert!(zero.iter().all(|x| *x == 0.0));
        assert_eq!(cosine_similarity(&zero, &e.embed("robe")), 0.0);
    }

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &[1.0, 0.0, 0.0]) - 1.0).abs() < 1e-3);
        assert!(cosine_similarity(&a, &[0.0, 1.0, 0.0]).abs() < 1e-3);
        assert!((cosine_similarity(&a, &[-1.0, 0.0, 0.0]) + 1.0).abs() < 1e-3);
        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
    }
}
