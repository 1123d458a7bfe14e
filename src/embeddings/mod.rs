// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Character-code embeddings for the retrieval pipeline.
//!
//! This is a placeholder embedding with no semantic content: each of the
//! first 300 characters of the input contributes its Unicode code point to
//! one vector component, the rest is zero-padded, and the whole vector is
//! scaled to unit Euclidean norm. Callers must not expect semantic retrieval
//! quality; the embedding exists purely to exercise the chunk/store/rank
//! pipeline end to end.

use thiserror::Error;

/// Fixed embedding dimensionality. Every stored and query vector has exactly
/// this many components.
pub const EMBEDDING_DIM: usize = 300;

#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("invalid embedding dimensions: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },
    #[error("invalid embedding values: contains NaN or Infinity")]
    NonFinite,
}

/// A 300-dimensional vector with unit Euclidean norm (or the zero vector for
/// degenerate input, see [`embed`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    data: Vec<f64>,
}

impl Embedding {
    /// Build an embedding from raw components, e.g. a row read back from the
    /// store. Validates dimensionality and finiteness but does not
    /// re-normalize: stored vectors were normalized at insert time.
    pub fn from_components(data: Vec<f64>) -> Result<Self, EmbeddingError> {
        if data.len() != EMBEDDING_DIM {
            return Err(EmbeddingError::Dimension {
                expected: EMBEDDING_DIM,
                actual: data.len(),
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite);
        }
        Ok(Self { data })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn magnitude(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Plain dot product. Both sides are unit-normalized at insert/query
    /// time, so this already is the cosine similarity; do not divide by the
    /// norms again.
    pub fn dot(&self, other: &Embedding) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    fn normalize(&mut self) {
        let magnitude = self.magnitude();
        if magnitude > 0.0 {
            for value in &mut self.data {
                *value /= magnitude;
            }
        }
        // Zero magnitude (empty or all-NUL text) leaves the zero vector in
        // place: such a record can never outrank a real one and a zero query
        // scores everything equally.
    }
}

/// Embed a text: code points of the first `min(chars, 300)` characters,
/// zero-padded on the right to exactly 300 components, scaled by 1/‖v‖₂.
///
/// Deterministic: equal texts always produce equal embeddings.
pub fn embed(text: &str) -> Embedding {
    let mut data = vec![0.0f64; EMBEDDING_DIM];
    for (i, ch) in text.chars().take(EMBEDDING_DIM).enumerate() {
        data[i] = ch as u32 as f64;
    }
    let mut embedding = Embedding { data };
    embedding.normalize();
    embedding
}
