use crate::{Error, Result};

/// Element-wise arithmetic mean of a set of equally sized vectors.
///
/// An empty input yields an empty vector. The dimension is taken from the first vector and every
/// other vector must match it.
pub fn mean_embedding(vectors: &[Vec<f32>]) -> Result<Vec<f32>> {
	let Some(first) = vectors.first() else {
		return Ok(Vec::new());
	};
	let dim = first.len();

	ensure_same_dimension(vectors, dim)?;

	let count = vectors.len() as f64;
	let mut sums = vec![0.0_f64; dim];

	for vector in vectors {
		for (sum, value) in sums.iter_mut().zip(vector) {
			*sum += f64::from(*value);
		}
	}

	Ok(sums.into_iter().map(|sum| (sum / count) as f32).collect())
}

pub fn ensure_same_dimension(vectors: &[Vec<f32>], expected: usize) -> Result<()> {
	match vectors.iter().find(|vector| vector.len() != expected) {
		Some(vector) => Err(Error::DimensionMismatch { expected, actual: vector.len() }),
		None => Ok(()),
	}
}

pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> Option<f32> {
	if lhs.is_empty() || lhs.len() != rhs.len() {
		return None;
	}

	let mut dot = 0.0_f32;
	let mut lhs_norm = 0.0_f32;
	let mut rhs_norm = 0.0_f32;

	for (l, r) in lhs.iter().zip(rhs) {
		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm <= f32::EPSILON || rhs_norm <= f32::EPSILON {
		return None;
	}

	Some((dot / (lhs_norm.sqrt() * rhs_norm.sqrt())).clamp(-1.0, 1.0))
}
