use std::{fs, path::Path};

use crate::{Error, Result};

const F32_BYTES: usize = size_of::<f32>();

/// Reads a raw little-endian `f32` matrix with `dimensions` columns.
pub fn read_f32_matrix(path: &Path, dimensions: usize) -> Result<Vec<Vec<f32>>> {
	let bytes = fs::read(path)?;

	decode_f32_matrix(&bytes, dimensions)
}

pub fn decode_f32_matrix(bytes: &[u8], dimensions: usize) -> Result<Vec<Vec<f32>>> {
	if dimensions == 0 {
		return Err(Error::MalformedMatrix {
			message: "Matrix dimensions must be greater than zero.".to_string(),
		});
	}

	let row_bytes = dimensions * F32_BYTES;

	if bytes.len() % row_bytes != 0 {
		return Err(Error::MalformedMatrix {
			message: format!(
				"{} bytes is not a whole number of {dimensions}-dimensional f32 rows.",
				bytes.len()
			),
		});
	}

	let rows = bytes
		.chunks_exact(row_bytes)
		.map(|row| {
			row.chunks_exact(F32_BYTES)
				.map(|raw| f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
				.collect()
		})
		.collect();

	Ok(rows)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn encode(rows: &[[f32; 2]]) -> Vec<u8> {
		rows.iter().flatten().flat_map(|value| value.to_le_bytes()).collect()
	}

	#[test]
	fn decodes_rows_in_order() {
		let bytes = encode(&[[1.0, 0.0], [0.25, -0.5]]);
		let rows = decode_f32_matrix(&bytes, 2).expect("decode failed");

		assert_eq!(rows, vec![vec![1.0, 0.0], vec![0.25, -0.5]]);
	}

	#[test]
	fn rejects_partial_rows() {
		let mut bytes = encode(&[[1.0, 0.0]]);

		bytes.extend_from_slice(&1.0_f32.to_le_bytes());

		assert!(matches!(decode_f32_matrix(&bytes, 2), Err(Error::MalformedMatrix { .. })));
	}
}
