use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
	inputs: &'a [String],
	truncate: bool,
}

/// Sends one batch to a text-embeddings-inference style `/embed` endpoint.
///
/// The response must hold exactly one vector per input, in input order.
pub async fn embed(
	cfg: &premise_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	if texts.is_empty() {
		return Ok(Vec::new());
	}

	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = EmbedRequest { inputs: texts, truncate: cfg.truncate };
	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await
		.map_err(|err| classify(err, cfg.timeout_ms))?;
	let status = res.status();

	if !status.is_success() {
		let body = res.text().await.unwrap_or_default();

		tracing::warn!(status = status.as_u16(), inputs = texts.len(), "Embedding backend failed.");

		return Err(Error::Status { status: status.as_u16(), body });
	}

	let json: Value = res.json().await.map_err(|err| classify(err, cfg.timeout_ms))?;

	parse_embedding_response(json, texts.len(), cfg.dimensions as usize)
}

fn classify(err: reqwest::Error, timeout_ms: u64) -> Error {
	if err.is_timeout() { Error::Timeout { timeout_ms } } else { Error::Reqwest(err) }
}

fn parse_embedding_response(
	json: Value,
	expected_rows: usize,
	dimensions: usize,
) -> Result<Vec<Vec<f32>>> {
	let rows = json.as_array().ok_or_else(|| Error::InvalidResponse {
		message: "Embedding response must be an array of vectors.".to_string(),
	})?;

	if rows.len() != expected_rows {
		return Err(Error::InvalidResponse {
			message: format!(
				"Embedding response has {} vectors for {expected_rows} inputs.",
				rows.len()
			),
		});
	}

	let mut out = Vec::with_capacity(rows.len());

	for row in rows {
		let values = row.as_array().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding response row must be an array.".to_string(),
		})?;

		if values.len() != dimensions {
			return Err(Error::InvalidResponse {
				message: format!(
					"Embedding vector has {} dimensions, expected {dimensions}.",
					values.len()
				),
			});
		}

		let mut vec = Vec::with_capacity(values.len());

		for value in values {
			let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
				message: "Embedding value must be numeric.".to_string(),
			})?;

			vec.push(number as f32);
		}

		out.push(vec);
	}

	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_vectors_in_input_order() {
		let json = serde_json::json!([[0.5, 1.5], [2.0, 3.0]]);
		let parsed = parse_embedding_response(json, 2, 2).expect("parse failed");

		assert_eq!(parsed, vec![vec![0.5, 1.5], vec![2.0, 3.0]]);
	}

	#[test]
	fn rejects_row_count_mismatch() {
		let json = serde_json::json!([[0.5, 1.5]]);
		let err = parse_embedding_response(json, 2, 2).expect_err("Expected row count error.");

		assert!(err.to_string().contains("1 vectors for 2 inputs"), "Unexpected error: {err}");
	}

	#[test]
	fn rejects_dimension_mismatch() {
		let json = serde_json::json!([[0.5, 1.5, 2.5]]);
		let err = parse_embedding_response(json, 1, 2).expect_err("Expected dimension error.");

		assert!(err.to_string().contains("3 dimensions, expected 2"), "Unexpected error: {err}");
	}

	#[test]
	fn rejects_openai_style_payload() {
		let json = serde_json::json!({ "data": [{ "index": 0, "embedding": [0.5, 1.5] }] });

		assert!(parse_embedding_response(json, 1, 2).is_err());
	}
}
