use reqwest::header::AUTHORIZATION;
use serde_json::Map;

use premise_providers::{Error, embedding};
use premise_testkit::FakeEmbeddingServer;

#[test]
fn builds_bearer_auth_header() {
	let headers = premise_providers::auth_headers(Some("secret"), &Map::new())
		.expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn omits_auth_header_without_key() {
	let headers =
		premise_providers::auth_headers(None, &Map::new()).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
}

#[tokio::test]
async fn embeds_batch_against_backend() {
	let server = FakeEmbeddingServer::start(3).await.expect("Failed to start fake backend.");

	server.set_vector("theorem foo", vec![1.0, 0.0, 0.0]);
	server.set_vector("theorem bar", vec![0.0, 0.0, 1.0]);

	let cfg = server.provider_config();
	let texts = vec!["theorem bar".to_string(), "theorem foo".to_string()];
	let vectors = embedding::embed(&cfg, &texts).await.expect("Embedding failed.");

	assert_eq!(vectors, vec![vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]]);
	assert_eq!(server.request_count(), 1);
	assert_eq!(server.input_count(), 2);
}

#[tokio::test]
async fn empty_batch_skips_the_backend() {
	let server = FakeEmbeddingServer::start(3).await.expect("Failed to start fake backend.");
	let vectors =
		embedding::embed(&server.provider_config(), &[]).await.expect("Embedding failed.");

	assert!(vectors.is_empty());
	assert_eq!(server.request_count(), 0);
}

#[tokio::test]
async fn non_success_status_is_reported() {
	let server = FakeEmbeddingServer::start(3).await.expect("Failed to start fake backend.");

	server.set_failing(true);

	let err = embedding::embed(&server.provider_config(), &["theorem foo".to_string()])
		.await
		.expect_err("Expected backend failure.");

	assert!(matches!(err, Error::Status { status: 503, .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn dimension_mismatch_is_an_invalid_response() {
	let server = FakeEmbeddingServer::start(3).await.expect("Failed to start fake backend.");
	let mut cfg = server.provider_config();

	cfg.dimensions = 4;

	let err = embedding::embed(&cfg, &["theorem foo".to_string()])
		.await
		.expect_err("Expected dimension mismatch.");

	assert!(matches!(err, Error::InvalidResponse { .. }), "Unexpected error: {err:?}");
}
