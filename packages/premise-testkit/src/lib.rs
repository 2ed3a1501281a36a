mod error;

pub use error::{Error, Result};

use std::{
	collections::HashMap,
	env, fs,
	net::SocketAddr,
	path::PathBuf,
	sync::{
		Arc, Mutex,
		atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
	},
	time::{SystemTime, UNIX_EPOCH},
};

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Deserialize;
use serde_json::Map;
use tokio::{net::TcpListener, task::JoinHandle};

use premise_config::{
	Admin, Config, Corpus, Dispatch, Dtype, Embedding, EmbeddingProviderConfig, Providers,
	Retrieval, Service,
};

#[derive(Debug, Deserialize)]
struct EmbedBody {
	inputs: Vec<String>,
}

struct FakeState {
	dimensions: usize,
	table: Mutex<HashMap<String, Vec<f32>>>,
	requests: AtomicUsize,
	inputs: AtomicUsize,
	failing: AtomicBool,
}

/// In-process stand-in for the embedding backend.
///
/// Texts registered through [`FakeEmbeddingServer::set_vector`] embed to their registered vector;
/// any other text embeds to a deterministic one-hot vector.
pub struct FakeEmbeddingServer {
	addr: SocketAddr,
	state: Arc<FakeState>,
	handle: JoinHandle<()>,
}
impl FakeEmbeddingServer {
	pub async fn start(dimensions: usize) -> Result<Self> {
		if dimensions == 0 {
			return Err(Error::Message("Fake backend dimensions must be positive.".to_string()));
		}

		let state = Arc::new(FakeState {
			dimensions,
			table: Mutex::new(HashMap::new()),
			requests: AtomicUsize::new(0),
			inputs: AtomicUsize::new(0),
			failing: AtomicBool::new(false),
		});
		let app = Router::new().route("/embed", post(embed)).with_state(state.clone());
		let listener = TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, app).await {
				eprintln!("Fake embedding backend stopped: {err}.");
			}
		});

		Ok(Self { addr, state, handle })
	}

	pub fn api_base(&self) -> String {
		format!("http://{}", self.addr)
	}

	pub fn provider_config(&self) -> EmbeddingProviderConfig {
		EmbeddingProviderConfig {
			api_base: self.api_base(),
			path: "/embed".to_string(),
			api_key: None,
			dimensions: self.state.dimensions as u32,
			timeout_ms: 5_000,
			truncate: true,
			default_headers: Map::new(),
		}
	}

	pub fn set_vector(&self, text: impl Into<String>, vector: Vec<f32>) {
		let mut table = self.state.table.lock().unwrap_or_else(|err| err.into_inner());

		table.insert(text.into(), vector);
	}

	/// Makes every following request answer with 503.
	pub fn set_failing(&self, failing: bool) {
		self.state.failing.store(failing, Ordering::SeqCst);
	}

	pub fn request_count(&self) -> usize {
		self.state.requests.load(Ordering::SeqCst)
	}

	pub fn input_count(&self) -> usize {
		self.state.inputs.load(Ordering::SeqCst)
	}
}
impl Drop for FakeEmbeddingServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

/// A valid config around `provider` with small limits suited to tests.
///
/// The corpus path points nowhere; tests that load a corpus set it themselves.
pub fn test_config(provider: EmbeddingProviderConfig) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		corpus: Corpus {
			path: PathBuf::from("premises.jsonl"),
			embeddings_path: None,
			exclude_name_patterns: Vec::new(),
		},
		providers: Providers { embedding: provider },
		embedding: Embedding {
			cache_capacity: 16,
			max_concurrent_inputs: 8,
			max_batch_size: 4,
			dispatch: Dispatch::Sequential,
			dtype: Dtype::Float32,
		},
		retrieval: Retrieval { max_k: 8, max_new_premises: 4 },
		admin: Admin { enable_add_premise: true },
	}
}

/// Writes `contents` to a fresh file under the system temp directory.
pub fn write_temp_file(prefix: &str, extension: &str, contents: &[u8]) -> Result<PathBuf> {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_err(|err| Error::Message(err.to_string()))?
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let mut path = env::temp_dir();

	path.push(format!("{prefix}_{nanos}_{}_{ordinal}.{extension}", std::process::id()));

	fs::write(&path, contents)?;

	Ok(path)
}

pub fn one_hot(text: &str, dimensions: usize) -> Vec<f32> {
	let slot = text.bytes().map(usize::from).sum::<usize>() % dimensions;
	let mut vec = vec![0.0; dimensions];

	vec[slot] = 1.0;

	vec
}

async fn embed(
	State(state): State<Arc<FakeState>>,
	Json(body): Json<EmbedBody>,
) -> Result<Json<Vec<Vec<f32>>>, StatusCode> {
	state.requests.fetch_add(1, Ordering::SeqCst);
	state.inputs.fetch_add(body.inputs.len(), Ordering::SeqCst);

	if state.failing.load(Ordering::SeqCst) {
		return Err(StatusCode::SERVICE_UNAVAILABLE);
	}

	let table = state.table.lock().unwrap_or_else(|err| err.into_inner());
	let vectors = body
		.inputs
		.iter()
		.map(|text| table.get(text).cloned().unwrap_or_else(|| one_hot(text, state.dimensions)))
		.collect();

	Ok(Json(vectors))
}
