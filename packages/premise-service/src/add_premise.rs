use serde::{Deserialize, Serialize};

use premise_domain::Premise;
use premise_storage::RowId;

use crate::{Error, PremiseService, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPremiseRequest {
	pub name: String,
	pub module: String,
	pub decl: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPremiseResponse {
	pub row_id: RowId,
	pub added: bool,
}

impl PremiseService {
	/// Adds a premise to the live corpus and index. Re-adding a name to the module that already
	/// holds it returns the existing row without embedding anything.
	pub async fn add_premise(&self, req: AddPremiseRequest) -> Result<AddPremiseResponse> {
		let AddPremiseRequest { name, module, decl } = req;

		if name.trim().is_empty() {
			return Err(Error::InvalidArgument { message: "name must be non-empty.".to_string() });
		}
		if decl.trim().is_empty() {
			return Err(Error::InvalidArgument { message: "decl must be non-empty.".to_string() });
		}

		if let Some(row_id) = self.existing_row(&module, &name) {
			return Ok(AddPremiseResponse { row_id, added: false });
		}

		let embeddings = self.embedder.embed(std::slice::from_ref(&decl), &[]).await?;
		let Some(vec) = embeddings.queries.into_iter().next() else {
			return Err(Error::Backend {
				message: "Embedding backend returned no vector for the premise.".to_string(),
			});
		};
		let appended = self.index.append_if_absent(Premise::new(name, module, decl), &vec)?;

		if appended.added {
			tracing::info!(row = appended.row, version = appended.version, "Premise appended.");
		}

		Ok(AddPremiseResponse { row_id: appended.row, added: appended.added })
	}

	fn existing_row(&self, module: &str, name: &str) -> Option<RowId> {
		self.index.read().corpus().module_row(module, name)
	}
}
