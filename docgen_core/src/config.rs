use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DocgenError;
use crate::DocgenResult;
use crate::lookup::MacroTable;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["docgen.toml", ".docgen.toml", ".config/docgen.toml"];

/// Directory used for generated output when the config does not name one.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Configuration loaded from a `docgen.toml` file.
///
/// ```toml
/// model = "build/docs.gdsl"
/// output = "docs/generated"
///
/// [macros]
/// project = "docgen"
/// version = "0.3.0"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DocgenConfig {
	/// Linked model file used when a command is not given one.
	#[serde(default)]
	pub model: Option<PathBuf>,
	/// Directory for generated documents.
	#[serde(default = "default_output")]
	pub output: PathBuf,
	/// Text substituted for `$name` references.
	#[serde(default)]
	pub macros: BTreeMap<String, String>,
}

fn default_output() -> PathBuf {
	PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for DocgenConfig {
	fn default() -> Self {
		Self {
			model: None,
			output: default_output(),
			macros: BTreeMap::new(),
		}
	}
}

impl DocgenConfig {
	/// Returns the first config file found under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> DocgenResult<Option<DocgenConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: DocgenConfig =
			toml::from_str(&content).map_err(|e| DocgenError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// The model path, resolved against `root` when relative.
	pub fn model_path(&self, root: &Path) -> Option<PathBuf> {
		self.model.as_ref().map(|model| root.join(model))
	}

	pub fn macro_table(&self) -> MacroTable {
		MacroTable::from(&self.macros)
	}
}
