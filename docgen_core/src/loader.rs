use std::io::Read;
use std::path::Path;

use derive_more::Deref;

use crate::DocgenResult;
use crate::builder::ModelBuilder;
use crate::model::DEFAULT_GROUP_NAME;
use crate::model::Model;
use crate::name::Name;
use crate::reader::ModelHeader;
use crate::reader::ModelReader;
use crate::resolver::LinkReport;
use crate::resolver::link;

/// A model that has been read, built and linked.
///
/// Dereferences to the [`Model`].
#[derive(Debug, Deref)]
pub struct LoadedModel {
	pub source: String,
	pub header: ModelHeader,
	#[deref]
	pub model: Model,
	pub report: LinkReport,
	/// Records read from the file, excluding block padding.
	pub records: usize,
	pub blocks: usize,
}

/// Load, build and link the model file at `path`.
pub fn load_model(path: &Path) -> DocgenResult<LoadedModel> {
	let reader = ModelReader::open(path)?;
	load_from(reader)
}

/// Load, build and link a model from any reader. `source` names the input in
/// errors and logs.
pub fn load_model_from_reader<R: Read>(
	reader: R,
	source: impl Into<String>,
) -> DocgenResult<LoadedModel> {
	load_from(ModelReader::new(reader, source)?)
}

fn load_from<R: Read>(mut reader: ModelReader<R>) -> DocgenResult<LoadedModel> {
	let mut builder = ModelBuilder::new();
	let mut index = 0;

	while let Some(block) = reader.next_block()? {
		builder.add_block(block, index)?;
		index += 1;
	}

	let records = builder.record_count();
	let (mut model, limits) = builder.finish();
	let report = link(&mut model, limits);

	let root = Model::root();
	if model.group(root).name.is_empty() {
		if model.find_group(DEFAULT_GROUP_NAME).is_some() {
			tracing::warn!("the model already has a `default` group, leaving the document root unnamed");
		} else {
			model.rename_group(root, Name::from_static(DEFAULT_GROUP_NAME));
		}
	}

	tracing::debug!(
		source = reader.source(),
		records,
		blocks = index,
		groups = model.group_count(),
		"loaded model"
	);

	Ok(LoadedModel {
		source: reader.source().to_string(),
		header: *reader.header(),
		model,
		report,
		records,
		blocks: index,
	})
}
