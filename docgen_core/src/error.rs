use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DocgenError {
	#[error(transparent)]
	#[diagnostic(code(docgen::io_error))]
	Io(#[from] std::io::Error),

	#[error("`{file}` is not a linked model file (bad signature)")]
	#[diagnostic(
		code(docgen::bad_signature),
		help("pass the output of the document linker, not a compiled source file")
	)]
	BadSignature { file: String },

	#[error("short read in `{file}`: expected {expected} bytes, got {got}")]
	#[diagnostic(
		code(docgen::short_read),
		help("the model file is truncated; re-run the linker to regenerate it")
	)]
	ShortRead {
		file: String,
		expected: usize,
		got: usize,
	},

	#[error("unknown record tag `{tag}` at offset {offset} of block {block}\n{dump}")]
	#[diagnostic(code(docgen::unknown_record))]
	UnknownRecord {
		tag: u8,
		block: usize,
		offset: usize,
		dump: String,
	},

	#[error("record `{tag}` at offset {offset} of block {block} runs past the end of the block\n{dump}")]
	#[diagnostic(code(docgen::malformed_record))]
	MalformedRecord {
		tag: u8,
		block: usize,
		offset: usize,
		dump: String,
	},

	#[error("unexpected record `{tag}` while loading {mode} at offset {offset} of block {block}\n{dump}")]
	#[diagnostic(
		code(docgen::unexpected_record),
		help("the model file was produced by an incompatible linker or is corrupt")
	)]
	UnexpectedRecord {
		mode: String,
		tag: u8,
		block: usize,
		offset: usize,
		dump: String,
	},

	#[error("`{record}` record at offset {offset} of block {block} must appear inside a {parent}")]
	#[diagnostic(code(docgen::missing_context))]
	MissingContext {
		record: &'static str,
		parent: &'static str,
		block: usize,
		offset: usize,
	},

	#[error("record of {size} bytes does not fit in a {limit} byte block")]
	#[diagnostic(code(docgen::record_too_large))]
	RecordTooLarge { size: usize, limit: usize },

	#[error("`{field}` is {len} bytes long but the record format allows at most {limit}")]
	#[diagnostic(code(docgen::field_too_long))]
	FieldTooLong {
		field: &'static str,
		len: usize,
		limit: usize,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(docgen::config_parse),
		help("check that docgen.toml is valid TOML with `model`, `output` and/or [macros]")
	)]
	ConfigParse(String),

	#[error("no model file was given")]
	#[diagnostic(
		code(docgen::model_not_configured),
		help("pass `--model <file>` or set `model` in docgen.toml")
	)]
	ModelNotConfigured,

	#[error("no group named `{0}` in the model")]
	#[diagnostic(
		code(docgen::group_not_found),
		help("run `docgen groups` to list the groups in the model")
	)]
	GroupNotFound(String),
}

pub type DocgenResult<T> = Result<T, DocgenError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
