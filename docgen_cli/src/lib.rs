use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Inspect linked docgen model files.",
	long_about = "docgen reads the linked model file written by the document linker, builds the \
	              model graph and resolves every state and node reference in it.\n\nQuick \
	              start:\n  docgen info            Show the header and a summary of each \
	              group\n  docgen groups          List the groups in the model\n  docgen walk \
	              <group>   Print the message order of a sequence diagram\n  docgen expand \
	              <text>  Expand $macros defined in docgen.toml"
)]
pub struct DocgenCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print the model header and a summary of every group.
	///
	/// Shows when the model was built, its format version, how many records
	/// and blocks it holds, what the linking pass resolved, and for each
	/// group the number of states, timelines, API entries and applications.
	Info {
		/// Linked model file. Defaults to `model` from docgen.toml.
		#[arg(long, short)]
		model: Option<PathBuf>,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List the groups in the model, one per line.
	Groups {
		/// Linked model file. Defaults to `model` from docgen.toml.
		#[arg(long, short)]
		model: Option<PathBuf>,
	},
	/// Print the messages of a sequence diagram in the order they are drawn.
	///
	/// Each line has the form `from -> to : message`. `all` selects the first
	/// group after the document and `document` the document itself.
	Walk {
		/// Name of the group that holds the sequence diagram.
		group: String,

		/// Linked model file. Defaults to `model` from docgen.toml.
		#[arg(long, short)]
		model: Option<PathBuf>,

		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Expand `$name` macros from the `[macros]` table of docgen.toml.
	Expand {
		/// Text to expand.
		text: String,
	},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
