use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use docgen_cli::Commands;
use docgen_cli::DocgenCli;
use docgen_cli::OutputFormat;
use docgen_core::AnyEmptyResult;
use docgen_core::DocgenConfig;
use docgen_core::DocgenError;
use docgen_core::DocgenResult;
use docgen_core::LoadedModel;
use docgen_core::Model;
use docgen_core::SequenceWalker;
use docgen_core::load_model;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DocgenCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Info { model, format }) => run_info(&args, model.as_deref(), *format),
		Some(Commands::Groups { model }) => run_groups(&args, model.as_deref()),
		Some(Commands::Walk {
			group,
			model,
			format,
		}) => run_walk(&args, group, model.as_deref(), *format),
		Some(Commands::Expand { text }) => run_expand(&args, text),
		None => {
			eprintln!("No subcommand specified. Run `docgen --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render through miette for rich diagnostics with help text and error
		// codes.
		match e.downcast::<DocgenError>() {
			Ok(docgen_err) => {
				let report: miette::Report = (*docgen_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `DOCGEN_LOG` takes an `EnvFilter` directive and overrides
/// `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = EnvFilter::try_from_env("DOCGEN_LOG")
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_root(args: &DocgenCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> DocgenResult<DocgenConfig> {
	Ok(DocgenConfig::load(root)?.unwrap_or_default())
}

/// The model named on the command line, or the one configured in docgen.toml.
fn resolve_model(args: &DocgenCli, model: Option<&Path>) -> DocgenResult<PathBuf> {
	if let Some(model) = model {
		return Ok(model.to_path_buf());
	}

	let root = resolve_root(args);
	load_config(&root)?
		.model_path(&root)
		.ok_or(DocgenError::ModelNotConfigured)
}

fn open_model(args: &DocgenCli, model: Option<&Path>) -> DocgenResult<LoadedModel> {
	let path = resolve_model(args, model)?;
	tracing::debug!(path = %path.display(), "loading model");
	load_model(&path)
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("{label:<28} {value}");
}

/// Counts for one group of the model.
struct GroupSummary {
	name: String,
	states: usize,
	timelines: usize,
	nodes: usize,
	messages: usize,
	functions: usize,
	types: usize,
	constants: usize,
	applications: usize,
	samples: usize,
}

fn summarize_groups(model: &Model) -> Vec<GroupSummary> {
	model
		.groups()
		.map(|(id, group)| {
			let api = group.api.as_ref();
			GroupSummary {
				name: group.name.to_string(),
				states: group
					.state_machine
					.as_ref()
					.map_or(0, |machine| machine.states.len()),
				timelines: group
					.sequence_diagram
					.as_ref()
					.map_or(0, |diagram| diagram.timelines.len()),
				nodes: model.diagram_nodes(id).count(),
				messages: model
					.diagram_nodes(id)
					.filter(|node| model.node(*node).sent_message.is_some())
					.count(),
				functions: api.map_or(0, |api| api.functions.len()),
				types: api.map_or(0, |api| api.types.len()),
				constants: api.map_or(0, |api| api.constants.len()),
				applications: group.applications.len(),
				samples: group.samples.len(),
			}
		})
		.collect()
}

fn count_field(label: &str, count: usize) {
	if count > 0 {
		print_field(label, colored!(count, yellow));
	} else {
		print_field(label, count);
	}
}

fn run_info(args: &DocgenCli, model: Option<&Path>, format: OutputFormat) -> AnyEmptyResult {
	let loaded = open_model(args, model)?;
	let header = &loaded.header;
	let report = &loaded.report;
	let groups = summarize_groups(&loaded);
	let version = format!("{}.{}", header.version_major, header.version_minor);

	if format == OutputFormat::Json {
		let group_entries: Vec<serde_json::Value> = groups
			.iter()
			.map(|group| {
				serde_json::json!({
					"name": group.name,
					"states": group.states,
					"timelines": group.timelines,
					"nodes": group.nodes,
					"messages": group.messages,
					"functions": group.functions,
					"types": group.types,
					"constants": group.constants,
					"applications": group.applications,
					"samples": group.samples,
				})
			})
			.collect();

		let output = serde_json::json!({
			"model": loaded.source,
			"built": header.to_string(),
			"version": version,
			"records": loaded.records,
			"blocks": loaded.blocks,
			"links": {
				"transitions_resolved": report.transitions_resolved,
				"transitions_absent": report.transitions_absent,
				"messages_resolved": report.messages_resolved,
				"messages_absent": report.messages_absent,
				"function_pairs": report.function_pairs,
				"unpaired_function_ends": report.unpaired_function_ends,
			},
			"groups": group_entries,
		});
		println!("{}", serde_json::to_string_pretty(&output)?);
		return Ok(());
	}

	println!("{}", colored!("docgen info", bold));

	print_section("Model");
	print_field("Model file", &loaded.source);
	print_field("Built", header);
	print_field("Format version", version);
	print_field("Records", loaded.records);
	print_field("Blocks", loaded.blocks);

	print_section("Links");
	print_field("Transitions resolved", colored!(report.transitions_resolved, green));
	count_field("Transitions absent", report.transitions_absent);
	print_field("Messages resolved", colored!(report.messages_resolved, green));
	count_field("Messages absent", report.messages_absent);
	print_field("Function pairs", report.function_pairs);
	count_field("Unpaired function ends", report.unpaired_function_ends);

	print_section("Groups");
	for group in &groups {
		println!(
			"{:<28} {} states, {} timelines, {} nodes, {} messages",
			group.name, group.states, group.timelines, group.nodes, group.messages
		);

		if group.functions + group.types + group.constants > 0 {
			println!(
				"{:<28} api: {} functions, {} types, {} constant groups",
				"", group.functions, group.types, group.constants
			);
		}

		if group.applications + group.samples > 0 {
			println!(
				"{:<28} {} applications, {} samples",
				"", group.applications, group.samples
			);
		}
	}

	Ok(())
}

fn run_groups(args: &DocgenCli, model: Option<&Path>) -> AnyEmptyResult {
	let loaded = open_model(args, model)?;

	for (_, group) in loaded.groups() {
		println!("{}", group.name);
	}

	Ok(())
}

fn run_walk(
	args: &DocgenCli,
	group: &str,
	model: Option<&Path>,
	format: OutputFormat,
) -> AnyEmptyResult {
	let loaded = open_model(args, model)?;
	let Some((group_id, _)) = loaded.find_group(group.as_bytes()) else {
		return Err(DocgenError::GroupNotFound(group.to_string()).into());
	};

	let mut walker = SequenceWalker::new(&loaded);
	let emissions = walker.emissions(group_id);

	if format == OutputFormat::Json {
		let entries: Vec<serde_json::Value> = emissions
			.iter()
			.map(|emission| {
				serde_json::json!({
					"from": loaded.timeline(emission.from).name.to_string(),
					"to": loaded.timeline(emission.to).name.to_string(),
					"message": loaded.message(emission.message).name.to_string(),
					"sender": loaded.node(emission.sender).id,
					"receiver": loaded.node(emission.receiver).id,
				})
			})
			.collect();
		println!("{}", serde_json::to_string_pretty(&entries)?);
		return Ok(());
	}

	if emissions.is_empty() {
		eprintln!(
			"{}",
			colored!(format!("no messages reach a receiver in `{group}`"), yellow)
		);
		return Ok(());
	}

	for emission in &emissions {
		println!(
			"{} -> {} : {}",
			loaded.timeline(emission.from).name,
			loaded.timeline(emission.to).name,
			loaded.message(emission.message).name
		);
	}

	Ok(())
}

fn run_expand(args: &DocgenCli, text: &str) -> AnyEmptyResult {
	let root = resolve_root(args);
	let macros = load_config(&root)?.macro_table();
	println!("{}", macros.expand(text));

	Ok(())
}
