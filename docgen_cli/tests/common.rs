#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use docgen_core::AnyResult;
use docgen_core::Name;
use docgen_core::NodeFlags;
use docgen_core::Record;
use docgen_core::model_to_vec;
use insta_cmd::get_cargo_bin;

pub fn docgen_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("docgen"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("DOCGEN_LOG");
	cmd
}

fn text(value: &str) -> Name<'_> {
	Name::borrowed(value.as_bytes())
}

fn node(id: u16, flags: NodeFlags) -> Record<'static> {
	Record::NodeStart {
		id,
		flags: flags.bits(),
	}
}

/// `client` calls `server`, which asks `store` before returning.
pub fn rpc_records() -> Vec<Record<'static>> {
	vec![
		Record::SequenceStart(text("rpc")),
		Record::Timeline {
			group: text("rpc"),
			name: text("client"),
		},
		node(1, NodeFlags::MESSAGE_SEND),
		Record::SentMessage {
			sender: 0,
			receiver: 3,
			timeline: text("server"),
			message: text("request"),
		},
		Record::NodeEnd,
		node(2, NodeFlags::default()),
		Record::NodeEnd,
		Record::Timeline {
			group: text("rpc"),
			name: text("server"),
		},
		node(3, NodeFlags::FUNCTION | NodeFlags::RESPONDS),
		Record::NodeEnd,
		node(4, NodeFlags::IN_FUNCTION | NodeFlags::MESSAGE_SEND),
		Record::SentMessage {
			sender: 0,
			receiver: 6,
			timeline: text("store"),
			message: text("lookup"),
		},
		Record::NodeEnd,
		node(5, NodeFlags::FUNCTION_END | NodeFlags::RESPONDS),
		Record::NodeEnd,
		Record::Timeline {
			group: text("rpc"),
			name: text("store"),
		},
		node(6, NodeFlags::RESPONDS),
		Record::NodeEnd,
		Record::SequenceEnd,
		Record::StateMachineStart(text("door")),
		Record::State {
			id: 0,
			group: text("door"),
			name: text("closed"),
		},
		Record::Transition { target: 9 },
		Record::End,
		Record::StateMachineEnd,
	]
}

/// Write `records` to `docs.gdsl` in `dir`.
pub fn write_model(dir: &Path, records: &[Record<'_>]) -> AnyResult<PathBuf> {
	let path = dir.join("docs.gdsl");
	std::fs::write(&path, model_to_vec(records)?)?;
	Ok(path)
}
