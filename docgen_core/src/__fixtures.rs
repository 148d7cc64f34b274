use std::io::Cursor;

use crate::*;

pub fn text(value: &str) -> Name<'_> {
	Name::borrowed(value.as_bytes())
}

pub fn fixed_text(value: &str) -> Name<'_> {
	Name::borrowed_fixed(value.as_bytes(), true)
}

pub fn pair<'a>(first: &'a str, second: &'a str) -> PairFields<'a> {
	PairFields {
		first: text(first),
		second: text(second),
	}
}

pub fn type_fields<'a>(kind: &'a str, name: &'a str, brief: &'a str) -> TypeFields<'a> {
	TypeFields {
		kind: text(kind),
		name: text(name),
		brief: text(brief),
	}
}

pub fn timeline<'a>(group: &'a str, name: &'a str) -> Record<'a> {
	Record::Timeline {
		group: text(group),
		name: text(name),
	}
}

pub fn node(id: u16, flags: NodeFlags) -> Record<'static> {
	Record::NodeStart {
		id,
		flags: flags.bits(),
	}
}

pub fn send<'a>(receiver: u8, timeline: &'a str, message: &'a str) -> Record<'a> {
	Record::SentMessage {
		sender: 0,
		receiver,
		timeline: text(timeline),
		message: text(message),
	}
}

/// Timeline `A` sends `M` to timeline `B` in the unnamed group.
pub fn single_message_records() -> Vec<Record<'static>> {
	vec![
		Record::SequenceStart(text("")),
		timeline("", "A"),
		node(1, NodeFlags::MESSAGE_SEND),
		send(2, "B", "M"),
		Record::NodeEnd,
		timeline("", "B"),
		node(2, NodeFlags::RESPONDS),
		Record::NodeEnd,
		Record::SequenceEnd,
	]
}

/// `client` calls a function on `server`, which looks something up in `store`
/// before returning.
///
/// ```text
/// client:  1 request -> 3           2
/// server:  3 (function) 4 lookup -> 6   5 (function end)
/// store:   6
/// ```
pub fn nested_call_records() -> Vec<Record<'static>> {
	vec![
		Record::SequenceStart(text("rpc")),
		timeline("rpc", "client"),
		node(1, NodeFlags::MESSAGE_SEND),
		send(3, "server", "request"),
		Record::NodeEnd,
		node(2, NodeFlags::default()),
		Record::NodeEnd,
		timeline("rpc", "server"),
		node(3, NodeFlags::FUNCTION | NodeFlags::RESPONDS),
		Record::NodeEnd,
		node(4, NodeFlags::IN_FUNCTION | NodeFlags::MESSAGE_SEND),
		send(6, "store", "lookup"),
		Record::NodeEnd,
		node(5, NodeFlags::FUNCTION_END | NodeFlags::RESPONDS),
		Record::NodeEnd,
		timeline("rpc", "store"),
		node(6, NodeFlags::RESPONDS),
		Record::NodeEnd,
		Record::SequenceEnd,
	]
}

/// `server` is walked first and reaches node 4 by stepping through its
/// function. `client` is walked last and calls node 4 directly, then sends a
/// note to itself.
///
/// ```text
/// server:  1 call -> 3   2
/// worker:  3 (in function)   4
/// client:  5 late -> 4   6 self -> 5
/// ```
pub fn late_call_records() -> Vec<Record<'static>> {
	vec![
		Record::SequenceStart(text("late")),
		timeline("late", "server"),
		node(1, NodeFlags::MESSAGE_SEND),
		send(3, "worker", "call"),
		Record::NodeEnd,
		node(2, NodeFlags::default()),
		Record::NodeEnd,
		timeline("late", "worker"),
		node(3, NodeFlags::IN_FUNCTION),
		Record::NodeEnd,
		node(4, NodeFlags::default()),
		Record::NodeEnd,
		timeline("late", "client"),
		node(5, NodeFlags::MESSAGE_SEND),
		send(4, "worker", "late"),
		Record::NodeEnd,
		node(6, NodeFlags::MESSAGE_SEND),
		send(5, "client", "self"),
		Record::NodeEnd,
		Record::SequenceEnd,
	]
}

/// Two timelines that keep calling each other.
pub fn ping_pong_records() -> Vec<Record<'static>> {
	vec![
		Record::SequenceStart(text("loop")),
		timeline("loop", "ping"),
		node(1, NodeFlags::MESSAGE_SEND),
		send(2, "pong", "ping"),
		Record::NodeEnd,
		timeline("loop", "pong"),
		node(2, NodeFlags::MESSAGE_SEND),
		send(1, "ping", "pong"),
		Record::NodeEnd,
		Record::SequenceEnd,
	]
}

pub fn state_machine_records() -> Vec<Record<'static>> {
	vec![
		Record::StateMachineStart(text("door")),
		Record::State {
			id: 0,
			group: text("door"),
			name: text("closed"),
		},
		Record::Transition { target: 1 },
		Record::Trigger {
			group: text("door"),
			name: text("open"),
		},
		Record::Condition(text("unlocked")),
		Record::Triggers {
			group: text("alarm"),
			name: text("chime"),
		},
		Record::End,
		Record::State {
			id: 1,
			group: text("door"),
			name: text("opened"),
		},
		Record::Transition { target: 0 },
		Record::Trigger {
			group: text("door"),
			name: text("close"),
		},
		Record::Transition { target: 7 },
		Record::End,
		Record::StateMachineEnd,
	]
}

pub fn api_records() -> Vec<Record<'static>> {
	vec![
		Record::ApiStart(text("net")),
		Record::ApiFunction(type_fields("int", "connect", "")),
		Record::ApiAction(text("opens a connection")),
		Record::ApiDescription(fixed_text("  connect(host)\n")),
		Record::ApiParameter(type_fields("const char*", "host", "the host to connect to")),
		Record::ApiParameter(type_fields("int", "port", "the port")),
		Record::ApiReturns(pair("0", "connected")),
		Record::ApiReturns(pair("-1", "failed")),
		Record::ApiFunctionEnd,
		Record::ApiTypeStart(pair("socket", "an open socket")),
		Record::ApiTypeField(type_fields("int", "fd", "descriptor")),
		Record::ApiTypeField(type_fields("unsigned int", "flags", "state flags")),
		Record::ApiTypeEnd,
		Record::ApiConstantsStart(pair("errors", "error codes")),
		Record::ApiConstant(ConstantFields {
			kind: text("int"),
			name: text("E_OK"),
			value: text("0"),
			brief: text("no error"),
		}),
		Record::ApiConstant(ConstantFields {
			kind: text("int"),
			name: text("E_TIMEOUT"),
			value: text("110"),
			brief: text("timed out"),
		}),
		Record::ApiConstantsEnd,
		Record::ApiEnd,
	]
}

pub fn application_records() -> Vec<Record<'static>> {
	vec![
		Record::Sample(pair("hello", "fn main() {}")),
		Record::ApplicationStart(text("docgen")),
		Record::ApplicationSection(pair("NAME", "docgen - first")),
		Record::ApplicationSubSection(pair("intro", "about")),
		Record::ApplicationOption(OptionFields {
			flags: 1,
			name: fixed_text("-v"),
			value: text(""),
			description: text("verbose"),
		}),
		Record::ApplicationOption(OptionFields {
			flags: 0,
			name: text("--output"),
			value: text("dir"),
			description: text("output directory"),
		}),
		Record::ApplicationCommand(type_fields("walk", "<group>", "walk a diagram")),
		Record::ApplicationSynopsis {
			name: text("docgen"),
			indexes: &[1, 0, 9],
		},
		Record::ApplicationSection(pair("NAME", "docgen - second")),
		Record::ApplicationEnd,
	]
}

pub fn model_bytes(records: &[Record<'_>]) -> Vec<u8> {
	model_to_vec(records).unwrap()
}

pub fn load_records(records: &[Record<'_>]) -> DocgenResult<LoadedModel> {
	load_model_from_reader(Cursor::new(model_bytes(records)), "fixture")
}

pub fn group_id(model: &Model, name: &str) -> GroupId {
	model
		.find_group(name.as_bytes())
		.map(|(id, _)| id)
		.unwrap_or_else(|| panic!("missing group `{name}`"))
}

pub fn timeline_id(model: &Model, name: &str) -> TimelineId {
	model
		.timelines()
		.find(|(_, timeline)| timeline.name == name)
		.map(|(id, _)| id)
		.unwrap_or_else(|| panic!("missing timeline `{name}`"))
}

/// The node with serialized id `id`.
pub fn node_with_id(model: &Model, timeline: &str, id: u16) -> NodeId {
	model
		.timeline(timeline_id(model, timeline))
		.nodes
		.iter()
		.copied()
		.find(|node| model.node(*node).id == id)
		.unwrap_or_else(|| panic!("missing node {id} on `{timeline}`"))
}

/// The serialized ids of the nodes visited by walking `timeline`.
pub fn walked_ids(model: &Model, timeline: &str) -> Vec<u16> {
	let mut walker = SequenceWalker::new(model);
	walker
		.walk_timeline(timeline_id(model, timeline))
		.iter()
		.map(|step| model.node(step.node).id)
		.collect()
}

/// `from -> to : message` for every emission of the group.
pub fn emission_lines(model: &Model, group: &str) -> Vec<String> {
	let mut walker = SequenceWalker::new(model);
	walker
		.emissions(group_id(model, group))
		.iter()
		.map(|emission| {
			format!(
				"{} -> {} : {}",
				model.timeline(emission.from).name,
				model.timeline(emission.to).name,
				model.message(emission.message).name
			)
		})
		.collect()
}
