//! The linking pass.
//!
//! Records refer to states and nodes by the numeric ids they were written
//! with. Once the whole file is loaded these ids are replaced with arena
//! indices using one lookup table per group, so the pass is linear in the
//! number of states and nodes.

use crate::model::GroupId;
use crate::model::Link;
use crate::model::Model;
use crate::model::NodeFlags;
use crate::model::NodeId;
use crate::model::StateId;

/// The largest state and node ids seen while building. They size the lookup
/// tables of the linking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkLimits {
	pub max_state: u16,
	pub max_node: u16,
}

/// What the linking pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkReport {
	pub transitions_resolved: usize,
	pub transitions_absent: usize,
	pub messages_resolved: usize,
	pub messages_absent: usize,
	pub function_pairs: usize,
	/// Function ends with no open function start before them on their
	/// timeline.
	pub unpaired_function_ends: usize,
}

/// Resolve every transition target and message receiver in `model`, and pair
/// function start and end nodes.
///
/// Ids that are out of range, unused, or the reserved node id `0` become
/// [`Link::Absent`]. Links that are already resolved are left alone, so
/// linking twice is harmless.
pub fn link(model: &mut Model, limits: LinkLimits) -> LinkReport {
	let mut report = LinkReport::default();
	let groups: Vec<GroupId> = model.groups().map(|(id, _)| id).collect();

	for group in groups {
		if model.group(group).state_machine.is_some() {
			link_states(model, group, limits.max_state, &mut report);
		}

		if model.group(group).sequence_diagram.is_some() {
			link_nodes(model, group, limits.max_node, &mut report);
		}
	}

	tracing::debug!(
		transitions_resolved = report.transitions_resolved,
		transitions_absent = report.transitions_absent,
		messages_resolved = report.messages_resolved,
		messages_absent = report.messages_absent,
		function_pairs = report.function_pairs,
		"linked model"
	);

	report
}

fn link_states(model: &mut Model, group: GroupId, max_state: u16, report: &mut LinkReport) {
	let states: Vec<StateId> = model
		.group(group)
		.state_machine
		.as_ref()
		.map(|machine| machine.states.clone())
		.unwrap_or_default();

	let mut table: Vec<Option<StateId>> = vec![None; usize::from(max_state) + 1];
	for state in &states {
		if let Some(slot) = table.get_mut(usize::from(model.state(*state).tag_id)) {
			*slot = Some(*state);
		}
	}

	for state in states {
		for transition in &mut model.state_mut(state).transitions {
			let Link::Unresolved(id) = transition.target else {
				continue;
			};

			transition.target = match table.get(usize::from(id)).copied().flatten() {
				Some(target) => {
					report.transitions_resolved += 1;
					Link::Resolved(target)
				}
				None => {
					report.transitions_absent += 1;
					Link::Absent
				}
			};
		}
	}
}

fn link_nodes(model: &mut Model, group: GroupId, max_node: u16, report: &mut LinkReport) {
	let timelines = model
		.group(group)
		.sequence_diagram
		.as_ref()
		.map(|diagram| diagram.timelines.clone())
		.unwrap_or_default();

	// Slot 0 stays empty: node id 0 means "no receiver".
	let mut table: Vec<Option<NodeId>> = vec![None; usize::from(max_node) + 1];

	for timeline in timelines {
		let nodes = model.timeline(timeline).nodes.clone();
		let mut open_function: Option<NodeId> = None;

		for node in nodes {
			let (id, flags) = {
				let node = model.node(node);
				(node.id, node.flags)
			};

			if flags.contains(NodeFlags::FUNCTION) {
				open_function = Some(node);
			} else if flags.contains(NodeFlags::FUNCTION_END) {
				match open_function.take() {
					Some(start) => {
						model.node_mut(start).function_end = Some(node);
						model.node_mut(node).function_start = Some(start);
						report.function_pairs += 1;
					}
					None => {
						tracing::warn!(
							timeline = %model.timeline(timeline).name,
							node = id,
							"function end without a matching function start"
						);
						report.unpaired_function_ends += 1;
					}
				}
			}

			if id != 0 {
				if let Some(slot) = table.get_mut(usize::from(id)) {
					*slot = Some(node);
				}
			}
		}
	}

	let nodes: Vec<NodeId> = model.diagram_nodes(group).collect();
	for node in nodes {
		let Some(message) = model.node(node).sent_message else {
			continue;
		};
		let Link::Unresolved(id) = model.message(message).receiver else {
			continue;
		};

		match table.get(usize::from(id)).copied().flatten() {
			Some(receiver) => {
				let receiving_timeline = model.node(receiver).timeline;
				model.node_mut(receiver).received_message = Some(message);

				let message = model.message_mut(message);
				message.receiver = Link::Resolved(receiver);
				message.target_timeline = Some(receiving_timeline);
				report.messages_resolved += 1;
			}
			None => {
				model.message_mut(message).receiver = Link::Absent;
				report.messages_absent += 1;
			}
		}
	}
}
