//! Ordering of message sends across the timelines of a sequence diagram.
//!
//! A renderer has to draw the messages of a diagram in causal order: a
//! synchronous call to another timeline is followed by everything that
//! timeline does in response before the caller continues. The walker
//! reconstructs that order from a linked [`Model`] with two steps:
//!
//! - [`SequenceWalker::search_next_node`] scans one timeline for the next node
//!   that still has a message to send.
//! - [`SequenceWalker::next_active_node`] follows a send to its receiver and
//!   returns to the caller once the receiver is done.
//!
//! Return points are kept in the walker, so the model is only borrowed.

use std::collections::HashMap;

use crate::model::GroupId;
use crate::model::MessageId;
use crate::model::Model;
use crate::model::NodeFlags;
use crate::model::NodeId;
use crate::model::TimelineId;

/// The result of scanning a timeline for the next active node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStep {
	/// Where the next scan starts.
	pub next: Option<NodeId>,
	/// The node with a message to send, if one was found.
	pub active: Option<NodeId>,
}

/// One node visited by a walk, with the message it sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkStep {
	pub node: NodeId,
	pub message: Option<MessageId>,
}

/// A message that reaches a receiver, in the order it should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emission {
	pub message: MessageId,
	pub sender: NodeId,
	pub receiver: NodeId,
	pub from: TimelineId,
	pub to: TimelineId,
}

#[derive(Debug)]
pub struct SequenceWalker<'m> {
	model: &'m Model,
	/// Receiver node to the node that sent it a message from another timeline.
	continuations: HashMap<NodeId, NodeId>,
}

impl<'m> SequenceWalker<'m> {
	/// Create a walker over a linked model.
	pub fn new(model: &'m Model) -> Self {
		Self {
			model,
			continuations: HashMap::new(),
		}
	}

	pub fn model(&self) -> &'m Model {
		self.model
	}

	/// The node that called `node` from another timeline, if any.
	pub fn continuation(&self, node: NodeId) -> Option<NodeId> {
		self.continuations.get(&node).copied()
	}

	/// Forget every recorded call.
	pub fn reset(&mut self) {
		self.continuations.clear();
	}

	/// Scan forward from `cursor`, inclusive, for a node that sends a message.
	///
	/// Nodes flagged [`NodeFlags::RESPONDS`] have already been accounted for
	/// and are skipped; when such a node starts a function the scan jumps to
	/// the end of the function.
	pub fn search_next_node(&self, cursor: Option<NodeId>) -> SearchStep {
		let mut current = cursor;

		while let Some(id) = current {
			let node = self.model.node(id);

			if node.flags.contains(NodeFlags::RESPONDS) {
				current = if node.flags.contains(NodeFlags::FUNCTION) {
					node.function_end.or(node.next)
				} else {
					node.next
				};
			} else if node.sent_message.is_some() {
				return SearchStep {
					next: node.next,
					active: Some(id),
				};
			} else {
				current = node.next;
			}
		}

		SearchStep {
			next: None,
			active: None,
		}
	}

	/// Decide which node follows the active node `id`.
	///
	/// A message sent to another timeline moves the walk to its receiver and
	/// records `id` as the place to come back to. When the receiver side is
	/// done (a function end or a plain receiver) the walk resumes after the
	/// caller. `None` ends the walk.
	pub fn next_active_node(&mut self, id: NodeId) -> Option<NodeId> {
		let model = self.model;
		let node = model.node(id);

		if let Some(message) = node.sent_message {
			return match model.message(message).receiver.resolved() {
				Some(receiver) if model.node(receiver).timeline != node.timeline => {
					self.continuations.insert(receiver, id);
					Some(receiver)
				}
				_ => node.next,
			};
		}

		if node.flags.intersects(NodeFlags::FUNCTION | NodeFlags::IN_FUNCTION) {
			return node.next;
		}

		if node.flags.contains(NodeFlags::FUNCTION_END) {
			return match node.function_start.and_then(|start| self.continuation(start)) {
				Some(caller) => model.node(caller).next,
				None => node.next,
			};
		}

		self.continuation(id).and_then(|caller| model.node(caller).next)
	}

	/// Walk one timeline, following calls into other timelines.
	pub fn walk_timeline(&mut self, timeline: TimelineId) -> Vec<WalkStep> {
		let model = self.model;
		let timeline = model.timeline(timeline);
		let limit = model.diagram_nodes(timeline.group).count() + 1;
		let mut steps = Vec::new();
		let mut cursor = timeline.nodes.first().copied();

		while cursor.is_some() {
			let SearchStep { next, active } = self.search_next_node(cursor);
			let mut active = active;
			let mut taken = 0;

			while let Some(node) = active {
				steps.push(WalkStep {
					node,
					message: model.node(node).sent_message,
				});

				active = self.next_active_node(node);
				taken += 1;

				if active == next {
					break;
				}

				if taken > limit {
					tracing::warn!(
						timeline = %timeline.name,
						steps = taken,
						"walk did not return to its timeline, stopping"
					);
					break;
				}
			}

			cursor = next;
		}

		steps
	}

	/// Walk every timeline of the group's sequence diagram in order.
	///
	/// Calls recorded by an earlier walk are forgotten first. Calls are shared
	/// between the timelines of one diagram.
	pub fn walk_diagram(&mut self, group: GroupId) -> Vec<WalkStep> {
		self.reset();
		let model = self.model;
		let Some(diagram) = model.group(group).sequence_diagram.as_ref() else {
			return Vec::new();
		};

		diagram
			.timelines
			.iter()
			.flat_map(|timeline| self.walk_timeline(*timeline))
			.collect()
	}

	/// The messages of the group's diagram that reach a receiver, in the order
	/// they should be drawn.
	pub fn emissions(&mut self, group: GroupId) -> Vec<Emission> {
		let steps = self.walk_diagram(group);
		let model = self.model;

		steps
			.iter()
			.filter_map(|step| {
				let message_id = step.message?;
				let message = model.message(message_id);
				let receiver = message.receiver.resolved()?;

				Some(Emission {
					message: message_id,
					sender: step.node,
					receiver,
					from: message.sending_timeline,
					to: model.node(receiver).timeline,
				})
			})
			.collect()
	}
}
