//! The in-memory model graph built from a linked model file.
//!
//! Groups, states, timelines, nodes and messages live in flat arenas on
//! [`Model`] and refer to each other through typed indices. Cross references
//! that come from the file start out as [`Link::Unresolved`] and are rewritten
//! by [`crate::link`].

use std::fmt;

use bitflags::bitflags;

use crate::name::Name;
use crate::name::OwnedName;

macro_rules! arena_ids {
	($($(#[$meta:meta])* $id:ident,)+) => {
		$(
			$(#[$meta])*
			#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
			pub struct $id(usize);

			impl $id {
				pub const fn index(self) -> usize {
					self.0
				}
			}

			impl fmt::Display for $id {
				fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
					write!(f, "{}", self.0)
				}
			}
		)+
	};
}

arena_ids! {
	/// Index of a [`Group`] in [`Model::groups`].
	GroupId,
	/// Index of a [`State`] in the model.
	StateId,
	/// Index of a [`Timeline`] in the model.
	TimelineId,
	/// Index of a [`Node`] in the model.
	NodeId,
	/// Index of a [`Message`] in the model.
	MessageId,
}

/// A reference read from the file that is resolved by the linking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link<T> {
	/// The raw id stored in the file.
	Unresolved(u16),
	Resolved(T),
	/// The id did not match anything, or was the reserved id `0` for nodes.
	Absent,
}

impl<T: Copy> Link<T> {
	pub fn resolved(&self) -> Option<T> {
		match self {
			Self::Resolved(target) => Some(*target),
			Self::Unresolved(_) | Self::Absent => None,
		}
	}
}

bitflags! {
	/// The flags attached to a sequence diagram node by the source compiler.
	#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
	pub struct NodeFlags: u32 {
		/// The node has already been accounted for, normally because it
		/// receives a message sent from another timeline.
		const RESPONDS = 0x0001;
		const MESSAGE_SEND = 0x0002;
		const MESSAGE_CALL = 0x0003;
		const WAIT_FOR = 0x0004;
		const BROADCAST = 0x0040;
		const FUNCTION_END = 0x0080;
		const FUNCTION = 0x0100;
		const ACTIVE = 0x0200;
		const TAGGED = 0x0400;
		const IN_FUNCTION = 0x0800;
		const WAIT = 0x1000;
		const DEPENDENCY = 0x2000;
		const MESSAGE = 0x4000;
		const GHOST = 0x8000;
	}
}

/// What a group lookup selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
	/// A group found by its literal name.
	Normal,
	/// `"all"`: the first group after the document root.
	All,
	/// `"document"`: the document root itself.
	Document,
}

/// Name that selects [`GroupKind::All`].
pub const ALL_GROUP_NAME: &[u8] = b"all";
/// Name that selects [`GroupKind::Document`].
pub const DOCUMENT_GROUP_NAME: &[u8] = b"document";
/// Name given to the document root when nothing else names it.
pub const DEFAULT_GROUP_NAME: &[u8] = b"default";

#[derive(Debug, Clone, Default)]
pub struct Group {
	pub name: OwnedName,
	pub state_machine: Option<StateMachine>,
	pub sequence_diagram: Option<SequenceDiagram>,
	pub api: Option<Api>,
	pub applications: Vec<Application>,
	pub samples: Vec<Sample>,
	/// Longest message name in the group's sequence diagram.
	pub max_message_length: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StateMachine {
	pub states: Vec<StateId>,
}

#[derive(Debug, Clone)]
pub struct State {
	pub name: OwnedName,
	pub group: GroupId,
	/// The id the state was serialized with.
	pub tag_id: u16,
	pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone)]
pub struct Transition {
	pub target: Link<StateId>,
	/// The trigger that causes the transition.
	pub trigger: Option<Trigger>,
	pub condition: Option<OwnedName>,
	/// Triggers raised when the transition is taken.
	pub triggers: Vec<Trigger>,
}

impl Transition {
	pub fn new(target_id: u16) -> Self {
		Self {
			target: Link::Unresolved(target_id),
			trigger: None,
			condition: None,
			triggers: Vec::new(),
		}
	}
}

/// A trigger qualified by the group it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
	pub group: GroupId,
	pub name: OwnedName,
}

#[derive(Debug, Clone, Default)]
pub struct SequenceDiagram {
	pub timelines: Vec<TimelineId>,
}

#[derive(Debug, Clone)]
pub struct Timeline {
	pub name: OwnedName,
	pub group: GroupId,
	pub nodes: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Node {
	/// The id the node was serialized with. Ids start at 1 in each diagram.
	pub id: u16,
	pub flags: NodeFlags,
	pub timeline: TimelineId,
	pub sent_message: Option<MessageId>,
	pub received_message: Option<MessageId>,
	pub condition: Option<OwnedName>,
	/// On a function start, the node that ends the function.
	pub function_end: Option<NodeId>,
	/// On a function end, the node that started the function.
	pub function_start: Option<NodeId>,
	/// The node after this one on the same timeline.
	pub next: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Message {
	pub name: OwnedName,
	pub sender: NodeId,
	/// The sender id byte stored in the file.
	pub sender_id: u8,
	pub sending_timeline: TimelineId,
	/// The timeline named in the file as the destination.
	pub target_timeline_name: OwnedName,
	/// The timeline of the resolved receiver.
	pub target_timeline: Option<TimelineId>,
	pub receiver: Link<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Api {
	pub functions: Vec<ApiFunction>,
	pub types: Vec<ApiType>,
	pub constants: Vec<ApiConstants>,
}

/// Smallest column width used for API tables.
pub const MIN_COLUMN_WIDTH: usize = 4;

#[derive(Debug, Clone)]
pub struct ApiFunction {
	pub name: OwnedName,
	pub return_type: OwnedName,
	pub action: Option<OwnedName>,
	pub description: Option<OwnedName>,
	pub parameters: Vec<ApiParameter>,
	pub returns: Vec<ApiReturn>,
	pub max_param_type_length: usize,
	pub max_param_name_length: usize,
	pub max_return_value_length: usize,
}

impl ApiFunction {
	pub fn new(return_type: OwnedName, name: OwnedName) -> Self {
		Self {
			name,
			return_type,
			action: None,
			description: None,
			parameters: Vec::new(),
			returns: Vec::new(),
			max_param_type_length: MIN_COLUMN_WIDTH,
			max_param_name_length: MIN_COLUMN_WIDTH,
			max_return_value_length: 0,
		}
	}

	pub fn add_parameter(&mut self, parameter: ApiParameter) {
		self.max_param_type_length = self.max_param_type_length.max(parameter.kind.len());
		self.max_param_name_length = self.max_param_name_length.max(parameter.name.len());
		self.parameters.push(parameter);
	}

	pub fn add_return(&mut self, value: ApiReturn) {
		self.max_return_value_length = self.max_return_value_length.max(value.value.len());
		self.returns.push(value);
	}
}

#[derive(Debug, Clone)]
pub struct ApiParameter {
	pub kind: OwnedName,
	pub name: OwnedName,
	pub brief: OwnedName,
}

#[derive(Debug, Clone)]
pub struct ApiReturn {
	pub value: OwnedName,
	pub brief: OwnedName,
}

#[derive(Debug, Clone)]
pub struct ApiType {
	pub name: OwnedName,
	pub description: OwnedName,
	pub fields: Vec<ApiTypeField>,
	pub max_type_length: usize,
	pub max_name_length: usize,
}

impl ApiType {
	pub fn new(name: OwnedName, description: OwnedName) -> Self {
		Self {
			name,
			description,
			fields: Vec::new(),
			max_type_length: MIN_COLUMN_WIDTH,
			max_name_length: MIN_COLUMN_WIDTH,
		}
	}

	pub fn add_field(&mut self, field: ApiTypeField) {
		self.max_type_length = self.max_type_length.max(field.kind.len());
		self.max_name_length = self.max_name_length.max(field.name.len());
		self.fields.push(field);
	}
}

#[derive(Debug, Clone)]
pub struct ApiTypeField {
	pub kind: OwnedName,
	pub name: OwnedName,
	pub brief: OwnedName,
}

#[derive(Debug, Clone)]
pub struct ApiConstants {
	pub name: OwnedName,
	pub description: OwnedName,
	pub constants: Vec<ApiConstant>,
	pub max_name_length: usize,
	pub max_value_length: usize,
}

impl ApiConstants {
	pub fn new(name: OwnedName, description: OwnedName) -> Self {
		Self {
			name,
			description,
			constants: Vec::new(),
			max_name_length: 0,
			max_value_length: 0,
		}
	}

	pub fn add_constant(&mut self, constant: ApiConstant) {
		self.max_name_length = self.max_name_length.max(constant.name.len());
		self.max_value_length = self.max_value_length.max(constant.value.len());
		self.constants.push(constant);
	}
}

#[derive(Debug, Clone)]
pub struct ApiConstant {
	pub kind: OwnedName,
	pub name: OwnedName,
	pub value: OwnedName,
	pub brief: OwnedName,
}

#[derive(Debug, Clone)]
pub struct Application {
	pub name: OwnedName,
	pub options: Vec<AppOption>,
	pub commands: Vec<AppCommand>,
	pub sections: Vec<Section>,
	pub synopses: Vec<Synopsis>,
	pub max_option_length: usize,
	pub max_command_length: usize,
}

impl Application {
	pub fn new(name: OwnedName) -> Self {
		Self {
			name,
			options: Vec::new(),
			commands: Vec::new(),
			sections: Vec::new(),
			synopses: Vec::new(),
			max_option_length: MIN_COLUMN_WIDTH,
			max_command_length: MIN_COLUMN_WIDTH,
		}
	}

	/// Add an option. Its id is its position in the option list.
	pub fn add_option(&mut self, flags: u16, name: OwnedName, value: OwnedName, description: OwnedName) {
		self.max_option_length = self.max_option_length.max(name.len());
		self.options.push(AppOption {
			id: self.options.len(),
			flags,
			name,
			value,
			description,
		});
	}

	pub fn add_command(&mut self, command: AppCommand) {
		self.max_command_length = self.max_command_length.max(command.name.len());
		self.commands.push(command);
	}

	/// Find or add the section called `name` and replace its data. Returns the
	/// section's index.
	pub fn set_section(&mut self, name: OwnedName, data: OwnedName) -> usize {
		set_section(&mut self.sections, name, data)
	}

	/// Add a synopsis. Indexes that do not name an option are skipped.
	pub fn add_synopsis(&mut self, name: OwnedName, indexes: &[u8]) {
		let options = indexes
			.iter()
			.map(|index| usize::from(*index))
			.filter(|index| {
				let known = *index < self.options.len();
				if !known {
					tracing::warn!(
						application = %self.name,
						synopsis = %name,
						index,
						"synopsis refers to an unknown option"
					);
				}
				known
			})
			.collect();

		self.synopses.push(Synopsis { name, options });
	}
}

#[derive(Debug, Clone)]
pub struct AppOption {
	pub id: usize,
	pub flags: u16,
	pub name: OwnedName,
	pub value: OwnedName,
	pub description: OwnedName,
}

#[derive(Debug, Clone)]
pub struct AppCommand {
	pub name: OwnedName,
	pub parameters: OwnedName,
	pub description: OwnedName,
}

#[derive(Debug, Clone)]
pub struct Section {
	pub name: OwnedName,
	pub data: OwnedName,
	pub sub_sections: Vec<Section>,
}

impl Section {
	pub fn set_sub_section(&mut self, name: OwnedName, data: OwnedName) -> usize {
		set_section(&mut self.sub_sections, name, data)
	}
}

fn set_section(sections: &mut Vec<Section>, name: OwnedName, data: OwnedName) -> usize {
	if let Some(index) = sections.iter().position(|section| section.name == name) {
		sections[index].data = data;
		return index;
	}

	sections.push(Section {
		name,
		data,
		sub_sections: Vec::new(),
	});
	sections.len() - 1
}

#[derive(Debug, Clone)]
pub struct Synopsis {
	pub name: OwnedName,
	/// Indexes into [`Application::options`].
	pub options: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Sample {
	pub name: OwnedName,
	pub payload: OwnedName,
}

/// The whole model graph.
///
/// The first group is the document root. It has an empty name until the
/// loader renames it.
#[derive(Debug, Clone)]
pub struct Model {
	groups: Vec<Group>,
	states: Vec<State>,
	timelines: Vec<Timeline>,
	nodes: Vec<Node>,
	messages: Vec<Message>,
}

impl Default for Model {
	fn default() -> Self {
		Self::new()
	}
}

impl Model {
	pub fn new() -> Self {
		Self {
			groups: vec![Group::default()],
			states: Vec::new(),
			timelines: Vec::new(),
			nodes: Vec::new(),
			messages: Vec::new(),
		}
	}

	pub const fn root() -> GroupId {
		GroupId(0)
	}

	pub fn groups(&self) -> impl Iterator<Item = (GroupId, &Group)> {
		self.groups
			.iter()
			.enumerate()
			.map(|(index, group)| (GroupId(index), group))
	}

	pub fn group_count(&self) -> usize {
		self.groups.len()
	}

	pub fn group(&self, id: GroupId) -> &Group {
		&self.groups[id.0]
	}

	pub fn group_mut(&mut self, id: GroupId) -> &mut Group {
		&mut self.groups[id.0]
	}

	/// Look a group up by name.
	///
	/// `"all"` selects the first group after the root and `"document"` the
	/// root itself. Any other name must match a group exactly.
	pub fn find_group(&self, name: &[u8]) -> Option<(GroupId, GroupKind)> {
		if name == ALL_GROUP_NAME {
			return (self.groups.len() > 1).then_some((GroupId(1), GroupKind::All));
		}

		if name == DOCUMENT_GROUP_NAME {
			return Some((Self::root(), GroupKind::Document));
		}

		self.groups
			.iter()
			.position(|group| group.name == *name)
			.map(|index| (GroupId(index), GroupKind::Normal))
	}

	/// Append a group without checking for an existing one. Use
	/// [`Self::find_or_add_group`] unless the name is known to be new.
	pub fn add_group(&mut self, name: &Name<'_>) -> GroupId {
		self.groups.push(Group {
			name: name.to_owned_name(),
			..Group::default()
		});
		GroupId(self.groups.len() - 1)
	}

	pub fn find_or_add_group(&mut self, name: &Name<'_>) -> GroupId {
		match self.find_group(name.as_bytes()) {
			Some((id, _)) => id,
			None => self.add_group(name),
		}
	}

	pub fn rename_group(&mut self, id: GroupId, name: OwnedName) {
		self.groups[id.0].name = name;
	}

	pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
		self.states
			.iter()
			.enumerate()
			.map(|(index, state)| (StateId(index), state))
	}

	pub fn state(&self, id: StateId) -> &State {
		&self.states[id.0]
	}

	pub fn state_mut(&mut self, id: StateId) -> &mut State {
		&mut self.states[id.0]
	}

	/// Add a state to the group's state machine, creating the machine when
	/// the group has none.
	pub fn add_state(&mut self, group: GroupId, name: &Name<'_>, tag_id: u16) -> StateId {
		let id = StateId(self.states.len());
		self.states.push(State {
			name: name.to_owned_name(),
			group,
			tag_id,
			transitions: Vec::new(),
		});
		self.groups[group.0]
			.state_machine
			.get_or_insert_with(StateMachine::default)
			.states
			.push(id);
		id
	}

	pub fn timelines(&self) -> impl Iterator<Item = (TimelineId, &Timeline)> {
		self.timelines
			.iter()
			.enumerate()
			.map(|(index, timeline)| (TimelineId(index), timeline))
	}

	pub fn timeline(&self, id: TimelineId) -> &Timeline {
		&self.timelines[id.0]
	}

	/// Add a timeline to the group's sequence diagram, creating the diagram
	/// when the group has none.
	pub fn add_timeline(&mut self, group: GroupId, name: &Name<'_>) -> TimelineId {
		let id = TimelineId(self.timelines.len());
		self.timelines.push(Timeline {
			name: name.to_owned_name(),
			group,
			nodes: Vec::new(),
		});
		self.groups[group.0]
			.sequence_diagram
			.get_or_insert_with(SequenceDiagram::default)
			.timelines
			.push(id);
		id
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn node(&self, id: NodeId) -> &Node {
		&self.nodes[id.0]
	}

	pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
		&mut self.nodes[id.0]
	}

	/// Append a node to the end of a timeline.
	pub fn add_node(&mut self, timeline: TimelineId, id: u16, flags: NodeFlags) -> NodeId {
		let node_id = NodeId(self.nodes.len());
		self.nodes.push(Node {
			id,
			flags,
			timeline,
			sent_message: None,
			received_message: None,
			condition: None,
			function_end: None,
			function_start: None,
			next: None,
		});

		let nodes = &mut self.timelines[timeline.0].nodes;
		if let Some(last) = nodes.last() {
			self.nodes[last.0].next = Some(node_id);
		}
		nodes.push(node_id);

		node_id
	}

	/// Nodes of every timeline in the group's sequence diagram, in timeline
	/// order.
	pub fn diagram_nodes(&self, group: GroupId) -> impl Iterator<Item = NodeId> + '_ {
		self.groups[group.0]
			.sequence_diagram
			.iter()
			.flat_map(|diagram| diagram.timelines.iter())
			.flat_map(|timeline| self.timelines[timeline.0].nodes.iter().copied())
	}

	pub fn message_count(&self) -> usize {
		self.messages.len()
	}

	pub fn message(&self, id: MessageId) -> &Message {
		&self.messages[id.0]
	}

	pub fn message_mut(&mut self, id: MessageId) -> &mut Message {
		&mut self.messages[id.0]
	}

	/// Attach a message sent by `sender`. The receiver stays unresolved until
	/// linking.
	pub fn add_message(
		&mut self,
		sender: NodeId,
		sender_id: u8,
		receiver_id: u8,
		target_timeline_name: &Name<'_>,
		name: &Name<'_>,
	) -> MessageId {
		let sending_timeline = self.nodes[sender.0].timeline;
		let group = self.timelines[sending_timeline.0].group;
		let id = MessageId(self.messages.len());

		self.messages.push(Message {
			name: name.to_owned_name(),
			sender,
			sender_id,
			sending_timeline,
			target_timeline_name: target_timeline_name.to_owned_name(),
			target_timeline: None,
			receiver: Link::Unresolved(u16::from(receiver_id)),
		});
		self.nodes[sender.0].sent_message = Some(id);

		let group = &mut self.groups[group.0];
		group.max_message_length = group.max_message_length.max(name.len());

		id
	}
}
