use std::fmt;

use crate::DocgenError;
use crate::DocgenResult;
use crate::model::ApiConstant;
use crate::model::ApiConstants;
use crate::model::ApiFunction;
use crate::model::ApiParameter;
use crate::model::ApiReturn;
use crate::model::ApiType;
use crate::model::ApiTypeField;
use crate::model::AppCommand;
use crate::model::Application;
use crate::model::GroupId;
use crate::model::Model;
use crate::model::NodeFlags;
use crate::model::NodeId;
use crate::model::Sample;
use crate::model::StateId;
use crate::model::TimelineId;
use crate::model::Transition;
use crate::model::Trigger;
use crate::record::Record;
use crate::record::decode_record;
use crate::record::hex_dump;
use crate::resolver::LinkLimits;

/// The section of the model file that is currently open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadMode {
	#[default]
	Unknown,
	StateMachine,
	Sequence,
	Api,
	Application,
}

impl fmt::Display for LoadMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Unknown => "top level",
			Self::StateMachine => "state machine",
			Self::Sequence => "sequence diagram",
			Self::Api => "api",
			Self::Application => "application",
		};
		f.write_str(label)
	}
}

/// Why a record was refused. Turned into a located [`DocgenError`] by
/// [`ModelBuilder::add_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejected {
	Unexpected,
	MissingContext {
		record: &'static str,
		parent: &'static str,
	},
}

type Applied = Result<(), Rejected>;

fn missing(record: &'static str, parent: &'static str) -> Rejected {
	Rejected::MissingContext { record, parent }
}

/// Builds a [`Model`] from decoded records.
///
/// The builder keeps the open section and the most recently created item of
/// each kind; records that extend an item attach to those. References between
/// records are stored unresolved and the largest state and node ids are
/// tracked for the linking pass.
#[derive(Debug)]
pub struct ModelBuilder {
	model: Model,
	mode: LoadMode,
	group: GroupId,
	state: Option<StateId>,
	transition: Option<usize>,
	timeline: Option<TimelineId>,
	node: Option<NodeId>,
	function: Option<usize>,
	api_type: Option<usize>,
	constants: Option<usize>,
	application: Option<usize>,
	section: Option<usize>,
	limits: LinkLimits,
	records: usize,
}

impl Default for ModelBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ModelBuilder {
	pub fn new() -> Self {
		Self {
			model: Model::new(),
			mode: LoadMode::Unknown,
			group: Model::root(),
			state: None,
			transition: None,
			timeline: None,
			node: None,
			function: None,
			api_type: None,
			constants: None,
			application: None,
			section: None,
			limits: LinkLimits::default(),
			records: 0,
		}
	}

	pub fn mode(&self) -> LoadMode {
		self.mode
	}

	pub fn limits(&self) -> LinkLimits {
		self.limits
	}

	pub fn model(&self) -> &Model {
		&self.model
	}

	/// Number of records applied so far, excluding block padding.
	pub fn record_count(&self) -> usize {
		self.records
	}

	/// Decode and apply every record in `block` up to its end marker.
	pub fn add_block(&mut self, block: &[u8], block_index: usize) -> DocgenResult<()> {
		let mut offset = 0;

		while offset < block.len() {
			let (record, next) = decode_record(block, block_index, offset).inspect_err(|error| {
				tracing::error!(%error, "failed to decode record");
			})?;

			if let Err(rejected) = self.apply(&record) {
				let dump = hex_dump(&block[offset..]);
				let tag = record.tag();
				tracing::error!(
					mode = %self.mode,
					record = %tag,
					block = block_index,
					offset,
					%dump,
					"record rejected"
				);

				return Err(match rejected {
					Rejected::Unexpected => {
						DocgenError::UnexpectedRecord {
							mode: self.mode.to_string(),
							tag: tag.as_byte(),
							block: block_index,
							offset,
							dump,
						}
					}
					Rejected::MissingContext { record, parent } => {
						DocgenError::MissingContext {
							record,
							parent,
							block: block_index,
							offset,
						}
					}
				});
			}

			offset = next;
		}

		Ok(())
	}

	/// Apply one record to the model.
	fn apply(&mut self, record: &Record<'_>) -> Applied {
		if matches!(record, Record::BlockEnd) {
			return Ok(());
		}

		self.records += 1;

		match self.mode {
			LoadMode::Unknown => self.apply_top_level(record),
			LoadMode::StateMachine => self.apply_state_machine(record),
			LoadMode::Sequence => self.apply_sequence(record),
			LoadMode::Api => self.apply_api(record),
			LoadMode::Application => self.apply_application(record),
		}
	}

	fn enter(&mut self, mode: LoadMode) {
		tracing::debug!(%mode, group = %self.model.group(self.group).name, "entering section");
		self.mode = mode;
	}

	fn leave(&mut self) {
		tracing::debug!(mode = %self.mode, "leaving section");
		self.mode = LoadMode::Unknown;
	}

	fn apply_top_level(&mut self, record: &Record<'_>) -> Applied {
		match record {
			Record::StateMachineStart(name) => {
				self.group = self.model.find_or_add_group(name);
				self.state = None;
				self.transition = None;
				self.enter(LoadMode::StateMachine);
			}
			Record::SequenceStart(name) => {
				self.group = self.model.find_or_add_group(name);
				self.timeline = None;
				self.node = None;
				self.enter(LoadMode::Sequence);
			}
			Record::ApiStart(name) => {
				self.group = self.model.find_or_add_group(name);
				self.function = None;
				self.api_type = None;
				self.constants = None;
				self.enter(LoadMode::Api);
			}
			Record::ApplicationStart(name) => {
				let applications = &mut self.model.group_mut(Model::root()).applications;
				let index = match applications.iter().position(|app| app.name == *name) {
					Some(index) => index,
					None => {
						applications.push(Application::new(name.to_owned_name()));
						applications.len() - 1
					}
				};

				self.group = Model::root();
				self.application = Some(index);
				self.section = None;
				self.enter(LoadMode::Application);
			}
			Record::Sample(pair) => {
				self.model.group_mut(Model::root()).samples.push(Sample {
					name: pair.first.to_owned_name(),
					payload: pair.second.to_owned_name(),
				});
			}
			_ => return Err(Rejected::Unexpected),
		}

		Ok(())
	}

	fn current_transition(&mut self, record: &'static str) -> Result<&mut Transition, Rejected> {
		let state = self.state.ok_or(missing(record, "transition"))?;
		let index = self.transition.ok_or(missing(record, "transition"))?;

		self.model
			.state_mut(state)
			.transitions
			.get_mut(index)
			.ok_or(missing(record, "transition"))
	}

	fn apply_state_machine(&mut self, record: &Record<'_>) -> Applied {
		match record {
			Record::State { id, group, name } => {
				self.group = self.model.find_or_add_group(group);
				self.state = Some(self.model.add_state(self.group, name, *id));
				self.transition = None;
				self.limits.max_state = self.limits.max_state.max(*id);
			}
			Record::Transition { target } => {
				let state = self.state.ok_or(missing("TRANSITION", "state"))?;
				let transitions = &mut self.model.state_mut(state).transitions;
				transitions.push(Transition::new(*target));
				self.transition = Some(transitions.len() - 1);
			}
			Record::Trigger { group, name } => {
				let group = self.model.find_or_add_group(group);
				let trigger = Trigger {
					group,
					name: name.to_owned_name(),
				};
				self.current_transition("TRIGGER")?.trigger = Some(trigger);
			}
			Record::Triggers { group, name } => {
				let group = self.model.find_or_add_group(group);
				let trigger = Trigger {
					group,
					name: name.to_owned_name(),
				};
				self.current_transition("TRIGGERS")?.triggers.push(trigger);
			}
			Record::Condition(text) => {
				self.current_transition("CONDITION")?.condition = Some(text.to_owned_name());
			}
			Record::End => {
				self.state = None;
				self.transition = None;
			}
			Record::StateMachineEnd => {
				self.state = None;
				self.transition = None;
				self.leave();
			}
			_ => return Err(Rejected::Unexpected),
		}

		Ok(())
	}

	fn apply_sequence(&mut self, record: &Record<'_>) -> Applied {
		match record {
			Record::Timeline { group, name } => {
				self.group = self.model.find_or_add_group(group);
				self.timeline = Some(self.model.add_timeline(self.group, name));
				self.node = None;
			}
			Record::NodeStart { id, flags } => {
				let timeline = self.timeline.ok_or(missing("NODE_START", "timeline"))?;
				let node = self
					.model
					.add_node(timeline, *id, NodeFlags::from_bits_retain(*flags));
				self.node = Some(node);
				self.limits.max_node = self.limits.max_node.max(*id);
			}
			Record::SentMessage {
				sender,
				receiver,
				timeline,
				message,
			} => {
				let node = self.node.ok_or(missing("SENT_MESSAGE", "node"))?;
				self.model
					.add_message(node, *sender, *receiver, timeline, message);
			}
			Record::Condition(text) => {
				let node = self.node.ok_or(missing("CONDITION", "node"))?;
				self.model.node_mut(node).condition = Some(text.to_owned_name());
			}
			Record::NodeEnd => self.node = None,
			Record::SequenceEnd => {
				self.timeline = None;
				self.node = None;
				self.leave();
			}
			_ => return Err(Rejected::Unexpected),
		}

		Ok(())
	}

	fn current_function(&mut self, record: &'static str) -> Result<&mut ApiFunction, Rejected> {
		let index = self.function.ok_or(missing(record, "function"))?;

		self.model
			.group_mut(self.group)
			.api
			.as_mut()
			.and_then(|api| api.functions.get_mut(index))
			.ok_or(missing(record, "function"))
	}

	fn apply_api(&mut self, record: &Record<'_>) -> Applied {
		match record {
			Record::ApiFunction(fields) => {
				let api = self.model.group_mut(self.group).api.get_or_insert_default();
				api.functions.push(ApiFunction::new(
					fields.kind.to_owned_name(),
					fields.name.to_owned_name(),
				));
				self.function = Some(api.functions.len() - 1);
			}
			Record::ApiAction(text) => {
				self.current_function("API_ACTION")?.action = Some(text.to_owned_name());
			}
			Record::ApiDescription(text) => {
				self.current_function("API_DESCRIPTION")?.description = Some(text.to_owned_name());
			}
			Record::ApiParameter(fields) => {
				self.current_function("API_PARAMETER")?
					.add_parameter(ApiParameter {
						kind: fields.kind.to_owned_name(),
						name: fields.name.to_owned_name(),
						brief: fields.brief.to_owned_name(),
					});
			}
			Record::ApiReturns(pair) => {
				self.current_function("API_RETURNS")?.add_return(ApiReturn {
					value: pair.first.to_owned_name(),
					brief: pair.second.to_owned_name(),
				});
			}
			Record::ApiFunctionEnd => self.function = None,
			Record::ApiTypeStart(pair) => {
				let api = self.model.group_mut(self.group).api.get_or_insert_default();
				api.types.push(ApiType::new(
					pair.first.to_owned_name(),
					pair.second.to_owned_name(),
				));
				self.api_type = Some(api.types.len() - 1);
			}
			Record::ApiTypeField(fields) => {
				let index = self.api_type.ok_or(missing("API_TYPE_FIELD", "type"))?;
				let api_type = self
					.model
					.group_mut(self.group)
					.api
					.as_mut()
					.and_then(|api| api.types.get_mut(index))
					.ok_or(missing("API_TYPE_FIELD", "type"))?;

				api_type.add_field(ApiTypeField {
					kind: fields.kind.to_owned_name(),
					name: fields.name.to_owned_name(),
					brief: fields.brief.to_owned_name(),
				});
			}
			Record::ApiTypeEnd => self.api_type = None,
			Record::ApiConstantsStart(pair) => {
				let api = self.model.group_mut(self.group).api.get_or_insert_default();
				api.constants.push(ApiConstants::new(
					pair.first.to_owned_name(),
					pair.second.to_owned_name(),
				));
				self.constants = Some(api.constants.len() - 1);
			}
			Record::ApiConstant(fields) => {
				let index = self.constants.ok_or(missing("API_CONSTANT", "constants group"))?;
				let constants = self
					.model
					.group_mut(self.group)
					.api
					.as_mut()
					.and_then(|api| api.constants.get_mut(index))
					.ok_or(missing("API_CONSTANT", "constants group"))?;

				constants.add_constant(ApiConstant {
					kind: fields.kind.to_owned_name(),
					name: fields.name.to_owned_name(),
					value: fields.value.to_owned_name(),
					brief: fields.brief.to_owned_name(),
				});
			}
			Record::ApiConstantsEnd => self.constants = None,
			Record::End => {}
			Record::ApiEnd => {
				self.function = None;
				self.api_type = None;
				self.constants = None;
				self.leave();
			}
			_ => return Err(Rejected::Unexpected),
		}

		Ok(())
	}

	fn current_application(&mut self, record: &'static str) -> Result<&mut Application, Rejected> {
		let index = self.application.ok_or(missing(record, "application"))?;

		self.model
			.group_mut(Model::root())
			.applications
			.get_mut(index)
			.ok_or(missing(record, "application"))
	}

	fn apply_application(&mut self, record: &Record<'_>) -> Applied {
		match record {
			Record::ApplicationSection(pair) => {
				let section = self
					.current_application("APPLICATION_SECTION")?
					.set_section(pair.first.to_owned_name(), pair.second.to_owned_name());
				self.section = Some(section);
			}
			Record::ApplicationSubSection(pair) => {
				let index = self
					.section
					.ok_or(missing("APPLICATION_SUB_SECTION", "section"))?;
				let section = self
					.current_application("APPLICATION_SUB_SECTION")?
					.sections
					.get_mut(index)
					.ok_or(missing("APPLICATION_SUB_SECTION", "section"))?;

				section.set_sub_section(pair.first.to_owned_name(), pair.second.to_owned_name());
			}
			Record::ApplicationOption(fields) => {
				self.current_application("APPLICATION_OPTION")?.add_option(
					fields.flags,
					fields.name.to_owned_name(),
					fields.value.to_owned_name(),
					fields.description.to_owned_name(),
				);
			}
			Record::ApplicationCommand(fields) => {
				self.current_application("APPLICATION_COMMAND")?
					.add_command(AppCommand {
						name: fields.kind.to_owned_name(),
						parameters: fields.name.to_owned_name(),
						description: fields.brief.to_owned_name(),
					});
			}
			Record::ApplicationSynopsis { name, indexes } => {
				self.current_application("APPLICATION_SYNOPSIS")?
					.add_synopsis(name.to_owned_name(), indexes);
			}
			Record::ApplicationEnd => {
				self.application = None;
				self.section = None;
				self.leave();
			}
			_ => return Err(Rejected::Unexpected),
		}

		Ok(())
	}

	/// Finish building and hand over the model with the limits the linking
	/// pass needs.
	pub fn finish(self) -> (Model, LinkLimits) {
		if self.mode != LoadMode::Unknown {
			tracing::warn!(mode = %self.mode, "model file ended inside an open section");
		}

		(self.model, self.limits)
	}
}
