//! The tagged record format stored in the blocks of a linked model file.
//!
//! Every record starts with a one-byte tag followed by a tag specific layout.
//! All multi-byte numbers are big-endian. Records never span a block; the
//! producer pads the unused tail of a block with [`RecordTag::BlockEnd`].
//!
//! Decoding borrows from the block. The [`Name`]s inside a [`Record`] are
//! views into the block buffer and have to be copied with
//! [`Name::to_owned_name`] before the block is reused.

use std::fmt;
use std::fmt::Write as _;

use crate::DocgenError;
use crate::DocgenResult;
use crate::name::Name;

/// The size of every block in a linked model file.
pub const BLOCK_SIZE: usize = 16 * 1024;

/// Number of bytes shown in the hex dump attached to record errors.
pub const HEX_DUMP_LENGTH: usize = 16;

/// Option record bit: the option name is fixed text.
pub const OPTION_FIXED_NAME: u8 = 0x01;
/// Option record bit: the option value is fixed text.
pub const OPTION_FIXED_VALUE: u8 = 0x02;
/// Option record bit: the option description is fixed text.
pub const OPTION_FIXED_DESCRIPTION: u8 = 0x04;

macro_rules! record_tags {
	($($variant:ident = $value:literal => $label:literal,)+) => {
		/// The tag byte that starts every record.
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		#[repr(u8)]
		pub enum RecordTag {
			$($variant = $value,)+
		}

		impl RecordTag {
			/// Map a tag byte to a known tag.
			pub const fn from_byte(byte: u8) -> Option<Self> {
				match byte {
					$($value => Some(Self::$variant),)+
					_ => None,
				}
			}

			pub const fn as_byte(self) -> u8 {
				self as u8
			}

			/// The name used for the tag in diagnostics.
			pub const fn label(self) -> &'static str {
				match self {
					$(Self::$variant => $label,)+
				}
			}
		}
	};
}

record_tags! {
	Trigger = 0 => "TRIGGER",
	Triggers = 1 => "TRIGGERS",
	Condition = 2 => "CONDITION",
	End = 5 => "END",
	BlockEnd = 6 => "BLOCK_END",
	StateMachineStart = 8 => "STATE_MACHINE_START",
	State = 9 => "STATE",
	Transition = 10 => "TRANSITION",
	StateMachineEnd = 11 => "STATE_MACHINE_END",
	SequenceStart = 12 => "SEQUENCE_START",
	Timeline = 13 => "TIMELINE",
	NodeStart = 17 => "NODE_START",
	SentMessage = 18 => "SENT_MESSAGE",
	NodeEnd = 19 => "NODE_END",
	SequenceEnd = 20 => "SEQUENCE_END",
	ApiStart = 21 => "API_START",
	ApiFunction = 22 => "API_FUNCTION",
	ApiAction = 23 => "API_ACTION",
	ApiDescription = 24 => "API_DESCRIPTION",
	ApiParameter = 25 => "API_PARAMETER",
	ApiReturns = 26 => "API_RETURNS",
	ApiFunctionEnd = 27 => "API_FUNCTION_END",
	ApiTypeStart = 28 => "API_TYPE_START",
	ApiTypeField = 29 => "API_TYPE_FIELD",
	ApiTypeEnd = 30 => "API_TYPE_END",
	ApiConstantsStart = 31 => "API_CONSTANTS_START",
	ApiConstant = 32 => "API_CONSTANT",
	ApiConstantsEnd = 34 => "API_CONSTANTS_END",
	ApiEnd = 35 => "API_END",
	Sample = 36 => "SAMPLE",
	ApplicationStart = 37 => "APPLICATION_START",
	ApplicationSection = 38 => "APPLICATION_SECTION",
	ApplicationSubSection = 39 => "APPLICATION_SUB_SECTION",
	ApplicationOption = 40 => "APPLICATION_OPTION",
	ApplicationCommand = 41 => "APPLICATION_COMMAND",
	ApplicationSynopsis = 42 => "APPLICATION_SYNOPSIS",
	ApplicationEnd = 43 => "APPLICATION_END",
}

impl fmt::Display for RecordTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Two strings: a short one (up to 255 bytes) and a long one. The record's
/// fixed flag applies to the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFields<'a> {
	pub first: Name<'a>,
	pub second: Name<'a>,
}

/// A `type name brief` triple. The fixed flag applies to `brief`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeFields<'a> {
	pub kind: Name<'a>,
	pub name: Name<'a>,
	pub brief: Name<'a>,
}

/// A constant definition. The fixed flag applies to `brief`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantFields<'a> {
	pub kind: Name<'a>,
	pub name: Name<'a>,
	pub value: Name<'a>,
	pub brief: Name<'a>,
}

/// A command line option of an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionFields<'a> {
	pub flags: u16,
	pub name: Name<'a>,
	pub value: Name<'a>,
	pub description: Name<'a>,
}

/// One decoded record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<'a> {
	Trigger {
		group: Name<'a>,
		name: Name<'a>,
	},
	Triggers {
		group: Name<'a>,
		name: Name<'a>,
	},
	Condition(Name<'a>),
	End,
	BlockEnd,
	StateMachineStart(Name<'a>),
	State {
		id: u16,
		group: Name<'a>,
		name: Name<'a>,
	},
	Transition {
		target: u16,
	},
	StateMachineEnd,
	SequenceStart(Name<'a>),
	Timeline {
		group: Name<'a>,
		name: Name<'a>,
	},
	NodeStart {
		id: u16,
		flags: u32,
	},
	SentMessage {
		sender: u8,
		receiver: u8,
		timeline: Name<'a>,
		message: Name<'a>,
	},
	NodeEnd,
	SequenceEnd,
	ApiStart(Name<'a>),
	ApiFunction(TypeFields<'a>),
	ApiAction(Name<'a>),
	ApiDescription(Name<'a>),
	ApiParameter(TypeFields<'a>),
	ApiReturns(PairFields<'a>),
	ApiFunctionEnd,
	ApiTypeStart(PairFields<'a>),
	ApiTypeField(TypeFields<'a>),
	ApiTypeEnd,
	ApiConstantsStart(PairFields<'a>),
	ApiConstant(ConstantFields<'a>),
	ApiConstantsEnd,
	ApiEnd,
	Sample(PairFields<'a>),
	ApplicationStart(Name<'a>),
	ApplicationSection(PairFields<'a>),
	ApplicationSubSection(PairFields<'a>),
	ApplicationOption(OptionFields<'a>),
	ApplicationCommand(TypeFields<'a>),
	ApplicationSynopsis {
		name: Name<'a>,
		indexes: &'a [u8],
	},
	ApplicationEnd,
}

impl Record<'_> {
	pub fn tag(&self) -> RecordTag {
		match self {
			Self::Trigger { .. } => RecordTag::Trigger,
			Self::Triggers { .. } => RecordTag::Triggers,
			Self::Condition(_) => RecordTag::Condition,
			Self::End => RecordTag::End,
			Self::BlockEnd => RecordTag::BlockEnd,
			Self::StateMachineStart(_) => RecordTag::StateMachineStart,
			Self::State { .. } => RecordTag::State,
			Self::Transition { .. } => RecordTag::Transition,
			Self::StateMachineEnd => RecordTag::StateMachineEnd,
			Self::SequenceStart(_) => RecordTag::SequenceStart,
			Self::Timeline { .. } => RecordTag::Timeline,
			Self::NodeStart { .. } => RecordTag::NodeStart,
			Self::SentMessage { .. } => RecordTag::SentMessage,
			Self::NodeEnd => RecordTag::NodeEnd,
			Self::SequenceEnd => RecordTag::SequenceEnd,
			Self::ApiStart(_) => RecordTag::ApiStart,
			Self::ApiFunction(_) => RecordTag::ApiFunction,
			Self::ApiAction(_) => RecordTag::ApiAction,
			Self::ApiDescription(_) => RecordTag::ApiDescription,
			Self::ApiParameter(_) => RecordTag::ApiParameter,
			Self::ApiReturns(_) => RecordTag::ApiReturns,
			Self::ApiFunctionEnd => RecordTag::ApiFunctionEnd,
			Self::ApiTypeStart(_) => RecordTag::ApiTypeStart,
			Self::ApiTypeField(_) => RecordTag::ApiTypeField,
			Self::ApiTypeEnd => RecordTag::ApiTypeEnd,
			Self::ApiConstantsStart(_) => RecordTag::ApiConstantsStart,
			Self::ApiConstant(_) => RecordTag::ApiConstant,
			Self::ApiConstantsEnd => RecordTag::ApiConstantsEnd,
			Self::ApiEnd => RecordTag::ApiEnd,
			Self::Sample(_) => RecordTag::Sample,
			Self::ApplicationStart(_) => RecordTag::ApplicationStart,
			Self::ApplicationSection(_) => RecordTag::ApplicationSection,
			Self::ApplicationSubSection(_) => RecordTag::ApplicationSubSection,
			Self::ApplicationOption(_) => RecordTag::ApplicationOption,
			Self::ApplicationCommand(_) => RecordTag::ApplicationCommand,
			Self::ApplicationSynopsis { .. } => RecordTag::ApplicationSynopsis,
			Self::ApplicationEnd => RecordTag::ApplicationEnd,
		}
	}

	/// Append the encoded record to `out`. Fails when a string is longer than
	/// its length field can describe.
	pub fn encode(&self, out: &mut Vec<u8>) -> DocgenResult<()> {
		out.push(self.tag().as_byte());

		match self {
			Self::Trigger { group, name }
			| Self::Triggers { group, name }
			| Self::Timeline { group, name } => {
				put_short("group", group, out)?;
				put_short("name", name, out)?;
			}
			Self::Condition(text)
			| Self::StateMachineStart(text)
			| Self::SequenceStart(text)
			| Self::ApiStart(text)
			| Self::ApiAction(text)
			| Self::ApiDescription(text)
			| Self::ApplicationStart(text) => {
				out.push(u8::from(text.is_fixed()));
				put_long_len("string", text, out)?;
				out.extend_from_slice(text.as_bytes());
			}
			Self::State { id, group, name } => {
				out.extend_from_slice(&id.to_be_bytes());
				put_short("group", group, out)?;
				put_short("name", name, out)?;
			}
			Self::Transition { target } => out.extend_from_slice(&target.to_be_bytes()),
			Self::NodeStart { id, flags } => {
				out.extend_from_slice(&id.to_be_bytes());
				out.extend_from_slice(&flags.to_be_bytes());
			}
			Self::SentMessage {
				sender,
				receiver,
				timeline,
				message,
			} => {
				out.push(*sender);
				out.push(*receiver);
				put_short("timeline", timeline, out)?;
				put_short("message", message, out)?;
			}
			Self::ApiReturns(pair)
			| Self::ApiTypeStart(pair)
			| Self::ApiConstantsStart(pair)
			| Self::Sample(pair)
			| Self::ApplicationSection(pair)
			| Self::ApplicationSubSection(pair) => {
				out.push(u8::from(pair.second.is_fixed()));
				put_short_len("first", &pair.first, out)?;
				put_long_len("second", &pair.second, out)?;
				out.extend_from_slice(pair.first.as_bytes());
				out.extend_from_slice(pair.second.as_bytes());
			}
			Self::ApiFunction(fields)
			| Self::ApiParameter(fields)
			| Self::ApiTypeField(fields)
			| Self::ApplicationCommand(fields) => {
				out.push(u8::from(fields.brief.is_fixed()));
				put_short_len("type", &fields.kind, out)?;
				put_short_len("name", &fields.name, out)?;
				put_long_len("brief", &fields.brief, out)?;
				out.extend_from_slice(fields.kind.as_bytes());
				out.extend_from_slice(fields.name.as_bytes());
				out.extend_from_slice(fields.brief.as_bytes());
			}
			Self::ApiConstant(fields) => {
				out.push(u8::from(fields.brief.is_fixed()));
				put_short_len("type", &fields.kind, out)?;
				put_short_len("name", &fields.name, out)?;
				put_long_len("value", &fields.value, out)?;
				put_long_len("brief", &fields.brief, out)?;
				out.extend_from_slice(fields.kind.as_bytes());
				out.extend_from_slice(fields.name.as_bytes());
				out.extend_from_slice(fields.value.as_bytes());
				out.extend_from_slice(fields.brief.as_bytes());
			}
			Self::ApplicationOption(fields) => {
				let mut fixed_bits = 0;
				if fields.name.is_fixed() {
					fixed_bits |= OPTION_FIXED_NAME;
				}
				if fields.value.is_fixed() {
					fixed_bits |= OPTION_FIXED_VALUE;
				}
				if fields.description.is_fixed() {
					fixed_bits |= OPTION_FIXED_DESCRIPTION;
				}

				out.extend_from_slice(&fields.flags.to_be_bytes());
				out.push(fixed_bits);
				put_long_len("name", &fields.name, out)?;
				put_long_len("value", &fields.value, out)?;
				put_long_len("description", &fields.description, out)?;
				out.extend_from_slice(fields.name.as_bytes());
				out.extend_from_slice(fields.value.as_bytes());
				out.extend_from_slice(fields.description.as_bytes());
			}
			Self::ApplicationSynopsis { name, indexes } => {
				put_long_len("name", name, out)?;
				put_long_len("indexes", &Name::borrowed(indexes), out)?;
				out.extend_from_slice(name.as_bytes());
				out.extend_from_slice(indexes);
			}
			Self::End
			| Self::BlockEnd
			| Self::StateMachineEnd
			| Self::NodeEnd
			| Self::SequenceEnd
			| Self::ApiFunctionEnd
			| Self::ApiTypeEnd
			| Self::ApiConstantsEnd
			| Self::ApiEnd
			| Self::ApplicationEnd => {}
		}

		Ok(())
	}
}

fn put_short_len(field: &'static str, name: &Name<'_>, out: &mut Vec<u8>) -> DocgenResult<()> {
	let len = u8::try_from(name.len()).map_err(|_| {
		DocgenError::FieldTooLong {
			field,
			len: name.len(),
			limit: usize::from(u8::MAX),
		}
	})?;
	out.push(len);
	Ok(())
}

fn put_long_len(field: &'static str, name: &Name<'_>, out: &mut Vec<u8>) -> DocgenResult<()> {
	let len = u16::try_from(name.len()).map_err(|_| {
		DocgenError::FieldTooLong {
			field,
			len: name.len(),
			limit: usize::from(u16::MAX),
		}
	})?;
	out.extend_from_slice(&len.to_be_bytes());
	Ok(())
}

/// A one-byte length followed by the bytes.
fn put_short(field: &'static str, name: &Name<'_>, out: &mut Vec<u8>) -> DocgenResult<()> {
	put_short_len(field, name, out)?;
	out.extend_from_slice(name.as_bytes());
	Ok(())
}

/// Bounds checked reads from a block. Every read returns `None` once the
/// block is exhausted.
struct BlockCursor<'a> {
	block: &'a [u8],
	position: usize,
}

impl<'a> BlockCursor<'a> {
	fn u8(&mut self) -> Option<u8> {
		let byte = *self.block.get(self.position)?;
		self.position += 1;
		Some(byte)
	}

	fn u16(&mut self) -> Option<u16> {
		let bytes = self.bytes(2)?;
		Some(u16::from_be_bytes([bytes[0], bytes[1]]))
	}

	fn u32(&mut self) -> Option<u32> {
		let bytes = self.bytes(4)?;
		Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
	}

	fn bytes(&mut self, len: usize) -> Option<&'a [u8]> {
		let end = self.position.checked_add(len)?;
		let bytes = self.block.get(self.position..end)?;
		self.position = end;
		Some(bytes)
	}

	fn name(&mut self, len: usize) -> Option<Name<'a>> {
		self.bytes(len).map(Name::borrowed)
	}

	fn fixed_name(&mut self, len: usize, fixed: bool) -> Option<Name<'a>> {
		self.bytes(len).map(|bytes| Name::borrowed_fixed(bytes, fixed))
	}

	/// `fixed:u8, len:u16, bytes`
	fn string(&mut self) -> Option<Name<'a>> {
		let fixed = self.u8()? != 0;
		let len = usize::from(self.u16()?);
		self.fixed_name(len, fixed)
	}

	/// `len:u8, group, len:u8, name`
	fn group_name(&mut self) -> Option<(Name<'a>, Name<'a>)> {
		let group_len = usize::from(self.u8()?);
		let group = self.name(group_len)?;
		let name_len = usize::from(self.u8()?);
		let name = self.name(name_len)?;
		Some((group, name))
	}

	/// `fixed:u8, len1:u8, len2:u16, first, second`
	fn pair(&mut self) -> Option<PairFields<'a>> {
		let fixed = self.u8()? != 0;
		let first_len = usize::from(self.u8()?);
		let second_len = usize::from(self.u16()?);
		let first = self.name(first_len)?;
		let second = self.fixed_name(second_len, fixed)?;
		Some(PairFields { first, second })
	}

	/// `fixed:u8, tlen:u8, nlen:u8, blen:u16, type, name, brief`
	fn type_fields(&mut self) -> Option<TypeFields<'a>> {
		let fixed = self.u8()? != 0;
		let kind_len = usize::from(self.u8()?);
		let name_len = usize::from(self.u8()?);
		let brief_len = usize::from(self.u16()?);
		Some(TypeFields {
			kind: self.name(kind_len)?,
			name: self.name(name_len)?,
			brief: self.fixed_name(brief_len, fixed)?,
		})
	}

	/// `fixed:u8, tlen:u8, nlen:u8, vlen:u16, blen:u16, type, name, value, brief`
	fn constant_fields(&mut self) -> Option<ConstantFields<'a>> {
		let fixed = self.u8()? != 0;
		let kind_len = usize::from(self.u8()?);
		let name_len = usize::from(self.u8()?);
		let value_len = usize::from(self.u16()?);
		let brief_len = usize::from(self.u16()?);
		Some(ConstantFields {
			kind: self.name(kind_len)?,
			name: self.name(name_len)?,
			value: self.name(value_len)?,
			brief: self.fixed_name(brief_len, fixed)?,
		})
	}

	/// `flags:u16, fixed_bits:u8, nlen:u16, vlen:u16, dlen:u16, name, value,
	/// description`
	fn option_fields(&mut self) -> Option<OptionFields<'a>> {
		let flags = self.u16()?;
		let fixed_bits = self.u8()?;
		let name_len = usize::from(self.u16()?);
		let value_len = usize::from(self.u16()?);
		let description_len = usize::from(self.u16()?);
		Some(OptionFields {
			flags,
			name: self.fixed_name(name_len, fixed_bits & OPTION_FIXED_NAME != 0)?,
			value: self.fixed_name(value_len, fixed_bits & OPTION_FIXED_VALUE != 0)?,
			description: self.fixed_name(
				description_len,
				fixed_bits & OPTION_FIXED_DESCRIPTION != 0,
			)?,
		})
	}
}

/// Decode the record starting at `offset` in `block`.
///
/// Returns the record and the offset of the next record. A
/// [`Record::BlockEnd`] moves the offset to the end of the block. `block_index`
/// is only used to locate errors.
pub fn decode_record(
	block: &[u8],
	block_index: usize,
	offset: usize,
) -> DocgenResult<(Record<'_>, usize)> {
	let Some(&byte) = block.get(offset) else {
		return Err(DocgenError::MalformedRecord {
			tag: 0,
			block: block_index,
			offset,
			dump: String::new(),
		});
	};

	let Some(tag) = RecordTag::from_byte(byte) else {
		return Err(DocgenError::UnknownRecord {
			tag: byte,
			block: block_index,
			offset,
			dump: hex_dump(&block[offset..]),
		});
	};

	let mut cursor = BlockCursor {
		block,
		position: offset + 1,
	};

	let Some(record) = decode_body(tag, &mut cursor) else {
		return Err(DocgenError::MalformedRecord {
			tag: byte,
			block: block_index,
			offset,
			dump: hex_dump(&block[offset..]),
		});
	};

	let next = if matches!(record, Record::BlockEnd) {
		block.len()
	} else {
		cursor.position
	};

	Ok((record, next))
}

fn decode_body<'a>(tag: RecordTag, cursor: &mut BlockCursor<'a>) -> Option<Record<'a>> {
	let record = match tag {
		RecordTag::Trigger => {
			let (group, name) = cursor.group_name()?;
			Record::Trigger { group, name }
		}
		RecordTag::Triggers => {
			let (group, name) = cursor.group_name()?;
			Record::Triggers { group, name }
		}
		RecordTag::Condition => Record::Condition(cursor.string()?),
		RecordTag::End => Record::End,
		RecordTag::BlockEnd => Record::BlockEnd,
		RecordTag::StateMachineStart => Record::StateMachineStart(cursor.string()?),
		RecordTag::State => {
			let id = cursor.u16()?;
			let (group, name) = cursor.group_name()?;
			Record::State { id, group, name }
		}
		RecordTag::Transition => {
			Record::Transition {
				target: cursor.u16()?,
			}
		}
		RecordTag::StateMachineEnd => Record::StateMachineEnd,
		RecordTag::SequenceStart => Record::SequenceStart(cursor.string()?),
		RecordTag::Timeline => {
			let (group, name) = cursor.group_name()?;
			Record::Timeline { group, name }
		}
		RecordTag::NodeStart => {
			let id = cursor.u16()?;
			let flags = cursor.u32()?;
			Record::NodeStart { id, flags }
		}
		RecordTag::SentMessage => {
			let sender = cursor.u8()?;
			let receiver = cursor.u8()?;
			let timeline_len = usize::from(cursor.u8()?);
			let timeline = cursor.name(timeline_len)?;
			let message_len = usize::from(cursor.u8()?);
			let message = cursor.name(message_len)?;
			Record::SentMessage {
				sender,
				receiver,
				timeline,
				message,
			}
		}
		RecordTag::NodeEnd => Record::NodeEnd,
		RecordTag::SequenceEnd => Record::SequenceEnd,
		RecordTag::ApiStart => Record::ApiStart(cursor.string()?),
		RecordTag::ApiFunction => Record::ApiFunction(cursor.type_fields()?),
		RecordTag::ApiAction => Record::ApiAction(cursor.string()?),
		RecordTag::ApiDescription => Record::ApiDescription(cursor.string()?),
		RecordTag::ApiParameter => Record::ApiParameter(cursor.type_fields()?),
		RecordTag::ApiReturns => Record::ApiReturns(cursor.pair()?),
		RecordTag::ApiFunctionEnd => Record::ApiFunctionEnd,
		RecordTag::ApiTypeStart => Record::ApiTypeStart(cursor.pair()?),
		RecordTag::ApiTypeField => Record::ApiTypeField(cursor.type_fields()?),
		RecordTag::ApiTypeEnd => Record::ApiTypeEnd,
		RecordTag::ApiConstantsStart => Record::ApiConstantsStart(cursor.pair()?),
		RecordTag::ApiConstant => Record::ApiConstant(cursor.constant_fields()?),
		RecordTag::ApiConstantsEnd => Record::ApiConstantsEnd,
		RecordTag::ApiEnd => Record::ApiEnd,
		RecordTag::Sample => Record::Sample(cursor.pair()?),
		RecordTag::ApplicationStart => Record::ApplicationStart(cursor.string()?),
		RecordTag::ApplicationSection => Record::ApplicationSection(cursor.pair()?),
		RecordTag::ApplicationSubSection => Record::ApplicationSubSection(cursor.pair()?),
		RecordTag::ApplicationOption => Record::ApplicationOption(cursor.option_fields()?),
		RecordTag::ApplicationCommand => Record::ApplicationCommand(cursor.type_fields()?),
		RecordTag::ApplicationSynopsis => {
			let name_len = usize::from(cursor.u16()?);
			let index_len = usize::from(cursor.u16()?);
			let name = cursor.name(name_len)?;
			let indexes = cursor.bytes(index_len)?;
			Record::ApplicationSynopsis { name, indexes }
		}
		RecordTag::ApplicationEnd => Record::ApplicationEnd,
	};

	Some(record)
}

/// Format up to [`HEX_DUMP_LENGTH`] bytes as hex followed by their printable
/// characters.
pub fn hex_dump(bytes: &[u8]) -> String {
	let bytes = &bytes[..bytes.len().min(HEX_DUMP_LENGTH)];
	let mut dump = String::with_capacity(HEX_DUMP_LENGTH * 4 + 2);

	for byte in bytes {
		let _ = write!(dump, "{byte:02x} ");
	}

	for _ in bytes.len()..HEX_DUMP_LENGTH {
		dump.push_str("   ");
	}

	dump.push('|');
	dump.extend(bytes.iter().map(|byte| {
		if byte.is_ascii_graphic() || *byte == b' ' {
			char::from(*byte)
		} else {
			'.'
		}
	}));
	dump.push('|');
	dump
}
