//! Append-only lookup tables keyed by the hash of a byte-string name.
//!
//! Items live in a chain of fixed-size blocks so that an index handed out
//! once stays valid for the life of the table: index `i` is slot
//! `i % LOOKUP_BLOCK_SIZE` of block `i / LOOKUP_BLOCK_SIZE`.

use std::collections::BTreeMap;

use crate::name::Name;
use crate::name::OwnedName;

/// Number of items held by each block of a [`LookupTable`].
pub const LOOKUP_BLOCK_SIZE: usize = 100;

/// The 32-bit FNV hash used for every lookup key.
pub fn fnv_32_hash(bytes: &[u8]) -> u32 {
	bytes.iter().fold(0x811c_9dc5_u32, |hash, byte| {
		hash.wrapping_mul(0x0100_0193) ^ u32::from(*byte)
	})
}

/// One entry of a [`LookupTable`].
#[derive(Debug, Clone)]
pub struct LookupItem<T> {
	pub hash: u32,
	pub name: OwnedName,
	pub payload: Option<T>,
	pub line_number: u16,
	pub group_id: u16,
}

impl<T> LookupItem<T> {
	fn new(name: &[u8], payload: Option<T>, line_number: u16) -> Self {
		Self {
			hash: fnv_32_hash(name),
			name: Name::owned(name),
			payload,
			line_number,
			group_id: 0,
		}
	}
}

/// A hash-bucketed, append-only table.
///
/// Keys are compared by hash only, so two names with colliding hashes share
/// an entry. Entries are never removed.
#[derive(Debug, Clone)]
pub struct LookupTable<T> {
	blocks: Vec<Vec<LookupItem<T>>>,
}

impl<T> Default for LookupTable<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> LookupTable<T> {
	pub fn new() -> Self {
		Self {
			blocks: vec![Vec::with_capacity(LOOKUP_BLOCK_SIZE)],
		}
	}

	pub fn len(&self) -> usize {
		self.blocks.iter().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of blocks in the chain.
	pub fn block_count(&self) -> usize {
		self.blocks.len()
	}

	/// Returns the index of the item whose hash matches `name`.
	pub fn position(&self, name: &[u8]) -> Option<usize> {
		let hash = fnv_32_hash(name);

		self.blocks.iter().enumerate().find_map(|(block_index, block)| {
			block
				.iter()
				.position(|item| item.hash == hash)
				.map(|slot| block_index * LOOKUP_BLOCK_SIZE + slot)
		})
	}

	pub fn find(&self, name: &[u8]) -> Option<&LookupItem<T>> {
		self.position(name).and_then(|index| self.get(index))
	}

	pub fn get(&self, index: usize) -> Option<&LookupItem<T>> {
		self.blocks
			.get(index / LOOKUP_BLOCK_SIZE)
			.and_then(|block| block.get(index % LOOKUP_BLOCK_SIZE))
	}

	fn get_mut(&mut self, index: usize) -> Option<&mut LookupItem<T>> {
		self.blocks
			.get_mut(index / LOOKUP_BLOCK_SIZE)
			.and_then(|block| block.get_mut(index % LOOKUP_BLOCK_SIZE))
	}

	/// Add `name` with `payload` unless an item with the same hash exists.
	/// Either way the index of the item is returned; an existing payload is
	/// left untouched.
	pub fn add(&mut self, name: &[u8], payload: T, line_number: u16) -> usize {
		if let Some(index) = self.position(name) {
			return index;
		}

		self.push(LookupItem::new(name, Some(payload), line_number))
	}

	/// Find `name`, adding an item without a payload when it is missing.
	pub fn find_add(&mut self, name: &[u8]) -> usize {
		if let Some(index) = self.position(name) {
			return index;
		}

		self.push(LookupItem::new(name, None, 0))
	}

	/// Reserve an empty slot to be filled in with [`Self::set_name`].
	pub fn new_slot(&mut self) -> usize {
		self.push(LookupItem::new(&[], None, 0))
	}

	/// Set the name of the item at `index`, rehashing it. Returns false when
	/// the index is out of range.
	pub fn set_name(&mut self, index: usize, name: &Name<'_>, line_number: u16) -> bool {
		let Some(item) = self.get_mut(index) else {
			return false;
		};

		item.hash = fnv_32_hash(name.as_bytes());
		item.name = name.to_owned_name();
		item.line_number = line_number;
		true
	}

	/// Set the group id of the item at `index`. Returns false when the index
	/// is out of range.
	pub fn set_group(&mut self, index: usize, group_id: u16) -> bool {
		let Some(item) = self.get_mut(index) else {
			return false;
		};

		item.group_id = group_id;
		true
	}

	pub fn iter(&self) -> impl Iterator<Item = &LookupItem<T>> {
		self.blocks.iter().flatten()
	}

	fn push(&mut self, item: LookupItem<T>) -> usize {
		let needs_block = self
			.blocks
			.last()
			.is_none_or(|block| block.len() >= LOOKUP_BLOCK_SIZE);

		if needs_block {
			self.blocks.push(Vec::with_capacity(LOOKUP_BLOCK_SIZE));
		}

		let block_index = self.blocks.len() - 1;
		let block = &mut self.blocks[block_index];
		block.push(item);

		block_index * LOOKUP_BLOCK_SIZE + block.len() - 1
	}
}

/// Text macros referenced as `$name` in document text.
///
/// A macro name runs from the character after `$` up to the next space, tab,
/// carriage return or newline.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
	table: LookupTable<String>,
}

impl MacroTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Define a macro. The first definition of a name wins.
	pub fn define(&mut self, name: &str, value: impl Into<String>) -> usize {
		self.table.add(name.as_bytes(), value.into(), 0)
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.table
			.find(name.as_bytes())
			.and_then(|item| item.payload.as_deref())
	}

	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Replace every `$name` in `text` with its definition. Unknown macros are
	/// dropped from the output and reported as warnings.
	pub fn expand(&self, text: &str) -> String {
		let mut output = String::with_capacity(text.len());
		let mut rest = text;

		while let Some(start) = rest.find('$') {
			output.push_str(&rest[..start]);
			let after = &rest[start + 1..];
			let end = after
				.find([' ', '\t', '\r', '\n'])
				.unwrap_or(after.len());
			let name = &after[..end];

			match self.get(name) {
				Some(value) => output.push_str(value),
				None => tracing::warn!(name, "unknown macro"),
			}

			rest = &after[end..];
		}

		output.push_str(rest);
		output
	}
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for MacroTable {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut table = MacroTable::new();
		for (name, value) in iter {
			table.define(name.as_ref(), value);
		}
		table
	}
}

impl From<&BTreeMap<String, String>> for MacroTable {
	fn from(macros: &BTreeMap<String, String>) -> Self {
		macros.iter().map(|(k, v)| (k.as_str(), v.clone())).collect()
	}
}
