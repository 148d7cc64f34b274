use std::io::Write;

use crate::DocgenError;
use crate::DocgenResult;
use crate::reader::ModelHeader;
use crate::record::BLOCK_SIZE;
use crate::record::Record;
use crate::record::RecordTag;

/// Writes records into the block format read by [`crate::ModelReader`].
///
/// Records are packed into [`BLOCK_SIZE`] blocks. A record that does not fit
/// in the rest of the current block starts a new one, and the unused tail of
/// a block is filled with `BLOCK_END` markers. The header carries the number
/// of records, so blocks are kept in memory until [`ModelWriter::finish`].
#[derive(Debug)]
pub struct ModelWriter<W> {
	inner: W,
	header: ModelHeader,
	body: Vec<u8>,
	block: Vec<u8>,
	scratch: Vec<u8>,
	records: u32,
}

impl<W: Write> ModelWriter<W> {
	pub fn new(inner: W) -> Self {
		Self::with_header(inner, ModelHeader::default())
	}

	/// Use `header` for everything but the record count.
	pub fn with_header(inner: W, header: ModelHeader) -> Self {
		Self {
			inner,
			header,
			body: Vec::new(),
			block: Vec::with_capacity(BLOCK_SIZE),
			scratch: Vec::new(),
			records: 0,
		}
	}

	/// Number of complete blocks so far.
	pub fn block_count(&self) -> usize {
		self.body.len() / BLOCK_SIZE
	}

	/// Append a record. A `BLOCK_END` record closes the current block early.
	pub fn write_record(&mut self, record: &Record<'_>) -> DocgenResult<()> {
		if record.tag() == RecordTag::BlockEnd {
			self.close_block();
			return Ok(());
		}

		self.scratch.clear();
		record.encode(&mut self.scratch)?;

		if self.scratch.len() > BLOCK_SIZE {
			return Err(DocgenError::RecordTooLarge {
				size: self.scratch.len(),
				limit: BLOCK_SIZE,
			});
		}

		if self.block.len() + self.scratch.len() > BLOCK_SIZE {
			self.close_block();
		}

		self.block.extend_from_slice(&self.scratch);
		self.records += 1;
		Ok(())
	}

	pub fn write_records<'r>(
		&mut self,
		records: impl IntoIterator<Item = &'r Record<'r>>,
	) -> DocgenResult<()> {
		for record in records {
			self.write_record(record)?;
		}
		Ok(())
	}

	fn close_block(&mut self) {
		if self.block.is_empty() {
			return;
		}

		self.block.resize(BLOCK_SIZE, RecordTag::BlockEnd.as_byte());
		self.body.append(&mut self.block);
	}

	/// Close the last block, write the header and every block, and return the
	/// inner writer.
	pub fn finish(mut self) -> DocgenResult<W> {
		self.close_block();
		self.header.record_count = self.records;

		self.inner.write_all(&self.header.to_bytes())?;
		self.inner.write_all(&self.body)?;
		self.inner.flush()?;

		tracing::debug!(
			records = self.records,
			blocks = self.body.len() / BLOCK_SIZE,
			"wrote model"
		);

		Ok(self.inner)
	}
}

/// Encode `records` into a complete model file in memory.
pub fn model_to_vec<'r>(records: impl IntoIterator<Item = &'r Record<'r>>) -> DocgenResult<Vec<u8>> {
	let mut writer = ModelWriter::new(Vec::new());
	writer.write_records(records)?;
	writer.finish()
}
