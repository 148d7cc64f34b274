use std::fmt;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use crate::DocgenError;
use crate::DocgenResult;
use crate::record::BLOCK_SIZE;

/// The signature at the start of every linked model file.
pub const MODEL_MAGIC: [u8; 4] = *b"GDSL";

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 18;

/// The newest major format version this crate reads without a warning.
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 0;

/// The header of a linked model file.
///
/// ```text
/// 0..4    magic "GDSL"
/// 4       major version
/// 5       minor version
/// 6..12   day, month (0-based), years since 1900, hour, minute, second
/// 12..16  record count (u32, big-endian)
/// 16..18  name start (u16, big-endian)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelHeader {
	pub version_major: u8,
	pub version_minor: u8,
	pub day: u8,
	/// Month of the year starting at 0.
	pub month: u8,
	/// Years since 1900.
	pub year: u8,
	pub hour: u8,
	pub minute: u8,
	pub second: u8,
	pub record_count: u32,
	pub name_start: u16,
}

impl Default for ModelHeader {
	fn default() -> Self {
		Self {
			version_major: VERSION_MAJOR,
			version_minor: VERSION_MINOR,
			day: 1,
			month: 0,
			year: 70,
			hour: 0,
			minute: 0,
			second: 0,
			record_count: 0,
			name_start: 0,
		}
	}
}

impl ModelHeader {
	/// Parse a header, checking the signature. `file` names the source in
	/// errors.
	pub fn parse(bytes: &[u8], file: &str) -> DocgenResult<Self> {
		if bytes.len() < HEADER_SIZE {
			return Err(DocgenError::ShortRead {
				file: file.to_string(),
				expected: HEADER_SIZE,
				got: bytes.len(),
			});
		}

		if bytes[0..4] != MODEL_MAGIC {
			return Err(DocgenError::BadSignature {
				file: file.to_string(),
			});
		}

		Ok(Self {
			version_major: bytes[4],
			version_minor: bytes[5],
			day: bytes[6],
			month: bytes[7],
			year: bytes[8],
			hour: bytes[9],
			minute: bytes[10],
			second: bytes[11],
			record_count: u32::from_be_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
			name_start: u16::from_be_bytes([bytes[16], bytes[17]]),
		})
	}

	pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
		let mut bytes = [0; HEADER_SIZE];
		bytes[0..4].copy_from_slice(&MODEL_MAGIC);
		bytes[4] = self.version_major;
		bytes[5] = self.version_minor;
		bytes[6] = self.day;
		bytes[7] = self.month;
		bytes[8] = self.year;
		bytes[9] = self.hour;
		bytes[10] = self.minute;
		bytes[11] = self.second;
		bytes[12..16].copy_from_slice(&self.record_count.to_be_bytes());
		bytes[16..18].copy_from_slice(&self.name_start.to_be_bytes());
		bytes
	}

	/// Whether the file was written by a newer major version of the format.
	pub fn is_newer_major(&self) -> bool {
		self.version_major > VERSION_MAJOR
	}
}

/// Formats the build time as `YYYY-MM-DD HH:MM:SS`.
impl fmt::Display for ModelHeader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
			1900 + u16::from(self.year),
			u16::from(self.month) + 1,
			self.day,
			self.hour,
			self.minute,
			self.second
		)
	}
}

/// Reads the header and then whole blocks from a linked model file.
#[derive(Debug)]
pub struct ModelReader<R> {
	inner: R,
	source: String,
	header: ModelHeader,
	block: Vec<u8>,
	blocks_read: usize,
}

impl ModelReader<BufReader<File>> {
	pub fn open(path: &Path) -> DocgenResult<Self> {
		let file = File::open(path)?;
		Self::new(BufReader::new(file), path.display().to_string())
	}
}

impl<R: Read> ModelReader<R> {
	/// Read and check the header. `source` names the input in errors.
	pub fn new(mut inner: R, source: impl Into<String>) -> DocgenResult<Self> {
		let source = source.into();
		let mut bytes = [0; HEADER_SIZE];
		let got = read_full(&mut inner, &mut bytes)?;
		let header = ModelHeader::parse(&bytes[..got], &source)?;

		if header.is_newer_major() {
			tracing::warn!(
				file = %source,
				version = header.version_major,
				supported = VERSION_MAJOR,
				"model file was built with a later major version"
			);
		}

		Ok(Self {
			inner,
			source,
			header,
			block: vec![0; BLOCK_SIZE],
			blocks_read: 0,
		})
	}

	pub fn header(&self) -> &ModelHeader {
		&self.header
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn blocks_read(&self) -> usize {
		self.blocks_read
	}

	/// Read the next block. Returns `None` at a clean end of file; a file
	/// that ends part way through a block is an error.
	pub fn next_block(&mut self) -> DocgenResult<Option<&[u8]>> {
		let got = read_full(&mut self.inner, &mut self.block)?;

		if got == 0 {
			return Ok(None);
		}

		if got < BLOCK_SIZE {
			return Err(DocgenError::ShortRead {
				file: self.source.clone(),
				expected: BLOCK_SIZE,
				got,
			});
		}

		self.blocks_read += 1;
		Ok(Some(&self.block))
	}
}

/// Fill `buffer` from `reader`, stopping early only at end of input.
fn read_full(reader: &mut impl Read, buffer: &mut [u8]) -> io::Result<usize> {
	let mut filled = 0;

	while filled < buffer.len() {
		match reader.read(&mut buffer[filled..]) {
			Ok(0) => break,
			Ok(read) => filled += read,
			Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
			Err(error) => return Err(error),
		}
	}

	Ok(filled)
}
