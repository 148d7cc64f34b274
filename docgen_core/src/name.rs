use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

/// A byte-string handle that either borrows its bytes (from a decoded block or
/// a `'static` literal) or owns them.
///
/// Model files are not required to be UTF-8, so names stay as bytes and are
/// only converted lossily for display. The `fixed` flag is carried through
/// from the record that produced the name; the renderer uses it to decide
/// whether text may be re-flowed.
///
/// Equality and hashing only consider the bytes, never the ownership mode or
/// the `fixed` flag.
#[derive(Clone)]
pub struct Name<'a> {
	bytes: Cow<'a, [u8]>,
	fixed: bool,
}

/// A name that does not borrow from any buffer. Everything stored in the model
/// graph is an `OwnedName`.
pub type OwnedName = Name<'static>;

impl<'a> Name<'a> {
	/// Create a view into `bytes` without copying.
	pub const fn borrowed(bytes: &'a [u8]) -> Self {
		Self {
			bytes: Cow::Borrowed(bytes),
			fixed: false,
		}
	}

	/// Create a view into `bytes` that carries the record's fixed flag.
	pub const fn borrowed_fixed(bytes: &'a [u8], fixed: bool) -> Self {
		Self {
			bytes: Cow::Borrowed(bytes),
			fixed,
		}
	}

	/// Take ownership of `bytes`.
	pub fn owned(bytes: impl Into<Vec<u8>>) -> OwnedName {
		Name {
			bytes: Cow::Owned(bytes.into()),
			fixed: false,
		}
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.bytes
	}

	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Returns true when the name is a view into another buffer.
	pub fn is_borrowed(&self) -> bool {
		matches!(self.bytes, Cow::Borrowed(_))
	}

	pub fn is_fixed(&self) -> bool {
		self.fixed
	}

	/// Copy the bytes into a new, independently owned name.
	pub fn to_owned_name(&self) -> OwnedName {
		Name {
			bytes: Cow::Owned(self.bytes.to_vec()),
			fixed: self.fixed,
		}
	}

	/// Convert into an owned name, reusing the allocation when there already
	/// is one.
	pub fn into_owned(self) -> OwnedName {
		Name {
			bytes: Cow::Owned(self.bytes.into_owned()),
			fixed: self.fixed,
		}
	}

	pub fn to_string_lossy(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.bytes)
	}
}

impl OwnedName {
	/// A borrowed view of a `'static` literal, used for reserved names.
	pub const fn from_static(bytes: &'static [u8]) -> Self {
		Name::borrowed(bytes)
	}
}

impl Default for Name<'_> {
	fn default() -> Self {
		Name::borrowed(&[])
	}
}

impl PartialEq for Name<'_> {
	fn eq(&self, other: &Self) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl Eq for Name<'_> {}

impl Hash for Name<'_> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.as_bytes().hash(state);
	}
}

impl PartialEq<[u8]> for Name<'_> {
	fn eq(&self, other: &[u8]) -> bool {
		self.as_bytes() == other
	}
}

impl PartialEq<&str> for Name<'_> {
	fn eq(&self, other: &&str) -> bool {
		self.as_bytes() == other.as_bytes()
	}
}

impl fmt::Display for Name<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_string_lossy())
	}
}

impl fmt::Debug for Name<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Name({:?})", self.to_string_lossy())
	}
}

impl From<&str> for OwnedName {
	fn from(value: &str) -> Self {
		Name::owned(value.as_bytes())
	}
}

impl From<String> for OwnedName {
	fn from(value: String) -> Self {
		Name::owned(value.into_bytes())
	}
}
