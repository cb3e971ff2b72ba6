//! Persisted-format identifiers.

use std::fmt;

use crate::error::FormatError;

lazy_static::lazy_static! {
    /// The one implemented document variant: `standard_2`.
    static ref STANDARD: FormatId = FormatId::new("standard", 2);
}

/// A `name_version` tag selecting a persisted-document schema variant.
///
/// Identifiers compare equal when both name and version match. Ordering is
/// only defined within a name family: [`is_newer_than`](FormatId::is_newer_than)
/// and [`is_older_than`](FormatId::is_older_than) both return `false` for
/// identifiers with different names, so callers that dispatch on a format
/// must check equality (which compares names first) rather than ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatId {
    name: String,
    version: i32,
}

impl FormatId {
    /// Creates an identifier from its parts.
    pub fn new(name: impl Into<String>, version: i32) -> Self {
        Self { name: name.into(), version }
    }

    /// The `standard_2` identifier, the only variant the codec implements.
    pub fn standard() -> &'static FormatId {
        &STANDARD
    }

    /// Parses a `<name>_<version>` tag, splitting at the *last* underscore
    /// (names may themselves contain underscores).
    ///
    /// Fails with [`FormatError::InvalidVersion`] when the tag has no
    /// integer version suffix.
    pub fn parse(tag: &str) -> Result<FormatId, FormatError> {
        let Some((name, suffix)) = tag.rsplit_once('_') else {
            return Err(FormatError::InvalidVersion { tag: tag.to_string() });
        };
        let version = suffix
            .parse::<i32>()
            .map_err(|_| FormatError::InvalidVersion { tag: tag.to_string() })?;
        Ok(Self::new(name, version))
    }

    /// The format's family name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The format's revision number within its family.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// True when both identifiers share a name and `self` is the newer
    /// revision. Different names are never ordered: this and
    /// [`is_older_than`](FormatId::is_older_than) both return `false`.
    pub fn is_newer_than(&self, other: &FormatId) -> bool {
        self.name == other.name && self.version > other.version
    }

    /// True when both identifiers share a name and `self` is the older
    /// revision. See [`is_newer_than`](FormatId::is_newer_than).
    pub fn is_older_than(&self, other: &FormatId) -> bool {
        self.name == other.name && self.version < other.version
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.name, self.version)
    }
}
