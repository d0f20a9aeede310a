//! The path-keyed error collection.
//!
//! Validation failures are accumulated here as data rather than propagated as
//! errors: each path key owns a [`FieldEntry`] with its messages and a
//! tri-state-plus-unvalidated [`FieldStatus`]. The collection enforces a
//! max-error cutoff; once reached, no further errors are recorded and
//! remaining paths are suppressed rather than judged.

use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::path;

/// Default error capacity, after which further evaluation is suppressed.
pub const DEFAULT_MAX_ERRORS: usize = 200;

/// The validation status of one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldStatus {
    /// No judgement has been recorded for the path.
    #[default]
    Unvalidated,
    /// The path was validated and passed.
    Valid,
    /// At least one error was recorded at the path.
    Invalid,
    /// The path was deliberately not validated.
    Skipped,
}

/// The recorded errors and status for one path.
#[derive(Debug, Default)]
pub struct FieldEntry {
    errors: Vec<String>,
    status: FieldStatus,
}

impl FieldEntry {
    /// The error messages recorded at this path, in order.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// The path's current status.
    pub fn status(&self) -> FieldStatus {
        self.status
    }

    /// Marks the path valid, unless it is already invalid.
    ///
    /// An invalid judgement is never downgraded to valid by a later step.
    pub fn mark_valid(&mut self) {
        if self.status != FieldStatus::Invalid {
            self.status = FieldStatus::Valid;
        }
    }

    /// Marks the path as deliberately not validated.
    pub fn mark_skipped(&mut self) {
        self.status = FieldStatus::Skipped;
    }
}

/// A keyed store of validation errors with a max-error cutoff.
///
/// Entries keep their insertion order. Errors are appended via
/// [`try_add_error`](Self::try_add_error) until the cutoff is reached; from
/// then on every attempt fails and callers are expected to suppress instead.
///
/// # Example
///
/// ```rust
/// use walkabout::{ErrorCollection, FieldStatus};
///
/// let mut errors = ErrorCollection::new();
/// assert!(errors.try_add_error("Age", "must be greater than or equal to 0"));
///
/// assert_eq!(errors.field_status("Age"), FieldStatus::Invalid);
/// assert_eq!(errors.field_status("Name"), FieldStatus::Unvalidated);
/// assert!(!errors.is_valid());
/// ```
pub struct ErrorCollection {
    entries: IndexMap<String, FieldEntry>,
    max_errors: usize,
    error_count: usize,
    max_reached: bool,
}

impl ErrorCollection {
    /// Creates a collection with the default cutoff of
    /// [`DEFAULT_MAX_ERRORS`].
    pub fn new() -> Self {
        Self::with_max_errors(DEFAULT_MAX_ERRORS)
    }

    /// Creates a collection that accepts at most `max_errors` errors.
    pub fn with_max_errors(max_errors: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            max_errors,
            error_count: 0,
            max_reached: max_errors == 0,
        }
    }

    /// Records an error at `key`, marking the entry invalid.
    ///
    /// Returns false without recording anything once the cutoff has been
    /// reached.
    pub fn try_add_error(&mut self, key: impl Into<String>, message: impl Into<String>) -> bool {
        if self.max_reached {
            return false;
        }
        let entry = self.entries.entry(key.into()).or_default();
        entry.errors.push(message.into());
        entry.status = FieldStatus::Invalid;
        self.error_count += 1;
        if self.error_count >= self.max_errors {
            self.max_reached = true;
        }
        true
    }

    /// True once the cutoff has been reached; stays true from then on.
    pub fn has_reached_max_errors(&self) -> bool {
        self.max_reached
    }

    /// The number of errors recorded so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// The status recorded for exactly `key`.
    pub fn field_status(&self, key: &str) -> FieldStatus {
        self.entries
            .get(key)
            .map(FieldEntry::status)
            .unwrap_or_default()
    }

    /// The entry at exactly `key`, if one exists.
    pub fn entry(&self, key: &str) -> Option<&FieldEntry> {
        self.entries.get(key)
    }

    /// The mutable entry at exactly `key`, if one exists. Never creates one.
    pub fn entry_mut(&mut self, key: &str) -> Option<&mut FieldEntry> {
        self.entries.get_mut(key)
    }

    /// Registers `key` with no judgement, returning its entry.
    ///
    /// Binders use this to pre-register bound fields so that suppression and
    /// valid-marking have entries to act on; it does not count as an error.
    pub fn ensure_entry(&mut self, key: impl Into<String>) -> &mut FieldEntry {
        self.entries.entry(key.into()).or_default()
    }

    /// The keys at or under `key`, hierarchically.
    pub fn keys_with_prefix<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.entries
            .keys()
            .filter(move |candidate| path::is_prefix(key, candidate))
            .map(String::as_str)
    }

    /// The mutable entries at or under `key`, hierarchically.
    pub fn entries_with_prefix_mut<'a>(
        &'a mut self,
        key: &'a str,
    ) -> impl Iterator<Item = &'a mut FieldEntry> {
        self.entries
            .iter_mut()
            .filter(move |(candidate, _)| path::is_prefix(key, candidate))
            .map(|(_, entry)| entry)
    }

    /// Iterates all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// The number of keyed entries (not errors).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries exist.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if no entry is invalid.
    pub fn is_valid(&self) -> bool {
        self.entries
            .values()
            .all(|entry| entry.status != FieldStatus::Invalid)
    }
}

impl Default for ErrorCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation recorded {} error(s):", self.error_count)?;
        for (key, entry) in self.iter() {
            let key = if key.is_empty() { "(root)" } else { key };
            for message in entry.errors() {
                writeln!(f, "  {}: {}", key, message)?;
            }
        }
        Ok(())
    }
}
