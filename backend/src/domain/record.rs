//! Shared behaviour for workspace-scoped records.
//!
//! Clients and products have the same lifecycle: they are created inside a
//! workspace, read, partially updated, and deleted by the workspace owner.
//! [`WorkspaceRecord`] captures that lifecycle so a single generic service and
//! repository port serve both.

use super::{RecordId, WorkspaceId};

/// Which record collection a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Client,
    Product,
}

impl RecordKind {
    /// Lowercase singular label used in messages and logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Product => "product",
        }
    }
}

/// A record that lives inside exactly one workspace.
///
/// ## Invariants
/// - `workspace_id` is fixed at creation; [`WorkspaceRecord::apply`] never
///   changes it.
pub trait WorkspaceRecord: Clone + Send + Sync + 'static {
    /// Validated creation payload.
    type Draft: Send + Sync + 'static;
    /// Validated partial update; absent fields are left untouched.
    type Patch: Send + Sync + 'static;

    const KIND: RecordKind;

    /// Build a new record from a validated draft.
    fn from_draft(id: RecordId, workspace_id: WorkspaceId, draft: Self::Draft) -> Self;

    fn id(&self) -> &RecordId;

    fn workspace_id(&self) -> &WorkspaceId;

    /// Replace the fields named by `patch`.
    fn apply(&mut self, patch: Self::Patch);
}

/// Field-level validation failure for record payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }
}

/// Trim `raw` and require it to be non-empty and at most `max` characters.
pub(crate) fn required_text(field: &'static str, raw: &str, max: usize) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, "empty", format!("{field} must not be empty")));
    }
    bounded(field, trimmed, max)
}

/// Trim `raw`; blank input becomes `None`.
pub(crate) fn optional_text(
    field: &'static str,
    raw: Option<&str>,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => bounded(field, value, max).map(Some),
    }
}

fn bounded(field: &'static str, value: &str, max: usize) -> Result<String, FieldError> {
    if value.chars().count() > max {
        return Err(FieldError::new(
            field,
            "too_long",
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn required_text_trims() {
        assert_eq!(required_text("name", "  Widget ", 10), Ok("Widget".to_owned()));
    }

    #[rstest]
    #[case("", "empty")]
    #[case("   ", "empty")]
    #[case("abcdefghijk", "too_long")]
    fn required_text_rejects(#[case] raw: &str, #[case] code: &str) {
        let err = required_text("name", raw, 10).expect_err("invalid");
        assert_eq!(err.field, "name");
        assert_eq!(err.code, code);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(Some(" x "), Some("x"))]
    fn optional_text_normalises(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let value = optional_text("phone", raw, 5).expect("valid");
        assert_eq!(value.as_deref(), expected);
    }
}
