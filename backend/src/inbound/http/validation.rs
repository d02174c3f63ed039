//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes an `invalid_request` error whose
//! `details` name the offending JSON field and a stable code.

use serde_json::json;

use crate::domain::{
    CredentialsValidationError, Error, FieldError, RecordId, UserValidationError, WorkspaceId,
    WorkspaceValidationError,
};

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(field, "missing_field", format!("missing required field: {field}"))
}

/// Unwrap a required body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_workspace_id(raw: &str) -> Result<WorkspaceId, Error> {
    WorkspaceId::new(raw).map_err(|err| field_error("id", "invalid_uuid", err.to_string()))
}

pub(crate) fn parse_record_id(raw: &str) -> Result<RecordId, Error> {
    RecordId::new(raw).map_err(|err| field_error("id", "invalid_uuid", err.to_string()))
}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        field_error(err.field, err.code, err.message)
    }
}

impl From<CredentialsValidationError> for Error {
    fn from(err: CredentialsValidationError) -> Self {
        field_error(err.field(), err.code(), err.to_string())
    }
}

impl From<UserValidationError> for Error {
    fn from(err: UserValidationError) -> Self {
        field_error(err.field(), err.code(), err.to_string())
    }
}

impl From<WorkspaceValidationError> for Error {
    fn from(err: WorkspaceValidationError) -> Self {
        let code = match err {
            WorkspaceValidationError::EmptyName => "required",
            WorkspaceValidationError::NameTooLong { .. } => "too_long",
        };
        field_error("name", code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, NewPassword};
    use rstest::rstest;

    fn details(error: &Error) -> (String, String) {
        let details = error.details().expect("details present");
        (
            details["field"].as_str().expect("field").to_owned(),
            details["code"].as_str().expect("code").to_owned(),
        )
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require::<String>(None, FieldName::new("fullName")).expect_err("missing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            details(&err),
            ("fullName".to_owned(), "missing_field".to_owned())
        );
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    fn malformed_path_ids_are_invalid_requests(#[case] raw: &str) {
        let err = parse_record_id(raw).expect_err("rejected");
        assert_eq!(details(&err), ("id".to_owned(), "invalid_uuid".to_owned()));
        assert!(parse_workspace_id(raw).is_err());
    }

    #[rstest]
    fn password_mismatch_points_at_confirmation() {
        let err: Error = NewPassword::confirmed("longenough", "different")
            .expect_err("mismatch")
            .into();
        assert_eq!(
            details(&err),
            (
                "passwordConfirmation".to_owned(),
                "password_mismatch".to_owned()
            )
        );
    }

    #[rstest]
    fn empty_workspace_name_is_required() {
        let err: Error = WorkspaceValidationError::EmptyName.into();
        assert_eq!(details(&err), ("name".to_owned(), "required".to_owned()));
    }
}
