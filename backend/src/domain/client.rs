//! Clients: customers and suppliers recorded inside a workspace.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::record::{FieldError, RecordKind, WorkspaceRecord, optional_text, required_text};
use super::user::EmailAddress;
use super::{RecordId, WorkspaceId};

const FULL_NAME_MAX: usize = 160;
const PHONE_MAX: usize = 40;
const COUNTRY_MAX: usize = 80;
const DOCUMENT_TYPE_MAX: usize = 16;
const DOCUMENT_NUMBER_MAX: usize = 32;

/// Document type assumed when the caller does not provide one.
pub const DEFAULT_DOCUMENT_TYPE: &str = "DNI";

/// Commercial relationship with a client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClientKind {
    #[default]
    Customer,
    Supplier,
    CustomerSupplier,
}

impl ClientKind {
    /// Wire and storage label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Supplier => "supplier",
            Self::CustomerSupplier => "customer_supplier",
        }
    }

    /// Parse a stored label.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "customer" => Some(Self::Customer),
            "supplier" => Some(Self::Supplier),
            "customer_supplier" => Some(Self::CustomerSupplier),
            _ => None,
        }
    }
}

/// A client record.
///
/// ## Invariants
/// - `full_name` is trimmed and non-empty.
/// - `document_type` is trimmed and non-empty; defaults to `DNI`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    #[schema(example = "María Gómez")]
    pub full_name: String,
    pub phone: Option<String>,
    #[schema(value_type = Option<String>)]
    pub email: Option<EmailAddress>,
    pub date_of_birth: Option<NaiveDate>,
    pub country: Option<String>,
    pub kind: ClientKind,
    #[schema(example = "DNI")]
    pub document_type: String,
    pub document_number: Option<String>,
}

/// Raw client fields as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct ClientInput<'a> {
    pub full_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub date_of_birth: Option<&'a str>,
    pub country: Option<&'a str>,
    pub kind: Option<ClientKind>,
    pub document_type: Option<&'a str>,
    pub document_number: Option<&'a str>,
}

/// Validated payload for creating a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientDraft {
    full_name: String,
    phone: Option<String>,
    email: Option<EmailAddress>,
    date_of_birth: Option<NaiveDate>,
    country: Option<String>,
    kind: ClientKind,
    document_type: String,
    document_number: Option<String>,
}

impl ClientDraft {
    /// Validate caller input; `full_name` is required.
    pub fn try_from_input(input: ClientInput<'_>) -> Result<Self, FieldError> {
        let full_name = required_text("fullName", input.full_name.unwrap_or_default(), FULL_NAME_MAX)?;
        let document_type = optional_text("documentType", input.document_type, DOCUMENT_TYPE_MAX)?
            .unwrap_or_else(|| DEFAULT_DOCUMENT_TYPE.to_owned());
        Ok(Self {
            full_name,
            phone: optional_text("phone", input.phone, PHONE_MAX)?,
            email: parse_email(input.email)?,
            date_of_birth: parse_date(input.date_of_birth)?,
            country: optional_text("country", input.country, COUNTRY_MAX)?,
            kind: input.kind.unwrap_or_default(),
            document_type,
            document_number: parse_document_number(input.document_number)?,
        })
    }
}

/// Raw partial update; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ClientPatchInput<'a> {
    pub full_name: Option<&'a str>,
    pub phone: Option<Option<&'a str>>,
    pub email: Option<Option<&'a str>>,
    pub date_of_birth: Option<Option<&'a str>>,
    pub country: Option<Option<&'a str>>,
    pub kind: Option<ClientKind>,
    pub document_type: Option<&'a str>,
    pub document_number: Option<Option<&'a str>>,
}

/// Validated partial update for a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPatch {
    full_name: Option<String>,
    phone: Option<Option<String>>,
    email: Option<Option<EmailAddress>>,
    date_of_birth: Option<Option<NaiveDate>>,
    country: Option<Option<String>>,
    kind: Option<ClientKind>,
    document_type: Option<String>,
    document_number: Option<Option<String>>,
}

impl ClientPatch {
    /// Validate the fields present in `input`.
    pub fn try_from_input(input: ClientPatchInput<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            full_name: input
                .full_name
                .map(|raw| required_text("fullName", raw, FULL_NAME_MAX))
                .transpose()?,
            phone: input
                .phone
                .map(|raw| optional_text("phone", raw, PHONE_MAX))
                .transpose()?,
            email: input.email.map(parse_email).transpose()?,
            date_of_birth: input.date_of_birth.map(parse_date).transpose()?,
            country: input
                .country
                .map(|raw| optional_text("country", raw, COUNTRY_MAX))
                .transpose()?,
            kind: input.kind,
            document_type: input
                .document_type
                .map(|raw| required_text("documentType", raw, DOCUMENT_TYPE_MAX))
                .transpose()?,
            document_number: input
                .document_number
                .map(parse_document_number)
                .transpose()?,
        })
    }
}

fn parse_email(raw: Option<&str>) -> Result<Option<EmailAddress>, FieldError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => EmailAddress::new(value)
            .map(Some)
            .map_err(|err| FieldError::new("email", "invalid_email", err.to_string())),
    }
}

fn parse_document_number(raw: Option<&str>) -> Result<Option<String>, FieldError> {
    let number = optional_text("documentNumber", raw, DOCUMENT_NUMBER_MAX)?;
    match number {
        Some(digits) if !digits.bytes().all(|b| b.is_ascii_digit()) => Err(FieldError::new(
            "documentNumber",
            "invalid_document_number",
            "documentNumber must contain only digits",
        )),
        other => Ok(other),
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, FieldError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                FieldError::new(
                    "dateOfBirth",
                    "invalid_date",
                    "dateOfBirth must be a YYYY-MM-DD date",
                )
            }),
    }
}

impl WorkspaceRecord for Client {
    type Draft = ClientDraft;
    type Patch = ClientPatch;

    const KIND: RecordKind = RecordKind::Client;

    fn from_draft(id: RecordId, workspace_id: WorkspaceId, draft: ClientDraft) -> Self {
        Self {
            id,
            workspace_id,
            full_name: draft.full_name,
            phone: draft.phone,
            email: draft.email,
            date_of_birth: draft.date_of_birth,
            country: draft.country,
            kind: draft.kind,
            document_type: draft.document_type,
            document_number: draft.document_number,
        }
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    fn apply(&mut self, patch: ClientPatch) {
        if let Some(value) = patch.full_name {
            self.full_name = value;
        }
        if let Some(value) = patch.phone {
            self.phone = value;
        }
        if let Some(value) = patch.email {
            self.email = value;
        }
        if let Some(value) = patch.date_of_birth {
            self.date_of_birth = value;
        }
        if let Some(value) = patch.country {
            self.country = value;
        }
        if let Some(value) = patch.kind {
            self.kind = value;
        }
        if let Some(value) = patch.document_type {
            self.document_type = value;
        }
        if let Some(value) = patch.document_number {
            self.document_number = value;
        }
    }
}
