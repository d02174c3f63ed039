//! Products sold or bought within a workspace.

use serde::Serialize;
use url::Url;
use utoipa::ToSchema;

use super::record::{FieldError, RecordKind, WorkspaceRecord, optional_text, required_text};
use super::{RecordId, WorkspaceId};

const NAME_MAX: usize = 160;
const SHORT_DESCRIPTION_MAX: usize = 280;
const FULL_DESCRIPTION_MAX: usize = 10_000;
const THUMBNAIL_URL_MAX: usize = 2048;

/// A product record.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
/// - prices, when present, are finite and non-negative.
/// - `thumbnail_url`, when present, is an absolute `http(s)` URL.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,
    pub workspace_id: WorkspaceId,
    #[schema(example = "Espresso beans 1kg")]
    pub name: String,
    #[schema(example = 24.5)]
    pub regular_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Raw product fields as received from a caller.
#[derive(Debug, Clone, Default)]
pub struct ProductInput<'a> {
    pub name: Option<&'a str>,
    pub regular_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub short_description: Option<&'a str>,
    pub full_description: Option<&'a str>,
    pub thumbnail_url: Option<&'a str>,
}

/// Validated payload for creating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    name: String,
    regular_price: Option<f64>,
    sale_price: Option<f64>,
    short_description: Option<String>,
    full_description: Option<String>,
    thumbnail_url: Option<String>,
}

impl ProductDraft {
    /// Validate caller input; `name` is required.
    pub fn try_from_input(input: ProductInput<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            name: required_text("name", input.name.unwrap_or_default(), NAME_MAX)?,
            regular_price: input
                .regular_price
                .map(|value| price("regularPrice", value))
                .transpose()?,
            sale_price: input
                .sale_price
                .map(|value| price("salePrice", value))
                .transpose()?,
            short_description: optional_text(
                "shortDescription",
                input.short_description,
                SHORT_DESCRIPTION_MAX,
            )?,
            full_description: optional_text(
                "fullDescription",
                input.full_description,
                FULL_DESCRIPTION_MAX,
            )?,
            thumbnail_url: thumbnail(input.thumbnail_url)?,
        })
    }
}

/// Raw partial update; `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ProductPatchInput<'a> {
    pub name: Option<&'a str>,
    pub regular_price: Option<Option<f64>>,
    pub sale_price: Option<Option<f64>>,
    pub short_description: Option<Option<&'a str>>,
    pub full_description: Option<Option<&'a str>>,
    pub thumbnail_url: Option<Option<&'a str>>,
}

/// Validated partial update for a product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    name: Option<String>,
    regular_price: Option<Option<f64>>,
    sale_price: Option<Option<f64>>,
    short_description: Option<Option<String>>,
    full_description: Option<Option<String>>,
    thumbnail_url: Option<Option<String>>,
}

impl ProductPatch {
    /// Validate the fields present in `input`.
    pub fn try_from_input(input: ProductPatchInput<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            name: input
                .name
                .map(|raw| required_text("name", raw, NAME_MAX))
                .transpose()?,
            regular_price: input
                .regular_price
                .map(|value| value.map(|v| price("regularPrice", v)).transpose())
                .transpose()?,
            sale_price: input
                .sale_price
                .map(|value| value.map(|v| price("salePrice", v)).transpose())
                .transpose()?,
            short_description: input
                .short_description
                .map(|raw| optional_text("shortDescription", raw, SHORT_DESCRIPTION_MAX))
                .transpose()?,
            full_description: input
                .full_description
                .map(|raw| optional_text("fullDescription", raw, FULL_DESCRIPTION_MAX))
                .transpose()?,
            thumbnail_url: input.thumbnail_url.map(thumbnail).transpose()?,
        })
    }
}

fn price(field: &'static str, value: f64) -> Result<f64, FieldError> {
    if !value.is_finite() || value < 0.0 {
        return Err(FieldError::new(
            field,
            "invalid_price",
            format!("{field} must be a non-negative number"),
        ));
    }
    Ok(value)
}

fn thumbnail(raw: Option<&str>) -> Result<Option<String>, FieldError> {
    let Some(value) = optional_text("thumbnailUrl", raw, THUMBNAIL_URL_MAX)? else {
        return Ok(None);
    };
    let invalid = || {
        FieldError::new(
            "thumbnailUrl",
            "invalid_url",
            "thumbnailUrl must be an absolute http or https URL",
        )
    };
    let parsed = Url::parse(&value).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }
    Ok(Some(value))
}

impl WorkspaceRecord for Product {
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const KIND: RecordKind = RecordKind::Product;

    fn from_draft(id: RecordId, workspace_id: WorkspaceId, draft: ProductDraft) -> Self {
        Self {
            id,
            workspace_id,
            name: draft.name,
            regular_price: draft.regular_price,
            sale_price: draft.sale_price,
            short_description: draft.short_description,
            full_description: draft.full_description,
            thumbnail_url: draft.thumbnail_url,
        }
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn workspace_id(&self) -> &WorkspaceId {
        &self.workspace_id
    }

    fn apply(&mut self, patch: ProductPatch) {
        if let Some(value) = patch.name {
            self.name = value;
        }
        if let Some(value) = patch.regular_price {
            self.regular_price = value;
        }
        if let Some(value) = patch.sale_price {
            self.sale_price = value;
        }
        if let Some(value) = patch.short_description {
            self.short_description = value;
        }
        if let Some(value) = patch.full_description {
            self.full_description = value;
        }
        if let Some(value) = patch.thumbnail_url {
            self.thumbnail_url = value;
        }
    }
}
