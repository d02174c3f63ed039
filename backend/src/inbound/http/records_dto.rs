//! Request bodies for client and product endpoints.
//!
//! One body type serves both create and update. On create, absent and
//! `null` fields mean "not provided". On update, absent fields are left
//! unchanged and `null` clears an optional field.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ClientDraft, ClientInput, ClientKind, ClientPatch, ClientPatchInput, FieldError,
    ProductDraft, ProductInput, ProductPatch, ProductPatchInput,
};

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn flat(value: &Option<Option<String>>) -> Option<&str> {
    value.as_ref().and_then(|inner| inner.as_deref())
}

fn nested(value: &Option<Option<String>>) -> Option<Option<&str>> {
    value.as_ref().map(|inner| inner.as_deref())
}

/// A present field that does not accept `null`.
fn non_null<'a>(
    value: &'a Option<Option<String>>,
    field: &'static str,
) -> Result<Option<&'a str>, FieldError> {
    match value {
        None => Ok(None),
        Some(Some(inner)) => Ok(Some(inner.as_str())),
        Some(None) => Err(FieldError::new(
            field,
            "required",
            format!("{field} must not be null"),
        )),
    }
}

fn parse_kind(raw: Option<&str>) -> Result<Option<ClientKind>, FieldError> {
    raw.map(|value| {
        ClientKind::parse(value.trim()).ok_or_else(|| {
            FieldError::new(
                "kind",
                "invalid_kind",
                "kind must be customer, supplier or customer_supplier",
            )
        })
    })
    .transpose()
}

/// Client fields accepted by create and update.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientBody {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "María Gómez")]
    pub full_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "1990-04-12")]
    pub date_of_birth: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<ClientKind>)]
    pub kind: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "DNI")]
    pub document_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub document_number: Option<Option<String>>,
}

impl ClientBody {
    pub fn to_draft(&self) -> Result<ClientDraft, FieldError> {
        ClientDraft::try_from_input(ClientInput {
            full_name: flat(&self.full_name),
            phone: flat(&self.phone),
            email: flat(&self.email),
            date_of_birth: flat(&self.date_of_birth),
            country: flat(&self.country),
            kind: parse_kind(flat(&self.kind))?,
            document_type: flat(&self.document_type),
            document_number: flat(&self.document_number),
        })
    }

    pub fn to_patch(&self) -> Result<ClientPatch, FieldError> {
        ClientPatch::try_from_input(ClientPatchInput {
            full_name: non_null(&self.full_name, "fullName")?,
            phone: nested(&self.phone),
            email: nested(&self.email),
            date_of_birth: nested(&self.date_of_birth),
            country: nested(&self.country),
            kind: parse_kind(non_null(&self.kind, "kind")?)?,
            document_type: non_null(&self.document_type, "documentType")?,
            document_number: nested(&self.document_number),
        })
    }
}

/// Product fields accepted by create and update.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductBody {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "Espresso beans 1kg")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>, example = 24.5)]
    pub regular_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<f64>)]
    pub sale_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub short_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub full_description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "https://cdn.example.com/beans.png")]
    pub thumbnail_url: Option<Option<String>>,
}

impl ProductBody {
    pub fn to_draft(&self) -> Result<ProductDraft, FieldError> {
        ProductDraft::try_from_input(ProductInput {
            name: flat(&self.name),
            regular_price: self.regular_price.flatten(),
            sale_price: self.sale_price.flatten(),
            short_description: flat(&self.short_description),
            full_description: flat(&self.full_description),
            thumbnail_url: flat(&self.thumbnail_url),
        })
    }

    pub fn to_patch(&self) -> Result<ProductPatch, FieldError> {
        ProductPatch::try_from_input(ProductPatchInput {
            name: non_null(&self.name, "name")?,
            regular_price: self.regular_price,
            sale_price: self.sale_price,
            short_description: nested(&self.short_description),
            full_description: nested(&self.full_description),
            thumbnail_url: nested(&self.thumbnail_url),
        })
    }
}
