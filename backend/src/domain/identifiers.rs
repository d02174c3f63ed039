//! UUID-backed identifier newtypes.
//!
//! Each identifier serialises as its canonical hyphenated string and rejects
//! anything that does not parse as a UUID.

use thiserror::Error;

/// Failure to parse an identifier from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("{kind} id must not be empty")]
    Empty { kind: &'static str },
    #[error("{kind} id must be a valid UUID")]
    Invalid { kind: &'static str },
}

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Parse an identifier from its textual form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, $crate::domain::IdentifierError> {
                let raw = raw.as_ref();
                if raw.trim().is_empty() {
                    return Err($crate::domain::IdentifierError::Empty { kind: $kind });
                }
                uuid::Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| $crate::domain::IdentifierError::Invalid { kind: $kind })
            }

            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::IdentifierError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

define_uuid_id!(
    /// Stable user identifier.
    UserId,
    "user"
);

define_uuid_id!(
    /// Stable workspace identifier.
    WorkspaceId,
    "workspace"
);

define_uuid_id!(
    /// Identifier shared by workspace-scoped records (clients and products).
    RecordId,
    "record"
);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn parses_canonical_uuid() {
        let uuid = Uuid::new_v4();
        let id = UserId::new(uuid.to_string()).expect("valid id");
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[rstest]
    #[case("", IdentifierError::Empty { kind: "workspace" })]
    #[case("   ", IdentifierError::Empty { kind: "workspace" })]
    #[case("abc", IdentifierError::Invalid { kind: "workspace" })]
    fn rejects_malformed_input(#[case] raw: &str, #[case] expected: IdentifierError) {
        assert_eq!(WorkspaceId::new(raw), Err(expected));
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = RecordId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialise id");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
