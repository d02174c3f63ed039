//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep in step with the SQL; `diesel print-schema` against a migrated
//! database regenerates the same shapes.

diesel::table! {
    /// Registered accounts. `username` and `email` carry unique constraints.
    users (id) {
        id -> Uuid,
        #[max_length = 64]
        username -> Varchar,
        #[max_length = 320]
        email -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outstanding reset codes, stored as SHA-256 hex digests.
    password_resets (digest) {
        #[max_length = 64]
        digest -> Varchar,
        user_id -> Uuid,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    workspaces (id) {
        id -> Uuid,
        #[max_length = 120]
        name -> Varchar,
        #[max_length = 240]
        slug -> Varchar,
        owner_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Clients; `seq` preserves insertion order within a workspace.
    clients (id) {
        id -> Uuid,
        seq -> Int8,
        workspace_id -> Uuid,
        #[max_length = 160]
        full_name -> Varchar,
        #[max_length = 40]
        phone -> Nullable<Varchar>,
        #[max_length = 320]
        email -> Nullable<Varchar>,
        date_of_birth -> Nullable<Date>,
        #[max_length = 80]
        country -> Nullable<Varchar>,
        #[max_length = 32]
        kind -> Varchar,
        #[max_length = 16]
        document_type -> Varchar,
        #[max_length = 32]
        document_number -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Products; `seq` preserves insertion order within a workspace.
    products (id) {
        id -> Uuid,
        seq -> Int8,
        workspace_id -> Uuid,
        #[max_length = 160]
        name -> Varchar,
        regular_price -> Nullable<Float8>,
        sale_price -> Nullable<Float8>,
        #[max_length = 280]
        short_description -> Nullable<Varchar>,
        full_description -> Nullable<Text>,
        #[max_length = 2048]
        thumbnail_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(password_resets -> users (user_id));
diesel::joinable!(workspaces -> users (owner_id));
diesel::joinable!(clients -> workspaces (workspace_id));
diesel::joinable!(products -> workspaces (workspace_id));

diesel::allow_tables_to_appear_in_same_query!(users, password_resets, workspaces, clients, products);
