//! Typed access to the `/api/v1` surface.
//!
//! [`ApiClient`] owns the [`SessionStore`]: successful sign-ins overwrite it,
//! and any 401 answered to a request that carried the stored token clears it.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::envelope::{Envelope, decode_bare, decode_envelope};
use crate::error::{ApiError, ClientError};
use crate::models::{
    AuthSession, Client, ClientFields, Deleted, Product, ProductFields, User, Workspace,
};
use crate::session::{Session, SessionStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const API_PREFIX: &str = "/api/v1";

#[derive(serde::Deserialize)]
struct Acknowledged {
    ok: bool,
}

/// Client for one Workbench server.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client for `base_url` (for example `http://localhost:8080`).
    ///
    /// # Errors
    /// [`ClientError::Transport`] when the HTTP client cannot be built.
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.session
    }

    pub fn session_store_mut(&mut self) -> &mut SessionStore {
        &mut self.session
    }

    // Authentication

    /// Sign in with a username or email.
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<User, ClientError> {
        let request = self
            .request(Method::POST, "/auth/local")
            .json(&json!({ "identifier": identifier, "password": password }));
        self.sign_in(request, false).await
    }

    /// Create an account and sign in as it.
    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        let request = self
            .request(Method::POST, "/auth/local/register")
            .json(&json!({ "username": username, "email": email, "password": password }));
        self.sign_in(request, false).await
    }

    /// Ask for a reset code. The server accepts every request.
    pub async fn forgot_password(&mut self, email: &str) -> Result<bool, ClientError> {
        let request = self
            .request(Method::POST, "/auth/forgot-password")
            .json(&json!({ "email": email }));
        let body = self.execute(request, false).await?;
        let ack: Acknowledged = decode_bare(&body)?;
        Ok(ack.ok)
    }

    /// Redeem a reset code and sign in with the new password.
    pub async fn reset_password(
        &mut self,
        code: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<User, ClientError> {
        let request = self.request(Method::POST, "/auth/reset-password").json(&json!({
            "code": code,
            "password": password,
            "passwordConfirmation": confirmation,
        }));
        self.sign_in(request, false).await
    }

    /// Change the signed-in user's password.
    pub async fn change_password(
        &mut self,
        current: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<User, ClientError> {
        let request = self
            .authorised(Method::POST, "/auth/change-password")?
            .json(&json!({
                "currentPassword": current,
                "password": password,
                "passwordConfirmation": confirmation,
            }));
        self.sign_in(request, true).await
    }

    /// Fetch the account behind the stored token.
    pub async fn current_user(&mut self) -> Result<User, ClientError> {
        let request = self.authorised(Method::GET, "/users/me")?;
        let body = self.execute(request, true).await?;
        decode_bare(&body)
    }

    /// Forget the stored session. No request is sent.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session.clear()?;
        Ok(())
    }

    // Workspaces

    pub async fn list_workspaces(&mut self) -> Result<Vec<Workspace>, ClientError> {
        let request = self.authorised(Method::GET, "/workspaces")?;
        let body = self.execute(request, true).await?;
        decode_envelope(&body)
    }

    pub async fn create_workspace(&mut self, name: &str) -> Result<Workspace, ClientError> {
        let request = self
            .authorised(Method::POST, "/workspaces")?
            .json(&Envelope::new(json!({ "name": name })));
        let body = self.execute(request, true).await?;
        decode_envelope(&body)
    }

    pub async fn get_workspace(&mut self, id: Uuid) -> Result<Workspace, ClientError> {
        let request = self.authorised(Method::GET, &format!("/workspaces/{id}"))?;
        let body = self.execute(request, true).await?;
        decode_envelope(&body)
    }

    /// Check the workspace on the server, then remember it for record
    /// commands.
    pub async fn select_workspace(&mut self, id: Uuid) -> Result<Workspace, ClientError> {
        let workspace = self.get_workspace(id).await?;
        if !self.session.select_workspace(workspace.clone())? {
            return Err(ClientError::NotLoggedIn);
        }
        info!(workspace_id = %workspace.id, slug = %workspace.slug, "workspace selected");
        Ok(workspace)
    }

    /// The workspace record commands act on.
    ///
    /// # Errors
    /// [`ClientError::NotLoggedIn`] without a session,
    /// [`ClientError::NoWorkspaceSelected`] when none was chosen.
    pub fn selected_workspace(&self) -> Result<&Workspace, ClientError> {
        if self.session.session().is_none() {
            return Err(ClientError::NotLoggedIn);
        }
        self.session
            .workspace()
            .ok_or(ClientError::NoWorkspaceSelected)
    }

    // Clients

    pub async fn list_clients(&mut self) -> Result<Vec<Client>, ClientError> {
        self.list_records("clients").await
    }

    pub async fn create_client(&mut self, fields: &ClientFields) -> Result<Client, ClientError> {
        self.create_record("clients", fields).await
    }

    pub async fn get_client(&mut self, id: Uuid) -> Result<Client, ClientError> {
        self.get_record("clients", id).await
    }

    pub async fn update_client(
        &mut self,
        id: Uuid,
        fields: &ClientFields,
    ) -> Result<Client, ClientError> {
        self.update_record("clients", id, fields).await
    }

    pub async fn delete_client(&mut self, id: Uuid) -> Result<Deleted, ClientError> {
        self.delete_record("clients", id).await
    }

    // Products

    pub async fn list_products(&mut self) -> Result<Vec<Product>, ClientError> {
        self.list_records("products").await
    }

    pub async fn create_product(&mut self, fields: &ProductFields) -> Result<Product, ClientError> {
        self.create_record("products", fields).await
    }

    pub async fn get_product(&mut self, id: Uuid) -> Result<Product, ClientError> {
        self.get_record("products", id).await
    }

    pub async fn update_product(
        &mut self,
        id: Uuid,
        fields: &ProductFields,
    ) -> Result<Product, ClientError> {
        self.update_record("products", id, fields).await
    }

    pub async fn delete_product(&mut self, id: Uuid) -> Result<Deleted, ClientError> {
        self.delete_record("products", id).await
    }

    // Record plumbing shared by clients and products. Every record call
    // requires a selected workspace, including calls addressed by record id.

    async fn list_records<R: DeserializeOwned>(
        &mut self,
        collection: &str,
    ) -> Result<Vec<R>, ClientError> {
        let workspace_id = self.selected_workspace()?.id;
        let request = self.authorised(
            Method::GET,
            &format!("/workspaces/{workspace_id}/{collection}"),
        )?;
        let body = self.execute(request, true).await?;
        decode_envelope(&body)
    }

    async fn create_record<F: Serialize, R: DeserializeOwned>(
        &mut self,
        collection: &str,
        fields: &F,
    ) -> Result<R, ClientError> {
        let workspace_id = self.selected_workspace()?.id;
        let request = self
            .authorised(
                Method::POST,
                &format!("/workspaces/{workspace_id}/{collection}"),
            )?
            .json(&Envelope::new(fields));
        let body = self.execute(request, true).await?;
        decode_envelope(&body)
    }

    async fn get_record<R: DeserializeOwned>(
        &mut self,
        collection: &str,
        id: Uuid,
    ) -> Result<R, ClientError> {
        self.selected_workspace()?;
        let request = self.authorised(Method::GET, &format!("/{collection}/{id}"))?;
        let body = self.execute(request, true).await?;
        decode_envelope(&body)
    }

    async fn update_record<F: Serialize, R: DeserializeOwned>(
        &mut self,
        collection: &str,
        id: Uuid,
        fields: &F,
    ) -> Result<R, ClientError> {
        self.selected_workspace()?;
        let request = self
            .authorised(Method::PUT, &format!("/{collection}/{id}"))?
            .json(&Envelope::new(fields));
        let body = self.execute(request, true).await?;
        decode_envelope(&body)
    }

    async fn delete_record(&mut self, collection: &str, id: Uuid) -> Result<Deleted, ClientError> {
        self.selected_workspace()?;
        let request = self.authorised(Method::DELETE, &format!("/{collection}/{id}"))?;
        let body = self.execute(request, true).await?;
        decode_envelope(&body)
    }

    // Transport

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{API_PREFIX}{path}", self.base_url))
    }

    fn authorised(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let session = self.session.session().ok_or(ClientError::NotLoggedIn)?;
        Ok(self.request(method, path).bearer_auth(&session.token))
    }

    async fn sign_in(
        &mut self,
        request: RequestBuilder,
        with_bearer: bool,
    ) -> Result<User, ClientError> {
        let body = self.execute(request, with_bearer).await?;
        let auth: AuthSession = decode_bare(&body)?;
        let user = auth.user.clone();
        self.session.replace_session(Session::from(auth))?;
        info!(user_id = %user.id, username = %user.username, "signed in");
        Ok(user)
    }

    /// Send a request and return the body of a 2xx answer.
    ///
    /// A 401 clears the stored session when the request carried its token.
    async fn execute(
        &mut self,
        request: RequestBuilder,
        with_bearer: bool,
    ) -> Result<Vec<u8>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        if status.is_success() {
            return Ok(body.to_vec());
        }

        let error = serde_json::from_slice::<ApiError>(&body).unwrap_or_else(|_| {
            ApiError::from_status(status.as_u16(), &String::from_utf8_lossy(&body))
        });
        if status == StatusCode::UNAUTHORIZED && with_bearer {
            self.session.invalidate();
        }
        Err(ClientError::from_response(status.as_u16(), error))
    }
}
