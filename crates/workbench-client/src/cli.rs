//! The `workbench` command line.
//!
//! Parsing lives here rather than in the binary so commands can be exercised
//! with [`clap::Parser::try_parse_from`] and an in-memory writer.
//!
//! ```text
//! workbench login ada --password secret
//! workbench workspaces create "My Team"
//! workbench workspaces select 6f1c2a9e-8a0b-4f6e-9d51-3b7c1e2f4a5d
//! workbench clients create --full-name "Ana Díaz" --kind supplier
//! workbench products update <id> --sale-price 9.5 --clear thumbnail-url
//! ```

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::{ClientError, SessionError};
use crate::models::{ClientFields, ClientKind, Deleted, ProductFields, Workspace};
use crate::session::SessionStore;

/// Server used when neither `--url` nor `WORKBENCH_URL` is given.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";

/// Session file location relative to the home directory.
pub const SESSION_FILE_IN_HOME: &str = ".workbench/session.json";

/// Errors reported by the command line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("cannot locate a session file: pass --session-file or set HOME")]
    NoSessionPath,
    #[error("--{field} cannot be both set and cleared")]
    ConflictingField { field: &'static str },
    #[error("failed to write output: {message}")]
    Output { message: String },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Output {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "workbench", version, about = "Workbench CRM client")]
pub struct Cli {
    /// Base URL of the Workbench server.
    #[arg(long, env = "WORKBENCH_URL", default_value = DEFAULT_SERVER_URL)]
    pub url: String,
    /// Where the session is stored [default: ~/.workbench/session.json].
    #[arg(long, env = "WORKBENCH_SESSION_FILE")]
    pub session_file: Option<Utf8PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with a username or email.
    Login {
        identifier: String,
        #[arg(long, env = "WORKBENCH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        username: String,
        email: String,
        #[arg(long, env = "WORKBENCH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Ask for a password reset code.
    ForgotPassword { email: String },
    /// Redeem a reset code.
    ResetPassword {
        code: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Change the signed-in user's password.
    ChangePassword {
        #[arg(long)]
        current: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    /// Show the signed-in user.
    Whoami,
    /// Create, list and select workspaces.
    Workspaces {
        #[command(subcommand)]
        command: WorkspaceCommand,
    },
    /// Manage clients in the selected workspace.
    Clients {
        #[command(subcommand)]
        command: ClientCommand,
    },
    /// Manage products in the selected workspace.
    Products {
        #[command(subcommand)]
        command: ProductCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum WorkspaceCommand {
    /// List owned workspaces; the selected one is starred.
    List,
    Create { name: String },
    /// Use a workspace for client and product commands.
    Select { id: Uuid },
    /// Show the selected workspace.
    Show,
}

#[derive(Debug, Subcommand)]
pub enum ClientCommand {
    List,
    Create(ClientArgs),
    Get {
        id: Uuid,
    },
    /// Change the given fields; others are left alone.
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: ClientArgs,
        /// Optional fields to clear.
        #[arg(long, value_enum)]
        clear: Vec<ClientField>,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List,
    Create(ProductArgs),
    Get {
        id: Uuid,
    },
    /// Change the given fields; others are left alone.
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: ProductArgs,
        /// Optional fields to clear.
        #[arg(long, value_enum)]
        clear: Vec<ProductField>,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Default, Args)]
pub struct ClientArgs {
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    /// ISO date, e.g. 1990-04-12.
    #[arg(long)]
    pub date_of_birth: Option<NaiveDate>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long, value_enum)]
    pub kind: Option<ClientKind>,
    /// Document type such as DNI.
    #[arg(long)]
    pub document_type: Option<String>,
    #[arg(long)]
    pub document_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClientField {
    Phone,
    Email,
    DateOfBirth,
    Country,
    DocumentNumber,
}

#[derive(Debug, Default, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub regular_price: Option<f64>,
    #[arg(long)]
    pub sale_price: Option<f64>,
    #[arg(long)]
    pub short_description: Option<String>,
    #[arg(long)]
    pub full_description: Option<String>,
    #[arg(long)]
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProductField {
    RegularPrice,
    SalePrice,
    ShortDescription,
    FullDescription,
    ThumbnailUrl,
}

/// Double-option field value: omitted, set, or cleared with `null`.
fn settable<T>(
    value: Option<T>,
    cleared: bool,
    field: &'static str,
) -> Result<Option<Option<T>>, CliError> {
    match (value, cleared) {
        (Some(_), true) => Err(CliError::ConflictingField { field }),
        (Some(value), false) => Ok(Some(Some(value))),
        (None, true) => Ok(Some(None)),
        (None, false) => Ok(None),
    }
}

impl ClientArgs {
    /// Build the request fields, clearing the listed optional fields.
    pub fn into_fields(self, clear: &[ClientField]) -> Result<ClientFields, CliError> {
        let cleared = |field| clear.contains(&field);
        Ok(ClientFields {
            full_name: self.full_name,
            phone: settable(self.phone, cleared(ClientField::Phone), "phone")?,
            email: settable(self.email, cleared(ClientField::Email), "email")?,
            date_of_birth: settable(
                self.date_of_birth,
                cleared(ClientField::DateOfBirth),
                "date-of-birth",
            )?,
            country: settable(self.country, cleared(ClientField::Country), "country")?,
            kind: self.kind,
            document_type: self.document_type,
            document_number: settable(
                self.document_number,
                cleared(ClientField::DocumentNumber),
                "document-number",
            )?,
        })
    }
}

impl ProductArgs {
    /// Build the request fields, clearing the listed optional fields.
    pub fn into_fields(self, clear: &[ProductField]) -> Result<ProductFields, CliError> {
        let cleared = |field| clear.contains(&field);
        Ok(ProductFields {
            name: self.name,
            regular_price: settable(
                self.regular_price,
                cleared(ProductField::RegularPrice),
                "regular-price",
            )?,
            sale_price: settable(self.sale_price, cleared(ProductField::SalePrice), "sale-price")?,
            short_description: settable(
                self.short_description,
                cleared(ProductField::ShortDescription),
                "short-description",
            )?,
            full_description: settable(
                self.full_description,
                cleared(ProductField::FullDescription),
                "full-description",
            )?,
            thumbnail_url: settable(
                self.thumbnail_url,
                cleared(ProductField::ThumbnailUrl),
                "thumbnail-url",
            )?,
        })
    }
}

/// Resolve the session file: the explicit path, else `$HOME/.workbench`.
pub fn session_path(
    explicit: Option<Utf8PathBuf>,
    home: Option<&str>,
) -> Result<Utf8PathBuf, CliError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    match home {
        Some(home) if !home.trim().is_empty() => {
            Ok(Utf8PathBuf::from(home).join(SESSION_FILE_IN_HOME))
        }
        _ => Err(CliError::NoSessionPath),
    }
}

/// Execute one command, writing its result to `out`.
pub async fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let home = std::env::var("HOME").ok();
    let path = session_path(cli.session_file, home.as_deref())?;
    let store = SessionStore::open(&path)?;
    let mut api = ApiClient::new(&cli.url, store)?;

    match cli.command {
        Command::Login {
            identifier,
            password,
        } => {
            let user = api.login(&identifier, &password).await?;
            writeln!(out, "signed in as {} <{}>", user.username, user.email)?;
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let user = api.register(&username, &email, &password).await?;
            writeln!(out, "registered {} <{}>", user.username, user.email)?;
        }
        Command::Logout => {
            api.logout()?;
            writeln!(out, "signed out")?;
        }
        Command::ForgotPassword { email } => {
            api.forgot_password(&email).await?;
            writeln!(out, "if {email} is registered, a reset code is on its way")?;
        }
        Command::ResetPassword {
            code,
            password,
            confirm,
        } => {
            let user = api.reset_password(&code, &password, &confirm).await?;
            writeln!(out, "password reset; signed in as {}", user.username)?;
        }
        Command::ChangePassword {
            current,
            password,
            confirm,
        } => {
            api.change_password(&current, &password, &confirm).await?;
            writeln!(out, "password changed")?;
        }
        Command::Whoami => {
            let user = api.current_user().await?;
            writeln!(out, "{} <{}> {}", user.username, user.email, user.id)?;
        }
        Command::Workspaces { command } => run_workspaces(&mut api, command, out).await?,
        Command::Clients { command } => run_clients(&mut api, command, out).await?,
        Command::Products { command } => run_products(&mut api, command, out).await?,
    }
    Ok(())
}

async fn run_workspaces(
    api: &mut ApiClient,
    command: WorkspaceCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        WorkspaceCommand::List => {
            let workspaces = api.list_workspaces().await?;
            let selected = api.session_store().workspace().map(|w| w.id);
            for workspace in &workspaces {
                let marker = if Some(workspace.id) == selected { '*' } else { ' ' };
                writeln!(out, "{marker} {}", workspace_line(workspace))?;
            }
        }
        WorkspaceCommand::Create { name } => {
            let workspace = api.create_workspace(&name).await?;
            writeln!(out, "created {}", workspace_line(&workspace))?;
        }
        WorkspaceCommand::Select { id } => {
            let workspace = api.select_workspace(id).await?;
            writeln!(out, "selected {}", workspace_line(&workspace))?;
        }
        WorkspaceCommand::Show => {
            let workspace = api.selected_workspace()?;
            writeln!(out, "{}", workspace_line(workspace))?;
        }
    }
    Ok(())
}

async fn run_clients(
    api: &mut ApiClient,
    command: ClientCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        ClientCommand::List => {
            for client in api.list_clients().await? {
                writeln!(out, "{}  {}", client.id, client.full_name)?;
            }
        }
        ClientCommand::Create(fields) => {
            let client = api.create_client(&fields.into_fields(&[])?).await?;
            write_record(out, &client)?;
        }
        ClientCommand::Get { id } => write_record(out, &api.get_client(id).await?)?,
        ClientCommand::Update { id, fields, clear } => {
            let client = api.update_client(id, &fields.into_fields(&clear)?).await?;
            write_record(out, &client)?;
        }
        ClientCommand::Delete { id } => write_deleted(out, &api.delete_client(id).await?)?,
    }
    Ok(())
}

async fn run_products(
    api: &mut ApiClient,
    command: ProductCommand,
    out: &mut impl Write,
) -> Result<(), CliError> {
    match command {
        ProductCommand::List => {
            for product in api.list_products().await? {
                writeln!(out, "{}  {}", product.id, product.name)?;
            }
        }
        ProductCommand::Create(fields) => {
            let product = api.create_product(&fields.into_fields(&[])?).await?;
            write_record(out, &product)?;
        }
        ProductCommand::Get { id } => write_record(out, &api.get_product(id).await?)?,
        ProductCommand::Update { id, fields, clear } => {
            let product = api.update_product(id, &fields.into_fields(&clear)?).await?;
            write_record(out, &product)?;
        }
        ProductCommand::Delete { id } => write_deleted(out, &api.delete_product(id).await?)?,
    }
    Ok(())
}

fn workspace_line(workspace: &Workspace) -> String {
    format!("{}  {}  {}", workspace.id, workspace.slug, workspace.name)
}

fn write_record(out: &mut impl Write, record: &impl Serialize) -> Result<(), CliError> {
    writeln!(out, "{}", serde_json::to_string_pretty(record)?)?;
    Ok(())
}

fn write_deleted(out: &mut impl Write, deleted: &Deleted) -> Result<(), CliError> {
    writeln!(out, "deleted {}", deleted.id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments parse")
    }

    #[rstest]
    fn url_defaults_to_localhost() {
        let cli = parse(&["workbench", "--session-file", "s.json", "logout"]);
        assert_eq!(cli.url, DEFAULT_SERVER_URL);
        assert!(matches!(cli.command, Command::Logout));
    }

    #[rstest]
    fn update_collects_fields_to_clear() {
        let cli = parse(&[
            "workbench",
            "clients",
            "update",
            "6f1c2a9e-8a0b-4f6e-9d51-3b7c1e2f4a5d",
            "--kind",
            "customer-supplier",
            "--clear",
            "phone",
            "--clear",
            "date-of-birth",
        ]);
        let Command::Clients {
            command: ClientCommand::Update { fields, clear, .. },
        } = cli.command
        else {
            panic!("expected clients update");
        };
        let fields = fields.into_fields(&clear).expect("no conflict");
        assert_eq!(fields.kind, Some(ClientKind::CustomerSupplier));
        assert_eq!(fields.phone, Some(None));
        assert_eq!(fields.date_of_birth, Some(None));
        assert_eq!(fields.email, None);
    }

    #[rstest]
    fn setting_and_clearing_one_field_is_rejected() {
        let args = ProductArgs {
            sale_price: Some(3.0),
            ..ProductArgs::default()
        };
        let result = args.into_fields(&[ProductField::SalePrice]);
        assert!(matches!(
            result,
            Err(CliError::ConflictingField {
                field: "sale-price"
            })
        ));
    }

    #[rstest]
    #[case(&["workbench", "clients", "get", "not-a-uuid"])]
    #[case(&["workbench", "clients", "create", "--date-of-birth", "12/04/1990"])]
    #[case(&["workbench", "clients", "create", "--kind", "partner"])]
    #[case(&["workbench", "products", "create", "--regular-price", "cheap"])]
    #[case(&["workbench", "workspaces"])]
    fn malformed_arguments_are_rejected(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[rstest]
    #[case(Some("/home/ada"), Some("/home/ada/.workbench/session.json"))]
    #[case(Some("  "), None)]
    #[case(None, None)]
    fn session_path_falls_back_to_home(
        #[case] home: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let resolved = session_path(None, home).ok();
        assert_eq!(resolved.as_deref().map(camino::Utf8Path::as_str), expected);
    }

    #[rstest]
    fn explicit_session_path_wins() {
        let resolved = session_path(Some(Utf8PathBuf::from("x.json")), Some("/home/ada"))
            .expect("explicit path");
        assert_eq!(resolved, Utf8PathBuf::from("x.json"));
    }

    #[rstest]
    #[tokio::test]
    async fn record_commands_refuse_without_a_session() {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = dir.path().join("session.json");
        let file = file.to_str().expect("utf-8 path");
        let cli = parse(&[
            "workbench",
            "--url",
            "http://127.0.0.1:9",
            "--session-file",
            file,
            "products",
            "list",
        ]);
        let mut out = Vec::new();
        let err = run(cli, &mut out).await.expect_err("guarded");
        assert_eq!(err.to_string(), "log in first");
        assert!(out.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn unusable_session_location_is_reported() {
        let blocker = tempfile::NamedTempFile::new().expect("temp file");
        let file = blocker.path().join("session.json");
        let file = file.to_str().expect("utf-8 path");
        let cli = parse(&["workbench", "--session-file", file, "whoami"]);
        let mut out = Vec::new();
        let err = run(cli, &mut out).await.expect_err("parent is a file");
        assert!(matches!(err, CliError::Session(SessionError::Io { .. })));
        assert!(out.is_empty());
    }
}
