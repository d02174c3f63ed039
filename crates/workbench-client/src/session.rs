//! The persisted session holder.
//!
//! One JSON file holds the bearer token, the user it was issued to and the
//! selected workspace:
//!
//! ```text
//! {"version": 1, "token": "...", "user": {...}, "workspace": {...}}
//! ```
//!
//! A missing, unreadable or unknown-version file is treated as "no session".
//! Writes go to a temporary sibling file which is then renamed over the
//! target, so a crash never leaves a half-written session behind.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::SessionError;
use crate::models::{AuthSession, User, Workspace};

/// Schema version written to the session file.
pub const SESSION_FILE_VERSION: u32 = 1;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<AuthSession> for Session {
    fn from(value: AuthSession) -> Self {
        Self {
            token: value.jwt,
            user: value.user,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    workspace: Option<Workspace>,
}

struct Backing {
    dir: Dir,
    file_name: String,
    path: Utf8PathBuf,
}

/// Session token, user snapshot and selected workspace.
///
/// The workspace can only be set while a session exists, and logging in as
/// a different user drops it.
pub struct SessionStore {
    session: Option<Session>,
    workspace: Option<Workspace>,
    backing: Option<Backing>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.session.as_ref().map(|s| &s.user.username))
            .field("workspace", &self.workspace.as_ref().map(|w| &w.slug))
            .field("path", &self.backing.as_ref().map(|b| &b.path))
            .finish()
    }
}

impl SessionStore {
    /// Store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            session: None,
            workspace: None,
            backing: None,
        }
    }

    /// Open the session file at `path`, creating its directory if needed.
    ///
    /// # Errors
    /// [`SessionError::Io`] when the directory cannot be created or opened,
    /// [`SessionError::InvalidPath`] when `path` has no file name.
    pub fn open(path: &Utf8Path) -> Result<Self, SessionError> {
        let Some(file_name) = path.file_name() else {
            return Err(SessionError::InvalidPath {
                path: path.to_path_buf(),
            });
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let io_error = |err: io::Error| SessionError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        };
        Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;

        let mut store = Self::in_memory();
        if let Some(file) = read_session_file(&dir, file_name, path) {
            store.session = match (file.token, file.user) {
                (Some(token), Some(user)) => Some(Session { token, user }),
                _ => None,
            };
            store.workspace = store.session.as_ref().and(file.workspace);
        }
        store.backing = Some(Backing {
            dir,
            file_name: file_name.to_owned(),
            path: path.to_path_buf(),
        });
        Ok(store)
    }

    /// The active session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The selected workspace, if any.
    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    /// Replace the session after a successful sign-in.
    ///
    /// The selected workspace survives only when the same user signs in
    /// again.
    pub fn replace_session(&mut self, session: Session) -> Result<(), SessionError> {
        let same_user = self
            .session
            .as_ref()
            .is_some_and(|current| current.user.id == session.user.id);
        if !same_user {
            self.workspace = None;
        }
        self.session = Some(session);
        self.persist()
    }

    /// Select the workspace used by record commands.
    ///
    /// Returns `Ok(false)` without changing anything when logged out.
    pub fn select_workspace(&mut self, workspace: Workspace) -> Result<bool, SessionError> {
        if self.session.is_none() {
            return Ok(false);
        }
        self.workspace = Some(workspace);
        self.persist()?;
        Ok(true)
    }

    /// Forget the session and the selected workspace.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        self.session = None;
        self.workspace = None;
        self.persist()
    }

    /// Called when the server rejects the stored token.
    pub fn invalidate(&mut self) {
        if self.session.is_none() {
            return;
        }
        debug!("server rejected the stored token; clearing session");
        if let Err(err) = self.clear() {
            warn!(error = %err, "failed to persist cleared session");
        }
    }

    fn persist(&self) -> Result<(), SessionError> {
        let Some(backing) = &self.backing else {
            return Ok(());
        };
        let file = SessionFile {
            version: SESSION_FILE_VERSION,
            token: self.session.as_ref().map(|s| s.token.clone()),
            user: self.session.as_ref().map(|s| s.user.clone()),
            workspace: self.workspace.clone(),
        };
        let contents = serde_json::to_string_pretty(&file).map_err(|err| SessionError::Encode {
            message: err.to_string(),
        })?;
        write_atomic(backing, &contents)
    }
}

fn read_session_file(dir: &Dir, file_name: &str, path: &Utf8Path) -> Option<SessionFile> {
    let raw = match dir.read_to_string(file_name) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            warn!(path = %path, error = %err, "unreadable session file; starting logged out");
            return None;
        }
    };
    match serde_json::from_str::<SessionFile>(&raw) {
        Ok(file) if file.version == SESSION_FILE_VERSION => Some(file),
        Ok(file) => {
            warn!(path = %path, version = file.version, "unknown session file version; starting logged out");
            None
        }
        Err(err) => {
            warn!(path = %path, error = %err, "malformed session file; starting logged out");
            None
        }
    }
}

fn write_atomic(backing: &Backing, contents: &str) -> Result<(), SessionError> {
    let mut components = Utf8Path::new(&backing.file_name).components();
    let (Some(Utf8Component::Normal(file_name)), None) = (components.next(), components.next())
    else {
        return Err(SessionError::InvalidPath {
            path: backing.path.clone(),
        });
    };
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());
    let io_error = |err: io::Error| SessionError::Io {
        path: backing.path.clone(),
        message: err.to_string(),
    };

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let written = backing
        .dir
        .open_with(&tmp_name, &options)
        .and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        })
        .and_then(|()| backing.dir.rename(&tmp_name, &backing.dir, file_name));
    if let Err(err) = written {
        if backing.dir.remove_file(&tmp_name).is_err() {
            debug!(tmp = %tmp_name, "temporary session file already gone");
        }
        return Err(io_error(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;
    use uuid::Uuid;

    struct Paths {
        _dir: TempDir,
        file: Utf8PathBuf,
    }

    #[fixture]
    fn paths() -> Paths {
        let dir = tempfile::tempdir().expect("temp dir");
        let file = Utf8PathBuf::from_path_buf(dir.path().join("nested").join("session.json"))
            .expect("utf-8 temp path");
        Paths { _dir: dir, file }
    }

    fn user(name: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: name.to_owned(),
            email: format!("{name}@example.com"),
        }
    }

    fn workspace(owner: &User) -> Workspace {
        Workspace {
            id: Uuid::new_v4(),
            name: "Acme".to_owned(),
            slug: "acme".to_owned(),
            owner_id: owner.id,
            created_at: Utc::now(),
        }
    }

    fn session(user: &User) -> Session {
        Session {
            token: "token".to_owned(),
            user: user.clone(),
        }
    }

    #[rstest]
    fn missing_file_means_logged_out(paths: Paths) {
        let store = SessionStore::open(&paths.file).expect("open");
        assert!(store.session().is_none());
        assert!(store.workspace().is_none());
    }

    #[rstest]
    fn session_and_workspace_survive_reopening(paths: Paths) {
        let alice = user("alice");
        let acme = workspace(&alice);
        let mut store = SessionStore::open(&paths.file).expect("open");
        store.replace_session(session(&alice)).expect("persist");
        assert!(store.select_workspace(acme.clone()).expect("persist"));

        let reopened = SessionStore::open(&paths.file).expect("reopen");
        assert_eq!(reopened.session(), Some(&session(&alice)));
        assert_eq!(reopened.workspace(), Some(&acme));
    }

    #[rstest]
    fn selecting_a_workspace_requires_a_session(paths: Paths) {
        let mut store = SessionStore::open(&paths.file).expect("open");
        let selected = store
            .select_workspace(workspace(&user("alice")))
            .expect("no io");
        assert!(!selected);
        assert!(store.workspace().is_none());
    }

    #[rstest]
    fn a_different_user_signing_in_drops_the_workspace() {
        let alice = user("alice");
        let mut store = SessionStore::in_memory();
        store.replace_session(session(&alice)).expect("in memory");
        store.select_workspace(workspace(&alice)).expect("in memory");

        store.replace_session(session(&alice)).expect("in memory");
        assert!(store.workspace().is_some());

        store.replace_session(session(&user("bob"))).expect("in memory");
        assert!(store.workspace().is_none());
    }

    #[rstest]
    fn invalidate_clears_the_persisted_session(paths: Paths) {
        let alice = user("alice");
        let mut store = SessionStore::open(&paths.file).expect("open");
        store.replace_session(session(&alice)).expect("persist");
        store.select_workspace(workspace(&alice)).expect("persist");

        store.invalidate();

        let reopened = SessionStore::open(&paths.file).expect("reopen");
        assert!(reopened.session().is_none());
        assert!(reopened.workspace().is_none());
    }

    #[rstest]
    #[case(r#"{"version": 2, "token": "t", "user": {"id": "6f1c2a9e-8a0b-4f6e-9d51-3b7c1e2f4a5d", "username": "a", "email": "a@example.com"}}"#)]
    #[case("not json")]
    #[case(r#"{"version": 1, "token": "t"}"#)]
    fn unusable_files_mean_logged_out(paths: Paths, #[case] contents: &str) {
        let parent = paths.file.parent().expect("parent");
        std::fs::create_dir_all(parent).expect("mkdir");
        std::fs::write(&paths.file, contents).expect("seed file");

        let store = SessionStore::open(&paths.file).expect("open");
        assert!(store.session().is_none());
    }

    #[rstest]
    fn written_file_carries_the_schema_version(paths: Paths) {
        let mut store = SessionStore::open(&paths.file).expect("open");
        store.replace_session(session(&user("alice"))).expect("persist");

        let raw = std::fs::read_to_string(&paths.file).expect("read");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert_eq!(value["version"], SESSION_FILE_VERSION);
        assert_eq!(value["token"], "token");
        assert!(value["workspace"].is_null());
    }
}
