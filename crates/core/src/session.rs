//! Login session and the route guard built on it.
//!
//! A [`Session`] is the token and profile returned by the gateway's login route. It is kept by
//! a [`SessionStore`]: a JSON file for the terminal dashboard, memory for tests. The
//! [`SessionContext`] reads the store once when it is opened and writes it on login and
//! logout.

use crate::gateway::{Credentials, Gateway, Transport};
use crate::models::UserProfile;
use crate::{ClinicError, ClinicResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

pub trait SessionStore {
    fn load(&self) -> ClinicResult<Option<Session>>;
    fn save(&self, session: &Session) -> ClinicResult<()>;
    fn clear(&self) -> ClinicResult<()>;
}

/// Session persisted as a JSON document at a fixed path.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    /// A missing file is no session. An unreadable document is discarded with a warning.
    fn load(&self) -> ClinicResult<Option<Session>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClinicError::SessionRead(e)),
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable session file: {e}");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> ClinicResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(ClinicError::SessionWrite)?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json).map_err(ClinicError::SessionWrite)
    }

    fn clear(&self) -> ClinicResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClinicError::SessionWrite(e)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ClinicResult<Option<Session>> {
        Ok(self.slot().clone())
    }

    fn save(&self, session: &Session) -> ClinicResult<()> {
        *self.slot() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> ClinicResult<()> {
        *self.slot() = None;
        Ok(())
    }
}

pub struct SessionContext<S> {
    store: S,
    current: Option<Session>,
}

impl<S: SessionStore> SessionContext<S> {
    /// Read the stored session, if any.
    pub fn open(store: S) -> ClinicResult<Self> {
        let current = store.load()?;
        tracing::debug!(logged_in = current.is_some(), "session opened");
        Ok(Self { store, current })
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn require(&self) -> ClinicResult<&Session> {
        self.current.as_ref().ok_or(ClinicError::NotAuthenticated)
    }

    /// Log in through the gateway and persist the resulting session.
    pub async fn login<T: Transport>(
        &mut self,
        gateway: &Gateway<T>,
        credentials: &Credentials,
    ) -> ClinicResult<&Session> {
        let response = gateway.login(credentials).await?;
        let session = Session {
            token: response.token,
            user: response.user,
        };
        self.store.save(&session)?;
        tracing::info!(user = %session.user.email, "logged in");
        Ok(self.current.insert(session))
    }

    pub fn logout(&mut self) -> ClinicResult<()> {
        self.store.clear()?;
        self.current = None;
        Ok(())
    }

    /// Attach the session token to `gateway`.
    pub fn authorize<T: Transport>(&self, gateway: Gateway<T>) -> ClinicResult<Gateway<T>> {
        Ok(gateway.with_token(self.require()?.token.clone()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Patients,
    Consultations,
    Examens,
    RendezVous,
    Users,
}

impl Route {
    pub fn is_protected(self) -> bool {
        self != Route::Login
    }
}

/// Where a navigation to `requested` actually lands.
pub fn resolve_route(requested: Route, logged_in: bool) -> Route {
    match (requested, logged_in) {
        (Route::Login, true) => Route::Dashboard,
        (route, false) if route.is_protected() => Route::Login,
        (route, _) => route,
    }
}
