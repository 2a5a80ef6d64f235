//! Route-time authorization.

use std::sync::Mutex;

use thiserror::Error;

use crate::{Role, Route, Session, ENTRY_POINT};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// No role, or a role other than the required one. The two cases are
    /// deliberately indistinguishable to callers.
    #[error("access denied: requires role '{0}'")]
    Denied(Role),
}

/// Pure role-equality check against the session.
///
/// - No IO beyond reading the credential store
/// - No panics
pub fn authorize(session: &Session, required: Role) -> Result<(), AuthzError> {
    if session.role() == Some(required) {
        Ok(())
    } else {
        Err(AuthzError::Denied(required))
    }
}

/// Performs navigation on behalf of a guard.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Navigator that only remembers where it was sent.
///
/// Serves headless shells and tests.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visited().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.visited
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.to_string());
    }
}

/// Admits navigation for one required role; otherwise sends the user to
/// [`ENTRY_POINT`]. No return path is kept.
#[derive(Debug, Clone)]
pub struct AccessGuard<N> {
    required: Role,
    session: Session,
    navigator: N,
}

impl<N: Navigator> AccessGuard<N> {
    pub fn new(required: Role, session: Session, navigator: N) -> Self {
        Self {
            required,
            session,
            navigator,
        }
    }

    pub fn student(session: Session, navigator: N) -> Self {
        Self::new(Role::Student, session, navigator)
    }

    pub fn teacher(session: Session, navigator: N) -> Self {
        Self::new(Role::Teacher, session, navigator)
    }

    pub fn admin(session: Session, navigator: N) -> Self {
        Self::new(Role::Admin, session, navigator)
    }

    /// Guard for the role a route requires.
    pub fn for_route(route: Route, session: Session, navigator: N) -> Self {
        Self::new(route.required_role(), session, navigator)
    }

    pub fn required(&self) -> Role {
        self.required
    }

    pub fn can_enter(&self) -> bool {
        match authorize(&self.session, self.required) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!("{err}; redirecting to entry point");
                self.navigator.redirect(ENTRY_POINT);
                false
            }
        }
    }
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn redirect(&self, path: &str) {
        (**self).redirect(path)
    }
}

impl<N: Navigator + ?Sized> Navigator for std::sync::Arc<N> {
    fn redirect(&self, path: &str) {
        (**self).redirect(path)
    }
}
