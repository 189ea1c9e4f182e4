//! Session authentication state provider: the single authority for "who is
//! the current user", reconciling the persisted session store with a
//! verifiable token.
//!
//! Side effects are ordered: session fields are persisted before the
//! state-change notification, and the notification fires before any
//! caller-visible return.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::config::JwtSettings;
use crate::error::{AppError, AppResult};
use crate::idlist;
use crate::tprintln;

use super::principal::Principal;
use super::session::{
    SessionStore, KEY_COURSE_ID, KEY_DISCIPLINES, KEY_EMAIL, KEY_NAME, KEY_TOKEN, KEY_USER_ID,
};
use super::token::validate_token;

/// Derived, non-persisted view of the session: recomputed on demand from the
/// session store, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(Principal),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            AuthState::Authenticated(p) => Some(p),
            AuthState::Anonymous => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CoordinatorAuth {
    pub coordinator_id: Uuid,
    pub name: String,
    pub email: String,
    pub course_id: Uuid,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct StudentAuth {
    pub student_id: Uuid,
    pub name: String,
    pub email: String,
    pub course_id: Uuid,
    pub disciplines: Vec<Uuid>,
    pub token: String,
}

/// The two identity shapes accepted at login. Closed set: dispatch is an
/// exhaustive match, not runtime type inspection.
#[derive(Debug, Clone)]
pub enum AuthIdentity {
    Coordinator(CoordinatorAuth),
    Student(StudentAuth),
}

/// Route-change collaborator, fire-and-forget from this component's view.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate_to(&self, route: &str) -> AppResult<()>;
}

/// Visual-preference collaborator consumed on logout.
#[async_trait]
pub trait ThemeService: Send + Sync {
    async fn reset_theme(&self) -> AppResult<()>;
}

type AuthObserver = Box<dyn Fn(&AuthState) + Send + Sync>;

pub struct AuthStateProvider {
    settings: JwtSettings,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    theme: Arc<dyn ThemeService>,
    observers: RwLock<Vec<AuthObserver>>,
}

impl AuthStateProvider {
    pub fn new(
        settings: JwtSettings,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        theme: Arc<dyn ThemeService>,
    ) -> Self {
        Self { settings, store, navigator, theme, observers: RwLock::new(Vec::new()) }
    }

    /// Register an observer. It is invoked after every login and logout with
    /// the state current at that point.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        self.observers.write().push(Box::new(observer));
    }

    fn publish(&self, state: &AuthState) {
        for obs in self.observers.read().iter() {
            obs(state);
        }
    }

    /// Current authentication state. Fail-safe by contract: an absent token,
    /// a store failure and an invalid token all collapse to `Anonymous`.
    /// This never returns an error; the UI must always get a usable state.
    pub async fn current_state(&self) -> AuthState {
        let token = match self.store.get(KEY_TOKEN).await {
            Ok(Some(t)) => t,
            Ok(None) | Err(_) => return AuthState::Anonymous,
        };
        match validate_token(&self.settings, &token) {
            Ok(principal) => AuthState::Authenticated(principal),
            Err(_) => AuthState::Anonymous,
        }
    }

    /// Persist the identity into the session store field by field, then
    /// re-validate the freshly stored token and publish the authenticated
    /// state. Validation failures propagate here: the token was written by
    /// our own login flow, so a mismatch is a configuration defect worth
    /// surfacing.
    pub async fn mark_authenticated(&self, identity: AuthIdentity) -> AppResult<AuthState> {
        match &identity {
            AuthIdentity::Coordinator(c) => {
                self.store.set(KEY_USER_ID, &c.coordinator_id.to_string()).await?;
                self.store.set(KEY_EMAIL, &c.email).await?;
                self.store.set(KEY_NAME, &c.name).await?;
                self.store.set(KEY_COURSE_ID, &c.course_id.to_string()).await?;
                self.store.set(KEY_TOKEN, &c.token).await?;
            }
            AuthIdentity::Student(s) => {
                self.store.set(KEY_USER_ID, &s.student_id.to_string()).await?;
                self.store.set(KEY_EMAIL, &s.email).await?;
                self.store.set(KEY_NAME, &s.name).await?;
                self.store.set(KEY_COURSE_ID, &s.course_id.to_string()).await?;
                self.store.set(KEY_DISCIPLINES, &idlist::join(&s.disciplines)).await?;
                self.store.set(KEY_TOKEN, &s.token).await?;
            }
        }

        // Validate what was actually stored, so the state published here is
        // exactly what a later current_state() will recompute.
        let stored = self
            .store
            .get(KEY_TOKEN)
            .await?
            .ok_or_else(|| AppError::internal("token_missing".to_string(), "token vanished after write".to_string()))?;
        let principal = validate_token(&self.settings, &stored)?;

        tprintln!("auth.login user={} role={}", principal.user_id, principal.role.as_str());
        let state = AuthState::Authenticated(principal);
        self.publish(&state);
        Ok(state)
    }

    /// Clear the session store, reset the theme, navigate to the root route
    /// and publish the anonymous state, in that order.
    pub async fn logout(&self) -> AppResult<()> {
        self.store.clear().await?;
        self.theme.reset_theme().await?;
        self.navigator.navigate_to("/").await?;
        tprintln!("auth.logout");
        self.publish(&AuthState::Anonymous);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserRole;

    #[test]
    fn auth_state_accessors() {
        let anon = AuthState::Anonymous;
        assert!(!anon.is_authenticated());
        assert!(anon.principal().is_none());

        let p = Principal { user_id: Uuid::new_v4(), role: UserRole::Student };
        let state = AuthState::Authenticated(p.clone());
        assert!(state.is_authenticated());
        assert_eq!(state.principal(), Some(&p));
    }
}
