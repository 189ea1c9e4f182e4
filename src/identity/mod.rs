//! Session-scoped identity: token validation, session-store mirroring and the
//! authentication state consumed by UI-level access control.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod session;
mod state;
mod token;

pub use principal::{Principal, UserRole};
pub use session::{
    MemorySessionStore, SessionStore, KEY_COURSE_ID, KEY_DISCIPLINES, KEY_EMAIL, KEY_NAME,
    KEY_TOKEN, KEY_USER_ID,
};
pub use state::{
    AuthIdentity, AuthState, AuthStateProvider, CoordinatorAuth, Navigator, StudentAuth,
    ThemeService,
};
pub use token::{issue_token, validate_token, Claims, TokenError};
