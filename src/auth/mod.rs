pub mod config;
pub mod extractors;
pub mod middleware;
pub mod otp;
pub mod principal;
pub mod session;

pub use config::{SessionConfig, SESSION_COOKIE};
pub use extractors::{MaybeSession, PrincipalExtractor, ProviderPrincipal, UserPrincipal};
pub use middleware::{CurrentSession, SessionLayer};
pub use principal::Principal;
pub use session::{SessionData, SessionStore};
