pub mod claims;
pub mod guard;
pub mod identity;
pub mod session;
pub mod store;
pub mod token;

pub use claims::Claims;
pub use guard::{home_area, Area, GuardOutcome};
pub use identity::Identity;
pub use session::{Credentials, Session, SessionState};
pub use store::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
