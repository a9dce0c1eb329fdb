//! Authentication lifecycle: state machine, effect pipeline, facade.

pub mod actions;
pub mod effects;
pub mod messages;
pub mod reducer;
pub mod service;
pub mod state;

pub use actions::AuthAction;
pub use effects::EXPIRY_TIMER;
pub use reducer::AuthReducer;
pub use service::AuthService;
pub use state::{AuthPhase, AuthState, UserSession};
