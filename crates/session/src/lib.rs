mod events;
mod session;

pub use events::SessionEvent;
pub use session::{GameSession, SessionSnapshot, SessionStatus};
