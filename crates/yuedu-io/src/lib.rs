pub mod backend;
pub mod poll;
pub mod session;

pub use backend::{BackendClient, BackendError, validate_article_url};
pub use poll::{PollControl, PollHandle, spawn_poller};
pub use session::{SessionError, SessionKey, SessionStore};
