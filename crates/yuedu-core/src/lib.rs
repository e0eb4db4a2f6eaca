pub mod annotation;
pub mod article;
pub mod cache;
pub mod language;
pub mod lookup;
pub mod placement;
pub mod response;

pub use annotation::{MarkerPair, Segment, SegmentKind, parse_line, strip_markers};
pub use article::Article;
pub use cache::TermCache;
pub use lookup::{ClickOutcome, Completion, LookupController, LookupRequest};
pub use placement::{PopupPlacement, compute_position};
pub use response::parse_term_response;
