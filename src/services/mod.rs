pub mod neighbors;
pub mod recommendations;
pub mod related;
pub mod session;

pub use neighbors::{rank, Neighbor};
pub use recommendations::{evaluate, recommend, PageRequest, RecommendationPage};
pub use related::{RelatedSongs, RelatedSongsResolver};
pub use session::{Advance, RecommendationSession, PAGE_SIZE};
