pub mod corpus;
pub mod movie;
pub mod recommendation;

pub use corpus::Corpus;
pub use movie::Movie;
pub use recommendation::{MatchTier, Recommendation};
