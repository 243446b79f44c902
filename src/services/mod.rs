pub mod poster_cache;
pub mod providers;
pub mod recommender;
pub mod resolver;
pub mod similarity;
pub mod vectorizer;

pub use poster_cache::PosterCache;
pub use providers::tmdb::TmdbProvider;
pub use providers::PosterProvider;
pub use recommender::{
    RecommendOutcome, RecommendationEngine, RecommendationSet, DEFAULT_RECOMMENDATIONS,
};
pub use resolver::{Resolution, ResolverOptions, TitleResolver};
pub use similarity::SimilarityMatrix;
pub use vectorizer::{TermVector, TfidfVectorizer};
