pub mod alias;
pub mod fuzzy;
pub mod normalize;
pub mod similarity;

pub use alias::AliasTable;
pub use fuzzy::{FuzzyMatcher, MatchCandidate};
pub use normalize::normalize;
pub use similarity::similarity;
