//! Text-to-file attribution: the instant hash index and the sliding-window matcher.

pub mod fingerprint;
pub mod instant;
pub mod normalize;
pub mod sliding;

pub use instant::{IndexStats, InstantMatcher, MatchCandidate};
pub use normalize::{has_code_indicators, normalize};
pub use sliding::{sliding_window_score, CachedFile, CodeMatcher};
