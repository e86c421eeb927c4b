//! Cross-module scenario tests.

mod retrieval_ranking;
