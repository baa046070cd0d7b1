// Review Themes: summarized themes from customer reviews
//
// This is the library root. Each module corresponds to a stage of the
// analysis pipeline or the plumbing around it.

pub mod clustering;
pub mod config;
pub mod embedding;
pub mod error;
pub mod keyphrases;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod summary;
