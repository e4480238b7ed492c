//! Founder extraction pipeline for founderlens.
//!
//! This crate ties together page scraping, the model call, reply
//! normalization, and the results file into one run (see [`pipeline::run`]).

pub mod extraction;
pub mod normalize;
pub mod output;
pub mod pipeline;

pub use extraction::{FounderModel, ModelReply, OpenRouterModel, ask_founders, build_prompt};
pub use normalize::{ParsedReply, ReplyKind, classify, normalize};
pub use output::{render_results, write_results};
pub use pipeline::{RunOptions, RunOutcome, RunProgress, SilentProgress, run};
