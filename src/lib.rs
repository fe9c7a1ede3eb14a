//! Email triage service: classifies email text as productive or unproductive
//! and suggests a reply, using a language model behind a tolerant parser.

pub mod ai;
pub mod app;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod http;
pub mod infrastructure;
