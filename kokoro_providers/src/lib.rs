#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Remote clients for the kokoro chat service.
//!
//! [`GptAiClient`] speaks the service's two endpoints: the server-sent
//! event stream that delivers assistant replies fragment by fragment, and
//! the multipart file upload.

mod gpt_ai;
mod sse;

pub use gpt_ai::GptAiClient;
