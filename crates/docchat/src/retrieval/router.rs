//! Prompt-template routing
//!
//! Picks which template family answers a question, per the configured
//! [`RoutePolicy`]. Unknown or missing sources fall back to the prose
//! document template rather than failing the query.

use crate::config::RoutePolicy;
use crate::generation::PromptKind;
use crate::index::{SearchHit, SharedIndex};
use crate::types::FileFormat;

/// Choose the prompt template for a query.
///
/// `FirstUpload` routes by the earliest entry still in the index, so
/// every question in a session is answered in the style of the first
/// document uploaded. `TopHit` routes by whichever document produced
/// the best-matching chunk for this particular question.
pub fn route(policy: RoutePolicy, index: &SharedIndex, hits: &[SearchHit]) -> PromptKind {
    let source = match policy {
        RoutePolicy::FirstUpload => index.first_source(),
        RoutePolicy::TopHit => hits.first().map(|h| h.chunk.source.clone()),
    };

    match source {
        Some(name) => kind_for_source(&name),
        None => PromptKind::Document,
    }
}

fn kind_for_source(filename: &str) -> PromptKind {
    match FileFormat::from_filename(filename) {
        Ok(format) => PromptKind::for_format(format),
        Err(_) => PromptKind::Document,
    }
}
