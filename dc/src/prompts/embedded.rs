//! Embedded prompts
//!
//! Compiled into the binary from the `.pmt` files in `dc/prompts/`.

/// Repository Analyzer stage
pub const ANALYZE: &str = include_str!("../../prompts/analyze.pmt");

/// Code Reviewer stage
pub const REVIEW: &str = include_str!("../../prompts/review.pmt");

/// Documentation Writer stage
pub const WRITE: &str = include_str!("../../prompts/write.pmt");

/// Markdown Formatter stage
pub const FORMAT: &str = include_str!("../../prompts/format.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "analyze" => Some(ANALYZE),
        "review" => Some(REVIEW),
        "write" => Some(WRITE),
        "format" => Some(FORMAT),
        _ => None,
    }
}
