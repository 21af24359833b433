// src/tokens.rs
// Rough token counting: one token per five bytes, rounded up.

// Estimates how many LLM tokens a piece of text costs
//
// Example:
//   "" -> 0, "hello" -> 1, "hello!" -> 2
pub fn estimate_tokens(text: &str) -> u64 {
    (text.len() as u64).div_ceil(5)
}
