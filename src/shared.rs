//! Shared code for frontend and compiler

pub mod error;
pub mod types;
pub mod typed_ids;

/// Compute line/column number from absolute byte position in string
pub(crate) fn compute_position(input: &str, position: usize) -> (u32, u32) {
    let mut parsed = &input[0..position.min(input.len())];
    let mut line = 1;
    while { // can't use let parsed.lines() here as a line-break at the end is ignored
        let mut break_char = '\0';
        if let Some(nl) = parsed.find(|c| if c == '\n' || c == '\r' { break_char = c; true } else { false }) {
            parsed = &parsed[nl+1..];
            if break_char == '\r' && parsed.starts_with('\n') { // skip \n after \r on windows
                parsed = &parsed[1..];
            }
            line += 1;
            true
        } else {
            false
        }
    } {}
    (line as u32, parsed.chars().count() as u32 + 1)
}
