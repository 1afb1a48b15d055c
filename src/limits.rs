//! DoS prevention constants.
//!
//! These limits keep pathological inputs from causing deep recursion
//! or unbounded output.

/// Deepest HTML heading tag; deeper outline levels clamp to it.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Maximum nesting depth for block containers (list items, quote blocks).
/// Deeper content is kept as paragraph text.
pub const MAX_BLOCK_NESTING: usize = 32;

/// Maximum nesting depth for inline elements (emphasis, link labels).
/// Deeper markers are kept as literal text.
pub const MAX_INLINE_NESTING: usize = 32;

/// Maximum newlines inside one emphasized span.
pub const MAX_EMPHASIS_NEWLINES: usize = 1;

/// Maximum digits in ordered list marker (prevents big-integer parsing)
pub const MAX_LIST_MARKER_DIGITS: usize = 9;

/// Maximum table columns; extra cells are dropped.
pub const MAX_TABLE_COLUMNS: usize = 128;

/// Width of a tab when measuring indentation.
pub const TAB_WIDTH: usize = 8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_reasonable() {
        const { assert!(MAX_HEADING_LEVEL == 6) };
        const { assert!(MAX_BLOCK_NESTING >= 16) };
        const { assert!(MAX_BLOCK_NESTING <= 64) };
        const { assert!(MAX_INLINE_NESTING >= 16) };
        const { assert!(MAX_LIST_MARKER_DIGITS <= 9) };
    }
}
