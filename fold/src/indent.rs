//! Leading-whitespace measurement for rendered lines.
//!
//! Depth is a raw character count: a tab and a space each count as one column.
//! Lines with no visible content are [`Indent::Blank`] and never take part in block
//! boundaries on their own.

/// Leading indentation of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indent {
    /// Empty or whitespace-only line. Defers to the nearest prior non-blank line.
    Blank,
    /// Number of leading space/tab characters.
    Depth(usize),
}

impl Indent {
    /// Measure the indentation of `text`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// assert_eq!(Indent::of("  \tfoo"), Indent::Depth(3));
    /// assert_eq!(Indent::of("   "), Indent::Blank);
    /// ```
    pub fn of(text: &str) -> Self {
        if text.trim().is_empty() {
            return Indent::Blank;
        }

        let depth = text
            .chars()
            .take_while(|c| matches!(c, ' ' | '\t'))
            .count();
        Indent::Depth(depth)
    }

    pub fn depth(self) -> Option<usize> {
        match self {
            Indent::Blank => None,
            Indent::Depth(depth) => Some(depth),
        }
    }

    pub fn is_blank(self) -> bool {
        matches!(self, Indent::Blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_spaces() {
        assert_eq!(Indent::of("    x"), Indent::Depth(4));
        assert_eq!(Indent::of("x"), Indent::Depth(0));
    }

    #[test]
    fn tabs_count_as_one_column() {
        assert_eq!(Indent::of("\tx"), Indent::Depth(1));
        assert_eq!(Indent::of(" \t x"), Indent::Depth(3));
    }

    #[test]
    fn empty_and_whitespace_lines_are_blank() {
        assert_eq!(Indent::of(""), Indent::Blank);
        assert_eq!(Indent::of("    "), Indent::Blank);
        assert_eq!(Indent::of("\t \t"), Indent::Blank);
        assert!(Indent::of("\n").is_blank());
    }

    #[test]
    fn other_whitespace_stops_the_count() {
        // Non-breaking space is content as far as depth goes.
        assert_eq!(Indent::of("  \u{a0}x"), Indent::Depth(2));
    }

    #[test]
    fn depth_accessor() {
        assert_eq!(Indent::Depth(2).depth(), Some(2));
        assert_eq!(Indent::Blank.depth(), None);
    }
}
