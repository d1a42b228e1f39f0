//! Block pairing: pairs each block-opening line with the last line of its body.
//!
//! A line opens a block when the next non-blank line is indented deeper than it. The
//! block stays open until a later non-blank line comes back to the opener's depth or
//! shallower; every line before that one (blank lines included) belongs to the block.
//!
//! ```text
//! 0: if x:          opener, closes at 4
//! 1:   a
//! 2:   b            opener, closes at 3
//! 3:     c
//! 4:   d
//! 5: e              closes 0 and 2's ancestors
//! ```
//!
//! # Algorithm
//!
//! One forward scan with an explicit stack of pending openers:
//!
//! 1. Measure each line with [`Indent::of`]. Blank lines are recorded and skipped.
//! 2. For a non-blank line `i` at depth `d`, pop every pending opener whose depth is
//!    `>= d` and pair it with `i - 1`.
//! 3. If `d` is deeper than the previous non-blank line, push that line as a pending
//!    opener.
//! 4. Openers still pending at end of input are dangling. They get no pairing unless
//!    [`PairingOptions::close_dangling_at_eof`] is set.
//!
//! Runs in linear time; stack depth is bounded by the maximum nesting.

use crate::Indent;
use serde::Serialize;
use smallvec::SmallVec;
use std::{collections::BTreeMap, ops::RangeInclusive};

/// Tuning for [`compute_pairing_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingOptions {
    /// Close openers still pending at end of input on the final line.
    ///
    /// Off by default: an unclosed block gets no pairing and no fold icon.
    pub close_dangling_at_eof: bool,
}

/// Inclusive range of body lines hidden as one unit by a collapsed block.
///
/// The ellipsis for the range is anchored on the opener, the line just before
/// `start`, which stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CollapseRange {
    pub start: usize,
    pub end: usize,
}

impl CollapseRange {
    /// Body range for the block opened at `opener` and closed at `closer`.
    pub fn for_block(opener: usize, closer: usize) -> Self {
        Self {
            start: opener + 1,
            end: closer,
        }
    }

    /// The opener line carrying the ellipsis.
    pub fn anchor(&self) -> usize {
        self.start - 1
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }

    pub fn lines(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

/// Mapping from each block-opening line to the last line of its block.
///
/// Entries never partially overlap: for two openers `s1 < s2`, either `s2`'s block
/// sits entirely inside `s1`'s or starts after it ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockPairing {
    pairs: BTreeMap<usize, usize>,
    dangling: Vec<usize>,
    #[serde(skip)]
    indents: Vec<Indent>,
}

impl BlockPairing {
    /// Closing line for the block opened at `opener`.
    pub fn closer(&self, opener: usize) -> Option<usize> {
        self.pairs.get(&opener).copied()
    }

    pub fn is_opener(&self, line: usize) -> bool {
        self.pairs.contains_key(&line)
    }

    /// Opener lines in ascending order.
    pub fn openers(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs.keys().copied()
    }

    /// `(opener, closer)` pairs in ascending opener order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().map(|(&opener, &closer)| (opener, closer))
    }

    /// Body range hidden when `opener` is collapsed.
    pub fn range(&self, opener: usize) -> Option<CollapseRange> {
        self.closer(opener)
            .map(|closer| CollapseRange::for_block(opener, closer))
    }

    /// Innermost opener whose body contains `line`.
    pub fn enclosing(&self, line: usize) -> Option<usize> {
        self.pairs
            .range(..line)
            .rev()
            .find(|(_, &closer)| closer >= line)
            .map(|(&opener, _)| opener)
    }

    /// Openers left pending at end of input, ascending.
    ///
    /// Empty when the pairing was computed with
    /// [`PairingOptions::close_dangling_at_eof`].
    pub fn dangling(&self) -> &[usize] {
        &self.dangling
    }

    /// Indentation measured for every input line.
    pub fn indents(&self) -> &[Indent] {
        &self.indents
    }

    pub fn line_count(&self) -> usize {
        self.indents.len()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Pending opener on the pairing stack.
#[derive(Debug, Clone, Copy)]
struct Pending {
    line: usize,
    depth: usize,
}

/// Pair block openers with their closers using default [`PairingOptions`].
pub fn compute_pairing<I, T>(lines: I) -> BlockPairing
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    compute_pairing_with(lines, PairingOptions::default())
}

/// Pair block openers with their closers.
///
/// Deterministic for identical input. Zero lines or all-blank input yield an empty
/// pairing.
pub fn compute_pairing_with<I, T>(lines: I, options: PairingOptions) -> BlockPairing
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut pairs = BTreeMap::new();
    let mut indents = Vec::new();
    let mut stack: SmallVec<[Pending; 16]> = SmallVec::new();
    // Most recent non-blank line.
    let mut previous: Option<Pending> = None;

    for (line, text) in lines.into_iter().enumerate() {
        let indent = Indent::of(text.as_ref());
        indents.push(indent);

        let Indent::Depth(depth) = indent else {
            continue;
        };

        while let Some(top) = stack.last() {
            if depth > top.depth {
                break;
            }
            // A pending opener always has at least one body line before `line`.
            pairs.insert(top.line, line - 1);
            stack.pop();
        }

        if let Some(prev) = previous {
            if depth > prev.depth {
                stack.push(prev);
            }
        }
        previous = Some(Pending { line, depth });
    }

    let mut dangling: Vec<usize> = stack.iter().map(|pending| pending.line).collect();
    if options.close_dangling_at_eof {
        let last = indents.len().saturating_sub(1);
        for opener in dangling.drain(..) {
            pairs.insert(opener, last);
        }
    }

    tracing::debug!(
        lines = indents.len(),
        blocks = pairs.len(),
        dangling = dangling.len(),
        "computed block pairing"
    );

    BlockPairing {
        pairs,
        dangling,
        indents,
    }
}
