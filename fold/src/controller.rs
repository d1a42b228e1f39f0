//! Collapse/expand state machine over a [`BlockPairing`].
//!
//! The controller owns one [`LineState`] per line. Collapsing a block hides its body;
//! a body line that was already hidden by an inner collapse gets its `nested` counter
//! bumped instead, so expanding the outer block later leaves the inner block folded.
//!
//! ```text
//! collapse(1)   line 2: hidden, nested 0
//! collapse(0)   line 2: hidden, nested 1     line 1: hidden, nested 0
//! expand(0)     line 2: hidden, nested 0     line 1: visible
//! expand(1)     line 2: visible
//! ```
//!
//! For any line, `nested` is one less than the number of collapsed blocks covering it.
//! [`FoldController::verify`] checks that invariant from scratch.

use crate::{
    error::{FoldError, Inconsistency, InvalidRange, Result},
    BlockPairing, CollapseRange,
};
use rustc_hash::FxHashSet;

/// Visibility bookkeeping for one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LineState {
    pub hidden: bool,
    /// Collapses stacked on top of an already-hidden line. Zero when the line is
    /// hidden by at most one collapsed block.
    pub nested: u32,
}

impl LineState {
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Collapsed,
    Expanded,
}

/// Outcome of a successful collapse or expand.
///
/// Lists the new state of every body line, in ascending order, so a rendering sink
/// can mirror it without reading the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub kind: TransitionKind,
    pub range: CollapseRange,
    pub lines: Vec<(usize, LineState)>,
}

impl Transition {
    pub fn opener(&self) -> usize {
        self.range.anchor()
    }
}

/// User activation raised by the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Fold icon on an opener line. Toggles the block.
    Icon(usize),
    /// Ellipsis on a collapsed opener line. Only ever expands.
    Ellipsis(usize),
}

pub struct FoldController {
    pairing: BlockPairing,
    lines: Vec<LineState>,
    collapsed: FxHashSet<usize>,
}

impl FoldController {
    /// Controller with every line visible and nothing collapsed.
    pub fn new(pairing: BlockPairing) -> Self {
        let lines = vec![LineState::default(); pairing.line_count()];
        Self {
            pairing,
            lines,
            collapsed: FxHashSet::default(),
        }
    }

    pub fn pairing(&self) -> &BlockPairing {
        &self.pairing
    }

    /// Hide the body of the block opened at `opener`.
    ///
    /// Fails with [`FoldError::InvalidRange`] when `opener` is not a paired opener or
    /// is already collapsed. Nothing is mutated on failure.
    pub fn collapse(&mut self, opener: usize) -> Result<Transition> {
        let range = self.range_of(opener)?;
        if self.collapsed.contains(&opener) {
            return Err(FoldError::invalid(opener, InvalidRange::AlreadyCollapsed));
        }

        for line in range.lines() {
            let state = self.lines[line];
            if state.hidden && state.nested == u32::MAX {
                return Err(self.report(line, Inconsistency::CountOverflow));
            }
        }

        let mut changed = Vec::with_capacity(range.len());
        for line in range.lines() {
            let state = &mut self.lines[line];
            if state.hidden {
                state.nested += 1;
            }
            state.hidden = true;
            changed.push((line, *state));
        }
        self.collapsed.insert(opener);

        tracing::trace!(opener, start = range.start, end = range.end, "collapsed block");

        Ok(Transition {
            kind: TransitionKind::Collapsed,
            range,
            lines: changed,
        })
    }

    /// Reveal the body of the collapsed block opened at `opener`.
    ///
    /// Lines still covered by another collapsed block stay hidden with their `nested`
    /// counter decremented by one. Nothing is mutated on failure.
    pub fn expand(&mut self, opener: usize) -> Result<Transition> {
        let range = self.range_of(opener)?;
        if !self.collapsed.contains(&opener) {
            return Err(FoldError::invalid(opener, InvalidRange::NotCollapsed));
        }

        for line in range.lines() {
            if !self.lines[line].hidden {
                return Err(self.report(line, Inconsistency::VisibleInsideCollapse));
            }
        }

        let mut changed = Vec::with_capacity(range.len());
        for line in range.lines() {
            let state = &mut self.lines[line];
            match state.nested {
                0 => state.hidden = false,
                n => state.nested = n - 1,
            }
            changed.push((line, *state));
        }
        self.collapsed.remove(&opener);

        tracing::trace!(opener, start = range.start, end = range.end, "expanded block");

        Ok(Transition {
            kind: TransitionKind::Expanded,
            range,
            lines: changed,
        })
    }

    /// Fold-icon behaviour: expand a collapsed block, collapse an expanded one.
    pub fn toggle(&mut self, opener: usize) -> Result<Transition> {
        if self.collapsed.contains(&opener) {
            self.expand(opener)
        } else {
            self.collapse(opener)
        }
    }

    pub fn activate(&mut self, activation: Activation) -> Result<Transition> {
        match activation {
            Activation::Icon(opener) => self.toggle(opener),
            Activation::Ellipsis(opener) => self.expand(opener),
        }
    }

    /// Return every line to baseline and forget all collapses.
    pub fn reset(&mut self) {
        self.lines.fill(LineState::default());
        self.collapsed.clear();
    }

    pub fn line(&self, line: usize) -> Option<LineState> {
        self.lines.get(line).copied()
    }

    pub fn is_visible(&self, line: usize) -> bool {
        self.line(line).is_some_and(|state| state.is_visible())
    }

    pub fn nested_count(&self, line: usize) -> u32 {
        self.line(line).map_or(0, |state| state.nested)
    }

    pub fn is_collapsed(&self, opener: usize) -> bool {
        self.collapsed.contains(&opener)
    }

    /// Collapsed openers in ascending order.
    pub fn collapsed(&self) -> Vec<usize> {
        let mut openers: Vec<usize> = self.collapsed.iter().copied().collect();
        openers.sort_unstable();
        openers
    }

    pub fn visible_lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_visible())
            .map(|(line, _)| line)
    }

    /// Check every line against the collapsed set.
    ///
    /// A line covered by `n > 0` collapsed blocks must be hidden with `nested == n - 1`;
    /// an uncovered line must be visible with `nested == 0`.
    pub fn verify(&self) -> Result<()> {
        let mut cover = vec![0u32; self.lines.len()];
        for &opener in &self.collapsed {
            if let Some(range) = self.pairing.range(opener) {
                for line in range.lines() {
                    cover[line] += 1;
                }
            }
        }

        for (line, (state, &cover)) in self.lines.iter().zip(&cover).enumerate() {
            let detail = match (state.hidden, cover) {
                (false, 0) if state.nested == 0 => continue,
                (false, 0) => Inconsistency::CountMismatch {
                    expected: 0,
                    actual: state.nested,
                },
                (false, _) => Inconsistency::VisibleInsideCollapse,
                (true, 0) => Inconsistency::UntrackedHide,
                (true, cover) if state.nested == cover - 1 => continue,
                (true, cover) => Inconsistency::CountMismatch {
                    expected: cover - 1,
                    actual: state.nested,
                },
            };
            return Err(self.report(line, detail));
        }
        Ok(())
    }

    fn range_of(&self, opener: usize) -> Result<CollapseRange> {
        self.pairing
            .range(opener)
            .ok_or_else(|| FoldError::invalid(opener, InvalidRange::NotAnOpener))
    }

    fn report(&self, line: usize, detail: Inconsistency) -> FoldError {
        tracing::warn!(line, %detail, "fold state invariant violated");
        FoldError::inconsistent(line, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute_pairing, compute_pairing_with, PairingOptions};

    fn controller(lines: &[&str]) -> FoldController {
        FoldController::new(compute_pairing(lines))
    }

    fn states(folds: &FoldController) -> Vec<LineState> {
        (0..folds.pairing().line_count())
            .filter_map(|line| folds.line(line))
            .collect()
    }

    fn hidden(folds: &FoldController) -> Vec<usize> {
        (0..folds.pairing().line_count())
            .filter(|&line| !folds.is_visible(line))
            .collect()
    }

    #[test]
    fn starts_fully_visible() {
        let folds = controller(&["a", "  b", "c"]);
        assert_eq!(hidden(&folds), Vec::<usize>::new());
        assert!(folds.collapsed().is_empty());
        folds.verify().unwrap();
    }

    #[test]
    fn collapse_hides_body_but_not_opener() {
        let mut folds = controller(&["if x:", "  a", "  b", "    c", "  d", "e"]);

        let transition = folds.collapse(0).unwrap();

        assert_eq!(transition.kind, TransitionKind::Collapsed);
        assert_eq!(transition.range, CollapseRange { start: 1, end: 4 });
        assert_eq!(transition.opener(), 0);
        assert_eq!(hidden(&folds), vec![1, 2, 3, 4]);
        assert!(folds.is_visible(0));
        assert!(folds.is_visible(5));
        assert!(folds.is_collapsed(0));
        folds.verify().unwrap();
    }

    #[test]
    fn expand_after_collapse_restores_everything() {
        let mut folds = controller(&["a", "  b", "    c", "  d", "    e", "f"]);
        folds.collapse(3).unwrap();
        let before = states(&folds);

        folds.collapse(0).unwrap();
        folds.expand(0).unwrap();

        assert_eq!(states(&folds), before);
        folds.verify().unwrap();
    }

    #[test]
    fn outer_expand_keeps_inner_collapse() {
        let options = PairingOptions {
            close_dangling_at_eof: true,
        };
        let pairing = compute_pairing_with(["a:", "  b:", "    c", "  d"], options);
        let mut folds = FoldController::new(pairing);

        folds.collapse(1).unwrap();
        folds.collapse(0).unwrap();
        assert_eq!(folds.nested_count(2), 1);
        assert_eq!(folds.nested_count(1), 0);
        folds.verify().unwrap();

        folds.expand(0).unwrap();

        assert!(!folds.is_visible(2));
        assert_eq!(folds.nested_count(2), 0);
        assert!(folds.is_visible(1));
        assert!(folds.is_visible(3));
        assert!(folds.is_collapsed(1));
        folds.verify().unwrap();

        folds.expand(1).unwrap();
        assert_eq!(hidden(&folds), Vec::<usize>::new());
    }

    #[test]
    fn inner_expand_while_outer_collapsed() {
        let mut folds = controller(&["a", "  b", "    c", "d"]);

        folds.collapse(1).unwrap();
        folds.collapse(0).unwrap();
        folds.expand(1).unwrap();

        // Outer block still hides everything.
        assert_eq!(hidden(&folds), vec![1, 2]);
        assert_eq!(folds.nested_count(2), 0);
        folds.verify().unwrap();

        folds.expand(0).unwrap();
        assert_eq!(hidden(&folds), Vec::<usize>::new());
    }

    #[test]
    fn collapse_inner_after_outer() {
        let mut folds = controller(&["a", "  b", "    c", "d"]);

        folds.collapse(0).unwrap();
        folds.collapse(1).unwrap();
        assert_eq!(folds.nested_count(2), 1);
        folds.verify().unwrap();

        folds.expand(0).unwrap();
        assert_eq!(hidden(&folds), vec![2]);
        assert!(folds.is_collapsed(1));
    }

    #[test]
    fn three_levels_stack_counts() {
        let mut folds = controller(&["a", "  b", "    c", "      d", "e"]);

        folds.collapse(2).unwrap();
        folds.collapse(1).unwrap();
        folds.collapse(0).unwrap();
        assert_eq!(folds.nested_count(3), 2);
        assert_eq!(folds.nested_count(2), 1);
        assert_eq!(folds.nested_count(1), 0);
        folds.verify().unwrap();

        folds.expand(0).unwrap();
        assert_eq!(hidden(&folds), vec![2, 3]);
        assert_eq!(folds.nested_count(3), 1);

        folds.expand(1).unwrap();
        assert_eq!(hidden(&folds), vec![3]);

        folds.expand(2).unwrap();
        assert_eq!(hidden(&folds), Vec::<usize>::new());
        folds.verify().unwrap();
    }

    #[test]
    fn siblings_are_independent() {
        let mut folds = controller(&["a", "  1", "b", "  2", "c"]);

        folds.collapse(0).unwrap();
        folds.collapse(2).unwrap();
        folds.expand(0).unwrap();

        assert_eq!(hidden(&folds), vec![3]);
        assert!(!folds.is_collapsed(0));
        assert!(folds.is_collapsed(2));
    }

    #[test]
    fn collapse_non_opener_is_rejected() {
        let mut folds = controller(&["a", "  b", "c"]);
        let err = folds.collapse(1).unwrap_err();

        assert_eq!(
            err,
            FoldError::InvalidRange {
                opener: 1,
                reason: InvalidRange::NotAnOpener,
            }
        );
        assert_eq!(hidden(&folds), Vec::<usize>::new());
    }

    #[test]
    fn out_of_bounds_is_not_an_opener() {
        let mut folds = controller(&["a", "  b", "c"]);
        assert!(matches!(
            folds.collapse(99),
            Err(FoldError::InvalidRange {
                reason: InvalidRange::NotAnOpener,
                ..
            })
        ));
    }

    #[test]
    fn double_collapse_is_rejected_without_mutation() {
        let mut folds = controller(&["a", "  b", "    c", "d"]);
        folds.collapse(0).unwrap();
        let before = states(&folds);

        let err = folds.collapse(0).unwrap_err();

        assert_eq!(err, FoldError::invalid(0, InvalidRange::AlreadyCollapsed));
        assert_eq!(states(&folds), before);
    }

    #[test]
    fn expand_requires_collapsed_block() {
        let mut folds = controller(&["a", "  b", "c"]);
        let err = folds.expand(0).unwrap_err();
        assert_eq!(err, FoldError::invalid(0, InvalidRange::NotCollapsed));
    }

    #[test]
    fn dangling_opener_cannot_collapse() {
        let mut folds = controller(&["a:", "  b:", "    c", "  d"]);
        assert_eq!(folds.pairing().dangling(), &[0]);
        assert!(folds.collapse(0).is_err());
        assert!(folds.collapse(1).is_ok());
    }

    #[test]
    fn toggle_alternates() {
        let mut folds = controller(&["a", "  b", "c"]);

        assert_eq!(folds.toggle(0).unwrap().kind, TransitionKind::Collapsed);
        assert_eq!(folds.toggle(0).unwrap().kind, TransitionKind::Expanded);
        assert_eq!(folds.toggle(0).unwrap().kind, TransitionKind::Collapsed);
    }

    #[test]
    fn ellipsis_only_expands() {
        let mut folds = controller(&["a", "  b", "c"]);

        assert_eq!(
            folds.activate(Activation::Ellipsis(0)).unwrap_err(),
            FoldError::invalid(0, InvalidRange::NotCollapsed)
        );

        folds.activate(Activation::Icon(0)).unwrap();
        let transition = folds.activate(Activation::Ellipsis(0)).unwrap();
        assert_eq!(transition.kind, TransitionKind::Expanded);
        assert!(folds.is_visible(1));
    }

    #[test]
    fn transition_lists_every_body_line() {
        let mut folds = controller(&["a", "  b", "    c", "  d", "e"]);
        folds.collapse(1).unwrap();

        let transition = folds.collapse(0).unwrap();

        assert_eq!(
            transition.lines,
            vec![
                (1, LineState { hidden: true, nested: 0 }),
                (2, LineState { hidden: true, nested: 1 }),
                (3, LineState { hidden: true, nested: 0 }),
            ]
        );
    }

    #[test]
    fn reset_returns_to_baseline() {
        let mut folds = controller(&["a", "  b", "    c", "d"]);
        folds.collapse(1).unwrap();
        folds.collapse(0).unwrap();

        folds.reset();

        assert_eq!(states(&folds), vec![LineState::default(); 4]);
        assert!(folds.collapsed().is_empty());
        folds.collapse(0).unwrap();
    }

    #[test]
    fn collapsed_is_sorted() {
        let mut folds = controller(&["a", "  1", "b", "  2", "c", "  3", "d"]);
        folds.collapse(4).unwrap();
        folds.collapse(0).unwrap();
        folds.collapse(2).unwrap();
        assert_eq!(folds.collapsed(), vec![0, 2, 4]);
    }

    #[test]
    fn visible_lines_skip_hidden() {
        let mut folds = controller(&["a", "  b", "  c", "d"]);
        folds.collapse(0).unwrap();
        assert_eq!(folds.visible_lines().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn expand_detects_visible_line_inside_collapse() {
        let mut folds = controller(&["a", "  b", "  c", "d"]);
        folds.collapse(0).unwrap();
        folds.lines[2].hidden = false;

        let err = folds.expand(0).unwrap_err();

        assert_eq!(
            err,
            FoldError::inconsistent(2, Inconsistency::VisibleInsideCollapse)
        );
        // Validation runs before mutation.
        assert!(!folds.is_visible(1));
        assert!(folds.is_collapsed(0));
    }

    #[test]
    fn verify_detects_untracked_hide() {
        let mut folds = controller(&["a", "  b", "c"]);
        folds.lines[2].hidden = true;

        assert_eq!(
            folds.verify().unwrap_err(),
            FoldError::inconsistent(2, Inconsistency::UntrackedHide)
        );
    }

    #[test]
    fn verify_detects_count_mismatch() {
        let mut folds = controller(&["a", "  b", "    c", "d"]);
        folds.collapse(1).unwrap();
        folds.collapse(0).unwrap();
        folds.lines[2].nested = 0;

        assert_eq!(
            folds.verify().unwrap_err(),
            FoldError::inconsistent(
                2,
                Inconsistency::CountMismatch {
                    expected: 1,
                    actual: 0,
                }
            )
        );
    }

    #[test]
    fn collapse_detects_counter_overflow() {
        let mut folds = controller(&["a", "  b", "c"]);
        folds.lines[1] = LineState {
            hidden: true,
            nested: u32::MAX,
        };

        assert_eq!(
            folds.collapse(0).unwrap_err(),
            FoldError::inconsistent(1, Inconsistency::CountOverflow)
        );
        assert!(!folds.is_collapsed(0));
    }

    #[test]
    fn empty_listing() {
        let mut folds = controller(&[]);
        assert!(folds.verify().is_ok());
        assert!(folds.collapse(0).is_err());
        assert_eq!(folds.visible_lines().count(), 0);
    }
}
