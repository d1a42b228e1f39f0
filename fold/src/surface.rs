//! Rendering sink for folds and the glue that drives it.
//!
//! A [`LineSurface`] is whatever actually draws the listing: it hands out line text and
//! accepts show/hide, fold-icon and ellipsis updates. It never owns fold state.
//! [`Folding`] wires a surface to a [`FoldController`]:
//!
//! 1. Stale decorations from a previous build are cleared.
//! 2. The surface text is paired and one fold icon is attached per opener. Dangling
//!    openers get no icon.
//! 3. Each [`Activation`] goes through the controller and the resulting
//!    [`Transition`] is mirrored line by line onto the surface.

use crate::{
    compute_pairing_with, error::Result, Activation, BlockPairing, FoldController,
    PairingOptions, Transition, TransitionKind,
};
use rustc_hash::FxHashMap;

/// Which way a fold icon points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IconOrientation {
    /// Block expanded.
    #[default]
    Open,
    /// Block collapsed; the icon is turned sideways.
    Closed,
}

/// Ordered, 0-indexed sequence of rendered lines.
///
/// `set_hidden` must be idempotent: hiding an already hidden line is harmless, which
/// nested collapses rely on.
pub trait LineSurface {
    /// Handle to an attached fold icon.
    type Icon;

    fn count(&self) -> usize;

    fn text(&self, line: usize) -> &str;

    fn set_hidden(&mut self, line: usize, hidden: bool);

    /// Nested collapse count persisted next to the line's rendering.
    fn attached_count(&self, line: usize) -> u32;

    fn set_attached_count(&mut self, line: usize, count: u32);

    /// Render the collapsed-range indicator at the end of `line`.
    fn attach_ellipsis(&mut self, line: usize);

    fn detach_ellipsis(&mut self, line: usize);

    /// Render a clickable fold icon at `line`, pointing [`IconOrientation::Open`].
    fn attach_fold_icon(&mut self, line: usize) -> Self::Icon;

    fn orient_icon(&mut self, icon: &mut Self::Icon, orientation: IconOrientation);

    /// Remove icons and ellipses and unhide every line.
    fn clear_decorations(&mut self);
}

pub struct Folding<S: LineSurface> {
    surface: S,
    options: PairingOptions,
    controller: FoldController,
    icons: FxHashMap<usize, S::Icon>,
}

impl<S: LineSurface> Folding<S> {
    /// Pair the surface text and attach fold icons.
    pub fn new(surface: S, options: PairingOptions) -> Self {
        let mut folding = Self {
            surface,
            options,
            controller: FoldController::new(BlockPairing::default()),
            icons: FxHashMap::default(),
        };
        folding.rebuild();
        folding
    }

    /// Rebuild from scratch: clear decorations, re-pair the text, re-attach icons.
    ///
    /// Every line returns to baseline and all collapses are forgotten.
    pub fn rebuild(&mut self) {
        self.surface.clear_decorations();
        self.icons.clear();

        let surface = &self.surface;
        let pairing = compute_pairing_with(
            (0..surface.count()).map(|line| surface.text(line)),
            self.options,
        );

        let openers: Vec<usize> = pairing.openers().collect();
        for opener in openers {
            let icon = self.surface.attach_fold_icon(opener);
            self.icons.insert(opener, icon);
        }

        if !pairing.dangling().is_empty() {
            tracing::debug!(dangling = ?pairing.dangling(), "unclosed blocks left without fold icons");
        }

        self.controller = FoldController::new(pairing);
    }

    /// Route a user activation through the controller and mirror the result.
    pub fn activate(&mut self, activation: Activation) -> Result<Transition> {
        let transition = self.controller.activate(activation)?;
        self.apply(&transition);
        Ok(transition)
    }

    pub fn collapse(&mut self, opener: usize) -> Result<Transition> {
        let transition = self.controller.collapse(opener)?;
        self.apply(&transition);
        Ok(transition)
    }

    pub fn expand(&mut self, opener: usize) -> Result<Transition> {
        let transition = self.controller.expand(opener)?;
        self.apply(&transition);
        Ok(transition)
    }

    pub fn controller(&self) -> &FoldController {
        &self.controller
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn apply(&mut self, transition: &Transition) {
        for &(line, state) in &transition.lines {
            self.surface.set_hidden(line, state.hidden);
            self.surface.set_attached_count(line, state.nested);
        }

        let opener = transition.opener();
        let orientation = match transition.kind {
            TransitionKind::Collapsed => {
                self.surface.attach_ellipsis(opener);
                IconOrientation::Closed
            },
            TransitionKind::Expanded => {
                self.surface.detach_ellipsis(opener);
                IconOrientation::Open
            },
        };

        if let Some(icon) = self.icons.get_mut(&opener) {
            self.surface.orient_icon(icon, orientation);
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::{RecordingSurface, SurfaceEvent};

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use super::{IconOrientation, LineSurface};
    use std::collections::{BTreeMap, BTreeSet};

    /// Surface call, in the order it was made.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SurfaceEvent {
        SetHidden(usize, bool),
        SetAttachedCount(usize, u32),
        AttachEllipsis(usize),
        DetachEllipsis(usize),
        AttachIcon(usize),
        OrientIcon(usize, IconOrientation),
        Clear,
    }

    /// In-memory [`LineSurface`] that records every call.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSurface {
        lines: Vec<String>,
        hidden: Vec<bool>,
        counts: Vec<u32>,
        ellipses: BTreeSet<usize>,
        icons: BTreeMap<usize, IconOrientation>,
        pub events: Vec<SurfaceEvent>,
    }

    impl RecordingSurface {
        pub fn new<I, T>(lines: I) -> Self
        where
            I: IntoIterator<Item = T>,
            T: Into<String>,
        {
            let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
            let len = lines.len();
            Self {
                lines,
                hidden: vec![false; len],
                counts: vec![0; len],
                ..Default::default()
            }
        }

        pub fn is_hidden(&self, line: usize) -> bool {
            self.hidden[line]
        }

        pub fn hidden_lines(&self) -> Vec<usize> {
            (0..self.lines.len()).filter(|&l| self.hidden[l]).collect()
        }

        pub fn ellipses(&self) -> Vec<usize> {
            self.ellipses.iter().copied().collect()
        }

        pub fn icon(&self, line: usize) -> Option<IconOrientation> {
            self.icons.get(&line).copied()
        }

        pub fn icon_lines(&self) -> Vec<usize> {
            self.icons.keys().copied().collect()
        }
    }

    impl LineSurface for RecordingSurface {
        type Icon = usize;

        fn count(&self) -> usize {
            self.lines.len()
        }

        fn text(&self, line: usize) -> &str {
            &self.lines[line]
        }

        fn set_hidden(&mut self, line: usize, hidden: bool) {
            self.hidden[line] = hidden;
            self.events.push(SurfaceEvent::SetHidden(line, hidden));
        }

        fn attached_count(&self, line: usize) -> u32 {
            self.counts[line]
        }

        fn set_attached_count(&mut self, line: usize, count: u32) {
            self.counts[line] = count;
            self.events.push(SurfaceEvent::SetAttachedCount(line, count));
        }

        fn attach_ellipsis(&mut self, line: usize) {
            self.ellipses.insert(line);
            self.events.push(SurfaceEvent::AttachEllipsis(line));
        }

        fn detach_ellipsis(&mut self, line: usize) {
            self.ellipses.remove(&line);
            self.events.push(SurfaceEvent::DetachEllipsis(line));
        }

        fn attach_fold_icon(&mut self, line: usize) -> usize {
            self.icons.insert(line, IconOrientation::Open);
            self.events.push(SurfaceEvent::AttachIcon(line));
            line
        }

        fn orient_icon(&mut self, icon: &mut usize, orientation: IconOrientation) {
            self.icons.insert(*icon, orientation);
            self.events.push(SurfaceEvent::OrientIcon(*icon, orientation));
        }

        fn clear_decorations(&mut self) {
            self.hidden.fill(false);
            self.counts.fill(0);
            self.ellipses.clear();
            self.icons.clear();
            self.events.push(SurfaceEvent::Clear);
        }
    }
}
