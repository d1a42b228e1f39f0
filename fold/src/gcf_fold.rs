//! Indentation-based code folding for rendered source listings.
//!
//! The crate turns an ordered sequence of rendered lines into foldable blocks and
//! tracks which lines are hidden as blocks are collapsed and expanded. It is split
//! into two stages that run in sequence:
//!
//! - **Block pairing** ([`compute_pairing`]): a single forward scan that measures the
//!   leading whitespace of every line and pairs each block-opening line with the last
//!   line of its body.
//! - **Fold control** ([`FoldController`]): a per-line state table that hides and
//!   reveals block bodies while remembering inner blocks that were already collapsed.
//!
//! # Architecture
//!
//! ```text
//! line text
//!   | Indent::of
//! Indent (per line)
//!   | compute_pairing
//! BlockPairing (opener -> closer)
//!   | FoldController::collapse / expand
//! Transition (new LineState for every body line)
//!   | Folding
//! LineSurface (rendering sink)
//! ```
//!
//! Data flows one way. The controller owns all visibility state and never reads it
//! back from the rendering surface, so it can be exercised without one. [`Folding`]
//! is the glue that attaches fold icons, routes [`Activation`]s to the controller and
//! mirrors each [`Transition`] onto a [`LineSurface`].
//!
//! # Example
//!
//! ```ignore
//! use gcf_fold::{compute_pairing, FoldController};
//!
//! let pairing = compute_pairing(["a:", "  b:", "    c", "  d", "e"]);
//! assert_eq!(pairing.closer(0), Some(3));
//!
//! let mut folds = FoldController::new(pairing);
//! folds.collapse(1)?;
//! folds.collapse(0)?;
//! folds.expand(0)?;
//! assert!(!folds.is_visible(2));
//! ```
mod controller;
mod error;
mod indent;
mod pairer;
mod surface;

pub use controller::{Activation, FoldController, LineState, Transition, TransitionKind};
pub use error::{FoldError, Inconsistency, InvalidRange, Result};
pub use indent::Indent;
pub use pairer::{compute_pairing, compute_pairing_with, BlockPairing, CollapseRange, PairingOptions};
#[cfg(any(test, feature = "test-support"))]
pub use surface::{RecordingSurface, SurfaceEvent};
pub use surface::{Folding, IconOrientation, LineSurface};
