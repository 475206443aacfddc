//! Traits for rendering pipelines.
//!
//! This module defines the [`Pipeline`] trait which provides a common interface
//! for all rendering pipelines in the charter-render crate.

use charter_compose::{ChartSpec, Layer};

use crate::canvas::Canvas;
use crate::error::RenderError;

/// A trait for chart rendering pipelines.
///
/// Each chart element (guidelines, band fill, indicator lines, candles,
/// signals) has one pipeline bound to a draw [`Layer`]. The renderer runs
/// pipelines in layer order, so later layers paint over earlier ones.
///
/// Pipelines hold no per-request state and must be shareable across threads.
pub trait Pipeline: Send + Sync {
    /// The layer this pipeline draws into.
    fn layer(&self) -> Layer;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Draw this pipeline's part of `spec` onto `canvas`.
    fn render(&self, canvas: &mut Canvas, spec: &ChartSpec) -> Result<(), RenderError>;
}
