//! Floating timer widget position.
//!
//! The position is measured from the bottom-right corner of the viewport and
//! is shared by every workspace.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::persistence::{PersistWriter, PersistenceGateway, WIDGET_POSITION_KEY};

/// Offset of the widget from the bottom-right corner, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub bottom: f64,
    pub right: f64,
}

impl Default for WidgetPosition {
    fn default() -> Self {
        Self {
            bottom: 20.0,
            right: 20.0,
        }
    }
}

/// Size of the area the widget lives in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Size of the widget itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSize {
    pub width: f64,
    pub height: f64,
}

impl Default for WidgetSize {
    fn default() -> Self {
        Self {
            width: 200.0,
            height: 100.0,
        }
    }
}

impl WidgetPosition {
    /// Returns the position kept inside `viewport` for a widget of `size`.
    ///
    /// Non-finite values read as 0; a viewport smaller than the widget pins
    /// it to the corner.
    #[must_use]
    pub fn clamped(self, viewport: Viewport, size: WidgetSize) -> Self {
        Self {
            bottom: clamp_axis(self.bottom, viewport.height - size.height),
            right: clamp_axis(self.right, viewport.width - size.width),
        }
    }
}

fn clamp_axis(value: f64, upper: f64) -> f64 {
    let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
    finite(value).min(finite(upper).max(0.0)).max(0.0)
}

/// Persisted widget position.
///
/// Reads go to the gateway directly; saves are queued on the shared
/// [`PersistWriter`] so they apply one at a time in call order.
#[derive(Clone)]
pub struct WidgetPositionStore {
    gateway: Arc<dyn PersistenceGateway>,
    writer: PersistWriter,
    size: WidgetSize,
}

impl std::fmt::Debug for WidgetPositionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetPositionStore")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl WidgetPositionStore {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        writer: PersistWriter,
        size: WidgetSize,
    ) -> Self {
        Self {
            gateway,
            writer,
            size,
        }
    }

    pub fn size(&self) -> WidgetSize {
        self.size
    }

    /// Returns the stored position, or the default if there is none or it
    /// cannot be read.
    pub async fn load(&self) -> WidgetPosition {
        match self.gateway.get(WIDGET_POSITION_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "stored widget position is malformed");
                WidgetPosition::default()
            }),
            Ok(None) => WidgetPosition::default(),
            Err(e) => {
                warn!(error = %e, "failed to load widget position");
                WidgetPosition::default()
            }
        }
    }

    /// Clamps `position` into `viewport` and enqueues it for storage.
    ///
    /// Returns the clamped position right away. The write happens in the
    /// background; a failure is logged by the writer.
    pub fn save(&self, position: WidgetPosition, viewport: Viewport) -> WidgetPosition {
        let clamped = position.clamped(viewport, self.size);
        self.writer.persist_json(WIDGET_POSITION_KEY, &clamped);
        debug!(?clamped, "widget position queued");
        clamped
    }
}
