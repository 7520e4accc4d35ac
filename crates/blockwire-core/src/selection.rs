//! Rubber-band (drag) selection.
//!
//! The controller only reads the graph through
//! [`BlockGraph::find_blocks_in_region`] and writes selection flags on the
//! blocks it finds. It never starts while the pointer is over a block, which
//! keeps it out of the way of the click protocol.

use crate::block::BlockId;
use crate::config::{EditorConfig, HexColor, SelectionConfig};
use crate::graph::BlockGraph;
use kurbo::{Point, Rect};

/// Appearance of the rubber band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStyle {
    pub fill: HexColor,
    pub border: HexColor,
    pub border_width: f64,
    pub corner_radius: f64,
}

impl BandStyle {
    /// Style taken from the selection section of the config.
    pub fn from_config(selection: &SelectionConfig) -> Self {
        Self {
            fill: selection.fill,
            border: selection.border,
            border_width: selection.border_width,
            corner_radius: selection.corner_radius,
        }
    }
}

/// State of the drag-select gesture.
///
/// The enable switch is read when a gesture starts; a gesture in progress
/// runs to its release.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        origin: Point,
        current: Point,
    },
}

/// The visible rubber-band rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RubberBand {
    /// Normalized rectangle in world coordinates.
    pub rect: Rect,
    /// Zero when hidden.
    pub opacity: f64,
    pub style: BandStyle,
}

impl RubberBand {
    fn hidden(style: BandStyle) -> Self {
        Self {
            rect: Rect::ZERO,
            opacity: 0.0,
            style,
        }
    }

    /// Whether the band should be drawn.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Drag-select state machine.
#[derive(Debug, Clone)]
pub struct SelectionController {
    state: DragState,
    band: RubberBand,
    /// Result of the last completed gesture.
    batch: Vec<BlockId>,
    enabled: bool,
    visible_opacity: f64,
}

impl SelectionController {
    /// Idle controller with the configured band style and enable switch.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: DragState::Idle,
            band: RubberBand::hidden(BandStyle::from_config(&config.selection)),
            batch: Vec::new(),
            enabled: config.interaction.drag_select,
            visible_opacity: config.selection.opacity,
        }
    }

    /// Whether new drag gestures may start.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Globally enable or disable drag selection. Takes effect at the next
    /// press; a running gesture is not interrupted.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Current gesture state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The rubber band as it should currently be drawn.
    pub fn band(&self) -> RubberBand {
        self.band
    }

    /// Blocks selected by the last gesture.
    pub fn batch(&self) -> &[BlockId] {
        &self.batch
    }

    /// Whether `id` was selected by the last gesture.
    pub fn in_batch(&self, id: BlockId) -> bool {
        self.batch.contains(&id)
    }

    /// Pointer pressed. Returns true if a drag gesture started.
    ///
    /// Pressing empty canvas first dismisses the current batch.
    pub fn pointer_down(&mut self, position: Point, over_block: bool, graph: &mut BlockGraph) -> bool {
        if !self.enabled {
            return false;
        }

        if !over_block && !self.batch.is_empty() {
            self.cancel(graph);
        }

        if over_block || self.is_dragging() {
            self.reset();
            return false;
        }

        self.band = RubberBand {
            rect: Rect::from_origin_size(position, (0.0, 0.0)),
            opacity: self.visible_opacity,
            style: self.band.style,
        };
        self.state = DragState::Dragging {
            origin: position,
            current: position,
        };
        log::debug!("Drag select started at {position:?}");
        true
    }

    /// Pointer moved: grow the band, or hide it if no gesture is running.
    pub fn pointer_move(&mut self, position: Point) {
        match self.state {
            DragState::Dragging { origin, .. } => {
                self.state = DragState::Dragging {
                    origin,
                    current: position,
                };
                self.band.rect = Rect::from_points(origin, position);
            }
            _ => self.reset(),
        }
    }

    /// Pointer released. Resolves a running gesture into a batch selection and
    /// returns the selected blocks; otherwise dismisses the current batch.
    pub fn pointer_up(&mut self, position: Point, graph: &mut BlockGraph) -> Vec<BlockId> {
        let origin = match self.state {
            DragState::Dragging { origin, .. } => origin,
            DragState::Idle => {
                self.cancel(graph);
                self.reset();
                return Vec::new();
            }
        };

        self.reset();
        let found = graph.find_blocks_in_region(origin, position);
        for &id in &found {
            if let Err(e) = graph.select_block(id) {
                log::warn!("Drag select: {e}");
            }
        }
        log::debug!("Drag select resolved {} block(s)", found.len());
        self.batch = found.clone();
        found
    }

    /// Deselect every block in the batch and clear it.
    pub fn cancel(&mut self, graph: &mut BlockGraph) {
        for id in self.batch.drain(..) {
            if let Err(e) = graph.deselect_block(id) {
                log::warn!("Drag select cancel: {e}");
            }
        }
    }

    /// Hide and zero the band and end any gesture.
    pub fn reset(&mut self) {
        self.band = RubberBand::hidden(self.band.style);
        self.state = DragState::Idle;
    }
}
