//! Pointer event dispatch.
//!
//! The editor decides which component sees each event. Blocks intercept
//! presses before the background: a press on a block starts a block gesture
//! (click or drag) and keeps the rubber band from starting. On release the
//! background handler runs first, then the block click.

use crate::block::{Block, BlockId, BlockProfile};
use crate::config::EditorConfig;
use crate::graph::{BlockGraph, ClickOutcome};
use crate::input::{MouseButton, PointerEvent};
use crate::render::LinkRenderer;
use crate::selection::SelectionController;
use kurbo::Point;

/// A press on a block that has not been released yet.
#[derive(Debug, Clone)]
struct BlockPress {
    block: BlockId,
    origin: Point,
    last: Point,
    dragging: bool,
    /// Blocks that move with the pressed one.
    group: Vec<BlockId>,
}

/// The interactive core: block graph, drag selection, and the shared hover flag.
pub struct Editor {
    config: EditorConfig,
    graph: BlockGraph,
    selection: SelectionController,
    hovered: Option<BlockId>,
    press: Option<BlockPress>,
}

impl Editor {
    /// Empty editor drawing links through `renderer`.
    pub fn new(config: EditorConfig, renderer: Box<dyn LinkRenderer>) -> Self {
        let graph = BlockGraph::new(&config, renderer);
        let selection = SelectionController::new(&config);
        Self {
            config,
            graph,
            selection,
            hovered: None,
            press: None,
        }
    }

    /// Configuration, including the current interaction switches.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The block graph.
    pub fn graph(&self) -> &BlockGraph {
        &self.graph
    }

    /// Mutable access for programmatic edits outside pointer gestures.
    pub fn graph_mut(&mut self) -> &mut BlockGraph {
        &mut self.graph
    }

    /// The drag-select controller.
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Create and register a block. A profile without a size gets the
    /// configured block size.
    pub fn add_block(&mut self, profile: &BlockProfile, position: Point) -> BlockId {
        let profile = profile.sized_for(&self.config.visual);
        self.graph.register_block(Block::new(&profile, position))
    }

    /// Whether the pointer is currently over a block.
    pub fn is_hovering_block(&self) -> bool {
        self.hovered.is_some()
    }

    /// Block under the pointer, if any.
    pub fn hovered(&self) -> Option<BlockId> {
        self.hovered
    }

    /// Enable or disable rubber-band selection from the next press.
    pub fn set_drag_select(&mut self, enabled: bool) {
        self.config.interaction.drag_select = enabled;
        self.selection.set_enabled(enabled);
    }

    /// Enable or disable the click connect/disconnect protocol.
    pub fn set_click_select(&mut self, enabled: bool) {
        self.config.interaction.click_select = enabled;
        self.graph.set_click_select(enabled);
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> Option<ClickOutcome> {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_down(position, button);
                None
            }
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                None
            }
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
        }
    }

    /// Press: hit-test, record a block press, then let the selection decide
    /// whether a band starts.
    pub fn pointer_down(&mut self, position: Point, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }

        self.hovered = self.graph.block_at(position);
        if let Some(block) = self.hovered {
            let group = if self.selection.in_batch(block) {
                self.selection.batch().to_vec()
            } else {
                vec![block]
            };
            self.press = Some(BlockPress {
                block,
                origin: position,
                last: position,
                dragging: false,
                group,
            });
        }

        self.selection
            .pointer_down(position, self.hovered.is_some(), &mut self.graph);
    }

    /// Move: drag the pressed block (or its batch) past the threshold, or
    /// track hover.
    pub fn pointer_move(&mut self, position: Point) {
        match self.press.as_mut() {
            Some(press) => {
                if !press.dragging
                    && (position - press.origin).hypot() > self.config.interaction.drag_threshold
                {
                    press.dragging = true;
                    log::debug!("Dragging block {}", press.block);
                }
                if press.dragging {
                    let delta = position - press.last;
                    press.last = position;
                    for &id in &press.group {
                        if let Err(e) = self.graph.translate_block(id, delta) {
                            log::warn!("Block drag: {e}");
                        }
                    }
                }
            }
            None => self.hovered = self.graph.block_at(position),
        }

        self.selection.pointer_move(position);
    }

    /// Returns the click-protocol outcome if the release completed a block click.
    pub fn pointer_up(&mut self, position: Point, button: MouseButton) -> Option<ClickOutcome> {
        if button != MouseButton::Left {
            return None;
        }

        self.selection.pointer_up(position, &mut self.graph);

        let outcome = self.press.take().and_then(|press| {
            if press.dragging {
                for &id in &press.group {
                    if let Err(e) = self.graph.end_drag(id) {
                        log::warn!("Block drag end: {e}");
                    }
                }
                None
            } else {
                Some(self.graph.click(press.block))
            }
        });

        self.hovered = self.graph.block_at(position);
        outcome
    }

    /// Click a point: press and release without moving.
    pub fn click_at(&mut self, position: Point) -> Option<ClickOutcome> {
        self.pointer_down(position, MouseButton::Left);
        self.pointer_up(position, MouseButton::Left)
    }

    /// Drag from `from` to `to` with one intermediate move.
    pub fn drag(&mut self, from: Point, to: Point) {
        self.pointer_down(from, MouseButton::Left);
        self.pointer_move(to);
        self.pointer_up(to, MouseButton::Left);
    }
}
