//! Connection graph: the block registry, the connection map, and the
//! two-click connect/disconnect protocol.

use crate::block::{Block, BlockId, LinkRef, MoveNotice};
use crate::config::{EditorConfig, VisualConfig};
use crate::geometry::{Anchors, EdgeResolver, Face, GeometryResolver, arrow_head, link_path};
use crate::render::{HighlightStyle, LinkRenderer, LinkStyle, VisualId};
use kurbo::{Point, Rect, Vec2};
use std::collections::HashMap;
use thiserror::Error;

/// Graph errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Block not found: {0}")]
    BlockNotFound(BlockId),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Order-independent key for the connection between two blocks.
///
/// The ids are stored sorted, so `new(a, b) == new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey {
    low: BlockId,
    high: BlockId,
}

impl ConnectionKey {
    /// Key for the pair, in either order.
    pub fn new(a: BlockId, b: BlockId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The smaller id of the pair.
    pub fn low(&self) -> BlockId {
        self.low
    }

    /// The larger id of the pair.
    pub fn high(&self) -> BlockId {
        self.high
    }

    /// Whether `id` is one of the two endpoints.
    pub fn contains(&self, id: BlockId) -> bool {
        self.low == id || self.high == id
    }
}

/// An active link between two blocks.
#[derive(Debug, Clone)]
pub struct Connection {
    /// Block that initiated the link (first click).
    pub from: BlockId,
    /// Block that received the link (second click).
    pub to: BlockId,
    /// Anchors from the most recent render.
    pub anchors: Anchors,
    /// Whether the most recent render was highlighted.
    pub highlighted: bool,
    link: VisualId,
    arrow: VisualId,
}

/// State of the two-click protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickState {
    #[default]
    Idle,
    /// The first block has been clicked.
    AwaitingSecond(BlockId),
}

/// Why a second click did not change any connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    SelfConnection,
    CannotInitiate,
    CannotReceive,
}

/// Result of a block click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click-selection is disabled or the block is unknown.
    Ignored,
    /// First click recorded.
    Pending(BlockId),
    Connected(ConnectionKey),
    Disconnected(ConnectionKey),
    Rejected(RejectReason),
}

/// Owns every block and connection and drives the click protocol.
pub struct BlockGraph {
    blocks: HashMap<BlockId, Block>,
    /// Registration order; later blocks are on top.
    order: Vec<BlockId>,
    connections: HashMap<ConnectionKey, Connection>,
    state: ClickState,
    click_select: bool,
    grid_size: f64,
    visual: VisualConfig,
    resolver: Box<dyn GeometryResolver>,
    renderer: Box<dyn LinkRenderer>,
}

impl BlockGraph {
    /// Create an empty graph that anchors links with [`EdgeResolver`].
    pub fn new(config: &EditorConfig, renderer: Box<dyn LinkRenderer>) -> Self {
        Self {
            blocks: HashMap::new(),
            order: Vec::new(),
            connections: HashMap::new(),
            state: ClickState::Idle,
            click_select: config.interaction.click_select,
            grid_size: config.grid_size,
            visual: config.visual.clone(),
            resolver: Box::new(EdgeResolver),
            renderer,
        }
    }

    /// Replace the geometry resolver.
    pub fn with_resolver(mut self, resolver: Box<dyn GeometryResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Grid unit used for snapping.
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Whether block clicks drive the connect/disconnect protocol.
    pub fn click_select(&self) -> bool {
        self.click_select
    }

    /// Enable or disable the click protocol. Applies from the next click.
    pub fn set_click_select(&mut self, enabled: bool) {
        self.click_select = enabled;
    }

    /// Start tracking a block. Snaps it if its profile asks for it.
    ///
    /// An id that is already registered keeps its existing block, links and
    /// stacking position; the new block is dropped.
    pub fn register_block(&mut self, block: Block) -> BlockId {
        let id = block.id();
        if self.blocks.contains_key(&id) {
            log::warn!("Block {id} is already registered");
            return id;
        }
        self.order.push(id);
        self.blocks.insert(id, block);
        log::debug!("Registered block {id}");

        if let Some(block) = self.blocks.get_mut(&id) {
            if let Some(notice) = block.snap_to_grid(false, self.grid_size) {
                self.dispatch(notice);
            }
        }
        id
    }

    /// The block with `id`, or `None` if it is not tracked.
    pub fn lookup_block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    /// Blocks in registration order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.order.iter().filter_map(|id| self.blocks.get(id))
    }

    /// Number of tracked blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no blocks are tracked.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks whose bounds overlap the rectangle spanned by two corners.
    ///
    /// Edges touching counts as overlap. Corners may be given in any order.
    pub fn find_blocks_in_region(&self, corner1: Point, corner2: Point) -> Vec<BlockId> {
        let region = Rect::from_points(corner1, corner2);
        self.blocks()
            .filter(|block| {
                let b = block.bounds();
                b.x1 >= region.x0 && b.x0 <= region.x1 && b.y1 >= region.y0 && b.y0 <= region.y1
            })
            .map(Block::id)
            .collect()
    }

    /// Top-most block containing `point`.
    pub fn block_at(&self, point: Point) -> Option<BlockId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.blocks.get(id).is_some_and(|b| b.contains(point)))
    }

    /// Current state of the two-click protocol.
    pub fn click_state(&self) -> ClickState {
        self.state
    }

    /// The block waiting for a second click, if any.
    pub fn pending(&self) -> Option<BlockId> {
        match self.state {
            ClickState::Idle => None,
            ClickState::AwaitingSecond(id) => Some(id),
        }
    }

    /// Symmetric existence check.
    pub fn are_connected(&self, a: BlockId, b: BlockId) -> bool {
        self.connections.contains_key(&ConnectionKey::new(a, b))
    }

    /// The connection between `a` and `b`, in either order.
    pub fn connection(&self, a: BlockId, b: BlockId) -> Option<&Connection> {
        self.connections.get(&ConnectionKey::new(a, b))
    }

    /// All active connections, in no particular order.
    pub fn connections(&self) -> impl Iterator<Item = (&ConnectionKey, &Connection)> {
        self.connections.iter()
    }

    /// Number of active connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Feed a click on a registered block into the connect/disconnect protocol.
    pub fn click(&mut self, id: BlockId) -> ClickOutcome {
        if !self.click_select {
            return ClickOutcome::Ignored;
        }
        if !self.blocks.contains_key(&id) {
            log::warn!("Click on unregistered block {id}");
            return ClickOutcome::Ignored;
        }

        let first = match self.state {
            ClickState::Idle => {
                self.state = ClickState::AwaitingSecond(id);
                self.set_selected(id, true);
                log::debug!("Block {id} pending connection");
                return ClickOutcome::Pending(id);
            }
            ClickState::AwaitingSecond(first) => first,
        };

        let outcome = match self.check_pair(first, id) {
            Err(reason) => {
                log::warn!("Connection {first} -> {id} rejected: {reason:?}");
                ClickOutcome::Rejected(reason)
            }
            Ok(key) if self.connections.contains_key(&key) => {
                self.disconnect(key);
                ClickOutcome::Disconnected(key)
            }
            Ok(_) => ClickOutcome::Connected(self.connect(first, id)),
        };

        self.state = ClickState::Idle;
        self.set_selected(first, false);
        self.set_selected(id, false);
        outcome
    }

    /// Abandon a pending first click.
    pub fn cancel_pending(&mut self) {
        if let ClickState::AwaitingSecond(first) = self.state {
            self.state = ClickState::Idle;
            self.set_selected(first, false);
        }
    }

    fn check_pair(&self, first: BlockId, second: BlockId) -> Result<ConnectionKey, RejectReason> {
        if first == second {
            return Err(RejectReason::SelfConnection);
        }
        if !self.blocks.get(&first).is_some_and(Block::can_initiate_connection) {
            return Err(RejectReason::CannotInitiate);
        }
        if !self.blocks.get(&second).is_some_and(Block::can_receive_connection) {
            return Err(RejectReason::CannotReceive);
        }
        Ok(ConnectionKey::new(first, second))
    }

    fn connect(&mut self, from: BlockId, to: BlockId) -> ConnectionKey {
        let key = ConnectionKey::new(from, to);
        let (Some(a), Some(b)) = (self.blocks.get(&from), self.blocks.get(&to)) else {
            return key;
        };
        let highlighted = a.is_selected() || b.is_selected();
        let (anchors, link, arrow) = draw_connection(
            self.renderer.as_mut(),
            self.resolver.as_ref(),
            &self.visual,
            a.bounds(),
            b.bounds(),
            highlighted,
        );

        if let Some(block) = self.blocks.get_mut(&from) {
            block.set_connection_face(anchors.face);
            block.subscribe_moves(key);
            block.add_child(LinkRef { block: to, connection: key });
        }
        if let Some(block) = self.blocks.get_mut(&to) {
            block.subscribe_moves(key);
            block.add_parent(LinkRef { block: from, connection: key });
        }

        self.connections.insert(
            key,
            Connection {
                from,
                to,
                anchors,
                highlighted,
                link,
                arrow,
            },
        );
        log::info!("Connected {from} -> {to}");
        key
    }

    fn disconnect(&mut self, key: ConnectionKey) {
        let Some(conn) = self.connections.remove(&key) else {
            return;
        };

        if let Some(block) = self.blocks.get_mut(&conn.from) {
            block.unsubscribe_moves(key);
            if let Err(e) = block.remove_child(&LinkRef { block: conn.to, connection: key }) {
                log::warn!("Adjacency out of sync on {}: {e}", conn.from);
            }
            block.set_connection_face(Face::None);
        }
        if let Some(block) = self.blocks.get_mut(&conn.to) {
            block.unsubscribe_moves(key);
            if let Err(e) = block.remove_parent(&LinkRef { block: conn.from, connection: key }) {
                log::warn!("Adjacency out of sync on {}: {e}", conn.to);
            }
        }

        self.renderer.remove(conn.link);
        self.renderer.remove(conn.arrow);
        log::info!("Disconnected {} -> {}", conn.from, conn.to);
    }

    /// Recompute and redraw one connection from the current block state.
    fn rerender(&mut self, key: ConnectionKey) {
        let Some(conn) = self.connections.get_mut(&key) else {
            return;
        };
        let (Some(a), Some(b)) = (self.blocks.get(&conn.from), self.blocks.get(&conn.to)) else {
            return;
        };
        let highlighted = a.is_selected() || b.is_selected();

        self.renderer.remove(conn.link);
        self.renderer.remove(conn.arrow);
        let (anchors, link, arrow) = draw_connection(
            self.renderer.as_mut(),
            self.resolver.as_ref(),
            &self.visual,
            a.bounds(),
            b.bounds(),
            highlighted,
        );
        conn.anchors = anchors;
        conn.highlighted = highlighted;
        conn.link = link;
        conn.arrow = arrow;

        let from = conn.from;
        if let Some(block) = self.blocks.get_mut(&from) {
            block.set_connection_face(anchors.face);
        }
    }

    fn dispatch(&mut self, notice: MoveNotice) {
        for key in notice.listeners {
            self.rerender(key);
        }
    }

    /// Re-render every connection touching `id`.
    fn refresh_links_of(&mut self, id: BlockId) {
        let keys = self
            .blocks
            .get(&id)
            .map(|b| b.move_listeners().to_vec())
            .unwrap_or_default();
        for key in keys {
            self.rerender(key);
        }
    }

    fn set_selected(&mut self, id: BlockId, selected: bool) -> bool {
        let Some(block) = self.blocks.get_mut(&id) else {
            return false;
        };
        if selected {
            block.select();
        } else {
            block.deselect();
        }
        self.refresh_links_of(id);
        true
    }

    /// Highlight to draw on a block, from its emphasis and color.
    pub fn highlight_of(&self, id: BlockId) -> Option<HighlightStyle> {
        self.blocks.get(&id)?.highlight(&self.visual)
    }

    /// Select a block and refresh the links touching it.
    pub fn select_block(&mut self, id: BlockId) -> GraphResult<()> {
        if self.set_selected(id, true) {
            Ok(())
        } else {
            Err(GraphError::BlockNotFound(id))
        }
    }

    /// Deselect a block and refresh the links touching it.
    pub fn deselect_block(&mut self, id: BlockId) -> GraphResult<()> {
        if self.set_selected(id, false) {
            Ok(())
        } else {
            Err(GraphError::BlockNotFound(id))
        }
    }

    /// Move a block's top-left corner and re-render its links.
    pub fn move_block(&mut self, id: BlockId, position: Point) -> GraphResult<()> {
        let block = self.blocks.get_mut(&id).ok_or(GraphError::BlockNotFound(id))?;
        let notice = block.set_position(position);
        self.dispatch(notice);
        Ok(())
    }

    /// Move a block by `delta` and re-render its links.
    pub fn translate_block(&mut self, id: BlockId, delta: Vec2) -> GraphResult<()> {
        let block = self.blocks.get_mut(&id).ok_or(GraphError::BlockNotFound(id))?;
        let notice = block.translate(delta);
        self.dispatch(notice);
        Ok(())
    }

    /// Snap one block. Returns whether snapping ran (it is skipped when
    /// disabled and not forced).
    pub fn snap_block(&mut self, id: BlockId, force: bool) -> GraphResult<bool> {
        let grid_size = self.grid_size;
        let block = self.blocks.get_mut(&id).ok_or(GraphError::BlockNotFound(id))?;
        match block.snap_to_grid(force, grid_size) {
            Some(notice) => {
                self.dispatch(notice);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Finish a drag gesture on a block: snap without forcing.
    pub fn end_drag(&mut self, id: BlockId) -> GraphResult<()> {
        let grid_size = self.grid_size;
        let block = self.blocks.get_mut(&id).ok_or(GraphError::BlockNotFound(id))?;
        if let Some(notice) = block.end_drag(grid_size) {
            self.dispatch(notice);
        }
        Ok(())
    }

    /// Snap every block; `force` enables snapping on each first.
    pub fn snap_all(&mut self, force: bool) {
        for id in self.order.clone() {
            if let Err(e) = self.snap_block(id, force) {
                log::warn!("snap_all: {e}");
            }
        }
    }
}

fn draw_connection(
    renderer: &mut dyn LinkRenderer,
    resolver: &dyn GeometryResolver,
    visual: &VisualConfig,
    from: Rect,
    to: Rect,
    highlighted: bool,
) -> (Anchors, VisualId, VisualId) {
    let anchors = resolver.resolve(from, to);
    let style = LinkStyle::from_config(visual, highlighted);
    let link = renderer.draw_link(&link_path(&anchors), &style);
    let head = arrow_head(anchors.end, anchors.face, visual.arrow_width, visual.arrow_height);
    let arrow = renderer.draw_arrow(&head, &style);
    (anchors, link, arrow)
}
