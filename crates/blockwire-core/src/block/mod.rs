//! Block entities: placeable, selectable, grid-snapping rectangles.

mod adjacency;

pub use adjacency::{Adjacency, AdjacencyError, LinkRef};

use crate::config::{DEFAULT_BLOCK_SIZE, HexColor, VisualConfig};
use crate::geometry::Face;
use crate::graph::ConnectionKey;
use crate::render::HighlightStyle;
use crate::snap::snap_to_grid;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a block.
pub type BlockId = Uuid;

/// Capability profile a block factory hands to [`Block::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockProfile {
    /// Whether the block may start a connection (first click).
    pub can_initiate: bool,
    /// Whether the block may end a connection (second click).
    pub can_receive: bool,
    /// Whether the block snaps to the grid after moves.
    pub snap_to_grid: bool,
    /// `None` takes the configured default block size.
    pub size: Option<Size>,
    /// Fill color; also tints the selection shadow.
    pub color: HexColor,
}

impl Default for BlockProfile {
    fn default() -> Self {
        Self {
            can_initiate: true,
            can_receive: true,
            snap_to_grid: true,
            size: None,
            color: HexColor::rgb(0x2b, 0x2b, 0x2b),
        }
    }
}

impl BlockProfile {
    /// Copy of this profile with a missing size filled from `visual`.
    pub fn sized_for(&self, visual: &VisualConfig) -> Self {
        Self {
            size: Some(self.size.unwrap_or_else(|| visual.block_size())),
            ..self.clone()
        }
    }
}

/// Visual emphasis applied to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    None,
    /// Shadow in the block's color plus a highlight stroke.
    Highlight,
}

/// Notification that a block's geometry changed.
///
/// Carries the listeners registered on the block at the time of the move;
/// the graph re-renders each of them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "dependents of a moved block must be notified"]
pub struct MoveNotice {
    pub block: BlockId,
    pub listeners: Vec<ConnectionKey>,
}

/// A block on the canvas.
#[derive(Debug, Clone)]
pub struct Block {
    id: BlockId,
    /// Top-left corner in world coordinates.
    position: Point,
    size: Size,
    color: HexColor,
    snap_enabled: bool,
    can_initiate: bool,
    can_receive: bool,
    selected: bool,
    emphasis: Emphasis,
    connection_face: Face,
    adjacency: Adjacency,
    move_listeners: Vec<ConnectionKey>,
}

impl Block {
    /// Create a new block at `position` with a fresh id.
    pub fn new(profile: &BlockProfile, position: Point) -> Self {
        Self::with_id(Uuid::new_v4(), profile, position)
    }

    /// Create a block with a specific id.
    pub fn with_id(id: BlockId, profile: &BlockProfile, position: Point) -> Self {
        Self {
            id,
            position,
            size: profile
                .size
                .unwrap_or(Size::new(DEFAULT_BLOCK_SIZE, DEFAULT_BLOCK_SIZE)),
            color: profile.color,
            snap_enabled: profile.snap_to_grid,
            can_initiate: profile.can_initiate,
            can_receive: profile.can_receive,
            selected: false,
            emphasis: Emphasis::None,
            connection_face: Face::None,
            adjacency: Adjacency::default(),
            move_listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn color(&self) -> HexColor {
        self.color
    }

    /// Bounding box in world coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Inclusive point containment.
    pub fn contains(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }

    pub fn can_initiate_connection(&self) -> bool {
        self.can_initiate
    }

    pub fn can_receive_connection(&self) -> bool {
        self.can_receive
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn emphasis(&self) -> Emphasis {
        self.emphasis
    }

    /// Mark selected and apply the highlight emphasis.
    pub fn select(&mut self) {
        self.selected = true;
        self.emphasis = Emphasis::Highlight;
    }

    /// Clear selection and emphasis.
    pub fn deselect(&mut self) {
        self.selected = false;
        self.emphasis = Emphasis::None;
    }

    /// Highlight to draw for the current emphasis, if any.
    pub fn highlight(&self, visual: &VisualConfig) -> Option<HighlightStyle> {
        match self.emphasis {
            Emphasis::None => None,
            Emphasis::Highlight => Some(HighlightStyle::for_block(self.color, visual)),
        }
    }

    /// Direction of the block's most recent outgoing connection.
    pub fn connection_face(&self) -> Face {
        self.connection_face
    }

    pub(crate) fn set_connection_face(&mut self, face: Face) {
        self.connection_face = face;
    }

    /// Move the top-left corner to `position`.
    pub fn set_position(&mut self, position: Point) -> MoveNotice {
        self.position = position;
        self.notice()
    }

    /// Move by `delta`.
    pub fn translate(&mut self, delta: Vec2) -> MoveNotice {
        self.set_position(self.position + delta)
    }

    /// Round the position to the grid.
    ///
    /// `force` turns snapping on for this block first. Returns `None` when
    /// snapping is disabled, otherwise a notice even if the block was already
    /// aligned.
    pub fn snap_to_grid(&mut self, force: bool, grid_size: f64) -> Option<MoveNotice> {
        if force {
            self.snap_enabled = true;
        }
        if !self.snap_enabled {
            return None;
        }
        let snapped = snap_to_grid(self.position, grid_size);
        Some(self.set_position(snapped.point))
    }

    /// Called when a drag gesture on this block completes.
    pub fn end_drag(&mut self, grid_size: f64) -> Option<MoveNotice> {
        self.snap_to_grid(false, grid_size)
    }

    fn notice(&self) -> MoveNotice {
        MoveNotice {
            block: self.id,
            listeners: self.move_listeners.clone(),
        }
    }

    pub fn move_listeners(&self) -> &[ConnectionKey] {
        &self.move_listeners
    }

    /// Register a connection to be re-rendered whenever this block moves.
    pub fn subscribe_moves(&mut self, key: ConnectionKey) {
        if !self.move_listeners.contains(&key) {
            self.move_listeners.push(key);
        }
    }

    /// Returns false if the connection was not subscribed.
    pub fn unsubscribe_moves(&mut self, key: ConnectionKey) -> bool {
        let before = self.move_listeners.len();
        self.move_listeners.retain(|k| *k != key);
        self.move_listeners.len() != before
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Outgoing link records.
    pub fn children(&self) -> &[LinkRef] {
        self.adjacency.children()
    }

    /// Incoming link records.
    pub fn parents(&self) -> &[LinkRef] {
        self.adjacency.parents()
    }

    pub fn add_child(&mut self, link: LinkRef) {
        self.adjacency.add_child(link);
    }

    pub fn add_parent(&mut self, link: LinkRef) {
        self.adjacency.add_parent(link);
    }

    pub fn child(&self, block: BlockId) -> Option<&LinkRef> {
        self.adjacency.child(block)
    }

    pub fn parent(&self, block: BlockId) -> Option<&LinkRef> {
        self.adjacency.parent(block)
    }

    pub fn remove_child(&mut self, link: &LinkRef) -> Result<LinkRef, AdjacencyError> {
        self.adjacency.remove_child(link)
    }

    pub fn remove_parent(&mut self, link: &LinkRef) -> Result<LinkRef, AdjacencyError> {
        self.adjacency.remove_parent(link)
    }

    /// True iff `other` is one of this block's children.
    ///
    /// Directional: a block is not "connected to" the block that initiated a
    /// link into it. Use `BlockGraph::are_connected` for the symmetric check.
    pub fn is_connected_to(&self, other: BlockId) -> bool {
        self.adjacency.child(other).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(snap: bool) -> BlockProfile {
        BlockProfile {
            snap_to_grid: snap,
            size: Some(Size::new(20.0, 20.0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_block_defaults() {
        let block = Block::new(&BlockProfile::default(), Point::new(10.0, 20.0));
        assert!(!block.is_selected());
        assert_eq!(block.emphasis(), Emphasis::None);
        assert_eq!(block.connection_face(), Face::None);
        assert_eq!(block.bounds(), Rect::new(10.0, 20.0, 85.0, 95.0));
        assert!(block.can_initiate_connection());
        assert!(block.can_receive_connection());
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut block = Block::new(&profile(false), Point::ZERO);
        block.select();
        block.select();
        assert!(block.is_selected());
        assert_eq!(block.emphasis(), Emphasis::Highlight);

        block.deselect();
        block.deselect();
        assert!(!block.is_selected());
        assert_eq!(block.emphasis(), Emphasis::None);
    }

    #[test]
    fn test_highlight_follows_selection() {
        let visual = VisualConfig::default();
        let colored = BlockProfile {
            color: HexColor::rgb(0xaa, 0x22, 0x11),
            ..profile(false)
        };
        let mut block = Block::new(&colored, Point::ZERO);
        assert!(block.highlight(&visual).is_none());

        block.select();
        let style = block.highlight(&visual).unwrap();
        assert_eq!(style.shadow_color, HexColor::rgb(0xaa, 0x22, 0x11));
        assert_eq!(style.shadow_blur, visual.highlight_blur);

        block.deselect();
        assert!(block.highlight(&visual).is_none());
    }

    #[test]
    fn test_profile_size_from_config() {
        let visual = VisualConfig {
            block_width: 120.0,
            block_height: 40.0,
            ..Default::default()
        };
        let sized = BlockProfile::default().sized_for(&visual);
        assert_eq!(sized.size, Some(Size::new(120.0, 40.0)));

        let fixed = profile(false).sized_for(&visual);
        assert_eq!(fixed.size, Some(Size::new(20.0, 20.0)));
    }

    #[test]
    fn test_snap_disabled_is_noop() {
        let mut block = Block::new(&profile(false), Point::new(13.0, 7.0));
        assert!(block.snap_to_grid(false, 10.0).is_none());
        assert_eq!(block.position(), Point::new(13.0, 7.0));
    }

    #[test]
    fn test_snap_forced_enables_snapping() {
        let mut block = Block::new(&profile(false), Point::new(13.0, 7.0));
        let notice = block.snap_to_grid(true, 10.0);
        assert!(notice.is_some());
        assert!(block.snap_enabled());
        assert_eq!(block.position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_snap_rounds_half_up() {
        let g = 75.0;
        let mut block = Block::new(&profile(true), Point::new(g * 2.0 + 1.0, g * 3.0 - 1.0));
        let _ = block.snap_to_grid(false, g);
        assert_eq!(block.position(), Point::new(g * 2.0, g * 3.0));

        let _ = block.snap_to_grid(false, g);
        assert_eq!(block.position(), Point::new(g * 2.0, g * 3.0));
    }

    #[test]
    fn test_end_drag_respects_snap_setting() {
        let mut off = Block::new(&profile(false), Point::new(33.0, 33.0));
        assert!(off.end_drag(25.0).is_none());
        assert_eq!(off.position(), Point::new(33.0, 33.0));
        assert!(!off.snap_enabled());

        let mut on = Block::new(&profile(true), Point::new(33.0, 33.0));
        assert!(on.end_drag(25.0).is_some());
        assert_eq!(on.position(), Point::new(25.0, 25.0));
    }

    #[test]
    fn test_move_notice_carries_listeners() {
        let mut a = Block::new(&profile(false), Point::ZERO);
        let b = Block::new(&profile(false), Point::ZERO);
        let key = ConnectionKey::new(a.id(), b.id());

        a.subscribe_moves(key);
        a.subscribe_moves(key);
        let notice = a.translate(Vec2::new(5.0, 0.0));
        assert_eq!(notice.block, a.id());
        assert_eq!(notice.listeners, vec![key]);
        assert_eq!(a.position(), Point::new(5.0, 0.0));

        assert!(a.unsubscribe_moves(key));
        assert!(!a.unsubscribe_moves(key));
        assert!(a.translate(Vec2::new(1.0, 1.0)).listeners.is_empty());
    }

    #[test]
    fn test_is_connected_to_is_directional() {
        let mut a = Block::new(&profile(false), Point::ZERO);
        let mut b = Block::new(&profile(false), Point::ZERO);
        let key = ConnectionKey::new(a.id(), b.id());

        a.add_child(LinkRef { block: b.id(), connection: key });
        b.add_parent(LinkRef { block: a.id(), connection: key });

        assert!(a.is_connected_to(b.id()));
        assert!(!b.is_connected_to(a.id()));
        assert!(b.parent(a.id()).is_some());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let block = Block::new(&profile(false), Point::new(0.0, 0.0));
        assert!(block.contains(Point::new(0.0, 0.0)));
        assert!(block.contains(Point::new(20.0, 20.0)));
        assert!(!block.contains(Point::new(20.1, 10.0)));
    }
}
