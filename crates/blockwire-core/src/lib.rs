//! Blockwire Core Library
//!
//! Interactive core of a node-and-wire diagram editor: blocks, the connection
//! graph with its two-click connect/disconnect protocol, and rubber-band
//! selection. Rendering, pan/zoom and the window shell live outside this crate.

pub mod block;
pub mod config;
pub mod editor;
pub mod geometry;
pub mod graph;
pub mod input;
pub mod render;
pub mod selection;
pub mod snap;

pub use block::{AdjacencyError, Block, BlockId, BlockProfile, Emphasis, LinkRef, MoveNotice};
pub use config::{ConfigError, EditorConfig, HexColor};
pub use editor::Editor;
pub use geometry::{Anchors, EdgeResolver, Face, GeometryResolver};
pub use graph::{BlockGraph, ClickOutcome, ClickState, Connection, ConnectionKey, GraphError, RejectReason};
pub use input::{MouseButton, PointerEvent};
pub use render::{HighlightStyle, LinkRenderer, LinkStyle, NullRenderer, VisualId};
pub use selection::{BandStyle, DragState, RubberBand, SelectionController};
pub use snap::{SnapResult, snap_to_grid};
