//! Link renderer abstraction.
//!
//! The core never draws anything itself. Connections hand their curves and
//! arrowheads to a [`LinkRenderer`] and keep the returned [`VisualId`]s so the
//! visuals can be removed again when the link is re-rendered or disposed.

use crate::config::{HexColor, VisualConfig};
use kurbo::BezPath;

/// Handle to a visual object owned by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualId(pub u64);

/// Stroke parameters for a link and its arrowhead.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStyle {
    pub color: HexColor,
    pub width: f64,
    pub outline_color: HexColor,
    pub outline_width: f64,
    /// Whether either endpoint is currently selected.
    pub highlighted: bool,
}

impl LinkStyle {
    pub fn from_config(visual: &VisualConfig, highlighted: bool) -> Self {
        Self {
            color: if highlighted {
                visual.link_highlight_color
            } else {
                visual.link_color
            },
            width: visual.stroke_width,
            outline_color: visual.link_outline_color,
            outline_width: visual.link_outline_width,
            highlighted,
        }
    }
}

/// Emphasis drawn around a selected block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightStyle {
    /// Shadow tinted with the block's own color.
    pub shadow_color: HexColor,
    pub shadow_blur: f64,
    pub shadow_opacity: f64,
    pub stroke: HexColor,
}

impl HighlightStyle {
    pub fn for_block(block_color: HexColor, visual: &VisualConfig) -> Self {
        Self {
            shadow_color: block_color,
            shadow_blur: visual.highlight_blur,
            shadow_opacity: visual.highlight_opacity,
            stroke: visual.highlight_stroke,
        }
    }
}

/// Produces disposable link visuals.
pub trait LinkRenderer {
    /// Draw a link curve.
    fn draw_link(&mut self, path: &BezPath, style: &LinkStyle) -> VisualId;
    /// Draw a filled arrowhead.
    fn draw_arrow(&mut self, head: &BezPath, style: &LinkStyle) -> VisualId;
    /// Dispose a visual previously returned by this renderer.
    fn remove(&mut self, visual: VisualId);
}

/// Renderer that draws nothing; hands out fresh ids so bookkeeping still works.
#[derive(Debug, Default)]
pub struct NullRenderer {
    next_id: u64,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> VisualId {
        self.next_id += 1;
        VisualId(self.next_id)
    }
}

impl LinkRenderer for NullRenderer {
    fn draw_link(&mut self, _path: &BezPath, _style: &LinkStyle) -> VisualId {
        self.next()
    }

    fn draw_arrow(&mut self, _head: &BezPath, _style: &LinkStyle) -> VisualId {
        self.next()
    }

    fn remove(&mut self, _visual: VisualId) {}
}

#[cfg(test)]
pub(crate) mod recording {
    //! Renderer double that records every call for assertions.

    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    pub struct RenderLog {
        next_id: u64,
        /// Visuals currently alive, with the style they were drawn with.
        pub live: HashMap<VisualId, LinkStyle>,
        pub links_drawn: usize,
        pub arrows_drawn: usize,
        pub removed: usize,
        /// Removals of ids that were never drawn or were already removed.
        pub stale_removals: usize,
    }

    impl RenderLog {
        pub fn draws(&self) -> usize {
            self.links_drawn + self.arrows_drawn
        }

        pub fn live_highlighted(&self) -> usize {
            self.live.values().filter(|s| s.highlighted).count()
        }
    }

    /// Cloneable handle; the test keeps one clone, the graph owns the other.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingRenderer {
        pub log: Rc<RefCell<RenderLog>>,
    }

    impl RecordingRenderer {
        fn record(&mut self, style: &LinkStyle) -> VisualId {
            let mut log = self.log.borrow_mut();
            log.next_id += 1;
            let id = VisualId(log.next_id);
            log.live.insert(id, style.clone());
            id
        }
    }

    impl LinkRenderer for RecordingRenderer {
        fn draw_link(&mut self, _path: &BezPath, style: &LinkStyle) -> VisualId {
            self.log.borrow_mut().links_drawn += 1;
            self.record(style)
        }

        fn draw_arrow(&mut self, _head: &BezPath, style: &LinkStyle) -> VisualId {
            self.log.borrow_mut().arrows_drawn += 1;
            self.record(style)
        }

        fn remove(&mut self, visual: VisualId) {
            let mut log = self.log.borrow_mut();
            if log.live.remove(&visual).is_some() {
                log.removed += 1;
            } else {
                log.stale_removals += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_renderer_ids_are_unique() {
        let mut renderer = NullRenderer::new();
        let style = LinkStyle::from_config(&VisualConfig::default(), false);
        let a = renderer.draw_link(&BezPath::new(), &style);
        let b = renderer.draw_arrow(&BezPath::new(), &style);
        assert_ne!(a, b);
    }

    #[test]
    fn test_link_style_highlight_color() {
        let visual = VisualConfig::default();
        assert_eq!(LinkStyle::from_config(&visual, false).color, visual.link_color);
        assert_eq!(
            LinkStyle::from_config(&visual, true).color,
            visual.link_highlight_color
        );
    }

    #[test]
    fn test_highlight_uses_block_color() {
        let visual = VisualConfig {
            highlight_blur: 4.0,
            highlight_opacity: 0.25,
            ..Default::default()
        };
        let style = HighlightStyle::for_block(HexColor::rgb(0x12, 0x34, 0x56), &visual);
        assert_eq!(style.shadow_color, HexColor::rgb(0x12, 0x34, 0x56));
        assert_eq!(style.shadow_blur, 4.0);
        assert_eq!(style.shadow_opacity, 0.25);
        assert_eq!(style.stroke, visual.highlight_stroke);
    }
}
