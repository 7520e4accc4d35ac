//! Renderer that logs link visuals instead of drawing them.

use blockwire_core::{LinkRenderer, LinkStyle, VisualId};
use kurbo::{BezPath, Shape};

#[derive(Debug, Default)]
pub struct LogRenderer {
    next_id: u64,
    live: usize,
}

impl LogRenderer {
    fn next(&mut self) -> VisualId {
        self.next_id += 1;
        self.live += 1;
        VisualId(self.next_id)
    }
}

impl LinkRenderer for LogRenderer {
    fn draw_link(&mut self, path: &BezPath, style: &LinkStyle) -> VisualId {
        let id = self.next();
        log::debug!(
            "link #{} bounds={:?} color={:?} highlighted={}",
            id.0,
            path.bounding_box(),
            style.color.color(),
            style.highlighted
        );
        id
    }

    fn draw_arrow(&mut self, head: &BezPath, style: &LinkStyle) -> VisualId {
        let id = self.next();
        log::debug!(
            "arrow #{} bounds={:?} highlighted={}",
            id.0,
            head.bounding_box(),
            style.highlighted
        );
        id
    }

    fn remove(&mut self, visual: VisualId) {
        self.live = self.live.saturating_sub(1);
        log::trace!("remove #{} ({} live)", visual.0, self.live);
    }
}
