//! Pointer event vocabulary.
//!
//! Positions are world coordinates; viewport transforms happen before events
//! reach the editor.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        position: Point,
    },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => *position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        let events: Vec<PointerEvent> = serde_json::from_str(
            r#"[
                { "kind": "down", "position": { "x": 1.0, "y": 2.0 } },
                { "kind": "move", "position": { "x": 3.0, "y": 4.0 } },
                { "kind": "up", "position": { "x": 5.0, "y": 6.0 }, "button": "Right" }
            ]"#,
        )
        .unwrap();

        assert_eq!(
            events[0],
            PointerEvent::Down {
                position: Point::new(1.0, 2.0),
                button: MouseButton::Left
            }
        );
        assert_eq!(events[1].position(), Point::new(3.0, 4.0));
        assert_eq!(
            events[2],
            PointerEvent::Up {
                position: Point::new(5.0, 6.0),
                button: MouseButton::Right
            }
        );
    }
}
