use crate::core::geo::Point;
use serde::{Deserialize, Serialize};

/// Raw pointer/wheel/resize input the host container forwards to the engine.
///
/// The engine never assumes a specific windowing API, only "a rectangle that
/// can report size and emit pointer, wheel and resize events".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer button pressed
    PointerDown { position: Point, button: PointerButton },
    /// Pointer moved, with position relative to the container
    PointerMove { position: Point },
    /// Pointer button released
    PointerUp,
    /// Pointer left the container
    PointerLeave,
    /// Wheel scrolled; positive `delta_y` scrolls away (zoom out)
    Wheel { delta_y: f64 },
    /// Container resized to the given pixel dimensions
    Resize { width: f64, height: f64 },
}

/// Pointer button types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Primary,
    Secondary,
    Auxiliary,
}

impl InputEvent {
    /// The position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position, .. } => Some(*position),
            InputEvent::PointerMove { position } => Some(*position),
            _ => None,
        }
    }

    pub fn is_pointer_event(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerDown { .. }
                | InputEvent::PointerMove { .. }
                | InputEvent::PointerUp
                | InputEvent::PointerLeave
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        let down = InputEvent::PointerDown {
            position: Point::new(10.0, 20.0),
            button: PointerButton::Primary,
        };
        assert_eq!(down.position(), Some(Point::new(10.0, 20.0)));
        assert!(down.is_pointer_event());

        let wheel = InputEvent::Wheel { delta_y: 1.0 };
        assert_eq!(wheel.position(), None);
        assert!(!wheel.is_pointer_event());
    }
}
