use crate::core::geo::Point;
use crate::core::viewport::Viewport;
use crate::input::events::{InputEvent, PointerButton};

/// Interaction state mutated by pointer/wheel handlers and read by the
/// per-frame viewport update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionState {
    pub desired_zoom: f64,
    pub view_center: Point,
    pub dragging: bool,
    pub pointer_down: bool,
    pub pointer: Point,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            desired_zoom: 0.0,
            view_center: Point::default(),
            dragging: false,
            pointer_down: false,
            pointer: Point::default(),
        }
    }
}

/// Converts raw pointer/wheel input into a desired zoom and a pan offset,
/// independent of any rendering backend.
///
/// State machine: idle → (pointer down) → dragging → (pointer up/leave) →
/// idle. While dragging, the world-space delta between the previous and
/// current pointer positions is subtracted from the view center so the image
/// follows the cursor exactly at any zoom.
#[derive(Debug)]
pub struct InteractionController {
    state: InteractionState,
    /// Upper clamp for the desired zoom
    max_zoom_in: f64,
}

impl InteractionController {
    pub fn new(max_zoom_in: f64) -> Self {
        Self {
            state: InteractionState::default(),
            max_zoom_in,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn view_center(&self) -> Point {
        self.state.view_center
    }

    pub fn set_view_center(&mut self, center: Point) {
        self.state.view_center = center;
    }

    pub fn desired_zoom(&self) -> f64 {
        self.state.desired_zoom
    }

    /// Sets the zoom target directly, clamped so the view never magnifies
    /// past the allowed maximum.
    pub fn set_desired_zoom(&mut self, zoom: f64) {
        self.state.desired_zoom = zoom.min(self.max_zoom_in);
    }

    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    /// Applies one input event. Pan deltas are computed in world space via
    /// the viewport the event was observed through; no fetch or async work
    /// happens here.
    pub fn handle_event(&mut self, event: InputEvent, viewport: &Viewport) {
        match event {
            InputEvent::PointerDown { position, button } => {
                self.state.pointer_down = button == PointerButton::Primary;
                self.state.pointer = position;
            }
            InputEvent::PointerMove { position } => {
                if self.state.pointer_down {
                    self.state.dragging = true;

                    let delta = viewport
                        .unproject(&position)
                        .subtract(&viewport.unproject(&self.state.pointer));
                    self.state.view_center = self.state.view_center.subtract(&delta);
                }
                self.state.pointer = position;
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.state.dragging = false;
                self.state.pointer_down = false;
            }
            InputEvent::Wheel { delta_y } => {
                // One wheel notch is one discrete zoom level step
                if delta_y != 0.0 {
                    self.set_desired_zoom(self.state.desired_zoom - delta_y.signum());
                }
            }
            InputEvent::Resize { .. } => {
                // Size changes are handled by the engine; nothing to track here
            }
        }
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(crate::core::constants::DEFAULT_MAX_ZOOM_IN)
    }
}
