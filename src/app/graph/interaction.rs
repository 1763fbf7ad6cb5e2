use eframe::egui::{self, Rect, Ui, Vec2};

use super::super::ViewModel;
use super::super::render::Scene;

/// Maximum pointer displacement (screen px) for a release to still count as
/// a click rather than a drag.
pub(in crate::app) const CLICK_TOLERANCE: f32 = 4.0;

/// Pointer gesture state. Exactly one of pan, node drag, or click is active
/// per press/release cycle; a drag that moves the pointer never also pans.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum Gesture {
    Idle,
    Panning {
        press: Vec2,
        last: Vec2,
        moved: bool,
    },
    Dragging {
        index: usize,
        press: Vec2,
        moved: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum GestureEvent {
    None,
    Pan { delta: Vec2 },
    DragNode { index: usize, pointer: Vec2 },
}

/// What a pointer release resolved to. A drag release always frees the
/// node; it is additionally a click when the pointer barely moved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct ReleaseOutcome {
    pub(in crate::app) released_node: Option<usize>,
    pub(in crate::app) click: Option<Click>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum Click {
    Node(usize),
    Background,
}

impl Gesture {
    pub(in crate::app) fn on_press(&mut self, pointer: Vec2, hovered: Option<usize>) {
        *self = match hovered {
            Some(index) => Self::Dragging {
                index,
                press: pointer,
                moved: false,
            },
            None => Self::Panning {
                press: pointer,
                last: pointer,
                moved: false,
            },
        };
    }

    pub(in crate::app) fn on_move(&mut self, pointer: Vec2) -> GestureEvent {
        match self {
            Self::Idle => GestureEvent::None,
            Self::Panning { press, last, moved } => {
                let delta = pointer - *last;
                *last = pointer;
                *moved |= (pointer - *press).length() > CLICK_TOLERANCE;
                GestureEvent::Pan { delta }
            }
            Self::Dragging {
                index,
                press,
                moved,
            } => {
                *moved |= (pointer - *press).length() > CLICK_TOLERANCE;
                GestureEvent::DragNode {
                    index: *index,
                    pointer,
                }
            }
        }
    }

    pub(in crate::app) fn on_release(&mut self) -> ReleaseOutcome {
        let outcome = match *self {
            Self::Idle => ReleaseOutcome {
                released_node: None,
                click: None,
            },
            Self::Panning { moved, .. } => ReleaseOutcome {
                released_node: None,
                click: (!moved).then_some(Click::Background),
            },
            Self::Dragging { index, moved, .. } => ReleaseOutcome {
                released_node: Some(index),
                click: (!moved).then_some(Click::Node(index)),
            },
        };
        *self = Self::Idle;
        outcome
    }

    pub(in crate::app) fn is_active(&self) -> bool {
        *self != Self::Idle
    }
}

impl ViewModel {
    /// Wheel zoom about the hover point, teacher-style: small clamped factor
    /// per scroll tick, anchor preserved by the camera.
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.camera.zoom_by(factor, pointer - rect.center());
    }

    /// Feeds raw pointer state through the gesture machine and applies the
    /// resulting effects to the camera, the simulation, and the selection.
    pub(in crate::app) fn handle_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        scene: &Scene,
    ) {
        let (pointer, pressed, released) = ui.input(|input| {
            (
                input.pointer.latest_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
            )
        });

        let Some(pointer) = pointer else {
            if released {
                self.apply_release();
            }
            return;
        };
        let cam_point = pointer - rect.center();

        if pressed && response.hovered() {
            let hovered = scene.hit_test(pointer);
            self.gesture.on_press(cam_point, hovered);
            if let Gesture::Dragging { index, .. } = self.gesture {
                // Pin in place right away so the node stops moving under the
                // pointer; the next step reads the pin.
                let world = self.camera.to_world(cam_point);
                self.sim.pin(index, world);
                self.sim.reheat();
            }
        }

        match self.gesture.on_move(cam_point) {
            GestureEvent::None => {}
            GestureEvent::Pan { delta } => self.camera.pan_by(delta),
            GestureEvent::DragNode { index, pointer } => {
                let world = self.camera.to_world(pointer);
                self.sim.pin(index, world);
                self.sim.reheat();
            }
        }

        if released {
            self.apply_release();
        }
    }

    fn apply_release(&mut self) {
        let outcome = self.gesture.on_release();
        if let Some(index) = outcome.released_node {
            self.sim.release(index);
        }
        match outcome.click {
            Some(Click::Node(index)) => self.set_selected(Some(index)),
            Some(Click::Background) => self.set_selected(None),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    #[test]
    fn short_press_on_node_is_a_click() {
        let mut gesture = Gesture::Idle;
        gesture.on_press(vec2(10.0, 10.0), Some(3));
        gesture.on_move(vec2(11.0, 11.5));
        let outcome = gesture.on_release();

        assert_eq!(outcome.released_node, Some(3));
        assert_eq!(outcome.click, Some(Click::Node(3)));
        assert_eq!(gesture, Gesture::Idle);
    }

    #[test]
    fn moved_drag_is_not_a_click() {
        let mut gesture = Gesture::Idle;
        gesture.on_press(vec2(10.0, 10.0), Some(3));
        let event = gesture.on_move(vec2(60.0, 10.0));
        assert_eq!(
            event,
            GestureEvent::DragNode {
                index: 3,
                pointer: vec2(60.0, 10.0)
            }
        );

        // Returning near the press point does not reclassify: the gesture
        // moved, so it stays a drag.
        gesture.on_move(vec2(10.5, 10.0));
        let outcome = gesture.on_release();
        assert_eq!(outcome.released_node, Some(3));
        assert_eq!(outcome.click, None);
    }

    #[test]
    fn background_drag_pans_and_never_selects() {
        let mut gesture = Gesture::Idle;
        gesture.on_press(vec2(0.0, 0.0), None);
        assert_eq!(
            gesture.on_move(vec2(15.0, 0.0)),
            GestureEvent::Pan {
                delta: vec2(15.0, 0.0)
            }
        );
        assert_eq!(
            gesture.on_move(vec2(20.0, -5.0)),
            GestureEvent::Pan {
                delta: vec2(5.0, -5.0)
            }
        );
        let outcome = gesture.on_release();
        assert_eq!(outcome.released_node, None);
        assert_eq!(outcome.click, None);
    }

    #[test]
    fn still_background_press_clicks_the_background() {
        let mut gesture = Gesture::Idle;
        gesture.on_press(vec2(5.0, 5.0), None);
        let outcome = gesture.on_release();
        assert_eq!(outcome.click, Some(Click::Background));
    }

    #[test]
    fn node_drag_never_pans() {
        let mut gesture = Gesture::Idle;
        gesture.on_press(vec2(0.0, 0.0), Some(1));
        for step in 1..20 {
            let event = gesture.on_move(vec2(step as f32 * 10.0, 0.0));
            assert!(matches!(event, GestureEvent::DragNode { index: 1, .. }));
        }
    }

    #[test]
    fn idle_move_does_nothing() {
        let mut gesture = Gesture::Idle;
        assert_eq!(gesture.on_move(vec2(100.0, 100.0)), GestureEvent::None);
        let outcome = gesture.on_release();
        assert_eq!(outcome.released_node, None);
        assert_eq!(outcome.click, None);
    }
}
