use eframe::egui::Vec2;

pub(in crate::app) const ZOOM_MIN: f32 = 0.1;
pub(in crate::app) const ZOOM_MAX: f32 = 3.0;

/// Scale + translate mapping between model space and viewport space. The
/// view layer adds `rect.center()` on top, so `Vec2::ZERO` here is the
/// center of the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Camera {
    pub(in crate::app) zoom: f32,
    pub(in crate::app) pan: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Camera {
    pub(in crate::app) fn to_screen(&self, world: Vec2) -> Vec2 {
        world * self.zoom + self.pan
    }

    pub(in crate::app) fn to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.zoom
    }

    /// Multiplies zoom by `factor` (clamped to the configured range) while
    /// keeping the model point under `anchor` stationary on screen.
    pub(in crate::app) fn zoom_by(&mut self, factor: f32, anchor: Vec2) {
        let world_before = self.to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan = anchor - world_before * self.zoom;
    }

    pub(in crate::app) fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub(in crate::app) fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::vec2;

    const TOLERANCE: f32 = 1e-4;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < TOLERANCE
    }

    #[test]
    fn round_trip_is_identity() {
        let mut camera = Camera::default();
        camera.zoom_by(1.7, vec2(40.0, -12.0));
        camera.pan_by(vec2(-130.0, 55.0));
        camera.zoom_by(0.6, vec2(-8.0, 90.0));

        for point in [
            Vec2::ZERO,
            vec2(1.0, 1.0),
            vec2(-512.0, 377.5),
            vec2(0.001, -900.0),
        ] {
            assert!(close(camera.to_world(camera.to_screen(point)), point));
        }
    }

    #[test]
    fn zoom_keeps_anchor_stationary() {
        let mut camera = Camera::default();
        camera.pan_by(vec2(25.0, -60.0));
        let anchor = vec2(80.0, 45.0);
        let world_before = camera.to_world(anchor);

        camera.zoom_by(1.5, anchor);

        assert!(close(camera.to_screen(world_before), anchor));
    }

    #[test]
    fn zoom_inverse_law() {
        let mut camera = Camera::default();
        camera.pan_by(vec2(10.0, 20.0));
        let original = camera;
        let anchor = vec2(-33.0, 71.0);

        camera.zoom_by(1.4, anchor);
        camera.zoom_by(1.0 / 1.4, anchor);

        assert!((camera.zoom - original.zoom).abs() < TOLERANCE);
        assert!(close(camera.pan, original.pan));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = Camera::default();
        camera.zoom_by(100.0, Vec2::ZERO);
        assert_eq!(camera.zoom, ZOOM_MAX);
        camera.zoom_by(1e-6, Vec2::ZERO);
        assert_eq!(camera.zoom, ZOOM_MIN);
    }

    #[test]
    fn reset_restores_identity() {
        let mut camera = Camera::default();
        camera.zoom_by(2.0, vec2(5.0, 5.0));
        camera.pan_by(vec2(300.0, -1.0));
        camera.reset();
        assert_eq!(camera, Camera::default());
    }
}
