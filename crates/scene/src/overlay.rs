use glam::Mat4;
use orbitview_common::{ScreenRect, Viewport};

/// Screen-aligned UI quad with a cursor hover test.
///
/// Screen space uses a top-left origin with +Y pointing down, matching the
/// cursor coordinates reported by the window.
#[derive(Debug, Clone)]
pub struct OverlayQuad {
    rect: ScreenRect,
    hovered: bool,
}

impl Default for OverlayQuad {
    fn default() -> Self {
        Self::new(ScreenRect::new(100.0, 100.0, 200.0, 200.0))
    }
}

impl OverlayQuad {
    pub fn new(rect: ScreenRect) -> Self {
        Self {
            rect,
            hovered: false,
        }
    }

    pub fn rect(&self) -> ScreenRect {
        self.rect
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Re-run the hit test for `cursor`; returns true when hover state changed.
    pub fn update_hover(&mut self, cursor: (f64, f64)) -> bool {
        let hovered = self.rect.contains(cursor.0, cursor.1);
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    /// Orthographic projection mapping `[0, width] × [0, height]` pixels to
    /// clip space, with pixel row 0 at the top of the screen.
    pub fn projection(viewport: Viewport) -> Mat4 {
        Mat4::orthographic_rh(
            0.0,
            viewport.width as f32,
            viewport.height as f32,
            0.0,
            -1.0,
            1.0,
        )
    }

    /// Corner positions in pixels, ordered for two counter-clockwise
    /// triangles after the Y flip of [`OverlayQuad::projection`].
    pub fn corners(&self) -> [[f32; 2]; 6] {
        let ScreenRect {
            x,
            y,
            width,
            height,
        } = self.rect;
        let (x1, y1) = (x + width, y + height);
        [[x, y], [x, y1], [x1, y1], [x1, y1], [x1, y], [x, y]]
    }
}
