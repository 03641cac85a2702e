//! RGBA colors and the palette used when drawing meshes.

/// An 8-bit per channel RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Opaque gray with all channels set to `tone`.
    pub const fn gray(tone: u8) -> Self {
        Self::rgb(tone, tone, tone)
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const GRAY: Color = Color::gray(200);
pub const LIGHT_GRAY: Color = Color::gray(240);

/// Outline of a face that points toward the viewer.
pub const OUTLINE_VISIBLE: Color = BLACK;
/// Outline of a back-facing face.
pub const OUTLINE_HIDDEN: Color = LIGHT_GRAY;
/// Outline of every face of the accent mesh.
pub const OUTLINE_ACCENT: Color = RED;
/// Interior of triangles in the triangle overlay.
pub const TRIANGLE_FILL: Color = WHITE;
/// Edge pixels of triangles in the triangle overlay.
pub const TRIANGLE_EDGE: Color = GRAY;
/// Surface color shown behind transparent pixels by the viewer.
pub const BACKGROUND: Color = WHITE;
