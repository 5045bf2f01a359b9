use crate::foundation::color::Hsba;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::BreatheResult;

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

/// Destination for abstract polygon-fill commands.
///
/// The engine never touches pixels; it clears the surface once per frame and then issues
/// filled closed polygons in draw order. Surfaces are created through their own constructors.
pub trait RenderSurface {
    /// Current surface size.
    fn size(&self) -> Canvas;

    /// Start a new frame filled with `color`.
    fn clear(&mut self, color: Hsba);

    /// Fill the closed polygon through `vertices` (last joins first). No stroke.
    fn fill_polygon(&mut self, vertices: &[Point], color: Hsba);

    /// Change the surface size. Resizing to the current size is a no-op.
    fn resize(&mut self, canvas: Canvas) -> BreatheResult<()>;
}

/// A single recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Frame clear.
    Clear(Hsba),
    /// Filled polygon in surface coordinates.
    Fill {
        /// Polygon vertices.
        vertices: Vec<Point>,
        /// Fill color.
        color: Hsba,
    },
}

/// Surface that records commands since the last clear. Useful for tests and debugging.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create a recorder of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            commands: Vec::new(),
        }
    }

    /// Commands issued since the last clear (the clear itself included).
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of polygons filled since the last clear.
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { .. }))
            .count()
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self, color: Hsba) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_polygon(&mut self, vertices: &[Point], color: Hsba) {
        self.commands.push(DrawCommand::Fill {
            vertices: vertices.to_vec(),
            color,
        });
    }

    fn resize(&mut self, canvas: Canvas) -> BreatheResult<()> {
        self.canvas = canvas;
        Ok(())
    }
}

/// Surface that discards everything. Used to replay animation state without rasterizing.
#[derive(Clone, Copy, Debug)]
pub struct NullSurface {
    canvas: Canvas,
}

impl NullSurface {
    /// Create a discarding surface of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }
}

impl RenderSurface for NullSurface {
    fn size(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self, _color: Hsba) {}

    fn fill_polygon(&mut self, _vertices: &[Point], _color: Hsba) {}

    fn resize(&mut self, canvas: Canvas) -> BreatheResult<()> {
        self.canvas = canvas;
        Ok(())
    }
}
