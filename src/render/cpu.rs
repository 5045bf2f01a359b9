use crate::foundation::color::Hsba;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{BreatheError, BreatheResult};
use crate::render::surface::{FrameRGBA, RenderSurface};

/// CPU surface powered by `vello_cpu`.
///
/// Draw calls are recorded into a render context and rasterized by [`CpuSurface::finish_frame`]
/// into premultiplied RGBA8.
pub struct CpuSurface {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    fills: usize,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .field("fills", &self.fills)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Fails if either dimension exceeds `u16::MAX`.
    pub fn new(canvas: Canvas) -> BreatheResult<Self> {
        let (w, h) = dims_u16(canvas)?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
            fills: 0,
        })
    }

    /// Polygons filled since the last clear.
    pub fn fill_count(&self) -> usize {
        self.fills
    }

    /// Rasterize everything drawn since the last clear and read the frame back.
    #[tracing::instrument(level = "trace", skip_all, fields(fills = self.fills))]
    pub fn finish_frame(&mut self) -> FrameRGBA {
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }
}

impl RenderSurface for CpuSurface {
    fn size(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self, color: Hsba) {
        self.ctx.reset();
        self.fills = 0;
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_paint(&mut self.ctx, color);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        ));
    }

    fn fill_polygon(&mut self, vertices: &[Point], color: Hsba) {
        let Some((first, rest)) = vertices.split_first() else {
            return;
        };
        if rest.len() < 2 {
            return;
        }
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(to_cpu(*first));
        for p in rest {
            path.line_to(to_cpu(*p));
        }
        path.close_path();

        set_paint(&mut self.ctx, color);
        self.ctx.fill_path(&path);
        self.fills += 1;
    }

    fn resize(&mut self, canvas: Canvas) -> BreatheResult<()> {
        if canvas == self.canvas {
            return Ok(());
        }
        let (w, h) = dims_u16(canvas)?;
        self.ctx = vello_cpu::RenderContext::new(w, h);
        self.pixmap = vello_cpu::Pixmap::new(w, h);
        self.canvas = canvas;
        self.fills = 0;
        tracing::debug!(width = w, height = h, "cpu surface resized");
        Ok(())
    }
}

fn set_paint(ctx: &mut vello_cpu::RenderContext, color: Hsba) {
    let [r, g, b, a] = color.to_rgba8();
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

fn to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn dims_u16(canvas: Canvas) -> BreatheResult<(u16, u16)> {
    let w = u16::try_from(canvas.width).map_err(|_| {
        BreatheError::render(format!("surface width exceeds u16: {}", canvas.width))
    })?;
    let h = u16::try_from(canvas.height).map_err(|_| {
        BreatheError::render(format!("surface height exceeds u16: {}", canvas.height))
    })?;
    if w == 0 || h == 0 {
        return Err(BreatheError::render("surface width/height must be non-zero"));
    }
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
