use image::{RgbImage, RgbaImage, imageops};

use crate::config::RenderConfig;
use crate::foundation::color::Rgb;
use crate::foundation::error::{DotqrError, DotqrResult};
use crate::matrix::ModuleMatrix;
use crate::plan::{DrawCmd, RenderPlan, compile_plan};

/// Render a matrix to a fixed-size RGB bitmap.
///
/// The plan is drawn at native density (one module = `module_size`
/// pixels) and then resampled to `output_size` with Lanczos3, so the
/// visual weight of dots and rings stays consistent across symbol
/// versions.
pub fn render(matrix: &ModuleMatrix, config: &RenderConfig) -> DotqrResult<RgbImage> {
    let plan = compile_plan(matrix, config, config.native_pitch())?;
    render_plan(&plan, config)
}

/// Draw an already-compiled plan (native pixel units) and resample it.
pub fn render_plan(plan: &RenderPlan, config: &RenderConfig) -> DotqrResult<RgbImage> {
    let native = plan.extent.round() as u32;
    let side: u16 = native.try_into().map_err(|_| {
        DotqrError::invalid_geometry(format!(
            "native canvas {native}px exceeds the rasterizer surface limit ({}px)",
            u16::MAX
        ))
    })?;

    let mut ctx = vello_cpu::RenderContext::new(side, side);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for cmd in &plan.cmds {
        ctx.set_paint(color_to_cpu(cmd.color()));
        match cmd {
            DrawCmd::Rect { rect, .. } => {
                ctx.fill_rect(&rect_to_cpu(*rect));
            }
            DrawCmd::Circle { center, radius, .. } => {
                ctx.fill_path(&circle_path(*center, *radius));
            }
        }
    }
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(side, side);
    ctx.render_to_pixmap(&mut pixmap);

    // Plan colors are opaque, so the premultiplied pixmap bytes are
    // also the straight-alpha bytes.
    let native_rgba = RgbaImage::from_raw(native, native, pixmap.data_as_u8_slice().to_vec())
        .ok_or_else(|| DotqrError::render("native pixmap byte length mismatch"))?;
    let resized = imageops::resize(
        &native_rgba,
        config.output_size,
        config.output_size,
        imageops::FilterType::Lanczos3,
    );
    Ok(image::DynamicImage::ImageRgba8(resized).to_rgb8())
}

/// Lossless PNG bytes for a rendered bitmap.
pub fn encode_png(img: &RgbImage) -> DotqrResult<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .map_err(|e| DotqrError::render(format!("png encode failed: {e}")))?;
    Ok(bytes)
}

fn color_to_cpu(c: Rgb) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn rect_to_cpu(r: kurbo::Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn circle_path(center: kurbo::Point, radius: f64) -> vello_cpu::kurbo::BezPath {
    use kurbo::{PathEl, Shape as _};

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in kurbo::Circle::new(center, radius).path_elements(0.1) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
