use std::fmt::Write as _;

use crate::config::RenderConfig;
use crate::foundation::error::DotqrResult;
use crate::matrix::ModuleMatrix;
use crate::plan::{DrawCmd, RenderPlan, compile_plan};

/// Render a matrix to an SVG document.
///
/// The plan is compiled straight into output units
/// (`output_size / total modules` per module), the same geometry the
/// raster path expresses as native-pixels-then-resample.
pub fn render(matrix: &ModuleMatrix, config: &RenderConfig) -> DotqrResult<String> {
    let plan = compile_plan(matrix, config, config.unit_pitch(matrix.size()))?;
    Ok(render_plan(&plan, config))
}

/// Serialize an already-compiled plan (output units) to SVG markup.
///
/// The root element declares `width`, `height`, and `viewBox` all equal
/// to `output_size`, so the document scales losslessly when embedded.
/// Always uses Unix newlines.
pub fn render_plan(plan: &RenderPlan, config: &RenderConfig) -> String {
    let size = config.output_size;
    let mut out = String::with_capacity(plan.cmds.len() * 64 + 128);

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{size}\" height=\"{size}\" viewBox=\"0 0 {size} {size}\">"
    );
    for cmd in &plan.cmds {
        match cmd {
            DrawCmd::Rect { rect, color } => {
                let _ = writeln!(
                    out,
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
                    fmt_unit(rect.x0),
                    fmt_unit(rect.y0),
                    fmt_unit(rect.width()),
                    fmt_unit(rect.height()),
                    color.to_hex()
                );
            }
            DrawCmd::Circle { center, radius, color } => {
                let _ = writeln!(
                    out,
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>",
                    fmt_unit(center.x),
                    fmt_unit(center.y),
                    fmt_unit(*radius),
                    color.to_hex()
                );
            }
        }
    }
    out.push_str("</svg>\n");
    out
}

/// Two fractional digits, trailing zeros trimmed. On a canvas of ~1000
/// units that keeps coordinates well below a hundredth of a pixel off
/// while keeping the markup stable and compact.
fn fmt_unit(v: f64) -> String {
    let s = format!("{v:.2}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Style;
    use crate::provider::{EcLevel, encode_matrix};

    #[test]
    fn fmt_unit_trims_trailing_zeros() {
        assert_eq!(fmt_unit(1000.0), "1000");
        assert_eq!(fmt_unit(34.482758), "34.48");
        assert_eq!(fmt_unit(137.9), "137.9");
        assert_eq!(fmt_unit(0.0), "0");
    }

    #[test]
    fn document_declares_fixed_logical_size() {
        let symbol = encode_matrix("HELLO WORLD", EcLevel::Low, None).unwrap();
        let svg = render(&symbol.matrix, &RenderConfig::default()).unwrap();

        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(svg.contains("width=\"1000\" height=\"1000\" viewBox=\"0 0 1000 1000\""));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn circular_document_has_dots_plus_nine_rings() {
        let symbol = encode_matrix("HELLO WORLD", EcLevel::Low, None).unwrap();
        let config = RenderConfig::default();
        let svg = render(&symbol.matrix, &config).unwrap();
        let plan = compile_plan(
            &symbol.matrix,
            &config,
            config.unit_pitch(symbol.matrix.size()),
        )
        .unwrap();

        let circles = svg.matches("<circle ").count();
        assert_eq!(circles + 1, plan.cmds.len());
        assert_eq!(svg.matches("<rect ").count(), 1);
    }

    #[test]
    fn square_document_has_one_rect_per_dark_module() {
        let symbol = encode_matrix("HELLO WORLD", EcLevel::Low, None).unwrap();
        let config = RenderConfig::default().with_style(Style::Square);
        let svg = render(&symbol.matrix, &config).unwrap();

        assert_eq!(
            svg.matches("<rect ").count(),
            symbol.matrix.dark_count() + 1
        );
        assert_eq!(svg.matches("<circle ").count(), 0);
    }
}
