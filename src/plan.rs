use kurbo::{Point, Rect};

use crate::config::{RenderConfig, Style};
use crate::foundation::color::Rgb;
use crate::foundation::error::{DotqrError, DotqrResult};
use crate::matrix::{FinderRegion, ModuleMatrix};

/// Diameter of a data dot relative to its module pitch. Adjacent dots
/// keep a visible gap for scanner contrast.
pub const DOT_FILL_RATIO: f64 = 0.85;

/// Finder ring radii in module pitches, outermost first. Colors
/// alternate foreground / background / foreground in draw order.
pub const FINDER_RING_RADII: [f64; 3] = [3.5, 2.5, 1.5];

/// One solid-fill primitive, in the coordinate unit the plan was
/// compiled for (native pixels or output units).
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    Rect { rect: Rect, color: Rgb },
    Circle { center: Point, radius: f64, color: Rgb },
}

impl DrawCmd {
    /// Axis-aligned bounding box of the filled area.
    pub fn bounds(&self) -> Rect {
        match self {
            DrawCmd::Rect { rect, .. } => *rect,
            DrawCmd::Circle { center, radius, .. } => Rect::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            DrawCmd::Rect { color, .. } | DrawCmd::Circle { color, .. } => *color,
        }
    }
}

/// Backend-agnostic drawing plan for one symbol: an ordered command
/// list with the background fill first and, in circular style, the
/// finder rings last so they fully occlude anything beneath them.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// Side length of the square canvas the commands are expressed in.
    pub extent: f64,
    pub cmds: Vec<DrawCmd>,
}

/// Compile a module matrix into a [`RenderPlan`] at the given module
/// pitch.
///
/// Circular style skips every module inside a finder region and emits
/// three concentric ring circles per region instead; square style
/// applies the generic per-module rule everywhere.
pub fn compile_plan(
    matrix: &ModuleMatrix,
    config: &RenderConfig,
    pitch: f64,
) -> DotqrResult<RenderPlan> {
    config.validate()?;
    if !pitch.is_finite() || pitch <= 0.0 {
        return Err(DotqrError::invalid_config(format!(
            "module pitch must be positive, got {pitch}"
        )));
    }
    let regions = FinderRegion::corners(matrix.size())?;

    let offset = f64::from(config.quiet_zone) * pitch;
    let extent = config.total_modules(matrix.size()) as f64 * pitch;

    let mut cmds = Vec::with_capacity(matrix.dark_count() + 1 + 3 * FINDER_RING_RADII.len());
    cmds.push(DrawCmd::Rect {
        rect: Rect::new(0.0, 0.0, extent, extent),
        color: config.background,
    });

    match config.style {
        Style::Square => {
            for (row, col) in matrix.dark_modules() {
                let x = offset + col as f64 * pitch;
                let y = offset + row as f64 * pitch;
                cmds.push(DrawCmd::Rect {
                    rect: Rect::new(x, y, x + pitch, y + pitch),
                    color: config.foreground,
                });
            }
        }
        Style::Circular => {
            let radius = DOT_FILL_RATIO * pitch / 2.0;
            for (row, col) in matrix.dark_modules() {
                if regions.iter().any(|r| r.contains(row, col)) {
                    continue;
                }
                cmds.push(DrawCmd::Circle {
                    center: Point::new(
                        offset + (col as f64 + 0.5) * pitch,
                        offset + (row as f64 + 0.5) * pitch,
                    ),
                    radius,
                    color: config.foreground,
                });
            }
            for region in &regions {
                let center = region.center(offset, pitch);
                for (i, ring) in FINDER_RING_RADII.iter().enumerate() {
                    let color = if i % 2 == 0 {
                        config.foreground
                    } else {
                        config.background
                    };
                    cmds.push(DrawCmd::Circle {
                        center,
                        radius: ring * pitch,
                        color,
                    });
                }
            }
        }
    }

    Ok(RenderPlan { extent, cmds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::FINDER_SPAN;

    /// 21x21 checkerboard: dark wherever row+col is even. Not a real
    /// symbol, but plan compilation only cares about geometry.
    fn checkerboard() -> ModuleMatrix {
        let size = 21;
        let modules = (0..size * size)
            .map(|i| (i / size + i % size) % 2 == 0)
            .collect();
        ModuleMatrix::new(size, modules).unwrap()
    }

    fn dark_outside_finders(matrix: &ModuleMatrix) -> usize {
        let regions = FinderRegion::corners(matrix.size()).unwrap();
        matrix
            .dark_modules()
            .filter(|&(row, col)| !regions.iter().any(|r| r.contains(row, col)))
            .count()
    }

    #[test]
    fn circular_plan_has_background_dots_and_nine_rings() {
        let matrix = checkerboard();
        let config = RenderConfig::default();
        let plan = compile_plan(&matrix, &config, config.native_pitch()).unwrap();

        let rects = plan
            .cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Rect { .. }))
            .count();
        let circles = plan.cmds.len() - rects;

        assert_eq!(rects, 1, "only the background rect");
        assert_eq!(circles, dark_outside_finders(&matrix) + 9);
    }

    #[test]
    fn circular_plan_orders_background_first_rings_last() {
        let matrix = checkerboard();
        let config = RenderConfig::default();
        let pitch = config.native_pitch();
        let plan = compile_plan(&matrix, &config, pitch).unwrap();

        assert!(matches!(plan.cmds[0], DrawCmd::Rect { .. }));

        let rings = &plan.cmds[plan.cmds.len() - 9..];
        for (i, cmd) in rings.iter().enumerate() {
            let DrawCmd::Circle { radius, color, .. } = cmd else {
                panic!("expected ring circle, got {cmd:?}");
            };
            assert_eq!(*radius, FINDER_RING_RADII[i % 3] * pitch);
            let expected = if i % 3 == 1 {
                config.background
            } else {
                config.foreground
            };
            assert_eq!(*color, expected);
        }
    }

    #[test]
    fn circular_plan_skips_finder_modules() {
        let matrix = checkerboard();
        let config = RenderConfig::default();
        let pitch = config.native_pitch();
        let plan = compile_plan(&matrix, &config, pitch).unwrap();
        let regions = FinderRegion::corners(matrix.size()).unwrap();
        let offset = f64::from(config.quiet_zone) * pitch;

        // Every data dot must be centered outside all finder regions;
        // rings are exempt (they are centered inside by definition).
        for cmd in &plan.cmds[1..plan.cmds.len() - 9] {
            let DrawCmd::Circle { center, .. } = cmd else {
                panic!("expected data dot, got {cmd:?}");
            };
            let col = ((center.x - offset) / pitch).floor() as usize;
            let row = ((center.y - offset) / pitch).floor() as usize;
            assert!(
                !regions.iter().any(|r| r.contains(row, col)),
                "data dot emitted inside finder region at ({row},{col})"
            );
        }
    }

    #[test]
    fn square_plan_is_one_rect_per_dark_module() {
        let matrix = checkerboard();
        let config = RenderConfig::default().with_style(Style::Square);
        let plan = compile_plan(&matrix, &config, config.native_pitch()).unwrap();

        assert_eq!(plan.cmds.len(), matrix.dark_count() + 1);
        assert!(
            plan.cmds
                .iter()
                .all(|c| matches!(c, DrawCmd::Rect { .. })),
            "square style must not emit circles"
        );
    }

    #[test]
    fn quiet_zone_stays_clear_of_foreground() {
        let matrix = checkerboard();
        for style in [Style::Circular, Style::Square] {
            let config = RenderConfig::default().with_style(style);
            let pitch = config.native_pitch();
            let plan = compile_plan(&matrix, &config, pitch).unwrap();
            let border = f64::from(config.quiet_zone) * pitch;

            for cmd in &plan.cmds[1..] {
                if cmd.color() == config.background {
                    continue;
                }
                let b = cmd.bounds();
                assert!(b.x0 >= border - 1e-9 && b.y0 >= border - 1e-9);
                assert!(b.x1 <= plan.extent - border + 1e-9);
                assert!(b.y1 <= plan.extent - border + 1e-9);
            }
        }
    }

    #[test]
    fn ring_centers_sit_on_region_centers() {
        let matrix = checkerboard();
        let config = RenderConfig::default();
        let pitch = config.native_pitch();
        let plan = compile_plan(&matrix, &config, pitch).unwrap();
        let offset = f64::from(config.quiet_zone) * pitch;

        let expected: Vec<Point> = FinderRegion::corners(matrix.size())
            .unwrap()
            .iter()
            .map(|r| r.center(offset, pitch))
            .collect();

        let rings = &plan.cmds[plan.cmds.len() - 9..];
        for (i, cmd) in rings.iter().enumerate() {
            let DrawCmd::Circle { center, .. } = cmd else {
                panic!("expected ring circle");
            };
            assert_eq!(*center, expected[i / 3]);
        }
    }

    #[test]
    fn small_matrix_is_rejected() {
        let matrix = ModuleMatrix::new(FINDER_SPAN, vec![true; 49]).unwrap();
        let err = compile_plan(&matrix, &RenderConfig::default(), 40.0).unwrap_err();
        assert!(matches!(err, DotqrError::InvalidGeometry(_)));
    }

    #[test]
    fn bad_pitch_and_bad_config_are_rejected() {
        let matrix = checkerboard();
        let config = RenderConfig::default();
        assert!(matches!(
            compile_plan(&matrix, &config, 0.0).unwrap_err(),
            DotqrError::InvalidConfig(_)
        ));

        let zero_modules = RenderConfig {
            module_size: 0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            compile_plan(&matrix, &zero_modules, 40.0).unwrap_err(),
            DotqrError::InvalidConfig(_)
        ));
    }
}
