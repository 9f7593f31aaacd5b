use image::RgbImage;

use crate::config::{RenderConfig, Style};
use crate::foundation::error::DotqrResult;
use crate::matrix::ModuleMatrix;
use crate::provider::{EcLevel, EncodedSymbol, encode_matrix};
use crate::render::{raster, svg};

/// PNG bytes + SVG text for one style.
#[derive(Clone, Debug)]
pub struct StyleOutputs {
    pub png: Vec<u8>,
    pub svg: String,
}

/// The full 2x2 output grid derived from one matrix:
/// {circular, square} x {raster, vector}.
#[derive(Clone, Debug)]
pub struct MatrixOutputs {
    pub circular: StyleOutputs,
    pub square: StyleOutputs,
}

/// [`MatrixOutputs`] plus the version identifier the encoder picked.
#[derive(Clone, Debug)]
pub struct SymbolOutputs {
    pub version: i16,
    pub outputs: MatrixOutputs,
}

/// Compile + raster-render in the style `config` selects.
pub fn render_raster(matrix: &ModuleMatrix, config: &RenderConfig) -> DotqrResult<RgbImage> {
    raster::render(matrix, config)
}

/// Compile + vector-render in the style `config` selects.
pub fn render_vector(matrix: &ModuleMatrix, config: &RenderConfig) -> DotqrResult<String> {
    svg::render(matrix, config)
}

/// Render all four outputs from one matrix.
///
/// Every output is an independent pure function of `(matrix, config)`,
/// so the four legs run in parallel with no shared state; `config.style`
/// is overridden per leg.
#[tracing::instrument(skip(matrix, config), fields(size = matrix.size()))]
pub fn render_all(matrix: &ModuleMatrix, config: &RenderConfig) -> DotqrResult<MatrixOutputs> {
    let circular = config.clone().with_style(Style::Circular);
    let square = config.clone().with_style(Style::Square);

    let (circular, square) = rayon::join(
        || render_style(matrix, &circular),
        || render_style(matrix, &square),
    );
    Ok(MatrixOutputs {
        circular: circular?,
        square: square?,
    })
}

fn render_style(matrix: &ModuleMatrix, config: &RenderConfig) -> DotqrResult<StyleOutputs> {
    let (png, svg_text) = rayon::join(
        || raster::render(matrix, config).and_then(|img| raster::encode_png(&img)),
        || svg::render(matrix, config),
    );
    Ok(StyleOutputs {
        png: png?,
        svg: svg_text?,
    })
}

/// One-shot API: encode `text` and render the full output grid.
#[tracing::instrument(skip(text, config))]
pub fn render_text(
    text: &str,
    ec: EcLevel,
    symbol_version: Option<i16>,
    config: &RenderConfig,
) -> DotqrResult<SymbolOutputs> {
    let EncodedSymbol { matrix, version } = encode_matrix(text, ec, symbol_version)?;
    tracing::debug!(size = matrix.size(), version, "encoded symbol");
    let outputs = render_all(&matrix, config)?;
    Ok(SymbolOutputs { version, outputs })
}
