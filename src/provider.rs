use qrcode::types::QrError;
use qrcode::{QrCode, Version};

use crate::foundation::error::{DotqrError, DotqrResult};
use crate::matrix::ModuleMatrix;

/// Error-correction level requested from the symbol encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EcLevel {
    Low,
    Medium,
    Quartile,
    High,
}

impl EcLevel {
    fn to_qrcode(self) -> qrcode::EcLevel {
        match self {
            EcLevel::Low => qrcode::EcLevel::L,
            EcLevel::Medium => qrcode::EcLevel::M,
            EcLevel::Quartile => qrcode::EcLevel::Q,
            EcLevel::High => qrcode::EcLevel::H,
        }
    }
}

/// Matrix plus the version identifier (1..=40) the encoder settled on.
#[derive(Clone, Debug)]
pub struct EncodedSymbol {
    pub matrix: ModuleMatrix,
    pub version: i16,
}

/// Encode `text` into a module matrix via the `qrcode` crate.
///
/// `symbol_version` pins the symbol size; `None` picks the smallest
/// version that fits. Inputs that do not fit surface as
/// [`DotqrError::CapacityExceeded`], unchanged in meaning for the
/// caller to shorten the text or lower the error-correction level.
pub fn encode_matrix(
    text: &str,
    ec: EcLevel,
    symbol_version: Option<i16>,
) -> DotqrResult<EncodedSymbol> {
    let code = match symbol_version {
        Some(v) => QrCode::with_version(text.as_bytes(), Version::Normal(v), ec.to_qrcode()),
        None => QrCode::with_error_correction_level(text.as_bytes(), ec.to_qrcode()),
    }
    .map_err(map_qr_error)?;

    let size = code.width();
    let modules = code
        .to_colors()
        .iter()
        .map(|c| *c == qrcode::Color::Dark)
        .collect();
    let version = match code.version() {
        Version::Normal(v) => v,
        Version::Micro(_) => {
            return Err(DotqrError::invalid_geometry(
                "micro symbols are not supported",
            ));
        }
    };

    Ok(EncodedSymbol {
        matrix: ModuleMatrix::new(size, modules)?,
        version,
    })
}

fn map_qr_error(e: QrError) -> DotqrError {
    match e {
        QrError::DataTooLong => DotqrError::capacity_exceeded(
            "input does not fit the requested version and error-correction level",
        ),
        other => DotqrError::invalid_geometry(format!("symbol encoding failed: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_encodes_to_version_1() {
        let symbol = encode_matrix("HELLO WORLD", EcLevel::Low, None).unwrap();
        assert_eq!(symbol.version, 1);
        assert_eq!(symbol.matrix.size(), 21);
        assert!(symbol.matrix.dark_count() > 0);
    }

    #[test]
    fn version_growth_tracks_symbol_size() {
        let symbol = encode_matrix(&"A".repeat(60), EcLevel::High, None).unwrap();
        assert!(symbol.version > 1);
        assert_eq!(
            symbol.matrix.size(),
            17 + 4 * symbol.version as usize,
            "QR side length is 17 + 4 * version"
        );
    }

    #[test]
    fn pinned_version_fixes_the_size() {
        let symbol = encode_matrix("HI", EcLevel::Low, Some(3)).unwrap();
        assert_eq!(symbol.version, 3);
        assert_eq!(symbol.matrix.size(), 29);
    }

    #[test]
    fn overflow_surfaces_as_capacity_exceeded() {
        let err = encode_matrix(&"A".repeat(100), EcLevel::High, Some(1)).unwrap_err();
        assert!(matches!(err, DotqrError::CapacityExceeded(_)));
    }
}
