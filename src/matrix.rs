use crate::foundation::error::{DotqrError, DotqrResult};

use kurbo::Point;

/// Side length of a finder (position-detection) pattern, in modules.
pub const FINDER_SPAN: usize = 7;

/// Smallest symbol that can hold three disjoint finder patterns
/// (QR version 1).
pub const MIN_SYMBOL_SIZE: usize = 21;

/// Square grid of QR modules (`true` = dark), row-major, immutable
/// once constructed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleMatrix {
    size: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    pub fn new(size: usize, modules: Vec<bool>) -> DotqrResult<Self> {
        if size == 0 {
            return Err(DotqrError::invalid_geometry("matrix size must be >= 1"));
        }
        if modules.len() != size * size {
            return Err(DotqrError::invalid_geometry(format!(
                "matrix of size {size} requires {} modules, got {}",
                size * size,
                modules.len()
            )));
        }
        Ok(Self { size, modules })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Module at `(row, col)`. Panics when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> bool {
        assert!(row < self.size && col < self.size, "module index out of bounds");
        self.modules[row * self.size + col]
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }

    /// Coordinates of all dark modules in row-major order.
    pub fn dark_modules(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.modules
            .iter()
            .enumerate()
            .filter(|&(_, &m)| m)
            .map(|(i, _)| (i / self.size, i % self.size))
    }
}

/// One of the three fixed 7x7 finder-pattern sub-grids, identified by
/// its top-left module. Classification is computed once per render and
/// consulted per module, instead of repeating corner arithmetic at
/// every call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinderRegion {
    pub row0: usize,
    pub col0: usize,
}

impl FinderRegion {
    /// The top-left, top-right, and bottom-left regions of a symbol of
    /// the given size. Fails when the symbol is too small to keep the
    /// three regions disjoint.
    pub fn corners(size: usize) -> DotqrResult<[FinderRegion; 3]> {
        if size < MIN_SYMBOL_SIZE {
            return Err(DotqrError::invalid_geometry(format!(
                "matrix size {size} cannot hold three disjoint finder patterns (min {MIN_SYMBOL_SIZE})"
            )));
        }
        Ok([
            FinderRegion { row0: 0, col0: 0 },
            FinderRegion {
                row0: 0,
                col0: size - FINDER_SPAN,
            },
            FinderRegion {
                row0: size - FINDER_SPAN,
                col0: 0,
            },
        ])
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row0
            && row < self.row0 + FINDER_SPAN
            && col >= self.col0
            && col < self.col0 + FINDER_SPAN
    }

    /// Region center in canvas units, given the quiet-zone offset and
    /// module pitch.
    pub fn center(&self, offset: f64, pitch: f64) -> Point {
        Point::new(
            offset + (self.col0 as f64 + 3.5) * pitch,
            offset + (self.row0 as f64 + 3.5) * pitch,
        )
    }
}
