//! Complex resolution: which coarser vertex a vertex belongs to.
//!
//! Only some vertices carry an explicit complex. Every other vertex inherits
//! the complex of its nearest tree ancestor that has one.

use super::Mtg;
use crate::model::*;
use crate::{Error, Result};

impl Mtg {
    /// The complex of `vid`: its explicit entry, or the one of the nearest
    /// tree ancestor carrying an entry. `None` when the climb ends on a
    /// scale-root without one.
    pub fn complex(&self, vid: VertexId) -> Result<Option<VertexId>> {
        self.scale(vid)?;
        Ok(self.resolve_complex(vid))
    }

    pub(crate) fn resolve_complex(&self, vid: VertexId) -> Option<VertexId> {
        let mut cursor = vid;
        loop {
            if let Some(complex) = self.complex.get(&cursor) {
                return Some(*complex);
            }
            cursor = *self.parent.get(&cursor)?;
        }
    }

    /// The complex of `vid` at the coarser scale `target`.
    ///
    /// Applies [`complex`](Self::complex) `scale(vid) - target` times;
    /// `target == scale(vid)` returns `vid` itself.
    pub fn complex_at_scale(&self, vid: VertexId, target: Scale) -> Result<Option<VertexId>> {
        let scale = self.scale(vid)?;
        if target > scale {
            return Err(Error::InvalidScale { vertex: vid, scale, target });
        }
        let mut current = vid;
        for _ in target..scale {
            match self.resolve_complex(current) {
                Some(complex) => current = complex,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}
