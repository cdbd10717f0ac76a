//! JSON snapshot — serialize a whole graph and load it back.
//!
//! The snapshot carries both relations, the scale map, every property map
//! and the id counter, so a restored graph keeps allocating fresh ids.
//!
//! ```text
//! Mtg → export_json() → JSON document → import_json() → check_invariants() → Mtg
//! ```

use std::io::{Read, Write};

use crate::mtg::Mtg;
use crate::Result;

/// Write `mtg` as a pretty-printed JSON document.
pub fn export_json(mtg: &Mtg, writer: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, mtg)?;
    writeln!(writer)?;
    Ok(())
}

/// Read a graph written by [`export_json`], rejecting documents whose
/// relations are inconsistent.
pub fn import_json(reader: impl Read) -> Result<Mtg> {
    let mtg: Mtg = serde_json::from_reader(reader)?;
    mtg.check_invariants()?;
    Ok(mtg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::GeneratorConfig;
    use crate::model::VertexId;
    use crate::Error;

    #[test]
    fn test_snapshot_restores_graph() {
        let mut g = GeneratorConfig::default().mtg().unwrap();
        let mut buf = Vec::new();
        export_json(&g, &mut buf).unwrap();
        let mut restored = import_json(buf.as_slice()).unwrap();
        assert_eq!(restored, g);
        assert_eq!(restored.next_id(), g.next_id());
        assert!(restored.has_vertex(VertexId::ROOT));
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(import_json(&b"{\"not\": \"a graph\"}"[..]), Err(Error::Json(_))));
    }
}
