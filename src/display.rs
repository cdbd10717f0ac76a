//! Text rendering of trees and MTGs.
//!
//! ```text
//! MTG : nb_vertices=5, nb_scales=3
//!
//! Scale 0
//! /0
//!
//! Scale 1
//! /P1
//! ```

use std::fmt;
use std::io::Write;

use crate::model::*;
use crate::mtg::Mtg;
use crate::traversal::iter_mtg;
use crate::Result;

const DECOMPOSITION: char = '/';

fn edge_symbol(mtg: &Mtg, vid: VertexId) -> char {
    mtg.edge_type(vid).map_or(DECOMPOSITION, EdgeType::symbol)
}

fn label(mtg: &Mtg, vid: VertexId) -> String {
    mtg.label(vid).map_or_else(|| vid.to_string(), str::to_owned)
}

/// One line per vertex of the tree under `vid`: edge symbol then label.
/// Every `+` child indents its subtree by one more tab.
pub fn display_tree(mtg: &Mtg, vid: VertexId) -> Result<Vec<String>> {
    mtg.scale(vid)?;
    let mut lines = Vec::new();
    let mut stack = vec![(vid, 0usize)];
    while let Some((v, tabs)) = stack.pop() {
        lines.push(format!("{}{}{}", "\t".repeat(tabs), edge_symbol(mtg, v), label(mtg, v)));
        for child in mtg.children_of(v).iter().rev() {
            let depth = if mtg.edge_type(*child) == Some(EdgeType::Branch) { tabs + 1 } else { tabs };
            stack.push((*child, depth));
        }
    }
    Ok(lines)
}

/// One line per vertex of the multiscale walk from `vid`, indented by scale.
///
/// `/` marks a step into a decomposition. A `^` prefix means the vertex is
/// not attached to the line just above it but to an earlier vertex of its
/// scale. A vertex continuing the line above gets its plain edge symbol.
///
/// This is the reverse of the classic MTG file convention, where `^` marks
/// the steps that *do* follow their parent across a decomposition. Output
/// is for reading, not for round-tripping through an MTG file parser.
pub fn display_mtg(mtg: &Mtg, vid: VertexId) -> Result<Vec<String>> {
    let base = mtg.scale(vid)?;
    let mut lines = Vec::new();
    let mut previous: Option<VertexId> = None;
    for v in iter_mtg(mtg, vid) {
        let scale = mtg.scale(v)?;
        let symbol = match previous {
            None => DECOMPOSITION.to_string(),
            Some(prev) => {
                let prev_scale = mtg.scale(prev)?;
                if scale > prev_scale {
                    DECOMPOSITION.to_string()
                } else {
                    let anchor = mtg.complex_at_scale(prev, scale)?;
                    let et = edge_symbol(mtg, v);
                    let parent = mtg.parent(v)?;
                    if parent.is_some() && parent == anchor {
                        et.to_string()
                    } else {
                        format!("^{et}")
                    }
                }
            }
        };
        lines.push(format!("{}{}{}", "\t".repeat(scale - base), symbol, label(mtg, v)));
        previous = Some(v);
    }
    Ok(lines)
}

/// Write [`display_tree`] output, one line each.
pub fn write_tree(mtg: &Mtg, vid: VertexId, writer: &mut dyn Write) -> Result<()> {
    for line in display_tree(mtg, vid)? {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Write [`display_mtg`] output, one line each.
pub fn write_mtg(mtg: &Mtg, vid: VertexId, writer: &mut dyn Write) -> Result<()> {
    for line in display_mtg(mtg, vid)? {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

impl fmt::Display for Mtg {
    /// Header, then the tree of each scale reached by following first
    /// components down from the root.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MTG : nb_vertices={}, nb_scales={}", self.nb_vertices(), self.nb_scales())?;
        let mut cursor = Some(self.root());
        while let Some(v) = cursor {
            let scale = self.scale(v).map_err(|_| fmt::Error)?;
            write!(f, "\n\nScale {scale}")?;
            for line in display_tree(self, v).map_err(|_| fmt::Error)? {
                write!(f, "\n{line}")?;
            }
            cursor = self.first_component(v);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::LABEL;
    use pretty_assertions::assert_eq;

    fn labelled(name: &str, edge_type: EdgeType) -> PropertyMap {
        let mut props = edge_props(edge_type);
        props.insert(LABEL.into(), Value::from(name));
        props
    }

    #[test]
    fn test_display_tree_indents_branches() {
        let mut g = Mtg::new();
        let a = g.add_child(VertexId::ROOT, None, labelled("A", EdgeType::Successor)).unwrap();
        g.add_child(a, None, labelled("B", EdgeType::Branch)).unwrap();
        g.add_child(a, None, labelled("C", EdgeType::Successor)).unwrap();
        assert_eq!(display_tree(&g, VertexId::ROOT).unwrap(), vec!["/0", "<A", "\t+B", "<C"]);
    }

    #[test]
    fn test_display_mtg_marks_decomposition() {
        let mut g = Mtg::new();
        let p = g.add_component(VertexId::ROOT, None, labelled("P", EdgeType::Successor)).unwrap();
        let a = g.add_component(p, None, labelled("A", EdgeType::Successor)).unwrap();
        g.add_child(a, None, labelled("B", EdgeType::Branch)).unwrap();
        g.add_child(a, None, labelled("C", EdgeType::Successor)).unwrap();
        assert_eq!(
            display_mtg(&g, VertexId::ROOT).unwrap(),
            vec!["/0", "\t/P", "\t\t/A", "\t\t+B", "\t\t^<C"]
        );
    }

    #[test]
    fn test_display_header() {
        let mut g = Mtg::new();
        let p = g.add_component(VertexId::ROOT, None, PropertyMap::new()).unwrap();
        g.add_child(p, None, edge_props(EdgeType::Successor)).unwrap();
        let text = g.to_string();
        assert!(text.starts_with("MTG : nb_vertices=3, nb_scales=2"));
        assert!(text.contains("Scale 1\n/1\n<2"));
    }
}
