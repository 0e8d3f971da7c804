//! Source element-type tags to target cell types.
//!
//! The upstream vocabulary is a family of string tags where suffix variants
//! share one target cell (`C3D8`, `C3D8R`, `C3D8I` are all hexahedra). The
//! mapping is a manually maintained partial function: an ordered table of
//! `(substring matcher, cell type)` pairs evaluated longest-matcher-first,
//! ties broken by listing order, first match wins. The evaluation order is
//! fixed so repeated assemblies stay bit-reproducible.

use once_cell::sync::Lazy;

use crate::mesh::cell_type::CellType;

/// The mapping table in listing order, grouped by element family.
pub const TYPE_TABLE: &[(&str, CellType)] = &[
    // 3D solids
    ("C3D4", CellType::Tetrahedron),
    ("C3D10", CellType::QuadraticTetrahedron),
    ("C3D6", CellType::Wedge),
    ("C3D15", CellType::QuadraticWedge),
    ("C3D8", CellType::Hexahedron),
    ("C3D20", CellType::QuadraticHexahedron),
    // Shells
    ("S3", CellType::Triangle),
    ("S4", CellType::Quad),
    ("S6", CellType::QuadraticTriangle),
    ("S8", CellType::QuadraticQuad),
    ("S9", CellType::BiquadraticQuad),
    // 2D plane stress/strain and axisymmetric
    ("CPS3", CellType::Triangle),
    ("CPE3", CellType::Triangle),
    ("CAX3", CellType::Triangle),
    ("CPS4", CellType::Quad),
    ("CPE4", CellType::Quad),
    ("CAX4", CellType::Quad),
    ("CPS6", CellType::QuadraticTriangle),
    ("CPE6", CellType::QuadraticTriangle),
    ("CAX6", CellType::QuadraticTriangle),
    ("CPS8", CellType::QuadraticQuad),
    ("CPE8", CellType::QuadraticQuad),
    ("CAX8", CellType::QuadraticQuad),
    ("CPS9", CellType::BiquadraticQuad),
    ("CPE9", CellType::BiquadraticQuad),
    ("CAX9", CellType::BiquadraticQuad),
    // Membranes
    ("M3D3", CellType::Triangle),
    ("M3D4", CellType::Quad),
    ("M3D8", CellType::QuadraticQuad),
    ("M3D9", CellType::BiquadraticQuad),
    // Rigid 2D
    ("R3D3", CellType::Triangle),
    ("R3D4", CellType::Quad),
    ("R3D8", CellType::QuadraticQuad),
    ("R3D9", CellType::BiquadraticQuad),
    // Beams, trusses, pipes
    ("B31", CellType::Line),
    ("B32", CellType::QuadraticEdge),
    ("T3D2", CellType::Line),
    ("T3D3", CellType::QuadraticEdge),
    ("PIPE31", CellType::Line),
    ("PIPE32", CellType::QuadraticEdge),
];

/// Matchers in evaluation order: longest first, ties by listing order.
///
/// Longest-first keeps a ten-node tag like `C3D10H` from ever being claimed
/// by a shorter matcher embedded in it.
static MATCHERS: Lazy<Vec<(&'static str, CellType)>> = Lazy::new(|| {
    let mut ordered: Vec<(usize, &str, CellType)> = TYPE_TABLE
        .iter()
        .enumerate()
        .map(|(pos, &(matcher, cell))| (pos, matcher, cell))
        .collect();
    ordered.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(&b.0)));
    ordered
        .into_iter()
        .map(|(_, matcher, cell)| (matcher, cell))
        .collect()
});

/// Maps a source element-type tag to its target cell type.
///
/// Pure function; `None` means the tag is outside the supported vocabulary
/// and the element should occupy an [`CellType::Empty`] slot.
pub fn cell_type_for_tag(tag: &str) -> Option<CellType> {
    MATCHERS
        .iter()
        .find(|(matcher, _)| tag.contains(matcher))
        .map(|&(_, cell)| cell)
}

/// Strict variant of [`cell_type_for_tag`] for callers that treat an
/// unmapped tag as an error instead of an empty cell.
///
/// # Errors
/// `UnsupportedElementType` carrying the offending tag.
pub fn try_cell_type_for_tag(tag: &str) -> Result<CellType, crate::weld_error::WeldError> {
    cell_type_for_tag(tag)
        .ok_or_else(|| crate::weld_error::WeldError::UnsupportedElementType(tag.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_variants_share_one_target() {
        for tag in ["C3D8", "C3D8R", "C3D8I"] {
            assert_eq!(cell_type_for_tag(tag), Some(CellType::Hexahedron));
        }
        for tag in ["S4", "S4R"] {
            assert_eq!(cell_type_for_tag(tag), Some(CellType::Quad));
        }
    }

    #[test]
    fn quadratic_tags_beat_embedded_linear_matchers() {
        assert_eq!(
            cell_type_for_tag("C3D10H"),
            Some(CellType::QuadraticTetrahedron)
        );
        assert_eq!(
            cell_type_for_tag("C3D20R"),
            Some(CellType::QuadraticHexahedron)
        );
        assert_eq!(cell_type_for_tag("C3D15"), Some(CellType::QuadraticWedge));
    }

    #[test]
    fn plane_and_axisymmetric_families() {
        assert_eq!(cell_type_for_tag("CPS4R"), Some(CellType::Quad));
        assert_eq!(
            cell_type_for_tag("CAX6"),
            Some(CellType::QuadraticTriangle)
        );
        assert_eq!(cell_type_for_tag("CPE9"), Some(CellType::BiquadraticQuad));
    }

    #[test]
    fn beams_and_pipes_are_edges() {
        assert_eq!(cell_type_for_tag("B31"), Some(CellType::Line));
        assert_eq!(cell_type_for_tag("PIPE32"), Some(CellType::QuadraticEdge));
        assert_eq!(cell_type_for_tag("T3D2"), Some(CellType::Line));
    }

    #[test]
    fn unknown_tags_map_to_none() {
        assert_eq!(cell_type_for_tag("SPRINGA"), None);
        assert_eq!(cell_type_for_tag(""), None);
    }

    #[test]
    fn strict_probe_reports_the_tag() {
        use crate::weld_error::WeldError;
        assert_eq!(try_cell_type_for_tag("S4R").unwrap(), CellType::Quad);
        assert_eq!(
            try_cell_type_for_tag("GASKET").unwrap_err(),
            WeldError::UnsupportedElementType("GASKET".into())
        );
    }

    #[test]
    fn evaluation_order_is_stable() {
        let first: Vec<&str> = MATCHERS.iter().map(|&(m, _)| m).collect();
        let second: Vec<&str> = MATCHERS.iter().map(|&(m, _)| m).collect();
        assert_eq!(first, second);
        // longest matcher comes first
        assert_eq!(first[0], "PIPE31");
    }
}
