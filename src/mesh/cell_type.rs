//! Target cell type vocabulary for assembled meshes.

use serde::{Deserialize, Serialize};

/// Fixed cell vocabulary the assembler emits into.
///
/// `Empty` is the explicit sentinel for elements whose source type tag has no
/// mapping; such elements keep their index slot but contribute no
/// connectivity.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CellType {
    /// Placeholder for an unmapped element; contributes nothing.
    #[default]
    Empty,
    /// 0D vertex.
    Vertex,
    /// 1D linear segment.
    Line,
    /// 1D quadratic segment.
    QuadraticEdge,
    /// 2D linear triangle.
    Triangle,
    /// 2D quadratic triangle.
    QuadraticTriangle,
    /// 2D linear quadrilateral.
    Quad,
    /// 2D quadratic quadrilateral (8 nodes).
    QuadraticQuad,
    /// 2D biquadratic quadrilateral (9 nodes).
    BiquadraticQuad,
    /// 3D linear tetrahedron.
    Tetrahedron,
    /// 3D quadratic tetrahedron.
    QuadraticTetrahedron,
    /// 3D linear wedge/prism.
    Wedge,
    /// 3D quadratic wedge/prism.
    QuadraticWedge,
    /// 3D linear hexahedron.
    Hexahedron,
    /// 3D quadratic hexahedron.
    QuadraticHexahedron,
}

impl CellType {
    /// Stable id understood by VTK-shaped downstream writers.
    ///
    /// `Empty` maps to 0, VTK's empty-cell id, so writers consume the id
    /// stream without translation.
    pub fn wire_id(self) -> u8 {
        match self {
            CellType::Empty => 0,
            CellType::Vertex => 1,
            CellType::Line => 3,
            CellType::Triangle => 5,
            CellType::Quad => 9,
            CellType::Tetrahedron => 10,
            CellType::Hexahedron => 12,
            CellType::Wedge => 13,
            CellType::QuadraticEdge => 21,
            CellType::QuadraticTriangle => 22,
            CellType::QuadraticQuad => 23,
            CellType::QuadraticTetrahedron => 24,
            CellType::QuadraticHexahedron => 25,
            CellType::QuadraticWedge => 26,
            CellType::BiquadraticQuad => 28,
        }
    }

    /// Topological dimension; `None` for the empty sentinel.
    pub fn dimension(self) -> Option<u8> {
        match self {
            CellType::Empty => None,
            CellType::Vertex => Some(0),
            CellType::Line | CellType::QuadraticEdge => Some(1),
            CellType::Triangle
            | CellType::QuadraticTriangle
            | CellType::Quad
            | CellType::QuadraticQuad
            | CellType::BiquadraticQuad => Some(2),
            CellType::Tetrahedron
            | CellType::QuadraticTetrahedron
            | CellType::Wedge
            | CellType::QuadraticWedge
            | CellType::Hexahedron
            | CellType::QuadraticHexahedron => Some(3),
        }
    }

    /// Whether this is the empty-cell sentinel.
    #[inline]
    pub fn is_empty_cell(self) -> bool {
        self == CellType::Empty
    }
}
