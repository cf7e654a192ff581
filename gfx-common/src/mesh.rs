//! In-memory mesh records
//!
//! A [`MeshRecord`] is what a mesh source hands to the writer: an ordered
//! point list and an ordered polygon list. Order is preserved end to end and
//! is the only ordering contract between input and output.

/// A vertex position (x, y, z).
pub type Point3 = [f32; 3];

/// One polygon of a mesh, as uint16 indices into the point list.
///
/// Indices are not checked against the point count; see
/// [`crate::validation::validate_indices`] for the opt-in check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polygon {
    /// Three-vertex polygon.
    Triangle([u16; 3]),
    /// Four-vertex polygon.
    Quad([u16; 4]),
}

impl Polygon {
    /// Number of indices in this polygon (3 or 4).
    pub const fn arity(&self) -> usize {
        match self {
            Polygon::Triangle(_) => 3,
            Polygon::Quad(_) => 4,
        }
    }

    /// The polygon's vertex indices, in winding order.
    pub fn indices(&self) -> &[u16] {
        match self {
            Polygon::Triangle(idx) => idx,
            Polygon::Quad(idx) => idx,
        }
    }

    /// Build a polygon from a slice of 3 or 4 indices.
    pub fn from_slice(indices: &[u16]) -> Option<Self> {
        match *indices {
            [a, b, c] => Some(Polygon::Triangle([a, b, c])),
            [a, b, c, d] => Some(Polygon::Quad([a, b, c, d])),
            _ => None,
        }
    }
}

impl From<[u16; 3]> for Polygon {
    fn from(idx: [u16; 3]) -> Self {
        Polygon::Triangle(idx)
    }
}

impl From<[u16; 4]> for Polygon {
    fn from(idx: [u16; 4]) -> Self {
        Polygon::Quad(idx)
    }
}

/// One mesh object: points, polygons and optional per-vertex attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshRecord {
    /// Vertex positions.
    pub points: Vec<Point3>,
    /// Polygons referencing `points`.
    pub polygons: Vec<Polygon>,
    /// Per-vertex normals, written as a `normal` block when present.
    pub normals: Option<Vec<[f32; 3]>>,
    /// Per-vertex texture coordinates, written as a `texcoord0` block when present.
    pub texcoords: Option<Vec<[f32; 2]>>,
}

impl MeshRecord {
    /// Create a mesh with positions and polygons only.
    pub fn new(points: Vec<Point3>, polygons: Vec<Polygon>) -> Self {
        Self {
            points,
            polygons,
            normals: None,
            texcoords: None,
        }
    }

    /// Attach per-vertex normals.
    pub fn with_normals(mut self, normals: Vec<[f32; 3]>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Attach per-vertex texture coordinates.
    pub fn with_texcoords(mut self, texcoords: Vec<[f32; 2]>) -> Self {
        self.texcoords = Some(texcoords);
        self
    }

    /// Number of points.
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Number of polygons.
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Total number of indices across all polygons.
    pub fn index_count(&self) -> usize {
        self.polygons.iter().map(Polygon::arity).sum()
    }

    /// True when the mesh has neither points nor polygons.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.polygons.is_empty()
    }
}
