//! Wavefront OBJ mesh source
//!
//! Each `o` or `g` statement starts a new mesh. Vertices form one pool for
//! the whole file. An object whose faces only use its own vertices keeps
//! them all, rebased onto its first vertex. An object that reaches into
//! vertices declared elsewhere (all `v` lines first, then the groups) gets
//! just the vertices it uses, renumbered in first-use order. Texture and
//! normal references are ignored; only positions and polygons are exported.

use anyhow::{Context, Result, bail};
use gfx_common::{MeshRecord, Point3, Polygon, check_index_range};
use hashbrown::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;

/// One `o`/`g` object while parsing.
struct ObjObject {
    name: Option<String>,
    /// Global index of the first vertex declared in this object.
    first_vertex: usize,
    /// Global index one past the last vertex declared in this object.
    end_vertex: usize,
    /// Faces as global vertex indices, with the line each came from.
    faces: Vec<(usize, Vec<usize>)>,
}

impl ObjObject {
    fn new(name: Option<String>, first_vertex: usize) -> Self {
        Self {
            name,
            first_vertex,
            end_vertex: first_vertex,
            faces: Vec::new(),
        }
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    fn own_vertices(&self) -> Range<usize> {
        self.first_vertex..self.end_vertex
    }

    fn is_empty(&self) -> bool {
        self.own_vertices().is_empty() && self.faces.is_empty()
    }

    /// Whether every face corner lies in this object's own vertices.
    fn is_self_contained(&self) -> bool {
        let own = self.own_vertices();
        self.faces
            .iter()
            .all(|(_, corners)| corners.iter().all(|v| own.contains(v)))
    }
}

/// Load every object of an OBJ file as a mesh record.
pub fn load_obj_meshes(input: &Path) -> Result<Vec<MeshRecord>> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let meshes = parse_obj_meshes(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))?;

    tracing::info!("Loaded {} meshes from {:?}", meshes.len(), input);
    Ok(meshes)
}

/// Parse OBJ text into mesh records, one per object, in file order.
pub fn parse_obj_meshes<R: BufRead>(reader: R) -> Result<Vec<MeshRecord>> {
    let mut objects: Vec<ObjObject> = Vec::new();
    let mut vertices: Vec<Point3> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts[0] {
            "o" | "g" => {
                let name = Some(parts[1..].join(" ")).filter(|name| !name.is_empty());
                let pending = objects.last_mut().filter(|object| object.is_empty());
                match pending {
                    // Nothing declared yet: just name the pending object
                    Some(object) => object.name = name,
                    None => objects.push(ObjObject::new(name, vertices.len())),
                }
            }
            "v" if parts.len() >= 4 => {
                let mut point = [0.0f32; 3];
                for (axis, token) in point.iter_mut().zip(&parts[1..4]) {
                    *axis = parse_coordinate(token, line_no)?;
                }
                vertices.push(point);
                current_object(&mut objects, vertices.len() - 1).end_vertex = vertices.len();
            }
            "f" => {
                let vertex_total = vertices.len();
                let mut corners: Vec<usize> = Vec::with_capacity(parts.len() - 1);
                for vertex_ref in &parts[1..] {
                    match parse_vertex_ref(vertex_ref, vertex_total) {
                        Some(global) => corners.push(global),
                        None => tracing::warn!(
                            "line {}: ignoring bad vertex reference '{}'",
                            line_no,
                            vertex_ref
                        ),
                    }
                }

                if corners.len() < 3 {
                    tracing::warn!("line {}: skipping face with {} vertices", line_no, corners.len());
                    continue;
                }
                current_object(&mut objects, vertex_total)
                    .faces
                    .push((line_no, corners));
            }
            _ => {}
        }
    }

    // Vertices used by objects other than the one declaring them
    let mut borrowed = vec![false; vertices.len()];
    for object in objects.iter().filter(|o| !o.is_self_contained()) {
        for (line_no, corners) in &object.faces {
            for &v in corners {
                let Some(slot) = borrowed.get_mut(v) else {
                    bail!(
                        "line {}: face references vertex {}, but only {} are declared",
                        line_no,
                        v + 1,
                        vertices.len()
                    );
                };
                *slot = true;
            }
        }
    }

    let mut meshes = Vec::with_capacity(objects.len());
    for object in &objects {
        if object.faces.is_empty() && borrowed[object.own_vertices()].iter().any(|&b| b) {
            tracing::debug!(
                "OBJ object '{}' only declares shared vertices, not exporting it",
                object.label()
            );
            continue;
        }
        let mesh = build_mesh(object, &vertices)
            .with_context(|| format!("OBJ object '{}'", object.label()))?;
        if mesh.is_empty() {
            tracing::debug!("Skipping empty OBJ object '{}'", object.label());
            continue;
        }
        meshes.push(mesh);
    }
    Ok(meshes)
}

/// The object receiving statements, created on demand for files with no `o`/`g`.
fn current_object(objects: &mut Vec<ObjObject>, first_vertex: usize) -> &mut ObjObject {
    if objects.is_empty() {
        objects.push(ObjObject::new(None, first_vertex));
    }
    let last = objects.len() - 1;
    &mut objects[last]
}

/// Turn one object into a mesh with local uint16 indices.
fn build_mesh(object: &ObjObject, vertices: &[Point3]) -> Result<MeshRecord> {
    let (points, faces): (Vec<Point3>, Vec<Vec<usize>>) = if object.is_self_contained() {
        let first = object.first_vertex;
        let faces = object
            .faces
            .iter()
            .map(|(_, corners)| corners.iter().map(|v| v - first).collect())
            .collect();
        (vertices[object.own_vertices()].to_vec(), faces)
    } else {
        let mut local_of: HashMap<usize, usize> = HashMap::new();
        let mut points = Vec::new();
        let mut faces = Vec::with_capacity(object.faces.len());
        for (_, corners) in &object.faces {
            let mut face = Vec::with_capacity(corners.len());
            for &v in corners {
                let local = *local_of.entry(v).or_insert_with(|| {
                    points.push(vertices[v]);
                    points.len() - 1
                });
                face.push(local);
            }
            faces.push(face);
        }
        tracing::debug!(
            "OBJ object '{}' uses {} shared vertices",
            object.label(),
            points.len()
        );
        (points, faces)
    };

    check_index_range(points.len())?;
    let faces = faces
        .iter()
        .map(|face| {
            face.iter()
                .map(|&v| u16::try_from(v).context("vertex exceeds the uint16 index range"))
                .collect::<Result<Vec<u16>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MeshRecord::new(points, polygons_for(&faces)))
}

/// Build polygons with one arity for the whole mesh.
///
/// Quads are kept only when every face is a quad. Otherwise every face is
/// fan-triangulated, since the index block cannot say where the arity changes.
fn polygons_for(faces: &[Vec<u16>]) -> Vec<Polygon> {
    if !faces.is_empty() && faces.iter().all(|face| face.len() == 4) {
        return faces
            .iter()
            .filter_map(|face| Polygon::from_slice(face))
            .collect();
    }

    let mut polygons = Vec::with_capacity(faces.len());
    for face in faces {
        // Fan triangulation (convex polygons)
        for i in 1..face.len() - 1 {
            polygons.push(Polygon::Triangle([face[0], face[i], face[i + 1]]));
        }
    }
    polygons
}

fn parse_coordinate(token: &str, line_no: usize) -> Result<f32> {
    token
        .parse()
        .with_context(|| format!("line {}: invalid coordinate '{}'", line_no, token))
}

/// Resolve an OBJ vertex reference ("v", "v/vt", "v/vt/vn", "v//vn") to a
/// 0-based global index. Negative indices count back from the last vertex.
fn parse_vertex_ref(s: &str, vertex_total: usize) -> Option<usize> {
    let index: i64 = s.split('/').next()?.parse().ok()?;
    match index {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => vertex_total.checked_sub(usize::try_from(i.unsigned_abs()).ok()?),
    }
}
