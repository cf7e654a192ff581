//! Test asset generation for integration tests
//!
//! Writes small OBJ and glTF files with known contents.

use std::io::Write;
use std::path::Path;

/// Generate a unit cube OBJ with six quad faces
pub fn generate_cube_obj(path: &Path) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Unit cube")?;
    writeln!(file, "o cube")?;

    // 8 corners
    writeln!(file, "v -0.5 -0.5 0.5")?;
    writeln!(file, "v 0.5 -0.5 0.5")?;
    writeln!(file, "v 0.5 0.5 0.5")?;
    writeln!(file, "v -0.5 0.5 0.5")?;
    writeln!(file, "v -0.5 -0.5 -0.5")?;
    writeln!(file, "v 0.5 -0.5 -0.5")?;
    writeln!(file, "v 0.5 0.5 -0.5")?;
    writeln!(file, "v -0.5 0.5 -0.5")?;

    // Faces (CCW winding)
    writeln!(file, "f 1 2 3 4")?; // Front
    writeln!(file, "f 6 5 8 7")?; // Back
    writeln!(file, "f 4 3 7 8")?; // Top
    writeln!(file, "f 5 6 2 1")?; // Bottom
    writeln!(file, "f 2 6 7 3")?; // Right
    writeln!(file, "f 5 1 4 8")?; // Left

    Ok(())
}

/// Generate a single triangle OBJ
pub fn generate_triangle_obj(path: &Path) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;

    writeln!(file, "# Triangle")?;
    writeln!(file, "v 0 0 0")?;
    writeln!(file, "v 1 0 0")?;
    writeln!(file, "v 0.5 1 0")?;
    writeln!(file, "f 1 2 3")?;

    Ok(())
}

/// Positions of the glTF triangle
pub const GLTF_POSITIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// Normal shared by every glTF vertex
pub const GLTF_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Generate an indexed glTF triangle with normals and an external .bin buffer.
///
/// Buffer layout: positions (36 bytes), normals (36 bytes), u16 indices (6 bytes).
pub fn generate_triangle_gltf(path: &Path) -> std::io::Result<()> {
    let bin_name = "triangle.bin";
    let bin_path = path.with_file_name(bin_name);

    let mut buffer = Vec::new();
    for p in GLTF_POSITIONS {
        for c in p {
            buffer.extend_from_slice(&c.to_le_bytes());
        }
    }
    for _ in 0..3 {
        for c in GLTF_NORMAL {
            buffer.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        buffer.extend_from_slice(&i.to_le_bytes());
    }
    // Buffers are padded to 4 bytes
    buffer.extend_from_slice(&[0, 0]);
    std::fs::write(&bin_path, &buffer)?;

    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [{{ "nodes": [0] }}],
  "nodes": [{{ "mesh": 0 }}],
  "meshes": [{{
    "name": "triangle",
    "primitives": [{{
      "attributes": {{ "POSITION": 0, "NORMAL": 1 }},
      "indices": 2
    }}]
  }}],
  "buffers": [{{ "uri": "{bin}", "byteLength": {len} }}],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 36, "target": 34962 }},
    {{ "buffer": 0, "byteOffset": 72, "byteLength": 6, "target": 34963 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
       "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" }},
    {{ "bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR" }}
  ]
}}
"#,
        bin = bin_name,
        len = buffer.len()
    );
    std::fs::write(path, json)
}
