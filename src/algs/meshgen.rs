//! Basic mesh generators for structured boxes.
//!
//! Vertices are numbered lexicographically (x fastest) and cells likewise, so
//! the derived edge/face numbering of [`InMemoryTopology::from_cells`] is
//! deterministic. Every generated mesh carries one side set per box side in
//! the order x-, x+, y-, y+ and, in 3D, z-, z+.

use crate::mesh_error::MeshDofError;
use crate::topology::cell_table::CellTable;
use crate::topology::cell_type::CellType;
use crate::topology::in_memory::InMemoryTopology;
use crate::topology::mesh_topology::Coordinates;
use crate::topology::side_sets::SideSets;

/// Cell-type choices for structured meshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StructuredCellType {
    Triangle,
    Quadrilateral,
    Hexahedron,
}

/// Side-set index of each box side.
pub mod box_side {
    pub const X_MIN: usize = 0;
    pub const X_MAX: usize = 1;
    pub const Y_MIN: usize = 2;
    pub const Y_MAX: usize = 3;
    pub const Z_MIN: usize = 4;
    pub const Z_MAX: usize = 5;
}

fn invalid_geometry(message: impl Into<String>) -> MeshDofError {
    MeshDofError::InvalidGeometry(message.into())
}

fn check_extent<const D: usize>(min: [f64; D], max: [f64; D]) -> Result<(), MeshDofError> {
    for d in 0..D {
        if !(max[d] > min[d]) {
            return Err(invalid_geometry(format!(
                "axis {d}: max {} must exceed min {}",
                max[d], min[d]
            )));
        }
    }
    Ok(())
}

/// Cell rows plus the `(set, cell, side)` boundary entries collected while
/// generating them.
struct CellsAndSides {
    rows: Vec<usize>,
    sides: Vec<(usize, usize, usize)>,
}

fn build_mesh(
    cell_type: CellType,
    dimension: usize,
    vertices: Vec<f64>,
    cells: CellsAndSides,
    num_sets: usize,
) -> Result<InMemoryTopology, MeshDofError> {
    let coordinates = Coordinates::new(dimension, vertices)?;
    let cell_to_node = CellTable::from_flat(cell_type.num_nodes(), cells.rows)?;
    let num_cells = cell_to_node.num_rows();
    let mut side_sets = SideSets::new();
    for _ in 0..num_sets {
        side_sets.add_set(num_cells);
    }
    for (set, cell, side) in cells.sides {
        side_sets.insert(set, cell, side)?;
    }
    InMemoryTopology::from_cells(cell_type, coordinates.num_nodes(), cell_to_node)?
        .with_coordinates(coordinates)?
        .with_side_sets(side_sets)
}

/// Generate a structured 2D box mesh over `[min, max]` with `nx`×`ny` cells.
///
/// Triangles split every quadrilateral along its `v0`–`v2` diagonal.
pub fn structured_box_2d(
    nx: usize,
    ny: usize,
    min: [f64; 2],
    max: [f64; 2],
    cell_type: StructuredCellType,
) -> Result<InMemoryTopology, MeshDofError> {
    use box_side::*;
    if nx == 0 || ny == 0 {
        return Err(invalid_geometry("nx and ny must be positive"));
    }
    check_extent(min, max)?;
    let cell_type = match cell_type {
        StructuredCellType::Triangle => CellType::Triangle,
        StructuredCellType::Quadrilateral => CellType::Quadrilateral,
        StructuredCellType::Hexahedron => {
            return Err(invalid_geometry("hex elements are not valid for 2D meshes"));
        }
    };

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let mut vertices = Vec::with_capacity(2 * (nx + 1) * (ny + 1));
    for j in 0..=ny {
        let y = min[1] + dy * j as f64;
        for i in 0..=nx {
            vertices.extend([min[0] + dx * i as f64, y]);
        }
    }

    let mut cells = CellsAndSides {
        rows: Vec::new(),
        sides: Vec::new(),
    };
    let row_stride = nx + 1;
    for j in 0..ny {
        for i in 0..nx {
            let v0 = j * row_stride + i;
            let v1 = v0 + 1;
            let v3 = v0 + row_stride;
            let v2 = v3 + 1;
            let cell = cells.rows.len() / cell_type.num_nodes();
            match cell_type {
                CellType::Triangle => {
                    // lower-right triangle: edge 0 bottom, edge 1 right
                    cells.rows.extend([v0, v1, v2]);
                    // upper-left triangle: edge 1 top, edge 2 left
                    cells.rows.extend([v0, v2, v3]);
                    let upper = cell + 1;
                    if j == 0 {
                        cells.sides.push((Y_MIN, cell, 0));
                    }
                    if i + 1 == nx {
                        cells.sides.push((X_MAX, cell, 1));
                    }
                    if j + 1 == ny {
                        cells.sides.push((Y_MAX, upper, 1));
                    }
                    if i == 0 {
                        cells.sides.push((X_MIN, upper, 2));
                    }
                }
                _ => {
                    cells.rows.extend([v0, v1, v2, v3]);
                    if j == 0 {
                        cells.sides.push((Y_MIN, cell, 0));
                    }
                    if i + 1 == nx {
                        cells.sides.push((X_MAX, cell, 1));
                    }
                    if j + 1 == ny {
                        cells.sides.push((Y_MAX, cell, 2));
                    }
                    if i == 0 {
                        cells.sides.push((X_MIN, cell, 3));
                    }
                }
            }
        }
    }

    build_mesh(cell_type, 2, vertices, cells, 4)
}

/// Generate a structured 3D box mesh over `[min, max]` with `nx`×`ny`×`nz` cells.
pub fn structured_box_3d(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
    cell_type: StructuredCellType,
) -> Result<InMemoryTopology, MeshDofError> {
    use box_side::*;
    if nx == 0 || ny == 0 || nz == 0 {
        return Err(invalid_geometry("nx, ny, and nz must be positive"));
    }
    check_extent(min, max)?;
    if cell_type != StructuredCellType::Hexahedron {
        return Err(invalid_geometry(
            "triangle/quadrilateral elements are not valid for 3D box meshes",
        ));
    }

    let dx = (max[0] - min[0]) / nx as f64;
    let dy = (max[1] - min[1]) / ny as f64;
    let dz = (max[2] - min[2]) / nz as f64;
    let mut vertices = Vec::with_capacity(3 * (nx + 1) * (ny + 1) * (nz + 1));
    for k in 0..=nz {
        let z = min[2] + dz * k as f64;
        for j in 0..=ny {
            let y = min[1] + dy * j as f64;
            for i in 0..=nx {
                vertices.extend([min[0] + dx * i as f64, y, z]);
            }
        }
    }

    let mut cells = CellsAndSides {
        rows: Vec::with_capacity(8 * nx * ny * nz),
        sides: Vec::new(),
    };
    let row_stride = nx + 1;
    let slab_stride = row_stride * (ny + 1);
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let cell = cells.rows.len() / 8;
                let v0 = k * slab_stride + j * row_stride + i;
                let v1 = v0 + 1;
                let v3 = v0 + row_stride;
                let v2 = v3 + 1;
                let v4 = v0 + slab_stride;
                let v5 = v4 + 1;
                let v7 = v4 + row_stride;
                let v6 = v7 + 1;
                cells.rows.extend([v0, v1, v2, v3, v4, v5, v6, v7]);
                // reference faces: 0 y-, 1 x+, 2 y+, 3 x-, 4 z-, 5 z+
                let on_boundary = [
                    (i == 0, X_MIN, 3),
                    (i + 1 == nx, X_MAX, 1),
                    (j == 0, Y_MIN, 0),
                    (j + 1 == ny, Y_MAX, 2),
                    (k == 0, Z_MIN, 4),
                    (k + 1 == nz, Z_MAX, 5),
                ];
                for (hit, set, face) in on_boundary {
                    if hit {
                        cells.sides.push((set, cell, face));
                    }
                }
            }
        }
    }

    build_mesh(CellType::Hexahedron, 3, vertices, cells, 6)
}

/// Structured quadrilateral box; shorthand for [`structured_box_2d`].
pub fn structured_quad_box(
    nx: usize,
    ny: usize,
    min: [f64; 2],
    max: [f64; 2],
) -> Result<InMemoryTopology, MeshDofError> {
    structured_box_2d(nx, ny, min, max, StructuredCellType::Quadrilateral)
}

/// Structured hexahedral box; shorthand for [`structured_box_3d`].
pub fn structured_hex_box(
    nx: usize,
    ny: usize,
    nz: usize,
    min: [f64; 3],
    max: [f64; 3],
) -> Result<InMemoryTopology, MeshDofError> {
    structured_box_3d(nx, ny, nz, min, max, StructuredCellType::Hexahedron)
}
