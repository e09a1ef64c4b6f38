use crate::mesh::element::MeshElement;

/// Face-neighbor offsets (+/-X, +/-Y, +/-Z).
pub const FACE_NEIGHBOR_OFFSETS: [(isize, isize, isize); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// The element arena: a dense 3D grid stored flat, addressed as
/// `x + y * nx + z * nx * ny`.
///
/// The grid is the sole owner of element storage; blocks and nodes refer to
/// elements by index.  Slots outside any block footprint stay empty, which is
/// what makes the flat addressing work for stacks of differing XY extents.
/// All spatial lookups go through [`Grid3::active_index`], which is bounds
/// checked and filters empty slots; raw index arithmetic never leaks out.
#[derive(Debug, Clone)]
pub struct Grid3 {
    nx: usize,
    ny: usize,
    nz: usize,
    elements: Vec<MeshElement>,
}

impl Grid3 {
    /// Allocates an all-empty grid of the given dimensions.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        assert!(
            nx > 0 && ny > 0 && nz > 0,
            "grid dimensions must be positive, got ({nx}, {ny}, {nz})"
        );
        Self {
            nx,
            ny,
            nz,
            elements: vec![MeshElement::empty(); nx * ny * nz],
        }
    }

    /// Grid dimensions `(nx, ny, nz)` in element counts.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    /// Total slot count, empty slots included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[MeshElement] {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut [MeshElement] {
        &mut self.elements
    }

    /// Maps a coordinate to its arena index, empty or not.
    ///
    /// Returns `None` outside the grid bounds.  Signed coordinates let
    /// neighbor scans step off either edge without wrapping.
    pub fn slot_index(&self, x: isize, y: isize, z: isize) -> Option<usize> {
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= self.nx || y >= self.ny || z >= self.nz {
            return None;
        }
        Some(x + y * self.nx + z * self.nx * self.ny)
    }

    /// Maps a coordinate to the index of an *active* element.
    ///
    /// Returns `None` for out-of-bounds coordinates and for in-bounds slots
    /// holding an empty placeholder.
    pub fn active_index(&self, x: isize, y: isize, z: isize) -> Option<usize> {
        let idx = self.slot_index(x, y, z)?;
        if self.elements[idx].is_active() {
            Some(idx)
        } else {
            None
        }
    }

    /// Replaces the element at a coordinate.  Panics out of bounds; meshing
    /// only writes coordinates produced by its own loop.
    pub fn set(&mut self, x: usize, y: usize, z: usize, element: MeshElement) {
        let idx = self
            .slot_index(x as isize, y as isize, z as isize)
            .unwrap_or_else(|| panic!("set() out of bounds at ({x}, {y}, {z})"));
        self.elements[idx] = element;
    }

    /// Indices of the up-to-6 active face neighbors of a coordinate.
    pub fn active_neighbors(&self, x: isize, y: isize, z: isize) -> Vec<usize> {
        FACE_NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy, dz)| self.active_index(x + dx, y + dy, z + dz))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_active_center() -> Grid3 {
        // 3x3x3, only the center element active.
        let mut grid = Grid3::new(3, 3, 3);
        grid.set(1, 1, 1, MeshElement::new(0.0, 0.0, 1.0, 1.0, 1.0, 1));
        grid
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let grid = grid_with_active_center();
        assert_eq!(grid.active_index(-1, 0, 0), None);
        assert_eq!(grid.active_index(3, 0, 0), None);
        assert_eq!(grid.active_index(0, -1, 0), None);
        assert_eq!(grid.active_index(0, 3, 0), None);
        assert_eq!(grid.active_index(0, 0, -1), None);
        assert_eq!(grid.active_index(0, 0, 3), None);
    }

    #[test]
    fn test_empty_slot_is_none_but_slot_index_is_some() {
        let grid = grid_with_active_center();
        assert_eq!(grid.active_index(0, 0, 0), None);
        assert!(grid.slot_index(0, 0, 0).is_some());
        assert_eq!(grid.active_index(1, 1, 1), Some(1 + 3 + 9));
    }

    #[test]
    fn test_flat_addressing_order() {
        let grid = Grid3::new(4, 3, 2);
        assert_eq!(grid.slot_index(0, 0, 0), Some(0));
        assert_eq!(grid.slot_index(1, 0, 0), Some(1));
        assert_eq!(grid.slot_index(0, 1, 0), Some(4));
        assert_eq!(grid.slot_index(0, 0, 1), Some(12));
        assert_eq!(grid.slot_index(3, 2, 1), Some(23));
        assert_eq!(grid.len(), 24);
    }

    #[test]
    fn test_isolated_element_has_no_neighbors() {
        let grid = grid_with_active_center();
        assert!(grid.active_neighbors(1, 1, 1).is_empty());
    }

    #[test]
    fn test_neighbors_found_when_active() {
        let mut grid = grid_with_active_center();
        grid.set(1, 1, 0, MeshElement::new(0.0, 0.0, 1.0, 1.0, 1.0, 0));
        grid.set(2, 1, 1, MeshElement::new(0.0, 0.0, 1.0, 1.0, 1.0, 1));
        let mut neighbors = grid.active_neighbors(1, 1, 1);
        neighbors.sort_unstable();
        assert_eq!(neighbors, vec![grid.slot_index(1, 1, 0).unwrap(), grid.slot_index(2, 1, 1).unwrap()]);
    }
}
