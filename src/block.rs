use anyhow::{ensure, Result};

use crate::material::Material;
use crate::mesh::MeshElement;

/// A user-declared rectangular material mass.
///
/// Blocks of differing dimensions are stacked along Z to form a heat transfer
/// circuit.  At construction the block discretizes itself for the given mesh
/// size and derives the per-element thermal properties every one of its
/// elements will share.  X and Y extents are rounded to the nearest whole mm;
/// the Z depth is kept exact, so the bottom layer of elements may be shorter
/// than the mesh size.
#[derive(Debug, Clone)]
pub struct Block {
    material_name: String,

    /// Rounded X extent in mm.
    x_length: f64,
    /// Rounded Y extent in mm.
    y_length: f64,
    /// Exact Z depth in mm.
    z_length: f64,

    /// Block-total heat generation in W.
    q_gen: f64,
    /// Per-element heat generation in W.
    q_gen_element: f64,
    /// Per-element thermal capacitance in J/K.
    c_element: f64,
    /// Element center-to-face resistance in the XY plane in K/W.
    xy_half_resistance: f64,
    /// Element center-to-face resistance along Z in K/W.
    z_half_resistance: f64,

    x_element_count: usize,
    y_element_count: usize,
    z_element_count: usize,

    /// Arena indices of the elements instantiated inside this block's
    /// footprint, registered during mesh generation.
    element_indices: Vec<usize>,
}

impl Block {
    /// Discretizes a rectangular mass for the given mesh size.
    ///
    /// Element counts are `round(len / mesh_size)` in X and Y and
    /// `ceil(len / mesh_size)` in Z, so even a paper-thin block still gets one
    /// full layer.  Rejects dimensions or mesh sizes that produce a degenerate
    /// mesh instead of letting zero counts corrupt the derived properties.
    pub fn new(
        x_length: f64,
        y_length: f64,
        z_length: f64,
        mesh_size: f64,
        material: &Material,
        q_gen: f64,
    ) -> Result<Self> {
        ensure!(mesh_size > 0.0, "mesh size must be > 0, got {mesh_size}");
        ensure!(
            x_length > 0.0 && y_length > 0.0 && z_length > 0.0,
            "block dimensions must be > 0, got ({x_length}, {y_length}, {z_length})"
        );
        ensure!(
            material.conductivity > 0.0,
            "material '{}' must have conductivity > 0, got {}",
            material.name,
            material.conductivity
        );
        ensure!(
            material.volumetric_heat_capacity > 0.0,
            "material '{}' must have volumetric heat capacity > 0, got {}",
            material.name,
            material.volumetric_heat_capacity
        );

        let x_length = x_length.round();
        let y_length = y_length.round();

        let x_element_count = (x_length / mesh_size).round() as usize;
        let y_element_count = (y_length / mesh_size).round() as usize;
        let z_element_count = (z_length / mesh_size).ceil() as usize;
        ensure!(
            x_element_count >= 1 && y_element_count >= 1,
            "block ({x_length} x {y_length} mm) is too small for a {mesh_size} mm mesh"
        );

        let volume = x_length * y_length * z_length;
        let num_elements = (x_element_count * y_element_count * z_element_count) as f64;

        let c_element = (material.volumetric_heat_capacity * volume) / num_elements;
        let q_gen_element = q_gen / num_elements;

        // Elements are square in XY.  Half-resistances span element center to
        // face; two adjoining halves sum to the full center-to-center path.
        let xy_element_length = x_length / x_element_count as f64;
        let z_element_length = z_length / z_element_count as f64;
        let side_area = xy_element_length * z_element_length;
        let vertical_area = xy_element_length * xy_element_length;

        let k = material.conductivity;
        let xy_half_resistance = (xy_element_length / 2.0) / (k * side_area);
        let z_half_resistance = (z_element_length / 2.0) / (k * vertical_area);

        Ok(Self {
            material_name: material.name.clone(),
            x_length,
            y_length,
            z_length,
            q_gen,
            q_gen_element,
            c_element,
            xy_half_resistance,
            z_half_resistance,
            x_element_count,
            y_element_count,
            z_element_count,
            element_indices: Vec::new(),
        })
    }

    /// Registers an element assigned to this block during mesh generation.
    pub fn register_element(&mut self, index: usize) {
        self.element_indices.push(index);
    }

    /// Mean temperature over this block's registered elements.
    ///
    /// Precondition: at least one element has been registered (the block has
    /// been meshed).
    pub fn bulk_temp(&self, elements: &[MeshElement]) -> f64 {
        assert!(
            !self.element_indices.is_empty(),
            "bulk_temp on unmeshed block '{}'",
            self.material_name
        );
        let sum: f64 = self
            .element_indices
            .iter()
            .map(|&i| elements[i].temperature())
            .sum();
        sum / self.element_indices.len() as f64
    }

    /// Temperature spread statistic printed in stack reports:
    /// `sqrt(sum((T - T_mean)^2)) / n`.
    ///
    /// Note this is *not* the conventional standard deviation (the square
    /// root is taken before dividing by the count); the conventional form is
    /// [`Block::temp_std_dev`].  Kept because downstream report consumers
    /// expect this exact statistic.
    pub fn temp_deviation(&self, elements: &[MeshElement]) -> f64 {
        let n = self.element_indices.len() as f64;
        self.sum_square_errors(elements).sqrt() / n
    }

    /// Conventional population standard deviation of element temperatures:
    /// `sqrt(sum((T - T_mean)^2) / n)`.
    pub fn temp_std_dev(&self, elements: &[MeshElement]) -> f64 {
        let n = self.element_indices.len() as f64;
        (self.sum_square_errors(elements) / n).sqrt()
    }

    fn sum_square_errors(&self, elements: &[MeshElement]) -> f64 {
        let mean = self.bulk_temp(elements);
        self.element_indices
            .iter()
            .map(|&i| {
                let d = elements[i].temperature() - mean;
                d * d
            })
            .sum()
    }

    /// Difference between the hottest and coldest element in this block.
    pub fn temp_non_uniformity(&self, elements: &[MeshElement]) -> f64 {
        let mut low = self.bulk_temp(elements);
        let mut high = low;
        for &i in &self.element_indices {
            let t = elements[i].temperature();
            low = low.min(t);
            high = high.max(t);
        }
        high - low
    }

    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    /// Block-total heat generation in W.
    pub fn q_gen(&self) -> f64 {
        self.q_gen
    }

    /// Per-element heat generation in W.
    pub fn q_gen_element(&self) -> f64 {
        self.q_gen_element
    }

    /// Per-element thermal capacitance in J/K.
    pub fn c_element(&self) -> f64 {
        self.c_element
    }

    pub fn xy_half_resistance(&self) -> f64 {
        self.xy_half_resistance
    }

    pub fn z_half_resistance(&self) -> f64 {
        self.z_half_resistance
    }

    pub fn x_length(&self) -> f64 {
        self.x_length
    }

    pub fn y_length(&self) -> f64 {
        self.y_length
    }

    /// Block volume in mm^3 (rounded X/Y extents, exact Z).
    pub fn volume(&self) -> f64 {
        self.x_length * self.y_length * self.z_length
    }

    pub fn x_element_count(&self) -> usize {
        self.x_element_count
    }

    pub fn y_element_count(&self) -> usize {
        self.y_element_count
    }

    pub fn z_element_count(&self) -> usize {
        self.z_element_count
    }

    /// Number of elements registered to this block during meshing.
    pub fn registered_element_count(&self) -> usize {
        self.element_indices.len()
    }
}
