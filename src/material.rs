/// Bulk material properties for conduction modeling.
///
/// Shared by value across blocks; a block copies the fields it needs at
/// construction and never mutates them.
///
/// Convective interfaces (e.g. liquid cooling) are modeled as a material with
/// an artificially tuned conductivity that reproduces the desired film
/// coefficient, combined with a very large heat capacity so the layer behaves
/// as an infinite sink.
#[derive(Debug, Clone)]
pub struct Material {
    /// Thermal conductivity in W/(mm*K).
    pub conductivity: f64,
    /// Volumetric heat capacity in J/(mm^3*K).
    pub volumetric_heat_capacity: f64,
    /// Display name used in reports.
    pub name: String,
}

impl Material {
    pub fn new(conductivity: f64, volumetric_heat_capacity: f64, name: &str) -> Self {
        Self {
            conductivity,
            volumetric_heat_capacity,
            name: name.to_string(),
        }
    }
}
