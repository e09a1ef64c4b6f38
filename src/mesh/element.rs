/// A single rectangular-prism cell of the meshed 3D model.
///
/// Elements are square in X and Y; the Z height may be shorter than the mesh
/// size when a block's depth does not divide evenly.  An element is either
/// active (participates in conduction) or empty (an inert placeholder that
/// keeps the flat arena addressable where a narrow block leaves gaps).
///
/// Only `temperature` and `pending_energy` change after construction.
#[derive(Debug, Clone)]
pub struct MeshElement {
    active: bool,
    /// Current temperature in C.
    temperature: f64,
    /// Internal generation per time step in J.
    energy_gen_per_step: f64,
    /// Thermal capacitance in J/K.
    capacitance: f64,
    /// Center-to-face conduction resistance in the XY plane in K/W.
    xy_half_resistance: f64,
    /// Center-to-face conduction resistance along Z in K/W.
    z_half_resistance: f64,
    /// Z-layer index within the arena.
    z_layer: usize,
    /// Energy queued by neighboring nodes, committed once per step, in J.
    pending_energy: f64,
}

impl MeshElement {
    /// An inert placeholder slot.  Arena allocation starts with all slots
    /// empty; `mesh()` overwrites the ones inside a block footprint.
    pub fn empty() -> Self {
        Self {
            active: false,
            temperature: 0.0,
            energy_gen_per_step: 0.0,
            capacitance: 0.0,
            xy_half_resistance: 0.0,
            z_half_resistance: 0.0,
            z_layer: 0,
            pending_energy: 0.0,
        }
    }

    pub fn new(
        temperature: f64,
        energy_gen_per_step: f64,
        capacitance: f64,
        xy_half_resistance: f64,
        z_half_resistance: f64,
        z_layer: usize,
    ) -> Self {
        Self {
            active: true,
            temperature,
            energy_gen_per_step,
            capacitance,
            xy_half_resistance,
            z_half_resistance,
            z_layer,
            pending_energy: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn z_layer(&self) -> usize {
        self.z_layer
    }

    pub fn xy_half_resistance(&self) -> f64 {
        self.xy_half_resistance
    }

    pub fn z_half_resistance(&self) -> f64 {
        self.z_half_resistance
    }

    /// Energy queued for the next commit, in J.
    pub fn pending_energy(&self) -> f64 {
        self.pending_energy
    }

    /// Queues an energy transfer for the next commit.
    ///
    /// Additive: several nodes may each deposit a contribution within one
    /// time step before the element commits.
    pub fn add_pending_energy(&mut self, energy: f64) {
        self.pending_energy += energy;
    }

    /// Commits the queued external energy plus internal generation.
    ///
    /// `T += (E_gen + E_pending) / C`, then the pending accumulator resets.
    /// This is the only operation that mutates temperature.  No-op on empty
    /// elements.
    pub fn apply_energy_transfer(&mut self) {
        if !self.active {
            return;
        }
        let energy_sum = self.energy_gen_per_step + self.pending_energy;
        self.temperature += energy_sum / self.capacitance;
        self.pending_energy = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_adds_generation_and_pending_then_resets() {
        let mut el = MeshElement::new(20.0, 0.5, 2.0, 1.0, 1.0, 0);
        el.add_pending_energy(1.0);
        el.add_pending_energy(0.5);
        el.apply_energy_transfer();

        // dT = (0.5 + 1.5) / 2.0 = 1.0
        assert!((el.temperature() - 21.0).abs() < 1e-12);
        assert_eq!(el.pending_energy(), 0.0);

        // Next step only sees generation.
        el.apply_energy_transfer();
        assert!((el.temperature() - 21.25).abs() < 1e-12);
    }

    #[test]
    fn test_empty_element_never_changes() {
        let mut el = MeshElement::empty();
        el.add_pending_energy(100.0);
        el.apply_energy_transfer();
        assert_eq!(el.temperature(), 0.0);
        assert!(!el.is_active());
    }

    #[test]
    fn test_no_generation_no_neighbors_is_invariant() {
        let mut el = MeshElement::new(65.0, 0.0, 1.5, 1.0, 1.0, 3);
        for _ in 0..1000 {
            el.apply_energy_transfer();
        }
        assert_eq!(el.temperature(), 65.0);
    }
}
