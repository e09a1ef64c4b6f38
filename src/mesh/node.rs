use crate::mesh::element::MeshElement;

/// An undirected conduction link between two face-adjacent active elements.
///
/// Endpoints are indices into the stack's element arena.  The combined
/// resistance is precomputed at construction: the sum of the two endpoints'
/// half-resistances, taking the lateral (XY) path when both elements sit on
/// the same Z layer and the vertical path otherwise.  The layer test is
/// structural, not spatial: X- and Y-adjacent elements always share a layer.
#[derive(Debug, Clone)]
pub struct MeshNode {
    a: usize,
    b: usize,
    /// Center-to-center conduction resistance in K/W.
    resistance: f64,
}

impl MeshNode {
    /// Links two active elements.  Panics if either endpoint is empty or the
    /// combined resistance is not positive; `mesh()` only pairs active
    /// elements, so this guards graph-construction bugs.
    pub fn new(a: usize, b: usize, elements: &[MeshElement]) -> Self {
        let ea = &elements[a];
        let eb = &elements[b];
        assert!(
            ea.is_active() && eb.is_active(),
            "node ({a}, {b}) references an empty element"
        );

        let resistance = if ea.z_layer() == eb.z_layer() {
            ea.xy_half_resistance() + eb.xy_half_resistance()
        } else {
            ea.z_half_resistance() + eb.z_half_resistance()
        };
        assert!(
            resistance > 0.0,
            "node ({a}, {b}) has non-positive resistance {resistance}"
        );

        Self { a, b, resistance }
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.a, self.b)
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Computes one step's energy exchange and queues it on both endpoints.
    ///
    /// `q = (T_a - T_b) / R`, `E = q * dt`; endpoint `a` is debited `E` and
    /// endpoint `b` credited `E`, so heat flows from hot to cold and the pair
    /// conserves energy exactly.  Reads temperatures only, writes pending
    /// only, which is what keeps the step-wide update order-independent.
    pub fn energy_transfer(&self, elements: &mut [MeshElement], time_step: f64) {
        let dt = elements[self.a].temperature() - elements[self.b].temperature();
        let q = dt / self.resistance;
        let energy = q * time_step;

        elements[self.a].add_pending_energy(-energy);
        elements[self.b].add_pending_energy(energy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(t_a: f64, t_b: f64, layer_b: usize) -> Vec<MeshElement> {
        vec![
            MeshElement::new(t_a, 0.0, 1.0, 2.0, 5.0, 0),
            MeshElement::new(t_b, 0.0, 1.0, 3.0, 7.0, layer_b),
        ]
    }

    #[test]
    fn test_lateral_resistance_for_same_layer() {
        let elements = pair(0.0, 0.0, 0);
        let node = MeshNode::new(0, 1, &elements);
        assert_eq!(node.resistance(), 2.0 + 3.0);
    }

    #[test]
    fn test_vertical_resistance_across_layers() {
        let elements = pair(0.0, 0.0, 1);
        let node = MeshNode::new(0, 1, &elements);
        assert_eq!(node.resistance(), 5.0 + 7.0);
    }

    #[test]
    fn test_transfer_is_antisymmetric() {
        let mut elements = pair(30.0, 20.0, 0);
        let node = MeshNode::new(0, 1, &elements);
        node.energy_transfer(&mut elements, 0.1);

        // q = 10 / 5 = 2 W, E = 0.2 J leaving the hot side.
        assert!((elements[0].pending_energy() + 0.2).abs() < 1e-12);
        assert!((elements[1].pending_energy() - 0.2).abs() < 1e-12);
        assert!(
            (elements[0].pending_energy() + elements[1].pending_energy()).abs() < 1e-15,
            "pair must conserve energy"
        );
    }

    #[test]
    fn test_equal_temperatures_transfer_nothing() {
        let mut elements = pair(42.0, 42.0, 0);
        let node = MeshNode::new(0, 1, &elements);
        node.energy_transfer(&mut elements, 0.1);
        assert_eq!(elements[0].pending_energy(), 0.0);
        assert_eq!(elements[1].pending_energy(), 0.0);
    }
}
