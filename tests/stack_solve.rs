//! End-to-end solve of a three-block sandwich: a generating middle block
//! between two near-ideal sink blocks.

use approx::assert_relative_eq;
use thermstack::{Material, StackConfig, ThermalStack};

const Q_SOURCE: f64 = 5.0;
const T_START: f64 = 65.0;

fn sandwich() -> ThermalStack {
    let config = StackConfig {
        mesh_size: 1.0,
        time_step: 1e-4,
        sample_interval_steps: 10,
        convergence_threshold: 1e-6,
        starting_temperature: T_START,
        max_steps: 20_000_000,
        quiet: true,
    };

    // Sink: high conductivity (negligible resistance) and a huge volumetric
    // heat capacity, so the outer blocks hold temperature like a bath.
    let sink = Material::new(10.0, 100.0, "Sink");
    let core = Material::new(0.2, 0.0024, "Core");

    let mut stack = ThermalStack::new(config).unwrap();
    stack.add_block(10.0, 10.0, 1.0, &sink, 0.0).unwrap();
    stack.add_block(10.0, 10.0, 1.0, &core, Q_SOURCE).unwrap();
    stack.add_block(10.0, 10.0, 1.0, &sink, 0.0).unwrap();
    stack.mesh().unwrap();
    stack.monitor_block(1).unwrap();
    stack
}

#[test]
fn test_mesh_counts_for_uniform_footprints() {
    let stack = sandwich();

    // No block footprint exceeds the bounding box, so every slot is active.
    let expected_active: usize = stack
        .blocks()
        .iter()
        .map(|b| b.x_element_count() * b.y_element_count() * b.z_element_count())
        .sum();
    assert_eq!(expected_active, 300);
    assert_eq!(stack.active_element_count(), expected_active);
    assert_eq!(stack.elements().len(), expected_active);

    // One node per unique face-adjacent pair of a full 10x10x3 box.
    let expected_nodes = 9 * 10 * 3 + 10 * 9 * 3 + 10 * 10 * 2;
    assert_eq!(stack.nodes().len(), expected_nodes);
}

#[test]
fn test_solve_converges_and_reports_impedance() {
    let mut stack = sandwich();
    let solution = stack.solve().unwrap();

    // The source warmed up and settled.
    assert!(solution.steady_temperature > T_START);
    assert!(solution.steady_time > 0.0);
    assert!(solution.tau_time <= solution.steady_time);

    // Impedance is the steady rise over the monitored generation.
    assert_relative_eq!(
        solution.thermal_impedance,
        (solution.steady_temperature - T_START) / Q_SOURCE,
        max_relative = 1e-12
    );
    assert!(solution.thermal_impedance > 0.0);

    // The sinks barely moved while the source rose.
    let elements = stack.elements();
    let sink_rise = stack.blocks()[0].bulk_temp(elements) - T_START;
    let source_rise = solution.steady_temperature - T_START;
    assert!(
        sink_rise < source_rise * 0.1,
        "sink rise {sink_rise} vs source rise {source_rise}"
    );
}

#[test]
fn test_tau_marks_first_sample_inside_the_band() {
    let mut stack = sandwich();
    let solution = stack.solve().unwrap();

    let history = stack.temp_history();
    let band = (solution.steady_temperature - T_START) * 0.368;
    let first_inside = history
        .iter()
        .position(|&t| (solution.steady_temperature - t) <= band)
        .expect("a converged history reaches the band");

    assert_relative_eq!(solution.tau_temperature, history[first_inside]);
    // Sample i is taken after (i + 1) sample intervals of 10 * 1e-4 s.
    assert_relative_eq!(
        solution.tau_time,
        (first_inside as f64 + 1.0) * 1e-3,
        max_relative = 1e-12
    );
    // Earlier samples are all still outside the band.
    for &t in &history[..first_inside] {
        assert!((solution.steady_temperature - t) > band);
    }
}
