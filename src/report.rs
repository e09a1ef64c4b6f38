//! Console reporting for stack solves.
//!
//! Everything here is plain stdout formatting; the solver calls these helpers
//! unless configured quiet.

use std::io::Write;
use std::time::Duration;

use crate::block::Block;
use crate::mesh::MeshElement;
use crate::stack::StackConfig;

/// Width of the dash-bar field in the stack illustration.
const BAR_WIDTH: usize = 20;

/// Prints a 2D side view of the stack: one row per block, with a centered
/// dash bar scaled by the block's X extent relative to the widest block,
/// followed by material name, bulk temperature, temperature spread,
/// generation, and volume.
pub fn illustrate(blocks: &[Block], elements: &[MeshElement], x_element_count_max: usize) {
    println!(
        "                                         Matl        T_avg      T_var     Q_gen     Vol \n"
    );

    for (i, block) in blocks.iter().enumerate() {
        let bar = extent_bar(block.x_element_count(), x_element_count_max);
        println!(
            "    Block {i}\t{bar}  \t {}    {:.0} C\t{:.0} C\t  {:.0} W\t    {:.0} mm^3",
            block.material_name(),
            block.bulk_temp(elements),
            block.temp_non_uniformity(elements),
            block.q_gen(),
            block.volume(),
        );
    }
}

/// A centered run of dashes proportional to `count / count_max`, in a
/// fixed-width field.  The widest block fills the field; narrower blocks
/// shrink in steps of two dashes to stay centered.
fn extent_bar(count: usize, count_max: usize) -> String {
    let normalized = count as f64 / count_max as f64;
    let dash_count = ((normalized * 10.0).round() as usize) * 2;
    let dash_count = dash_count.min(BAR_WIDTH);
    let start = (BAR_WIDTH - dash_count) / 2;
    let end = start + dash_count;

    (0..BAR_WIDTH)
        .map(|j| if j >= start && j < end { '-' } else { ' ' })
        .collect()
}

/// Echoes the solver parameters before marching.
pub fn solve_preamble(config: &StackConfig, block_index: usize, block: &Block) {
    let sample_time = config.time_step * config.sample_interval_steps as f64;
    println!("Solving...\n");
    println!(
        "    Monitoring block {block_index}, {}, generating {:.0} W",
        block.material_name(),
        block.q_gen()
    );
    println!("    Mesh Size = {:.2} mm", config.mesh_size);
    println!("    Time Step = {:.6} sec", config.time_step);
    println!("    Sampling Time Interval = {:.6} sec", sample_time);
    println!(
        "    Convergence dT/dt_Target = {:.3} C/sec\n",
        config.convergence_threshold / sample_time
    );
    println!(
        "    t = 0 seconds         T_avg = {:.3} C",
        config.starting_temperature
    );
}

/// Overwrites the current console line with solve progress.
pub fn progress_line(time: f64, temperature: f64, rate: f64) {
    print!(
        "    t = {time:.3} seconds     T_avg = {temperature:.3} C\tdT/dt_Current = {rate:.6} C/sec          \r"
    );
    let _ = std::io::stdout().flush();
}

/// Prints the time-constant and steady-state lines plus the wall-clock
/// summary once the solve has converged.
pub fn convergence_lines(
    tau_time: f64,
    tau_temperature: f64,
    steady_time: f64,
    steady_temperature: f64,
    elapsed: Duration,
) {
    println!(
        "    t = {tau_time:.3} seconds     T_avg = {tau_temperature:.3} C  \t<- @ one time constant"
    );
    println!(
        "    t = {steady_time:.3} seconds     T_avg = {steady_temperature:.3} C  \t<- @ steady state"
    );

    let total_seconds = elapsed.as_secs();
    println!(
        "\nConverged on the following solution after {} minutes and {} seconds",
        total_seconds / 60,
        total_seconds % 60
    );
}

pub fn impedance_line(thermal_impedance: f64) {
    println!(
        "Thermal impedance, heat source to infinite heatsink = {thermal_impedance:.3} K/W \n"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_bar_full_width_for_widest_block() {
        assert_eq!(extent_bar(20, 20), "-".repeat(20));
    }

    #[test]
    fn test_extent_bar_centered_for_narrow_block() {
        // Half the width: 10 dashes centered in 20 columns.
        let bar = extent_bar(10, 20);
        assert_eq!(bar.len(), 20);
        assert_eq!(bar, format!("{}{}{}", " ".repeat(5), "-".repeat(10), " ".repeat(5)));
    }

    #[test]
    fn test_extent_bar_steps_of_two() {
        // 7/20 -> round(3.5) * 2 = 8 dashes.
        let bar = extent_bar(7, 20);
        assert_eq!(bar.matches('-').count(), 8);
    }
}
