use std::collections::HashSet;
use std::time::Instant;

use anyhow::{bail, ensure, Result};

use crate::block::Block;
use crate::material::Material;
use crate::mesh::{Grid3, MeshElement, MeshNode};
use crate::report;

/// Mesh and solver parameters for a [`ThermalStack`].
#[derive(Debug, Clone, Copy)]
pub struct StackConfig {
    /// Element edge length in mm.
    pub mesh_size: f64,
    /// Integration time step in seconds.
    pub time_step: f64,
    /// Number of time steps between convergence samples.
    pub sample_interval_steps: u64,
    /// Convergence threshold in C: the solve stops once the monitored bulk
    /// temperature rises by no more than this between consecutive samples.
    pub convergence_threshold: f64,
    /// Uniform initial temperature in C.
    pub starting_temperature: f64,
    /// Hard step bound; exceeding it surfaces non-convergence as an error
    /// instead of looping forever.
    pub max_steps: u64,
    /// Suppresses all console output (reports, progress).
    pub quiet: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            mesh_size: 0.5,
            time_step: 1e-4,
            sample_interval_steps: 10,
            convergence_threshold: 1e-4,
            starting_temperature: 20.0,
            max_steps: 50_000_000,
            quiet: false,
        }
    }
}

/// Converged solve results.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Simulated time at one thermal time constant, in seconds.
    pub tau_time: f64,
    /// Monitored bulk temperature at one time constant, in C.
    pub tau_temperature: f64,
    /// Simulated time at convergence, in seconds.
    pub steady_time: f64,
    /// Monitored bulk temperature at convergence, in C.
    pub steady_temperature: f64,
    /// (steady - initial) / monitored block generation, in K/W.
    pub thermal_impedance: f64,
    /// Number of time steps marched.
    pub steps: u64,
    /// Wall-clock solve duration.
    pub elapsed: std::time::Duration,
}

/// A 3D heat transfer system of stacked blocks and the means to solve for
/// its transient and steady-state characteristics.
///
/// ```no_run
/// use thermstack::{Material, StackConfig, ThermalStack};
///
/// # fn main() -> anyhow::Result<()> {
/// let copper = Material::new(0.401, 0.003450, "Copper");
/// let mut stack = ThermalStack::new(StackConfig::default())?;
/// stack.add_block(10.0, 10.0, 2.0, &copper, 25.0)?; // heat source
/// stack.add_block(15.0, 15.0, 3.0, &copper, 0.0)?;  // spreader
/// stack.mesh()?;
/// stack.monitor_block(0)?;
/// let solution = stack.solve()?;
/// println!("{:.3} K/W", solution.thermal_impedance);
/// # Ok(())
/// # }
/// ```
///
/// The lifecycle is one-directional: blocks are added, `mesh()` runs exactly
/// once, then `solve()` runs exactly once.  Out-of-order calls are rejected.
pub struct ThermalStack {
    config: StackConfig,
    blocks: Vec<Block>,
    /// The element arena; `None` until meshed.  Sole owner of element
    /// storage; blocks and nodes hold indices into it.
    grid: Option<Grid3>,
    nodes: Vec<MeshNode>,
    monitored_block: usize,
    /// Monitored bulk temperature, one entry per sample interval.
    temp_history: Vec<f64>,
    active_element_count: usize,
    solved: bool,
}

impl ThermalStack {
    pub fn new(config: StackConfig) -> Result<Self> {
        ensure!(
            config.mesh_size > 0.0,
            "mesh size must be > 0, got {}",
            config.mesh_size
        );
        ensure!(
            config.time_step > 0.0,
            "time step must be > 0, got {}",
            config.time_step
        );
        ensure!(
            config.sample_interval_steps >= 1,
            "sample interval must be >= 1 step"
        );
        ensure!(
            config.convergence_threshold >= 0.0 && config.convergence_threshold.is_finite(),
            "convergence threshold must be finite and >= 0, got {}",
            config.convergence_threshold
        );
        ensure!(config.max_steps >= 1, "max steps must be >= 1");

        Ok(Self {
            config,
            blocks: Vec::new(),
            grid: None,
            nodes: Vec::new(),
            monitored_block: 0,
            temp_history: Vec::new(),
            active_element_count: 0,
            solved: false,
        })
    }

    /// Appends a block to the stack.  Blocks accumulate along Z in call
    /// order, each centered in X and Y.  Valid only before `mesh()`.
    pub fn add_block(
        &mut self,
        x_length: f64,
        y_length: f64,
        z_length: f64,
        material: &Material,
        q_gen: f64,
    ) -> Result<()> {
        ensure!(self.grid.is_none(), "cannot add blocks after mesh()");
        let block = Block::new(
            x_length,
            y_length,
            z_length,
            self.config.mesh_size,
            material,
            q_gen,
        )?;
        self.blocks.push(block);
        Ok(())
    }

    /// Discretizes the block stackup into the element arena and builds the
    /// conduction graph.  Callable exactly once.
    pub fn mesh(&mut self) -> Result<()> {
        ensure!(self.grid.is_none(), "mesh() has already run");
        ensure!(!self.blocks.is_empty(), "cannot mesh an empty stack");

        if !self.config.quiet {
            print!("Generating mesh elements... ");
        }
        let grid = self.generate_elements();
        if !self.config.quiet {
            println!("Generated {} elements", self.active_element_count);
            print!("Creating element links/nodes... ");
        }
        self.generate_nodes(&grid);
        if !self.config.quiet {
            println!("Created {} nodes", self.nodes.len());
        }

        self.grid = Some(grid);
        Ok(())
    }

    /// Allocates the bounding arena and instantiates elements block by block.
    ///
    /// The arena spans the largest X and Y element counts and the sum of all
    /// Z element counts; each block consumes a contiguous run of Z layers in
    /// stack order.  Slots outside a block's centered XY footprint stay empty.
    fn generate_elements(&mut self) -> Grid3 {
        let x_max = self
            .blocks
            .iter()
            .map(Block::x_element_count)
            .max()
            .expect("mesh() ensured blocks exist");
        let y_max = self.blocks.iter().map(Block::y_element_count).max().unwrap();
        let z_total: usize = self.blocks.iter().map(Block::z_element_count).sum();

        let mut grid = Grid3::new(x_max, y_max, z_total);

        // Which block owns each Z layer.
        let mut block_of_layer = Vec::with_capacity(z_total);
        for (i, block) in self.blocks.iter().enumerate() {
            block_of_layer.extend(std::iter::repeat(i).take(block.z_element_count()));
        }

        for z in 0..z_total {
            let block_idx = block_of_layer[z];
            let block = &self.blocks[block_idx];

            let x_start = (x_max - block.x_element_count()) / 2;
            let y_start = (y_max - block.y_element_count()) / 2;
            let x_end = x_start + block.x_element_count();
            let y_end = y_start + block.y_element_count();

            let energy_gen_per_step = block.q_gen_element() * self.config.time_step;
            let c_element = block.c_element();
            let xy_half_resistance = block.xy_half_resistance();
            let z_half_resistance = block.z_half_resistance();

            for y in y_start..y_end {
                for x in x_start..x_end {
                    let element = MeshElement::new(
                        self.config.starting_temperature,
                        energy_gen_per_step,
                        c_element,
                        xy_half_resistance,
                        z_half_resistance,
                        z,
                    );
                    grid.set(x, y, z, element);

                    let index = grid
                        .active_index(x as isize, y as isize, z as isize)
                        .expect("freshly instantiated element must be active");
                    self.blocks[block_idx].register_element(index);
                    self.active_element_count += 1;
                }
            }
        }

        grid
    }

    /// Links every unique pair of face-adjacent active elements with one
    /// conduction node.  Deduplicated with a visited-edge set keyed by the
    /// sorted index pair, so each unordered pair produces exactly one node.
    fn generate_nodes(&mut self, grid: &Grid3) {
        let (nx, ny, nz) = grid.dims();
        let mut linked: HashSet<(usize, usize)> = HashSet::new();

        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx {
                    let (x, y, z) = (x as isize, y as isize, z as isize);
                    let Some(current) = grid.active_index(x, y, z) else {
                        continue;
                    };
                    for neighbor in grid.active_neighbors(x, y, z) {
                        let key = (current.min(neighbor), current.max(neighbor));
                        if linked.insert(key) {
                            self.nodes
                                .push(MeshNode::new(current, neighbor, grid.elements()));
                        }
                    }
                }
            }
        }
    }

    /// Selects which block's bulk temperature drives convergence detection.
    ///
    /// The block should be a heat source; monitoring a passive block can keep
    /// the rise below threshold long before the stack is anywhere near steady
    /// state, or (with a sink-dominated stack) never trip convergence at all
    /// until the step bound fires.
    pub fn monitor_block(&mut self, block_index: usize) -> Result<()> {
        ensure!(
            block_index < self.blocks.len(),
            "block index {block_index} out of range (stack has {} blocks)",
            self.blocks.len()
        );
        self.monitored_block = block_index;
        Ok(())
    }

    /// Marches the explicit solution to convergence.
    ///
    /// Each step runs in two phases: every node computes its energy exchange
    /// from the temperatures as they stood at the start of the step (nodes
    /// write only pending accumulators), then every element commits its
    /// pending energy plus internal generation.  Interleaving the two would
    /// bias the result by update order.
    ///
    /// Errors if the monitored temperature is still rising faster than the
    /// threshold after `max_steps` steps.
    pub fn solve(&mut self) -> Result<Solution> {
        ensure!(self.grid.is_some(), "solve() requires mesh() first");
        ensure!(!self.solved, "solve() has already run");
        self.solved = true;

        let config = self.config;
        let wall_clock = Instant::now();

        if !config.quiet {
            println!("\nThermal stack initial state:\n");
            self.illustrate();
            println!();
            report::solve_preamble(&config, self.monitored_block, &self.blocks[self.monitored_block]);
        }

        let dt = config.time_step;
        let sample_time = dt * config.sample_interval_steps as f64;
        let mut previous_temperature = config.starting_temperature;
        let mut current_temperature = config.starting_temperature;
        let mut step: u64 = 0;
        let mut converged = false;

        while !converged {
            if step >= config.max_steps {
                bail!(
                    "no convergence after {} steps ({:.3} simulated seconds); \
                     monitored block {} may not be a heat source",
                    step,
                    step as f64 * dt,
                    self.monitored_block
                );
            }

            let grid = self.grid.as_mut().expect("checked above");

            // Transfer phase: all nodes read the step-start temperatures.
            for node in &self.nodes {
                node.energy_transfer(grid.elements_mut(), dt);
            }
            // Commit phase: all elements fold in pending energy + generation.
            for element in grid.elements_mut() {
                element.apply_energy_transfer();
            }

            step += 1;
            let current_time = step as f64 * dt;

            if step % config.sample_interval_steps == 0 {
                let grid = self.grid.as_ref().expect("checked above");
                current_temperature =
                    self.blocks[self.monitored_block].bulk_temp(grid.elements());
                self.temp_history.push(current_temperature);

                let rise = current_temperature - previous_temperature;
                if rise > config.convergence_threshold {
                    if !config.quiet {
                        report::progress_line(current_time, current_temperature, rise / sample_time);
                    }
                } else {
                    converged = true;
                }
                previous_temperature = current_temperature;
            }
        }

        let steady_time = step as f64 * dt;
        let tau_index = locate_tau_index(
            &self.temp_history,
            config.starting_temperature,
            current_temperature,
        );
        let tau_time = (tau_index as f64 + 1.0) * sample_time;
        let tau_temperature = self.temp_history[tau_index];

        let monitored = &self.blocks[self.monitored_block];
        let thermal_impedance =
            (current_temperature - config.starting_temperature) / monitored.q_gen();

        let elapsed = wall_clock.elapsed();

        if !config.quiet {
            report::convergence_lines(
                tau_time,
                tau_temperature,
                steady_time,
                current_temperature,
                elapsed,
            );
            println!("\n");
            self.illustrate();
            println!();
            report::impedance_line(thermal_impedance);
        }

        Ok(Solution {
            tau_time,
            tau_temperature,
            steady_time,
            steady_temperature: current_temperature,
            thermal_impedance,
            steps: step,
            elapsed,
        })
    }

    /// Prints the 2D stack illustration with per-block data.
    pub fn illustrate(&self) {
        let grid = self
            .grid
            .as_ref()
            .expect("illustrate() requires mesh() first");
        let x_max = grid.dims().0;
        report::illustrate(&self.blocks, grid.elements(), x_max);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The element arena.  Panics before `mesh()`.
    pub fn elements(&self) -> &[MeshElement] {
        self.grid
            .as_ref()
            .expect("elements() requires mesh() first")
            .elements()
    }

    pub fn nodes(&self) -> &[MeshNode] {
        &self.nodes
    }

    /// Number of active (non-placeholder) elements in the arena.
    pub fn active_element_count(&self) -> usize {
        self.active_element_count
    }

    /// Sampled monitored-block temperatures, one per sample interval.
    pub fn temp_history(&self) -> &[f64] {
        &self.temp_history
    }
}

/// Locates one thermal time constant in the sampled history: the first sample
/// index whose remaining distance to the steady value is at most 36.8% (e^-1)
/// of the total initial-to-steady delta.
fn locate_tau_index(history: &[f64], temp_initial: f64, temp_steady: f64) -> usize {
    let remaining_at_tau = (temp_steady - temp_initial) * 0.368;
    history
        .iter()
        .position(|&sample| (temp_steady - sample) <= remaining_at_tau)
        .unwrap_or(history.len().saturating_sub(1))
}
