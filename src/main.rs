//! Semiconductor sandwich demo: a silicon die between copper spreaders, TIM
//! pads, aluminum cold plates, and liquid-cooled faces.
//!
//! The water layers use an artificial conductivity tuned to reproduce the
//! desired convective film coefficient and an enormous heat capacity so they
//! behave as infinite sinks.

use anyhow::Result;
use thermstack::{Material, StackConfig, ThermalStack};

fn main() -> Result<()> {
    let config = StackConfig {
        mesh_size: 0.5,               // mm
        time_step: 0.0001,            // sec
        sample_interval_steps: 10,
        convergence_threshold: 0.0001, // C per sample
        starting_temperature: 65.0,    // C
        ..StackConfig::default()
    };

    // (conductivity k [W/mmK], volumetric heat capacity [J/mm^3K], name)
    let silicon = Material::new(0.148, 0.001643, "Silicon ");
    let aluminum = Material::new(0.205, 0.002424, "Aluminum");
    let copper = Material::new(0.401, 0.003450, "Copper  ");
    let tim = Material::new(0.01, 0.003476, "TIM Pad ");
    let water = Material::new(0.01, 20000.0, "Water   ");

    let mut stack = ThermalStack::new(config)?;

    // Blocks stack in order of declaration.
    // Inputs are (xLength [mm], yLength [mm], zDepth [mm], material, heat gen [W]).
    stack.add_block(15.0, 15.0, 0.5, &water, 0.0)?;    // block 0   ---------------
    stack.add_block(15.0, 15.0, 3.0, &aluminum, 0.0)?; // block 1   ---------------
    stack.add_block(10.0, 10.0, 0.5, &tim, 0.0)?;      // block 2      ---------
    stack.add_block(10.0, 10.0, 2.0, &copper, 0.0)?;   // block 3      ---------
    stack.add_block(5.0, 5.0, 1.0, &silicon, 100.0)?;  // block 4        -----
    stack.add_block(10.0, 10.0, 2.0, &copper, 0.0)?;   // block 5      ---------
    stack.add_block(10.0, 10.0, 0.5, &tim, 0.0)?;      // block 6      ---------
    stack.add_block(15.0, 15.0, 3.0, &aluminum, 0.0)?; // block 7   ---------------
    stack.add_block(15.0, 15.0, 0.5, &water, 0.0)?;    // block 8   ---------------

    stack.mesh()?;

    // Convergence is driven by the heat source.
    stack.monitor_block(4)?;
    stack.solve()?;

    Ok(())
}
