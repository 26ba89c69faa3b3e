//! Examples command implementation.
//!
//! Lists the built-in circuits, or prints one as a request document that can
//! be edited and fed back to `qvis simulate --input`.

use anyhow::Result;
use console::style;

use qvis_ir::library;
use qvis_sim::SimulatorConfig;

use super::common::example_request;

/// Execute the examples command.
pub fn execute(config: &SimulatorConfig, name: Option<&str>) -> Result<()> {
    let limits = config.circuit_limits();

    if let Some(name) = name {
        let request = example_request(name, &limits)?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    println!("{} Built-in examples:", style("→").cyan().bold());
    for example in &library::EXAMPLES {
        let circuit = example.build(&limits)?;
        println!(
            "  {:<28} {:>2} qubits {:>3} ops  {}",
            style(example.name).green(),
            circuit.num_qubits(),
            circuit.size(),
            style(example.description).dim()
        );
    }
    Ok(())
}
