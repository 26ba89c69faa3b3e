//! Simulate command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use tracing::debug;

use qvis_sim::{SimulationService, Simulator, SimulatorConfig};

use super::common::{example_request, load_request, print_response};

/// Execute the simulate command.
pub fn execute(
    config: &SimulatorConfig,
    input: Option<&Path>,
    example: Option<&str>,
    format: &str,
    shots: Option<u32>,
    seed: Option<u64>,
) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "table" => false,
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    };

    let (source, mut request) = match (input, example) {
        (Some(path), _) => (path.display().to_string(), load_request(path)?),
        (None, Some(name)) => (name.to_string(), example_request(name, &config.circuit_limits())?),
        (None, None) => anyhow::bail!("Either --input or --example is required"),
    };
    if shots.is_some() {
        request.shots = shots;
    }
    if seed.is_some() {
        request.seed = seed;
    }

    if !as_json {
        println!(
            "{} Simulating {} ({} qubits, {} operations)",
            style("→").cyan().bold(),
            style(&source).green(),
            request.num_qubits,
            request.operations.len()
        );
    }

    let service = SimulationService::new(Simulator::new(config.clone())?);
    let response = service.handle(&request);
    debug!(success = response.success, "Request handled");

    if as_json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else if response.success {
        print_response(&response);
    }

    if !response.success {
        let message = response.error.as_deref().unwrap_or("simulation failed");
        match response.error_kind {
            Some(kind) => anyhow::bail!("{message} ({kind})"),
            None => anyhow::bail!("{message}"),
        }
    }

    Ok(())
}
