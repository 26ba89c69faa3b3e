//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qvis_ir::{CircuitLimits, library};
use qvis_sim::SimulationRequest;
use qvis_sim::SimulationResponse;
use qvis_sim::sampling::outcome_to_bitstring;

/// Rows shown in amplitude and count tables.
const MAX_ROWS: usize = 16;

/// Probabilities at or below this are treated as zero in tables.
const DISPLAY_EPSILON: f64 = 1e-12;

/// Load a simulation request from a JSON file.
pub fn load_request(path: &Path) -> Result<SimulationRequest> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    serde_json::from_str(&source)
        .with_context(|| format!("Invalid request document: {}", path.display()))
}

/// Build the request document of a named example.
pub fn example_request(name: &str, limits: &CircuitLimits) -> Result<SimulationRequest> {
    let example = library::find(name).ok_or_else(|| {
        let available: Vec<_> = library::EXAMPLES.iter().map(|e| e.name).collect();
        anyhow::anyhow!(
            "Unknown example: '{name}'. Available: {}",
            available.join(", ")
        )
    })?;
    let circuit = example.build(limits)?;
    Ok(SimulationRequest::from_circuit(&circuit))
}

/// Print a successful response as tables.
pub fn print_response(response: &SimulationResponse) {
    let num_qubits = response.num_qubits.unwrap_or(0);

    println!(
        "\n{} Simulated {} qubits (depth {}, size {})",
        style("✓").green().bold(),
        num_qubits,
        response.circuit_depth.unwrap_or(0),
        response.circuit_size.unwrap_or(0),
    );

    if let (Some(amplitudes), Some(probabilities)) = (&response.statevector, &response.probabilities) {
        println!("\n  {}", style("Amplitudes").bold());
        let nonzero: Vec<_> = probabilities
            .iter()
            .enumerate()
            .filter(|&(_, p)| *p > DISPLAY_EPSILON)
            .collect();
        for &(index, prob) in nonzero.iter().take(MAX_ROWS) {
            let [re, im] = amplitudes[index];
            println!(
                "  |{}⟩  {:>9.5} {:+.5}i  {:>7.3}%  {}",
                style(outcome_to_bitstring(index, num_qubits)).cyan(),
                re,
                im,
                prob * 100.0,
                style(bar(*prob)).green()
            );
        }
        if nonzero.len() > MAX_ROWS {
            println!("  ... and {} more basis states", nonzero.len() - MAX_ROWS);
        }
    }

    if let Some(marginals) = &response.marginal_probabilities {
        println!("\n  {}", style("Marginals").bold());
        for m in marginals {
            println!(
                "  q{:<3} P(0) = {:.5}  P(1) = {:.5}",
                m.qubit,
                m.prob_0,
                m.prob_1
            );
        }
    }

    if let Some(counts) = &response.counts {
        let total: u64 = counts.values().sum();
        println!("\n  {} ({} shots)", style("Counts").bold(), total);
        let mut sorted: Vec<_> = counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (bitstring, count) in sorted.iter().take(MAX_ROWS) {
            let share = **count as f64 / total.max(1) as f64;
            println!(
                "  {}: {:>6} ({:>5.2}%) {}",
                style(bitstring).cyan(),
                count,
                share * 100.0,
                style(bar(share)).green()
            );
        }
        if sorted.len() > MAX_ROWS {
            println!("  ... and {} more outcomes", sorted.len() - MAX_ROWS);
        }
    }
}

/// Horizontal bar, one block per 2%.
fn bar(fraction: f64) -> String {
    let len = (fraction * 50.0).round() as usize;
    "█".repeat(len)
}
