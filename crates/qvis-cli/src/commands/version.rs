//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - statevector simulation of small quantum circuits",
        style("qvis").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qvis-ir   Gate catalog and validated circuit model");
    println!("  qvis-sim  Statevector engine, analytics and request service");
    println!("  qvis-cli  Command-line interface");
    println!();
    println!("Threads:    {}", style(rayon::current_num_threads()).yellow());
    println!("License:    {}", style("Apache-2.0").dim());
}
