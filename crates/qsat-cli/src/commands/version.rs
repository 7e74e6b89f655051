//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Grover search for Boolean satisfiability",
        style("qsat").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsat-ir           Circuit intermediate representation");
    println!("  qsat-logic        Boolean expressions, DIMACS and templates");
    println!("  qsat-hal          Backend abstraction and histograms");
    println!("  qsat-search       Phase oracles and Grover search");
    println!("  qsat-adapter-sim  Statevector simulator");
    println!("  qsat-cli          Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/hiq-lab/qsat").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
