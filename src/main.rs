mod analysis;
mod cli;
mod report;

use analysis::summarize;
use clap::Parser;
use cli::{Cli, Format};
use report::{render_stiffness, render_summary};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Scenario data are compiled in; the load factor is the only knob on them.
    let scenario = cli.scenario.scenario().scaled_loads(cli.load_factor);

    // Assemble K, solve the partitioned system and recover bar forces.
    let solution = scenario.solve()?;
    if cli.verbose {
        eprint!(
            "{}",
            render_stiffness(&solution.stiffness, &scenario.restrained)
        );
    }

    let summary = summarize(&scenario, &solution, cli.load_factor);
    match cli.format {
        Format::Text => println!("{}", render_summary(&summary)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
    }

    Ok(())
}
