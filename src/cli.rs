use clap::{Parser, ValueEnum};
use trussdsm::Scenario;

/// Run one of the course trusses through the direct stiffness method.
#[derive(Debug, Parser)]
#[command(name = "trussdsm", version, about)]
pub struct Cli {
    /// Built-in scenario to analyse.
    #[arg(value_enum, default_value_t = ScenarioName::ThreeBar)]
    pub scenario: ScenarioName,
    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Multiplier applied to every nodal load.
    #[arg(long, default_value_t = 1.0)]
    pub load_factor: f64,
    /// Print the assembled stiffness matrix and DOF partition to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Names of the built-in scenarios.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScenarioName {
    /// Three bars in a right triangle.
    ThreeBar,
    /// Seven-bar cantilever truss.
    SevenBar,
}

impl ScenarioName {
    /// Build the scenario input.
    pub fn scenario(self) -> Scenario {
        match self {
            Self::ThreeBar => Scenario::three_bar(),
            Self::SevenBar => Scenario::seven_bar(),
        }
    }
}

/// Report formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable table.
    Text,
    /// Pretty-printed JSON document.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_three_bar_text_report() {
        let cli = Cli::try_parse_from(["trussdsm"]).expect("defaults parse");
        assert_eq!(cli.scenario, ScenarioName::ThreeBar);
        assert_eq!(cli.format, Format::Text);
        assert!((cli.load_factor - 1.0).abs() < f64::EPSILON);
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_all_options() {
        let cli = Cli::try_parse_from([
            "trussdsm",
            "seven-bar",
            "--format",
            "json",
            "--load-factor",
            "2.5",
            "-v",
        ])
        .expect("options parse");
        assert_eq!(cli.scenario, ScenarioName::SevenBar);
        assert_eq!(cli.format, Format::Json);
        assert!((cli.load_factor - 2.5).abs() < f64::EPSILON);
        assert!(cli.verbose);
        assert_eq!(cli.scenario.scenario().name, "seven-bar");
    }

    #[test]
    fn rejects_unknown_scenario() {
        assert!(Cli::try_parse_from(["trussdsm", "four-bar"]).is_err());
    }
}
