use serde::Serialize;
use trussdsm::{Displacement, Force, Scenario, ScenarioSolution, DOF_PER_NODE};

/// Response of a single node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeResult {
    /// Node number.
    pub node: usize,
    /// Which axes are restrained.
    pub restrained: [bool; 2],
    /// Solved displacement.
    pub displacement: Displacement,
    /// Support reaction, zero on free axes.
    pub reaction: Force,
}

/// Response of a single bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarResult {
    /// Bar number.
    pub bar: usize,
    /// End nodes.
    pub nodes: [usize; 2],
    /// Axial force, tension positive.
    pub axial_force: f64,
    /// Axial stress.
    pub stress: f64,
}

/// Summary of a solved scenario, ready for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Scenario identifier.
    pub scenario: String,
    /// Multiplier that was applied to the loads.
    pub load_factor: f64,
    /// Per-node displacements and reactions.
    pub nodes: Vec<NodeResult>,
    /// Per-bar forces and stresses.
    pub bars: Vec<BarResult>,
}

/// Collect per-node and per-bar results from a solved scenario.
///
/// Displacements at restrained DOFs are exactly the prescribed values and
/// reactions are reported only where a support exists.
pub fn summarize(
    scenario: &Scenario,
    solution: &ScenarioSolution,
    load_factor: f64,
) -> AnalysisSummary {
    let nodes = (0..scenario.coordinates.len())
        .map(|node| {
            let x = node * DOF_PER_NODE;
            let y = x + 1;
            let restrained = [
                scenario.restrained.contains(&x),
                scenario.restrained.contains(&y),
            ];
            let reaction_at = |dof: usize, fixed: bool| {
                if fixed {
                    solution.reactions[dof]
                } else {
                    0.0
                }
            };
            NodeResult {
                node,
                restrained,
                displacement: Displacement::new(
                    solution.displacements[x],
                    solution.displacements[y],
                ),
                reaction: Force::new(
                    reaction_at(x, restrained[0]),
                    reaction_at(y, restrained[1]),
                ),
            }
        })
        .collect();

    let bars = scenario
        .connectivity
        .iter()
        .zip(&solution.axial_forces)
        .enumerate()
        .map(|(bar, (&nodes, &axial_force))| BarResult {
            bar,
            nodes,
            axial_force,
            stress: axial_force / scenario.areas[bar],
        })
        .collect();

    AnalysisSummary {
        scenario: scenario.name.clone(),
        load_factor,
        nodes,
        bars,
    }
}
