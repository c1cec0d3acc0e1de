use crate::analysis::AnalysisSummary;
use nalgebra::DMatrix;
use std::fmt::Write;
use trussdsm::free_dofs;

/// Render a textual summary of the scenario analysis.
///
/// Displacements are in millimetres and forces in newtons, matching the
/// scenario data.
#[must_use]
pub fn render_summary(summary: &AnalysisSummary) -> String {
    let mut output = String::new();

    writeln!(
        &mut output,
        "Direct stiffness analysis: {} (load factor {})",
        summary.scenario, summary.load_factor
    )
    .expect("writing to string cannot fail");

    output.push_str("\nNode  support        ux [mm]        uy [mm]        Rx [N]        Ry [N]\n");
    for node in &summary.nodes {
        let support = match node.restrained {
            [true, true] => "pin",
            [true, false] => "x-roller",
            [false, true] => "y-roller",
            [false, false] => "free",
        };
        writeln!(
            &mut output,
            "{:>4}  {:<8} {:>+14.4} {:>+14.4} {:>+13.1} {:>+13.1}",
            node.node,
            support,
            node.displacement.x,
            node.displacement.y,
            node.reaction.x,
            node.reaction.y
        )
        .expect("writing to string cannot fail");
    }

    output.push_str("\n Bar  nodes      axial force [N]   stress [N/mm2]\n");
    for bar in &summary.bars {
        writeln!(
            &mut output,
            "{:>4}  {:>2} - {:<2} {:>+18.2} {:>+16.4}",
            bar.bar, bar.nodes[0], bar.nodes[1], bar.axial_force, bar.stress
        )
        .expect("writing to string cannot fail");
    }

    output
}

/// Render the global stiffness matrix and the free/restrained split for `--verbose`.
#[must_use]
pub fn render_stiffness(stiffness: &DMatrix<f64>, restrained: &[usize]) -> String {
    let mut output = String::new();
    writeln!(
        &mut output,
        "Global stiffness matrix ({0} x {0}):",
        stiffness.nrows()
    )
    .expect("writing to string cannot fail");
    for row in stiffness.row_iter() {
        let line: Vec<String> = row.iter().map(|value| format!("{value:>12.3e}")).collect();
        writeln!(&mut output, "{}", line.join(" ")).expect("writing to string cannot fail");
    }
    writeln!(&mut output, "Restrained DOFs: {restrained:?}")
        .expect("writing to string cannot fail");
    writeln!(
        &mut output,
        "Free DOFs: {:?}",
        free_dofs(stiffness.nrows(), restrained)
    )
    .expect("writing to string cannot fail");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{BarResult, NodeResult};
    use trussdsm::{Displacement, Force};

    #[test]
    fn formats_human_readable_report() {
        let summary = AnalysisSummary {
            scenario: "three-bar".to_owned(),
            load_factor: 1.0,
            nodes: vec![NodeResult {
                node: 1,
                restrained: [false, false],
                displacement: Displacement::new(-4.3794, -9.3904),
                reaction: Force::default(),
            }],
            bars: vec![BarResult {
                bar: 1,
                nodes: [1, 2],
                axial_force: 125_000.0,
                stress: 62.5,
            }],
        };
        let report = render_summary(&summary);
        assert!(report.contains("three-bar"));
        assert!(report.contains("free"));
        assert!(report.contains("-4.3794"));
        assert!(report.contains("+125000.00"));
        assert!(report.contains("+62.5000"));
    }

    #[test]
    fn lists_dof_partition() {
        let stiffness = DMatrix::identity(4, 4);
        let text = render_stiffness(&stiffness, &[0, 3]);
        assert!(text.contains("(4 x 4)"));
        assert!(text.contains("Restrained DOFs: [0, 3]"));
        assert!(text.contains("Free DOFs: [1, 2]"));
    }
}
