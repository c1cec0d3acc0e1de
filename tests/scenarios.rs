#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use nalgebra::DVector;
use petgraph::graph::NodeIndex;
use trussdsm::{
    force, free_dofs, point, solve_displacements, AnalysisError, Scenario, Truss,
};

fn node_displacement(displacements: &DVector<f64>, node: usize) -> (f64, f64) {
    (displacements[2 * node], displacements[2 * node + 1])
}

#[test]
fn three_bar_matches_course_results() {
    let solution = Scenario::three_bar().solve().expect("three-bar truss is stable");
    let d = &solution.displacements;

    assert_eq!(node_displacement(d, 0), (0.0, 0.0));
    let (ux1, uy1) = node_displacement(d, 1);
    assert_relative_eq!(ux1, -4.379, epsilon = 5.0e-4);
    assert_relative_eq!(uy1, -9.390, epsilon = 5.0e-4);
    let (ux2, uy2) = node_displacement(d, 2);
    assert_relative_eq!(ux2, 0.0);
    assert_relative_eq!(uy2, -1.071, epsilon = 5.0e-4);
}

#[test]
fn seven_bar_matches_course_results() {
    let solution = Scenario::seven_bar().solve().expect("seven-bar truss is stable");
    let d = &solution.displacements;
    let expected = [
        (1, -2.051, -4.951),
        (2, -3.076, -12.977),
        (3, 0.0, 0.0),
        (4, 1.025, -5.976),
    ];
    for (node, ux, uy) in expected {
        let (x, y) = node_displacement(d, node);
        assert_relative_eq!(x, ux, epsilon = 1.0e-3);
        assert_relative_eq!(y, uy, epsilon = 1.0e-3);
    }
}

#[test]
fn assembled_stiffness_is_symmetric() {
    for scenario in [Scenario::three_bar(), Scenario::seven_bar()] {
        let k = scenario.stiffness().expect("valid model");
        for i in 0..k.nrows() {
            for j in 0..k.ncols() {
                assert_relative_eq!(k[(i, j)], k[(j, i)], epsilon = 1.0e-9);
            }
        }
    }
}

#[test]
fn fully_restrained_structure_does_not_move() {
    let mut scenario = Scenario::seven_bar();
    scenario.restrained = (0..scenario.dof_count()).collect();
    scenario.prescribed = vec![0.0; scenario.dof_count()];

    let solution = scenario.solve().expect("nothing left to solve");
    assert!(solution.displacements.iter().all(|&value| value == 0.0));
    assert!(solution.axial_forces.iter().all(|&force| force == 0.0));
}

#[test]
fn doubling_loads_doubles_displacements() {
    for scenario in [Scenario::three_bar(), Scenario::seven_bar()] {
        let single = scenario.solve().expect("stable truss");
        let double = scenario.scaled_loads(2.0).solve().expect("stable truss");
        assert_relative_eq!(
            double.displacements,
            single.displacements * 2.0,
            epsilon = 1.0e-9
        );
    }
}

#[test]
fn free_block_reproduces_applied_loads() {
    let mut scenario = Scenario::seven_bar();
    scenario.prescribed = vec![0.5, 0.0, -0.25];

    let k = scenario.stiffness().expect("valid model");
    let loads = DVector::from_column_slice(&scenario.loads);
    let d = solve_displacements(&k, &loads, &scenario.restrained, &scenario.prescribed)
        .expect("stable truss");

    for (&dof, &value) in scenario.restrained.iter().zip(&scenario.prescribed) {
        assert_relative_eq!(d[dof], value);
    }

    let free = free_dofs(scenario.dof_count(), &scenario.restrained);
    let free_rows = k.select_rows(&free);
    let recovered = free_rows.select_columns(&free) * d.select_rows(&free)
        + free_rows.select_columns(&scenario.restrained)
            * DVector::from_column_slice(&scenario.prescribed);
    assert_relative_eq!(recovered, loads.select_rows(&free), epsilon = 1.0e-8);
}

#[test]
fn reactions_balance_applied_loads() {
    let scenario = Scenario::seven_bar();
    let solution = scenario.solve().expect("stable truss");
    let free = free_dofs(scenario.dof_count(), &scenario.restrained);
    for dof in free {
        assert_relative_eq!(solution.reactions[dof], 0.0, epsilon = 1.0e-9);
    }
    let vertical: f64 = scenario
        .restrained
        .iter()
        .filter(|&&dof| dof % 2 == 1)
        .map(|&dof| solution.reactions[dof])
        .sum();
    assert_relative_eq!(vertical, 100.0, epsilon = 1.0e-9);
}

#[test]
fn missing_roller_turns_three_bar_into_a_mechanism() {
    let mut scenario = Scenario::three_bar();
    scenario.restrained = vec![0, 1, 5];
    assert_eq!(scenario.solve(), Err(AnalysisError::SingularStiffness));
}

#[test]
fn truss_model_reproduces_three_bar_scenario() {
    let mut truss = Truss::new();
    let pin = truss.add_joint(point(0.0, 0.0));
    let tip = truss.add_joint(point(4_000.0, 0.0));
    let roller = truss.add_joint(point(0.0, 3_000.0));

    for (start, end, area, elastic_modulus) in [
        (pin, tip, 3.0e3, 70.0e3),
        (tip, roller, 2.0e3, 210.0e3),
        (pin, roller, 3.0e3, 70.0e3),
    ] {
        let bar = truss.add_bar(start, end).expect("joints exist");
        truss
            .set_bar_properties(bar, area, elastic_modulus)
            .expect("properties accepted");
    }
    truss.set_support(pin, [true, true]).expect("joint exists");
    truss
        .set_support(roller, [true, false])
        .expect("joint exists");
    let angle = 60.0_f64.to_radians();
    truss
        .set_load(
            tip,
            force(-150_000.0 * angle.sin(), -150_000.0 * angle.cos()),
        )
        .expect("joint exists");

    truss.evaluate().expect("three-bar truss is stable");

    let kernel = Scenario::three_bar().solve().expect("three-bar truss is stable");
    assert_relative_eq!(
        *truss.stiffness_matrix().expect("analysis current"),
        kernel.stiffness,
        epsilon = 1.0e-9
    );
    for node in 0..3 {
        let displacement = truss
            .joint_displacement(NodeIndex::new(node))
            .expect("joint exists");
        let (ux, uy) = node_displacement(&kernel.displacements, node);
        assert_relative_eq!(displacement.x, ux, epsilon = 1.0e-9);
        assert_relative_eq!(displacement.y, uy, epsilon = 1.0e-9);
    }
}
