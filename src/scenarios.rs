//! The worked examples from the matrix structural analysis course.
//!
//! Each [`Scenario`] carries the raw kernel inputs exactly as a student would
//! type them out: node coordinates, bar connectivity, an explicit DOF map,
//! per-bar material data, the load vector and the boundary conditions.
//! Units are millimetres and newtons.

use nalgebra::{DMatrix, DVector, Vector4};
use serde::{Deserialize, Serialize};

use crate::assembly::{assemble_global_stiffness, DOF_PER_NODE};
use crate::element::{axial_force, end_coordinates};
use crate::errors::AnalysisError;
use crate::geometry::{point, Point};
use crate::solver::{reactions, solve_displacements};

/// Complete input of one direct stiffness analysis.
///
/// Scenarios other than the built-in ones can be read from JSON.
///
/// # Examples
/// ```
/// use trussdsm::Scenario;
///
/// let json = r#"{
///     "name": "single-bar",
///     "coordinates": [{"x": 0.0, "y": 0.0}, {"x": 1000.0, "y": 0.0}],
///     "connectivity": [[0, 1]],
///     "dof_map": [[0, 1, 2, 3]],
///     "elastic_moduli": [200000.0],
///     "areas": [100.0],
///     "loads": [0.0, 0.0, 10000.0, 0.0],
///     "restrained": [0, 1, 3],
///     "prescribed": [0.0, 0.0, 0.0]
/// }"#;
/// let scenario: Scenario = serde_json::from_str(json).expect("valid scenario");
/// let solution = scenario.solve().expect("supported bar");
/// assert!((solution.displacements[2] - 0.5).abs() < 1.0e-12);
/// assert!((solution.axial_forces[0] - 10_000.0).abs() < 1.0e-6);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Short identifier used on the command line.
    pub name: String,
    /// Node coordinates, indexed by node number.
    pub coordinates: Vec<Point>,
    /// End nodes of each bar.
    pub connectivity: Vec<[usize; 2]>,
    /// Global DOF indices of each bar in (node1-x, node1-y, node2-x, node2-y) order.
    pub dof_map: Vec<[usize; 4]>,
    /// Young's modulus of each bar.
    pub elastic_moduli: Vec<f64>,
    /// Cross-sectional area of each bar.
    pub areas: Vec<f64>,
    /// Applied nodal forces, one entry per degree of freedom.
    pub loads: Vec<f64>,
    /// Restrained degrees of freedom.
    pub restrained: Vec<usize>,
    /// Prescribed displacements aligned with `restrained`.
    pub prescribed: Vec<f64>,
}

/// Output of [`Scenario::solve`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioSolution {
    /// Assembled global stiffness matrix.
    pub stiffness: DMatrix<f64>,
    /// Displacement of every degree of freedom.
    pub displacements: DVector<f64>,
    /// Support reactions `K d - F`.
    pub reactions: DVector<f64>,
    /// Axial force in each bar, tension positive.
    pub axial_forces: Vec<f64>,
}

impl Scenario {
    /// Three bars forming a right triangle, loaded at 60° from vertical.
    ///
    /// Node 0 is pinned and node 2 rides on a roller that blocks x-translation.
    #[must_use]
    pub fn three_bar() -> Self {
        let angle = 60.0_f64.to_radians();
        let mut loads = vec![0.0; 6];
        loads[2] = -150_000.0 * angle.sin();
        loads[3] = -150_000.0 * angle.cos();
        Self {
            name: "three-bar".to_owned(),
            coordinates: vec![point(0.0, 0.0), point(4_000.0, 0.0), point(0.0, 3_000.0)],
            connectivity: vec![[0, 1], [1, 2], [0, 2]],
            dof_map: vec![[0, 1, 2, 3], [2, 3, 4, 5], [0, 1, 4, 5]],
            elastic_moduli: vec![70.0e3, 210.0e3, 70.0e3],
            areas: vec![3.0e3, 2.0e3, 3.0e3],
            loads,
            restrained: vec![0, 1, 4],
            prescribed: vec![0.0; 3],
        }
    }

    /// Seven-bar cantilevered truss hung from a wall at nodes 0 and 3.
    ///
    /// Node 3 is pinned, node 0 is restrained horizontally and the tip node 2
    /// carries a 100 N downward load.
    #[must_use]
    pub fn seven_bar() -> Self {
        let mut loads = vec![0.0; 10];
        loads[5] = -100.0;
        Self {
            name: "seven-bar".to_owned(),
            coordinates: vec![
                point(0.0, 0.0),
                point(3_000.0, 0.0),
                point(6_000.0, 0.0),
                point(0.0, 3_000.0),
                point(3_000.0, 3_000.0),
            ],
            connectivity: vec![[0, 1], [0, 3], [1, 2], [1, 3], [1, 4], [2, 4], [3, 4]],
            dof_map: vec![
                [0, 1, 2, 3],
                [0, 1, 6, 7],
                [2, 3, 4, 5],
                [2, 3, 6, 7],
                [2, 3, 8, 9],
                [4, 5, 8, 9],
                [6, 7, 8, 9],
            ],
            elastic_moduli: vec![1_540.0; 7],
            areas: vec![190.0; 7],
            loads,
            restrained: vec![0, 6, 7],
            prescribed: vec![0.0; 3],
        }
    }

    /// Look up a built-in scenario by its command-line name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "three-bar" => Some(Self::three_bar()),
            "seven-bar" => Some(Self::seven_bar()),
            _ => None,
        }
    }

    /// Total number of degrees of freedom.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        self.coordinates.len() * DOF_PER_NODE
    }

    /// Copy of the scenario with every applied force multiplied by `factor`.
    #[must_use]
    pub fn scaled_loads(&self, factor: f64) -> Self {
        Self {
            loads: self.loads.iter().map(|load| load * factor).collect(),
            ..self.clone()
        }
    }

    /// Assemble the global stiffness matrix.
    ///
    /// # Errors
    ///
    /// Propagates any [`AnalysisError`] raised while assembling.
    pub fn stiffness(&self) -> Result<DMatrix<f64>, AnalysisError> {
        assemble_global_stiffness(
            &self.elastic_moduli,
            &self.areas,
            &self.coordinates,
            self.dof_count(),
            &self.connectivity,
            &self.dof_map,
        )
    }

    /// Assemble, solve and post-process the scenario.
    ///
    /// # Errors
    ///
    /// Propagates any [`AnalysisError`] raised while assembling or solving.
    pub fn solve(&self) -> Result<ScenarioSolution, AnalysisError> {
        let stiffness = self.stiffness()?;
        let loads = DVector::from_column_slice(&self.loads);
        let displacements =
            solve_displacements(&stiffness, &loads, &self.restrained, &self.prescribed)?;
        let reactions = reactions(&stiffness, &displacements, &loads)?;

        let axial_forces = self
            .connectivity
            .iter()
            .zip(&self.dof_map)
            .enumerate()
            .map(|(bar, (&[start, end], dofs))| {
                let ends = end_coordinates(self.coordinates[start], self.coordinates[end]);
                let local = Vector4::from_fn(|row, _| displacements[dofs[row]]);
                axial_force(self.elastic_moduli[bar], self.areas[bar], &ends, &local)
                    .map_err(|source| AnalysisError::InvalidBar { bar, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScenarioSolution {
            stiffness,
            displacements,
            reactions,
            axial_forces,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::assembly::sequential_dof_map;

    #[test]
    fn built_in_maps_use_sequential_numbering() {
        for scenario in [Scenario::three_bar(), Scenario::seven_bar()] {
            assert_eq!(scenario.dof_map, sequential_dof_map(&scenario.connectivity));
            assert_eq!(scenario.loads.len(), scenario.dof_count());
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(Scenario::by_name("seven-bar"), Some(Scenario::seven_bar()));
        assert_eq!(Scenario::by_name("four-bar"), None);
    }

    #[test]
    fn three_bar_bar_forces_balance_the_load() {
        let solution = Scenario::three_bar().solve().expect("stable truss");
        // Equilibrium at node 1: bar 0 pulls left, bar 1 pulls toward node 2.
        let (f0, f1) = (solution.axial_forces[0], solution.axial_forces[1]);
        let load_x = -150_000.0 * 60.0_f64.to_radians().sin();
        assert_relative_eq!(-f0 - 0.8 * f1 + load_x, 0.0, epsilon = 1.0e-4);
        assert_relative_eq!(0.6 * f1 - 75_000.0, 0.0, epsilon = 1.0e-4);
    }

    #[test]
    fn scaled_loads_leave_geometry_alone() {
        let base = Scenario::seven_bar();
        let doubled = base.scaled_loads(2.0);
        assert_eq!(doubled.loads[5], -200.0);
        assert_eq!(doubled.coordinates, base.coordinates);
    }

    #[test]
    fn scenario_reloads_from_json() {
        let json = serde_json::to_string(&Scenario::seven_bar()).expect("serialisable");
        let reloaded: Scenario = serde_json::from_str(&json).expect("well-formed scenario");
        assert_eq!(reloaded, Scenario::seven_bar());
    }
}
