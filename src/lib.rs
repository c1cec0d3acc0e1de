#![warn(clippy::all)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![doc = include_str!("../README.md")]

pub mod assembly;
pub mod element;
mod errors;
mod geometry;
pub mod scenarios;
pub mod solver;
mod truss;

pub use assembly::{assemble_global_stiffness, sequential_dof_map, DOF_PER_NODE};
pub use element::{
    axial_force, bar_length, direction_cosines, element_stiffness, end_coordinates,
};
pub use errors::{AnalysisError, BarPropertyError, TrussEditError};
pub use geometry::{displacement, force, point, Displacement, Force, Point};
pub use scenarios::{Scenario, ScenarioSolution};
pub use solver::{free_dofs, reactions, solve_displacements, SINGULARITY_TOLERANCE};
pub use truss::Truss;
