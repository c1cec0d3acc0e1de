//! Assembly of the global stiffness matrix from bar contributions.

use nalgebra::DMatrix;

use crate::element::{element_stiffness, end_coordinates};
use crate::errors::AnalysisError;
use crate::geometry::Point;

/// Number of translational degrees of freedom at each node of a planar truss.
pub const DOF_PER_NODE: usize = 2;

/// Build the conventional DOF map where node `n` owns indices `2n` and `2n + 1`.
///
/// The assembly routine never numbers degrees of freedom itself; this helper is
/// for callers who want the usual ordering.
///
/// # Examples
/// ```
/// use trussdsm::sequential_dof_map;
///
/// let map = sequential_dof_map(&[[0, 2], [1, 2]]);
/// assert_eq!(map, vec![[0, 1, 4, 5], [2, 3, 4, 5]]);
/// ```
#[must_use]
pub fn sequential_dof_map(connectivity: &[[usize; 2]]) -> Vec<[usize; 4]> {
    connectivity
        .iter()
        .map(|&[start, end]| {
            let start = start * DOF_PER_NODE;
            let end = end * DOF_PER_NODE;
            [start, start + 1, end, end + 1]
        })
        .collect()
}

/// Check that a per-bar table has one row per bar.
fn expect_len(what: &'static str, expected: usize, found: usize) -> Result<(), AnalysisError> {
    if expected == found {
        Ok(())
    } else {
        Err(AnalysisError::ShapeMismatch {
            what,
            expected,
            found,
        })
    }
}

/// Assemble the `dof_count × dof_count` global stiffness matrix.
///
/// Bar `i` spans `connectivity[i]`, uses `elastic_moduli[i]` and `areas[i]`, and
/// scatters its 4×4 element matrix onto the global indices `dof_map[i]`.
///
/// # Errors
///
/// Returns [`AnalysisError::ShapeMismatch`] when the per-bar tables disagree in
/// length, [`AnalysisError::NodeOutOfRange`] or [`AnalysisError::DofOutOfRange`]
/// for indices outside the model and [`AnalysisError::InvalidBar`] when a bar
/// has non-positive properties or zero length.
pub fn assemble_global_stiffness(
    elastic_moduli: &[f64],
    areas: &[f64],
    coordinates: &[Point],
    dof_count: usize,
    connectivity: &[[usize; 2]],
    dof_map: &[[usize; 4]],
) -> Result<DMatrix<f64>, AnalysisError> {
    let bar_count = elastic_moduli.len();
    expect_len("area table", bar_count, areas.len())?;
    expect_len("connectivity table", bar_count, connectivity.len())?;
    expect_len("dof map", bar_count, dof_map.len())?;

    let mut matrix = DMatrix::zeros(dof_count, dof_count);
    for (bar, (&[start, end], dofs)) in connectivity.iter().zip(dof_map).enumerate() {
        let node_count = coordinates.len();
        for node in [start, end] {
            if node >= node_count {
                return Err(AnalysisError::NodeOutOfRange {
                    bar,
                    node,
                    node_count,
                });
            }
        }
        if let Some(&dof) = dofs.iter().find(|&&dof| dof >= dof_count) {
            return Err(AnalysisError::DofOutOfRange { dof, dof_count });
        }

        let ends = end_coordinates(coordinates[start], coordinates[end]);
        let local = element_stiffness(elastic_moduli[bar], areas[bar], &ends)
            .map_err(|source| AnalysisError::InvalidBar { bar, source })?;

        for (row_local, &global_row) in dofs.iter().enumerate() {
            for (col_local, &global_col) in dofs.iter().enumerate() {
                matrix[(global_row, global_col)] += local[(row_local, col_local)];
            }
        }
    }
    Ok(matrix)
}
