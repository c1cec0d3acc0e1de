//! Partitioned solve for nodal displacements under prescribed boundary values.

use std::collections::HashSet;

use nalgebra::{DMatrix, DVector};

use crate::errors::AnalysisError;

/// Smallest ratio between an LU pivot and the largest entry of its column in the
/// reduced stiffness matrix accepted as non-singular.
pub const SINGULARITY_TOLERANCE: f64 = 1.0e-10;

/// Return the degrees of freedom in `0..dof_count` that are not restrained, in ascending order.
///
/// # Examples
/// ```
/// use trussdsm::free_dofs;
///
/// assert_eq!(free_dofs(6, &[0, 1, 4]), vec![2, 3, 5]);
/// ```
#[must_use]
pub fn free_dofs(dof_count: usize, restrained: &[usize]) -> Vec<usize> {
    let restrained: HashSet<usize> = restrained.iter().copied().collect();
    (0..dof_count)
        .filter(|dof| !restrained.contains(dof))
        .collect()
}

/// Reject restrained sets with repeated or out-of-range entries.
fn check_restrained(dof_count: usize, restrained: &[usize]) -> Result<(), AnalysisError> {
    let mut seen = HashSet::with_capacity(restrained.len());
    for &dof in restrained {
        if dof >= dof_count {
            return Err(AnalysisError::DofOutOfRange { dof, dof_count });
        }
        if !seen.insert(dof) {
            return Err(AnalysisError::DuplicateRestraint(dof));
        }
    }
    Ok(())
}

/// Check that the stiffness matrix is square and `vector` matches it.
fn check_system(
    stiffness: &DMatrix<f64>,
    what: &'static str,
    vector: &DVector<f64>,
) -> Result<usize, AnalysisError> {
    let dof_count = stiffness.nrows();
    if stiffness.ncols() != dof_count {
        return Err(AnalysisError::ShapeMismatch {
            what: "stiffness matrix columns",
            expected: dof_count,
            found: stiffness.ncols(),
        });
    }
    if vector.len() != dof_count {
        return Err(AnalysisError::ShapeMismatch {
            what,
            expected: dof_count,
            found: vector.len(),
        });
    }
    Ok(dof_count)
}

/// Solve `K d = F` with the displacements at `restrained` fixed to `prescribed`.
///
/// The free block `K[free, free]` is factorised by LU decomposition with partial
/// pivoting, and the right-hand side is `F[free] - K[free, restrained] * prescribed`.
///
/// # Errors
///
/// Returns [`AnalysisError::ShapeMismatch`] when the inputs disagree in size,
/// [`AnalysisError::DofOutOfRange`] or [`AnalysisError::DuplicateRestraint`] for
/// a malformed restrained set and [`AnalysisError::SingularStiffness`] when the
/// structure is a mechanism or is not supported well enough to be solved.
pub fn solve_displacements(
    stiffness: &DMatrix<f64>,
    loads: &DVector<f64>,
    restrained: &[usize],
    prescribed: &[f64],
) -> Result<DVector<f64>, AnalysisError> {
    let dof_count = check_system(stiffness, "load vector", loads)?;
    if prescribed.len() != restrained.len() {
        return Err(AnalysisError::ShapeMismatch {
            what: "prescribed displacements",
            expected: restrained.len(),
            found: prescribed.len(),
        });
    }
    check_restrained(dof_count, restrained)?;

    let mut displacements = DVector::zeros(dof_count);
    for (&dof, &value) in restrained.iter().zip(prescribed) {
        displacements[dof] = value;
    }

    let free = free_dofs(dof_count, restrained);
    if free.is_empty() {
        return Ok(displacements);
    }

    let free_rows = stiffness.select_rows(&free);
    let reduced = free_rows.select_columns(&free);
    let mut rhs = loads.select_rows(&free);
    if !restrained.is_empty() {
        let coupling = free_rows.select_columns(restrained);
        rhs -= coupling * DVector::from_column_slice(prescribed);
    }

    // Partial pivoting swaps rows only, so pivot `i` still belongs to column `i`.
    let column_scales: Vec<f64> = reduced.column_iter().map(|column| column.amax()).collect();
    let lu = reduced.lu();
    let pivots = lu.u().diagonal();
    if pivots
        .iter()
        .zip(&column_scales)
        .any(|(pivot, &scale)| {
            !pivot.is_finite() || pivot.abs() <= scale * SINGULARITY_TOLERANCE
        })
    {
        return Err(AnalysisError::SingularStiffness);
    }
    let solution = lu.solve(&rhs).ok_or(AnalysisError::SingularStiffness)?;

    for (idx, &dof) in free.iter().enumerate() {
        displacements[dof] = solution[idx];
    }
    Ok(displacements)
}

/// Nodal forces the supports must supply, `K d - F`.
///
/// Entries at free degrees of freedom vanish up to rounding once `d` solves the system.
///
/// # Errors
///
/// Returns [`AnalysisError::ShapeMismatch`] when the vectors do not match the matrix.
pub fn reactions(
    stiffness: &DMatrix<f64>,
    displacements: &DVector<f64>,
    loads: &DVector<f64>,
) -> Result<DVector<f64>, AnalysisError> {
    check_system(stiffness, "displacement vector", displacements)?;
    check_system(stiffness, "load vector", loads)?;
    Ok(stiffness * displacements - loads)
}
