//! Error types produced while editing or analysing trusses.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

/// Error returned when an assembly or displacement solve fails.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when a bar in a [`Truss`](crate::Truss) has no area or elastic modulus.
    #[error("bar {0:?} is missing material properties")]
    MissingProperties(EdgeIndex),
    /// Returned when a bar cannot produce a stiffness matrix.
    #[error("bar {bar} is invalid: {source}")]
    InvalidBar {
        /// Position of the offending bar in the bar tables.
        bar: usize,
        /// Description of the invalid property.
        #[source]
        source: BarPropertyError,
    },
    /// Returned when two inputs that must agree in length do not.
    #[error("{what} has {found} entries but {expected} were expected")]
    ShapeMismatch {
        /// Name of the mismatched input.
        what: &'static str,
        /// Length implied by the other inputs.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },
    /// Returned when a bar references a node that is not in the coordinate table.
    #[error("bar {bar} references node {node} but only {node_count} nodes exist")]
    NodeOutOfRange {
        /// Position of the offending bar.
        bar: usize,
        /// Node index that was referenced.
        node: usize,
        /// Number of nodes in the coordinate table.
        node_count: usize,
    },
    /// Returned when a degree of freedom index falls outside `0..dof_count`.
    #[error("degree of freedom {dof} is outside 0..{dof_count}")]
    DofOutOfRange {
        /// Offending index.
        dof: usize,
        /// Total number of degrees of freedom.
        dof_count: usize,
    },
    /// Returned when the restrained set lists the same degree of freedom twice.
    #[error("degree of freedom {0} is restrained more than once")]
    DuplicateRestraint(usize),
    /// Returned when the reduced stiffness matrix cannot be factorised.
    #[error("stiffness matrix is singular; check supports and connectivity")]
    SingularStiffness,
}

/// Reason a bar cannot be turned into an element stiffness matrix.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum BarPropertyError {
    /// The cross-sectional area is zero, negative or not finite.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Rejected cross-sectional area.
        area: f64,
    },
    /// The elastic modulus is zero, negative or not finite.
    #[error("elastic modulus must be positive (received {elastic_modulus})")]
    NonPositiveElasticModulus {
        /// Rejected elastic modulus.
        elastic_modulus: f64,
    },
    /// Both ends of the bar coincide.
    #[error("bar has zero length")]
    ZeroLength,
    /// An end coordinate is NaN or infinite.
    #[error("bar end coordinates must be finite")]
    NonFiniteCoordinates,
}

/// Error returned when editing a [`Truss`](crate::Truss) with invalid indices.
///
/// # Examples
///
/// ```
/// use petgraph::graph::EdgeIndex;
/// use trussdsm::{Truss, TrussEditError};
///
/// let mut truss = Truss::new();
/// let invalid_bar = EdgeIndex::new(42);
/// let error = truss
///     .set_bar_properties(invalid_bar, 3_000.0, 70.0e3)
///     .expect_err("unknown bar is rejected");
/// assert_eq!(error, TrussEditError::UnknownBar(invalid_bar));
/// ```
#[derive(Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a joint cannot be found in the truss.
    #[error("joint {0:?} does not exist in this truss")]
    UnknownJoint(NodeIndex),
    /// Returned when a bar cannot be found in the truss.
    #[error("bar {0:?} does not exist in this truss")]
    UnknownBar(EdgeIndex),
    /// Returned when the supplied bar properties are invalid.
    #[error("{0}")]
    InvalidBarProperties(BarPropertyError),
}
