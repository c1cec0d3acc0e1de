//! Editable truss model solved with the direct stiffness kernel.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector, Vector4};
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::assembly::{assemble_global_stiffness, sequential_dof_map, DOF_PER_NODE};
use crate::element::{axial_force, end_coordinates};
use crate::errors::{AnalysisError, BarPropertyError, TrussEditError};
use crate::geometry::{Displacement, Force, Point};
use crate::solver::{reactions, solve_displacements};

/// Internal representation of a truss joint.
#[derive(Clone, Debug)]
struct Joint {
    /// Position of the joint.
    position: Point,
    /// Indicator for each translational degree of freedom that is restrained.
    support: [bool; 2],
    /// Displacement imposed on the restrained axes.
    settlement: Displacement,
    /// External load applied to the joint.
    load: Force,
    /// Solved displacement of the joint.
    displacement: Displacement,
    /// Support reaction after analysis.
    reaction: Force,
}

impl Joint {
    /// Create a joint with the supplied position and default state.
    fn new(position: Point) -> Self {
        Self {
            position,
            support: [false, false],
            settlement: Displacement::default(),
            load: Force::default(),
            displacement: Displacement::default(),
            reaction: Force::default(),
        }
    }
}

/// Internal representation of a truss bar.
#[derive(Clone, Debug, Default)]
struct Bar {
    /// Cross-sectional area.
    area: Option<f64>,
    /// Elastic modulus.
    elastic_modulus: Option<f64>,
    /// Optional yield strength.
    yield_strength: Option<f64>,
    /// Axial force after analysis, tension positive.
    axial_force: f64,
    /// Axial stress after analysis.
    stress: f64,
    /// Optional factor of safety against yielding.
    factor_of_safety: Option<f64>,
}

impl Bar {
    /// Return the area and elastic modulus when both are present.
    fn properties(&self) -> Option<(f64, f64)> {
        Some((self.area?, self.elastic_modulus?))
    }
}

/// Container for a planar pin-jointed truss model.
///
/// Units are whatever the caller uses consistently; the course examples work
/// in millimetres and newtons.
#[derive(Debug, Default)]
pub struct Truss {
    /// Underlying graph storage for joints and bars.
    graph: Graph<Joint, Bar>,
    /// Global stiffness matrix of the last analysis, present while results are current.
    stiffness: Option<DMatrix<f64>>,
}

impl Truss {
    /// Create an empty truss.
    ///
    /// # Examples
    /// ```
    /// use trussdsm::Truss;
    ///
    /// let truss = Truss::new();
    /// assert_eq!(truss.joint_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of joints in the truss.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of bars in the truss.
    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a new joint to the truss.
    ///
    /// # Examples
    /// ```
    /// use trussdsm::{point, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let joint = truss.add_joint(point(0.0, 0.0));
    /// assert_eq!(truss.joint_count(), 1);
    /// assert_eq!(joint.index(), 0);
    /// ```
    pub fn add_joint(&mut self, position: Point) -> NodeIndex {
        self.invalidate();
        self.graph.add_node(Joint::new(position))
    }

    /// Update the position of an existing joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn move_joint(&mut self, joint: NodeIndex, position: Point) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.position = position;
        Ok(())
    }

    /// Remove a joint and all connected bars from the truss.
    ///
    /// Like any [`petgraph::Graph`] removal, the last joint takes over the index
    /// of the removed one.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn remove_joint(&mut self, joint: NodeIndex) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?;
        self.graph
            .remove_node(joint)
            .map(|_| ())
            .ok_or(TrussEditError::UnknownJoint(joint))
    }

    /// Connect two joints with a new bar.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when either end is not part of this truss.
    pub fn add_bar(
        &mut self,
        start: NodeIndex,
        end: NodeIndex,
    ) -> Result<EdgeIndex, TrussEditError> {
        for joint in [start, end] {
            if self.graph.node_weight(joint).is_none() {
                return Err(TrussEditError::UnknownJoint(joint));
            }
        }
        self.invalidate();
        Ok(self.graph.add_edge(start, end, Bar::default()))
    }

    /// Remove a bar from the truss.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownBar`] when `bar` is not part of this truss.
    pub fn remove_bar(&mut self, bar: EdgeIndex) -> Result<(), TrussEditError> {
        self.bar_mut(bar)?;
        self.graph
            .remove_edge(bar)
            .map(|_| ())
            .ok_or(TrussEditError::UnknownBar(bar))
    }

    /// Set the restraint state for a joint.
    ///
    /// The entries correspond to the X and Y directions. A value of `true`
    /// fixes that degree of freedom at the joint's settlement, zero by default.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_support(
        &mut self,
        joint: NodeIndex,
        support: [bool; 2],
    ) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.support = support;
        Ok(())
    }

    /// Prescribe the displacement of a joint's restrained axes.
    ///
    /// Components along unrestrained axes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_settlement(
        &mut self,
        joint: NodeIndex,
        settlement: Displacement,
    ) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.settlement = settlement;
        Ok(())
    }

    /// Apply a point load to a joint.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_load(&mut self, joint: NodeIndex, load: Force) -> Result<(), TrussEditError> {
        self.joint_mut(joint)?.load = load;
        Ok(())
    }

    /// Set the axial properties for a bar.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownBar`] when `bar` is not part of this truss and
    /// [`TrussEditError::InvalidBarProperties`] when either `area` or `elastic_modulus`
    /// is not strictly positive.
    ///
    /// # Examples
    /// ```
    /// use trussdsm::{point, Truss, TrussEditError};
    ///
    /// let mut truss = Truss::new();
    /// let a = truss.add_joint(point(0.0, 0.0));
    /// let b = truss.add_joint(point(4_000.0, 0.0));
    /// let bar = truss.add_bar(a, b).expect("joints exist");
    ///
    /// let error = truss
    ///     .set_bar_properties(bar, 0.0, 70.0e3)
    ///     .expect_err("invalid area rejected");
    /// assert!(matches!(error, TrussEditError::InvalidBarProperties(_)));
    /// ```
    pub fn set_bar_properties(
        &mut self,
        bar: EdgeIndex,
        area: f64,
        elastic_modulus: f64,
    ) -> Result<(), TrussEditError> {
        if self.graph.edge_weight(bar).is_none() {
            return Err(TrussEditError::UnknownBar(bar));
        }
        if area <= 0.0 || !area.is_finite() {
            return Err(TrussEditError::InvalidBarProperties(
                BarPropertyError::NonPositiveArea { area },
            ));
        }
        if elastic_modulus <= 0.0 || !elastic_modulus.is_finite() {
            return Err(TrussEditError::InvalidBarProperties(
                BarPropertyError::NonPositiveElasticModulus { elastic_modulus },
            ));
        }
        let edge = self.bar_mut(bar)?;
        edge.area = Some(area);
        edge.elastic_modulus = Some(elastic_modulus);
        Ok(())
    }

    /// Assign a yield strength to a bar.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownBar`] when `bar` is not part of this truss.
    pub fn set_bar_yield_strength(
        &mut self,
        bar: EdgeIndex,
        yield_strength: f64,
    ) -> Result<(), TrussEditError> {
        self.bar_mut(bar)?.yield_strength = Some(yield_strength);
        Ok(())
    }

    /// Retrieve the displacement of a joint after analysis.
    #[must_use]
    pub fn joint_displacement(&self, joint: NodeIndex) -> Option<Displacement> {
        self.graph
            .node_weight(joint)
            .map(|joint| joint.displacement)
    }

    /// Retrieve the support reaction at a joint after analysis.
    #[must_use]
    pub fn joint_reaction(&self, joint: NodeIndex) -> Option<Force> {
        self.graph.node_weight(joint).map(|joint| joint.reaction)
    }

    /// Retrieve the axial force in a bar after analysis.
    #[must_use]
    pub fn bar_axial_force(&self, bar: EdgeIndex) -> Option<f64> {
        self.graph.edge_weight(bar).map(|bar| bar.axial_force)
    }

    /// Retrieve the axial stress in a bar after analysis.
    #[must_use]
    pub fn bar_stress(&self, bar: EdgeIndex) -> Option<f64> {
        self.graph.edge_weight(bar).map(|bar| bar.stress)
    }

    /// Retrieve the factor of safety against yielding for a bar.
    #[must_use]
    pub fn bar_factor_of_safety(&self, bar: EdgeIndex) -> Option<f64> {
        self.graph
            .edge_weight(bar)
            .and_then(|bar| bar.factor_of_safety)
    }

    /// Global stiffness matrix assembled by the last successful [`Truss::evaluate`].
    #[must_use]
    pub fn stiffness_matrix(&self) -> Option<&DMatrix<f64>> {
        self.stiffness.as_ref()
    }

    /// Analyse the truss under the configured loads and supports.
    ///
    /// Joint `i` owns degrees of freedom `2i` and `2i + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when a bar has no properties or zero length, or when
    /// the supports leave the structure free to move as a mechanism.
    pub fn evaluate(&mut self) -> Result<(), AnalysisError> {
        if self.stiffness.is_some() {
            return Ok(());
        }
        let index_map = self.node_index_map();
        let dof_count = self.joint_count() * DOF_PER_NODE;

        let coordinates: Vec<Point> = self
            .graph
            .node_weights()
            .map(|joint| joint.position)
            .collect();
        let mut connectivity = Vec::with_capacity(self.bar_count());
        let mut areas = Vec::with_capacity(self.bar_count());
        let mut elastic_moduli = Vec::with_capacity(self.bar_count());
        for edge in self.graph.edge_references() {
            let (area, elastic_modulus) = edge
                .weight()
                .properties()
                .ok_or(AnalysisError::MissingProperties(edge.id()))?;
            connectivity.push([index_map[&edge.source()], index_map[&edge.target()]]);
            areas.push(area);
            elastic_moduli.push(elastic_modulus);
        }
        let dof_map = sequential_dof_map(&connectivity);

        let stiffness = assemble_global_stiffness(
            &elastic_moduli,
            &areas,
            &coordinates,
            dof_count,
            &connectivity,
            &dof_map,
        )?;
        let loads = self.build_load_vector(&index_map);
        let (restrained, prescribed) = self.collect_restraints(&index_map);
        let displacements = solve_displacements(&stiffness, &loads, &restrained, &prescribed)?;
        let support_forces = reactions(&stiffness, &displacements, &loads)?;

        let mut bar_forces = Vec::with_capacity(dof_map.len());
        for (bar, (&[start, end], dofs)) in connectivity.iter().zip(&dof_map).enumerate() {
            let ends = end_coordinates(coordinates[start], coordinates[end]);
            let local = Vector4::from_fn(|row, _| displacements[dofs[row]]);
            let force = axial_force(elastic_moduli[bar], areas[bar], &ends, &local)
                .map_err(|source| AnalysisError::InvalidBar { bar, source })?;
            bar_forces.push((force, force / areas[bar]));
        }

        self.store_joint_results(&index_map, &displacements, &support_forces);
        self.store_bar_results(&bar_forces);
        self.stiffness = Some(stiffness);
        Ok(())
    }

    /// Look up a joint for editing and drop cached results.
    fn joint_mut(&mut self, joint: NodeIndex) -> Result<&mut Joint, TrussEditError> {
        if self.graph.node_weight(joint).is_none() {
            return Err(TrussEditError::UnknownJoint(joint));
        }
        self.invalidate();
        self.graph
            .node_weight_mut(joint)
            .ok_or(TrussEditError::UnknownJoint(joint))
    }

    /// Look up a bar for editing and drop cached results.
    fn bar_mut(&mut self, bar: EdgeIndex) -> Result<&mut Bar, TrussEditError> {
        if self.graph.edge_weight(bar).is_none() {
            return Err(TrussEditError::UnknownBar(bar));
        }
        self.invalidate();
        self.graph
            .edge_weight_mut(bar)
            .ok_or(TrussEditError::UnknownBar(bar))
    }

    /// Reset cached analysis results when the topology or properties change.
    fn invalidate(&mut self) {
        if self.stiffness.take().is_some() {
            for joint in self.graph.node_weights_mut() {
                joint.displacement = Displacement::default();
                joint.reaction = Force::default();
            }
            for bar in self.graph.edge_weights_mut() {
                bar.axial_force = 0.0;
                bar.stress = 0.0;
                bar.factor_of_safety = None;
            }
        }
    }

    /// Construct a mapping from graph indices to contiguous joint numbers.
    fn node_index_map(&self) -> HashMap<NodeIndex, usize> {
        self.graph
            .node_indices()
            .enumerate()
            .map(|(idx, node)| (node, idx))
            .collect()
    }

    /// Assemble the global nodal load vector.
    fn build_load_vector(&self, index_map: &HashMap<NodeIndex, usize>) -> DVector<f64> {
        let mut load = DVector::zeros(self.joint_count() * DOF_PER_NODE);
        for node in self.graph.node_indices() {
            let joint = &self.graph[node];
            let base = index_map[&node] * DOF_PER_NODE;
            load[base] = joint.load.x;
            load[base + 1] = joint.load.y;
        }
        load
    }

    /// Collect restrained degrees of freedom and their prescribed displacements.
    fn collect_restraints(
        &self,
        index_map: &HashMap<NodeIndex, usize>,
    ) -> (Vec<usize>, Vec<f64>) {
        let mut restrained = Vec::new();
        let mut prescribed = Vec::new();
        for node in self.graph.node_indices() {
            let joint = &self.graph[node];
            let base = index_map[&node] * DOF_PER_NODE;
            let settlement = [joint.settlement.x, joint.settlement.y];
            for axis in 0..DOF_PER_NODE {
                if joint.support[axis] {
                    restrained.push(base + axis);
                    prescribed.push(settlement[axis]);
                }
            }
        }
        (restrained, prescribed)
    }

    /// Persist solved displacements and reactions back onto the joints.
    fn store_joint_results(
        &mut self,
        index_map: &HashMap<NodeIndex, usize>,
        displacements: &DVector<f64>,
        support_forces: &DVector<f64>,
    ) {
        for node in self.graph.node_indices() {
            let base = index_map[&node] * DOF_PER_NODE;
            let joint = &mut self.graph[node];
            joint.displacement = Displacement::new(displacements[base], displacements[base + 1]);
            // Only supports carry a reaction; elsewhere the residual is rounding noise.
            joint.reaction = Force::new(
                if joint.support[0] { support_forces[base] } else { 0.0 },
                if joint.support[1] { support_forces[base + 1] } else { 0.0 },
            );
        }
    }

    /// Persist axial forces, stresses and factors of safety in edge order.
    fn store_bar_results(&mut self, bar_forces: &[(f64, f64)]) {
        for (bar, &(force, stress)) in self.graph.edge_weights_mut().zip(bar_forces) {
            bar.axial_force = force;
            bar.stress = stress;
            bar.factor_of_safety = bar.yield_strength.map(|yield_strength| {
                if stress == 0.0 {
                    f64::INFINITY
                } else {
                    yield_strength.abs() / stress.abs()
                }
            });
        }
    }
}
