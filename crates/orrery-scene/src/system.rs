//! The body hierarchy and world transform evaluation.

use std::collections::HashMap;

use glam::{Mat4, Vec3};

use crate::body::{BodyDescriptor, BodyId, OrbitingBody};
use crate::error::ConfigurationError;

/// A validated, acyclic set of orbiting bodies.
///
/// Bodies keep the order of the table they were built from, so a [`BodyId`]
/// is the table index. `evaluation_order` lists every body after its parent.
#[derive(Clone, Debug)]
pub struct SolarSystem {
    bodies: Vec<OrbitingBody>,
    evaluation_order: Vec<BodyId>,
}

impl SolarSystem {
    /// Build the system, resolving parent names and rejecting duplicate
    /// names, unknown parents, parent cycles and malformed rings.
    pub fn new(descriptors: Vec<BodyDescriptor>) -> Result<Self, ConfigurationError> {
        for descriptor in &descriptors {
            if let Some(ring) = descriptor.ring
                && !ring.is_valid()
            {
                return Err(ConfigurationError::InvalidRing {
                    body: descriptor.name.clone(),
                    inner_radius: ring.inner_radius,
                    outer_radius: ring.outer_radius,
                });
            }
        }

        let mut by_name: HashMap<&str, BodyId> = HashMap::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            if by_name.insert(&descriptor.name, BodyId(index)).is_some() {
                return Err(ConfigurationError::DuplicateName {
                    name: descriptor.name.clone(),
                });
            }
        }

        let mut parents = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            let parent = match &descriptor.parent {
                Some(parent) => Some(*by_name.get(parent.as_str()).ok_or_else(|| {
                    ConfigurationError::UnknownParent {
                        body: descriptor.name.clone(),
                        parent: parent.clone(),
                    }
                })?),
                None => None,
            };
            parents.push(parent);
        }

        let evaluation_order = topological_order(&descriptors, &parents)?;

        let bodies = descriptors
            .into_iter()
            .zip(parents)
            .map(|(d, parent)| OrbitingBody {
                name: d.name,
                texture: d.texture,
                orbit_speed: d.orbit_speed,
                orbit_radius: d.orbit_radius,
                scale: d.scale,
                parent,
                ring: d.ring,
            })
            .collect::<Vec<_>>();

        log::debug!(
            "Solar system built: {} bodies, {} roots",
            bodies.len(),
            bodies.iter().filter(|b| b.parent.is_none()).count()
        );

        Ok(Self {
            bodies,
            evaluation_order,
        })
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[OrbitingBody] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&OrbitingBody> {
        self.bodies.get(id.0)
    }

    /// Look a body up by name.
    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name == name).map(BodyId)
    }

    /// Ids ordered so that every parent precedes its children.
    pub fn evaluation_order(&self) -> &[BodyId] {
        &self.evaluation_order
    }

    /// Iterate ids in table order.
    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        (0..self.bodies.len()).map(BodyId)
    }

    /// World transform of one body at `time` seconds.
    ///
    /// `parent_model * R_y(speed * t) * T(radius, 0, 0) * S(scale)`, with the
    /// parent's full model (scale included) as the base frame.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this system.
    pub fn compute_model_matrix(&self, id: BodyId, time: f32) -> Mat4 {
        let body = &self.bodies[id.0];
        let parent_model = match body.parent {
            Some(parent) => self.compute_model_matrix(parent, time),
            None => Mat4::IDENTITY,
        };
        parent_model * body.local_transform(time)
    }

    /// World transforms of every body at `time`, indexed by [`BodyId`].
    ///
    /// Walks `evaluation_order` so each parent model is computed once and
    /// reused by its children.
    pub fn evaluate(&self, time: f32) -> Vec<Mat4> {
        let mut models = vec![Mat4::IDENTITY; self.bodies.len()];
        for &id in &self.evaluation_order {
            let body = &self.bodies[id.0];
            let parent_model = body.parent.map_or(Mat4::IDENTITY, |p| models[p.0]);
            models[id.0] = parent_model * body.local_transform(time);
        }
        models
    }

    /// World-space center of a body at `time`.
    pub fn position(&self, id: BodyId, time: f32) -> Vec3 {
        self.compute_model_matrix(id, time).transform_point3(Vec3::ZERO)
    }
}

/// Order bodies parents-first, detecting cycles with a three-color walk.
fn topological_order(
    descriptors: &[BodyDescriptor],
    parents: &[Option<BodyId>],
) -> Result<Vec<BodyId>, ConfigurationError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; descriptors.len()];
    let mut order = Vec::with_capacity(descriptors.len());

    for start in 0..descriptors.len() {
        if marks[start] == Mark::Done {
            continue;
        }

        // Climb to the first finished ancestor (or a root), then emit the
        // chain top-down.
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(index) = current {
            match marks[index] {
                Mark::Done => break,
                Mark::InProgress => {
                    let first = chain.iter().position(|&c| c == index).unwrap_or(0);
                    let mut path: Vec<String> = chain[first..]
                        .iter()
                        .map(|&c: &usize| descriptors[c].name.clone())
                        .collect();
                    path.push(descriptors[index].name.clone());
                    return Err(ConfigurationError::Cycle {
                        body: descriptors[index].name.clone(),
                        path,
                    });
                }
                Mark::Unvisited => {
                    marks[index] = Mark::InProgress;
                    chain.push(index);
                    current = parents[index].map(BodyId::index);
                }
            }
        }

        for &index in chain.iter().rev() {
            marks[index] = Mark::Done;
            order.push(BodyId(index));
        }
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-4;

    fn assert_near(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    fn earth_moon() -> SolarSystem {
        SolarSystem::new(vec![
            BodyDescriptor::new("Sun", 0.0, 0.0, 1.0),
            BodyDescriptor::new("Earth", 1.0, 3.0, 0.4),
            BodyDescriptor::new("Moon", 2.0, 1.5, 0.3).with_parent("Earth"),
        ])
        .unwrap()
    }

    #[test]
    fn test_static_root_body_position() {
        let system = SolarSystem::new(vec![BodyDescriptor::new("Rock", 0.0, 3.0, 1.0)]).unwrap();
        let id = system.find("Rock").unwrap();
        for t in [0.0, 1.0, 42.0] {
            assert_near(system.position(id, t), Vec3::new(3.0, 0.0, 0.0));
        }
    }

    #[test]
    fn test_child_of_unscaled_parent() {
        let system = SolarSystem::new(vec![
            BodyDescriptor::new("Parent", 0.0, 3.0, 1.0),
            BodyDescriptor::new("Child", 0.0, 1.5, 1.0).with_parent("Parent"),
        ])
        .unwrap();
        let child = system.find("Child").unwrap();
        assert_near(system.position(child, 0.0), Vec3::new(4.5, 0.0, 0.0));
    }

    #[test]
    fn test_orbit_half_turn() {
        let system = SolarSystem::new(vec![BodyDescriptor::new("Jupiter", 0.4, 5.0, 0.7)]).unwrap();
        let id = BodyId(0);
        assert_near(system.position(id, 0.0), Vec3::new(5.0, 0.0, 0.0));
        assert_near(system.position(id, PI / 0.4), Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn test_orbit_stays_on_circle() {
        let system = SolarSystem::new(vec![BodyDescriptor::new("Mars", 0.8, 4.0, 0.3)]).unwrap();
        for step in 0..50 {
            let p = system.position(BodyId(0), step as f32 * 0.37);
            assert!((p.length() - 4.0).abs() < EPS);
            assert!(p.y.abs() < EPS);
        }
    }

    #[test]
    fn test_moon_inherits_parent_scale() {
        let system = earth_moon();
        let moon = system.find("Moon").unwrap();
        // Earth's 0.4 scale shrinks the moon's orbit: 3 + 1.5 * 0.4.
        assert_near(system.position(moon, 0.0), Vec3::new(3.6, 0.0, 0.0));
    }

    #[test]
    fn test_child_distance_to_parent_is_constant() {
        let system = earth_moon();
        let earth = system.find("Earth").unwrap();
        let moon = system.find("Moon").unwrap();
        for step in 0..20 {
            let t = step as f32 * 0.5;
            let d = system.position(moon, t) - system.position(earth, t);
            assert!((d.length() - 0.6).abs() < EPS);
        }
    }

    #[test]
    fn test_evaluate_matches_recursive_computation() {
        let system = earth_moon();
        let t = 2.75;
        let models = system.evaluate(t);
        assert_eq!(models.len(), 3);
        for id in system.ids() {
            assert!(models[id.index()].abs_diff_eq(system.compute_model_matrix(id, t), 1e-5));
        }
    }

    #[test]
    fn test_evaluation_order_parents_first() {
        // Child declared before its parent.
        let system = SolarSystem::new(vec![
            BodyDescriptor::new("Moon", 2.0, 1.5, 0.3).with_parent("Earth"),
            BodyDescriptor::new("Earth", 1.0, 3.0, 0.4).with_parent("Sun"),
            BodyDescriptor::new("Sun", 0.0, 0.0, 1.0),
        ])
        .unwrap();
        let order = system.evaluation_order();
        assert_eq!(order.len(), 3);
        let pos = |name: &str| {
            let id = system.find(name).unwrap();
            order.iter().position(|&o| o == id).unwrap()
        };
        assert!(pos("Sun") < pos("Earth"));
        assert!(pos("Earth") < pos("Moon"));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = SolarSystem::new(vec![
            BodyDescriptor::new("Earth", 1.0, 3.0, 0.4),
            BodyDescriptor::new("Earth", 1.0, 4.0, 0.4),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateName {
                name: "Earth".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let err = SolarSystem::new(vec![
            BodyDescriptor::new("Moon", 2.0, 1.5, 0.3).with_parent("Earth"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownParent {
                body: "Moon".to_string(),
                parent: "Earth".to_string()
            }
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let err = SolarSystem::new(vec![
            BodyDescriptor::new("A", 1.0, 1.0, 1.0).with_parent("B"),
            BodyDescriptor::new("B", 1.0, 1.0, 1.0).with_parent("A"),
        ])
        .unwrap_err();
        match err {
            ConfigurationError::Cycle { path, .. } => {
                assert_eq!(path.first(), path.last());
                assert_eq!(path.len(), 3);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_parent_rejected() {
        let err = SolarSystem::new(vec![
            BodyDescriptor::new("Ouroboros", 1.0, 1.0, 1.0).with_parent("Ouroboros"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::Cycle { ref body, .. } if body == "Ouroboros"));
    }

    #[test]
    fn test_cycle_reached_through_tail() {
        // C hangs off an A <-> B loop; the loop itself is reported.
        let err = SolarSystem::new(vec![
            BodyDescriptor::new("C", 1.0, 1.0, 1.0).with_parent("A"),
            BodyDescriptor::new("A", 1.0, 1.0, 1.0).with_parent("B"),
            BodyDescriptor::new("B", 1.0, 1.0, 1.0).with_parent("A"),
        ])
        .unwrap_err();
        match err {
            ConfigurationError::Cycle { path, .. } => {
                assert!(!path.contains(&"C".to_string()));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_system() {
        let system = SolarSystem::new(Vec::new()).unwrap();
        assert!(system.is_empty());
        assert!(system.evaluate(1.0).is_empty());
    }

    #[test]
    fn test_inverted_ring_rejected() {
        let err = SolarSystem::new(vec![
            BodyDescriptor::new("Saturn", 0.3, 6.0, 0.4).with_ring(2.0, 1.2),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::InvalidRing {
                body: "Saturn".to_string(),
                inner_radius: 2.0,
                outer_radius: 1.2,
            }
        );
    }

    #[test]
    fn test_degenerate_rings_rejected() {
        for (inner, outer) in [(1.5, 1.5), (-0.5, 1.0), (1.0, f32::INFINITY), (f32::NAN, 2.0)] {
            let result = SolarSystem::new(vec![
                BodyDescriptor::new("Saturn", 0.3, 6.0, 0.4).with_ring(inner, outer),
            ]);
            assert!(
                matches!(result, Err(ConfigurationError::InvalidRing { .. })),
                "{inner}..{outer} accepted"
            );
        }
    }

    #[test]
    fn test_valid_ring_kept() {
        let system = SolarSystem::new(vec![
            BodyDescriptor::new("Saturn", 0.3, 6.0, 0.4).with_ring(1.2, 2.0),
        ])
        .unwrap();
        let ring = system.bodies()[0].ring.unwrap();
        assert_eq!((ring.inner_radius, ring.outer_radius), (1.2, 2.0));
    }
}
