//! rapier2d-backed physics world
//!
//! Walls are parentless capsule colliders; every token is a dynamic rigid body
//! with a single ball collider. Handles handed to the game are our own
//! [`BodyHandle`]s, mapped to rapier handles through side tables. After each
//! step the narrow phase is scanned for touching ball pairs.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;
use rapier2d::prelude::*;

use super::physics::{BodyHandle, CircleDesc, CollisionGroup, Contact, Material, PhysicsEngine};

/// Pixels per physics length unit; tunes rapier's tolerances for screen space
const LENGTH_UNIT: Real = 50.0;

#[derive(Debug, Clone, Copy)]
struct Entry {
    body: RigidBodyHandle,
    group: CollisionGroup,
}

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// rapier membership bit for a collision group
fn membership(group: CollisionGroup) -> InteractionGroups {
    let bit = Group::from_bits_truncate(1 << (group.0 % 32));
    InteractionGroups::new(bit, Group::ALL)
}

/// Physics world for the arena
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_params: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    /// Game handle -> rapier body, ordered by handle
    entries: BTreeMap<BodyHandle, Entry>,
    /// Ball collider -> game handle, for contact lookup
    collider_to_body: HashMap<ColliderHandle, BodyHandle>,
    next_handle: u32,
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity (`createArena`)
    pub fn new(gravity: Vec2) -> Self {
        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: to_vector(gravity),
            integration_params: IntegrationParameters {
                length_unit: LENGTH_UNIT,
                ..Default::default()
            },
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            entries: BTreeMap::new(),
            collider_to_body: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Number of dynamic bodies
    pub fn body_count(&self) -> usize {
        self.entries.len()
    }

    pub fn body_velocity(&self, handle: BodyHandle) -> Option<Vec2> {
        let entry = self.entries.get(&handle)?;
        self.rigid_body_set
            .get(entry.body)
            .map(|rb| to_vec2(rb.linvel()))
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(crate::consts::GRAVITY)
    }
}

impl PhysicsEngine for PhysicsWorld {
    fn add_static_segment(&mut self, a: Vec2, b: Vec2, thickness: f32, material: Material) {
        let shape = SharedShape::capsule(point![a.x, a.y], point![b.x, b.y], thickness);
        let collider = ColliderBuilder::new(shape)
            .restitution(material.elasticity)
            .friction(material.friction)
            .restitution_combine_rule(CoefficientCombineRule::Multiply)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .build();
        self.collider_set.insert(collider);
    }

    fn spawn_dynamic_circle(&mut self, desc: CircleDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;

        let rb = RigidBodyBuilder::dynamic()
            .translation(to_vector(desc.position))
            .build();
        let body = self.rigid_body_set.insert(rb);

        let collider = ColliderBuilder::ball(desc.radius)
            .mass(desc.mass)
            .restitution(desc.material.elasticity)
            .friction(desc.material.friction)
            .restitution_combine_rule(CoefficientCombineRule::Multiply)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .collision_groups(membership(desc.group))
            .build();
        let collider =
            self.collider_set
                .insert_with_parent(collider, body, &mut self.rigid_body_set);

        self.entries.insert(
            handle,
            Entry {
                body,
                group: desc.group,
            },
        );
        self.collider_to_body.insert(collider, handle);
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(entry) = self.entries.remove(&handle) else {
            return false;
        };
        self.rigid_body_set.remove(
            entry.body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.collider_to_body.retain(|_, h| *h != handle);
        true
    }

    fn body_position(&self, handle: BodyHandle) -> Option<Vec2> {
        let entry = self.entries.get(&handle)?;
        self.rigid_body_set
            .get(entry.body)
            .map(|rb| to_vec2(rb.translation()))
    }

    fn bodies(&self) -> Vec<(BodyHandle, Vec2)> {
        self.entries
            .iter()
            .filter_map(|(&handle, entry)| {
                self.rigid_body_set
                    .get(entry.body)
                    .map(|rb| (handle, to_vec2(rb.translation())))
            })
            .collect()
    }

    fn step(&mut self, dt: f32, watch: CollisionGroup, on_contact: &mut dyn FnMut(Contact)) {
        self.integration_params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_params,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        // One entry per touching pair, ordered by handle so runs replay
        let mut touching: Vec<(BodyHandle, BodyHandle)> = self
            .narrow_phase
            .contact_pairs()
            .filter(|pair| pair.has_any_active_contact)
            .filter_map(|pair| {
                let a = *self.collider_to_body.get(&pair.collider1)?;
                let b = *self.collider_to_body.get(&pair.collider2)?;
                Some((a.min(b), a.max(b)))
            })
            .collect();
        touching.sort_unstable();
        touching.dedup();

        for (a, b) in touching {
            let (Some(ea), Some(eb)) = (self.entries.get(&a), self.entries.get(&b)) else {
                continue;
            };
            if ea.group != watch || eb.group != watch {
                continue;
            }
            let (Some(position_a), Some(position_b)) = (self.body_position(a), self.body_position(b))
            else {
                continue;
            };
            on_contact(Contact {
                a,
                b,
                position_a,
                position_b,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP: CollisionGroup = CollisionGroup(1);
    const BOUNCY: Material = Material {
        elasticity: 0.8,
        friction: 0.5,
    };
    const WALL: Material = Material {
        elasticity: 0.5,
        friction: 0.5,
    };

    fn circle(position: Vec2, radius: f32, group: CollisionGroup) -> CircleDesc {
        CircleDesc {
            position,
            radius,
            mass: 1.0,
            material: BOUNCY,
            group,
        }
    }

    fn boxed() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 900.0));
        world.add_static_segment(Vec2::new(50.0, 750.0), Vec2::new(550.0, 750.0), 5.0, WALL);
        world.add_static_segment(Vec2::new(50.0, 750.0), Vec2::new(50.0, 50.0), 5.0, WALL);
        world.add_static_segment(Vec2::new(550.0, 750.0), Vec2::new(550.0, 50.0), 5.0, WALL);
        world
    }

    fn run(world: &mut PhysicsWorld, steps: usize) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for _ in 0..steps {
            world.step(1.0 / 60.0, GROUP, &mut |c| contacts.push(c));
        }
        contacts
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 900.0));
        let h = world.spawn_dynamic_circle(circle(Vec2::new(300.0, 100.0), 10.0, GROUP));
        run(&mut world, 10);
        assert!(world.body_position(h).unwrap().y > 100.0);
        assert!(world.body_velocity(h).unwrap().y > 0.0);
    }

    #[test]
    fn test_body_comes_to_rest_on_floor() {
        let mut world = boxed();
        let h = world.spawn_dynamic_circle(circle(Vec2::new(300.0, 600.0), 20.0, GROUP));
        run(&mut world, 600);
        let pos = world.body_position(h).unwrap();
        // Floor line at 750, wall thickness 5, radius 20
        assert!((pos.y - 725.0).abs() < 2.0, "resting y = {}", pos.y);
        assert!(world.body_velocity(h).unwrap().length() < 5.0);
    }

    #[test]
    fn test_walls_contain_bodies() {
        let mut world = boxed();
        let h = world.spawn_dynamic_circle(circle(Vec2::new(90.0, 700.0), 20.0, GROUP));
        run(&mut world, 120);
        let pos = world.body_position(h).unwrap();
        assert!(pos.x >= 50.0 + 5.0 + 20.0 - 1.0, "x = {}", pos.x);
    }

    #[test]
    fn test_touching_pair_reported_once_per_step() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = world.spawn_dynamic_circle(circle(Vec2::new(100.0, 100.0), 10.0, GROUP));
        let b = world.spawn_dynamic_circle(circle(Vec2::new(115.0, 100.0), 10.0, GROUP));
        let contacts = run(&mut world, 1);
        assert_eq!(contacts.len(), 1);
        assert_eq!((contacts[0].a, contacts[0].b), (a, b));
        assert_eq!(Some(contacts[0].position_a), world.body_position(a));
        assert_eq!(Some(contacts[0].position_b), world.body_position(b));
    }

    #[test]
    fn test_other_groups_are_not_reported() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.spawn_dynamic_circle(circle(Vec2::new(100.0, 100.0), 10.0, GROUP));
        world.spawn_dynamic_circle(circle(Vec2::new(115.0, 100.0), 10.0, CollisionGroup(7)));
        assert!(run(&mut world, 1).is_empty());
    }

    #[test]
    fn test_apart_bodies_are_not_reported() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.spawn_dynamic_circle(circle(Vec2::new(100.0, 100.0), 10.0, GROUP));
        world.spawn_dynamic_circle(circle(Vec2::new(200.0, 100.0), 10.0, GROUP));
        assert!(run(&mut world, 5).is_empty());
    }

    #[test]
    fn test_remove_body_is_idempotent() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let h = world.spawn_dynamic_circle(circle(Vec2::ZERO, 5.0, GROUP));
        assert!(world.remove_body(h));
        assert!(!world.remove_body(h));
        assert_eq!(world.body_count(), 0);
        assert!(world.bodies().is_empty());
        assert!(world.body_position(h).is_none());
    }

    #[test]
    fn test_removed_body_stops_reporting() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let a = world.spawn_dynamic_circle(circle(Vec2::new(100.0, 100.0), 10.0, GROUP));
        world.spawn_dynamic_circle(circle(Vec2::new(115.0, 100.0), 10.0, GROUP));
        assert_eq!(run(&mut world, 1).len(), 1);
        world.remove_body(a);
        assert!(run(&mut world, 1).is_empty());
    }

    #[test]
    fn test_loaded_stack_stays_inside_walls() {
        let mut world = boxed();
        for i in 0..40 {
            let x = 80.0 + (i % 10) as f32 * 45.0;
            let y = 100.0 + (i / 10) as f32 * 60.0;
            world.spawn_dynamic_circle(circle(Vec2::new(x, y), 22.0, GROUP));
        }
        run(&mut world, 900);

        // Inner wall faces at 55 / 545, floor face at 745
        let mut worst = 0.0f32;
        for (_, pos) in world.bodies() {
            worst = worst
                .max(55.0 - (pos.x - 22.0))
                .max((pos.x + 22.0) - 545.0)
                .max((pos.y + 22.0) - 745.0);
        }
        assert!(worst < 2.0, "worst wall penetration = {}", worst);
    }
}
