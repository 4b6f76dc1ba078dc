use glam::Vec2;
use rapier2d::parry::query::ShapeCastOptions;
use rapier2d::parry::shape::Cuboid;
use rapier2d::prelude::*;

use super::collision::CollisionLayer;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// The probe box is this much narrower than the collider on each side, so
/// walls touching the flanks don't count as ground
const PROBE_EDGE_INSET: Real = 0.05;
/// The probe box starts this far inside the collider so resting contacts still hit
const PROBE_SKIN: Real = 0.02;

/// Downward ground probe under a box collider
#[derive(Debug, Clone, Copy)]
pub struct GroundProbe {
    /// Body doing the probing (excluded from hits)
    pub body: RigidBodyHandle,
    pub half_width: Real,
    /// Distance from the body origin down to the feet
    pub half_height: Real,
    /// How far below the feet to look
    pub distance: Real,
    /// Collision layer bits that count as ground
    pub mask: u32,
}

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,

    /// Query pipeline for raycasts, refreshed on every step
    query_pipeline: QueryPipeline,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
}

impl PhysicsWorld {
    /// Create a world with Earth gravity in world units
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81])
    }

    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
        }
    }

    /// Step the simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.get_rigid_body(handle)
            .map(|body| Vec2::new(body.translation().x, body.translation().y))
    }

    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.get_rigid_body(handle)
            .map(|body| Vec2::new(body.linvel().x, body.linvel().y))
    }

    /// Overwrite a body's linear velocity. Returns false if the body is gone.
    pub fn set_body_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec2) -> bool {
        match self.get_rigid_body_mut(handle) {
            Some(body) => {
                body.set_linvel(vector![velocity.x, velocity.y], true);
                true
            }
            None => false,
        }
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_toi: Real,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, Real)> {
        let ray = Ray::new(point![origin.x, origin.y], vector![direction.x, direction.y]);
        self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_toi,
            true,
            filter,
        )
    }

    /// Look for ground under a body. Returns the distance below the feet of the
    /// nearest hit.
    ///
    /// Sweeps a thin box the width of the feet straight down, so any ground
    /// under the footprint counts, however narrow.
    pub fn probe_ground(&self, probe: &GroundProbe) -> Option<Real> {
        let center = self.body_position(probe.body)?;
        let filter = QueryFilter::default()
            .exclude_rigid_body(probe.body)
            .exclude_sensors()
            .groups(CollisionLayer::query_mask(probe.mask));

        let half_width = (probe.half_width - PROBE_EDGE_INSET).max(PROBE_SKIN);
        let feet = Cuboid::new(vector![half_width, PROBE_SKIN / 2.0]);
        // Bottom face sits PROBE_SKIN above the feet
        let start_y = center.y - probe.half_height + PROBE_SKIN * 1.5;
        let options = ShapeCastOptions {
            max_time_of_impact: probe.distance + PROBE_SKIN,
            stop_at_penetration: true,
            ..ShapeCastOptions::default()
        };

        self.query_pipeline
            .cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &Isometry::translation(center.x, start_y),
                &vector![0.0, -1.0],
                &feet,
                options,
                filter,
            )
            .map(|(_, hit)| (hit.time_of_impact - PROBE_SKIN).max(0.0))
    }

    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;

    /// Ground slab with its top surface at y = 0
    fn world_with_ground() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        let ground = world.add_rigid_body(presets::ground_body(0.0, -0.5));
        world.add_collider(presets::ground_collider(40.0, 1.0), ground);
        world
    }

    fn add_character(world: &mut PhysicsWorld, x: f32, y: f32) -> RigidBodyHandle {
        let body = world.add_rigid_body(presets::character_body(x, y, 1.0));
        world.add_collider(presets::character_collider(1.0, 2.0), body);
        body
    }

    fn probe(body: RigidBodyHandle, mask: u32) -> GroundProbe {
        GroundProbe {
            body,
            half_width: 0.5,
            half_height: 1.0,
            distance: 0.1,
            mask,
        }
    }

    #[test]
    fn test_probe_finds_ground_under_standing_body() {
        let mut world = world_with_ground();
        let body = add_character(&mut world, 0.0, 1.0);
        world.step();

        let hit = world.probe_ground(&probe(body, CollisionLayer::Ground.bits()));
        assert!(hit.is_some());
        assert!(hit.unwrap_or(1.0) <= 0.1);
    }

    #[test]
    fn test_probe_misses_when_airborne() {
        let mut world = world_with_ground();
        let body = add_character(&mut world, 0.0, 5.0);
        world.step();

        assert!(world
            .probe_ground(&probe(body, CollisionLayer::Ground.bits()))
            .is_none());
    }

    #[test]
    fn test_probe_respects_mask() {
        let mut world = world_with_ground();
        let body = add_character(&mut world, 0.0, 1.0);
        world.step();

        assert!(world
            .probe_ground(&probe(body, CollisionLayer::Default.bits()))
            .is_none());
    }

    #[test]
    fn test_probe_over_ledge_edge() {
        let mut world = world_with_ground();
        // Center is past the slab edge at x = 20, the left edge still overlaps it
        let body = add_character(&mut world, 20.3, 1.0);
        world.step();

        assert!(world
            .probe_ground(&probe(body, CollisionLayer::Ground.bits()))
            .is_some());
    }

    #[test]
    fn test_probe_finds_ground_narrower_than_feet() {
        let mut world = PhysicsWorld::new();
        // 0.1 wide post under the right half of the feet, top at y = 0
        let post = world.add_rigid_body(presets::ground_body(0.25, -0.5));
        world.add_collider(presets::ground_collider(0.1, 1.0), post);
        let body = add_character(&mut world, 0.0, 1.0);
        world.step();

        assert!(world
            .probe_ground(&probe(body, CollisionLayer::Ground.bits()))
            .is_some());
    }

    #[test]
    fn test_raycast_hits_ground_top() {
        let mut world = world_with_ground();
        world.step();
        let filter = QueryFilter::default().groups(CollisionLayer::query_mask(
            CollisionLayer::Ground.bits(),
        ));

        let hit = world.raycast(Vec2::new(3.0, 2.0), Vec2::NEG_Y, 5.0, filter);
        let (_, toi) = hit.unwrap();
        assert!((toi - 2.0).abs() < 1e-4);
        assert!(world
            .raycast(Vec2::new(3.0, 2.0), Vec2::Y, 5.0, filter)
            .is_none());
    }

    #[test]
    fn test_gravity_pulls_bodies_down() {
        let mut world = PhysicsWorld::new();
        let body = add_character(&mut world, 0.0, 10.0);
        for _ in 0..10 {
            world.step();
        }
        let position = world.body_position(body).unwrap();
        assert!(position.y < 10.0);
        assert!(world.body_velocity(body).unwrap().y < 0.0);
    }

    #[test]
    fn test_set_body_velocity() {
        let mut world = PhysicsWorld::new();
        let body = add_character(&mut world, 0.0, 0.0);
        assert!(world.set_body_velocity(body, Vec2::new(3.0, 1.0)));
        assert_eq!(world.body_velocity(body), Some(Vec2::new(3.0, 1.0)));

        world.remove_rigid_body(body);
        assert!(!world.set_body_velocity(body, Vec2::ZERO));
        assert!(world.body_position(body).is_none());
    }

    #[test]
    fn test_timestep() {
        let mut world = PhysicsWorld::new();
        assert!((world.timestep() - 1.0 / 60.0).abs() < 1e-6);
        world.set_timestep(1.0 / 30.0);
        assert!((world.timestep() - 1.0 / 30.0).abs() < 1e-6);
    }
}
