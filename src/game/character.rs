//! Cutter Character
//!
//! Third-person character that walks around and, in cut mode, slices
//! whatever its cutting plane overlaps.
//!
//! # Modes
//!
//! | Mode    | Move / Jump | Look                      | Cut     |
//! |---------|-------------|---------------------------|---------|
//! | Normal  | moves       | control yaw and pitch     | ignored |
//! | Cutting | ignored     | rolls the cutting plane   | cuts    |
//!
//! Entering cut mode pulls the camera in over the shoulder, pitches it
//! slightly down behind the character and slows global time down. Leaving
//! restores the walking camera and real time.

use glam::{Quat, Vec3};

use super::config::CutterConfig;
use super::cut_mode::CutMode;
use super::cutting_plane::CuttingPlane;
use super::targeting::{CutReport, CutRequest, cut_targets};
use crate::camera::{CameraRig, CameraTransition};
use crate::input::{InputAction, InputEvent, TriggerEvent};
use crate::physics::PhysicsBackend;
use crate::player::MovementController;
use crate::world::{ComponentId, EntityId, OverlapQuery, SceneComponent, SceneError, Transform, World};

/// Ground height the character walks on.
const GROUND_HEIGHT: f32 = 0.0;

#[derive(Debug, Clone)]
pub struct CutterCharacter {
    entity: EntityId,
    /// Capsule component, the entity root
    capsule: ComponentId,
    pub movement: MovementController,
    pub camera: CameraRig,
    pub cutting_plane: CuttingPlane,
    mode: CutMode,
    config: CutterConfig,
}

impl CutterCharacter {
    /// Spawn the character's entity with its feet at `location`.
    pub fn spawn<Q, P>(
        world: &mut World<Q, P>,
        location: Vec3,
        config: CutterConfig,
    ) -> Result<Self, SceneError> {
        let mut movement = MovementController::with_settings(config.movement);
        movement.set_position(location + Vec3::Y * config.movement.capsule_half_height);

        let mut camera = CameraRig::new();
        camera.look_sensitivity = config.camera.look_sensitivity;
        camera.transition = CameraTransition::new(
            config.camera.transition_duration,
            config.camera.transition_easing.clone(),
        );
        camera.boom = config.camera.normal_boom();

        let entity = world.scene.spawn_entity("cutter_character");
        let capsule = world.scene.add_component(
            entity,
            "capsule",
            SceneComponent::Node(Transform::from_translation(movement.get_position())),
            None,
        )?;
        Ok(Self {
            entity,
            capsule,
            movement,
            camera,
            cutting_plane: CuttingPlane::from_config(&config.cutting),
            mode: CutMode::Normal,
            config,
        })
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn capsule(&self) -> ComponentId {
        self.capsule
    }

    pub fn mode(&self) -> CutMode {
        self.mode
    }

    pub fn is_cutting(&self) -> bool {
        self.mode.is_cutting()
    }

    pub fn config(&self) -> &CutterConfig {
        &self.config
    }

    /// Capsule transform: position plus facing yaw.
    pub fn actor_transform(&self) -> Transform {
        Transform::new(
            self.movement.get_position(),
            Quat::from_rotation_y(-self.movement.get_actor_yaw()),
            Vec3::ONE,
        )
    }

    pub fn camera_position(&self) -> Vec3 {
        self.camera
            .camera_position(self.movement.get_position(), self.movement.get_actor_yaw())
    }

    /// Switch between walking and aiming.
    pub fn toggle_cut<Q, P>(&mut self, world: &mut World<Q, P>) {
        self.mode = self.mode.toggled();
        let camera = &self.config.camera;
        match self.mode {
            CutMode::Cutting => {
                self.camera.set_control_rotation(
                    camera.cutting_pitch_deg.to_radians(),
                    self.movement.get_actor_yaw(),
                );
                self.camera.set_boom(camera.cutting_boom());
                self.cutting_plane.reset_roll();
                self.cutting_plane.set_active(true);
                self.cutting_plane.set_visible(true);
                world.set_global_time_dilation(self.config.cutting.time_dilation);
            }
            CutMode::Normal => {
                self.cutting_plane.set_active(false);
                self.cutting_plane.set_visible(false);
                self.camera.set_boom(camera.normal_boom());
                world.set_global_time_dilation(1.0);
            }
        }
        log::info!(
            "cut mode {:?}, time dilation {}",
            self.mode,
            world.global_time_dilation
        );
    }

    /// React to one input event. Returns the report of a cut, if one ran.
    pub fn handle_input<Q: OverlapQuery, P: PhysicsBackend>(
        &mut self,
        world: &mut World<Q, P>,
        event: InputEvent,
    ) -> Option<CutReport> {
        match (event.action, event.trigger) {
            (InputAction::ToggleCut, TriggerEvent::Triggered) => {
                self.toggle_cut(world);
                None
            }
            (InputAction::Cut, TriggerEvent::Triggered) if self.is_cutting() => {
                Some(self.cut(world))
            }
            (InputAction::Look, TriggerEvent::Triggered) => {
                let look = event.value.axis2d();
                if self.is_cutting() {
                    self.cutting_plane
                        .add_roll_degrees(look.x * self.config.cutting.roll_degrees_per_look_unit);
                } else {
                    self.camera.add_yaw_input(look.x);
                    self.camera.add_pitch_input(look.y);
                }
                None
            }
            _ if self.is_cutting() => None,
            (InputAction::Move, TriggerEvent::Triggered) => {
                let axis = event.value.axis2d();
                self.movement
                    .add_movement_input(self.camera.get_yaw_forward(), axis.y);
                self.movement
                    .add_movement_input(self.camera.get_yaw_right(), axis.x);
                None
            }
            (InputAction::Jump, TriggerEvent::Triggered) => {
                self.movement.jump();
                None
            }
            (InputAction::Jump, TriggerEvent::Completed) => {
                self.movement.stop_jumping();
                None
            }
            _ => None,
        }
    }

    /// Cut everything the plane currently overlaps.
    pub fn cut<Q: OverlapQuery, P: PhysicsBackend>(&mut self, world: &mut World<Q, P>) -> CutReport {
        let actor = self.actor_transform();
        let request = CutRequest {
            volume: self.cutting_plane.query_volume(&actor),
            plane: self.cutting_plane.slice_plane(&actor),
            instigator: self.entity,
            impulse_magnitude: self.config.cutting.impulse_magnitude,
            cap_option: self.config.cutting.cap_option,
        };
        let report = cut_targets(world, &request);
        log::info!(
            "cut: {} conversion(s), {} slice(s), {} skipped",
            report.conversions,
            report.slices,
            report.skipped.len()
        );
        report
    }

    /// Advance by one real frame.
    ///
    /// Movement runs on dilated time. The camera boom transition runs on
    /// real time so entering cut mode feels the same at any dilation.
    pub fn tick<Q, P>(&mut self, world: &mut World<Q, P>, real_dt: f32) {
        let dt = world.dilated_delta(real_dt);
        self.movement.tick(dt, GROUND_HEIGHT);
        self.camera.tick(real_dt);

        let actor = self.actor_transform();
        if let Some(slot) = world.scene.component_mut(self.capsule) {
            slot.component.set_relative_transform(actor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn spawn() -> (World, CutterCharacter) {
        let mut world = World::new();
        let character =
            CutterCharacter::spawn(&mut world, Vec3::ZERO, CutterConfig::default()).unwrap();
        (world, character)
    }

    #[test]
    fn test_spawn_places_capsule_root() {
        let (world, character) = spawn();
        assert_eq!(world.scene.root_of(character.entity()), Some(character.capsule()));
        assert_eq!(character.mode(), CutMode::Normal);
        assert_eq!(character.camera.get_arm_length(), 4.0);
        assert!((character.movement.get_position().y - 0.96).abs() < 1e-6);
    }

    #[test]
    fn test_entering_cut_mode() {
        let (mut world, mut character) = spawn();
        character.movement.set_actor_yaw(0.7);
        character.cutting_plane.add_roll_degrees(30.0);
        character.handle_input(&mut world, InputEvent::triggered(InputAction::ToggleCut));

        assert!(character.is_cutting());
        assert_eq!(character.camera.get_arm_length(), 1.0);
        assert_eq!(character.camera.get_socket_offset(), Vec3::new(0.3, 0.8, 0.0));
        assert!((character.camera.pitch - (-10f32).to_radians()).abs() < 1e-6);
        assert_eq!(character.camera.yaw, 0.7);
        assert_eq!(character.cutting_plane.roll(), 0.0);
        assert!(character.cutting_plane.is_active());
        assert!(character.cutting_plane.is_visible());
        assert_eq!(world.global_time_dilation, 0.1);
    }

    #[test]
    fn test_leaving_cut_mode() {
        let (mut world, mut character) = spawn();
        character.toggle_cut(&mut world);
        character.toggle_cut(&mut world);

        assert_eq!(character.mode(), CutMode::Normal);
        assert_eq!(character.camera.get_arm_length(), 4.0);
        assert_eq!(character.camera.get_socket_offset(), Vec3::ZERO);
        assert!(!character.cutting_plane.is_active());
        assert!(!character.cutting_plane.is_visible());
        assert_eq!(world.global_time_dilation, 1.0);
    }

    #[test]
    fn test_look_rolls_plane_only_while_cutting() {
        let (mut world, mut character) = spawn();
        character.handle_input(&mut world, InputEvent::axis(InputAction::Look, Vec2::new(15.0, 0.0)));
        assert_eq!(character.cutting_plane.roll(), 0.0);
        assert!((character.camera.yaw - 0.15).abs() < 1e-6);

        character.toggle_cut(&mut world);
        let yaw = character.camera.yaw;
        character.handle_input(&mut world, InputEvent::axis(InputAction::Look, Vec2::new(15.0, 4.0)));
        assert!((character.cutting_plane.roll_degrees() - 15.0).abs() < 1e-4);
        assert_eq!(character.camera.yaw, yaw);
    }

    #[test]
    fn test_move_and_jump_are_ignored_while_cutting() {
        let (mut world, mut character) = spawn();
        character.toggle_cut(&mut world);
        character.handle_input(&mut world, InputEvent::axis(InputAction::Move, Vec2::Y));
        character.handle_input(&mut world, InputEvent::triggered(InputAction::Jump));
        assert_eq!(character.movement.get_pending_input(), Vec3::ZERO);
        assert!(!character.movement.is_jump_pressed());
    }

    #[test]
    fn test_move_is_camera_relative() {
        let (mut world, mut character) = spawn();
        character.camera.set_control_rotation(0.0, std::f32::consts::FRAC_PI_2);
        character.handle_input(&mut world, InputEvent::axis(InputAction::Move, Vec2::Y));
        assert!(character.movement.get_pending_input().abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn test_cut_is_ignored_outside_cut_mode() {
        let (mut world, mut character) = spawn();
        assert!(
            character
                .handle_input(&mut world, InputEvent::triggered(InputAction::Cut))
                .is_none()
        );
    }

    #[test]
    fn test_tick_uses_dilated_time() {
        let (mut world, mut character) = spawn();
        character.handle_input(&mut world, InputEvent::triggered(InputAction::Jump));
        character.tick(&mut world, 0.05);
        let normal_rise = character.movement.get_position().y;

        let (mut slow_world, mut slow) = spawn();
        slow_world.set_global_time_dilation(0.1);
        slow.handle_input(&mut slow_world, InputEvent::triggered(InputAction::Jump));
        slow.tick(&mut slow_world, 0.05);
        assert!(slow.movement.get_position().y < normal_rise);

        let capsule = slow_world.scene.world_transform(slow.capsule()).unwrap();
        assert_eq!(capsule.translation, slow.movement.get_position());
    }
}
