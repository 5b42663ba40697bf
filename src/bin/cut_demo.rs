//! Cut Demo - Scripted Cutting Session
//!
//! Run with: `cargo run --bin cut_demo [config.json]`
//! Set `RUST_LOG=debug` to see every conversion and slice.
//!
//! Spawns the cutter character in front of a row of crates and a static
//! pillar, then plays a fixed sequence of key presses through the input
//! mapper:
//! - W: walk up to the crates
//! - F: enter cut mode
//! - Mouse: roll the cutting plane
//! - Left mouse: cut
//! - F: leave cut mode
//!
//! Prints the pieces left in the scene and the impulses the physics backend
//! received.

use std::error::Error;
use std::sync::Arc;

use cutter_engine::game::{CutterCharacter, CutterConfig};
use cutter_engine::input::{InputMapper, KeyCode};
use cutter_engine::mesh::{MaterialRef, RigidMeshInstance, box_mesh};
use cutter_engine::physics::{Mobility, PhysicsEvent};
use cutter_engine::world::{SceneComponent, Transform, World};
use glam::{Vec2, Vec3};

const FRAME_DT: f32 = 1.0 / 60.0;

/// One scripted frame: keys to change, mouse motion to add.
struct Step {
    keys: &'static [(KeyCode, bool)],
    mouse: Vec2,
    frames: usize,
}

const SCRIPT: &[Step] = &[
    // Walk forward for half a second
    Step {
        keys: &[(KeyCode::W, true)],
        mouse: Vec2::ZERO,
        frames: 30,
    },
    Step {
        keys: &[(KeyCode::W, false)],
        mouse: Vec2::ZERO,
        frames: 30,
    },
    // Aim: enter cut mode and cut flat
    Step {
        keys: &[(KeyCode::F, true)],
        mouse: Vec2::ZERO,
        frames: 1,
    },
    Step {
        keys: &[(KeyCode::F, false), (KeyCode::MouseLeft, true)],
        mouse: Vec2::ZERO,
        frames: 1,
    },
    // Roll the plane 60 degrees and cut again
    Step {
        keys: &[(KeyCode::MouseLeft, false)],
        mouse: Vec2::new(60.0, 0.0),
        frames: 1,
    },
    Step {
        keys: &[(KeyCode::MouseLeft, true)],
        mouse: Vec2::ZERO,
        frames: 1,
    },
    // Back to walking
    Step {
        keys: &[(KeyCode::MouseLeft, false), (KeyCode::F, true)],
        mouse: Vec2::ZERO,
        frames: 1,
    },
    Step {
        keys: &[(KeyCode::F, false)],
        mouse: Vec2::ZERO,
        frames: 30,
    },
];

fn populate(world: &mut World) -> Result<(), Box<dyn Error>> {
    let crate_mesh = Arc::new(box_mesh("crate", Vec3::splat(0.5)));
    for (i, x) in [-1.2f32, 0.0, 1.2].into_iter().enumerate() {
        let entity = world.scene.spawn_entity(&format!("crate_{i}"));
        let rigid = RigidMeshInstance::new(Arc::clone(&crate_mesh))
            .with_transform(Transform::from_translation(Vec3::new(x, 1.5, -4.5)))
            .with_materials(vec![Some(MaterialRef::new("wood"))]);
        world
            .scene
            .add_component(entity, "mesh", SceneComponent::Rigid(rigid), None)?;
    }

    let pillar = world.scene.spawn_entity("pillar");
    let rigid = RigidMeshInstance::new(Arc::new(box_mesh("pillar", Vec3::new(0.4, 2.0, 0.4))))
        .with_transform(Transform::from_translation(Vec3::new(2.6, 2.0, -4.5)))
        .with_mobility(Mobility::Static);
    world
        .scene
        .add_component(pillar, "mesh", SceneComponent::Rigid(rigid), None)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => CutterConfig::load(path)?,
        None => CutterConfig::default(),
    };

    let mut world = World::new();
    populate(&mut world)?;
    let mut character = CutterCharacter::spawn(&mut world, Vec3::ZERO, config)?;
    let mut mapper = InputMapper::new();

    let mut total_slices = 0;
    let mut total_conversions = 0;
    let mut impulses = 0;
    for step in SCRIPT {
        for &(key, pressed) in step.keys {
            mapper.handle_key(key, pressed);
        }
        mapper.handle_mouse_motion(step.mouse);
        for _ in 0..step.frames {
            for event in mapper.drain_events() {
                if let Some(report) = character.handle_input(&mut world, event) {
                    total_slices += report.slices;
                    total_conversions += report.conversions;
                }
            }
            character.tick(&mut world, FRAME_DT);
            impulses += world
                .physics
                .drain_events()
                .iter()
                .filter(|e| matches!(e, PhysicsEvent::Impulse { .. }))
                .count();
        }
    }

    let position = character.movement.get_position();
    println!(
        "character at ({:.2}, {:.2}, {:.2}), mode {:?}",
        position.x,
        position.y,
        position.z,
        character.mode()
    );
    println!("{total_conversions} conversion(s), {total_slices} slice(s)");

    for (id, slot) in world.scene.components() {
        let SceneComponent::Dynamic(mesh) = &slot.component else {
            continue;
        };
        let bounds = world.scene.world_bounds(id);
        println!(
            "  {id} {:<24} {:>3} tri(s) {:>2} section(s) bounds {:?}",
            slot.name,
            mesh.triangle_count(),
            mesh.num_sections(),
            bounds.map(|b| (b.min, b.max))
        );
    }

    println!("{impulses} impulse(s) sent to the physics backend");
    Ok(())
}
