//! Forcefield Simulator
//!
//! Flies a drone through one forcefield at a fixed step and logs what the
//! field does to it. Useful for tuning a configuration and for checking
//! which receivers a field reaches before it goes into a scene.
//!
//! Scene:
//! - The field is a 4m cube at the origin
//! - The drone starts at x = -6 flying along +X
//! - The player stands off to the side, then walks into the field halfway
//!   through the run
//!
//! Usage: cargo run -p forcefield-sim [config.json] [steps]
//!
//! Without a config the stock push field is used. Set RUST_LOG=debug for
//! every trigger event.

use std::sync::Arc;

use parking_lot::Mutex;

use drone_forcefield::{
    sanitize, DroneBody, EffectOutcome, EntityLookup, FieldConfig, FieldEvent, ForcefieldController,
    NotificationSink, NotificationTarget,
};
use forcefield_math::{Quat, Transform, Vec3};
use forcefield_triggers::{
    ActorId, EntityId, Occupant, TrackedOccupant, TriggerComponent, TriggerEventType, TriggerSystem,
    TriggerVolume,
};

const FIELD_ID: u64 = 1;
const PLAYER: ActorId = ActorId(1);
const DRONE: EntityId = EntityId(1);
const DEFAULT_STEPS: u32 = 300;

/// Behaviours present in the simulated scene
const SCENE_BEHAVIOURS: &[&str] = &["door", "scoreboard"];

// ============================================================================
// Simulated host
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Body {
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
}

/// Handle the field uses to reach the simulated drone
#[derive(Debug, Clone)]
struct SimDrone {
    body: Arc<Mutex<Body>>,
}

impl DroneBody for SimDrone {
    fn id(&self) -> EntityId {
        DRONE
    }

    fn try_position(&self) -> Option<Vec3> {
        Some(self.body.lock().position)
    }

    fn try_rotation(&self) -> Option<Quat> {
        Some(self.body.lock().rotation)
    }

    fn try_velocity(&self) -> Option<Vec3> {
        Some(self.body.lock().velocity)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.body.lock().velocity = velocity;
    }

    fn teleport_to(&mut self, position: Vec3, rotation: Quat) {
        let mut body = self.body.lock();
        body.position = position;
        body.rotation = rotation;
    }
}

struct SimWorld {
    drone: SimDrone,
}

impl EntityLookup for SimWorld {
    type Body = SimDrone;

    fn local_actor(&self) -> Option<ActorId> {
        Some(PLAYER)
    }

    fn local_drone(&self) -> Option<SimDrone> {
        Some(self.drone.clone())
    }
}

/// Logs every notification it delivers
#[derive(Default)]
struct LogSink {
    delivered: usize,
}

impl NotificationSink for LogSink {
    type Receiver = &'static str;

    fn resolve(&self, target: &NotificationTarget) -> Option<&'static str> {
        SCENE_BEHAVIOURS.iter().copied().find(|b| *b == target.name())
    }

    fn notify(&mut self, receiver: &&'static str, event: FieldEvent) {
        self.delivered += 1;
        log::info!("  -> {} received {}", receiver, event);
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);

    let mut config = match args.next() {
        Some(path) => {
            log::info!("Loading field from {}", path);
            FieldConfig::load(&path)?
        }
        None => FieldConfig::default().with_enter_receivers(["door", "scoreboard"]),
    };
    let steps = match args.next() {
        Some(steps) => steps.parse()?,
        None => DEFAULT_STEPS,
    };

    for issue in &sanitize(&mut config).issues {
        println!("  config: {}", issue);
    }

    let dt = config.fixed_timestep;
    let body = Arc::new(Mutex::new(Body {
        position: Vec3::new(-6.0, 0.0, 0.0),
        rotation: Quat::IDENTITY,
        velocity: Vec3::new(3.0, 0.0, 0.0),
    }));
    let world = SimWorld {
        drone: SimDrone {
            body: Arc::clone(&body),
        },
    };

    let placement = Transform::IDENTITY;
    let mut field =
        ForcefieldController::initialize(config, placement, &world, LogSink::default())?;
    log::info!("{:?}", field);

    let mut triggers = TriggerSystem::new();
    triggers.register_trigger(
        FIELD_ID,
        TriggerComponent::new(TriggerVolume::cube(4.0)).with_stay_events(),
    );

    let mut pushes = 0;
    let mut teleports = 0;

    for step in 0..steps {
        let player_position = if step < steps / 2 {
            Vec3::new(0.0, 0.0, -10.0)
        } else {
            Vec3::ZERO
        };

        let drone_position = {
            let mut body = body.lock();
            let velocity = body.velocity;
            body.position += velocity * dt;
            body.position
        };

        let occupants = [
            TrackedOccupant::actor(PLAYER, player_position),
            TrackedOccupant::entity(DRONE, drone_position),
        ];
        triggers.update(dt, &[(FIELD_ID, placement)], &occupants);

        for event in triggers.drain_events() {
            let entity = match event.occupant {
                Occupant::Actor(_) => {
                    event.dispatch(&mut field);
                    log::info!("[{:>4}] player {:?}", step, event.event_type);
                    continue;
                }
                Occupant::Entity(entity) => entity,
            };

            let response = match event.event_type {
                TriggerEventType::Enter => field.entity_enter(entity),
                TriggerEventType::Exit => field.entity_exit(entity),
                TriggerEventType::Stay => field.entity_stay(entity),
            };

            match &response.outcome {
                EffectOutcome::Pushed(velocity) => {
                    pushes += 1;
                    log::debug!("[{:>4}] pushed, velocity {:?}", step, velocity);
                }
                EffectOutcome::Teleported(pose) => {
                    teleports += 1;
                    log::info!("[{:>4}] teleported to {:?}", step, pose.position);
                }
                EffectOutcome::Suppressed(reason) => {
                    log::debug!("[{:>4}] {:?} suppressed: {:?}", step, event.event_type, reason)
                }
                EffectOutcome::Skipped(err) => log::warn!("[{:>4}] skipped: {}", step, err),
                EffectOutcome::NoEffect => {}
            }
            if event.event_type != TriggerEventType::Stay {
                log::info!(
                    "[{:>4}] drone {:?}, {} receiver(s) notified",
                    step,
                    event.event_type,
                    response.notified
                );
            }
        }
    }

    let body = *body.lock();
    println!();
    println!("Field:          {}", field.config().name);
    println!("Steps:          {} ({:.2}s)", steps, steps as f32 * dt);
    println!("Pushes:         {}", pushes);
    println!("Teleports:      {}", teleports);
    println!("Notifications:  {}", field.sink().delivered);
    println!("Drone position: {:?}", body.position);
    println!("Drone velocity: {:?}", body.velocity);

    Ok(())
}
