//! The forcefield controller
//!
//! Reacts to trigger callbacks for one drone and one player. Every entity
//! event runs the same guard sequence (tracked drone, player gating,
//! kill-switch), then fires at most one effect selected by the field mode,
//! then notifies receivers for enter/exit.

use crate::config::{FieldConfig, FieldMode};
use crate::error::{ForcefieldError, Result, StateQuery};
use crate::host::{DroneBody, EntityLookup, NotificationSink};
use crate::notify::{FieldEvent, ReceiverSet};
use crate::push;
use crate::teleport;
use forcefield_math::{Pose, Transform, Vec3};
use forcefield_triggers::{ActorId, EntityId, TriggerCallbacks, TriggerEventType};

/// Why an event produced no effect before reaching the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// No drone was resolved at initialization
    Inert,
    /// The event concerns some other entity
    OtherEntity,
    /// The player is inside and the field is gated on that
    ActorInside,
    /// The external kill-switch is on
    EntityIgnored,
}

/// What one entity event did to the drone
#[derive(Debug)]
pub enum EffectOutcome {
    /// Velocity was set to this value
    Pushed(Vec3),
    /// Drone was moved to this pose
    Teleported(Pose),
    /// Guards passed but the policy has no effect for this event and mode
    NoEffect,
    /// A guard stopped the event
    Suppressed(Suppression),
    /// The effect was attempted and skipped for this event only
    Skipped(ForcefieldError),
}

impl EffectOutcome {
    /// Whether the drone was modified
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Pushed(_) | Self::Teleported(_))
    }
}

/// Result of handling one entity event
#[derive(Debug)]
pub struct FieldResponse {
    pub outcome: EffectOutcome,
    /// Receivers notified afterwards
    pub notified: usize,
}

impl FieldResponse {
    fn silent(outcome: EffectOutcome) -> Self {
        Self { outcome, notified: 0 }
    }
}

/// Mutable per-controller state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeState {
    /// The gating player currently occupies the volume
    pub actor_inside_volume: bool,
    /// External kill-switch
    pub ignore_entity: bool,
}

/// Push/teleport behaviour attached to one trigger volume
pub struct ForcefieldController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    config: FieldConfig,
    /// World placement of the field
    transform: Transform,
    actor: Option<ActorId>,
    drone: Option<B>,
    sink: S,
    enter_receivers: ReceiverSet<S::Receiver>,
    exit_receivers: ReceiverSet<S::Receiver>,
    state: RuntimeState,
}

impl<B, S> ForcefieldController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    /// Activate a field.
    ///
    /// A host without a local player or drone yields an inert controller,
    /// not an error. Only configuration that cannot be evaluated fails.
    pub fn initialize<L>(
        config: FieldConfig,
        transform: Transform,
        lookup: &L,
        sink: S,
    ) -> Result<Self>
    where
        L: EntityLookup<Body = B>,
    {
        config.check()?;
        log::info!("[{}] Drone forcefield initialized", config.name);

        let actor = lookup.local_actor();
        let drone = match actor {
            Some(_) => lookup.local_drone(),
            None => {
                log::warn!("[{}] {}", config.name, ForcefieldError::UnresolvedActor);
                None
            }
        };
        if actor.is_some() && drone.is_none() {
            log::warn!("[{}] {}", config.name, ForcefieldError::UnresolvedEntity);
        }

        let enter_receivers = ReceiverSet::resolve(
            &config.name,
            FieldEvent::EntityEnteredField,
            &config.notifications.on_enter,
            &sink,
        );
        let exit_receivers = ReceiverSet::resolve(
            &config.name,
            FieldEvent::EntityExitedField,
            &config.notifications.on_exit,
            &sink,
        );

        let state = RuntimeState {
            actor_inside_volume: false,
            ignore_entity: config.gating.ignore_entity,
        };

        Ok(Self {
            config,
            transform,
            actor,
            drone,
            sink,
            enter_receivers,
            exit_receivers,
            state,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn state(&self) -> RuntimeState {
        self.state
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// No drone to act on; every callback is a no-op
    pub fn is_inert(&self) -> bool {
        self.drone.is_none()
    }

    pub fn actor_inside_volume(&self) -> bool {
        self.state.actor_inside_volume
    }

    pub fn ignore_entity(&self) -> bool {
        self.state.ignore_entity
    }

    /// External kill-switch, effective from the next event
    pub fn set_ignore_entity(&mut self, ignore: bool) {
        if self.state.ignore_entity != ignore {
            log::debug!("[{}] ignore_entity set to {}", self.config.name, ignore);
        }
        self.state.ignore_entity = ignore;
    }

    /// Move the field; affects the default push origin and local-space
    /// pushes. Non-finite transforms are ignored.
    pub fn set_transform(&mut self, transform: Transform) {
        if !transform.is_finite() {
            log::warn!("[{}] Ignoring non-finite field transform", self.config.name);
            return;
        }
        self.transform = transform;
    }

    /// Move or clear the explicit push origin. Non-finite origins are
    /// ignored.
    pub fn set_push_origin(&mut self, origin: Option<Vec3>) {
        if origin.is_some_and(|o| !o.is_finite()) {
            log::warn!("[{}] Ignoring non-finite push origin", self.config.name);
            return;
        }
        self.config.push.origin = origin;
    }

    pub fn tracked_entity(&self) -> Option<EntityId> {
        self.drone.as_ref().map(|drone| drone.id())
    }

    pub fn tracked_actor(&self) -> Option<ActorId> {
        self.actor
    }

    pub fn drone(&self) -> Option<&B> {
        self.drone.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Gating player entered the volume
    pub fn actor_enter(&mut self, actor: ActorId) {
        if self.actor == Some(actor) {
            self.state.actor_inside_volume = true;
        }
    }

    /// Gating player left the volume
    pub fn actor_exit(&mut self, actor: ActorId) {
        if self.actor == Some(actor) {
            self.state.actor_inside_volume = false;
        }
    }

    pub fn entity_enter(&mut self, entity: EntityId) -> FieldResponse {
        self.handle_entity_event(TriggerEventType::Enter, entity)
    }

    pub fn entity_exit(&mut self, entity: EntityId) -> FieldResponse {
        self.handle_entity_event(TriggerEventType::Exit, entity)
    }

    pub fn entity_stay(&mut self, entity: EntityId) -> FieldResponse {
        self.handle_entity_event(TriggerEventType::Stay, entity)
    }

    /// Notify the enter receivers without touching the drone. Lets scene
    /// authors check their receivers in a simulator.
    pub fn send_enter_notifications(&mut self) -> usize {
        self.enter_receivers.deliver(&self.config.name, &mut self.sink)
    }

    fn handle_entity_event(&mut self, event: TriggerEventType, entity: EntityId) -> FieldResponse {
        match self.tracked_entity() {
            None => return FieldResponse::silent(EffectOutcome::Suppressed(Suppression::Inert)),
            Some(tracked) if tracked != entity => {
                return FieldResponse::silent(EffectOutcome::Suppressed(Suppression::OtherEntity))
            }
            Some(_) => {}
        }

        if event != TriggerEventType::Stay {
            log::debug!("[{}] Drone {:?} {}", self.config.name, event, entity);
        }

        if let Some(reason) = self.suppression() {
            return FieldResponse::silent(EffectOutcome::Suppressed(reason));
        }

        let flags = self.config.policy.flags(event);
        let result = match self.config.mode {
            FieldMode::Push if flags.push => self.apply_push(),
            FieldMode::Teleport if flags.teleport => self.apply_teleport(),
            _ => Ok(EffectOutcome::NoEffect),
        };
        let outcome = result.unwrap_or_else(|err| self.skipped(err));

        let notified = match event {
            TriggerEventType::Enter => {
                self.enter_receivers.deliver(&self.config.name, &mut self.sink)
            }
            TriggerEventType::Exit => {
                self.exit_receivers.deliver(&self.config.name, &mut self.sink)
            }
            TriggerEventType::Stay => 0,
        };

        FieldResponse { outcome, notified }
    }

    fn suppression(&self) -> Option<Suppression> {
        if self.config.gating.ignore_if_actor_inside && self.state.actor_inside_volume {
            Some(Suppression::ActorInside)
        } else if self.state.ignore_entity {
            Some(Suppression::EntityIgnored)
        } else {
            None
        }
    }

    fn skipped(&self, err: ForcefieldError) -> EffectOutcome {
        match err {
            // Stays quiet: a teleport field without destination fires every event
            ForcefieldError::MisconfiguredTeleport => log::debug!("[{}] {}", self.config.name, err),
            _ => log::warn!("[{}] {}", self.config.name, err),
        }
        EffectOutcome::Skipped(err)
    }

    fn apply_push(&mut self) -> Result<EffectOutcome> {
        // Stay events reach this every step; keep the guards local
        if let Some(reason) = self.suppression() {
            return Ok(EffectOutcome::Suppressed(reason));
        }
        let Some(drone) = self.drone.as_mut() else {
            return Ok(EffectOutcome::Suppressed(Suppression::Inert));
        };

        let position = drone
            .try_position()
            .ok_or(ForcefieldError::UnreadableState(StateQuery::Position))?;
        let direction = push::push_direction(&self.config.push, &self.transform, position);

        let velocity = drone
            .try_velocity()
            .ok_or(ForcefieldError::UnreadableState(StateQuery::Velocity))?;
        let new_velocity = push::pushed_velocity(
            &self.config.push,
            direction,
            velocity,
            self.config.fixed_timestep,
        );

        drone.set_velocity(new_velocity);
        Ok(EffectOutcome::Pushed(new_velocity))
    }

    fn apply_teleport(&mut self) -> Result<EffectOutcome> {
        let Some(drone) = self.drone.as_mut() else {
            return Ok(EffectOutcome::Suppressed(Suppression::Inert));
        };

        let settings = &self.config.teleport;
        let current_rotation = if settings.keep_rotation {
            drone.try_rotation()
        } else {
            None
        };
        let plan = teleport::plan(settings, current_rotation)
            .ok_or(ForcefieldError::MisconfiguredTeleport)?;

        if plan.rotation_fallback {
            log::warn!(
                "[{}] Teleport: {}",
                self.config.name,
                ForcefieldError::UnreadableState(StateQuery::Rotation)
            );
        }
        if plan.reset_velocity {
            drone.set_velocity(Vec3::ZERO);
        }
        drone.teleport_to(plan.pose.position, plan.pose.rotation);

        Ok(EffectOutcome::Teleported(plan.pose))
    }
}

impl<B, S> TriggerCallbacks for ForcefieldController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    fn on_actor_enter(&mut self, actor: ActorId) {
        self.actor_enter(actor);
    }

    fn on_actor_exit(&mut self, actor: ActorId) {
        self.actor_exit(actor);
    }

    fn on_entity_enter(&mut self, entity: EntityId) {
        self.entity_enter(entity);
    }

    fn on_entity_exit(&mut self, entity: EntityId) {
        self.entity_exit(entity);
    }

    fn on_entity_stay(&mut self, entity: EntityId) {
        self.entity_stay(entity);
    }
}

impl<B, S> std::fmt::Debug for ForcefieldController<B, S>
where
    B: DroneBody,
    S: NotificationSink,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForcefieldController")
            .field("name", &self.config.name)
            .field("mode", &self.config.mode)
            .field("actor", &self.actor)
            .field("entity", &self.tracked_entity())
            .field("state", &self.state)
            .field("enter_receivers", &self.enter_receivers.resolved_count())
            .field("exit_receivers", &self.exit_receivers.resolved_count())
            .finish()
    }
}
