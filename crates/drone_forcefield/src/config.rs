//! Forcefield configuration

use crate::error::{ForcefieldError, Result};
use forcefield_math::{Pose, Vec3};
use forcefield_triggers::TriggerEventType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// What the field does to the drone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    /// Change the drone's velocity
    #[default]
    Push,
    /// Move the drone to a fixed destination
    Teleport,
}

/// Push parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushSettings {
    /// Strength of the push
    pub strength: f32,
    /// Push away from a point instead of along a constant direction
    pub from_point: bool,
    /// Point to push away from. `None` uses the field's own position.
    pub origin: Option<Vec3>,
    /// Constant push direction, used when `from_point` is false
    pub direction: Vec3,
    /// Interpret `direction` in the field's local space
    pub local_space: bool,
    /// Replace the drone's velocity instead of adding to it
    pub override_velocity: bool,
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            strength: 10.0,
            from_point: true,
            origin: None,
            direction: Vec3::FORWARD,
            local_space: false,
            override_velocity: false,
        }
    }
}

/// Teleport parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportSettings {
    /// Where the drone is sent. Teleports are no-ops while unset.
    pub destination: Option<Pose>,
    /// Keep the drone's current rotation instead of the destination's
    pub keep_rotation: bool,
    /// Zero the drone's velocity before teleporting
    pub reset_velocity: bool,
}

impl Default for TeleportSettings {
    fn default() -> Self {
        Self {
            destination: None,
            keep_rotation: true,
            reset_velocity: true,
        }
    }
}

/// Which effects one trigger event may fire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectFlags {
    pub push: bool,
    pub teleport: bool,
}

impl EffectFlags {
    pub const NONE: Self = Self { push: false, teleport: false };
    pub const PUSH: Self = Self { push: true, teleport: false };
    pub const TELEPORT: Self = Self { push: false, teleport: true };

    /// Whether the flag for `mode` is set
    pub fn allows(&self, mode: FieldMode) -> bool {
        match mode {
            FieldMode::Push => self.push,
            FieldMode::Teleport => self.teleport,
        }
    }
}

/// Effect flags per trigger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventPolicy {
    pub enter: EffectFlags,
    pub exit: EffectFlags,
    pub stay: EffectFlags,
}

impl EventPolicy {
    /// Flags for one event kind
    pub fn flags(&self, event: TriggerEventType) -> EffectFlags {
        match event {
            TriggerEventType::Enter => self.enter,
            TriggerEventType::Exit => self.exit,
            TriggerEventType::Stay => self.stay,
        }
    }

    /// Whether any event may fire an effect in `mode`
    pub fn any_allows(&self, mode: FieldMode) -> bool {
        [self.enter, self.exit, self.stay].iter().any(|f| f.allows(mode))
    }
}

impl Default for EventPolicy {
    fn default() -> Self {
        Self {
            enter: EffectFlags::TELEPORT,
            exit: EffectFlags::NONE,
            stay: EffectFlags::PUSH,
        }
    }
}

/// Conditions under which the field leaves the drone alone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatingSettings {
    /// Suppress the field while the drone's player stands inside it
    pub ignore_if_actor_inside: bool,
    /// Initial state of the external kill-switch
    pub ignore_entity: bool,
}

/// Name of a receiver the host resolves at initialization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationTarget(pub String);

impl NotificationTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receivers notified on enter and exit, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub on_enter: Vec<NotificationTarget>,
    pub on_exit: Vec<NotificationTarget>,
}

/// Complete configuration of one forcefield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Name used in diagnostics
    pub name: String,
    /// Push or teleport
    pub mode: FieldMode,
    /// Push parameters
    pub push: PushSettings,
    /// Teleport parameters
    pub teleport: TeleportSettings,
    /// Which events fire effects
    pub policy: EventPolicy,
    /// Suppression rules
    pub gating: GatingSettings,
    /// Enter/exit receivers
    pub notifications: NotificationSettings,
    /// Simulation step in seconds, scales additive pushes
    pub fixed_timestep: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            name: "forcefield".to_string(),
            mode: FieldMode::Push,
            push: PushSettings::default(),
            teleport: TeleportSettings::default(),
            policy: EventPolicy::default(),
            gating: GatingSettings::default(),
            notifications: NotificationSettings::default(),
            fixed_timestep: 0.02,
        }
    }
}

impl FieldConfig {
    /// A push field of the given strength with default behaviour
    pub fn push(strength: f32) -> Self {
        Self {
            push: PushSettings {
                strength,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// A teleport field sending the drone to `destination`
    pub fn teleport(destination: Pose) -> Self {
        Self {
            mode: FieldMode::Teleport,
            teleport: TeleportSettings {
                destination: Some(destination),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Set the diagnostic name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the mode
    pub fn with_mode(mut self, mode: FieldMode) -> Self {
        self.mode = mode;
        self
    }

    /// Push along a constant direction instead of away from a point
    pub fn with_direction(mut self, direction: Vec3, local_space: bool) -> Self {
        self.push.from_point = false;
        self.push.direction = direction;
        self.push.local_space = local_space;
        self
    }

    /// Push away from an explicit point
    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.push.from_point = true;
        self.push.origin = Some(origin);
        self
    }

    /// Replace velocity instead of adding to it
    pub fn with_override_velocity(mut self, override_velocity: bool) -> Self {
        self.push.override_velocity = override_velocity;
        self
    }

    /// Set the event policy
    pub fn with_policy(mut self, policy: EventPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set gating rules
    pub fn with_gating(mut self, gating: GatingSettings) -> Self {
        self.gating = gating;
        self
    }

    /// Set enter receivers
    pub fn with_enter_receivers<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notifications.on_enter = targets.into_iter().map(NotificationTarget::new).collect();
        self
    }

    /// Set exit receivers
    pub fn with_exit_receivers<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notifications.on_exit = targets.into_iter().map(NotificationTarget::new).collect();
        self
    }

    /// Set the simulation step
    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.fixed_timestep = timestep;
        self
    }

    /// Reject values the controller cannot compute with
    pub fn check(&self) -> Result<()> {
        if !self.push.strength.is_finite() {
            return Err(ForcefieldError::InvalidConfig(format!(
                "push strength must be finite, got {}",
                self.push.strength
            )));
        }
        if !self.fixed_timestep.is_finite() || self.fixed_timestep <= 0.0 {
            return Err(ForcefieldError::InvalidConfig(format!(
                "fixed timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        if !self.push.direction.is_finite() {
            return Err(ForcefieldError::InvalidConfig("push direction must be finite".into()));
        }
        if self.push.origin.is_some_and(|o| !o.is_finite()) {
            return Err(ForcefieldError::InvalidConfig("push origin must be finite".into()));
        }
        if self
            .teleport
            .destination
            .is_some_and(|d| !d.position.is_finite() || !d.rotation.is_finite())
        {
            return Err(ForcefieldError::InvalidConfig(
                "teleport destination must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_field() {
        let config = FieldConfig::default();

        assert_eq!(config.mode, FieldMode::Push);
        assert_eq!(config.push.strength, 10.0);
        assert!(config.push.from_point);
        assert_eq!(config.push.direction, Vec3::FORWARD);
        assert!(!config.push.override_velocity);
        assert!(config.teleport.keep_rotation);
        assert!(config.teleport.reset_velocity);
        assert_eq!(config.policy.flags(TriggerEventType::Stay), EffectFlags::PUSH);
        assert_eq!(config.policy.flags(TriggerEventType::Enter), EffectFlags::TELEPORT);
        assert_eq!(config.policy.flags(TriggerEventType::Exit), EffectFlags::NONE);
        assert!(!config.gating.ignore_if_actor_inside);
        assert!(!config.gating.ignore_entity);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = FieldConfig::from_json_str(
            r#"{
                "name": "updraft",
                "push": { "from_point": false, "direction": { "x": 0.0, "y": 1.0, "z": 0.0 } },
                "policy": { "enter": { "push": true } },
                "notifications": { "on_enter": ["door", "scoreboard"] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.name, "updraft");
        assert_eq!(config.push.strength, 10.0);
        assert_eq!(config.push.direction, Vec3::Y);
        assert!(!config.push.from_point);
        assert_eq!(config.policy.enter, EffectFlags::PUSH);
        assert_eq!(config.policy.stay, EffectFlags::PUSH);
        assert_eq!(config.notifications.on_enter[1].name(), "scoreboard");
        assert_eq!(config.fixed_timestep, 0.02);
    }

    #[test]
    fn test_json_round_trip() {
        let config = FieldConfig::teleport(Pose::at(Vec3::new(10.0, 0.0, 0.0)))
            .with_name("pit")
            .with_exit_receivers(["alarm"]);

        let json = config.to_json_pretty().unwrap();
        assert_eq!(FieldConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = FieldConfig::from_json_str("{ \"mode\": \"hover\" }").unwrap_err();
        assert!(matches!(err, ForcefieldError::ConfigParse(_)));
    }

    #[test]
    fn test_check_rejects_unusable_values() {
        assert!(FieldConfig::default().check().is_ok());
        assert!(FieldConfig::push(f32::NAN).check().is_err());
        assert!(FieldConfig::default().with_timestep(0.0).check().is_err());
        assert!(FieldConfig::default()
            .with_origin(Vec3::new(f32::INFINITY, 0.0, 0.0))
            .check()
            .is_err());
    }

    #[test]
    fn test_effect_flags_allow_by_mode() {
        assert!(EffectFlags::PUSH.allows(FieldMode::Push));
        assert!(!EffectFlags::PUSH.allows(FieldMode::Teleport));
        assert!(EventPolicy::default().any_allows(FieldMode::Teleport));
        assert!(!EventPolicy {
            enter: EffectFlags::PUSH,
            exit: EffectFlags::NONE,
            stay: EffectFlags::NONE,
        }
        .any_allows(FieldMode::Teleport));
    }
}
