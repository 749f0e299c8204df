//! Offline configuration checks
//!
//! Run over serialized field configurations before a scene ships. `validate`
//! only reports; `sanitize` also repairs what it can, the same way a build
//! step would before publishing.

use crate::config::{FieldConfig, FieldMode};
use forcefield_math::Vec3;
use std::fmt;

/// Squared-length tolerance before a push direction is reported as not
/// normalized
pub const DIRECTION_TOLERANCE: f32 = 0.05;

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// What was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    /// Teleport mode without a destination
    MissingTeleportDestination,
    /// Constant push direction is the zero vector
    ZeroPushDirection,
    /// Constant push direction is not unit length
    UnnormalizedPushDirection,
    /// Strength below zero pulls the drone instead
    NegativePushStrength,
    /// No event can fire an effect in the active mode
    NoEffectInMode,
}

/// One finding for one field
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.severity, self.message)
    }
}

/// Findings for one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    pub field: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            issues: Vec::new(),
        }
    }

    fn push(&mut self, severity: Severity, kind: IssueKind, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity,
            kind,
            message: message.into(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    pub fn contains(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }
}

/// Report problems without changing anything
pub fn validate(config: &FieldConfig) -> ValidationReport {
    let mut report = ValidationReport::new(&config.name);

    if config.mode == FieldMode::Teleport && config.teleport.destination.is_none() {
        report.push(
            Severity::Error,
            IssueKind::MissingTeleportDestination,
            "Teleport destination not set",
        );
    }

    // Directions too short to normalize count as zero
    let direction = config.push.direction;
    if direction.normalize_or_zero().is_zero() {
        report.push(
            Severity::Warning,
            IssueKind::ZeroPushDirection,
            "Push direction is zero",
        );
    } else if !direction.is_normalized_within(DIRECTION_TOLERANCE) {
        report.push(
            Severity::Warning,
            IssueKind::UnnormalizedPushDirection,
            format!("Push direction is not normalized (length {:.3})", direction.length()),
        );
    }

    if config.push.strength < 0.0 {
        report.push(
            Severity::Warning,
            IssueKind::NegativePushStrength,
            format!("Push strength {} is negative; drones are pulled in", config.push.strength),
        );
    }

    if !config.policy.any_allows(config.mode) {
        report.push(
            Severity::Warning,
            IssueKind::NoEffectInMode,
            format!("No event fires a {:?} effect; field only sends notifications", config.mode),
        );
    }

    report
}

/// Validate, log every finding, and repair what can be repaired:
///
/// - teleport without destination falls back to push mode
/// - a zero push direction resets to forward
/// - any other non-unit push direction is normalized
pub fn sanitize(config: &mut FieldConfig) -> ValidationReport {
    let report = validate(config);

    if report.contains(IssueKind::MissingTeleportDestination) {
        config.mode = FieldMode::Push;
    }

    let normalized = config.push.direction.normalize_or_zero();
    config.push.direction = if normalized.is_zero() {
        Vec3::FORWARD
    } else {
        normalized
    };

    for issue in &report.issues {
        match (issue.severity, issue.kind) {
            (Severity::Error, IssueKind::MissingTeleportDestination) => {
                log::error!("[{}] {}. Disabling teleport.", report.field, issue.message)
            }
            (_, IssueKind::ZeroPushDirection) => {
                log::warn!("[{}] {}. Resetting.", report.field, issue.message)
            }
            (_, IssueKind::UnnormalizedPushDirection) => {
                log::warn!("[{}] {}. Normalizing.", report.field, issue.message)
            }
            (Severity::Error, _) => log::error!("[{}] {}", report.field, issue.message),
            (Severity::Warning, _) => log::warn!("[{}] {}", report.field, issue.message),
        }
    }

    report
}

/// Sanitize every field in a scene. Returns the reports that had findings.
pub fn sanitize_all<'a, I>(configs: I) -> Vec<ValidationReport>
where
    I: IntoIterator<Item = &'a mut FieldConfig>,
{
    log::info!("Preprocessing forcefield configurations");
    let reports: Vec<_> = configs
        .into_iter()
        .map(sanitize)
        .filter(|report| !report.is_clean())
        .collect();
    log::info!("Preprocessing completed, {} field(s) with findings", reports.len());
    reports
}
