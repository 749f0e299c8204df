//! Trigger component

use crate::events::TriggerEvent;
use crate::occupant::Occupant;
use crate::volume::TriggerVolume;

/// State of an occupant inside a trigger
#[derive(Debug, Clone)]
pub struct OverlapState {
    /// When the occupant entered
    pub enter_time: f32,
    /// Total time inside
    pub time_inside: f32,
}

/// Trigger component for detecting overlaps.
///
/// Occupants are kept in the order they entered so event delivery is
/// deterministic.
#[derive(Debug, Clone)]
pub struct TriggerComponent {
    /// Trigger volume shape
    pub volume: TriggerVolume,
    /// Whether the trigger is enabled
    pub enabled: bool,
    /// Whether to emit Stay events
    pub emit_stay_events: bool,
    /// Currently overlapping occupants
    overlapping: Vec<(Occupant, OverlapState)>,
    /// Queue of events to be processed
    event_queue: Vec<TriggerEvent>,
    /// Total enter events produced
    pub activation_count: u32,
}

impl TriggerComponent {
    /// Create a new trigger
    pub fn new(volume: TriggerVolume) -> Self {
        Self {
            volume,
            enabled: true,
            emit_stay_events: false,
            overlapping: Vec::new(),
            event_queue: Vec::new(),
            activation_count: 0,
        }
    }

    /// Enable stay events
    pub fn with_stay_events(mut self) -> Self {
        self.emit_stay_events = true;
        self
    }

    /// Check if an occupant is currently inside this trigger
    pub fn is_inside(&self, occupant: Occupant) -> bool {
        self.overlapping.iter().any(|(o, _)| *o == occupant)
    }

    /// All occupants currently inside, in entry order
    pub fn overlapping(&self) -> impl Iterator<Item = Occupant> + '_ {
        self.overlapping.iter().map(|(o, _)| *o)
    }

    /// Get the time an occupant has been inside
    pub fn time_inside(&self, occupant: Occupant) -> Option<f32> {
        self.overlapping
            .iter()
            .find(|(o, _)| *o == occupant)
            .map(|(_, s)| s.time_inside)
    }

    /// Enable the trigger
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Disable the trigger. Occupants inside are released with exit events.
    pub fn disable(&mut self, trigger_id: u64) {
        self.enabled = false;
        for (occupant, state) in self.overlapping.drain(..) {
            self.event_queue
                .push(TriggerEvent::exit(trigger_id, occupant, state.time_inside));
        }
    }

    /// Forget every occupant without producing events
    pub fn reset(&mut self) {
        self.overlapping.clear();
        self.event_queue.clear();
    }

    /// Record whether `occupant` overlaps this step, queueing enter/exit
    /// events on changes.
    pub fn process_overlap(
        &mut self,
        trigger_id: u64,
        occupant: Occupant,
        is_overlapping: bool,
        current_time: f32,
    ) {
        if !self.enabled {
            return;
        }

        let index = self.overlapping.iter().position(|(o, _)| *o == occupant);

        match (is_overlapping, index) {
            (true, None) => {
                self.overlapping.push((
                    occupant,
                    OverlapState {
                        enter_time: current_time,
                        time_inside: 0.0,
                    },
                ));
                self.event_queue.push(TriggerEvent::enter(trigger_id, occupant));
                self.activation_count += 1;
            }
            (false, Some(index)) => {
                let (_, state) = self.overlapping.remove(index);
                self.event_queue
                    .push(TriggerEvent::exit(trigger_id, occupant, state.time_inside));
            }
            _ => {}
        }
    }

    /// Advance time for occupants that were already inside and queue stay
    /// events for them. Occupants that entered at `current_time` are skipped.
    pub fn update(&mut self, trigger_id: u64, delta_time: f32, current_time: f32) {
        if !self.enabled {
            return;
        }

        for (occupant, state) in self.overlapping.iter_mut() {
            if state.enter_time >= current_time {
                continue;
            }
            state.time_inside += delta_time;

            if self.emit_stay_events {
                self.event_queue
                    .push(TriggerEvent::stay(trigger_id, *occupant, state.time_inside));
            }
        }
    }

    /// Drain events for external processing
    pub fn drain_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.event_queue)
    }
}

impl Default for TriggerComponent {
    fn default() -> Self {
        Self::new(TriggerVolume::default())
    }
}
