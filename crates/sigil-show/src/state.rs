//! Installation State
//!
//! Idle / percepts / sigil state machine held in an explicit context object.
//! Callers advance it with [`Installation::update`] once per frame and react
//! to the returned [`StateEvent`]s.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::ShowError;
use crate::feed::{FeedEvent, Phase};
use crate::library::Sigil;

/// Most recent percepts kept by [`PerceptBuffer`]
pub const MAX_PERCEPTS: usize = 20;

/// Top-level display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Percepts,
    Sigil,
}

/// Sigil visibility cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigilCycle {
    #[default]
    None,
    In,
    Hold,
    Out,
}

/// Something a percept source observed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Percept {
    pub session_id: Option<String>,
    pub kind: Option<String>,
    pub timestamp: Option<String>,
    pub sigil_phrase: Option<String>,
    pub draw_calls: Option<String>,
    pub png_base64: Option<String>,
}

/// Notification produced by state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum StateEvent {
    ModeChanged(Mode),
    SigilStarted,
    Percept(Percept),
    Spool,
}

/// Transition timings in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateDurations {
    pub idle: f32,
    pub percepts: f32,
    pub sigil: f32,
    pub sigil_in: f32,
    pub sigil_out: f32,
    /// Time a fully visible sigil is held before it fades out on its own
    pub sigil_hold: f32,
}

impl Default for StateDurations {
    fn default() -> Self {
        Self {
            idle: 2.0,
            percepts: 2.0,
            sigil: 3.0,
            sigil_in: 0.6,
            sigil_out: 2.0,
            sigil_hold: 20.0,
        }
    }
}

/// Ring buffer of the most recent percepts
#[derive(Debug, Clone, Default)]
pub struct PerceptBuffer {
    items: VecDeque<Percept>,
}

impl PerceptBuffer {
    pub fn push(&mut self, percept: Percept) {
        if self.items.len() == MAX_PERCEPTS {
            self.items.pop_front();
        }
        self.items.push_back(percept);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest first
    pub fn get(&self, index: usize) -> Option<&Percept> {
        self.items.get(index)
    }

    /// Newest first
    pub fn newest_first(&self) -> impl Iterator<Item = &Percept> {
        self.items.iter().rev()
    }
}

/// Installation state context
#[derive(Debug, Clone)]
pub struct Installation {
    durations: StateDurations,
    mode: Mode,
    cycle: SigilCycle,
    idle_t: f32,
    percept_t: f32,
    sigil_t: f32,
    sigil_in_t: f32,
    sigil_out_t: f32,
    hold_timer: f32,
    load_after_fade_out: bool,
    current: Option<Sigil>,
    next: Option<Sigil>,
    percepts: PerceptBuffer,
}

impl Default for Installation {
    fn default() -> Self {
        Self::new(StateDurations::default())
    }
}

impl Installation {
    /// Start idle, fully faded into the idle mode
    pub fn new(durations: StateDurations) -> Self {
        Self {
            durations,
            mode: Mode::Idle,
            cycle: SigilCycle::None,
            idle_t: 1.0,
            percept_t: 0.0,
            sigil_t: 0.0,
            sigil_in_t: 0.0,
            sigil_out_t: 0.0,
            hold_timer: 0.0,
            load_after_fade_out: false,
            current: None,
            next: None,
            percepts: PerceptBuffer::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn cycle(&self) -> SigilCycle {
        self.cycle
    }

    /// Fade weights `(idle, percepts, sigil)`, each in `[0, 1]`
    pub fn weights(&self) -> (f32, f32, f32) {
        (self.idle_t, self.percept_t, self.sigil_t)
    }

    /// Fade-in / fade-out progress of the current sigil
    pub fn sigil_progress(&self) -> (f32, f32) {
        (self.sigil_in_t, self.sigil_out_t)
    }

    pub fn current_sigil(&self) -> Option<&Sigil> {
        self.current.as_ref()
    }

    pub fn next_sigil(&self) -> Option<&Sigil> {
        self.next.as_ref()
    }

    pub fn percepts(&self) -> &PerceptBuffer {
        &self.percepts
    }

    pub fn set_idle(&mut self) -> Option<StateEvent> {
        self.set_mode(Mode::Idle)
    }

    pub fn set_percepts(&mut self) -> Option<StateEvent> {
        self.set_mode(Mode::Percepts)
    }

    /// Switch to sigil mode without starting a sigil cycle
    pub fn set_sigil(&mut self) -> Option<StateEvent> {
        self.cycle = SigilCycle::None;
        self.set_mode(Mode::Sigil)
    }

    fn set_mode(&mut self, mode: Mode) -> Option<StateEvent> {
        if self.mode == mode {
            return None;
        }
        tracing::info!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        Some(StateEvent::ModeChanged(mode))
    }

    /// Show a sigil, queueing it behind a fade-out if one is on screen
    pub fn show_sigil(&mut self, sigil: Sigil) -> Vec<StateEvent> {
        let mut events = Vec::new();
        self.hold_timer = 0.0;
        if self.cycle == SigilCycle::None {
            self.current = Some(sigil);
            self.load_after_fade_out = false;
            self.start_sigil(&mut events);
        } else {
            self.next = Some(sigil);
            self.cycle = SigilCycle::Out;
            self.load_after_fade_out = true;
        }
        events
    }

    /// Begin fading out a held sigil
    pub fn hide_sigil(&mut self) {
        if self.cycle == SigilCycle::Hold {
            self.cycle = SigilCycle::Out;
        }
    }

    fn start_sigil(&mut self, events: &mut Vec<StateEvent>) {
        tracing::debug!("Starting sigil cycle");
        events.extend(self.set_mode(Mode::Sigil));
        self.sigil_in_t = 0.0;
        self.sigil_out_t = 0.0;
        self.cycle = SigilCycle::In;
        events.push(StateEvent::SigilStarted);
    }

    /// Record a percept; ignored while any sigil is visible
    pub fn add_percept(&mut self, percept: Percept) -> Vec<StateEvent> {
        let mut events = Vec::new();
        if self.mode == Mode::Idle {
            events.extend(self.set_mode(Mode::Percepts));
        }
        if self.sigil_t > 0.0 {
            return events;
        }
        self.percepts.push(percept.clone());
        events.push(StateEvent::Percept(percept));
        events
    }

    pub fn apply_phase(&mut self, phase: &Phase) -> Vec<StateEvent> {
        match phase {
            Phase::SigilOut => {
                self.hide_sigil();
                Vec::new()
            }
            Phase::Spool => {
                tracing::info!("Spool phase started");
                vec![StateEvent::Spool]
            }
            Phase::Other(name) => {
                tracing::debug!("Ignoring phase {}", name);
                Vec::new()
            }
        }
    }

    /// Route a decoded feed event
    ///
    /// Sigil messages without a PNG attachment are rejected, matching the
    /// feed contract that every sigil ships with its rendered image.
    pub fn apply_feed(&mut self, event: &FeedEvent) -> Result<Vec<StateEvent>, ShowError> {
        match event {
            FeedEvent::Sigil(msg) => {
                if msg.png_base64().is_none() {
                    return Err(ShowError::MissingField("png"));
                }
                Ok(self.show_sigil(msg.sigil()))
            }
            FeedEvent::Percept(msg) => Ok(msg
                .percept()
                .map(|p| self.add_percept(p))
                .unwrap_or_default()),
            FeedEvent::Phase(msg) => Ok(msg
                .phase()
                .map(|p| self.apply_phase(&p))
                .unwrap_or_default()),
            FeedEvent::MindMoment(msg) => {
                tracing::info!(
                    "Mind moment: {} ({})",
                    msg.mind_moment.as_deref().unwrap_or_default(),
                    msg.sigil_phrase.as_deref().unwrap_or_default()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Advance by `dt` seconds
    pub fn update(&mut self, dt: f32) -> Vec<StateEvent> {
        let mut events = Vec::new();
        let d = self.durations;

        self.idle_t = approach(self.idle_t, self.mode == Mode::Idle, dt, d.idle);
        self.percept_t = approach(self.percept_t, self.mode == Mode::Percepts, dt, d.percepts);
        self.sigil_t = approach(self.sigil_t, self.mode == Mode::Sigil, dt, d.sigil);

        if self.cycle == SigilCycle::Hold {
            self.hold_timer += dt;
            if self.hold_timer >= d.sigil_hold {
                self.hide_sigil();
                self.hold_timer = 0.0;
            }
        } else {
            self.hold_timer = 0.0;
        }

        match self.cycle {
            SigilCycle::In => {
                self.sigil_in_t = step(self.sigil_in_t, dt, d.sigil_in);
                if self.sigil_in_t >= 1.0 {
                    self.cycle = SigilCycle::Hold;
                }
            }
            SigilCycle::Out => {
                self.sigil_out_t = step(self.sigil_out_t, dt, d.sigil_out);
                if self.sigil_out_t >= 1.0 {
                    self.sigil_in_t = 0.0;
                    self.sigil_out_t = 0.0;
                    if self.load_after_fade_out {
                        self.load_after_fade_out = false;
                        if let Some(next) = self.next.take() {
                            self.current = Some(next);
                        }
                        self.start_sigil(&mut events);
                    } else {
                        self.cycle = SigilCycle::None;
                        self.hold_timer = 0.0;
                        events.extend(self.set_mode(Mode::Percepts));
                    }
                }
            }
            SigilCycle::None | SigilCycle::Hold => {}
        }

        events
    }
}

/// Move a fade weight toward 1 (active) or 0 over `duration`
fn approach(value: f32, active: bool, dt: f32, duration: f32) -> f32 {
    let delta = dt / duration.max(f32::EPSILON);
    let value = if active { value + delta } else { value - delta };
    value.clamp(0.0, 1.0)
}

fn step(value: f32, dt: f32, duration: f32) -> f32 {
    (value + dt / duration.max(f32::EPSILON)).clamp(0.0, 1.0)
}
