//! Round lifecycle state machine for the carrot mini-game.
//!
//! Everything that decides the game (scoring, the countdown, win/lose
//! detection, item bookkeeping) lives here behind plain Rust types so it can
//! run and be tested natively. Rendering and audio go through the
//! [`RoundView`] and [`SoundBank`] seams; the browser shell in `crate::dom`
//! provides the real implementations.

pub mod placement;

use placement::PlacementRng;

// --- Configuration -----------------------------------------------------------

/// Fixed per-session tuning. Defaults match the classic layout: five carrots,
/// five bugs, a five second clock, 80 px sprites.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundConfig {
    pub carrot_count: u32,
    pub bug_count: u32,
    pub duration_secs: u32,
    /// Square sprite edge in CSS pixels; placement keeps items this far away
    /// from the right/bottom field edges.
    pub item_size: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            carrot_count: 5,
            bug_count: 5,
            duration_secs: 5,
            item_size: 80.0,
        }
    }
}

/// Measured play-area rectangle, in CSS pixels. Supplied by the shell at
/// round start (the field is only measurable once mounted).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBounds {
    pub width: f64,
    pub height: f64,
}

// --- Items -------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Carrot,
    Bug,
}

/// Stable handle for a placed item; the shell stamps it on the corresponding
/// DOM element so clicks can be resolved back to the item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemId(pub u32);

/// A placed carrot or bug. Positions are field-relative CSS pixel offsets of
/// the sprite's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub kind: ItemKind,
    pub x: f64,
    pub y: f64,
}

// --- Phases & outputs --------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

/// Round lifecycle: `Idle → Running → Finished(_) → Running` (replay), with
/// `Running → Idle` on manual abort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished(Outcome),
}

/// Short audio cues fired on state transitions. `Background` is the looping
/// track that runs for the whole round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    CarrotPull,
    BugPull,
    Alert,
    Win,
    Background,
}

/// Display surface the controller draws through. Implementations must be
/// tolerant of redundant calls (e.g. `show_timer` with an unchanged value).
pub trait RoundView {
    fn clear_field(&mut self);
    fn place_item(&mut self, item: &Item);
    fn remove_item(&mut self, id: ItemId);
    /// Render the countdown; `remaining_secs` is whole seconds left.
    fn show_timer(&mut self, remaining_secs: u32);
    /// Render the scoreboard; the number shown is carrots still in the field.
    fn show_score(&mut self, carrots_left: u32);
    fn show_stop_button(&mut self);
    fn hide_button(&mut self);
    /// Reveal the timer and score displays (hidden until the first start).
    fn show_hud(&mut self);
    fn show_prompt(&mut self, text: &str);
}

/// Audio sink. `stop` only matters for the background loop but is accepted
/// for every cue.
pub trait SoundBank {
    fn play(&mut self, cue: SoundCue);
    fn stop(&mut self, cue: SoundCue);
}

// --- Controller --------------------------------------------------------------

/// Owns all mutable round state. One instance per game session; the shell
/// keeps it in a thread-local cell, tests hold it on the stack.
pub struct RoundController {
    config: RoundConfig,
    phase: Phase,
    score: u32,
    remaining_secs: u32,
    items: Vec<Item>,
}

impl RoundController {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            score: 0,
            remaining_secs: config.duration_secs,
            items: Vec::new(),
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Carrots still in the field; this is the number the scoreboard shows.
    pub fn carrots_left(&self) -> u32 {
        self.config.carrot_count - self.score
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Begin a fresh round, discarding whatever the previous one left behind.
    /// Scatters the configured carrots and bugs (overlap unchecked), arms the
    /// HUD, and starts the background track. The shell is responsible for
    /// scheduling `tick` once per second after this returns.
    pub fn start(
        &mut self,
        bounds: FieldBounds,
        rng: &mut impl PlacementRng,
        view: &mut impl RoundView,
        sounds: &mut impl SoundBank,
    ) {
        self.phase = Phase::Running;
        self.score = 0;
        self.remaining_secs = self.config.duration_secs;

        view.clear_field();
        self.items = placement::scatter(&self.config, bounds, rng);
        for item in &self.items {
            view.place_item(item);
        }

        view.show_stop_button();
        view.show_hud();
        view.show_timer(self.remaining_secs);
        view.show_score(self.carrots_left());
        sounds.play(SoundCue::Background);
    }

    /// Manual stop. Returns to `Idle` and offers a replay; no-op unless the
    /// round is running.
    pub fn abort(&mut self, view: &mut impl RoundView, sounds: &mut impl SoundBank) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Idle;
        view.hide_button();
        view.show_prompt("REPLAY?");
        sounds.play(SoundCue::Alert);
        sounds.stop(SoundCue::Background);
    }

    /// Handle a click inside the field. `target` is the item the shell
    /// resolved from the clicked element, `None` for bare field clicks.
    /// Ignored outside `Running`; stale ids (item already pulled) are ignored
    /// too.
    pub fn field_click(
        &mut self,
        target: Option<ItemId>,
        view: &mut impl RoundView,
        sounds: &mut impl SoundBank,
    ) {
        if self.phase != Phase::Running {
            return;
        }
        let Some(id) = target else {
            return;
        };
        let Some(pos) = self.items.iter().position(|it| it.id == id) else {
            return;
        };
        match self.items[pos].kind {
            ItemKind::Carrot => {
                self.items.remove(pos);
                view.remove_item(id);
                sounds.play(SoundCue::CarrotPull);
                self.score += 1;
                view.show_score(self.carrots_left());
                if self.score == self.config.carrot_count {
                    self.finish(Outcome::Win, view, sounds);
                }
            }
            // Bugs end the round on the spot; the field keeps its items.
            ItemKind::Bug => self.finish(Outcome::Lose, view, sounds),
        }
    }

    /// One-second countdown step. The shell calls this from its interval;
    /// the phase guard makes a stray tick after round end harmless.
    pub fn tick(&mut self, view: &mut impl RoundView, sounds: &mut impl SoundBank) {
        if self.phase != Phase::Running {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        view.show_timer(self.remaining_secs);
        if self.remaining_secs == 0 {
            let outcome = if self.score == self.config.carrot_count {
                Outcome::Win
            } else {
                Outcome::Lose
            };
            self.finish(outcome, view, sounds);
        }
    }

    fn finish(
        &mut self,
        outcome: Outcome,
        view: &mut impl RoundView,
        sounds: &mut impl SoundBank,
    ) {
        self.phase = Phase::Finished(outcome);
        view.hide_button();
        sounds.stop(SoundCue::Background);
        match outcome {
            Outcome::Win => {
                sounds.play(SoundCue::Win);
                view.show_prompt("YOU WON 🎉");
            }
            Outcome::Lose => {
                sounds.play(SoundCue::BugPull);
                view.show_prompt("YOU LOST 💥");
            }
        }
    }
}
