//! Wave/phase state machine.
//!
//! Governs the intro countdown, the active wave timer, the boss phase,
//! and wave advancement. Deferred UI steps (countdown text, warning
//! expiry) are scheduled events carrying the wave index as a generation
//! token: a stale event whose token no longer matches the current wave
//! is discarded at fire time instead of acting on newer state.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use coreguard_core::components::{Enemy, EnemyAgent};
use coreguard_core::constants::*;
use coreguard_core::enums::WavePhase;
use coreguard_core::env::WorldEnv;
use coreguard_core::events::GameEvent;
use coreguard_core::types::Position;

use crate::spawner::SpawnerState;
use crate::world_setup;

/// What a scheduled step does when it fires.
#[derive(Debug, Clone)]
enum ScheduledAction {
    /// Show a center-screen banner ("3", "2", "1", "Wave N").
    ShowBanner(String),
    /// Clear the banner, start the wave timer, enable spawning.
    BeginWave,
    /// Clear the banner (warning expiry).
    ClearBanner,
}

/// A deferred one-shot step with its liveness token.
#[derive(Debug, Clone)]
struct ScheduledStep {
    due_tick: u64,
    /// Wave the step belongs to; mismatch at fire time means the game
    /// state has advanced and the step must no-op.
    wave: u32,
    action: ScheduledAction,
}

/// The phase state machine and session wave state.
#[derive(Debug)]
pub struct WaveDirector {
    pub phase: WavePhase,
    pub current_wave: u32,
    /// Seconds left on the active wave timer.
    pub wave_time_left: f64,
    pub wave_timer_running: bool,
    /// One-shot guard for the boss warning banner.
    boss_warning_shown: bool,
    pub spawning_enabled: bool,
    banner: Option<String>,
    scheduled: Vec<ScheduledStep>,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self {
            phase: WavePhase::Idle,
            current_wave: 1,
            wave_time_left: WAVE_DURATION_SECS,
            wave_timer_running: false,
            boss_warning_shown: false,
            spawning_enabled: false,
            banner: None,
            scheduled: Vec::new(),
        }
    }
}

impl WaveDirector {
    /// Begin the session: enters the wave-1 intro.
    pub fn start_session(&mut self, current_tick: u64) {
        if self.phase != WavePhase::Idle {
            return;
        }
        self.begin_intro(current_tick);
    }

    /// Current center-screen banner, if any.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Wave progress fraction p ∈ [0, 1]; zero outside the active timer.
    pub fn wave_progress(&self) -> f64 {
        if self.phase != WavePhase::Active || !self.wave_timer_running {
            return 0.0;
        }
        (1.0 - self.wave_time_left / WAVE_DURATION_SECS).clamp(0.0, 1.0)
    }

    /// Enter the intro countdown for the current wave: "3", "2", "1",
    /// "Wave N" at one-second steps, then the timer starts and spawning
    /// is enabled.
    fn begin_intro(&mut self, current_tick: u64) {
        self.phase = WavePhase::Intro;
        self.wave_time_left = WAVE_DURATION_SECS;
        self.wave_timer_running = false;
        self.spawning_enabled = false;

        let step_ticks = (INTRO_STEP_SECS * TICK_RATE as f64) as u64;
        let steps = ["3", "2", "1"];
        for (i, text) in steps.iter().enumerate() {
            self.schedule(
                current_tick + i as u64 * step_ticks,
                ScheduledAction::ShowBanner((*text).to_string()),
            );
        }
        self.schedule(
            current_tick + 3 * step_ticks,
            ScheduledAction::ShowBanner(format!("Wave {}", self.current_wave)),
        );
        self.schedule(current_tick + 4 * step_ticks, ScheduledAction::BeginWave);
    }

    fn schedule(&mut self, due_tick: u64, action: ScheduledAction) {
        self.scheduled.push(ScheduledStep {
            due_tick,
            wave: self.current_wave,
            action,
        });
    }

    /// Advance the phase machine by one tick.
    pub fn run(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        spawner: &mut SpawnerState,
        env: &mut dyn WorldEnv,
        events: &mut Vec<GameEvent>,
        despawn_buffer: &mut Vec<hecs::Entity>,
        next_enemy_id: &mut u32,
        current_tick: u64,
    ) {
        self.pump_scheduled(current_tick, events);

        if self.wave_timer_running {
            self.wave_time_left -= DT;
            if self.wave_time_left <= 0.0 {
                self.wave_time_left = 0.0;
                self.wave_timer_running = false;
                self.enter_boss_phase(world, rng, events, despawn_buffer, next_enemy_id, current_tick);
            }
        }

        // Boss dead (or through to the core): registry has no enemies
        // left, advance to the next wave.
        if self.phase == WavePhase::BossPhase && count_enemies(world) == 0 {
            self.advance_wave(env, spawner, events, current_tick);
        }
    }

    /// Fire due scheduled steps; discard stale ones.
    fn pump_scheduled(&mut self, current_tick: u64, events: &mut Vec<GameEvent>) {
        let mut due = Vec::new();
        self.scheduled.retain(|step| {
            if current_tick >= step.due_tick {
                due.push(step.clone());
                false
            } else {
                true
            }
        });

        for step in due {
            if step.wave != self.current_wave {
                continue;
            }
            match step.action {
                ScheduledAction::ShowBanner(text) => {
                    events.push(GameEvent::CountdownStep { text: text.clone() });
                    self.banner = Some(text);
                }
                ScheduledAction::BeginWave => {
                    if self.phase == WavePhase::Intro {
                        self.banner = None;
                        self.phase = WavePhase::Active;
                        self.wave_timer_running = true;
                        self.spawning_enabled = true;
                        events.push(GameEvent::WaveStarted {
                            wave: self.current_wave,
                        });
                    }
                }
                ScheduledAction::ClearBanner => {
                    self.banner = None;
                }
            }
        }
    }

    /// Guarded one-shot transition into the boss phase: stop spawning,
    /// clear leftover enemies with debris, warn once, spawn the boss.
    fn enter_boss_phase(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        events: &mut Vec<GameEvent>,
        despawn_buffer: &mut Vec<hecs::Entity>,
        next_enemy_id: &mut u32,
        current_tick: u64,
    ) {
        if self.phase == WavePhase::BossPhase {
            return;
        }
        self.phase = WavePhase::BossPhase;
        self.spawning_enabled = false;

        // Forcibly clear live normal/mini-boss enemies.
        let leftovers: Vec<(hecs::Entity, Position)> = world
            .query::<(&Enemy, &Position)>()
            .iter()
            .map(|(entity, (_, pos))| (entity, *pos))
            .collect();
        for (entity, pos) in leftovers {
            world_setup::spawn_debris_burst(world, rng, pos, ENEMY_DEBRIS_COUNT, 1.0, 1.4);
            despawn_buffer.push(entity);
        }
        for entity in despawn_buffer.drain(..) {
            let _ = world.despawn(entity);
        }

        if !self.boss_warning_shown {
            self.boss_warning_shown = true;
            self.banner = Some("WARNING".to_string());
            let warn_ticks = (BOSS_WARNING_SECS * TICK_RATE as f64) as u64;
            self.schedule(current_tick + warn_ticks, ScheduledAction::ClearBanner);
            events.push(GameEvent::BossWarning);
        }

        if let Some(enemy_id) = world_setup::spawn_boss(world, next_enemy_id) {
            events.push(GameEvent::BossSpawned { enemy_id });
        }
    }

    /// Boss phase complete: bump the wave index, notify the environment,
    /// reconfigure the spawner, and return to the intro countdown.
    fn advance_wave(
        &mut self,
        env: &mut dyn WorldEnv,
        spawner: &mut SpawnerState,
        events: &mut Vec<GameEvent>,
        current_tick: u64,
    ) {
        self.boss_warning_shown = false;
        self.current_wave += 1;
        events.push(GameEvent::WaveAdvanced {
            wave: self.current_wave,
        });
        env.set_biome_for_wave(self.current_wave);
        spawner.set_wave(self.current_wave);
        self.begin_intro(current_tick);
    }
}

fn count_enemies(world: &World) -> usize {
    let mut query = world.query::<(&Enemy, &EnemyAgent)>();
    query.iter().filter(|(_, (_, a))| !a.is_dead).count()
}
