//! Tick scheduler
//!
//! `tick()` is one atomic simulation step. `execute()` paces ticks at the
//! configured frame rate; `execute_n()` runs a fixed number back to back.

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{ConfigError, PersistenceError};
use crate::persistence::ScoreStore;
use crate::platform::time::SystemClock;
use crate::sim::{
    Clock, Controller, GamePhase, GameState, PlayerCommand, RandomGenerator, SpaceField,
    Visualizer,
};

/// Running totals for the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub ticks: u64,
    pub asteroids_spawned: u64,
    pub missiles_launched: u64,
    pub kills: u64,
    pub collisions: u64,
    pub persistence_failures: u64,
    /// Failures that were logged at warn; one per outage, not per tick
    pub persistence_warnings: u64,
}

/// Outage tracking for one save target, so a lasting fault warns once
#[derive(Debug, Clone, Copy, Default)]
struct SaveHealth {
    failing_since: Option<u64>,
}

impl SaveHealth {
    fn record(&mut self, what: &str, tick: u64, error: Option<PersistenceError>, stats: &mut EngineStats) {
        match (error, self.failing_since) {
            (Some(e), None) => {
                stats.persistence_failures += 1;
                stats.persistence_warnings += 1;
                self.failing_since = Some(tick);
                log::warn!("{} not saved: {} (further failures logged at debug)", what, e);
            }
            (Some(e), Some(_)) => {
                stats.persistence_failures += 1;
                log::debug!("{} still not saved: {}", what, e);
            }
            (None, Some(since)) => {
                self.failing_since = None;
                log::info!("{} saved again after failing since tick {}", what, since);
            }
            (None, None) => {}
        }
    }
}

/// Owns the field and session state and drives them through the ports
pub struct GameEngine<G, C, V, S> {
    config: Config,
    generator: G,
    controller: C,
    visualizer: V,
    store: S,
    clock: Box<dyn Clock>,
    field: SpaceField,
    state: GameState,
    phase: GamePhase,
    stats: EngineStats,
    scoreboard_health: SaveHealth,
    leaderboard_health: SaveHealth,
}

impl<G, C, V, S> GameEngine<G, C, V, S>
where
    G: RandomGenerator,
    C: Controller,
    V: Visualizer,
    S: ScoreStore,
{
    /// Validate `config` and build a fresh session
    pub fn new(
        config: Config,
        generator: G,
        controller: C,
        visualizer: V,
        store: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let field = SpaceField::new(&config);
        log::info!(
            "Engine ready: {}x{} field at {} Hz",
            config.engine.field_width,
            config.engine.field_height,
            config.engine.frame_rate
        );
        Ok(Self {
            config,
            generator,
            controller,
            visualizer,
            store,
            clock: Box::new(SystemClock),
            field,
            state: GameState::new(),
            phase: GamePhase::Running,
            stats: EngineStats::default(),
            scoreboard_health: SaveHealth::default(),
            leaderboard_health: SaveHealth::default(),
        })
    }

    /// Replace the wall clock used for score timestamps
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn field(&self) -> &SpaceField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut SpaceField {
        &mut self.field
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn visualizer(&self) -> &V {
        &self.visualizer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run forever, one tick per frame budget
    pub fn execute(&mut self) -> ! {
        let budget = self.frame_budget();
        log::info!("Starting real-time loop ({} ms per tick)", budget.as_millis());
        loop {
            self.paced_tick(budget);
        }
    }

    /// Run `max_ticks` ticks at the real-time pace
    pub fn execute_paced(&mut self, max_ticks: u64) {
        let budget = self.frame_budget();
        for _ in 0..max_ticks {
            self.paced_tick(budget);
        }
    }

    /// Run exactly `max_ticks` ticks with no sleeping
    pub fn execute_n(&mut self, max_ticks: u64) {
        for _ in 0..max_ticks {
            self.tick();
        }
    }

    fn frame_budget(&self) -> Duration {
        Duration::from_millis(self.config.engine.ms_per_frame())
    }

    fn paced_tick(&mut self, budget: Duration) {
        let started = Instant::now();
        self.tick();
        let elapsed = started.elapsed();
        // saturating: an overrun tick starts the next one immediately
        let remaining = budget.saturating_sub(elapsed);
        if remaining.is_zero() {
            log::debug!("Tick {} overran its budget by {:?}", self.stats.ticks, elapsed - budget);
        } else {
            std::thread::sleep(remaining);
        }
    }

    /// One simulation step: input, physics (unless paused), render, persist
    pub fn tick(&mut self) {
        self.process_player_input();
        self.update_space_objects();
        self.render_space_field();
        self.save_score();
        self.stats.ticks += 1;
    }

    pub fn process_player_input(&mut self) {
        let Some(command) = self.controller.next_player_command() else {
            return;
        };
        let boost = self.config.ship.boost;
        match command {
            PlayerCommand::MoveUp => self.field.ship_mut().boost_up(boost),
            PlayerCommand::MoveDown => self.field.ship_mut().boost_down(boost),
            PlayerCommand::MoveLeft => self.field.ship_mut().boost_left(boost),
            PlayerCommand::MoveRight => self.field.ship_mut().boost_right(boost),
            PlayerCommand::LaunchMissile => {
                let id = self.field.generate_missile();
                self.stats.missiles_launched += 1;
                log::debug!("Missile #{} launched", id);
            }
            PlayerCommand::PauseGame => {
                self.phase = self.phase.toggled();
                log::info!("Game {:?}", self.phase);
            }
        }
    }

    /// Advance the field one step; no-op while paused
    pub fn update_space_objects(&mut self) {
        if self.is_paused() {
            return;
        }
        self.handle_explosions();
        self.handle_collisions();
        self.handle_missile_asteroid_collisions();
        self.move_space_objects();
        self.trim_space_objects();
        self.generate_asteroids();
    }

    pub fn handle_explosions(&mut self) {
        self.field.handle_explosions();
    }

    pub fn handle_collisions(&mut self) {
        let restitution = self.config.engine.coefficient_restitution;
        self.stats.collisions += self.field.handle_collisions(restitution) as u64;
    }

    pub fn handle_missile_asteroid_collisions(&mut self) {
        let asteroids_before = self.field.asteroids().len();
        let gained = self.field.handle_missile_asteroid_collisions();
        let kills = asteroids_before - self.field.asteroids().len();
        if kills > 0 {
            self.stats.kills += kills as u64;
            self.state.add_score(gained);
            log::debug!("{} kill(s) for {} points, score {}", kills, gained, self.state.score);
        }
    }

    pub fn move_space_objects(&mut self) {
        self.field.move_ship();
        self.field.move_asteroids();
        self.field.move_missiles();
    }

    pub fn trim_space_objects(&mut self) {
        self.field.trim_asteroids();
        self.field.trim_missiles();
    }

    /// One Bernoulli draw per call; returns whether an asteroid spawned
    pub fn generate_asteroids(&mut self) -> bool {
        let probability = self.generator.generate_probability();
        if probability <= self.config.engine.asteroid_probability {
            self.field.generate_asteroid(&mut self.generator);
            self.stats.asteroids_spawned += 1;
            true
        } else {
            false
        }
    }

    pub fn render_space_field(&mut self) {
        self.visualizer.render_space_field(&self.field);
        self.controller.observe(&self.field);
    }

    /// Stamp the session and write scoreboard then leaderboard
    ///
    /// Failures are counted and never stop the loop. A target that keeps
    /// failing warns once, then logs at debug until it recovers.
    pub fn save_score(&mut self) {
        let now = self.clock.now_hms();
        self.state.stamp(&now);
        let tick = self.stats.ticks;

        let scoreboard = self.store.save_scoreboard(&self.state).err();
        self.scoreboard_health
            .record("Scoreboard", tick, scoreboard, &mut self.stats);

        let leaderboard = match self.store.save_leaderboard(&self.state) {
            Ok(change) => {
                if change.is_changed() {
                    log::trace!("Leaderboard {:?}", change);
                }
                None
            }
            Err(e) => Some(e),
        };
        self.leaderboard_health
            .record("Leaderboard", tick, leaderboard, &mut self.stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use crate::highscores::LeaderboardChange;
    use crate::persistence::MemoryScoreStore;
    use crate::platform::input::ScriptedController;
    use crate::platform::output::HeadlessVisualizer;
    use crate::platform::rng::{PcgGenerator, SequenceGenerator};
    use crate::platform::time::FixedClock;
    use crate::sim::vector::{Point2D, Vector2D};

    type TestEngine = GameEngine<SequenceGenerator, ScriptedController, HeadlessVisualizer, MemoryScoreStore>;

    /// Engine that never spawns asteroids on its own
    fn quiet_engine(script: Vec<Option<PlayerCommand>>) -> TestEngine {
        let mut config = Config::default();
        config.engine.asteroid_probability = 0.0;
        GameEngine::new(
            config,
            SequenceGenerator::new(vec![0.99]),
            ScriptedController::new(script),
            HeadlessVisualizer::new(),
            MemoryScoreStore::new(3),
        )
        .unwrap()
        .with_clock(FixedClock("12:34:56".to_string()))
    }

    struct FailingStore;

    impl ScoreStore for FailingStore {
        fn save_scoreboard(&mut self, _: &GameState) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io {
                path: "Scoreboard.json".into(),
                source: std::io::Error::other("disk full"),
            })
        }

        fn save_leaderboard(&mut self, _: &GameState) -> Result<LeaderboardChange, PersistenceError> {
            Err(PersistenceError::Io {
                path: "Leaderboard.json".into(),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = Config::default();
        config.engine.frame_rate = 0;
        let engine = GameEngine::new(
            config,
            PcgGenerator::new(1),
            ScriptedController::default(),
            HeadlessVisualizer::new(),
            MemoryScoreStore::new(3),
        );
        assert!(matches!(engine, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_execute_n_runs_exactly_n_ticks() {
        let mut engine = quiet_engine(vec![]);
        engine.execute_n(0);
        assert_eq!(engine.stats().ticks, 0);
        engine.execute_n(37);
        assert_eq!(engine.stats().ticks, 37);
        assert_eq!(engine.visualizer().frames(), 37);
        assert_eq!(engine.store().saves(), 37);
    }

    #[test]
    fn test_commands_boost_ship() {
        let mut engine = quiet_engine(vec![
            Some(PlayerCommand::MoveRight),
            Some(PlayerCommand::MoveRight),
            Some(PlayerCommand::MoveUp),
            None,
            Some(PlayerCommand::MoveLeft),
            Some(PlayerCommand::MoveDown),
        ]);
        engine.execute_n(3);
        assert_eq!(engine.field().ship().velocity, Vector2D::new(2.0, 1.0));
        engine.execute_n(3);
        assert_eq!(engine.field().ship().velocity, Vector2D::new(1.0, 0.0));
    }

    #[test]
    fn test_launch_missile() {
        let mut engine = quiet_engine(vec![Some(PlayerCommand::LaunchMissile)]);
        engine.tick();
        assert_eq!(engine.field().missiles().len(), 1);
        assert_eq!(engine.stats().missiles_launched, 1);
        // Launched, then moved once in the same tick
        let missile = engine.field().missiles()[0];
        assert_eq!(missile.center, Point2D::new(400.0, 313.0 + 6.0));
    }

    #[test]
    fn test_paused_tick_renders_and_persists_but_freezes_field() {
        let mut engine = quiet_engine(vec![Some(PlayerCommand::PauseGame)]);
        engine.field_mut().ship_mut().velocity = Vector2D::new(1.0, 1.0);
        engine
            .field_mut()
            .add_asteroid(Point2D::new(100.0, 100.0), Vector2D::new(2.0, 0.0), 10.0, 600.0);
        engine
            .field_mut()
            .add_missile(Point2D::new(300.0, 100.0), Vector2D::new(0.0, 6.0));

        let before = serde_json::to_string(engine.field()).unwrap();
        engine.tick();
        assert!(engine.is_paused());
        engine.tick();
        let after = serde_json::to_string(engine.field()).unwrap();

        assert_eq!(before, after);
        assert_eq!(engine.visualizer().frames(), 2);
        assert_eq!(engine.store().saves(), 2);
        assert_eq!(engine.state().end_time, "12:34:56");
    }

    #[test]
    fn test_pause_toggles_back() {
        let mut engine = quiet_engine(vec![
            Some(PlayerCommand::PauseGame),
            Some(PlayerCommand::PauseGame),
        ]);
        engine.field_mut().ship_mut().velocity = Vector2D::new(1.0, 0.0);
        engine.tick();
        assert_eq!(engine.field().ship().center, Point2D::new(400.0, 300.0));
        engine.tick();
        assert_eq!(engine.phase(), GamePhase::Running);
        assert_eq!(engine.field().ship().center, Point2D::new(401.0, 300.0));
    }

    #[test]
    fn test_commands_still_apply_while_paused() {
        let mut engine = quiet_engine(vec![
            Some(PlayerCommand::PauseGame),
            Some(PlayerCommand::MoveUp),
        ]);
        engine.execute_n(2);
        assert_eq!(engine.field().ship().velocity, Vector2D::new(0.0, 1.0));
        assert_eq!(engine.field().ship().center, Point2D::new(400.0, 300.0));
    }

    #[test]
    fn test_kill_adds_score_once() {
        let mut engine = quiet_engine(vec![]);
        engine
            .field_mut()
            .add_missile(Point2D::new(100.0, 100.0), Vector2D::new(6.0, 0.0));
        engine
            .field_mut()
            .add_asteroid(Point2D::new(110.0, 100.0), Vector2D::ZERO, 8.0, 600.0);

        engine.execute_n(2);
        assert_eq!(engine.state().score, 1.0);
        assert_eq!(engine.stats().kills, 1);
        assert!(engine.field().missiles().is_empty());
        assert!(engine.field().asteroids().is_empty());
        assert_eq!(engine.field().explosions().len(), 1);

        engine.execute_n(20);
        assert_eq!(engine.state().score, 1.0);
        assert!(engine.field().explosions().is_empty());
    }

    #[test]
    fn test_spawn_uses_inclusive_threshold() {
        let mut config = Config::default();
        config.engine.asteroid_probability = 0.5;
        let mut engine = GameEngine::new(
            config,
            // spawn draw, then six asteroid draws, then a rejected spawn draw
            SequenceGenerator::new(vec![0.5, 0.1, 0.5, 0.5, 0.5, 0.5, 0.5, 0.51]),
            ScriptedController::default(),
            HeadlessVisualizer::new(),
            MemoryScoreStore::new(3),
        )
        .unwrap();
        assert!(engine.generate_asteroids());
        assert_eq!(engine.generator().draws(), 7);
        assert!(!engine.generate_asteroids());
        assert_eq!(engine.generator().draws(), 8);
        assert_eq!(engine.stats().asteroids_spawned, 1);
        assert_eq!(engine.field().asteroids().len(), 1);
    }

    #[test]
    fn test_spawn_count_is_binomial() {
        let n = 20_000u64;
        let p = 0.3;
        let mut config = Config::default();
        config.engine.asteroid_probability = p;
        let mut engine = GameEngine::new(
            config,
            PcgGenerator::new(2024),
            ScriptedController::default(),
            HeadlessVisualizer::new(),
            MemoryScoreStore::new(3),
        )
        .unwrap();

        let spawned = (0..n).filter(|_| engine.generate_asteroids()).count() as f64;
        let mean = n as f64 * p;
        let sigma = (n as f64 * p * (1.0 - p)).sqrt();
        assert!(
            (spawned - mean).abs() < 5.0 * sigma,
            "spawned {} outside {} ± 5σ ({})",
            spawned,
            mean,
            sigma
        );
        assert_eq!(engine.field().asteroids().len() as f64, spawned);
    }

    #[test]
    fn test_persistence_failure_does_not_stop_the_loop() {
        let mut config = Config::default();
        config.engine.asteroid_probability = 0.0;
        let mut engine = GameEngine::new(
            config,
            SequenceGenerator::new(vec![0.99]),
            ScriptedController::new([Some(PlayerCommand::MoveRight)]),
            HeadlessVisualizer::new(),
            FailingStore,
        )
        .unwrap();
        engine.execute_n(3);
        assert_eq!(engine.stats().ticks, 3);
        assert_eq!(engine.stats().persistence_failures, 6);
        assert_eq!(engine.stats().persistence_warnings, 2);
        assert_eq!(engine.field().ship().center, Point2D::new(403.0, 300.0));
    }

    /// Scoreboard writes follow a script of outcomes; the leaderboard always works
    struct FlakyStore {
        outcomes: VecDeque<bool>,
    }

    impl ScoreStore for FlakyStore {
        fn save_scoreboard(&mut self, _: &GameState) -> Result<(), PersistenceError> {
            if self.outcomes.pop_front().unwrap_or(true) {
                Ok(())
            } else {
                Err(PersistenceError::Io {
                    path: "Scoreboard.json".into(),
                    source: std::io::Error::other("read-only"),
                })
            }
        }

        fn save_leaderboard(&mut self, _: &GameState) -> Result<LeaderboardChange, PersistenceError> {
            Ok(LeaderboardChange::Unchanged)
        }
    }

    #[test]
    fn test_lasting_outage_warns_once_per_outage() {
        let mut config = Config::default();
        config.engine.asteroid_probability = 0.0;
        let mut engine = GameEngine::new(
            config,
            SequenceGenerator::new(vec![0.99]),
            ScriptedController::default(),
            HeadlessVisualizer::new(),
            FlakyStore {
                outcomes: VecDeque::from(vec![false, false, false, true, false, true]),
            },
        )
        .unwrap();

        engine.execute_n(3);
        assert_eq!(engine.stats().persistence_failures, 3);
        assert_eq!(engine.stats().persistence_warnings, 1);

        engine.execute_n(3);
        assert_eq!(engine.stats().persistence_failures, 4);
        assert_eq!(engine.stats().persistence_warnings, 2);
    }

    #[test]
    fn test_session_reaches_leaderboard() {
        let mut engine = quiet_engine(vec![]);
        engine.tick();
        let board = &engine.store().leaderboard;
        assert_eq!(board.len(), 1);
        assert_eq!(board.entries[0].start_time, "12:34:56");
        assert_eq!(engine.store().scoreboard.as_ref(), Some(engine.state()));
    }

    #[test]
    fn test_execute_paced_sleeps_out_the_budget() {
        let mut engine = quiet_engine(vec![]);
        let started = Instant::now();
        engine.execute_paced(3);
        // 30 Hz: 33 ms per tick
        assert!(started.elapsed() >= Duration::from_millis(3 * 33));
        assert_eq!(engine.stats().ticks, 3);
    }
}
