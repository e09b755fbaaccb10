//! Game configuration
//!
//! Every tunable the simulation reads lives here and is passed explicitly into
//! the field and engine constructors. Values come from defaults, an optional
//! JSON file and `GR__`-prefixed environment variables, in that order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// What the ship does when it reaches a field edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BoundaryPolicy {
    /// Stop at the edge; the outward velocity component is dropped
    #[default]
    Clamp,
    /// Stop at the edge and reflect the outward velocity component
    Bounce,
    /// Reappear on the opposite edge
    Wrap,
}

/// Points awarded for destroying an asteroid with a missile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScorePolicy {
    /// Same value for every kill
    Fixed { points: f64 },
    /// Asteroid radius times a factor: big rocks are worth more
    Proportional { points_per_radius: f64 },
}

impl Default for ScorePolicy {
    fn default() -> Self {
        ScorePolicy::Fixed { points: 1.0 }
    }
}

impl ScorePolicy {
    /// Score for destroying an asteroid of the given radius
    pub fn points_for(&self, asteroid_radius: f64) -> f64 {
        match *self {
            ScorePolicy::Fixed { points } => points,
            ScorePolicy::Proportional { points_per_radius } => asteroid_radius * points_per_radius,
        }
    }
}

/// Loop timing, field size and global physics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ticks per second
    pub frame_rate: u32,
    pub field_width: u32,
    pub field_height: u32,
    /// Chance of spawning one asteroid per tick
    pub asteroid_probability: f64,
    /// 1.0 is perfectly elastic
    pub coefficient_restitution: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30,
            field_width: 800,
            field_height: 600,
            asteroid_probability: 0.02,
            coefficient_restitution: 0.8,
        }
    }
}

impl EngineConfig {
    /// Tick budget in whole milliseconds
    pub fn ms_per_frame(&self) -> u64 {
        crate::consts::MILLISECONDS_PER_SECOND / u64::from(self.frame_rate.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Velocity change per movement command
    pub boost: f64,
    pub radius: f64,
    pub mass: f64,
    pub boundary: BoundaryPolicy,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            boost: 1.0,
            radius: 10.0,
            mass: 50.0,
            boundary: BoundaryPolicy::Clamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileConfig {
    pub speed: f64,
    pub radius: f64,
    pub mass: f64,
    /// Clearance between the ship hull and a freshly launched missile
    pub launch_gap: f64,
}

impl Default for MissileConfig {
    fn default() -> Self {
        Self {
            speed: 6.0,
            radius: 2.0,
            mass: 1.0,
            launch_gap: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidConfig {
    pub min_radius: f64,
    pub max_radius: f64,
    pub min_mass: f64,
    pub max_mass: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    /// Maximum deviation from the inward edge normal
    pub max_spread_degrees: f64,
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            min_radius: 5.0,
            max_radius: 20.0,
            min_mass: 500.0,
            max_mass: 1000.0,
            min_speed: 0.5,
            max_speed: 2.5,
            max_spread_degrees: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Ticks an explosion stays in the field
    pub duration_ticks: u32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self { duration_ticks: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub directory: PathBuf,
    pub scoreboard_file: String,
    pub leaderboard_file: String,
    /// Sessions kept on the leaderboard
    pub leaderboard_capacity: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("score"),
            scoreboard_file: "Scoreboard.json".to_string(),
            leaderboard_file: "Leaderboard.json".to_string(),
            leaderboard_capacity: 3,
        }
    }
}

impl PersistenceConfig {
    pub fn scoreboard_path(&self) -> PathBuf {
        self.directory.join(&self.scoreboard_file)
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.directory.join(&self.leaderboard_file)
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub ship: ShipConfig,
    pub missile: MissileConfig,
    pub asteroid: AsteroidConfig,
    pub explosion: ExplosionConfig,
    pub scoring: ScorePolicy,
    pub persistence: PersistenceConfig,
}

const ENV_FRAME_RATE: &str = "GR__CORE__GAME__GAME_ENGINE__FRAME_RATE";
const ENV_FIELD_WIDTH: &str = "GR__CORE__GAME__GAME_ENGINE__SPACEFIELD_WIDTH";
const ENV_FIELD_HEIGHT: &str = "GR__CORE__GAME__GAME_ENGINE__SPACEFIELD_HEIGHT";
const ENV_ASTEROID_PROBABILITY: &str = "GR__CORE__GAME__GAME_ENGINE__ASTEROID_PROBABILITY";
const ENV_RESTITUTION: &str = "GR__CORE__GAME__GAME_ENGINE__COEFFICIENT_RESTITUTION";
const ENV_SHIP_BOOST: &str = "GR__CORE__GAME__SPACE_SHIP__BOOST";

impl Config {
    /// Parse a JSON document; missing keys keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `GR__` overrides from the process environment
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        self.apply_env_overrides(std::env::vars())?;
        Ok(self)
    }

    /// Apply overrides from `(name, value)` pairs; unknown names are ignored
    pub fn apply_env_overrides<I>(&mut self, vars: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            match name.as_str() {
                ENV_FRAME_RATE => self.engine.frame_rate = parse_env(ENV_FRAME_RATE, &value)?,
                ENV_FIELD_WIDTH => self.engine.field_width = parse_env(ENV_FIELD_WIDTH, &value)?,
                ENV_FIELD_HEIGHT => self.engine.field_height = parse_env(ENV_FIELD_HEIGHT, &value)?,
                ENV_ASTEROID_PROBABILITY => {
                    self.engine.asteroid_probability = parse_env(ENV_ASTEROID_PROBABILITY, &value)?
                }
                ENV_RESTITUTION => {
                    self.engine.coefficient_restitution = parse_env(ENV_RESTITUTION, &value)?
                }
                ENV_SHIP_BOOST => self.ship.boost = parse_env(ENV_SHIP_BOOST, &value)?,
                _ => continue,
            }
            log::debug!("Config override {}={}", name, value);
        }
        Ok(())
    }

    /// Check every tunable; the first bad one is reported
    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.engine;
        if e.frame_rate == 0 || e.frame_rate > 1000 {
            return Err(ConfigError::invalid("engine.frame_rate", "must be in 1..=1000 Hz"));
        }
        if e.field_width == 0 {
            return Err(ConfigError::invalid("engine.field_width", "must be positive"));
        }
        if e.field_height == 0 {
            return Err(ConfigError::invalid("engine.field_height", "must be positive"));
        }
        if !(0.0..=1.0).contains(&e.asteroid_probability) {
            return Err(ConfigError::invalid(
                "engine.asteroid_probability",
                "must be within [0, 1]",
            ));
        }
        if !(e.coefficient_restitution > 0.0 && e.coefficient_restitution <= 1.0) {
            return Err(ConfigError::invalid(
                "engine.coefficient_restitution",
                "must be within (0, 1]",
            ));
        }

        non_negative("ship.boost", self.ship.boost)?;
        positive("ship.radius", self.ship.radius)?;
        positive("ship.mass", self.ship.mass)?;

        non_negative("missile.speed", self.missile.speed)?;
        positive("missile.radius", self.missile.radius)?;
        positive("missile.mass", self.missile.mass)?;
        non_negative("missile.launch_gap", self.missile.launch_gap)?;

        let a = &self.asteroid;
        positive("asteroid.min_radius", a.min_radius)?;
        ordered("asteroid.max_radius", a.min_radius, a.max_radius)?;
        positive("asteroid.min_mass", a.min_mass)?;
        ordered("asteroid.max_mass", a.min_mass, a.max_mass)?;
        non_negative("asteroid.min_speed", a.min_speed)?;
        ordered("asteroid.max_speed", a.min_speed, a.max_speed)?;
        if !(0.0..90.0).contains(&a.max_spread_degrees) {
            return Err(ConfigError::invalid(
                "asteroid.max_spread_degrees",
                "must be within [0, 90)",
            ));
        }

        if self.explosion.duration_ticks == 0 {
            return Err(ConfigError::invalid("explosion.duration_ticks", "must be positive"));
        }

        match self.scoring {
            ScorePolicy::Fixed { points } => non_negative("scoring.points", points)?,
            ScorePolicy::Proportional { points_per_radius } => {
                non_negative("scoring.points_per_radius", points_per_radius)?
            }
        }

        if self.persistence.leaderboard_capacity == 0 {
            return Err(ConfigError::invalid(
                "persistence.leaderboard_capacity",
                "must be positive",
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("cannot parse {:?}", value)))
}

fn positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be positive, got {}", value)))
    }
}

fn non_negative(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be non-negative, got {}", value)))
    }
}

fn ordered(key: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if max >= min && max.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("{} is below the minimum {}", max, min)))
    }
}
