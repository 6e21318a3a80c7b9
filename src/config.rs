use crate::error::{TrackerError, TrackerResult};
use crate::messaging::Topic;
use serde::Deserialize;
use std::path::Path;

/// Output format for the console log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(TrackerError::Configuration(format!("Invalid log_format: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Topic receiving one work item per spawned job
    pub worker_topic: String,
    /// Topic carrying job and batch events; the tracker reads and writes it
    pub tracker_topic: String,
    /// Seed for work item jitter; unseeded uses the thread RNG
    pub random_seed: Option<u64>,
    pub log_format: LogFormat,
    /// Bound of the in-process publish channel
    pub publish_channel_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            worker_topic: "worker".to_string(),
            tracker_topic: "tracker".to_string(),
            random_seed: None,
            log_format: LogFormat::Pretty,
            publish_channel_capacity: 1000,
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> TrackerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup on top of the defaults
    pub fn from_lookup<F>(lookup: F) -> TrackerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(topic) = lookup("TRACKER_WORKER_TOPIC") {
            config.worker_topic = topic;
        }

        if let Some(topic) = lookup("TRACKER_TRACKER_TOPIC") {
            config.tracker_topic = topic;
        }

        if let Some(seed) = lookup("TRACKER_RANDOM_SEED") {
            config.random_seed = Some(seed.parse().map_err(|e| {
                TrackerError::Configuration(format!("Invalid random_seed: {e}"))
            })?);
        }

        if let Some(format) = lookup("TRACKER_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }

        if let Some(capacity) = lookup("TRACKER_PUBLISH_CHANNEL_CAPACITY") {
            config.publish_channel_capacity = capacity.parse().map_err(|e| {
                TrackerError::Configuration(format!("Invalid publish_channel_capacity: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Layer a TOML file and `TRACKER_*` environment variables over the defaults
    pub fn load(path: impl AsRef<Path>) -> TrackerResult<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).format(::config::FileFormat::Toml))
            .add_source(::config::Environment::with_prefix("TRACKER").try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TrackerResult<()> {
        if self.worker_topic.trim().is_empty() || self.tracker_topic.trim().is_empty() {
            return Err(TrackerError::Configuration(
                "topic names must not be empty".to_string(),
            ));
        }

        if self.worker_topic == self.tracker_topic {
            return Err(TrackerError::Configuration(format!(
                "worker and tracker topics must differ, both are {}",
                self.worker_topic
            )));
        }

        if self.publish_channel_capacity == 0 {
            return Err(TrackerError::Configuration(
                "publish_channel_capacity must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Broker-level topic name for a logical topic
    pub fn topic_name(&self, topic: Topic) -> &str {
        match topic {
            Topic::Worker => &self.worker_topic,
            Topic::Tracker => &self.tracker_topic,
        }
    }
}
