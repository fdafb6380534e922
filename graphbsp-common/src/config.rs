use crate::error::{BspError, BspResult};
use std::collections::HashMap;
use std::time::Duration;

pub const WORKERS: &str = "bsp.workers";
pub const MAX_ITERATION: &str = "bsp.max.iteration";
pub const SOURCE_VERTEX: &str = "bsp.source.vertex";
pub const BARRIER_TIMEOUT_MS: &str = "bsp.barrier.timeout.ms";

const DEFAULT_BARRIER_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Clone, Default)]
pub struct Configuration {
    config: HashMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            config: HashMap::new(),
        }
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.config.get(key)
    }

    pub fn get_string(&self, key: &str, default_value: &str) -> String {
        self.config
            .get(key)
            .cloned()
            .unwrap_or_else(|| default_value.to_string())
    }

    pub fn get_u64(&self, key: &str) -> BspResult<Option<u64>> {
        self.config
            .get(key)
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| BspError::Config(format!("{key} parse: {e}")))
            })
            .transpose()
    }
}

/// Typed view over the options a job recognizes. Validated once, before
/// the engine starts.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub workers: usize,
    pub max_iteration: Option<u64>,
    pub barrier_timeout: Duration,
}

impl JobConfig {
    pub fn from_configuration(config: &Configuration) -> BspResult<Self> {
        let workers = config
            .get_u64(WORKERS)?
            .ok_or_else(|| BspError::Config(format!("{WORKERS} is required")))?;
        if workers == 0 {
            return Err(BspError::Config(format!("{WORKERS} must be at least 1")));
        }

        let max_iteration = config.get_u64(MAX_ITERATION)?;
        let barrier_timeout_ms = config
            .get_u64(BARRIER_TIMEOUT_MS)?
            .unwrap_or(DEFAULT_BARRIER_TIMEOUT_MS);

        Ok(Self {
            workers: workers as usize,
            max_iteration,
            barrier_timeout: Duration::from_millis(barrier_timeout_ms),
        })
    }
}
