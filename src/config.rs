use std::env;

/// Tunables that the C source kept as global mutables (`batchsize`,
/// `nthreads`) or magic numbers (queue capacity, flush stride). Defaults
/// match the source; each can be overridden through an environment
/// variable since §6 fixes the CLI to exactly two positional file-path
/// arguments.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub batch_size: usize,
    pub workers: usize,
    pub queue_capacity: usize,
    pub flush_stride: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: 16,
            workers: 8,
            queue_capacity: 64,
            flush_stride: 8192,
        }
    }
}

impl Config {
    /// Builds the config from defaults, overridden by any of
    /// `SOLVER_BATCH_SIZE`, `SOLVER_WORKERS`, `SOLVER_QUEUE_CAP`,
    /// `SOLVER_FLUSH_STRIDE` found in the environment. Malformed values are
    /// ignored and the default is kept.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            batch_size: env_usize("SOLVER_BATCH_SIZE").unwrap_or(defaults.batch_size),
            workers: env_usize("SOLVER_WORKERS").unwrap_or(defaults.workers),
            queue_capacity: env_usize("SOLVER_QUEUE_CAP").unwrap_or(defaults.queue_capacity),
            flush_stride: env_usize("SOLVER_FLUSH_STRIDE").unwrap_or(defaults.flush_stride),
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_source() {
        let c = Config::default();
        assert_eq!(c.batch_size, 16);
        assert_eq!(c.workers, 8);
        assert_eq!(c.queue_capacity, 64);
        assert_eq!(c.flush_stride, 8192);
    }
}
