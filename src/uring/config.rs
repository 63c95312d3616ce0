/// The configuration used to build a [super::Uring].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingConfig {
    /// The number of submission queue entries, the kernel rounds this up to a power of two.
    pub queue_depth: u32,
    /// Whether to have a kernel thread poll the submission queue (`IORING_SETUP_SQPOLL`).
    pub polling: bool,
    /// How long the polling thread spins idle before going to sleep, in milliseconds.
    pub poll_idle_ms: u32,
}

impl RingConfig {
    pub fn new(queue_depth: u32, polling: bool) -> RingConfig {
        RingConfig {
            queue_depth,
            polling,
            ..Default::default()
        }
    }

    /// Create a default ring configuration, which can then be customized.
    pub fn builder() -> RingConfigBuilder {
        RingConfigBuilder::new()
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig {
            queue_depth: 256,
            polling: false,
            poll_idle_ms: 1000,
        }
    }
}

/// Ring configuration builder.
#[derive(Debug, Default)]
pub struct RingConfigBuilder {
    config: RingConfig,
}

impl RingConfigBuilder {
    /// Create a default ring configuration, 256 entries without submission queue polling.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the submission queue depth.
    ///
    /// # Panics
    ///
    /// Panics if `depth == 0`.
    pub fn queue_depth(&mut self, depth: u32) -> &mut Self {
        assert!(depth > 0);
        self.config.queue_depth = depth;
        self
    }

    /// Enable or disable kernel side submission queue polling.
    pub fn polling(&mut self, polling: bool) -> &mut Self {
        self.config.polling = polling;
        self
    }

    /// Set the idle time of the submission queue polling thread.
    pub fn poll_idle_ms(&mut self, idle: u32) -> &mut Self {
        self.config.poll_idle_ms = idle;
        self
    }

    pub fn build(&self) -> RingConfig {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = RingConfig::builder()
            .queue_depth(8)
            .polling(true)
            .poll_idle_ms(50)
            .build();
        assert_eq!(
            config,
            RingConfig {
                queue_depth: 8,
                polling: true,
                poll_idle_ms: 50,
            }
        );
        assert_eq!(RingConfig::new(8, false).poll_idle_ms, 1000);
    }

    #[test]
    #[should_panic]
    fn test_zero_depth() {
        RingConfig::builder().queue_depth(0);
    }
}
