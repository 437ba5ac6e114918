//! Monitor configuration.
//!
//! Everything here is `const`-constructible so a firmware image can bake its
//! configuration into a `static` with no startup cost:
//!
//! ```
//! use ramscope::config::{MonitorConfig, RateLimit};
//!
//! const CONFIG: MonitorConfig = match RateLimit::new(64) {
//!     Ok(rate) => MonitorConfig::DEFAULT.with_rate_limit(rate).with_alert_threshold(128),
//!     Err(_) => MonitorConfig::DEFAULT,
//! };
//! assert_eq!(CONFIG.rate_limit().get(), 64);
//! ```

/// Default sampling period in `check()` calls.
pub const DEFAULT_RATE_LIMIT: u16 = 256;

/// Default free-memory level, in bytes, below which `Alert` is raised.
pub const DEFAULT_ALERT_THRESHOLD: u16 = 50;

/// Default sentinel byte.
pub const DEFAULT_PAINT_PATTERN: u8 = 0xAA;

/// Minimum (and default) gap between the paint window and the live stack.
pub const MIN_SAFETY_MARGIN: u16 = 32;

/// Default distance at which stack and heap count as colliding.
pub const DEFAULT_COLLISION_MARGIN: u16 = 16;

/// Configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A rate limit of zero would never sample.
    #[error("rate limit must be non-zero")]
    RateLimitZero,
    /// Rate limits are tested with a bitmask and must be powers of two.
    #[error("rate limit {0} is not a power of two")]
    RateLimitNotPowerOfTwo(u16),
    /// Margins under 32 bytes risk painting over the painter's own frame.
    #[error("safety margin {0} is below the 32 byte minimum")]
    SafetyMarginTooSmall(u16),
}

/// Sampling period: one sample every `N` calls, `N` a power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct RateLimit(u16);

impl RateLimit {
    /// The default period, 256.
    pub const DEFAULT: Self = Self(DEFAULT_RATE_LIMIT);

    /// Validate a sampling period.
    ///
    /// # Errors
    ///
    /// [`ConfigError::RateLimitZero`] or [`ConfigError::RateLimitNotPowerOfTwo`].
    pub const fn new(period: u16) -> Result<Self, ConfigError> {
        if period == 0 {
            Err(ConfigError::RateLimitZero)
        } else if !period.is_power_of_two() {
            Err(ConfigError::RateLimitNotPowerOfTwo(period))
        } else {
            Ok(Self(period))
        }
    }

    /// The period in calls.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// `period - 1`; a counter value is a sampling point iff `counter & mask == 0`.
    #[must_use]
    pub const fn mask(self) -> u16 {
        self.0.wrapping_sub(1)
    }
}

impl Default for RateLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Tunables for one monitor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    rate_limit: RateLimit,
    alert_threshold: u16,
    paint_pattern: u8,
    safety_margin: u16,
    collision_margin: u16,
}

impl MonitorConfig {
    /// Rate 256, alert below 50 bytes, pattern `0xAA`, margins 32/16.
    pub const DEFAULT: Self = Self {
        rate_limit: RateLimit::DEFAULT,
        alert_threshold: DEFAULT_ALERT_THRESHOLD,
        paint_pattern: DEFAULT_PAINT_PATTERN,
        safety_margin: MIN_SAFETY_MARGIN,
        collision_margin: DEFAULT_COLLISION_MARGIN,
    };

    /// Replace the sampling period.
    #[must_use]
    pub const fn with_rate_limit(mut self, rate: RateLimit) -> Self {
        self.rate_limit = rate;
        self
    }

    /// Replace the free-memory alert threshold.
    #[must_use]
    pub const fn with_alert_threshold(mut self, bytes: u16) -> Self {
        self.alert_threshold = bytes;
        self
    }

    /// Replace the sentinel byte.
    ///
    /// Pick a value unlikely to appear in stack frames; `0x00` and `0xFF`
    /// are poor choices.
    #[must_use]
    pub const fn with_paint_pattern(mut self, pattern: u8) -> Self {
        self.paint_pattern = pattern;
        self
    }

    /// Replace the paint safety margin.
    ///
    /// # Errors
    ///
    /// [`ConfigError::SafetyMarginTooSmall`] if `bytes < 32`.
    pub const fn with_safety_margin(mut self, bytes: u16) -> Result<Self, ConfigError> {
        if bytes < MIN_SAFETY_MARGIN {
            return Err(ConfigError::SafetyMarginTooSmall(bytes));
        }
        self.safety_margin = bytes;
        Ok(self)
    }

    /// Replace the collision distance.
    #[must_use]
    pub const fn with_collision_margin(mut self, bytes: u16) -> Self {
        self.collision_margin = bytes;
        self
    }

    /// Sampling period.
    #[must_use]
    pub const fn rate_limit(&self) -> RateLimit {
        self.rate_limit
    }

    /// Free-memory level below which `Alert` is raised.
    #[must_use]
    pub const fn alert_threshold(&self) -> u16 {
        self.alert_threshold
    }

    /// Sentinel byte.
    #[must_use]
    pub const fn paint_pattern(&self) -> u8 {
        self.paint_pattern
    }

    /// Bytes kept unpainted below the live stack pointer.
    #[must_use]
    pub const fn safety_margin(&self) -> u16 {
        self.safety_margin
    }

    /// Stack/heap distance at or below which `Collision` is raised.
    #[must_use]
    pub const fn collision_margin(&self) -> u16 {
        self.collision_margin
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
