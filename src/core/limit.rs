/// Default number of rows returned by a polygon query
pub const DEFAULT_LIMIT: u32 = 1000;

/// Hard upper bound on rows returned by a polygon query
pub const MAX_LIMIT: u32 = 5000;

/// Result-size policy for polygon queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl LimitPolicy {
    pub fn new(default_limit: u32, max_limit: u32) -> Self {
        Self {
            default_limit,
            max_limit,
        }
    }

    /// Resolve the row cap for a requested limit
    ///
    /// Any missing, NaN or sub-1 request falls back to the default;
    /// the result never exceeds `max_limit`.
    pub fn effective(&self, requested: Option<f64>) -> u32 {
        let wanted = match requested.map(f64::trunc) {
            Some(n) if n >= 1.0 => n.min(u32::MAX as f64) as u32,
            _ => self.default_limit,
        };

        wanted.min(self.max_limit)
    }
}
