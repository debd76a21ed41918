//! Usage statistics for the license expression service.

use std::fmt;

/// Counters describing how a service has been used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceStats {
    /// Number of expressions actually parsed (not served from the cache).
    pub parses: usize,
    /// Number of lookups answered by the cache.
    pub cache_hits: usize,
    /// Number of lookups the cache could not answer.
    pub cache_misses: usize,
    /// Number of parses that failed.
    pub parse_errors: usize,
}

impl ServiceStats {
    /// Returns the cache hit rate as a percentage.
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            (self.cache_hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for ServiceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "License Service Statistics:")?;
        writeln!(f, "  Parses:          {}", self.parses)?;
        writeln!(f, "  Parse errors:    {}", self.parse_errors)?;
        writeln!(f, "  Cache hits:      {}", self.cache_hits)?;
        writeln!(f, "  Cache misses:    {}", self.cache_misses)?;
        writeln!(f, "  Hit rate:        {:.1}%", self.hit_rate())?;
        Ok(())
    }
}
