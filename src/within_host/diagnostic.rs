//! Parasite-density diagnostics.

/// Deterministic threshold test on a density (parasites/µL).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnostic {
    limit: f64,
}

impl Diagnostic {
    pub fn deterministic(limit: f64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    pub fn is_positive(&self, density: f64) -> bool {
        density >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        let d = Diagnostic::deterministic(7.1);
        assert!(d.is_positive(7.1));
        assert!(!d.is_positive(7.0));
        assert!(!d.is_positive(0.0));
    }
}
