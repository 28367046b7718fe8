use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Domain error: parameter {t} outside [{min}, {max}]")]
    Domain { t: f64, min: f64, max: f64 },

    #[error("Division error: {0}")]
    Division(String),
}

impl CurveError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn division(msg: impl Into<String>) -> Self {
        Self::Division(msg.into())
    }

    /// Fail unless `t` lies in the closed interval `[min, max]`. NaN is always rejected.
    pub fn check_domain(t: f64, (min, max): (f64, f64)) -> Result<()> {
        if t >= min && t <= max {
            Ok(())
        } else {
            Err(Self::Domain { t, min, max })
        }
    }
}

pub type Result<T> = std::result::Result<T, CurveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_domain_bounds_inclusive() {
        assert!(CurveError::check_domain(0.0, (0.0, 1.0)).is_ok());
        assert!(CurveError::check_domain(1.0, (0.0, 1.0)).is_ok());
        assert_eq!(
            CurveError::check_domain(1.5, (0.0, 1.0)),
            Err(CurveError::Domain { t: 1.5, min: 0.0, max: 1.0 })
        );
    }

    #[test]
    fn test_check_domain_rejects_nan() {
        assert!(matches!(
            CurveError::check_domain(f64::NAN, (0.0, 1.0)),
            Err(CurveError::Domain { .. })
        ));
    }

    #[test]
    fn test_display() {
        let err = CurveError::configuration("need at least 4 points, got 2");
        assert_eq!(err.to_string(), "Configuration error: need at least 4 points, got 2");
    }
}
