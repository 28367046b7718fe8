/// Numeric thresholds for degenerate-input detection.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Two interpolation nodes closer than this count as coincident
    pub node: f64,
    /// A rational denominator smaller in magnitude than this counts as zero
    pub denominator: f64,
}

impl Tolerance {
    pub const DEFAULT_NODE: f64 = 1e-12;
    pub const DEFAULT_DENOMINATOR: f64 = 1e-15;

    pub fn new(node: f64, denominator: f64) -> Self {
        Self { node, denominator }
    }

    pub fn default_precision() -> Self {
        Self {
            node: Self::DEFAULT_NODE,
            denominator: Self::DEFAULT_DENOMINATOR,
        }
    }

    pub fn loose() -> Self {
        Self {
            node: 1e-6,
            denominator: 1e-9,
        }
    }

    pub fn tight() -> Self {
        Self {
            node: 0.0,
            denominator: 0.0,
        }
    }

    /// Check if two nodes coincide within node tolerance
    pub fn nodes_coincide(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.node
    }

    /// Check if a denominator vanishes within denominator tolerance
    pub fn is_zero_denominator(self, v: f64) -> bool {
        v.abs() <= self.denominator
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
