//! Generation options
//!
//! Every field changes the generated layout for a given seed.

use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, Result};

/// Smallest side a leaf region may have: one cell of inset on both sides
/// plus a 3x3 room (walls and one floor cell).
pub const MIN_REGION_SIDE: u8 = 5;

/// Tuning knobs of the BSP catacomb generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Minimum rows of a BSP leaf region
    pub region_min_rows: u8,
    /// Minimum columns of a BSP leaf region.
    ///
    /// Larger than `region_min_rows` because terminal cells are about
    /// 2.5 times taller than wide.
    pub region_min_cols: u8,
    /// Lower bound of the random room scale factor
    pub min_scale: f64,
    /// Target rows/cols ratio of regions and rooms
    pub square_ratio: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            region_min_rows: 10,
            region_min_cols: 20,
            min_scale: 0.6,
            square_ratio: 0.4,
        }
    }
}

impl GenerationOptions {
    /// Check that a dungeon of `rows` x `cols` can be generated with these options
    pub fn validate(&self, rows: u8, cols: u8) -> Result<()> {
        let invalid = |reason: String| Err(DungeonError::InvalidOptions { reason });

        if self.region_min_rows < MIN_REGION_SIDE || self.region_min_cols < MIN_REGION_SIDE {
            return invalid(format!(
                "region minimum {}x{} is below {MIN_REGION_SIDE}x{MIN_REGION_SIDE}",
                self.region_min_rows, self.region_min_cols
            ));
        }
        if !(self.min_scale > 0.0 && self.min_scale <= 1.0) {
            return invalid(format!("min_scale {} is outside (0, 1]", self.min_scale));
        }
        if !(self.square_ratio.is_finite() && self.square_ratio > 0.0) {
            return invalid(format!("square_ratio {} must be positive", self.square_ratio));
        }
        if rows < MIN_REGION_SIDE || cols < MIN_REGION_SIDE {
            return invalid(format!(
                "dungeon {rows}x{cols} is below {MIN_REGION_SIDE}x{MIN_REGION_SIDE}"
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = GenerationOptions::default();
        assert_eq!(options.region_min_rows, 10);
        assert_eq!(options.region_min_cols, 20);
        assert!(options.validate(40, 100).is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = GenerationOptions::default();

        let tiny = GenerationOptions { region_min_rows: 4, ..base };
        assert!(matches!(tiny.validate(40, 100), Err(DungeonError::InvalidOptions { .. })));

        let scale = GenerationOptions { min_scale: 0.0, ..base };
        assert!(scale.validate(40, 100).is_err());

        let ratio = GenerationOptions { square_ratio: f64::NAN, ..base };
        assert!(ratio.validate(40, 100).is_err());

        assert!(base.validate(4, 100).is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: GenerationOptions =
            serde_json::from_str(r#"{ "region_min_cols": 12 }"#).unwrap();
        assert_eq!(options.region_min_cols, 12);
        assert_eq!(options.region_min_rows, 10);
        assert_eq!(options.square_ratio, 0.4);
    }
}
