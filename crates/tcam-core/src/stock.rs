use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::Contour;

/// The rectangular blank of material before cutting. The controller
/// convention is `z_top = 0.0` and Z decreasing into the material.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Stock {
    pub x_size: f64,
    pub y_size: f64,
    pub z_size: f64,
    #[serde(default)]
    pub x_origin: f64,
    #[serde(default)]
    pub y_origin: f64,
    #[serde(default)]
    pub z_top: f64,
}

impl Stock {
    pub fn new(x_size: f64, y_size: f64, z_size: f64) -> Result<Self, Error> {
        Self::with_origin(x_size, y_size, z_size, 0.0, 0.0, 0.0)
    }

    pub fn with_origin(
        x_size: f64,
        y_size: f64,
        z_size: f64,
        x_origin: f64,
        y_origin: f64,
        z_top: f64,
    ) -> Result<Self, Error> {
        if x_size <= 0.0 || y_size <= 0.0 || z_size <= 0.0 {
            return Err(Error::InvalidParameter(
                "stock dimensions must be positive".into(),
            ));
        }
        Ok(Self {
            x_size,
            y_size,
            z_size,
            x_origin,
            y_origin,
            z_top,
        })
    }

    pub fn z_bottom(&self) -> f64 {
        self.z_top - self.z_size
    }

    /// The stock's XY footprint as a rectangle contour.
    pub fn footprint(&self) -> Contour {
        Contour::rectangle(
            self.x_origin,
            self.y_origin,
            self.x_origin + self.x_size,
            self.y_origin + self.y_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_z_bottom() {
        let stock = Stock::new(2.0, 2.0, 1.0).unwrap();
        assert!((stock.z_bottom() - (-1.0)).abs() < 1e-10);
    }

    #[test]
    fn test_stock_footprint_area() {
        let stock = Stock::new(2.0, 3.0, 1.0).unwrap();
        let bounds = stock.footprint().bounds().unwrap();
        assert!((bounds.area() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_stock_rejects_nonpositive_dimensions() {
        assert!(Stock::new(0.0, 1.0, 1.0).is_err());
        assert!(Stock::new(1.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn test_stock_with_origin_offsets_footprint() {
        let stock = Stock::with_origin(1.0, 1.0, 0.5, 2.0, 3.0, 0.0).unwrap();
        let bounds = stock.footprint().bounds().unwrap();
        assert!((bounds.min_x() - 2.0).abs() < 1e-9);
        assert!((bounds.min_y() - 3.0).abs() < 1e-9);
    }
}
