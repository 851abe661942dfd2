use serde::Serialize;
use std::f64::consts::PI;

/// Ring chart radius in a 120-unit viewBox.
pub const RING_RADIUS: f64 = 54.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SalesAnalytics {
    pub sold: u32,
    pub in_process: u32,
}

impl SalesAnalytics {
    pub const fn showcase() -> Self {
        Self {
            sold: 127,
            in_process: 42,
        }
    }

    pub fn chart(&self) -> ChartData {
        let total = self.sold + self.in_process;
        if total == 0 {
            return ChartData {
                total: 0,
                sold_percent: 0.0,
                in_process_percent: 0.0,
            };
        }

        ChartData {
            total,
            sold_percent: f64::from(self.sold) / f64::from(total) * 100.0,
            in_process_percent: f64::from(self.in_process) / f64::from(total) * 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartData {
    pub total: u32,
    pub sold_percent: f64,
    pub in_process_percent: f64,
}

impl ChartData {
    pub fn circumference() -> f64 {
        2.0 * PI * RING_RADIUS
    }

    pub fn sold_dash_offset(&self) -> f64 {
        Self::circumference() * (1.0 - self.sold_percent / 100.0)
    }

    /// The in-process arc is drawn on top of the sold arc, so its offset
    /// covers both shares.
    pub fn in_process_dash_offset(&self) -> f64 {
        Self::circumference() * (1.0 - (self.sold_percent + self.in_process_percent) / 100.0)
    }
}
