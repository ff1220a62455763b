use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close. Sequences of these are strictly increasing by date.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Closing prices of a point sequence, in order.
pub fn closes(points: &[PricePoint]) -> Vec<f64> {
    points.iter().map(|p| p.close).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: u32, close: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(2021, 3, day).unwrap(), close)
    }

    #[test]
    fn closes_keep_order() {
        let points = [point(1, 3.0), point(2, 1.5)];
        assert_eq!(closes(&points), vec![3.0, 1.5]);
    }
}
