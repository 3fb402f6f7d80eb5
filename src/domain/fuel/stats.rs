//! Fuel efficiency arithmetic
//!
//! Efficiency is distance per unit of fuel over consecutive refuels: the fuel
//! put in at a stop is attributed to the distance driven since the previous
//! stop. Pairs without forward progress on the odometer are skipped.

use super::model::FuelEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EfficiencyRating {
    Good,
    Fair,
    Poor,
    Unknown,
}

impl EfficiencyRating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_efficiency(efficiency: Option<f64>) -> Self {
        match efficiency {
            Some(e) if e >= 30.0 => Self::Good,
            Some(e) if e >= 20.0 => Self::Fair,
            Some(_) => Self::Poor,
            None => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuelStats {
    pub efficiency: Option<f64>,
    pub total_cost: f64,
    pub average_cost_per_distance: f64,
    pub entry_count: usize,
    pub rating: EfficiencyRating,
}

impl FuelStats {
    pub fn compute(entries: &[FuelEntry]) -> Self {
        let efficiency = efficiency(entries);
        let total_cost: f64 = entries.iter().map(|e| e.cost).sum();

        let min = entries.iter().map(|e| e.mileage).min().unwrap_or(0);
        let max = entries.iter().map(|e| e.mileage).max().unwrap_or(0);
        let span = max - min;
        let average_cost_per_distance = if span > 0 {
            total_cost / span as f64
        } else {
            0.0
        };

        Self {
            efficiency,
            total_cost,
            average_cost_per_distance,
            entry_count: entries.len(),
            rating: EfficiencyRating::from_efficiency(efficiency),
        }
    }
}

fn efficiency(entries: &[FuelEntry]) -> Option<f64> {
    if entries.len() < 2 {
        return None;
    }
    let mut sorted: Vec<&FuelEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let mut distance = 0.0;
    let mut fuel = 0.0;
    for pair in sorted.windows(2) {
        let d = pair[1].mileage - pair[0].mileage;
        if d > 0 {
            distance += d as f64;
            fuel += pair[1].fuel_amount;
        }
    }

    if distance > 0.0 && fuel > 0.0 {
        Some(distance / fuel)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::fuel::FuelType;

    fn entry(day: i64, mileage: i64, fuel: f64, cost: f64) -> FuelEntry {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        FuelEntry {
            id: format!("f{day}"),
            car_id: "c1".into(),
            date: base + Duration::days(day),
            fuel_amount: fuel,
            cost,
            mileage,
            fuel_type: FuelType::Gasoline,
            notes: None,
            created_by: None,
            created_at: base,
            updated_at: base,
        }
    }

    #[test]
    fn efficiency_uses_consecutive_pairs_in_date_order() {
        // out of order on purpose
        let entries = vec![
            entry(10, 1600, 20.0, 60.0),
            entry(0, 1000, 40.0, 120.0),
            entry(5, 1300, 10.0, 30.0),
        ];
        let stats = FuelStats::compute(&entries);
        // (300 + 300) / (10 + 20)
        assert_eq!(stats.efficiency, Some(20.0));
        assert_eq!(stats.rating, EfficiencyRating::Fair);
        assert_eq!(stats.total_cost, 210.0);
        assert!((stats.average_cost_per_distance - 210.0 / 600.0).abs() < 1e-9);
        assert_eq!(stats.entry_count, 3);
    }

    #[test]
    fn non_increasing_mileage_is_skipped() {
        let entries = vec![
            entry(0, 1000, 30.0, 10.0),
            entry(1, 900, 30.0, 10.0),
            entry(2, 1300, 10.0, 10.0),
        ];
        // only 900 -> 1300 counts
        assert_eq!(FuelStats::compute(&entries).efficiency, Some(40.0));
    }

    #[test]
    fn single_entry_has_unknown_efficiency() {
        let stats = FuelStats::compute(&[entry(0, 1000, 30.0, 50.0)]);
        assert_eq!(stats.efficiency, None);
        assert_eq!(stats.rating, EfficiencyRating::Unknown);
        assert_eq!(stats.average_cost_per_distance, 0.0);
    }

    #[test]
    fn empty_list() {
        let stats = FuelStats::compute(&[]);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.total_cost, 0.0);
        assert_eq!(stats.rating, EfficiencyRating::Unknown);
    }

    #[test]
    fn rating_thresholds() {
        assert_eq!(EfficiencyRating::from_efficiency(Some(30.0)), EfficiencyRating::Good);
        assert_eq!(EfficiencyRating::from_efficiency(Some(29.9)), EfficiencyRating::Fair);
        assert_eq!(EfficiencyRating::from_efficiency(Some(19.9)), EfficiencyRating::Poor);
    }
}
