//! Side-by-side comparison of two cars
//!
//! Verdicts are from the first car's point of view.

use serde_json::{json, Value};

use crate::domain::{CarDetails, ServiceRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Better,
    Worse,
    Equal,
    Neutral,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Better => "better",
            Self::Worse => "worse",
            Self::Equal => "equal",
            Self::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preference {
    Lower,
    Higher,
}

/// Missing numbers count as zero.
fn verdict(first: Option<f64>, second: Option<f64>, pref: Preference) -> Verdict {
    let (a, b) = (first.unwrap_or(0.0), second.unwrap_or(0.0));
    if a == b {
        return Verdict::Equal;
    }
    let first_lower = a < b;
    match (pref, first_lower) {
        (Preference::Lower, true) | (Preference::Higher, false) => Verdict::Better,
        _ => Verdict::Worse,
    }
}

#[derive(Debug, Clone)]
pub struct FieldComparison {
    pub field: &'static str,
    pub first: Value,
    pub second: Value,
    pub verdict: Verdict,
}

fn numeric(field: &'static str, x: Option<f64>, y: Option<f64>, pref: Preference) -> FieldComparison {
    FieldComparison {
        field,
        first: x.map_or(Value::Null, |v| json!(v)),
        second: y.map_or(Value::Null, |v| json!(v)),
        verdict: verdict(x, y, pref),
    }
}

fn text(field: &'static str, x: Option<&str>, y: Option<&str>) -> FieldComparison {
    FieldComparison {
        field,
        first: x.map_or(Value::Null, |v| json!(v)),
        second: y.map_or(Value::Null, |v| json!(v)),
        verdict: Verdict::Neutral,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceSummary {
    pub count: usize,
    pub total_cost: f64,
    pub average_cost: f64,
}

impl ServiceSummary {
    pub fn of(services: &[ServiceRecord]) -> Self {
        let total_cost: f64 = services.iter().map(|s| s.cost).sum();
        let average_cost = if services.is_empty() {
            0.0
        } else {
            total_cost / services.len() as f64
        };
        Self {
            count: services.len(),
            total_cost,
            average_cost,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CarComparison {
    pub first: CarDetails,
    pub second: CarDetails,
    pub fields: Vec<FieldComparison>,
    pub first_services: ServiceSummary,
    pub second_services: ServiceSummary,
}

impl CarComparison {
    pub fn new(first: CarDetails, second: CarDetails) -> Self {
        let a = &first.car;
        let b = &second.car;

        let fields = vec![
            text("brand", Some(a.brand.as_str()), Some(b.brand.as_str())),
            text("model", Some(a.model.as_str()), Some(b.model.as_str())),
            numeric(
                "year",
                Some(a.year as f64),
                Some(b.year as f64),
                Preference::Higher,
            ),
            numeric("price", Some(a.price), Some(b.price), Preference::Lower),
            numeric(
                "mileage",
                a.mileage.map(|m| m as f64),
                b.mileage.map(|m| m as f64),
                Preference::Lower,
            ),
            text("color", a.color.as_deref(), b.color.as_deref()),
        ];

        let first_services = ServiceSummary::of(&first.services);
        let second_services = ServiceSummary::of(&second.services);

        Self {
            first,
            second,
            fields,
            first_services,
            second_services,
        }
    }

    pub fn verdict_for(&self, field: &str) -> Option<Verdict> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.verdict)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{Car, ServiceType};

    fn details(id: &str, year: i32, price: f64, mileage: Option<i64>, costs: &[f64]) -> CarDetails {
        let now = Utc::now();
        CarDetails {
            car: Car {
                id: id.into(),
                brand: "Toyota".into(),
                model: "Corolla".into(),
                year,
                price,
                color: None,
                mileage,
                description: None,
                image: None,
                owner_id: "u1".into(),
                created_at: now,
                updated_at: now,
            },
            owner: None,
            services: costs
                .iter()
                .enumerate()
                .map(|(i, cost)| ServiceRecord {
                    id: format!("{id}-s{i}"),
                    car_id: id.into(),
                    description: "Oil".into(),
                    cost: *cost,
                    service_type: ServiceType::Maintenance,
                    service_provider: None,
                    date: now,
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
        }
    }

    #[test]
    fn numeric_verdicts_follow_preferences() {
        let cmp = CarComparison::new(
            details("a", 2020, 10000.0, Some(50000), &[]),
            details("b", 2018, 12000.0, Some(30000), &[]),
        );
        assert_eq!(cmp.verdict_for("year"), Some(Verdict::Better));
        assert_eq!(cmp.verdict_for("price"), Some(Verdict::Better));
        assert_eq!(cmp.verdict_for("mileage"), Some(Verdict::Worse));
        assert_eq!(cmp.verdict_for("brand"), Some(Verdict::Neutral));
    }

    #[test]
    fn equal_and_missing_values() {
        let cmp = CarComparison::new(
            details("a", 2020, 10000.0, None, &[]),
            details("b", 2020, 10000.0, Some(1), &[]),
        );
        assert_eq!(cmp.verdict_for("year"), Some(Verdict::Equal));
        assert_eq!(cmp.verdict_for("price"), Some(Verdict::Equal));
        assert_eq!(cmp.verdict_for("mileage"), Some(Verdict::Better));

        let reversed = CarComparison::new(
            details("b", 2020, 10000.0, Some(1), &[]),
            details("a", 2020, 10000.0, None, &[]),
        );
        assert_eq!(reversed.verdict_for("mileage"), Some(Verdict::Worse));

        let both_missing = CarComparison::new(
            details("a", 2020, 10000.0, None, &[]),
            details("b", 2020, 10000.0, None, &[]),
        );
        assert_eq!(both_missing.verdict_for("mileage"), Some(Verdict::Equal));
    }

    #[test]
    fn service_summaries() {
        let cmp = CarComparison::new(
            details("a", 2020, 1.0, None, &[100.0, 50.0]),
            details("b", 2020, 1.0, None, &[]),
        );
        assert_eq!(
            cmp.first_services,
            ServiceSummary {
                count: 2,
                total_cost: 150.0,
                average_cost: 75.0
            }
        );
        assert_eq!(cmp.second_services.average_cost, 0.0);
        assert_eq!(cmp.second_services.count, 0);
    }
}
