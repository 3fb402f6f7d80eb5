//! Format-independent report model

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{CarDetails, ServiceRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Pdf,
    Xlsx,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    AllCars,
    ServiceHistory { car_id: String },
    MonthlyMaintenance,
}

impl ReportKind {
    /// Download name without extension
    pub fn file_stem(&self) -> String {
        match self {
            Self::AllCars => "all-cars-report".to_string(),
            Self::ServiceHistory { car_id } => format!("service-history-{}", car_id),
            Self::MonthlyMaintenance => "monthly-maintenance-summary".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    Text(String),
    Integer(i64),
    Money(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Cell::Empty, |v| Cell::Text(v.to_string()))
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Integer(n) => n.to_string(),
            Cell::Money(v) => format_money(*v),
            Cell::Empty => "N/A".to_string(),
        }
    }
}

pub fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let negative = cents < 0;
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        grouped,
        cents % 100
    )
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub title: String,
    pub subtitle: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// `(label, value)` lines printed under the table
    pub summary: Vec<(String, String)>,
    /// Shown instead of the table when there are no rows
    pub empty_message: String,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

pub fn all_cars_report(cars: &[CarDetails], now: DateTime<Utc>) -> Report {
    let rows = cars
        .iter()
        .map(|d| {
            vec![
                Cell::text(&d.car.brand),
                Cell::text(&d.car.model),
                Cell::Integer(d.car.year as i64),
                Cell::Money(d.car.price),
                Cell::optional_text(d.car.color.as_deref()),
                d.car.mileage.map_or(Cell::Empty, Cell::Integer),
                Cell::optional_text(d.owner.as_ref().map(|o| o.name.as_str())),
            ]
        })
        .collect();

    let total_value: f64 = cars.iter().map(|d| d.car.price).sum();
    Report {
        title: "All Cars Report".into(),
        subtitle: None,
        generated_at: now,
        columns: columns(&["Brand", "Model", "Year", "Price", "Color", "Mileage", "Owner"]),
        rows,
        summary: vec![
            ("Total Cars".into(), cars.len().to_string()),
            ("Total Value".into(), format_money(total_value)),
            (
                "Average Price".into(),
                format_money(average(total_value, cars.len())),
            ),
        ],
        empty_message: "No cars found in the system.".into(),
    }
}

pub fn service_history_report(
    car: &CarDetails,
    services: &[ServiceRecord],
    now: DateTime<Utc>,
) -> Report {
    let rows = services
        .iter()
        .map(|s| {
            vec![
                Cell::Text(s.date.format("%Y-%m-%d").to_string()),
                Cell::text(s.service_type.as_str()),
                Cell::text(&s.description),
                Cell::optional_text(s.service_provider.as_deref()),
                Cell::Money(s.cost),
            ]
        })
        .collect();

    let total_cost: f64 = services.iter().map(|s| s.cost).sum();
    Report {
        title: "Service History Report".into(),
        subtitle: Some(car.car.display_name()),
        generated_at: now,
        columns: columns(&["Date", "Type", "Description", "Provider", "Cost"]),
        rows,
        summary: vec![
            ("Total Services".into(), services.len().to_string()),
            ("Total Cost".into(), format_money(total_cost)),
            (
                "Average Cost".into(),
                format_money(average(total_cost, services.len())),
            ),
        ],
        empty_message: "No service records found for this car.".into(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyBucket {
    /// `YYYY-MM`
    pub month: String,
    pub count: usize,
    pub total_cost: f64,
}

impl MonthlyBucket {
    pub fn average_cost(&self) -> f64 {
        average(self.total_cost, self.count)
    }
}

/// Group services by calendar month (UTC), oldest month first.
pub fn monthly_summary(services: &[ServiceRecord]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for s in services {
        let entry = buckets
            .entry(s.date.format("%Y-%m").to_string())
            .or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += s.cost;
    }
    buckets
        .into_iter()
        .map(|(month, (count, total_cost))| MonthlyBucket {
            month,
            count,
            total_cost,
        })
        .collect()
}

pub fn monthly_report(services: &[ServiceRecord], now: DateTime<Utc>) -> Report {
    let buckets = monthly_summary(services);
    let rows = buckets
        .iter()
        .map(|b| {
            vec![
                Cell::text(&b.month),
                Cell::Integer(b.count as i64),
                Cell::Money(b.total_cost),
                Cell::Money(b.average_cost()),
            ]
        })
        .collect();

    let total_cost: f64 = services.iter().map(|s| s.cost).sum();
    Report {
        title: "Monthly Maintenance Summary".into(),
        subtitle: None,
        generated_at: now,
        columns: columns(&["Month", "Services Count", "Total Cost", "Average Cost"]),
        rows,
        summary: vec![
            ("Total Services".into(), services.len().to_string()),
            ("Total Cost".into(), format_money(total_cost)),
            (
                "Average Cost".into(),
                format_money(average(total_cost, services.len())),
            ),
        ],
        empty_message: "No service records found.".into(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::ServiceType;

    fn service(y: i32, m: u32, d: u32, cost: f64) -> ServiceRecord {
        let date = Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap();
        ServiceRecord {
            id: format!("{y}-{m}-{d}"),
            car_id: "c1".into(),
            description: "Work".into(),
            cost,
            service_type: ServiceType::Maintenance,
            service_provider: None,
            date,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn monthly_grouping_is_sorted_by_month() {
        let services = vec![
            service(2024, 3, 5, 100.0),
            service(2023, 12, 31, 40.0),
            service(2024, 3, 20, 50.0),
            service(2024, 1, 1, 10.0),
        ];
        let buckets = monthly_summary(&services);
        let months: Vec<&str> = buckets.iter().map(|b| b.month.as_str()).collect();
        assert_eq!(months, ["2023-12", "2024-01", "2024-03"]);
        assert_eq!(buckets[2].count, 2);
        assert_eq!(buckets[2].total_cost, 150.0);
        assert_eq!(buckets[2].average_cost(), 75.0);
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(1234567.891), "$1,234,567.89");
        assert_eq!(format_money(999.5), "$999.50");
        assert_eq!(format_money(-42.0), "-$42.00");
    }

    #[test]
    fn empty_monthly_report_keeps_summary() {
        let report = monthly_report(&[], Utc::now());
        assert!(report.is_empty());
        assert_eq!(report.summary[0], ("Total Services".to_string(), "0".to_string()));
        assert_eq!(report.summary[2].1, "$0.00");
    }
}
