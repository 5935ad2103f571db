use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use time::{Date, Month};

use crate::models::MetricKey;

/// Fixed reference "now" used for all relative time-range cutoffs.
pub const REFERENCE_NOW: Date = time::macros::date!(2024 - 12 - 01);

/// Seed pinning the sample generator so CLI output and tests are stable.
pub const GENERATOR_SEED: u64 = 0x6d65_7472;

pub const GENERATED_MONTHS: usize = 24;

/// Index of the deliberately degraded month (October 2023) in the generated
/// sequence: revenue cut to 77%, acquisitions to 60%, satisfaction down 15.
pub const OCTOBER_DIP_INDEX: usize = 9;

/// One calendar month of SaaS metrics. Dates are always the first of the
/// month and strictly increasing across a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricRecord {
    pub date: Date,
    pub mrr: i64,
    pub new_customers: i64,
    pub churned_customers: i64,
    pub cac: i64,
    pub nps: i64,
    pub support_tickets: i64,
    pub feature_adoption: i64,
}

impl MetricRecord {
    #[must_use]
    pub const fn value(&self, key: MetricKey) -> i64 {
        match key {
            MetricKey::Mrr => self.mrr,
            MetricKey::NewCustomers => self.new_customers,
            MetricKey::ChurnedCustomers => self.churned_customers,
            MetricKey::Cac => self.cac,
            MetricKey::Nps => self.nps,
            MetricKey::SupportTickets => self.support_tickets,
            MetricKey::FeatureAdoption => self.feature_adoption,
        }
    }

    #[must_use]
    pub fn date_string(&self) -> String {
        format_date(self.date)
    }
}

/// The full ordered metric history. Built once at startup, never mutated,
/// passed by reference into the engine and registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<MetricRecord>,
    reference_now: Date,
}

impl Dataset {
    /// The standard 24-month sample dataset (2023-01 through 2024-12).
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_seeded(GENERATOR_SEED)
    }

    #[must_use]
    pub fn generate_seeded(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = (0..GENERATED_MONTHS)
            .map(|index| generate_record(index, &mut rng))
            .collect();

        Self {
            records,
            reference_now: REFERENCE_NOW,
        }
    }

    /// Assembles a dataset from explicit records; used by tests and any
    /// caller that wants a non-sample history.
    #[must_use]
    pub fn from_records(records: Vec<MetricRecord>, reference_now: Date) -> Self {
        Self {
            records,
            reference_now,
        }
    }

    #[must_use]
    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    #[must_use]
    pub const fn reference_now(&self) -> Date {
        self.reference_now
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn descriptor(&self) -> DatasetDescriptor {
        DatasetDescriptor {
            name: "SaaS Metrics 2023-2024",
            description: "Monthly metrics for a B2B SaaS company",
            rows: self.records.len(),
            columns: column_catalog(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub rows: usize,
    pub columns: Vec<ColumnDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
}

fn column_catalog() -> Vec<ColumnDescriptor> {
    let mut columns = vec![ColumnDescriptor {
        name: "date",
        kind: "date",
        description: "Month",
    }];
    columns.extend(MetricKey::ALL.into_iter().map(|key| ColumnDescriptor {
        name: key.as_str(),
        kind: "number",
        description: key.label(),
    }));
    columns
}

fn generate_record(index: usize, rng: &mut StdRng) -> MetricRecord {
    let i = index as f64;
    let jitter = 0.9 + rng.random_range(0.0..0.2);
    let seasonal = 1.0 + 0.1 * (i / 12.0 * TAU).sin();
    let dip = index == OCTOBER_DIP_INDEX;

    let mrr_dip = if dip { 0.77 } else { 1.0 };
    let acquisition_dip = if dip { 0.6 } else { 1.0 };
    let nps_dip = if dip { -15.0 } else { 0.0 };

    MetricRecord {
        date: month_start(index),
        mrr: ((50_000.0 + i * 2_500.0) * seasonal * jitter * mrr_dip).round() as i64,
        new_customers: ((50.0 + i * 2.0) * jitter * acquisition_dip).round() as i64,
        churned_customers: ((5.0 + i * 0.5) * jitter).round() as i64,
        cac: (150.0 + rng.random_range(0.0_f64..50.0)).round() as i64,
        nps: (40.0 + rng.random_range(0.0_f64..20.0) + nps_dip).round() as i64,
        support_tickets: (100.0 + i * 3.0 + rng.random_range(0.0..50.0)).round() as i64,
        feature_adoption: (30.0 + i * 1.5 + rng.random_range(0.0..10.0)).round() as i64,
    }
}

fn month_start(index: usize) -> Date {
    let year = 2023 + (index / 12) as i32;
    let month = month_of_index(index % 12);
    first_of_month(year, month)
}

#[must_use]
pub fn first_of_month(year: i32, month: Month) -> Date {
    Date::from_calendar_date(year, month, 1)
        .expect("the first of a calendar month is always a valid date")
}

#[must_use]
pub const fn month_of_index(index: usize) -> Month {
    match index % 12 {
        0 => Month::January,
        1 => Month::February,
        2 => Month::March,
        3 => Month::April,
        4 => Month::May,
        5 => Month::June,
        6 => Month::July,
        7 => Month::August,
        8 => Month::September,
        9 => Month::October,
        10 => Month::November,
        _ => Month::December,
    }
}

#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::{Dataset, GENERATED_MONTHS, OCTOBER_DIP_INDEX, format_date, month_start};
    use crate::models::MetricKey;

    #[test]
    fn generator_emits_one_record_per_month_in_order() {
        let dataset = Dataset::generate();
        assert_eq!(dataset.len(), GENERATED_MONTHS);

        for (index, record) in dataset.records().iter().enumerate() {
            assert_eq!(record.date, month_start(index));
            assert_eq!(record.date.day(), 1);
        }
        assert_eq!(dataset.records()[0].date_string(), "2023-01-01");
        assert_eq!(dataset.records()[23].date_string(), "2024-12-01");
    }

    #[test]
    fn generator_is_deterministic_for_a_fixed_seed() {
        assert_eq!(Dataset::generate(), Dataset::generate());
        assert_eq!(
            Dataset::generate_seeded(7).records(),
            Dataset::generate_seeded(7).records()
        );
    }

    #[test]
    fn generated_values_stay_in_documented_bounds() {
        let dataset = Dataset::generate();
        for record in dataset.records() {
            for key in MetricKey::ALL {
                assert!(record.value(key) >= 0, "{key:?} should be non-negative");
            }
            assert!(record.nps <= 100);
            assert!(record.feature_adoption <= 100);
        }
    }

    #[test]
    fn sampled_columns_stay_in_their_offset_bands() {
        let dataset = Dataset::generate();
        for (index, record) in dataset.records().iter().enumerate() {
            assert!((150..=200).contains(&record.cac), "cac at {index}");
            assert!((25..=60).contains(&record.nps), "nps at {index}");
        }
    }

    #[test]
    fn october_dip_breaks_the_upward_revenue_trend() {
        let dataset = Dataset::generate();
        let records = dataset.records();
        let october = records[OCTOBER_DIP_INDEX].mrr;
        assert!(october < records[OCTOBER_DIP_INDEX - 1].mrr);
        assert!(october < records[OCTOBER_DIP_INDEX + 1].mrr);
    }

    #[test]
    fn descriptor_lists_date_plus_all_metric_columns() {
        let descriptor = Dataset::generate().descriptor();
        assert_eq!(descriptor.rows, GENERATED_MONTHS);
        assert_eq!(descriptor.columns.len(), 1 + MetricKey::ALL.len());
        assert_eq!(descriptor.columns[0].name, "date");
        assert_eq!(descriptor.columns[1].name, "mrr");
    }

    #[test]
    fn dates_format_as_iso_first_of_month() {
        assert_eq!(format_date(month_start(9)), "2023-10-01");
        assert_eq!(format_date(month_start(12)), "2024-01-01");
    }
}
