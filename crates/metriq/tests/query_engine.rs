use metriq::dataset::{Dataset, OCTOBER_DIP_INDEX};
use metriq::models::{Aggregation, GroupBy, MetricKey, TimeRange};
use metriq::query;

#[test]
fn quarter_comparison_yields_eight_rows_over_two_years() {
    let dataset = Dataset::generate();
    let metrics = [MetricKey::Mrr, MetricKey::Cac];
    let rows = query::comparison(&dataset, &metrics, GroupBy::Quarter);

    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0].name, "Q1 2023");
    assert_eq!(rows[4].name, "Q1 2024");
    assert_eq!(rows[7].name, "Q4 2024");

    for (index, row) in rows.iter().enumerate() {
        let months = &dataset.records()[index * 3..index * 3 + 3];
        for metric in metrics {
            let sum: i64 = months.iter().map(|record| record.value(metric)).sum();
            let expected = (sum as f64 / 3.0).round() as i64;
            assert_eq!(
                row.values.get(metric.as_str()),
                Some(&expected),
                "{} in {}",
                metric.as_str(),
                row.name
            );
        }
    }
}

#[test]
fn month_comparison_has_one_row_per_record() {
    let dataset = Dataset::generate();
    let rows = query::comparison(&dataset, &[MetricKey::Nps], GroupBy::Month);
    assert_eq!(rows.len(), dataset.len());
    for (row, record) in rows.iter().zip(dataset.records()) {
        assert_eq!(row.name, record.date_string());
        assert_eq!(row.values.get("nps"), Some(&record.nps));
    }
}

#[test]
fn distribution_counts_cover_every_record_exactly_once() {
    let dataset = Dataset::generate();
    for metric in MetricKey::ALL {
        let buckets = query::distribution(&dataset, metric, 4);
        let total: usize = buckets.iter().map(|bucket| bucket.value).sum();
        assert_eq!(total, dataset.len(), "{metric:?}");
        assert!(!buckets.is_empty());
        assert!(buckets.len() <= 4);
    }
}

#[test]
fn distribution_bucket_indexes_stay_in_range() {
    let dataset = Dataset::generate();
    let segments = 4_usize;
    let values: Vec<i64> = dataset.records().iter().map(|record| record.mrr).collect();
    let min = *values.iter().min().expect("dataset is non-empty");
    let max = *values.iter().max().expect("dataset is non-empty");
    let width = (max - min) as f64 / segments as f64;

    for value in values {
        let index = ((((value - min) as f64) / width).floor() as usize).min(segments - 1);
        assert!(index < segments);
    }
}

#[test]
fn distribution_bucket_labels_never_repeat() {
    let dataset = Dataset::generate();
    for metric in MetricKey::ALL {
        for segments in 1..=12 {
            let buckets = query::distribution(&dataset, metric, segments);
            for (position, bucket) in buckets.iter().enumerate() {
                assert!(
                    buckets[..position].iter().all(|prior| prior.name != bucket.name),
                    "{metric:?} with {segments} segments repeats `{}`",
                    bucket.name
                );
            }
            let total: usize = buckets.iter().map(|bucket| bucket.value).sum();
            assert_eq!(total, dataset.len(), "{metric:?} with {segments} segments");
        }
    }
}

#[test]
fn distribution_of_constant_values_collapses_to_one_bucket() {
    let dataset = Dataset::generate();
    let flattened: Vec<_> = dataset
        .records()
        .iter()
        .map(|record| {
            let mut record = *record;
            record.cac = 150;
            record
        })
        .collect();
    let constant = Dataset::from_records(flattened, dataset.reference_now());

    let buckets = query::distribution(&constant, MetricKey::Cac, 4);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].name, "150-150");
    assert_eq!(buckets[0].value, constant.len());
}

#[test]
fn october_dip_shows_up_in_the_revenue_series() {
    let dataset = Dataset::generate();
    let series = query::time_series(&dataset, MetricKey::Mrr, TimeRange::All);

    assert_eq!(series.len(), 24);
    assert_eq!(series[OCTOBER_DIP_INDEX].date, "2023-10-01");
    assert_eq!(
        series[OCTOBER_DIP_INDEX].value,
        dataset.records()[OCTOBER_DIP_INDEX].mrr
    );
    assert!(series[OCTOBER_DIP_INDEX].value < series[OCTOBER_DIP_INDEX - 1].value);
    assert!(series[OCTOBER_DIP_INDEX].value < series[OCTOBER_DIP_INDEX + 1].value);
}

#[test]
fn last_three_months_sum_matches_the_final_records() {
    let dataset = Dataset::generate();
    let summary = query::query_data(
        &dataset,
        MetricKey::NewCustomers,
        Aggregation::Sum,
        TimeRange::Last3Months,
    );

    let expected: i64 = dataset.records()[21..]
        .iter()
        .map(|record| record.new_customers)
        .sum();
    assert_eq!(summary.data_points, 3);
    assert_eq!(summary.result, expected);
    assert_eq!(summary.metric, MetricKey::NewCustomers);
    assert_eq!(summary.aggregation, Aggregation::Sum);
}

#[test]
fn window_sizes_follow_their_names() {
    let dataset = Dataset::generate();
    assert_eq!(
        query::filter_by_time_range(&dataset, TimeRange::Last6Months).len(),
        6
    );
    assert_eq!(
        query::filter_by_time_range(&dataset, TimeRange::Last3Months).len(),
        3
    );
    // Year-to-date covers all of 2024.
    assert_eq!(query::filter_by_time_range(&dataset, TimeRange::Ytd).len(), 12);
    assert_eq!(
        query::filter_by_time_range(&dataset, TimeRange::All).len(),
        24
    );
}

#[test]
fn aggregation_modes_agree_on_a_known_window() {
    let dataset = Dataset::generate();
    let window = &dataset.records()[21..];
    let values: Vec<i64> = window.iter().map(|record| record.cac).collect();

    let run = |mode| query::query_data(&dataset, MetricKey::Cac, mode, TimeRange::Last3Months);
    assert_eq!(run(Aggregation::Sum).result, values.iter().sum::<i64>());
    assert_eq!(
        run(Aggregation::Min).result,
        values.iter().copied().min().expect("window is non-empty")
    );
    assert_eq!(
        run(Aggregation::Max).result,
        values.iter().copied().max().expect("window is non-empty")
    );
    assert_eq!(run(Aggregation::Count).result, 3);
    assert_eq!(
        run(Aggregation::Avg).result,
        (values.iter().sum::<i64>() as f64 / 3.0).round() as i64
    );
}

#[test]
fn latest_metrics_match_the_final_generated_records() {
    let dataset = Dataset::generate();
    let records = dataset.records();
    let snapshot = query::latest_metrics(&dataset);
    let latest = &records[23];
    let previous = &records[22];

    assert_eq!(snapshot.mrr, latest.mrr);
    assert_eq!(snapshot.new_customers, latest.new_customers);
    assert_eq!(snapshot.nps, latest.nps);

    let expected_change =
        ((latest.mrr - previous.mrr) as f64 / previous.mrr as f64 * 1_000.0).round() / 10.0;
    assert_eq!(snapshot.mrr_change, expected_change);

    let base: i64 = 1_000
        + records
            .iter()
            .map(|record| record.new_customers - record.churned_customers)
            .sum::<i64>();
    let expected_churn = (latest.churned_customers as f64 / base as f64 * 1_000.0).round() / 10.0;
    assert_eq!(snapshot.churn_rate, expected_churn);
}
