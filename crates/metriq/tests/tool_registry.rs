use metriq::dataset::Dataset;
use metriq::panels;
use metriq::query;
use metriq::registry::{ToolError, ToolRegistry};
use serde_json::{Value, json};

#[test]
fn every_tool_round_trips_a_valid_call_through_both_schema_gates() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);

    let calls = [
        ("queryData", json!({"metric": "mrr"})),
        ("getTimeSeriesData", json!({"metric": "nps", "timeRange": "ytd"})),
        ("getComparisonData", json!({"metrics": ["mrr", "cac"]})),
        ("getDistributionData", json!({"metric": "supportTickets"})),
        ("getLatestMetrics", json!({})),
    ];
    for (name, args) in calls {
        let output = registry
            .invoke(name, args)
            .unwrap_or_else(|error| panic!("`{name}` should succeed: {error}"));
        assert!(!output.is_null());
    }
}

#[test]
fn query_data_defaults_to_sum_over_the_whole_dataset() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);
    let output = registry
        .invoke("queryData", json!({"metric": "mrr"}))
        .expect("default call should succeed");

    let expected: i64 = dataset.records().iter().map(|record| record.mrr).sum();
    assert_eq!(output["result"], json!(expected));
    assert_eq!(output["aggregation"], json!("sum"));
    assert_eq!(output["dataPoints"], json!(24));
}

#[test]
fn comparison_defaults_to_quarterly_grouping() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);
    let output = registry
        .invoke("getComparisonData", json!({"metrics": ["newCustomers"]}))
        .expect("comparison should succeed");

    let rows = output.as_array().expect("comparison output is an array");
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0]["name"], json!("Q1 2023"));
    assert!(rows[0]["newCustomers"].is_i64());
}

#[test]
fn distribution_defaults_to_four_segments() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);
    let output = registry
        .invoke("getDistributionData", json!({"metric": "mrr"}))
        .expect("distribution should succeed");

    let buckets = output.as_array().expect("distribution output is an array");
    assert!(buckets.len() <= 4);
    let total: u64 = buckets
        .iter()
        .map(|bucket| bucket["value"].as_u64().expect("count is a number"))
        .sum();
    assert_eq!(total, 24);
}

#[test]
fn latest_metrics_tool_matches_the_engine() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);
    let output = registry
        .invoke("getLatestMetrics", json!({}))
        .expect("snapshot should succeed");

    let expected =
        serde_json::to_value(query::latest_metrics(&dataset)).expect("snapshot serializes");
    assert_eq!(output, expected);
    for field in ["mrr", "mrrChange", "newCustomers", "churnRate", "nps"] {
        assert!(output.get(field).is_some(), "missing field `{field}`");
    }
}

#[test]
fn enum_violations_are_reported_with_paths() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);

    let cases = [
        ("queryData", json!({"metric": "mrr", "aggregation": "median"})),
        ("queryData", json!({"metric": "mrr", "timeRange": "last9months"})),
        ("getTimeSeriesData", json!({"metric": 7})),
        ("getComparisonData", json!({"metrics": "mrr"})),
        ("getDistributionData", json!({"metric": "mrr", "segments": -1})),
    ];
    for (name, args) in cases {
        let error = registry
            .invoke(name, args.clone())
            .expect_err("invalid arguments should be rejected");
        let ToolError::InvalidArguments { tool, violations } = &error else {
            panic!("expected InvalidArguments for {args}, got {error:?}");
        };
        assert_eq!(tool, name);
        assert!(!violations.is_empty());
    }
}

#[test]
fn missing_required_fields_are_rejected() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);
    let error = registry
        .invoke("queryData", json!({}))
        .expect_err("missing metric should be rejected");
    assert_eq!(error.code(), "invalid_arguments");
    assert!(error.to_string().contains("queryData"));
}

#[test]
fn unknown_tool_names_are_rejected_loudly() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);
    let error = registry
        .invoke("renderDashboard", json!({}))
        .expect_err("unknown tool should be rejected");
    assert_eq!(error.code(), "unknown_tool");
    assert!(error.to_string().contains("renderDashboard"));
}

#[test]
fn descriptors_expose_object_schemas_for_agents() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);
    for tool in registry.tools() {
        assert!(tool.input_schema.is_object(), "{}", tool.name);
        assert!(tool.output_schema.is_object(), "{}", tool.name);
        assert!(!tool.description.is_empty());
    }
}

#[test]
fn panel_props_conform_to_their_component_schemas() {
    let dataset = Dataset::generate();
    let registry = ToolRegistry::new(&dataset);

    let cases: Vec<(&str, Value)> = vec![
        (
            "LineChart",
            serde_json::to_value(panels::line_chart(&dataset, Some("revenue"), Some("ytd")))
                .expect("line props serialize"),
        ),
        (
            "BarChart",
            serde_json::to_value(panels::bar_chart(&dataset, &["mrr", "cac"], Some("quarter")))
                .expect("bar props serialize"),
        ),
        (
            "PieChart",
            serde_json::to_value(panels::pie_chart(&dataset, Some("tickets"), Some(5)))
                .expect("pie props serialize"),
        ),
        (
            "InsightCard",
            serde_json::to_value(panels::insight_card(&dataset, Some("churn"), Some("down")))
                .expect("card props serialize"),
        ),
    ];

    for (name, props) in cases {
        let component = registry
            .components()
            .iter()
            .find(|component| component.name == name)
            .unwrap_or_else(|| panic!("component `{name}` should be registered"));
        let compiled = jsonschema::JSONSchema::compile(&component.props_schema)
            .expect("props schema should compile");
        assert!(
            compiled.is_valid(&props),
            "`{name}` props should satisfy their schema: {props}"
        );
    }
}
