use llm_costs_core::resolve::{resolve_and_cost, ResolveError, TokenKind, MATCH_THRESHOLD};
use llm_costs_core::store;

/// A snapshot as the store would have persisted it.
const SNAPSHOT_JSON: &str = r#"{
    "Claude 3.5 Sonnet": {
        "input_price": 0.003,
        "output_price": 0.015,
        "batch_input_price": 0.0015,
        "batch_output_price": 0.0075,
        "cache_write_price": 0.00375,
        "cache_read_price": 0.0003,
        "unit": "per 1K tokens",
        "provider": "Anthropic",
        "region": "us-east-1 / us-west-2"
    },
    "Jurassic-2 Ultra": {
        "input_price": 0.0188,
        "output_price": 0.0188,
        "batch_input_price": null,
        "batch_output_price": null,
        "cache_write_price": null,
        "cache_read_price": null,
        "unit": "per 1K tokens",
        "provider": "AI21 Labs",
        "region": "us-east-1"
    },
    "Titan Text Lite": {
        "input_price": 0.0003,
        "output_price": null,
        "batch_input_price": null,
        "batch_output_price": null,
        "cache_write_price": null,
        "cache_read_price": null,
        "unit": "per 1K tokens",
        "provider": "Amazon",
        "region": "us-east-1"
    }
}"#;

#[test]
fn loaded_snapshot_answers_a_misspelled_query() {
    let records = store::parse_records(SNAPSHOT_JSON).expect("snapshot parses");

    let result = resolve_and_cost("claude 3.5 sonet", 2000, 1000, 3, &records).expect("resolves");
    assert_eq!(result.model_id, "Claude 3.5 Sonnet");
    assert!(result.confidence > MATCH_THRESHOLD);

    // 2000 in @ 0.003/1K and 1000 out @ 0.015/1K, times 3 requests.
    assert!((result.input_cost - 0.018).abs() < 1e-12, "got {}", result.input_cost);
    assert!((result.output_cost - 0.045).abs() < 1e-12, "got {}", result.output_cost);
    assert!((result.total_cost - 0.063).abs() < 1e-12, "got {}", result.total_cost);

    // The matched record rides along for display.
    assert_eq!(result.record.provider, "Anthropic");
    assert_eq!(result.record.cache_read_price, Some(0.0003));
}

#[test]
fn chat_style_query_finds_the_embedded_model_name() {
    let records = store::parse_records(SNAPSHOT_JSON).unwrap();
    let result =
        resolve_and_cost("how much for 100 input tokens for Jurassic-2 Ultra", 100, 0, 1, &records)
            .expect("resolves");
    assert_eq!(result.model_id, "Jurassic-2 Ultra");
    assert!((result.total_cost - 0.00188).abs() < 1e-12);
}

#[test]
fn null_price_surfaces_as_unavailable_through_the_full_path() {
    let records = store::parse_records(SNAPSHOT_JSON).unwrap();
    let err = resolve_and_cost("titan text lite", 500, 500, 2, &records).unwrap_err();
    assert_eq!(
        err,
        ResolveError::PricingUnavailable {
            model_id: "Titan Text Lite".to_string(),
            kind: TokenKind::Output,
        }
    );
}

#[test]
fn nonsense_query_reports_no_match() {
    let records = store::parse_records(SNAPSHOT_JSON).unwrap();
    let err = resolve_and_cost("zzzzzz qqqqq", 10, 10, 1, &records).unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch { .. }), "got {err:?}");
}

#[test]
fn cost_result_serializes_for_renderers() {
    let records = store::parse_records(SNAPSHOT_JSON).unwrap();
    let result = resolve_and_cost("jurassic-2 ultra", 100, 0, 1, &records).unwrap();
    let json = serde_json::to_string(&result).expect("CostResult serializes");
    assert!(json.contains("\"model_id\":\"Jurassic-2 Ultra\""));
    assert!(json.contains("\"confidence\":100"));
    assert!(json.contains("\"record\""));
}
