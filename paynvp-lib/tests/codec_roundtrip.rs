//! End-to-end codec behavior through the public API.

use paynvp_lib::prelude::*;
use paynvp_lib::{key, wire};

#[test]
fn test_response_body_to_tree() {
    let body = "responseEnvelope.timestamp=2021-01-01T00%3A00%3A00Z\
                &responseEnvelope.ack=Success\
                &payKey=AP-1";
    let tree = wire::parse(body).unwrap();

    let expected = Value::mapping_from([
        (
            "responseEnvelope",
            Value::mapping_from([
                ("timestamp", Value::from("2021-01-01T00:00:00Z")),
                ("ack", Value::from("Success")),
            ]),
        ),
        ("payKey", Value::from("AP-1")),
    ]);
    assert_eq!(tree, expected);
}

#[test]
fn test_bracket_and_paren_markers_decode_alike() {
    let parens = decode(&[FlatEntry::single("receiverList.receiver(0).email", "a@x.com")]).unwrap();
    let brackets =
        decode(&[FlatEntry::single("receiverList.receiver[0].email", "a@x.com")]).unwrap();
    assert_eq!(parens, brackets);
}

#[test]
fn test_unique_flat_keys_survive_a_roundtrip() {
    let entries = vec![
        FlatEntry::single("requestEnvelope.errorLanguage", "en_US"),
        FlatEntry::single("actionType", "PAY"),
        FlatEntry::single("receiverList.receiver(0).email", "a@x.com"),
        FlatEntry::single("receiverList.receiver(0).amount", "10.00"),
        FlatEntry::single("receiverList.receiver(3).email", "d@x.com"),
        FlatEntry::single("memo", ""),
    ];
    let tree = decode(&entries).unwrap();
    assert_eq!(encode(&tree).unwrap(), entries);
}

#[test]
fn test_repeated_key_is_multi_value() {
    let tree = wire::parse("tag=a&tag=b&single=x").unwrap();
    assert_eq!(tree.get("tag"), Some(&Value::multi(["a", "b"])));
    assert_eq!(tree.lookup_str("single"), Some("x"));
    assert_eq!(wire::render(&tree).unwrap(), "tag=a&tag=b&single=x");
}

#[test]
fn test_wire_body_roundtrip_with_brackets() {
    let config = CodecConfig::new().with_index_style(IndexStyle::Brackets);
    let body = "receiver%5B0%5D.email=a%40x.com&receiver%5B1%5D.email=b%40x.com";
    let tree = wire::parse_with(body, &config).unwrap();
    assert_eq!(wire::render_with(&tree, &config).unwrap(), body);
}

#[test]
fn test_error_list_with_nested_parameters() {
    let tree = wire::parse(
        "error(0).errorId=580022\
         &error(0).parameter(0)=currencyCode\
         &error(0).parameter(1)=XYZ",
    )
    .unwrap();

    let errors = tree.get("error").unwrap().densify().unwrap();
    assert_eq!(errors.len(), 1);
    let params = errors[0].get("parameter").unwrap().densify().unwrap();
    let params: Vec<&str> = params.iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(params, vec!["currencyCode", "XYZ"]);
}

#[test]
fn test_densify_reports_gap() {
    let tree = decode(&[
        FlatEntry::single("item(0)", "a"),
        FlatEntry::single("item(2)", "c"),
    ])
    .unwrap();
    let err = tree.get("item").unwrap().densify().unwrap_err();
    assert!(matches!(err, NvpError::Gap { missing: 1 }));
    assert_eq!(err.code(), NvpErrorCode::Gap);
}

#[test]
fn test_key_helpers_agree_with_codec() {
    let components = key::split_key("error(0).parameter(1)");
    assert_eq!(key::join_segments(&components), "error(0).parameter(1)");
    assert_eq!(
        key::join_segments_with(&components, IndexStyle::Brackets),
        "error[0].parameter[1]"
    );
}

#[test]
fn test_json_and_nvp_agree_on_shape() {
    let config = CodecConfig::default();
    let from_nvp = NvpFormat
        .parse("responseEnvelope.ack=Success&error(0).errorId=1", &config)
        .unwrap();
    let from_json = JsonFormat
        .parse(
            r#"{"responseEnvelope":{"ack":"Success"},"error":[{"errorId":1}]}"#,
            &config,
        )
        .unwrap();
    assert_eq!(from_nvp, from_json);
}

#[test]
fn test_deep_key_is_rejected_without_overflow() {
    let key = vec!["k"; 100_000].join(".");
    let err = decode(&[FlatEntry::single(key, "v")]).unwrap_err();
    assert!(matches!(err, NvpError::DepthLimitExceeded { .. }));
    assert!(!err.is_retryable());
}
