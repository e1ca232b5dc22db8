use super::*;
use serde_json::json;

fn roundtrip(value: &Value) -> Value {
    let text = ZonEncoder::encode(value);
    ZonDecoder::decode(&text).unwrap_or_else(|e| panic!("decode failed: {e}\n{text}"))
}

mod encode_tests {
    use super::*;

    #[test]
    fn test_safe_scalar_rules() {
        assert_eq!(safe_scalar(&Value::Null), "null");
        assert_eq!(safe_scalar(&json!(true)), "true");
        assert_eq!(safe_scalar(&json!(42)), "42");
        assert_eq!(safe_scalar(&json!(0.5)), "0.5");
        assert_eq!(safe_scalar(&json!("")), "\"\"");
        assert_eq!(safe_scalar(&json!("TRUE")), "true");
        assert_eq!(safe_scalar(&json!("Null")), "null");
        assert_eq!(safe_scalar(&json!("12.5")), "12.5");
        assert_eq!(safe_scalar(&json!("plain")), "plain");
        assert_eq!(safe_scalar(&json!("two words")), "\"two words\"");
        assert_eq!(safe_scalar(&json!("say \"hi\"")), "\"say \\\"hi\\\"\"");
        assert_eq!(safe_scalar(&json!("tag#1")), "\"tag#1\"");
        assert_eq!(safe_scalar(&json!("{x}")), "\"{x}\"");
    }

    #[test]
    fn test_encode_mapping() {
        let value = json!({
            "name": "Content",
            "score": 40.0,
            "found": ["coding", "music"],
            "none": [],
            "meta": {"ok": true},
            "empty": {}
        });

        let text = ZonEncoder::encode(&value);
        assert_eq!(
            text,
            "name Content\n\
             score 40.0\n\
             found [ coding, music ]\n\
             none [ ]\n\
             meta\n  ok true\n\
             empty {}"
        );
    }

    #[test]
    fn test_encode_nested_sequence_items() {
        let value = json!({"criteria": [{"name": "A"}, 3, [1, 2]]});
        assert_eq!(
            ZonEncoder::encode(&value),
            "criteria\n  -\n    name A\n  - 3\n  - [ 1, 2 ]"
        );
    }

    #[test]
    fn test_encode_top_level_scalars_and_lists() {
        assert_eq!(ZonEncoder::encode(&json!("hello world")), "\"hello world\"");
        assert_eq!(ZonEncoder::encode(&json!([1, "a b", null])), "[ 1, \"a b\", null ]");
        assert_eq!(ZonEncoder::encode(&json!({})), "");
    }

    #[test]
    fn test_encode_quotes_awkward_keys() {
        let text = ZonEncoder::encode(&json!({"Eye Contact": 1, "": 2, "-": 3}));
        assert_eq!(text, "\"Eye Contact\" 1\n\"\" 2\n\"-\" 3");
    }
}

mod decode_tests {
    use super::*;

    #[test]
    fn test_decode_comments_and_blank_lines() {
        let text = "# header comment\n\
                    \n\
                    name \"Ana # not a comment\"  # trailing\n\
                    age 30\n";
        assert_eq!(
            ZonDecoder::decode(text).expect("decode"),
            json!({"name": "Ana # not a comment", "age": 30})
        );
    }

    #[test]
    fn test_decode_literals() {
        assert_eq!(parse_literal("null"), Value::Null);
        assert_eq!(parse_literal("false"), json!(false));
        assert_eq!(parse_literal("7"), json!(7));
        assert_eq!(parse_literal("-7"), json!(-7));
        assert_eq!(parse_literal("7.25"), json!(7.25));
        assert_eq!(parse_literal("1e3"), json!(1000.0));
        assert_eq!(parse_literal("18446744073709551615"), json!(u64::MAX));
        assert_eq!(parse_literal("1.2.3"), json!("1.2.3"));
        assert_eq!(parse_literal("nan"), json!("nan"));
        assert_eq!(parse_literal("\"a \\\"b\\\"\""), json!("a \"b\""));
        assert_eq!(parse_literal("'single'"), json!("single"));
        assert_eq!(parse_literal("[ ]"), json!([]));
        assert_eq!(parse_literal("{}"), json!({}));
        assert_eq!(
            parse_literal("[ 1, \"x, y\", true ]"),
            json!([1, "x, y", true])
        );
    }

    #[test]
    fn test_nested_inline_lists_are_not_recursive() {
        assert_eq!(
            parse_literal("[[1, 2], [3]]"),
            json!(["[1", "2]", [3]])
        );
    }

    #[test]
    fn test_decode_nested_blocks() {
        let text = "a\n  b\n    c 1\n  d 2\ne 3";
        assert_eq!(
            ZonDecoder::decode(text).expect("decode"),
            json!({"a": {"b": {"c": 1}, "d": 2}, "e": 3})
        );
    }

    #[test]
    fn test_decode_bare_key_without_children() {
        let text = "a\nb 1";
        assert_eq!(
            ZonDecoder::decode(text).expect("decode"),
            json!({"a": {}, "b": 1})
        );
    }

    #[test]
    fn test_decode_single_line_documents() {
        assert_eq!(ZonDecoder::decode("").expect("decode"), json!({}));
        assert_eq!(ZonDecoder::decode("42").expect("decode"), json!(42));
        assert_eq!(ZonDecoder::decode("\"a b\"").expect("decode"), json!("a b"));
        assert_eq!(ZonDecoder::decode("[ 1, 2 ]").expect("decode"), json!([1, 2]));
        assert_eq!(ZonDecoder::decode("k v").expect("decode"), json!({"k": "v"}));
    }

    #[test]
    fn test_decode_mixed_block_errors() {
        let err = ZonDecoder::decode("a 1\n- 2").unwrap_err();
        assert!(matches!(err, ZonError::UnexpectedItem { line: 2 }));

        let err = ZonDecoder::decode("- 1\na 2").unwrap_err();
        assert!(matches!(err, ZonError::UnexpectedEntry { line: 2 }));

        let err = ZonDecoder::decode("\"open 1\nb 2").unwrap_err();
        assert!(matches!(err, ZonError::UnterminatedKey { line: 1 }));
    }
}

mod roundtrip_tests {
    use super::*;

    #[test]
    fn test_roundtrip_mixed_tree() {
        let value = json!({
            "title": "Speech report",
            "count": 3,
            "ratio": -0.125,
            "flag": false,
            "missing": null,
            "empty": "",
            "tags": ["one", "two words", "a,b", "x#y"],
            "nested": {
                "deep": {"value": 1},
                "list": [{"k": "v"}, {"k": "w", "inner": [1, 2]}]
            },
            "grid": [[1, 2], [], [3]],
            "Eye Contact": {"note": "line one\nline two\ttab \\ slash"}
        });

        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn test_roundtrip_top_level_sequences() {
        let value = json!([{"a": 1}, {"b": [true, null]}, "text here", {}]);
        assert_eq!(roundtrip(&value), value);

        let value = json!(["a", 2, 3.5]);
        assert_eq!(roundtrip(&value), value);
    }

    #[test]
    fn test_ambiguous_strings_decode_as_literals() {
        let value = json!({"a": "True", "b": "12"});
        assert_eq!(roundtrip(&value), json!({"a": true, "b": 12}));
    }

    #[test]
    fn test_serializable_helpers() {
        #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
        struct Report {
            name: String,
            scores: Vec<f64>,
        }

        let report = Report {
            name: "Content area".to_string(),
            scores: vec![40.0, 12.5],
        };
        let text = ZonEncoder::encode_serializable(&report).expect("encode");
        let back: Report = ZonDecoder::decode_into(&text).expect("decode");
        assert_eq!(back, report);
    }
}
