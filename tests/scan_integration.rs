//! End-to-end behavior of the scan pipeline on plain text inputs.

use defogger::engine::{Encoding, EngineConfig, Finding, ScanEngine};

fn default_engine() -> ScanEngine {
    ScanEngine::new(EngineConfig::default())
}

#[test]
fn single_base64_token_yields_one_string_finding() {
    let engine = default_engine();
    let store = engine.scan("app.cfg", "c = aGVsbG8td29ybGQtdGVzdA== ;");
    let strings: Vec<&Finding> = store.strings().collect();
    assert_eq!(strings.len(), 1);
    match strings[0] {
        Finding::String {
            source,
            encoded,
            encoding,
            decoded,
        } => {
            assert_eq!(source, "app.cfg");
            assert_eq!(encoded, "aGVsbG8td29ybGQtdGVzdA==");
            assert_eq!(*encoding, Encoding::Base64);
            assert_eq!(decoded, "hello-world-test");
        }
        other => panic!("unexpected finding {:?}", other),
    }
}

#[test]
fn source_map_decoded_from_base64_is_suppressed() {
    use base64::prelude::*;
    let source_map = r#"{"version":3,"sourceRoot":"","sourcesContent":[],"names":[]}"#;
    let token = BASE64_STANDARD.encode(source_map);
    let engine = default_engine();
    let store = engine.scan("bundle.js", &token);
    assert_eq!(store.strings().count(), 0);
}

#[test]
fn short_structured_token_reported() {
    use base64::prelude::*;
    // 9 chars, under the long-string cutoff, but purely structured
    let token = BASE64_STANDARD.encode("AB12-CD34");
    let engine = default_engine();
    let store = engine.scan("ids.txt", &token);
    let decoded: Vec<&str> = store
        .strings()
        .filter_map(|f| match f {
            Finding::String { decoded, .. } => Some(decoded.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(decoded, vec!["AB12-CD34"]);
}

#[test]
fn hex_run_length_gate_is_exact() {
    let engine = default_engine();
    // 15 digits: never matched with the default minimum of 8 bytes
    let fifteen = "414243442d65666";
    assert!(engine.scan("f.txt", fifteen).strings().count() == 0);
    // 16 digits: matched; decodes to "ABCD-efg", a structured 8-char token
    let sixteen = "414243442d656667";
    let store = engine.scan("f.txt", sixteen);
    let hex_strings: Vec<&Finding> = store
        .strings()
        .filter(|f| matches!(f, Finding::String { encoding: Encoding::Hex, .. }))
        .collect();
    assert_eq!(hex_strings.len(), 1);
    match hex_strings[0] {
        Finding::String { decoded, .. } => assert_eq!(decoded, "ABCD-efg"),
        other => panic!("unexpected finding {:?}", other),
    }
}

#[test]
fn non_canonical_base64_never_reported() {
    let engine = default_engine();
    // Shaped like Base64 with padding, but '9' carries nonzero trailing
    // bits in the final group, so the round trip can never reproduce it
    let store = engine.scan("odd.txt", "x: aGVsbG9=");
    assert_eq!(store.len(), 0);
}

#[test]
fn failures_in_one_candidate_do_not_stop_siblings() {
    let engine = default_engine();
    // First token fails to decode; the second is genuine
    let text = "bad: aGVsbG9= ok: aGVsbG8td29ybGQtdGVzdA==";
    let store = engine.scan("mix.txt", text);
    assert_eq!(store.strings().count(), 1);
}

#[test]
fn config_is_respected_per_engine_instance() {
    // A stricter Base64 gate filters out tokens a default engine accepts
    let strict = ScanEngine::new(EngineConfig {
        min_base64_length: 16,
        ..EngineConfig::default()
    });
    let store = strict.scan("app.cfg", "aGVsbG8td29ybGQtdGVzdA==");
    assert!(store.is_empty());

    let relaxed = default_engine();
    let store = relaxed.scan("app.cfg", "aGVsbG8td29ybGQtdGVzdA==");
    assert_eq!(store.strings().count(), 1);
}

#[test]
fn deeply_nested_input_terminates() {
    use base64::prelude::*;
    // Each layer decodes to another valid token; the depth cap must stop
    // the walk rather than hanging
    let mut text = "hello-world-test-hello-world".to_string();
    for _ in 0..40 {
        text = BASE64_STANDARD.encode(text.as_bytes());
    }
    let engine = ScanEngine::new(EngineConfig {
        max_depth: 8,
        ..EngineConfig::default()
    });
    let store = engine.scan("deep.bin", &text);
    // Unwrapped at most max_depth layers
    assert!(store.len() <= 8);
}
