//! Warning collection across builds.
//!
//! Kept in its own test binary: builds clear the process-wide warning log.

use quire_document::{BuildSettings, parse_fixture};

#[test]
fn test_warnings_are_collected_per_build() {
    quire_common::warning::set_quiet(true);
    let doc = parse_fixture(
        r#"{ "root": { "tag": "html", "children": [ { "tag": "p",
            "pseudo": { "before": { "content": "target-unknown(x)" } } } ] } }"#,
    )
    .unwrap();

    let first = doc.build(&BuildSettings::default());
    assert!(first.warnings.iter().any(|w| w.contains("target-unknown()")));

    // the log is reset per build, so the same warning is reported again
    let second = doc.build(&BuildSettings::default());
    assert_eq!(second.warnings, first.warnings);
}
