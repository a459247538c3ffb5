// tests/cross_panel_copy.rs

mod common;

use artcap_form_sync_lib::{
    command,
    panel::{ACTION_FIELD, PHOTO_FIELD},
    types::FieldValue,
};
use common::{fill_bag, TestEnv};

#[test]
fn copy_into_artifact_pulls_layout_fields_from_bag() {
    let mut env = TestEnv::new();
    fill_bag(&mut env, &["paint", "cord", "slip"]);
    env.set("bag", "context", "Unit 4");
    env.set("bag", "notes", "not in artifact layout");
    env.set("bag", ACTION_FIELD, "new");

    env.set("artifact", ACTION_FIELD, "update");
    env.panel("artifact")
        .select_files(PHOTO_FIELD, vec!["IMG_0003.jpg".into()])
        .unwrap();

    let report = command::copy_into(&env.state, &mut env.book, "artifact");
    assert_eq!(report.source.as_deref(), Some("bag"));
    assert_eq!(
        report.copied,
        vec!["recorder", "season", "treatment", "context"]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
    );

    let artifact = env.book.panel("artifact").unwrap();
    assert_eq!(artifact.value("context"), Some(&FieldValue::Text("Unit 4".into())));
    assert_eq!(artifact.value("recorder"), Some(&FieldValue::Text("Alice".into())));
    assert_eq!(artifact.value("season"), Some(&FieldValue::Text("2024".into())));
    // "cord" is not an artifact option; target option order
    assert_eq!(
        artifact.value("treatment"),
        Some(&FieldValue::Choices(vec!["paint".into(), "slip".into()]))
    );

    // control, file and read-only targets are untouched
    assert_eq!(artifact.value(ACTION_FIELD), Some(&FieldValue::Text("update".into())));
    assert_eq!(artifact.selected_files(PHOTO_FIELD).to_vec(), vec!["IMG_0003.jpg".to_string()]);
    assert_eq!(artifact.value("date_recorded"), Some(&FieldValue::empty_text()));
    assert!(artifact.value("notes").is_none());
}

#[test]
fn unchecked_source_radio_unchecks_the_target() {
    let mut env = TestEnv::new();
    env.set("artifact", "recorder", "Bob");

    command::copy_into(&env.state, &mut env.book, "artifact");

    let artifact = env.book.panel("artifact").unwrap();
    assert_eq!(artifact.value("recorder"), Some(&FieldValue::empty_text()));
}

#[test]
fn read_only_target_field_is_skipped() {
    let mut env = TestEnv::new();
    env.set("bag", "context", "Unit 4");
    env.set("bag", "season", "2024");

    let report = command::copy_into(&env.state, &mut env.book, "sample");
    assert_eq!(report.copied, vec!["season".to_string()]);
    assert_eq!(report.skipped, vec!["context".to_string()]);

    let sample = env.book.panel("sample").unwrap();
    assert_eq!(sample.value("context"), Some(&FieldValue::empty_text()));
    assert_eq!(sample.value("season"), Some(&FieldValue::Text("2024".into())));
}

#[test]
fn panel_without_copy_source_is_left_alone() {
    let mut env = TestEnv::new();
    env.set("bag", "context", "Unit 7");

    let report = command::copy_into(&env.state, &mut env.book, "bag");
    assert!(report.source.is_none());
    assert!(report.copied.is_empty());

    let report = command::copy_into(&env.state, &mut env.book, "no-such-panel");
    assert!(report.source.is_none());

    assert_eq!(
        env.book.panel("bag").unwrap().value("context"),
        Some(&FieldValue::Text("Unit 7".into()))
    );
}

#[test]
fn copied_values_are_persisted() {
    let mut env = TestEnv::new();
    env.set("bag", "context", "Unit 4");
    command::copy_into(&env.state, &mut env.book, "artifact");

    let env = env.restart();
    assert_eq!(
        env.book.panel("artifact").unwrap().value("context"),
        Some(&FieldValue::Text("Unit 4".into()))
    );
}
