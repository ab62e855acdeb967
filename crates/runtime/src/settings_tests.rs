use super::*;
use tempfile::tempdir;

fn registered_defaults(settings: &mut Settings) {
    settings.register("host", Value::Str("localhost".to_string()));
    settings.register("port", Value::Int(10248));
    settings.register("filter_text", Value::Str(String::new()));
    settings.register("query_log", Value::Str(String::new()));
}

#[test]
fn register_keeps_existing_value() {
    let mut settings = Settings::in_memory();
    registered_defaults(&mut settings);
    settings.set_str("host", "0.0.0.0");

    settings.register("host", Value::Str("localhost".to_string()));
    assert_eq!(settings.get_str("host"), "0.0.0.0");
}

#[test]
fn roundtrips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    {
        let mut settings = Settings::load(&path).unwrap();
        registered_defaults(&mut settings);
        settings.set_str("host", "0.0.0.0");
        settings.set_int("port", 9999);
        settings.save().unwrap();
    }

    let mut reloaded = Settings::load(&path).unwrap();
    registered_defaults(&mut reloaded);
    assert_eq!(reloaded.get_str("host"), "0.0.0.0");
    assert_eq!(reloaded.get_int("port"), 9999);
}

#[test]
fn missing_file_yields_empty_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does-not-exist.toml");

    let mut settings = Settings::load(&path).unwrap();
    registered_defaults(&mut settings);
    assert_eq!(settings.get_str("host"), "localhost");
    assert_eq!(settings.get_int("port"), 10248);
}

#[test]
#[should_panic(expected = "read before being registered")]
fn reading_unregistered_key_panics() {
    let settings = Settings::in_memory();
    settings.get_str("host");
}

#[test]
#[should_panic(expected = "changed type")]
fn type_mismatch_on_set_panics() {
    let mut settings = Settings::in_memory();
    settings.register("port", Value::Int(10248));
    settings.set_str("port", "nope");
}
