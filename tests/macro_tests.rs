use toml_decode::{decode, toml_value, TomlMap, Value};

#[test]
fn test_macro_scalars() {
    assert_eq!(toml_value!(true), Value::Boolean(true));
    assert_eq!(toml_value!(false), Value::Boolean(false));
    assert_eq!(toml_value!(7), Value::Integer(7));
    assert_eq!(toml_value!(2.5), Value::Float(2.5));
    assert_eq!(toml_value!("text"), Value::String("text".to_string()));
}

#[test]
fn test_macro_collections() {
    assert_eq!(toml_value!([]), Value::Array(vec![]));
    assert_eq!(toml_value!({}), Value::Table(TomlMap::new()));

    let value = toml_value!({
        "server" = {
            "host" = "localhost",
            "port" = 8080,
            "tls" = false
        },
        "paths" = ["/srv", "/tmp"]
    });

    assert_eq!(
        value.get("server").and_then(|s| s.get("port")),
        Some(&Value::Integer(8080))
    );
    assert_eq!(
        value.get("paths").and_then(Value::as_array).map(Vec::len),
        Some(2)
    );
}

#[test]
fn test_macro_matches_decoded_documents() {
    let decoded = decode(
        "title = \"demo\"\n[server]\nhost = \"localhost\"\nports = [80, 443]",
    )
    .unwrap();

    let built = toml_value!({
        "title" = "demo",
        "server" = {
            "host" = "localhost",
            "ports" = [80, 443]
        }
    });

    assert_eq!(decoded, built);
}

#[test]
fn test_macro_trailing_commas() {
    let value = toml_value!({
        "a" = 1,
        "b" = [1, 2,],
    });
    assert_eq!(value.get("a"), Some(&Value::Integer(1)));
}
