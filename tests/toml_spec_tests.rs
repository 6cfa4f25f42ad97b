//! Decoder behavior suite: literal forms, string processing, merge
//! semantics, and rejection of malformed documents.

use toml_decode::{decode, toml_value, Value};

fn decoded(input: &str) -> Value {
    decode(input).unwrap_or_else(|e| panic!("decode failed for {input:?}: {e}"))
}

fn scalar(input: &str) -> Value {
    decoded(input)
        .get("v")
        .cloned()
        .unwrap_or_else(|| panic!("no `v` key decoded from {input:?}"))
}

#[test]
fn integers_in_every_radix() {
    assert_eq!(scalar("v = 0"), Value::Integer(0));
    assert_eq!(scalar("v = 42"), Value::Integer(42));
    assert_eq!(scalar("v = -17"), Value::Integer(-17));
    assert_eq!(scalar("v = +99"), Value::Integer(99));
    assert_eq!(scalar("v = 5_349_221"), Value::Integer(5_349_221));
    assert_eq!(scalar("v = 0xDEADBEEF"), Value::Integer(0xDEAD_BEEF));
    assert_eq!(scalar("v = 0xdead_beef"), Value::Integer(0xDEAD_BEEF));
    assert_eq!(scalar("v = 0o01234567"), Value::Integer(0o1234567));
    assert_eq!(scalar("v = 0b11010110"), Value::Integer(0b11010110));
}

#[test]
fn floats_in_every_shape() {
    assert_eq!(scalar("v = 1.0"), Value::Float(1.0));
    assert_eq!(scalar("v = 3.1415"), Value::Float(3.1415));
    assert_eq!(scalar("v = -0.01"), Value::Float(-0.01));
    assert_eq!(scalar("v = 5e+22"), Value::Float(5e22));
    assert_eq!(scalar("v = 1e06"), Value::Float(1e6));
    assert_eq!(scalar("v = -2E-2"), Value::Float(-2e-2));
    assert_eq!(scalar("v = 6.626e-34"), Value::Float(6.626e-34));
    assert_eq!(scalar("v = 224_617.445_991_228"), Value::Float(224_617.445_991_228));
    assert_eq!(scalar("v = inf"), Value::Float(f64::INFINITY));
    assert_eq!(scalar("v = +inf"), Value::Float(f64::INFINITY));
    assert_eq!(scalar("v = -inf"), Value::Float(f64::NEG_INFINITY));
    assert!(scalar("v = nan").as_float().unwrap().is_nan());
    assert!(scalar("v = -nan").as_float().unwrap().is_nan());
}

#[test]
fn booleans() {
    assert_eq!(scalar("v = true"), Value::Boolean(true));
    assert_eq!(scalar("v = false"), Value::Boolean(false));
    assert!(decode("v = TRUE").is_err());
}

#[test]
fn strings_in_every_quoting_style() {
    assert_eq!(scalar(r#"v = "basic""#), Value::from("basic"));
    assert_eq!(scalar("v = 'literal'"), Value::from("literal"));
    assert_eq!(scalar("v = \"\"\"multi\nline\"\"\""), Value::from("multi\nline"));
    assert_eq!(scalar("v = '''multi\nline'''"), Value::from("multi\nline"));
    assert_eq!(scalar("v = \"\""), Value::from(""));
    assert_eq!(scalar("v = ''"), Value::from(""));
}

#[test]
fn basic_strings_process_escapes_literal_strings_do_not() {
    assert_eq!(scalar(r#"v = "tab\there""#), Value::from("tab\there"));
    assert_eq!(scalar(r"v = 'tab\there'"), Value::from(r"tab\there"));
    assert_eq!(scalar(r#"v = "quote: \" slash: \\""#), Value::from("quote: \" slash: \\"));
    assert_eq!(scalar(r"v = 'C:\Users\nodejs'"), Value::from(r"C:\Users\nodejs"));
}

#[test]
fn unicode_escape_boundaries() {
    assert_eq!(scalar(r#"v = "\u0041""#), Value::from("A"));
    assert_eq!(scalar(r#"v = "\U0001F600""#), Value::from("😀"));
    assert!(decode(r#"v = "\U00110000""#).is_err());
    assert!(decode(r#"v = "\uD800""#).is_err());
    assert!(decode(r#"v = "\q""#).is_err());
}

#[test]
fn crlf_and_lf_decode_identically() {
    let lf = "a = 1\nb = \"x\"\n[t]\nc = 2\n";
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(decoded(lf), decoded(&crlf));
}

#[test]
fn multiline_string_trims_leading_newline() {
    assert_eq!(scalar("v = \"\"\"\nabc\"\"\""), Value::from("abc"));
    assert_eq!(scalar("v = '''\r\nabc'''"), Value::from("abc"));
    // Only the first newline is trimmed.
    assert_eq!(scalar("v = \"\"\"\n\nabc\"\"\""), Value::from("\nabc"));
}

#[test]
fn line_ending_backslash_collapses_whitespace() {
    assert_eq!(scalar("v = \"\"\"a\\\n   b\"\"\""), Value::from("ab"));
    assert_eq!(
        scalar("v = \"\"\"The quick brown \\\n\n\n  fox.\"\"\""),
        Value::from("The quick brown fox.")
    );
}

#[test]
fn multiline_delimiters_inside_strings() {
    assert_eq!(
        scalar("v = \"\"\"has \"\" two quotes\"\"\""),
        Value::from("has \"\" two quotes")
    );
    assert_eq!(scalar("v = '''that's it'''"), Value::from("that's it"));
}

#[test]
fn newline_is_rejected_in_single_line_strings() {
    assert!(decode("v = \"a\nb\"").is_err());
    assert!(decode("v = 'a\nb'").is_err());
}

#[test]
fn control_characters_are_rejected_in_strings_and_comments() {
    assert!(decode("v = \"a\u{7}b\"").is_err());
    assert!(decode("v = 1 # comment with bell\u{7}!").is_err());
    // Tab is the one permitted control character.
    assert_eq!(scalar("v = \"a\tb\""), Value::from("a\tb"));
    assert!(decode("v = 1 # tab\tis fine").is_ok());
}

#[test]
fn dotted_keys_merge() {
    let value = decoded("a.b.c = 1\na.b.d = 2");
    assert_eq!(
        value,
        toml_value!({ "a" = { "b" = { "c" = 1, "d" = 2 } } })
    );
}

#[test]
fn quoted_key_segments() {
    let value = decoded("site.\"google.com\" = true\n\"127.0.0.1\" = \"home\"");
    assert_eq!(
        value
            .get("site")
            .and_then(|s| s.get("google.com"))
            .and_then(Value::as_bool),
        Some(true)
    );
    assert_eq!(
        value.get("127.0.0.1").and_then(Value::as_str),
        Some("home")
    );
}

#[test]
fn all_digit_bare_keys() {
    let value = decoded("1234 = \"valid\"");
    assert_eq!(value.get("1234").and_then(Value::as_str), Some("valid"));
}

#[test]
fn array_of_tables_accumulates() {
    let value = decoded("[[fruit]]\nname = \"apple\"\n\n[[fruit]]\nname = \"banana\"");
    assert_eq!(
        value,
        toml_value!({
            "fruit" = [
                { "name" = "apple" },
                { "name" = "banana" }
            ]
        })
    );
}

#[test]
fn sub_table_after_array_table_extends_latest_element() {
    let value = decoded(
        "[[fruit]]\nname = \"apple\"\n\n[fruit.physical]\ncolor = \"red\"\nshape = \"round\"\n\n\
         [[fruit]]\nname = \"banana\"",
    );
    let fruit = value.get("fruit").and_then(Value::as_array).unwrap();
    assert_eq!(fruit.len(), 2);
    assert_eq!(
        fruit[0],
        toml_value!({
            "name" = "apple",
            "physical" = { "color" = "red", "shape" = "round" }
        })
    );
    assert_eq!(fruit[1], toml_value!({ "name" = "banana" }));
}

#[test]
fn repeated_standard_tables_with_disjoint_keys_merge() {
    let value = decoded("[a]\nx = 1\n[b]\ny = 2\n[a]\nz = 3");
    assert_eq!(value, toml_value!({ "a" = { "x" = 1, "z" = 3 }, "b" = { "y" = 2 } }));
}

#[test]
fn conflicting_redefinitions_are_rejected() {
    assert!(decode("a = 1\na = 2").is_err());
    assert!(decode("a = 1\n[a]\nb = 2").is_err());
    assert!(decode("[a]\nb = 1\n[[a]]\nc = 2").is_err());
    assert!(decode("a.b = 1\na.b.c = 2").is_err());
    assert!(decode("a = \"x\"\na.b = 1").is_err());
}

#[test]
fn arrays_with_newlines_comments_and_trailing_comma() {
    let value = decoded("v = [\n  1, # first\n  2, # second\n  3,\n]");
    assert_eq!(value.get("v"), Some(&toml_value!([1, 2, 3])));
}

#[test]
fn heterogeneous_and_nested_arrays() {
    let value = decoded("v = [1, \"two\", 3.0, [true]]");
    assert_eq!(
        value.get("v"),
        Some(&toml_value!([1, "two", 3.0, [true]]))
    );
}

#[test]
fn array_of_inline_tables() {
    let value = decoded("points = [ { x = 1, y = 2 }, { x = 7, y = 8 } ]");
    let points = value.get("points").and_then(Value::as_array).unwrap();
    assert_eq!(points[1], toml_value!({ "x" = 7, "y" = 8 }));
}

#[test]
fn temporal_boundaries() {
    // Day is a range check only; no calendar validation for local dates.
    assert!(decode("d = 2024-02-30").is_ok());
    assert!(decode("d = 2024-02-32").is_err());
    assert!(decode("d = 2024-13-01").is_err());

    assert!(decode("t = 25:00:00").is_err());
    assert!(decode("t = 00:60:00").is_err());

    let value = decoded("t = 00:00:00.123456");
    let time = value.get("t").and_then(Value::as_local_time).unwrap();
    assert_eq!(time.millisecond, 123, "fraction must truncate, not round");
}

#[test]
fn offset_date_time_forms() {
    for input in [
        "odt = 1979-05-27T07:32:00Z",
        "odt = 1979-05-27t07:32:00z",
        "odt = 1979-05-27 07:32:00Z",
    ] {
        let value = decoded(input);
        let odt = value
            .get("odt")
            .and_then(Value::as_offset_date_time)
            .unwrap();
        assert_eq!(odt.to_rfc3339(), "1979-05-27T07:32:00+00:00");
    }

    let value = decoded("odt = 1979-05-27T00:32:00.999999-07:00");
    let odt = value
        .get("odt")
        .and_then(Value::as_offset_date_time)
        .unwrap();
    assert_eq!(odt.timezone().local_minus_utc(), -7 * 3600);
}

#[test]
fn comment_only_and_blank_documents() {
    assert_eq!(decoded(""), toml_value!({}));
    assert_eq!(decoded("\n\n\n"), toml_value!({}));
    assert_eq!(decoded("# nothing here\n# at all"), toml_value!({}));
    assert_eq!(decoded("   \n\t\n"), toml_value!({}));
}

#[test]
fn junk_after_a_value_is_rejected() {
    assert!(decode("a = 1 2").is_err());
    assert!(decode("a = 1 b = 2").is_err());
    assert!(decode("[t] x = 1").is_err());
}

#[test]
fn unterminated_structures_are_rejected() {
    assert!(decode("a = [1, 2").is_err());
    assert!(decode("a = { x = 1").is_err());
    assert!(decode("a = \"abc").is_err());
    assert!(decode("[table").is_err());
}
