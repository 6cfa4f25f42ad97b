/// Builds a [`Value`](crate::Value) from TOML-shaped syntax.
///
/// Inline tables use `=` between key literals and values, like TOML itself.
///
/// # Examples
///
/// ```rust
/// use toml_decode::toml_value;
///
/// let value = toml_value!({
///     "name" = "Alice",
///     "port" = 8080,
///     "tags" = ["admin", "ops"],
///     "limits" = { "cpu" = 1.5, "strict" = true }
/// });
///
/// assert_eq!(
///     value.get("limits").and_then(|l| l.get("cpu")).and_then(|c| c.as_float()),
///     Some(1.5)
/// );
/// ```
#[macro_export]
macro_rules! toml_value {
    // Handle true
    (true) => {
        $crate::Value::Boolean(true)
    };

    // Handle false
    (false) => {
        $crate::Value::Boolean(false)
    };

    // Handle empty array
    ([]) => {
        $crate::Value::Array(vec![])
    };

    // Handle non-empty array
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toml_value!($elem)),*])
    };

    // Handle empty table
    ({}) => {
        $crate::Value::Table($crate::TomlMap::new())
    };

    // Handle non-empty table
    ({ $($key:literal = $value:tt),* $(,)? }) => {{
        let mut table = $crate::TomlMap::new();
        $(
            table.insert($key.to_string(), $crate::toml_value!($value));
        )*
        $crate::Value::Table(table)
    }};

    // Fallback: anything with a From conversion into Value
    ($other:expr) => {
        $crate::Value::from($other)
    };
}
