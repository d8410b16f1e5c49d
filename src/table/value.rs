use std::fmt::Display;

/// A single cell value in a table.
///
/// Uploaded tabular data is loosely typed: a column may mix numbers, text and
/// empty cells. `Missing` is the canonical empty/missing marker; decoded
/// content never stores a NaN number.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Empty or missing cell
    #[default]
    Missing,
    /// Numeric value
    Number(f64),
    /// Boolean value (native to spreadsheet formats)
    Boolean(bool),
    /// Text value
    Text(String),
}

impl Value {
    /// Parses a raw text field into a typed value.
    ///
    /// Blank and not-a-number markers become `Missing`, values that parse as a
    /// finite or infinite float become `Number`, everything else stays `Text`.
    pub fn parse(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Value::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if !number.is_nan() => Value::Number(number),
            _ => Value::Text(raw.to_owned()),
        }
    }

    /// Returns true if the value is the missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Returns the numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// Returns true if the value can belong to a numeric column (number or missing).
    pub(crate) fn is_numeric_or_missing(&self) -> bool {
        matches!(self, Value::Number(_) | Value::Missing)
    }

    /// Canonical token used to compare rows for full-row equality.
    /// Tags each variant so `Text("1")` and `Number(1.0)` never collide.
    pub(crate) fn dedup_token(&self) -> String {
        match self {
            Value::Missing => "m".to_owned(),
            Value::Number(number) => format!("n{:016x}", number.to_bits()),
            Value::Boolean(boolean) => format!("b{}", boolean),
            Value::Text(text) => format!("t{}", text),
        }
    }

    /// Formats a number without a trailing fractional part when it is integral.
    fn format_number(number: f64) -> String {
        if number.fract() == 0.0 && number.is_finite() && number.abs() < 1e15 {
            format!("{}", number as i64)
        } else {
            format!("{}", number)
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => write!(f, ""),
            Value::Number(number) => write!(f, "{}", Value::format_number(*number)),
            Value::Boolean(boolean) => write!(f, "{}", boolean),
            Value::Text(text) => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_blank_is_missing() {
        assert_eq!(Value::parse(""), Value::Missing);
        assert_eq!(Value::parse("   "), Value::Missing);
        assert_eq!(Value::parse("NaN"), Value::Missing);
    }

    #[test]
    fn parse_number() {
        assert_eq!(Value::parse("1"), Value::Number(1.0));
        assert_eq!(Value::parse("-2.5"), Value::Number(-2.5));
        assert_eq!(Value::parse(" 42 "), Value::Number(42.0));
    }

    #[test]
    fn parse_text() {
        assert_eq!(Value::parse("abc"), Value::Text("abc".to_owned()));
        assert_eq!(Value::parse("1,2"), Value::Text("1,2".to_owned()));
    }

    #[test]
    fn display_integral_number_without_fraction() {
        assert_eq!(Value::Number(1.0).to_string(), "1");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn dedup_token_distinguishes_types() {
        assert_ne!(Value::Number(1.0).dedup_token(), Value::Text("1".to_owned()).dedup_token());
        assert_ne!(Value::Missing.dedup_token(), Value::Text("".to_owned()).dedup_token());
    }
}
