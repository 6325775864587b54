//! Generic `key=value` field splitting and lenient value coercion.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Start of a field: beginning of the body or a comma, then `key =`.
///
/// Anything else (including a bare comma) stays inside the current value.
static FIELD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|,)\s*(\w+)\s*=").expect("field pattern is valid"));

/// Fields of one event line, borrowed from the line itself
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> Fields<'a> {
    /// Split `body` into fields.
    ///
    /// A value runs until the next `, key=` boundary or the end of the
    /// body, so values may contain commas and `=` signs. Later duplicates
    /// win.
    pub fn parse(body: &'a str) -> Self {
        let starts: Vec<_> = FIELD_START.captures_iter(body).collect();
        let mut values = HashMap::with_capacity(starts.len());

        for (i, caps) in starts.iter().enumerate() {
            let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let value_end = starts
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(body.len(), |m| m.start());
            values.insert(key.as_str(), body[whole.end()..value_end].trim());
        }

        Self { values }
    }

    /// Raw value; empty values count as absent
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.values.get(key).copied().filter(|v| !v.is_empty())
    }

    pub fn string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(parse_int)
    }

    pub fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(parse_float)
    }

    /// `true` only for the literal string `true`
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse the leading integer of `s`, ignoring trailing garbage
/// (`"15m"` → 15, `"abc"` → None)
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Parse the leading decimal number of `s`, ignoring trailing garbage
/// (`"15.12m"` → 15.12, `".5"` → 0.5, `"x"` → None)
pub fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_start = end;
    end = digits(end);
    let mut mantissa_digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_fields() {
        let fields = Fields::parse("playerBiId=abc-123,channelId=0,message=hello,playerName=Bob,playerId=7");
        assert_eq!(fields.get("playerBiId"), Some("abc-123"));
        assert_eq!(fields.int("channelId"), Some(0));
        assert_eq!(fields.get("message"), Some("hello"));
        assert_eq!(fields.int("playerId"), Some(7));
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn test_spaced_fields() {
        let fields = Fields::parse("victimName = Sully___g, weaponName = AK-74, killDistance = 15.1267");
        assert_eq!(fields.get("victimName"), Some("Sully___g"));
        assert_eq!(fields.get("weaponName"), Some("AK-74"));
        assert_eq!(fields.float("killDistance"), Some(15.1267));
    }

    #[test]
    fn test_value_may_contain_commas_and_equals() {
        let fields = Fields::parse("message=hi, all, 2+2=4, playerId=3");
        assert_eq!(fields.get("message"), Some("hi, all, 2+2=4"));
        assert_eq!(fields.int("playerId"), Some(3));
    }

    #[test]
    fn test_comma_separated_list_value() {
        let fields = Fields::parse(
            "selectedEntityComponentsNames = Truck,Jeep, selectedEntityComponentsOwnersIds = 4,-1",
        );
        assert_eq!(fields.get("selectedEntityComponentsNames"), Some("Truck,Jeep"));
        assert_eq!(fields.get("selectedEntityComponentsOwnersIds"), Some("4,-1"));
    }

    #[test]
    fn test_missing_and_empty_values_are_absent() {
        let fields = Fields::parse("message=,playerId=7");
        assert_eq!(fields.get("message"), None);
        assert_eq!(fields.get("playerName"), None);
        assert_eq!(fields.int("playerName"), None);
        assert!(!fields.flag("isTeamKill"));
    }

    #[test]
    fn test_flags() {
        let fields = Fields::parse("a=true, b=false, c=TRUE");
        assert!(fields.flag("a"));
        assert!(!fields.flag("b"));
        assert!(!fields.flag("c"));
    }

    #[test]
    fn test_leading_garbage_is_ignored() {
        let fields = Fields::parse("no key here, playerId=5");
        assert_eq!(fields.int("playerId"), Some(5));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_parse_int_prefix_semantics() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("  -7"), Some(-7));
        assert_eq!(parse_int("15.9"), Some(15));
        assert_eq!(parse_int("12abc"), Some(12));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int("-"), None);
        assert_eq!(parse_int("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_float_prefix_semantics() {
        assert_eq!(parse_float("15.1267"), Some(15.1267));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("3."), Some(3.0));
        assert_eq!(parse_float("1e3m"), Some(1000.0));
        assert_eq!(parse_float("2e"), Some(2.0));
        assert_eq!(parse_float("-0.25x"), Some(-0.25));
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("NaN"), None);
    }
}
