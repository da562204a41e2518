//! Built-in decode strategies
//!
//! Predicates and parsers for the default strategy chain. The chain
//! order matters: strict JSON runs before the repairing variant, and
//! numbers before booleans so `1`/`0` decode as numbers.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use relay_domain::DecodedValue;

use super::{Strategy, StrategyKind, ValueDecoder};

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d*\.?\d+([eE][+-]?\d+)?$").unwrap_or_else(|e| unreachable!("{e}"))
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(T\d{2}:\d{2}:\d{2}(\.\d{3})?Z?)?$")
        .unwrap_or_else(|e| unreachable!("{e}"))
});

static UNQUOTED_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([\[{,]\s*)([A-Za-z0-9_$]+)\s*:"#).unwrap_or_else(|e| unreachable!("{e}"))
});

static SINGLE_QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*'([^']*)'").unwrap_or_else(|e| unreachable!("{e}")));

static BARE_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":\s*([A-Za-z][A-Za-z0-9_]*)\s*([,}\]])").unwrap_or_else(|e| unreachable!("{e}"))
});

static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap_or_else(|e| unreachable!("{e}")));

const BOOLEAN_TOKENS: [(&str, bool); 8] = [
    ("true", true),
    ("false", false),
    ("yes", true),
    ("no", false),
    ("on", true),
    ("off", false),
    ("1", true),
    ("0", false),
];

/// The default strategy chain in priority order.
pub(super) fn defaults() -> Vec<Strategy> {
    let built_ins = [
        ("json-strict", 1, StrategyKind::JsonStrict),
        ("json-sloppy", 2, StrategyKind::JsonSloppy),
        ("number", 3, StrategyKind::Number),
        ("boolean", 4, StrategyKind::Boolean),
        ("date-iso", 5, StrategyKind::IsoDate),
        ("url", 6, StrategyKind::AbsoluteUrl),
        ("csv-list", 7, StrategyKind::CommaList),
        ("null", 8, StrategyKind::NullLike),
    ];
    built_ins
        .into_iter()
        .map(|(name, priority, kind)| Strategy {
            name: name.to_string(),
            priority,
            kind,
        })
        .collect()
}

pub(super) fn can_parse(kind: &StrategyKind, s: &str) -> bool {
    match kind {
        StrategyKind::JsonStrict => {
            (s.starts_with('{') && s.ends_with('}')) || (s.starts_with('[') && s.ends_with(']'))
        }
        StrategyKind::JsonSloppy => s.contains(['{', '[', ':', ',']),
        StrategyKind::Number => NUMBER_RE.is_match(s),
        StrategyKind::Boolean => BOOLEAN_TOKENS
            .iter()
            .any(|(token, _)| s.eq_ignore_ascii_case(token)),
        StrategyKind::IsoDate => DATE_RE.is_match(s),
        StrategyKind::AbsoluteUrl => {
            (s.starts_with("http://") || s.starts_with("https://")) && url::Url::parse(s).is_ok()
        }
        StrategyKind::CommaList => s.contains(',') && !s.contains(['{', '[']),
        StrategyKind::NullLike => {
            s.eq_ignore_ascii_case("null")
                || s.eq_ignore_ascii_case("undefined")
                || s.eq_ignore_ascii_case("none")
        }
        StrategyKind::Custom { .. } => false,
    }
}

pub(super) fn parse(
    kind: &StrategyKind,
    s: &str,
    decoder: &ValueDecoder,
) -> Result<DecodedValue, String> {
    match kind {
        StrategyKind::JsonStrict => serde_json::from_str(s)
            .map(DecodedValue::Json)
            .map_err(|e| e.to_string()),
        StrategyKind::JsonSloppy => {
            let repaired = repair_json(s);
            serde_json::from_str(&repaired)
                .map(DecodedValue::Json)
                .map_err(|e| e.to_string())
        }
        StrategyKind::Number => parse_number(s),
        StrategyKind::Boolean => BOOLEAN_TOKENS
            .iter()
            .find(|(token, _)| s.eq_ignore_ascii_case(token))
            .map(|(_, value)| DecodedValue::Bool(*value))
            .ok_or_else(|| format!("not a boolean token: {s}")),
        StrategyKind::IsoDate => parse_iso_date(s),
        StrategyKind::AbsoluteUrl => url::Url::parse(s)
            .map(DecodedValue::Url)
            .map_err(|e| e.to_string()),
        StrategyKind::CommaList => {
            let items = s
                .split(',')
                .map(|item| decoder.decode(item))
                .collect();
            Ok(DecodedValue::List(items))
        }
        StrategyKind::NullLike => Ok(DecodedValue::Null),
        StrategyKind::Custom { .. } => Err("custom strategy without parser".to_string()),
    }
}

fn parse_number(s: &str) -> Result<DecodedValue, String> {
    if !s.contains(['.', 'e', 'E']) {
        if let Ok(int) = s.parse::<i64>() {
            return Ok(DecodedValue::Number(serde_json::Number::from(int)));
        }
    }
    let float = s.parse::<f64>().map_err(|e| e.to_string())?;
    serde_json::Number::from_f64(float)
        .map(DecodedValue::Number)
        .ok_or_else(|| format!("non-finite number: {s}"))
}

fn parse_iso_date(s: &str) -> Result<DecodedValue, String> {
    if s.len() == 10 {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| e.to_string())?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("invalid date: {s}"))?;
        return Ok(DecodedValue::DateTime(midnight.and_utc()));
    }

    let bare = s.strip_suffix('Z').unwrap_or(s);
    let format = if bare.contains('.') {
        "%Y-%m-%dT%H:%M:%S%.3f"
    } else {
        "%Y-%m-%dT%H:%M:%S"
    };
    NaiveDateTime::parse_from_str(bare, format)
        .map(|dt| DecodedValue::DateTime(dt.and_utc()))
        .map_err(|e| e.to_string())
}

/// Applies the fixed repair sequence for JSON-like text: quote bare
/// keys, rewrite single-quoted values, quote bare word values, strip
/// trailing commas, and wrap a top-level `key: value` body in braces.
///
/// Wrapping runs after the other repairs, so a brace-less body keeps
/// its keys unquoted and fails the parse. Only text that already
/// carried braces or brackets gets a working repair.
fn repair_json(s: &str) -> String {
    let text = UNQUOTED_KEY_RE.replace_all(s, "$1\"$2\":");
    let text = SINGLE_QUOTED_RE.replace_all(&text, ": \"$1\"");
    let text = BARE_WORD_RE.replace_all(&text, ": \"$1\"$2");
    let text = TRAILING_COMMA_RE.replace_all(&text, "$1").into_owned();
    if !text.starts_with('{') && !text.starts_with('[') && text.contains(':') {
        return format!("{{{text}}}");
    }
    text
}
