//! Adaptive value decoder
//!
//! Turns raw text into a best-guess typed value by trying an ordered
//! chain of interpretation strategies. The chain is an owned, mutable
//! registry: strategies can be added or removed at runtime, and the
//! first whose predicate matches wins. A strategy whose parse fails
//! falls through to the next one; when nothing matches, the trimmed
//! original string is returned.

mod strategies;

use relay_domain::{DecodedValue, ParseResult};

/// How a strategy recognizes and parses candidate text.
///
/// Built-in variants carry their own compiled state; `Custom` carries
/// caller-supplied closures for runtime registration.
pub enum StrategyKind {
    /// Strict JSON: `{...}` or `[...]` parsed literally.
    JsonStrict,
    /// JSON with a fixed sequence of textual repairs applied first.
    JsonSloppy,
    /// Numeric literal (integer, decimal, exponential).
    Number,
    /// Boolean-like tokens (`true/false/yes/no/on/off/1/0`).
    Boolean,
    /// ISO-8601-shaped date or date-time.
    IsoDate,
    /// Well-formed absolute URL.
    AbsoluteUrl,
    /// Comma-separated list without brace/bracket characters.
    CommaList,
    /// The literal tokens `null`/`undefined`/`none`.
    NullLike,
    /// A caller-registered strategy.
    Custom {
        /// Predicate deciding whether this strategy applies.
        can_parse: Box<dyn Fn(&str) -> bool + Send + Sync>,
        /// Parser; an `Err` falls through to the next strategy.
        parse: Box<dyn Fn(&str) -> Result<DecodedValue, String> + Send + Sync>,
    },
}

impl std::fmt::Debug for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::JsonStrict => "JsonStrict",
            Self::JsonSloppy => "JsonSloppy",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::IsoDate => "IsoDate",
            Self::AbsoluteUrl => "AbsoluteUrl",
            Self::CommaList => "CommaList",
            Self::NullLike => "NullLike",
            Self::Custom { .. } => "Custom",
        };
        f.write_str(name)
    }
}

/// One entry in the decoder's strategy chain.
#[derive(Debug)]
pub struct Strategy {
    /// Registration name, used for removal and diagnostics.
    pub name: String,
    /// Evaluation order; lower runs first.
    pub priority: i32,
    /// The matching/parsing behavior.
    pub kind: StrategyKind,
}

impl Strategy {
    /// Creates a custom strategy from closures.
    #[must_use]
    pub fn custom<C, P>(name: impl Into<String>, priority: i32, can_parse: C, parse: P) -> Self
    where
        C: Fn(&str) -> bool + Send + Sync + 'static,
        P: Fn(&str) -> Result<DecodedValue, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            priority,
            kind: StrategyKind::Custom {
                can_parse: Box::new(can_parse),
                parse: Box::new(parse),
            },
        }
    }

    fn can_parse(&self, candidate: &str) -> bool {
        match &self.kind {
            StrategyKind::Custom { can_parse, .. } => can_parse(candidate),
            kind => strategies::can_parse(kind, candidate),
        }
    }

    fn parse(&self, candidate: &str, decoder: &ValueDecoder) -> Result<DecodedValue, String> {
        match &self.kind {
            StrategyKind::Custom { parse, .. } => parse(candidate),
            kind => strategies::parse(kind, candidate, decoder),
        }
    }
}

/// The strategy registry and decode entry points.
#[derive(Debug)]
pub struct ValueDecoder {
    strategies: Vec<Strategy>,
}

impl ValueDecoder {
    /// Creates a decoder with the default strategy chain registered.
    #[must_use]
    pub fn new() -> Self {
        let mut decoder = Self {
            strategies: Vec::new(),
        };
        for strategy in strategies::defaults() {
            decoder.register(strategy);
        }
        decoder
    }

    /// Creates a decoder with no strategies; every input decodes to its
    /// trimmed self until strategies are registered.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Registers a strategy and re-sorts the chain by ascending
    /// priority. The sort is stable: equal priorities keep their
    /// registration order.
    pub fn register(&mut self, strategy: Strategy) {
        self.strategies.push(strategy);
        self.strategies.sort_by_key(|s| s.priority);
    }

    /// Removes the strategy registered under `name`.
    ///
    /// Returns true if an entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.strategies.len();
        self.strategies.retain(|s| s.name != name);
        self.strategies.len() != before
    }

    /// Returns the registered strategy names in evaluation order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name.as_str()).collect()
    }

    /// Decodes raw text into a typed value.
    #[must_use]
    pub fn decode(&self, raw: &str) -> DecodedValue {
        self.decode_with_detail(raw).value
    }

    /// Decodes raw text, reporting which strategy produced the value.
    #[must_use]
    pub fn decode_with_detail(&self, raw: &str) -> ParseResult {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ParseResult::fallback(trimmed, None);
        }

        let mut last_error = None;
        for strategy in &self.strategies {
            if !strategy.can_parse(trimmed) {
                continue;
            }
            match strategy.parse(trimmed, self) {
                Ok(value) => return ParseResult::matched(value, strategy.name.clone()),
                Err(error) => {
                    tracing::debug!(strategy = %strategy.name, %error, "decode strategy failed");
                    last_error = Some(error);
                }
            }
        }

        ParseResult::fallback(trimmed, last_error)
    }
}

impl Default for ValueDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_number_decoding() {
        let decoder = ValueDecoder::new();
        assert_eq!(
            decoder.decode("42"),
            DecodedValue::Number(serde_json::Number::from(42))
        );
        assert_eq!(decoder.decode("-3.5").as_f64(), Some(-3.5));
        assert_eq!(decoder.decode("1e3").as_f64(), Some(1000.0));
    }

    #[test]
    fn test_boolean_decoding() {
        let decoder = ValueDecoder::new();
        assert_eq!(decoder.decode("true"), DecodedValue::Bool(true));
        assert_eq!(decoder.decode("No"), DecodedValue::Bool(false));
        assert_eq!(decoder.decode("ON"), DecodedValue::Bool(true));
        // "1" matches the number strategy first, as in the original chain.
        assert_eq!(
            decoder.decode("1"),
            DecodedValue::Number(serde_json::Number::from(1))
        );
    }

    #[test]
    fn test_strict_json() {
        let decoder = ValueDecoder::new();
        let result = decoder.decode_with_detail(r#"{"a": 1}"#);
        assert_eq!(result.strategy, "json-strict");
        assert_eq!(result.value, DecodedValue::Json(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_sloppy_json() {
        let decoder = ValueDecoder::new();
        let result = decoder.decode_with_detail("{a:1}");
        assert_eq!(result.strategy, "json-sloppy");
        assert_eq!(result.value, DecodedValue::Json(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_braceless_pair_stays_text() {
        // Key quoting happens before the brace wrap, so a top-level
        // bare key never gets quoted and the repair fails; the text
        // reaches the string fallback intact.
        let decoder = ValueDecoder::new();
        let result = decoder.decode_with_detail("a: 1");
        assert_eq!(result.strategy, "string");
        assert_eq!(result.value, DecodedValue::Text("a: 1".to_string()));
    }

    #[test]
    fn test_null_tokens() {
        let decoder = ValueDecoder::new();
        assert_eq!(decoder.decode("null"), DecodedValue::Null);
        assert_eq!(decoder.decode("UNDEFINED"), DecodedValue::Null);
        assert_eq!(decoder.decode("none"), DecodedValue::Null);
    }

    #[test]
    fn test_string_fallback() {
        let decoder = ValueDecoder::new();
        let result = decoder.decode_with_detail("hello");
        assert_eq!(result.strategy, "string");
        assert_eq!(result.value, DecodedValue::Text("hello".to_string()));
        assert_eq!(decoder.decode("  padded  "), DecodedValue::Text("padded".to_string()));
    }

    #[test]
    fn test_comma_list_recurses() {
        let decoder = ValueDecoder::new();
        let value = decoder.decode("1, true, hello");
        assert_eq!(
            value,
            DecodedValue::List(vec![
                DecodedValue::Number(serde_json::Number::from(1)),
                DecodedValue::Bool(true),
                DecodedValue::Text("hello".to_string()),
            ])
        );
    }

    #[test]
    fn test_idempotent_canonical_json() {
        let decoder = ValueDecoder::new();
        let canonical = r#"{"a":1,"b":[2,3]}"#;
        let first = decoder.decode(canonical);
        let second = decoder.decode(canonical);
        assert_eq!(first, second);
    }

    #[test]
    fn test_register_and_remove() {
        let mut decoder = ValueDecoder::new();
        // Hex color strategy ahead of the number strategy.
        decoder.register(Strategy::custom(
            "hex-color",
            0,
            |s| s.starts_with('#') && s.len() == 7,
            |s| Ok(DecodedValue::Text(s.to_uppercase())),
        ));
        assert_eq!(decoder.strategy_names()[0], "hex-color");
        assert_eq!(
            decoder.decode("#ff00aa"),
            DecodedValue::Text("#FF00AA".to_string())
        );

        assert!(decoder.remove("hex-color"));
        assert!(!decoder.remove("hex-color"));
        assert_eq!(
            decoder.decode("#ff00aa"),
            DecodedValue::Text("#ff00aa".to_string())
        );
    }

    #[test]
    fn test_failing_strategy_falls_through() {
        let mut decoder = ValueDecoder::empty();
        decoder.register(Strategy::custom(
            "always-fails",
            1,
            |_| true,
            |_| Err("nope".to_string()),
        ));
        let result = decoder.decode_with_detail("value");
        assert_eq!(result.strategy, "string");
        assert_eq!(result.error, Some("nope".to_string()));
    }
}
