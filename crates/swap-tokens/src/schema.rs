//! Token list schema validation.
//!
//! [`TokenListSchema`] enforces the published Uniswap token list schema and
//! reports every violation with an ajv-style data path, so a rejected list
//! can be diagnosed in one pass.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

const MAX_TOKENS: usize = 10_000;

/// A schema pattern: its published source text and the compiled regex.
struct Pattern {
    source: &'static str,
    regex: LazyLock<Regex>,
}

impl Pattern {
    fn is_match(&self, s: &str) -> bool {
        self.regex.is_match(s)
    }
}

// Published patterns use ECMAScript `\w`, which is ASCII-only.
fn ascii_words(source: &str) -> Regex {
    Regex::new(&source.replace(r"\w", "A-Za-z0-9_")).expect("valid schema pattern")
}

macro_rules! pattern {
    ($name:ident, $source:literal) => {
        static $name: Pattern = Pattern {
            source: $source,
            regex: LazyLock::new(|| ascii_words($source)),
        };
    };
}

pattern!(LIST_NAME, r"^[\w ]+$");
pattern!(TOKEN_NAME, r"^[ \w.'+\-%/À-ÖØ-öø-ÿ:&\[\]\(\)]+$");
pattern!(SYMBOL, r"^\S+$");
pattern!(ADDRESS, r"^0x[a-fA-F0-9]{40}$");
pattern!(TAG_ID, r"^[\w]+$");
pattern!(TAG_NAME, r"^[ \w]+$");
pattern!(TAG_DESCRIPTION, r"^[ \w\.,:]+$");

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"));

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Data path of the offending value, e.g. `.tokens[0].address`; empty for the root.
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.message)
    }
}

/// Join violations into the `"<path> <message>; ..."` form used in error messages.
pub fn format_violations(violations: &[SchemaViolation]) -> String {
    if violations.is_empty() {
        return "unknown error".to_string();
    }
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Trait for token list validators.
pub trait SchemaValidator: Send + Sync {
    /// Validate a parsed JSON document, returning every violation found.
    fn validate(&self, document: &Value) -> Result<(), Vec<SchemaViolation>>;
}

/// Validator for the Uniswap token list schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenListSchema;

impl SchemaValidator for TokenListSchema {
    fn validate(&self, document: &Value) -> Result<(), Vec<SchemaViolation>> {
        let mut checker = Checker::default();
        checker.token_list(document);
        if checker.violations.is_empty() {
            Ok(())
        } else {
            Err(checker.violations)
        }
    }
}

#[derive(Default)]
struct Checker {
    violations: Vec<SchemaViolation>,
}

impl Checker {
    fn fail(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(SchemaViolation {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn token_list(&mut self, value: &Value) {
        let Some(obj) = self.object(value, "") else {
            return;
        };
        self.required(obj, "", &["name", "timestamp", "version", "tokens"]);
        self.no_additional(
            obj,
            "",
            &["name", "timestamp", "version", "tokens", "keywords", "tags", "logoURI"],
        );

        if let Some(name) = obj.get("name") {
            self.string(name, ".name", 1, 20, Some(&LIST_NAME));
        }
        if let Some(timestamp) = obj.get("timestamp") {
            if let Some(s) = self.string(timestamp, ".timestamp", 0, usize::MAX, None) {
                if OffsetDateTime::parse(s, &Rfc3339).is_err() {
                    self.fail(".timestamp", "should match format \"date-time\"");
                }
            }
        }
        if let Some(version) = obj.get("version") {
            self.version(version);
        }
        if let Some(tokens) = obj.get("tokens") {
            if let Some(items) = self.array(tokens, ".tokens", 1, MAX_TOKENS) {
                for (i, token) in items.iter().enumerate() {
                    self.token(token, &format!(".tokens[{i}]"));
                }
            }
        }
        if let Some(keywords) = obj.get("keywords") {
            if let Some(items) = self.array(keywords, ".keywords", 0, 20) {
                for (i, keyword) in items.iter().enumerate() {
                    self.string(keyword, &format!(".keywords[{i}]"), 1, 20, Some(&LIST_NAME));
                }
            }
        }
        if let Some(tags) = obj.get("tags") {
            self.tag_definitions(tags);
        }
        if let Some(logo) = obj.get("logoURI") {
            self.uri(logo, ".logoURI");
        }
    }

    fn version(&mut self, value: &Value) {
        let Some(obj) = self.object(value, ".version") else {
            return;
        };
        self.required(obj, ".version", &["major", "minor", "patch"]);
        self.no_additional(obj, ".version", &["major", "minor", "patch"]);
        for key in ["major", "minor", "patch"] {
            if let Some(part) = obj.get(key) {
                self.integer(part, &format!(".version.{key}"), 0, None);
            }
        }
    }

    fn token(&mut self, value: &Value, path: &str) {
        let Some(obj) = self.object(value, path) else {
            return;
        };
        self.required(obj, path, &["chainId", "address", "decimals", "name", "symbol"]);
        self.no_additional(
            obj,
            path,
            &["chainId", "address", "decimals", "name", "symbol", "logoURI", "tags", "extensions"],
        );

        if let Some(chain_id) = obj.get("chainId") {
            self.integer(chain_id, &format!("{path}.chainId"), 1, None);
        }
        if let Some(address) = obj.get("address") {
            self.string(address, &format!("{path}.address"), 0, usize::MAX, Some(&ADDRESS));
        }
        if let Some(decimals) = obj.get("decimals") {
            self.integer(decimals, &format!("{path}.decimals"), 0, Some(255));
        }
        if let Some(name) = obj.get("name") {
            self.string(name, &format!("{path}.name"), 1, 40, Some(&TOKEN_NAME));
        }
        if let Some(symbol) = obj.get("symbol") {
            self.string(symbol, &format!("{path}.symbol"), 1, 20, Some(&SYMBOL));
        }
        if let Some(logo) = obj.get("logoURI") {
            self.uri(logo, &format!("{path}.logoURI"));
        }
        if let Some(tags) = obj.get("tags") {
            let tags_path = format!("{path}.tags");
            if let Some(items) = self.array(tags, &tags_path, 0, 10) {
                for (i, tag) in items.iter().enumerate() {
                    self.string(tag, &format!("{tags_path}[{i}]"), 1, 10, Some(&TAG_ID));
                }
            }
        }
        if let Some(extensions) = obj.get("extensions") {
            self.object(extensions, &format!("{path}.extensions"));
        }
    }

    fn tag_definitions(&mut self, value: &Value) {
        let Some(obj) = self.object(value, ".tags") else {
            return;
        };
        if obj.len() > 20 {
            self.fail(".tags", "should NOT have more than 20 properties");
        }
        for (id, definition) in obj {
            let path = format!(".tags{}", property_path(id));
            if !TAG_ID.is_match(id) || id.chars().count() > 10 {
                self.fail(".tags", "property name is invalid");
            }
            let Some(def) = self.object(definition, &path) else {
                continue;
            };
            self.required(def, &path, &["name", "description"]);
            self.no_additional(def, &path, &["name", "description"]);
            if let Some(name) = def.get("name") {
                self.string(name, &format!("{path}.name"), 1, 20, Some(&TAG_NAME));
            }
            if let Some(description) = def.get("description") {
                self.string(
                    description,
                    &format!("{path}.description"),
                    1,
                    200,
                    Some(&TAG_DESCRIPTION),
                );
            }
        }
    }

    fn object<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v Map<String, Value>> {
        let obj = value.as_object();
        if obj.is_none() {
            self.fail(path, "should be object");
        }
        obj
    }

    fn array<'v>(
        &mut self,
        value: &'v Value,
        path: &str,
        min: usize,
        max: usize,
    ) -> Option<&'v Vec<Value>> {
        let Some(items) = value.as_array() else {
            self.fail(path, "should be array");
            return None;
        };
        if items.len() < min {
            self.fail(path, format!("should NOT have fewer than {min} items"));
        }
        if items.len() > max {
            self.fail(path, format!("should NOT have more than {max} items"));
        }
        Some(items)
    }

    fn string<'v>(
        &mut self,
        value: &'v Value,
        path: &str,
        min: usize,
        max: usize,
        pattern: Option<&'static Pattern>,
    ) -> Option<&'v str> {
        let Some(s) = value.as_str() else {
            self.fail(path, "should be string");
            return None;
        };
        let len = s.chars().count();
        if len < min {
            self.fail(path, format!("should NOT be shorter than {min} characters"));
        }
        if len > max {
            self.fail(path, format!("should NOT be longer than {max} characters"));
        }
        if let Some(pattern) = pattern {
            if !pattern.is_match(s) {
                self.fail(path, format!("should match pattern \"{}\"", pattern.source));
            }
        }
        Some(s)
    }

    fn integer(&mut self, value: &Value, path: &str, min: i64, max: Option<i64>) {
        let Some(n) = as_integer(value) else {
            self.fail(path, "should be integer");
            return;
        };
        if n < i128::from(min) {
            self.fail(path, format!("should be >= {min}"));
        }
        if let Some(max) = max {
            if n > i128::from(max) {
                self.fail(path, format!("should be <= {max}"));
            }
        }
    }

    fn uri(&mut self, value: &Value, path: &str) {
        if let Some(s) = self.string(value, path, 0, usize::MAX, None) {
            if url::Url::parse(s).is_err() {
                self.fail(path, "should match format \"uri\"");
            }
        }
    }

    fn required(&mut self, obj: &Map<String, Value>, path: &str, keys: &[&str]) {
        for key in keys {
            if !obj.contains_key(*key) {
                self.fail(path, format!("should have required property '{key}'"));
            }
        }
    }

    fn no_additional(&mut self, obj: &Map<String, Value>, path: &str, allowed: &[&str]) {
        if obj.keys().any(|k| !allowed.contains(&k.as_str())) {
            self.fail(path, "should NOT have additional properties");
        }
    }
}

/// JSON numbers with no fractional part count as integers.
fn as_integer(value: &Value) -> Option<i128> {
    if let Some(n) = value.as_i64() {
        return Some(i128::from(n));
    }
    if let Some(n) = value.as_u64() {
        return Some(i128::from(n));
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && f.is_finite())
        .map(|f| f as i128)
}

fn property_path(key: &str) -> String {
    if IDENTIFIER.is_match(key) {
        format!(".{key}")
    } else {
        format!("['{}']", key.replace('\'', "\\'"))
    }
}
