//! Declarative parameter validation.
//!
//! # Design
//! Validation rules are data, not code: each request shape declares a
//! `'static` table of `Rule` values keyed by wire name, and `validate`
//! walks the request's field descriptors against that table. A new request
//! shape only needs a new table. Validation is exhaustive: every failed
//! check contributes one message to the report, in field order, so a caller
//! sees all problems in a single pass.
//!
//! Format patterns are compiled once per process and never mutated.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::params::Field;

/// Semantic type a rule applies to. Drives which checks run against the
/// field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Integer,
    Number,
}

/// Wire formats with a fixed validation pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Email,
    Url,
    Ip,
    Date,
    HexColor,
}

impl Format {
    /// Identifier used in violation messages.
    pub fn name(self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::Url => "url",
            Format::Ip => "ip",
            Format::Date => "date",
            Format::HexColor => "hexColor",
        }
    }

    /// Compiled pattern for this format.
    fn pattern(self) -> &'static Regex {
        match self {
            Format::Email => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
            }
            Format::Url => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| Regex::new(r"^https?://.+").unwrap())
            }
            Format::Ip => {
                // Strict dotted-quad IPv4 or uncompressed 8-group IPv6.
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| {
                    Regex::new(
                        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$|^([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$",
                    )
                    .unwrap()
                })
            }
            Format::Date => {
                // Digit grouping only; calendar validity is the server's
                // concern.
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
            }
            Format::HexColor => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap())
            }
        }
    }

    /// Whether `value` matches this format's pattern.
    pub fn matches(self, value: &str) -> bool {
        self.pattern().is_match(value)
    }
}

/// Declarative constraint set for one wire parameter.
///
/// Const-constructible so rule tables can be `'static` constants defined
/// once per request shape.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub kind: ValueKind,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub format: Option<Format>,
    pub allowed: &'static [&'static str],
}

impl Rule {
    pub const fn new(name: &'static str, kind: ValueKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            min: None,
            max: None,
            min_len: None,
            max_len: None,
            format: None,
            allowed: &[],
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub const fn length(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = Some(min_len);
        self.max_len = Some(max_len);
        self
    }

    pub const fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub const fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = allowed;
        self
    }
}

/// One or more constraint violations from a single validation pass.
///
/// Ordering follows field declaration order, then the per-field check order
/// (required, bounds/length, format, enum membership).
#[derive(Debug, Clone)]
pub struct ValidationError {
    violations: Vec<String>,
}

impl ValidationError {
    pub fn violations(&self) -> &[String] {
        &self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.violations.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Check every field against the rule table, collecting all violations.
///
/// Fields without a matching rule are skipped. A required field at its
/// unset value fails with a single message and no further checks; an
/// optional unset field is always valid. Numeric bounds are inclusive.
pub fn validate(fields: &[Field], rules: &[Rule]) -> Result<(), ValidationError> {
    if rules.is_empty() {
        return Ok(());
    }

    let mut violations = Vec::new();
    for field in fields {
        let Some(rule) = rules.iter().find(|r| r.name == field.name) else {
            continue;
        };

        if field.value.is_unset() {
            if rule.required {
                violations.push(format!("Required parameter [{}] is missing", field.name));
            }
            continue;
        }

        match rule.kind {
            ValueKind::Integer | ValueKind::Number => {
                let value = field.value.as_number();
                if let Some(min) = rule.min {
                    if value < min {
                        violations.push(format!(
                            "Parameter [{}] must be at least {min}",
                            field.name
                        ));
                    }
                }
                if let Some(max) = rule.max {
                    if value > max {
                        violations.push(format!(
                            "Parameter [{}] must be at most {max}",
                            field.name
                        ));
                    }
                }
            }
            ValueKind::String => {
                let value = field.value.as_text();
                if let Some(min_len) = rule.min_len {
                    if value.len() < min_len {
                        violations.push(format!(
                            "Parameter [{}] must be at least {min_len} characters",
                            field.name
                        ));
                    }
                }
                if let Some(max_len) = rule.max_len {
                    if value.len() > max_len {
                        violations.push(format!(
                            "Parameter [{}] must be at most {max_len} characters",
                            field.name
                        ));
                    }
                }
                if let Some(format) = rule.format {
                    if !format.matches(value) {
                        violations.push(format!(
                            "Parameter [{}] must be a valid {}",
                            field.name,
                            format.name()
                        ));
                    }
                }
            }
        }

        if !rule.allowed.is_empty() {
            let value = field.value.to_string();
            if !rule.allowed.contains(&value.as_str()) {
                violations.push(format!(
                    "Parameter [{}] must be one of: {}",
                    field.name,
                    rule.allowed.join(", ")
                ));
            }
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}
