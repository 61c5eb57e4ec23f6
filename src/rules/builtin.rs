use super::{Rule, RuleFactory, RuleParam, RuleParamError};

use regex::Regex;

pub(super) fn register_all(factory: &mut RuleFactory) {
    factory
        .register("int", |params| no_params("int", params).map(|()| IntegerRule))
        .register("numeric", |params| {
            no_params("numeric", params).map(|()| NumericRule)
        })
        .register("alpha", |params| no_params("alpha", params).map(|()| AlphaRule))
        .register("alphanumeric", |params| {
            no_params("alphanumeric", params).map(|()| AlphanumericRule)
        })
        .register("between", BetweenRule::from_params)
        .register("in", |params| Ok(InRule::new(strings(params))))
        .register("notIn", |params| Ok(NotInRule::new(strings(params))))
        .register("regex", RegexRule::from_params)
        .register("uuidv4", |params| {
            no_params("uuidv4", params).map(|()| UuidV4Rule::new())
        });

    #[cfg(feature = "date-rule")]
    factory.register("date", DateRule::from_params);
}

fn no_params(rule: &str, params: &[RuleParam]) -> Result<(), RuleParamError> {
    if params.is_empty() {
        Ok(())
    } else {
        Err(RuleParamError::new(format!("{} takes no parameters", rule)))
    }
}

fn strings(params: &[RuleParam]) -> Vec<String> {
    params.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerRule;

impl Rule for IntegerRule {
    fn matches(&self, value: &str) -> bool {
        value.parse::<i64>().is_ok()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumericRule;

impl Rule for NumericRule {
    fn matches(&self, value: &str) -> bool {
        value.parse::<f64>().map_or(false, f64::is_finite)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaRule;

impl Rule for AlphaRule {
    fn matches(&self, value: &str) -> bool {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumericRule;

impl Rule for AlphanumericRule {
    fn matches(&self, value: &str) -> bool {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

/// `between(min, max)` or `between(min, max, false)` for an exclusive range.
#[derive(Debug, Clone, Copy)]
pub struct BetweenRule {
    min: f64,
    max: f64,
    inclusive: bool,
}

impl BetweenRule {
    pub fn new(min: f64, max: f64, inclusive: bool) -> Self {
        Self {
            min,
            max,
            inclusive,
        }
    }

    fn from_params(params: &[RuleParam]) -> Result<Self, RuleParamError> {
        let bound = |p: &RuleParam| {
            p.as_f64()
                .ok_or_else(|| RuleParamError::new(format!("between bound {:?} is not a number", p)))
        };
        let (min, max, inclusive) = match params {
            [min, max] => (bound(min)?, bound(max)?, true),
            [min, max, inclusive] => {
                let inclusive = match inclusive {
                    RuleParam::Int(i) => *i != 0,
                    RuleParam::Str(s) if s == "true" => true,
                    RuleParam::Str(s) if s == "false" => false,
                    other => {
                        return Err(RuleParamError::new(format!(
                            "between inclusivity {:?} is not a boolean",
                            other
                        )))
                    }
                };
                (bound(min)?, bound(max)?, inclusive)
            }
            _ => return Err(RuleParamError::new("between takes a min, a max and an optional inclusivity flag")),
        };
        Ok(Self::new(min, max, inclusive))
    }
}

impl Rule for BetweenRule {
    fn matches(&self, value: &str) -> bool {
        let n: f64 = match value.parse() {
            Ok(n) => n,
            Err(_) => return false,
        };
        if self.inclusive {
            self.min <= n && n <= self.max
        } else {
            self.min < n && n < self.max
        }
    }
}

#[derive(Debug, Clone)]
pub struct InRule {
    values: Vec<String>,
}

impl InRule {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }
}

impl Rule for InRule {
    fn matches(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

#[derive(Debug, Clone)]
pub struct NotInRule {
    values: Vec<String>,
}

impl NotInRule {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }
}

impl Rule for NotInRule {
    fn matches(&self, value: &str) -> bool {
        !self.values.iter().any(|v| v == value)
    }
}

/// Unanchored: write `^...$` to match the whole value.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
}

impl RegexRule {
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }

    fn from_params(params: &[RuleParam]) -> Result<Self, RuleParamError> {
        match params {
            [RuleParam::Str(pattern)] => Regex::new(pattern)
                .map(Self::new)
                .map_err(|e| RuleParamError::new(e.to_string())),
            _ => Err(RuleParamError::new("regex takes a single pattern string")),
        }
    }
}

impl Rule for RegexRule {
    fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

#[derive(Debug, Clone)]
pub struct UuidV4Rule {
    regex: Regex,
}

impl Default for UuidV4Rule {
    fn default() -> Self {
        Self::new()
    }
}

impl UuidV4Rule {
    const PATTERN: &'static str = r"(?i)^\{?[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}\}?$";

    pub fn new() -> Self {
        Self {
            regex: Regex::new(Self::PATTERN).expect("uuid pattern is valid"),
        }
    }
}

impl Rule for UuidV4Rule {
    fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Accepts values that parse with any of the given `chrono` format strings.
#[cfg(feature = "date-rule")]
#[derive(Debug, Clone)]
pub struct DateRule {
    formats: Vec<String>,
}

#[cfg(feature = "date-rule")]
impl DateRule {
    pub fn new(formats: Vec<String>) -> Self {
        Self { formats }
    }

    fn from_params(params: &[RuleParam]) -> Result<Self, RuleParamError> {
        if params.is_empty() {
            return Err(RuleParamError::new("date takes at least one format"));
        }
        Ok(Self::new(strings(params)))
    }
}

#[cfg(feature = "date-rule")]
impl Rule for DateRule {
    fn matches(&self, value: &str) -> bool {
        use chrono::{NaiveDate, NaiveDateTime};

        self.formats.iter().any(|format| {
            NaiveDateTime::parse_from_str(value, format).is_ok()
                || NaiveDate::parse_from_str(value, format).is_ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_is_inclusive_by_default() {
        let factory = RuleFactory::default();
        let rule = factory
            .create_rule("between", &[RuleParam::Int(1), RuleParam::Int(10)])
            .unwrap();
        assert!(rule.matches("1"));
        assert!(rule.matches("10"));
        assert!(!rule.matches("11"));
        assert!(!rule.matches("ten"));

        let rule = factory
            .create_rule(
                "between",
                &[RuleParam::Int(1), RuleParam::Int(10), RuleParam::Str("false".into())],
            )
            .unwrap();
        assert!(!rule.matches("1"));
        assert!(rule.matches("5.5"));
    }

    #[test]
    fn in_rules_compare_stringified_params() {
        let factory = RuleFactory::default();
        let rule = factory
            .create_rule("in", &[RuleParam::Int(1), RuleParam::Str("two".into())])
            .unwrap();
        assert!(rule.matches("1"));
        assert!(rule.matches("two"));
        assert!(!rule.matches("3"));

        let rule = factory
            .create_rule("notIn", &[RuleParam::Str("admin".into())])
            .unwrap();
        assert!(!rule.matches("admin"));
        assert!(rule.matches("dave"));
    }

    #[test]
    fn uuid_requires_version_four() {
        let rule = UuidV4Rule::new();
        assert!(rule.matches("123e4567-e89b-42d3-a456-426614174000"));
        assert!(rule.matches("{123E4567-E89B-42D3-A456-426614174000}"));
        assert!(!rule.matches("123e4567-e89b-12d3-a456-426614174000"));
    }

    #[test]
    fn bad_parameters_are_reported() {
        let factory = RuleFactory::default();
        assert!(factory.create_rule("int", &[RuleParam::Int(1)]).is_err());
        assert!(factory
            .create_rule("regex", &[RuleParam::Str("(".into())])
            .is_err());
        assert!(factory.create_rule("nope", &[]).is_err());
    }

    #[cfg(feature = "date-rule")]
    #[test]
    fn date_accepts_any_listed_format() {
        let rule = DateRule::new(vec!["%Y-%m-%d".into(), "%d.%m.%Y".into()]);
        assert!(rule.matches("2024-02-29"));
        assert!(rule.matches("29.02.2024"));
        assert!(!rule.matches("2023-02-29"));
    }
}
