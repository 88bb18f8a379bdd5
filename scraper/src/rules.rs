//! Named extraction rules for the four market figures.
//!
//! Each rule pairs a strict, phrase-anchored pattern written against the
//! current report template with a loose one that only anchors on the unit
//! phrase, for reports whose lead-in wording differs. The strict pattern is
//! always tried first.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    SalesTransactions,
    StockForSale,
    PropertiesForRent,
    PropertiesLeased,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::SalesTransactions,
        Field::StockForSale,
        Field::PropertiesForRent,
        Field::PropertiesLeased,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::SalesTransactions => "Sales Transactions",
            Field::StockForSale => "Stock for Sale",
            Field::PropertiesForRent => "Properties for Rent",
            Field::PropertiesLeased => "Properties Leased",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which of a rule's two patterns produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Primary,
    Fallback,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Primary => f.write_str("primary"),
            Tier::Fallback => f.write_str("fallback"),
        }
    }
}

/// The raw capture of a rule before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch<'t> {
    pub tier: Tier,
    pub captured: &'t str,
}

impl RuleMatch<'_> {
    pub fn value(&self) -> Option<String> {
        normalize_number(self.captured)
    }
}

#[derive(Debug)]
pub struct ExtractionRule {
    pub field: Field,
    primary: Regex,
    fallback: Regex,
}

impl ExtractionRule {
    pub fn new(field: Field, primary: &str, fallback: &str) -> Result<Self, regex::Error> {
        Ok(ExtractionRule {
            field,
            primary: Regex::new(primary)?,
            fallback: Regex::new(fallback)?,
        })
    }

    pub fn find<'t>(&self, text: &'t str) -> Option<RuleMatch<'t>> {
        let capture = |re: &Regex, tier: Tier| {
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .map(|m| RuleMatch {
                    tier,
                    captured: m.as_str(),
                })
        };

        capture(&self.primary, Tier::Primary).or_else(|| capture(&self.fallback, Tier::Fallback))
    }

    /// The normalized value for this field, or `None` when neither pattern
    /// matches.
    pub fn extract(&self, text: &str) -> Option<String> {
        self.find(text).and_then(|m| m.value())
    }
}

// Numbers may carry thousands separators, a decimal point, and stray spaces
// left behind by inline markup.
const NUMBER: &str = r"([\d,\. ]+)";

static RULES: LazyLock<[ExtractionRule; 4]> = LazyLock::new(|| {
    let rule = |field, primary: String, fallback: String| {
        ExtractionRule::new(field, &primary, &fallback).expect("invalid extraction pattern")
    };
    [
        rule(
            Field::SalesTransactions,
            format!(r"REIWA members reporting {NUMBER} transactions"),
            format!(r"reporting\s*{NUMBER}\s*transactions"),
        ),
        rule(
            Field::StockForSale,
            format!(r"There were {NUMBER} properties for sale in Perth"),
            format!(r"{NUMBER}\s*properties\s*for\s*sale\s*in\s*Perth"),
        ),
        rule(
            Field::PropertiesForRent,
            format!(r" REIWA members reported there were {NUMBER} properties for rent in Perth"),
            format!(r"{NUMBER}\s*properties\s*for\s*rent\s*in\s*Perth"),
        ),
        rule(
            Field::PropertiesLeased,
            format!(r"REIWA members reported {NUMBER} properties leased"),
            format!(r"{NUMBER}\s*properties\s*leased"),
        ),
    ]
});

pub fn rules() -> &'static [ExtractionRule] {
    RULES.as_slice()
}

/// Rules are stored in `Field::ALL` order.
pub fn rule_for(field: Field) -> &'static ExtractionRule {
    &RULES[field as usize]
}

/// Strip digit-grouping commas and surrounding whitespace or stray periods.
/// Returns `None` when nothing numeric is left.
pub fn normalize_number(raw: &str) -> Option<String> {
    let cleaned = raw.replace(',', "");
    let trimmed = cleaned.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        Some(trimmed.to_string())
    } else {
        None
    }
}
