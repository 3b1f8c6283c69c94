use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Deserialize;

use super::filter::FilterCriteria;
use super::graph::Attribute;
use crate::error::{Error, Result};

/// Known values per attribute, as offered by the filter controls.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ReferenceValues {
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub occupations: Vec<String>,
    #[serde(default)]
    pub nationalities: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownValue<'a> {
    pub attribute: Attribute,
    pub value: &'a str,
    pub suggestion: Option<&'a str>,
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

impl ReferenceValues {
    pub(super) fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|error| {
            Error::MalformedSnapshot(format!("invalid reference value lists: {error}"))
        })
    }

    pub fn values(&self, attribute: Attribute) -> &[String] {
        match attribute {
            Attribute::Company => &self.companies,
            Attribute::Location => &self.locations,
            Attribute::Occupation => &self.occupations,
            Attribute::Nationality => &self.nationalities,
        }
    }

    pub fn closest(&self, attribute: Attribute, query: &str) -> Option<&str> {
        let matcher = SkimMatcherV2::default();
        self.values(attribute)
            .iter()
            .filter_map(|value| {
                fuzzy_match_score(&matcher, value, query).map(|score| (score, value.as_str()))
            })
            .max_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(a.1)))
            .map(|(_, value)| value)
    }

    /// Active criteria whose value is not in the attribute's list. Attributes
    /// with an empty list are not checked.
    pub fn unknown_values<'a>(&'a self, criteria: &'a FilterCriteria) -> Vec<UnknownValue<'a>> {
        criteria
            .active()
            .filter(|criterion| {
                let known = self.values(criterion.attribute);
                !known.is_empty() && !known.iter().any(|value| value == &criterion.value)
            })
            .map(|criterion| UnknownValue {
                attribute: criterion.attribute,
                value: criterion.value.as_str(),
                suggestion: self.closest(criterion.attribute, &criterion.value),
            })
            .collect()
    }
}
