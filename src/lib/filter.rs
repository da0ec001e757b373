//! Container filter expressions.
//!
//! An expression is a comma-separated list of `field=regex` or
//! `field!=regex` criteria. A criterion without a field applies to the pod
//! name. All criteria must hold for a container to match.

use log::debug;
use regex::Regex;

use crate::lib::container::Container;
use crate::lib::error::{ConfigError, Result};

/// Container attribute a criterion is evaluated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    WorkloadType,
    PodName,
    ContainerType,
    ContainerName,
}

impl FilterField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "kind" | "workloadType" => Some(FilterField::WorkloadType),
            "pod" | "podName" => Some(FilterField::PodName),
            "type" | "containerType" => Some(FilterField::ContainerType),
            "container" | "name" | "containerName" => Some(FilterField::ContainerName),
            _ => None,
        }
    }

    fn value<'a>(&self, container: &'a Container) -> &'a str {
        match self {
            FilterField::WorkloadType => &container.workload_type,
            FilterField::PodName => &container.pod_name,
            FilterField::ContainerType => container.container_type.map_or("", |t| t.as_str()),
            FilterField::ContainerName => &container.name,
        }
    }
}

#[derive(Debug, Clone)]
struct Criterion {
    field: FilterField,
    regex: Regex,
    negated: bool,
}

impl Criterion {
    fn matches(&self, container: &Container) -> bool {
        self.regex.is_match(self.field.value(container)) != self.negated
    }
}

/// Predicate over containers built from a filter expression
#[derive(Debug, Clone, Default)]
pub struct Filter {
    criteria: Vec<Criterion>,
    inverted: bool,
}

impl Filter {
    /// Parse a filter expression; `None` matches everything
    pub fn parse(expression: Option<&str>, inverted: bool) -> Result<Self> {
        let mut criteria = Vec::new();

        for token in expression
            .into_iter()
            .flat_map(|e| e.split(','))
            .filter(|t| !t.is_empty())
        {
            // The first operator splits; later ones belong to the regex
            let (field_name, pattern, negated) = match (token.find("!="), token.find('=')) {
                (Some(neg), Some(eq)) if neg < eq => (&token[..neg], &token[neg + 2..], true),
                (_, Some(eq)) => (&token[..eq], &token[eq + 1..], false),
                _ => ("podName", token, false),
            };

            let field = FilterField::parse(field_name).ok_or_else(|| {
                ConfigError::InvalidFilterField {
                    field: field_name.to_string(),
                    criteria: expression.unwrap_or_default().to_string(),
                }
            })?;

            let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
                field: field_name.to_string(),
                criteria: expression.unwrap_or_default().to_string(),
                source,
            })?;

            debug!(
                "Filter criterion: {:?} {} '{}'",
                field,
                if negated { "!~" } else { "~" },
                pattern
            );
            criteria.push(Criterion {
                field,
                regex,
                negated,
            });
        }

        Ok(Self { criteria, inverted })
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty() && !self.inverted
    }

    pub fn matches(&self, container: &Container) -> bool {
        self.criteria.iter().all(|c| c.matches(container)) != self.inverted
    }
}
