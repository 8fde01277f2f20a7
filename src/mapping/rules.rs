use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// One prefix rule: codes starting with `prefix` map to a domain and mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    pub prefix: String,
    pub tech_domain: String,
    pub mission_code: String,
    pub confidence: f64,
}

impl MappingRule {
    /// Case-insensitive prefix test against an already-uppercased code.
    pub fn matches(&self, upper_code: &str) -> bool {
        upper_code.starts_with(&self.prefix.to_uppercase())
    }
}

/// Ordered rule set. Prefixes need not be unique; file order is kept and
/// decides full ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingRuleSet {
    rules: Vec<MappingRule>,
}

impl MappingRuleSet {
    pub fn new(rules: Vec<MappingRule>) -> Result<Self> {
        for (index, rule) in rules.iter().enumerate() {
            if !rule.confidence.is_finite() {
                return Err(Error::InvalidRule {
                    index,
                    message: format!("confidence must be a finite number, got {}", rule.confidence),
                });
            }
            if rule.mission_code.trim().is_empty() {
                return Err(Error::InvalidRule {
                    index,
                    message: format!("rule for prefix `{}` has no mission code", rule.prefix),
                });
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules whose prefix starts `upper_code`, in rule-set order.
    pub fn matching<'r, 'c>(
        &'r self,
        upper_code: &'c str,
    ) -> impl Iterator<Item = &'r MappingRule> + 'c
    where
        'r: 'c,
    {
        self.rules.iter().filter(move |rule| rule.matches(upper_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(prefix: &str, confidence: f64) -> MappingRule {
        MappingRule {
            prefix: prefix.into(),
            tech_domain: "Photonics".into(),
            mission_code: "M2".into(),
            confidence,
        }
    }

    #[test]
    fn test_prefix_match_is_case_insensitive() {
        assert!(rule("h01s", 1.0).matches("H01S 3/00"));
        assert!(!rule("H01L", 1.0).matches("H01S 3/00"));
    }

    #[test]
    fn test_non_finite_confidence_rejected() {
        let err = MappingRuleSet::new(vec![rule("H01", 1.0), rule("G02", f64::NAN)]).unwrap_err();
        assert!(matches!(err, Error::InvalidRule { index: 1, .. }));
    }

    #[test]
    fn test_matching_keeps_rule_order() {
        let set = MappingRuleSet::new(vec![rule("H01", 1.0), rule("G02", 1.0), rule("H", 0.5)]).unwrap();
        let prefixes: Vec<&str> = set.matching("H01S").map(|r| r.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["H01", "H"]);
    }
}
