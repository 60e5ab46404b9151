//! Consistency checks over parsed [`Mappings`].
//!
//! Rules:
//! - no two old keys of one category may map to the same new key
//! - a member's new owner must be the type table's mapping of its old owner
//! - a method's new signature must be its old signature with every type
//!   mapped through the type table
//!
//! Every violation is collected, so one run reports them all.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use super::Mappings;
use crate::keys::TypeKey;

/// A single broken rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Several old keys share one target.
    AmbiguousTarget {
        category: &'static str,
        target: String,
        sources: Vec<String>,
    },

    /// A member moved to a different owner than its class did.
    OwnerMismatch {
        member: String,
        expected: TypeKey,
        actual: TypeKey,
    },

    /// A method's new signature does not follow the type renames.
    SignatureMismatch {
        method: String,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::AmbiguousTarget {
                category,
                target,
                sources,
            } => write!(
                f,
                "{} '{}' is the target of {}",
                category,
                target,
                sources.join(", ")
            ),
            Violation::OwnerMismatch {
                member,
                expected,
                actual,
            } => write!(
                f,
                "'{}' moves to owner '{}' but its class maps to '{}'",
                member, actual, expected
            ),
            Violation::SignatureMismatch {
                method,
                expected,
                actual,
            } => write!(
                f,
                "'{}' has new signature '{}', expected '{}'",
                method, actual, expected
            ),
        }
    }
}

/// All violations found in one set of mappings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ConsistencyError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation(s)", self.violations.len())?;
        if let Some(first) = self.violations.first() {
            write!(f, ", first: {}", first)?;
        }
        Ok(())
    }
}

/// Validate `mappings`, returning every violation found.
pub fn check_consistency(mappings: &Mappings) -> Result<(), ConsistencyError> {
    let mut violations = Vec::new();

    ambiguous_targets(
        "class",
        mappings.types().map(|(o, n)| (o.to_string(), n.to_string())),
        &mut violations,
    );
    ambiguous_targets(
        "field",
        mappings.fields().map(|(o, n)| (o.to_string(), n.to_string())),
        &mut violations,
    );
    ambiguous_targets(
        "method",
        mappings.methods().map(|(o, n)| (o.to_string(), n.to_string())),
        &mut violations,
    );

    for (old, new) in mappings.fields() {
        let expected = mappings.new_type(&old.owner);
        if new.owner != expected {
            violations.push(Violation::OwnerMismatch {
                member: old.to_string(),
                expected,
                actual: new.owner.clone(),
            });
        }
    }

    for (old, new) in mappings.methods() {
        let expected_owner = mappings.new_type(&old.owner);
        if new.owner != expected_owner {
            violations.push(Violation::OwnerMismatch {
                member: old.to_string(),
                expected: expected_owner,
                actual: new.owner.clone(),
            });
        }

        let expected_sig = old.signature.map_types(|t| {
            mappings
                .new_type(&t.element_type())
                .array_of(t.array_dimensions())
        });
        if new.signature != expected_sig {
            violations.push(Violation::SignatureMismatch {
                method: old.to_string(),
                expected: expected_sig.descriptor(),
                actual: new.signature.descriptor(),
            });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ConsistencyError { violations })
    }
}

fn ambiguous_targets(
    category: &'static str,
    entries: impl Iterator<Item = (String, String)>,
    violations: &mut Vec<Violation>,
) {
    let mut by_target: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (old, new) in entries {
        by_target.entry(new).or_default().push(old);
    }
    for (target, sources) in by_target {
        if sources.len() > 1 {
            violations.push(Violation::AmbiguousTarget {
                category,
                target,
                sources,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::parse_srg;

    fn check(srg: &str) -> Result<(), ConsistencyError> {
        check_consistency(&parse_srg(srg).unwrap())
    }

    #[test]
    fn consistent_mappings_pass() {
        check(
            "CL: a/Old a/New\n\
             FD: a/Old/x a/New/y\n\
             MD: a/Old/m (La/Old;)La/Old; a/New/n (La/New;)La/New;\n\
             MD: a/Other/m ([La/Old;I)V a/Other/m ([La/New;I)V\n",
        )
        .unwrap();
    }

    #[test]
    fn two_classes_with_one_target() {
        let err = check("CL: a/A a/C\nCL: a/B a/C\n").unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::AmbiguousTarget {
                category: "class",
                target: "a.C".to_string(),
                sources: vec!["a.A".to_string(), "a.B".to_string()],
            }]
        );
    }

    #[test]
    fn two_fields_with_one_target() {
        let err = check("FD: a/A/x a/A/z\nFD: a/A/y a/A/z\n").unwrap_err();
        assert!(matches!(
            err.violations[0],
            Violation::AmbiguousTarget { category: "field", .. }
        ));
    }

    #[test]
    fn overloads_may_share_a_new_name() {
        check("MD: a/A/m (I)V a/A/n (I)V\nMD: a/A/m (J)V a/A/n (J)V\n").unwrap();
    }

    #[test]
    fn member_owner_must_follow_class() {
        let err = check("CL: a/Old a/New\nFD: a/Old/x a/Old/y\n").unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::OwnerMismatch {
                member: "a.Old.x".to_string(),
                expected: TypeKey::new("a.New"),
                actual: TypeKey::new("a.Old"),
            }]
        );
    }

    #[test]
    fn signature_must_follow_class_renames() {
        let err = check("CL: a/Old a/New\nMD: a/B/m (La/Old;)V a/B/n (La/Old;)V\n").unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::SignatureMismatch {
                method: "a.B.m(La/Old;)V".to_string(),
                expected: "(La/New;)V".to_string(),
                actual: "(La/Old;)V".to_string(),
            }]
        );
    }

    #[test]
    fn all_violations_are_collected() {
        let err = check("CL: a/A a/C\nCL: a/B a/C\nFD: a/A/x a/A/y\n").unwrap_err();
        assert_eq!(err.violations.len(), 2);
        assert!(err.to_string().starts_with("2 violation(s), first: "));
    }
}
