use crate::domain::provider::FieldError;

/// Outcome of one requirement evaluation. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    satisfied: bool,
    errors: Vec<FieldError>,
    skipped: bool,
}

impl Verdict {
    /// A decision outcome: the step passed or is still pending, with the
    /// skip flag the step computed.
    pub fn resolved(satisfied: bool, skipped: bool) -> Self {
        Self {
            satisfied,
            errors: Vec::new(),
            skipped,
        }
    }

    /// A submission that failed provider validation.
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            satisfied: false,
            errors,
            skipped: false,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// Field/message pairs from provider validation, in reported order.
    /// Empty for every outcome except a failed submission.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_carries_no_errors() {
        let verdict = Verdict::resolved(true, true);
        assert!(verdict.is_satisfied());
        assert!(verdict.is_skipped());
        assert!(verdict.errors().is_empty());
    }

    #[test]
    fn test_invalid_is_never_satisfied() {
        let verdict = Verdict::invalid(vec![FieldError::new("number", "required")]);
        assert!(!verdict.is_satisfied());
        assert!(!verdict.is_skipped());
        assert_eq!(verdict.errors().len(), 1);
        assert_eq!(verdict.errors()[0].field, "number");
    }
}
