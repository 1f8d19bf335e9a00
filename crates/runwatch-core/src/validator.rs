//! Outcome validation for a concluded run.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Verdict of comparing an observed conclusion with the expected one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,

    /// Line shown to the user, including the ✅/❌ marker.
    pub message: String,
}

impl Verdict {
    /// 0 when the conclusion matched, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// Compares conclusions. Stateless.
pub struct OutcomeValidator;

impl OutcomeValidator {
    /// Compare `actual` with `expected` by exact string equality and log the verdict.
    ///
    /// Custom messages replace the default wording unless empty; on mismatch
    /// the actual conclusion is always appended.
    pub fn validate(
        actual: &str,
        expected: &str,
        success_message: Option<&str>,
        error_message: Option<&str>,
    ) -> Verdict {
        if actual == expected {
            let text = success_message
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("Test passed: Workflow completed with expected conclusion: {expected}")
                });
            let message = format!("✅ {text}");
            info!(event = "wait.verdict", passed = true, "{message}");
            Verdict {
                passed: true,
                message,
            }
        } else {
            let text = error_message
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!("Test failed: Workflow should have concluded with {expected}")
                });
            let message = format!("❌ {text} (got {actual})");
            error!(event = "wait.verdict", passed = false, "{message}");
            Verdict {
                passed: false,
                message,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_conclusions_pass() {
        for value in ["success", "failure", "skipped", "x"] {
            let verdict = OutcomeValidator::validate(value, value, None, None);
            assert!(verdict.passed);
            assert_eq!(verdict.exit_code(), 0);
        }
    }

    #[test]
    fn test_different_conclusions_fail() {
        let pairs = [
            ("failure", "success"),
            ("success", "failure"),
            ("unknown", "skipped"),
            ("Success", "success"),
        ];
        for (actual, expected) in pairs {
            let verdict = OutcomeValidator::validate(actual, expected, None, None);
            assert!(!verdict.passed);
            assert_eq!(verdict.exit_code(), 1);
        }
    }

    #[test]
    fn test_default_messages() {
        let ok = OutcomeValidator::validate("skipped", "skipped", None, None);
        assert_eq!(
            ok.message,
            "✅ Test passed: Workflow completed with expected conclusion: skipped"
        );

        let bad = OutcomeValidator::validate("failure", "success", None, None);
        assert_eq!(
            bad.message,
            "❌ Test failed: Workflow should have concluded with success (got failure)"
        );
    }

    #[test]
    fn test_custom_messages() {
        let ok = OutcomeValidator::validate(
            "failure",
            "failure",
            Some("Direct release correctly failed verification"),
            None,
        );
        assert_eq!(ok.message, "✅ Direct release correctly failed verification");

        let bad = OutcomeValidator::validate(
            "success",
            "failure",
            None,
            Some("Direct release should have failed verification"),
        );
        assert_eq!(
            bad.message,
            "❌ Direct release should have failed verification (got success)"
        );
    }

    #[test]
    fn test_empty_custom_messages_use_defaults() {
        let ok = OutcomeValidator::validate("success", "success", Some(""), None);
        assert_eq!(
            ok.message,
            "✅ Test passed: Workflow completed with expected conclusion: success"
        );

        let bad = OutcomeValidator::validate("cancelled", "success", None, Some(""));
        assert_eq!(
            bad.message,
            "❌ Test failed: Workflow should have concluded with success (got cancelled)"
        );
    }
}
