// crates/harness-participant/src/policy.rs
// ============================================================================
// Module: Policy Fixtures
// Description: Contract policies used by transfer scenarios.
// Purpose: Permissive and time-bounded ODRL policy documents.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Two policies cover every scenario: the unconstrained usage policy and a
//! contract-validity window anchored at agreement time. The expiry variant
//! renders issued EDRs unusable once the window closes while leaving the
//! underlying resource untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Policies
// ============================================================================

/// Usage policy without constraints.
#[must_use]
pub fn no_constraint_policy() -> Value {
    json!({
        "@type": "Set",
        "permission": [{
            "action": "use",
        }],
    })
}

/// Usage policy whose contract validity ends `offset` after agreement.
///
/// `offset` uses the duration shorthand of the runtimes under test, for
/// example `"5s"`.
#[must_use]
pub fn contract_expires_in(offset: &str) -> Value {
    in_force_date_policy("gteq", "contractAgreement+0s", "lteq", &format!("contractAgreement+{offset}"))
}

/// Builds the in-force-date window policy.
fn in_force_date_policy(
    operator_start: &str,
    start: &str,
    operator_end: &str,
    end: &str,
) -> Value {
    json!({
        "@type": "Set",
        "permission": [{
            "action": "use",
            "constraint": {
                "@type": "LogicalConstraint",
                "and": [
                    atomic_constraint("inForceDate", operator_start, start),
                    atomic_constraint("inForceDate", operator_end, end),
                ],
            },
        }],
    })
}

/// Builds one atomic ODRL constraint.
fn atomic_constraint(left_operand: &str, operator: &str, right_operand: &str) -> Value {
    json!({
        "@type": "Constraint",
        "leftOperand": left_operand,
        "operator": operator,
        "rightOperand": right_operand,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
