use crate::orders::ApprovalStatus;

/// Approval transitions for wholesale orders
pub struct ApprovalMachine;

impl ApprovalMachine {
    /// Check if an approval transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Approved, Rejected
    /// - Any status → Same status (no-op)
    ///
    /// Decided orders never change again.
    pub fn is_valid_transition(from: ApprovalStatus, to: ApprovalStatus) -> bool {
        if from == to {
            return true;
        }

        matches!(
            (from, to),
            (ApprovalStatus::Pending, ApprovalStatus::Approved)
                | (ApprovalStatus::Pending, ApprovalStatus::Rejected)
        )
    }

    /// `Ok(to)` if the transition is valid, `Err(message)` otherwise
    pub fn transition(from: ApprovalStatus, to: ApprovalStatus) -> Result<ApprovalStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Order is already {} and cannot be {}", from, to))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_approved() {
        assert!(ApprovalMachine::is_valid_transition(
            ApprovalStatus::Pending,
            ApprovalStatus::Approved
        ));
    }

    #[test]
    fn test_pending_to_rejected() {
        assert!(ApprovalMachine::is_valid_transition(
            ApprovalStatus::Pending,
            ApprovalStatus::Rejected
        ));
    }

    #[test]
    fn test_approved_cannot_be_rejected() {
        assert!(!ApprovalMachine::is_valid_transition(
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected
        ));
    }

    #[test]
    fn test_rejected_cannot_be_approved() {
        assert!(!ApprovalMachine::is_valid_transition(
            ApprovalStatus::Rejected,
            ApprovalStatus::Approved
        ));
    }

    #[test]
    fn test_nothing_returns_to_pending() {
        assert!(!ApprovalMachine::is_valid_transition(
            ApprovalStatus::Approved,
            ApprovalStatus::Pending
        ));
        assert!(!ApprovalMachine::is_valid_transition(
            ApprovalStatus::Rejected,
            ApprovalStatus::Pending
        ));
    }

    #[test]
    fn test_transition_message() {
        let result = ApprovalMachine::transition(ApprovalStatus::Approved, ApprovalStatus::Rejected);
        assert_eq!(
            result.unwrap_err(),
            "Order is already approved and cannot be rejected"
        );
    }
}
