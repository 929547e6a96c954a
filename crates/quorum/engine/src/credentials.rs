//! Credential verification seam
//!
//! Identity and password checks belong to the host application. The
//! engine only asks a [`CredentialVerifier`] whether the proof presented
//! with a decision is acceptable for the role, and never stores the proof.

use quorum_types::{CredentialProof, OfficerRole};

/// Decides whether a proof is acceptable for a role
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, role: OfficerRole, proof: &CredentialProof) -> bool;
}

/// Accepts every proof. For hosts that authenticate before calling in.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrustingVerifier;

impl CredentialVerifier for TrustingVerifier {
    fn verify(&self, _role: OfficerRole, _proof: &CredentialProof) -> bool {
        true
    }
}

/// Rejects empty proofs
#[derive(Clone, Copy, Debug, Default)]
pub struct NonEmptyProofVerifier;

impl CredentialVerifier for NonEmptyProofVerifier {
    fn verify(&self, _role: OfficerRole, proof: &CredentialProof) -> bool {
        !proof.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifiers() {
        let empty = CredentialProof::none();
        let signed = CredentialProof::new(vec![1, 2, 3]);

        assert!(TrustingVerifier.verify(OfficerRole::President, &empty));
        assert!(!NonEmptyProofVerifier.verify(OfficerRole::President, &empty));
        assert!(NonEmptyProofVerifier.verify(OfficerRole::President, &signed));
    }
}
