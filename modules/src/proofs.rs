use flex_error::define_error;

use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::Height;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    ProofError {
        ZeroHeight
            | _ | { "proof height cannot be zero" },
    }
}

/// Structure comprising the proof of an object in a handshake or packet
/// message, along with the counterparty height it was taken at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proofs {
    object_proof: CommitmentProofBytes,
    /// Height of the counterparty's committed state the proof was taken
    /// against. The local client must hold a consensus state for it.
    height: Height,
}

impl Proofs {
    pub fn new(object_proof: CommitmentProofBytes, height: Height) -> Result<Self, ProofError> {
        if height.is_zero() {
            return Err(ProofError::zero_height());
        }

        Ok(Self {
            object_proof,
            height,
        })
    }

    /// Getter for the object_proof.
    pub fn object_proof(&self) -> &CommitmentProofBytes {
        &self.object_proof
    }

    /// Getter for the height field.
    pub fn height(&self) -> Height {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn zero_height_is_rejected() {
        let proof = CommitmentProofBytes::try_from(vec![1]).unwrap();
        assert!(Proofs::new(proof.clone(), Height::zero()).is_err());
        assert_eq!(Proofs::new(proof, Height::new(0, 1)).unwrap().height(), Height::new(0, 1));
    }
}
