use flex_error::{define_error, TraceError};

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        InvalidRawMerkleProof
            [ TraceError<prost::DecodeError> ]
            |_| { "invalid raw merkle proof" },

        CommitmentProofDecodingFailed
            [ TraceError<prost::DecodeError> ]
            |_| { "failed to decode commitment proof" },

        EmptyCommitmentPrefix
            |_| { "empty commitment prefix" },

        EmptyMerkleProof
            |_| { "empty merkle proof" },

        EmptyMerkleRoot
            |_| { "empty merkle root" },

        EmptyVerifiedValue
            |_| { "empty verified value" },

        InvalidMerkleProof
            { expected: usize, actual: usize }
            | e | {
                format_args!("merkle proof must carry {0} sibling hashes, found {1}",
                    e.expected, e.actual)
            },

        InvalidSiblingHash
            { index: usize }
            | e | { format_args!("sibling hash #{0} is not 32 bytes long", e.index) },

        VerificationFailure
            |_| { "proof verification failed" },
    }
}
