use log::info;

use crate::utils::sha256_hex;

/// Leading hex prefix a proof digest must carry. Fixed difficulty: 16 zero
/// bits, so roughly one candidate in 65536 is accepted. There is no
/// difficulty adjustment over time.
const DIFFICULTY_PREFIX: &str = "0000";

/// Fixed-difficulty proof-of-work search over a previous proof.
///
/// The search is a blocking, CPU-bound loop with no upper iteration cap.
/// That is a design property rather than an oversight: the acceptance
/// probability per candidate is constant, so the search terminates with
/// certainty and the expected trial count is small, but the worst case has
/// no bound. Callers that need responsiveness run it off the hot path.
pub struct ProofOfWork {
    previous_proof: u64,
}

impl ProofOfWork {
    pub fn new(previous_proof: u64) -> ProofOfWork {
        ProofOfWork { previous_proof }
    }

    /// Search increasing candidates from 1 and return the first whose digest
    /// satisfies the difficulty predicate.
    pub fn run(&self) -> u64 {
        let mut candidate: u64 = 1;
        loop {
            if Self::validate(self.previous_proof, candidate) {
                info!(
                    "Found proof {candidate} for previous proof {}",
                    self.previous_proof
                );
                return candidate;
            }
            candidate += 1;
        }
    }

    /// Check the difficulty predicate for a (previous_proof, proof) pair.
    ///
    /// Must mirror the digest input used during the search exactly: the
    /// decimal text of `proof² - previous_proof²`, which is negative whenever
    /// the proof is smaller than its predecessor. A pair whose delta does not
    /// fit i128 fails the predicate: the search hands out candidates from 1
    /// upward and accepts roughly one in 65536, so it can never have produced
    /// a proof anywhere near that range. Peer-supplied proofs hit this path.
    pub fn validate(previous_proof: u64, proof: u64) -> bool {
        match Self::proof_digest(previous_proof, proof) {
            Some(digest) => digest.starts_with(DIFFICULTY_PREFIX),
            None => false,
        }
    }

    fn proof_digest(previous_proof: u64, proof: u64) -> Option<String> {
        // i128 keeps the squares exact and the subtraction signed.
        let square = |p: u64| (p as i128).checked_mul(p as i128);
        let delta = square(proof)?.checked_sub(square(previous_proof)?)?;
        Some(sha256_hex(delta.to_string().as_bytes()))
    }
}
