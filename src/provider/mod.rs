// Path: src/provider/mod.rs
//! Operation providers: the "given an item and algorithm type, produce a
//! result" capability, and its concrete primitive implementations.

mod cache;
pub mod digest;
pub mod merkle_digest;
pub mod running_hash;
pub mod self_digest;
pub mod verify;

pub use cache::ThreadLocalAlgorithmCache;

use crate::error::CryptoError;

/// A family `OperationProvider<Input, Aux, Output, Algorithm, AlgorithmType>`:
/// loads (and, for `CachingOperationProvider` implementors, caches per
/// thread) an algorithm instance, then computes a per-item result with it.
pub trait OperationProvider {
    /// The work item this provider consumes.
    type Input: ?Sized;
    /// Auxiliary, per-call context the provider needs besides the input.
    type Aux: ?Sized;
    /// The value produced for one item.
    type Output;
    /// The loaded primitive algorithm instance (e.g. a digest context).
    type Algorithm;
    /// The algorithm selector (e.g. `DigestType`, `SignatureType`).
    type AlgorithmType: Copy + Eq + std::hash::Hash;

    /// Loads an algorithm instance for `algorithm_type`. May be expensive.
    fn load_algorithm(&self, algorithm_type: Self::AlgorithmType) -> Result<Self::Algorithm, CryptoError>;

    /// Pure per-item work given an already-loaded algorithm.
    fn handle_item(
        &self,
        algorithm: &mut Self::Algorithm,
        algorithm_type: Self::AlgorithmType,
        input: &Self::Input,
        aux: &Self::Aux,
    ) -> Result<Self::Output, CryptoError>;

    /// Convenience that loads the algorithm fresh, then handles the item.
    fn compute(
        &self,
        input: &Self::Input,
        aux: &Self::Aux,
        algorithm_type: Self::AlgorithmType,
    ) -> Result<Self::Output, CryptoError> {
        let mut algorithm = self.load_algorithm(algorithm_type)?;
        self.handle_item(&mut algorithm, algorithm_type, input, aux)
    }
}
