//! Library for converting DSSE attestations to PEP 740 attestations.
//!
//! A DSSE envelope's payload and first signature are rewritten into the
//! attestation shape expected by package index tooling such as Pulp.

/// File-level conversion from a DSSE attestation to a PEP 740 attestation
pub mod convert;

/// Dead Simple Signing Envelope (DSSE) input view
pub mod dsse;

/// PEP 740 attestation model and conversion
pub mod pep740;
