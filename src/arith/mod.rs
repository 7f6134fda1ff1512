//! Group and field arithmetic abstractions and implementations.
//!
//! This module provides trait abstractions for the algebra the re-encryption
//! engine sits on, so the curve is a pluggable parameter selected by Cargo
//! feature rather than hard-wired into the protocol code.
//!
//! # Architecture
//!
//! - **[`field`]**: Scalar field operations (Fr) plus the canonical 32-byte
//!   big-endian scalar encoding
//! - **[`group`]**: Elliptic curve point operations (G1, G2) and the pairing
//!   target group (GT), each with a fixed-width big-endian encoding
//! - **[`pairing`]**: Bilinear pairing `e(G1, G2) -> GT`
//!
//! # Backend Support
//!
//! | Feature | Backend | Curve | Base field width |
//! |---------|---------|-------|------------------|
//! | `ark_bn254` (default) | Arkworks | BN254 | 32 bytes |
//! | `ark_bls12381` | Arkworks | BLS12-381 | 48 bytes |
//!
//! # Example
//!
//! ```rust
//! use recrypt_engine::{CurvePoint, FieldElement, PairingBackend, PairingEngine, TargetGroup};
//!
//! let mut rng = rand::thread_rng();
//! let scalar = <PairingEngine as PairingBackend>::Scalar::random(&mut rng);
//!
//! let g1 = <PairingEngine as PairingBackend>::G1::generator();
//! let g2 = <PairingEngine as PairingBackend>::G2::generator();
//!
//! // Bilinearity: e(a*P, Q) = e(P, Q)^a
//! let lhs = PairingEngine::pairing(&g1.mul_scalar(&scalar), &g2);
//! let rhs = PairingEngine::pairing(&g1, &g2).mul_scalar(&scalar);
//! assert_eq!(lhs, rhs);
//! ```

#[cfg(all(feature = "ark_bn254", feature = "ark_bls12381"))]
compile_error!("features `ark_bn254` and `ark_bls12381` are mutually exclusive");

#[cfg(not(any(feature = "ark_bn254", feature = "ark_bls12381")))]
compile_error!("enable exactly one curve backend feature: `ark_bn254` or `ark_bls12381`");

mod ark_codec;

mod field;
pub use field::*;

mod group;
pub use group::*;

mod pairing;
pub use pairing::*;
