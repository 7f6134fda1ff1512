use ark_bn254::Bn254;
use ark_ec::pairing::Pairing;

use crate::{CurveId, Fr, G1, G2, Gt, PairingBackend};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairingEngine;

impl PairingBackend for PairingEngine {
    const CURVE: CurveId = CurveId::Bn254;

    type Scalar = Fr;
    type G1 = G1;
    type G2 = G2;
    type Target = Gt;

    fn pairing(g1: &Self::G1, g2: &Self::G2) -> Self::Target {
        Bn254::pairing(g1.0, g2.0)
    }
}
