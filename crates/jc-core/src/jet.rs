//! Jet four-momentum.
//!
//! A jet is described by `(pt, eta, phi, m)` in collider coordinates.
//! Derived quantities use the usual hyperbolic relations:
//! `pz = pt·sinh(eta)`, `|p| = pt·cosh(eta)`, `E = sqrt(p² + m²)`.

use serde::{Deserialize, Serialize};

/// An immutable jet four-momentum in `(pt, eta, phi, m)` representation.
///
/// Units are whatever the surrounding analysis uses (typically MeV or GeV);
/// scaling between conventions is handled at the input-variable level, not
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    pt: f64,
    eta: f64,
    phi: f64,
    m: f64,
}

impl Jet {
    /// Create a jet from transverse momentum, pseudorapidity, azimuth and mass.
    pub fn new(pt: f64, eta: f64, phi: f64, m: f64) -> Self {
        Self { pt, eta, phi, m }
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.pt
    }

    /// Pseudorapidity.
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Azimuthal angle.
    pub fn phi(&self) -> f64 {
        self.phi
    }

    /// Invariant mass.
    pub fn m(&self) -> f64 {
        self.m
    }

    /// |eta|.
    pub fn abs_eta(&self) -> f64 {
        self.eta.abs()
    }

    /// x component of the momentum.
    pub fn px(&self) -> f64 {
        self.pt * self.phi.cos()
    }

    /// y component of the momentum.
    pub fn py(&self) -> f64 {
        self.pt * self.phi.sin()
    }

    /// z component of the momentum.
    pub fn pz(&self) -> f64 {
        self.pt * self.eta.sinh()
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        self.pt * self.eta.cosh()
    }

    /// Energy, `sqrt(p² + m²)`.
    pub fn e(&self) -> f64 {
        let p = self.p();
        (p * p + self.m * self.m).sqrt()
    }

    /// Transverse energy, `E / cosh(eta)`.
    pub fn et(&self) -> f64 {
        self.e() / self.eta.cosh()
    }

    /// Rapidity, `0.5·ln((E + pz) / (E − pz))`.
    ///
    /// For a massless jet `E == |pz| + pt·…` degenerates only at infinite
    /// eta; if the denominator vanishes numerically the pseudorapidity is
    /// returned instead (the two coincide in that limit).
    pub fn rapidity(&self) -> f64 {
        let e = self.e();
        let pz = self.pz();
        let num = e + pz;
        let den = e - pz;
        if num <= 0.0 || den <= 0.0 {
            return self.eta;
        }
        0.5 * (num / den).ln()
    }

    /// |rapidity|.
    pub fn abs_rapidity(&self) -> f64 {
        self.rapidity().abs()
    }
}
