//! Scenario generation: two-pass perturbation of the variable vector.
//!
//! Pass 1 draws every variable independently. Pass 2 then adds
//! `coefficient * value` for each correlation pair, where `value` is the pass-1
//! value of the other variable, and re-clamps. Pass 2 reads only pass-1
//! values, so the order variables are visited in does not matter.

use rand::Rng;

use crate::domain::{ModelDescriptor, PerturbationKind};

/// Standard normal sampler using the Box–Muller transform.
///
/// Each transform yields two independent normals; the second is kept for the
/// next call.
#[derive(Debug, Default)]
pub struct GaussianSampler {
    spare: Option<f64>,
}

impl GaussianSampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        if let Some(z) = self.spare.take() {
            return z;
        }
        // gen() is in [0, 1); shift u1 into (0, 1] so ln(u1) is finite.
        let u1 = 1.0 - rng.gen::<f64>();
        let u2 = rng.gen::<f64>();
        let radius = (-2.0 * u1.ln()).sqrt();
        let angle = std::f64::consts::TAU * u2;
        self.spare = Some(radius * angle.sin());
        radius * angle.cos()
    }
}

/// Per-thread scenario generator for one model.
pub struct Perturber<'a> {
    model: &'a ModelDescriptor,
    base: &'a [f64],
    gaussian: GaussianSampler,
    first_pass: Vec<f64>,
}

impl<'a> Perturber<'a> {
    /// `base` must hold `model.n_vars` values.
    #[must_use]
    pub fn new(model: &'a ModelDescriptor, base: &'a [f64]) -> Self {
        Self {
            model,
            base,
            gaussian: GaussianSampler::new(),
            first_pass: Vec::with_capacity(base.len()),
        }
    }

    /// Write one perturbed scenario into `out`, replacing its contents.
    pub fn perturb<R: Rng + ?Sized>(&mut self, rng: &mut R, out: &mut Vec<f64>) {
        self.first_pass.clear();
        for (&base, spec) in self.base.iter().zip(&self.model.perturbations) {
            let value = if spec.stddev > 0.0 {
                match spec.kind(base) {
                    PerturbationKind::Flip => {
                        let set = base > 0.5;
                        let flipped = rng.gen::<f64>() < spec.stddev;
                        if set == flipped {
                            0.0
                        } else {
                            1.0
                        }
                    }
                    PerturbationKind::Continuous => {
                        spec.clamp(base + self.gaussian.sample(rng) * spec.stddev)
                    }
                }
            } else {
                base
            };
            self.first_pass.push(value);
        }

        out.clear();
        out.extend_from_slice(&self.first_pass);
        for (i, spec) in self.model.perturbations.iter().enumerate() {
            if spec.correlations.is_empty() {
                continue;
            }
            let shift: f64 = spec
                .correlations
                .iter()
                .map(|c| c.coefficient * self.first_pass[c.var as usize])
                .sum();
            out[i] = spec.clamp(self.first_pass[i] + shift);
        }
    }
}
