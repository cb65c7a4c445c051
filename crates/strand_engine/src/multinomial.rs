//! Multinomial sampling by conditional binomials.
//!
//! A draw of size `m` over `p` is decomposed strand by strand: strand `i`
//! receives `Binomial(remaining, p[i] / remaining_mass)` draws. The last
//! strand with positive probability takes whatever is left, so the counts
//! always sum to `m` exactly and zero-probability strands stay at zero.

use crate::error::{Error, Result};
use rand::Rng;
use rand_distr::{Binomial, Distribution};

/// Draws `trials` items over `probabilities` into `out`.
///
/// `out` is resized to `probabilities.len()` and overwritten. The
/// probabilities should sum to one; any residual mass is absorbed by the
/// last strand with positive probability.
///
/// # Errors
///
/// Returns [`Error::Sampling`] if no strand has positive probability or the
/// binomial sampler rejects a conditional probability.
pub fn sample_into<R: Rng + ?Sized>(
    rng: &mut R,
    trials: u64,
    probabilities: &[f64],
    out: &mut Vec<u64>,
) -> Result<()> {
    out.clear();
    out.resize(probabilities.len(), 0);

    if trials == 0 {
        return Ok(());
    }

    let sink = probabilities
        .iter()
        .rposition(|&p| p > 0.0)
        .ok_or_else(|| Error::Sampling("no strand has positive probability".to_string()))?;

    let mut remaining = trials;
    let mut remaining_mass: f64 = probabilities[..=sink].iter().sum();

    for (i, &p) in probabilities[..sink].iter().enumerate() {
        if remaining == 0 {
            return Ok(());
        }
        if p <= 0.0 {
            continue;
        }

        let conditional = if p >= remaining_mass {
            1.0
        } else {
            (p / remaining_mass).clamp(0.0, 1.0)
        };
        let drawn = Binomial::new(remaining, conditional)
            .map_err(|e| Error::Sampling(format!("strand {i}, p = {conditional}: {e}")))?
            .sample(rng);

        out[i] = drawn;
        remaining -= drawn;
        remaining_mass -= p;
    }

    out[sink] = remaining;
    Ok(())
}

/// Draws `trials` items over `probabilities` into a fresh vector.
///
/// # Errors
///
/// See [`sample_into`].
pub fn sample<R: Rng + ?Sized>(rng: &mut R, trials: u64, probabilities: &[f64]) -> Result<Vec<u64>> {
    let mut out = Vec::with_capacity(probabilities.len());
    sample_into(rng, trials, probabilities, &mut out)?;
    Ok(out)
}
