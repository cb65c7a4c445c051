//! Validated simulation parameters and resampling modes.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the probability vector is derived from one round to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Each round samples from the previous round's frequencies only.
    Renewal,
    /// Counts are summed across rounds; the next round samples from the
    /// running total.
    #[default]
    Accumulating,
}

impl Mode {
    /// Returns the canonical lowercase name of this mode.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Renewal => "renewal",
            Self::Accumulating => "accumulating",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "renewal" => Ok(Self::Renewal),
            "accumulating" | "accumulate" => Ok(Self::Accumulating),
            other => Err(Error::InvalidParameter(format!(
                "unknown mode '{other}', expected 'renewal' or 'accumulating'"
            ))),
        }
    }
}

/// Parameters of one simulation run, validated on construction.
///
/// Fields are private so every value, including deserialized ones, has
/// passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSimParams")]
pub struct SimParams {
    strands: usize,
    draws_per_round: u64,
    rounds: usize,
}

#[derive(Deserialize)]
struct RawSimParams {
    strands: usize,
    draws_per_round: u64,
    rounds: usize,
}

impl TryFrom<RawSimParams> for SimParams {
    type Error = Error;

    fn try_from(raw: RawSimParams) -> Result<Self> {
        Self::checked(raw.strands, raw.draws_per_round, raw.rounds)
    }
}

impl SimParams {
    /// Validates raw parameters.
    ///
    /// Inputs are signed so that negative values coming from callers are
    /// reported instead of wrapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `strands <= 0`,
    /// `draws_per_round <= 0`, `rounds < 0`, or if the cumulative number of
    /// draws `draws_per_round * (rounds + 1)` does not fit in a `u64`.
    pub fn new(strands: i64, draws_per_round: i64, rounds: i64) -> Result<Self> {
        if strands <= 0 {
            return Err(Error::InvalidParameter(format!(
                "strands must be positive, got {strands}"
            )));
        }
        if draws_per_round <= 0 {
            return Err(Error::InvalidParameter(format!(
                "draws per round must be positive, got {draws_per_round}"
            )));
        }
        if rounds < 0 {
            return Err(Error::InvalidParameter(format!(
                "rounds must be non-negative, got {rounds}"
            )));
        }

        let strands = usize::try_from(strands).map_err(|_| {
            Error::InvalidParameter(format!("strands {strands} exceeds addressable memory"))
        })?;
        let rounds = usize::try_from(rounds).map_err(|_| {
            Error::InvalidParameter(format!("rounds {rounds} exceeds addressable memory"))
        })?;
        Self::checked(strands, draws_per_round.unsigned_abs(), rounds)
    }

    fn checked(strands: usize, draws_per_round: u64, rounds: usize) -> Result<Self> {
        if strands == 0 {
            return Err(Error::InvalidParameter(
                "strands must be positive, got 0".to_string(),
            ));
        }
        if draws_per_round == 0 {
            return Err(Error::InvalidParameter(
                "draws per round must be positive, got 0".to_string(),
            ));
        }
        let params = Self {
            strands,
            draws_per_round,
            rounds,
        };
        params.cumulative_draws()?;
        Ok(params)
    }

    /// Builds parameters from a scaling factor, with `M = c * n`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `scaling_factor <= 0`, if the
    /// product overflows, or if [`SimParams::new`] rejects the result.
    pub fn from_scaling_factor(strands: i64, scaling_factor: i64, rounds: i64) -> Result<Self> {
        if scaling_factor <= 0 {
            return Err(Error::InvalidParameter(format!(
                "scaling factor must be positive, got {scaling_factor}"
            )));
        }
        if strands <= 0 {
            return Self::new(strands, 1, rounds);
        }
        let draws = strands.checked_mul(scaling_factor).ok_or_else(|| {
            Error::InvalidParameter(format!(
                "sample size {scaling_factor} * {strands} overflows"
            ))
        })?;
        Self::new(strands, draws, rounds)
    }

    /// Number of strands (`n`).
    #[must_use]
    pub const fn strands(&self) -> usize {
        self.strands
    }

    /// Draws taken in every round (`M`).
    #[must_use]
    pub const fn draws_per_round(&self) -> u64 {
        self.draws_per_round
    }

    /// Resampling rounds after the seeding draw (`R`).
    #[must_use]
    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    /// Total draws over the whole run, `M * (R + 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the product overflows a `u64`.
    pub fn cumulative_draws(&self) -> Result<u64> {
        u64::try_from(self.rounds)
            .ok()
            .and_then(|r| r.checked_add(1))
            .and_then(|r| r.checked_mul(self.draws_per_round))
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "cumulative draws {} * ({} + 1) overflow",
                    self.draws_per_round, self.rounds
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(matches!(
            SimParams::new(0, 100, 5),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            SimParams::new(100, 0, 5),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            SimParams::new(100, 100, -1),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            SimParams::new(-3, 100, 5),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn error_message_names_the_parameter() {
        let err = SimParams::new(0, 100, 5).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"invalid parameter: strands must be positive, got 0");
    }

    #[test]
    fn zero_rounds_is_valid() {
        let params = SimParams::new(10, 20, 0).unwrap();
        assert_eq!(params.rounds(), 0);
        assert_eq!(params.cumulative_draws().unwrap(), 20);
    }

    #[test]
    fn scaling_factor_multiplies_strands() {
        let params = SimParams::from_scaling_factor(1000, 3, 2).unwrap();
        assert_eq!(params.draws_per_round(), 3000);
        assert!(SimParams::from_scaling_factor(1000, 0, 2).is_err());
        assert!(SimParams::from_scaling_factor(i64::MAX, 2, 2).is_err());
    }

    #[test]
    fn cumulative_overflow_is_rejected() {
        assert!(SimParams::new(10, i64::MAX, 4).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let params: SimParams =
            serde_json::from_str(r#"{"strands":10,"draws_per_round":30,"rounds":2}"#).unwrap();
        assert_eq!(params, SimParams::new(10, 30, 2).unwrap());

        assert!(serde_json::from_str::<SimParams>(
            r#"{"strands":10,"draws_per_round":0,"rounds":0}"#
        )
        .is_err());
        assert!(serde_json::from_str::<SimParams>(
            r#"{"strands":0,"draws_per_round":5,"rounds":0}"#
        )
        .is_err());
        let overflowing = format!(
            r#"{{"strands":10,"draws_per_round":{},"rounds":1}}"#,
            u64::MAX
        );
        assert!(serde_json::from_str::<SimParams>(&overflowing).is_err());
    }

    #[test]
    fn mode_parses_and_displays() {
        assert_eq!("renewal".parse::<Mode>().unwrap(), Mode::Renewal);
        assert_eq!(" Accumulating ".parse::<Mode>().unwrap(), Mode::Accumulating);
        assert!("bogus".parse::<Mode>().is_err());
        assert_eq!(Mode::Renewal.to_string(), "renewal");
        assert_eq!(Mode::default(), Mode::Accumulating);
    }
}
