//! IBC Domain type definition for [`TrustThreshold`]
//! represented as a fraction with valid values in the
//! range `[1/3, 1]`.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use serde_derive::{Deserialize, Serialize};

use crate::core::ics02_client::error::Error;

/// [`TrustThreshold`] defines the share of a trusted validator set's voting
/// power that must sign a header before a validator-set client accepts it
/// while skipping intermediate heights.
///
/// A trust threshold is represented as a fraction, i.e., a numerator and
/// and a denominator. Anything below 1/3 would let a set of validators that
/// cannot even halt the chain convince the client of a fork.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustThreshold {
    numerator: u64,
    denominator: u64,
}

impl TrustThreshold {
    /// Constant for a trust threshold of 1/3.
    pub const ONE_THIRD: Self = Self {
        numerator: 1,
        denominator: 3,
    };

    /// Constant for a trust threshold of 2/3.
    pub const TWO_THIRDS: Self = Self {
        numerator: 2,
        denominator: 3,
    };

    /// Instantiate a TrustThreshold with the given denominator and
    /// numerator. Fails unless `1/3 <= numerator/denominator <= 1`.
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, Error> {
        let at_least_one_third = u128::from(numerator) * 3 >= u128::from(denominator);
        if denominator == 0 || numerator > denominator || !at_least_one_third {
            return Err(Error::invalid_trust_threshold(numerator, denominator));
        }

        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// The numerator of the fraction underlying this trust threshold.
    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    /// The denominator of the fraction underlying this trust threshold.
    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Whether `signed` out of `total` voting power strictly exceeds this
    /// fraction.
    pub fn is_exceeded_by(&self, signed: u64, total: u64) -> bool {
        u128::from(signed) * u128::from(self.denominator)
            > u128::from(total) * u128::from(self.numerator)
    }
}

impl Default for TrustThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}

impl Display for TrustThreshold {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for TrustThreshold {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u64>()
                .map_err(|_| Error::invalid_trust_threshold_format(s.to_string()))
        };

        let (numerator, denominator) = s
            .split_once('/')
            .ok_or_else(|| Error::invalid_trust_threshold_format(s.to_string()))?;

        Self::new(parse(numerator)?, parse(denominator)?)
    }
}
