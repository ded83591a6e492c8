
///
/// This module contains [`bigint::BigIntRing`], the arbitrary-precision integers, based
/// on [`num_bigint::BigInt`].
///
pub mod bigint;

///
/// This module contains [`residue::ResidueRing`], the quotient `R/(m)` of a euclidean ring
/// `R` by a nonzero element `m`.
///
pub mod residue;

///
/// This module contains [`power_series::PowerSeriesRing`], the ring of truncated power series
/// `R[[x]]` with capped absolute precision.
///
pub mod power_series;
