#![allow(non_snake_case)]
#![doc = include_str!("../Readme.md")]

#[macro_use]
pub mod ring;
///
/// Contains [`error::RingError`], the error type of all fallible ring operations.
///
pub mod error;
pub mod algorithms;
///
/// Contains [`divisibility::DivisibilityRing`] and [`divisibility::SqrtRing`], for rings
/// that can decide and compute (exact) quotients resp. square roots.
///
pub mod divisibility;
///
/// Contains [`pid::PrincipalIdealRing`] and [`pid::EuclideanRing`].
///
pub mod pid;
///
/// Contains the trait [`integer::IntegerRing`] for rings representing the integers `Z`.
///
pub mod integer;
///
/// Contains [`primitive_int::StaticRing`], the integers represented by the primitive
/// types `i32`, `i64` and `i128`.
///
pub mod primitive_int;
///
/// Contains [`homomorphism::CanHomFrom`], the compile-time coercion rules between rings.
///
pub mod homomorphism;
///
/// Contains [`parent::ParentHandle`], which gives ring elements a way to refer back to
/// their parent, and the runtime checks whether two parents are compatible.
///
pub mod parent;
pub mod wrapper;
///
/// Contains [`registry::ParentRegistry`], an explicit cache of parents.
///
pub mod registry;
pub mod serialization;
///
/// Contains [`logging::EventRecorder`], an in-memory [`tracing::Subscriber`] that makes
/// the logs of an algorithm inspectable in tests.
///
#[cfg(any(test, feature = "generic_tests"))]
pub mod logging;
///
/// Contains the concrete rings, i.e. the integers [`rings::bigint::BigIntRing`], the
/// residue rings [`rings::residue::ResidueRing`] and the power series rings
/// [`rings::power_series::PowerSeriesRing`].
///
pub mod rings;
