use num_bigint::{BigInt, BigUint, Sign};
use num_integer::{Integer, Roots};
use num_traits::{Signed, ToPrimitive, Zero};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

use crate::divisibility::*;
use crate::homomorphism::*;
use crate::integer::*;
use crate::pid::*;
use crate::primitive_int::*;
use crate::ring::*;
use crate::serialization::*;

///
/// Arbitrary-precision integers, backed by [`num_bigint::BigInt`].
///
/// # Example
/// ```
/// # use feanor_series::ring::*;
/// # use feanor_series::rings::bigint::*;
/// let ZZ = BigIntRing::RING;
/// let x = ZZ.pow(ZZ.from_int(2), 100);
/// assert_eq!("1267650600228229401496703205376", format!("{}", ZZ.format(&x)));
/// ```
///
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct BigIntRingBase;

///
/// Arbitrary-precision integers, backed by [`num_bigint::BigInt`].
/// For details, see [`BigIntRingBase`].
///
pub type BigIntRing = RingValue<BigIntRingBase>;

impl BigIntRing {

    pub const RING: BigIntRing = RingValue::from(BigIntRingBase);
}

impl RingBase for BigIntRingBase {

    type Element = BigInt;

    fn clone_el(&self, val: &Self::Element) -> Self::Element {
        val.clone()
    }

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        *lhs += rhs;
    }

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs += rhs;
    }

    fn sub_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        *lhs -= rhs;
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        *lhs = -std::mem::take(lhs);
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs *= rhs;
    }

    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        *lhs *= rhs;
    }

    fn from_int(&self, value: i32) -> Self::Element {
        BigInt::from(value)
    }

    fn from_usize(&self, value: usize) -> Self::Element {
        BigInt::from(value)
    }

    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        lhs == rhs
    }

    fn is_zero(&self, value: &Self::Element) -> bool {
        value.is_zero()
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn is_interchangeable(&self, _other: &Self) -> bool {
        true
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result {
        write!(out, "{}", value)
    }
}

impl DivisibilityRing for BigIntRingBase {

    fn checked_left_div(&self, lhs: &Self::Element, rhs: &Self::Element) -> Option<Self::Element> {
        if rhs.is_zero() {
            return if lhs.is_zero() { Some(BigInt::zero()) } else { None };
        }
        let (quo, rem) = lhs.div_rem(rhs);
        if rem.is_zero() {
            return Some(quo);
        } else {
            return None;
        }
    }
}

impl PrincipalIdealRing for BigIntRingBase {

    fn extended_ideal_gen(&self, lhs: &Self::Element, rhs: &Self::Element) -> (Self::Element, Self::Element, Self::Element) {
        let result = lhs.extended_gcd(rhs);
        return (result.x, result.y, result.gcd);
    }
}

impl EuclideanRing for BigIntRingBase {

    fn euclidean_div_rem(&self, lhs: Self::Element, rhs: &Self::Element) -> (Self::Element, Self::Element) {
        let rem = lhs.mod_floor(&rhs.abs());
        let quo = (lhs - &rem) / rhs;
        return (quo, rem);
    }

    fn euclidean_deg(&self, val: &Self::Element) -> Option<usize> {
        val.magnitude().to_usize()
    }
}

impl SqrtRing for BigIntRingBase {

    fn checked_sqrt(&self, x: &Self::Element) -> Option<Self::Element> {
        if x.is_negative() {
            return None;
        }
        let root = <BigInt as Roots>::sqrt(x);
        if &root * &root == *x {
            return Some(root);
        } else {
            return None;
        }
    }
}

impl IntegerRing for BigIntRingBase {

    fn is_neg(&self, value: &Self::Element) -> bool {
        value.is_negative()
    }

    fn abs(&self, value: Self::Element) -> Self::Element {
        value.abs()
    }

    fn to_i128(&self, value: &Self::Element) -> Option<i128> {
        value.to_i128()
    }

    fn get_uniformly_random<G: FnMut() -> u64>(&self, bound_exclusive: &Self::Element, mut rng: G) -> Self::Element {
        assert!(bound_exclusive.is_positive());
        let bits = bound_exclusive.bits();
        let digits = (bits as usize + u32::BITS as usize - 1) / u32::BITS as usize;
        let top_mask = if bits % u32::BITS as u64 == 0 { u32::MAX } else { (1u32 << (bits % u32::BITS as u64)) - 1 };
        loop {
            let mut sample = (0..digits).map(|_| rng() as u32).collect::<Vec<_>>();
            if let Some(top) = sample.last_mut() {
                *top &= top_mask;
            }
            debug_assert!(bit_length_of_digits(&sample) as u64 <= bits);
            let sample = BigInt::from_biguint(Sign::Plus, BigUint::new(sample));
            if sample < *bound_exclusive {
                return sample;
            }
        }
    }
}

impl CanHomFrom<BigIntRingBase> for BigIntRingBase {

    type Homomorphism = ();

    fn has_canonical_hom(&self, _: &BigIntRingBase) -> Option<()> {
        Some(())
    }

    fn map_in(&self, _: &BigIntRingBase, el: BigInt, _: &()) -> BigInt {
        el
    }
}

impl<T: PrimitiveInt> CanHomFrom<StaticRingBase<T>> for BigIntRingBase {

    type Homomorphism = ();

    fn has_canonical_hom(&self, _: &StaticRingBase<T>) -> Option<()> {
        Some(())
    }

    fn map_in(&self, _: &StaticRingBase<T>, el: T, _: &()) -> BigInt {
        let value: i128 = el.into();
        BigInt::from(value)
    }
}

impl SerializableElementRing for BigIntRingBase {

    fn deserialize_element<'de, D>(&self, deserializer: D) -> Result<Self::Element, D::Error>
        where D: Deserializer<'de>
    {
        let digits = String::deserialize(deserializer)?;
        digits.parse::<BigInt>().map_err(|e| D::Error::custom(format!("invalid integer {:?}: {}", digits, e)))
    }

    fn serialize_element<S>(&self, el: &Self::Element, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.serialize_str(&el.to_str_radix(10))
    }
}

#[cfg(test)]
fn edge_case_elements() -> impl Iterator<Item = BigInt> {
    [
        BigInt::from(0),
        BigInt::from(1),
        BigInt::from(-1),
        BigInt::from(7),
        BigInt::from(-12),
        BigInt::from(u64::MAX) * BigInt::from(3),
        -(BigInt::from(1) << 100usize)
    ].into_iter()
}

#[test]
fn test_ring_axioms() {
    crate::ring::generic_tests::test_ring_axioms(BigIntRing::RING, edge_case_elements());
}

#[test]
fn test_euclidean_and_pid_axioms() {
    crate::pid::generic_tests::test_euclidean_ring_axioms(BigIntRing::RING, edge_case_elements());
    crate::pid::generic_tests::test_principal_ideal_ring_axioms(BigIntRing::RING, edge_case_elements());
}

#[test]
fn test_integer_axioms() {
    crate::integer::generic_tests::test_integer_axioms(BigIntRing::RING);
}

#[test]
fn test_euclidean_rem_is_canonical() {
    let ZZ = BigIntRing::RING;
    let (quo, rem) = ZZ.euclidean_div_rem(ZZ.from_int(-10), &ZZ.from_int(-3));
    assert_el_eq!(ZZ, ZZ.from_int(4), quo);
    assert_el_eq!(ZZ, ZZ.from_int(2), rem);
    assert_el_eq!(ZZ, ZZ.from_int(3), ZZ.euclidean_rem(ZZ.from_int(10), &ZZ.from_int(7)));
}

#[test]
fn test_coerce_from_primitive() {
    let ZZ = BigIntRing::RING;
    let x = ZZ.try_coerce(&StaticRing::<i128>::RING, i128::MIN).unwrap();
    assert_el_eq!(ZZ, -(BigInt::from(1) << 127usize), x);
}

#[test]
fn test_serialize() {
    let ZZ = BigIntRing::RING;
    let value = ZZ.add(BigInt::from(1) << 128usize, ZZ.one());
    let json = serde_json::to_string(&ElementRef::new(ZZ, &value)).unwrap();
    assert_eq!("\"340282366920938463463374607431768211457\"", json);
    crate::serialization::generic_tests::test_serialization(ZZ, edge_case_elements());
    let mut deserializer = serde_json::Deserializer::from_str("\"12a\"");
    assert!(serde::de::DeserializeSeed::deserialize(ElementSeed::new(ZZ), &mut deserializer).is_err());
}

#[test]
fn test_random_below_bound() {
    let ZZ = BigIntRing::RING;
    let mut rng = oorandom::Rand64::new(3);
    let bound = BigInt::from(1) << 70usize;
    for _ in 0..50 {
        let x = ZZ.get_uniformly_random(&bound, || rng.rand_u64());
        assert!(!x.is_negative() && x < bound);
    }
}
