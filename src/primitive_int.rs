use std::fmt::Display;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::algorithms;
use crate::divisibility::*;
use crate::homomorphism::*;
use crate::integer::*;
use crate::pid::*;
use crate::ring::*;
use crate::serialization::*;

///
/// Trait for the primitive signed integer types that can be used as elements
/// of a [`StaticRing`].
///
/// All computations are performed by converting to `i128`; overflow when converting
/// back panics, as overflow of the primitive arithmetic would.
///
pub trait PrimitiveInt: 'static + Copy + Eq + Ord + Display + From<i32> + Into<i128> + TryFrom<i128> + Serialize + for<'de> Deserialize<'de> {

    fn bits() -> usize;
}

impl PrimitiveInt for i32 {
    fn bits() -> usize { Self::BITS as usize }
}

impl PrimitiveInt for i64 {
    fn bits() -> usize { Self::BITS as usize }
}

impl PrimitiveInt for i128 {
    fn bits() -> usize { Self::BITS as usize }
}

fn widen<T: PrimitiveInt>(value: T) -> i128 {
    value.into()
}

fn from_i128<T: PrimitiveInt>(value: i128) -> T {
    T::try_from(value).unwrap_or_else(|_| panic!("integer overflow: {} does not fit into {} bits", value, T::bits()))
}

fn add_mod(lhs: u128, rhs: u128, modulus: u128) -> u128 {
    // both summands are below `modulus <= 2^127`, so this cannot overflow
    let sum = lhs + rhs;
    if sum >= modulus { sum - modulus } else { sum }
}

///
/// Double-and-add multiplication of `lhs, rhs < modulus`, for products that do not fit
/// into 128 bits.
///
fn mul_mod(mut lhs: u128, mut rhs: u128, modulus: u128) -> u128 {
    let mut result = 0;
    while rhs > 0 {
        if rhs & 1 == 1 {
            result = add_mod(result, lhs, modulus);
        }
        lhs = add_mod(lhs, lhs, modulus);
        rhs >>= 1;
    }
    return result;
}

///
/// The ring of integers, represented by a primitive integer type `T`.
///
/// # Example
/// ```
/// # use feanor_series::ring::*;
/// # use feanor_series::primitive_int::*;
/// let ZZ = StaticRing::<i64>::RING;
/// assert_eq!(8, ZZ.pow(2, 3));
/// ```
///
pub struct StaticRingBase<T> {
    element: PhantomData<T>
}

impl<T> PartialEq for StaticRingBase<T> {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl<T> Copy for StaticRingBase<T> {}

impl<T> Clone for StaticRingBase<T> {

    fn clone(&self) -> Self {
        *self
    }
}

///
/// The ring of integers, represented by a primitive integer type `T`.
/// For details, see [`StaticRingBase`].
///
pub type StaticRing<T> = RingValue<StaticRingBase<T>>;

impl<T: PrimitiveInt> RingValue<StaticRingBase<T>> {
    pub const RING: StaticRing<T> = RingValue::from(StaticRingBase { element: PhantomData });
}

impl<T: PrimitiveInt> RingBase for StaticRingBase<T> {

    type Element = T;

    fn clone_el(&self, val: &Self::Element) -> Self::Element {
        *val
    }

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs = from_i128(widen(*lhs) + widen(rhs));
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        *lhs = from_i128(-widen(*lhs));
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        *lhs = from_i128(widen(*lhs) * widen(rhs));
    }

    fn from_int(&self, value: i32) -> Self::Element {
        T::from(value)
    }

    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        *lhs == *rhs
    }

    fn is_commutative(&self) -> bool {
        true
    }

    fn is_interchangeable(&self, _other: &Self) -> bool {
        true
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result {
        write!(out, "{}", *value)
    }
}

impl<T: PrimitiveInt> DivisibilityRing for StaticRingBase<T> {

    fn checked_left_div(&self, lhs: &Self::Element, rhs: &Self::Element) -> Option<Self::Element> {
        if self.is_zero(lhs) && self.is_zero(rhs) {
            return Some(self.zero());
        } else if self.is_zero(rhs) {
            return None;
        }
        let (div, rem) = self.euclidean_div_rem(*lhs, rhs);
        if self.is_zero(&rem) {
            return Some(div);
        } else {
            return None;
        }
    }
}

impl<T: PrimitiveInt> PrincipalIdealRing for StaticRingBase<T> {

    fn extended_ideal_gen(&self, lhs: &Self::Element, rhs: &Self::Element) -> (Self::Element, Self::Element, Self::Element) {
        let (s, t, d) = algorithms::eea::eea(*lhs, *rhs, RingRef::new(self));
        if self.is_neg(&d) {
            return (self.negate(s), self.negate(t), self.negate(d));
        } else {
            return (s, t, d);
        }
    }
}

impl<T: PrimitiveInt> EuclideanRing for StaticRingBase<T> {

    fn euclidean_div_rem(&self, lhs: Self::Element, rhs: &Self::Element) -> (Self::Element, Self::Element) {
        let (lhs, rhs) = (widen(lhs), widen(*rhs));
        let rem = lhs.rem_euclid(rhs);
        return (from_i128((lhs - rem) / rhs), from_i128(rem));
    }

    fn euclidean_rem_of_sum(&self, lhs: &Self::Element, rhs: &Self::Element, modulus: &Self::Element) -> Self::Element {
        let modulus = widen(*modulus);
        let (lhs, rhs) = (widen(*lhs).rem_euclid(modulus), widen(*rhs).rem_euclid(modulus));
        let rem = match lhs.checked_add(rhs) {
            Some(sum) => sum.rem_euclid(modulus),
            None => add_mod(lhs.unsigned_abs(), rhs.unsigned_abs(), modulus.unsigned_abs()) as i128
        };
        return from_i128(rem);
    }

    fn euclidean_rem_of_product(&self, lhs: &Self::Element, rhs: &Self::Element, modulus: &Self::Element) -> Self::Element {
        let modulus = widen(*modulus);
        let (lhs, rhs) = (widen(*lhs).rem_euclid(modulus), widen(*rhs).rem_euclid(modulus));
        let rem = match lhs.checked_mul(rhs) {
            Some(product) => product.rem_euclid(modulus),
            None => mul_mod(lhs.unsigned_abs(), rhs.unsigned_abs(), modulus.unsigned_abs()) as i128
        };
        return from_i128(rem);
    }

    fn euclidean_deg(&self, val: &Self::Element) -> Option<usize> {
        usize::try_from(widen(*val).unsigned_abs()).ok()
    }
}

impl<T: PrimitiveInt> SqrtRing for StaticRingBase<T> {

    fn checked_sqrt(&self, x: &Self::Element) -> Option<Self::Element> {
        let x = widen(*x);
        if x < 0 {
            return None;
        }
        // the float approximation is off by at most one for values below 2^104,
        // larger values are corrected by the newton steps below
        let mut root = (x as f64).sqrt() as i128;
        while root.checked_mul(root).map(|sq| sq > x).unwrap_or(true) {
            root = (root + x / root) / 2;
        }
        while (root + 1).checked_mul(root + 1).map(|sq| sq <= x).unwrap_or(false) {
            root += 1;
        }
        if root * root == x {
            return Some(from_i128(root));
        } else {
            return None;
        }
    }
}

impl<T: PrimitiveInt> IntegerRing for StaticRingBase<T> {

    fn is_neg(&self, value: &Self::Element) -> bool {
        widen(*value) < 0
    }

    fn to_i128(&self, value: &Self::Element) -> Option<i128> {
        Some(widen(*value))
    }

    fn get_uniformly_random<G: FnMut() -> u64>(&self, bound_exclusive: &Self::Element, mut rng: G) -> Self::Element {
        let bound = widen(*bound_exclusive);
        assert!(bound > 0);
        let bits = i128::BITS - bound.leading_zeros();
        let mask = if bits >= u128::BITS { u128::MAX } else { (1u128 << bits) - 1 };
        loop {
            let sample = ((((rng() as u128) << u64::BITS) | (rng() as u128)) & mask) as i128;
            if sample < bound {
                return from_i128(sample);
            }
        }
    }
}

impl<T: PrimitiveInt> CanHomFrom<StaticRingBase<T>> for StaticRingBase<T> {

    type Homomorphism = ();

    fn has_canonical_hom(&self, _: &StaticRingBase<T>) -> Option<()> {
        Some(())
    }

    fn map_in(&self, _: &StaticRingBase<T>, el: T, _: &()) -> T {
        el
    }
}

impl<T: PrimitiveInt> SerializableElementRing for StaticRingBase<T> {

    fn deserialize_element<'de, D>(&self, deserializer: D) -> Result<Self::Element, D::Error>
        where D: Deserializer<'de>
    {
        <T as Deserialize>::deserialize(deserializer)
    }

    fn serialize_element<S>(&self, el: &Self::Element, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        <T as Serialize>::serialize(el, serializer)
    }
}

#[cfg(test)]
use crate::pid::generic_tests::*;

#[test]
fn test_ring_axioms() {
    crate::ring::generic_tests::test_ring_axioms(StaticRing::<i64>::RING, [-6, -1, 0, 1, 2, 5, 9].into_iter());
    crate::divisibility::generic_tests::test_divisibility_axioms(StaticRing::<i32>::RING, [-6, -1, 1, 2, 5].into_iter());
}

#[test]
fn test_euclidean_and_pid_axioms() {
    test_euclidean_ring_axioms(StaticRing::<i64>::RING, [-6, -1, 0, 1, 2, 5, 9].into_iter());
    test_principal_ideal_ring_axioms(StaticRing::<i128>::RING, [-6, -1, 0, 1, 2, 5, 9].into_iter());
}

#[test]
fn test_integer_axioms() {
    crate::integer::generic_tests::test_integer_axioms(StaticRing::<i64>::RING);
    crate::integer::generic_tests::test_integer_axioms(StaticRing::<i128>::RING);
}

#[test]
fn test_euclidean_rem_is_canonical() {
    let ZZ = StaticRing::<i64>::RING;
    assert_eq!((-4, 2), ZZ.euclidean_div_rem(-10, &3));
    assert_eq!((4, 2), ZZ.euclidean_div_rem(-10, &-3));
    assert_eq!(3, ZZ.euclidean_rem(10, &7));
}

#[test]
fn test_extended_ideal_gen() {
    let ZZ = StaticRing::<i64>::RING;
    let (s, t, g) = ZZ.extended_ideal_gen(&-6, &-9);
    assert_eq!(3, g);
    assert_eq!(3, s * -6 + t * -9);
    let (_, _, g) = ZZ.extended_ideal_gen(&0, &0);
    assert_eq!(0, g);
}

#[test]
fn test_checked_sqrt() {
    let ZZ = StaticRing::<i128>::RING;
    assert_eq!(Some(0), ZZ.checked_sqrt(&0));
    assert_eq!(Some(12), ZZ.checked_sqrt(&144));
    assert_eq!(None, ZZ.checked_sqrt(&145));
    let large = (1i128 << 62) + 7;
    assert_eq!(Some(large), ZZ.checked_sqrt(&(large * large)));
    assert_eq!(None, ZZ.checked_sqrt(&(large * large + 1)));
}

#[test]
#[should_panic]
fn test_overflow_panics() {
    let ZZ = StaticRing::<i32>::RING;
    ZZ.mul(i32::MAX, 2);
}
