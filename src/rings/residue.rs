use std::rc::Rc;

use serde::de::Error;
use serde::{Deserializer, Serializer};
use tracing::trace;

use crate::divisibility::*;
use crate::error::*;
use crate::homomorphism::*;
use crate::integer::*;
use crate::parent::*;
use crate::pid::*;
use crate::registry::*;
use crate::ring::*;
use crate::serialization::*;
use crate::wrapper::RingElementWrapper;

///
/// The residue ring `R/(m)` of a euclidean ring `R` modulo a nonzero element `m`.
///
/// Elements are stored as canonical representatives, i.e. as the euclidean remainder
/// modulo `m`. For integer base rings, these are the values `0, ..., |m| - 1`. Every
/// operation reduces its result immediately.
///
/// # Example
/// ```
/// # use feanor_series::ring::*;
/// # use feanor_series::divisibility::*;
/// # use feanor_series::primitive_int::*;
/// # use feanor_series::rings::residue::*;
/// let R = ResidueRing::new(StaticRing::<i64>::RING, 7).unwrap();
/// let a = R.from_int(10);
/// assert_eq!(3, *R.get_ring().lift(&a));
/// assert!(R.is_one(&R.mul(a, R.from_int(5))));
/// ```
///
pub struct ResidueRingBase<R: RingStore>
    where R::Type: EuclideanRing
{
    base_ring: R,
    modulus: El<R>
}

///
/// The residue ring `R/(m)`. For details, see [`ResidueRingBase`].
///
pub type ResidueRing<R> = RingValue<ResidueRingBase<R>>;

pub struct ResidueRingEl<R: RingStore>(El<R>)
    where R::Type: EuclideanRing;

///
/// Describes a residue ring for the [`ParentRegistry`].
///
pub struct ResidueRingDescriptor<R: RingStore>
    where R::Type: EuclideanRing
{
    pub base_ring: R,
    pub modulus: El<R>
}

impl<R: RingStore> ResidueRing<R>
    where R::Type: EuclideanRing
{
    pub fn new(base_ring: R, modulus: El<R>) -> RingResult<Self> {
        Ok(RingValue::from(ResidueRingBase::new(base_ring, modulus)?))
    }
}

impl<R: RingStore> ResidueRingBase<R>
    where R::Type: EuclideanRing
{
    ///
    /// Creates the ring `R/(modulus)`. Fails with [`RingError::DivisionByZero`] if
    /// the modulus is zero.
    ///
    pub fn new(base_ring: R, modulus: El<R>) -> RingResult<Self> {
        if base_ring.is_zero(&modulus) {
            return Err(RingError::DivisionByZero);
        }
        Ok(ResidueRingBase { base_ring, modulus })
    }

    pub fn modulus(&self) -> &El<R> {
        &self.modulus
    }

    ///
    /// Returns the canonical representative of `x` in the base ring.
    ///
    pub fn lift<'a>(&self, x: &'a ResidueRingEl<R>) -> &'a El<R> {
        &x.0
    }

    fn reduce(&self, x: El<R>) -> ResidueRingEl<R> {
        ResidueRingEl(self.base_ring.euclidean_rem(x, &self.modulus))
    }

    ///
    /// Computes `x^power` for a signed exponent. Negative exponents are not supported and
    /// give a [`RingError::Domain`].
    ///
    pub fn pow_int(&self, x: ResidueRingEl<R>, power: i64) -> RingResult<ResidueRingEl<R>> {
        let power = non_negative("exponent", power)?;
        Ok(self.pow_gen(x, power))
    }

    ///
    /// Returns the residue of `gcd(gcd(lift(lhs), m), lift(rhs))`.
    ///
    /// Note that this is not a gcd in the residue ring in any standard sense, it just
    /// combines the representatives with the modulus.
    ///
    pub fn gcd(&self, lhs: &ResidueRingEl<R>, rhs: &ResidueRingEl<R>) -> ResidueRingEl<R> {
        let with_modulus = self.base_ring.ideal_gen(&lhs.0, &self.modulus);
        self.reduce(self.base_ring.ideal_gen(&with_modulus, &rhs.0))
    }

    ///
    /// Computes the inverse of `x`, or fails with [`RingError::NotInvertible`] if
    /// `x` is not a unit. In particular, this is the case for `0`.
    ///
    pub fn invert(&self, x: &ResidueRingEl<R>) -> RingResult<ResidueRingEl<R>> {
        let (s, _, gcd) = self.base_ring.extended_ideal_gen(&x.0, &self.modulus);
        match self.base_ring.checked_left_div(&self.base_ring.one(), &gcd) {
            Some(gcd_inv) => Ok(self.reduce(self.base_ring.mul(s, gcd_inv))),
            None => {
                trace!(element = %self.base_ring.format(&x.0), modulus = %self.base_ring.format(&self.modulus), "element is not invertible");
                Err(RingError::NotInvertible)
            }
        }
    }
}

impl<R: RingStore> ResidueRingBase<R>
    where R::Type: IntegerRing
{
    ///
    /// Returns a uniformly random element, using the given source of random bits.
    ///
    pub fn random_element<G: FnMut() -> u64>(&self, rng: G) -> ResidueRingEl<R> {
        let bound = self.base_ring.abs(self.base_ring.clone_el(&self.modulus));
        ResidueRingEl(self.base_ring.get_uniformly_random(&bound, rng))
    }
}

impl<R: RingStore> PartialEq for ResidueRingBase<R>
    where R::Type: EuclideanRing
{
    fn eq(&self, other: &Self) -> bool {
        self.base_ring.get_ring() == other.base_ring.get_ring() && self.base_ring.eq_el(&self.modulus, &other.modulus)
    }
}

impl<R: RingStore> RingBase for ResidueRingBase<R>
    where R::Type: EuclideanRing
{
    type Element = ResidueRingEl<R>;

    fn clone_el(&self, val: &Self::Element) -> Self::Element {
        ResidueRingEl(self.base_ring.clone_el(&val.0))
    }

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        self.add_assign_ref(lhs, &rhs);
    }

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        lhs.0 = self.base_ring.euclidean_rem_of_sum(&lhs.0, &rhs.0, &self.modulus);
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        self.base_ring.negate_inplace(&mut lhs.0);
        *lhs = self.reduce(std::mem::replace(&mut lhs.0, self.base_ring.zero()));
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        self.mul_assign_ref(lhs, &rhs);
    }

    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        lhs.0 = self.base_ring.euclidean_rem_of_product(&lhs.0, &rhs.0, &self.modulus);
    }

    fn from_int(&self, value: i32) -> Self::Element {
        self.reduce(self.base_ring.from_int(value))
    }

    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        self.base_ring.eq_el(&lhs.0, &rhs.0)
    }

    fn is_zero(&self, value: &Self::Element) -> bool {
        self.base_ring.is_zero(&value.0)
    }

    fn is_commutative(&self) -> bool {
        self.base_ring.is_commutative()
    }

    fn is_interchangeable(&self, other: &Self) -> bool {
        self == other
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result {
        self.base_ring.get_ring().dbg(&value.0, out)
    }
}

impl<R: RingStore> RingExtension for ResidueRingBase<R>
    where R::Type: EuclideanRing
{
    type BaseRing = R;

    fn base_ring<'a>(&'a self) -> &'a Self::BaseRing {
        &self.base_ring
    }

    fn from(&self, x: El<Self::BaseRing>) -> Self::Element {
        self.reduce(x)
    }
}

impl<R: RingStore> DivisibilityRing for ResidueRingBase<R>
    where R::Type: EuclideanRing
{
    fn checked_left_div(&self, lhs: &Self::Element, rhs: &Self::Element) -> Option<Self::Element> {
        let inv = self.invert(rhs).ok()?;
        Some(self.mul_ref_snd(inv, lhs))
    }

    fn is_unit(&self, x: &Self::Element) -> bool {
        let gcd = self.base_ring.ideal_gen(&x.0, &self.modulus);
        self.base_ring.is_unit(&gcd)
    }

    fn try_invert(&self, x: &Self::Element) -> RingResult<Self::Element> {
        self.invert(x)
    }

    fn try_div(&self, lhs: &Self::Element, rhs: &Self::Element) -> RingResult<Self::Element> {
        let inv = self.invert(rhs)?;
        Ok(self.mul_ref_snd(inv, lhs))
    }
}

impl<R, J> CanHomFrom<J> for ResidueRingBase<R>
    where R: RingStore,
        R::Type: EuclideanRing + CanHomFrom<J>,
        J: IntegerRing + ?Sized
{
    type Homomorphism = <R::Type as CanHomFrom<J>>::Homomorphism;

    fn has_canonical_hom(&self, from: &J) -> Option<Self::Homomorphism> {
        self.base_ring.get_ring().has_canonical_hom(from)
    }

    fn map_in(&self, from: &J, el: J::Element, hom: &Self::Homomorphism) -> Self::Element {
        self.reduce(self.base_ring.get_ring().map_in(from, el, hom))
    }
}

impl<R> CanHomFrom<ResidueRingBase<R>> for ResidueRingBase<R>
    where R: RingStore,
        R::Type: EuclideanRing
{
    type Homomorphism = ();

    fn has_canonical_hom(&self, from: &ResidueRingBase<R>) -> Option<()> {
        if self == from {
            Some(())
        } else {
            None
        }
    }

    fn map_in(&self, _from: &ResidueRingBase<R>, el: ResidueRingEl<R>, _: &()) -> Self::Element {
        el
    }
}

impl<R: RingStore> SerializableElementRing for ResidueRingBase<R>
    where R::Type: EuclideanRing + SerializableElementRing
{
    fn deserialize_element<'de, D>(&self, deserializer: D) -> Result<Self::Element, D::Error>
        where D: Deserializer<'de>
    {
        let value = self.base_ring.get_ring().deserialize_element(deserializer)?;
        let reduced = self.base_ring.euclidean_rem(self.base_ring.clone_el(&value), &self.modulus);
        if !self.base_ring.eq_el(&value, &reduced) {
            return Err(D::Error::custom(format!("{} is not a canonical residue modulo {}", self.base_ring.format(&value), self.base_ring.format(&self.modulus))));
        }
        Ok(ResidueRingEl(value))
    }

    fn serialize_element<S>(&self, el: &Self::Element, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        self.base_ring.get_ring().serialize_element(&el.0, serializer)
    }
}

impl<R: RingStore> CachedParent for ResidueRingBase<R>
    where R::Type: EuclideanRing
{
    type Descriptor = ResidueRingDescriptor<R>;

    fn matches(&self, descriptor: &Self::Descriptor) -> bool {
        is_same_ring(self.base_ring.get_ring(), descriptor.base_ring.get_ring()) && self.base_ring.eq_el(&self.modulus, &descriptor.modulus)
    }

    fn create(descriptor: Self::Descriptor) -> RingResult<Self> {
        Self::new(descriptor.base_ring, descriptor.modulus)
    }
}

///
/// Returns the residue ring `base_ring / (modulus)`, cached in the given registry if
/// `cached` is set.
///
/// Fails with [`RingError::TypeMismatch`] if `modulus` is not an element of `base_ring`,
/// and with [`RingError::DivisionByZero`] if it is zero.
///
pub fn make_residue_ring<R, Q>(registry: &mut ParentRegistry<ResidueRingBase<R>>, base_ring: R, modulus: &RingElementWrapper<Q>, cached: bool) -> RingResult<Rc<ResidueRing<R>>>
    where R: RingStore,
        R::Type: EuclideanRing,
        Q: ParentHandle + RingStore<Type = R::Type>
{
    if !is_same_ring(modulus.parent().get_ring(), base_ring.get_ring()) {
        return Err(RingError::TypeMismatch);
    }
    let modulus = base_ring.clone_el(modulus.unwrap_ref());
    registry.get_or_create(ResidueRingDescriptor { base_ring, modulus }, cached)
}

impl<P, R> RingElementWrapper<P>
    where P: ParentHandle + RingStore<Type = ResidueRingBase<R>>,
        R: RingStore,
        R::Type: EuclideanRing
{
    ///
    /// Returns the residue of `gcd(gcd(lift(self), m), lift(rhs))`, see [`ResidueRingBase::gcd()`].
    ///
    pub fn gcd(&self, rhs: &Self) -> RingResult<Self> {
        check_parents(self.parent(), rhs.parent())?;
        Ok(RingElementWrapper::new(self.parent().clone(), self.parent().get_ring().gcd(self.unwrap_ref(), rhs.unwrap_ref())))
    }

    pub fn lift<'a>(&'a self) -> &'a El<R>
        where R: 'a
    {
        self.parent().get_ring().lift(self.unwrap_ref())
    }
}

#[cfg(test)]
use crate::primitive_int::StaticRing;
#[cfg(test)]
use crate::rings::bigint::BigIntRing;
#[cfg(test)]
use num_bigint::BigInt;

#[cfg(test)]
fn edge_case_elements<R: RingStore>(ring: &ResidueRing<R>) -> impl Iterator<Item = ResidueRingEl<R>> + '_
    where R::Type: EuclideanRing
{
    [0, 1, 2, 3, 5, 6, -1].into_iter().map(move |x| ring.from_int(x))
}

#[test]
fn test_ring_axioms() {
    let R = ResidueRing::new(StaticRing::<i64>::RING, 7).unwrap();
    crate::ring::generic_tests::test_ring_axioms(&R, edge_case_elements(&R));
    let R = ResidueRing::new(StaticRing::<i64>::RING, 12).unwrap();
    crate::ring::generic_tests::test_ring_axioms(&R, edge_case_elements(&R));
    let R = ResidueRing::new(BigIntRing::RING, BigInt::from(u64::MAX) * BigInt::from(5)).unwrap();
    crate::ring::generic_tests::test_ring_axioms(&R, edge_case_elements(&R));
}

#[test]
fn test_reduction_and_inverse() {
    let R = ResidueRing::new(StaticRing::<i64>::RING, 7).unwrap();
    let a = R.from_int(10);
    assert_eq!(3, *R.get_ring().lift(&a));
    assert_el_eq!(R, R.from_int(1), R.add(R.from_int(3), R.from_int(5)));
    assert_el_eq!(R, R.from_int(5), R.get_ring().invert(&R.from_int(3)).unwrap());
    assert_eq!(Err(RingError::NotInvertible), R.try_invert(&R.zero()).map(|_| ()));
    assert_eq!(Err(RingError::NotInvertible), R.try_div(&R.one(), &R.zero()).map(|_| ()));
    assert_eq!(4, *R.get_ring().lift(&R.from_int(-3)));
}

#[test]
fn test_negative_modulus() {
    let R = ResidueRing::new(StaticRing::<i64>::RING, -7).unwrap();
    assert_eq!(3, *R.get_ring().lift(&R.from_int(10)));
    assert_eq!(4, *R.get_ring().lift(&R.from_int(-3)));
    assert_el_eq!(R, R.from_int(5), R.try_invert(&R.from_int(3)).unwrap());
}

#[test]
fn test_zero_modulus() {
    assert!(matches!(ResidueRing::new(StaticRing::<i64>::RING, 0), Err(RingError::DivisionByZero)));
    let mut registry = ParentRegistry::new();
    let ZZ = StaticRing::<i64>::RING;
    assert!(matches!(make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(0), true), Err(RingError::DivisionByZero)));
    assert!(registry.is_empty());
}

#[test]
fn test_units_and_division() {
    let R = ResidueRing::new(StaticRing::<i64>::RING, 12).unwrap();
    assert!(R.is_unit(&R.from_int(5)));
    assert!(R.is_unit(&R.from_int(11)));
    assert!(!R.is_unit(&R.from_int(4)));
    assert_eq!(Err(RingError::NotInvertible), R.try_invert(&R.from_int(4)).map(|_| ()));
    assert_el_eq!(R, R.from_int(7), R.try_div(&R.from_int(11), &R.from_int(5)).unwrap());
    crate::divisibility::generic_tests::test_divisibility_axioms(&R, [1, 5, 7, 11].into_iter().map(|x| R.from_int(x)));
}

#[test]
fn test_random_inverse() {
    let R = ResidueRing::new(BigIntRing::RING, BigInt::from(1000003)).unwrap();
    let mut rng = oorandom::Rand64::new(17);
    for _ in 0..50 {
        let a = R.get_ring().random_element(|| rng.rand_u64());
        if R.is_zero(&a) {
            continue;
        }
        let a_inv = R.try_invert(&a).unwrap();
        assert_el_eq!(R, R.one(), R.mul(a, a_inv));
    }
    let R = ResidueRing::new(StaticRing::<i64>::RING, 360).unwrap();
    for _ in 0..50 {
        let a = R.get_ring().random_element(|| rng.rand_u64());
        assert!(*R.get_ring().lift(&a) >= 0 && *R.get_ring().lift(&a) < 360);
        if R.is_unit(&a) {
            assert_el_eq!(R, R.one(), R.mul_ref(&a, &R.try_invert(&a).unwrap()));
        } else {
            assert!(R.try_invert(&a).is_err());
        }
    }
}

#[test]
fn test_large_modulus() {
    let R = ResidueRing::new(StaticRing::<i64>::RING, 1 << 40).unwrap();
    let a = R.from(1 << 39);
    assert!(R.is_zero(&R.mul_ref(&a, &a)));
    assert_el_eq!(R, R.one(), R.pow(R.from((1 << 39) + 1), 2));
    assert_el_eq!(R, R.one(), R.mul(R.from(-1), R.from(-1)));

    let R = ResidueRing::new(StaticRing::<i64>::RING, i64::MAX).unwrap();
    assert_el_eq!(R, R.from(4), R.mul(R.from(i64::MAX - 2), R.from(i64::MAX - 2)));
    crate::ring::generic_tests::test_ring_axioms(&R, [0, 1, 2, i64::MAX - 1, i64::MAX / 2].into_iter().map(|x| R.from(x)));

    let R = ResidueRing::new(StaticRing::<i128>::RING, i128::MAX).unwrap();
    assert_el_eq!(R, R.from(3), R.add(R.from(i128::MAX - 2), R.from(5)));
    assert_el_eq!(R, R.from(1 << 73), R.pow(R.from(1 << 100), 2));
    assert_el_eq!(R, R.one(), R.mul(R.from(i128::MAX - 1), R.from(i128::MAX - 1)));
    assert_el_eq!(R, R.one(), R.mul(R.from(1 << 64), R.from(1 << 63)));
}

#[test]
fn test_pow() {
    let R = ResidueRing::new(StaticRing::<i64>::RING, 7).unwrap();
    assert_el_eq!(R, R.from_int(1), R.pow(R.from_int(3), 6));
    assert_el_eq!(R, R.from_int(6), R.get_ring().pow_int(R.from_int(3), 3).unwrap());
    assert_el_eq!(R, R.from_int(1), R.get_ring().pow_int(R.from_int(0), 0).unwrap());
    assert_eq!(Err(RingError::Domain { what: "exponent", value: -1 }), R.get_ring().pow_int(R.from_int(3), -1).map(|_| ()));
}

#[test]
fn test_gcd() {
    let R = ResidueRing::new(StaticRing::<i64>::RING, 12).unwrap();
    assert_el_eq!(R, R.from_int(2), R.get_ring().gcd(&R.from_int(8), &R.from_int(6)));
    assert_el_eq!(R, R.from_int(4), R.get_ring().gcd(&R.from_int(8), &R.from_int(0)));
    assert_el_eq!(R, R.from_int(0), R.get_ring().gcd(&R.from_int(0), &R.from_int(0)));
    assert_el_eq!(R, R.from_int(1), R.get_ring().gcd(&R.from_int(3), &R.from_int(4)));
}

#[test]
fn test_registry_and_parent_checks() {
    let ZZ = StaticRing::<i64>::RING;
    let mut registry = ParentRegistry::new();
    let R = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(7), true).unwrap();
    let S = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(7), true).unwrap();
    let T = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(7), false).unwrap();
    let U = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(5), true).unwrap();
    assert!(Rc::ptr_eq(&R, &S));
    assert!(!Rc::ptr_eq(&R, &T));
    assert_eq!(2, registry.len());

    // equal but distinct parents are tolerated
    let sum = R.coerce_int(3).try_add(T.coerce_int(5)).unwrap();
    assert_eq!(1, *sum.lift());
    assert!(R.coerce_int(3).try_eq(&T.coerce_int(10)).unwrap());
    assert_eq!(Err(RingError::IncompatibleModuli), R.coerce_int(3).try_add(U.coerce_int(5)).map(|_| ()));
    assert_eq!(Err(RingError::IncompatibleModuli), R.coerce_int(3).try_eq(&U.coerce_int(3)));

    assert!(registry.evict(&ResidueRingDescriptor { base_ring: ZZ, modulus: 7 }).is_some());
    let V = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(7), true).unwrap();
    assert!(!Rc::ptr_eq(&R, &V));
    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn test_modulus_from_other_handle() {
    let ZZ = StaticRing::<i64>::RING;
    let mut registry = ParentRegistry::new();
    let R = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(7), true).unwrap();
    let shared_ZZ = Rc::new(StaticRing::<i64>::RING);
    let S = make_residue_ring(&mut registry, ZZ, &shared_ZZ.coerce_int(7), true).unwrap();
    assert!(Rc::ptr_eq(&R, &S));
}

#[test]
fn test_coerce_from_integers() {
    let R = ResidueRing::new(StaticRing::<i64>::RING, 7).unwrap();
    assert_el_eq!(R, R.from_int(3), R.try_coerce(&StaticRing::<i64>::RING, 10).unwrap());
    let S = ResidueRing::new(BigIntRing::RING, BigInt::from(7)).unwrap();
    assert_el_eq!(S, S.from_int(3), S.try_coerce(&StaticRing::<i32>::RING, -4).unwrap());
    let T = ResidueRing::new(StaticRing::<i64>::RING, 5).unwrap();
    assert_eq!(Err(RingError::TypeMismatch), R.try_coerce(&T, T.one()).map(|_| ()));
    let R2 = ResidueRing::new(StaticRing::<i64>::RING, 7).unwrap();
    assert_el_eq!(R, R.from_int(4), R.try_coerce(&R2, R2.from_int(4)).unwrap());
}

#[test]
fn test_serialization() {
    let R = ResidueRing::new(BigIntRing::RING, BigInt::from(1) << 80usize).unwrap();
    crate::serialization::generic_tests::test_serialization(&R, edge_case_elements(&R));
    let mut deserializer = serde_json::Deserializer::from_str("\"1208925819614629174706176\"");
    assert!(serde::de::DeserializeSeed::deserialize(ElementSeed::new(&R), &mut deserializer).is_err());
}
