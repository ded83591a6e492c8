use std::rc::Rc;

use crate::error::*;
use crate::homomorphism::*;
use crate::ring::*;
use crate::wrapper::RingElementWrapper;

///
/// A [`RingStore`] that can be cloned cheaply and whose clones can be recognized as
/// the same parent. Elements wrapped in a [`RingElementWrapper`] carry such a handle
/// as back-reference to their parent, never a copy of the parent's state.
///
/// Shared parents (as handed out by [`crate::registry::ParentRegistry`]) are identified
/// by pointer, rings held by value (like [`crate::primitive_int::StaticRing`]) are
/// singletons and identified by structural equality.
///
pub trait ParentHandle: RingStore + Clone {

    ///
    /// Whether `self` and `other` refer to the same parent object.
    ///
    fn is_same_instance(&self, other: &Self) -> bool;

    fn coerce_zero(&self) -> RingElementWrapper<Self> {
        RingElementWrapper::new(self.clone(), self.zero())
    }

    ///
    /// Maps the integer into this ring, i.e. interprets it in the base ring and reduces
    /// it, if the ring is a quotient.
    ///
    fn coerce_int(&self, value: i32) -> RingElementWrapper<Self> {
        RingElementWrapper::new(self.clone(), self.from_int(value))
    }

    ///
    /// Maps an element of the base ring into this ring. Fails with [`RingError::TypeMismatch`]
    /// if the parent of `value` is not the base ring of this ring.
    ///
    fn coerce_base<Q>(&self, value: &RingElementWrapper<Q>) -> RingResult<RingElementWrapper<Self>>
        where Self::Type: RingExtension,
            Q: ParentHandle + RingStore<Type = <<Self::Type as RingExtension>::BaseRing as RingStore>::Type>
    {
        if !is_same_ring(value.parent().get_ring(), self.get_ring().base_ring().get_ring()) {
            return Err(RingError::TypeMismatch);
        }
        Ok(RingElementWrapper::new(self.clone(), self.get_ring().from_ref(value.unwrap_ref())))
    }

    ///
    /// Identity coercion: returns `value` unchanged if it belongs to this parent. Elements of
    /// a distinct but interchangeable parent are rewrapped without touching the element.
    ///
    fn coerce_el(&self, value: RingElementWrapper<Self>) -> RingResult<RingElementWrapper<Self>> {
        if value.parent().is_same_instance(self) {
            return Ok(value);
        } else if self.get_ring().is_interchangeable(value.parent().get_ring()) {
            return Ok(RingElementWrapper::new(self.clone(), value.unwrap()));
        } else {
            return Err(RingError::TypeMismatch);
        }
    }

    ///
    /// Maps an element of another ring into this ring via the canonical homomorphism.
    /// Fails with [`RingError::TypeMismatch`] if there is none.
    ///
    fn coerce_from<S>(&self, from: S, el: El<S>) -> RingResult<RingElementWrapper<Self>>
        where S: RingStore, Self::Type: CanHomFrom<S::Type>
    {
        let hom = CanHom::new(from, self).ok_or(RingError::TypeMismatch)?;
        Ok(RingElementWrapper::new(self.clone(), hom.map(el)))
    }
}

pub(crate) fn is_same_ring<R: RingBase + ?Sized>(lhs: &R, rhs: &R) -> bool {
    std::ptr::eq(lhs, rhs) || lhs == rhs
}

impl<R: RingStore> ParentHandle for Rc<R> {

    fn is_same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<'a, R: RingStore> ParentHandle for &'a R {

    fn is_same_instance(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

impl<'a, R: RingBase + ?Sized> ParentHandle for RingRef<'a, R> {

    fn is_same_instance(&self, other: &Self) -> bool {
        std::ptr::eq(self.get_ring(), other.get_ring())
    }
}

impl<R: RingBase + Clone> ParentHandle for RingValue<R> {

    fn is_same_instance(&self, other: &Self) -> bool {
        self.get_ring() == other.get_ring()
    }
}

///
/// Checks that elements of `lhs` and `rhs` may be combined. Identical parents always pass,
/// distinct instances only if the ring considers them interchangeable (see
/// [`RingBase::is_interchangeable()`]).
///
pub fn check_parents<P: ParentHandle>(lhs: &P, rhs: &P) -> RingResult<()> {
    if lhs.is_same_instance(rhs) || lhs.get_ring().is_interchangeable(rhs.get_ring()) {
        Ok(())
    } else {
        Err(RingError::IncompatibleModuli)
    }
}

#[cfg(test)]
use crate::primitive_int::StaticRing;
#[cfg(test)]
use crate::rings::bigint::BigIntRing;

#[test]
fn test_handles_identify_instances() {
    let first = Rc::new(StaticRing::<i64>::RING);
    let second = Rc::new(StaticRing::<i64>::RING);
    assert!(first.is_same_instance(&first.clone()));
    assert!(!first.is_same_instance(&second));
    assert!(check_parents(&first, &second).is_ok());
    assert!(StaticRing::<i64>::RING.is_same_instance(&StaticRing::<i64>::RING));
}

#[test]
fn test_coerce() {
    let ZZ = StaticRing::<i64>::RING;
    assert_eq!(0, *ZZ.coerce_zero());
    assert_eq!(-3, *ZZ.coerce_int(-3));
    let x = ZZ.coerce_int(5);
    assert_eq!(5, *ZZ.coerce_el(x).unwrap());
    let y = BigIntRing::RING.coerce_from(ZZ, 12).unwrap();
    assert_eq!(Some(12), num_traits::ToPrimitive::to_i64(y.unwrap_ref()));
}
