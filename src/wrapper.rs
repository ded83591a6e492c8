use std::fmt::{Debug, Display};
use std::ops::*;

use crate::divisibility::*;
use crate::error::*;
use crate::parent::*;
use crate::ring::*;

///
/// Stores a ring element together with a handle to its parent, so that ring operations do
/// not require explicit mention of the ring object.
///
/// Binary operations check that both operands come from compatible parents (see
/// [`check_parents()`]). The `try_*` functions return the resulting error, while the
/// operator overloads panic on it.
///
/// # Examples
/// ```
/// # use std::rc::Rc;
/// # use feanor_series::ring::*;
/// # use feanor_series::parent::*;
/// # use feanor_series::primitive_int::*;
/// let ZZ = Rc::new(StaticRing::<i64>::RING);
/// let x = ZZ.coerce_int(3);
/// let y = ZZ.coerce_int(4);
/// assert_eq!(21, (x.clone() * x + y.clone() + y.clone() + y).unwrap());
/// ```
///
pub struct RingElementWrapper<P>
    where P: ParentHandle
{
    ring: P,
    element: El<P>
}

impl<P: ParentHandle> RingElementWrapper<P> {

    pub const fn new(ring: P, element: El<P>) -> Self {
        Self { ring, element }
    }

    pub fn parent(&self) -> &P {
        &self.ring
    }

    pub fn unwrap(self) -> El<P> {
        self.element
    }

    pub fn unwrap_ref(&self) -> &El<P> {
        &self.element
    }

    pub fn try_add(self, rhs: Self) -> RingResult<Self> {
        check_parents(&self.ring, &rhs.ring)?;
        Ok(Self { element: self.ring.add(self.element, rhs.element), ring: self.ring })
    }

    pub fn try_sub(self, rhs: Self) -> RingResult<Self> {
        check_parents(&self.ring, &rhs.ring)?;
        Ok(Self { element: self.ring.sub(self.element, rhs.element), ring: self.ring })
    }

    pub fn try_mul(self, rhs: Self) -> RingResult<Self> {
        check_parents(&self.ring, &rhs.ring)?;
        Ok(Self { element: self.ring.mul(self.element, rhs.element), ring: self.ring })
    }

    pub fn try_eq(&self, rhs: &Self) -> RingResult<bool> {
        check_parents(&self.ring, &rhs.ring)?;
        Ok(self.ring.eq_el(&self.element, &rhs.element))
    }

    pub fn pow(self, power: usize) -> Self {
        Self {
            element: self.ring.pow(self.element, power),
            ring: self.ring
        }
    }

    pub fn is_zero(&self) -> bool {
        self.ring.is_zero(&self.element)
    }

    pub fn is_one(&self) -> bool {
        self.ring.is_one(&self.element)
    }
}

impl<P: ParentHandle> RingElementWrapper<P>
    where P::Type: DivisibilityRing
{
    pub fn try_div(self, rhs: Self) -> RingResult<Self> {
        check_parents(&self.ring, &rhs.ring)?;
        Ok(Self { element: self.ring.try_div(&self.element, &rhs.element)?, ring: self.ring })
    }

    pub fn invert(&self) -> RingResult<Self> {
        Ok(Self { element: self.ring.try_invert(&self.element)?, ring: self.ring.clone() })
    }

    pub fn is_unit(&self) -> bool {
        self.ring.is_unit(&self.element)
    }
}

fn unwrap_or_panic<T>(result: RingResult<T>) -> T {
    result.unwrap_or_else(|e| panic!("{}", e))
}

macro_rules! impl_xassign_trait {
    ($trait_name:ident, $fn_name:ident, $fn_ref_name:ident) => {

        /// # Panics
        /// If the operands belong to incompatible parents.
        impl<P: ParentHandle> $trait_name for RingElementWrapper<P> {

            fn $fn_name(&mut self, rhs: Self) {
                unwrap_or_panic(check_parents(&self.ring, &rhs.ring));
                self.ring.$fn_name(&mut self.element, rhs.element);
            }
        }

        /// # Panics
        /// If the operands belong to incompatible parents.
        impl<'a, P: ParentHandle> $trait_name<&'a Self> for RingElementWrapper<P> {

            fn $fn_name(&mut self, rhs: &'a Self) {
                unwrap_or_panic(check_parents(&self.ring, &rhs.ring));
                self.ring.$fn_ref_name(&mut self.element, &rhs.element);
            }
        }
    };
}

macro_rules! impl_trait {
    ($trait_name:ident, $fn_name:ident, $try_fn_name:ident, $fn_ref_name:ident) => {

        /// # Panics
        /// If the operands belong to incompatible parents.
        impl<P: ParentHandle> $trait_name for RingElementWrapper<P> {
            type Output = Self;

            fn $fn_name(self, rhs: Self) -> Self::Output {
                unwrap_or_panic(self.$try_fn_name(rhs))
            }
        }

        /// # Panics
        /// If the operands belong to incompatible parents.
        impl<'a, P: ParentHandle> $trait_name for &'a RingElementWrapper<P> {
            type Output = RingElementWrapper<P>;

            fn $fn_name(self, rhs: Self) -> Self::Output {
                unwrap_or_panic(check_parents(&self.ring, &rhs.ring));
                RingElementWrapper { ring: self.ring.clone(), element: self.ring.$fn_ref_name(&self.element, &rhs.element) }
            }
        }
    };
}

impl_xassign_trait!{ AddAssign, add_assign, add_assign_ref }
impl_xassign_trait!{ MulAssign, mul_assign, mul_assign_ref }
impl_xassign_trait!{ SubAssign, sub_assign, sub_assign_ref }
impl_trait!{ Add, add, try_add, add_ref }
impl_trait!{ Mul, mul, try_mul, mul_ref }
impl_trait!{ Sub, sub, try_sub, sub_ref }

impl<P: ParentHandle> Neg for RingElementWrapper<P> {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self { element: self.ring.negate(self.element), ring: self.ring }
    }
}

impl<P: ParentHandle> Clone for RingElementWrapper<P> {

    fn clone(&self) -> Self {
        Self { ring: self.ring.clone(), element: self.ring.clone_el(&self.element) }
    }
}

///
/// # Panics
/// If the operands belong to incompatible parents, use [`RingElementWrapper::try_eq()`]
/// to get an error instead.
///
impl<P: ParentHandle> PartialEq for RingElementWrapper<P> {

    fn eq(&self, other: &Self) -> bool {
        unwrap_or_panic(self.try_eq(other))
    }
}

impl<P: ParentHandle> Display for RingElementWrapper<P> {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ring.get_ring().dbg(&self.element, f)
    }
}

impl<P: ParentHandle> Debug for RingElementWrapper<P> {

    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.ring.get_ring().dbg(&self.element, f)
    }
}

impl<P: ParentHandle> Deref for RingElementWrapper<P> {
    type Target = El<P>;

    fn deref(&self) -> &Self::Target {
        &self.element
    }
}

#[cfg(test)]
use std::rc::Rc;
#[cfg(test)]
use crate::primitive_int::StaticRing;

#[test]
fn test_operators() {
    let ring = Rc::new(StaticRing::<i64>::RING);
    let a = ring.coerce_int(3);
    let b = ring.coerce_int(5);
    assert_eq!(8, *(&a + &b));
    assert_eq!(-2, *(&a - &b));
    assert_eq!(15, *(a.clone() * b.clone()));
    assert_eq!(-3, *(-a.clone()));
    assert_eq!(243, *a.clone().pow(5));
    let mut c = a.clone();
    c += &b;
    c *= b.clone();
    assert_eq!(40, *c);
    assert!(a.try_eq(&ring.coerce_int(3)).unwrap());
    assert_eq!("3", format!("{}", a));
}

#[test]
fn test_division() {
    let ring = Rc::new(StaticRing::<i64>::RING);
    assert_eq!(4, *ring.coerce_int(12).try_div(ring.coerce_int(3)).unwrap());
    assert_eq!(Err(RingError::NotExactDivision), ring.coerce_int(12).try_div(ring.coerce_int(5)).map(|x| x.unwrap()));
    assert_eq!(Err(RingError::DivisionByZero), ring.coerce_int(12).try_div(ring.coerce_int(0)).map(|x| x.unwrap()));
    assert!(ring.coerce_int(-1).is_unit());
    assert_eq!(-1, *ring.coerce_int(-1).invert().unwrap());
}
