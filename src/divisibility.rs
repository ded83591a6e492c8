use crate::error::*;
use crate::ring::*;

///
/// Trait for rings that support checking divisibility, i.e.
/// whether for `x, y` there is `k` such that `x = ky`.
///
/// The functions returning [`RingResult`] are the ones user-facing code should call,
/// since they report why a division failed. Rings with more specific failure modes
/// (e.g. distinguishing division by zero from division by a non-unit) override them.
///
pub trait DivisibilityRing: RingBase {

    ///
    /// Checks whether there is an element `x` such that `rhs * x = lhs`, and
    /// returns it if it exists. Note that this does not have to be unique, if
    /// rhs is a left zero-divisor.
    ///
    fn checked_left_div(&self, lhs: &Self::Element, rhs: &Self::Element) -> Option<Self::Element>;

    fn is_unit(&self, x: &Self::Element) -> bool {
        self.checked_left_div(&self.one(), x).is_some()
    }

    fn try_invert(&self, x: &Self::Element) -> RingResult<Self::Element> {
        if self.is_zero(x) {
            return Err(RingError::DivisionByZero);
        }
        self.checked_left_div(&self.one(), x).ok_or(RingError::NotInvertible)
    }

    fn try_div(&self, lhs: &Self::Element, rhs: &Self::Element) -> RingResult<Self::Element> {
        if self.is_zero(rhs) {
            return Err(RingError::DivisionByZero);
        }
        self.checked_left_div(lhs, rhs).ok_or(RingError::NotExactDivision)
    }
}

///
/// [`RingStore`] for [`DivisibilityRing`]s
///
pub trait DivisibilityRingStore: RingStore
    where Self::Type: DivisibilityRing
{
    delegate!{ fn checked_left_div(&self, lhs: &El<Self>, rhs: &El<Self>) -> Option<El<Self>> }
    delegate!{ fn is_unit(&self, x: &El<Self>) -> bool }
    delegate!{ fn try_invert(&self, x: &El<Self>) -> RingResult<El<Self>> }
    delegate!{ fn try_div(&self, lhs: &El<Self>, rhs: &El<Self>) -> RingResult<El<Self>> }

    fn checked_div(&self, lhs: &El<Self>, rhs: &El<Self>) -> Option<El<Self>> {
        assert!(self.is_commutative());
        self.checked_left_div(lhs, rhs)
    }
}

impl<R> DivisibilityRingStore for R
    where R: RingStore, R::Type: DivisibilityRing
{}

///
/// Trait for rings in which one can decide whether an element is a square, and compute
/// a square root if it is.
///
pub trait SqrtRing: RingBase {

    ///
    /// Returns `y` with `y^2 = x`, or `None` if `x` is not a square.
    ///
    fn checked_sqrt(&self, x: &Self::Element) -> Option<Self::Element>;
}

///
/// [`RingStore`] for [`SqrtRing`]s
///
pub trait SqrtRingStore: RingStore
    where Self::Type: SqrtRing
{
    delegate!{ fn checked_sqrt(&self, x: &El<Self>) -> Option<El<Self>> }
}

impl<R> SqrtRingStore for R
    where R: RingStore, R::Type: SqrtRing
{}

#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use super::*;

    pub fn test_divisibility_axioms<R: DivisibilityRingStore, I: Iterator<Item = El<R>>>(ring: R, edge_case_elements: I)
        where R::Type: DivisibilityRing
    {
        assert!(ring.is_commutative());
        let elements = edge_case_elements.collect::<Vec<_>>();
        for a in &elements {
            for b in &elements {
                let ab = ring.mul_ref(a, b);
                let c = ring.checked_div(&ab, a);
                assert!(c.is_some(), "Divisibility of {} by {} failed", ring.format(&ab), ring.format(a));
                assert_el_eq!(ring, ab, ring.mul_ref_fst(a, c.unwrap()));
            }
        }
        for a in &elements {
            if ring.is_unit(a) {
                let inv = ring.try_invert(a).unwrap();
                assert_el_eq!(ring, ring.one(), ring.mul_ref(a, &inv));
            } else {
                assert!(ring.try_invert(a).is_err());
            }
        }
    }
}
