use std::cmp::{max, min};

use crate::ring::*;

use super::PowerSeriesRingBase;

///
/// Low-level mutation of power series, writing the result of an operation into an
/// existing element and reusing its storage.
///
/// The results (including their precision) are exactly those of the corresponding
/// operations of [`RingBase`]. The previous content of `dst` is discarded. Since
/// `dst` is borrowed mutably, it cannot be one of the operands; to update an element
/// in terms of itself, use the assigning operations of [`RingBase`] instead.
///
/// This is meant for accumulation loops (like Horner evaluation or square-and-multiply),
/// where it avoids reallocating the coefficient storage in every step.
///
pub trait SeriesMutation: RingBase {

    fn mul_into(&self, dst: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element);

    fn add_into(&self, dst: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element);

    ///
    /// Sets `dst` to zero, known up to the given precision (or the maximal precision of
    /// the ring, whichever is smaller).
    ///
    fn zero_out(&self, dst: &mut Self::Element, precision: usize);
}

impl<R: RingStore> SeriesMutation for PowerSeriesRingBase<R> {

    fn mul_into(&self, dst: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) {
        let precision = min(
            lhs.precision.saturating_add(self.valuation(rhs)),
            rhs.precision.saturating_add(self.valuation(lhs))
        );
        self.zero_out(dst, precision);
        if lhs.coefficients.is_empty() || rhs.coefficients.is_empty() {
            return;
        }
        let (lhs_len, rhs_len) = (lhs.coefficients.len(), rhs.coefficients.len());
        let len = min(lhs_len + rhs_len - 1, dst.precision);
        dst.coefficients.reserve(len);
        for k in 0..len {
            let mut sum = self.base_ring.zero();
            for i in k.saturating_sub(rhs_len - 1)..=min(k, lhs_len - 1) {
                self.base_ring.add_assign(&mut sum, self.base_ring.mul_ref(&lhs.coefficients[i], &rhs.coefficients[k - i]));
            }
            dst.coefficients.push(sum);
        }
        self.normalize(&mut dst.coefficients);
    }

    fn add_into(&self, dst: &mut Self::Element, lhs: &Self::Element, rhs: &Self::Element) {
        self.zero_out(dst, min(lhs.precision, rhs.precision));
        let len = min(max(lhs.coefficients.len(), rhs.coefficients.len()), dst.precision);
        dst.coefficients.extend((0..len).map(|i| self.base_ring.add_ref(self.coefficient_at(lhs, i), self.coefficient_at(rhs, i))));
        self.normalize(&mut dst.coefficients);
    }

    fn zero_out(&self, dst: &mut Self::Element, precision: usize) {
        dst.coefficients.clear();
        dst.precision = min(precision, self.max_precision());
    }
}

#[cfg(test)]
use crate::primitive_int::StaticRing;
#[cfg(test)]
use super::PowerSeriesRing;

#[test]
fn test_mutation_matches_pure_operations() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 6, "x");
    let a = P.get_ring().from_coefficients([1, 2, 0, -1], 5).unwrap();
    let b = P.get_ring().from_coefficients([0, 3, 1], 4).unwrap();
    let mut dst = P.get_ring().from_coefficients([7, 7, 7, 7, 7, 7], 6).unwrap();

    P.get_ring().mul_into(&mut dst, &a, &b);
    assert_el_eq!(P, P.mul_ref(&a, &b), dst);
    assert_eq!(4, P.get_ring().precision(&dst));

    P.get_ring().add_into(&mut dst, &a, &b);
    assert_el_eq!(P, P.add_ref(&a, &b), dst);
    assert_eq!(4, P.get_ring().precision(&dst));

    P.get_ring().zero_out(&mut dst, 3);
    assert!(P.is_zero(&dst));
    assert_eq!(3, P.get_ring().precision(&dst));
    P.get_ring().zero_out(&mut dst, 100);
    assert_eq!(6, P.get_ring().precision(&dst));
}
