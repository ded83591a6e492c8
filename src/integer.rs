use crate::divisibility::*;
use crate::pid::*;
use crate::ring::*;

///
/// Trait for rings that are isomorphic to the ring of integers `ZZ`. These are
/// the scalar backends of the residue and power series rings.
///
/// The euclidean remainder of integer rings is required to be canonical, i.e.
/// `euclidean_rem(x, m)` always lies in `0, ..., |m| - 1`.
///
pub trait IntegerRing: EuclideanRing + SqrtRing {

    fn is_neg(&self, value: &Self::Element) -> bool;

    fn abs(&self, value: Self::Element) -> Self::Element {
        if self.is_neg(&value) {
            self.negate(value)
        } else {
            value
        }
    }

    ///
    /// Returns the value as `i128`, if it fits.
    ///
    fn to_i128(&self, value: &Self::Element) -> Option<i128>;

    ///
    /// Returns a uniformly random element from `0, ..., bound_exclusive - 1`, using
    /// the given source of random bits. `bound_exclusive` must be positive.
    ///
    fn get_uniformly_random<G: FnMut() -> u64>(&self, bound_exclusive: &Self::Element, rng: G) -> Self::Element;
}

///
/// [`RingStore`] for [`IntegerRing`]s
///
pub trait IntegerRingStore: RingStore
    where Self::Type: IntegerRing
{
    delegate!{ fn is_neg(&self, value: &El<Self>) -> bool }
    delegate!{ fn abs(&self, value: El<Self>) -> El<Self> }
    delegate!{ fn to_i128(&self, value: &El<Self>) -> Option<i128> }

    fn get_uniformly_random<G: FnMut() -> u64>(&self, bound_exclusive: &El<Self>, rng: G) -> El<Self> {
        self.get_ring().get_uniformly_random(bound_exclusive, rng)
    }
}

impl<R> IntegerRingStore for R
    where R: RingStore,
        R::Type: IntegerRing
{}

///
/// Returns the number of bits that are necessary to represent numbers in `0..bound`,
/// for a positive `bound` given as its `u32` digits in little endian order.
///
pub(crate) fn bit_length_of_digits(digits: &[u32]) -> usize {
    match digits.iter().rposition(|d| *d != 0) {
        Some(i) => i * u32::BITS as usize + (u32::BITS - digits[i].leading_zeros()) as usize,
        None => 0
    }
}

#[test]
fn test_bit_length_of_digits() {
    assert_eq!(0, bit_length_of_digits(&[]));
    assert_eq!(0, bit_length_of_digits(&[0, 0]));
    assert_eq!(1, bit_length_of_digits(&[1]));
    assert_eq!(3, bit_length_of_digits(&[7, 0]));
    assert_eq!(33, bit_length_of_digits(&[0, 1]));
}

#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use super::*;

    pub fn test_integer_axioms<R: IntegerRingStore>(ring: R)
        where R::Type: IntegerRing
    {
        let values = [-17, -8, -1, 0, 1, 3, 7, 64];
        for a in values {
            for m in values {
                if m == 0 {
                    continue;
                }
                let rem = ring.euclidean_rem(ring.from_int(a), &ring.from_int(m));
                assert_el_eq!(ring, ring.from_int(a.rem_euclid(m)), rem);
                assert!(!ring.is_neg(&rem));
            }
        }
        for a in values {
            assert_el_eq!(ring, ring.from_int(a.abs()), ring.abs(ring.from_int(a)));
            assert_eq!(Some(a as i128), ring.to_i128(&ring.from_int(a)));
            let square = ring.from_int(a * a);
            assert_el_eq!(ring, ring.from_int(a.abs()), ring.checked_sqrt(&square).unwrap());
        }
        assert!(ring.checked_sqrt(&ring.from_int(2)).is_none());
        assert!(ring.checked_sqrt(&ring.from_int(-4)).is_none());

        let mut rng = oorandom::Rand64::new(1);
        let bound = ring.from_int(13);
        for _ in 0..100 {
            let x = ring.get_uniformly_random(&bound, || rng.rand_u64());
            assert!(!ring.is_neg(&x));
            assert!(ring.to_i128(&x).unwrap() < 13);
        }
    }
}
