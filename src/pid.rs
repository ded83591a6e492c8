use crate::ring::*;
use crate::divisibility::*;

///
/// Trait for rings that are principal ideal rings, i.e. every ideal is generated
/// by a single element.
///
pub trait PrincipalIdealRing: DivisibilityRing {

    ///
    /// Computes a Bezout identity.
    ///
    /// More concretely, this returns (s, t, g) such that g is a generator
    /// of the ideal `(lhs, rhs)` and `g = s * lhs + t * rhs`.
    ///
    fn extended_ideal_gen(&self, lhs: &Self::Element, rhs: &Self::Element) -> (Self::Element, Self::Element, Self::Element);

    fn ideal_gen(&self, lhs: &Self::Element, rhs: &Self::Element) -> Self::Element {
        self.extended_ideal_gen(lhs, rhs).2
    }
}

///
/// [`RingStore`] for [`PrincipalIdealRing`]s
///
pub trait PrincipalIdealRingStore: RingStore
    where Self::Type: PrincipalIdealRing
{
    delegate!{ fn extended_ideal_gen(&self, lhs: &El<Self>, rhs: &El<Self>) -> (El<Self>, El<Self>, El<Self>) }
    delegate!{ fn ideal_gen(&self, lhs: &El<Self>, rhs: &El<Self>) -> El<Self> }
}

impl<R> PrincipalIdealRingStore for R
    where R: RingStore,
        R::Type: PrincipalIdealRing
{}

///
/// Trait for rings that support euclidean division.
///
/// In other words, there is a degree function d(.)
/// returning nonnegative integers such that for every `x, y`
/// with `y != 0` there are `q, r` with `x = qy + r` and
/// `d(r) < d(y)`.
///
/// Residue rings `R/(m)` use [`EuclideanRing::euclidean_rem()`] to reduce elements,
/// so implementations must return a canonical remainder, i.e. `x = y (mod m)` must
/// imply `euclidean_rem(x, m) = euclidean_rem(y, m)`. For the integers, this means
/// the remainder is taken from `0, ..., |m| - 1`.
///
pub trait EuclideanRing: PrincipalIdealRing {

    fn euclidean_div_rem(&self, lhs: Self::Element, rhs: &Self::Element) -> (Self::Element, Self::Element);
    fn euclidean_deg(&self, val: &Self::Element) -> Option<usize>;

    fn euclidean_div(&self, lhs: Self::Element, rhs: &Self::Element) -> Self::Element {
        self.euclidean_div_rem(lhs, rhs).0
    }

    fn euclidean_rem(&self, lhs: Self::Element, rhs: &Self::Element) -> Self::Element {
        self.euclidean_div_rem(lhs, rhs).1
    }

    ///
    /// Computes the remainder of `lhs + rhs` modulo `modulus`. Like
    /// [`EuclideanRing::euclidean_rem_of_product()`], this exists for rings with elements of
    /// bounded size.
    ///
    fn euclidean_rem_of_sum(&self, lhs: &Self::Element, rhs: &Self::Element, modulus: &Self::Element) -> Self::Element {
        self.euclidean_rem(self.add_ref(lhs, rhs), modulus)
    }

    ///
    /// Computes the remainder of `lhs * rhs` modulo `modulus`. Rings with elements of bounded
    /// size should override this, since the product itself might not be representable.
    ///
    fn euclidean_rem_of_product(&self, lhs: &Self::Element, rhs: &Self::Element, modulus: &Self::Element) -> Self::Element {
        self.euclidean_rem(self.mul_ref(lhs, rhs), modulus)
    }
}

///
/// [`RingStore`] for [`EuclideanRing`]s
///
pub trait EuclideanRingStore: RingStore + DivisibilityRingStore
    where Self::Type: EuclideanRing
{
    delegate!{ fn euclidean_div_rem(&self, lhs: El<Self>, rhs: &El<Self>) -> (El<Self>, El<Self>) }
    delegate!{ fn euclidean_div(&self, lhs: El<Self>, rhs: &El<Self>) -> El<Self> }
    delegate!{ fn euclidean_rem(&self, lhs: El<Self>, rhs: &El<Self>) -> El<Self> }
    delegate!{ fn euclidean_rem_of_sum(&self, lhs: &El<Self>, rhs: &El<Self>, modulus: &El<Self>) -> El<Self> }
    delegate!{ fn euclidean_rem_of_product(&self, lhs: &El<Self>, rhs: &El<Self>, modulus: &El<Self>) -> El<Self> }
    delegate!{ fn euclidean_deg(&self, val: &El<Self>) -> Option<usize> }
}

impl<R> EuclideanRingStore for R
    where R: RingStore, R::Type: EuclideanRing
{}

#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {
    use super::*;

    pub fn test_euclidean_ring_axioms<R: EuclideanRingStore, I: Iterator<Item = El<R>>>(ring: R, edge_case_elements: I)
        where R::Type: EuclideanRing
    {
        assert!(ring.is_commutative());
        let elements = edge_case_elements.collect::<Vec<_>>();
        for a in &elements {
            for b in &elements {
                if ring.is_zero(b) {
                    continue;
                }
                let (q, r) = ring.euclidean_div_rem(ring.clone_el(a), b);
                assert!(ring.euclidean_deg(b).is_none() || ring.euclidean_deg(&r).unwrap_or(usize::MAX) < ring.euclidean_deg(b).unwrap());
                assert_el_eq!(ring, a, ring.add(ring.mul(q, ring.clone_el(b)), r));
            }
        }
    }

    pub fn test_principal_ideal_ring_axioms<R: PrincipalIdealRingStore, I: Iterator<Item = El<R>>>(ring: R, edge_case_elements: I)
        where R::Type: PrincipalIdealRing
    {
        assert!(ring.is_commutative());
        let elements = edge_case_elements.collect::<Vec<_>>();
        for a in &elements {
            for b in &elements {
                let (s, t, g) = ring.extended_ideal_gen(a, b);
                assert!(ring.checked_div(a, &g).is_some() || (ring.is_zero(&g) && ring.is_zero(a)), "Wrong ideal generator: {} does not divide {}", ring.format(&g), ring.format(a));
                assert!(ring.checked_div(b, &g).is_some() || (ring.is_zero(&g) && ring.is_zero(b)), "Wrong ideal generator: {} does not divide {}", ring.format(&g), ring.format(b));
                assert_el_eq!(ring, g, ring.add(ring.mul_ref(&s, a), ring.mul_ref(&t, b)));
            }
        }
    }
}
