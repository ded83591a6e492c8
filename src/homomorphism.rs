use crate::ring::*;

///
/// Trait for rings `R` that have a canonical homomorphism `S -> R`.
/// A ring homomorphism is expected to be unital.
///
/// This is the compile-time replacement for a runtime table of coercion rules:
/// whether elements of `S` can be coerced into `R` is decided by the existence of
/// the impl, and whether the concrete parents are compatible (e.g. two residue rings
/// with the same modulus) is decided at runtime by [`CanHomFrom::has_canonical_hom()`].
///
/// Since a trait impl cannot overlap with another, rings implement this trait
/// for integer rings through a blanket impl bounded by [`crate::integer::IntegerRing`],
/// and for rings of their own kind through an impl for their own type.
///
pub trait CanHomFrom<S>: RingBase
    where S: RingBase + ?Sized
{
    ///
    /// Data required to compute the action of the canonical homomorphism on ring elements.
    ///
    type Homomorphism;

    ///
    /// If there is a canonical homomorphism `from -> self`, returns `Some(data)`, where
    /// `data` is additional data that can be used to compute the action of the homomorphism
    /// on ring elements. Otherwise, `None` is returned.
    ///
    fn has_canonical_hom(&self, from: &S) -> Option<Self::Homomorphism>;
    fn map_in(&self, from: &S, el: S::Element, hom: &Self::Homomorphism) -> Self::Element;

    fn map_in_ref(&self, from: &S, el: &S::Element, hom: &Self::Homomorphism) -> Self::Element {
        self.map_in(from, from.clone_el(el), hom)
    }
}

///
/// A canonical homomorphism `S -> R`, storing both rings. Obtained via
/// [`CanHom::new()`], which fails if the rings are not compatible.
///
pub struct CanHom<S: RingStore, R: RingStore>
    where R::Type: CanHomFrom<S::Type>
{
    from: S,
    to: R,
    data: <R::Type as CanHomFrom<S::Type>>::Homomorphism
}

impl<S: RingStore, R: RingStore> CanHom<S, R>
    where R::Type: CanHomFrom<S::Type>
{
    pub fn new(from: S, to: R) -> Option<Self> {
        let data = to.get_ring().has_canonical_hom(from.get_ring())?;
        return Some(CanHom { from, to, data });
    }

    pub fn domain(&self) -> &S {
        &self.from
    }

    pub fn codomain(&self) -> &R {
        &self.to
    }

    pub fn map(&self, x: El<S>) -> El<R> {
        self.to.get_ring().map_in(self.from.get_ring(), x, &self.data)
    }

    pub fn map_ref(&self, x: &El<S>) -> El<R> {
        self.to.get_ring().map_in_ref(self.from.get_ring(), x, &self.data)
    }
}
