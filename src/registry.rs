use std::rc::Rc;

use tracing::debug;

use crate::error::*;
use crate::ring::*;

///
/// A parent that can be cached in a [`ParentRegistry`]. The descriptor contains all
/// data that defines the ring, and two parents built from matching descriptors must
/// be equal.
///
pub trait CachedParent: RingBase + Sized {

    type Descriptor;

    ///
    /// Whether this parent is the one that [`CachedParent::create()`] would build from
    /// the given descriptor.
    ///
    fn matches(&self, descriptor: &Self::Descriptor) -> bool;

    fn create(descriptor: Self::Descriptor) -> RingResult<Self>;
}

///
/// Explicit cache of parents, guaranteeing that structurally identical requests give
/// the same parent instance (as long as caching is requested).
///
/// This is not thread-safe; parents are shared via [`Rc`]. Parents are kept in a list,
/// so [`ParentRegistry::get_or_create()`], [`ParentRegistry::lookup()`] and
/// [`ParentRegistry::evict()`] take time `O(n)` in the number `n` of cached parents.
///
/// # Example
/// ```
/// # use std::rc::Rc;
/// # use feanor_series::ring::*;
/// # use feanor_series::parent::*;
/// # use feanor_series::registry::*;
/// # use feanor_series::primitive_int::*;
/// # use feanor_series::rings::residue::*;
/// let ZZ = StaticRing::<i64>::RING;
/// let mut registry = ParentRegistry::new();
/// let R1 = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(7), true).unwrap();
/// let R2 = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(7), true).unwrap();
/// assert!(Rc::ptr_eq(&R1, &R2));
/// let R3 = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(7), false).unwrap();
/// assert!(!Rc::ptr_eq(&R1, &R3));
/// ```
///
pub struct ParentRegistry<P: CachedParent> {
    parents: Vec<Rc<RingValue<P>>>
}

impl<P: CachedParent> ParentRegistry<P> {

    pub fn new() -> Self {
        Self { parents: Vec::new() }
    }

    ///
    /// Returns the cached parent for the given descriptor, or creates it. If `cached` is
    /// `false`, a fresh parent is always created and not inserted into the registry.
    ///
    pub fn get_or_create(&mut self, descriptor: P::Descriptor, cached: bool) -> RingResult<Rc<RingValue<P>>> {
        if cached {
            if let Some(parent) = self.lookup(&descriptor) {
                debug!(parent = std::any::type_name::<P>(), "registry hit");
                return Ok(parent);
            }
            debug!(parent = std::any::type_name::<P>(), "registry miss");
        }
        let parent = Rc::new(RingValue::from(P::create(descriptor)?));
        if cached {
            self.parents.push(parent.clone());
            debug!(parent = std::any::type_name::<P>(), cached_parents = self.parents.len(), "inserted parent");
        }
        return Ok(parent);
    }

    pub fn lookup(&self, descriptor: &P::Descriptor) -> Option<Rc<RingValue<P>>> {
        self.parents.iter().find(|parent| parent.get_ring().matches(descriptor)).cloned()
    }

    ///
    /// Removes the parent for the given descriptor from the registry, and returns it.
    /// Existing handles to it stay valid, but later requests will create a new parent.
    ///
    pub fn evict(&mut self, descriptor: &P::Descriptor) -> Option<Rc<RingValue<P>>> {
        let index = self.parents.iter().position(|parent| parent.get_ring().matches(descriptor))?;
        debug!(parent = std::any::type_name::<P>(), "evicted parent");
        Some(self.parents.remove(index))
    }

    pub fn clear(&mut self) {
        debug!(parent = std::any::type_name::<P>(), evicted = self.parents.len(), "cleared registry");
        self.parents.clear();
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

impl<P: CachedParent> Default for ParentRegistry<P> {

    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
use crate::logging::EventRecorder;
#[cfg(test)]
use crate::parent::ParentHandle;
#[cfg(test)]
use crate::primitive_int::StaticRing;
#[cfg(test)]
use crate::rings::residue::*;

#[test]
fn test_registry_logs_cache_activity() {
    let ZZ = StaticRing::<i64>::RING;
    let recorder = EventRecorder::new(tracing::Level::DEBUG);
    let events = recorder.events();
    tracing::subscriber::with_default(recorder, || {
        let mut registry = ParentRegistry::new();
        let R = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(3), true).unwrap();
        let S = make_residue_ring(&mut registry, ZZ, &ZZ.coerce_int(3), true).unwrap();
        assert!(Rc::ptr_eq(&R, &S));
        assert!(registry.lookup(&ResidueRingDescriptor { base_ring: ZZ, modulus: 4 }).is_none());
        assert!(registry.evict(&ResidueRingDescriptor { base_ring: ZZ, modulus: 3 }).is_some());
        assert!(registry.evict(&ResidueRingDescriptor { base_ring: ZZ, modulus: 3 }).is_none());
        registry.clear();
    });
    assert!(events.contains("registry miss"));
    assert!(events.contains("inserted parent"));
    assert!(events.contains("registry hit"));
    assert!(events.contains("evicted parent"));
    assert!(events.contains("cleared registry"));
}

#[test]
fn test_registry_with_many_parents() {
    let ZZ = StaticRing::<i64>::RING;
    let mut registry: ParentRegistry<ResidueRingBase<StaticRing<i64>>> = ParentRegistry::new();
    let parents = (2..20).map(|m| registry.get_or_create(ResidueRingDescriptor { base_ring: ZZ, modulus: m }, true).unwrap()).collect::<Vec<_>>();
    assert_eq!(18, registry.len());
    for (m, parent) in (2..20).zip(parents.iter()) {
        assert!(Rc::ptr_eq(parent, &registry.lookup(&ResidueRingDescriptor { base_ring: ZZ, modulus: m }).unwrap()));
    }
    let evicted = registry.evict(&ResidueRingDescriptor { base_ring: ZZ, modulus: 11 }).unwrap();
    assert!(Rc::ptr_eq(&parents[9], &evicted));
    assert_eq!(17, registry.len());
    assert!(registry.lookup(&ResidueRingDescriptor { base_ring: ZZ, modulus: 11 }).is_none());
    assert!(Rc::ptr_eq(&parents[10], &registry.lookup(&ResidueRingDescriptor { base_ring: ZZ, modulus: 12 }).unwrap()));
}
