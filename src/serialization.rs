use std::fmt::Formatter;

use serde::de::{DeserializeSeed, Error, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserializer, Serialize, Serializer};

use crate::ring::*;

///
/// Rings whose elements have a serde representation.
///
/// Elements are plain data without a reference to their ring, so the encoding is
/// done by the ring. [`ElementRef`] turns an element into a [`Serialize`] value, and
/// [`ElementSeed`] reads an element back as a [`DeserializeSeed`].
///
/// `deserialize_element()` must reject data that is not the canonical form of an
/// element, e.g. an unreduced residue or a series with too many coefficients.
///
pub trait SerializableElementRing: RingBase {

    fn serialize_element<S>(&self, el: &Self::Element, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer;

    fn deserialize_element<'de, D>(&self, deserializer: D) -> Result<Self::Element, D::Error>
        where D: Deserializer<'de>;
}

///
/// An element borrowed together with its ring, which implements [`Serialize`].
///
/// # Example
/// ```
/// # use feanor_series::ring::*;
/// # use feanor_series::primitive_int::*;
/// # use feanor_series::serialization::*;
/// let ZZ = StaticRing::<i64>::RING;
/// assert_eq!("-3", serde_json::to_string(&ElementRef::new(ZZ, &-3)).unwrap());
/// ```
///
pub struct ElementRef<'a, R: RingStore>
    where R::Type: SerializableElementRing
{
    ring: R,
    el: &'a El<R>
}

impl<'a, R: RingStore> ElementRef<'a, R>
    where R::Type: SerializableElementRing
{
    pub fn new(ring: R, el: &'a El<R>) -> Self {
        ElementRef { ring, el }
    }
}

impl<'a, R: RingStore> Serialize for ElementRef<'a, R>
    where R::Type: SerializableElementRing
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        self.ring.get_ring().serialize_element(self.el, serializer)
    }
}

///
/// Reads one element of the stored ring.
///
#[derive(Clone)]
pub struct ElementSeed<R: RingStore>
    where R::Type: SerializableElementRing
{
    ring: R
}

impl<R: RingStore> ElementSeed<R>
    where R::Type: SerializableElementRing
{
    pub fn new(ring: R) -> Self {
        ElementSeed { ring }
    }
}

impl<'de, R: RingStore> DeserializeSeed<'de> for ElementSeed<R>
    where R::Type: SerializableElementRing
{
    type Value = El<R>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where D: Deserializer<'de>
    {
        self.ring.get_ring().deserialize_element(deserializer)
    }
}

///
/// A slice of elements of the same ring, serialized as a sequence. This is the
/// encoding of coefficient vectors.
///
pub struct ElementList<'a, R: RingStore>
    where R::Type: SerializableElementRing
{
    ring: &'a R,
    elements: &'a [El<R>]
}

impl<'a, R: RingStore> ElementList<'a, R>
    where R::Type: SerializableElementRing
{
    pub fn new(ring: &'a R, elements: &'a [El<R>]) -> Self {
        ElementList { ring, elements }
    }
}

impl<'a, R: RingStore> Serialize for ElementList<'a, R>
    where R::Type: SerializableElementRing
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        let mut seq = serializer.serialize_seq(Some(self.elements.len()))?;
        for el in self.elements {
            seq.serialize_element(&ElementRef::new(self.ring, el))?;
        }
        seq.end()
    }
}

///
/// Reads a sequence of elements of the stored ring. With [`ElementListSeed::at_most()`],
/// longer sequences are rejected as soon as the first surplus element is reached.
///
pub struct ElementListSeed<'a, R: RingStore>
    where R::Type: SerializableElementRing
{
    ring: &'a R,
    max_len: Option<usize>
}

impl<'a, R: RingStore> ElementListSeed<'a, R>
    where R::Type: SerializableElementRing
{
    pub fn new(ring: &'a R) -> Self {
        ElementListSeed { ring, max_len: None }
    }

    pub fn at_most(ring: &'a R, max_len: usize) -> Self {
        ElementListSeed { ring, max_len: Some(max_len) }
    }
}

impl<'a, 'de, R: RingStore> Visitor<'de> for ElementListSeed<'a, R>
    where R::Type: SerializableElementRing
{
    type Value = Vec<El<R>>;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self.max_len {
            Some(max_len) => write!(formatter, "a sequence of at most {} ring elements", max_len),
            None => write!(formatter, "a sequence of ring elements")
        }
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where A: SeqAccess<'de>
    {
        let mut result = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(self.max_len.unwrap_or(usize::MAX)));
        while let Some(el) = seq.next_element_seed(ElementSeed::new(self.ring))? {
            if self.max_len.is_some_and(|max_len| result.len() >= max_len) {
                return Err(A::Error::invalid_length(result.len() + 1, &self));
            }
            result.push(el);
        }
        Ok(result)
    }
}

impl<'a, 'de, R: RingStore> DeserializeSeed<'de> for ElementListSeed<'a, R>
    where R::Type: SerializableElementRing
{
    type Value = Vec<El<R>>;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where D: Deserializer<'de>
    {
        deserializer.deserialize_seq(self)
    }
}

#[cfg(any(test, feature = "generic_tests"))]
pub mod generic_tests {

    use serde::de::DeserializeSeed;

    use super::*;

    ///
    /// Checks that every given element survives a json round trip, and that the
    /// encoding is canonical, i.e. encoding the decoded element gives the same json.
    ///
    pub fn test_serialization<R: RingStore, I: Iterator<Item = El<R>>>(ring: R, edge_case_elements: I)
        where R::Type: SerializableElementRing
    {
        for x in edge_case_elements {
            let json = serde_json::to_string(&ElementRef::new(&ring, &x)).unwrap();
            let mut deserializer = serde_json::Deserializer::from_str(&json);
            let result = ElementSeed::new(&ring).deserialize(&mut deserializer).unwrap();
            assert_el_eq!(ring, &x, &result);
            assert_eq!(json, serde_json::to_string(&ElementRef::new(&ring, &result)).unwrap());
        }
    }
}

#[cfg(test)]
use crate::primitive_int::StaticRing;

#[test]
fn test_serialize_primitive_int() {
    let ZZ = StaticRing::<i64>::RING;
    assert_eq!("-17", serde_json::to_string(&ElementRef::new(ZZ, &-17)).unwrap());
    generic_tests::test_serialization(ZZ, [-17, 0, 1, i64::MAX].into_iter());
}

#[test]
fn test_element_list() {
    let ZZ = StaticRing::<i64>::RING;
    assert_eq!("[3,-1,0]", serde_json::to_string(&ElementList::new(&ZZ, &[3, -1, 0])).unwrap());

    let mut deserializer = serde_json::Deserializer::from_str("[3,-1,0]");
    assert_eq!(vec![3, -1, 0], ElementListSeed::new(&ZZ).deserialize(&mut deserializer).unwrap());

    let mut deserializer = serde_json::Deserializer::from_str("[3,-1]");
    assert_eq!(vec![3, -1], ElementListSeed::at_most(&ZZ, 2).deserialize(&mut deserializer).unwrap());

    let mut deserializer = serde_json::Deserializer::from_str("[3,-1,0]");
    assert!(ElementListSeed::at_most(&ZZ, 2).deserialize(&mut deserializer).is_err());

    let mut deserializer = serde_json::Deserializer::from_str("[3,\"x\"]");
    assert!(ElementListSeed::new(&ZZ).deserialize(&mut deserializer).is_err());
}
