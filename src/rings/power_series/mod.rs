use std::cmp::{max, min};
use std::rc::Rc;

use serde::de::{Error, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserializer, Serializer};
use tracing::instrument;

use crate::algorithms;
use crate::divisibility::*;
use crate::error::*;
use crate::homomorphism::*;
use crate::integer::IntegerRing;
use crate::parent::*;
use crate::registry::*;
use crate::ring::*;
use crate::serialization::*;
use crate::wrapper::RingElementWrapper;

///
/// Contains [`inplace::SeriesMutation`], the low-level interface for writing the results
/// of series operations into existing elements.
///
pub mod inplace;

use inplace::SeriesMutation;

///
/// How a power series ring tracks the precision of its elements.
///
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PrecisionModel {
    /// The precision is the absolute truncation order `n` in `O(x^n)`.
    CappedAbsolute,
    /// The precision counts the known coefficients after the valuation. Not supported.
    CappedRelative
}

///
/// The ring of truncated power series `R[[x]]` over a base ring `R`, using the
/// capped-absolute precision model.
///
/// Every element `f + O(x^n)` stores its known coefficients together with its precision
/// `n`, i.e. the coefficients at `x^n` and above are unknown (and not zero). The precision
/// never exceeds the maximal precision of the ring. Every operation derives the precision
/// of its result from the precisions and valuations of its operands, e.g. the sum has the
/// minimum of both precisions, while a product `f * g` is known up to
/// `min(prec(f) + val(g), prec(g) + val(f))`.
///
/// Equality of elements only compares the coefficients that are known in both operands,
/// in particular an element with precision `0` equals every other element.
///
/// # Example
/// ```
/// # use feanor_series::ring::*;
/// # use feanor_series::primitive_int::*;
/// # use feanor_series::rings::power_series::*;
/// let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
/// let x = P.get_ring().generator();
/// let f = P.pow(P.add(P.one(), x), 3);
/// assert_eq!("1 + 3*x + 3*x^2 + x^3 + O(x^5)", format!("{}", P.format(&f)));
/// ```
///
pub struct PowerSeriesRingBase<R: RingStore> {
    base_ring: R,
    max_precision: usize,
    variable_name: &'static str,
    zero: El<R>
}

///
/// The ring of truncated power series `R[[x]]`. For details, see [`PowerSeriesRingBase`].
///
pub type PowerSeriesRing<R> = RingValue<PowerSeriesRingBase<R>>;

///
/// An element `f + O(x^n)` of a [`PowerSeriesRing`]. The coefficients are stored densely,
/// without trailing zeros, and there are never more than `n` of them.
///
pub struct PowerSeriesEl<R: RingStore> {
    coefficients: Vec<El<R>>,
    precision: usize
}

///
/// Describes a power series ring for the [`ParentRegistry`].
///
pub struct PowerSeriesRingDescriptor<R: RingStore> {
    pub base_ring: R,
    pub max_precision: usize,
    pub variable_name: &'static str,
    pub model: PrecisionModel
}

impl<R: RingStore> PowerSeriesRing<R> {

    pub fn new(base_ring: R, max_precision: usize, variable_name: &'static str) -> Self {
        RingValue::from(PowerSeriesRingBase::new(base_ring, max_precision, variable_name))
    }
}

impl<R: RingStore> PowerSeriesRingBase<R> {

    pub fn new(base_ring: R, max_precision: usize, variable_name: &'static str) -> Self {
        let zero = base_ring.zero();
        PowerSeriesRingBase { base_ring, max_precision, variable_name, zero }
    }

    ///
    /// Creates the ring with the given precision model. Only [`PrecisionModel::CappedAbsolute`]
    /// is available, otherwise this fails with [`RingError::UnsupportedModel`].
    ///
    pub fn with_model(base_ring: R, max_precision: usize, variable_name: &'static str, model: PrecisionModel) -> RingResult<Self> {
        match model {
            PrecisionModel::CappedAbsolute => Ok(Self::new(base_ring, max_precision, variable_name)),
            PrecisionModel::CappedRelative => Err(RingError::UnsupportedModel("capped relative"))
        }
    }

    pub fn max_precision(&self) -> usize {
        self.max_precision
    }

    pub fn variable_name(&self) -> &'static str {
        self.variable_name
    }

    fn normalize(&self, coefficients: &mut Vec<El<R>>) {
        while coefficients.last().map(|c| self.base_ring.is_zero(c)).unwrap_or(false) {
            coefficients.pop();
        }
    }

    fn series(&self, mut coefficients: Vec<El<R>>, precision: usize) -> PowerSeriesEl<R> {
        debug_assert!(precision <= self.max_precision);
        coefficients.truncate(precision);
        self.normalize(&mut coefficients);
        PowerSeriesEl { coefficients, precision }
    }

    fn zero_at(&self, precision: usize) -> PowerSeriesEl<R> {
        PowerSeriesEl { coefficients: Vec::new(), precision: min(precision, self.max_precision) }
    }

    pub fn generator(&self) -> PowerSeriesEl<R> {
        self.series(vec![self.base_ring.zero(), self.base_ring.one()], self.max_precision)
    }

    pub fn is_gen(&self, x: &PowerSeriesEl<R>) -> bool {
        x.coefficients.len() == 2 && self.base_ring.is_zero(&x.coefficients[0]) && self.base_ring.is_one(&x.coefficients[1])
    }

    ///
    /// Creates the series `sum_i c_i x^i + O(x^precision)`. Coefficients at or above
    /// the precision are dropped, and the precision is capped at the maximal precision
    /// of the ring. A negative precision gives [`RingError::Domain`].
    ///
    pub fn from_coefficients<I>(&self, coefficients: I, precision: i64) -> RingResult<PowerSeriesEl<R>>
        where I: IntoIterator<Item = El<R>>
    {
        let precision = min(non_negative("precision", precision)?, self.max_precision);
        Ok(self.series(coefficients.into_iter().take(precision).collect(), precision))
    }

    pub fn coefficient_at<'a>(&'a self, x: &'a PowerSeriesEl<R>, i: usize) -> &'a El<R> {
        x.coefficients.get(i).unwrap_or(&self.zero)
    }

    ///
    /// Returns the index after the last nonzero coefficient.
    ///
    pub fn length(&self, x: &PowerSeriesEl<R>) -> usize {
        x.coefficients.len()
    }

    pub fn precision(&self, x: &PowerSeriesEl<R>) -> usize {
        x.precision
    }

    ///
    /// Returns the index of the first nonzero coefficient, or the precision of `x`
    /// if all known coefficients are zero.
    ///
    pub fn valuation(&self, x: &PowerSeriesEl<R>) -> usize {
        x.coefficients.iter().position(|c| !self.base_ring.is_zero(c)).unwrap_or(x.precision)
    }

    ///
    /// Multiplies by `x^n`. The precision grows by `n`, up to the maximal precision,
    /// and coefficients beyond the new precision are dropped.
    ///
    pub fn shift_left(&self, x: &PowerSeriesEl<R>, n: i64) -> RingResult<PowerSeriesEl<R>> {
        Ok(self.shift_left_by(x, non_negative("shift", n)?))
    }

    fn shift_left_by(&self, x: &PowerSeriesEl<R>, n: usize) -> PowerSeriesEl<R> {
        let precision = min(x.precision.saturating_add(n), self.max_precision);
        if x.coefficients.is_empty() {
            return self.zero_at(precision);
        }
        let mut coefficients = Vec::with_capacity(min(x.coefficients.len().saturating_add(n), precision));
        coefficients.extend((0..min(n, precision)).map(|_| self.base_ring.zero()));
        coefficients.extend(x.coefficients.iter().take(precision.saturating_sub(n)).map(|c| self.base_ring.clone_el(c)));
        self.series(coefficients, precision)
    }

    ///
    /// Divides by `x^n`, dropping the lowest `n` coefficients. The precision decreases by `n`.
    ///
    pub fn shift_right(&self, x: &PowerSeriesEl<R>, n: i64) -> RingResult<PowerSeriesEl<R>> {
        Ok(self.shift_right_by(x, non_negative("shift", n)?))
    }

    fn shift_right_by(&self, x: &PowerSeriesEl<R>, n: usize) -> PowerSeriesEl<R> {
        if n >= x.coefficients.len() {
            return self.zero_at(x.precision.saturating_sub(n));
        }
        PowerSeriesEl {
            coefficients: x.coefficients[n..].iter().map(|c| self.base_ring.clone_el(c)).collect(),
            precision: x.precision - n
        }
    }

    ///
    /// Lowers the precision of `x` to `precision`. Does nothing if the precision of `x`
    /// is already at most `precision`.
    ///
    pub fn truncate(&self, x: &PowerSeriesEl<R>, precision: i64) -> RingResult<PowerSeriesEl<R>> {
        let mut result = self.clone_el(x);
        self.truncate_in_place(&mut result, non_negative("precision", precision)?);
        Ok(result)
    }

    fn truncate_in_place(&self, x: &mut PowerSeriesEl<R>, precision: usize) {
        if precision < x.precision {
            x.coefficients.truncate(precision);
            self.normalize(&mut x.coefficients);
            x.precision = precision;
        }
    }

    ///
    /// Checks whether `x` equals the constant `y`, as far as `x` is known.
    ///
    pub fn eq_base(&self, x: &PowerSeriesEl<R>, y: &El<R>) -> bool {
        if x.precision == 0 {
            return true;
        }
        match x.coefficients.len() {
            0 => self.base_ring.is_zero(y),
            1 => self.base_ring.eq_el(&x.coefficients[0], y),
            _ => false
        }
    }

    ///
    /// Returns the formal derivative, which is known up to one less than `x`.
    ///
    pub fn derivative(&self, x: &PowerSeriesEl<R>) -> PowerSeriesEl<R> {
        let coefficients = x.coefficients.iter().enumerate().skip(1)
            .map(|(k, c)| self.base_ring.mul_ref_snd(self.base_ring.from_usize(k), c))
            .collect();
        self.series(coefficients, x.precision.saturating_sub(1))
    }

    ///
    /// Computes `f(g)` by Horner evaluation. Requires `val(g) >= 1`, otherwise
    /// [`RingError::Domain`] is returned. The result is known up to `prec(f) * val(g)`,
    /// or less if `g` is known to lower precision.
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn compose(&self, f: &PowerSeriesEl<R>, g: &PowerSeriesEl<R>) -> RingResult<PowerSeriesEl<R>> {
        let g_valuation = self.valuation(g);
        if g_valuation == 0 {
            return Err(RingError::Domain { what: "valuation of the inner series minus one", value: -1 });
        }
        let mut result = self.zero();
        let mut scratch = self.zero();
        for c in f.coefficients.iter().rev() {
            self.mul_into(&mut scratch, &result, g);
            self.add_into(&mut result, &scratch, &self.from_ref(c));
        }
        self.truncate_in_place(&mut result, f.precision.saturating_mul(g_valuation));
        Ok(result)
    }
}

impl<R: RingStore> PowerSeriesRingBase<R>
    where R::Type: DivisibilityRing
{
    ///
    /// Computes the inverse of `x` up to the precision of `x`. Fails with
    /// [`RingError::DivisionByZero`] if `x` is zero, and with [`RingError::NotInvertible`]
    /// if its constant coefficient is not a unit.
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn invert(&self, x: &PowerSeriesEl<R>) -> RingResult<PowerSeriesEl<R>> {
        if x.coefficients.is_empty() {
            return Err(RingError::DivisionByZero);
        }
        let constant_inv = self.base_ring.checked_left_div(&self.base_ring.one(), &x.coefficients[0]).ok_or(RingError::NotInvertible)?;
        let mut result = Vec::with_capacity(x.precision);
        result.push(constant_inv);
        for n in 1..x.precision {
            let mut sum = self.base_ring.zero();
            for i in 1..=min(n, x.coefficients.len() - 1) {
                self.base_ring.add_assign(&mut sum, self.base_ring.mul_ref(&x.coefficients[i], &result[n - i]));
            }
            let next = self.base_ring.negate(self.base_ring.mul_ref_snd(sum, &result[0]));
            result.push(next);
        }
        Ok(self.series(result, x.precision))
    }

    ///
    /// Computes `lhs / rhs`, assuming the division is exact.
    ///
    /// If `rhs` has valuation `v > 0`, both operands are divided by `x^v` first. With `check`
    /// set, this fails with [`RingError::NotExactDivision`] if `val(lhs) < v`; without it,
    /// the low coefficients of `lhs` are silently dropped and the result is meaningless.
    /// The result is known up to `min(prec(lhs'), prec(rhs') + val(lhs) - v)`, where `lhs'` and
    /// `rhs'` are the shifted operands.
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn divexact(&self, lhs: &PowerSeriesEl<R>, rhs: &PowerSeriesEl<R>, check: bool) -> RingResult<PowerSeriesEl<R>> {
        if rhs.coefficients.is_empty() {
            return Err(RingError::DivisionByZero);
        }
        let v = self.valuation(rhs);
        let lhs_valuation = self.valuation(lhs);
        let shifted;
        let (lhs, rhs) = if v > 0 {
            if check && lhs_valuation < v {
                return Err(RingError::NotExactDivision);
            }
            shifted = (self.shift_right_by(lhs, v), self.shift_right_by(rhs, v));
            (&shifted.0, &shifted.1)
        } else {
            (lhs, rhs)
        };
        let precision = min(lhs.precision, rhs.precision.saturating_add(lhs_valuation).saturating_sub(v));
        let divisor = &rhs.coefficients[0];
        let mut result: Vec<El<R>> = Vec::with_capacity(precision);
        for n in 0..precision {
            let mut remainder = self.base_ring.clone_el(self.coefficient_at(lhs, n));
            for i in 1..=min(n, rhs.coefficients.len() - 1) {
                self.base_ring.sub_assign(&mut remainder, self.base_ring.mul_ref(&rhs.coefficients[i], &result[n - i]));
            }
            result.push(self.base_ring.checked_left_div(&remainder, divisor).ok_or(RingError::NotExactDivision)?);
        }
        Ok(self.series(result, precision))
    }

    ///
    /// Returns the formal integral with constant coefficient zero, which is known up to one
    /// more than `x`. Fails with [`RingError::NotExactDivision`] if the coefficient at `x^k`
    /// is not divisible by `k + 1`.
    ///
    pub fn integral(&self, x: &PowerSeriesEl<R>) -> RingResult<PowerSeriesEl<R>> {
        let precision = min(x.precision.saturating_add(1), self.max_precision);
        let mut coefficients = Vec::with_capacity(x.coefficients.len() + 1);
        coefficients.push(self.base_ring.zero());
        for (k, c) in x.coefficients.iter().enumerate() {
            if self.base_ring.is_zero(c) {
                coefficients.push(self.base_ring.zero());
            } else {
                coefficients.push(self.base_ring.checked_left_div(c, &self.base_ring.from_usize(k + 1)).ok_or(RingError::NotExactDivision)?);
            }
        }
        Ok(self.series(coefficients, precision))
    }
}

impl<R: RingStore> PowerSeriesRingBase<R>
    where R::Type: DivisibilityRing + SqrtRing
{
    ///
    /// Computes a square root of `x`. If `x` has valuation `v`, the result is known
    /// up to `prec(x) - v / 2`. Fails with [`RingError::NotASquare`] if `x` has no square
    /// root at this precision.
    ///
    #[instrument(skip_all, level = "trace")]
    pub fn sqrt(&self, x: &PowerSeriesEl<R>) -> RingResult<PowerSeriesEl<R>> {
        match self.sqrt_impl(x, true) {
            (true, result) => Ok(result),
            (false, _) => Err(RingError::NotASquare)
        }
    }

    ///
    /// Like [`PowerSeriesRingBase::sqrt()`], but does not check whether `x` is a square.
    /// If it is not, the result is undefined: the computation stops at the first coefficient
    /// that has no solution and returns what it has computed so far.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn sqrt_unchecked(&self, x: &PowerSeriesEl<R>) -> PowerSeriesEl<R> {
        self.sqrt_impl(x, false).1
    }

    fn sqrt_impl(&self, x: &PowerSeriesEl<R>, check: bool) -> (bool, PowerSeriesEl<R>) {
        let v = self.valuation(x);
        let half_v = v / 2;
        let precision = x.precision - half_v;
        if x.coefficients.is_empty() {
            return (true, self.zero_at(precision));
        }
        if check && v % 2 != 0 {
            return (false, self.zero_at(precision));
        }
        let mut result = (0..half_v).map(|_| self.base_ring.zero()).collect::<Vec<_>>();
        let root = match self.base_ring.checked_sqrt(&x.coefficients[v]) {
            Some(root) => root,
            None => return (false, self.series(result, precision))
        };
        let twice_root = self.base_ring.add_ref(&root, &root);
        result.push(root);
        for n in 1..(precision - half_v) {
            let mut sum = self.base_ring.zero();
            for i in 1..=((n - 1) / 2) {
                self.base_ring.add_assign(&mut sum, self.base_ring.mul_ref(&result[half_v + i], &result[half_v + n - i]));
            }
            sum = self.base_ring.add_ref(&sum, &sum);
            if n % 2 == 0 {
                self.base_ring.add_assign(&mut sum, self.base_ring.pow(self.base_ring.clone_el(&result[half_v + n / 2]), 2));
            }
            let remainder = self.base_ring.sub_ref_fst(self.coefficient_at(x, v + n), sum);
            match self.base_ring.checked_left_div(&remainder, &twice_root) {
                Some(next) => result.push(next),
                None => return (false, self.series(result, precision))
            }
        }
        return (true, self.series(result, precision));
    }
}

impl<R: RingStore> PartialEq for PowerSeriesRingBase<R> {

    fn eq(&self, other: &Self) -> bool {
        self.base_ring.get_ring() == other.base_ring.get_ring() && self.max_precision == other.max_precision && self.variable_name == other.variable_name
    }
}

impl<R: RingStore> RingBase for PowerSeriesRingBase<R> {

    type Element = PowerSeriesEl<R>;

    fn clone_el(&self, val: &Self::Element) -> Self::Element {
        PowerSeriesEl {
            coefficients: val.coefficients.iter().map(|c| self.base_ring.clone_el(c)).collect(),
            precision: val.precision
        }
    }

    fn add_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        let precision = min(lhs.precision, rhs.precision);
        lhs.coefficients.truncate(precision);
        for (i, c) in rhs.coefficients.into_iter().take(precision).enumerate() {
            if i < lhs.coefficients.len() {
                self.base_ring.add_assign(&mut lhs.coefficients[i], c);
            } else {
                lhs.coefficients.push(c);
            }
        }
        lhs.precision = precision;
        self.normalize(&mut lhs.coefficients);
    }

    fn add_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        let precision = min(lhs.precision, rhs.precision);
        lhs.coefficients.truncate(precision);
        for (i, c) in rhs.coefficients.iter().take(precision).enumerate() {
            if i < lhs.coefficients.len() {
                self.base_ring.add_assign_ref(&mut lhs.coefficients[i], c);
            } else {
                lhs.coefficients.push(self.base_ring.clone_el(c));
            }
        }
        lhs.precision = precision;
        self.normalize(&mut lhs.coefficients);
    }

    fn negate_inplace(&self, lhs: &mut Self::Element) {
        for c in &mut lhs.coefficients {
            self.base_ring.negate_inplace(c);
        }
    }

    fn mul_assign(&self, lhs: &mut Self::Element, rhs: Self::Element) {
        self.mul_assign_ref(lhs, &rhs);
    }

    fn mul_assign_ref(&self, lhs: &mut Self::Element, rhs: &Self::Element) {
        let mut result = self.zero();
        self.mul_into(&mut result, lhs, rhs);
        *lhs = result;
    }

    fn zero(&self) -> Self::Element {
        self.zero_at(self.max_precision)
    }

    fn from_int(&self, value: i32) -> Self::Element {
        self.from(self.base_ring.from_int(value))
    }

    fn eq_el(&self, lhs: &Self::Element, rhs: &Self::Element) -> bool {
        let n = min(max(lhs.coefficients.len(), rhs.coefficients.len()), min(lhs.precision, rhs.precision));
        (0..n).all(|i| self.base_ring.eq_el(self.coefficient_at(lhs, i), self.coefficient_at(rhs, i)))
    }

    fn is_zero(&self, value: &Self::Element) -> bool {
        value.coefficients.is_empty()
    }

    fn is_commutative(&self) -> bool {
        self.base_ring.is_commutative()
    }

    fn dbg<'a>(&self, value: &Self::Element, out: &mut std::fmt::Formatter<'a>) -> std::fmt::Result {
        for (i, c) in value.coefficients.iter().enumerate().filter(|(_, c)| !self.base_ring.is_zero(c)) {
            if i > 0 && !self.base_ring.is_one(c) {
                self.base_ring.get_ring().dbg(c, out)?;
                write!(out, "*")?;
            } else if i == 0 {
                self.base_ring.get_ring().dbg(c, out)?;
            }
            match i {
                0 => {},
                1 => write!(out, "{}", self.variable_name)?,
                _ => write!(out, "{}^{}", self.variable_name, i)?
            }
            write!(out, " + ")?;
        }
        write!(out, "O({}^{})", self.variable_name, value.precision)
    }

    #[instrument(skip_all, level = "trace")]
    fn pow_gen(&self, x: Self::Element, power: usize) -> Self::Element {
        if power == 0 {
            return self.series(vec![self.base_ring.one()], x.precision);
        } else if self.is_gen(&x) {
            return self.shift_left_by(&x, power - 1);
        } else if x.coefficients.is_empty() {
            return self.zero_at(power.saturating_mul(x.precision));
        } else if x.coefficients.len() == 1 {
            let constant = self.base_ring.pow(self.base_ring.clone_el(&x.coefficients[0]), power);
            return self.series(vec![constant], x.precision);
        }
        let precision = x.precision.saturating_add((power - 1).saturating_mul(self.valuation(&x)));
        let mut result = algorithms::sqr_mul::generic_abs_square_and_multiply(
            x,
            power,
            |a| {
                let mut square = self.zero();
                self.mul_into(&mut square, &a, &a);
                square
            },
            |base, a| {
                let mut product = self.zero();
                self.mul_into(&mut product, base, &a);
                product
            },
            self.one()
        );
        self.truncate_in_place(&mut result, precision);
        return result;
    }
}

impl<R: RingStore> RingExtension for PowerSeriesRingBase<R> {

    type BaseRing = R;

    fn base_ring<'a>(&'a self) -> &'a Self::BaseRing {
        &self.base_ring
    }

    fn from(&self, x: El<Self::BaseRing>) -> Self::Element {
        self.series(vec![x], self.max_precision)
    }
}

impl<R: RingStore> DivisibilityRing for PowerSeriesRingBase<R>
    where R::Type: DivisibilityRing
{
    fn checked_left_div(&self, lhs: &Self::Element, rhs: &Self::Element) -> Option<Self::Element> {
        self.divexact(lhs, rhs, true).ok()
    }

    fn is_unit(&self, x: &Self::Element) -> bool {
        x.coefficients.first().map(|c| self.base_ring.is_unit(c)).unwrap_or(false)
    }

    fn try_invert(&self, x: &Self::Element) -> RingResult<Self::Element> {
        self.invert(x)
    }

    fn try_div(&self, lhs: &Self::Element, rhs: &Self::Element) -> RingResult<Self::Element> {
        self.divexact(lhs, rhs, true)
    }
}

impl<R, J> CanHomFrom<J> for PowerSeriesRingBase<R>
    where R: RingStore,
        R::Type: CanHomFrom<J>,
        J: IntegerRing + ?Sized
{
    type Homomorphism = <R::Type as CanHomFrom<J>>::Homomorphism;

    fn has_canonical_hom(&self, from: &J) -> Option<Self::Homomorphism> {
        self.base_ring.get_ring().has_canonical_hom(from)
    }

    fn map_in(&self, from: &J, el: J::Element, hom: &Self::Homomorphism) -> Self::Element {
        self.from(self.base_ring.get_ring().map_in(from, el, hom))
    }
}

impl<R, S> CanHomFrom<PowerSeriesRingBase<S>> for PowerSeriesRingBase<R>
    where R: RingStore,
        S: RingStore,
        R::Type: CanHomFrom<S::Type>
{
    type Homomorphism = <R::Type as CanHomFrom<S::Type>>::Homomorphism;

    fn has_canonical_hom(&self, from: &PowerSeriesRingBase<S>) -> Option<Self::Homomorphism> {
        if self.max_precision == from.max_precision && self.variable_name == from.variable_name {
            self.base_ring.get_ring().has_canonical_hom(from.base_ring.get_ring())
        } else {
            None
        }
    }

    fn map_in(&self, from: &PowerSeriesRingBase<S>, el: PowerSeriesEl<S>, hom: &Self::Homomorphism) -> Self::Element {
        let coefficients = el.coefficients.into_iter().map(|c| self.base_ring.get_ring().map_in(from.base_ring.get_ring(), c, hom)).collect();
        self.series(coefficients, el.precision)
    }
}

struct SeriesVisitor<'a, R: RingStore>
    where R::Type: SerializableElementRing
{
    ring: &'a PowerSeriesRingBase<R>
}

impl<'a, 'de, R: RingStore> Visitor<'de> for SeriesVisitor<'a, R>
    where R::Type: SerializableElementRing
{
    type Value = PowerSeriesEl<R>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "a tuple of coefficients and precision")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where A: SeqAccess<'de>
    {
        let coefficients = seq.next_element_seed(ElementListSeed::at_most(&self.ring.base_ring, self.ring.max_precision))?
            .ok_or_else(|| A::Error::invalid_length(0, &self))?;
        let precision: usize = seq.next_element()?
            .ok_or_else(|| A::Error::invalid_length(1, &self))?;
        if precision > self.ring.max_precision {
            return Err(A::Error::custom(format!("precision {} exceeds the maximal precision {}", precision, self.ring.max_precision)));
        }
        if coefficients.len() > precision {
            return Err(A::Error::custom(format!("{} coefficients given, but precision is only {}", coefficients.len(), precision)));
        }
        return Ok(self.ring.series(coefficients, precision));
    }
}

impl<R: RingStore> SerializableElementRing for PowerSeriesRingBase<R>
    where R::Type: SerializableElementRing
{
    fn deserialize_element<'de, D>(&self, deserializer: D) -> Result<Self::Element, D::Error>
        where D: Deserializer<'de>
    {
        deserializer.deserialize_tuple(2, SeriesVisitor { ring: self })
    }

    fn serialize_element<S>(&self, el: &Self::Element, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&ElementList::new(&self.base_ring, &el.coefficients))?;
        tuple.serialize_element(&el.precision)?;
        return tuple.end();
    }
}

impl<R: RingStore> CachedParent for PowerSeriesRingBase<R> {

    type Descriptor = PowerSeriesRingDescriptor<R>;

    fn matches(&self, descriptor: &Self::Descriptor) -> bool {
        descriptor.model == PrecisionModel::CappedAbsolute &&
            self.max_precision == descriptor.max_precision &&
            self.variable_name == descriptor.variable_name &&
            is_same_ring(self.base_ring.get_ring(), descriptor.base_ring.get_ring())
    }

    fn create(descriptor: Self::Descriptor) -> RingResult<Self> {
        Self::with_model(descriptor.base_ring, descriptor.max_precision, descriptor.variable_name, descriptor.model)
    }
}

///
/// Returns the power series ring over `base_ring` together with its generator, cached in the
/// given registry if `cached` is set.
///
/// Fails with [`RingError::UnsupportedModel`] for [`PrecisionModel::CappedRelative`], and with
/// [`RingError::Domain`] for a negative maximal precision.
///
pub fn make_power_series_ring<R: RingStore>(
    registry: &mut ParentRegistry<PowerSeriesRingBase<R>>,
    base_ring: R,
    max_precision: i64,
    variable_name: &'static str,
    model: PrecisionModel,
    cached: bool
) -> RingResult<(Rc<PowerSeriesRing<R>>, RingElementWrapper<Rc<PowerSeriesRing<R>>>)> {
    let max_precision = non_negative("maximal precision", max_precision)?;
    let ring = registry.get_or_create(PowerSeriesRingDescriptor { base_ring, max_precision, variable_name, model }, cached)?;
    let generator = RingElementWrapper::new(ring.clone(), ring.get_ring().generator());
    return Ok((ring, generator));
}

impl<P, R> RingElementWrapper<P>
    where P: ParentHandle + RingStore<Type = PowerSeriesRingBase<R>>,
        R: RingStore
{
    fn with_same_parent(&self, element: PowerSeriesEl<R>) -> Self {
        RingElementWrapper::new(self.parent().clone(), element)
    }

    pub fn precision(&self) -> usize {
        self.parent().get_ring().precision(self.unwrap_ref())
    }

    pub fn valuation(&self) -> usize {
        self.parent().get_ring().valuation(self.unwrap_ref())
    }

    pub fn length(&self) -> usize {
        self.parent().get_ring().length(self.unwrap_ref())
    }

    pub fn coefficient_at<'a>(&'a self, i: usize) -> &'a El<R>
        where R: 'a
    {
        self.parent().get_ring().coefficient_at(self.unwrap_ref(), i)
    }

    pub fn shift_left(&self, n: i64) -> RingResult<Self> {
        Ok(self.with_same_parent(self.parent().get_ring().shift_left(self.unwrap_ref(), n)?))
    }

    pub fn shift_right(&self, n: i64) -> RingResult<Self> {
        Ok(self.with_same_parent(self.parent().get_ring().shift_right(self.unwrap_ref(), n)?))
    }

    pub fn truncate(&self, precision: i64) -> RingResult<Self> {
        Ok(self.with_same_parent(self.parent().get_ring().truncate(self.unwrap_ref(), precision)?))
    }

    pub fn eq_base(&self, y: &El<R>) -> bool {
        self.parent().get_ring().eq_base(self.unwrap_ref(), y)
    }

    pub fn derivative(&self) -> Self {
        self.with_same_parent(self.parent().get_ring().derivative(self.unwrap_ref()))
    }

    pub fn compose(&self, inner: &Self) -> RingResult<Self> {
        check_parents(self.parent(), inner.parent())?;
        Ok(self.with_same_parent(self.parent().get_ring().compose(self.unwrap_ref(), inner.unwrap_ref())?))
    }
}

impl<P, R> RingElementWrapper<P>
    where P: ParentHandle + RingStore<Type = PowerSeriesRingBase<R>>,
        R: RingStore,
        R::Type: DivisibilityRing
{
    pub fn integral(&self) -> RingResult<Self> {
        Ok(self.with_same_parent(self.parent().get_ring().integral(self.unwrap_ref())?))
    }
}

impl<P, R> RingElementWrapper<P>
    where P: ParentHandle + RingStore<Type = PowerSeriesRingBase<R>>,
        R: RingStore,
        R::Type: DivisibilityRing + SqrtRing
{
    pub fn sqrt(&self) -> RingResult<Self> {
        Ok(self.with_same_parent(self.parent().get_ring().sqrt(self.unwrap_ref())?))
    }
}

#[cfg(test)]
use crate::primitive_int::StaticRing;
#[cfg(test)]
use crate::rings::bigint::BigIntRing;
#[cfg(test)]
use crate::rings::residue::*;
#[cfg(test)]
use num_bigint::BigInt;
#[cfg(test)]
use serde::de::DeserializeSeed;

#[cfg(test)]
fn edge_case_elements<'a>(P: &'a PowerSeriesRing<StaticRing<i64>>) -> impl 'a + Iterator<Item = PowerSeriesEl<StaticRing<i64>>> {
    [
        (vec![], 6),
        (vec![1], 6),
        (vec![0, 1], 6),
        (vec![1, 1], 6),
        (vec![1, -1, 3], 4),
        (vec![0, 0, 1, -2], 5),
        (vec![-1, 0, 0, 0, 2], 6),
        (vec![2, 3], 3),
        (vec![], 2)
    ].into_iter().map(move |(c, prec)| P.get_ring().from_coefficients(c, prec).unwrap())
}

#[test]
fn test_ring_axioms() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 6, "x");
    crate::ring::generic_tests::test_ring_axioms(&P, edge_case_elements(&P));
}

#[test]
fn test_divisibility_axioms() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 6, "x");
    let units_and_monomials = [
        (vec![1], 6),
        (vec![0, 1], 6),
        (vec![1, 1], 6),
        (vec![1, -1, 3], 6),
        (vec![0, 0, 1, -2], 6),
        (vec![-1, 0, 0, 0, 2], 6)
    ].into_iter().map(|(c, prec)| P.get_ring().from_coefficients(c, prec).unwrap());
    crate::divisibility::generic_tests::test_divisibility_axioms(&P, units_and_monomials);
}

#[test]
fn test_pow() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
    let x = P.get_ring().generator();

    let f = P.pow(P.add(P.one(), P.clone_el(&x)), 3);
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 3, 3, 1], 5).unwrap(), f);
    assert_eq!(5, P.get_ring().precision(&f));
    assert_eq!("1 + 3*x + 3*x^2 + x^3 + O(x^5)", format!("{}", P.format(&f)));

    let x_cubed = P.pow(P.clone_el(&x), 3);
    assert_eq!(4, P.get_ring().length(&x_cubed));
    assert_eq!(3, P.get_ring().valuation(&x_cubed));
    assert_eq!(5, P.get_ring().precision(&x_cubed));
    assert!(P.is_zero(&P.pow(P.clone_el(&x), 7)));

    assert!(P.is_one(&P.pow(P.clone_el(&x), 0)));

    let one = P.pow(P.get_ring().from_coefficients([], 3).unwrap(), 0);
    assert!(P.get_ring().eq_base(&one, &1));
    assert_eq!(1, P.get_ring().length(&one));
    assert_eq!(3, P.get_ring().precision(&one));

    let zero = P.get_ring().from_coefficients([], 2).unwrap();
    assert_eq!(4, P.get_ring().precision(&P.pow(P.clone_el(&zero), 2)));
    assert_eq!(5, P.get_ring().precision(&P.pow(zero, 3)));

    let constant = P.pow(P.get_ring().from_coefficients([2], 3).unwrap(), 4);
    assert!(P.get_ring().eq_base(&constant, &16));
    assert_eq!(3, P.get_ring().precision(&constant));

    let f = P.get_ring().from_coefficients([0, 1, 1], 4).unwrap();
    let f_squared = P.pow(f, 2);
    assert_el_eq!(P, P.get_ring().from_coefficients([0, 0, 1, 2, 1], 5).unwrap(), f_squared);
    assert_eq!(5, P.get_ring().precision(&f_squared));
}

#[test]
fn test_precision_of_arithmetic() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 10, "x");
    let a = P.get_ring().from_coefficients([1, 2], 5).unwrap();
    let b = P.get_ring().from_coefficients([0, 0, 3], 4).unwrap();

    let product = P.mul_ref(&a, &b);
    assert_eq!(4, P.get_ring().precision(&product));
    assert_eq!(2, P.get_ring().valuation(&product));
    assert_eq!(3, *P.get_ring().coefficient_at(&product, 2));
    assert_eq!(6, *P.get_ring().coefficient_at(&product, 3));
    assert_eq!(0, *P.get_ring().coefficient_at(&product, 7));

    let sum = P.add_ref(&a, &b);
    assert_eq!(4, P.get_ring().precision(&sum));
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 2, 3], 4).unwrap(), sum);

    let difference = P.sub_ref(&a, &a);
    assert!(P.is_zero(&difference));
    assert_eq!(5, P.get_ring().precision(&difference));
    assert_eq!(5, P.get_ring().valuation(&difference));
}

#[test]
fn test_random_precision_laws() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 8, "x");
    let mut rng = oorandom::Rand64::new(3);
    let random_series = |rng: &mut oorandom::Rand64| {
        let precision = rng.rand_range(0..9) as i64;
        let valuation = rng.rand_range(0..4) as usize;
        let coefficients = (0..8).map(|i| if i < valuation { 0 } else { rng.rand_range(0..7) as i64 - 3 }).collect::<Vec<_>>();
        P.get_ring().from_coefficients(coefficients, precision).unwrap()
    };
    for _ in 0..200 {
        let a = random_series(&mut rng);
        let b = random_series(&mut rng);
        let (pa, pb) = (P.get_ring().precision(&a), P.get_ring().precision(&b));
        let (va, vb) = (P.get_ring().valuation(&a), P.get_ring().valuation(&b));

        let product = P.mul_ref(&a, &b);
        assert_eq!(min(min(pa + vb, pb + va), 8), P.get_ring().precision(&product));

        let sum = P.add_ref(&a, &b);
        assert_eq!(min(pa, pb), P.get_ring().precision(&sum));
        for i in 0..min(pa, pb) {
            assert_eq!(P.get_ring().coefficient_at(&a, i) + P.get_ring().coefficient_at(&b, i), *P.get_ring().coefficient_at(&sum, i));
        }

        for n in 0..=min(va, pa) {
            let round_trip = P.get_ring().shift_left(&P.get_ring().shift_right(&a, n as i64).unwrap(), n as i64).unwrap();
            assert_el_eq!(P, P.get_ring().truncate(&a, pa as i64).unwrap(), P.get_ring().truncate(&round_trip, pa as i64).unwrap());
        }

        let p = rng.rand_range(0..9) as i64;
        let truncated = P.get_ring().truncate(&a, p).unwrap();
        let truncated_twice = P.get_ring().truncate(&truncated, p).unwrap();
        assert_el_eq!(P, truncated, truncated_twice);
        assert_eq!(P.get_ring().precision(&truncated), P.get_ring().precision(&truncated_twice));
    }
}

#[test]
fn test_equality() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
    let f = P.get_ring().from_coefficients([1, 2], 2).unwrap();
    let g = P.get_ring().from_coefficients([1, 2, 3], 5).unwrap();
    assert!(P.eq_el(&f, &g));
    assert!(!P.eq_el(&P.get_ring().from_coefficients([1, 2], 5).unwrap(), &g));
    let unknown = P.get_ring().from_coefficients([1, 2], 0).unwrap();
    assert!(P.eq_el(&unknown, &P.one()));
    assert!(P.eq_el(&unknown, &g));
    assert_eq!(0, P.get_ring().length(&unknown));

    let capped = P.get_ring().from_coefficients([1, 2, 3, 4, 5, 6, 7], 9).unwrap();
    assert_eq!(5, P.get_ring().precision(&capped));
    assert_eq!(5, P.get_ring().length(&capped));
    assert_eq!(Err(RingError::Domain { what: "precision", value: -1 }), P.get_ring().from_coefficients([1], -1).map(|_| ()));
}

#[test]
fn test_eq_base() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
    assert!(P.get_ring().eq_base(&P.one(), &1));
    assert!(!P.get_ring().eq_base(&P.one(), &2));
    let zero = P.get_ring().from_coefficients([], 3).unwrap();
    assert!(P.get_ring().eq_base(&zero, &0));
    assert!(!P.get_ring().eq_base(&zero, &1));
    let unknown = P.get_ring().from_coefficients([], 0).unwrap();
    assert!(P.get_ring().eq_base(&unknown, &5));
    let f = P.get_ring().from_coefficients([1, 1], 5).unwrap();
    assert!(!P.get_ring().eq_base(&f, &1));
}

#[test]
fn test_shift_and_truncate() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
    let f = P.get_ring().from_coefficients([1, 2], 5).unwrap();

    let shifted = P.get_ring().shift_left(&f, 2).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([0, 0, 1, 2], 5).unwrap(), shifted);
    assert_eq!(5, P.get_ring().precision(&shifted));
    let back = P.get_ring().shift_right(&shifted, 2).unwrap();
    assert_el_eq!(P, f, back);
    assert_eq!(3, P.get_ring().precision(&back));

    let at_cap = P.get_ring().shift_left(&f, 4).unwrap();
    assert_eq!(5, P.get_ring().length(&at_cap));
    assert_eq!(1, *P.get_ring().coefficient_at(&at_cap, 4));
    assert!(P.is_zero(&P.get_ring().shift_left(&f, 7).unwrap()));

    let dropped = P.get_ring().shift_right(&f, 3).unwrap();
    assert!(P.is_zero(&dropped));
    assert_eq!(2, P.get_ring().precision(&dropped));

    assert_eq!(Err(RingError::Domain { what: "shift", value: -1 }), P.get_ring().shift_left(&f, -1).map(|_| ()));
    assert_eq!(Err(RingError::Domain { what: "shift", value: -3 }), P.get_ring().shift_right(&f, -3).map(|_| ()));

    let truncated = P.get_ring().truncate(&f, 1).unwrap();
    assert_eq!(1, P.get_ring().precision(&truncated));
    assert_eq!(1, P.get_ring().length(&truncated));
    let truncated_again = P.get_ring().truncate(&truncated, 3).unwrap();
    assert_eq!(1, P.get_ring().precision(&truncated_again));
    assert_eq!(Err(RingError::Domain { what: "precision", value: -2 }), P.get_ring().truncate(&f, -2).map(|_| ()));
}

#[test]
fn test_invert() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
    let x = P.get_ring().generator();
    let inverse = P.try_invert(&P.sub(P.one(), P.clone_el(&x))).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 1, 1, 1, 1], 5).unwrap(), inverse);
    assert_eq!(5, P.get_ring().precision(&inverse));

    let f = P.get_ring().from_coefficients([1, 2, -1], 4).unwrap();
    let f_inv = P.get_ring().invert(&f).unwrap();
    assert_eq!(4, P.get_ring().precision(&f_inv));
    assert_el_eq!(P, P.one(), P.mul(f, f_inv));

    assert_eq!(Err(RingError::DivisionByZero), P.get_ring().invert(&P.zero()).map(|_| ()));
    assert_eq!(Err(RingError::NotInvertible), P.get_ring().invert(&x).map(|_| ()));
    assert_eq!(Err(RingError::NotInvertible), P.get_ring().invert(&P.get_ring().from_coefficients([2, 1], 5).unwrap()).map(|_| ()));
    assert!(P.is_unit(&P.get_ring().from_coefficients([-1, 4], 5).unwrap()));
    assert!(!P.is_unit(&x));
}

#[test]
fn test_divexact() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
    let x = P.get_ring().generator();
    let x_squared = P.get_ring().from_coefficients([0, 0, 1], 5).unwrap();

    let quotient = P.get_ring().divexact(&x_squared, &x, true).unwrap();
    assert_el_eq!(P, x, quotient);
    assert_eq!(4, P.get_ring().precision(&quotient));

    assert_eq!(Err(RingError::NotExactDivision), P.get_ring().divexact(&P.one(), &x, true).map(|_| ()));

    let geometric = P.get_ring().divexact(&P.one(), &P.sub(P.one(), P.clone_el(&x)), true).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 1, 1, 1, 1], 5).unwrap(), geometric);
    assert_eq!(5, P.get_ring().length(&geometric));
    assert_eq!(5, P.get_ring().precision(&geometric));

    // the constant coefficient of the numerator is lost
    let truncated = P.get_ring().divexact(&P.get_ring().from_coefficients([1, 0, 1], 5).unwrap(), &x, false).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([0, 1], 3).unwrap(), truncated);
    assert_eq!(2, P.get_ring().length(&truncated));
    assert_eq!(3, P.get_ring().precision(&truncated));
    assert_eq!(Err(RingError::DivisionByZero), P.get_ring().divexact(&P.one(), &P.zero(), true).map(|_| ()));
    assert_eq!(Err(RingError::NotExactDivision), P.try_div(&P.one(), &P.get_ring().from_coefficients([2, 1], 5).unwrap()).map(|_| ()));

    let numerator = P.get_ring().from_coefficients([2, 5, 2], 5).unwrap();
    let denominator = P.get_ring().from_coefficients([2, 1], 5).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 2], 5).unwrap(), P.try_div(&numerator, &denominator).unwrap());
}

#[test]
fn test_sqrt() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");

    let root = P.get_ring().sqrt(&P.get_ring().from_coefficients([1, 2, 1], 5).unwrap()).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 1], 5).unwrap(), root);
    assert_eq!(5, P.get_ring().precision(&root));

    let root = P.get_ring().sqrt(&P.get_ring().from_coefficients([0, 0, 1, 2, 1], 5).unwrap()).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([0, 1, 1], 4).unwrap(), root);
    assert_eq!(4, P.get_ring().precision(&root));

    let root = P.get_ring().sqrt(&P.get_ring().from_coefficients([], 4).unwrap()).unwrap();
    assert!(P.is_zero(&root));
    assert_eq!(2, P.get_ring().precision(&root));

    assert_eq!(Err(RingError::NotASquare), P.get_ring().sqrt(&P.get_ring().from_coefficients([0, 0, 0, 1], 5).unwrap()).map(|_| ()));
    assert_eq!(Err(RingError::NotASquare), P.get_ring().sqrt(&P.get_ring().from_coefficients([1, 1], 5).unwrap()).map(|_| ()));
    assert_eq!(Err(RingError::NotASquare), P.get_ring().sqrt(&P.from_int(2)).map(|_| ()));

    let partial = P.get_ring().sqrt_unchecked(&P.get_ring().from_coefficients([1, 1], 5).unwrap());
    assert_eq!(1, P.get_ring().length(&partial));
    assert!(P.get_ring().eq_base(&partial, &1));
}

#[test]
fn test_derivative_and_integral() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
    let f = P.get_ring().from_coefficients([1, 3, 3, 1], 5).unwrap();
    let df = P.get_ring().derivative(&f);
    assert_el_eq!(P, P.get_ring().from_coefficients([3, 6, 3], 4).unwrap(), df);
    assert_eq!(4, P.get_ring().precision(&df));

    let integral = P.get_ring().integral(&df).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([0, 3, 3, 1], 5).unwrap(), integral);
    assert_eq!(5, P.get_ring().precision(&integral));

    assert_eq!(Err(RingError::NotExactDivision), P.get_ring().integral(&P.get_ring().generator()).map(|_| ()));
    assert_eq!(0, P.get_ring().precision(&P.get_ring().derivative(&P.get_ring().from_coefficients([], 0).unwrap())));
}

#[test]
fn test_compose() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "x");
    let f = P.get_ring().from_coefficients([1, 1, 1], 5).unwrap();

    let g = P.get_ring().from_coefficients([0, 2], 5).unwrap();
    let composed = P.get_ring().compose(&f, &g).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 2, 4], 5).unwrap(), composed);
    assert_eq!(5, P.get_ring().precision(&composed));

    let g = P.get_ring().from_coefficients([0, 0, 1], 5).unwrap();
    let composed = P.get_ring().compose(&f, &g).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 0, 1, 0, 1], 5).unwrap(), composed);

    let f = P.get_ring().from_coefficients([1, 1], 2).unwrap();
    let composed = P.get_ring().compose(&f, &g).unwrap();
    assert_el_eq!(P, P.get_ring().from_coefficients([1, 0, 1], 4).unwrap(), composed);
    assert_eq!(4, P.get_ring().precision(&composed));

    let g = P.get_ring().from_coefficients([1, 1], 5).unwrap();
    assert!(matches!(P.get_ring().compose(&f, &g), Err(RingError::Domain { value: -1, .. })));
}

#[test]
fn test_coerce_base() {
    let ZZ = StaticRing::<i64>::RING;
    let mut residue_rings = ParentRegistry::new();
    let R7 = make_residue_ring(&mut residue_rings, ZZ, &ZZ.coerce_int(7), true).unwrap();
    let R5 = make_residue_ring(&mut residue_rings, ZZ, &ZZ.coerce_int(5), true).unwrap();
    let mut series_rings = ParentRegistry::new();
    let (P, x) = make_power_series_ring(&mut series_rings, R7.clone(), 4, "x", PrecisionModel::CappedAbsolute, true).unwrap();

    let three = P.coerce_base(&R7.coerce_int(3)).unwrap();
    assert!(three.eq_base(&R7.from_int(10)));
    assert_eq!(4, three.precision());
    let f = three + x;
    assert_eq!(1, *R7.get_ring().lift(f.coefficient_at(1)));

    assert_eq!(Err(RingError::TypeMismatch), P.coerce_base(&R5.coerce_int(3)).map(|_| ()));
}

#[test]
fn test_coerce_from_integers() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 4, "x");
    let five = P.try_coerce(&StaticRing::<i64>::RING, 5).unwrap();
    assert!(P.get_ring().eq_base(&five, &5));
    assert_eq!(4, P.get_ring().precision(&five));

    let Q = PowerSeriesRing::new(BigIntRing::RING, 4, "x");
    let minus_three = Q.try_coerce(&StaticRing::<i32>::RING, -3).unwrap();
    assert!(Q.get_ring().eq_base(&minus_three, &BigInt::from(-3)));
    assert!(Q.get_ring().has_canonical_hom(StaticRing::<i128>::RING.get_ring()).is_some());
}

#[test]
fn test_coerce_between_series_rings() {
    let ZZ = StaticRing::<i64>::RING;
    let R7 = ResidueRing::new(ZZ, 7).unwrap();
    let P = PowerSeriesRing::new(ZZ, 4, "x");
    let S = PowerSeriesRing::new(&R7, 4, "x");
    let f = P.get_ring().from_coefficients([8, -1, 14], 3).unwrap();

    let g = S.try_coerce(&P, P.clone_el(&f)).unwrap();
    assert_el_eq!(S, S.get_ring().from_coefficients([R7.from_int(1), R7.from_int(6)], 3).unwrap(), g);
    assert_eq!(3, S.get_ring().precision(&g));
    assert_eq!(2, S.get_ring().length(&g));

    let T = PowerSeriesRing::new(&R7, 5, "x");
    assert_eq!(Err(RingError::TypeMismatch), T.try_coerce(&P, P.clone_el(&f)).map(|_| ()));
    let U = PowerSeriesRing::new(&R7, 4, "y");
    assert_eq!(Err(RingError::TypeMismatch), U.try_coerce(&P, f).map(|_| ()));
}

#[test]
fn test_registry() {
    let ZZ = StaticRing::<i64>::RING;
    let mut registry = ParentRegistry::new();
    let (P1, x1) = make_power_series_ring(&mut registry, ZZ, 5, "x", PrecisionModel::CappedAbsolute, true).unwrap();
    let (P2, _) = make_power_series_ring(&mut registry, ZZ, 5, "x", PrecisionModel::CappedAbsolute, true).unwrap();
    let (P3, x3) = make_power_series_ring(&mut registry, ZZ, 5, "x", PrecisionModel::CappedAbsolute, false).unwrap();
    let (P4, _) = make_power_series_ring(&mut registry, ZZ, 5, "y", PrecisionModel::CappedAbsolute, true).unwrap();
    assert!(Rc::ptr_eq(&P1, &P2));
    assert!(!Rc::ptr_eq(&P1, &P3));
    assert!(!Rc::ptr_eq(&P1, &P4));
    assert_eq!(2, registry.len());

    assert_eq!(Err(RingError::IncompatibleModuli), x1.clone().try_add(x3.clone()).map(|_| ()));
    assert_eq!(Err(RingError::IncompatibleModuli), x1.compose(&x3).map(|_| ()));

    assert!(matches!(
        make_power_series_ring(&mut registry, ZZ, 5, "x", PrecisionModel::CappedRelative, true),
        Err(RingError::UnsupportedModel(_))
    ));
    assert!(matches!(
        make_power_series_ring(&mut registry, ZZ, -1, "x", PrecisionModel::CappedAbsolute, true),
        Err(RingError::Domain { what: "maximal precision", value: -1 })
    ));
    assert_eq!(2, registry.len());
}

#[test]
fn test_wrapper_operations() {
    let ZZ = StaticRing::<i64>::RING;
    let mut registry = ParentRegistry::new();
    let (P, x) = make_power_series_ring(&mut registry, ZZ, 5, "x", PrecisionModel::CappedAbsolute, true).unwrap();

    let f = (x.clone() + P.coerce_int(1)).pow(2);
    assert_eq!(0, f.valuation());
    assert_eq!(3, f.length());
    assert_eq!(5, f.precision());
    assert_eq!(2, *f.coefficient_at(1));
    assert!(f.sqrt().unwrap() == x.clone() + P.coerce_int(1));

    let df = f.derivative();
    assert_eq!(4, df.precision());
    assert_eq!(2, *df.coefficient_at(0));
    assert!(df.integral().unwrap() == f.clone() - P.coerce_int(1));

    let shifted = f.shift_left(1).unwrap();
    assert_eq!(1, shifted.valuation());
    assert!(shifted.shift_right(1).unwrap() == f);
    assert_eq!(2, f.truncate(2).unwrap().precision());
    assert!(P.coerce_int(3).eq_base(&3));

    let composed = f.compose(&x.clone().pow(2)).unwrap();
    assert_eq!(2, *composed.coefficient_at(2));
    assert_eq!(Err(RingError::Domain { what: "shift", value: -1 }), x.shift_left(-1).map(|_| ()));
}

#[test]
fn test_display() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 5, "t");
    assert_eq!("O(t^5)", format!("{}", P.format(&P.zero())));
    let f = P.get_ring().from_coefficients([-1, 0, 1, -2], 4).unwrap();
    assert_eq!("-1 + t^2 + -2*t^3 + O(t^4)", format!("{}", P.format(&f)));
}

#[test]
fn test_serialization() {
    let P = PowerSeriesRing::new(StaticRing::<i64>::RING, 6, "x");
    crate::serialization::generic_tests::test_serialization(&P, edge_case_elements(&P));

    let f = P.get_ring().from_coefficients([1, 2], 5).unwrap();
    assert_eq!("[[1,2],5]", serde_json::to_string(&ElementRef::new(&P, &f)).unwrap());

    for invalid in ["[[1,2,3],2]", "[[1],9]", "[[1]]", "[[1,1,1,1,1,1,1],6]"] {
        let mut deserializer = serde_json::Deserializer::from_str(invalid);
        assert!(ElementSeed::new(&P).deserialize(&mut deserializer).is_err());
    }
}
