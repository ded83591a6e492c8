use crate::pid::*;
use crate::ring::*;

use std::mem::swap;

///
/// For a, b computes s, t, d such that `s*a + t*b == d` is a greatest
/// common divisor of a and b. d is only unique up to units, and s, t
/// are not unique at all. No guarantees are given on which
/// of these solutions is returned.
///
/// The given ring must be euclidean.
///
pub fn eea<R>(fst: El<R>, snd: El<R>, ring: R) -> (El<R>, El<R>, El<R>)
    where R: EuclideanRingStore,
        R::Type: EuclideanRing
{
    let (mut a, mut b) = (fst, snd);

    let (mut sa, mut ta) = (ring.one(), ring.zero());
    let (mut sb, mut tb) = (ring.zero(), ring.one());

    while !ring.is_zero(&b) {
        let (quo, rem) = ring.euclidean_div_rem(a, &b);
        ta = ring.sub(ta, ring.mul_ref(&quo, &tb));
        sa = ring.sub(sa, ring.mul_ref(&quo, &sb));
        a = rem;

        swap(&mut a, &mut b);
        swap(&mut sa, &mut sb);
        swap(&mut ta, &mut tb);
    }
    return (sa, ta, a);
}

#[cfg(test)]
use crate::primitive_int::StaticRing;

#[test]
fn test_eea() {
    let ZZ = StaticRing::<i64>::RING;
    for (a, b) in [(6, 8), (15, 7), (0, 5), (5, 0), (-9, 12), (12, -9), (1, 1)] {
        let (s, t, d) = eea(a, b, ZZ);
        assert_eq!(d, s * a + t * b);
        assert!(d != 0);
        assert_eq!(0, a % d);
        assert_eq!(0, b % d);
    }
    assert_eq!(1, eea(3, 7, ZZ).2.abs());
}
