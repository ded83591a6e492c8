
///
/// Computes `base^power` by square-and-multiply, using the supplied closures for
/// squaring the current value and for multiplying it by the base. The multiplication
/// is always performed as `multiply_base(&base, current)`, so `base` is never consumed.
///
pub fn generic_abs_square_and_multiply<T, U, F, H>(base: U, power: usize, mut square: F, mut multiply_base: H, identity: T) -> T
    where F: FnMut(T) -> T, H: FnMut(&U, T) -> T
{
    if power == 0 {
        return identity;
    } else if power == 1 {
        return multiply_base(&base, identity);
    }

    let mut result = identity;
    for i in (0..=(usize::BITS - 1 - power.leading_zeros())).rev() {
        if (power >> i) & 1 == 1 {
            result = multiply_base(&base, square(result));
        } else {
            result = square(result);
        }
    }
    return result;
}

#[test]
fn test_pow() {
    assert_eq!(3 * 3, generic_abs_square_and_multiply(3, 2, |a| a * a, |a, b| *a * b, 1));
    assert_eq!(3 * 3 * 3 * 3 * 3, generic_abs_square_and_multiply(3, 5, |a| a * a, |a, b| *a * b, 1));
    assert_eq!(1, generic_abs_square_and_multiply(3, 0, |a| a * a, |a, b| *a * b, 1));
    assert_eq!(1 << 13, generic_abs_square_and_multiply(2i64, 13, |a| a * a, |a, b| *a * b, 1));
}
