///
/// Contains [`sqr_mul::generic_abs_square_and_multiply()`], the square-and-multiply
/// loop shared by all power functions.
///
pub mod sqr_mul;
///
/// Contains [`eea::eea()`], the extended euclidean algorithm over any euclidean ring.
///
pub mod eea;
