pub(crate) const fn div_ceil(lhs: usize, rhs: usize) -> usize {
    let d = lhs / rhs;
    let r = lhs % rhs;
    if r > 0 && rhs > 0 {
        d + 1
    } else {
        d
    }
}

/// Smallest `n` with `n * n >= value`.
pub(crate) fn ceil_sqrt(value: usize) -> usize {
    let mut root = (value as f64).sqrt() as usize;
    while root > 0 && root.saturating_mul(root) >= value {
        root -= 1;
    }
    while root.saturating_mul(root) < value {
        root += 1;
    }
    root
}
