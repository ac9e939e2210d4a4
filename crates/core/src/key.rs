//! Line keys: bit `i` of a key stands for absolute row `i`.

/// Rows `lo..hi`.
#[inline]
pub fn rows_between(lo: i32, hi: i32) -> u64 {
    if hi <= lo {
        return 0;
    }
    rows_below(hi) & !rows_below(lo)
}

/// Rows `0..y`.
#[inline]
pub fn rows_below(y: i32) -> u64 {
    match y {
        i32::MIN..=0 => 0,
        y if y >= 64 => !0,
        _ => (1u64 << y) - 1,
    }
}

/// Spread a key given in a compressed frame over the rows of the original frame
/// that are not in `cleared`.
///
/// Bit `j` of `key` lands on the `j`-th row (from the bottom) missing from `cleared`.
pub fn expand_key(key: u64, cleared: u64) -> u64 {
    let mut out = 0u64;
    let mut free = !cleared;
    let mut k = key;
    while k != 0 {
        let row = free & free.wrapping_neg();
        if k & 1 != 0 {
            out |= row;
        }
        free ^= row;
        k >>= 1;
    }
    out
}

/// Original-frame row of compressed row `row`.
#[inline]
pub fn original_row(row: i32, cleared: u64) -> i32 {
    debug_assert!((0..64).contains(&row));
    expand_key(1u64 << row, cleared).trailing_zeros() as i32
}

/// Compressed-frame row of original row `row`, assuming `row` itself is not cleared.
#[inline]
pub fn compressed_row(row: i32, cleared: u64) -> i32 {
    row - (cleared & rows_below(row)).count_ones() as i32
}
