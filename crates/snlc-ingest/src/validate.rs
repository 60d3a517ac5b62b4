//! Pure predicates shared by the index builder and the assembler.

use snlc_core::PhotFlag;

/// True when the zero-based inclusive span `[min, max]` is ordered and ends
/// inside a table of `table_row_count` rows.
pub fn is_valid_span(min: usize, max: usize, table_row_count: usize) -> bool {
    min <= max && max < table_row_count
}

/// True iff `value` is one of the recognised `PHOTFLAG` codes {0, 4096, 6144}.
pub fn is_recognized_flag(value: i64) -> bool {
    PhotFlag::from_code(value).is_some()
}

/// True when timestamps never decrease. NaN breaks monotonicity.
pub fn is_monotonic(timestamps: &[f64]) -> bool {
    timestamps.windows(2).all(|pair| pair[0] <= pair[1])
}
