/// Rounds a value to one decimal place, half away from zero.
pub fn round_to_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Arithmetic mean of the given rating values rounded to one decimal place.
///
/// Returns exactly `0.0` when there are no values.
pub fn average_rating<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_u64), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        return 0.0;
    }

    round_to_one_decimal(sum / count as f64)
}

/// Number of pages needed to show `total` items, `limit` per page.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

/// Number of rows to skip for a 1-based page.
pub fn page_offset(page: u32, limit: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(limit)
}
