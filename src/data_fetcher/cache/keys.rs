/// Builds a cache key of the form `namespace:sport:endpoint?a=1&b=2`.
///
/// Parameters are sorted by name (then value) before joining, so the same
/// logical request always maps to the same key regardless of argument order.
/// Without parameters the `?` suffix is omitted.
///
/// ```
/// use sports_hub::data_fetcher::cache::generate_cache_key;
///
/// let a = generate_cache_key("sports", "mlb", "games", &[("date", "2025-01-11"), ("a", "1")]);
/// let b = generate_cache_key("sports", "mlb", "games", &[("a", "1"), ("date", "2025-01-11")]);
/// assert_eq!(a, b);
/// assert_eq!(a, "sports:mlb:games?a=1&date=2025-01-11");
/// ```
pub fn generate_cache_key(
    namespace: &str,
    sport: &str,
    endpoint: &str,
    params: &[(&str, &str)],
) -> String {
    let mut key = format!("{namespace}:{sport}:{endpoint}");
    if params.is_empty() {
        return key;
    }

    let mut sorted = params.to_vec();
    sorted.sort_unstable();

    let query = sorted
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    key.push('?');
    key.push_str(&query);
    key
}
