use subtle::ConstantTimeEq;

/// Case-insensitive comparison of a webhook secret against the configured
/// one, without short-circuiting on the first differing byte.
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let provided = provided.to_lowercase();
    let expected = expected.to_lowercase();
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
