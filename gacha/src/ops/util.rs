use gacha_core::GachaError;

/// Collapse a set of collector errors into a uniform `GachaError` outcome.
///
/// Rules:
/// - If `attempted_any` is false → `InvalidArg` (nothing was registered).
/// - If every error is `NotFound` → `NotFound(what)`.
/// - Else → `AllCollectorsFailed(errors)`, including when every collector timed out.
#[must_use]
pub fn collapse_errors(attempted_any: bool, errors: Vec<GachaError>, what: &str) -> GachaError {
    if !attempted_any {
        return GachaError::InvalidArg(format!("no collector attempted for {what}"));
    }
    if !errors.is_empty()
        && errors
            .iter()
            .all(|e| matches!(e, GachaError::NotFound { .. }))
    {
        return GachaError::not_found(what);
    }
    GachaError::AllCollectorsFailed(errors)
}
