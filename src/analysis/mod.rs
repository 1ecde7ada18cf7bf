/// Rainfall analysis for the Harris County rainfall service.
///
/// Submodules:
/// - `totals` — reporting window, accumulation and rounding of increments.

pub mod totals;
