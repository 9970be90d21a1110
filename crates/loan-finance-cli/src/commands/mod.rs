pub mod amortization;
pub mod comparison;
pub mod loan;
pub mod whatif;

/// Flag value that must be present when no structured input was given.
pub(crate) fn required<T>(value: Option<T>, flag: &str) -> Result<T, Box<dyn std::error::Error>> {
    value.ok_or_else(|| format!("--{flag} is required (or provide --input)").into())
}
