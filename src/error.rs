use thiserror::Error;

/// Out-of-contract widget values reaching a transform.
///
/// None of these are reachable through the page's own widgets; they are
/// degraded to an error chart by the binding layer instead of failing the
/// request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("unknown launch site '{0}'")]
    UnknownSite(String),
    #[error("payload range [{low}, {high}] has lower bound above upper bound")]
    InvertedRange { low: f64, high: f64 },
    #[error("payload range bound is not a finite number")]
    NonFiniteBound,
    #[error("missing value for input '{0}'")]
    MissingInput(&'static str),
    #[error("input '{input}' expects {expected}")]
    InvalidInput {
        input: &'static str,
        expected: &'static str,
    },
}
