use thiserror::Error;

/// Composition failures. Both indicate a broken caller contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("cannot compose a chart from an empty series")]
    EmptySeries,
    #[error("{overlay} has {actual} values but the series has {expected} candles")]
    Misaligned {
        overlay: &'static str,
        expected: usize,
        actual: usize,
    },
}
