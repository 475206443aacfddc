//! Price axis scaling and "nice" guideline steps.

use charter_core::Candle;

/// Number of price guidelines aimed for.
pub const TARGET_GUIDELINES: f64 = 8.0;

/// Upper bound on guidelines drawn.
pub const MAX_GUIDELINES: usize = 32;

/// A closed price interval with `min < max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Low/high envelope of `candles`, or `None` for an empty slice.
    pub fn of_candles(candles: &[Candle]) -> Option<Self> {
        let first = candles.first()?;
        let init = Self::new(first.low, first.high);
        Some(candles.iter().fold(init, |range, c| Self {
            min: range.min.min(c.low),
            max: range.max.max(c.high),
        }))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    /// Grow the range to cover `price`.
    pub fn include(self, price: f64) -> Self {
        Self {
            min: self.min.min(price),
            max: self.max.max(price),
        }
    }

    /// Add `fraction` of the span above and below.
    ///
    /// A zero span is first widened by a pad relative to the price level so
    /// the result is never degenerate.
    pub fn with_margin(self, fraction: f64) -> Self {
        let range = if self.span() > 0.0 {
            self
        } else {
            let mid = self.min;
            let pad = if mid != 0.0 { mid.abs() * 0.01 } else { 1.0 };
            Self::new(mid - pad, mid + pad)
        };
        let pad = range.span() * fraction;
        Self::new(range.min - pad, range.max + pad)
    }
}

/// Round `span / target` to 1, 2 or 5 times a power of ten.
pub fn nice_step(span: f64, target: f64) -> f64 {
    let raw_step = span / target;

    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;
    if normalized < 1.5 {
        magnitude
    } else if normalized < 3.5 {
        2.0 * magnitude
    } else if normalized < 7.5 {
        5.0 * magnitude
    } else {
        10.0 * magnitude
    }
}

/// Guideline prices at a nice step inside `range`, ascending.
pub fn guideline_prices(range: PriceRange) -> (f64, Vec<f64>) {
    let step = nice_step(range.span(), TARGET_GUIDELINES);
    // Multiples of the step rather than repeated addition, so values do not drift
    let first = (range.min / step).ceil() as i64;

    let mut prices = Vec::new();
    let mut k = first;
    loop {
        let price = k as f64 * step;
        if price > range.max || prices.len() >= MAX_GUIDELINES {
            break;
        }
        prices.push(price);
        k += 1;
    }
    (step, prices)
}

/// Decimal places needed to tell guidelines `step` apart.
pub fn decimals_for_step(step: f64) -> usize {
    (-step.log10().floor()).clamp(0.0, 10.0) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nice_step() {
        assert_eq!(nice_step(10.0, 10.0), 1.0);
        assert_eq!(nice_step(16.0, 8.0), 2.0);
        assert_eq!(nice_step(40.0, 8.0), 5.0);
        assert_eq!(nice_step(80.0, 8.0), 10.0);
        assert!((nice_step(0.008, 8.0) - 0.001).abs() < 1e-15);
    }

    #[test]
    fn test_guidelines_inside_range() {
        let range = PriceRange::new(1.0478, 1.0562);
        let (step, prices) = guideline_prices(range);
        assert!((step - 0.001).abs() < 1e-15);
        assert_eq!(prices.len(), 9);
        assert!(prices.iter().all(|p| range.contains(*p)));
        assert_eq!(decimals_for_step(step), 3);
    }

    #[test]
    fn test_margin() {
        let range = PriceRange::new(1.0480, 1.0560).with_margin(0.02);
        assert!((range.min - 1.047840).abs() < 1e-12);
        assert!((range.max - 1.056160).abs() < 1e-12);
    }

    #[test]
    fn test_zero_span_is_padded() {
        let range = PriceRange::new(1.05, 1.05).with_margin(0.02);
        assert!(range.span() > 0.0);
        assert!(range.contains(1.05));

        let zero = PriceRange::new(0.0, 0.0).with_margin(0.0);
        assert_eq!(zero, PriceRange::new(-1.0, 1.0));
    }

    #[test]
    fn test_decimals() {
        assert_eq!(decimals_for_step(5.0), 0);
        assert_eq!(decimals_for_step(0.5), 1);
        assert_eq!(decimals_for_step(0.0002), 4);
    }
}
