// In crates/strategies/src/sma.rs

use core_types::{Error, Result};
use ta::Next;
use ta::indicators::SimpleMovingAverage as Sma;

/// Computes the simple moving average of `closes` over `window` points.
///
/// The output is aligned 1:1 with the input. Position `i` holds the mean of
/// `closes[i + 1 - window ..= i]`; the first `window - 1` positions are `None`
/// because the window is not yet full. An input shorter than `window`
/// therefore yields all `None`.
///
/// A window holding one repeated close averages to exactly that close. The
/// indicator's running sum drifts for values like `0.3`, which would put a
/// flat price strictly above its own average.
pub fn simple_moving_average(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    if window == 0 {
        return Err(Error::InvalidParameter("SMA window must be greater than 0".into()));
    }
    let mut indicator = Sma::new(window)
        .map_err(|_| Error::InvalidParameter(format!("invalid SMA window: {window}")))?;

    let mut previous: Option<f64> = None;
    let mut repeated = 0usize;

    let sma = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            repeated = if previous == Some(close) { repeated + 1 } else { 1 };
            previous = Some(close);

            // The indicator averages over fewer points until it has seen a full window.
            let value = indicator.next(close);
            let value = if repeated >= window { close } else { value };
            (i + 1 >= window).then_some(value)
        })
        .collect();

    Ok(sma)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_window_matches_hand_computed_values() {
        let sma = simple_moving_average(&[10.0, 20.0, 30.0, 40.0], 3).unwrap();
        assert_eq!(sma, vec![None, None, Some(20.0), Some(30.0)]);
    }

    #[test]
    fn series_shorter_than_window_is_all_undefined() {
        let closes: Vec<f64> = (1..=199).map(f64::from).collect();
        let sma = simple_moving_average(&closes, 200).unwrap();
        assert_eq!(sma.len(), 199);
        assert!(sma.iter().all(Option::is_none));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(simple_moving_average(&[], 200).unwrap().is_empty());
    }

    #[test]
    fn constant_series_averages_to_the_constant() {
        for price in [100.0, 0.3, 0.6, 1.1, 2.2, 3.3, 7.77, 29.99, 12345.67] {
            let closes = vec![price; 400];
            let sma = simple_moving_average(&closes, 200).unwrap();
            assert!(sma[..199].iter().all(Option::is_none));
            assert!(sma[199..].iter().all(|v| *v == Some(price)), "price {price}");
        }
    }

    #[test]
    fn flat_stretch_after_moves_averages_to_the_flat_price() {
        let mut closes: Vec<f64> = (0..50).map(|i| 10.0 + i as f64 * 0.1).collect();
        closes.extend(std::iter::repeat_n(0.3, 20));
        let sma = simple_moving_average(&closes, 10).unwrap();

        // Windows still reaching into the moving part use the running mean.
        assert!(sma[58].unwrap() > 0.3);
        assert!(sma[59..].iter().all(|v| *v == Some(0.3)));
    }

    #[test]
    fn window_of_one_is_the_series_itself() {
        let closes = [3.5, 1.25, 8.0];
        let sma = simple_moving_average(&closes, 1).unwrap();
        assert_eq!(sma, vec![Some(3.5), Some(1.25), Some(8.0)]);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let closes: Vec<f64> = (0..500).map(|i| 100.0 + (i as f64 * 0.37).sin() * 13.1).collect();
        let bits = |v: Vec<Option<f64>>| v.into_iter().map(|x| x.map(f64::to_bits)).collect::<Vec<_>>();

        let first = bits(simple_moving_average(&closes, 200).unwrap());
        let second = bits(simple_moving_average(&closes, 200).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            simple_moving_average(&[1.0, 2.0], 0),
            Err(Error::InvalidParameter(_))
        ));
    }
}
