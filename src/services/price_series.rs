use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{PricePoint, RawPrice, RawPriceRecord};

#[derive(Debug, Error)]
pub enum DataFormatError {
    #[error("unparseable effective date: {0:?}")]
    BadDate(String),

    #[error("unparseable unit price: {0:?}")]
    BadPrice(String),

    #[error("non-finite unit price: {0}")]
    NonFinitePrice(f64),
}

/// Turn raw price rows from the datastore into typed observations.
///
/// This is the single validation gate in front of the series functions
/// below: dates must be ISO-8601 calendar dates and prices must be finite
/// decimals. A malformed row fails the whole batch rather than being
/// silently coerced to zero, so callers get one place to handle bad data.
///
/// Negative and zero prices are valid observations (corrections, refunds);
/// plausibility checks belong to the caller. Input order is preserved.
pub fn parse_observations(records: &[RawPriceRecord]) -> Result<Vec<PricePoint>, DataFormatError> {
    let mut points = Vec::with_capacity(records.len());
    for record in records {
        points.push(PricePoint {
            date: parse_date(&record.effective_date)?,
            price: parse_price(&record.unit_price)?,
        });
    }
    Ok(points)
}

/// Order observations chronologically, ready for charting.
///
/// Stable sort by date ascending: points sharing a date keep their relative
/// input order, no point is ever dropped, and the input is left untouched.
pub fn normalize(points: &[PricePoint]) -> Vec<PricePoint> {
    let mut series = points.to_vec();
    series.sort_by(|a, b| a.date.cmp(&b.date));
    series
}

/// The price of the most recent observation in a series sorted ascending by
/// date. `None` for an empty series; callers must handle the no-data case
/// rather than getting a fabricated zero. O(1), never re-sorts.
pub fn current_price(series: &[PricePoint]) -> Option<BigDecimal> {
    series.last().map(|point| point.price.clone())
}

/// Append one observation to a sorted series and re-establish the ordering
/// invariant. When the new point's date ties an existing one it sorts after
/// the points already there (last write wins for charting purposes).
pub fn append_observation(series: &[PricePoint], point: PricePoint) -> Vec<PricePoint> {
    let mut extended = series.to_vec();
    extended.push(point);
    normalize(&extended)
}

fn parse_date(raw: &str) -> Result<NaiveDate, DataFormatError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| DataFormatError::BadDate(raw.to_string()))
}

fn parse_price(raw: &RawPrice) -> Result<BigDecimal, DataFormatError> {
    match raw {
        RawPrice::Number(n) => {
            if !n.is_finite() {
                return Err(DataFormatError::NonFinitePrice(*n));
            }
            BigDecimal::from_f64(*n).ok_or(DataFormatError::NonFinitePrice(*n))
        }
        RawPrice::Text(s) => {
            BigDecimal::from_str(s.trim()).map_err(|_| DataFormatError::BadPrice(s.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(date: &str, price: &str) -> PricePoint {
        PricePoint {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            price: BigDecimal::from_str(price).unwrap(),
        }
    }

    fn raw(date: &str, price: &str) -> RawPriceRecord {
        RawPriceRecord {
            effective_date: date.to_string(),
            unit_price: RawPrice::Text(price.to_string()),
        }
    }

    #[test]
    fn test_normalize_orders_by_date_ascending() {
        let input = vec![
            pt("2023-04-10", "199.99"),
            pt("2023-01-01", "249.99"),
            pt("2023-02-15", "229.99"),
        ];
        let series = normalize(&input);
        assert_eq!(
            series,
            vec![
                pt("2023-01-01", "249.99"),
                pt("2023-02-15", "229.99"),
                pt("2023-04-10", "199.99"),
            ]
        );
        assert_eq!(current_price(&series), Some(BigDecimal::from_str("199.99").unwrap()));
    }

    #[test]
    fn test_normalize_is_permutation_invariant_for_distinct_dates() {
        let a = pt("2023-01-01", "249.99");
        let b = pt("2023-02-15", "229.99");
        let c = pt("2023-04-10", "199.99");
        let expected = vec![a.clone(), b.clone(), c.clone()];

        let permutations = [
            vec![a.clone(), b.clone(), c.clone()],
            vec![a.clone(), c.clone(), b.clone()],
            vec![b.clone(), a.clone(), c.clone()],
            vec![b.clone(), c.clone(), a.clone()],
            vec![c.clone(), a.clone(), b.clone()],
            vec![c.clone(), b.clone(), a.clone()],
        ];
        for input in &permutations {
            assert_eq!(normalize(input), expected);
        }
    }

    #[test]
    fn test_normalize_preserves_input_order_on_equal_dates() {
        let input = vec![pt("2023-01-01", "10"), pt("2023-01-01", "20")];
        let series = normalize(&input);
        assert_eq!(series[0].price, BigDecimal::from_str("10").unwrap());
        assert_eq!(series[1].price, BigDecimal::from_str("20").unwrap());
    }

    #[test]
    fn test_normalize_all_equal_dates_keeps_original_order() {
        let input = vec![
            pt("2023-03-01", "1"),
            pt("2023-03-01", "2"),
            pt("2023-03-01", "3"),
        ];
        assert_eq!(normalize(&input), input);
    }

    #[test]
    fn test_normalize_empty_input_yields_empty_output() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_normalize_single_point_unchanged() {
        let input = vec![pt("2023-05-10", "149.99")];
        assert_eq!(normalize(&input), input);
    }

    #[test]
    fn test_normalize_does_not_mutate_input_and_keeps_length() {
        let input = vec![
            pt("2023-04-10", "199.99"),
            pt("2023-01-01", "249.99"),
            pt("2023-02-15", "229.99"),
        ];
        let snapshot = input.clone();
        let series = normalize(&input);
        assert_eq!(input, snapshot);
        assert_eq!(series.len(), input.len());
    }

    #[test]
    fn test_current_price_of_empty_series_is_absent() {
        assert_eq!(current_price(&[]), None);
    }

    #[test]
    fn test_current_price_matches_max_date_element() {
        let inputs = vec![
            vec![pt("2023-02-01", "279.99"), pt("2023-04-15", "249.99"), pt("2023-01-01", "299.99")],
            vec![pt("2023-05-01", "79.99")],
            vec![pt("2023-03-01", "89.99"), pt("2023-01-01", "99.99")],
        ];
        for input in inputs {
            let max_price = input
                .iter()
                .max_by_key(|p| p.date)
                .map(|p| p.price.clone());
            assert_eq!(current_price(&normalize(&input)), max_price);
        }
    }

    #[test]
    fn test_append_observation_keeps_series_sorted() {
        let series = normalize(&[pt("2023-01-01", "179.99"), pt("2023-05-10", "149.99")]);
        let extended = append_observation(&series, pt("2023-03-15", "159.99"));
        assert_eq!(
            extended,
            vec![
                pt("2023-01-01", "179.99"),
                pt("2023-03-15", "159.99"),
                pt("2023-05-10", "149.99"),
            ]
        );
    }

    #[test]
    fn test_append_observation_same_date_sorts_after_existing() {
        let series = normalize(&[pt("2023-01-01", "10")]);
        let extended = append_observation(&series, pt("2023-01-01", "20"));
        assert_eq!(extended[0].price, BigDecimal::from_str("10").unwrap());
        assert_eq!(extended[1].price, BigDecimal::from_str("20").unwrap());
        assert_eq!(current_price(&extended), Some(BigDecimal::from_str("20").unwrap()));
    }

    #[test]
    fn test_append_observation_is_idempotent_under_normalize() {
        let series = normalize(&[pt("2023-01-01", "249.99"), pt("2023-02-15", "229.99")]);
        let extended = append_observation(&series, pt("2023-02-15", "219.99"));
        assert_eq!(normalize(&extended), extended);
    }

    #[test]
    fn test_parse_observations_accepts_text_and_numeric_prices() {
        let records = vec![
            raw("2023-01-01", "249.99"),
            RawPriceRecord {
                effective_date: "2023-02-15".to_string(),
                unit_price: RawPrice::Number(229.0),
            },
        ];
        let points = parse_observations(&records).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], pt("2023-01-01", "249.99"));
        assert_eq!(points[1].price, BigDecimal::from_str("229").unwrap());
    }

    #[test]
    fn test_parse_observations_accepts_zero_and_negative_prices() {
        let records = vec![raw("2023-01-01", "0"), raw("2023-01-02", "-15.50")];
        let points = parse_observations(&records).unwrap();
        assert_eq!(points[1].price, BigDecimal::from_str("-15.50").unwrap());
    }

    #[test]
    fn test_parse_observations_rejects_unparseable_date() {
        let records = vec![raw("not-a-date", "10.00")];
        assert!(matches!(
            parse_observations(&records),
            Err(DataFormatError::BadDate(_))
        ));
    }

    #[test]
    fn test_parse_observations_rejects_unparseable_price() {
        let records = vec![raw("2023-01-01", "free")];
        assert!(matches!(
            parse_observations(&records),
            Err(DataFormatError::BadPrice(_))
        ));
    }

    #[test]
    fn test_parse_observations_rejects_non_finite_price() {
        let records = vec![RawPriceRecord {
            effective_date: "2023-01-01".to_string(),
            unit_price: RawPrice::Number(f64::NAN),
        }];
        assert!(matches!(
            parse_observations(&records),
            Err(DataFormatError::NonFinitePrice(_))
        ));
    }

    #[test]
    fn test_parse_observations_preserves_input_order() {
        let records = vec![raw("2023-04-10", "199.99"), raw("2023-01-01", "249.99")];
        let points = parse_observations(&records).unwrap();
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2023, 4, 10).unwrap());
    }
}
