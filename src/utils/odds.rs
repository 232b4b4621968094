use crate::error::{Result, ScoringError};
use crate::models::OddsValue;

/// Smallest magnitude a sportsbook quotes in American format
const MIN_AMERICAN_MAGNITUDE: i32 = 100;

/// Convert American odds to decimal odds
/// Positive odds (+150) mean you win $150 on a $100 bet -> 2.5
/// Negative odds (-150) mean you need to bet $150 to win $100 -> 1.667
pub fn american_to_decimal(odds: i32) -> Result<f64> {
    if odds == 0 {
        return Err(ScoringError::InvalidOddsInput(
            "American odds of 0 have no defined probability".to_string(),
        ));
    }
    if odds.unsigned_abs() < MIN_AMERICAN_MAGNITUDE as u32 {
        return Err(ScoringError::InvalidOddsInput(format!(
            "American odds must have magnitude >= {}, got {:+}",
            MIN_AMERICAN_MAGNITUDE, odds
        )));
    }

    let decimal = if odds > 0 {
        odds as f64 / 100.0 + 1.0
    } else {
        100.0 / (odds as f64).abs() + 1.0
    };

    Ok(decimal)
}

/// Convert decimal odds to American odds
/// Evens and longer (>= 2.0) come back positive, shorter prices negative
pub fn decimal_to_american(decimal: f64) -> Result<i32> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(ScoringError::InvalidOddsInput(format!(
            "decimal odds must be a finite number greater than 1.0, got {}",
            decimal
        )));
    }

    let american = if decimal >= 2.0 {
        ((decimal - 1.0) * 100.0).round()
    } else {
        (-100.0 / (decimal - 1.0)).round()
    };

    // Prices a hair above 1.0 blow up toward -infinity
    if american < i32::MIN as f64 || american > i32::MAX as f64 {
        return Err(ScoringError::InvalidOddsInput(format!(
            "decimal odds {} are outside the representable American range",
            decimal
        )));
    }

    Ok(american as i32)
}

/// Render American odds with an explicit sign, e.g. "+150" or "-110"
pub fn format_american(odds: i32) -> String {
    format!("{:+}", odds)
}

/// Parse American odds as quoted by a sportsbook: "+150", "150", "-110", "EVEN"
pub fn parse_american(input: &str) -> Result<i32> {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("even") || trimmed.eq_ignore_ascii_case("ev") {
        return Ok(100);
    }

    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let odds: i32 = digits.parse().map_err(|_| {
        ScoringError::InvalidOddsInput(format!("cannot parse American odds from {:?}", input))
    })?;

    // Validate magnitude and sign with the same rules as conversion
    american_to_decimal(odds)?;
    Ok(odds)
}

/// Implied probability of decimal odds (ignores bookmaker margin)
pub fn implied_probability(decimal: f64) -> Result<f64> {
    if !decimal.is_finite() || decimal <= 1.0 {
        return Err(ScoringError::InvalidOddsInput(format!(
            "decimal odds must be a finite number greater than 1.0, got {}",
            decimal
        )));
    }
    Ok(1.0 / decimal)
}

/// Convert American odds to implied probability
pub fn american_odds_to_probability(odds: i32) -> Result<f64> {
    implied_probability(american_to_decimal(odds)?)
}

impl OddsValue {
    pub fn to_decimal(&self) -> Result<f64> {
        match *self {
            OddsValue::American(odds) => american_to_decimal(odds),
            OddsValue::Decimal(odds) => {
                // Round-trip through the validator so bad decimals are rejected here too
                implied_probability(odds)?;
                Ok(odds)
            }
        }
    }

    pub fn to_american(&self) -> Result<i32> {
        match *self {
            OddsValue::American(odds) => {
                american_to_decimal(odds)?;
                Ok(odds)
            }
            OddsValue::Decimal(odds) => decimal_to_american(odds),
        }
    }

    pub fn implied_probability(&self) -> Result<f64> {
        implied_probability(self.to_decimal()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_american_to_decimal() {
        assert_eq!(american_to_decimal(150).unwrap(), 2.5);
        assert_eq!(american_to_decimal(100).unwrap(), 2.0);
        assert_eq!(american_to_decimal(800).unwrap(), 9.0);

        let decimal = american_to_decimal(-150).unwrap();
        assert!((decimal - 1.6667).abs() < 0.0001);

        let decimal = american_to_decimal(-110).unwrap();
        assert!((decimal - 1.9091).abs() < 0.0001);
    }

    #[test]
    fn test_american_to_decimal_rejects_invalid() {
        assert!(matches!(
            american_to_decimal(0),
            Err(ScoringError::InvalidOddsInput(_))
        ));
        assert!(american_to_decimal(99).is_err());
        assert!(american_to_decimal(-50).is_err());
    }

    #[test]
    fn test_decimal_to_american() {
        assert_eq!(decimal_to_american(2.5).unwrap(), 150);
        assert_eq!(decimal_to_american(2.0).unwrap(), 100);
        assert_eq!(decimal_to_american(1.6667).unwrap(), -150);
        assert_eq!(decimal_to_american(1.5).unwrap(), -200);
        assert_eq!(format_american(decimal_to_american(2.5).unwrap()), "+150");
        assert_eq!(format_american(decimal_to_american(1.6667).unwrap()), "-150");
    }

    #[test]
    fn test_decimal_to_american_rejects_invalid() {
        for bad in [1.0, 0.5, -3.0, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(decimal_to_american(bad), Err(ScoringError::InvalidOddsInput(_))),
                "{} should be rejected",
                bad
            );
        }
        // Extreme but convertible price stays a large negative number
        assert_eq!(decimal_to_american(1.0001).unwrap(), -1_000_000);
        // Too close to 1.0 to fit in an i32
        assert!(decimal_to_american(1.0 + 1e-12).is_err());
    }

    #[test]
    fn test_round_trip() {
        for odds in [100, 150, 200, -110, -150, -200] {
            let decimal = american_to_decimal(odds).unwrap();
            assert_eq!(decimal_to_american(decimal).unwrap(), odds);
        }

        // Every whole-unit price in a typical board survives the round trip
        for odds in (100..=20_000).chain(-5_000..=-100) {
            let decimal = american_to_decimal(odds).unwrap();
            assert_eq!(decimal_to_american(decimal).unwrap(), odds, "odds {}", odds);
        }
    }

    #[test]
    fn test_monotonicity() {
        let underdogs = [100, 150, 200, 500, 1500];
        for pair in underdogs.windows(2) {
            assert!(american_to_decimal(pair[0]).unwrap() < american_to_decimal(pair[1]).unwrap());
        }

        let favorites = [-400, -200, -150, -110, -100];
        for pair in favorites.windows(2) {
            assert!(american_to_decimal(pair[0]).unwrap() < american_to_decimal(pair[1]).unwrap());
        }
    }

    #[test]
    fn test_parse_american() {
        assert_eq!(parse_american("+150").unwrap(), 150);
        assert_eq!(parse_american(" -110 ").unwrap(), -110);
        assert_eq!(parse_american("2500").unwrap(), 2500);
        assert_eq!(parse_american("EVEN").unwrap(), 100);
        assert!(parse_american("abc").is_err());
        assert!(parse_american("+0").is_err());
        assert!(parse_american("-20").is_err());
    }

    #[test]
    fn test_american_odds_to_probability() {
        // Positive odds
        let prob = american_odds_to_probability(150).unwrap();
        assert!((prob - 0.4).abs() < 0.01);
        // Negative odds
        let prob = american_odds_to_probability(-150).unwrap();
        assert!((prob - 0.6).abs() < 0.01);
        // Even odds
        let prob = american_odds_to_probability(100).unwrap();
        assert!((prob - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_odds_value_dispatch() {
        assert_eq!(OddsValue::American(150).to_decimal().unwrap(), 2.5);
        assert_eq!(OddsValue::Decimal(2.5).to_american().unwrap(), 150);
        assert!(OddsValue::Decimal(0.9).to_decimal().is_err());
        assert!(OddsValue::American(0).to_american().is_err());
    }
}
