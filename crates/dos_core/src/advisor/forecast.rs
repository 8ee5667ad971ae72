//! Three-year business-plan forecast.

use serde::{Deserialize, Serialize};

/// One forecast year, whole euros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearFigures {
    pub revenue: i64,
    /// Variable costs (purchases, subcontracting).
    pub costs: i64,
    /// Fixed charges.
    pub charges: i64,
}

impl YearFigures {
    pub fn profit(&self) -> i64 {
        self.revenue - self.costs - self.charges
    }

    /// Profit over revenue, percent with one decimal; `0.0` without revenue.
    pub fn margin_percent(&self) -> f64 {
        if self.revenue <= 0 {
            return 0.0;
        }
        round_one_decimal(self.profit() as f64 * 100.0 / self.revenue as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub years: [YearFigures; 3],
}

impl Default for Forecast {
    /// Starter figures shown on an empty business plan.
    fn default() -> Self {
        Self {
            years: [
                YearFigures {
                    revenue: 50_000,
                    costs: 30_000,
                    charges: 8_000,
                },
                YearFigures {
                    revenue: 80_000,
                    costs: 45_000,
                    charges: 12_000,
                },
                YearFigures {
                    revenue: 120_000,
                    costs: 60_000,
                    charges: 18_000,
                },
            ],
        }
    }
}

impl Forecast {
    /// Revenue at which year-1 contribution covers year-1 fixed charges.
    ///
    /// `None` without revenue or when costs eat the whole revenue.
    pub fn break_even_revenue(&self) -> Option<f64> {
        let first = self.years[0];
        if first.revenue <= 0 {
            return None;
        }
        let contribution_ratio = 1.0 - first.costs as f64 / first.revenue as f64;
        if contribution_ratio <= 0.0 {
            return None;
        }
        Some(first.charges as f64 / contribution_ratio)
    }

    /// Revenue growth from year 1 to year 3, whole percent.
    pub fn growth_percent(&self) -> Option<i64> {
        let first = self.years[0].revenue;
        if first == 0 {
            return None;
        }
        let growth = (self.years[2].revenue - first) as f64 * 100.0 / first as f64;
        Some(growth.round() as i64)
    }

    pub fn cumulative_profit(&self) -> i64 {
        self.years.iter().map(YearFigures::profit).sum()
    }
}

/// Integer form input; anything unparsable counts as zero.
pub fn parse_amount(value: &str) -> i64 {
    value.trim().parse().unwrap_or(0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{parse_amount, Forecast, YearFigures};

    #[test]
    fn starter_figures_derive_expected_indicators() {
        let forecast = Forecast::default();
        assert_eq!(forecast.years[0].profit(), 12_000);
        assert_eq!(forecast.years[0].margin_percent(), 24.0);
        assert_eq!(forecast.growth_percent(), Some(140));
        assert_eq!(forecast.cumulative_profit(), 12_000 + 23_000 + 42_000);
        let break_even = forecast.break_even_revenue().unwrap();
        assert!((break_even - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_years_do_not_divide_by_zero() {
        let forecast = Forecast {
            years: [YearFigures::default(); 3],
        };
        assert_eq!(forecast.years[0].margin_percent(), 0.0);
        assert_eq!(forecast.break_even_revenue(), None);
        assert_eq!(forecast.growth_percent(), None);
    }

    #[test]
    fn margin_keeps_one_decimal() {
        let year = YearFigures {
            revenue: 30_000,
            costs: 10_000,
            charges: 10_000,
        };
        assert_eq!(year.margin_percent(), 33.3);
        assert_eq!(parse_amount(" 4500 "), 4500);
        assert_eq!(parse_amount("abc"), 0);
    }
}
