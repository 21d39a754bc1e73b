// In crates/api-client/src/query.rs

//! Maps caller-facing symbols, timeframes and intervals onto the codes the
//! chart endpoint understands.

use std::fmt;

use core_types::{Interval, Timeframe};

/// Bare crypto tickers quoted against the dollar.
const CRYPTO_TICKERS: [&str; 5] = ["BTC", "ETH", "DOGE", "XRP", "SOL"];

/// Interval codes accepted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderInterval {
    OneMinute,
    TwoMinutes,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
    NinetyMinutes,
    OneHour,
    OneDay,
    OneWeek,
    OneMonth,
}

impl ProviderInterval {
    pub fn code(&self) -> &'static str {
        match self {
            ProviderInterval::OneMinute => "1m",
            ProviderInterval::TwoMinutes => "2m",
            ProviderInterval::FiveMinutes => "5m",
            ProviderInterval::FifteenMinutes => "15m",
            ProviderInterval::ThirtyMinutes => "30m",
            ProviderInterval::SixtyMinutes => "60m",
            ProviderInterval::NinetyMinutes => "90m",
            ProviderInterval::OneHour => "1h",
            ProviderInterval::OneDay => "1d",
            ProviderInterval::OneWeek => "1wk",
            ProviderInterval::OneMonth => "1mo",
        }
    }

    /// Sub-daily bars, which the provider only keeps for a limited window.
    pub fn is_intraday(&self) -> bool {
        !matches!(
            self,
            ProviderInterval::OneDay | ProviderInterval::OneWeek | ProviderInterval::OneMonth
        )
    }
}

impl From<Interval> for ProviderInterval {
    fn from(interval: Interval) -> Self {
        match interval {
            Interval::Minute => ProviderInterval::OneMinute,
            Interval::FiveMinutes => ProviderInterval::FiveMinutes,
            Interval::FifteenMinutes => ProviderInterval::FifteenMinutes,
            Interval::ThirtyMinutes => ProviderInterval::ThirtyMinutes,
            Interval::Hour => ProviderInterval::OneHour,
            Interval::Day => ProviderInterval::OneDay,
            Interval::Week => ProviderInterval::OneWeek,
            Interval::Month => ProviderInterval::OneMonth,
        }
    }
}

impl fmt::Display for ProviderInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// History range codes accepted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
}

impl Period {
    pub fn code(&self) -> &'static str {
        match self {
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
        }
    }
}

impl From<Timeframe> for Period {
    fn from(timeframe: Timeframe) -> Self {
        match timeframe {
            Timeframe::OneMonth => Period::OneMonth,
            Timeframe::ThreeMonths => Period::ThreeMonths,
            Timeframe::SixMonths => Period::SixMonths,
            Timeframe::OneYear => Period::OneYear,
            Timeframe::TwoYears => Period::TwoYears,
            Timeframe::FiveYears => Period::FiveYears,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One request as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuery {
    pub symbol: String,
    pub period: Period,
    pub interval: ProviderInterval,
}

/// A caller request after symbol, period and interval resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub symbol: String,
    /// The period actually requested, after intraday capping.
    pub period: Period,
    /// The period the timeframe maps to before capping.
    pub requested_period: Period,
    pub interval: ProviderInterval,
}

impl ResolvedQuery {
    pub fn primary(&self) -> ProviderQuery {
        ProviderQuery {
            symbol: self.symbol.clone(),
            period: self.period,
            interval: self.interval,
        }
    }

    /// Daily bars over the uncapped period.
    pub fn fallback(&self) -> ProviderQuery {
        ProviderQuery {
            symbol: self.symbol.clone(),
            period: self.requested_period,
            interval: ProviderInterval::OneDay,
        }
    }
}

/// Turns a bare crypto ticker or a well-known company name into a provider
/// ticker. Anything else passes through untouched.
pub fn resolve_symbol(raw: &str) -> String {
    let upper = raw.to_uppercase();

    if CRYPTO_TICKERS.contains(&upper.as_str()) {
        return format!("{upper}-USD");
    }

    let ticker = match upper.as_str() {
        "NVIDIA" => "NVDA",
        "MICROSOFT" => "MSFT",
        "APPLE" => "AAPL",
        "GOOGLE" => "GOOGL",
        "AMAZON" => "AMZN",
        "TESLA" => "TSLA",
        "META" => "META",
        "NETFLIX" => "NFLX",
        _ => return raw.to_string(),
    };
    ticker.to_string()
}

/// Unknown interval names fall back to hourly bars.
pub fn resolve_interval(raw: &str) -> ProviderInterval {
    raw.parse::<Interval>()
        .map(ProviderInterval::from)
        .unwrap_or(ProviderInterval::OneHour)
}

/// Unknown timeframes fall back to one year.
pub fn resolve_period(raw: &str) -> Period {
    raw.parse::<Timeframe>()
        .map(Period::from)
        .unwrap_or(Period::OneYear)
}

/// Resolves a caller request into provider codes.
///
/// Intraday intervals are limited to a one-month range unless the caller
/// already asked for exactly one month.
pub fn resolve(symbol: &str, timeframe: &str, interval: &str) -> ResolvedQuery {
    let interval = resolve_interval(interval);
    let requested_period = resolve_period(timeframe);

    let period = if interval.is_intraday() && timeframe != Timeframe::OneMonth.as_str() {
        tracing::info!(
            interval = %interval,
            requested = %requested_period,
            "Adjusting period to '1mo' for intraday interval."
        );
        Period::OneMonth
    } else {
        requested_period
    };

    ResolvedQuery {
        symbol: resolve_symbol(symbol),
        period,
        requested_period,
        interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crypto_tickers_are_quoted_in_usd() {
        for ticker in CRYPTO_TICKERS {
            assert_eq!(resolve_symbol(ticker), format!("{ticker}-USD"));
            assert_eq!(resolve_symbol(&ticker.to_lowercase()), format!("{ticker}-USD"));
        }
    }

    #[test]
    fn company_names_map_to_tickers() {
        assert_eq!(resolve_symbol("nvidia"), "NVDA");
        assert_eq!(resolve_symbol("Microsoft"), "MSFT");
        assert_eq!(resolve_symbol("GOOGLE"), "GOOGL");
        assert_eq!(resolve_symbol("tesla"), "TSLA");
        assert_eq!(resolve_symbol("meta"), "META");
    }

    #[test]
    fn other_symbols_pass_through() {
        assert_eq!(resolve_symbol("IBM"), "IBM");
        assert_eq!(resolve_symbol("eurusd=x"), "eurusd=x");
        assert_eq!(resolve_symbol("BTC-USD"), "BTC-USD");
    }

    #[test]
    fn interval_table() {
        let expected = [
            ("minute", "1m"),
            ("5min", "5m"),
            ("15min", "15m"),
            ("30min", "30m"),
            ("hour", "1h"),
            ("day", "1d"),
            ("week", "1wk"),
            ("month", "1mo"),
            ("fortnight", "1h"),
        ];
        for (name, code) in expected {
            assert_eq!(resolve_interval(name).code(), code, "interval {name}");
        }
    }

    #[test]
    fn period_table() {
        let expected = [
            ("1M", "1mo"),
            ("3M", "3mo"),
            ("6M", "6mo"),
            ("1Y", "1y"),
            ("2Y", "2y"),
            ("5Y", "5y"),
            ("10Y", "1y"),
        ];
        for (timeframe, code) in expected {
            assert_eq!(resolve_period(timeframe).code(), code, "timeframe {timeframe}");
        }
    }

    #[test]
    fn intraday_requests_are_capped_to_one_month() {
        let query = resolve("AAPL", "1Y", "hour");
        assert_eq!(query.period, Period::OneMonth);
        assert_eq!(query.requested_period, Period::OneYear);
        assert_eq!(query.interval.code(), "1h");

        let query = resolve("AAPL", "5Y", "15min");
        assert_eq!(query.period, Period::OneMonth);

        // Unknown timeframes are not "1M" either.
        let query = resolve("AAPL", "forever", "minute");
        assert_eq!(query.period, Period::OneMonth);
        assert_eq!(query.requested_period, Period::OneYear);
    }

    #[test]
    fn one_month_intraday_is_left_alone() {
        let query = resolve("AAPL", "1M", "minute");
        assert_eq!(query.period, Period::OneMonth);
        assert_eq!(query.interval, ProviderInterval::OneMinute);
    }

    #[test]
    fn daily_and_longer_keep_requested_period() {
        assert_eq!(resolve("AAPL", "5Y", "day").period, Period::FiveYears);
        assert_eq!(resolve("AAPL", "2Y", "week").period, Period::TwoYears);
        assert_eq!(resolve("AAPL", "6M", "month").period, Period::SixMonths);
    }

    #[test]
    fn fallback_uses_daily_bars_and_uncapped_period() {
        let query = resolve("eth", "3M", "30min");
        assert_eq!(query.symbol, "ETH-USD");
        assert_eq!(
            query.primary(),
            ProviderQuery {
                symbol: "ETH-USD".to_string(),
                period: Period::OneMonth,
                interval: ProviderInterval::ThirtyMinutes,
            }
        );
        assert_eq!(
            query.fallback(),
            ProviderQuery {
                symbol: "ETH-USD".to_string(),
                period: Period::ThreeMonths,
                interval: ProviderInterval::OneDay,
            }
        );
    }

    #[test]
    fn intraday_codes() {
        for interval in [
            ProviderInterval::OneMinute,
            ProviderInterval::TwoMinutes,
            ProviderInterval::SixtyMinutes,
            ProviderInterval::NinetyMinutes,
            ProviderInterval::OneHour,
        ] {
            assert!(interval.is_intraday(), "{interval}");
        }
        assert!(!ProviderInterval::OneDay.is_intraday());
        assert!(!ProviderInterval::OneWeek.is_intraday());
        assert!(!ProviderInterval::OneMonth.is_intraday());
    }
}
