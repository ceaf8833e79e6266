use std::env;

/// Runtime configuration, read once from `SIPFOLIO_*` environment
/// variables. Every knob has a default so the library works without any
/// environment at all.
#[derive(Debug, Clone)]
pub struct Config {
    /// NAV the synthetic fallback series starts from.
    pub fallback_base_nav: f64,
    /// Annual growth rate (percent) the fallback series compounds monthly.
    pub fallback_annual_growth_pct: f64,
    /// Maximum multiplicative noise per fallback point (0.02 = ±2%).
    pub fallback_noise_amplitude: f64,
    /// Underperformance is only flagged beyond this many percentage points.
    pub underperformance_tolerance_pct: f64,
    /// Benchmark symbol used when the caller does not name one.
    pub benchmark_symbol: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            fallback_base_nav: env_f64("SIPFOLIO_FALLBACK_BASE_NAV", defaults.fallback_base_nav),
            fallback_annual_growth_pct: env_f64(
                "SIPFOLIO_FALLBACK_ANNUAL_GROWTH_PCT",
                defaults.fallback_annual_growth_pct,
            ),
            fallback_noise_amplitude: env_f64(
                "SIPFOLIO_FALLBACK_NOISE_AMPLITUDE",
                defaults.fallback_noise_amplitude,
            ),
            underperformance_tolerance_pct: env_f64(
                "SIPFOLIO_UNDERPERFORMANCE_TOLERANCE_PCT",
                defaults.underperformance_tolerance_pct,
            ),
            benchmark_symbol: env::var("SIPFOLIO_BENCHMARK_SYMBOL")
                .unwrap_or(defaults.benchmark_symbol),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fallback_base_nav: 100.0,
            fallback_annual_growth_pct: 12.0,
            fallback_noise_amplitude: 0.02,
            underperformance_tolerance_pct: 2.0,
            benchmark_symbol: "^NSEI".into(),
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
