//! Current-conditions snapshot and the display bucket for a weather code.

use std::fmt;

use crate::errors::Result;
use crate::utils::round_to_i64;

/// Display bucket derived from a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherCondition {
    Clear,
    PartlyCloudy,
    Rain,
    Snow,
    Cloudy,
}

impl WeatherCondition {
    /// `0` clear, `1..=3` partly cloudy, `4..=67` rain, `68..=77` snow, anything else cloudy.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => WeatherCondition::Clear,
            1..=3 => WeatherCondition::PartlyCloudy,
            4..=67 => WeatherCondition::Rain,
            68..=77 => WeatherCondition::Snow,
            _ => WeatherCondition::Cloudy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::PartlyCloudy => "partly cloudy",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Cloudy => "cloudy",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub condition_code: i64,
}

impl WeatherReport {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_code(self.condition_code)
    }

    /// `"12°C (feels 9°C), rain"`, temperatures rounded to whole degrees.
    pub fn summary(&self) -> String {
        format!(
            "{}°C (feels {}°C), {}",
            round_to_i64(self.temperature_c),
            round_to_i64(self.feels_like_c),
            self.condition()
        )
    }
}

/// Supplies current conditions at the trip destination.
pub trait WeatherProvider: Send + Sync {
    fn fetch_current(&self) -> Result<WeatherReport>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_fixed_ranges() {
        assert_eq!(WeatherCondition::from_code(0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_code(1), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_code(3), WeatherCondition::PartlyCloudy);
        assert_eq!(WeatherCondition::from_code(4), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_code(45), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_code(67), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::from_code(68), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_code(77), WeatherCondition::Snow);
        assert_eq!(WeatherCondition::from_code(78), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_code(95), WeatherCondition::Cloudy);
        assert_eq!(WeatherCondition::from_code(-1), WeatherCondition::Cloudy);
    }

    #[test]
    fn summary_rounds_temperatures() {
        let report = WeatherReport {
            temperature_c: 7.5,
            feels_like_c: -2.5,
            condition_code: 71,
        };
        assert_eq!(report.summary(), "8°C (feels -2°C), snow");
    }
}
