//! Animation pacing presets.
//!
//! A [`Speed`] only tells an animating caller how long to wait between
//! [`step`](crate::SearchEngine::step) calls; it never changes the result.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Named delay between two animation steps.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Speed {
    Slow,
    #[default]
    Medium,
    Fast,
}

impl Speed {
    /// All presets, slowest first.
    pub const ALL: [Speed; 3] = [Speed::Slow, Speed::Medium, Speed::Fast];

    /// Delay between steps.
    pub const fn delay(self) -> Duration {
        match self {
            Speed::Slow => Duration::from_millis(100),
            Speed::Medium => Duration::from_millis(50),
            Speed::Fast => Duration::from_millis(10),
        }
    }

    /// Preset name as accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            Speed::Slow => "slow",
            Speed::Medium => "medium",
            Speed::Fast => "fast",
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown speed preset name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown speed `{0}` (expected slow, medium or fast)")]
pub struct ParseSpeedError(pub String);

impl FromStr for Speed {
    type Err = ParseSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Speed::ALL
            .into_iter()
            .find(|speed| speed.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSpeedError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!("slow".parse(), Ok(Speed::Slow));
        assert_eq!(" FAST ".parse(), Ok(Speed::Fast));
        assert_eq!(
            "warp".parse::<Speed>(),
            Err(ParseSpeedError("warp".to_string()))
        );
        for speed in Speed::ALL {
            assert_eq!(speed.to_string().parse(), Ok(speed));
        }
    }

    #[test]
    fn delays_are_ordered() {
        assert!(Speed::Slow.delay() > Speed::Medium.delay());
        assert!(Speed::Medium.delay() > Speed::Fast.delay());
        assert_eq!(Speed::default(), Speed::Medium);
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn lowercase_names() {
        assert_eq!(serde_json::to_string(&Speed::Fast).unwrap(), r#""fast""#);
        let speed: Speed = serde_json::from_str(r#""slow""#).unwrap();
        assert_eq!(speed, Speed::Slow);
        assert!(serde_json::from_str::<Speed>(r#""Slow""#).is_err());
    }
}
