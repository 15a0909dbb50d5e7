//! Dashboard greeting: a weather-dependent sales nudge.
//!
//! There is no weather feed. `RandomWeather` rolls a demo value; a real
//! source only needs to implement `WeatherProvider`.

use rand::Rng;
use serde::Serialize;

use crate::location::GeolocationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WeatherKind {
    #[serde(rename = "맑음")]
    Clear,
    #[serde(rename = "흐림")]
    Cloudy,
    #[serde(rename = "비")]
    Rain,
}

impl WeatherKind {
    pub fn label(&self) -> &'static str {
        match self {
            WeatherKind::Clear => "맑음",
            WeatherKind::Cloudy => "흐림",
            WeatherKind::Rain => "비",
        }
    }

    /// Map a uniform roll in `[0, 1)` to a weather: 40% clear, 30% cloudy,
    /// 30% rain.
    pub fn from_roll(roll: f64) -> Self {
        if roll < 0.4 {
            WeatherKind::Clear
        } else if roll < 0.7 {
            WeatherKind::Cloudy
        } else {
            WeatherKind::Rain
        }
    }

    /// Encouragement text. `**…**` spans are meant to be rendered bold.
    pub fn message(&self) -> &'static str {
        match self {
            WeatherKind::Clear => "☀️ 날씨가 정말 화창해요! **소장님들께 커피 한 잔** 들고 **방문하기 딱 좋은 날씨**입니다.",
            WeatherKind::Rain => "☔ 비 오는 날엔 **소장님들도 사무실에 계실 확률이 높죠?** **안부 전화**로 점수를 따보세요!",
            WeatherKind::Cloudy => "☁️ 흐린 날씨지만 **사장님의 영업 열정은 오늘도 맑음!** 주변 단지들을 **꼼꼼히 챙겨드릴게요.**",
        }
    }
}

pub trait WeatherProvider: Send + Sync {
    fn current(&self) -> WeatherKind;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomWeather;

impl WeatherProvider for RandomWeather {
    fn current(&self) -> WeatherKind {
        WeatherKind::from_roll(rand::rng().random::<f64>())
    }
}

impl WeatherProvider for WeatherKind {
    fn current(&self) -> WeatherKind {
        *self
    }
}

/// One run of message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSegment {
    pub text: String,
    pub bold: bool,
}

/// Split `text` into plain and bold runs. A bold run is `**` + one or more
/// characters other than `*` + `**`; anything else stays literal.
pub fn parse_bold_segments(text: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut plain = String::new();
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(after_open) = rest.strip_prefix("**") {
            let inner_len = after_open.find('*').unwrap_or(after_open.len());
            if inner_len > 0 && after_open[inner_len..].starts_with("**") {
                if !plain.is_empty() {
                    segments.push(TextSegment { text: std::mem::take(&mut plain), bold: false });
                }
                segments.push(TextSegment {
                    text: after_open[..inner_len].to_string(),
                    bold: true,
                });
                rest = &after_open[inner_len + 2..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            plain.push(c);
        }
        rest = chars.as_str();
    }
    if !plain.is_empty() {
        segments.push(TextSegment { text: plain, bold: false });
    }
    segments
}

/// Line shown above the greeting.
pub fn location_label(location: &GeolocationState) -> &'static str {
    if location.loading || location.center().is_none() {
        "위치 정보를 불러오는 중이에요."
    } else {
        "지금 계신 곳 주변 단지를 살펴보고 있어요."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;

    fn seg(text: &str, bold: bool) -> TextSegment {
        TextSegment { text: text.to_string(), bold }
    }

    #[test]
    fn test_roll_thresholds() {
        assert_eq!(WeatherKind::from_roll(0.0), WeatherKind::Clear);
        assert_eq!(WeatherKind::from_roll(0.3999), WeatherKind::Clear);
        assert_eq!(WeatherKind::from_roll(0.4), WeatherKind::Cloudy);
        assert_eq!(WeatherKind::from_roll(0.6999), WeatherKind::Cloudy);
        assert_eq!(WeatherKind::from_roll(0.7), WeatherKind::Rain);
        assert_eq!(WeatherKind::from_roll(0.9999), WeatherKind::Rain);
    }

    #[test]
    fn test_random_weather_is_one_of_three() {
        for _ in 0..50 {
            let kind = RandomWeather.current();
            assert!(!kind.message().is_empty());
        }
    }

    #[test]
    fn test_parse_bold_segments() {
        assert_eq!(
            parse_bold_segments("a **b** c"),
            vec![seg("a ", false), seg("b", true), seg(" c", false)]
        );
        assert_eq!(parse_bold_segments("**x**"), vec![seg("x", true)]);
        assert_eq!(parse_bold_segments(""), Vec::<TextSegment>::new());
    }

    #[test]
    fn test_parse_bold_leaves_unclosed_markers_literal() {
        assert_eq!(parse_bold_segments("a ** b"), vec![seg("a ** b", false)]);
        assert_eq!(parse_bold_segments("****"), vec![seg("****", false)]);
        assert_eq!(
            parse_bold_segments("***a**"),
            vec![seg("*", false), seg("a", true)]
        );
    }

    #[test]
    fn test_every_message_has_bold_runs() {
        for kind in [WeatherKind::Clear, WeatherKind::Cloudy, WeatherKind::Rain] {
            let segments = parse_bold_segments(kind.message());
            assert!(segments.iter().filter(|s| s.bold).count() >= 2, "{:?}", kind);
            assert!(segments.iter().all(|s| !s.text.contains("**")));
        }
    }

    #[test]
    fn test_location_label() {
        assert_eq!(location_label(&GeolocationState::loading()), "위치 정보를 불러오는 중이에요.");
        let located = GeolocationState::located(LatLng::new(37.5, 127.0));
        assert_eq!(location_label(&located), "지금 계신 곳 주변 단지를 살펴보고 있어요.");
    }
}
