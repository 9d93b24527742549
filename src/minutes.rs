use serde_json::Value;

/// Per-game playing time as delivered by the source.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MinutesValue {
    #[default]
    Missing,
    Count(f64),
    Clock(String),
}

impl MinutesValue {
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map(Self::Count).unwrap_or_default(),
            Some(Value::String(s)) => Self::Clock(s.clone()),
            _ => Self::Missing,
        }
    }

    pub fn normalized(&self) -> f64 {
        normalize_minutes(self)
    }
}

impl From<f64> for MinutesValue {
    fn from(value: f64) -> Self {
        Self::Count(value)
    }
}

impl From<&str> for MinutesValue {
    fn from(value: &str) -> Self {
        Self::Clock(value.to_string())
    }
}

/// Fractional minutes for one game; anything unusable is 0.0.
pub fn normalize_minutes(value: &MinutesValue) -> f64 {
    match value {
        MinutesValue::Missing => 0.0,
        MinutesValue::Count(n) => non_negative(*n),
        MinutesValue::Clock(raw) => parse_clock(raw).map(non_negative).unwrap_or(0.0),
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn parse_clock(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(iso) = s.strip_prefix("PT") {
        return parse_iso_clock(iso);
    }
    let Some((mins, secs)) = s.split_once(':') else {
        return s.parse::<f64>().ok();
    };
    let mins = mins.trim().parse::<u32>().ok()?;
    let secs = secs.trim().parse::<f64>().ok()?;
    if !(0.0..60.0).contains(&secs) {
        return None;
    }
    Some(f64::from(mins) + secs / 60.0)
}

// "12M30.00S" (the "PT" prefix already stripped).
fn parse_iso_clock(rest: &str) -> Option<f64> {
    let (mins, rest) = match rest.split_once('M') {
        Some((m, r)) => (m.parse::<f64>().ok()?, r),
        None => (0.0, rest),
    };
    let secs = match rest.strip_suffix('S') {
        Some(s) if !s.is_empty() => s.parse::<f64>().ok()?,
        Some(_) => return None,
        None if rest.is_empty() => 0.0,
        None => return None,
    };
    Some(mins + secs / 60.0)
}
