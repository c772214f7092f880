// Model probabilities cluster between 50% and 70%; the display band is
// stretched to 55-80% while keeping the ordering.
const MODEL_MIN: f64 = 50.0;
const MODEL_MAX: f64 = 70.0;
const DISPLAY_MIN: f64 = 55.0;
const DISPLAY_MAX: f64 = 80.0;

const HIGH_THRESHOLD: f64 = 68.0;
const MODERATE_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    High,
    Moderate,
    Competitive,
}

impl ConfidenceTier {
    /// Tier for an already-displayed percentage.
    pub fn from_display(percent: f64) -> Self {
        if percent >= HIGH_THRESHOLD {
            ConfidenceTier::High
        } else if percent >= MODERATE_THRESHOLD {
            ConfidenceTier::Moderate
        } else {
            ConfidenceTier::Competitive
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::High => "High",
            ConfidenceTier::Moderate => "Moderate",
            ConfidenceTier::Competitive => "Competitive",
        }
    }

    pub fn color_hex(self) -> &'static str {
        match self {
            ConfidenceTier::High => "#4caf50",
            ConfidenceTier::Moderate => "#ff9800",
            ConfidenceTier::Competitive => "#9e9e9e",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ConfidenceTier::High => (0x4c, 0xaf, 0x50),
            ConfidenceTier::Moderate => (0xff, 0x98, 0x00),
            ConfidenceTier::Competitive => (0x9e, 0x9e, 0x9e),
        }
    }
}

/// Display-ready confidence. Label and color both come from `tier`, which is
/// derived from `percent` exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceDisplay {
    pub percent: f64,
    pub tier: ConfidenceTier,
}

impl ConfidenceDisplay {
    pub fn from_raw(raw: f64) -> Self {
        let percent = display_percent(raw);
        Self {
            percent,
            tier: ConfidenceTier::from_display(percent),
        }
    }

    pub fn label(&self) -> &'static str {
        self.tier.label()
    }

    pub fn color_hex(&self) -> &'static str {
        self.tier.color_hex()
    }

    /// `67.5%` style text.
    pub fn percent_text(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

pub fn display_percent(raw: f64) -> f64 {
    let percent = if raw.is_nan() { MODEL_MIN } else { raw * 100.0 };
    let clamped = percent.clamp(MODEL_MIN, MODEL_MAX);
    let scaled = (clamped - MODEL_MIN) / (MODEL_MAX - MODEL_MIN) * (DISPLAY_MAX - DISPLAY_MIN)
        + DISPLAY_MIN;
    round_tenths_half_up(scaled)
}

/// Rounds the exact binary value to one decimal, ties going up. Multiplying by
/// ten first would round twice (55.149999.. becomes 551.5 and then 55.2).
fn round_tenths_half_up(value: f64) -> f64 {
    // 60 places is enough to print any f64 in the display band exactly.
    let exact = format!("{value:.60}");
    let Some((whole, frac)) = exact.split_once('.') else {
        return value;
    };
    let Ok(whole) = whole.parse::<u64>() else {
        return value;
    };
    let mut digits = frac.bytes().map(|d| u64::from(d - b'0'));
    let tenth = digits.next().unwrap_or(0);
    let carry = u64::from(digits.next().unwrap_or(0) >= 5);
    (whole * 10 + tenth + carry) as f64 / 10.0
}

pub fn confidence_label(raw: f64) -> &'static str {
    ConfidenceDisplay::from_raw(raw).label()
}

pub fn confidence_color(raw: f64) -> ConfidenceTier {
    ConfidenceDisplay::from_raw(raw).tier
}
