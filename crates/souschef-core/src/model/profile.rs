use serde::{Deserialize, Serialize};

/// Platform-assigned user identity (Telegram user id).
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodPressure {
    Normal,
    Elevated,
    HighStage1,
    HighStage2,
}

impl BloodPressure {
    pub const ALL: [BloodPressure; 4] = [
        Self::Normal,
        Self::Elevated,
        Self::HighStage1,
        Self::HighStage2,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Elevated => "elevated",
            Self::HighStage1 => "high_stage1",
            Self::HighStage2 => "high_stage2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal (120/80)",
            Self::Elevated => "Elevated (120-129/80)",
            Self::HighStage1 => "High Stage 1 (130-139/80-89)",
            Self::HighStage2 => "High Stage 2 (140+/90+)",
        }
    }

    /// Shorter text used on picker buttons.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::HighStage1 => "High Stage 1",
            Self::HighStage2 => "High Stage 2",
            other => other.label(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BloodSugar {
    Normal,
    Prediabetic,
    Diabetic,
}

impl BloodSugar {
    pub const ALL: [BloodSugar; 3] = [Self::Normal, Self::Prediabetic, Self::Diabetic];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Prediabetic => "prediabetic",
            Self::Diabetic => "diabetic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal (70-100 mg/dL)",
            Self::Prediabetic => "Prediabetic (100-125 mg/dL)",
            Self::Diabetic => "Diabetic (126+ mg/dL)",
        }
    }

    pub fn button_label(&self) -> &'static str {
        self.label()
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cholesterol {
    Normal,
    Borderline,
    High,
}

impl Cholesterol {
    pub const ALL: [Cholesterol; 3] = [Self::Normal, Self::Borderline, Self::High];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Borderline => "borderline",
            Self::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal (Less than 200 mg/dL)",
            Self::Borderline => "Borderline (200-239 mg/dL)",
            Self::High => "High (240+ mg/dL)",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal (<200 mg/dL)",
            other => other.label(),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.key() == key)
    }
}

/// The three health metrics the user can set from the `/health` menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HealthMetric {
    BloodPressure,
    BloodSugar,
    Cholesterol,
}

impl HealthMetric {
    pub const ALL: [HealthMetric; 3] = [Self::BloodPressure, Self::BloodSugar, Self::Cholesterol];

    /// Short code used in menu payloads (`health_bp`, `bp_normal`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            Self::BloodPressure => "bp",
            Self::BloodSugar => "bs",
            Self::Cholesterol => "chol",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::BloodPressure => "Blood Pressure",
            Self::BloodSugar => "Blood Sugar",
            Self::Cholesterol => "Cholesterol",
        }
    }

    /// `(key, button label)` for every level of this metric, in menu order.
    pub fn levels(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            Self::BloodPressure => BloodPressure::ALL
                .iter()
                .map(|v| (v.key(), v.button_label()))
                .collect(),
            Self::BloodSugar => BloodSugar::ALL
                .iter()
                .map(|v| (v.key(), v.button_label()))
                .collect(),
            Self::Cholesterol => Cholesterol::ALL
                .iter()
                .map(|v| (v.key(), v.button_label()))
                .collect(),
        }
    }
}

/// A single health value chosen from a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthSetting {
    BloodPressure(BloodPressure),
    BloodSugar(BloodSugar),
    Cholesterol(Cholesterol),
}

impl HealthSetting {
    pub fn parse(metric: HealthMetric, key: &str) -> Option<Self> {
        match metric {
            HealthMetric::BloodPressure => BloodPressure::from_key(key).map(Self::BloodPressure),
            HealthMetric::BloodSugar => BloodSugar::from_key(key).map(Self::BloodSugar),
            HealthMetric::Cholesterol => Cholesterol::from_key(key).map(Self::Cholesterol),
        }
    }

    pub fn metric(&self) -> HealthMetric {
        match self {
            Self::BloodPressure(_) => HealthMetric::BloodPressure,
            Self::BloodSugar(_) => HealthMetric::BloodSugar,
            Self::Cholesterol(_) => HealthMetric::Cholesterol,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::BloodPressure(v) => v.key(),
            Self::BloodSugar(v) => v.key(),
            Self::Cholesterol(v) => v.key(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BloodPressure(v) => v.label(),
            Self::BloodSugar(v) => v.label(),
            Self::Cholesterol(v) => v.label(),
        }
    }
}

/// Per-user health and dietary preferences.
///
/// `None` means the user never answered. For restrictions and allergies,
/// `Some("")` records an explicit "none" answer from the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<BloodPressure>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_sugar: Option<BloodSugar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<Cholesterol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

impl UserProfile {
    pub fn set_health(&mut self, setting: HealthSetting) {
        match setting {
            HealthSetting::BloodPressure(v) => self.blood_pressure = Some(v),
            HealthSetting::BloodSugar(v) => self.blood_sugar = Some(v),
            HealthSetting::Cholesterol(v) => self.cholesterol = Some(v),
        }
    }

    pub fn has_health(&self) -> bool {
        self.blood_pressure.is_some() || self.blood_sugar.is_some() || self.cholesterol.is_some()
    }

    /// Non-empty dietary restrictions, if any.
    pub fn restrictions(&self) -> Option<&str> {
        non_empty(self.dietary_restrictions.as_deref())
    }

    /// Non-empty allergies, if any.
    pub fn allergy_list(&self) -> Option<&str> {
        non_empty(self.allergies.as_deref())
    }

    pub fn has_diet(&self) -> bool {
        self.restrictions().is_some() || self.allergy_list().is_some()
    }

    /// True when nothing worth showing or sending to the model is stored.
    pub fn is_empty(&self) -> bool {
        !self.has_health() && !self.has_diet()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Interpret a wizard answer: a literal `none` (any case) records an explicit
/// empty value, anything else is kept as typed (trimmed).
pub fn wizard_answer(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        String::new()
    } else {
        trimmed.to_string()
    }
}
