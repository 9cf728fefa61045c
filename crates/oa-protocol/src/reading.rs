use serde::{Deserialize, Serialize};

use crate::error::MissingDataError;

/// Growing season. "fall" is accepted as an alias for autumn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    #[serde(alias = "fall")]
    Autumn,
    Winter,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Case-insensitive name lookup, `fall` maps to autumn.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "autumn" | "fall" => Some(Self::Autumn),
            "winter" => Some(Self::Winter),
            _ => None,
        }
    }

    /// Spring and summer carry the warm-season pest pressure.
    pub fn is_warm(&self) -> bool {
        matches!(self, Self::Spring | Self::Summer)
    }

    /// Capitalized name for human-readable text.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
            Self::Winter => "Winter",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The six environmental/agronomic inputs of a pest-risk prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalReading {
    pub soil_ph: f64,
    /// Air temperature in celsius.
    pub temperature: f64,
    /// Relative humidity percentage.
    pub humidity: f64,
    /// Recent rainfall in mm.
    pub rainfall: f64,
    pub season: Season,
    /// Tree age in years.
    pub tree_age: u32,
}

impl EnvironmentalReading {
    /// True when every numeric field is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.soil_ph, self.temperature, self.humidity, self.rainfall]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Caller-supplied farm details. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FarmData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub farm_location: Option<String>,
    /// Orchard size in hectares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orchard_size_ha: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub varieties: Vec<String>,
}

impl FarmData {
    /// Fields a pest-risk prediction cannot run without.
    pub const REQUIRED_FIELDS: [&'static str; 6] = [
        "soil_ph",
        "temperature",
        "humidity",
        "rainfall",
        "season",
        "tree_age",
    ];

    /// Example record shown to callers who ask what to send.
    pub fn template() -> Self {
        Self {
            soil_ph: Some(6.2),
            temperature: Some(24.0),
            humidity: Some(65.0),
            rainfall: Some(120.0),
            season: Some(Season::Spring),
            tree_age: Some(5),
            farm_location: Some("Northern Rivers, NSW".into()),
            orchard_size_ha: Some(12.5),
            varieties: vec!["a16".into(), "beaumont".into()],
        }
    }

    /// Names of the fields that are present, in declaration order.
    pub fn provided_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        let mut push = |name: &str, present: bool| {
            if present {
                fields.push(name.to_string());
            }
        };
        push("soil_ph", self.soil_ph.is_some());
        push("temperature", self.temperature.is_some());
        push("humidity", self.humidity.is_some());
        push("rainfall", self.rainfall.is_some());
        push("season", self.season.is_some());
        push("tree_age", self.tree_age.is_some());
        push("farm_location", self.farm_location.is_some());
        push("orchard_size_ha", self.orchard_size_ha.is_some());
        push("varieties", !self.varieties.is_empty());
        fields
    }

    /// Build a full reading, or report which required fields are absent.
    pub fn reading(&self) -> Result<EnvironmentalReading, MissingDataError> {
        match (
            self.soil_ph,
            self.temperature,
            self.humidity,
            self.rainfall,
            self.season,
            self.tree_age,
        ) {
            (
                Some(soil_ph),
                Some(temperature),
                Some(humidity),
                Some(rainfall),
                Some(season),
                Some(tree_age),
            ) => Ok(EnvironmentalReading {
                soil_ph,
                temperature,
                humidity,
                rainfall,
                season,
                tree_age,
            }),
            _ => Err(MissingDataError::new(
                Self::REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
                self.provided_fields(),
            )),
        }
    }
}

impl From<EnvironmentalReading> for FarmData {
    fn from(reading: EnvironmentalReading) -> Self {
        Self {
            soil_ph: Some(reading.soil_ph),
            temperature: Some(reading.temperature),
            humidity: Some(reading.humidity),
            rainfall: Some(reading.rainfall),
            season: Some(reading.season),
            tree_age: Some(reading.tree_age),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_accepts_fall_alias() {
        let season: Season = serde_json::from_str(r#""fall""#).unwrap();
        assert_eq!(season, Season::Autumn);
        assert_eq!(serde_json::to_string(&season).unwrap(), r#""autumn""#);
    }

    #[test]
    fn season_from_name_is_case_insensitive() {
        assert_eq!(Season::from_name("Summer"), Some(Season::Summer));
        assert_eq!(Season::from_name(" FALL "), Some(Season::Autumn));
        assert_eq!(Season::from_name("monsoon"), None);
    }

    #[test]
    fn complete_farm_data_builds_reading() {
        let reading = FarmData::template().reading().unwrap();
        assert_eq!(reading.season, Season::Spring);
        assert_eq!(reading.tree_age, 5);
        assert!((reading.soil_ph - 6.2).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_farm_data_reports_missing_fields() {
        let data = FarmData {
            soil_ph: Some(6.0),
            temperature: Some(27.0),
            farm_location: Some("Bundaberg".into()),
            ..Default::default()
        };
        let err = data.reading().unwrap_err();
        assert_eq!(err.required.len(), 6);
        assert_eq!(err.provided, vec!["soil_ph", "temperature", "farm_location"]);
        assert_eq!(err.missing, vec!["humidity", "rainfall", "season", "tree_age"]);
    }

    #[test]
    fn farm_data_deserializes_sparse_json() {
        let json = r#"{"humidity": 82.5, "season": "winter"}"#;
        let data: FarmData = serde_json::from_str(json).unwrap();
        assert_eq!(data.humidity, Some(82.5));
        assert_eq!(data.season, Some(Season::Winter));
        assert!(data.varieties.is_empty());
    }

    #[test]
    fn non_finite_reading_detected() {
        let mut reading = FarmData::template().reading().unwrap();
        assert!(reading.is_finite());
        reading.humidity = f64::NAN;
        assert!(!reading.is_finite());
    }
}
