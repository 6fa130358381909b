//! Core data types shared by every page.
//!
//! Indicators and methods arrive from the recommendation service as JSON and
//! are immutable once decoded. Enum-valued attributes are parsed
//! case-insensitively; attributes the service omits, sends as `null`, or
//! sends with an unrecognised label fall back to the documented placeholders
//! (`Medium` for levels, `Primary` for priority, empty text).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string does not name a known enum value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: '{value}'")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

/// Ordinal rating used for cost, accuracy, and ease of use.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

/// Display tone for a [`Level`] badge.
///
/// Cheap is good, expensive is an alert. The mapping is exhaustive so a new
/// level cannot silently fall through to an unstyled badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Good,
    Caution,
    Alert,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Low, Level::Medium, Level::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "Low",
            Level::Medium => "Medium",
            Level::High => "High",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Level::Low => Tone::Good,
            Level::Medium => Tone::Caution,
            Level::High => Tone::Alert,
        }
    }
}

impl FromStr for Level {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Level::Low),
            "medium" => Ok(Level::Medium),
            "high" => Ok(Level::High),
            _ => Err(UnknownValue {
                kind: "level",
                value: s.to_string(),
            }),
        }
    }
}

/// Ecosystem component an indicator belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Component {
    Biotic,
    Abiotic,
    Socioeconomic,
}

impl Component {
    pub const ALL: [Component; 3] = [
        Component::Biotic,
        Component::Abiotic,
        Component::Socioeconomic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Biotic => "Biotic",
            Component::Abiotic => "Abiotic",
            Component::Socioeconomic => "Socioeconomic",
        }
    }
}

impl FromStr for Component {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "biotic" => Ok(Component::Biotic),
            "abiotic" => Ok(Component::Abiotic),
            "socioeconomic" => Ok(Component::Socioeconomic),
            _ => Err(UnknownValue {
                kind: "component",
                value: s.to_string(),
            }),
        }
    }
}

/// Whether an indicator is a primary or secondary measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Priority {
    #[default]
    Primary,
    Secondary,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Primary => "Primary",
            Priority::Secondary => "Secondary",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Priority::Primary),
            "secondary" => Ok(Priority::Secondary),
            _ => Err(UnknownValue {
                kind: "priority",
                value: s.to_string(),
            }),
        }
    }
}

// serde glue: every enum above round-trips through its display label.

impl TryFrom<String> for Level {
    type Error = UnknownValue;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Level> for &'static str {
    fn from(v: Level) -> Self {
        v.as_str()
    }
}

impl TryFrom<String> for Component {
    type Error = UnknownValue;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Component> for &'static str {
    fn from(v: Component) -> Self {
        v.as_str()
    }
}

impl TryFrom<String> for Priority {
    type Error = UnknownValue;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Priority> for &'static str {
    fn from(v: Priority) -> Self {
        v.as_str()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode an optional attribute, mapping `null` and unknown labels to `T::default()`.
fn or_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: fmt::Display,
{
    Ok(match Option::<String>::deserialize(de)? {
        None => T::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::debug!(error = %e, "unrecognised attribute, using placeholder");
            T::default()
        }),
    })
}

fn null_as_empty<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

/// A measurement method for an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub cost: Level,
    #[serde(default, deserialize_with = "or_default")]
    pub accuracy: Level,
    #[serde(default, deserialize_with = "or_default")]
    pub ease: Level,
}

/// A recommended indicator as returned by `/recommendations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: i64,
    pub name: String,
    pub component: Component,
    #[serde(default, deserialize_with = "or_default")]
    pub class: String,
    #[serde(default, deserialize_with = "or_default")]
    pub cost: Level,
    #[serde(default, deserialize_with = "or_default")]
    pub accuracy: Level,
    #[serde(default, deserialize_with = "or_default")]
    pub ease: Level,
    #[serde(default, deserialize_with = "or_default")]
    pub principle: String,
    #[serde(default, deserialize_with = "or_default")]
    pub criterion: String,
    #[serde(default, deserialize_with = "or_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "or_default")]
    pub definition: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub methods: Vec<Method>,
}

/// Marker stored in [`ProjectProfile::capacity`] when the user declines to
/// state a technical capacity.
pub const CAPACITY_SKIPPED: &str = "skipped";

/// Number of fields that must be present before recommendations make sense.
pub const REQUIRED_FIELDS: usize = 4;

/// The project description gathered during intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcomes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<String>,
}

fn is_filled(v: &Option<String>) -> bool {
    v.as_deref().is_some_and(|s| !s.trim().is_empty())
}

impl ProjectProfile {
    /// How many of location, commodity, budget, and outcomes are filled.
    pub fn required_present(&self) -> usize {
        [&self.location, &self.commodity, &self.budget, &self.outcomes]
            .into_iter()
            .filter(|v| is_filled(v))
            .count()
    }

    /// Progress through the required fields, `0..=100`.
    pub fn progress_percent(&self) -> u8 {
        ((self.required_present() * 100) / REQUIRED_FIELDS) as u8
    }

    /// Whether capacity was addressed, either with a value or the skip marker.
    pub fn capacity_addressed(&self) -> bool {
        is_filled(&self.capacity)
    }

    /// All required fields present and capacity addressed.
    ///
    /// Field count alone never completes a profile.
    pub fn is_complete(&self) -> bool {
        self.required_present() == REQUIRED_FIELDS && self.capacity_addressed()
    }

    /// True when any upload-derived field is present.
    pub fn has_upload_fields(&self) -> bool {
        is_filled(&self.location) || is_filled(&self.commodity) || is_filled(&self.budget)
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        let v = match field {
            ProfileField::Location => &self.location,
            ProfileField::Commodity => &self.commodity,
            ProfileField::Budget => &self.budget,
            ProfileField::Outcomes => &self.outcomes,
            ProfileField::Capacity => &self.capacity,
        };
        v.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Sidebar rows of the project profile, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Location,
    Commodity,
    Budget,
    Outcomes,
    Capacity,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::Location,
        ProfileField::Commodity,
        ProfileField::Budget,
        ProfileField::Outcomes,
        ProfileField::Capacity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Location => "Location",
            ProfileField::Commodity => "Commodity",
            ProfileField::Budget => "Budget",
            ProfileField::Outcomes => "Outcomes",
            ProfileField::Capacity => "Capacity (Optional)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the intake conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}
