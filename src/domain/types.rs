//! Domain types for student records and predictions.
//!
//! The seven input fields are a fixed, closed schema: five categorical
//! attributes and two bounded integer scores. Each categorical field is a
//! Rust enum whose labels are exactly the training-time strings, so a record
//! can never reach the encoder with a misspelled or reordered column.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// Upper bound (inclusive) for reading/writing scores.
pub const SCORE_MAX: u8 = 100;

/// Default slider position for both numeric scores.
pub const SCORE_DEFAULT: u8 = 70;

/// Training-time column names, in training-time order.
///
/// `StudentRecord::fields` yields values in exactly this order; the encoder
/// addresses columns by these names. Keeping the list in one place is what
/// makes a name/order mismatch unrepresentable.
pub const FIELD_NAMES: [&str; 7] = [
    "gender",
    "race_ethnicity",
    "parental_level_of_education",
    "lunch",
    "test_preparation_course",
    "reading_score",
    "writing_score",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn display_name(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum RaceEthnicity {
    #[serde(rename = "group A")]
    #[value(name = "group A", alias = "a")]
    GroupA,
    #[serde(rename = "group B")]
    #[value(name = "group B", alias = "b")]
    GroupB,
    #[serde(rename = "group C")]
    #[value(name = "group C", alias = "c")]
    GroupC,
    #[serde(rename = "group D")]
    #[value(name = "group D", alias = "d")]
    GroupD,
    #[serde(rename = "group E")]
    #[value(name = "group E", alias = "e")]
    GroupE,
}

impl RaceEthnicity {
    pub const ALL: [RaceEthnicity; 5] = [
        RaceEthnicity::GroupA,
        RaceEthnicity::GroupB,
        RaceEthnicity::GroupC,
        RaceEthnicity::GroupD,
        RaceEthnicity::GroupE,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            RaceEthnicity::GroupA => "group A",
            RaceEthnicity::GroupB => "group B",
            RaceEthnicity::GroupC => "group C",
            RaceEthnicity::GroupD => "group D",
            RaceEthnicity::GroupE => "group E",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum ParentalEducation {
    #[serde(rename = "some high school")]
    #[value(name = "some high school")]
    SomeHighSchool,
    #[serde(rename = "high school")]
    #[value(name = "high school")]
    HighSchool,
    #[serde(rename = "some college")]
    #[value(name = "some college")]
    SomeCollege,
    #[serde(rename = "associate's degree")]
    #[value(name = "associate's degree")]
    AssociatesDegree,
    #[serde(rename = "bachelor's degree")]
    #[value(name = "bachelor's degree")]
    BachelorsDegree,
    #[serde(rename = "master's degree")]
    #[value(name = "master's degree")]
    MastersDegree,
}

impl ParentalEducation {
    pub const ALL: [ParentalEducation; 6] = [
        ParentalEducation::SomeHighSchool,
        ParentalEducation::HighSchool,
        ParentalEducation::SomeCollege,
        ParentalEducation::AssociatesDegree,
        ParentalEducation::BachelorsDegree,
        ParentalEducation::MastersDegree,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ParentalEducation::SomeHighSchool => "some high school",
            ParentalEducation::HighSchool => "high school",
            ParentalEducation::SomeCollege => "some college",
            ParentalEducation::AssociatesDegree => "associate's degree",
            ParentalEducation::BachelorsDegree => "bachelor's degree",
            ParentalEducation::MastersDegree => "master's degree",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum Lunch {
    #[serde(rename = "standard")]
    #[value(name = "standard")]
    Standard,
    #[serde(rename = "free/reduced")]
    #[value(name = "free/reduced")]
    FreeReduced,
}

impl Lunch {
    pub const ALL: [Lunch; 2] = [Lunch::Standard, Lunch::FreeReduced];

    pub fn display_name(self) -> &'static str {
        match self {
            Lunch::Standard => "standard",
            Lunch::FreeReduced => "free/reduced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TestPrep {
    None,
    Completed,
}

impl TestPrep {
    pub const ALL: [TestPrep; 2] = [TestPrep::None, TestPrep::Completed];

    pub fn display_name(self) -> &'static str {
        match self {
            TestPrep::None => "none",
            TestPrep::Completed => "completed",
        }
    }
}

/// Parse a training-time label into its enum variant.
///
/// Matching is trim + case-insensitive so CSV exports with stray whitespace
/// or capitalized labels still ingest cleanly.
pub fn parse_label<T: Copy>(all: &[T], label: &str, display: impl Fn(T) -> &'static str) -> Option<T> {
    let wanted = label.trim();
    all.iter()
        .copied()
        .find(|&v| display(v).eq_ignore_ascii_case(wanted))
}

/// One validated form submission: the seven student attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StudentRecord {
    pub gender: Gender,
    pub race_ethnicity: RaceEthnicity,
    pub parental_level_of_education: ParentalEducation,
    pub lunch: Lunch,
    pub test_preparation_course: TestPrep,
    pub reading_score: u8,
    pub writing_score: u8,
}

/// A single field value as seen by the encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Label(&'static str),
    Score(f64),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Label(s) => write!(f, "{s}"),
            FieldValue::Score(v) => write!(f, "{v:.0}"),
        }
    }
}

impl StudentRecord {
    /// Build a record, validating the numeric scores against their domain.
    pub fn new(
        gender: Gender,
        race_ethnicity: RaceEthnicity,
        parental_level_of_education: ParentalEducation,
        lunch: Lunch,
        test_preparation_course: TestPrep,
        reading_score: u8,
        writing_score: u8,
    ) -> Result<Self, String> {
        if reading_score > SCORE_MAX {
            return Err(format!(
                "Invalid `reading_score` {reading_score} (must be 0..={SCORE_MAX})."
            ));
        }
        if writing_score > SCORE_MAX {
            return Err(format!(
                "Invalid `writing_score` {writing_score} (must be 0..={SCORE_MAX})."
            ));
        }
        Ok(Self {
            gender,
            race_ethnicity,
            parental_level_of_education,
            lunch,
            test_preparation_course,
            reading_score,
            writing_score,
        })
    }

    /// The record as `(column, value)` pairs in training-time order.
    ///
    /// This is the only way values leave the record, so the encoder always
    /// sees the fixed column list of `FIELD_NAMES`.
    pub fn fields(&self) -> [(&'static str, FieldValue); 7] {
        [
            (FIELD_NAMES[0], FieldValue::Label(self.gender.display_name())),
            (
                FIELD_NAMES[1],
                FieldValue::Label(self.race_ethnicity.display_name()),
            ),
            (
                FIELD_NAMES[2],
                FieldValue::Label(self.parental_level_of_education.display_name()),
            ),
            (FIELD_NAMES[3], FieldValue::Label(self.lunch.display_name())),
            (
                FIELD_NAMES[4],
                FieldValue::Label(self.test_preparation_course.display_name()),
            ),
            (FIELD_NAMES[5], FieldValue::Score(f64::from(self.reading_score))),
            (FIELD_NAMES[6], FieldValue::Score(f64::from(self.writing_score))),
        ]
    }

    /// Look up a single field by its training-time column name.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, v)| v)
    }
}

impl Default for StudentRecord {
    /// The form's initial state: first option of each selector, both sliders
    /// at 70.
    fn default() -> Self {
        Self {
            gender: Gender::Female,
            race_ethnicity: RaceEthnicity::GroupA,
            parental_level_of_education: ParentalEducation::SomeHighSchool,
            lunch: Lunch::Standard,
            test_preparation_course: TestPrep::None,
            reading_score: SCORE_DEFAULT,
            writing_score: SCORE_DEFAULT,
        }
    }
}

/// Contribution of one encoded feature to the final score.
#[derive(Debug, Clone, Serialize)]
pub struct Contribution {
    /// Encoded feature label, e.g. `lunch=standard` or `reading_score`.
    pub feature: String,
    /// Encoded value the model saw (0/1 for one-hot slots, z-score for numerics).
    pub value: f64,
    /// Model coefficient for this slot.
    pub weight: f64,
    /// `value * weight`.
    pub contribution: f64,
}

/// Output of one gateway invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Predicted math score.
    pub score: f64,
    /// Intercept of the fitted model (baseline before contributions).
    pub intercept: f64,
    /// Per-feature contributions, in encoded-slot order.
    pub contributions: Vec<Contribution>,
}

impl Prediction {
    /// The score as shown to the user: two decimal places.
    pub fn display_score(&self) -> String {
        format!("{:.2}", self.score)
    }
}

/// One batch row together with its predicted score.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    /// 1-based CSV line the record came from.
    pub line: usize,
    pub record: StudentRecord,
    pub score: f64,
}

/// Where the two artifacts live.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub encoder: PathBuf,
    pub model: PathBuf,
}

impl Default for ArtifactPaths {
    /// Co-located defaults, next to the application's own files.
    fn default() -> Self {
        Self {
            encoder: PathBuf::from("assets/encoder.json"),
            model: PathBuf::from("assets/model.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_rejects_out_of_range_scores() {
        let err = StudentRecord::new(
            Gender::Female,
            RaceEthnicity::GroupA,
            ParentalEducation::HighSchool,
            Lunch::Standard,
            TestPrep::None,
            101,
            70,
        )
        .unwrap_err();
        assert!(err.contains("reading_score"));
    }

    #[test]
    fn fields_follow_training_time_order() {
        let record = StudentRecord::default();
        let names: Vec<&str> = record.fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, FIELD_NAMES);
    }

    #[test]
    fn field_lookup_matches_fields() {
        let record = StudentRecord::default();
        assert_eq!(
            record.field("lunch"),
            Some(FieldValue::Label("standard"))
        );
        assert_eq!(record.field("reading_score"), Some(FieldValue::Score(70.0)));
        assert_eq!(record.field("math_score"), None);
    }

    #[test]
    fn labels_parse_back_to_variants() {
        let v = parse_label(&ParentalEducation::ALL, "  Bachelor's Degree ", |v| {
            v.display_name()
        });
        assert_eq!(v, Some(ParentalEducation::BachelorsDegree));
        assert_eq!(
            parse_label(&Lunch::ALL, "free/reduced", |v| v.display_name()),
            Some(Lunch::FreeReduced)
        );
        assert_eq!(
            parse_label(&Gender::ALL, "other", |v| v.display_name()),
            None
        );
    }

    #[test]
    fn display_score_renders_two_decimals() {
        let p = Prediction {
            score: 66.4871,
            intercept: 66.0,
            contributions: Vec::new(),
        };
        assert_eq!(p.display_score(), "66.49");
    }
}
