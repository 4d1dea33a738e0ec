use serde::{Deserialize, Serialize};
use std::fmt;

/// Matura subjects the engine knows how to score.
///
/// Codes are the ones used by catalog authors (`MAT`, `J.OBC`, ...). Every
/// accepted alias maps onto exactly one variant, so an unknown code is a
/// load-time error instead of a silent zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Subject {
    Mathematics,
    Polish,
    ForeignLanguage,
    Physics,
    Chemistry,
    Biology,
    ComputerScience,
    Geography,
    History,
    SocialStudies,
    Philosophy,
}

type SubjectEntry = (Subject, &'static [&'static str], &'static str, &'static [&'static str]);

const SUBJECT_TABLE: [SubjectEntry; 11] = [
    (Subject::Mathematics, &["MAT"], "matematyka", &["matematyka", "mat"]),
    (
        Subject::Polish,
        &["POL", "J.POL"],
        "język polski",
        &["język polski", "j.polski", "polski", "pol", "jp"],
    ),
    (
        Subject::ForeignLanguage,
        &["J.OBC", "ANG", "JO"],
        "język obcy",
        &[
            "język obcy",
            "język angielski",
            "angielski",
            "obcy",
            "ang",
            "jo",
        ],
    ),
    (Subject::Physics, &["FIZ"], "fizyka", &["fizyka", "fiz"]),
    (Subject::Chemistry, &["CHEM", "CHE"], "chemia", &["chemia", "chem"]),
    (Subject::Biology, &["BIO"], "biologia", &["biologia", "bio"]),
    (
        Subject::ComputerScience,
        &["INF"],
        "informatyka",
        &["informatyka", "inf", "it"],
    ),
    (Subject::Geography, &["GEO"], "geografia", &["geografia", "geog", "geo"]),
    (Subject::History, &["HIS", "HIST"], "historia", &["historia", "hist", "his"]),
    (
        Subject::SocialStudies,
        &["WOS"],
        "WOS",
        &["wiedza o społeczeństwie", "wos"],
    ),
    (Subject::Philosophy, &["FIL", "FILO"], "filozofia", &["filozofia", "fil"]),
];

impl Subject {
    pub const ALL: [Subject; 11] = [
        Subject::Mathematics,
        Subject::Polish,
        Subject::ForeignLanguage,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::ComputerScience,
        Subject::Geography,
        Subject::History,
        Subject::SocialStudies,
        Subject::Philosophy,
    ];

    /// Canonical catalog code.
    pub fn code(self) -> &'static str {
        Self::entry(self).1[0]
    }

    /// Polish name used in human-readable formula descriptions.
    pub fn display_name(self) -> &'static str {
        Self::entry(self).2
    }

    pub fn from_code(code: &str) -> Option<Subject> {
        let normalized = code.trim().to_uppercase();
        SUBJECT_TABLE
            .iter()
            .find(|(_, codes, _, _)| codes.contains(&normalized.as_str()))
            .map(|(subject, _, _, _)| *subject)
    }

    /// Resolves a written subject name ("matematyka", "język obcy", "fiz").
    pub fn from_name(name: &str) -> Option<Subject> {
        let normalized = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        SUBJECT_TABLE
            .iter()
            .find(|(_, _, _, names)| names.contains(&normalized.as_str()))
            .map(|(subject, _, _, _)| *subject)
            .or_else(|| Subject::from_code(&normalized))
    }

    fn entry(self) -> &'static SubjectEntry {
        let index = Self::ALL
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or(0);
        &SUBJECT_TABLE[index]
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for Subject {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Subject::from_code(&value).ok_or_else(|| format!("unknown subject code: {value}"))
    }
}

impl From<Subject> for String {
    fn from(value: Subject) -> Self {
        value.code().to_string()
    }
}

/// Subject reference carried by an exam component.
///
/// Group markers (`GROUP1`, `ADDITIONAL`) name a slot whose value is filled in
/// by an operation over the per-alternative components; they score zero on
/// their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SubjectCode {
    Subject(Subject),
    Group(String),
}

impl SubjectCode {
    pub fn subject(&self) -> Option<Subject> {
        match self {
            SubjectCode::Subject(subject) => Some(*subject),
            SubjectCode::Group(_) => None,
        }
    }

    fn is_group_marker(code: &str) -> bool {
        let upper = code.trim().to_uppercase();
        upper.starts_with("GROUP") || upper.starts_with("ADDITIONAL")
    }
}

impl From<Subject> for SubjectCode {
    fn from(value: Subject) -> Self {
        SubjectCode::Subject(value)
    }
}

impl TryFrom<String> for SubjectCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if let Some(subject) = Subject::from_code(&value) {
            return Ok(SubjectCode::Subject(subject));
        }
        if Self::is_group_marker(&value) {
            return Ok(SubjectCode::Group(value.trim().to_string()));
        }
        Err(format!(
            "unknown subject code: {value} (group markers must start with GROUP or ADDITIONAL)"
        ))
    }
}

impl From<SubjectCode> for String {
    fn from(value: SubjectCode) -> Self {
        match value {
            SubjectCode::Subject(subject) => subject.code().to_string(),
            SubjectCode::Group(marker) => marker,
        }
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectCode::Subject(subject) => write!(f, "{subject}"),
            SubjectCode::Group(marker) => f.write_str(marker),
        }
    }
}

/// Level a candidate sat an exam at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaturaLevel {
    #[serde(rename = "P")]
    Basic,
    #[serde(rename = "R")]
    Extended,
}

impl MaturaLevel {
    pub fn code(self) -> &'static str {
        match self {
            MaturaLevel::Basic => "P",
            MaturaLevel::Extended => "R",
        }
    }
}

/// Level declared on an exam component: `P`, `R`, or a free marker such as
/// `mixed` that defers to the candidate's extended result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentLevel {
    Basic,
    #[default]
    Extended,
    Marker(String),
}

impl ComponentLevel {
    /// Level whose result is looked up: only `P` selects the basic level.
    pub fn lookup_level(&self) -> MaturaLevel {
        match self {
            ComponentLevel::Basic => MaturaLevel::Basic,
            ComponentLevel::Extended | ComponentLevel::Marker(_) => MaturaLevel::Extended,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ComponentLevel::Basic => "P",
            ComponentLevel::Extended => "R",
            ComponentLevel::Marker(marker) => marker,
        }
    }
}

impl From<MaturaLevel> for ComponentLevel {
    fn from(value: MaturaLevel) -> Self {
        match value {
            MaturaLevel::Basic => ComponentLevel::Basic,
            MaturaLevel::Extended => ComponentLevel::Extended,
        }
    }
}

impl From<String> for ComponentLevel {
    fn from(value: String) -> Self {
        match value.trim() {
            "P" => ComponentLevel::Basic,
            "R" => ComponentLevel::Extended,
            other => ComponentLevel::Marker(other.to_string()),
        }
    }
}

impl From<ComponentLevel> for String {
    fn from(value: ComponentLevel) -> Self {
        value.code().to_string()
    }
}
