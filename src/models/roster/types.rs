use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical columns of a monthly service roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterField {
    Date,
    Presidence,
    Musique,
    Predicateur,
    Enfants,
    Accueil,
    Projection,
    Diffusion,
    Menage,
    Observations,
}

impl RosterField {
    /// The nine assignment columns, in display order.
    pub const ROLES: [RosterField; 9] = [
        RosterField::Presidence,
        RosterField::Musique,
        RosterField::Predicateur,
        RosterField::Enfants,
        RosterField::Accueil,
        RosterField::Projection,
        RosterField::Diffusion,
        RosterField::Menage,
        RosterField::Observations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RosterField::Date => "date",
            RosterField::Presidence => "presidence",
            RosterField::Musique => "musique",
            RosterField::Predicateur => "predicateur",
            RosterField::Enfants => "enfants",
            RosterField::Accueil => "accueil",
            RosterField::Projection => "projection",
            RosterField::Diffusion => "diffusion",
            RosterField::Menage => "menage",
            RosterField::Observations => "observations",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RosterField::Date => "Date",
            RosterField::Presidence => "Présidence",
            RosterField::Musique => "Musique",
            RosterField::Predicateur => "Prédicateur",
            RosterField::Enfants => "Enfants",
            RosterField::Accueil => "Accueil",
            RosterField::Projection => "Projection",
            RosterField::Diffusion => "Diffusion",
            RosterField::Menage => "Ménage",
            RosterField::Observations => "Observations",
        }
    }
}

/// One date of the roster with its role assignments. `None` means unassigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub date: String,
    #[serde(default)]
    pub presidence: Option<String>,
    #[serde(default)]
    pub musique: Option<String>,
    #[serde(default)]
    pub predicateur: Option<String>,
    #[serde(default)]
    pub enfants: Option<String>,
    #[serde(default)]
    pub accueil: Option<String>,
    #[serde(default)]
    pub projection: Option<String>,
    #[serde(default)]
    pub diffusion: Option<String>,
    #[serde(default)]
    pub menage: Option<String>,
    #[serde(default)]
    pub observations: Option<String>,
}

impl RosterRow {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Self::default()
        }
    }

    /// Assign a value to a field. Blank values clear role fields.
    pub fn set(&mut self, field: RosterField, value: &str) {
        let value = value.trim();
        if field == RosterField::Date {
            self.date = value.to_string();
            return;
        }
        if let Some(slot) = self.role_slot_mut(field) {
            *slot = if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            };
        }
    }

    /// Value of a field, empty string when unassigned.
    pub fn get(&self, field: RosterField) -> &str {
        match field {
            RosterField::Date => &self.date,
            RosterField::Presidence => self.presidence.as_deref().unwrap_or(""),
            RosterField::Musique => self.musique.as_deref().unwrap_or(""),
            RosterField::Predicateur => self.predicateur.as_deref().unwrap_or(""),
            RosterField::Enfants => self.enfants.as_deref().unwrap_or(""),
            RosterField::Accueil => self.accueil.as_deref().unwrap_or(""),
            RosterField::Projection => self.projection.as_deref().unwrap_or(""),
            RosterField::Diffusion => self.diffusion.as_deref().unwrap_or(""),
            RosterField::Menage => self.menage.as_deref().unwrap_or(""),
            RosterField::Observations => self.observations.as_deref().unwrap_or(""),
        }
    }

    fn role_slot_mut(&mut self, field: RosterField) -> Option<&mut Option<String>> {
        let slot = match field {
            RosterField::Presidence => &mut self.presidence,
            RosterField::Musique => &mut self.musique,
            RosterField::Predicateur => &mut self.predicateur,
            RosterField::Enfants => &mut self.enfants,
            RosterField::Accueil => &mut self.accueil,
            RosterField::Projection => &mut self.projection,
            RosterField::Diffusion => &mut self.diffusion,
            RosterField::Menage => &mut self.menage,
            RosterField::Observations => &mut self.observations,
            RosterField::Date => return None,
        };
        Some(slot)
    }
}

/// Result of parsing a pasted roster, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRoster {
    pub title: String,
    pub month: u32,
    pub year: i32,
    pub rows: Vec<RosterRow>,
}

impl ParsedRoster {
    pub fn period(&self) -> String {
        period_label(self.month, self.year)
    }
}

/// Insert payload for a roster record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoster {
    pub title: String,
    pub month: u32,
    pub year: i32,
    pub rows: Vec<RosterRow>,
    pub is_active: bool,
    pub is_published: bool,
}

impl From<&ParsedRoster> for NewRoster {
    fn from(parsed: &ParsedRoster) -> Self {
        Self {
            title: parsed.title.clone(),
            month: parsed.month,
            year: parsed.year,
            rows: parsed.rows.clone(),
            is_active: true,
            is_published: false,
        }
    }
}

/// A persisted roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    pub id: i64,
    pub title: String,
    pub month: u32,
    pub year: i32,
    pub rows: Vec<RosterRow>,
    pub is_active: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Roster {
    pub fn summary(&self) -> RosterSummary {
        RosterSummary {
            id: self.id,
            title: self.title.clone(),
            month: self.month,
            year: self.year,
            row_count: self.rows.len(),
            is_published: self.is_published,
            updated_at: self.updated_at,
        }
    }

    pub fn period(&self) -> String {
        period_label(self.month, self.year)
    }
}

/// Roster as shown in list views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSummary {
    pub id: i64,
    pub title: String,
    pub month: u32,
    pub year: i32,
    pub row_count: usize,
    pub is_published: bool,
    pub updated_at: DateTime<Utc>,
}

impl RosterSummary {
    pub fn period(&self) -> String {
        period_label(self.month, self.year)
    }
}

/// Form input for editing a single roster row.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterRowForm {
    pub date: String,
    #[serde(default)]
    pub presidence: String,
    #[serde(default)]
    pub musique: String,
    #[serde(default)]
    pub predicateur: String,
    #[serde(default)]
    pub enfants: String,
    #[serde(default)]
    pub accueil: String,
    #[serde(default)]
    pub projection: String,
    #[serde(default)]
    pub diffusion: String,
    #[serde(default)]
    pub menage: String,
    #[serde(default)]
    pub observations: String,
    pub csrf_token: String,
}

impl RosterRowForm {
    pub fn to_row(&self) -> RosterRow {
        let mut row = RosterRow::new(self.date.trim());
        for (field, value) in [
            (RosterField::Presidence, &self.presidence),
            (RosterField::Musique, &self.musique),
            (RosterField::Predicateur, &self.predicateur),
            (RosterField::Enfants, &self.enfants),
            (RosterField::Accueil, &self.accueil),
            (RosterField::Projection, &self.projection),
            (RosterField::Diffusion, &self.diffusion),
            (RosterField::Menage, &self.menage),
            (RosterField::Observations, &self.observations),
        ] {
            row.set(field, value);
        }
        row
    }
}

/// French month name for 1..=12, used in titles and list views.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Janvier",
        2 => "Février",
        3 => "Mars",
        4 => "Avril",
        5 => "Mai",
        6 => "Juin",
        7 => "Juillet",
        8 => "Août",
        9 => "Septembre",
        10 => "Octobre",
        11 => "Novembre",
        12 => "Décembre",
        _ => "?",
    }
}

/// "Mars 2024"
pub fn period_label(month: u32, year: i32) -> String {
    format!("{} {}", month_name(month), year)
}
