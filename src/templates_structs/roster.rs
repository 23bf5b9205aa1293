use askama::Template;

use super::PageContext;
use crate::models::roster::{ImportPlan, ParsedRoster, RosterField, RosterRow, RosterSummary};

/// A roster row flattened for display: one value per visible column.
pub struct RowView {
    pub index: usize,
    pub values: Vec<CellView>,
}

pub struct CellView {
    pub name: &'static str,
    pub value: String,
}

/// Header labels plus rows, ready for a `<table>`.
pub struct RosterTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<RowView>,
}

impl RosterTable {
    /// All ten columns, for edit forms.
    pub fn full(rows: &[RosterRow]) -> Self {
        Self::with_fields(rows, Self::all_fields())
    }

    /// Date plus the role columns that have at least one assignment.
    pub fn compact(rows: &[RosterRow]) -> Self {
        let fields = Self::all_fields()
            .into_iter()
            .filter(|f| *f == RosterField::Date || rows.iter().any(|r| !r.get(*f).is_empty()))
            .collect();
        Self::with_fields(rows, fields)
    }

    fn all_fields() -> Vec<RosterField> {
        std::iter::once(RosterField::Date)
            .chain(RosterField::ROLES)
            .collect()
    }

    fn with_fields(rows: &[RosterRow], fields: Vec<RosterField>) -> Self {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(index, row)| RowView {
                index,
                values: fields
                    .iter()
                    .map(|f| CellView {
                        name: f.as_str(),
                        value: row.get(*f).to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            headers: fields.iter().map(|f| f.label()).collect(),
            rows,
        }
    }
}

#[derive(Template)]
#[template(path = "planning/list.html")]
pub struct RosterListTemplate {
    pub ctx: PageContext,
    pub rosters: Vec<RosterSummary>,
}

#[derive(Template)]
#[template(path = "planning/import.html")]
pub struct RosterImportTemplate {
    pub ctx: PageContext,
    pub html: String,
}

/// Parse/validate result shown before staff confirm an import.
#[derive(Template)]
#[template(path = "planning/preview.html")]
pub struct RosterPreviewTemplate {
    pub ctx: PageContext,
    pub html: String,
    pub parse_error: Option<String>,
    pub errors: Vec<String>,
    pub roster: Option<ParsedRoster>,
    pub table: Option<RosterTable>,
    pub plan: Option<ImportPlan>,
}

impl RosterPreviewTemplate {
    pub fn can_import(&self) -> bool {
        self.parse_error.is_none() && self.errors.is_empty() && self.roster.is_some()
    }
}

#[derive(Template)]
#[template(path = "planning/detail.html")]
pub struct RosterDetailTemplate {
    pub ctx: PageContext,
    pub id: i64,
    pub title: String,
    pub period: String,
    pub is_published: bool,
    pub table: RosterTable,
}

#[derive(Template)]
#[template(path = "planning/public.html")]
pub struct PublicRosterTemplate {
    pub app_name: String,
    pub title: Option<String>,
    pub period: String,
    pub table: Option<RosterTable>,
    pub others: Vec<RosterSummary>,
}
