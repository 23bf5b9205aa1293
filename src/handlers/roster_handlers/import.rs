use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::{csrf, session::set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::roster::{self, ImportError, ImportOutcome, PgRosterStore, RosterImporter};
use crate::templates_structs::{PageContext, RosterImportTemplate, RosterPreviewTemplate, RosterTable};

const PATH: &str = "/admin/planning";

#[derive(Deserialize)]
pub struct ImportForm {
    pub html: String,
    pub csrf_token: String,
    /// Checkbox acknowledging that an existing roster will be replaced.
    #[serde(default)]
    pub confirm_replace: Option<String>,
}

impl ImportForm {
    fn replace_confirmed(&self) -> bool {
        self.confirm_replace.is_some()
    }
}

/// Parse and validate `html`, and look up what an import would replace.
async fn build_preview(
    importer: &RosterImporter<PgRosterStore>,
    ctx: PageContext,
    html: String,
) -> Result<RosterPreviewTemplate, AppError> {
    let parsed = match roster::parse(&html) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Ok(RosterPreviewTemplate {
                ctx,
                html,
                parse_error: Some(e.to_string()),
                errors: vec![],
                roster: None,
                table: None,
                plan: None,
            });
        }
    };

    let report = roster::validate(&parsed);
    let plan = importer.plan(&parsed).await?;

    Ok(RosterPreviewTemplate {
        ctx,
        html,
        parse_error: None,
        errors: report.errors,
        table: Some(RosterTable::compact(&parsed.rows)),
        roster: Some(parsed),
        plan: Some(plan),
    })
}

/// GET /admin/planning/import
pub async fn form(
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(&session, &config.app_name, PATH)?;
    render(RosterImportTemplate { ctx, html: String::new() })
}

/// POST /admin/planning/import/preview
pub async fn preview(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<ImportForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let importer = super::importer(&pool);
    let ctx = PageContext::build(&session, &config.app_name, PATH)?;
    let tmpl = build_preview(&importer, ctx, form.into_inner().html).await?;
    render(tmpl)
}

/// POST /admin/planning/import
/// Imports the roster; asks for confirmation first when it would replace one.
pub async fn confirm(
    pool: web::Data<PgPool>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<ImportForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let importer = super::importer(&pool);
    let form = form.into_inner();
    let replace_confirmed = form.replace_confirmed();
    let ctx = PageContext::build(&session, &config.app_name, PATH)?;
    let mut tmpl = build_preview(&importer, ctx, form.html).await?;

    let Some(parsed) = tmpl.roster.clone() else {
        return render(tmpl);
    };
    if !tmpl.can_import() {
        return render(tmpl);
    }
    if tmpl.plan.as_ref().is_some_and(|p| p.will_replace()) && !replace_confirmed {
        tmpl.errors
            .push("A planning already exists for this month; tick the box to replace it.".to_string());
        return render(tmpl);
    }

    match importer.import(&parsed).await {
        Ok(outcome) => {
            let message = match &outcome {
                ImportOutcome::Created(_) => "Planning imported",
                ImportOutcome::Replaced { .. } => "Planning replaced",
            };
            set_flash(&session, message);
            Ok(HttpResponse::SeeOther()
                .insert_header(("Location", format!("{PATH}/{}", outcome.roster().id)))
                .finish())
        }
        Err(ImportError::Invalid(errors)) => {
            tmpl.errors = errors;
            render(tmpl)
        }
        Err(ImportError::Store(e)) => {
            log::error!("Roster import for {}/{} failed: {e}", parsed.month, parsed.year);
            tmpl.errors
                .push("The planning could not be saved. Please try again.".to_string());
            render(tmpl)
        }
    }
}
