//! Roster parser tests: heading and period extraction, header synonyms,
//! row mapping and every parse failure.

mod common;

use chapelle::models::roster::{ParseError, RosterField, RosterRow, parse};
use common::{march_2024_html, roster_html};

#[test]
fn test_parse_march_2024() {
    let roster = parse(&march_2024_html()).expect("parse failed");

    assert_eq!(roster.title, "Planning Mars 2024");
    assert_eq!(roster.month, 3);
    assert_eq!(roster.year, 2024);
    assert_eq!(roster.rows.len(), 4);

    let first = &roster.rows[0];
    assert_eq!(first.date, "3 mars");
    assert_eq!(first.presidence.as_deref(), Some("Jean"));
    assert_eq!(first.predicateur.as_deref(), Some("Paul"));
    assert_eq!(first.musique.as_deref(), Some("Marie"));
    assert_eq!(first.enfants, None);

    // Empty cell means unassigned
    assert_eq!(roster.rows[1].musique, None);
    assert_eq!(roster.rows[3].predicateur.as_deref(), Some("Étienne"));
}

#[test]
fn test_parse_two_rows_one_without_date() {
    let html = roster_html(
        "Planning Mars 2024",
        &["Date", "Présidence", "Prédicateur"],
        &[vec!["3 mars", "Jean", "Paul"], vec!["", "", "Marc"]],
    );

    let roster = parse(&html).expect("parse failed");
    assert_eq!(roster.title, "Planning Mars 2024");
    assert_eq!(roster.month, 3);
    assert_eq!(roster.year, 2024);

    let mut expected = RosterRow::new("3 mars");
    expected.presidence = Some("Jean".to_string());
    expected.predicateur = Some("Paul".to_string());
    assert_eq!(roster.rows, vec![expected]);
}

#[test]
fn test_month_heading_case_variants() {
    for title in ["MARS 2024", "mars 2024", "Mars 2024"] {
        let html = roster_html(title, &["Date"], &[vec!["3 mars"]]);
        let roster = parse(&html).unwrap_or_else(|e| panic!("{title}: {e}"));
        assert_eq!((roster.month, roster.year), (3, 2024), "{title}");
    }
}

#[test]
fn test_jour_in_header_claims_date_column() {
    let html = roster_html(
        "Mars 2024",
        &["Date", "Présidence du jour"],
        &[vec!["3 mars", "Jean"]],
    );

    // "Date" already holds the date field, so the second column is ignored
    let roster = parse(&html).expect("parse failed");
    assert_eq!(roster.rows[0].date, "3 mars");
    assert_eq!(roster.rows[0].presidence, None);
}

#[test]
fn test_row_count_and_order_are_preserved() {
    let rows: Vec<Vec<String>> = (1..=31)
        .map(|d| vec![format!("{d} janvier"), format!("P{d}")])
        .collect();
    let rows: Vec<Vec<&str>> = rows
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    let html = roster_html("Janvier 2025", &["Jour", "Présidence"], &rows);

    let roster = parse(&html).expect("parse failed");
    assert_eq!(roster.rows.len(), 31);
    for (i, row) in roster.rows.iter().enumerate() {
        assert_eq!(row.date, format!("{} janvier", i + 1));
        assert_eq!(row.presidence.as_deref(), Some(format!("P{}", i + 1).as_str()));
    }
}

#[test]
fn test_rows_without_date_are_dropped() {
    let html = roster_html(
        "Avril 2024",
        &["Date", "Accueil"],
        &[
            vec!["7 avril", "Sophie"],
            vec!["", "Personne"],
            vec!["   ", "Encore"],
            vec!["14 avril", "Luc"],
        ],
    );

    let roster = parse(&html).expect("parse failed");
    let dates: Vec<&str> = roster.rows.iter().map(|r| r.date.as_str()).collect();
    assert_eq!(dates, vec!["7 avril", "14 avril"]);
    assert!(roster.rows.iter().all(|r| !r.date.is_empty()));
}

#[test]
fn test_month_is_case_and_accent_insensitive() {
    for (title, month) in [
        ("PLANNING FÉVRIER 2024", 2),
        ("planning fevrier 2024", 2),
        ("Planning août 2024", 8),
        ("Planning AOUT 2024", 8),
        ("Programme de Décembre 2024", 12),
    ] {
        let html = roster_html(title, &["Date"], &[vec!["1"]]);
        let roster = parse(&html).unwrap_or_else(|e| panic!("{title}: {e}"));
        assert_eq!(roster.month, month, "{title}");
    }
}

#[test]
fn test_unknown_headers_are_ignored() {
    let html = roster_html(
        "Mai 2024",
        &["Date", "Sonorisation", "Accueil"],
        &[vec!["5 mai", "Bernard", "Claire"]],
    );

    let roster = parse(&html).expect("parse failed");
    let row = &roster.rows[0];
    assert_eq!(row.accueil.as_deref(), Some("Claire"));
    for field in RosterField::ROLES {
        if field != RosterField::Accueil {
            assert_eq!(row.get(field), "", "{field:?} should be empty");
        }
    }
}

#[test]
fn test_header_synonyms_map_every_role() {
    let html = roster_html(
        "Juin 2024",
        &[
            "Jour",
            "Présidence du culte",
            "Louange",
            "Message",
            "École du dimanche",
            "Accueil",
            "Vidéo",
            "Streaming",
            "Nettoyage",
            "Remarques",
        ],
        &[vec!["2 juin", "A", "B", "C", "D", "E", "F", "G", "H", "I"]],
    );

    let roster = parse(&html).expect("parse failed");
    let row = &roster.rows[0];
    assert_eq!(row.date, "2 juin");
    assert_eq!(row.presidence.as_deref(), Some("A"));
    assert_eq!(row.musique.as_deref(), Some("B"));
    assert_eq!(row.predicateur.as_deref(), Some("C"));
    assert_eq!(row.enfants.as_deref(), Some("D"));
    assert_eq!(row.accueil.as_deref(), Some("E"));
    assert_eq!(row.projection.as_deref(), Some("F"));
    assert_eq!(row.diffusion.as_deref(), Some("G"));
    assert_eq!(row.menage.as_deref(), Some("H"));
    assert_eq!(row.observations.as_deref(), Some("I"));
}

#[test]
fn test_first_column_wins_for_duplicate_fields() {
    let html = roster_html(
        "Juillet 2024",
        &["Date", "Musique", "Chants"],
        &[vec!["7 juillet", "Orgue", "Chorale"]],
    );

    let roster = parse(&html).expect("parse failed");
    assert_eq!(roster.rows[0].musique.as_deref(), Some("Orgue"));
}

#[test]
fn test_cell_whitespace_is_collapsed() {
    let html = "<h1>Septembre 2024</h1><table>\
        <tr><th> Date </th><th>Accueil</th></tr>\
        <tr><td>\n  1er   septembre </td><td> <b>Jean</b>  et  Marie </td></tr>\
        </table>";

    let roster = parse(html).expect("parse failed");
    assert_eq!(roster.rows[0].date, "1er septembre");
    assert_eq!(roster.rows[0].accueil.as_deref(), Some("Jean et Marie"));
}

#[test]
fn test_missing_heading() {
    let html = "<p>Planning Mars 2024</p><table><tr><th>Date</th></tr></table>";
    assert_eq!(parse(html), Err(ParseError::HeadingNotFound));
}

#[test]
fn test_missing_month() {
    let html = roster_html("Planning 2024", &["Date"], &[vec!["1"]]);
    assert_eq!(parse(&html), Err(ParseError::MonthNotFound));
}

#[test]
fn test_missing_year() {
    let html = roster_html("Planning Mars", &["Date"], &[vec!["1"]]);
    assert_eq!(parse(&html), Err(ParseError::YearNotFound));
}

#[test]
fn test_missing_table() {
    let html = "<h2>Planning Mars 2024</h2><p>Pas encore prêt</p>";
    assert_eq!(parse(html), Err(ParseError::TableNotFound));
}

#[test]
fn test_missing_date_column() {
    let html = roster_html("Mars 2024", &["Présidence", "Musique"], &[vec!["Jean", "Marie"]]);
    assert!(matches!(parse(&html), Err(ParseError::HeaderMapping(_))));
}

#[test]
fn test_header_only_table_has_no_rows() {
    let html = roster_html("Mars 2024", &["Date", "Accueil"], &[]);
    let roster = parse(&html).expect("parse failed");
    assert!(roster.rows.is_empty());
}

#[test]
fn test_error_messages() {
    assert_eq!(ParseError::HeadingNotFound.to_string(), "heading not found");
    assert_eq!(ParseError::TableNotFound.to_string(), "table not found");
}
