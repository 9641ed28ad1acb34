//! Pure transform from a page set to a structured, transport-ready page.

use super::page::clamp_page;
use super::record::{DisplayRecord, MAX_FIELDS_PER_PAGE, PageHeader, PageSet};

/// One embed field of a rendered page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A fully rendered page: closed field set, no open maps.
#[derive(Clone, Debug)]
pub struct RenderedPage {
    pub title: String,
    pub color: u32,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub fields: Vec<PageField>,
    pub footer: String,
}

/// Render one page of a set. Pure: no I/O, deterministic for snapshots.
///
/// The requested page is clamped into range and the field list is clamped to
/// the 25-field transport limit even if the configured page size exceeds it.
pub fn render(set: &PageSet, header: &PageHeader, page: usize) -> RenderedPage {
    let total = set.total_pages();
    let page = clamp_page(page, total);

    let fields = set
        .window(page)
        .iter()
        .take(MAX_FIELDS_PER_PAGE)
        .map(field_for)
        .collect();

    RenderedPage {
        title: header.title.clone(),
        color: header.color,
        description: header.description.clone(),
        thumbnail: header.thumbnail.clone(),
        fields,
        footer: format!("Page {page} of {total}"),
    }
}

fn field_for(record: &DisplayRecord) -> PageField {
    PageField {
        name: format!("{} {}", rank_marker(record.rank), record.primary),
        value: field_value(record),
        inline: false,
    }
}

/// Medal markers for the podium ranks, a plain number for the rest, and a
/// note for unranked (history) entries.
fn rank_marker(rank: Option<usize>) -> String {
    match rank {
        Some(1) => ":first_place:".to_owned(),
        Some(2) => ":second_place:".to_owned(),
        Some(3) => ":third_place:".to_owned(),
        Some(rank) => format!("{rank}."),
        None => ":musical_note:".to_owned(),
    }
}

fn field_value(record: &DisplayRecord) -> String {
    if let Some(played_at) = record.played_at {
        let when = format!("Played <t:{played_at}:R> (<t:{played_at}:f>)");
        return match &record.link {
            Some(link) => format!("{when} - [url]({link})"),
            None => when,
        };
    }

    match &record.link {
        Some(link) if record.secondary.is_empty() => format!("[page]({link})"),
        Some(link) => format!("[page]({link}) - {}", record.secondary),
        None => record.secondary.clone(),
    }
}
