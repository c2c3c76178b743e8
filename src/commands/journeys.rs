//! `journeys` command: the organization's journey list

use crate::commands::{json_outcome, print_json, settled, truncate, App};
use crate::error::Result;
use crate::model::Journey;
use crate::views::{JourneyListView, Route, ViewKind};

use prettytable::{cell, row, Table};

/// List journeys, optionally filtered by a search query
///
/// With `refresh` the cached list is dropped first, exactly like the
/// retry control on a failed list.
pub async fn list_journeys(app: &App, search: Option<&str>, refresh: bool) -> Result<()> {
    let session = app.session()?;
    let view = JourneyListView::new(app.cache.clone());

    tracing::info!("Listing journeys for organization {}", session.org_id);
    let state = if refresh {
        view.retry(&session).await
    } else {
        view.load(&session).await
    };

    let journeys = view.filtered(search);

    if app.json {
        print_json(&state.clone().map(|_| journeys.clone()))?;
        return json_outcome(&state);
    }

    if settled(&state)?.is_none() {
        return Ok(());
    }

    if journeys.is_empty() {
        match search {
            Some(query) => println!("No journeys match \"{}\".", query),
            None => println!("No journeys found for this organization."),
        }
        return Ok(());
    }

    output_journeys_table(&journeys);
    Ok(())
}

fn output_journeys_table(journeys: &[Journey]) {
    let mut table = Table::new();
    table.add_row(row!["Name", "Description", "Steps", "Updated", "Open"]);

    for journey in journeys {
        table.add_row(row![
            journey.name,
            truncate(&journey.description, 48),
            journey.tags.join(", "),
            journey.updated_at.format("%Y-%m-%d %H:%M"),
            Route::new(&journey.id, ViewKind::Flowchart)
        ]);
    }

    println!();
    table.printstd();
    println!("\n{} journeys\n", journeys.len());
}
