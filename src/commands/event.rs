//! Single-event commands: documentation and session recordings

use crate::commands::{json_outcome, print_json, settled, App};
use crate::error::Result;
use crate::model::AnalyticsEvent;
use crate::replay::format_duration;
use crate::views::{EventDetailView, NavigationAdapter, RecordingPage, RecordingView};

use colored::Colorize;
use prettytable::{cell, row, Table};

/// Print documentation for the event selected by `nav`
pub async fn show_event(app: &App, nav: &dyn NavigationAdapter) -> Result<()> {
    let view = EventDetailView::new(app.service.clone());
    let state = view.load(nav).await;

    if app.json {
        print_json(&state)?;
        return json_outcome(&state);
    }

    if let Some(event) = settled(&state)? {
        output_event_detail(event);
    }
    Ok(())
}

/// Print the session recording attached to the event selected by `nav`
pub async fn show_recording(app: &App, nav: &dyn NavigationAdapter) -> Result<()> {
    let view = RecordingView::new(app.service.clone());
    let state = view.load(nav).await;

    if app.json {
        print_json(&state)?;
        return json_outcome(&state);
    }

    if let Some(page) = settled(&state)? {
        output_recording(page);
    }
    Ok(())
}

fn output_event_detail(event: &AnalyticsEvent) {
    println!("\n{}", event.display_name().bold());
    if let Some(status) = &event.status {
        println!("Status:      {}", status);
    }
    if !event.display_description().is_empty() {
        println!("Description: {}", event.display_description());
    }
    println!("Parameters:  {}", event.parameter_count());

    for group in &event.properties {
        println!("\n{}", group.display_name().underline());
        if group.properties.is_empty() {
            println!("  {}", "No parameters".dimmed());
            continue;
        }

        let mut table = Table::new();
        table.add_row(row!["Parameter", "Type", "Description", "Example"]);
        for param in &group.properties {
            table.add_row(row![
                param.name,
                param.kind.as_deref().unwrap_or_default(),
                param.description.as_deref().unwrap_or_default(),
                param.display_value()
            ]);
        }
        table.printstd();
    }
    println!();
}

fn output_recording(page: &RecordingPage) {
    let recording = &page.recording;
    println!("\nRecording {}", recording.id.bold());
    println!("Started:   {}", recording.start_time.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Duration:  {}\n", format_duration(recording.duration));

    if page.entries.is_empty() {
        println!("{}", "No events were captured in this recording.".dimmed());
        return;
    }

    let mut table = Table::new();
    table.add_row(row!["Offset", "Event", "Parameters"]);
    for entry in &page.entries {
        let parameters = serde_json::Value::Object(entry.parameters.clone()).to_string();
        table.add_row(row![entry.display_offset(), entry.event_id, parameters]);
    }
    table.printstd();
    println!();
}
