//! Per-journey commands: flowchart, docs, replay and navigation
//!
//! In table mode each view is printed under the journey header (name plus
//! previous/next links). The header and the view load concurrently and both
//! read journeys through the shared index cache.

use crate::commands::{json_outcome, print_json, settled, truncate, App};
use crate::error::Result;
use crate::highlight::HighlightOutcome;
use crate::model::{AnalyticsEvent, JourneyStep};
use crate::replay::{format_clock, ReplayTimeline};
use crate::views::flowchart::Flowchart;
use crate::views::navigation::{self, NavigationAdapter};
use crate::views::{
    DocsPage, DocsView, FlowchartView, JourneyNav, JourneyNavView, NavControl, ReplayView,
    ViewKind, ViewState,
};

use colored::Colorize;
use prettytable::{cell, row, Table};

/// Print the flowchart of the journey named by `nav`
pub async fn show_flowchart(app: &App, nav: &dyn NavigationAdapter) -> Result<()> {
    let view = FlowchartView::new(app.service.clone());

    if app.json {
        let state = view.load(nav).await;
        print_json(&state)?;
        return json_outcome(&state);
    }

    let (state, header) = tokio::join!(view.load(nav), load_header(app, nav, ViewKind::Flowchart));
    print_header(&header);

    if let Some(chart) = settled(&state)? {
        output_flowchart(chart);
    }
    Ok(())
}

/// Print the documentation of the journey named by `nav`
pub async fn show_docs(app: &App, nav: &dyn NavigationAdapter, search: Option<&str>) -> Result<()> {
    let view = DocsView::new(app.service.clone());

    if app.json {
        let state = view.load(nav).await;
        print_json(&state)?;
        return json_outcome(&state);
    }

    let (state, header) = tokio::join!(view.load(nav), load_header(app, nav, ViewKind::Docs));
    print_header(&header);

    if let Some(page) = settled(&state)? {
        output_docs(page, search);
    }
    Ok(())
}

/// Print the replay timeline of the journey named by `nav`
pub async fn show_replay(app: &App, nav: &dyn NavigationAdapter) -> Result<()> {
    let view = ReplayView::new(app.service.clone());

    if app.json {
        let state = view.load(nav).await;
        print_json(&state)?;
        return json_outcome(&state);
    }

    let (state, header) = tokio::join!(view.load(nav), load_header(app, nav, ViewKind::Replay));
    print_header(&header);

    if let Some(timeline) = settled(&state)? {
        output_timeline(timeline);
    }
    Ok(())
}

/// Print previous/next navigation and view tabs for a journey
pub async fn show_nav(app: &App, journey_id: &str) -> Result<()> {
    let session = app.session()?;
    let view = JourneyNavView::new(app.cache.clone());
    let state = view.load(&session, journey_id, ViewKind::Flowchart).await;

    if app.json {
        print_json(&state)?;
        return json_outcome(&state);
    }

    if let Some(nav) = settled(&state)? {
        print_header(&ViewState::Ready(nav.clone()));
        println!("Views:");
        for tab in &nav.tabs {
            println!("  {:<14} {}", tab.view.label(), tab);
        }
        println!();
    }
    Ok(())
}

async fn load_header(
    app: &App,
    nav: &dyn NavigationAdapter,
    kind: ViewKind,
) -> ViewState<JourneyNav> {
    let session = match app.session() {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("No session for journey navigation: {}", e);
            return ViewState::failed("Failed to load journey navigation");
        }
    };
    let Ok(journey_id) = navigation::journey_id(nav) else {
        return ViewState::failed("Failed to load journey navigation");
    };

    JourneyNavView::new(app.cache.clone())
        .load(&session, &journey_id, kind)
        .await
}

/// Header failures never block the view underneath
fn print_header(state: &ViewState<JourneyNav>) {
    match state {
        ViewState::Ready(nav) => {
            let title = nav
                .current
                .as_ref()
                .map(|j| j.name.as_str())
                .unwrap_or("Journey");
            println!("\n{}", title.bold());
            println!(
                "{}    {}\n",
                format_control("← Previous", &nav.previous),
                format_control("Next →", &nav.next)
            );
        }
        ViewState::Failed { message } | ViewState::Empty { message } => {
            println!("\n{}\n", message.dimmed());
        }
        ViewState::Loading => {}
    }
}

fn format_control(label: &str, control: &NavControl) -> String {
    match (&control.target, &control.route) {
        (Some(target), Some(route)) if control.enabled => {
            format!("{} {} ({})", label, target.name, route)
        }
        _ => label.dimmed().to_string(),
    }
}

fn output_flowchart(chart: &Flowchart) {
    if chart.nodes.is_empty() {
        println!("This journey has no steps yet.");
        return;
    }

    for (index, node) in chart.nodes.iter().enumerate() {
        println!("{} {}", format!("[{}]", index + 1).cyan(), node.label.bold());
        if node.events.is_empty() {
            println!("    {}", "no events".dimmed());
        }
        for event in &node.events {
            let status = event.status.as_deref().unwrap_or("unknown");
            println!("    • {} ({})", event.name, status.dimmed());
            println!("      docs:   {}", event.docs);
            if let Some(replay) = &event.replay {
                println!("      replay: {}", replay);
            }
        }
        if index + 1 < chart.nodes.len() {
            println!("    {}", "│".dimmed());
            println!("    {}", "▼".dimmed());
        }
    }
    println!();
}

fn output_docs(page: &DocsPage, search: Option<&str>) {
    if let HighlightOutcome::Stale { requested } = &page.highlight {
        println!(
            "{}\n",
            format!("Event {} is not part of this journey.", requested).yellow()
        );
    }

    let steps = page.visible_steps(search);
    if steps.is_empty() {
        match search {
            Some(query) => println!("No steps or events match \"{}\".", query),
            None => println!("This journey has no steps yet."),
        }
        return;
    }

    // Without a resolved highlight there is nothing to focus, so show it all
    let expand_all = page.highlight.expand_step().is_none();

    for step in steps {
        let expanded = expand_all || page.is_expanded(&step.id);
        output_step(page, step, expanded);
    }
}

fn output_step(page: &DocsPage, step: &JourneyStep, expanded: bool) {
    let marker = if expanded { "▾" } else { "▸" };
    println!(
        "{} {} {}",
        marker,
        step.display_name().bold(),
        format!("({} events)", step.configured_event_count()).dimmed()
    );
    if !step.display_description().is_empty() {
        println!("  {}", step.display_description());
    }

    if !expanded {
        println!();
        return;
    }

    if step.configured_event_count() == 0 {
        println!("    {}", "No analytics events configured for this step".dimmed());
    }
    for event in step.configured_events() {
        output_event(page, event);
    }
    println!();
}

fn output_event(page: &DocsPage, event: &AnalyticsEvent) {
    let id = event.id.as_deref().unwrap_or_default();
    let mut title = format!("{} [{}]", event.display_name(), id);
    if let Some(status) = &event.status {
        title = format!("{} ({})", title, status);
    }
    if page.highlight.is_marked(id) {
        println!("\n  {} {}", "▶".yellow(), title.yellow().bold());
    } else {
        println!("\n    {}", title);
    }

    if !event.display_description().is_empty() {
        println!("    {}", event.display_description());
    }
    if let Some(route) = page.replay_route(id) {
        println!("    View Recording: {}", route.to_string().cyan());
    }

    for group in &event.properties {
        if group.properties.is_empty() {
            continue;
        }
        println!("    {}", group.display_name().underline());
        let mut table = Table::new();
        table.add_row(row!["Parameter", "Type", "Description", "Example"]);
        for param in &group.properties {
            table.add_row(row![
                param.name,
                param.kind.as_deref().unwrap_or_default(),
                truncate(param.description.as_deref().unwrap_or_default(), 60),
                param.display_value()
            ]);
        }
        table.printstd();
    }
}

fn output_timeline(timeline: &ReplayTimeline) {
    if let Some(url) = &timeline.video_url {
        println!("Video: {}\n", url);
    }

    let mut table = Table::new();
    table.add_row(row!["Time", "Event", "Step", "Status"]);
    for entry in &timeline.entries {
        let name = if entry.highlighted {
            format!("▶ {}", entry.name).yellow().bold().to_string()
        } else {
            entry.name.clone()
        };
        table.add_row(row![
            format_clock(entry.time),
            name,
            entry.step_name,
            entry.status.as_deref().unwrap_or("unknown")
        ]);
    }
    table.printstd();
    println!();
}
