#![forbid(unsafe_code)]

//! Scripted walkthrough of the three registers (documents, tasks, training)
//! driven through the qgrid engine and printed as plain-text tables.
//!
//! Set `QGRID_CONFIG` to a JSON file to load a [`GridConfig`]; the
//! `QGRID_*` variables override it. `RUST_LOG=qgrid=trace` shows the engine's
//! structured events.

mod data;
mod table;

use qgrid::prelude::*;
use qgrid::{CloseReason, KeyCode, OverlayAction, Side};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use data::{DocCol, DocField, TaskCol, TaskField, TrainingCol, TrainingField};

const ENV_CONFIG: &str = "QGRID_CONFIG";

fn load_config() -> Result<GridConfig> {
    let config = match std::env::var_os(ENV_CONFIG) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            info!(path = %path.to_string_lossy(), "loaded grid config");
            GridConfig::from_json(&json)?
        }
        None => GridConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn documents(config: &GridConfig) -> Result<()> {
    let records = data::documents();
    let mut grid: DataGrid<DocCol, DocField> =
        DataGrid::new(data::document_columns(), config.clone())?
            .with_filter(
                "search",
                Predicate::search([DocField::Code, DocField::Title, DocField::Owner]),
            )
            .with_filter("status", Predicate::exact(DocField::Status))
            .with_filter("department", Predicate::exact(DocField::Department));

    println!("== Documents ==");
    println!("{}", table::render(&grid.view(&records), data::Document::cell));

    grid.filters_mut().set_query("search", "sop");
    grid.filters_mut().set_choice("status", "Approved");
    println!("-- search \"sop\", status Approved --");
    println!("{}", table::render(&grid.view(&records), data::Document::cell));

    grid.filters_mut().clear_all();
    let hub = InteractionHub::new();
    let customize_button = (Rect::new(980, 24, 28, 28), Size::new(1024, 800));
    grid.open_customizer(&customize_button, &hub);
    grid.toggle_column(DocCol::Review);
    grid.start_drag(3)?;
    grid.drag_over(0)?;
    if let Some(outcome) = grid.end_drag() {
        info!(from = outcome.from, to = outcome.to, "column dropped");
    }

    // A second drag is abandoned by clicking away from the customizer.
    grid.start_drag(0)?;
    grid.drag_over(2)?;
    if let Some(OverlayAction::Closed(reason)) =
        grid.handle_customizer_event(&Event::click(40, 600), &customize_button)
    {
        println!(
            "customizer closed ({reason:?}), drag cancelled: {}",
            !grid.drag().is_dragging()
        );
    }
    grid.next_page(&records);
    println!("-- Next Review shown, Category dragged first, page 2 --");
    println!("{}", table::render(&grid.view(&records), data::Document::cell));

    grid.reset_columns();
    println!("-- columns reset --");
    println!("{}", grid.view(&records).headers().join(" | "));
    Ok(())
}

fn tasks(config: &GridConfig) -> Result<()> {
    let records = data::tasks();
    let mut grid: DataGrid<TaskCol, TaskField> =
        DataGrid::new(data::task_columns(), config.clone())?
            .with_filter("priority", Predicate::exact(TaskField::Priority))
            .with_filter("due", Predicate::date_range(TaskField::Due));

    grid.filters_mut().set_choice("priority", "High");
    grid.filters_mut()
        .set_date_range("due", DateRange::parse("2024-04-01", "2024-07-31")?);
    println!("== Tasks: High priority due April to July ==");
    let view = grid.view(&records);
    println!("{}", table::render(&view, data::Task::cell));

    // One action menu per visible row, positioned against its "⋮" button.
    let viewport = Size::new(1024, 800);
    let row_trigger = |row: usize| Rect::new(960, 120 + 48 * row as i32, 32, 32);
    let rows = view.page.len();

    let hub = InteractionHub::new();
    let mut menus: OverlayGroup<usize> = OverlayGroup::new(config.overlay_policy(), hub.clone());
    for row in 0..rows {
        menus.register(
            row,
            config.overlay_config(Alignment::End, Size::new(180, 140)),
        );
    }

    for row in 0..rows.min(2) {
        if let Some(placement) = menus.open(row, &(row_trigger(row), viewport)) {
            info!(row, top = placement.top, left = placement.left, "row menu opened");
        }
    }
    println!(
        "open menus {:?}, scroll locked: {}",
        menus.open_keys(),
        hub.is_scroll_locked()
    );

    // A trigger near the bottom edge flips its menu above.
    let low = (Rect::new(960, 760, 32, 32), viewport);
    if let Some(last) = rows.checked_sub(1)
        && let Some(placement) = menus.open(last, &low)
    {
        let side = if placement.side == Side::Above { "above" } else { "below" };
        println!("menu for row {} opens {side} at ({}, {})", last + 1, placement.left, placement.top);
    }

    // Scrolling moves every trigger up by 48; the first row scrolls out.
    let scrolled = |row: usize| {
        let trigger = row_trigger(row).translate(0, -48);
        (trigger.bottom() > 0).then_some((trigger, viewport))
    };
    for (row, action) in menus.handle_event(&Event::Scroll { dx: 0, dy: -48 }, scrolled) {
        match action {
            OverlayAction::Repositioned(p) => println!("row {} menu moved to ({}, {})", row + 1, p.left, p.top),
            OverlayAction::Closed(reason) => println!("row {} menu closed: {reason:?}", row + 1),
        }
    }

    let escape = Event::key(KeyCode::Escape);
    while menus.topmost().is_some() {
        for (row, action) in menus.handle_event(&escape, |_| None::<(Rect, Size)>) {
            if let OverlayAction::Closed(CloseReason::Escape) = action {
                println!("row {} menu dismissed with Escape", row + 1);
            }
        }
    }
    println!("listeners left: {}\n", hub.active());
    Ok(())
}

fn training(config: &GridConfig) -> Result<()> {
    let records = data::training();
    let mut grid: DataGrid<TrainingCol, TrainingField> =
        DataGrid::new(data::training_columns(), config.clone())?
            .with_filter(
                "search",
                Predicate::search([TrainingField::Employee, TrainingField::Course]),
            )
            .with_filter("result", Predicate::exact(TrainingField::Result))
            .with_filter("completed", Predicate::date_range(TrainingField::Completed));

    println!("== Training ==");
    grid.go_to_page(4);
    println!("{}", table::render(&grid.view(&records), data::Training::cell));

    // Half-typed input from a date field is rejected and leaves the filter alone.
    match DateRange::parse("2024-02-30", "") {
        Ok(range) => {
            grid.filters_mut().set_date_range("completed", range);
        }
        Err(err) => warn!(%err, "ignoring completed-date filter"),
    }

    grid.filters_mut()
        .set_date_range("completed", DateRange::parse("2024-06-01", "")?);
    grid.filters_mut().set_choice("result", "Pass");
    grid.filters_mut().set_query("search", "山田");
    println!("-- 山田, passed, from June --");
    println!("{}", table::render(&grid.view(&records), data::Training::cell));
    Ok(())
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    let config = load_config()?;
    info!(
        items_per_page = config.items_per_page,
        exclusive = config.exclusive_overlays,
        "grid config ready"
    );

    documents(&config)?;
    tasks(&config)?;
    training(&config)
}
