//! Replaces the children and entries files with a demo week: three
//! children and one entry per child for each day of the current week.

use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use color_eyre::eyre::Result;
use dotenv::dotenv;
use kiddytime_core::{
    calendar::{ViewMode, dates_in, range_for},
    models::{
        child::{Child, CreateChildRequest},
        entry::{MealChoice, TimeEntry, TimeSegment},
    },
};
use kiddytime_db::{CHILDREN_FILE, ENTRIES_FILE, json_file::JsonCollection};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn demo_child(id: &str, name: &str, arrival: &str, leaving: &str, has_meal: bool) -> Result<Child> {
    let request = CreateChildRequest {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        default_arrival_time: Some(arrival.to_string()),
        default_leaving_time: Some(leaving.to_string()),
        has_meal: Some(has_meal),
        has_snack: Some(true),
        ..Default::default()
    };
    request
        .into_child(id.to_string(), Utc::now())
        .map_err(|field| color_eyre::eyre::eyre!("Demo child {} is missing {}", name, field))
}

fn demo_children() -> Result<Vec<Child>> {
    Ok(vec![
        demo_child("child-1", "Emma", "08:00", "17:00", true)?,
        demo_child("child-2", "Lucas", "08:30", "16:30", true)?,
        demo_child("child-3", "Léa", "09:00", "17:30", false)?,
    ])
}

fn usual_day(child: &Child, date: NaiveDate) -> TimeEntry {
    let mut entry = TimeEntry::blank(&child.id, date);
    entry.segments = vec![TimeSegment::new(
        "1",
        &child.default_arrival_time,
        &child.default_leaving_time,
    )];
    entry.has_meal = Some(child.has_meal).into();
    entry.has_snack = Some(child.has_snack).into();
    entry
}

fn absent(child: &Child, date: NaiveDate, reason: &str) -> TimeEntry {
    let mut entry = TimeEntry::blank(&child.id, date);
    entry.is_absent = true;
    entry.absence_reason = Some(reason.to_string());
    entry
}

/// Monday: everyone on their usual hours. Tuesday: Emma leaves for an
/// appointment mid-day. Wednesday: Lucas is sick. Thursday: Léa arrives
/// late and exceptionally eats. Friday: Emma on holiday, Lucas leaves at
/// noon. Weekend: nobody.
fn demo_entries(children: &[Child], week: &[NaiveDate]) -> Vec<TimeEntry> {
    let mut entries = Vec::new();
    for (day, date) in week.iter().copied().enumerate() {
        for child in children {
            let entry = match (day, child.name.as_str()) {
                (0, _) => {
                    let mut entry = usual_day(child, date);
                    entry.notes = "Usual day".to_string();
                    entry
                }
                (1, "Emma") => {
                    let mut entry = usual_day(child, date);
                    entry.segments = vec![
                        TimeSegment::new("1", "08:00", "10:00"),
                        TimeSegment::new("2", "14:00", "17:00"),
                    ];
                    entry.has_meal = MealChoice::No;
                    entry.has_snack = MealChoice::Yes;
                    entry.notes = "Doctor's appointment between 10:00 and 14:00".to_string();
                    entry
                }
                (2, "Lucas") => absent(child, date, "Malade"),
                (3, "Léa") => {
                    let mut entry = usual_day(child, date);
                    entry.segments = vec![TimeSegment::new("1", "10:30", "17:30")];
                    entry.has_meal = MealChoice::Yes;
                    entry.notes = "Late arrival".to_string();
                    entry
                }
                (4, "Emma") => absent(child, date, "Vacances"),
                (4, "Lucas") => {
                    let mut entry = usual_day(child, date);
                    entry.segments = vec![TimeSegment::new("1", "08:30", "12:00")];
                    entry.has_meal = MealChoice::No;
                    entry.has_snack = MealChoice::No;
                    entry.notes = "Half day".to_string();
                    entry
                }
                (5 | 6, _) => absent(child, date, "Week-end"),
                _ => usual_day(child, date),
            };
            entries.push(entry);
        }
    }
    entries
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dotenv().ok();

    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));
    tokio::fs::create_dir_all(&data_dir).await?;

    let range = range_for(ViewMode::Week, Local::now().date_naive());
    let week = dates_in(&range);
    let children = demo_children()?;
    let entries = demo_entries(&children, &week);

    JsonCollection::<Child>::open(data_dir.join(CHILDREN_FILE))
        .await?
        .write(&children)
        .await?;
    JsonCollection::<TimeEntry>::open(data_dir.join(ENTRIES_FILE))
        .await?
        .write(&entries)
        .await?;

    info!("Week of {} to {}", range.start, range.end);
    info!(
        "{} children: {}",
        children.len(),
        children
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    info!("{} entries written to {}", entries.len(), data_dir.display());

    Ok(())
}
