//! `maps` subcommands over the user's trips.

use std::io::Write;

use clap::{Args, Subcommand};
use serde::Serialize;
use wayfarer_core::schedule::format_date;
use wayfarer_core::{IdAllocator, KeyValueStore, MapEdit, NewMap, Planner, TripMap};

use crate::CliError;
use crate::output::{write_json, write_outcome};

#[derive(Debug, Subcommand)]
pub(crate) enum MapsCommand {
    /// Summarize every trip.
    List,
    /// Show one trip with its saved POIs.
    Show {
        /// Trip id; defaults to the selected trip.
        id: Option<u64>,
    },
    /// Create a trip.
    Add(MapFields),
    /// Make a trip the selected one.
    Select {
        /// Trip id.
        id: u64,
    },
    /// Delete a trip.
    Delete {
        /// Trip id.
        id: u64,
    },
    /// Rename or reschedule a trip.
    Update(UpdateMapArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct MapFields {
    /// Trip name.
    #[arg(long)]
    pub(crate) name: String,
    /// First day, `YYYY-MM-DD`.
    #[arg(long = "start", default_value = "")]
    pub(crate) starting_date: String,
    /// Last day, `YYYY-MM-DD`.
    #[arg(long = "leave", default_value = "")]
    pub(crate) leaving_date: String,
    /// Cover image URL.
    #[arg(long)]
    pub(crate) image_url: Option<String>,
}

impl From<MapFields> for NewMap {
    fn from(fields: MapFields) -> Self {
        Self {
            name: fields.name,
            starting_date: fields.starting_date,
            leaving_date: fields.leaving_date,
            image_url: fields.image_url,
        }
    }
}

/// Fields of `maps update`; each one left out keeps the trip's current value.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct UpdateMapArgs {
    /// Trip id.
    pub(crate) id: u64,
    /// New trip name.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// New first day, `YYYY-MM-DD`.
    #[arg(long = "start")]
    pub(crate) starting_date: Option<String>,
    /// New last day, `YYYY-MM-DD`.
    #[arg(long = "leave")]
    pub(crate) leaving_date: Option<String>,
    /// New cover image URL.
    #[arg(long)]
    pub(crate) image_url: Option<String>,
}

impl UpdateMapArgs {
    fn into_edit(self, current: Option<&TripMap>) -> MapEdit {
        MapEdit {
            name: or_current(self.name, current.map(|map| &map.name)),
            starting_date: or_current(self.starting_date, current.map(|map| &map.starting_date)),
            leaving_date: or_current(self.leaving_date, current.map(|map| &map.leaving_date)),
            image_url: self.image_url,
        }
    }
}

fn or_current(value: Option<String>, current: Option<&String>) -> String {
    value.or_else(|| current.cloned()).unwrap_or_default()
}

/// One line of `maps list`, with dates formatted for display.
#[derive(Debug, Serialize)]
struct MapSummary<'a> {
    id: u64,
    name: &'a str,
    starting_date: String,
    leaving_date: String,
    selected: bool,
    saved: usize,
}

impl<'a> From<&'a TripMap> for MapSummary<'a> {
    fn from(map: &'a TripMap) -> Self {
        Self {
            id: map.id,
            name: &map.name,
            starting_date: format_date(Some(&map.starting_date)),
            leaving_date: format_date(Some(&map.leaving_date)),
            selected: map.selected,
            saved: map.saved_poi.len(),
        }
    }
}

pub(crate) fn run_maps<S: KeyValueStore, A: IdAllocator>(
    command: MapsCommand,
    planner: &Planner<S, A>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let trips = planner.trips();
    match command {
        MapsCommand::List => {
            let maps = trips.user()?.map(|user| user.maps).unwrap_or_default();
            let summaries: Vec<MapSummary<'_>> = maps.iter().map(MapSummary::from).collect();
            write_json(writer, &summaries)
        }
        MapsCommand::Show { id: Some(id) } => {
            let map = trips.map(id)?.ok_or(CliError::NotFound { kind: "map", id })?;
            write_json(writer, &map)
        }
        MapsCommand::Show { id: None } => write_json(writer, &trips.selected_map()?),
        MapsCommand::Add(fields) => write_json(writer, &trips.add_map(fields.into())?),
        MapsCommand::Select { id } => write_outcome(writer, trips.select_map(id)?),
        MapsCommand::Delete { id } => write_outcome(writer, trips.delete_map(id)?),
        MapsCommand::Update(args) => {
            let id = args.id;
            let edit = args.into_edit(trips.map(id)?.as_ref());
            write_outcome(writer, trips.update_map(id, edit)?)
        }
    }
}
