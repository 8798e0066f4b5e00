//! `saved` subcommands over the POIs attached to a trip.

use std::io::Write;

use clap::{Args, Subcommand};
use geo::Coord;
use serde::Serialize;
use wayfarer_core::{
    IdAllocator, KeyValueStore, Planner, SavedPoi, SavedPoiOptions, SavedPoiPatch,
};

use crate::CliError;
use crate::output::{write_json, write_outcome};

#[derive(Debug, Subcommand)]
pub(crate) enum SavedCommand {
    /// Attach a catalog POI to a trip.
    Add {
        /// Trip id.
        map: u64,
        /// Catalog POI id.
        poi: u64,
        #[command(flatten)]
        planning: PlanningArgs,
        /// Flag the POI as must-have.
        #[arg(long)]
        must_have: bool,
    },
    /// Detach a POI from a trip.
    Remove {
        /// Trip id.
        map: u64,
        /// POI id.
        poi: u64,
    },
    /// Edit a saved POI's planning data.
    Update(UpdateSavedArgs),
    /// Attach a POI that is not in the catalog.
    Create(CreateSavedArgs),
    /// Report whether a POI is attached to a trip.
    Check {
        /// Trip id.
        map: u64,
        /// POI id.
        poi: u64,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct PlanningArgs {
    /// Scheduled visit, ISO 8601.
    #[arg(long)]
    pub(crate) datetime: Option<String>,
    /// Palette key for the marker.
    #[arg(long)]
    pub(crate) color: Option<String>,
    /// Grouping label, such as a day of the trip.
    #[arg(long)]
    pub(crate) layer: Option<String>,
}

/// Catalog-style detail carried by a saved POI.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct DetailArgs {
    /// Street address.
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// City.
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Country.
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Category label.
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Marker icon id.
    #[arg(long)]
    pub(crate) icon: Option<String>,
    /// Longitude in degrees.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub(crate) lon: Option<f64>,
    /// Latitude in degrees.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub(crate) lat: Option<f64>,
}

impl DetailArgs {
    fn location(&self) -> Option<Coord<f64>> {
        self.lon.zip(self.lat).map(|(x, y)| Coord { x, y })
    }
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct UpdateSavedArgs {
    /// Trip id.
    pub(crate) map: u64,
    /// POI id.
    pub(crate) poi: u64,
    #[command(flatten)]
    pub(crate) planning: PlanningArgs,
    /// Drop the scheduled visit.
    #[arg(long, conflicts_with = "datetime")]
    pub(crate) unschedule: bool,
    /// Set or clear the must-have flag.
    #[arg(long)]
    pub(crate) must_have: Option<bool>,
    /// Override the display name.
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[command(flatten)]
    pub(crate) detail: DetailArgs,
}

impl From<UpdateSavedArgs> for SavedPoiPatch {
    fn from(args: UpdateSavedArgs) -> Self {
        let datetime = if args.unschedule {
            Some(None)
        } else {
            args.planning.datetime.map(Some)
        };
        let location = args.detail.location();
        Self {
            id: args.poi,
            datetime,
            color: args.planning.color,
            layer: args.planning.layer,
            must_have: args.must_have,
            name: args.name,
            address: args.detail.address,
            city: args.detail.city,
            country: args.detail.country,
            category: args.detail.category,
            icon: args.detail.icon,
            location,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct CreateSavedArgs {
    /// Trip id.
    pub(crate) map: u64,
    /// Display name.
    #[arg(long)]
    pub(crate) name: String,
    #[command(flatten)]
    pub(crate) detail: DetailArgs,
    #[command(flatten)]
    pub(crate) planning: PlanningArgs,
    /// Flag the POI as must-have.
    #[arg(long)]
    pub(crate) must_have: bool,
}

impl CreateSavedArgs {
    fn draft(self) -> SavedPoi {
        let location = self.detail.location();
        let mut draft = SavedPoi::new(0);
        draft.apply(SavedPoiPatch {
            id: 0,
            datetime: Some(self.planning.datetime),
            color: self.planning.color,
            layer: self.planning.layer,
            must_have: Some(self.must_have),
            name: Some(self.name),
            address: self.detail.address,
            city: self.detail.city,
            country: self.detail.country,
            category: self.detail.category,
            icon: self.detail.icon,
            location,
        });
        draft
    }
}

#[derive(Debug, Serialize)]
struct Membership {
    map: u64,
    poi: u64,
    saved: bool,
}

pub(crate) fn run_saved<S: KeyValueStore, A: IdAllocator>(
    command: SavedCommand,
    planner: &Planner<S, A>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let trips = planner.trips();
    match command {
        SavedCommand::Add {
            map,
            poi,
            planning,
            must_have,
        } => {
            let options = SavedPoiOptions {
                datetime: planning.datetime,
                color: planning.color,
                layer: planning.layer,
                must_have,
            };
            write_outcome(writer, trips.add_poi_to_map(map, poi, options)?)
        }
        SavedCommand::Remove { map, poi } => {
            write_outcome(writer, trips.remove_poi_from_map(map, poi)?)
        }
        SavedCommand::Update(args) => {
            let map = args.map;
            write_outcome(writer, trips.update_poi_in_map(map, args.into())?)
        }
        SavedCommand::Create(args) => {
            let map = args.map;
            let created = trips
                .create_poi_in_map(map, args.draft())?
                .ok_or(CliError::NotFound { kind: "map", id: map })?;
            write_json(writer, &created)
        }
        SavedCommand::Check { map, poi } => write_json(
            writer,
            &Membership {
                map,
                poi,
                saved: trips.is_poi_saved(map, poi)?,
            },
        ),
    }
}
