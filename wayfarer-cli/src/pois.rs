//! `pois` subcommands over the catalog.

use std::io::Write;

use clap::{Args, Subcommand};
use geo::{Coord, Rect};
use wayfarer_core::{IdAllocator, KeyValueStore, NewPoi, Planner};

use crate::CliError;
use crate::output::{write_json, write_outcome};

#[derive(Debug, Subcommand)]
pub(crate) enum PoisCommand {
    /// List every catalog POI.
    List,
    /// Show one POI.
    Show {
        /// POI id.
        id: u64,
    },
    /// Add a POI to the catalog.
    Create(CreatePoiArgs),
    /// Remove a POI from the catalog.
    Delete {
        /// POI id.
        id: u64,
    },
    /// List POIs inside a longitude/latitude box.
    Bbox(BboxArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct CreatePoiArgs {
    /// Display name.
    #[arg(long)]
    pub(crate) name: Option<String>,
    /// Street address.
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// City.
    #[arg(long)]
    pub(crate) city: Option<String>,
    /// Country.
    #[arg(long)]
    pub(crate) country: Option<String>,
    /// Free-text category.
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

impl From<CreatePoiArgs> for NewPoi {
    fn from(args: CreatePoiArgs) -> Self {
        Self {
            name: args.name,
            address: args.address,
            city: args.city,
            country: args.country,
            category: args.category,
            icon: args.icon,
            location: args.lon.zip(args.lat).map(|(x, y)| Coord { x, y }),
        }
    }
}

#[derive(Debug, Clone, Copy, Args)]
pub(crate) struct BboxArgs {
    /// Western edge.
    #[arg(allow_negative_numbers = true)]
    pub(crate) min_lon: f64,
    /// Southern edge.
    #[arg(allow_negative_numbers = true)]
    pub(crate) min_lat: f64,
    /// Eastern edge.
    #[arg(allow_negative_numbers = true)]
    pub(crate) max_lon: f64,
    /// Northern edge.
    #[arg(allow_negative_numbers = true)]
    pub(crate) max_lat: f64,
}

impl BboxArgs {
    fn rect(self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.min_lon,
                y: self.min_lat,
            },
            Coord {
                x: self.max_lon,
                y: self.max_lat,
            },
        )
    }
}

pub(crate) fn run_pois<S: KeyValueStore, A: IdAllocator>(
    command: PoisCommand,
    planner: &Planner<S, A>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let pois = planner.pois();
    match command {
        PoisCommand::List => write_json(writer, &pois.all()?),
        PoisCommand::Show { id } => {
            let poi = pois.get(id)?.ok_or(CliError::NotFound { kind: "POI", id })?;
            write_json(writer, &poi)
        }
        PoisCommand::Create(args) => write_json(writer, &pois.create(args.into())?),
        PoisCommand::Delete { id } => write_outcome(writer, pois.delete(id)?),
        PoisCommand::Bbox(args) => write_json(writer, &pois.in_bbox(&args.rect())?),
    }
}
