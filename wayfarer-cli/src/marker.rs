//! `marker` subcommand rendering the HTML a map view embeds for a POI.

use std::io::Write;

use clap::Args;
use wayfarer_core::marker::{DEFAULT_PIN_SIZE, Marker, MarkerStyle, marker_for, pin_marker};
use wayfarer_core::{IdAllocator, KeyValueStore, Planner};

use crate::CliError;
use crate::output::write_text;

#[derive(Debug, Clone, Args)]
pub(crate) struct MarkerArgs {
    /// POI id, from the catalog or saved on the trip.
    pub(crate) poi: u64,
    /// Trip whose saved entry styles the pin; defaults to the selected trip.
    #[arg(long)]
    pub(crate) map: Option<u64>,
    /// Render video bubbles in their selected state.
    #[arg(long)]
    pub(crate) selected: bool,
    /// Position among neighbouring bubbles, staggering their animation.
    #[arg(long, default_value_t = 0)]
    pub(crate) index: u64,
    /// Pin edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_PIN_SIZE)]
    pub(crate) size: u32,
}

pub(crate) fn run_marker<S: KeyValueStore, A: IdAllocator>(
    args: &MarkerArgs,
    planner: &Planner<S, A>,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let trips = planner.trips();
    let map = match args.map {
        Some(id) => Some(trips.map(id)?.ok_or(CliError::NotFound { kind: "map", id })?),
        None => trips.selected_map()?,
    };
    let saved = map.as_ref().and_then(|map| map.saved(args.poi));
    let marker = match planner.pois().get(args.poi)? {
        Some(poi) => marker_for(&poi, saved, args.selected, args.index, args.size),
        None => {
            let entry = saved.ok_or(CliError::NotFound {
                kind: "POI",
                id: args.poi,
            })?;
            Marker::Pin(pin_marker(&MarkerStyle {
                size: args.size,
                ..MarkerStyle::for_saved(entry)
            }))
        }
    };
    write_text(writer, &marker.to_html())
}
