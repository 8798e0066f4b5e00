//! Trips ("maps") owned by the single user and the POIs saved onto them.
//!
//! A [`SavedPoi`] references a catalog [`Poi`] by id and layers trip-specific
//! planning data on top: a schedule slot, a palette colour, a grouping layer
//! and a must-have flag. It may also hold a denormalized snapshot of the
//! catalog entry, filled in by [`SavedPoi::project_from`].

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::Poi;

/// Palette key given to saved POIs without an explicit colour.
pub const DEFAULT_COLOR: &str = "gray";

/// Cover image applied to trips created without one.
pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1488646953014-85cb44e25828?auto=format&fit=crop&w=300&q=80";

/// The singleton user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Trips in display order.
    #[serde(default)]
    pub maps: Vec<TripMap>,
}

impl User {
    /// Look up a trip by id.
    #[must_use]
    pub fn map(&self, map_id: u64) -> Option<&TripMap> {
        self.maps.iter().find(|map| map.id == map_id)
    }

    pub(crate) fn map_mut(&mut self, map_id: u64) -> Option<&mut TripMap> {
        self.maps.iter_mut().find(|map| map.id == map_id)
    }

    /// The currently selected trip, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&TripMap> {
        self.maps.iter().find(|map| map.selected)
    }

    /// Id the next created trip receives: one past the largest id in use.
    #[must_use]
    pub fn next_map_id(&self) -> u64 {
        next_id(self.maps.iter().map(|map| map.id))
    }
}

/// A trip: a named date range with POIs attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripMap {
    /// Identifier, unique within the user.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Cover image.
    #[serde(default = "default_image_url")]
    pub image_url: String,
    /// First day of the trip as entered, typically `YYYY-MM-DD`.
    #[serde(default)]
    pub starting_date: String,
    /// Last day of the trip as entered.
    #[serde(default)]
    pub leaving_date: String,
    /// Whether this is the active trip.
    #[serde(default)]
    pub selected: bool,
    /// POIs attached to the trip, in insertion order.
    #[serde(default)]
    pub saved_poi: Vec<SavedPoi>,
}

fn default_image_url() -> String {
    DEFAULT_IMAGE_URL.to_owned()
}

impl TripMap {
    /// Whether a POI with `poi_id` is attached to this trip.
    #[must_use]
    pub fn contains(&self, poi_id: u64) -> bool {
        self.saved_poi.iter().any(|poi| poi.id == poi_id)
    }

    /// Look up a saved entry by POI id.
    #[must_use]
    pub fn saved(&self, poi_id: u64) -> Option<&SavedPoi> {
        self.saved_poi.iter().find(|poi| poi.id == poi_id)
    }
}

/// Input for [`crate::TripRepository::add_map`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMap {
    /// Display name.
    pub name: String,
    /// First day of the trip.
    pub starting_date: String,
    /// Last day of the trip.
    pub leaving_date: String,
    /// Cover image; absent or blank yields [`DEFAULT_IMAGE_URL`].
    pub image_url: Option<String>,
}

/// Replacement values for [`crate::TripRepository::update_map`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEdit {
    /// New display name.
    pub name: String,
    /// New first day.
    pub starting_date: String,
    /// New last day.
    pub leaving_date: String,
    /// New cover image; `None` keeps the current one.
    pub image_url: Option<String>,
}

/// A POI attached to a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPoi {
    /// Catalog id, or a minted id for entries created on the trip itself.
    pub id: u64,
    /// Scheduled visit as an ISO date-time.
    #[serde(default)]
    pub datetime: Option<String>,
    /// Palette key, see [`crate::marker::color_value`].
    #[serde(default = "default_color")]
    pub color: String,
    /// Free-text grouping label.
    #[serde(default)]
    pub layer: String,
    /// Whether the visit is flagged as unmissable.
    #[serde(default)]
    pub must_have: bool,
    /// Denormalized catalog name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Denormalized catalog address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Denormalized catalog city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Denormalized catalog country.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Denormalized catalog category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Denormalized catalog icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Denormalized catalog position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coord<f64>>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_owned()
}

impl SavedPoi {
    /// A bare reference to `id` with default planning data.
    ///
    /// # Examples
    /// ```
    /// use wayfarer_core::SavedPoi;
    ///
    /// let saved = SavedPoi::new(4);
    /// assert_eq!(saved.color, "gray");
    /// assert!(!saved.must_have);
    /// assert!(saved.name.is_none());
    /// ```
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            datetime: None,
            color: default_color(),
            layer: String::new(),
            must_have: false,
            name: None,
            address: None,
            city: None,
            country: None,
            category: None,
            icon: None,
            location: None,
        }
    }

    /// Build an entry for `poi` carrying the given planning data and a
    /// snapshot of the catalog detail.
    #[must_use]
    pub fn from_catalog(poi: &Poi, options: SavedPoiOptions) -> Self {
        let mut saved = Self::new(poi.id);
        saved.datetime = options.datetime;
        if let Some(color) = crate::poi::non_blank(options.color) {
            saved.color = color;
        }
        saved.layer = options.layer.unwrap_or_default();
        saved.must_have = options.must_have;
        saved.project_from(poi);
        saved
    }

    /// Fill detail fields still absent on this entry from the catalog.
    ///
    /// Fields already present win over the catalog. Video links are never
    /// copied. Returns whether any field changed.
    ///
    /// # Examples
    /// ```
    /// use wayfarer_core::{Poi, SavedPoi};
    ///
    /// let mut saved = SavedPoi::new(1);
    /// saved.name = Some("My favourite fountain".into());
    /// let mut poi = Poi::new(1, "Trevi Fountain", "Piazza di Trevi");
    /// poi.video_url = Some("https://example.org/trevi.mp4".into());
    ///
    /// assert!(saved.project_from(&poi));
    /// assert_eq!(saved.name.as_deref(), Some("My favourite fountain"));
    /// assert_eq!(saved.address.as_deref(), Some("Piazza di Trevi"));
    /// assert!(!saved.project_from(&poi));
    /// ```
    pub fn project_from(&mut self, poi: &Poi) -> bool {
        let before = self.clone();
        fill(&mut self.name, Some(&poi.name));
        fill(&mut self.address, Some(&poi.address));
        fill(&mut self.city, poi.city.as_ref());
        fill(&mut self.country, poi.country.as_ref());
        fill(&mut self.category, Some(&poi.category));
        fill(&mut self.icon, poi.icon.as_ref());
        if self.location.is_none() {
            self.location = poi.location;
        }
        *self != before
    }

    /// Shallow-merge the fields present in `patch`.
    pub fn apply(&mut self, patch: SavedPoiPatch) {
        let SavedPoiPatch {
            id: _,
            datetime,
            color,
            layer,
            must_have,
            name,
            address,
            city,
            country,
            category,
            icon,
            location,
        } = patch;
        if let Some(value) = datetime {
            self.datetime = value;
        }
        if let Some(value) = color {
            self.color = value;
        }
        if let Some(value) = layer {
            self.layer = value;
        }
        if let Some(value) = must_have {
            self.must_have = value;
        }
        overwrite(&mut self.name, name);
        overwrite(&mut self.address, address);
        overwrite(&mut self.city, city);
        overwrite(&mut self.country, country);
        overwrite(&mut self.category, category);
        overwrite(&mut self.icon, icon);
        overwrite(&mut self.location, location);
    }
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn fill(slot: &mut Option<String>, value: Option<&String>) {
    if slot.is_none() {
        *slot = value.cloned();
    }
}

/// Planning data for [`crate::TripRepository::add_poi_to_map`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedPoiOptions {
    /// Scheduled visit.
    pub datetime: Option<String>,
    /// Palette key; absent or blank yields [`DEFAULT_COLOR`].
    pub color: Option<String>,
    /// Grouping label; absent yields `""`.
    pub layer: Option<String>,
    /// Must-have flag.
    pub must_have: bool,
}

/// Partial update for [`crate::TripRepository::update_poi_in_map`].
///
/// `None` leaves a field untouched. `datetime` is doubly optional so a patch
/// can clear the schedule with `Some(None)`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use wayfarer_core::{SavedPoi, SavedPoiPatch};
///
/// let mut saved = SavedPoi::new(5);
/// saved.apply(SavedPoiPatch {
///     id: 5,
///     icon: Some("restaurant".into()),
///     location: Some(Coord { x: 12.47, y: 41.9 }),
///     ..SavedPoiPatch::default()
/// });
/// assert_eq!(saved.icon.as_deref(), Some("restaurant"));
/// assert_eq!(saved.color, "gray");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedPoiPatch {
    /// Id of the entry to update.
    pub id: u64,
    /// New schedule slot.
    pub datetime: Option<Option<String>>,
    /// New palette key.
    pub color: Option<String>,
    /// New grouping label.
    pub layer: Option<String>,
    /// New must-have flag.
    pub must_have: Option<bool>,
    /// New display name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New marker icon id.
    pub icon: Option<String>,
    /// New position.
    pub location: Option<Coord<f64>>,
}

/// One past the largest id yielded, or `1` when there are none.
pub(crate) fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().map_or(1, |max| max.saturating_add(1))
}
