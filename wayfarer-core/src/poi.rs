use geo::Coord;
use serde::{Deserialize, Serialize};

/// Category assigned to POIs created without one.
pub const DEFAULT_CATEGORY: &str = "Generic";

/// A catalog entry describing a place worth visiting.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use wayfarer_core::Poi;
///
/// let poi = Poi::new(1, "Colosseum", "Piazza del Colosseo");
///
/// assert_eq!(poi.id, 1);
/// assert_eq!(poi.category, "Generic");
/// assert!(poi.location.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Unique identifier within the catalog.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// City, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Country, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Free-form category label.
    #[serde(default = "default_category")]
    pub category: String,
    /// Marker icon identifier, resolved through [`crate::marker::icon_class`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Geospatial position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coord<f64>>,
    /// Link to video content; such POIs render as bubble markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_owned()
}

impl Poi {
    /// Construct a POI with the default category and no optional detail.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            city: None,
            country: None,
            category: default_category(),
            icon: None,
            location: None,
            video_url: None,
        }
    }

    /// Attach a position to the POI.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use wayfarer_core::Poi;
    ///
    /// let poi = Poi::new(1, "Pantheon", "").with_location(Coord { x: 12.47, y: 41.89 });
    /// assert_eq!(poi.location, Some(Coord { x: 12.47, y: 41.89 }));
    /// ```
    #[must_use]
    pub fn with_location(mut self, location: Coord<f64>) -> Self {
        self.location = Some(location);
        self
    }

    /// Whether the POI carries video content.
    #[must_use]
    pub const fn has_video(&self) -> bool {
        self.video_url.is_some()
    }
}

/// Input for [`crate::PoiRepository::create`].
///
/// Blank strings are treated as absent: the repository substitutes a name
/// derived from the assigned id and the default category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPoi {
    /// Display name; blank yields `"New POI {id}"`.
    pub name: Option<String>,
    /// Street address; blank yields an empty address.
    pub address: Option<String>,
    /// City, when known.
    pub city: Option<String>,
    /// Country, when known.
    pub country: Option<String>,
    /// Category; blank yields [`DEFAULT_CATEGORY`].
    pub category: Option<String>,
    /// Marker icon identifier.
    pub icon: Option<String>,
    /// Geospatial position.
    pub location: Option<Coord<f64>>,
}

impl NewPoi {
    /// Turn the request into a catalog entry carrying `id`.
    pub(crate) fn into_poi(self, id: u64) -> Poi {
        let name = non_blank(self.name).unwrap_or_else(|| format!("New POI {id}"));
        let category = non_blank(self.category).unwrap_or_else(default_category);
        Poi {
            id,
            name,
            address: self.address.unwrap_or_default(),
            city: self.city,
            country: self.country,
            category,
            icon: self.icon,
            location: self.location,
            video_url: None,
        }
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
