//! Marker descriptors for rendering POIs on an interactive map.
//!
//! Builders are pure: they map a POI's visual attributes to a descriptor
//! carrying colours, glyph, label and anchor geometry. [`PinMarker::to_html`]
//! and [`BubbleMarker::to_html`] produce the markup a Leaflet `divIcon`
//! embeds. Anchor offsets are in pixels relative to the icon's top-left
//! corner.

mod palette;

pub use palette::{
    FALLBACK_COLOR, FALLBACK_ICON_CLASS, color_ids, color_value, icon_class, icon_ids,
};

use crate::{Poi, SavedPoi};

/// Default pin edge length in pixels.
pub const DEFAULT_PIN_SIZE: u32 = 30;

/// Edge length of bubble markers in pixels.
pub const BUBBLE_SIZE: u32 = 48;

/// Border drawn around must-have pins.
pub const MUST_HAVE_BORDER: &str = "#1d1b1c";

const TRANSPARENT: &str = "rgba(0,0,0,0)";
const WHITE: &str = "white";
const BUBBLE_GLYPH: &str = "bi-file-play";
const ENTRANCE_STEP_MS: u64 = 80;
const FLOAT_BASE_MS: u64 = 3_000;
const FLOAT_STEP_MS: u64 = 250;

/// Pixel offset `[x, y]`.
pub type Offset = [f64; 2];

/// Visual attributes of a pin marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerStyle<'a> {
    /// Icon id, see [`icon_class`].
    pub icon: &'a str,
    /// Palette key, see [`color_value`].
    pub color: &'a str,
    /// Whether the POI is flagged must-have.
    pub must_have: bool,
    /// Whether the POI is saved on the current trip.
    pub saved: bool,
    /// Edge length in pixels.
    pub size: u32,
    /// Optional text label.
    pub name: Option<&'a str>,
}

impl Default for MarkerStyle<'_> {
    fn default() -> Self {
        Self {
            icon: "pin",
            color: FALLBACK_COLOR,
            must_have: false,
            saved: false,
            size: DEFAULT_PIN_SIZE,
            name: None,
        }
    }
}

impl<'a> MarkerStyle<'a> {
    /// Style for a catalog POI that is not on the trip.
    #[must_use]
    pub fn for_catalog(poi: &'a Poi) -> Self {
        Self {
            icon: poi.icon.as_deref().unwrap_or("pin"),
            name: Some(poi.name.as_str()),
            ..Self::default()
        }
    }

    /// Style for a POI saved on the trip.
    #[must_use]
    pub fn for_saved(saved: &'a SavedPoi) -> Self {
        Self {
            icon: saved.icon.as_deref().unwrap_or("pin"),
            color: saved.color.as_str(),
            must_have: saved.must_have,
            saved: true,
            name: saved.name.as_deref(),
            ..Self::default()
        }
    }
}

/// Outline of a pin marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinShape {
    /// Circle with its bottom-left quadrant squared off and rotated to point
    /// down.
    Teardrop,
}

/// Renderable pin marker.
#[derive(Debug, Clone, PartialEq)]
pub struct PinMarker {
    /// Pin outline.
    pub shape: PinShape,
    /// Edge length in pixels.
    pub size: u32,
    /// Pin background: the palette colour when saved, white otherwise.
    pub fill: &'static str,
    /// Inner disc colour.
    pub inner_fill: &'static str,
    /// Glyph colour.
    pub icon_color: &'static str,
    /// Border colour.
    pub border: &'static str,
    /// Bootstrap Icons class of the glyph.
    pub icon_class: &'static str,
    /// Optional text label.
    pub label: Option<String>,
    /// Must-have flag after normalisation.
    pub must_have: bool,
    /// Saved flag after normalisation.
    pub saved: bool,
    /// Icon box `[width, height]`.
    pub icon_size: Offset,
    /// Point of the icon placed on the coordinate.
    pub icon_anchor: Offset,
    /// Popup offset from the anchor.
    pub popup_anchor: Offset,
    /// Tooltip offset from the anchor.
    pub tooltip_anchor: Offset,
    /// Inner disc diameter.
    pub inner_size: f64,
    /// Glyph font size.
    pub glyph_size: f64,
}

/// Build a pin marker.
///
/// An unsaved POI cannot be must-have, and a must-have POI counts as saved.
///
/// # Examples
/// ```
/// use wayfarer_core::marker::{MarkerStyle, pin_marker};
///
/// let pin = pin_marker(&MarkerStyle {
///     icon: "museum",
///     color: "red",
///     saved: true,
///     must_have: true,
///     ..MarkerStyle::default()
/// });
/// assert_eq!(pin.fill, "#f36a73");
/// assert_eq!(pin.border, "#1d1b1c");
/// assert_eq!(pin.icon_anchor, [15.0, 36.0]);
/// ```
#[must_use]
pub fn pin_marker(style: &MarkerStyle<'_>) -> PinMarker {
    let must_have = style.must_have && style.saved;
    let saved = style.saved || must_have;
    let color = color_value(style.color);
    let size = f64::from(style.size);
    PinMarker {
        shape: PinShape::Teardrop,
        size: style.size,
        fill: if saved { color } else { WHITE },
        inner_fill: color,
        icon_color: WHITE,
        border: if must_have { MUST_HAVE_BORDER } else { TRANSPARENT },
        icon_class: icon_class(style.icon),
        label: style.name.map(str::to_owned),
        must_have,
        saved,
        icon_size: [size, size],
        icon_anchor: [fraction(size, 1, 2), fraction(size, 6, 5)],
        popup_anchor: [0.0, fraction(size, -6, 5)],
        tooltip_anchor: [fraction(size, 1, 2), fraction(size, -1, 2)],
        inner_size: fraction(size, 4, 5),
        glyph_size: fraction(size, 1, 2),
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "marker geometry is expressed in fractional pixels"
)]
fn fraction(value: f64, numerator: i32, denominator: i32) -> f64 {
    value * f64::from(numerator) / f64::from(denominator)
}

impl PinMarker {
    /// Markup for the pin.
    #[must_use]
    pub fn to_html(&self) -> String {
        let label = self.label.as_deref().map_or_else(String::new, |name| {
            format!(
                "\n    <span class=\"marker-label\" style=\"position: absolute; top: 100%; left: 50%; \
                 transform: translateX(-50%); white-space: nowrap;\">{}</span>",
                escape_html(name)
            )
        });
        format!(
            "<div style=\"position: relative; width: {size}px; height: {size}px;\">\n    \
             <div style=\"position: absolute; width: 100%; height: 100%; background-color: {fill}; \
             border-radius: 50% 50% 50% 0; transform: rotate(-45deg); \
             box-shadow: 1px 1px 4px rgba(0,0,0,0.3); border: 2px solid {border}; z-index: 1;\"></div>\n    \
             <div style=\"position: absolute; width: {inner}px; height: {inner}px; \
             background-color: {inner_fill}; border-radius: 50%; top: 50%; left: 50%; \
             transform: translate(-50%, -55%); z-index: 2; display: flex; align-items: center; \
             justify-content: center; box-shadow: inset 0 0 2px rgba(0,0,0,0.1);\">\n        \
             <i class=\"bi {icon}\" style=\"color: {icon_color}; font-size: {glyph}px;\"></i>\n    \
             </div>{label}\n</div>",
            size = self.size,
            fill = self.fill,
            border = self.border,
            inner = self.inner_size,
            inner_fill = self.inner_fill,
            icon = self.icon_class,
            icon_color = self.icon_color,
            glyph = self.glyph_size,
        )
    }
}

/// Renderable bubble marker for POIs with video content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BubbleMarker {
    /// Whether the bubble is the active one.
    pub selected: bool,
    /// Edge length in pixels.
    pub size: u32,
    /// Utility classes for the bubble body.
    pub bubble_class: &'static str,
    /// Utility class for the glyph colour.
    pub icon_color_class: &'static str,
    /// Bootstrap Icons class of the glyph.
    pub icon_class: &'static str,
    /// Icon box `[width, height]`.
    pub icon_size: [u32; 2],
    /// Point of the icon placed on the coordinate.
    pub icon_anchor: [u32; 2],
    /// Delay before the entrance animation starts.
    pub entrance_delay_ms: u64,
    /// Length of one float cycle.
    pub float_duration_ms: u64,
}

/// Build a bubble marker. `index` staggers the entrance and float animations
/// of neighbouring bubbles.
///
/// # Examples
/// ```
/// use wayfarer_core::marker::bubble_marker;
///
/// let bubble = bubble_marker(true, 2);
/// assert_eq!(bubble.bubble_class, "bg-bright");
/// assert_eq!(bubble.entrance_delay_ms, 160);
/// assert_eq!(bubble.float_duration_ms, 3_500);
/// ```
#[must_use]
pub fn bubble_marker(selected: bool, index: u64) -> BubbleMarker {
    let (bubble_class, icon_color_class) = if selected {
        ("bg-bright", "text-white")
    } else {
        ("bg-white border border-bright", "text-bright")
    };
    // Float durations cycle through four variants.
    let phase = index & 3;
    BubbleMarker {
        selected,
        size: BUBBLE_SIZE,
        bubble_class,
        icon_color_class,
        icon_class: BUBBLE_GLYPH,
        icon_size: [BUBBLE_SIZE, BUBBLE_SIZE],
        icon_anchor: [0, BUBBLE_SIZE],
        entrance_delay_ms: index.saturating_mul(ENTRANCE_STEP_MS),
        float_duration_ms: FLOAT_BASE_MS + phase * FLOAT_STEP_MS,
    }
}

impl BubbleMarker {
    /// Markup for the bubble.
    #[must_use]
    pub fn to_html(&self) -> String {
        let glyph = self.size >> 1;
        format!(
            "<div class=\"relative flex items-center justify-center {bubble} shadow-lg\" \
             style=\"width: {size}px; height: {size}px; border-radius: 50% 50% 50% 0; \
             transform: rotate(-45deg); animation: marker-enter 400ms ease-out {delay}ms both, \
             marker-float {float}ms ease-in-out {delay}ms infinite;\">\n    \
             <i class=\"bi {icon} {icon_color} flex items-center justify-center\" \
             style=\"transform: rotate(45deg); font-size: {glyph}px;\"></i>\n</div>",
            bubble = self.bubble_class,
            size = self.size,
            delay = self.entrance_delay_ms,
            float = self.float_duration_ms,
            icon = self.icon_class,
            icon_color = self.icon_color_class,
        )
    }
}

/// Either marker kind, chosen by [`marker_for`].
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    /// Regular POI pin.
    Pin(PinMarker),
    /// Video bubble.
    Bubble(BubbleMarker),
}

impl Marker {
    /// Markup for the marker.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            Self::Pin(pin) => pin.to_html(),
            Self::Bubble(bubble) => bubble.to_html(),
        }
    }
}

/// Pick the marker for a catalog POI: a bubble when it has video content,
/// otherwise a pin of edge `size` styled by its saved entry on the current
/// trip, if any.
#[must_use]
pub fn marker_for(
    poi: &Poi,
    saved: Option<&SavedPoi>,
    selected: bool,
    index: u64,
    size: u32,
) -> Marker {
    if poi.has_video() {
        return Marker::Bubble(bubble_marker(selected, index));
    }
    let style = match saved {
        Some(entry) => MarkerStyle {
            icon: entry
                .icon
                .as_deref()
                .or(poi.icon.as_deref())
                .unwrap_or("pin"),
            name: entry.name.as_deref().or(Some(poi.name.as_str())),
            size,
            ..MarkerStyle::for_saved(entry)
        },
        None => MarkerStyle {
            size,
            ..MarkerStyle::for_catalog(poi)
        },
    };
    Marker::Pin(pin_marker(&style))
}

/// Image marker for a location the user picked but has not saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMarker {
    /// Marker image.
    pub icon_url: &'static str,
    /// Shadow image.
    pub shadow_url: &'static str,
    /// Icon box `[width, height]`.
    pub icon_size: [i32; 2],
    /// Point of the icon placed on the coordinate.
    pub icon_anchor: [i32; 2],
    /// Popup offset from the anchor.
    pub popup_anchor: [i32; 2],
    /// Shadow box `[width, height]`.
    pub shadow_size: [i32; 2],
}

/// Grey pin shown while the user places a new POI.
#[must_use]
pub const fn temporary_marker() -> ImageMarker {
    ImageMarker {
        icon_url: "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img/marker-icon-2x-grey.png",
        shadow_url: "https://cdnjs.cloudflare.com/ajax/libs/leaflet/0.7.7/images/marker-shadow.png",
        icon_size: [25, 41],
        icon_anchor: [12, 41],
        popup_anchor: [1, -34],
        shadow_size: [41, 41],
    }
}

/// Pulsing dot marking the user's own position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserLocationMarker {
    /// Icon box `[width, height]`.
    pub icon_size: [u32; 2],
    /// Point of the icon placed on the coordinate.
    pub icon_anchor: [u32; 2],
}

/// The marker for the user's current location.
#[must_use]
pub const fn user_location_marker() -> UserLocationMarker {
    UserLocationMarker {
        icon_size: [32, 32],
        icon_anchor: [16, 16],
    }
}

impl UserLocationMarker {
    /// Markup for the dot.
    #[must_use]
    pub fn to_html(&self) -> String {
        "<div class=\"relative flex items-center justify-center w-full h-full\">\n    \
         <span class=\"absolute inline-flex w-full h-full rounded-full opacity-75 animate-ping bg-blue-400\"></span>\n    \
         <span class=\"relative inline-flex w-4 h-4 bg-blue-500 border-2 border-white rounded-full shadow-sm\"></span>\n\
         </div>"
            .to_owned()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
