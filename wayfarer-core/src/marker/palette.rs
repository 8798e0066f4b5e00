//! Static lookup tables for marker icons and colours.

/// Icon class used for unknown icon ids.
pub const FALLBACK_ICON_CLASS: &str = "bi-geo-alt-fill";

/// Colour used for unknown palette keys.
pub const FALLBACK_COLOR: &str = "#555555";

const ICONS: &[(&str, &str)] = &[
    ("museum", "bi-bank2"),
    ("park", "bi-tree-fill"),
    ("restaurant", "bi-fork-knife"),
    ("food", "bi-egg-fried"),
    ("landmark", "bi-buildings-fill"),
    ("square", "bi-geo-alt-fill"),
    ("pin", "bi-geo-alt-fill"),
    ("home", "bi-house-door-fill"),
    ("star", "bi-star-fill"),
    ("flag", "bi-flag-fill"),
    ("heart", "bi-heart-fill"),
    ("camera", "bi-camera-fill"),
    ("parking", "bi-p-circle-fill"),
    ("shopping", "bi-bag-fill"),
    ("hotel", "bi-building-fill"),
    ("cafe", "bi-cup-fill"),
    ("theater", "bi-film"),
    ("school", "bi-mortarboard-fill"),
    ("hospital", "bi-h-circle-fill"),
    ("cash", "bi-cash-coin"),
    ("gas", "bi-fuel-pump-fill"),
    ("airport", "bi-airplane-fill"),
    ("train", "bi-train-front-fill"),
    ("bus", "bi-bus-front-fill"),
    ("bicycle", "bi-bicycle"),
    ("walking", "bi-person-walking"),
    ("car", "bi-car-front-fill"),
];

const COLORS: &[(&str, &str)] = &[
    ("red", "#f36a73"),
    ("orange", "#f0a46f"),
    ("green", "#64b350"),
    ("cyan", "#83a9eb"),
    ("dark", "#66555F"),
    ("gray", "#8f8f8f"),
    ("blue", "#4a90e2"),
    ("purple", "#9b59b6"),
    ("pink", "#ff69b4"),
    ("brown", "#a0522d"),
];

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, value)| *value)
}

/// Bootstrap Icons class for `icon_id`, or [`FALLBACK_ICON_CLASS`].
///
/// # Examples
/// ```
/// use wayfarer_core::marker::icon_class;
///
/// assert_eq!(icon_class("museum"), "bi-bank2");
/// assert_eq!(icon_class("volcano"), "bi-geo-alt-fill");
/// ```
#[must_use]
pub fn icon_class(icon_id: &str) -> &'static str {
    lookup(ICONS, icon_id).unwrap_or(FALLBACK_ICON_CLASS)
}

/// Hex colour for palette key `color_id`, or [`FALLBACK_COLOR`].
///
/// # Examples
/// ```
/// use wayfarer_core::marker::color_value;
///
/// assert_eq!(color_value("gray"), "#8f8f8f");
/// assert_eq!(color_value("#123456"), "#555555");
/// ```
#[must_use]
pub fn color_value(color_id: &str) -> &'static str {
    lookup(COLORS, color_id).unwrap_or(FALLBACK_COLOR)
}

/// Every known icon id, in palette order.
#[must_use]
pub fn icon_ids() -> impl Iterator<Item = &'static str> {
    ICONS.iter().map(|(id, _)| *id)
}

/// Every known palette key, in palette order.
#[must_use]
pub fn color_ids() -> impl Iterator<Item = &'static str> {
    COLORS.iter().map(|(id, _)| *id)
}
