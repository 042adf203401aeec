use crate::minecraft::properties::{PropertySet, parse_properties};
use once_cell::sync::Lazy;

/// Factory defaults of a vanilla server, used when a server has no `server.properties` yet.
static DEFAULT_PROPERTIES: Lazy<PropertySet> =
    Lazy::new(|| parse_properties(include_str!("../resources/server.properties")));

pub fn default_properties() -> &'static PropertySet {
    &DEFAULT_PROPERTIES
}
