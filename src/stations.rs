/// Station registry for the Harris County rainfall service.
///
/// Defines the fixed list of Harris County Flood Warning System gages
/// exposed by `/locations`. This is the single source of truth for station
/// ids; other modules reference stations from here rather than hardcoding
/// ids.

use std::collections::BTreeMap;

/// Station used by `/rainfall` when no `location` parameter is supplied.
pub const DEFAULT_LOCATION_ID: &str = "590";

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// Metadata for a single FWS rainfall gage.
pub struct Station {
    /// FWS gage id (numeric string).
    pub site_id: &'static str,
    /// Descriptive name, "<channel> @ <crossing>".
    pub name: &'static str,
    /// Watershed the gage drains to.
    pub watershed: &'static str,
}

/// All FWS gages offered to spreadsheet clients, grouped by watershed.
pub static STATION_REGISTRY: &[Station] = &[
    Station {
        site_id: "520",
        name: "White Oak Bayou @ Heights Boulevard",
        watershed: "White Oak Bayou",
    },
    Station {
        site_id: "530",
        name: "White Oak Bayou @ Ella Boulevard",
        watershed: "White Oak Bayou",
    },
    Station {
        site_id: "540",
        name: "White Oak Bayou @ Alabonson Road",
        watershed: "White Oak Bayou",
    },
    Station {
        site_id: "550",
        name: "White Oak Bayou @ Lakeview Drive",
        watershed: "White Oak Bayou",
    },
    Station {
        site_id: "590",
        name: "Cole Creek @ Deihl Road",
        watershed: "White Oak Bayou",
    },
    Station {
        site_id: "430",
        name: "Brays Bayou @ Stella Link Road",
        watershed: "Brays Bayou",
    },
    Station {
        site_id: "440",
        name: "Brays Bayou @ Rice Avenue",
        watershed: "Brays Bayou",
    },
    Station {
        site_id: "460",
        name: "Brays Bayou @ Gessner Road",
        watershed: "Brays Bayou",
    },
    Station {
        site_id: "480",
        name: "Keegans Bayou @ Roark Road",
        watershed: "Brays Bayou",
    },
    Station {
        site_id: "490",
        name: "Keegans Bayou @ Keegan Road",
        watershed: "Brays Bayou",
    },
];

/// Returns the ids of all registered stations in registry order.
pub fn all_site_ids() -> Vec<&'static str> {
    STATION_REGISTRY.iter().map(|s| s.site_id).collect()
}

/// Looks up a station by id. Returns `None` if not found.
pub fn find_station(site_id: &str) -> Option<&'static Station> {
    STATION_REGISTRY.iter().find(|s| s.site_id == site_id)
}

/// "<name>, <watershed> watershed" for registered stations, used in logs
/// and CLI output.
pub fn describe_location(site_id: &str) -> String {
    match find_station(site_id) {
        Some(station) => format!("{}, {} watershed", station.name, station.watershed),
        None => "unregistered gage".to_string(),
    }
}

/// The id → name directory served by `/locations`.
pub fn station_directory() -> BTreeMap<&'static str, &'static str> {
    STATION_REGISTRY
        .iter()
        .map(|s| (s.site_id, s.name))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
