use shared::domain::Location;

use crate::id::location_id;

pub fn united_states() -> Location {
    Location {
        id: location_id("US"),
        name: "Brooklyn".into(),
        displayable_name: "Brooklyn, NY".into(),
        country: "US".into(),
        state: Some("NY".into()),
        expanded_country: "United States".into(),
    }
}

pub fn germany() -> Location {
    Location {
        id: location_id("DE"),
        name: "Berlin".into(),
        displayable_name: "Berlin, Germany".into(),
        country: "DE".into(),
        state: Some("Berlin".into()),
        expanded_country: "Germany".into(),
    }
}

pub fn mexico() -> Location {
    Location {
        id: location_id("MX"),
        name: "Mexico City".into(),
        displayable_name: "Mexico City, Mexico".into(),
        country: "MX".into(),
        state: Some("Mexico City".into()),
        expanded_country: "Mexico".into(),
    }
}
