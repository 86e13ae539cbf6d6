use super::domain::Country;

/// Accepted region values when the applicant lives in the United States.
pub const US_STATES: [&str; 50] = [
    "Alabama",
    "Alaska",
    "Arizona",
    "Arkansas",
    "California",
    "Colorado",
    "Connecticut",
    "Delaware",
    "Florida",
    "Georgia",
    "Hawaii",
    "Idaho",
    "Illinois",
    "Indiana",
    "Iowa",
    "Kansas",
    "Kentucky",
    "Louisiana",
    "Maine",
    "Maryland",
    "Massachusetts",
    "Michigan",
    "Minnesota",
    "Mississippi",
    "Missouri",
    "Montana",
    "Nebraska",
    "Nevada",
    "New Hampshire",
    "New Jersey",
    "New Mexico",
    "New York",
    "North Carolina",
    "North Dakota",
    "Ohio",
    "Oklahoma",
    "Oregon",
    "Pennsylvania",
    "Rhode Island",
    "South Carolina",
    "South Dakota",
    "Tennessee",
    "Texas",
    "Utah",
    "Vermont",
    "Virginia",
    "Washington",
    "West Virginia",
    "Wisconsin",
    "Wyoming",
];

/// How the region field is entered for a given country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionInput {
    /// Letters-only text; disabled until a country is chosen.
    FreeText { enabled: bool },
    /// Exact match against a closed list.
    Enumerated(&'static [&'static str]),
}

impl RegionInput {
    pub fn for_country(country: Option<Country>) -> Self {
        match country {
            Some(Country::UnitedStates) => RegionInput::Enumerated(&US_STATES),
            Some(Country::Poland | Country::Germany) => RegionInput::FreeText { enabled: true },
            None => RegionInput::FreeText { enabled: false },
        }
    }

    pub fn accepts_listed(&self, value: &str) -> bool {
        match self {
            RegionInput::Enumerated(options) => options.contains(&value),
            RegionInput::FreeText { .. } => false,
        }
    }
}

/// Example values shown in empty address inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressPlaceholders {
    pub country: &'static str,
    pub voivodeship: &'static str,
    pub city: &'static str,
    pub zip_code: &'static str,
    pub address_line1: &'static str,
    pub address_line2: &'static str,
}

impl AddressPlaceholders {
    /// Polish examples are the fallback while no country is selected.
    pub fn for_country(country: Option<Country>) -> Self {
        let country_label = Country::Poland.label();
        match country {
            Some(Country::UnitedStates) => Self {
                country: country_label,
                voivodeship: "California",
                city: "San Francisco",
                zip_code: "94105",
                address_line1: "1600 Market St",
                address_line2: "Suite 200",
            },
            Some(Country::Germany) => Self {
                country: country_label,
                voivodeship: "Nordrhein-Westfalen",
                city: "Köln",
                zip_code: "50667",
                address_line1: "Hohe Straße 52",
                address_line2: "2. Etage",
            },
            Some(Country::Poland) | None => Self {
                country: country_label,
                voivodeship: "Mazowieckie",
                city: "Warszawa",
                zip_code: "00-950",
                address_line1: "ul. Marszałkowska 100",
                address_line2: "lok. 5",
            },
        }
    }
}
