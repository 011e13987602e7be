// SPDX-FileCopyrightText: 2026 Circulate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded gazetteer dataset.

/// U.S. state, district, and territory abbreviations.
pub(crate) const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("PR", "Puerto Rico"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Canadian province and territory abbreviations.
pub(crate) const CA_PROVINCES: &[(&str, &str)] = &[
    ("AB", "Alberta"),
    ("BC", "British Columbia"),
    ("MB", "Manitoba"),
    ("NB", "New Brunswick"),
    ("NL", "Newfoundland and Labrador"),
    ("NS", "Nova Scotia"),
    ("NT", "Northwest Territories"),
    ("NU", "Nunavut"),
    ("ON", "Ontario"),
    ("PE", "Prince Edward Island"),
    ("QC", "Quebec"),
    ("SK", "Saskatchewan"),
    ("YT", "Yukon"),
];

/// Zip code, city, state.
pub(crate) const US_ZIPCODES: &[(&str, &str, &str)] = &[
    ("00901", "San Juan", "PR"),
    ("02101", "Boston", "MA"),
    ("02134", "Allston", "MA"),
    ("02138", "Cambridge", "MA"),
    ("02903", "Providence", "RI"),
    ("03301", "Concord", "NH"),
    ("04101", "Portland", "ME"),
    ("05401", "Burlington", "VT"),
    ("06103", "Hartford", "CT"),
    ("06510", "New Haven", "CT"),
    ("06604", "Bridgeport", "CT"),
    ("06759", "Litchfield", "CT"),
    ("07102", "Newark", "NJ"),
    ("10001", "New York", "NY"),
    ("10027", "New York", "NY"),
    ("11201", "Brooklyn", "NY"),
    ("12207", "Albany", "NY"),
    ("15213", "Pittsburgh", "PA"),
    ("19103", "Philadelphia", "PA"),
    ("20001", "Washington", "DC"),
    ("21201", "Baltimore", "MD"),
    ("27601", "Raleigh", "NC"),
    ("30303", "Atlanta", "GA"),
    ("32801", "Orlando", "FL"),
    ("33101", "Miami", "FL"),
    ("33301", "Fort Lauderdale", "FL"),
    ("37203", "Nashville", "TN"),
    ("48226", "Detroit", "MI"),
    ("55401", "Minneapolis", "MN"),
    ("60601", "Chicago", "IL"),
    ("60614", "Chicago", "IL"),
    ("63101", "Saint Louis", "MO"),
    ("70112", "New Orleans", "LA"),
    ("73301", "Austin", "TX"),
    ("75201", "Dallas", "TX"),
    ("77002", "Houston", "TX"),
    ("80202", "Denver", "CO"),
    ("85004", "Phoenix", "AZ"),
    ("90012", "Los Angeles", "CA"),
    ("94103", "San Francisco", "CA"),
    ("94704", "Berkeley", "CA"),
    ("96813", "Honolulu", "HI"),
    ("97201", "Portland", "OR"),
    ("98101", "Seattle", "WA"),
    ("99501", "Anchorage", "AK"),
];

/// Counties and places with no zip entry above.
pub(crate) const US_PLACES: &[(&str, &str)] = &[
    ("Albany County", "NY"),
    ("Allegheny County", "PA"),
    ("Broward County", "FL"),
    ("Cook County", "IL"),
    ("Denver County", "CO"),
    ("Fairfield County", "CT"),
    ("Fulton County", "GA"),
    ("Harris County", "TX"),
    ("Hartford County", "CT"),
    ("Hennepin County", "MN"),
    ("King County", "WA"),
    ("Kings County", "NY"),
    ("Litchfield County", "CT"),
    ("Los Angeles County", "CA"),
    ("Maricopa County", "AZ"),
    ("Miami-Dade County", "FL"),
    ("Middlesex County", "MA"),
    ("Montgomery County", "MD"),
    ("Multnomah County", "OR"),
    ("New Haven County", "CT"),
    ("Orange County", "FL"),
    ("Philadelphia County", "PA"),
    ("Suffolk County", "MA"),
    ("Travis County", "TX"),
    ("Wayne County", "MI"),
];

/// Forward sortation area, place, province abbreviation.
pub(crate) const CA_FSAS: &[(&str, &str, &str)] = &[
    ("A1C", "St. John's (Downtown)", "NL"),
    ("B3H", "Halifax (South End)", "NS"),
    ("C1A", "Charlottetown (Central)", "PE"),
    ("E1C", "Moncton (Central)", "NB"),
    ("G1R", "Quebec City (Old Quebec)", "QC"),
    ("H2X", "Montreal (Plateau Mont-Royal South)", "QC"),
    ("H3A", "Montreal (Downtown)", "QC"),
    ("K1A", "Ottawa (Parliament Hill)", "ON"),
    ("K1P", "Ottawa (Centretown)", "ON"),
    ("M4C", "East York (Woodbine Heights)", "ON"),
    ("M5V", "Toronto (Harbourfront)", "ON"),
    ("R3C", "Winnipeg (Downtown)", "MB"),
    ("S4P", "Regina (Downtown)", "SK"),
    ("S7K", "Saskatoon (Central)", "SK"),
    ("T2P", "Calgary (City Centre)", "AB"),
    ("T5J", "Edmonton (Downtown)", "AB"),
    ("V5K", "Vancouver (North Hastings- Sunrise)", "BC"),
    ("V6B", "Vancouver (Downtown)", "BC"),
    ("V8W", "Victoria (Downtown)", "BC"),
    ("X0A", "Qikiqtaaluk Region", "NU"),
    ("X1A", "Yellowknife", "NT"),
    ("Y1A", "Whitehorse", "YT"),
];
