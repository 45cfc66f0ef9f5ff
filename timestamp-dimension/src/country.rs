use std::collections::HashSet;
use std::fmt::Display;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::error::{Error, Result, UnknownCountryCode};

/// ISO 3166-1 alpha-2 code of a country with a public holiday calendar.
///
/// Any country known by the holiday database of `opening-hours` is accepted. Ordering follows the
/// lexicographic order of codes, which is the order rows of a dimension table are sorted by.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Country([u8; 2]);

impl Country {
    pub const DE: Self = Self(*b"DE");
    pub const ES: Self = Self(*b"ES");
    pub const FR: Self = Self(*b"FR");
    pub const IT: Self = Self(*b"IT");
    pub const NL: Self = Self(*b"NL");
    pub const PT: Self = Self(*b"PT");

    /// ISO 3166-1 alpha-2 code of this country.
    ///
    /// ```
    /// use timestamp_dimension::country::Country;
    ///
    /// assert_eq!(Country::NL.code(), "NL");
    /// ```
    pub fn code(&self) -> &str {
        // Only ASCII letters are accepted at parse time.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Matching country of the holiday database.
    pub(crate) fn region(self) -> Result<opening_hours::localization::Country, UnknownCountryCode> {
        self.code()
            .parse()
            .map_err(|_| UnknownCountryCode(self.code().to_string()))
    }
}

impl std::fmt::Debug for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Country::{}", self.code())
    }
}

impl Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Country {
    type Err = UnknownCountryCode;

    /// Parse an ISO code, ignoring case.
    ///
    /// ```
    /// use timestamp_dimension::country::Country;
    ///
    /// assert_eq!("pt".parse::<Country>(), Ok(Country::PT));
    /// assert_eq!("GB".parse::<Country>().unwrap().code(), "GB");
    /// assert!("XX".parse::<Country>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownCountryCode(s.to_string());
        let code = s.trim().to_ascii_uppercase();

        let bytes: [u8; 2] = code.as_bytes().try_into().map_err(|_| unknown())?;

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(unknown());
        }

        let country = Self(bytes);
        country.region().map_err(|_| unknown())?;
        Ok(country)
    }
}

// --
// -- Profiles
// --

/// A country as it appears in the dimension table: its code, a display name and the timezone its
/// local time is computed in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountryProfile {
    country: Country,
    display_name: String,
    timezone: Tz,
}

impl CountryProfile {
    pub fn new(country: Country, display_name: impl Into<String>, timezone: Tz) -> Self {
        Self { country, display_name: display_name.into(), timezone }
    }

    /// Build a profile from raw identifiers, failing on unknown country codes or timezones.
    ///
    /// ```
    /// use timestamp_dimension::country::{Country, CountryProfile};
    ///
    /// let profile = CountryProfile::parse("FR", "France", "Europe/Paris").unwrap();
    /// assert_eq!(profile.country(), Country::FR);
    /// assert_eq!(profile.timezone(), chrono_tz::Europe::Paris);
    ///
    /// assert!(CountryProfile::parse("FR", "France", "Europe/Atlantis").is_err());
    /// ```
    pub fn parse(code: &str, display_name: &str, timezone: &str) -> Result<Self> {
        let country = code.parse::<Country>()?;

        let timezone = timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| Error::UnknownTimezone(timezone.to_string()))?;

        Ok(Self::new(country, display_name.trim(), timezone))
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

/// A non-empty list of country profiles without duplicates, kept in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountrySet(Vec<CountryProfile>);

impl CountrySet {
    pub fn new(profiles: Vec<CountryProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(Error::NoCountries);
        }

        let mut seen = HashSet::new();

        for profile in &profiles {
            if !seen.insert(profile.country) {
                return Err(Error::DuplicateCountry(profile.country));
            }
        }

        Ok(Self(profiles))
    }

    /// Parse a list of profiles from CSV lines formatted as `code,name,timezone`. Empty lines and
    /// lines starting with `#` are ignored.
    ///
    /// ```
    /// use timestamp_dimension::country::{Country, CountrySet};
    ///
    /// let raw = "# code,name,timezone\nBE,Belgium,Europe/Brussels\nAT,Austria,Europe/Vienna\n";
    /// let countries = CountrySet::from_reader(raw.as_bytes()).unwrap();
    ///
    /// let codes: Vec<_> = countries.iter().map(|p| p.country().to_string()).collect();
    /// assert_eq!(codes, ["BE", "AT"]);
    /// ```
    pub fn from_reader(reader: impl io::Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut profiles = Vec::new();

        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();

            if record.len() != 3 {
                return Err(Error::InvalidProfile {
                    line: line as usize,
                    reason: format!("expected 3 fields, found {}", record.len()),
                });
            }

            let [code, name, timezone] = [0, 1, 2].map(|i| record.get(i).unwrap_or_default());

            let profile = CountryProfile::parse(code, name, timezone).map_err(|err| {
                Error::InvalidProfile { line: line as usize, reason: err.to_string() }
            })?;

            profiles.push(profile);
        }

        Self::new(profiles)
    }

    /// Load a list of profiles from a file, see [`CountrySet::from_reader`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io { path: path.into(), source })?;
        Self::from_reader(io::BufReader::new(file))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CountryProfile> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the profile configured for a country.
    pub fn get(&self, country: Country) -> Option<&CountryProfile> {
        self.0.iter().find(|profile| profile.country == country)
    }
}

impl Default for CountrySet {
    /// The six western European countries of the reference table.
    fn default() -> Self {
        use chrono_tz::Europe;

        Self(vec![
            CountryProfile::new(Country::PT, "Portugal", Europe::Lisbon),
            CountryProfile::new(Country::NL, "Netherlands", Europe::Amsterdam),
            CountryProfile::new(Country::FR, "France", Europe::Paris),
            CountryProfile::new(Country::ES, "Spain", Europe::Madrid),
            CountryProfile::new(Country::DE, "Germany", Europe::Berlin),
            CountryProfile::new(Country::IT, "Italy", Europe::Rome),
        ])
    }
}

impl<'a> IntoIterator for &'a CountrySet {
    type Item = &'a CountryProfile;
    type IntoIter = std::slice::Iter<'a, CountryProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
