use std::io::Write;

use tempfile::NamedTempFile;
use tracing::info;

use super::{Catalog, Property, error::Result};

/// Built-in sample catalogs for tests, demos and local development.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleCatalog {
    /// A single property in Udaipur.
    Minimal,
    /// A spread of properties across northern and western India.
    Sample,
}

const SAMPLE_PROPERTIES: &[(&str, f64, f64)] = &[
    ("Moustache Udaipur Luxuria", 24.57799888, 73.68263271),
    ("Moustache Udaipur", 24.58145726, 73.68223671),
    ("Moustache Udaipur Verandah", 24.58350565, 73.68399235),
    ("Moustache Jaipur", 27.29124839, 75.89630143),
    ("Moustache Jaisalmer", 27.20578572, 70.85906998),
    ("Moustache Jodhpur", 26.30365556, 73.03570908),
    ("Moustache Agra", 27.26156953, 78.07524716),
    ("Moustache Delhi", 28.61257139, 77.28423582),
    ("Moustache Rishikesh Luxuria", 30.13769036, 78.32465767),
    ("Moustache Rishikesh Riverside Resort", 30.10216117, 78.38458848),
    ("Moustache Hostel Varanasi", 25.2992622, 82.99691388),
    ("Moustache Goa Luxuria", 15.6135195, 73.75705228),
    ("Moustache Koksar Luxuria", 32.4357785, 77.18518717),
    ("Moustache Daman", 20.41486263, 72.83282455),
    ("Panarpani Retreat", 22.52805539, 78.43116291),
    ("Moustache Pushkar", 26.48460064, 74.5757422),
    ("Moustache Khajuraho", 24.83176347, 79.93386053),
    ("Moustache Manali", 32.28105401, 77.18335063),
    ("Moustache Bhimtal Luxuria", 29.36012414, 79.55908205),
    ("Moustache Srinagar", 34.11444262, 74.8721776),
    ("Moustache Ranthambore Luxuria", 26.05973398, 76.42459202),
    ("Moustache Coimbatore", 11.0309542, 77.0290086),
    ("Moustache Shoja", 31.56720631, 77.37021976),
];

impl SampleCatalog {
    pub fn properties(self) -> Vec<Property> {
        let rows = match self {
            Self::Minimal => &SAMPLE_PROPERTIES[1..2],
            Self::Sample => SAMPLE_PROPERTIES,
        };
        rows.iter()
            .map(|&(name, latitude, longitude)| Property::new(name, latitude, longitude))
            .collect()
    }

    pub fn catalog(self) -> Catalog {
        Catalog::new(self.properties())
    }
}

/// Write a sample catalog to a temporary CSV file in the same format
/// [`Catalog::from_csv`] reads.
pub fn write_sample_csv(sample: SampleCatalog) -> Result<NamedTempFile> {
    info!("Writing {:?} catalog to a temporary CSV file", sample);
    let mut file = NamedTempFile::with_suffix(".csv")?;
    writeln!(file, "property,latitude,longitude")?;
    for property in sample.properties() {
        writeln!(
            file,
            "{},{},{}",
            property.name, property.latitude, property.longitude
        )?;
    }
    file.flush()?;
    Ok(file)
}
