//! Property catalog for the staypoint location search library.
//!
//! A [`Catalog`] is the fixed set of named properties with known coordinates.
//! It is loaded once, usually from a CSV file with the columns
//! `property,latitude,longitude`, and is read-only afterwards.

use std::path::Path;

use itertools::izip;
use polars::prelude::*;
use tracing::{info, instrument};

mod error;
pub mod test_data;

pub use error::{CatalogError, Result};
pub use test_data::{SampleCatalog, write_sample_csv};

const PROPERTY_SCHEMA: [(PlSmallStr, DataType); 3] = [
    (PlSmallStr::from_static("property"), DataType::String),
    (PlSmallStr::from_static("latitude"), DataType::Float64),
    (PlSmallStr::from_static("longitude"), DataType::Float64),
];

/// A single named geo-point.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Property {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// `(latitude, longitude)`
    pub fn coordinates(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Ordered, immutable collection of properties in source order.
///
/// Coordinates are assumed to be valid; the catalog does not range-check them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    properties: Vec<Property>,
}

impl Catalog {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    /// Load a catalog from a CSV file with a `property,latitude,longitude` header.
    ///
    /// Rows keep the order they have in the file. A row with a missing value or a
    /// blank property name fails the whole load.
    #[instrument(name = "Load property catalog", level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let t_load = std::time::Instant::now();

        let df = LazyCsvReader::new(path.as_ref())
            .with_has_header(true)
            .with_schema(Some(Schema::from_iter(PROPERTY_SCHEMA).into()))
            .finish()?
            .select([col("property"), col("latitude"), col("longitude")])
            .collect()?;

        let catalog = Self::from_df(df)?;

        info!(
            properties = catalog.len(),
            elapsed_seconds = ?t_load.elapsed(),
            "Property catalog loaded"
        );
        Ok(catalog)
    }

    fn from_df(df: DataFrame) -> Result<Self> {
        let cols = df.take_columns();

        let properties = izip!(cols[0].str()?, cols[1].f64()?, cols[2].f64()?)
            .enumerate()
            .map(|(row, (name, latitude, longitude))| {
                let name = name.ok_or(CatalogError::MissingField {
                    row,
                    column: "property",
                })?;
                let name = name.trim();
                if name.is_empty() {
                    return Err(CatalogError::EmptyName { row });
                }
                Ok(Property {
                    name: name.to_owned(),
                    latitude: latitude.ok_or(CatalogError::MissingField {
                        row,
                        column: "latitude",
                    })?,
                    longitude: longitude.ok_or(CatalogError::MissingField {
                        row,
                        column: "longitude",
                    })?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { properties })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl FromIterator<Property> for Catalog {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
