use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Column names used by the listing sheet.
pub mod fields {
    pub const LINK: &str = "link";
    pub const ACTIVE: &str = "activo";
    pub const ADDRESS: &str = "direccion";
    pub const NEIGHBORHOOD: &str = "barrio";
    pub const PRICE: &str = "precio";
    pub const COVERED_AREA: &str = "m2_cub";
    pub const TOTAL_AREA: &str = "m2_tot";
    pub const UNCOVERED_AREA: &str = "m2_desc";
    pub const UNCOVERED_AREA_LEGACY: &str = "m2_terr";
    pub const CREDIT_ELIGIBLE: &str = "apto_credito";
    pub const AGENCY: &str = "inmobiliaria";
    pub const PUBLISHED_ON: &str = "fecha_publicado";
    pub const TERRACE: &str = "terraza";
    pub const BALCONY: &str = "balcon";
    pub const ELEVATOR: &str = "ascensor";
    pub const LIGHT: &str = "luminosidad";
    pub const GARAGES: &str = "cocheras";
    pub const ROOMS: &str = "amb";
    pub const BATHROOMS: &str = "banos";
    pub const AGE: &str = "antiguedad";
    pub const MONTHLY_FEE: &str = "expensas";
    pub const DISPOSITION: &str = "disposicion";

    /// Derived field resolved from the normalized area instead of a raw cell.
    pub const DERIVED_AREA: &str = "area";
}

/// One listing row as received from the sheet sync. Missing cells read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawListingRecord {
    fields: BTreeMap<String, String>,
}

impl RawListingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Trimmed cell value, empty when the column is absent.
    pub fn get(&self, field: &str) -> &str {
        self.fields.get(field).map(|value| value.trim()).unwrap_or("")
    }

    /// First non-empty value among the given columns.
    pub fn first_present(&self, candidates: &[&str]) -> &str {
        candidates
            .iter()
            .map(|field| self.get(field))
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.fields.values().all(|value| value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawListingRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self { fields }
    }
}

/// Neighborhood benchmark price per square meter. Lookups are exact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferencePriceTable {
    prices: BTreeMap<String, f64>,
}

impl ReferencePriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, neighborhood: impl Into<String>, price_per_area: f64) {
        self.prices.insert(neighborhood.into(), price_per_area);
    }

    pub fn with(mut self, neighborhood: impl Into<String>, price_per_area: f64) -> Self {
        self.insert(neighborhood, price_per_area);
        self
    }

    pub fn lookup(&self, neighborhood: &str) -> Option<f64> {
        self.prices.get(neighborhood).copied()
    }

    /// Overlays `other` on top of this table, replacing shared neighborhoods.
    pub fn merge(&mut self, other: ReferencePriceTable) {
        self.prices.extend(other.prices);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Whether the seller accepts a mortgage-financed purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditEligibility {
    Yes,
    No,
    Unknown,
}

impl CreditEligibility {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yes => "Credit OK",
            Self::No => "No credit",
            Self::Unknown => "Credit unknown",
        }
    }
}

/// Typed view of a listing derived from its raw cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProperty {
    pub address: String,
    pub neighborhood: String,
    pub link: String,
    pub has_link: bool,
    pub is_active: bool,
    pub credit: CreditEligibility,
    pub has_agency_fee: bool,
    pub price: f64,
    pub covered_area: f64,
    pub total_area: f64,
    pub uncovered_area: f64,
    pub area: f64,
    pub price_per_area: f64,
    pub reference_price: Option<f64>,
    pub variance_vs_reference: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_listed: Option<i64>,
}
