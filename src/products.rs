//! Products

use std::{
    collections::HashSet,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category assigned to catalog rows that arrive without one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Catalog-unique product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wrap a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for ProductId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product identifier
    pub id: ProductId,

    /// Display name
    pub name: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Image URI
    #[serde(default)]
    pub image: String,

    /// Category label
    pub category: String,

    /// Pieces per carton, when the product ships in cartons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pieces_per_carton: Option<u32>,

    /// Stock keeping unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
}

impl Product {
    /// Whether the product satisfies the catalog rules: a non-zero id, a name and a
    /// positive price.
    pub fn is_valid(&self) -> bool {
        self.id.get() > 0 && !self.name.trim().is_empty() && self.price > Decimal::ZERO
    }

    /// Coerce one loosely-typed catalog row into a product.
    ///
    /// Returns `None` for rows without a positive `id`, a non-empty `name` or a
    /// positive `price`. Optional fields that cannot be coerced are dropped rather
    /// than rejecting the row.
    pub fn from_catalog_row(row: &Value) -> Option<Self> {
        let fields = row.as_object()?;

        let id = positive_integer(fields.get("id")?)?;
        let name = text(fields, "name")?;
        let price = decimal(fields.get("price")?).filter(|price| *price > Decimal::ZERO)?;

        Some(Self {
            id: ProductId(id),
            name,
            price,
            image: text(fields, "image").unwrap_or_default(),
            category: text(fields, "category")
                .filter(|category| !category.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            pieces_per_carton: fields
                .get("piecesPerCarton")
                .and_then(positive_integer)
                .and_then(|pieces| u32::try_from(pieces).ok()),
            sku: text(fields, "sku").filter(|sku| !sku.trim().is_empty()),
        })
    }
}

/// Outcome of coercing a catalog payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCatalog {
    /// Valid products with unique ids, in catalog order
    pub products: Vec<Product>,

    /// Number of rows that failed validation
    pub rejected: usize,

    /// Ids of valid rows dropped because an earlier row already used the id
    pub duplicates: Vec<ProductId>,
}

/// Coerce a catalog payload into products, skipping rows that fail validation.
///
/// When several rows share an id only the first is kept. Anything other than a JSON
/// array yields an empty catalog.
pub fn parse_catalog_rows(payload: &Value) -> ParsedCatalog {
    let mut parsed = ParsedCatalog::default();
    let mut seen = HashSet::new();

    for row in payload.as_array().map(Vec::as_slice).unwrap_or_default() {
        match Product::from_catalog_row(row) {
            Some(product) if seen.insert(product.id) => parsed.products.push(product),
            Some(product) => parsed.duplicates.push(product.id),
            None => parsed.rejected += 1,
        }
    }

    parsed
}

/// Valid products from a catalog payload; see [`parse_catalog_rows`].
pub fn parse_catalog(payload: &Value) -> Vec<Product> {
    parse_catalog_rows(payload).products
}

fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(value) if !value.is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

fn decimal(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(number) => number.to_string(),
        Value::String(string) => string.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&raw)
        .or_else(|_err| Decimal::from_scientific(&raw))
        .ok()
}

fn positive_integer(value: &Value) -> Option<u64> {
    let value = decimal(value)?;

    if value <= Decimal::ZERO || !value.fract().is_zero() {
        return None;
    }

    value.to_u64()
}
