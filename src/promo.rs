//! Promotional image feed
//!
//! The storefront banner comes from a published spreadsheet: the first cell of the
//! CSV export holds the image URL.

/// Image URL from the first cell of a CSV export, if that cell is an http(s) URL.
pub fn promo_image_from_csv(csv: &str) -> Option<String> {
    let first_row = csv.lines().next()?;
    let first_cell = first_row.split(',').next()?.trim().trim_matches('"');

    first_cell
        .starts_with("http")
        .then(|| first_cell.to_string())
}
