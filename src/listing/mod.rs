//! Listing data model
//!
//! One [`Listing`] struct serves both directions: it decodes records from
//! the paginated index API and serializes the final output file, so the
//! serde renames below are the source's exact JSON field names. Fields the
//! crawler derives itself (timestamp, administrative split, detail-page
//! enrichment) have no index-API counterpart and fall back to their
//! defaults during decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize;

/// One real-estate record.
///
/// The identity field is the source-assigned reference ID; it is unique
/// within one crawl but not guaranteed unique across sites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Listing {
    #[serde(rename = "ContractNumber", default)]
    pub id: String,

    #[serde(rename = "Title", default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub summary: String,

    /// Raw sold/active flag. The source encodes this as a string with more
    /// states than a boolean ("True", "False", empty), so it stays raw.
    #[serde(rename = "Sold", default)]
    pub is_sold: String,

    /// Stamped once, when the index stage decodes the record.
    #[serde(default)]
    pub crawled_at: Option<DateTime<Utc>>,

    /// Raw price from the index feed, replaced by the normalized value (or
    /// the "Unknown" sentinel) when the detail stage finds a price entry.
    #[serde(rename = "PriceCurrencyFormated", default)]
    pub price: String,

    #[serde(default)]
    pub property_type: String,

    // Geocoordinates are kept as raw strings; the source occasionally emits
    // empty or locale-formatted values and no consumer needs numbers here.
    #[serde(default)]
    pub latitude: String,

    #[serde(default)]
    pub longitude: String,

    /// Site-relative detail page path.
    #[serde(rename = "URLSEOv2", default)]
    pub url: String,

    #[serde(rename = "Photo", default)]
    pub photo_url: String,

    /// Raw concatenated administrative string the derived fields are split
    /// from.
    #[serde(default)]
    pub full_location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parish: Option<String>,

    #[serde(default)]
    pub bedrooms: String,

    #[serde(default)]
    pub bathrooms: String,

    #[serde(rename = "AreaGross", default)]
    pub gross_area: String,

    #[serde(rename = "AreaNet", default)]
    pub net_area: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_certificate: Option<String>,

    #[serde(default)]
    pub parking_spaces: u32,

    #[serde(default)]
    pub amenities: Vec<String>,
}

impl Listing {
    /// Appends an amenity in document order. Duplicates are kept: the
    /// sequence mirrors the source markup, it is not a set.
    pub fn add_amenity(&mut self, amenity: impl Into<String>) {
        self.amenities.push(amenity.into());
    }

    /// Derives district/county/parish from the raw location string.
    ///
    /// Called exactly once per listing, after index decode and before the
    /// record enters the result collection, so these fields never race with
    /// detail-stage mutation.
    pub fn derive_administrative(&mut self) {
        let area = normalize::split_administrative(&self.full_location);
        self.district = area.district;
        self.county = area.county;
        self.parish = area.parish;
    }
}

/// Envelope of one index page response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchEnvelope {
    #[serde(default)]
    pub searched_location: String,

    #[serde(default)]
    pub reference_id: String,

    #[serde(default)]
    pub properties_per_page: u32,

    #[serde(default)]
    pub properties_count: u32,

    #[serde(default)]
    pub current_page: u32,

    #[serde(default)]
    pub total_pages: u32,

    #[serde(default)]
    pub level_search: String,

    #[serde(default)]
    pub location_display_filteredby_level: String,

    #[serde(default)]
    pub properties: Vec<Listing>,
}

/// Paging metadata decoded on its own from an index page body, only to
/// decide whether the next page gets scheduled. Never persisted.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PagingInfo {
    #[serde(default)]
    pub current_page: u32,

    #[serde(default)]
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RECORD: &str = r#"{
        "ContractNumber": "C21-1234",
        "Title": "Apartamento T2",
        "Description": "Apartamento com vista",
        "Sold": "False",
        "PriceCurrencyFormated": "350.000€",
        "PropertyType": "Apartamento",
        "Latitude": "38.72",
        "Longitude": "-9.14",
        "URLSEOv2": "comprar-apartamento-lisboa",
        "Photo": "https://img.example/1.jpg",
        "FullLocation": "Rua A, Lisboa (distrito), Sintra (concelho)",
        "Bedrooms": "2",
        "Bathrooms": "1",
        "AreaGross": "90",
        "AreaNet": "80"
    }"#;

    #[test]
    fn decodes_index_api_field_names() {
        let listing: Listing = serde_json::from_str(SAMPLE_RECORD).unwrap();

        assert_eq!(listing.id, "C21-1234");
        assert_eq!(listing.name, "Apartamento T2");
        assert_eq!(listing.is_sold, "False");
        assert_eq!(listing.price, "350.000€");
        assert_eq!(listing.url, "comprar-apartamento-lisboa");
        assert_eq!(listing.photo_url, "https://img.example/1.jpg");
        assert_eq!(listing.full_location, "Rua A, Lisboa (distrito), Sintra (concelho)");
        assert_eq!(listing.gross_area, "90");
        assert_eq!(listing.net_area, "80");
        assert!(listing.crawled_at.is_none());
        assert!(listing.district.is_none());
        assert!(listing.amenities.is_empty());
    }

    #[test]
    fn serializes_under_alias_names() {
        let listing: Listing = serde_json::from_str(SAMPLE_RECORD).unwrap();
        let json = serde_json::to_value(&listing).unwrap();

        assert_eq!(json["ContractNumber"], "C21-1234");
        assert_eq!(json["Title"], "Apartamento T2");
        assert_eq!(json["Sold"], "False");
        assert_eq!(json["PriceCurrencyFormated"], "350.000€");
        assert_eq!(json["URLSEOv2"], "comprar-apartamento-lisboa");
        assert_eq!(json["Photo"], "https://img.example/1.jpg");
        assert_eq!(json["FullLocation"], "Rua A, Lisboa (distrito), Sintra (concelho)");
        assert_eq!(json["AreaGross"], "90");
        assert_eq!(json["AreaNet"], "80");
        // Unaliased fields serialize under their natural PascalCase names
        assert_eq!(json["ParkingSpaces"], 0);
        assert!(json["Amenities"].as_array().unwrap().is_empty());
    }

    #[test]
    fn absent_optionals_are_skipped() {
        let listing = Listing::default();
        let json = serde_json::to_value(&listing).unwrap();

        assert!(json.get("District").is_none());
        assert!(json.get("County").is_none());
        assert!(json.get("Parish").is_none());
        assert!(json.get("EnergyCertificate").is_none());
    }

    #[test]
    fn amenities_are_not_deduplicated() {
        let mut listing = Listing::default();
        listing.add_amenity("Piscina");
        listing.add_amenity("Piscina");

        assert_eq!(listing.amenities, vec!["Piscina", "Piscina"]);
    }

    #[test]
    fn derive_administrative_populates_split_fields() {
        let mut listing: Listing = serde_json::from_str(SAMPLE_RECORD).unwrap();
        listing.derive_administrative();

        assert_eq!(listing.district.as_deref(), Some("Lisboa "));
        assert_eq!(listing.county.as_deref(), Some("Sintra "));
        assert_eq!(listing.parish, None);
        // The raw string is retained alongside the derived fields
        assert_eq!(listing.full_location, "Rua A, Lisboa (distrito), Sintra (concelho)");
    }

    #[test]
    fn envelope_decodes_paging_and_records() {
        let body = format!(
            r#"{{
                "SearchedLocation": "Lisboa",
                "ReferenceId": "ref-1",
                "PropertiesPerPage": 12,
                "PropertiesCount": 30,
                "CurrentPage": 1,
                "TotalPages": 3,
                "LevelSearch": "district",
                "LocationDisplayFilteredbyLevel": "Lisboa",
                "Properties": [{SAMPLE_RECORD}]
            }}"#
        );

        let envelope: SearchEnvelope = serde_json::from_str(&body).unwrap();
        assert_eq!(envelope.current_page, 1);
        assert_eq!(envelope.total_pages, 3);
        assert_eq!(envelope.properties.len(), 1);

        let paging: PagingInfo = serde_json::from_str(&body).unwrap();
        assert_eq!(paging.current_page, 1);
        assert_eq!(paging.total_pages, 3);
    }
}
