//! Per-site crawl profiles
//!
//! The pipeline itself is site-agnostic: endpoints, CSS selectors and the
//! attribute label routing live in a [`SiteProfile`] value. Adding a site
//! means writing a profile (and a [`crate::crawler::Crawler`] variant), not
//! touching the stages.

pub mod century21;

/// Listing field a labeled detail-page attribute routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeField {
    Price,
    EnergyCertificate,
    ParkingSpaces,
}

/// Everything site-specific the pipeline needs for one crawl.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    /// Stable crawler name, also the output artifact's basename
    pub name: &'static str,

    /// Scheme + host the site is served from
    pub website: String,

    /// Path of the paginated index endpoint
    pub index_endpoint: String,

    /// Query string for the index endpoint with a `{page}` placeholder
    pub index_params: String,

    /// Hosts the fetch client is allowed to touch
    pub allowed_domains: Vec<String>,

    /// Selector matching the amenities list container
    pub amenities_selector: String,

    /// Selector matching one amenity item within the container
    pub amenity_item_selector: String,

    /// Selector matching the labeled attribute entries
    pub attributes_selector: String,

    /// Selector matching the value element within one attribute entry
    pub attribute_value_selector: String,

    /// Label substrings routed to listing fields, checked in order
    pub attribute_labels: Vec<(String, AttributeField)>,
}

impl SiteProfile {
    /// Builds the index URL for a given page number.
    pub fn index_url(&self, page: u32) -> String {
        let params = self.index_params.replace("{page}", &page.to_string());
        format!("{}{}{}", self.website, self.index_endpoint, params)
    }

    /// Builds the absolute detail URL from a listing's site-relative path.
    pub fn detail_url(&self, relative: &str) -> String {
        format!("{}/{}", self.website, relative)
    }

    /// Routes an attribute entry's text to a listing field by label
    /// substring, first match wins.
    pub fn route_label(&self, entry_text: &str) -> Option<AttributeField> {
        self.attribute_labels
            .iter()
            .find(|(label, _)| entry_text.contains(label.as_str()))
            .map(|(_, field)| *field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_profile() -> SiteProfile {
        SiteProfile {
            name: "test_site",
            website: "https://listings.example".to_string(),
            index_endpoint: "/api/search".to_string(),
            index_params: "?page={page}&n=12".to_string(),
            allowed_domains: vec!["listings.example".to_string()],
            amenities_selector: "ul.tags".to_string(),
            amenity_item_selector: "li".to_string(),
            attributes_selector: "ul.attrs li".to_string(),
            attribute_value_selector: "strong".to_string(),
            attribute_labels: vec![
                ("Price".to_string(), AttributeField::Price),
                ("Parking".to_string(), AttributeField::ParkingSpaces),
            ],
        }
    }

    #[test]
    fn index_url_substitutes_page_number() {
        let profile = minimal_profile();
        assert_eq!(
            profile.index_url(3),
            "https://listings.example/api/search?page=3&n=12"
        );
    }

    #[test]
    fn detail_url_joins_relative_path() {
        let profile = minimal_profile();
        assert_eq!(
            profile.detail_url("buy/apartment-1"),
            "https://listings.example/buy/apartment-1"
        );
    }

    #[test]
    fn label_routing_matches_substring_in_order() {
        let profile = minimal_profile();
        assert_eq!(
            profile.route_label("Price: 100"),
            Some(AttributeField::Price)
        );
        assert_eq!(
            profile.route_label("Parking type: Box"),
            Some(AttributeField::ParkingSpaces)
        );
        assert_eq!(profile.route_label("Floor: 2"), None);
    }
}
