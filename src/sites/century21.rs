//! Century 21 Portugal profile
//!
//! The index endpoint is the site's own search surface returning a JSON
//! envelope; detail pages are server-rendered HTML with a tag list for
//! amenities and a multi-column caret list for labeled attributes.

use super::{AttributeField, SiteProfile};

pub const CRAWLER_NAME: &str = "century21_pt";

const WEBSITE: &str = "https://www.century21.pt";

const API_ENDPOINT: &str = "/umbraco/Surface/C21PropertiesSearchListingSurface/GetAllSEO";

// Query string captured from the site's own listing search; only the page
// number varies between requests.
const SEARCH_PARAMS: &str = "?ord=date-desc&page={page}&numberOfElements=12&ba=&be=&map=&mip=&q=\
                             &v=c&ptd=&pstld=&mySite=False&masterId=1&seoId=&nodeId=46530\
                             &language=pt-PT&agencyId=&triggerbyAddressLocationLevelddl=false\
                             &AgencySite_showAllAgenciesProperties=false&AgencyExternalName=\
                             &b=2&pt=&ls=&vt=&pstl=&cc=&et=";

/// Builds the production Century 21 Portugal profile.
pub fn profile() -> SiteProfile {
    profile_for(WEBSITE.to_string(), vec![
        "century21.pt".to_string(),
        "www.century21.pt".to_string(),
    ])
}

/// Same selectors and routing, pointed at an arbitrary base URL. Used by
/// tests to aim the pipeline at a mock server.
pub fn profile_for(website: String, allowed_domains: Vec<String>) -> SiteProfile {
    SiteProfile {
        name: CRAWLER_NAME,
        website,
        index_endpoint: API_ENDPOINT.to_string(),
        index_params: SEARCH_PARAMS.to_string(),
        allowed_domains,
        amenities_selector: "ul.tags-list".to_string(),
        amenity_item_selector: "li".to_string(),
        attributes_selector: "ul.caret-list.multi-columns li".to_string(),
        attribute_value_selector: "strong".to_string(),
        attribute_labels: vec![
            ("Preço".to_string(), AttributeField::Price),
            (
                "Certificado energético".to_string(),
                AttributeField::EnergyCertificate,
            ),
            (
                "Tipo de Estacionamento".to_string(),
                AttributeField::ParkingSpaces,
            ),
        ],
    }
}
