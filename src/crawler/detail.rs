//! Detail stage
//!
//! Consumes one listing's detail page. The correlated listing is located
//! through the context registry; a response whose token is unknown is the
//! fatal correlation failure that halts further scheduling. Extraction is
//! done in two independent passes over the document: the amenities list and
//! the labeled attribute list. The document is parsed and dropped inside
//! this synchronous handler, so the non-Send DOM never crosses a task
//! boundary.

use std::sync::Arc;

use scraper::{ElementRef, Html, Selector};

use super::client::FetchedPage;
use super::context::{ContextRegistry, ContextToken};
use super::SharedListings;
use crate::normalize;
use crate::sites::{AttributeField, SiteProfile};
use crate::{CrawlError, Result};

pub struct DetailStage {
    profile: Arc<SiteProfile>,
    listings: SharedListings,
    contexts: Arc<ContextRegistry>,
    amenities: Selector,
    amenity_item: Selector,
    attributes: Selector,
    attribute_value: Selector,
}

impl DetailStage {
    pub fn new(
        profile: Arc<SiteProfile>,
        listings: SharedListings,
        contexts: Arc<ContextRegistry>,
    ) -> Result<Self> {
        let amenities = parse_selector(&profile.amenities_selector)?;
        let amenity_item = parse_selector(&profile.amenity_item_selector)?;
        let attributes = parse_selector(&profile.attributes_selector)?;
        let attribute_value = parse_selector(&profile.attribute_value_selector)?;

        Ok(Self {
            profile,
            listings,
            contexts,
            amenities,
            amenity_item,
            attributes,
            attribute_value,
        })
    }

    /// Handles one detail response, mutating the correlated listing in
    /// place.
    pub fn handle(&self, page: &FetchedPage, token: ContextToken) -> Result<()> {
        let slot = self
            .contexts
            .claim(token)
            .ok_or_else(|| CrawlError::MissingContext {
                url: page.url.clone(),
            })?;

        let document = Html::parse_document(&page.body);

        let mut amenities = Vec::new();
        for list in document.select(&self.amenities) {
            for item in list.select(&self.amenity_item) {
                amenities.push(element_text(&item));
            }
        }

        let mut updates = Vec::new();
        for entry in document.select(&self.attributes) {
            let entry_text = element_text(&entry);
            let Some(field) = self.profile.route_label(&entry_text) else {
                continue;
            };

            let value = entry
                .select(&self.attribute_value)
                .next()
                .map(|element| element_text(&element))
                .unwrap_or_default();
            updates.push((field, value));
        }

        let mut listings = self.listings.lock().unwrap();
        // The slot is valid for the lifetime of the run: the collection is
        // append-only and each token maps to exactly one slot.
        let listing = &mut listings[slot];

        for amenity in amenities {
            listing.add_amenity(amenity);
        }

        for (field, value) in updates {
            match field {
                AttributeField::Price => {
                    let compact: String =
                        value.chars().filter(|c| !c.is_whitespace()).collect();
                    listing.price = normalize::normalize_price(&compact);
                }
                AttributeField::EnergyCertificate => {
                    listing.energy_certificate = Some(value);
                }
                AttributeField::ParkingSpaces => {
                    listing.parking_spaces += digit_value_sum(&value);
                }
            }
        }

        Ok(())
    }

    /// Releases the registry entry of a detail fetch that never produced a
    /// usable response; the listing keeps its index-stage fields.
    pub fn abandon(&self, token: ContextToken) {
        let _ = self.contexts.claim(token);
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|err| CrawlError::Selector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Sums the numeric value of every decimal digit in the text: "12 Box"
/// contributes 3, not 1 parking space. Downstream consumers of the feed
/// expect this accumulation, not an occurrence count.
fn digit_value_sum(text: &str) -> u32 {
    text.chars().filter_map(|c| c.to_digit(10)).sum()
}
