//! Shop listing parser
//!
//! Extracts one [`ShopItem`] per card container from the listing HTML.
//! Cards without a usable image source contribute nothing; missing name,
//! price or rarity degrade to placeholders instead of failing the card.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::error::{ParsingError, ParsingResult};
use crate::domain::constants::RARITY_CLASS_PREFIX;
use crate::domain::item::{DEFAULT_ITEM_NAME, DEFAULT_ITEM_PRICE};
use crate::domain::ShopItem;

/// CSS selectors describing the listing page markup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSelectors {
    pub card: String,
    pub image: String,
    pub name: String,
    pub price: String,
    pub rarity_prefix: String,
}

impl Default for ShopSelectors {
    fn default() -> Self {
        Self {
            card: "div.card".to_string(),
            image: "img.card-img-top.img-fluid".to_string(),
            name: "h3.card-title.card-name.item-name".to_string(),
            price: "h5.card-text.card-namesmall".to_string(),
            rarity_prefix: RARITY_CLASS_PREFIX.to_string(),
        }
    }
}

/// Parser for the shop listing page
pub struct ShopListParser {
    card_selector: Selector,
    image_selector: Selector,
    name_selector: Selector,
    price_selector: Selector,
    rarity_prefix: String,
    base_url: Url,
}

impl ShopListParser {
    /// Create a parser with the default selectors
    pub fn new(base_url: &str) -> ParsingResult<Self> {
        Self::with_selectors(base_url, &ShopSelectors::default())
    }

    /// Create a parser with custom selector configuration
    pub fn with_selectors(base_url: &str, selectors: &ShopSelectors) -> ParsingResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ParsingError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            card_selector: Self::compile_selector(&selectors.card)?,
            image_selector: Self::compile_selector(&selectors.image)?,
            name_selector: Self::compile_selector(&selectors.name)?,
            price_selector: Self::compile_selector(&selectors.price)?,
            rarity_prefix: selectors.rarity_prefix.clone(),
            base_url,
        })
    }

    fn compile_selector(selector_str: &str) -> ParsingResult<Selector> {
        Selector::parse(selector_str).map_err(|e| ParsingError::SelectorCompile {
            selector: selector_str.to_string(),
            message: e.to_string(),
        })
    }

    /// Extract items from the raw listing HTML, in document order.
    ///
    /// An empty result is not an error here; the pipeline decides what an
    /// empty shop means for the cycle.
    pub fn parse(&self, html: &str) -> Vec<ShopItem> {
        let document = Html::parse_document(html);

        let mut items = Vec::new();
        for card in document.select(&self.card_selector) {
            if let Some(item) = self.extract_item(&card) {
                items.push(item);
            }
        }

        debug!("Extracted {} items from listing page", items.len());
        items
    }

    /// Extract a single item from a card container.
    ///
    /// Returns `None` when the card has no image source; every other field
    /// falls back to a placeholder.
    fn extract_item(&self, card: &ElementRef) -> Option<ShopItem> {
        let src = card
            .select(&self.image_selector)
            .next()
            .and_then(|img| img.value().attr("src"))?;

        let image_url = match self.resolve_image_url(src) {
            Ok(url) => url,
            Err(e) => {
                debug!("Skipping card with unresolvable image source: {}", e);
                return None;
            }
        };

        let rarity = card
            .value()
            .classes()
            .find(|class| class.starts_with(&self.rarity_prefix))
            .map(str::to_string);

        let name = self
            .extract_text(card, &self.name_selector)
            .unwrap_or_else(|| DEFAULT_ITEM_NAME.to_string());
        let price = self
            .extract_text(card, &self.price_selector)
            .unwrap_or_else(|| DEFAULT_ITEM_PRICE.to_string());

        Some(ShopItem {
            image_url,
            rarity,
            name,
            price,
        })
    }

    /// Extract trimmed text content using a single CSS selector
    fn extract_text(&self, element: &ElementRef, selector: &Selector) -> Option<String> {
        element
            .select(selector)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// Resolve a relative image source to an absolute URL.
    ///
    /// Sources already carrying a scheme pass through unchanged.
    fn resolve_image_url(&self, src: &str) -> ParsingResult<String> {
        if src.starts_with("http") {
            return Ok(src.to_string());
        }

        self.base_url
            .join(src)
            .map(|url| url.to_string())
            .map_err(|e| ParsingError::UrlResolution {
                url: src.to_string(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://dropnite.com";

    fn card(classes: &str, body: &str) -> String {
        format!(r#"<div class="{classes}">{body}</div>"#)
    }

    fn full_card(rarity: &str, src: &str, name: &str, price: &str) -> String {
        card(
            &format!("card {rarity}"),
            &format!(
                r#"<img class="card-img-top img-fluid" src="{src}">
                   <h3 class="card-title card-name item-name">{name}</h3>
                   <h5 class="card-text card-namesmall">{price}</h5>"#
            ),
        )
    }

    #[test]
    fn extracts_items_in_document_order() {
        let html = format!(
            "<html><body>{}{}{}</body></html>",
            full_card("rarity-epic", "/img/a.png", "Alpha", "1200 V-Bucks"),
            full_card("rarity-rare", "/img/b.png", "Bravo", "800 V-Bucks"),
            full_card("rarity-common", "/img/c.png", "Charlie", "500 V-Bucks"),
        );

        let parser = ShopListParser::new(BASE).unwrap();
        let items = parser.parse(&html);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].name, "Alpha");
        assert_eq!(items[1].name, "Bravo");
        assert_eq!(items[2].name, "Charlie");
        assert_eq!(items[0].rarity.as_deref(), Some("rarity-epic"));
        assert_eq!(items[0].price, "1200 V-Bucks");
    }

    #[test]
    fn relative_source_is_absolutized_absolute_passes_through() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            full_card("rarity-epic", "/img/rel.png", "Rel", "1 V-Bucks"),
            full_card("rarity-epic", "https://cdn.example.com/abs.png", "Abs", "1 V-Bucks"),
        );

        let parser = ShopListParser::new(BASE).unwrap();
        let items = parser.parse(&html);

        assert_eq!(items[0].image_url, "https://dropnite.com/img/rel.png");
        assert_eq!(items[1].image_url, "https://cdn.example.com/abs.png");
    }

    #[test]
    fn missing_fields_fall_back_to_placeholders() {
        let html = card(
            "card",
            r#"<img class="card-img-top img-fluid" src="/img/x.png">"#,
        );

        let parser = ShopListParser::new(BASE).unwrap();
        let items = parser.parse(&html);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, DEFAULT_ITEM_NAME);
        assert_eq!(items[0].price, DEFAULT_ITEM_PRICE);
        assert_eq!(items[0].rarity, None);
    }

    #[test]
    fn card_without_image_is_skipped() {
        let html = format!(
            "<html><body>{}{}</body></html>",
            card("card rarity-epic", "<h3 class=\"card-title card-name item-name\">NoImage</h3>"),
            full_card("rarity-rare", "/img/ok.png", "Ok", "1 V-Bucks"),
        );

        let parser = ShopListParser::new(BASE).unwrap();
        let items = parser.parse(&html);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Ok");
    }

    #[test]
    fn empty_document_yields_no_items() {
        let parser = ShopListParser::new(BASE).unwrap();
        assert!(parser.parse("<html><body></body></html>").is_empty());
    }

    #[test]
    fn invalid_selector_fails_construction() {
        let selectors = ShopSelectors {
            card: ":::nope".to_string(),
            ..Default::default()
        };
        assert!(ShopListParser::with_selectors(BASE, &selectors).is_err());
    }
}
