//! Trims from the specification blocks of a model detail page

#![allow(clippy::uninlined_format_args)]

use scraper::{Html, Selector};
use tracing::{error, warn};

use super::ContextualParser;
use super::config::{
    VariantSelectors, compile_selectors, element_text, select_all_in, select_all_in_document,
    select_first_in,
};
use super::context::DetailParseContext;
use super::spec_layout::SpecLayout;
use crate::domain::{CarVariant, UNKNOWN_PRICE};
use crate::infrastructure::scrape_error::ScrapeResult;

/// What became of one specification block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    Variant(CarVariant),
    /// The spec list length matches no known layout
    UnknownLayout { trim_name: String, field_count: usize },
    /// The block has no trim name
    Malformed { reason: String },
}

impl BlockOutcome {
    pub fn into_variant(self) -> Option<CarVariant> {
        match self {
            Self::Variant(variant) => Some(variant),
            Self::UnknownLayout { .. } | Self::Malformed { .. } => None,
        }
    }
}

pub struct VariantParser {
    block_selectors: Vec<Selector>,
    trim_selectors: Vec<Selector>,
    item_selectors: Vec<Selector>,
    price_selectors: Vec<Selector>,
}

impl VariantParser {
    pub fn with_config(selectors: &VariantSelectors) -> ScrapeResult<Self> {
        Ok(Self {
            block_selectors: compile_selectors(&selectors.spec_block)?,
            trim_selectors: compile_selectors(&selectors.trim_name)?,
            item_selectors: compile_selectors(&selectors.spec_item)?,
            price_selectors: compile_selectors(&selectors.price)?,
        })
    }

    /// Variants of a detail page, in block order, skipping every other outcome
    pub fn variants(&self, html: &Html, context: &DetailParseContext) -> ScrapeResult<Vec<CarVariant>> {
        Ok(self
            .parse_with_context(html, context)?
            .into_iter()
            .filter_map(BlockOutcome::into_variant)
            .collect())
    }

    fn parse_block(&self, block: scraper::ElementRef<'_>, index: usize, context: &DetailParseContext) -> BlockOutcome {
        let Some(trim_name) = select_first_in(block, &self.trim_selectors).map(element_text) else {
            error!("Spec block {} on {} has no trim name, skipping", index, context.url);
            return BlockOutcome::Malformed {
                reason: "trim name not found".to_string(),
            };
        };

        let items: Vec<String> = select_all_in(block, &self.item_selectors)
            .into_iter()
            .map(element_text)
            .collect();

        // First price element is the model's range, the second is this trim's
        let price = select_all_in(block, &self.price_selectors)
            .get(1)
            .map_or_else(|| UNKNOWN_PRICE.to_string(), |element| element_text(*element));

        let layout = SpecLayout::resolve(items.len());
        match layout.build_variant(&trim_name, &price, &items) {
            Some(variant) => BlockOutcome::Variant(variant),
            None => {
                warn!(
                    "Unknown spec layout for '{}' on {} ({} fields), skipping",
                    trim_name,
                    context.url,
                    items.len()
                );
                BlockOutcome::UnknownLayout {
                    trim_name,
                    field_count: items.len(),
                }
            }
        }
    }
}

impl ContextualParser for VariantParser {
    type Output = Vec<BlockOutcome>;
    type Context = DetailParseContext;

    /// One outcome per specification block, in page order
    fn parse_with_context(&self, html: &Html, context: &DetailParseContext) -> ScrapeResult<Vec<BlockOutcome>> {
        Ok(select_all_in_document(html, &self.block_selectors)
            .into_iter()
            .enumerate()
            .map(|(index, block)| self.parse_block(block, index, context))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UNKNOWN_HORSEPOWER;

    fn parser() -> VariantParser {
        VariantParser::with_config(&VariantSelectors::default()).unwrap()
    }

    fn block(trim: Option<&str>, prices: &[&str], items: &[&str]) -> String {
        let trim = trim.map(|t| format!(r#"<div class="title">{}</div>"#, t)).unwrap_or_default();
        let prices: String = prices
            .iter()
            .map(|p| format!(r#"<span class="price">{}</span>"#, p))
            .collect();
        let items: String = items.iter().map(|i| format!("<li> {} </li>", i)).collect();
        format!(r#"<div class="spec-block">{}{}<ul class="spec-list">{}</ul></div>"#, trim, prices, items)
    }

    fn page(blocks: &[String]) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", blocks.concat()))
    }

    fn context() -> DetailParseContext {
        DetailParseContext::new("https://autos.yahoo.com.tw/new-cars/make/audi/a3")
    }

    #[test]
    fn one_outcome_per_block_in_order() {
        let html = page(&[
            block(Some("35 TFSI"), &["149.9-179萬", "149.9萬"], &["掀背車", "-", "1498", "-", "150", "-", "汽油"]),
            block(Some("e-tron"), &["x", "299萬"], &["休旅車", "-", "0", "-", "電能"]),
            block(Some("Odd"), &["x", "1萬"], &["a", "b", "c"]),
            block(None, &["x", "1萬"], &["a", "b", "c", "d", "e"]),
        ]);

        let outcomes = parser().parse_with_context(&html, &context()).unwrap();
        assert_eq!(outcomes.len(), 4);

        let BlockOutcome::Variant(combustion) = &outcomes[0] else {
            panic!("expected variant, got {:?}", outcomes[0]);
        };
        assert_eq!(combustion.trim_name, "35 TFSI");
        assert_eq!(combustion.price, "149.9萬");
        assert_eq!(combustion.engine_cc, "1498");
        assert_eq!(combustion.horsepower, "150");

        let BlockOutcome::Variant(electric) = &outcomes[1] else {
            panic!("expected variant, got {:?}", outcomes[1]);
        };
        assert_eq!(electric.horsepower, UNKNOWN_HORSEPOWER);
        assert_eq!(electric.fuel_type, "電能");

        assert_eq!(
            outcomes[2],
            BlockOutcome::UnknownLayout {
                trim_name: "Odd".to_string(),
                field_count: 3
            }
        );
        assert!(matches!(outcomes[3], BlockOutcome::Malformed { .. }));
    }

    #[test]
    fn missing_trim_price_uses_placeholder() {
        let html = page(&[block(Some("Base"), &["only range"], &["a", "-", "b", "-", "c", "-", "d"])]);
        let variants = parser().variants(&html, &context()).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].price, UNKNOWN_PRICE);
    }

    #[test]
    fn page_without_blocks_has_no_variants() {
        let html = page(&[]);
        assert!(parser().variants(&html, &context()).unwrap().is_empty());
    }
}
