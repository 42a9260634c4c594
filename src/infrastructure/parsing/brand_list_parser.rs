//! Brand identifiers from the used-car landing page

#![allow(clippy::uninlined_format_args)]

use scraper::{Html, Selector};
use tracing::debug;

use super::HtmlParser;
use super::config::{BrandListSelectors, compile_selectors, select_all_in, select_all_in_document};
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Reads the brand dropdown: one identifier per option with a non-empty value
pub struct BrandListParser {
    control_selectors: Vec<Selector>,
    option_selectors: Vec<Selector>,
}

impl BrandListParser {
    pub fn with_config(selectors: &BrandListSelectors) -> ScrapeResult<Self> {
        Ok(Self {
            control_selectors: compile_selectors(&selectors.control)?,
            option_selectors: compile_selectors(&selectors.option)?,
        })
    }
}

impl HtmlParser for BrandListParser {
    type Output = Vec<String>;

    /// Brand identifiers in page order. A page without the control is an error.
    fn parse(&self, html: &Html) -> ScrapeResult<Vec<String>> {
        let control = select_all_in_document(html, &self.control_selectors)
            .into_iter()
            .next()
            .ok_or_else(|| ScrapeError::required_field_missing("brand dropdown", None))?;

        let brands: Vec<String> = select_all_in(control, &self.option_selectors)
            .into_iter()
            .filter_map(|option| option.value().attr("value"))
            .filter(|value| !value.is_empty())
            .map(ToString::to_string)
            .collect();

        debug!("Brand dropdown lists {} brands", brands.len());
        Ok(brands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> BrandListParser {
        BrandListParser::with_config(&BrandListSelectors::default()).unwrap()
    }

    #[test]
    fn options_with_values_in_page_order() {
        let html = Html::parse_document(
            r#"<html><body>
                <select id="usedcar_make_id">
                    <option value="">請選擇廠牌</option>
                    <option value="audi">Audi</option>
                    <option>Placeholder</option>
                    <option value="bmw">BMW</option>
                    <option value="land-rover">Land Rover</option>
                </select>
                <select id="other"><option value="ignored">x</option></select>
            </body></html>"#,
        );

        assert_eq!(parser().parse(&html).unwrap(), vec!["audi", "bmw", "land-rover"]);
    }

    #[test]
    fn missing_control_is_an_error() {
        let html = Html::parse_document("<html><body><select id='x'></select></body></html>");
        assert!(matches!(
            parser().parse(&html),
            Err(ScrapeError::RequiredFieldMissing { .. })
        ));
    }

    #[test]
    fn control_without_options_yields_nothing() {
        let html = Html::parse_document(r#"<select id="usedcar_make_id"></select>"#);
        assert!(parser().parse(&html).unwrap().is_empty());
    }
}
