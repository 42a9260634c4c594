//! Canned site pages for driving the crawler without a network
#![allow(dead_code)]

use async_trait::async_trait;
use autos_crawler_lib::infrastructure::{
    AppConfig, DelayRange, PageFetcher, ScrapeError, ScrapeResult,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// Serves registered bodies; any other URL answers 404
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requested().iter().any(|u| u == url)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch_text(&self, url: &str) -> ScrapeResult<String> {
        self.requested.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }
}

/// Default configuration without delays, writing under `data_dir`
pub fn test_config(data_dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.crawler.full_year_delay = DelayRange::none();
    config.crawler.simple_year_delay = DelayRange::none();
    config.crawler.brand_delay = DelayRange::none();
    config.crawler.data_dir = data_dir.to_path_buf();
    config
}

pub fn brand_index(brands: &[&str]) -> String {
    let options: String = brands
        .iter()
        .map(|b| format!(r#"<option value="{b}">{b}</option>"#))
        .collect();
    format!(
        r#"<html><body><select id="usedcar_make_id"><option value="">選擇廠牌</option>{options}</select></body></html>"#
    )
}

pub fn brand_page(years: &[&str]) -> String {
    let groups: String = years
        .iter()
        .map(|y| format!(r#"<div class="year-title">{y}</div><div class="models"></div>"#))
        .collect();
    format!("<html><body>{groups}</body></html>")
}

/// A model snippet as the per-year endpoint escapes it
pub fn snippet(title: &str, price: &str, href: &str) -> String {
    format!(
        r#"<li class=\"model\"><a href=\"{}\"><span class=\"title\">{}<\/span><span class=\"price\">{}<\/span><\/a><\/li>"#,
        href.replace('/', "\\/"),
        title,
        price
    )
}

pub fn spec_block(trim: &str, price: &str, items: &[&str]) -> String {
    let items: String = items.iter().map(|i| format!("<li>{i}</li>")).collect();
    format!(
        r#"<div class="spec-block"><div class="title">{trim}</div><span class="price">range</span><span class="price">{price}</span><ul class="spec-list">{items}</ul></div>"#
    )
}

pub fn detail_page(blocks: &[String]) -> String {
    format!("<html><body>{}</body></html>", blocks.concat())
}

pub const COMBUSTION: [&str; 7] = ["5門5人座掀背車", "排氣量", "1498", "馬力", "150", "燃油", "汽油"];
pub const ELECTRIC: [&str; 5] = ["5門5人座休旅車", "排氣量", "0", "燃油", "電能"];
