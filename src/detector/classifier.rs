//! Fragrance photo classification
//!
//! Must run after layout: the size checks read rendered bounding boxes.

use crate::config::ScanConfig;
use crate::dom::PageDom;
use crate::utils::helpers::find_keyword;

/// Why an image was accepted or rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    TooSmall,
    Excluded(String),
    Keyword(String),
    Large,
    NoEvidence,
}

impl Verdict {
    pub fn is_candidate(&self) -> bool {
        matches!(self, Verdict::Keyword(_) | Verdict::Large)
    }
}

#[derive(Debug, Clone)]
pub struct ImageClassifier {
    min_size: f64,
    large_size: f64,
    exclude: Vec<String>,
    include: Vec<String>,
}

impl Default for ImageClassifier {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl ImageClassifier {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            min_size: config.min_size,
            large_size: config.large_size,
            exclude: config.exclude_keywords.iter().map(|k| k.to_lowercase()).collect(),
            include: config.include_keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn is_candidate<P: PageDom>(&self, page: &P, image: &P::Node) -> bool {
        self.classify(page, image).is_candidate()
    }

    pub fn classify<P: PageDom>(&self, page: &P, image: &P::Node) -> Verdict {
        let rect = page.bounding_rect(image);
        if !rect.fits(self.min_size) {
            return Verdict::TooSmall;
        }

        let src = lowered(page.attribute(image, "src"));
        let alt = lowered(page.attribute(image, "alt"));
        let class = lowered(page.attribute(image, "class"));
        let haystacks = [src.as_str(), alt.as_str(), class.as_str()];

        if let Some(keyword) = find_keyword(&haystacks, &self.exclude) {
            return Verdict::Excluded(keyword.to_string());
        }

        if let Some(keyword) = find_keyword(&haystacks, &self.include) {
            return Verdict::Keyword(keyword.to_string());
        }

        if rect.fits(self.large_size) {
            Verdict::Large
        } else {
            Verdict::NoEvidence
        }
    }
}

fn lowered(value: Option<String>) -> String {
    value.map(|v| v.to_lowercase()).unwrap_or_default()
}
