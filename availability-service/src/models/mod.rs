use serde::{Deserialize, Serialize};

/// Message returned when the product exists in the catalogue.
pub const READY_MESSAGE: &str = "Product is ready to manufacture";
/// Message returned when no catalogue entry matches.
pub const UNAVAILABLE_MESSAGE: &str = "Product is not available";
/// Message returned when the name is empty after trimming.
pub const BLANK_MESSAGE: &str = "Product name was left blank";

/// Trim surrounding whitespace and lower-case a product name.
///
/// The result is the document key in the `products` collection.
pub fn normalize_product_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A validated, normalized product lookup. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    product_name: String,
}

impl ProductQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            product_name: normalize_product_name(raw),
        }
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn is_blank(&self) -> bool {
        self.product_name.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityResult {
    Ready,
    Unavailable,
    Blank,
}

impl AvailabilityResult {
    pub fn message(&self) -> &'static str {
        match self {
            AvailabilityResult::Ready => READY_MESSAGE,
            AvailabilityResult::Unavailable => UNAVAILABLE_MESSAGE,
            AvailabilityResult::Blank => BLANK_MESSAGE,
        }
    }

    /// Label used for logs and the `product_checks_total` counter.
    pub fn outcome(&self) -> &'static str {
        match self {
            AvailabilityResult::Ready => "ready",
            AvailabilityResult::Unavailable => "unavailable",
            AvailabilityResult::Blank => "blank",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckProductResponse {
    pub message: String,
}

impl From<AvailabilityResult> for CheckProductResponse {
    fn from(result: AvailabilityResult) -> Self {
        Self {
            message: result.message().to_string(),
        }
    }
}
