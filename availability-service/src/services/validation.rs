use crate::models::ProductQuery;
use crate::services::CheckError;
use serde_json::Value;

/// Key holding the product name in the request body.
const PRODUCT_NAME_FIELD: &str = "ProductName";

/// Parse a raw request body into a normalized [`ProductQuery`].
///
/// A name that is blank after trimming is accepted; the resolver decides what
/// to report for it.
pub fn parse_product_query(body: &[u8]) -> Result<ProductQuery, CheckError> {
    let payload: Value = serde_json::from_slice(body).map_err(CheckError::InvalidPayload)?;

    let field = payload
        .as_object()
        .and_then(|object| object.get(PRODUCT_NAME_FIELD))
        .ok_or(CheckError::MissingField)?;

    let raw = field.as_str().ok_or(CheckError::InvalidField)?;
    let query = ProductQuery::new(raw);

    tracing::debug!(product = %query.product_name(), "Validated product check request");
    Ok(query)
}
