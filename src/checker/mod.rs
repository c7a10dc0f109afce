pub mod fetch;
pub mod markup;

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{Catalog, NotFound, ProductId};
use crate::checker::fetch::{FetchError, PageFetcher};
use crate::checker::markup::{Indicator, ParseError};

/// Stock state of a product at the moment it was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    InStock,
    OutOfStock,
    /// The product is not in the catalog, or its page could not be fetched or read
    Unknown,
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    NotFound(#[from] NotFound),
    #[error("failed to fetch {url}: {cause}")]
    Fetch { url: String, cause: FetchError },
    #[error("failed to parse {url}: {cause}")]
    Parse { url: String, cause: ParseError },
}

/// Resolves product ids against the catalog and inspects their pages.
///
/// Every check performs exactly one fetch (none for unknown ids). Results are
/// never cached.
pub struct AvailabilityChecker {
    catalog: Catalog,
    fetcher: Box<dyn PageFetcher>,
    indicator: Indicator,
}

impl AvailabilityChecker {
    pub fn new(catalog: Catalog, fetcher: impl PageFetcher + 'static, indicator: Indicator) -> Self {
        Self {
            catalog,
            fetcher: Box::new(fetcher),
            indicator,
        }
    }

    /// Returns whether the product is in stock, or why that could not be determined.
    pub async fn try_check(&self, id: &ProductId) -> Result<bool, CheckError> {
        let url = self.catalog.resolve(id)?;

        let document = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|cause| CheckError::Fetch {
                url: url.to_string(),
                cause,
            })?;

        self.indicator
            .is_present(&document)
            .map_err(|cause| CheckError::Parse {
                url: url.to_string(),
                cause,
            })
    }

    pub async fn check(&self, id: &ProductId) -> Availability {
        let availability = match self.try_check(id).await {
            Ok(true) => Availability::InStock,
            Ok(false) => Availability::OutOfStock,
            Err(e) => {
                warn!("Check for product {} failed: {}", id, e);
                Availability::Unknown
            }
        };

        info!("Product {} checked: {:?}", id, availability);
        availability
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{FakeFetcher, Page};
    use super::*;
    use reqwest::StatusCode;

    const IN_STOCK: &str = r#"<html><body><span class="instock">In stock</span></body></html>"#;
    const SOLD_OUT: &str = r#"<html><body><span class="soldout">Sold out</span></body></html>"#;

    fn setup() -> (AvailabilityChecker, FakeFetcher) {
        let catalog: Catalog = [
            ("101", "https://shop.example/101"),
            ("172", "https://shop.example/172"),
            ("200", "https://shop.example/200"),
            ("300", "https://shop.example/300"),
            ("400", "https://shop.example/400"),
        ]
        .into_iter()
        .collect();

        let fetcher = FakeFetcher::new(&[
            ("https://shop.example/101", Page::Body(IN_STOCK)),
            ("https://shop.example/172", Page::Body(SOLD_OUT)),
            (
                "https://shop.example/200",
                Page::Status(StatusCode::INTERNAL_SERVER_ERROR),
            ),
            ("https://shop.example/300", Page::Timeout),
            ("https://shop.example/400", Page::Body("")),
        ]);

        let checker = AvailabilityChecker::new(
            catalog,
            fetcher.clone(),
            Indicator::new("span", "instock"),
        );
        (checker, fetcher)
    }

    #[tokio::test]
    async fn test_in_stock() {
        let (checker, fetcher) = setup();
        assert_eq!(checker.check("101").await, Availability::InStock);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_out_of_stock() {
        let (checker, _) = setup();
        assert_eq!(checker.check("172").await, Availability::OutOfStock);
    }

    #[tokio::test]
    async fn test_unknown_id_does_not_fetch() {
        let (checker, fetcher) = setup();
        assert_eq!(checker.check("999").await, Availability::Unknown);
        assert!(matches!(
            checker.try_check("999").await,
            Err(CheckError::NotFound(_))
        ));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_server_error_is_unknown() {
        let (checker, _) = setup();
        assert_eq!(checker.check("200").await, Availability::Unknown);
        assert!(matches!(
            checker.try_check("200").await,
            Err(CheckError::Fetch {
                cause: FetchError::Status(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_unknown() {
        let (checker, _) = setup();
        assert_eq!(checker.check("300").await, Availability::Unknown);
    }

    #[tokio::test]
    async fn test_unparseable_page_is_unknown() {
        let (checker, _) = setup();
        assert_eq!(checker.check("400").await, Availability::Unknown);
        assert!(matches!(
            checker.try_check("400").await,
            Err(CheckError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn test_every_check_fetches_again() {
        let (checker, fetcher) = setup();
        checker.check("101").await;
        checker.check("101").await;
        checker.check("172").await;
        assert_eq!(fetcher.calls(), 3);
    }

    #[tokio::test]
    async fn test_error_message_names_locator() {
        let (checker, _) = setup();
        let err = checker.try_check("200").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to fetch https://shop.example/200: server responded with 500 Internal Server Error"
        );
    }
}
