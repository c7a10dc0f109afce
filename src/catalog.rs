use std::collections::HashMap;

use thiserror::Error;

/// Product ids are opaque tokens; anything that is a catalog key is valid.
pub type ProductId = str;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("product '{id}' is not in the catalog")]
pub struct NotFound {
    pub id: String,
}

/// Read-only mapping from product id to the page that shows its stock state.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pages: HashMap<String, String>,
}

impl Catalog {
    pub fn new(pages: HashMap<String, String>) -> Self {
        Self { pages }
    }

    pub fn resolve(&self, id: &ProductId) -> Result<&str, NotFound> {
        self.pages
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| NotFound { id: id.to_string() })
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(id, url)| (id.into(), url.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_id() {
        let catalog: Catalog = [("101", "https://shop.example/101")].into_iter().collect();
        assert_eq!(catalog.resolve("101"), Ok("https://shop.example/101"));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let catalog: Catalog = [("101", "https://shop.example/101")].into_iter().collect();
        assert_eq!(
            catalog.resolve("999"),
            Err(NotFound {
                id: "999".to_string()
            })
        );
    }

    #[test]
    fn test_ids_are_exact_keys() {
        let catalog: Catalog = [("101", "https://shop.example/101")].into_iter().collect();
        assert!(catalog.resolve(" 101").is_err());
        assert!(catalog.resolve("1010").is_err());
    }

    #[test]
    fn test_empty_catalog_resolves_nothing() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.resolve("101").is_err());
    }
}
