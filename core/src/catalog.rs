// core/src/catalog.rs

//! Catalog search, category filter and sort over an in-memory product list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::Product;

/// Category slug that disables the category filter.
pub const ALL_CATEGORIES: &str = "todos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
  pub slug: &'static str,
  pub name: &'static str,
}

pub const CATEGORIES: [Category; 4] = [
  Category { slug: "cascos", name: "Cascos" },
  Category { slug: "equipamiento", name: "Equipamiento" },
  Category { slug: "partes", name: "Partes" },
  Category { slug: "accesorios", name: "Accesorios" },
];

pub fn category_name(slug: &str) -> Option<&'static str> {
  CATEGORIES.iter().find(|c| c.slug == slug).map(|c| c.name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
  /// Keep the order the backend returned.
  #[default]
  Default,
  PriceAsc,
  PriceDesc,
  /// Highest rating first.
  Rating,
  /// Most recently created first.
  New,
}

impl SortOrder {
  pub fn as_str(&self) -> &'static str {
    match self {
      SortOrder::Default => "default",
      SortOrder::PriceAsc => "price-asc",
      SortOrder::PriceDesc => "price-desc",
      SortOrder::Rating => "rating",
      SortOrder::New => "new",
    }
  }

  /// Stable in-place sort.
  pub fn sort(&self, products: &mut [Product]) {
    match self {
      SortOrder::Default => {}
      SortOrder::PriceAsc => products.sort_by_key(|p| p.price_cents),
      SortOrder::PriceDesc => products.sort_by(|a, b| b.price_cents.cmp(&a.price_cents)),
      SortOrder::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
      SortOrder::New => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
  }
}

impl fmt::Display for SortOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for SortOrder {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "" | "default" => Ok(SortOrder::Default),
      "price-asc" => Ok(SortOrder::PriceAsc),
      "price-desc" => Ok(SortOrder::PriceDesc),
      "rating" => Ok(SortOrder::Rating),
      "new" => Ok(SortOrder::New),
      other => Err(CoreError::UnknownSort(other.to_string())),
    }
  }
}

/// Search text, optional category and sort chosen on the catalog page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
  search: String,
  category: Option<String>,
  sort: SortOrder,
}

impl CatalogQuery {
  pub fn new(search: Option<&str>, category: Option<&str>, sort: SortOrder) -> Self {
    let category = category
      .map(|c| c.trim().to_lowercase())
      .filter(|c| !c.is_empty() && c != ALL_CATEGORIES);
    Self {
      search: search.unwrap_or_default().trim().to_lowercase(),
      category,
      sort,
    }
  }

  pub fn category(&self) -> Option<&str> {
    self.category.as_deref()
  }

  pub fn sort_order(&self) -> SortOrder {
    self.sort
  }

  /// Case-insensitive substring match on name, description or category,
  /// plus the category filter. A blank search matches everything.
  pub fn matches(&self, product: &Product) -> bool {
    if let Some(category) = &self.category {
      if !product.category.eq_ignore_ascii_case(category) {
        return false;
      }
    }
    if self.search.is_empty() {
      return true;
    }
    [&product.name, &product.description, &product.category]
      .iter()
      .any(|field| field.to_lowercase().contains(&self.search))
  }

  /// Filters then sorts. Filtering is independent of order, so filtering a
  /// sorted list gives the same result.
  pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
    let mut visible: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();
    self.sort.sort(&mut visible);
    visible
  }
}

pub fn featured(products: &[Product]) -> Vec<Product> {
  products.iter().filter(|p| p.is_active && p.is_featured).cloned().collect()
}

/// Active, discounted products with the steepest discount first.
pub fn offers(products: &[Product]) -> Vec<Product> {
  let mut on_offer: Vec<Product> = products.iter().filter(|p| p.is_on_offer()).cloned().collect();
  on_offer.sort_by(|a, b| b.discount_percentage.cmp(&a.discount_percentage));
  on_offer
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
  pub slug: &'static str,
  pub name: &'static str,
  pub product_count: usize,
}

/// Active product count for each known category.
pub fn category_counts(products: &[Product]) -> Vec<CategoryCount> {
  CATEGORIES
    .iter()
    .map(|c| CategoryCount {
      slug: c.slug,
      name: c.name,
      product_count: products.iter().filter(|p| p.is_active && p.category == c.slug).count(),
    })
    .collect()
}
