// core/src/admin.rs

//! List filters and counters behind the admin panel.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Order, OrderStatus, Product, Profile, Role};

fn needle(q: Option<&str>) -> Option<String> {
  q.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

fn contains(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(needle)
}

/// Products whose name or category contains `q`.
pub fn filter_products(products: Vec<Product>, q: Option<&str>) -> Vec<Product> {
  match needle(q) {
    None => products,
    Some(n) => products
      .into_iter()
      .filter(|p| contains(&p.name, &n) || contains(&p.category, &n))
      .collect(),
  }
}

/// Orders whose shipping name or email contains `q`.
pub fn filter_orders(orders: Vec<Order>, q: Option<&str>) -> Vec<Order> {
  match needle(q) {
    None => orders,
    Some(n) => orders
      .into_iter()
      .filter(|o| contains(&o.shipping_name, &n) || contains(&o.shipping_email, &n))
      .collect(),
  }
}

/// Users whose email, first or last name contains `q`.
pub fn filter_profiles(profiles: Vec<Profile>, q: Option<&str>) -> Vec<Profile> {
  match needle(q) {
    None => profiles,
    Some(n) => profiles
      .into_iter()
      .filter(|p| contains(&p.email, &n) || contains(&p.first_name, &n) || contains(&p.last_name, &n))
      .collect(),
  }
}

/// Count per status, with every status present even at zero.
pub fn status_counts(orders: &[Order]) -> BTreeMap<&'static str, usize> {
  let mut counts: BTreeMap<&'static str, usize> = OrderStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
  for order in orders {
    *counts.entry(order.status.as_str()).or_default() += 1;
  }
  counts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RoleCounts {
  pub customers: usize,
  pub staff: usize,
  pub managers: usize,
}

pub fn role_counts(profiles: &[Profile]) -> RoleCounts {
  profiles.iter().fold(RoleCounts::default(), |mut acc, p| {
    match p.role {
      Role::Customer => acc.customers += 1,
      Role::Employee => acc.staff += 1,
      Role::Manager => {
        acc.staff += 1;
        acc.managers += 1;
      }
    }
    acc
  })
}
