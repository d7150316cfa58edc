// apps/storefront/src/db/seed.rs

use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use motogear_core::{Product, ProductInput, Profile, Role};

use super::Backend;
use crate::config::SeedManager;
use crate::errors::{AppError, Result};
use crate::services::auth_service;

struct SeedProduct {
  name: &'static str,
  description: &'static str,
  price: i64,
  original_price: Option<i64>,
  category: &'static str,
  image: &'static str,
  rating: f64,
  reviews: i32,
  featured: bool,
}

const SEED_PRODUCTS: [SeedProduct; 7] = [
  SeedProduct {
    name: "Casco Pro Carbon",
    description: "Casco integral de fibra de carbono con sistema de ventilación avanzado. Certificación DOT y ECE. \
                  Interior desmontable y lavable con almohadillas de espuma viscoelástica.",
    price: 4299,
    original_price: Some(5199),
    category: "cascos",
    image: "/images/products/helmet-pro.jpg",
    rating: 4.8,
    reviews: 234,
    featured: true,
  },
  SeedProduct {
    name: "Guantes Racing Pro",
    description: "Guantes de piel con protección de carbono en nudillos. Palma reforzada con tecnología \
                  anti-deslizante y cierre de velcro ajustable.",
    price: 1299,
    original_price: None,
    category: "equipamiento",
    image: "/images/products/gloves-racing.jpg",
    rating: 4.6,
    reviews: 189,
    featured: false,
  },
  SeedProduct {
    name: "Escape Titanium RS",
    description: "Sistema de escape completo en titanio con punta de fibra de carbono. Aumenta la potencia hasta \
                  8HP y reduce el peso en 4kg respecto al original.",
    price: 8499,
    original_price: Some(9999),
    category: "partes",
    image: "/images/products/exhaust-titanium.jpg",
    rating: 4.9,
    reviews: 156,
    featured: true,
  },
  SeedProduct {
    name: "Kit LED Auxiliar",
    description: "Kit de luces LED auxiliares de alto rendimiento. 6000 lúmenes por unidad con protección IP67 \
                  contra agua y polvo.",
    price: 2199,
    original_price: None,
    category: "accesorios",
    image: "/images/products/led-lights.jpg",
    rating: 4.5,
    reviews: 312,
    featured: false,
  },
  SeedProduct {
    name: "Chaqueta Armor Shield",
    description: "Chaqueta de protección con armadura CE nivel 2 en hombros, codos y espalda. Textil resistente a \
                  la abrasión con forro térmico desmontable.",
    price: 3599,
    original_price: Some(4299),
    category: "equipamiento",
    image: "/images/products/jacket-armor.jpg",
    rating: 4.7,
    reviews: 98,
    featured: true,
  },
  SeedProduct {
    name: "Soporte Movil Pro",
    description: "Soporte universal para smartphone en aluminio CNC. Compatible con dispositivos de 4.7 a 6.8 \
                  pulgadas con sistema de carga inalámbrica.",
    price: 899,
    original_price: None,
    category: "accesorios",
    image: "/images/products/phone-mount.jpg",
    rating: 4.4,
    reviews: 567,
    featured: false,
  },
  SeedProduct {
    name: "Botas Touring Elite",
    description: "Botas de touring con protección de tobillo reforzada. Suela antideslizante Vibram y membrana \
                  impermeable para cualquier condición climática.",
    price: 2799,
    original_price: None,
    category: "equipamiento",
    image: "/images/products/boots-touring.jpg",
    rating: 4.8,
    reviews: 203,
    featured: true,
  },
];

const SEED_STOCK: i32 = 25;

/// Whole-percent discount implied by an original price.
fn discount_from(price: i64, original: Option<i64>) -> i32 {
  match original {
    Some(original) if original > price && original > 0 => ((original - price) * 100 / original) as i32,
    _ => 0,
  }
}

/// The launch catalog. Creation times are spaced a minute apart from `base`
/// so the catalog order is stable.
pub fn seed_products(base: DateTime<Utc>) -> Vec<Product> {
  SEED_PRODUCTS
    .iter()
    .enumerate()
    .map(|(i, seed)| {
      let input = ProductInput {
        name: seed.name.to_string(),
        description: seed.description.to_string(),
        price_cents: seed.price * 100,
        original_price_cents: seed.original_price.map(|p| p * 100),
        category: seed.category.to_string(),
        image_url: seed.image.to_string(),
        rating: seed.rating,
        reviews_count: seed.reviews,
        stock: SEED_STOCK,
        is_active: true,
        is_featured: seed.featured,
        discount_percentage: discount_from(seed.price, seed.original_price),
      };
      input.into_product(Uuid::new_v4(), base + Duration::minutes(i as i64))
    })
    .collect()
}

/// Loads the launch catalog into an empty product table and, when
/// configured, creates the first manager account.
#[instrument(name = "seed::seed_backend", skip(backend, manager))]
pub async fn seed_backend(backend: &Backend, manager: Option<&SeedManager>) -> Result<()> {
  if backend.products.list_all().await?.is_empty() {
    let products = seed_products(Utc::now() - Duration::days(1));
    for product in &products {
      backend.products.insert(product).await?;
    }
    info!(count = products.len(), "Seeded product catalog.");
  } else {
    info!("Product table not empty; skipping catalog seed.");
  }

  if let Some(manager) = manager {
    seed_manager(backend, manager).await?;
  }
  Ok(())
}

async fn seed_manager(backend: &Backend, manager: &SeedManager) -> Result<()> {
  if backend.accounts.find_credentials(&manager.email).await?.is_some() {
    info!(email = %manager.email, "Manager account already present.");
    return Ok(());
  }

  let password_hash = auth_service::hash_password_blocking(manager.password.clone()).await?;
  let profile = Profile {
    id: Uuid::new_v4(),
    email: manager.email.trim().to_lowercase(),
    first_name: "Gerente".to_string(),
    last_name: "MotoGear".to_string(),
    role: Role::Manager,
    created_at: Utc::now(),
  };
  match backend.accounts.create_account(&profile, &password_hash).await {
    Ok(()) => {
      info!(email = %profile.email, "Seeded manager account.");
      Ok(())
    }
    Err(AppError::Conflict(_)) => {
      warn!(email = %profile.email, "Manager account created concurrently; leaving it as is.");
      Ok(())
    }
    Err(e) => Err(e),
  }
}
