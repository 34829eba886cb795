//! Seed the database with reference taxonomy and a demo catalog.
//!
//! Safe to run repeatedly: every insert either upserts on its natural key
//! or checks for an existing row first, so reseeding an already-seeded
//! database is a no-op.
//!
//! The demo catalog deliberately includes a product with no fitment links
//! (a universal part) so the sync path's "unfit products still appear in
//! search" behavior can be exercised end to end.

use serde_json::json;
use sqlx::PgPool;
use tracing::info;

use axleworks_core::{CategoryId, MakeId, ModelId, ProductId, VehicleVariantId};
use axleworks_storefront::db;

/// Seed reference data and the demo catalog.
///
/// # Errors
///
/// Returns an error if the environment is missing the database URL or any
/// insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let pool = db::create_pool(&super::database_url()?).await?;
    info!("Connected to database");

    seed(&pool).await?;

    info!("Seed complete");
    Ok(())
}

async fn seed(pool: &PgPool) -> Result<(), sqlx::Error> {
    info!("Inserting categories");
    sqlx::query(
        r"
        INSERT INTO category (name, slug) VALUES
            ('Brake Systems', 'brake-systems'),
            ('Engine Components', 'engine-components'),
            ('Filters', 'filters')
        ON CONFLICT (name) DO NOTHING
        ",
    )
    .execute(pool)
    .await?;

    info!("Inserting makes");
    let honda = insert_make(pool, "Honda").await?;
    let toyota = insert_make(pool, "Toyota").await?;

    info!("Inserting models");
    let civic = insert_model(pool, honda, "Civic").await?;
    let accord = insert_model(pool, honda, "Accord").await?;
    let camry = insert_model(pool, toyota, "Camry").await?;

    info!("Inserting variants");
    let civic_fc = insert_variant(pool, civic, 2016, 2019, Some("10th Gen")).await?;
    let civic_fl = insert_variant(pool, civic, 2020, 2021, Some("10th Gen facelift")).await?;
    let accord_cv = insert_variant(pool, accord, 2018, 2022, Some("10th Gen")).await?;
    let camry_xv70 = insert_variant(pool, camry, 2018, 2023, Some("XV70")).await?;

    info!("Inserting products");
    let brake_pads = insert_product(
        pool,
        "BOSCH Ceramic Brake Pads (Front)",
        "bosch-ceramic-brake-pads-front",
        4500,
        100,
        Some("brake-systems"),
        "BCP-5521",
        json!({"position": "Front", "material": "Ceramic"}),
    )
    .await?;
    let oil_filter = insert_product(
        pool,
        "DENSO Engine Oil Filter",
        "denso-engine-oil-filter",
        899,
        250,
        Some("filters"),
        "EOF-1172",
        json!({"thread": "M20x1.5"}),
    )
    .await?;
    // Universal part: intentionally linked to no variants.
    insert_product(
        pool,
        "Microfiber Detailing Cloth (3-Pack)",
        "microfiber-detailing-cloth-3-pack",
        1299,
        500,
        None,
        "MDC-0003",
        json!({"material": "Microfiber"}),
    )
    .await?;

    info!("Linking products to variants");
    link_fitment(pool, brake_pads, civic_fc).await?;
    link_fitment(pool, brake_pads, civic_fl).await?;
    link_fitment(pool, oil_filter, accord_cv).await?;
    link_fitment(pool, oil_filter, camry_xv70).await?;

    Ok(())
}

async fn insert_make(pool: &PgPool, name: &str) -> Result<MakeId, sqlx::Error> {
    sqlx::query("INSERT INTO vehicle_make (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
        .bind(name)
        .execute(pool)
        .await?;

    sqlx::query_scalar::<_, MakeId>("SELECT id FROM vehicle_make WHERE name = $1")
        .bind(name)
        .fetch_one(pool)
        .await
}

async fn insert_model(
    pool: &PgPool,
    make_id: MakeId,
    name: &str,
) -> Result<ModelId, sqlx::Error> {
    sqlx::query(
        "INSERT INTO vehicle_model (make_id, name) VALUES ($1, $2)
         ON CONFLICT (make_id, name) DO NOTHING",
    )
    .bind(make_id)
    .bind(name)
    .execute(pool)
    .await?;

    sqlx::query_scalar::<_, ModelId>(
        "SELECT id FROM vehicle_model WHERE make_id = $1 AND name = $2",
    )
    .bind(make_id)
    .bind(name)
    .fetch_one(pool)
    .await
}

async fn insert_variant(
    pool: &PgPool,
    model_id: ModelId,
    year_from: i32,
    year_to: i32,
    submodel: Option<&str>,
) -> Result<VehicleVariantId, sqlx::Error> {
    // Exclusion constraints don't participate in ON CONFLICT, so check first.
    let existing = sqlx::query_scalar::<_, VehicleVariantId>(
        "SELECT id FROM vehicle_variant
         WHERE model_id = $1 AND year_from = $2 AND year_to = $3",
    )
    .bind(model_id)
    .bind(year_from)
    .bind(year_to)
    .fetch_optional(pool)
    .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    sqlx::query_scalar::<_, VehicleVariantId>(
        "INSERT INTO vehicle_variant (model_id, year_from, year_to, submodel)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(model_id)
    .bind(year_from)
    .bind(year_to)
    .bind(submodel)
    .fetch_one(pool)
    .await
}

#[allow(clippy::too_many_arguments)]
async fn insert_product(
    pool: &PgPool,
    title: &str,
    slug: &str,
    price_minor_units: i64,
    stock_count: i32,
    category_slug: Option<&str>,
    part_number: &str,
    attributes: serde_json::Value,
) -> Result<ProductId, sqlx::Error> {
    let existing =
        sqlx::query_scalar::<_, ProductId>("SELECT id FROM product WHERE slug = $1")
            .bind(slug)
            .fetch_optional(pool)
            .await?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let category_id = match category_slug {
        None => None,
        Some(cat_slug) => {
            sqlx::query_scalar::<_, CategoryId>("SELECT id FROM category WHERE slug = $1")
                .bind(cat_slug)
                .fetch_optional(pool)
                .await?
        }
    };

    sqlx::query_scalar::<_, ProductId>(
        "INSERT INTO product (title, slug, price, stock_count, category_id, part_number, attributes)
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(title)
    .bind(slug)
    .bind(price_minor_units)
    .bind(stock_count)
    .bind(category_id)
    .bind(part_number)
    .bind(attributes)
    .fetch_one(pool)
    .await
}

async fn link_fitment(
    pool: &PgPool,
    product_id: ProductId,
    variant_id: VehicleVariantId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO product_fitment (product_id, variant_id) VALUES ($1, $2)
         ON CONFLICT (product_id, variant_id) DO NOTHING",
    )
    .bind(product_id)
    .bind(variant_id)
    .execute(pool)
    .await?;

    Ok(())
}
