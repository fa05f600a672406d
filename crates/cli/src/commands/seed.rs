//! Catalog seeding command.
//!
//! Inserts a small set of sample spring bed items so a fresh database has
//! something to browse. Re-running is safe: rows are matched by name and
//! never duplicated.

use super::CommandError;

/// Sample catalog rows: (name, description, image asset).
const SAMPLE_ITEMS: &[(&str, &str, &str)] = &[
    (
        "Classic Spring Bed",
        "Bonnell spring core with a quilted cotton top. Medium-firm support.",
        "items/classic_spring_bed.png",
    ),
    (
        "Pocket Spring Deluxe",
        "Individually pocketed springs for motion isolation. Plush pillow top.",
        "items/pocket_spring_deluxe.png",
    ),
    (
        "Ortho Firm",
        "High-coil-count orthopedic spring bed with reinforced edges.",
        "items/ortho_firm.png",
    ),
    (
        "Hybrid Cloud",
        "Pocket springs under a gel memory foam comfort layer.",
        "items/hybrid_cloud.png",
    ),
];

/// Seed the catalog with sample items.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    // Name collisions mean the row is already seeded
    let mut inserted = 0_u64;
    for (name, description, image_asset) in SAMPLE_ITEMS {
        let result = sqlx::query(
            "INSERT INTO items (name, description, image_asset) \
             SELECT $1, $2, $3 \
             WHERE NOT EXISTS (SELECT 1 FROM items WHERE name = $1)",
        )
        .bind(name)
        .bind(description)
        .bind(image_asset)
        .execute(&pool)
        .await?;

        inserted += result.rows_affected();
    }

    tracing::info!(inserted, total = SAMPLE_ITEMS.len(), "Seeding complete");
    Ok(())
}
