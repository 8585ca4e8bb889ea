//! Database seeding command.
//!
//! Seeds the reference data a fresh install needs: display categories,
//! a starter set of testimonials, and the transactional newsletter
//! templates. Products and prices are NOT seeded; they come from the
//! Stripe catalog import.
//!
//! Seeding is idempotent: rows are matched on their unique keys and
//! skipped when already present.

use sqlx::PgPool;

use super::migrate::MigrationError;

/// Categories shown in the storefront, in display order.
const CATEGORIES: &[(&str, &str, &str, i32)] = &[
    (
        "Bouquets",
        "bouquets",
        "Hand-tied bouquets for every occasion",
        1,
    ),
    (
        "Wedding Arrangements",
        "wedding-arrangements",
        "Ceremony and reception florals",
        2,
    ),
    (
        "Event Installations",
        "event-installations",
        "Large-scale floral installations for corporate and private events",
        3,
    ),
    (
        "Plants & Succulents",
        "plants-succulents",
        "Low-maintenance greenery for home and office",
        4,
    ),
];

const TESTIMONIALS: &[(&str, &str, &str, bool)] = &[
    (
        "Elena Vasquez",
        "Bride",
        "The arrangements were beyond anything we imagined. Our guests are still talking about the centerpieces.",
        true,
    ),
    (
        "Marcus Webb",
        "Event Coordinator, The Grandview",
        "Reliable, creative, and always on time. Dandeline is our first call for every gala.",
        true,
    ),
    (
        "Priya Natarajan",
        "Office Manager",
        "Our weekly office arrangements brighten the whole floor. Effortless to work with.",
        false,
    ),
];

const NEWSLETTER_TEMPLATES: &[(&str, &str, &str, &str)] = &[
    (
        "Monthly Bloom",
        "What's blooming this month at Dandeline",
        "<h1>What's blooming</h1><p>Seasonal highlights and featured arrangements.</p>",
        "Seasonal highlights and featured arrangements",
    ),
    (
        "Event Season Prep",
        "Planning an event? Let's talk flowers",
        "<h1>Event season is here</h1><p>Book your consultation before the calendar fills.</p>",
        "Book your consultation before the calendar fills",
    ),
];

/// Seed reference data.
///
/// # Errors
///
/// Returns `MigrationError` if the database is unreachable or an insert
/// fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| MigrationError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    seed_categories(&pool).await?;
    seed_testimonials(&pool).await?;
    seed_newsletter_templates(&pool).await?;

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<(), MigrationError> {
    for (name, slug, description, sort_order) in CATEGORIES {
        sqlx::query(
            "INSERT INTO categories (name, slug, description, is_active, sort_order) \
             VALUES ($1, $2, $3, TRUE, $4) \
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .bind(sort_order)
        .execute(pool)
        .await?;
    }

    tracing::info!(count = CATEGORIES.len(), "Categories seeded");
    Ok(())
}

async fn seed_testimonials(pool: &PgPool) -> Result<(), MigrationError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM testimonials")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        tracing::info!("Testimonials already present, skipping");
        return Ok(());
    }

    for (name, title, quote, is_featured) in TESTIMONIALS {
        sqlx::query(
            "INSERT INTO testimonials (name, title, quote, is_featured, is_active) \
             VALUES ($1, $2, $3, $4, TRUE)",
        )
        .bind(name)
        .bind(title)
        .bind(quote)
        .bind(is_featured)
        .execute(pool)
        .await?;
    }

    tracing::info!(count = TESTIMONIALS.len(), "Testimonials seeded");
    Ok(())
}

async fn seed_newsletter_templates(pool: &PgPool) -> Result<(), MigrationError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM newsletter_templates")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        tracing::info!("Newsletter templates already present, skipping");
        return Ok(());
    }

    for (name, subject, content, preview_text) in NEWSLETTER_TEMPLATES {
        sqlx::query(
            "INSERT INTO newsletter_templates (name, subject, content, preview_text, status) \
             VALUES ($1, $2, $3, $4, 'draft')",
        )
        .bind(name)
        .bind(subject)
        .bind(content)
        .bind(preview_text)
        .execute(pool)
        .await?;
    }

    tracing::info!(count = NEWSLETTER_TEMPLATES.len(), "Newsletter templates seeded");
    Ok(())
}
