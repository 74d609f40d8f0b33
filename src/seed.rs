//! Demo fixtures rebuilt at startup.

use time::macros::date;
use tracing::info;

use crate::{
    auth::password::hash_password_blocking,
    store::{Db, NewCompany, NewTender, NewUser, TenderStatus},
};

pub const DEMO_EMAIL: &str = "test@example.com";
pub const DEMO_PASSWORD: &str = "password123";

/// Wipe every store, then create one user, their company and three open tenders.
/// Must run before the listener accepts requests.
pub async fn seed_demo_data(db: &Db) -> anyhow::Result<()> {
    db.reset();

    let password_hash = hash_password_blocking(DEMO_PASSWORD.into()).await?;
    let (user, company) = db.register_account(
        NewUser {
            email: DEMO_EMAIL.into(),
            username: "testuser".into(),
            password_hash,
        },
        NewCompany {
            name: "Test Company Inc".into(),
            industry: "Technology".into(),
            description: "A test company for development".into(),
            ..Default::default()
        },
    )?;
    info!(user_id = user.id, company_id = company.id, "seeded demo account");

    let tenders = [
        (
            "Website Development Project",
            "We need a modern, responsive website for our business.",
            15000.0,
            date!(2024 - 12 - 31),
        ),
        (
            "Mobile App Development",
            "Looking for a skilled developer to create a cross-platform mobile app.",
            25000.0,
            date!(2024 - 11 - 30),
        ),
        (
            "E-commerce Platform",
            "Need a complete e-commerce solution with inventory management, payment processing, and admin dashboard.",
            35000.0,
            date!(2024 - 10 - 31),
        ),
    ];
    for (title, description, budget, deadline) in tenders {
        let tender = db.tenders.create(NewTender {
            company_id: company.id,
            title: title.into(),
            description: description.into(),
            budget,
            deadline,
            status: Some(TenderStatus::Open),
        });
        info!(tender_id = tender.id, title = %tender.title, "seeded tender");
    }

    info!(email = DEMO_EMAIL, "demo data ready");
    Ok(())
}
