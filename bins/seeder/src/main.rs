//! Database seeder for Monedero development and testing.
//!
//! Seeds a handful of users at different onboarding stages and provisions
//! a wallet account for each of them.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use monedero_db::entities::{
    sea_orm_active_enums::{Currency, UserStatus},
    users,
};
use monedero_db::repositories::account::{AccountError, AccountRepository};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

/// Seed users with stable IDs so re-runs are idempotent.
const SEED_USERS: &[(&str, &str, &str, &str, UserStatus)] = &[
    (
        "00000000-0000-0000-0000-000000000001",
        "juan@monedero.dev",
        "Juan",
        "Perez",
        UserStatus::Authorized,
    ),
    (
        "00000000-0000-0000-0000-000000000002",
        "ana@monedero.dev",
        "Ana",
        "Gomez",
        UserStatus::Authorized,
    ),
    (
        "00000000-0000-0000-0000-000000000003",
        "carla@monedero.dev",
        "Carla",
        "Diaz",
        UserStatus::Protected,
    ),
    (
        "00000000-0000-0000-0000-000000000004",
        "pedro@monedero.dev",
        "Pedro",
        "Lopez",
        UserStatus::Pending,
    ),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = monedero_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding accounts...");
    seed_accounts(&db).await;

    println!("Seeding complete!");
}

async fn seed_users(db: &DatabaseConnection) {
    for (id, email, name, surname, status) in SEED_USERS {
        let user_id = Uuid::parse_str(id).expect("seed user ID must be valid");

        if users::Entity::find_by_id(user_id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  {email} already exists, skipping...");
            continue;
        }

        let now = Utc::now();
        let user = users::ActiveModel {
            id: Set(user_id),
            email: Set((*email).to_string()),
            name: Set((*name).to_string()),
            surname: Set((*surname).to_string()),
            status: Set(*status),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        user.insert(db).await.expect("Failed to insert seed user");
        println!("  {email} created");
    }
}

async fn seed_accounts(db: &DatabaseConnection) {
    let accounts = AccountRepository::new(db.clone());

    for (id, email, ..) in SEED_USERS {
        let user_id = Uuid::parse_str(id).expect("seed user ID must be valid");

        match accounts.create(user_id, Currency::Ars).await {
            Ok(account) => {
                println!("  account {} for {email} created", account.code);
            }
            Err(AccountError::OwnerHasAccount(_)) => {
                println!("  {email} already has an account, skipping...");
            }
            Err(e) => panic!("Failed to create seed account for {email}: {e}"),
        }
    }
}
