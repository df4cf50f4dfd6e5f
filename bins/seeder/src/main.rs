//! Demo data seeder for BrokerDesk.
//!
//! Creates (or reuses) the demo agency, wipes its records and fills it with
//! clients, policies across every renewal scenario, activities and document
//! records. Prints a development bearer token for the demo agency at the end.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use brokerdesk_core::activity::ActivityType;
use brokerdesk_core::document::{DocumentOwner, object_path};
use brokerdesk_core::policy::{PolicyStatus, PolicyType};
use brokerdesk_core::renewal::{DEFAULT_WINDOW_DAYS, days_until_expiration, describe};
use brokerdesk_db::entities::{activities, client_notes, clients, documents, policies};
use brokerdesk_db::{AgencyRepository, connect_with};
use brokerdesk_shared::{AppConfig, JwtService};
use chrono::{Duration, Months, NaiveDate, Utc};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde_json::{Value, json};
use uuid::Uuid;

const DEMO_AGENCY_ID: &str = "00000000-0000-0000-0000-0000000000a1";
const DEMO_AGENCY_NAME: &str = "Demo Agency";
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-0000000000b1";

struct DemoClient {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    phone: &'static str,
    address: &'static str,
    notes: &'static str,
}

const DEMO_CLIENTS: [DemoClient; 12] = [
    DemoClient {
        first_name: "John",
        last_name: "Martinez",
        email: "john.martinez@email.com",
        phone: "(555) 234-5678",
        address: "123 Oak Street, Austin, TX 78701",
        notes: "Prefers email communication. Client since 2019.",
    },
    DemoClient {
        first_name: "Sarah",
        last_name: "Johnson",
        email: "sarah.j@email.com",
        phone: "(555) 345-6789",
        address: "456 Maple Ave, Austin, TX 78702",
        notes: "VIP client. Referred by her brother.",
    },
    DemoClient {
        first_name: "Michael",
        last_name: "Chen",
        email: "mchen@techcorp.com",
        phone: "(555) 456-7890",
        address: "789 Pine Road, Round Rock, TX 78664",
        notes: "Business owner. Interested in an umbrella policy.",
    },
    DemoClient {
        first_name: "Emily",
        last_name: "Davis",
        email: "emily.davis@gmail.com",
        phone: "(555) 567-8901",
        address: "321 Elm Street, Cedar Park, TX 78613",
        notes: "New homeowner.",
    },
    DemoClient {
        first_name: "Robert",
        last_name: "Wilson",
        email: "rwilson@lawfirm.com",
        phone: "(555) 678-9012",
        address: "654 Birch Lane, Georgetown, TX 78628",
        notes: "Attorney. Needs comprehensive coverage.",
    },
    DemoClient {
        first_name: "Lisa",
        last_name: "Anderson",
        email: "lisa.anderson@email.com",
        phone: "(555) 789-0123",
        address: "987 Cedar Drive, Pflugerville, TX 78660",
        notes: "Recently married. Updating beneficiaries.",
    },
    DemoClient {
        first_name: "David",
        last_name: "Thompson",
        email: "dthompson@email.com",
        phone: "(555) 890-1234",
        address: "147 Walnut Way, Leander, TX 78641",
        notes: "Teenage drivers in the household.",
    },
    DemoClient {
        first_name: "Jennifer",
        last_name: "Garcia",
        email: "jgarcia@startup.io",
        phone: "(555) 901-2345",
        address: "258 Spruce Court, Austin, TX 78703",
        notes: "Startup founder. Needs business insurance.",
    },
    DemoClient {
        first_name: "William",
        last_name: "Brown",
        email: "wbrown@retired.net",
        phone: "(555) 012-3456",
        address: "369 Ash Boulevard, Austin, TX 78704",
        notes: "Retired. Looking at life insurance options.",
    },
    DemoClient {
        first_name: "Amanda",
        last_name: "Miller",
        email: "amanda.miller@hospital.org",
        phone: "(555) 123-4567",
        address: "741 Hickory Street, Austin, TX 78705",
        notes: "Nurse. Asked about disability coverage.",
    },
    DemoClient {
        first_name: "James",
        last_name: "Taylor",
        email: "jtaylor@construction.com",
        phone: "(555) 234-5679",
        address: "852 Poplar Place, Manor, TX 78653",
        notes: "Construction business. High-risk occupation.",
    },
    DemoClient {
        first_name: "Michelle",
        last_name: "Lee",
        email: "mlee@design.co",
        phone: "(555) 345-6780",
        address: "963 Sycamore Lane, Austin, TX 78706",
        notes: "Interior designer. Works from home.",
    },
];

const CARRIERS: [&str; 10] = [
    "State Farm",
    "Allstate",
    "Progressive",
    "GEICO",
    "Liberty Mutual",
    "USAA",
    "Nationwide",
    "Travelers",
    "American Family",
    "Farmers",
];

const SEEDED_TYPES: [PolicyType; 6] = [
    PolicyType::Auto,
    PolicyType::Home,
    PolicyType::Life,
    PolicyType::Health,
    PolicyType::Business,
    PolicyType::Umbrella,
];

const DOCUMENT_NAMES: [&str; 8] = [
    "policy_declaration.pdf",
    "proof_of_insurance.pdf",
    "claim_form.pdf",
    "id_verification.jpg",
    "property_photos.zip",
    "vehicle_registration.pdf",
    "medical_records.pdf",
    "inspection_report.pdf",
];

#[derive(Debug, Default)]
struct Summary {
    clients: usize,
    policies: usize,
    activities: usize,
    documents: usize,
    renewals: Vec<(String, i64)>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = connect_with(&config.database)
        .await
        .context("failed to connect to database")?;

    let agency_id = Uuid::parse_str(DEMO_AGENCY_ID)?;
    ensure_agency(&db, agency_id).await?;

    println!("Clearing existing demo data...");
    clear_agency(&db, agency_id).await?;

    let mut rng = rand::rng();
    let today = Utc::now().date_naive();
    let mut summary = Summary::default();

    println!("Inserting clients, policies and activities...");
    for (index, demo) in DEMO_CLIENTS.iter().enumerate() {
        let client = insert_client(&db, agency_id, demo).await?;
        summary.clients += 1;

        let policy_count = rng.random_range(1..=3);
        let mut types = SEEDED_TYPES;
        types.shuffle(&mut rng);

        let mut client_policies = Vec::with_capacity(policy_count);
        for policy_type in types.into_iter().take(policy_count) {
            let scenario = summary.policies % 6;
            let policy =
                insert_policy(&db, &mut rng, agency_id, client.id, policy_type, scenario, today)
                    .await?;
            let days = days_until_expiration(policy.expiration_date, today);
            if (0..=DEFAULT_WINDOW_DAYS).contains(&days) {
                summary.renewals.push((policy.policy_number.clone(), days));
            }
            client_policies.push(policy.id);
            summary.policies += 1;
        }

        for _ in 0..rng.random_range(2..=5) {
            insert_activity(&db, &mut rng, agency_id, client.id, &client_policies).await?;
            summary.activities += 1;
        }

        if index < 8 {
            let mut names = DOCUMENT_NAMES;
            names.shuffle(&mut rng);
            for base in names.into_iter().take(rng.random_range(1..=3)) {
                insert_document(&db, &mut rng, agency_id, &client, &client_policies, base)
                    .await?;
                summary.documents += 1;
            }
        }
    }

    let token = JwtService::new((&config.jwt).into())
        .issue_token(Uuid::parse_str(DEMO_USER_ID)?, agency_id, "admin")
        .context("failed to issue development token")?;

    println!("{}", "=".repeat(50));
    println!("Database seeded successfully");
    println!("  agency:     {DEMO_AGENCY_NAME} ({agency_id})");
    println!("  clients:    {}", summary.clients);
    println!("  policies:   {}", summary.policies);
    println!("  activities: {}", summary.activities);
    println!("  documents:  {}", summary.documents);
    println!("Renewals in the next {DEFAULT_WINDOW_DAYS} days:");
    summary.renewals.sort_by_key(|(_, days)| *days);
    for (policy_number, days) in &summary.renewals {
        println!("  {policy_number:<12} {}", describe(*days));
    }
    println!("{}", "=".repeat(50));
    println!("Development token:\n{token}");

    Ok(())
}

async fn ensure_agency(db: &DatabaseConnection, agency_id: Uuid) -> anyhow::Result<()> {
    let agencies = AgencyRepository::new(db.clone());
    if agencies.find_by_id(agency_id).await?.is_some() {
        println!("  Demo agency already exists, reusing it");
        return Ok(());
    }

    agencies
        .create(agency_id, DEMO_AGENCY_NAME, "America/Chicago")
        .await?;
    println!("  Created demo agency");
    Ok(())
}

/// Removes the agency's records, children first.
async fn clear_agency(db: &DatabaseConnection, agency_id: Uuid) -> anyhow::Result<()> {
    documents::Entity::delete_many()
        .filter(documents::Column::AgencyId.eq(agency_id))
        .exec(db)
        .await?;
    activities::Entity::delete_many()
        .filter(activities::Column::AgencyId.eq(agency_id))
        .exec(db)
        .await?;
    client_notes::Entity::delete_many()
        .filter(client_notes::Column::AgencyId.eq(agency_id))
        .exec(db)
        .await?;
    policies::Entity::delete_many()
        .filter(policies::Column::AgencyId.eq(agency_id))
        .exec(db)
        .await?;
    clients::Entity::delete_many()
        .filter(clients::Column::AgencyId.eq(agency_id))
        .exec(db)
        .await?;
    Ok(())
}

async fn insert_client(
    db: &DatabaseConnection,
    agency_id: Uuid,
    demo: &DemoClient,
) -> anyhow::Result<clients::Model> {
    let now = Utc::now().into();
    let model = clients::ActiveModel {
        id: Set(Uuid::new_v4()),
        agency_id: Set(agency_id),
        first_name: Set(demo.first_name.to_string()),
        last_name: Set(demo.last_name.to_string()),
        email: Set(Some(demo.email.to_string())),
        phone: Set(Some(demo.phone.to_string())),
        address: Set(Some(demo.address.to_string())),
        notes: Set(Some(demo.notes.to_string())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(db).await?)
}

/// Expiration date for one of the demo scenarios:
/// 0 urgent (3-7 days), 1 upcoming (8-30 days), 2 expired (1-60 days ago),
/// anything else 2-8 months out.
fn scenario_expiration(rng: &mut impl Rng, scenario: usize, today: NaiveDate) -> NaiveDate {
    match scenario {
        0 => today + Duration::days(rng.random_range(3..=7)),
        1 => today + Duration::days(rng.random_range(8..=30)),
        2 => today - Duration::days(rng.random_range(1..=60)),
        _ => today
            .checked_add_months(Months::new(rng.random_range(2..=8)))
            .unwrap_or(today),
    }
}

fn premium_range(policy_type: PolicyType) -> (i64, i64) {
    match policy_type {
        PolicyType::Auto => (800, 2500),
        PolicyType::Home => (1200, 4000),
        PolicyType::Life => (300, 1500),
        PolicyType::Health => (4000, 12000),
        PolicyType::Business => (2000, 8000),
        PolicyType::Umbrella | PolicyType::Other => (200, 800),
    }
}

fn policy_details(rng: &mut impl Rng, policy_type: PolicyType) -> Value {
    match policy_type {
        PolicyType::Auto => json!({
            "vehicle": {
                "year": rng.random_range(2020..=2025),
                "make": (["Toyota", "Honda", "Ford", "Tesla", "BMW"]).choose(rng),
                "vin": format!("1HGBH{:011}", rng.random_range(0..100_000_000_000_u64)),
            },
            "coverage": {
                "liability": "100/300/100",
                "collision_deductible": ([500, 1000]).choose(rng),
                "comprehensive_deductible": ([250, 500]).choose(rng),
            },
        }),
        PolicyType::Home => json!({
            "property": {
                "type": (["Single Family", "Condo", "Townhouse"]).choose(rng),
                "year_built": rng.random_range(1990..=2023),
                "square_feet": rng.random_range(1500..4000),
            },
            "coverage": {
                "dwelling": rng.random_range(250_000..750_000),
                "personal_property": rng.random_range(100_000..250_000),
                "liability": 300_000,
                "deductible": ([1000, 2500, 5000]).choose(rng),
            },
        }),
        PolicyType::Life => json!({
            "type": (["Term 20", "Term 30", "Whole Life"]).choose(rng),
            "face_amount": ([250_000, 500_000, 750_000, 1_000_000]).choose(rng),
            "beneficiaries": (["Spouse", "Children", "Estate"]).choose(rng),
        }),
        PolicyType::Health => json!({
            "plan_type": (["PPO", "HMO", "HDHP"]).choose(rng),
            "deductible": ([1500, 3000, 6000]).choose(rng),
            "out_of_pocket_max": ([6000, 8000, 12000]).choose(rng),
            "dependents": rng.random_range(0..4),
        }),
        PolicyType::Business => json!({
            "business_type": (["LLC", "Corporation", "Sole Proprietorship"]).choose(rng),
            "coverage_types": ["General Liability", "Professional Liability", "Property", "Workers Comp"],
            "employees": rng.random_range(1..=50),
            "annual_revenue": rng.random_range(100_000..1_000_000),
        }),
        PolicyType::Umbrella => json!({
            "coverage_amount": ([1_000_000, 2_000_000, 5_000_000]).choose(rng),
            "underlying_policies": ["Auto", "Home"],
        }),
        PolicyType::Other => json!({}),
    }
}

async fn insert_policy(
    db: &DatabaseConnection,
    rng: &mut impl Rng,
    agency_id: Uuid,
    client_id: Uuid,
    policy_type: PolicyType,
    scenario: usize,
    today: NaiveDate,
) -> anyhow::Result<policies::Model> {
    let expiration_date = scenario_expiration(rng, scenario, today);
    let effective_date = expiration_date
        .checked_sub_months(Months::new(12))
        .unwrap_or(expiration_date - Duration::days(365));

    let status = if expiration_date < today {
        if rng.random_bool(0.7) {
            PolicyStatus::Expired
        } else {
            PolicyStatus::Cancelled
        }
    } else if rng.random_bool(0.9) {
        PolicyStatus::Active
    } else {
        PolicyStatus::Pending
    };

    let (min, max) = premium_range(policy_type);
    let premium = Decimal::new(rng.random_range(min * 100..max * 100), 2);
    let prefix: String = policy_type.as_str().chars().take(3).collect();

    let now = Utc::now().into();
    let model = policies::ActiveModel {
        id: Set(Uuid::new_v4()),
        agency_id: Set(agency_id),
        client_id: Set(client_id),
        carrier: Set(CARRIERS.choose(rng).copied().unwrap_or("Farmers").to_string()),
        policy_number: Set(format!(
            "{}-{:06}",
            prefix.to_uppercase(),
            rng.random_range(0..1_000_000)
        )),
        policy_type: Set(policy_type.into()),
        effective_date: Set(effective_date),
        expiration_date: Set(expiration_date),
        premium: Set(premium),
        details: Set(policy_details(rng, policy_type)),
        status: Set(status.into()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(db).await?)
}

fn activity_description(activity_type: ActivityType) -> &'static [&'static str] {
    match activity_type {
        ActivityType::Call => &[
            "Discussed policy renewal options",
            "Follow-up call about claim status",
            "Annual policy review call",
            "Quote request follow-up",
        ],
        ActivityType::Email => &[
            "Sent policy documents",
            "Coverage update confirmation",
            "Premium payment reminder",
            "Quote comparison sent",
        ],
        ActivityType::Task => &[
            "Review policy for renewal",
            "Update client contact information",
            "Process endorsement request",
            "File claim documentation",
        ],
        ActivityType::Meeting => &[
            "Annual coverage review meeting",
            "New client consultation",
            "Policy upgrade consultation",
            "Business insurance assessment",
        ],
        ActivityType::Note => &[
            "Client mentioned interest in increasing coverage",
            "Noted change in family status",
            "Client moving to a new address next month",
            "Requested a callback next week",
        ],
    }
}

/// Inserts an activity due within a month either side of now. Linked
/// policies always come from the same client.
async fn insert_activity(
    db: &DatabaseConnection,
    rng: &mut impl Rng,
    agency_id: Uuid,
    client_id: Uuid,
    client_policies: &[Uuid],
) -> anyhow::Result<()> {
    let activity_type = *ActivityType::ALL.choose(rng).unwrap_or(&ActivityType::Task);
    let description = activity_description(activity_type)
        .choose(rng)
        .copied()
        .unwrap_or("Follow up");

    let now = Utc::now();
    let due_date = now + Duration::hours(rng.random_range(-30 * 24..=30 * 24));
    let completed = if due_date < now {
        rng.random_bool(0.7)
    } else {
        rng.random_bool(0.2)
    };
    let completed_at = completed.then(|| due_date + Duration::hours(rng.random_range(0..72)));

    let policy_id = if rng.random_bool(0.7) {
        client_policies.choose(rng).copied()
    } else {
        None
    };

    activities::ActiveModel {
        id: Set(Uuid::new_v4()),
        agency_id: Set(agency_id),
        activity_type: Set(activity_type.into()),
        description: Set(description.to_string()),
        client_id: Set(Some(client_id)),
        policy_id: Set(policy_id),
        due_date: Set(Some(due_date.into())),
        completed: Set(completed),
        completed_at: Set(completed_at.map(Into::into)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await?;

    Ok(())
}

fn mime_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("pdf") => "application/pdf",
        Some("jpg") => "image/jpeg",
        _ => "application/zip",
    }
}

/// Inserts a document record without uploading a file.
async fn insert_document(
    db: &DatabaseConnection,
    rng: &mut impl Rng,
    agency_id: Uuid,
    client: &clients::Model,
    client_policies: &[Uuid],
    base: &str,
) -> anyhow::Result<()> {
    let file_name = format!("{}_{base}", client.last_name.to_lowercase());
    let policy_id = if rng.random_bool(0.5) {
        client_policies.choose(rng).copied()
    } else {
        None
    };

    let now = Utc::now();
    let owner = DocumentOwner::from_links(Some(client.id), policy_id);

    documents::ActiveModel {
        id: Set(Uuid::new_v4()),
        agency_id: Set(agency_id),
        client_id: Set(Some(client.id)),
        policy_id: Set(policy_id),
        file_path: Set(object_path(agency_id, owner, now, &file_name)),
        mime_type: Set(Some(mime_type_for(&file_name).to_string())),
        file_name: Set(file_name),
        file_size: Set(Some(rng.random_range(100_000..5_100_000))),
        uploaded_at: Set(now.into()),
    }
    .insert(db)
    .await?;

    Ok(())
}
