use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use csmju_finance::{Amount, NewTransaction, TransactionType, sqlite_backend};

const DEMO_EMAIL: &str = "demo@csmju.example.com";
const DEMO_PASSWORD: &str = "tamarind-mango-sticky-rice-2024";

/// (type, account, days ago, category, baht, note)
const SAMPLE_TRANSACTIONS: [(TransactionType, &str, i64, &str, u32, &str); 8] = [
    (TransactionType::Income, "กสิกร", 0, "เงินเดือน", 25_000, ""),
    (TransactionType::Income, "เงินสด", 3, "งานฟรีแลนซ์", 4_500, "ออกแบบโลโก้"),
    (TransactionType::Income, "กรุงไทย", 10, "ขายของออนไลน์", 300, "ขายของมือสอง"),
    (TransactionType::Expense, "เงินสด", 0, "ค่าอาหาร", 65, "ข้าวมันไก่"),
    (TransactionType::Expense, "เงินสด", 1, "ค่ารถ", 40, "รถสองแถว"),
    (TransactionType::Expense, "กสิกร", 2, "ค่าบ้าน", 3_500, "ค่าหอเดือนนี้"),
    (TransactionType::Expense, "กสิกร", 5, "ค่าช้อปปิ้ง", 890, ""),
    (TransactionType::Expense, "เงินสด", 5, "ค่าอาหาร", 120, "ชาไข่มุก"),
];

/// A utility for creating a demo database for the CSMJU Finance server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let (identity, store) = sqlite_backend(Connection::open(output_path)?)?;

    println!("Creating demo user {DEMO_EMAIL}...");
    identity.sign_up(DEMO_EMAIL, DEMO_PASSWORD).await?;
    let session = identity
        .sign_in_with_password(DEMO_EMAIL, DEMO_PASSWORD)
        .await?;

    println!("Adding sample transactions...");
    let today = OffsetDateTime::now_utc().date();

    for (kind, account, days_ago, category, baht, note) in SAMPLE_TRANSACTIONS {
        store
            .insert(
                &session,
                NewTransaction {
                    kind,
                    account: account.to_owned(),
                    date: today - Duration::days(days_ago),
                    category: category.to_owned(),
                    amount: Amount::from_baht(baht),
                    note: (!note.is_empty()).then(|| note.to_owned()),
                },
            )
            .await?;
    }

    identity.sign_out(&session).await?;

    println!("Success! Log in with {DEMO_EMAIL} and password {DEMO_PASSWORD}");

    Ok(())
}
