/// batch payment - one transfer spread over several open purchases
use purchase_ledger::chrono::{NaiveDate, TimeZone, Utc};
use purchase_ledger::{
    JsonFileStore, Ledger, LedgerConfig, Money, PaymentMethod, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LedgerConfig::default();
    purchase_ledger::logging::init_from_config(&config);

    let path = std::env::temp_dir().join("purchase-ledger-demo.json");
    let _ = std::fs::remove_file(&path);

    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()));
    let mut ledger = Ledger::with_time(config, JsonFileStore::open(&path)?, time)?;
    let store = ledger.register_store("hardware store")?;
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).ok_or("bad date")?;

    let ids = vec![
        ledger.register_purchase(store.id, "screws", Money::from_major(30), day)?.id,
        ledger.register_purchase(store.id, "drill", Money::from_major(50), day)?.id,
        ledger.register_purchase(store.id, "paint", Money::from_major(20), day)?.id,
    ];

    let touched = ledger.apply_batch_payment(&ids, Money::from_major(60), PaymentMethod::Pix, day)?;
    for purchase in &touched {
        println!(
            "{:<8} paid {} remaining {} ({})",
            purchase.description,
            ledger.format_money(purchase.paid_amount()),
            ledger.format_money(purchase.remaining_amount()),
            purchase.status()
        );
    }

    for purchase in ledger.pending_purchases(store.id)? {
        println!("still open: {} {}", purchase.description, ledger.format_money(purchase.remaining_amount()));
    }

    println!("saved to {}", path.display());
    Ok(())
}
