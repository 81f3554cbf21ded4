/// quick start - register a purchase and pay it off in two steps
use purchase_ledger::chrono::NaiveDate;
use purchase_ledger::{Ledger, LedgerConfig, MemoryStore, Money, PaymentMethod, PurchaseView};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LedgerConfig::from_json_str(r#"{ "logFilter": "purchase_ledger=debug" }"#)?;
    purchase_ledger::logging::init_from_config(&config);

    let mut ledger = Ledger::new(config, MemoryStore::new())?;
    let shop = ledger.register_store("corner market")?;
    let today = NaiveDate::from_ymd_opt(2024, 5, 10).ok_or("bad date")?;

    let purchase = ledger.register_purchase(shop.id, "groceries", Money::from_major(100), today)?;

    let updated = ledger.apply_payment(purchase.id, Money::from_major(40), PaymentMethod::Pix, today)?;
    println!("{}", PurchaseView::from_purchase(&updated).to_json_pretty()?);

    let updated = ledger.apply_payment(purchase.id, Money::from_major(60), PaymentMethod::Cash, today)?;
    println!("{}", PurchaseView::from_purchase(&updated).to_json_pretty()?);

    Ok(())
}
