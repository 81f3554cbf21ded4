/// reports - summaries, monthly limits and savings goals
use purchase_ledger::chrono::NaiveDate;
use purchase_ledger::{Goal, Ledger, LedgerConfig, MemoryStore, Money, PaymentMethod, SpendingLimit};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LedgerConfig::default();
    purchase_ledger::logging::init_from_config(&config);

    let mut ledger = Ledger::new(config, MemoryStore::new())?;
    let market = ledger.register_store("market")?;
    let pharmacy = ledger.register_store("pharmacy")?;
    let day = |d| NaiveDate::from_ymd_opt(2024, 7, d).ok_or("bad date");

    let food = ledger.register_purchase(market.id, "food", Money::from_major(420), day(3)?)?;
    ledger.register_purchase(pharmacy.id, "vitamins", Money::from_major(95), day(9)?)?;
    ledger.apply_payment(food.id, Money::from_major(200), PaymentMethod::Debit, day(10)?)?;
    ledger.apply_credit_payment(food.id, Money::from_major(120), day(12)?, 4)?;

    let summary = ledger.summary()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    let usage = ledger.limit_usage(&SpendingLimit::new(2024, 7, Money::from_major(500))?)?;
    println!(
        "july: spent {} of {} ({}), exceeded: {}",
        ledger.format_money(usage.spent),
        ledger.format_money(usage.limit),
        usage.utilization,
        usage.exceeded
    );

    let goal = ledger.add_goal(Goal::new("vacation", Money::from_major(3_000), None)?)?;
    let progress = ledger.contribute_to_goal(goal, Money::from_major(750))?.progress();
    println!("vacation goal: {}", progress);

    Ok(())
}
