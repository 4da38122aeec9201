use chrono::NaiveDate;
use uuid::Uuid;

use ledger_core::reports::{
    balance_sheet, burn_rate_runway, cash_flow, financial_summary, general_ledger,
    profit_and_loss, trial_balance, AccountFilter, BurnRateParams, CashFlowParams,
    GeneralLedgerParams, PnlParams, SummaryParams, SummaryPeriod,
};
use ledger_core::{
    create_entry_lines, Account, AccountType, DateRange, Entry, LedgerStore, MemoryStore,
    ProposedEntry, TransactionContext,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn post(store: &mut MemoryStore, debit: Uuid, credit: Uuid, amount: f64, on: NaiveDate) {
    let entry = Entry::new(on, "posted entry");
    let proposed = ProposedEntry {
        debit_account_id: debit,
        credit_account_id: credit,
        amount,
        currency: "USD".into(),
        memo: "posted entry".into(),
    };
    let lines = create_entry_lines(&proposed, entry.id).to_vec();
    store.write_entry(entry, lines).unwrap();
}

/// A quarter of activity for a small consulting business.
fn seeded_business() -> (MemoryStore, Uuid) {
    let mut store = MemoryStore::new();
    let checking = store.add_account(Account::new("Business Checking", AccountType::Asset));
    let card = store.add_account(Account::new("Credit Card", AccountType::Liability));
    let capital = store.add_account(Account::new("Owner Capital", AccountType::Equity));
    let revenue = store.add_account(Account::new("Consulting Revenue", AccountType::Income));
    let payroll = store.add_account(Account::new("Payroll", AccountType::Expense));
    let software = store.add_account(Account::new("Software", AccountType::Expense));

    post(&mut store, checking, capital, 20_000.0, date(2024, 1, 2));
    post(&mut store, checking, revenue, 6_000.0, date(2024, 1, 20));
    post(&mut store, checking, revenue, 4_000.0, date(2024, 2, 18));
    post(&mut store, payroll, checking, 5_000.0, date(2024, 2, 28));
    post(&mut store, software, card, 1_000.0, date(2024, 3, 5));

    store.add_transaction(TransactionContext {
        amount: -1_000.0,
        merchant: Some("SaaS Vendor".into()),
        description: "subscriptions".into(),
        category: vec!["Software".into()],
        plaid_category: Vec::new(),
        date: date(2024, 3, 5),
        is_business: true,
        user_id: "u1".into(),
    });

    (store, checking)
}

#[test]
fn profit_and_loss_over_the_quarter() {
    let (store, _) = seeded_business();
    let params = PnlParams {
        range: DateRange::new(date(2024, 1, 1), date(2024, 3, 31)),
        filter: AccountFilter::Blended,
    };

    let pnl = profit_and_loss(&store, "u1", &params);
    assert_eq!(pnl.revenue.total, 10_000.0);
    assert_eq!(pnl.expenses.total, 6_000.0);
    assert_eq!(pnl.net_income, 4_000.0);
    assert!((pnl.gross_margin - 40.0).abs() < 1e-9);
    // The equity injection is not income.
    assert_eq!(pnl.revenue.items.len(), 1);
}

#[test]
fn balance_sheet_balances_and_carries_retained_earnings() {
    let (store, _) = seeded_business();
    let sheet = balance_sheet(&store, "u1", date(2024, 3, 31), AccountFilter::Blended);

    assert_eq!(sheet.assets.total, 25_000.0);
    assert_eq!(sheet.liabilities.total, 1_000.0);
    assert_eq!(sheet.equity.total, 20_000.0);
    assert_eq!(sheet.retained_earnings, 4_000.0);
    assert!(sheet.is_balanced);
}

#[test]
fn trial_balance_totals_match_by_construction() {
    let (store, _) = seeded_business();
    let report = trial_balance(&store, "u1", date(2024, 3, 31), AccountFilter::Blended);

    assert!(report.is_balanced);
    assert_eq!(report.total_debits, report.total_credits);
    assert_eq!(report.rows.len(), 6);
    // Statement ordering: assets first, expenses last.
    assert_eq!(report.rows[0].account_type, AccountType::Asset);
    assert_eq!(report.rows[5].account_type, AccountType::Expense);
}

#[test]
fn cash_flow_ties_to_the_checking_balance() {
    let (store, checking) = seeded_business();
    let params = CashFlowParams {
        range: DateRange::new(date(2024, 1, 1), date(2024, 3, 31)),
        filter: AccountFilter::Blended,
    };

    let statement = cash_flow(&store, "u1", &params);
    assert_eq!(statement.net_income, 4_000.0);
    // The card balance grew by 1000, freeing cash.
    assert_eq!(statement.liability_change, 1_000.0);
    assert_eq!(statement.ending_cash, 25_000.0);
    assert!(statement.cash_from_investing.is_none());

    let account = store.get_account(checking).unwrap();
    assert_eq!(
        ledger_core::reports::account_balance_as_of(&store, &account, date(2024, 3, 31)),
        statement.ending_cash
    );
}

#[test]
fn burn_rate_reflects_profitable_and_lossy_months() {
    let (store, _) = seeded_business();
    let report = burn_rate_runway(
        &store,
        "u1",
        &BurnRateParams {
            as_of: date(2024, 3, 31),
            months: 3,
            filter: AccountFilter::Blended,
            revenue_increase_pct: None,
        },
    );

    assert_eq!(report.monthly.len(), 3);
    assert_eq!(report.monthly[0].net_burn, -6_000.0);
    assert_eq!(report.monthly[1].net_burn, 1_000.0);
    assert_eq!(report.monthly[2].net_burn, 1_000.0);
    // Profitable on average, so no runway countdown.
    assert!(report.runway_months.is_none());
    assert_eq!(report.cash_on_hand, 25_000.0);
}

#[test]
fn monthly_summary_composes_income_statement_and_cash_flow() {
    let (store, _) = seeded_business();
    let summary = financial_summary(
        &store,
        "u1",
        &SummaryParams {
            period: SummaryPeriod::Monthly,
            as_of: date(2024, 2, 29),
            filter: AccountFilter::Blended,
        },
    );

    assert_eq!(summary.range.start, date(2024, 2, 1));
    assert_eq!(summary.profit_loss.revenue.total, 4_000.0);
    assert_eq!(summary.profit_loss.net_income, -1_000.0);
    assert_eq!(summary.cash_flow.net_income, -1_000.0);
}

#[test]
fn general_ledger_lists_the_quarter_in_entry_order() {
    let (store, checking) = seeded_business();
    // Trailing-year window, the conventional default reporting range.
    let params = GeneralLedgerParams {
        range: DateRange::trailing_year(date(2024, 3, 31)),
        account_id: Some(checking),
    };

    let ledger = general_ledger(&store, "u1", &params);
    // Four of the five postings touch checking; the card purchase does not.
    assert_eq!(ledger.rows.len(), 4);
    assert!(ledger.rows.windows(2).all(|w| w[0].date <= w[1].date));
    assert_eq!(ledger.rows[0].debit, 20_000.0);
    // Running balance ends at the checking account's as-of balance.
    assert_eq!(ledger.rows[3].balance, 25_000.0);

    let everything = general_ledger(
        &store,
        "u1",
        &GeneralLedgerParams {
            range: params.range,
            account_id: None,
        },
    );
    // Every entry contributes both of its lines.
    assert_eq!(everything.rows.len(), 10);
}

#[test]
fn reports_recompute_identically() {
    let (store, _) = seeded_business();
    let range = DateRange::new(date(2024, 1, 1), date(2024, 3, 31));
    let params = PnlParams {
        range,
        filter: AccountFilter::Blended,
    };

    assert_eq!(
        profit_and_loss(&store, "u1", &params),
        profit_and_loss(&store, "u1", &params)
    );
    assert_eq!(
        balance_sheet(&store, "u1", range.end, AccountFilter::Blended),
        balance_sheet(&store, "u1", range.end, AccountFilter::Blended)
    );
    assert_eq!(
        trial_balance(&store, "u1", range.end, AccountFilter::Blended),
        trial_balance(&store, "u1", range.end, AccountFilter::Blended)
    );
}

#[test]
fn empty_store_produces_well_formed_zero_reports() {
    let store = MemoryStore::new();
    let range = DateRange::new(date(2024, 1, 1), date(2024, 3, 31));

    let pnl = profit_and_loss(
        &store,
        "u1",
        &PnlParams {
            range,
            filter: AccountFilter::Blended,
        },
    );
    assert_eq!(pnl.revenue.total, 0.0);
    assert_eq!(pnl.net_income, 0.0);
    assert_eq!(pnl.gross_margin, 0.0);

    let sheet = balance_sheet(&store, "u1", range.end, AccountFilter::Blended);
    assert_eq!(sheet.assets.total, 0.0);
    assert!(sheet.is_balanced);

    let report = trial_balance(&store, "u1", range.end, AccountFilter::Blended);
    assert!(report.rows.is_empty());
    assert!(report.is_balanced);
}
