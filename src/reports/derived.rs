use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::account::AccountType;
use crate::domain::transaction::TransactionContext;
use crate::period::DateRange;
use crate::store::LedgerStore;

use super::balance::{account_balance_as_of, natural_balance};
use super::cash_flow::{cash_flow, CashFlowParams, CashFlowStatement};
use super::profit_loss::{profit_and_loss, top_categories, CategoryAmount, PnlParams, ProfitAndLoss};
use super::AccountFilter;

/// Parameters for the burn-rate and runway analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BurnRateParams {
    pub as_of: NaiveDate,
    /// How many trailing calendar months to analyze.
    pub months: u32,
    #[serde(default)]
    pub filter: AccountFilter,
    /// What-if scenario: scale monthly revenue up by this percentage and
    /// recompute the runway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_increase_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBurn {
    /// `YYYY-MM` label.
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    /// Expenses minus income; positive means the month consumed cash.
    pub net_burn: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BurnRateReport {
    pub range: DateRange,
    pub monthly: Vec<MonthlyBurn>,
    pub average_burn: f64,
    /// Most recent month's net burn.
    pub current_burn: f64,
    pub cash_on_hand: f64,
    /// Months of cash left at the average burn; absent when not burning or
    /// when there is no cash to burn.
    pub runway_months: Option<f64>,
    /// Runway under the revenue-increase scenario, when one was requested.
    pub scenario_runway_months: Option<f64>,
}

/// Net burn per trailing calendar month, with a cash runway projection.
pub fn burn_rate_runway(
    store: &dyn LedgerStore,
    scope: &str,
    params: &BurnRateParams,
) -> BurnRateReport {
    let accounts = params.filter.apply(store.list_accounts(scope));
    let start = months_before(params.as_of, params.months.saturating_sub(1));
    let range = DateRange::new(start, params.as_of);

    let mut monthly = Vec::new();
    for window in range.calendar_months() {
        let mut income = 0.0;
        let mut expenses = 0.0;
        for account in &accounts {
            match account.account_type {
                AccountType::Income => {
                    income += natural_balance(store, account, Some(&window.range))
                }
                AccountType::Expense => {
                    expenses += natural_balance(store, account, Some(&window.range))
                }
                _ => {}
            }
        }
        monthly.push(MonthlyBurn {
            month: window.label,
            income,
            expenses,
            net_burn: expenses - income,
        });
    }

    let average_burn = average(monthly.iter().map(|m| m.net_burn));
    let current_burn = monthly.last().map_or(0.0, |m| m.net_burn);

    let mut cash_on_hand = 0.0;
    for account in &accounts {
        if account.account_type != AccountType::Asset {
            continue;
        }
        cash_on_hand += if store.list_entry_lines(account.id, None).is_empty() {
            account.balance.unwrap_or(0.0)
        } else {
            account_balance_as_of(store, account, params.as_of)
        };
    }

    let scenario_runway_months = params.revenue_increase_pct.and_then(|pct| {
        let scenario_burn = average(
            monthly
                .iter()
                .map(|m| m.expenses - m.income * (1.0 + pct / 100.0)),
        );
        runway(cash_on_hand, scenario_burn)
    });

    BurnRateReport {
        range,
        monthly,
        average_burn,
        current_burn,
        cash_on_hand,
        runway_months: runway(cash_on_hand, average_burn),
        scenario_runway_months,
    }
}

fn runway(cash: f64, burn: f64) -> Option<f64> {
    if cash > 0.0 && burn > 0.0 {
        Some(cash / burn)
    } else {
        None
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRevenue {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiDashboard {
    pub range: DateRange,
    pub revenue: f64,
    pub expenses: f64,
    pub net_income: f64,
    /// Percentage; 0 when there is no revenue.
    pub gross_margin: f64,
    /// Revenue change versus the preceding same-length period; absent when
    /// the prior period had no revenue to compare against.
    pub revenue_growth_pct: Option<f64>,
    /// Average revenue per paying counterparty, with distinct income
    /// merchants standing in for customers.
    pub arpu: Option<f64>,
    pub owner_compensation: f64,
    /// Top revenue sources by merchant (falling back to description).
    pub top_products: Vec<ProductRevenue>,
    /// Requires marketing-spend and cohort data this engine does not hold.
    pub cac: Option<f64>,
    pub ltv: Option<f64>,
    pub churn_rate: Option<f64>,
}

const OWNER_COMP_KEYWORDS: [&str; 4] = ["compensation", "salary", "owner", "draw"];
const TOP_PRODUCT_LIMIT: usize = 10;

/// Business-scoped KPI rollup over a date range.
pub fn kpi_dashboard(store: &dyn LedgerStore, scope: &str, range: &DateRange) -> KpiDashboard {
    let params = PnlParams {
        range: *range,
        filter: AccountFilter::Business,
    };
    let pnl = profit_and_loss(store, scope, &params);
    let previous = profit_and_loss(
        store,
        scope,
        &PnlParams {
            range: range.preceding(),
            filter: AccountFilter::Business,
        },
    );

    let transactions: Vec<TransactionContext> = store
        .list_transactions(scope, Some(range))
        .into_iter()
        .filter(|txn| txn.is_business)
        .collect();

    let mut customers: Vec<String> = transactions
        .iter()
        .filter(|txn| txn.is_income())
        .map(|txn| party_name(txn).to_lowercase())
        .collect();
    customers.sort();
    customers.dedup();
    let arpu = if customers.is_empty() {
        None
    } else {
        Some(pnl.revenue.total / customers.len() as f64)
    };

    let owner_compensation = transactions
        .iter()
        .filter(|txn| txn.is_expense() && mentions_owner_comp(txn))
        .map(|txn| txn.magnitude())
        .sum();

    let mut by_product: BTreeMap<String, f64> = BTreeMap::new();
    for txn in transactions.iter().filter(|txn| txn.is_income()) {
        *by_product.entry(party_name(txn).to_string()).or_insert(0.0) += txn.amount;
    }
    let mut top_products: Vec<ProductRevenue> = by_product
        .into_iter()
        .map(|(name, amount)| ProductRevenue { name, amount })
        .collect();
    top_products.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));
    top_products.truncate(TOP_PRODUCT_LIMIT);

    KpiDashboard {
        range: *range,
        revenue: pnl.revenue.total,
        expenses: pnl.expenses.total,
        net_income: pnl.net_income,
        gross_margin: pnl.gross_margin,
        revenue_growth_pct: change_pct(pnl.revenue.total, previous.revenue.total),
        arpu,
        owner_compensation,
        top_products,
        cac: None,
        ltv: None,
        churn_rate: None,
    }
}

fn mentions_owner_comp(txn: &TransactionContext) -> bool {
    let haystacks = txn
        .merchant
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(txn.description.as_str()))
        .chain(txn.effective_categories().iter().map(String::as_str));
    for text in haystacks {
        let text = text.to_lowercase();
        if OWNER_COMP_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            return true;
        }
    }
    false
}

fn party_name(txn: &TransactionContext) -> &str {
    txn.merchant.as_deref().unwrap_or(&txn.description)
}

fn change_pct(current: f64, previous: f64) -> Option<f64> {
    if previous != 0.0 {
        Some((current - previous) / previous * 100.0)
    } else {
        None
    }
}

/// Outstanding amounts by age since the transaction date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgingBuckets {
    /// 0 to 30 days old.
    pub current: f64,
    pub days_31_60: f64,
    pub days_61_90: f64,
    pub over_90: f64,
}

impl AgingBuckets {
    fn add(&mut self, age_days: i64, amount: f64) {
        match age_days {
            i64::MIN..=30 => self.current += amount,
            31..=60 => self.days_31_60 += amount,
            61..=90 => self.days_61_90 += amount,
            _ => self.over_90 += amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartyAging {
    pub name: String,
    pub total: f64,
    pub buckets: AgingBuckets,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgingReport {
    pub as_of: NaiveDate,
    pub total: f64,
    pub buckets: AgingBuckets,
    /// Amounts older than standard 30-day terms.
    pub overdue: f64,
    /// Per-counterparty breakdown, largest total first.
    pub parties: Vec<PartyAging>,
}

const AGING_WINDOW_DAYS: i64 = 90;
const PAYMENT_TERMS_DAYS: i64 = 30;

/// Receivables aging: recent income activity, by customer, bucketed by age.
///
/// Without an invoicing subledger, income transactions from the trailing 90
/// days stand in for open receivables.
pub fn receivables_aging(store: &dyn LedgerStore, scope: &str, as_of: NaiveDate) -> AgingReport {
    aging(store, scope, as_of, true)
}

/// Payables aging: recent expense activity, by vendor, bucketed by age.
pub fn payables_aging(store: &dyn LedgerStore, scope: &str, as_of: NaiveDate) -> AgingReport {
    aging(store, scope, as_of, false)
}

fn aging(store: &dyn LedgerStore, scope: &str, as_of: NaiveDate, income: bool) -> AgingReport {
    let window = DateRange::new(as_of - chrono::Duration::days(AGING_WINDOW_DAYS), as_of);
    let mut buckets = AgingBuckets::default();
    let mut total = 0.0;
    let mut overdue = 0.0;
    let mut by_party: BTreeMap<String, PartyAging> = BTreeMap::new();

    for txn in store.list_transactions(scope, Some(&window)) {
        if income != txn.is_income() || txn.amount == 0.0 {
            continue;
        }
        let amount = txn.magnitude();
        let age = (as_of - txn.date).num_days();
        total += amount;
        buckets.add(age, amount);
        if age > PAYMENT_TERMS_DAYS {
            overdue += amount;
        }
        let party = by_party
            .entry(party_name(&txn).to_string())
            .or_insert_with_key(|name| PartyAging {
                name: name.clone(),
                total: 0.0,
                buckets: AgingBuckets::default(),
            });
        party.total += amount;
        party.buckets.add(age, amount);
    }

    let mut parties: Vec<PartyAging> = by_party.into_values().collect();
    parties.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    AgingReport {
        as_of,
        total,
        buckets,
        overdue,
        parties,
    }
}

/// Summary granularity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Monthly,
    Quarterly,
}

impl SummaryPeriod {
    fn months(self) -> u32 {
        match self {
            SummaryPeriod::Monthly => 1,
            SummaryPeriod::Quarterly => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SummaryParams {
    pub period: SummaryPeriod,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub filter: AccountFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendComparison {
    pub revenue_change_pct: Option<f64>,
    pub expense_change_pct: Option<f64>,
    pub net_income_change_pct: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialSummary {
    pub range: DateRange,
    pub period: SummaryPeriod,
    pub profit_loss: ProfitAndLoss,
    pub cash_flow: CashFlowStatement,
    pub top_expense_categories: Vec<CategoryAmount>,
    /// Versus the preceding period of the same length.
    pub trends: TrendComparison,
}

const TOP_CATEGORY_LIMIT: usize = 5;

/// One-stop period summary composing the income statement and cash flow.
pub fn financial_summary(
    store: &dyn LedgerStore,
    scope: &str,
    params: &SummaryParams,
) -> FinancialSummary {
    let start = months_before(params.as_of, params.period.months().saturating_sub(1));
    let range = DateRange::new(start, params.as_of);

    let pnl = profit_and_loss(
        store,
        scope,
        &PnlParams {
            range,
            filter: params.filter,
        },
    );
    let previous = profit_and_loss(
        store,
        scope,
        &PnlParams {
            range: range.preceding(),
            filter: params.filter,
        },
    );
    let flow = cash_flow(
        store,
        scope,
        &CashFlowParams {
            range,
            filter: params.filter,
        },
    );

    let transactions: Vec<TransactionContext> = store
        .list_transactions(scope, Some(&range))
        .into_iter()
        .filter(|txn| match params.filter {
            AccountFilter::Business => txn.is_business,
            AccountFilter::Personal => !txn.is_business,
            AccountFilter::Blended => true,
        })
        .collect();
    let top_expense_categories = top_categories(&transactions, false, TOP_CATEGORY_LIMIT);

    let trends = TrendComparison {
        revenue_change_pct: change_pct(pnl.revenue.total, previous.revenue.total),
        expense_change_pct: change_pct(pnl.expenses.total, previous.expenses.total),
        net_income_change_pct: change_pct(pnl.net_income, previous.net_income),
    };

    FinancialSummary {
        range,
        period: params.period,
        profit_loss: pnl,
        cash_flow: flow,
        top_expense_categories,
        trends,
    }
}

/// First day of the month `months` calendar months before `date`'s month.
fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - months as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Account;
    use crate::domain::entry::{Entry, ProposedEntry};
    use crate::ledger::create_entry_lines;
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post(store: &mut MemoryStore, debit: Uuid, credit: Uuid, amount: f64, on: NaiveDate) {
        let entry = Entry::new(on, "entry");
        let proposed = ProposedEntry {
            debit_account_id: debit,
            credit_account_id: credit,
            amount,
            currency: "USD".into(),
            memo: "entry".into(),
        };
        store
            .write_entry(entry.clone(), create_entry_lines(&proposed, entry.id).to_vec())
            .unwrap();
    }

    fn txn(amount: f64, merchant: &str, on: NaiveDate, business: bool) -> TransactionContext {
        TransactionContext {
            amount,
            merchant: Some(merchant.into()),
            description: merchant.into(),
            category: vec!["General".into()],
            plaid_category: Vec::new(),
            date: on,
            is_business: business,
            user_id: "u1".into(),
        }
    }

    #[test]
    fn burn_and_runway_from_monthly_activity() {
        let mut store = MemoryStore::new();
        let checking = store.add_account(Account::new("Checking", AccountType::Asset));
        let revenue = store.add_account(Account::new("Revenue", AccountType::Income));
        let payroll = store.add_account(Account::new("Payroll", AccountType::Expense));

        // Seed cash, then burn 1000 net in each of three months.
        post(&mut store, checking, revenue, 12_000.0, date(2023, 12, 15));
        for month in 1..=3 {
            post(&mut store, checking, revenue, 2_000.0, date(2024, month, 10));
            post(&mut store, payroll, checking, 3_000.0, date(2024, month, 20));
        }

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
        assert_eq!(report.average_burn, 1_000.0);
        assert_eq!(report.current_burn, 1_000.0);
        assert_eq!(report.cash_on_hand, 9_000.0);
        assert_eq!(report.runway_months, Some(9.0));
    }

    #[test]
    fn profitable_months_yield_no_runway_number() {
        let mut store = MemoryStore::new();
        let checking = store.add_account(Account::new("Checking", AccountType::Asset));
        let revenue = store.add_account(Account::new("Revenue", AccountType::Income));
        post(&mut store, checking, revenue, 5_000.0, date(2024, 2, 10));

        let report = burn_rate_runway(
            &store,
            "u1",
            &BurnRateParams {
                as_of: date(2024, 3, 31),
                months: 2,
                filter: AccountFilter::Blended,
                revenue_increase_pct: None,
            },
        );
        assert!(report.average_burn < 0.0);
        assert!(report.runway_months.is_none());
    }

    #[test]
    fn revenue_scenario_extends_runway() {
        let mut store = MemoryStore::new();
        let checking = store.add_account(Account::new("Checking", AccountType::Asset));
        let revenue = store.add_account(Account::new("Revenue", AccountType::Income));
        let payroll = store.add_account(Account::new("Payroll", AccountType::Expense));

        post(&mut store, checking, revenue, 10_000.0, date(2023, 12, 1));
        post(&mut store, checking, revenue, 1_000.0, date(2024, 1, 10));
        post(&mut store, payroll, checking, 2_000.0, date(2024, 1, 20));

        let report = burn_rate_runway(
            &store,
            "u1",
            &BurnRateParams {
                as_of: date(2024, 1, 31),
                months: 1,
                filter: AccountFilter::Blended,
                revenue_increase_pct: Some(50.0),
            },
        );
        // Burn 1000 -> scenario burn 500, so the runway doubles.
        let base = report.runway_months.unwrap();
        let scenario = report.scenario_runway_months.unwrap();
        assert!((scenario - base * 2.0).abs() < 1e-9);
    }

    #[test]
    fn kpi_dashboard_aggregates_business_activity() {
        let mut store = MemoryStore::new();
        let checking =
            store.add_account(Account::new("Business Checking", AccountType::Asset).business());
        let revenue = store.add_account(Account::new("Revenue", AccountType::Income).business());
        let comp =
            store.add_account(Account::new("Owner Compensation", AccountType::Expense).business());

        let range = DateRange::new(date(2024, 4, 1), date(2024, 6, 30));
        post(&mut store, checking, revenue, 9_000.0, date(2024, 5, 1));
        post(&mut store, comp, checking, 3_000.0, date(2024, 5, 15));
        // Prior-period revenue for the growth comparison.
        post(&mut store, checking, revenue, 6_000.0, date(2024, 2, 1));

        store.add_transaction(txn(6_000.0, "Acme Corp", date(2024, 5, 1), true));
        store.add_transaction(txn(3_000.0, "Globex", date(2024, 5, 2), true));
        store.add_transaction(txn(-3_000.0, "Owner Draw", date(2024, 5, 15), true));

        let dashboard = kpi_dashboard(&store, "u1", &range);
        assert_eq!(dashboard.revenue, 9_000.0);
        assert_eq!(dashboard.net_income, 6_000.0);
        assert_eq!(dashboard.revenue_growth_pct, Some(50.0));
        assert_eq!(dashboard.arpu, Some(4_500.0));
        assert_eq!(dashboard.owner_compensation, 3_000.0);
        assert_eq!(dashboard.top_products[0].name, "Acme Corp");
        assert!(dashboard.cac.is_none());
        assert!(dashboard.ltv.is_none());
    }

    #[test]
    fn aging_buckets_split_on_thirty_day_boundaries() {
        let mut store = MemoryStore::new();
        let as_of = date(2024, 6, 30);
        store.add_transaction(txn(500.0, "Acme Corp", date(2024, 6, 20), true)); // 10 days
        store.add_transaction(txn(300.0, "Acme Corp", date(2024, 5, 11), true)); // 50 days
        store.add_transaction(txn(200.0, "Globex", date(2024, 4, 21), true)); // 70 days
        store.add_transaction(txn(-900.0, "Vendor", date(2024, 6, 1), true)); // expense, excluded

        let report = receivables_aging(&store, "u1", as_of);
        assert_eq!(report.total, 1_000.0);
        assert_eq!(report.buckets.current, 500.0);
        assert_eq!(report.buckets.days_31_60, 300.0);
        assert_eq!(report.buckets.days_61_90, 200.0);
        assert_eq!(report.overdue, 500.0);
        assert_eq!(report.parties[0].name, "Acme Corp");
        assert_eq!(report.parties[0].total, 800.0);
    }

    #[test]
    fn payables_only_counts_expenses() {
        let mut store = MemoryStore::new();
        let as_of = date(2024, 6, 30);
        store.add_transaction(txn(-400.0, "Vendor A", date(2024, 6, 25), true));
        store.add_transaction(txn(1_000.0, "Customer", date(2024, 6, 25), true));

        let report = payables_aging(&store, "u1", as_of);
        assert_eq!(report.total, 400.0);
        assert_eq!(report.overdue, 0.0);
        assert_eq!(report.parties.len(), 1);
    }

    #[test]
    fn quarterly_summary_spans_three_months_and_reports_trends() {
        let mut store = MemoryStore::new();
        let checking = store.add_account(Account::new("Checking", AccountType::Asset));
        let revenue = store.add_account(Account::new("Revenue", AccountType::Income));

        // Prior quarter earns 1000, current quarter earns 1500.
        post(&mut store, checking, revenue, 1_000.0, date(2024, 2, 15));
        post(&mut store, checking, revenue, 1_500.0, date(2024, 5, 15));

        let summary = financial_summary(
            &store,
            "u1",
            &SummaryParams {
                period: SummaryPeriod::Quarterly,
                as_of: date(2024, 6, 30),
                filter: AccountFilter::Blended,
            },
        );

        assert_eq!(summary.range.start, date(2024, 4, 1));
        assert_eq!(summary.profit_loss.revenue.total, 1_500.0);
        assert_eq!(summary.trends.revenue_change_pct, Some(50.0));
        assert!(summary.trends.expense_change_pct.is_none());
    }
}
