use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of budget line an entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
    Investment,
    Allocation,
}

/// How an entry's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    /// A quantity expressed in the entry's own frequency.
    #[default]
    Amount,
    /// A 0-100 percentage of the referenced entry's resolved monthly value.
    Percent,
}

/// The cadence an amount is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 4] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" | "annual" | "annually" => Ok(Frequency::Yearly),
            other => Err(format!("Unknown frequency '{}' (expected daily, weekly, monthly or yearly)", other)),
        }
    }
}

/// One budget line.
///
/// Entries are owned by the editing layer. The engines only ever borrow a
/// snapshot of them for the duration of a single call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "mode", alias = "valueMode", default)]
    pub value_mode: ValueMode,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub reference: String,
    #[serde(rename = "freq", alias = "frequency", default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub category: String,

    // --- Allocation-only fields ---
    #[serde(default)]
    pub is_wealth_building: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_income: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_account: Option<String>,
}

impl Entry {
    /// A fixed amount quoted at `frequency`.
    pub fn amount(
        id: impl Into<String>,
        entry_type: EntryType,
        name: impl Into<String>,
        value: f64,
        frequency: Frequency,
    ) -> Self {
        Self {
            id: id.into(),
            entry_type,
            name: name.into(),
            value_mode: ValueMode::Amount,
            value,
            reference: String::new(),
            frequency,
            category: String::new(),
            is_wealth_building: false,
            source_income: None,
            target_account: None,
        }
    }

    /// `percent`% of whichever entry is named `reference`.
    pub fn percent(
        id: impl Into<String>,
        entry_type: EntryType,
        name: impl Into<String>,
        percent: f64,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            value_mode: ValueMode::Percent,
            value: percent,
            reference: reference.into(),
            ..Self::amount(id, entry_type, name, 0.0, Frequency::Monthly)
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Routes an allocation into the account with id `account_id`.
    pub fn targeting(mut self, account_id: impl Into<String>) -> Self {
        self.target_account = Some(account_id.into());
        self
    }

    pub fn wealth_building(mut self) -> Self {
        self.is_wealth_building = true;
        self
    }

    pub fn is_percent(&self) -> bool {
        self.value_mode == ValueMode::Percent
    }
}

/// The allowed kinds of balance-holding account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Retirement,
    Investment,
    #[default]
    Savings,
    Liquid,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Retirement => "retirement",
            AccountType::Investment => "investment",
            AccountType::Savings => "savings",
            AccountType::Liquid => "liquid",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retirement" => Ok(AccountType::Retirement),
            "investment" => Ok(AccountType::Investment),
            "savings" => Ok(AccountType::Savings),
            "liquid" => Ok(AccountType::Liquid),
            other => Err(format!(
                "Account type '{}' must be one of retirement, investment, savings, liquid",
                other
            )),
        }
    }
}

/// A balance-holding bucket targeted by allocation entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub balance: f64,
    /// Annual fractional rate, e.g. `0.07`.
    #[serde(default)]
    pub expected_return: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, balance: f64, expected_return: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type: AccountType::default(),
            balance,
            expected_return,
            is_active: true,
        }
    }
}

/// The exported document shape: `{ "rows": [...], "accounts": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub rows: Vec<Entry>,
    #[serde(default)]
    pub accounts: Vec<Account>,
}

impl Snapshot {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("daily", Frequency::Daily)]
    #[case(" Weekly ", Frequency::Weekly)]
    #[case("MONTHLY", Frequency::Monthly)]
    #[case("annual", Frequency::Yearly)]
    fn test_frequency_parsing(#[case] input: &str, #[case] expected: Frequency) {
        assert_eq!(input.parse::<Frequency>().unwrap(), expected);
    }

    #[test]
    fn test_account_type_rejects_unknown() {
        let err = "checking".parse::<AccountType>().unwrap_err();
        assert!(err.contains("checking"));
    }

    #[test]
    fn test_snapshot_reads_export_document() {
        let json = r#"{
            "rows": [
                { "id": "1", "type": "income", "name": "Salary", "value": 75000,
                  "mode": "amount", "reference": "", "freq": "yearly", "category": "Salary" },
                { "id": "2", "type": "expense", "name": "Tax", "value": 30,
                  "mode": "percent", "reference": "Salary", "freq": "monthly", "category": "Taxes" },
                { "id": "3", "type": "allocation", "name": "401k", "value": 500,
                  "mode": "amount", "freq": "monthly", "isWealthBuilding": true,
                  "sourceIncome": "Salary", "targetAccount": "acc-1" }
            ],
            "accounts": [
                { "id": "acc-1", "name": "Retirement", "type": "retirement",
                  "balance": 10000, "expectedReturn": 0.07 }
            ]
        }"#;

        let snap = Snapshot::from_json_str(json).expect("valid document");
        assert_eq!(snap.rows.len(), 3);
        assert_eq!(snap.rows[0].frequency, Frequency::Yearly);
        assert_eq!(snap.rows[1].value_mode, ValueMode::Percent);
        assert!(snap.rows[2].is_wealth_building);
        assert_eq!(snap.rows[2].target_account.as_deref(), Some("acc-1"));
        assert_eq!(snap.accounts[0].account_type, AccountType::Retirement);
        assert!(snap.accounts[0].is_active, "isActive defaults to true");
    }

    #[test]
    fn test_unknown_entry_type_is_rejected() {
        let json = r#"{ "rows": [ { "id": "1", "type": "gift", "value": 1 } ] }"#;
        assert!(Snapshot::from_json_str(json).is_err());
    }
}
