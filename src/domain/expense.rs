//! Expense records and the form used to create or edit them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{Displayable, Identifiable};
use crate::currency::Currency;
use crate::errors::{Result, TripError};

pub const DEFAULT_EXPENSE_CATEGORY: &str = "飲食";

/// Amount as entered: stored data may hold numbers, numeric text, or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
    #[default]
    Missing,
}

impl Amount {
    /// Whole units used in every computation.
    ///
    /// Numbers are truncated toward zero. Text contributes its leading integer
    /// (`"1200円"` is 1200); anything unparseable, blank, or missing counts as 0.
    pub fn whole_units(&self) -> i64 {
        match self {
            Amount::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value.trunc() as i64))
                .unwrap_or(0),
            Amount::Text(text) => leading_integer(text),
            Amount::Missing => 0,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Amount::Number(_) => false,
            Amount::Text(text) => text.trim().is_empty(),
            Amount::Missing => true,
        }
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount::Number(value.into())
    }
}

impl From<&str> for Amount {
    fn from(value: &str) -> Self {
        Amount::Text(value.to_string())
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Amount::Number(number) => write!(f, "{number}"),
            Amount::Text(text) => f.write_str(text),
            Amount::Missing => f.write_str("-"),
        }
    }
}

fn leading_integer(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let digits: String = rest.chars().take_while(|ch| ch.is_ascii_digit()).collect();
    digits.parse::<i64>().map(|value| sign * value).unwrap_or(0)
}

/// Means of payment. Only [`PaymentMethod::RewardsCard`] earns cashback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    #[default]
    Cash,
    CreditCard,
    RewardsCard,
    Other(String),
}

impl PaymentMethod {
    pub fn label(&self) -> &str {
        match self {
            PaymentMethod::Cash => "現金",
            PaymentMethod::CreditCard => "信用卡",
            PaymentMethod::RewardsCard => "星展信用卡",
            PaymentMethod::Other(label) => label,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "現金" => PaymentMethod::Cash,
            "信用卡" => PaymentMethod::CreditCard,
            "星展信用卡" => PaymentMethod::RewardsCard,
            _ => PaymentMethod::Other(value),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = TripError;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TripError::Validation("payment method is required".into()));
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "cash" => PaymentMethod::Cash,
            "card" | "credit" | "credit-card" => PaymentMethod::CreditCard,
            "rewards" | "rewards-card" | "dbs" => PaymentMethod::RewardsCard,
            _ => PaymentMethod::from(trimmed.to_string()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    pub id: i64,
    /// `None` when the stored date is blank or unreadable.
    #[serde(default, with = "date_or_blank")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub amount: Amount,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub payment: PaymentMethod,
    #[serde(default)]
    pub currency: Currency,
}

impl ExpenseRecord {
    pub fn date_label(&self) -> String {
        self.date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "----------".to_string())
    }
}

/// Dates as the stored records write them: `YYYY-MM-DD`, or `""` once cleared.
mod date_or_blank {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(date) => serializer.collect_str(date),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(crate::domain::parse_date_key))
    }
}

fn default_category() -> String {
    DEFAULT_EXPENSE_CATEGORY.to_string()
}

impl Identifiable for ExpenseRecord {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Displayable for ExpenseRecord {
    fn display_label(&self) -> String {
        format!(
            "{} {} {} {} [{}]",
            self.date_label(), self.name, self.amount, self.currency, self.payment
        )
    }
}

/// Editable copy of an expense. `id == None` means the form creates a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub name: String,
    pub amount: Amount,
    pub category: String,
    pub payment: PaymentMethod,
    pub currency: Currency,
}

impl ExpenseForm {
    /// Blank form for a new expense on `date`.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: None,
            date: Some(date),
            name: String::new(),
            amount: Amount::Missing,
            category: default_category(),
            payment: PaymentMethod::Cash,
            currency: Currency::Jpy,
        }
    }

    pub fn edit(record: &ExpenseRecord) -> Self {
        Self {
            id: Some(record.id),
            date: record.date,
            name: record.name.clone(),
            amount: record.amount.clone(),
            category: record.category.clone(),
            payment: record.payment.clone(),
            currency: record.currency,
        }
    }

    /// Changes the currency. The rewards card only applies to JPY spending, so
    /// switching to TWD downgrades it to the plain credit card; returns `true` then.
    pub fn set_currency(&mut self, currency: Currency) -> bool {
        self.currency = currency;
        if currency == Currency::Twd && self.payment == PaymentMethod::RewardsCard {
            self.payment = PaymentMethod::CreditCard;
            return true;
        }
        false
    }

    pub fn validate(&self) -> Result<()> {
        if self.amount.is_blank() {
            return Err(TripError::Validation("expense amount is required".into()));
        }
        if self.amount.whole_units() < 0 {
            return Err(TripError::Validation(
                "expense amount cannot be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn into_record(self, id: i64) -> ExpenseRecord {
        ExpenseRecord {
            id,
            date: self.date,
            name: self.name,
            amount: self.amount,
            category: self.category,
            payment: self.payment,
            currency: self.currency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    #[test]
    fn amounts_follow_leading_integer_rules() {
        assert_eq!(Amount::from(1500).whole_units(), 1500);
        assert_eq!(Amount::from("1200").whole_units(), 1200);
        assert_eq!(Amount::from("  980円").whole_units(), 980);
        assert_eq!(Amount::from("12.9").whole_units(), 12);
        assert_eq!(Amount::from("abc").whole_units(), 0);
        assert_eq!(Amount::from("").whole_units(), 0);
        assert_eq!(Amount::Missing.whole_units(), 0);
        let fractional: Amount = serde_json::from_str("99.7").unwrap();
        assert_eq!(fractional.whole_units(), 99);
    }

    #[test]
    fn amount_deserializes_from_any_stored_shape() {
        let raw = r#"[1500, "300", null]"#;
        let amounts: Vec<Amount> = serde_json::from_str(raw).unwrap();
        assert_eq!(amounts[0], Amount::from(1500));
        assert_eq!(amounts[1], Amount::from("300"));
        assert_eq!(amounts[2], Amount::Missing);
    }

    #[test]
    fn payment_labels_round_trip_through_strings() {
        let methods: Vec<PaymentMethod> =
            serde_json::from_str(r#"["現金","信用卡","星展信用卡","Suica"]"#).unwrap();
        assert_eq!(
            methods,
            vec![
                PaymentMethod::Cash,
                PaymentMethod::CreditCard,
                PaymentMethod::RewardsCard,
                PaymentMethod::Other("Suica".into())
            ]
        );
        let json = serde_json::to_string(&PaymentMethod::RewardsCard).unwrap();
        assert_eq!(json, "\"星展信用卡\"");
    }

    #[test]
    fn switching_to_twd_drops_rewards_card() {
        let mut form = ExpenseForm::new(day());
        form.payment = PaymentMethod::RewardsCard;
        assert!(form.set_currency(Currency::Twd));
        assert_eq!(form.payment, PaymentMethod::CreditCard);

        form.payment = PaymentMethod::Cash;
        assert!(!form.set_currency(Currency::Jpy));
        assert_eq!(form.payment, PaymentMethod::Cash);
    }

    #[test]
    fn forms_require_an_amount() {
        let mut form = ExpenseForm::new(day());
        assert!(form.validate().is_err());
        form.amount = Amount::from("  ");
        assert!(form.validate().is_err());
        form.amount = Amount::from(-5);
        assert!(form.validate().is_err());
        form.amount = Amount::from(800);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn record_defaults_fill_missing_fields() {
        let record: ExpenseRecord =
            serde_json::from_str(r#"{"id":9,"date":"2026-02-21","amount":"500"}"#).unwrap();
        assert_eq!(record.category, DEFAULT_EXPENSE_CATEGORY);
        assert_eq!(record.payment, PaymentMethod::Cash);
        assert_eq!(record.currency, Currency::Jpy);
    }

    #[test]
    fn blank_or_missing_dates_load_as_undated() {
        let records: Vec<ExpenseRecord> = serde_json::from_str(
            r#"[{"id":1,"date":"","amount":300},{"id":2,"amount":1},{"id":3,"date":null}]"#,
        )
        .unwrap();
        assert!(records.iter().all(|record| record.date.is_none()));
        assert_eq!(records[0].date_label(), "----------");
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["date"], "");

        let dated: ExpenseRecord =
            serde_json::from_str(r#"{"id":4,"date":"2026-02-22","amount":1}"#).unwrap();
        assert_eq!(dated.date, NaiveDate::from_ymd_opt(2026, 2, 22));
        assert_eq!(serde_json::to_value(&dated).unwrap()["date"], "2026-02-22");
    }
}
