use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::currency::{Currency, ExchangeRate};
use crate::domain::{
    DateEntry, ExpenseForm, ExpenseRecord, IdGenerator, ItineraryEntry, ShoppingItem,
};
use crate::errors::{Result, TripError};
use crate::itinerary::{DateRangeManager, DeletedDay, ItineraryBook};
use crate::ledger::{ExpenseLedger, ExpenseTotals, RewardStats, SaveKind};
use crate::remote::RemoteUpdate;
use crate::shopping::ShoppingList;
use crate::storage::{PersistenceGateway, StoreKey};
use crate::transfer::{ExportDocument, ImportPayload};
use crate::utils::round_to_i64;
use crate::weather::WeatherReport;

use super::confirm::{Confirmation, Outcome};

/// Owns the whole trip state and writes each store through to persistence
/// right after it changes.
pub struct TripManager {
    range: DateRangeManager,
    shopping: ShoppingList,
    expenses: ExpenseLedger,
    rate: ExchangeRate,
    weather: Option<WeatherReport>,
    ids: IdGenerator,
    storage: Box<dyn PersistenceGateway>,
}

impl TripManager {
    /// Restores every store from `storage`. Absent or unreadable blobs fall back
    /// to an empty store (and the configured default date range, or the sample
    /// plan when `seed_sample` is set).
    pub fn load(storage: Box<dyn PersistenceGateway>, config: &Config) -> Result<Self> {
        let mut book: ItineraryBook = load_or_default(storage.as_ref(), StoreKey::Itinerary);
        if config.seed_sample && book.day_count() == 0 {
            book = ItineraryBook::sample()?;
            tracing::info!(days = book.day_count(), "seeded sample itinerary");
        }
        let shopping: ShoppingList = load_or_default(storage.as_ref(), StoreKey::Shopping);
        let expenses: ExpenseLedger = load_or_default(storage.as_ref(), StoreKey::Expenses);
        let range = DateRangeManager::from_book(book, config.trip_start, config.initial_days)?;

        let mut ids = IdGenerator::new();
        observe_ids(&mut ids, &range, &expenses);

        tracing::info!(
            days = range.len(),
            entries = range.book().entry_count(),
            shopping = shopping.len(),
            expenses = expenses.len(),
            "trip state loaded"
        );

        Ok(Self {
            range,
            shopping,
            expenses,
            rate: config.fallback_exchange_rate(),
            weather: None,
            ids,
            storage,
        })
    }

    pub fn range(&self) -> &DateRangeManager {
        &self.range
    }

    pub fn dates(&self) -> &[DateEntry] {
        self.range.dates()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.range.selected()
    }

    /// Entries of the currently selected day.
    pub fn current_itinerary(&self) -> &[ItineraryEntry] {
        self.range.book().day(self.range.selected())
    }

    pub fn shopping(&self) -> &ShoppingList {
        &self.shopping
    }

    pub fn expenses(&self) -> &ExpenseLedger {
        &self.expenses
    }

    pub fn rate(&self) -> ExchangeRate {
        self.rate
    }

    pub fn set_rate(&mut self, rate: ExchangeRate) {
        tracing::debug!(rate = rate.value(), "exchange rate updated");
        self.rate = rate;
    }

    pub fn weather(&self) -> Option<&WeatherReport> {
        self.weather.as_ref()
    }

    /// Takes in a finished background lookup.
    pub fn apply_remote(&mut self, update: RemoteUpdate) {
        match update {
            RemoteUpdate::Rate(rate) => self.set_rate(rate),
            RemoteUpdate::Weather(report) => self.weather = Some(report),
        }
    }

    pub fn select(&mut self, date: NaiveDate) -> Result<()> {
        self.range.select(date)
    }

    pub fn append_day(&mut self) -> Result<DateEntry> {
        let entry = self.range.append_day()?;
        self.persist(StoreKey::Itinerary);
        Ok(entry)
    }

    pub fn prepend_day(&mut self) -> Result<DateEntry> {
        let entry = self.range.prepend_day()?;
        self.persist(StoreKey::Itinerary);
        Ok(entry)
    }

    /// Deletes a day and all of its entries after confirmation.
    ///
    /// The sole remaining day can never be deleted; that is reported before
    /// asking anything.
    pub fn delete_day(
        &mut self,
        target: NaiveDate,
        confirm: &dyn Confirmation,
    ) -> Result<Outcome<Option<DeletedDay>>> {
        self.range.ensure_deletable()?;
        let prompt = format!("Delete {target} and all of its plans?");
        if !confirm.confirm(&prompt) {
            return Ok(Outcome::Declined);
        }
        let deleted = self.range.delete_day(target)?;
        if deleted.is_some() {
            self.persist(StoreKey::Itinerary);
        }
        Ok(Outcome::Applied(deleted))
    }

    /// Appends `entry` to the selected day under a fresh id, which is returned.
    pub fn add_entry(&mut self, mut entry: ItineraryEntry) -> Result<i64> {
        entry.validate()?;
        entry.id = self.ids.next_id();
        let id = entry.id;
        let date = self.range.selected();
        self.range.book_mut().add_entry(date, entry);
        tracing::debug!(id, %date, "added itinerary entry");
        self.persist(StoreKey::Itinerary);
        Ok(id)
    }

    /// Replaces the selected day's entry carrying `entry.id`.
    pub fn update_entry(&mut self, entry: ItineraryEntry) -> Result<()> {
        entry.validate()?;
        let date = self.range.selected();
        self.range.book_mut().update_entry(date, entry)?;
        self.persist(StoreKey::Itinerary);
        Ok(())
    }

    pub fn delete_entry(
        &mut self,
        id: i64,
        confirm: &dyn Confirmation,
    ) -> Result<Outcome<ItineraryEntry>> {
        let date = self.range.selected();
        let name = self
            .range
            .book()
            .find_entry(date, id)
            .map(|entry| entry.name.clone())
            .ok_or_else(|| TripError::EntryNotFound {
                date: date.to_string(),
                id,
            })?;
        if !confirm.confirm(&format!("Delete `{name}`?")) {
            return Ok(Outcome::Declined);
        }
        let removed = self.range.book_mut().remove_entry(date, id)?;
        self.persist(StoreKey::Itinerary);
        Ok(Outcome::Applied(removed))
    }

    /// Reorders the selected day by moving one entry to a new position.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        let date = self.range.selected();
        self.range.book_mut().move_entry(date, from, to)?;
        self.persist(StoreKey::Itinerary);
        Ok(())
    }

    pub fn add_shopping_item(&mut self, item: ShoppingItem) -> Result<()> {
        self.shopping.add(item)?;
        self.persist(StoreKey::Shopping);
        Ok(())
    }

    pub fn remove_shopping_item(
        &mut self,
        index: usize,
        confirm: &dyn Confirmation,
    ) -> Result<Outcome<ShoppingItem>> {
        self.shopping.ensure_index(index)?;
        if !confirm.confirm("Delete this shopping item?") {
            return Ok(Outcome::Declined);
        }
        let removed = self.shopping.remove(index)?;
        self.persist(StoreKey::Shopping);
        Ok(Outcome::Applied(removed))
    }

    /// Blank expense form dated on the first trip day.
    pub fn new_expense_form(&self) -> ExpenseForm {
        ExpenseForm::new(self.range.first().date())
    }

    pub fn save_expense(&mut self, form: ExpenseForm) -> Result<SaveKind> {
        let kind = self.expenses.save(form, &mut self.ids)?;
        self.persist(StoreKey::Expenses);
        Ok(kind)
    }

    pub fn delete_expense(
        &mut self,
        id: i64,
        confirm: &dyn Confirmation,
    ) -> Result<Outcome<i64>> {
        if self.expenses.find(id).is_none() {
            return Err(TripError::ExpenseNotFound(id));
        }
        if !confirm.confirm("Delete this expense?") {
            return Ok(Outcome::Declined);
        }
        self.expenses.remove(id)?;
        self.persist(StoreKey::Expenses);
        Ok(Outcome::Applied(id))
    }

    pub fn totals(&self) -> ExpenseTotals {
        self.expenses.totals(self.rate)
    }

    pub fn rewards(&self) -> RewardStats {
        self.expenses.rewards_card_stats(self.rate)
    }

    /// Quick JPY→TWD conversion at the current rate, rounded to whole dollars.
    pub fn convert(&self, amount: f64, from: Currency) -> i64 {
        match from {
            Currency::Jpy => round_to_i64(self.rate.jpy_to_twd(amount)),
            Currency::Twd => round_to_i64(self.rate.twd_to_jpy(amount)),
        }
    }

    pub fn export_document(&self) -> ExportDocument<'_> {
        ExportDocument {
            itinerary: self.range.book(),
            shopping: &self.shopping,
            expenses: &self.expenses,
        }
    }

    /// Overwrites every store present in `payload` once the user agrees.
    /// Stores the payload does not mention stay exactly as they are.
    pub fn import(
        &mut self,
        payload: ImportPayload,
        confirm: &dyn Confirmation,
    ) -> Result<Outcome<Vec<&'static str>>> {
        if !confirm.confirm("Importing overwrites the current trip data. Continue?") {
            return Ok(Outcome::Declined);
        }
        let sections = payload.sections();
        if let Some(book) = payload.itinerary {
            self.range.replace_book(book);
            self.persist(StoreKey::Itinerary);
        }
        if let Some(items) = payload.shopping {
            self.shopping.replace_all(items);
            self.persist(StoreKey::Shopping);
        }
        if let Some(records) = payload.expenses {
            self.expenses.replace_all(records);
            self.persist(StoreKey::Expenses);
        }
        observe_ids(&mut self.ids, &self.range, &self.expenses);
        tracing::info!(?sections, "import applied");
        Ok(Outcome::Applied(sections))
    }

    /// Writes one store through to persistence. Failures are logged, never raised.
    fn persist(&self, key: StoreKey) {
        let value = match key {
            StoreKey::Itinerary => to_value(self.range.book()),
            StoreKey::Shopping => to_value(&self.shopping),
            StoreKey::Expenses => to_value(&self.expenses),
        };
        let result = value.and_then(|value| self.storage.save(key, &value));
        if let Err(err) = result {
            tracing::warn!(%key, error = %err, "failed to persist store");
        }
    }
}

fn to_value<T: Serialize>(store: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(store)?)
}

fn load_or_default<T: DeserializeOwned + Default>(
    storage: &dyn PersistenceGateway,
    key: StoreKey,
) -> T {
    let value = match storage.load(key) {
        Ok(Some(value)) => keep_readable_records(key, value),
        Ok(None) => return T::default(),
        Err(err) => {
            tracing::warn!(%key, error = %err, "stored data unreadable, starting empty");
            return T::default();
        }
    };
    serde_json::from_value(value).unwrap_or_else(|err| {
        tracing::warn!(%key, error = %err, "stored data unreadable, starting empty");
        T::default()
    })
}

/// Drops the records of a stored blob that cannot be read so the rest still loads.
fn keep_readable_records(key: StoreKey, value: Value) -> Value {
    match (key, value) {
        (StoreKey::Itinerary, Value::Object(days)) => Value::Object(
            days.into_iter()
                .filter(|(date, _)| readable::<NaiveDate>(key, &Value::String(date.clone())))
                .map(|(date, entries)| (date, keep_readable::<ItineraryEntry>(key, entries)))
                .collect(),
        ),
        (StoreKey::Shopping, value) => keep_readable::<ShoppingItem>(key, value),
        (StoreKey::Expenses, value) => keep_readable::<ExpenseRecord>(key, value),
        (_, value) => value,
    }
}

fn keep_readable<R: DeserializeOwned>(key: StoreKey, value: Value) -> Value {
    match value {
        Value::Array(records) => Value::Array(
            records
                .into_iter()
                .filter(|record| readable::<R>(key, record))
                .collect(),
        ),
        other => other,
    }
}

fn readable<R: DeserializeOwned>(key: StoreKey, record: &Value) -> bool {
    match R::deserialize(record) {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(%key, error = %err, %record, "skipping unreadable stored record");
            false
        }
    }
}

fn observe_ids(ids: &mut IdGenerator, range: &DateRangeManager, expenses: &ExpenseLedger) {
    if let Some(max) = range.book().max_id() {
        ids.observe(max);
    }
    if let Some(max) = expenses.max_id() {
        ids.observe(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::confirm::{AssumeNo, AssumeYes};
    use crate::domain::{Amount, PaymentMethod};
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    /// Shares one memory store between the manager under test and the assertions.
    struct SharedStore(Arc<MemoryStore>);

    impl PersistenceGateway for SharedStore {
        fn save(&self, key: StoreKey, value: &serde_json::Value) -> Result<()> {
            self.0.save(key, value)
        }

        fn load(&self, key: StoreKey) -> Result<Option<serde_json::Value>> {
            self.0.load(key)
        }
    }

    fn manager_with(store: Arc<MemoryStore>) -> TripManager {
        TripManager::load(Box::new(SharedStore(store)), &Config::default()).unwrap()
    }

    fn ymd(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn empty_storage_yields_default_range() {
        let manager = manager_with(Arc::new(MemoryStore::new()));
        assert_eq!(manager.dates().len(), 5);
        assert_eq!(manager.selected_date(), ymd(2, 20));
        assert_eq!(manager.rate().value(), 0.215);
    }

    #[test]
    fn corrupt_blobs_fall_back_to_defaults() {
        let store = Arc::new(MemoryStore::new());
        store.insert_raw(StoreKey::Expenses, "{broken");
        store.insert_raw(StoreKey::Shopping, r#"{"not":"a list"}"#);
        let manager = manager_with(store);
        assert!(manager.expenses().is_empty());
        assert!(manager.shopping().is_empty());
    }

    #[test]
    fn every_mutation_writes_its_store() {
        let store = Arc::new(MemoryStore::new());
        let mut manager = manager_with(store.clone());
        manager.append_day().unwrap();
        manager
            .add_entry(ItineraryEntry::new(0, "Dotonbori", "18:00"))
            .unwrap();
        assert_eq!(store.write_count(StoreKey::Itinerary), 2);

        let mut form = manager.new_expense_form();
        form.amount = Amount::from(500);
        manager.save_expense(form).unwrap();
        assert_eq!(store.write_count(StoreKey::Expenses), 1);
        assert_eq!(store.write_count(StoreKey::Shopping), 0);
    }

    #[test]
    fn state_survives_a_reload() {
        let store = Arc::new(MemoryStore::new());
        let mut manager = manager_with(store.clone());
        manager.append_day().unwrap();
        let id = manager
            .add_entry(ItineraryEntry::new(0, "USJ", "08:00"))
            .unwrap();
        manager
            .add_shopping_item(ShoppingItem::new("Pokémon cards"))
            .unwrap();

        let reloaded = manager_with(store);
        assert_eq!(reloaded.dates().len(), 6);
        assert_eq!(reloaded.range().book().find_entry(ymd(2, 25), id).unwrap().name, "USJ");
        assert_eq!(reloaded.shopping().len(), 1);
    }

    #[test]
    fn declined_guards_leave_state_untouched() {
        let store = Arc::new(MemoryStore::new());
        let mut manager = manager_with(store.clone());
        let id = manager
            .add_entry(ItineraryEntry::new(0, "Kaiyukan", "10:00"))
            .unwrap();
        let writes = store.write_count(StoreKey::Itinerary);

        assert_eq!(manager.delete_day(ymd(2, 20), &AssumeNo).unwrap(), Outcome::Declined);
        assert_eq!(manager.delete_entry(id, &AssumeNo).unwrap(), Outcome::Declined);
        assert_eq!(manager.dates().len(), 5);
        assert_eq!(manager.current_itinerary().len(), 1);
        assert_eq!(store.write_count(StoreKey::Itinerary), writes);
    }

    #[test]
    fn last_day_cannot_be_deleted_even_when_confirmed() {
        let store = Arc::new(MemoryStore::new());
        let config = Config {
            initial_days: 1,
            ..Config::default()
        };
        let mut manager = TripManager::load(Box::new(SharedStore(store)), &config).unwrap();
        assert!(matches!(
            manager.delete_day(ymd(2, 20), &AssumeYes),
            Err(TripError::LastDateRemaining)
        ));
        assert_eq!(manager.dates().len(), 1);
    }

    #[test]
    fn confirmed_day_deletion_cascades() {
        let mut manager = manager_with(Arc::new(MemoryStore::new()));
        manager.select(ymd(2, 22)).unwrap();
        manager
            .add_entry(ItineraryEntry::new(0, "Amanohashidate", "13:00"))
            .unwrap();
        let deleted = manager
            .delete_day(ymd(2, 22), &AssumeYes)
            .unwrap()
            .applied()
            .flatten()
            .unwrap();
        assert_eq!(deleted.removed_entries, 1);
        assert_eq!(manager.selected_date(), ymd(2, 23));
        assert!(!manager.range().book().contains_day(ymd(2, 22)));
    }

    #[test]
    fn totals_and_rewards_use_current_rate() {
        let mut manager = manager_with(Arc::new(MemoryStore::new()));
        let mut form = manager.new_expense_form();
        form.amount = Amount::from(10000);
        form.payment = PaymentMethod::RewardsCard;
        manager.save_expense(form).unwrap();

        manager.apply_remote(RemoteUpdate::Rate(ExchangeRate::new(0.22).unwrap()));
        assert_eq!(manager.totals().twd, 2200);
        assert_eq!(manager.rewards().total_reward, 111);
        assert_eq!(manager.convert(1000.0, Currency::Jpy), 220);
        assert_eq!(manager.convert(220.0, Currency::Twd), 1000);
    }

    #[test]
    fn import_skips_absent_sections() {
        let mut manager = manager_with(Arc::new(MemoryStore::new()));
        manager
            .add_shopping_item(ShoppingItem::new("Green tea"))
            .unwrap();
        let payload = crate::transfer::parse_import(
            r#"{"itinerary":{"2026-03-01":[{"id":5,"name":"Nara","time":"09:00","category":"景點"}]},
                "expenses":[{"id":7,"date":"2026-03-01","name":"Deer crackers","amount":"200",
                             "category":"其他","payment":"現金","currency":"JPY"}]}"#,
        )
        .unwrap();
        let applied = manager.import(payload, &AssumeYes).unwrap();
        assert_eq!(applied, Outcome::Applied(vec!["itinerary", "expenses"]));
        assert_eq!(manager.shopping().items()[0].name, "Green tea");
        assert_eq!(manager.dates().len(), 1);
        assert_eq!(manager.selected_date(), ymd(3, 1));
        assert_eq!(manager.current_itinerary()[0].name, "Nara");
        assert_eq!(manager.expenses().records()[0].id, 7);
    }

    #[test]
    fn declined_import_changes_nothing() {
        let mut manager = manager_with(Arc::new(MemoryStore::new()));
        let payload = crate::transfer::parse_import(r#"{"shopping":[]}"#).unwrap();
        manager.add_shopping_item(ShoppingItem::new("Kit Kat")).unwrap();
        assert_eq!(manager.import(payload, &AssumeNo).unwrap(), Outcome::Declined);
        assert_eq!(manager.shopping().len(), 1);
    }

    #[test]
    fn new_ids_stay_above_imported_ones() {
        let mut manager = manager_with(Arc::new(MemoryStore::new()));
        let far = chrono::Utc::now().timestamp_millis() + 10_000_000;
        let payload = crate::transfer::parse_import(&format!(
            r#"{{"expenses":[{{"id":{far},"date":"2026-02-20","amount":1}}]}}"#
        ))
        .unwrap();
        manager.import(payload, &AssumeYes).unwrap();
        let id = manager
            .add_entry(ItineraryEntry::new(0, "Later", ""))
            .unwrap();
        assert!(id > far);
    }

    #[test]
    fn importing_the_largest_id_keeps_adding_entries() {
        let mut manager = manager_with(Arc::new(MemoryStore::new()));
        let payload = crate::transfer::parse_import(&format!(
            r#"{{"expenses":[{{"id":{},"date":"2026-02-20","amount":1}}]}}"#,
            i64::MAX
        ))
        .unwrap();
        manager.import(payload, &AssumeYes).unwrap();
        let id = manager
            .add_entry(ItineraryEntry::new(0, "Umeda Sky", ""))
            .unwrap();
        assert_eq!(id, i64::MAX);
        assert_eq!(manager.current_itinerary().len(), 1);
    }

    #[test]
    fn sample_plan_seeds_only_an_empty_itinerary() {
        let config = Config {
            seed_sample: true,
            ..Config::default()
        };
        let store = Arc::new(MemoryStore::new());
        let manager = TripManager::load(Box::new(SharedStore(store.clone())), &config).unwrap();
        assert_eq!(manager.dates().len(), 5);
        assert_eq!(manager.current_itinerary()[0].name, "抵達關西機場");
        assert_eq!(store.write_count(StoreKey::Itinerary), 0);

        store.insert_raw(StoreKey::Itinerary, r#"{"2026-03-01":[]}"#);
        let manager = TripManager::load(Box::new(SharedStore(store)), &config).unwrap();
        assert_eq!(manager.dates().len(), 1);
        assert!(manager.current_itinerary().is_empty());
    }
}
