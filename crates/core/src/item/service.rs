//! Saving and deleting recurring items.

use spendful_shared::types::{ItemId, parameterize, unique_slug};
use tracing::{debug, info};

use super::error::ItemError;
use super::types::{NewItem, RecurringItem};
use super::validation;
use crate::recurrence::RecurrenceState;
use crate::store::{ItemQuery, Store, StoreError, TransactionQuery, atomically};

/// Stateless service for item persistence.
///
/// Every write goes through [`ItemService::save`], which normalizes,
/// validates, refreshes the slug and the recurrence state, and only then
/// inserts or updates the record.
pub struct ItemService;

impl ItemService {
    /// Builds and saves a new item.
    pub fn create<S: Store + ?Sized>(store: &mut S, input: NewItem) -> Result<RecurringItem, ItemError> {
        let mut item = input.into_item();
        Self::save(store, &mut item)?;
        Ok(item)
    }

    /// Validates and writes `item`, inserting it when it is not stored yet.
    ///
    /// On success `item` holds exactly what was written.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` with field-keyed messages if a rule fails, or a
    /// store error if the write fails.
    pub fn save<S: Store + ?Sized>(store: &mut S, item: &mut RecurringItem) -> Result<(), ItemError> {
        let previous = store.item(item.id)?;

        validation::normalize(item);
        let errors = validation::validate(store, item, previous.is_some())?;
        if !errors.is_empty() {
            debug!(item_id = %item.id, errors = %errors, "item rejected");
            return Err(ItemError::Invalid(errors));
        }

        Self::refresh_slug(store, item, previous.as_ref())?;
        Self::refresh_recurrence(item, previous.as_ref());

        match previous {
            Some(_) => store.update_item(item)?,
            None => store.insert_item(item)?,
        }
        Ok(())
    }

    /// Deletes an item, orphaning its transactions instead of deleting them.
    ///
    /// Each transaction keeps its `item_id`, loses its occurrence link and
    /// receives the item's category so it can still be classified.
    pub fn destroy<S: Store + ?Sized>(store: &mut S, id: ItemId) -> Result<(), ItemError> {
        let item = store.item(id)?.ok_or(ItemError::NotFound(id))?;

        let orphaned = atomically(store, |s| -> Result<usize, ItemError> {
            let txns = s.transactions(&TransactionQuery::for_item(id))?;
            for mut txn in txns.iter().cloned() {
                txn.occurrence = None;
                txn.category = Some(item.category);
                s.update_transaction(&txn)?;
            }
            s.delete_item(id)?;
            Ok(txns.len())
        })?;

        info!(item_id = %id, orphaned, "item destroyed");
        Ok(())
    }

    fn refresh_slug<S: Store + ?Sized>(
        store: &S,
        item: &mut RecurringItem,
        previous: Option<&RecurringItem>,
    ) -> Result<(), StoreError> {
        let renamed = previous.is_none_or(|p| p.name != item.name);
        if !renamed && !item.slug.is_empty() {
            return Ok(());
        }
        let siblings = store.items(&ItemQuery::for_budget(item.budget_id))?;
        item.slug = unique_slug(
            &parameterize(&item.name),
            siblings
                .iter()
                .filter(|other| other.id != item.id)
                .map(|other| other.slug.as_str()),
        );
        Ok(())
    }

    /// New items and schedule changes get a fresh rule; a moved anchor keeps
    /// the cached rule and swaps the anchor's extra date.
    fn refresh_recurrence(item: &mut RecurringItem, previous: Option<&RecurringItem>) {
        match previous {
            None => item.recurrence = RecurrenceState::new(item.schedule, item.starts_on),
            Some(prev) => {
                if prev.schedule != item.schedule {
                    item.recurrence = RecurrenceState::new(item.schedule, item.starts_on);
                }
                if prev.starts_on != item.starts_on {
                    item.recurrence.move_anchor(prev.starts_on, item.starts_on);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::Budget;
    use crate::item::Category;
    use crate::recurrence::Schedule;
    use crate::store::MemoryStore;
    use crate::transaction::Transaction;
    use chrono::NaiveDate;
    use spendful_shared::types::{BudgetId, TransactionId};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (MemoryStore, BudgetId) {
        let mut store = MemoryStore::new();
        let budget = Budget::new("Household", 0, ymd(2024, 1, 1));
        store.save_budget(&budget).unwrap();
        (store, budget.id)
    }

    fn weekly(budget_id: BudgetId, name: &str) -> NewItem {
        NewItem {
            budget_id,
            category: Category::Expense,
            name: name.into(),
            amount: 1_500,
            schedule: Some(Schedule::Weekly),
            starts_on: ymd(2024, 1, 1),
            ends_on: Some(ymd(2024, 3, 1)),
        }
    }

    fn normal_txn(item: &RecurringItem, occurrence: NaiveDate) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            budget_id: item.budget_id,
            item_id: Some(item.id),
            occurrence: Some(occurrence),
            category: None,
            date: occurrence,
            amount: item.amount,
            description: None,
        }
    }

    #[test]
    fn test_create_assigns_slug_and_rule() {
        let (mut store, budget_id) = setup();
        let gym = ItemService::create(&mut store, weekly(budget_id, "Gym Membership")).unwrap();
        assert_eq!(gym.slug, "gym-membership");
        assert_eq!(store.item(gym.id).unwrap().unwrap(), gym);

        let mut other = weekly(budget_id, "Gym Membership");
        other.starts_on = ymd(2024, 1, 2);
        let second = ItemService::create(&mut store, other).unwrap();
        assert_eq!(second.slug, "gym-membership-2");
    }

    #[test]
    fn test_name_unique_within_budget_and_start() {
        let (mut store, budget_id) = setup();
        ItemService::create(&mut store, weekly(budget_id, "Rent")).unwrap();
        let err = ItemService::create(&mut store, weekly(budget_id, "Rent")).unwrap_err();
        let ItemError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.get("name"), ["has already been taken"]);
    }

    #[test]
    fn test_unknown_budget_rejected() {
        let (mut store, _) = setup();
        let err = ItemService::create(&mut store, weekly(BudgetId::new(), "Rent")).unwrap_err();
        assert!(matches!(err, ItemError::Invalid(ref e) if e.contains("budget_id")));
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_starts_on_cannot_pass_recorded_occurrence() {
        let (mut store, budget_id) = setup();
        let mut gym = ItemService::create(&mut store, weekly(budget_id, "Gym")).unwrap();
        store.insert_transaction(&normal_txn(&gym, ymd(2024, 1, 8))).unwrap();

        gym.starts_on = ymd(2024, 1, 15);
        let err = ItemService::save(&mut store, &mut gym).unwrap_err();
        assert!(matches!(err, ItemError::Invalid(ref e) if e.contains("starts_on")));
    }

    #[test]
    fn test_ends_on_cannot_precede_transaction_date() {
        let (mut store, budget_id) = setup();
        let mut gym = ItemService::create(&mut store, weekly(budget_id, "Gym")).unwrap();
        store.insert_transaction(&normal_txn(&gym, ymd(2024, 1, 22))).unwrap();

        gym.ends_on = Some(ymd(2024, 1, 15));
        let err = ItemService::save(&mut store, &mut gym).unwrap_err();
        let ItemError::Invalid(errors) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.get("ends_on"), ["cannot be before the date of an existing transaction"]);
    }

    #[test]
    fn test_schedule_change_rebuilds_rule_and_drops_adjustments() {
        let (mut store, budget_id) = setup();
        let mut gym = ItemService::create(&mut store, weekly(budget_id, "Gym")).unwrap();
        gym.recurrence.add_exception(ymd(2024, 1, 8));
        ItemService::save(&mut store, &mut gym).unwrap();
        assert!(!gym.occurrences().exists(ymd(2024, 1, 8)));

        gym.schedule = Schedule::Monthly;
        ItemService::save(&mut store, &mut gym).unwrap();
        assert!(gym.recurrence.exception_dates.is_empty());
        assert_eq!(gym.recurrence().first(2), vec![ymd(2024, 1, 1), ymd(2024, 2, 1)]);
    }

    #[test]
    fn test_moving_start_keeps_cached_rule() {
        let (mut store, budget_id) = setup();
        let mut input = weekly(budget_id, "Phone");
        input.schedule = Some(Schedule::Monthly);
        input.starts_on = ymd(2024, 1, 15);
        input.ends_on = None;
        let mut phone = ItemService::create(&mut store, input).unwrap();

        phone.starts_on = ymd(2024, 1, 20);
        ItemService::save(&mut store, &mut phone).unwrap();
        assert_eq!(
            phone.recurrence().first(3),
            vec![ymd(2024, 1, 20), ymd(2024, 2, 15), ymd(2024, 3, 15)]
        );
    }

    #[test]
    fn test_destroy_orphans_transactions() {
        let (mut store, budget_id) = setup();
        let gym = ItemService::create(&mut store, weekly(budget_id, "Gym")).unwrap();
        let txn = normal_txn(&gym, ymd(2024, 1, 8));
        store.insert_transaction(&txn).unwrap();

        ItemService::destroy(&mut store, gym.id).unwrap();

        assert!(store.item(gym.id).unwrap().is_none());
        let kept = store.transaction(txn.id).unwrap().unwrap();
        assert!(kept.is_orphan());
        assert_eq!(kept.item_id, Some(gym.id));
        assert_eq!(kept.category, Some(Category::Expense));
        assert!(matches!(
            ItemService::destroy(&mut store, gym.id),
            Err(ItemError::NotFound(_))
        ));
    }
}
