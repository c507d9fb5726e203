//! Grouping and totals over lists of transactions.

use std::{collections::HashMap, hash::Hash};

use serde::Serialize;

use crate::transaction::{Amount, Transaction, TransactionType};

/// Bucket `items` by `key_fn`.
///
/// Groups appear in the order their key was first seen and each group keeps
/// the relative order of `items`. Keys are not sorted.
pub fn group_by<T, K, F>(items: &[T], key_fn: F) -> Vec<(K, Vec<T>)>
where
    T: Clone,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut index_of_key: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let key = key_fn(item);

        match index_of_key.get(&key) {
            Some(&index) => groups[index].1.push(item.clone()),
            None => {
                index_of_key.insert(key.clone(), groups.len());
                groups.push((key, vec![item.clone()]));
            }
        }
    }

    groups
}

/// The total income and expenses over a list of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    /// The sum of income amounts.
    pub income: Amount,
    /// The sum of expense amounts.
    pub expense: Amount,
}

/// Sum the amounts in `transactions` per transaction type.
pub fn totals(transactions: &[Transaction]) -> Totals {
    transactions
        .iter()
        .fold(Totals::default(), |mut totals, transaction| {
            match transaction.kind {
                TransactionType::Income => totals.income += transaction.amount,
                TransactionType::Expense => totals.expense += transaction.amount,
            }

            totals
        })
}

/// One slice of the income/expense pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    /// The label shown in the legend.
    pub name: &'static str,
    /// The size of the slice.
    pub value: Amount,
}

/// The two pie chart slices for `totals`: income first, then expenses.
pub fn pie_slices(totals: &Totals) -> [PieSlice; 2] {
    [
        PieSlice {
            name: TransactionType::Income.label(),
            value: totals.income,
        },
        PieSlice {
            name: TransactionType::Expense.label(),
            value: totals.expense,
        },
    ]
}
