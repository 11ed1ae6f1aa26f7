//! Property-based tests for StockLedgerService.
//!
//! - Balance overwrite: committed balances are the caller's resulting balances
//! - Last write wins for repeated products
//! - Negative amounts anywhere reject the whole movement
//! - Outgoing movements need positive balances

use std::collections::HashMap;

use proptest::prelude::*;
use stockledger_shared::types::{OperatorId, ProductId};

use super::error::StockError;
use super::service::StockLedgerService;
use super::types::{Direction, LineItemInput, ProductSnapshot, RecordMovementInput};

/// Product IDs known to the mock registry.
const KNOWN_PRODUCTS: i32 = 5;

/// Strategy to generate a line against a known product.
fn valid_line() -> impl Strategy<Value = LineItemInput> {
    (1..=KNOWN_PRODUCTS, 0i64..10_000, 0i64..10_000).prop_map(|(product, quantity, balance)| {
        LineItemInput::new(ProductId::new(product), quantity, balance)
    })
}

/// Strategy to generate a non-empty list of valid lines.
fn valid_lines() -> impl Strategy<Value = Vec<LineItemInput>> {
    prop::collection::vec(valid_line(), 1..12)
}

/// Strategy to generate a direction.
fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::In), Just(Direction::Out)]
}

fn make_input(direction: Direction, items: Vec<LineItemInput>) -> RecordMovementInput {
    RecordMovementInput {
        direction,
        reference_number: None,
        performed_by: OperatorId::new(),
        items,
    }
}

/// Registry where every known product has the given balance.
fn registry(balance: i32) -> impl Fn(ProductId) -> Option<ProductSnapshot> {
    move |id| {
        (1..=KNOWN_PRODUCTS)
            .contains(&id.into_inner())
            .then_some(ProductSnapshot {
                id,
                balance,
                version: 3,
            })
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any valid movement, the planned final balance of each product is
    /// the resulting balance of the last line that names it.
    #[test]
    fn prop_last_write_wins(
        direction in direction_strategy(),
        items in valid_lines(),
    ) {
        let input = make_input(direction, items.clone());
        let movement = StockLedgerService::validate(&input, registry(10)).unwrap();
        let writes = StockLedgerService::plan_balance_writes(&movement);

        prop_assert_eq!(writes.len(), items.len());

        let mut expected: HashMap<ProductId, i32> = HashMap::new();
        for item in &items {
            expected.insert(item.product_id, i32::try_from(item.resulting_balance).unwrap());
        }
        prop_assert_eq!(StockLedgerService::final_balances(&writes), expected);
    }

    /// Writes for the same product chain versions without gaps.
    #[test]
    fn prop_versions_chain(items in valid_lines()) {
        let input = make_input(Direction::In, items);
        let movement = StockLedgerService::validate(&input, registry(0)).unwrap();
        let writes = StockLedgerService::plan_balance_writes(&movement);

        let mut last: HashMap<ProductId, i32> = HashMap::new();
        for write in &writes {
            let expected = last.get(&write.product_id).copied().unwrap_or(3);
            prop_assert_eq!(write.expected_version, expected);
            prop_assert_eq!(write.new_version, expected + 1);
            last.insert(write.product_id, write.new_version);
        }
    }

    /// A single negative quantity or resulting balance anywhere rejects the
    /// whole movement.
    #[test]
    fn prop_negative_amount_rejected(
        direction in direction_strategy(),
        items in valid_lines(),
        position in any::<prop::sample::Index>(),
        negative in -10_000i64..0,
        poison_balance in any::<bool>(),
    ) {
        let mut items = items;
        let index = position.index(items.len());
        if poison_balance {
            items[index].resulting_balance = negative;
        } else {
            items[index].quantity = negative;
        }

        let input = make_input(direction, items);
        let result = StockLedgerService::validate(&input, registry(10));
        prop_assert!(
            matches!(&result, Err(StockError::InvalidQuantity { line, .. }) if *line == index),
            "Negative amount should be rejected at line {}, got: {:?}",
            index,
            result
        );
    }

    /// Outgoing movements are rejected whenever the products have no stock.
    #[test]
    fn prop_out_needs_stock(
        items in valid_lines(),
        balance in -100i32..=0,
    ) {
        let first = items[0].product_id;
        let input = make_input(Direction::Out, items);
        prop_assert_eq!(
            StockLedgerService::validate(&input, registry(balance)),
            Err(StockError::IneligibleProduct(first))
        );
    }

    /// Incoming movements ignore the current balance.
    #[test]
    fn prop_in_ignores_stock(
        items in valid_lines(),
        balance in -100i32..=100,
    ) {
        let input = make_input(Direction::In, items);
        prop_assert!(StockLedgerService::validate(&input, registry(balance)).is_ok());
    }
}
