//! Stock ledger service for movement validation and balance planning.
//!
//! This module provides the pure half of the ledger update protocol: it
//! decides whether a proposed movement may be committed and which balance
//! overwrites committing it implies. The storage half lives in the database
//! crate and runs both steps inside one transaction.

use std::collections::HashMap;

use stockledger_shared::types::ProductId;

use super::error::StockError;
use super::types::{
    BalanceWrite, Direction, LineItemInput, ProductSnapshot, RecordMovementInput,
    ValidatedLine, ValidatedMovement,
};

/// Stock ledger service for movement validation and resolution.
///
/// This service contains pure business logic with no database dependencies.
pub struct StockLedgerService;

impl StockLedgerService {
    /// Validate a movement before persisting.
    ///
    /// Rules, in evaluation order:
    /// 1. At least one line item
    /// 2. Reference number, when present, is positive
    /// 3. Every quantity and resulting balance is a non-negative `i32`
    ///    (checked across the whole set before any product is looked up)
    /// 4. Every product exists
    /// 5. For outgoing movements, every product has a positive balance
    ///
    /// # Arguments
    ///
    /// * `input` - The movement to validate
    /// * `product_lookup` - Returns the current state of a product, or `None`
    ///
    /// # Errors
    ///
    /// Returns the `StockError` for the first rule that fails.
    pub fn validate<L>(
        input: &RecordMovementInput,
        product_lookup: L,
    ) -> Result<ValidatedMovement, StockError>
    where
        L: Fn(ProductId) -> Option<ProductSnapshot>,
    {
        // 1. Non-empty
        if input.items.is_empty() {
            return Err(StockError::EmptyMovement);
        }

        // 2. Reference number
        let reference_number = Self::validate_reference(input.reference_number)?;

        // 3. Amounts, whole set first
        let amounts = input
            .items
            .iter()
            .enumerate()
            .map(|(line, item)| Self::validate_amounts(line, item))
            .collect::<Result<Vec<_>, _>>()?;

        // 4 + 5. Products
        let mut lines = Vec::with_capacity(input.items.len());
        for (item, (quantity, resulting_balance)) in input.items.iter().zip(amounts) {
            let observed = product_lookup(item.product_id)
                .ok_or(StockError::ProductNotFound(item.product_id))?;

            if input.direction == Direction::Out && observed.balance <= 0 {
                return Err(StockError::IneligibleProduct(item.product_id));
            }

            lines.push(ValidatedLine {
                product_id: item.product_id,
                quantity,
                resulting_balance,
                observed,
            });
        }

        Ok(ValidatedMovement {
            direction: input.direction,
            reference_number,
            performed_by: input.performed_by,
            lines,
        })
    }

    /// Validates an optional reference number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidReferenceNumber` for zero, negative or oversized values.
    pub fn validate_reference(reference_number: Option<i64>) -> Result<Option<i32>, StockError> {
        match reference_number {
            None => Ok(None),
            Some(raw) => i32::try_from(raw)
                .ok()
                .filter(|n| *n > 0)
                .map(Some)
                .ok_or(StockError::InvalidReferenceNumber(raw)),
        }
    }

    /// Checks one line's quantity and resulting balance.
    fn validate_amounts(line: usize, item: &LineItemInput) -> Result<(i32, i32), StockError> {
        let invalid = || StockError::InvalidQuantity {
            line,
            quantity: item.quantity,
            resulting_balance: item.resulting_balance,
        };

        let quantity = i32::try_from(item.quantity).map_err(|_| invalid())?;
        let resulting_balance = i32::try_from(item.resulting_balance).map_err(|_| invalid())?;

        if quantity < 0 || resulting_balance < 0 {
            return Err(invalid());
        }

        Ok((quantity, resulting_balance))
    }

    /// Plans the balance overwrites for a validated movement.
    ///
    /// Writes come out in submission order. When several lines target the
    /// same product, each write expects the version left by the previous
    /// one, so applying them in order leaves the last line's balance.
    #[must_use]
    pub fn plan_balance_writes(movement: &ValidatedMovement) -> Vec<BalanceWrite> {
        let mut versions: HashMap<ProductId, i32> = HashMap::new();

        movement
            .lines
            .iter()
            .map(|line| {
                let expected_version = *versions
                    .get(&line.product_id)
                    .unwrap_or(&line.observed.version);
                let new_version = expected_version.wrapping_add(1);
                versions.insert(line.product_id, new_version);

                BalanceWrite {
                    product_id: line.product_id,
                    expected_version,
                    new_balance: line.resulting_balance,
                    new_version,
                }
            })
            .collect()
    }

    /// Final balance per product once every write has been applied.
    #[must_use]
    pub fn final_balances(writes: &[BalanceWrite]) -> HashMap<ProductId, i32> {
        writes
            .iter()
            .map(|write| (write.product_id, write.new_balance))
            .collect()
    }

    /// Suggests the resulting balance for a line the caller is assembling.
    ///
    /// Incoming lines add the quantity to the current balance, outgoing
    /// lines subtract it. The ledger never calls this: it stores whatever
    /// resulting balance the caller submits.
    #[must_use]
    pub fn suggest_resulting_balance(direction: Direction, current: i32, quantity: i32) -> i64 {
        match direction {
            Direction::In => i64::from(current) + i64::from(quantity),
            Direction::Out => i64::from(current) - i64::from(quantity),
        }
    }
}
