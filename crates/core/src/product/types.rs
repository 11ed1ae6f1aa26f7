//! Product domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use stockledger_shared::types::{Price, ProductId};

use super::error::ProductRuleError;

/// Maximum length of a product name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum number of digits in a tax classification (NCM) code.
pub const MAX_TAX_CODE_LEN: usize = 8;

/// A catalog product with its current stock balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Unique product name.
    pub name: String,
    /// Tax classification code (NCM), digits only.
    pub tax_code: String,
    /// Whether the product is imported.
    pub imported: bool,
    /// Unit price.
    pub price: Price,
    /// Current stock count. Not floored at zero.
    pub balance: i32,
    /// Advisory threshold; never enforced by the ledger.
    pub minimum_balance: i32,
    /// Incremented on every balance write.
    pub version: i32,
}

impl Product {
    /// Returns true if the product may be the subject of an outgoing line.
    #[must_use]
    pub const fn is_eligible_for_exit(&self) -> bool {
        self.balance > 0
    }

    /// Returns true if the balance is below the advisory minimum.
    #[must_use]
    pub const fn is_below_minimum(&self) -> bool {
        self.balance < self.minimum_balance
    }

    /// Units missing to reach the minimum balance, zero when at or above it.
    #[must_use]
    pub fn shortfall(&self) -> i64 {
        (i64::from(self.minimum_balance) - i64::from(self.balance)).max(0)
    }
}

impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    /// Product name; surrounding whitespace is trimmed.
    pub name: String,
    /// Tax classification code.
    pub tax_code: String,
    /// Whether the product is imported.
    #[serde(default)]
    pub imported: bool,
    /// Unit price.
    pub price: Decimal,
    /// Opening stock count.
    #[serde(default)]
    pub balance: i32,
    /// Advisory minimum stock count.
    #[serde(default)]
    pub minimum_balance: i32,
}

/// A [`NewProduct`] that passed catalog validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedProduct {
    /// Trimmed product name.
    pub name: String,
    /// Tax classification code.
    pub tax_code: String,
    /// Whether the product is imported.
    pub imported: bool,
    /// Validated price.
    pub price: Price,
    /// Opening stock count.
    pub balance: i32,
    /// Advisory minimum stock count.
    pub minimum_balance: i32,
}

impl NewProduct {
    /// Applies catalog rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input breaks.
    pub fn validate(self) -> Result<ValidatedProduct, ProductRuleError> {
        let name = self.name.trim().to_string();
        if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(ProductRuleError::InvalidName(name));
        }

        let tax_code = self.tax_code.trim().to_string();
        if tax_code.is_empty()
            || tax_code.len() > MAX_TAX_CODE_LEN
            || !tax_code.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(ProductRuleError::InvalidTaxCode(tax_code));
        }

        let price = Price::new(self.price)?;

        if self.minimum_balance < 0 {
            return Err(ProductRuleError::NegativeMinimumBalance(self.minimum_balance));
        }

        Ok(ValidatedProduct {
            name,
            tax_code,
            imported: self.imported,
            price,
            balance: self.balance,
            minimum_balance: self.minimum_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use stockledger_shared::types::PriceError;

    fn make_new_product() -> NewProduct {
        NewProduct {
            name: "  Parafuso sextavado ".to_string(),
            tax_code: "73181500".to_string(),
            imported: false,
            price: dec!(1.5),
            balance: 10,
            minimum_balance: 2,
        }
    }

    fn make_product(balance: i32, minimum_balance: i32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Arruela".to_string(),
            tax_code: "7318".to_string(),
            imported: true,
            price: Price::new(dec!(0.25)).unwrap(),
            balance,
            minimum_balance,
            version: 0,
        }
    }

    #[test]
    fn test_validate_trims_and_normalizes() {
        let product = make_new_product().validate().unwrap();
        assert_eq!(product.name, "Parafuso sextavado");
        assert_eq!(product.price.amount(), dec!(1.50));
        assert_eq!(product.balance, 10);
    }

    #[test]
    fn test_validate_blank_name() {
        let mut input = make_new_product();
        input.name = "   ".to_string();
        assert!(matches!(
            input.validate(),
            Err(ProductRuleError::InvalidName(_))
        ));
    }

    #[test]
    fn test_validate_long_name() {
        let mut input = make_new_product();
        input.name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            input.validate(),
            Err(ProductRuleError::InvalidName(_))
        ));
    }

    #[rstest]
    #[case("")]
    #[case("123456789")]
    #[case("7318A")]
    #[case("73.18")]
    fn test_validate_bad_tax_code(#[case] tax_code: &str) {
        let mut input = make_new_product();
        input.tax_code = tax_code.to_string();
        assert!(matches!(
            input.validate(),
            Err(ProductRuleError::InvalidTaxCode(_))
        ));
    }

    #[test]
    fn test_validate_leading_zero_tax_code() {
        let mut input = make_new_product();
        input.tax_code = "01012100".to_string();
        assert_eq!(input.validate().unwrap().tax_code, "01012100");
    }

    #[test]
    fn test_validate_bad_price() {
        let mut input = make_new_product();
        input.price = dec!(-3);
        assert_eq!(
            input.validate(),
            Err(ProductRuleError::InvalidPrice(PriceError::Negative(dec!(-3))))
        );
    }

    #[test]
    fn test_validate_negative_minimum() {
        let mut input = make_new_product();
        input.minimum_balance = -1;
        assert_eq!(
            input.validate(),
            Err(ProductRuleError::NegativeMinimumBalance(-1))
        );
    }

    #[test]
    fn test_opening_balance_may_be_negative() {
        let mut input = make_new_product();
        input.balance = -4;
        assert_eq!(input.validate().unwrap().balance, -4);
    }

    #[rstest]
    #[case(1, true)]
    #[case(0, false)]
    #[case(-2, false)]
    fn test_exit_eligibility(#[case] balance: i32, #[case] eligible: bool) {
        assert_eq!(make_product(balance, 0).is_eligible_for_exit(), eligible);
    }

    #[test]
    fn test_minimum_balance_is_advisory() {
        let product = make_product(3, 5);
        assert!(product.is_below_minimum());
        assert_eq!(product.shortfall(), 2);

        let product = make_product(5, 5);
        assert!(!product.is_below_minimum());
        assert_eq!(product.shortfall(), 0);
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(make_product(0, 0).to_string(), "Arruela");
    }
}
