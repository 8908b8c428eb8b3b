//! Turns requested order lines into priced lines using the menu as a price snapshot.

use crate::enums::orders::OrderItemRequest;
use crate::models::common::MealType;
use crate::models::menu::MenuPrices;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Order must contain at least one item")]
    Empty,
    #[error("Order has too many items")]
    TooManyItems,
    #[error("Invalid meal type")]
    InvalidMealType,
    #[error("Invalid sabji: {0}")]
    InvalidSabji(String),
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("Order total is too large")]
    Overflow,
}

/// Line numbers are stored as SMALLINT.
pub const MAX_ORDER_LINES: usize = i16::MAX as usize + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    pub meal_type: MealType,
    pub sabji: Option<String>,
    pub quantity: i32,
    pub price_per_unit: i32,
    pub total_price: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub items: Vec<PricedItem>,
    pub grand_total: i32,
}

/// Validates each line against the menu and prices it.
///
/// Lines are checked in request order; the first invalid line decides the error.
/// Rice-only lines never carry a sabji, even if the client sent one.
pub fn price_order(
    sabjis: &[String],
    prices: MenuPrices,
    items: &[OrderItemRequest],
) -> Result<PricedOrder, PricingError> {
    if items.is_empty() {
        return Err(PricingError::Empty);
    }
    if items.len() > MAX_ORDER_LINES {
        return Err(PricingError::TooManyItems);
    }

    let mut priced = Vec::with_capacity(items.len());
    let mut grand_total: i32 = 0;

    for item in items {
        let meal_type = item
            .meal_type
            .as_deref()
            .and_then(|m| m.parse::<MealType>().ok())
            .ok_or(PricingError::InvalidMealType)?;

        let sabji = if meal_type.needs_sabji() {
            match item.sabji.as_deref().map(str::trim) {
                Some(name) if sabjis.iter().any(|s| s == name) => Some(name.to_string()),
                other => {
                    return Err(PricingError::InvalidSabji(
                        other.unwrap_or_default().to_string(),
                    ))
                }
            }
        } else {
            None
        };

        let quantity = match item.quantity {
            Some(q) if q >= 1 => i32::try_from(q).map_err(|_| PricingError::Overflow)?,
            _ => return Err(PricingError::InvalidQuantity),
        };

        let price_per_unit = prices.for_meal(meal_type);
        let total_price = price_per_unit
            .checked_mul(quantity)
            .ok_or(PricingError::Overflow)?;
        grand_total = grand_total
            .checked_add(total_price)
            .ok_or(PricingError::Overflow)?;

        priced.push(PricedItem {
            meal_type,
            sabji,
            quantity,
            price_per_unit,
            total_price,
        });
    }

    Ok(PricedOrder {
        items: priced,
        grand_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> (Vec<String>, MenuPrices) {
        (
            vec!["Aloo Gobi".to_string(), "Paneer".to_string()],
            MenuPrices {
                full: 120,
                half: 80,
                rice_only: 50,
            },
        )
    }

    fn line(meal: &str, sabji: Option<&str>, quantity: i64) -> OrderItemRequest {
        OrderItemRequest {
            meal_type: Some(meal.to_string()),
            sabji: sabji.map(str::to_string),
            quantity: Some(quantity),
        }
    }

    #[test]
    fn grand_total_is_sum_of_line_totals() {
        let (sabjis, prices) = menu();
        let order = price_order(
            &sabjis,
            prices,
            &[
                line("full", Some("Paneer"), 2),
                line("half", Some("Aloo Gobi"), 1),
                line("riceOnly", None, 3),
            ],
        )
        .unwrap();

        assert_eq!(order.items[0].total_price, 240);
        assert_eq!(order.items[1].total_price, 80);
        assert_eq!(order.items[2].total_price, 150);
        assert_eq!(
            order.grand_total,
            order.items.iter().map(|i| i.total_price).sum::<i32>()
        );
        assert_eq!(order.grand_total, 470);
        for item in &order.items {
            assert_eq!(item.total_price, item.price_per_unit * item.quantity);
        }
    }

    #[test]
    fn rice_only_drops_sabji() {
        let (sabjis, prices) = menu();
        let order = price_order(&sabjis, prices, &[line("riceOnly", Some("Paneer"), 1)]).unwrap();
        assert_eq!(order.items[0].sabji, None);
        assert_eq!(order.items[0].price_per_unit, 50);
    }

    #[test]
    fn rejects_unknown_meal_type() {
        let (sabjis, prices) = menu();
        assert_eq!(
            price_order(&sabjis, prices, &[line("jumbo", Some("Paneer"), 1)]),
            Err(PricingError::InvalidMealType)
        );
        let missing = OrderItemRequest {
            meal_type: None,
            sabji: Some("Paneer".to_string()),
            quantity: Some(1),
        };
        assert_eq!(
            price_order(&sabjis, prices, &[missing]),
            Err(PricingError::InvalidMealType)
        );
    }

    #[test]
    fn rejects_sabji_not_on_menu_or_missing() {
        let (sabjis, prices) = menu();
        assert_eq!(
            price_order(&sabjis, prices, &[line("full", Some("Dal"), 1)]),
            Err(PricingError::InvalidSabji("Dal".to_string()))
        );
        assert_eq!(
            price_order(&sabjis, prices, &[line("half", None, 1)]),
            Err(PricingError::InvalidSabji(String::new()))
        );
    }

    #[test]
    fn rejects_more_lines_than_line_numbers_allow() {
        let (sabjis, prices) = menu();
        let at_limit = vec![line("riceOnly", None, 1); MAX_ORDER_LINES];
        assert_eq!(
            price_order(&sabjis, prices, &at_limit).map(|o| o.items.len()),
            Ok(MAX_ORDER_LINES)
        );

        let over = vec![line("riceOnly", None, 1); MAX_ORDER_LINES + 1];
        assert_eq!(
            price_order(&sabjis, prices, &over),
            Err(PricingError::TooManyItems)
        );
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let (sabjis, prices) = menu();
        assert_eq!(
            price_order(&sabjis, prices, &[line("full", Some("Paneer"), 0)]),
            Err(PricingError::InvalidQuantity)
        );
        assert_eq!(
            price_order(&sabjis, prices, &[line("riceOnly", None, -2)]),
            Err(PricingError::InvalidQuantity)
        );
    }

    #[test]
    fn rejects_empty_and_overflowing_orders() {
        let (sabjis, prices) = menu();
        assert_eq!(price_order(&sabjis, prices, &[]), Err(PricingError::Empty));
        assert_eq!(
            price_order(&sabjis, prices, &[line("full", Some("Paneer"), i64::from(i32::MAX))]),
            Err(PricingError::Overflow)
        );
    }

    #[test]
    fn first_invalid_line_wins() {
        let (sabjis, prices) = menu();
        let result = price_order(
            &sabjis,
            prices,
            &[line("full", Some("Paneer"), 0), line("bogus", None, 1)],
        );
        assert_eq!(result, Err(PricingError::InvalidQuantity));
    }
}
