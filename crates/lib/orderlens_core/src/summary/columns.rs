//! Column resolution by case-insensitive substring match.
//!
//! Order tables in the wild carry prefixes and suffixes on their column
//! names (`Order_Date`, `customer_order_date_v2`, ...). A logical role is
//! resolved to the first column, in table order, whose lowercase name
//! contains the role name.

use super::SummaryError;

/// Role name of the order date column.
pub const ORDER_DATE: &str = "order_date";
/// Role name of the optional order week column.
pub const ORDER_WEEK: &str = "order_week";
/// Role name of the order quantity column.
pub const ORDER_QUANTITY: &str = "order_quantity";

/// Returns the first column whose lowercase name contains `role` (lowercased).
pub fn resolve_column<'a>(columns: &'a [String], role: &str) -> Option<&'a str> {
    let role = role.to_lowercase();
    columns
        .iter()
        .find(|name| name.to_lowercase().contains(&role))
        .map(String::as_str)
}

/// A resolved column: its position in the dataset and its actual name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub index: usize,
    pub name: String,
}

impl ColumnRef {
    fn find(columns: &[String], role: &str) -> Option<Self> {
        let name = resolve_column(columns, role)?;
        let index = columns.iter().position(|c| c == name)?;
        Some(Self {
            index,
            name: name.to_string(),
        })
    }
}

/// The columns the aggregation reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderColumns {
    pub date: ColumnRef,
    pub week: Option<ColumnRef>,
    pub quantity: ColumnRef,
}

impl OrderColumns {
    /// Resolves every role against `columns`.
    ///
    /// Fails with [`SummaryError::MissingRequiredColumn`] listing every
    /// required role that matched nothing.
    pub fn resolve(columns: &[String]) -> Result<Self, SummaryError> {
        let date = ColumnRef::find(columns, ORDER_DATE);
        let week = ColumnRef::find(columns, ORDER_WEEK);
        let quantity = ColumnRef::find(columns, ORDER_QUANTITY);

        match (date, quantity) {
            (Some(date), Some(quantity)) => Ok(Self {
                date,
                week,
                quantity,
            }),
            (date, quantity) => {
                let mut missing = Vec::new();
                if date.is_none() {
                    missing.push(ORDER_DATE);
                }
                if quantity.is_none() {
                    missing.push(ORDER_QUANTITY);
                }
                Err(SummaryError::MissingRequiredColumn(missing))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let columns = cols(&["id", "customer_order_date_v2", "qty"]);
        assert_eq!(
            resolve_column(&columns, ORDER_DATE),
            Some("customer_order_date_v2")
        );

        let columns = cols(&["Order_Date", "Order_Quantity"]);
        assert_eq!(resolve_column(&columns, ORDER_DATE), Some("Order_Date"));
        assert_eq!(resolve_column(&columns, "ORDER_QUANTITY"), Some("Order_Quantity"));
    }

    #[test]
    fn first_matching_column_wins() {
        let columns = cols(&["order_date_local", "order_date_utc"]);
        assert_eq!(resolve_column(&columns, ORDER_DATE), Some("order_date_local"));
    }

    #[test]
    fn no_match_is_none() {
        let columns = cols(&["date", "quantity"]);
        assert_eq!(resolve_column(&columns, ORDER_DATE), None);
    }

    #[test]
    fn resolves_indices_and_optional_week() {
        let columns = cols(&["id", "Order_Quantity", "Order_Date"]);
        let resolved = OrderColumns::resolve(&columns).expect("resolve");
        assert_eq!(resolved.date.index, 2);
        assert_eq!(resolved.quantity.index, 1);
        assert_eq!(resolved.quantity.name, "Order_Quantity");
        assert!(resolved.week.is_none());

        let columns = cols(&["order_date", "order_week_no", "order_quantity"]);
        let resolved = OrderColumns::resolve(&columns).expect("resolve");
        assert_eq!(resolved.week.map(|w| w.index), Some(1));
    }

    #[test]
    fn missing_roles_are_all_reported() {
        let err = OrderColumns::resolve(&cols(&["id", "note"])).unwrap_err();
        match err {
            SummaryError::MissingRequiredColumn(roles) => {
                assert_eq!(roles, vec![ORDER_DATE, ORDER_QUANTITY]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = OrderColumns::resolve(&cols(&["order_date"])).unwrap_err();
        assert!(matches!(
            err,
            SummaryError::MissingRequiredColumn(ref roles) if roles == &[ORDER_QUANTITY]
        ));
    }
}
