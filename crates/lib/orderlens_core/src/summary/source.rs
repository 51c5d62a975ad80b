//! Loads the `orders` table from PostgreSQL as a text-celled dataset.

use sqlx::{PgPool, Row};
use tracing::debug;

use super::SummaryError;
use crate::tabular::{Cell, TabularDataset};

/// Name of the table holding order rows.
pub const ORDERS_TABLE: &str = "orders";

/// Lists the columns of `table` in ordinal order.
pub async fn table_columns(pool: &PgPool, table: &str) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT column_name::text
        FROM information_schema.columns
        WHERE table_name = $1
        ORDER BY ordinal_position
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await
}

/// Reads every row of the `orders` table, each column cast to text.
///
/// A missing table yields a dataset with no columns, which then fails column
/// resolution.
pub async fn load_orders(pool: &PgPool) -> Result<TabularDataset, SummaryError> {
    let columns = table_columns(pool, ORDERS_TABLE).await?;
    debug!(?columns, "columns in {ORDERS_TABLE}");
    if columns.is_empty() {
        return Ok(TabularDataset::default());
    }

    let sql = select_as_text(ORDERS_TABLE, &columns);
    let rows = sqlx::query(&sql).fetch_all(pool).await?;

    let rows = rows
        .iter()
        .map(|row| {
            (0..columns.len())
                .map(|i| row.try_get::<Option<String>, _>(i).map(Cell::from_text))
                .collect::<Result<Vec<Cell>, sqlx::Error>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TabularDataset::new(columns, rows))
}

/// Quotes an SQL identifier, doubling embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn select_as_text(table: &str, columns: &[String]) -> String {
    let list = columns
        .iter()
        .map(|c| format!("{}::text", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT {list} FROM {}", quote_ident(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_quoted() {
        assert_eq!(quote_ident("Order_Date"), "\"Order_Date\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn select_casts_every_column_to_text() {
        let sql = select_as_text("orders", &["id".to_string(), "Order_Date".to_string()]);
        assert_eq!(
            sql,
            "SELECT \"id\"::text, \"Order_Date\"::text FROM \"orders\""
        );
    }
}
